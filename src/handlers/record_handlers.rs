// src/handlers/record_handlers.rs - CRUD handlers shared by every resource
//
// The resource a request targets comes from the scope's app data, so the
// same five handlers serve /api/posts and /api/users.

use actix_web::{HttpMessage, HttpRequest, HttpResponse, web};
use log::{debug, info};

use crate::AppState;
use crate::dtos::RecordInput;
use crate::errors::ApiError;
use crate::models::Resource;

/// Non-numeric ids can never match a row, so they are answered as not found.
fn parse_id(resource: &Resource, raw: &str) -> Result<i32, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(resource.not_found_message()))
}

/// GET /api/<table>
pub async fn list_records(
    state: web::Data<AppState>,
    resource: web::Data<Resource>,
) -> Result<HttpResponse, ApiError> {
    let records = state
        .store
        .find_all(&resource)
        .await
        .map_err(ApiError::retrieve(resource.list_failure_message()))?;

    debug!("Get all {}: {} rows", resource.table, records.len());
    Ok(HttpResponse::Ok().json(records))
}

/// GET /api/<table>/{id}
pub async fn get_record(
    state: web::Data<AppState>,
    resource: web::Data<Resource>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    debug!("req params id: {}", path);
    let id = parse_id(&resource, &path)?;

    let record = state
        .store
        .find_by_id(&resource, id)
        .await
        .map_err(ApiError::retrieve(resource.fetch_failure_message()))?
        .ok_or_else(|| ApiError::NotFound(resource.not_found_message()))?;

    Ok(HttpResponse::Ok().json(record))
}

/// POST /api/<table>
pub async fn create_record(
    state: web::Data<AppState>,
    resource: web::Data<Resource>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    debug!("request body: {}", String::from_utf8_lossy(&body));
    let input = RecordInput::from_request(&resource, req.content_type(), &body)?;

    let id = state
        .store
        .insert(&resource, &input)
        .await
        .map_err(ApiError::write(resource.save_failure_message()))?;

    let record = input.into_record(&resource, id);
    info!("New {}: {:?}", resource.name, record);
    Ok(HttpResponse::Created().json(record))
}

/// PUT /api/<table>/{id}
///
/// Both fields are required, so the stored row equals the request body and
/// is answered without a second read.
pub async fn update_record(
    state: web::Data<AppState>,
    resource: web::Data<Resource>,
    path: web::Path<String>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    debug!("request params id: {}", path);
    debug!("request body: {}", String::from_utf8_lossy(&body));
    let id = parse_id(&resource, &path)?;
    let input = RecordInput::from_request(&resource, req.content_type(), &body)?;

    let updated = state
        .store
        .update(&resource, id, &input)
        .await
        .map_err(ApiError::write(resource.modify_failure_message()))?;

    if updated == 0 {
        return Err(ApiError::NotFound(resource.not_found_message()));
    }

    let record = input.into_record(&resource, id);
    info!("Updated {}: {:?}", resource.name, record);
    Ok(HttpResponse::Ok().json(record))
}

/// DELETE /api/<table>/{id}
///
/// Reads the row first so the removed record can be returned.
pub async fn delete_record(
    state: web::Data<AppState>,
    resource: web::Data<Resource>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&resource, &path)?;

    let record = state
        .store
        .find_by_id(&resource, id)
        .await
        .map_err(ApiError::write(resource.remove_failure_message()))?
        .ok_or_else(|| ApiError::NotFound(resource.not_found_message()))?;

    let removed = state
        .store
        .remove(&resource, id)
        .await
        .map_err(ApiError::write(resource.remove_failure_message()))?;

    // lost a race with a concurrent delete
    if removed == 0 {
        return Err(ApiError::NotFound(resource.not_found_message()));
    }

    info!("deleted {}: {:?}", resource.name, record);
    Ok(HttpResponse::Ok().json(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::POSTS;

    #[test]
    fn parse_id_accepts_integers_only() {
        assert_eq!(parse_id(&POSTS, "42").unwrap(), 42);
        for raw in ["abc", "1.5", "", "99999999999"] {
            match parse_id(&POSTS, raw) {
                Err(ApiError::NotFound(msg)) => {
                    assert_eq!(msg, "The post with the specified ID does not exist.")
                }
                other => panic!("expected not found for {:?}, got {:?}", raw, other),
            }
        }
    }
}
