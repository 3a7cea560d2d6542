pub mod record_handlers;

use actix_web::{HttpResponse, Scope, get, web};

use crate::AppState;
use crate::models::{RESOURCES, Resource};
use record_handlers::{create_record, delete_record, get_record, list_records, update_record};

/// GET / - liveness check
#[get("/")]
pub async fn alive() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("It's alive!")
}

/// Registers the liveness route and one `/api/<table>` scope per resource.
///
/// The store arrives through `state`; handlers never reach for a global.
pub fn configure(state: web::Data<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let api = RESOURCES
            .iter()
            .fold(web::scope("/api"), |api, resource| api.service(record_scope(resource)));

        cfg.app_data(state).service(alive).service(api);
    }
}

/// The collection answers with and without a trailing slash.
fn record_scope(resource: &Resource) -> Scope {
    let scope = web::scope(&resource.path()).app_data(web::Data::new(*resource));

    ["", "/"]
        .into_iter()
        .fold(scope, |scope, collection| {
            scope.service(
                web::resource(collection)
                    .route(web::get().to(list_records))    // GET    /api/<table>
                    .route(web::post().to(create_record)), // POST   /api/<table>
            )
        })
        .service(
            web::resource("/{id}")
                .route(web::get().to(get_record))        // GET    /api/<table>/{id}
                .route(web::put().to(update_record))     // PUT    /api/<table>/{id}
                .route(web::delete().to(delete_record)), // DELETE /api/<table>/{id}
        )
}
