use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::errors::ApiError;
use crate::models::Resource;

/// One stored row: the generated id plus the resource's fields in
/// declaration order.
///
/// Serializes flat, e.g. `{"id":1,"title":"A","contents":"B"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: i32,
    pub fields: Vec<(&'static str, String)>,
}

impl Record {
    /// Pairs `values` with the resource's field names. Extra values are
    /// dropped, missing ones are simply absent.
    pub fn new(resource: &Resource, id: i32, values: Vec<String>) -> Self {
        Self {
            id,
            fields: resource.fields.iter().copied().zip(values).collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value.as_str())
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry("id", &self.id)?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Validated body of a create or update request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordInput {
    values: Vec<String>,
}

impl RecordInput {
    /// Parses a raw request body for `resource`.
    ///
    /// The body must be a JSON object carrying every required field as a
    /// non-empty string. Unparsable bodies count as missing fields. Keys
    /// the resource does not declare are ignored.
    pub fn from_body(resource: &Resource, body: &[u8]) -> Result<Self, ApiError> {
        let missing = || ApiError::MissingFields(resource.missing_fields_message());

        let payload: Map<String, Value> = serde_json::from_slice(body).map_err(|_| missing())?;

        let values = resource
            .fields
            .iter()
            .map(|field| match payload.get(*field) {
                Some(Value::String(value)) if !value.is_empty() => Ok(value.clone()),
                _ => Err(missing()),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { values })
    }

    /// Like [`from_body`](Self::from_body), but only `application/json`
    /// bodies are read. Any other media type counts as missing fields.
    pub fn from_request(
        resource: &Resource,
        content_type: &str,
        body: &[u8],
    ) -> Result<Self, ApiError> {
        if !content_type.eq_ignore_ascii_case("application/json") {
            return Err(ApiError::MissingFields(resource.missing_fields_message()));
        }
        Self::from_body(resource, body)
    }

    /// Values in the resource's field order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn into_record(self, resource: &Resource, id: i32) -> Record {
        Record::new(resource, id, self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{POSTS, USERS};

    fn missing(body: &str) -> bool {
        matches!(
            RecordInput::from_body(&POSTS, body.as_bytes()),
            Err(ApiError::MissingFields(_))
        )
    }

    #[test]
    fn accepts_both_fields_in_declared_order() {
        let input =
            RecordInput::from_body(&POSTS, br#"{"contents":"B","title":"A","extra":1}"#).unwrap();
        assert_eq!(input.values(), ["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn rejects_incomplete_or_malformed_bodies() {
        assert!(missing(r#"{"title":"A"}"#));
        assert!(missing(r#"{"contents":"B"}"#));
        assert!(missing(r#"{"title":"","contents":"B"}"#));
        assert!(missing(r#"{"title":1,"contents":"B"}"#));
        assert!(missing(r#"{"title":null,"contents":"B"}"#));
        assert!(missing(r#"["A","B"]"#));
        assert!(missing("title=A&contents=B"));
        assert!(missing(""));
    }

    #[test]
    fn only_json_content_is_read() {
        let body = br#"{"title":"A","contents":"B"}"#;
        assert!(RecordInput::from_request(&POSTS, "application/json", body).is_ok());
        assert!(RecordInput::from_request(&POSTS, "Application/JSON", body).is_ok());
        for content_type in ["text/plain", "application/x-www-form-urlencoded", ""] {
            assert!(matches!(
                RecordInput::from_request(&POSTS, content_type, body),
                Err(ApiError::MissingFields(_))
            ));
        }
    }

    #[test]
    fn missing_fields_message_names_the_resource() {
        let err = RecordInput::from_body(&USERS, br#"{"name":"Ada"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Please provide name and bio for the user.");
    }

    #[test]
    fn record_serializes_flat_with_id_first() {
        let record = RecordInput::from_body(&POSTS, br#"{"title":"A","contents":"B"}"#)
            .unwrap()
            .into_record(&POSTS, 1);

        assert_eq!(record.get("title"), Some("A"));
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"id":1,"title":"A","contents":"B"}"#
        );
    }
}
