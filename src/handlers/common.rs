use crate::errors::ServiceError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Standard no content response
pub fn no_content_response() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Parses a path identifier, reporting a malformed id as a validation error
pub fn parse_uuid(raw: &str, what: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ServiceError::ValidationError(format!("Invalid {} id: {}", what, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_uuid_rejects_garbage() {
        let id = Uuid::new_v4();
        assert_eq!(parse_uuid(&id.to_string(), "warehouse").unwrap(), id);
        assert!(matches!(
            parse_uuid("wh-1", "warehouse"),
            Err(ServiceError::ValidationError(msg)) if msg.contains("warehouse")
        ));
    }

    #[test]
    fn no_content_has_empty_status() {
        assert_eq!(no_content_response().status(), StatusCode::NO_CONTENT);
    }
}
