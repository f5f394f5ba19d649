use axum::{response::IntoResponse, routing::get, Json, Router};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Warehouse Leasing API",
        version = "1.0.0",
        description = r#"
# Warehouse Leasing API

Floor-space availability for leased warehouses.

## Authentication

Staff endpoints take a server-side session token:

```
Authorization: Bearer <session-token>
```

The caller's role is looked up on every request. Occupant listings need
`manager` or higher.

## Error Handling

Errors share one shape:

```json
{
  "error": "Bad Request",
  "message": "Unknown floor type: Roof",
  "request_id": "7d1f...",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "warehouses", description = "Availability and occupancy endpoints"),
        (name = "auth", description = "Session endpoints")
    ),
    paths(
        crate::handlers::warehouses::get_availability,
        crate::handlers::warehouses::get_availability_summary,
        crate::handlers::warehouses::list_occupants,
        crate::handlers::auth::current_session,
        crate::handlers::auth::revoke_session,
    ),
    components(
        schemas(
            crate::models::FloorType,
            crate::models::OccupancyStatus,
            crate::auth::Role,
            crate::services::availability::Availability,
            crate::services::availability::FloorAvailability,
            crate::services::availability::WarehouseAvailabilitySummary,
            crate::handlers::warehouses::OccupantView,
            crate::handlers::auth::SessionInfo,
            crate::errors::ErrorResponse
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDocV1;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDocV1::openapi())
}

/// Serves the generated document at `/api-docs/openapi.json`
pub fn openapi_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/api-docs/openapi.json", get(openapi_json))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_availability_paths() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Warehouse Leasing API"));
        assert!(json.contains("/api/v1/warehouses/{id}/availability"));
        assert!(json.contains("/auth/session"));
        assert!(json.contains("bearer_auth"));
    }
}
