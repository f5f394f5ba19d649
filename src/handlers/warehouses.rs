use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::common::{parse_uuid, success_response};
use crate::{
    auth::AuthUser, entities::warehouse_occupant, errors::ServiceError, models::FloorType,
    AppState,
};

/// Query parameters for the availability endpoint
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailabilityQuery {
    /// Floor type label, e.g. `Ground Floor` or `mezzanine`
    pub space_type: Option<String>,
}

/// Active allocation as exposed to staff
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OccupantView {
    pub id: Uuid,
    pub client_name: String,
    pub floor_type: String,
    pub space_occupied: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<warehouse_occupant::Model> for OccupantView {
    fn from(model: warehouse_occupant::Model) -> Self {
        let status = model.effective_status().to_string();
        Self {
            id: model.id,
            client_name: model.client_name,
            floor_type: model.floor_type,
            space_occupied: model.space_occupied,
            status,
            created_at: model.created_at,
        }
    }
}

/// Get availability for one floor type of a warehouse
#[utoipa::path(
    get,
    path = "/api/v1/warehouses/{id}/availability",
    params(
        ("id" = String, Path, description = "Warehouse ID"),
        AvailabilityQuery
    ),
    responses(
        (status = 200, description = "Availability computed", body = crate::services::availability::FloorAvailability,
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
        (status = 400, description = "Missing or unknown space type, or malformed id", body = crate::errors::ErrorResponse),
        (status = 404, description = "Warehouse not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "warehouses"
)]
pub async fn get_availability(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let warehouse_id = parse_uuid(&id, "warehouse")?;
    let raw = query
        .space_type
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ServiceError::ValidationError("space_type is required".into()))?;
    let floor_type = FloorType::parse_label(raw)?;

    let availability = state
        .availability
        .compute_availability(warehouse_id, floor_type)
        .await?;

    Ok(success_response(availability))
}

/// Get availability for every floor type of a warehouse
#[utoipa::path(
    get,
    path = "/api/v1/warehouses/{id}/availability/summary",
    params(
        ("id" = String, Path, description = "Warehouse ID")
    ),
    responses(
        (status = 200, description = "Availability per floor", body = crate::services::availability::WarehouseAvailabilitySummary,
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
        (status = 400, description = "Malformed id", body = crate::errors::ErrorResponse),
        (status = 404, description = "Warehouse not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "warehouses"
)]
pub async fn get_availability_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let warehouse_id = parse_uuid(&id, "warehouse")?;
    let summary = state.availability.warehouse_summary(warehouse_id).await?;
    Ok(success_response(summary))
}

/// List the active occupants of a warehouse
#[utoipa::path(
    get,
    path = "/api/v1/warehouses/{id}/occupants",
    params(
        ("id" = String, Path, description = "Warehouse ID")
    ),
    responses(
        (status = 200, description = "Active occupants", body = [OccupantView],
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
        (status = 400, description = "Malformed id", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Warehouse not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "warehouses"
)]
pub async fn list_occupants(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let warehouse_id = parse_uuid(&id, "warehouse")?;
    let occupants: Vec<OccupantView> = state
        .availability
        .active_occupants(warehouse_id)
        .await?
        .into_iter()
        .map(OccupantView::from)
        .collect();

    info!(
        user_id = %user.user_id,
        warehouse_id = %warehouse_id,
        count = occupants.len(),
        "listed occupants"
    );

    Ok(success_response(occupants))
}
