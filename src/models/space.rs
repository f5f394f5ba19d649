use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

use crate::errors::ServiceError;

/// Leasable space category within a warehouse.
///
/// The canonical label (`Display`) is what `warehouse_occupants.floor_type`
/// stores; parsing also accepts the snake-case form in any letter case.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
    ToSchema,
)]
#[strum(ascii_case_insensitive)]
pub enum FloorType {
    #[strum(to_string = "Ground Floor", serialize = "ground_floor")]
    #[serde(rename = "Ground Floor")]
    GroundFloor,
    #[strum(to_string = "Mezzanine", serialize = "mezzanine")]
    #[serde(rename = "Mezzanine")]
    Mezzanine,
}

impl FloorType {
    /// Parses a request parameter, mapping failure to a validation error.
    pub fn parse_label(raw: &str) -> Result<Self, ServiceError> {
        FloorType::from_str(raw.trim())
            .map_err(|_| ServiceError::ValidationError(format!("Unknown floor type: {}", raw)))
    }
}

/// Lifecycle of an occupant allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize, ToSchema)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum OccupancyStatus {
    Active,
    Pending,
    Completed,
    Cancelled,
}

impl OccupancyStatus {
    /// Unknown stored values never count toward occupancy.
    pub fn is_active_label(raw: &str) -> bool {
        matches!(
            OccupancyStatus::from_str(raw.trim()),
            Ok(OccupancyStatus::Active)
        )
    }
}
