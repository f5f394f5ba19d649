//! Floor-space availability for a warehouse.
//!
//! All occupancy arithmetic lives in [`compute_availability`]; the service
//! only loads the two tables it reads and hands the rows over.

use crate::{
    db::DbPool,
    entities::{
        warehouse::{self, Entity as WarehouseEntity},
        warehouse_occupant::{self, Entity as OccupantEntity},
    },
    errors::ServiceError,
    models::{FloorType, OccupancyStatus},
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::{debug, error, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

/// Derived occupancy figures for one floor type. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Availability {
    pub total_space: f64,
    pub occupied_space: f64,
    pub available_space: f64,
    pub utilization_percentage: f64,
}

/// Availability response for a single warehouse/floor pair
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FloorAvailability {
    pub warehouse_id: Uuid,
    pub floor_type: FloorType,
    #[serde(flatten)]
    pub availability: Availability,
}

/// Both floors of a warehouse in one response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WarehouseAvailabilitySummary {
    pub warehouse_id: Uuid,
    pub name: String,
    pub location: String,
    pub has_mezzanine: bool,
    pub floors: Vec<FloorAvailability>,
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Capacity of `floor` in `warehouse`. A warehouse without a mezzanine has
/// zero mezzanine capacity whatever `mezzanine_space` says.
pub fn capacity_for(warehouse: &warehouse::Model, floor: FloorType) -> f64 {
    match floor {
        FloorType::GroundFloor => non_negative(warehouse.total_space),
        FloorType::Mezzanine if warehouse.has_mezzanine => {
            non_negative(warehouse.mezzanine_space.unwrap_or(0.0))
        }
        FloorType::Mezzanine => 0.0,
    }
}

/// Sums the active allocations against `capacity`.
///
/// Allocations must already be restricted to one warehouse and floor type.
/// Over-allocation clamps `available_space` to zero rather than failing.
/// `utilization_percentage` is `occupied / total * 100`, left unrounded.
pub fn compute_availability<'a, I>(capacity: f64, allocations: I) -> Availability
where
    I: IntoIterator<Item = &'a warehouse_occupant::Model>,
{
    let total_space = non_negative(capacity);
    let occupied_space: f64 = allocations
        .into_iter()
        .filter(|a| OccupancyStatus::is_active_label(a.effective_status()))
        .map(|a| non_negative(a.space_occupied))
        .fold(0.0, |acc, space| acc + space);

    let available_space = (total_space - occupied_space).max(0.0);
    let utilization_percentage = if total_space > 0.0 {
        occupied_space / total_space * 100.0
    } else {
        0.0
    };

    Availability {
        total_space,
        occupied_space,
        available_space,
        utilization_percentage,
    }
}

/// Read-only service over `warehouses` and `warehouse_occupants`
#[derive(Clone)]
pub struct AvailabilityService {
    db_pool: Arc<DbPool>,
}

impl AvailabilityService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Looks up a warehouse, failing with `NotFound` when it does not exist
    #[instrument(skip(self))]
    pub async fn get_warehouse(&self, warehouse_id: Uuid) -> Result<warehouse::Model, ServiceError> {
        let db = &*self.db_pool;
        WarehouseEntity::find_by_id(warehouse_id)
            .one(db)
            .await
            .map_err(|e| {
                error!("Failed to load warehouse {}: {}", warehouse_id, e);
                ServiceError::DatabaseError(e)
            })?
            .ok_or_else(|| ServiceError::NotFound(format!("Warehouse {} not found", warehouse_id)))
    }

    /// All allocation rows for one floor of a warehouse, whatever their status
    #[instrument(skip(self))]
    pub async fn allocations_for(
        &self,
        warehouse_id: Uuid,
        floor_type: FloorType,
    ) -> Result<Vec<warehouse_occupant::Model>, ServiceError> {
        let db = &*self.db_pool;
        OccupantEntity::find()
            .filter(warehouse_occupant::Column::WarehouseId.eq(warehouse_id))
            .filter(warehouse_occupant::Column::FloorType.eq(floor_type.to_string()))
            .all(db)
            .await
            .map_err(|e| {
                error!(
                    "Failed to load allocations for warehouse {}: {}",
                    warehouse_id, e
                );
                ServiceError::DatabaseError(e)
            })
    }

    /// Active allocations across both floors, oldest first
    #[instrument(skip(self))]
    pub async fn active_occupants(
        &self,
        warehouse_id: Uuid,
    ) -> Result<Vec<warehouse_occupant::Model>, ServiceError> {
        self.get_warehouse(warehouse_id).await?;

        let db = &*self.db_pool;
        let rows = OccupantEntity::find()
            .filter(warehouse_occupant::Column::WarehouseId.eq(warehouse_id))
            .order_by_asc(warehouse_occupant::Column::CreatedAt)
            .all(db)
            .await
            .map_err(|e| {
                error!("Failed to list occupants for {}: {}", warehouse_id, e);
                ServiceError::DatabaseError(e)
            })?;

        Ok(rows
            .into_iter()
            .filter(|row| OccupancyStatus::is_active_label(row.effective_status()))
            .collect())
    }

    /// Computes total/occupied/available space and utilization for one floor
    #[instrument(skip(self))]
    pub async fn compute_availability(
        &self,
        warehouse_id: Uuid,
        floor_type: FloorType,
    ) -> Result<FloorAvailability, ServiceError> {
        let warehouse = self.get_warehouse(warehouse_id).await?;
        self.floor_availability(&warehouse, floor_type).await
    }

    /// Availability of every floor type of a warehouse
    #[instrument(skip(self))]
    pub async fn warehouse_summary(
        &self,
        warehouse_id: Uuid,
    ) -> Result<WarehouseAvailabilitySummary, ServiceError> {
        let warehouse = self.get_warehouse(warehouse_id).await?;

        let mut floors = Vec::new();
        for floor_type in FloorType::iter() {
            floors.push(self.floor_availability(&warehouse, floor_type).await?);
        }

        Ok(WarehouseAvailabilitySummary {
            warehouse_id: warehouse.id,
            name: warehouse.name,
            location: warehouse.location,
            has_mezzanine: warehouse.has_mezzanine,
            floors,
        })
    }

    async fn floor_availability(
        &self,
        warehouse: &warehouse::Model,
        floor_type: FloorType,
    ) -> Result<FloorAvailability, ServiceError> {
        let capacity = capacity_for(warehouse, floor_type);
        let allocations = self.allocations_for(warehouse.id, floor_type).await?;
        let availability = compute_availability(capacity, &allocations);

        debug!(
            warehouse_id = %warehouse.id,
            floor_type = %floor_type,
            total = availability.total_space,
            occupied = availability.occupied_space,
            "computed availability"
        );

        Ok(FloorAvailability {
            warehouse_id: warehouse.id,
            floor_type,
            availability,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn warehouse(total: f64, mezzanine: Option<f64>, has_mezzanine: bool) -> warehouse::Model {
        warehouse::Model {
            id: Uuid::new_v4(),
            name: "North Depot".into(),
            location: "Leeds".into(),
            total_space: total,
            mezzanine_space: mezzanine,
            has_mezzanine,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn allocation(space: f64, status: &str) -> warehouse_occupant::Model {
        warehouse_occupant::Model {
            id: Uuid::new_v4(),
            warehouse_id: Uuid::nil(),
            client_name: "Acme".into(),
            floor_type: FloorType::GroundFloor.to_string(),
            space_occupied: space,
            status: status.into(),
            booking_status: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn single_active_allocation() {
        let rows = vec![allocation(300.0, "active")];
        let result = compute_availability(1000.0, &rows);
        assert_eq!(
            result,
            Availability {
                total_space: 1000.0,
                occupied_space: 300.0,
                available_space: 700.0,
                utilization_percentage: 300.0 / 1000.0 * 100.0,
            }
        );
    }

    #[test]
    fn multiple_active_allocations_are_summed() {
        let rows = vec![allocation(200.0, "active"), allocation(150.0, "active")];
        let result = compute_availability(1000.0, &rows);
        assert_eq!(result.occupied_space, 350.0);
        assert_eq!(result.available_space, 650.0);
        assert_eq!(result.utilization_percentage, 350.0 / 1000.0 * 100.0);
    }

    #[test]
    fn inactive_allocations_are_ignored() {
        let rows = vec![
            allocation(300.0, "active"),
            allocation(400.0, "completed"),
            allocation(250.0, "pending"),
            allocation(50.0, "cancelled"),
        ];
        let result = compute_availability(1000.0, &rows);
        assert_eq!(result.occupied_space, 300.0);
    }

    #[test]
    fn booking_status_overrides_status() {
        let mut finished = allocation(300.0, "active");
        finished.booking_status = Some("completed".into());
        let mut blank = allocation(100.0, "active");
        blank.booking_status = Some("  ".into());

        let result = compute_availability(1000.0, &[finished, blank]);
        assert_eq!(result.occupied_space, 100.0);
    }

    #[test]
    fn over_allocation_clamps_to_zero() {
        let rows = vec![allocation(150.0, "active")];
        let result = compute_availability(100.0, &rows);
        assert_eq!(result.available_space, 0.0);
        assert_eq!(result.occupied_space, 150.0);
        assert_eq!(result.utilization_percentage, 150.0);
    }

    #[test]
    fn zero_capacity_has_zero_utilization() {
        let rows = vec![allocation(10.0, "active")];
        let result = compute_availability(0.0, &rows);
        assert_eq!(result.utilization_percentage, 0.0);
        assert_eq!(result.available_space, 0.0);
    }

    #[test]
    fn utilization_keeps_full_precision() {
        let rows = vec![allocation(1.0, "active")];
        let result = compute_availability(3.0, &rows);
        assert_eq!(result.utilization_percentage, 1.0 / 3.0 * 100.0);

        let rows = vec![allocation(0.0001, "active")];
        let result = compute_availability(7.0, &rows);
        assert_eq!(result.utilization_percentage, 0.0001 / 7.0 * 100.0);
        assert!(result.utilization_percentage > 0.0);
    }

    #[test]
    fn empty_floor_reports_positive_zero() {
        let none: Vec<warehouse_occupant::Model> = Vec::new();
        let result = compute_availability(1000.0, &none);
        assert_eq!(result.occupied_space, 0.0);
        assert!(result.occupied_space.is_sign_positive());
        assert!(result.utilization_percentage.is_sign_positive());
        assert_eq!(result.available_space, 1000.0);

        let inactive = vec![allocation(40.0, "completed")];
        let result = compute_availability(1000.0, &inactive);
        assert!(result.occupied_space.is_sign_positive());
    }

    #[test]
    fn negative_inputs_count_as_zero() {
        let rows = vec![allocation(-40.0, "active")];
        let result = compute_availability(-10.0, &rows);
        assert_eq!(result.total_space, 0.0);
        assert_eq!(result.occupied_space, 0.0);
    }

    #[test]
    fn mezzanine_capacity_requires_flag() {
        let without = warehouse(1000.0, Some(500.0), false);
        assert_eq!(capacity_for(&without, FloorType::Mezzanine), 0.0);

        let with = warehouse(1000.0, Some(500.0), true);
        assert_eq!(capacity_for(&with, FloorType::Mezzanine), 500.0);
        assert_eq!(capacity_for(&with, FloorType::GroundFloor), 1000.0);

        let missing = warehouse(1000.0, None, true);
        assert_eq!(capacity_for(&missing, FloorType::Mezzanine), 0.0);
    }
}
