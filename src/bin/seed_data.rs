//! Seed data script - populates the database with a demo warehouse
//!
//! Run with: cargo run --bin seed-data
//!
//! This creates:
//! - 1 warehouse with a mezzanine
//! - 5 occupant allocations across both floors (active, pending, completed)
//! - 1 admin user with a fresh session token

use chrono::Utc;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::{info, warn};
use uuid::Uuid;

use warehouse_leasing_api::{
    auth::{user, Role},
    config, db,
    entities::{warehouse, warehouse_occupant},
    models::{FloorType, OccupancyStatus},
    AppState,
};

const ADMIN_EMAIL: &str = "admin@warehouse-leasing.local";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::load_config()?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    info!("=== Warehouse Leasing Seed Data ===");

    let pool = db::establish_connection_from_app_config(&cfg).await?;
    db::run_migrations(&pool).await?;
    let pool = Arc::new(pool);
    info!("Connected and migrated");

    let state = AppState::new(pool.clone(), cfg.clone())?;

    let depot = create_warehouse(&pool).await?;
    info!(warehouse_id = %depot.id, "Created warehouse {}", depot.name);

    let allocations = create_allocations(&pool, depot.id).await?;
    info!("Created {} allocations", allocations);

    let admin = ensure_admin(&pool).await?;
    let issued = state.auth.sessions.issue(admin.id).await?;
    info!(
        user_id = %admin.id,
        expires_at = %issued.record.expires_at,
        "Issued admin session"
    );

    for floor_type in FloorType::iter() {
        let floor = state
            .availability
            .compute_availability(depot.id, floor_type)
            .await?;
        info!(
            floor_type = %floor_type,
            total = floor.availability.total_space,
            occupied = floor.availability.occupied_space,
            available = floor.availability.available_space,
            utilization = floor.availability.utilization_percentage,
            "Availability"
        );
    }

    let ground_rate = dec!(12.50);
    info!(
        ground_rate = %ground_rate,
        mezzanine_rate = %state.pricing.mezzanine_rate(ground_rate),
        "Reference pricing per square foot"
    );

    info!("=== Seed Data Complete ===");
    println!("Admin session token: {}", issued.token);
    println!(
        "Try: curl -H 'Authorization: Bearer {}' http://localhost:{}/api/v1/warehouses/{}/occupants",
        issued.token, cfg.port, depot.id
    );
    println!(
        "     curl 'http://localhost:{}/api/v1/warehouses/{}/availability?space_type=Mezzanine'",
        cfg.port, depot.id
    );

    Ok(())
}

async fn create_warehouse(db: &DatabaseConnection) -> anyhow::Result<warehouse::Model> {
    let model = warehouse::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Riverside Distribution Centre".to_string()),
        location: Set("Unit 4, Riverside Industrial Estate".to_string()),
        total_space: Set(25_000.0),
        mezzanine_space: Set(Some(6_000.0)),
        has_mezzanine: Set(true),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
    }
    .insert(db)
    .await?;
    Ok(model)
}

async fn create_allocations(db: &DatabaseConnection, warehouse_id: Uuid) -> anyhow::Result<usize> {
    let rows = [
        ("Northwind Traders", FloorType::GroundFloor, 8_000.0, OccupancyStatus::Active),
        ("Contoso Logistics", FloorType::GroundFloor, 4_500.0, OccupancyStatus::Active),
        ("Fabrikam Retail", FloorType::GroundFloor, 3_000.0, OccupancyStatus::Completed),
        ("Tailspin Toys", FloorType::Mezzanine, 2_500.0, OccupancyStatus::Active),
        ("Wingtip Supplies", FloorType::Mezzanine, 1_200.0, OccupancyStatus::Pending),
    ];

    for (client, floor_type, space, status) in rows.iter() {
        warehouse_occupant::ActiveModel {
            id: Set(Uuid::new_v4()),
            warehouse_id: Set(warehouse_id),
            client_name: Set(client.to_string()),
            floor_type: Set(floor_type.to_string()),
            space_occupied: Set(*space),
            status: Set(status.to_string()),
            booking_status: Set(None),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(db)
        .await?;
    }

    Ok(rows.len())
}

async fn ensure_admin(db: &DatabaseConnection) -> anyhow::Result<user::Model> {
    if let Some(existing) = user::Entity::find()
        .filter(user::Column::Email.eq(ADMIN_EMAIL))
        .one(db)
        .await?
    {
        if existing.role != Role::Admin.to_string() {
            warn!(role = %existing.role, "Existing seed user is not an admin");
        }
        return Ok(existing);
    }

    let admin = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(ADMIN_EMAIL.to_string()),
        name: Set("Seed Administrator".to_string()),
        role: Set(Role::Admin.to_string()),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;
    info!(user_id = %admin.id, "Created admin user {}", ADMIN_EMAIL);
    Ok(admin)
}
