//! Warehouse Leasing API Library
//!
//! Floor-space availability for leased warehouses, served over HTTP with
//! server-side sessions and role-gated staff endpoints.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod migrator;
pub mod models;
pub mod openapi;
pub mod services;
pub mod tracing;

use axum::{routing::get, Router};
use http::HeaderValue;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::auth::{AuthRouterExt, AuthService, Role, SessionService};
use crate::services::{availability::AvailabilityService, pricing::PricingPolicy};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub availability: AvailabilityService,
    pub auth: Arc<AuthService>,
    pub pricing: PricingPolicy,
}

impl AppState {
    /// Wires services over an open connection using `config`
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: config::AppConfig,
    ) -> Result<Self, errors::ServiceError> {
        let store = auth::build_session_store(&config, db.clone());
        let sessions = SessionService::new(store, config.session_ttl());
        let pricing = PricingPolicy::from_rate(config.mezzanine_discount_rate)?;

        Ok(Self {
            availability: AvailabilityService::new(db.clone()),
            auth: Arc::new(AuthService::new(sessions, db.clone())),
            pricing,
            db,
            config,
        })
    }
}

pub fn api_v1_routes() -> Router<AppState> {
    // Availability is public
    let availability = Router::new()
        .route(
            "/warehouses/:id/availability",
            get(handlers::warehouses::get_availability),
        )
        .route(
            "/warehouses/:id/availability/summary",
            get(handlers::warehouses::get_availability_summary),
        );

    // Occupant listings are staff-only
    let occupants = Router::new()
        .route(
            "/warehouses/:id/occupants",
            get(handlers::warehouses::list_occupants),
        )
        .with_role(Role::Manager);

    Router::new().merge(availability).merge(occupants)
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/session",
            get(handlers::auth::current_session).delete(handlers::auth::revoke_session),
        )
        .with_auth()
}

fn cors_layer(cfg: &config::AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .cors_origins()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if !origins.is_empty() {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    } else if cfg.is_development() {
        ::tracing::info!("Using permissive CORS in development");
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    }
}

/// Full application router with the shared middleware stack
pub fn build_router(state: AppState) -> Router {
    let auth_service = state.auth.clone();
    let cors = cors_layer(&state.config);

    Router::<AppState>::new()
        .route("/", get(|| async { "warehouse-leasing-api up" }))
        .nest("/health", health::health_routes())
        .nest("/api/v1", api_v1_routes())
        .nest("/auth", auth_routes())
        .merge(openapi::openapi_routes())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(tracing::configure_http_tracing())
        .layer(cors)
        // Inject AuthService into request extensions for auth middleware
        .layer(axum::middleware::from_fn_with_state(
            auth_service,
            |axum::extract::State(auth): axum::extract::State<Arc<AuthService>>,
             mut req: axum::extract::Request,
             next: axum::middleware::Next| async move {
                req.extensions_mut().insert(auth);
                next.run(req).await
            },
        ))
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
        .with_state(state)
}

pub mod prelude {
    pub use crate::auth::{AuthUser, Role};
    pub use crate::db::*;
    pub use crate::errors::*;
    pub use crate::models::{FloorType, OccupancyStatus};
    pub use crate::services::availability::{
        capacity_for, compute_availability, Availability, AvailabilityService,
    };
    pub use crate::services::pricing::PricingPolicy;
    pub use crate::{build_router, AppState};
}
