#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request},
    Router,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;
use warehouse_leasing_api::{
    auth::{user, Role},
    build_router,
    config::AppConfig,
    db,
    entities::{warehouse, warehouse_occupant},
    models::FloorType,
    AppState,
};

/// Helper harness for spinning up the full router over an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Same as [`TestApp::new`] but lets the caller adjust configuration first.
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        // A single connection keeps the in-memory database alive and shared.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        adjust(&mut cfg);

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg).expect("valid app state for tests");
        let router = build_router(state.clone());

        Self { router, state }
    }

    pub async fn seed_warehouse(
        &self,
        total_space: f64,
        mezzanine_space: Option<f64>,
        has_mezzanine: bool,
    ) -> Uuid {
        warehouse::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set("Test Warehouse".to_string()),
            location: Set("Dock 7".to_string()),
            total_space: Set(total_space),
            mezzanine_space: Set(mezzanine_space),
            has_mezzanine: Set(has_mezzanine),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed warehouse")
        .id
    }

    pub async fn seed_allocation(
        &self,
        warehouse_id: Uuid,
        floor_type: FloorType,
        space: f64,
        status: &str,
        booking_status: Option<&str>,
    ) -> Uuid {
        self.seed_allocation_with_label(
            warehouse_id,
            &floor_type.to_string(),
            space,
            status,
            booking_status,
        )
        .await
        .id
    }

    /// Inserts an allocation whose `floor_type` is written as `label`.
    pub async fn seed_allocation_with_label(
        &self,
        warehouse_id: Uuid,
        label: &str,
        space: f64,
        status: &str,
        booking_status: Option<&str>,
    ) -> warehouse_occupant::Model {
        warehouse_occupant::ActiveModel {
            id: Set(Uuid::new_v4()),
            warehouse_id: Set(warehouse_id),
            client_name: Set(format!("Client {}", &Uuid::new_v4().to_string()[..8])),
            floor_type: Set(label.to_string()),
            space_occupied: Set(space),
            status: Set(status.to_string()),
            booking_status: Set(booking_status.map(str::to_string)),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed allocation")
    }

    /// Inserts a user whose `role` column holds `role` verbatim.
    pub async fn seed_user_with_role_label(&self, role: &str) -> user::Model {
        let id = Uuid::new_v4();
        user::ActiveModel {
            id: Set(id),
            email: Set(format!("{}@example.com", id)),
            name: Set("Test User".to_string()),
            role: Set(role.to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed user")
    }

    pub async fn seed_user(&self, role: Role) -> user::Model {
        self.seed_user_with_role_label(&role.to_string()).await
    }

    /// Issues a session for a fresh user with `role` and returns its bearer token.
    pub async fn token_for(&self, role: Role) -> String {
        let user = self.seed_user(role).await;
        self.state
            .auth
            .sessions
            .issue(user.id)
            .await
            .expect("issue session")
            .token
    }

    /// Send a request against the router with an optional bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
    ) -> axum::response::Response {
        self.request_with_headers(method, uri, token, &[]).await
    }

    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        headers: &[(&str, &str)],
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let request = builder.body(Body::empty()).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    pub async fn get(&self, uri: &str) -> axum::response::Response {
        self.request(Method::GET, uri, None).await
    }
}

/// Reads a response body as JSON.
pub async fn response_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("response body is json")
}
