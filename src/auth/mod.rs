/*!
 * # Authentication and Authorization Module
 *
 * Requests authenticate with `Authorization: Bearer <session token>`. The
 * token is resolved against the server-side session store, and the caller's
 * role is loaded from the `users` table on every request; nothing the client
 * holds besides the opaque token is trusted.
 */

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, EntityTrait};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::errors::ServiceError;

// Entity modules
pub mod session;
pub mod user;

mod roles;
mod sessions;

pub use roles::Role;
pub use sessions::{
    DatabaseSessionStore, InMemorySessionStore, IssuedSession, SessionRecord, SessionService,
    SessionStore,
};

/// Authenticated caller, resolved server-side for each request
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub session_id: Uuid,
    pub expires_at: DateTime<Utc>,
    /// Raw bearer token, kept so the session can be revoked
    pub token: String,
}

impl AuthUser {
    pub fn has_role_at_least(&self, required: Role) -> bool {
        self.role.satisfies(required)
    }
}

/// Authentication service: session validation plus user/role lookup
#[derive(Clone)]
pub struct AuthService {
    pub sessions: SessionService,
    pub db: Arc<DatabaseConnection>,
}

impl AuthService {
    pub fn new(sessions: SessionService, db: Arc<DatabaseConnection>) -> Self {
        Self { sessions, db }
    }

    /// Resolves a bearer token to the user behind it
    pub async fn authenticate(&self, token: &str) -> Result<AuthUser, ServiceError> {
        let session = self.sessions.validate(token).await?;

        let account = user::Entity::find_by_id(session.user_id)
            .one(&*self.db)
            .await
            .map_err(|e| {
                error!("Failed to load user {}: {}", session.user_id, e);
                ServiceError::DatabaseError(e)
            })?
            .ok_or_else(|| ServiceError::Unauthorized("Session user no longer exists".into()))?;

        let role = Role::from_str(&account.role).map_err(|_| {
            warn!(user_id = %account.id, role = %account.role, "user has unrecognized role");
            ServiceError::Unauthorized("Unrecognized role".into())
        })?;

        Ok(AuthUser {
            user_id: account.id,
            email: account.email,
            name: account.name,
            role,
            session_id: session.id,
            expires_at: session.expires_at,
            token: token.trim().to_string(),
        })
    }
}

/// Picks the session store named by `session_backend`
pub fn build_session_store(cfg: &AppConfig, db: Arc<DatabaseConnection>) -> Arc<dyn SessionStore> {
    match cfg.session_backend.to_ascii_lowercase().as_str() {
        "in-memory" => Arc::new(InMemorySessionStore::new()),
        _ => Arc::new(DatabaseSessionStore::new(db)),
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Authentication middleware that resolves the bearer token to an [`AuthUser`]
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let auth_service = match request.extensions().get::<Arc<AuthService>>() {
        Some(service) => service.clone(),
        None => {
            return ServiceError::InternalError("Authentication service not available".into())
                .into_response();
        }
    };

    let token = match bearer_token(request.headers()) {
        Some(token) => token.to_string(),
        None => {
            return ServiceError::Unauthorized("Missing bearer token".into()).into_response();
        }
    };

    match auth_service.authenticate(&token).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Role middleware; must run after [`auth_middleware`]
pub async fn role_middleware(
    State(required_role): State<Role>,
    request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ServiceError::Unauthorized("Missing authentication".into()))?;

    if !user.has_role_at_least(required_role) {
        return Err(ServiceError::Forbidden(format!(
            "Requires role {} or higher",
            required_role
        )));
    }

    Ok(next.run(request).await)
}

pub trait AuthRouterExt {
    fn with_auth(self) -> Self;
    fn with_role(self, role: Role) -> Self;
}

impl<S> AuthRouterExt for axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_auth(self) -> Self {
        self.layer(axum::middleware::from_fn(auth_middleware))
    }

    fn with_role(self, role: Role) -> Self {
        self.layer(axum::middleware::from_fn_with_state(role, role_middleware))
            .with_auth()
    }
}
