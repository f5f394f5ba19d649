use axum::{extract::State, response::IntoResponse, Extension};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    auth::{AuthUser, Role},
    errors::ServiceError,
    handlers::common::{no_content_response, success_response},
    AppState,
};

/// The caller's session as seen by the server
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionInfo {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub session_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

impl From<&AuthUser> for SessionInfo {
    fn from(user: &AuthUser) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            session_id: user.session_id,
            expires_at: user.expires_at,
        }
    }
}

/// Describe the current session
#[utoipa::path(
    get,
    path = "/auth/session",
    responses(
        (status = 200, description = "Current session", body = SessionInfo,
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
        (status = 401, description = "Missing, unknown, expired or revoked session", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn current_session(
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(SessionInfo::from(&user)))
}

/// Revoke the current session
#[utoipa::path(
    delete,
    path = "/auth/session",
    responses(
        (status = 204, description = "Session revoked"),
        (status = 401, description = "Missing, unknown, expired or revoked session", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn revoke_session(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ServiceError> {
    state.auth.sessions.revoke(&user.token).await?;
    info!(user_id = %user.user_id, session_id = %user.session_id, "session revoked");
    Ok(no_content_response())
}
