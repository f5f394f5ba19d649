//! Server-side sessions.
//!
//! Clients hold an opaque bearer token; the store only ever sees its SHA-256
//! digest. Expiry and revocation are checked on every lookup.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use dashmap::DashMap;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::auth::session::{self, Entity as SessionEntity};
use crate::errors::ServiceError;

const TOKEN_LENGTH: usize = 48;

/// Stored view of a session, independent of the backing store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub id: Uuid,
    pub token_hash: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

impl SessionRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && !self.is_expired(now)
    }
}

impl From<session::Model> for SessionRecord {
    fn from(model: session::Model) -> Self {
        Self {
            id: model.id,
            token_hash: model.token_hash,
            user_id: model.user_id,
            created_at: model.created_at,
            expires_at: model.expires_at,
            revoked: model.revoked,
        }
    }
}

/// Persistence for sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, record: SessionRecord) -> Result<(), ServiceError>;

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<SessionRecord>, ServiceError>;

    /// Marks a session revoked; returns false when no such session exists
    async fn revoke(&self, token_hash: &str) -> Result<bool, ServiceError>;

    /// Deletes sessions that expired at or before `now`
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, ServiceError>;
}

/// Session store for tests and single-instance deployments
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, SessionRecord>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, record: SessionRecord) -> Result<(), ServiceError> {
        self.sessions.insert(record.token_hash.clone(), record);
        Ok(())
    }

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<SessionRecord>, ServiceError> {
        Ok(self.sessions.get(token_hash).map(|entry| entry.clone()))
    }

    async fn revoke(&self, token_hash: &str) -> Result<bool, ServiceError> {
        match self.sessions.get_mut(token_hash) {
            Some(mut entry) => {
                entry.revoked = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, ServiceError> {
        let before = self.sessions.len();
        self.sessions.retain(|_, record| !record.is_expired(now));
        Ok(before.saturating_sub(self.sessions.len()) as u64)
    }
}

/// Session store backed by the `sessions` table
#[derive(Clone)]
pub struct DatabaseSessionStore {
    db: Arc<DatabaseConnection>,
}

impl DatabaseSessionStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionStore for DatabaseSessionStore {
    async fn insert(&self, record: SessionRecord) -> Result<(), ServiceError> {
        session::ActiveModel {
            id: Set(record.id),
            token_hash: Set(record.token_hash),
            user_id: Set(record.user_id),
            created_at: Set(record.created_at),
            expires_at: Set(record.expires_at),
            revoked: Set(record.revoked),
        }
        .insert(&*self.db)
        .await?;
        Ok(())
    }

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<SessionRecord>, ServiceError> {
        let found = SessionEntity::find()
            .filter(session::Column::TokenHash.eq(token_hash))
            .one(&*self.db)
            .await?;
        Ok(found.map(SessionRecord::from))
    }

    async fn revoke(&self, token_hash: &str) -> Result<bool, ServiceError> {
        let result = SessionEntity::update_many()
            .col_expr(
                session::Column::Revoked,
                sea_orm::sea_query::Expr::value(true),
            )
            .filter(session::Column::TokenHash.eq(token_hash))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, ServiceError> {
        let result = SessionEntity::delete_many()
            .filter(session::Column::ExpiresAt.lte(now))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

/// Token returned once, at issue time
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub record: SessionRecord,
}

/// Issues and validates sessions against a [`SessionStore`]
#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn SessionStore>,
    ttl: Duration,
}

impl SessionService {
    pub fn new(store: Arc<dyn SessionStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Hex SHA-256 digest used as the store key
    pub fn hash_token(token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }

    fn generate_token() -> String {
        thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect()
    }

    /// Issues a session for `user_id` starting at `now`
    #[instrument(skip(self))]
    pub async fn issue_at(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<IssuedSession, ServiceError> {
        let ttl = ChronoDuration::from_std(self.ttl)
            .map_err(|_| ServiceError::InternalError("Invalid session TTL".to_string()))?;
        let token = Self::generate_token();
        let record = SessionRecord {
            id: Uuid::new_v4(),
            token_hash: Self::hash_token(&token),
            user_id,
            created_at: now,
            expires_at: now + ttl,
            revoked: false,
        };

        self.store.insert(record.clone()).await?;
        info!(session_id = %record.id, user_id = %user_id, "session issued");

        Ok(IssuedSession { token, record })
    }

    pub async fn issue(&self, user_id: Uuid) -> Result<IssuedSession, ServiceError> {
        self.issue_at(user_id, Utc::now()).await
    }

    /// Resolves a bearer token to a live session at `now`
    pub async fn validate_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionRecord, ServiceError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ServiceError::Unauthorized("Missing session token".into()));
        }

        let record = self
            .store
            .find_by_token_hash(&Self::hash_token(token))
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("Unknown session".into()))?;

        if !record.is_usable(now) {
            let reason = if record.revoked {
                "Session revoked"
            } else {
                "Session expired"
            };
            debug!(session_id = %record.id, reason, "rejected session");
            return Err(ServiceError::Unauthorized(reason.into()));
        }

        Ok(record)
    }

    pub async fn validate(&self, token: &str) -> Result<SessionRecord, ServiceError> {
        self.validate_at(token, Utc::now()).await
    }

    /// Revokes the session behind `token`; unknown tokens are an error
    pub async fn revoke(&self, token: &str) -> Result<(), ServiceError> {
        if self.store.revoke(&Self::hash_token(token.trim())).await? {
            Ok(())
        } else {
            warn!("attempted to revoke an unknown session");
            Err(ServiceError::Unauthorized("Unknown session".into()))
        }
    }

    pub async fn purge_expired(&self) -> Result<u64, ServiceError> {
        self.store.purge_expired(Utc::now()).await
    }
}
