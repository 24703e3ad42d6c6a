//! Submitter identity lookup (uid → DID)

use async_trait::async_trait;
use dashmap::DashMap;
use sqlx::SqlitePool;
use thiserror::Error;

use super::SubmitterIdentity;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("no ledger identity for account {0}")]
    NotFound(String),

    #[error("identity lookup failed: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, uid: &str) -> Result<SubmitterIdentity, IdentityError>;
}

/// Reads the `account` table
#[derive(Clone)]
pub struct SqliteIdentityResolver {
    pool: SqlitePool,
}

impl SqliteIdentityResolver {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register or replace the DID of an account
    pub async fn register(&self, uid: &str, did: &str) -> Result<(), IdentityError> {
        sqlx::query(
            r#"
            INSERT INTO account (uid, did, created_at) VALUES (?, ?, ?)
            ON CONFLICT (uid) DO UPDATE SET did = excluded.did
            "#,
        )
        .bind(uid)
        .bind(did)
        .bind(shared::util::now_millis())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl IdentityResolver for SqliteIdentityResolver {
    async fn resolve(&self, uid: &str) -> Result<SubmitterIdentity, IdentityError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT did FROM account WHERE uid = ?")
            .bind(uid)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some((did,)) if !did.is_empty() => Ok(SubmitterIdentity { did }),
            _ => Err(IdentityError::NotFound(uid.to_string())),
        }
    }
}

/// Fixed uid → DID table
#[derive(Clone, Default)]
pub struct StaticIdentityResolver {
    identities: std::sync::Arc<DashMap<String, String>>,
}

impl StaticIdentityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, uid: impl Into<String>, did: impl Into<String>) -> Self {
        self.identities.insert(uid.into(), did.into());
        self
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentityResolver {
    async fn resolve(&self, uid: &str) -> Result<SubmitterIdentity, IdentityError> {
        self.identities
            .get(uid)
            .map(|did| SubmitterIdentity { did: did.clone() })
            .ok_or_else(|| IdentityError::NotFound(uid.to_string()))
    }
}
