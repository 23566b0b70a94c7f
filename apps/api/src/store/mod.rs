//! Persistence ports for users and industry insights.
//!
//! `CareerStore` covers the plain reads and the identity sync. Onboarding
//! writes go through an `OnboardingUnit`, a transactional handle over both
//! tables that either commits every write or none of them.

#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::insight::{IndustryInsight, NewIndustryInsight};
use crate::models::user::{ProfileUpdate, User, UserIdentity};

pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("row not found: {0}")]
    RowNotFound(String),

    #[error("email already belongs to another user: {0}")]
    EmailTaken(String),

    #[cfg(test)]
    #[error("injected failure: {0}")]
    Injected(String),
}

#[async_trait]
pub trait CareerStore: Send + Sync {
    async fn find_user_by_external_id(&self, external_id: &str)
        -> Result<Option<User>, StoreError>;

    /// Creates the user on first sight of `external_id`; afterwards refreshes
    /// only the identity fields and leaves the profile untouched.
    async fn upsert_user_identity(
        &self,
        external_id: &str,
        identity: &UserIdentity,
    ) -> Result<User, StoreError>;

    async fn find_insight(&self, industry: &str) -> Result<Option<IndustryInsight>, StoreError>;

    /// Opens a unit of work. The unit rolls back if dropped before `commit`.
    async fn begin(&self) -> Result<Box<dyn OnboardingUnit>, StoreError>;
}

/// Transactional access to both entities for the duration of one onboarding.
#[async_trait]
pub trait OnboardingUnit: Send {
    async fn find_insight(&mut self, industry: &str)
        -> Result<Option<IndustryInsight>, StoreError>;

    /// Inserts the insight unless a row with the same `industry` already
    /// exists, in which case `None` is returned and nothing is written.
    async fn create_insight(
        &mut self,
        insight: &NewIndustryInsight,
    ) -> Result<Option<IndustryInsight>, StoreError>;

    async fn update_user_profile(
        &mut self,
        user_id: Uuid,
        profile: &ProfileUpdate,
    ) -> Result<User, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
