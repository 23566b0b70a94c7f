use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `users` table.
///
/// `industry` stays `NULL` until onboarding completes and is the only
/// onboarding-completion signal.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub external_id: String,
    pub email: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub experience: Option<i32>,
    pub skills: Vec<String>,
    pub industry: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_onboarded(&self) -> bool {
        self.industry.is_some()
    }
}

/// Identity-provider fields refreshed on every sync.
#[derive(Debug, Clone)]
pub struct UserIdentity {
    pub email: String,
    pub name: Option<String>,
}

/// Profile fields written by onboarding. Replaces the stored values wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub bio: Option<String>,
    pub experience: i32,
    pub skills: Vec<String>,
    pub industry: String,
}
