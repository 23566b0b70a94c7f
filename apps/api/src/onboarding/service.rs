//! Onboarding core: the profile-plus-industry unit of work and the status query.
//!
//! `complete_onboarding` runs inside one store unit of work:
//! 1. look up the industry insight by exact name
//! 2. create it with placeholder values if absent (a lost creation race
//!    re-reads the winner's row)
//! 3. overwrite the user's bio, experience, skills and industry
//! 4. commit
//!
//! The whole unit, including acquiring it, is bounded by
//! `OnboardingConfig::transaction_timeout`. On timeout the unit is dropped
//! and rolls back.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::identity::IdentityId;
use crate::invalidation::Invalidator;
use crate::models::insight::{IndustryInsight, NewIndustryInsight};
use crate::models::user::{ProfileUpdate, User};
use crate::onboarding::error::{OnboardingError, Operation};
use crate::store::{CareerStore, StoreError};

#[derive(Debug, Clone)]
pub struct OnboardingConfig {
    pub transaction_timeout: Duration,
    pub insight_refresh_interval: chrono::Duration,
    /// Rendering surface told to refetch after a successful onboarding.
    pub invalidate_path: String,
    pub invalidation_timeout: Duration,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            transaction_timeout: Duration::from_secs(10),
            insight_refresh_interval: chrono::Duration::days(7),
            invalidate_path: "/".to_string(),
            invalidation_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OnboardingOutcome {
    pub user: User,
    pub industry_insight: IndustryInsight,
    /// True when this call created the insight row.
    pub insight_created: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OnboardingStatus {
    pub is_onboarded: bool,
}

#[derive(Clone)]
pub struct OnboardingService {
    store: Arc<dyn CareerStore>,
    invalidator: Arc<dyn Invalidator>,
    config: OnboardingConfig,
}

impl OnboardingService {
    pub fn new(
        store: Arc<dyn CareerStore>,
        invalidator: Arc<dyn Invalidator>,
        config: OnboardingConfig,
    ) -> Self {
        Self {
            store,
            invalidator,
            config,
        }
    }

    pub async fn complete_onboarding(
        &self,
        identity: Option<&IdentityId>,
        profile: ProfileUpdate,
    ) -> Result<OnboardingOutcome, OnboardingError> {
        let op = Operation::CompleteOnboarding;
        let user = self.resolve_user(identity, op).await?;

        let timeout = self.config.transaction_timeout;
        let outcome =
            match tokio::time::timeout(timeout, self.run_unit(user.id, &profile)).await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(e)) => {
                    error!(
                        user_id = %user.id,
                        industry = %profile.industry,
                        "Error while updating the user and industry: {e}"
                    );
                    return Err(OnboardingError::OnboardingFailed(op));
                }
                Err(_) => {
                    error!(
                        user_id = %user.id,
                        industry = %profile.industry,
                        "Onboarding transaction exceeded {timeout:?}, rolled back"
                    );
                    return Err(OnboardingError::OnboardingFailed(op));
                }
            };

        info!(
            user_id = %user.id,
            industry = %outcome.industry_insight.industry,
            insight_created = outcome.insight_created,
            "User onboarded"
        );

        self.spawn_invalidation();

        Ok(outcome)
    }

    pub async fn onboarding_status(
        &self,
        identity: Option<&IdentityId>,
    ) -> Result<OnboardingStatus, OnboardingError> {
        let user = self
            .resolve_user(identity, Operation::OnboardingStatus)
            .await?;
        Ok(OnboardingStatus {
            is_onboarded: user.is_onboarded(),
        })
    }

    /// Notifies the presentation layer in the background. The onboarding has
    /// already committed, so a slow or failing notifier never reaches the caller.
    fn spawn_invalidation(&self) {
        let invalidator = self.invalidator.clone();
        let path = self.config.invalidate_path.clone();
        let limit = self.config.invalidation_timeout;
        tokio::spawn(async move {
            match tokio::time::timeout(limit, invalidator.invalidate(&path)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Failed to invalidate {path} after onboarding: {e}"),
                Err(_) => warn!("Invalidation of {path} gave up after {limit:?}"),
            }
        });
    }

    async fn resolve_user(
        &self,
        identity: Option<&IdentityId>,
        op: Operation,
    ) -> Result<User, OnboardingError> {
        let identity = identity.ok_or(OnboardingError::NotAuthenticated)?;
        match self.store.find_user_by_external_id(identity.as_str()).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => {
                warn!(%identity, "Authenticated identity has no user row");
                Err(OnboardingError::UserNotFound)
            }
            Err(e) => {
                error!(%identity, "User lookup failed: {e}");
                Err(OnboardingError::OnboardingFailed(op))
            }
        }
    }

    async fn run_unit(
        &self,
        user_id: Uuid,
        profile: &ProfileUpdate,
    ) -> Result<OnboardingOutcome, StoreError> {
        let mut unit = self.store.begin().await?;

        let (industry_insight, insight_created) = match unit.find_insight(&profile.industry).await? {
            Some(existing) => (existing, false),
            None => {
                let placeholder = NewIndustryInsight::placeholder(
                    &profile.industry,
                    Utc::now(),
                    self.config.insight_refresh_interval,
                );
                match unit.create_insight(&placeholder).await? {
                    Some(created) => (created, true),
                    None => {
                        // Another onboarding created it first and has committed.
                        let existing = unit.find_insight(&profile.industry).await?.ok_or_else(|| {
                            StoreError::RowNotFound(format!("industry insight {}", profile.industry))
                        })?;
                        (existing, false)
                    }
                }
            }
        };

        let user = unit.update_user_profile(user_id, profile).await?;
        unit.commit().await?;

        Ok(OnboardingOutcome {
            user,
            industry_insight,
            insight_created,
        })
    }
}
