use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::identity::CurrentIdentity;
use crate::models::insight::IndustryInsight;
use crate::models::user::{ProfileUpdate, User};
use crate::onboarding::service::OnboardingStatus;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OnboardingRequest {
    #[serde(default)]
    pub bio: Option<String>,
    pub experience: u32,
    #[serde(default)]
    pub skills: Vec<String>,
    pub industry: String,
}

impl OnboardingRequest {
    /// Normalizes the submitted form into the profile written by onboarding.
    /// Skills are trimmed and de-duplicated, keeping first-seen order.
    pub fn into_profile(self) -> Result<ProfileUpdate, AppError> {
        let industry = self.industry.trim().to_string();
        if industry.is_empty() {
            return Err(AppError::Validation("industry is required".to_string()));
        }
        let experience = i32::try_from(self.experience)
            .map_err(|_| AppError::Validation("experience is out of range".to_string()))?;
        let bio = self
            .bio
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty());

        let mut skills: Vec<String> = Vec::with_capacity(self.skills.len());
        for skill in self.skills {
            let skill = skill.trim();
            if !skill.is_empty() && !skills.iter().any(|s| s == skill) {
                skills.push(skill.to_string());
            }
        }

        Ok(ProfileUpdate {
            bio,
            experience,
            skills,
            industry,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct OnboardingResponse {
    pub user: User,
    pub industry_insight: IndustryInsight,
}

/// POST /api/v1/onboarding
pub async fn handle_complete_onboarding(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    payload: Result<Json<OnboardingRequest>, JsonRejection>,
) -> Result<Json<OnboardingResponse>, AppError> {
    let Json(req) = payload?;
    let profile = req.into_profile()?;
    let outcome = state
        .onboarding
        .complete_onboarding(identity.as_ref(), profile)
        .await?;
    Ok(Json(OnboardingResponse {
        user: outcome.user,
        industry_insight: outcome.industry_insight,
    }))
}

/// GET /api/v1/onboarding/status
pub async fn handle_onboarding_status(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Json<OnboardingStatus>, AppError> {
    let status = state.onboarding.onboarding_status(identity.as_ref()).await?;
    Ok(Json(status))
}
