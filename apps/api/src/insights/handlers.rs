use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;

use crate::errors::AppError;
use crate::identity::CurrentIdentity;
use crate::insights::dashboard::{load_dashboard, DashboardView};
use crate::models::insight::IndustryInsight;
use crate::state::AppState;

/// GET /api/v1/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Json<DashboardView>, AppError> {
    let view = load_dashboard(state.store.as_ref(), identity.as_ref(), Utc::now()).await?;
    Ok(Json(view))
}

/// GET /api/v1/industries/:industry/insight
pub async fn handle_get_insight(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(industry): Path<String>,
) -> Result<Json<IndustryInsight>, AppError> {
    if identity.is_none() {
        return Err(AppError::Unauthorized);
    }
    let insight = state
        .store
        .find_insight(&industry)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No insight for industry {industry}")))?;
    Ok(Json(insight))
}
