use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::AppError;
use crate::identity::IdentityId;
use crate::insights::presentation::{
    demand_level_color, format_growth_rate, format_last_updated, format_next_update,
    market_outlook_info, salary_chart, OutlookIndicator, SalaryChartPoint,
};
use crate::models::insight::IndustryInsight;
use crate::store::CareerStore;

/// An insight plus everything the dashboard derives from it.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub insight: IndustryInsight,
    pub demand_level_color: &'static str,
    pub market_outlook: OutlookIndicator,
    pub growth_rate_display: String,
    pub salary_chart: Vec<SalaryChartPoint>,
    pub last_updated_display: String,
    pub next_update_display: String,
}

impl DashboardView {
    pub fn build(insight: IndustryInsight, now: DateTime<Utc>) -> Self {
        Self {
            demand_level_color: demand_level_color(insight.demand_level.as_str()),
            market_outlook: market_outlook_info(insight.market_outlook.as_str()),
            growth_rate_display: format_growth_rate(insight.growth_rate),
            salary_chart: salary_chart(&insight.salary_ranges),
            last_updated_display: format_last_updated(insight.last_updated),
            next_update_display: format_next_update(insight.next_update, now),
            insight,
        }
    }
}

/// Loads the dashboard for the caller's industry.
pub async fn load_dashboard(
    store: &dyn CareerStore,
    identity: Option<&IdentityId>,
    now: DateTime<Utc>,
) -> Result<DashboardView, AppError> {
    let identity = identity.ok_or(AppError::Unauthorized)?;
    let user = store
        .find_user_by_external_id(identity.as_str())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    let industry = user.industry.ok_or(AppError::NotOnboarded)?;
    let insight = store
        .find_insight(&industry)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No insight for industry {industry}")))?;
    Ok(DashboardView::build(insight, now))
}
