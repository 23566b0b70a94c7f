use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "demand_level")]
pub enum DemandLevel {
    Low,
    Medium,
    High,
}

impl DemandLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemandLevel::Low => "Low",
            DemandLevel::Medium => "Medium",
            DemandLevel::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "market_outlook")]
pub enum MarketOutlook {
    Positive,
    Neutral,
    Negative,
}

impl MarketOutlook {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketOutlook::Positive => "Positive",
            MarketOutlook::Neutral => "Neutral",
            MarketOutlook::Negative => "Negative",
        }
    }
}

/// One salary band inside an insight. Amounts are annual, in whole currency units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalaryRange {
    pub role: String,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// A row from the `industry_insights` table. One row per distinct `industry`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IndustryInsight {
    pub id: Uuid,
    pub industry: String,
    pub salary_ranges: Json<Vec<SalaryRange>>,
    pub growth_rate: f64,
    pub demand_level: DemandLevel,
    pub top_skills: Vec<String>,
    pub market_outlook: MarketOutlook,
    pub key_trends: Vec<String>,
    pub recommended_skills: Vec<String>,
    pub last_updated: DateTime<Utc>,
    pub next_update: DateTime<Utc>,
}

/// Column values for a new insight row; `id` and `last_updated` are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIndustryInsight {
    pub industry: String,
    pub salary_ranges: Vec<SalaryRange>,
    pub growth_rate: f64,
    pub demand_level: DemandLevel,
    pub top_skills: Vec<String>,
    pub market_outlook: MarketOutlook,
    pub key_trends: Vec<String>,
    pub recommended_skills: Vec<String>,
    pub next_update: DateTime<Utc>,
}

impl NewIndustryInsight {
    /// Placeholder values for an industry nobody has onboarded into yet.
    /// Real figures are filled in later by the enrichment job.
    pub fn placeholder(industry: &str, now: DateTime<Utc>, refresh_interval: Duration) -> Self {
        Self {
            industry: industry.to_string(),
            salary_ranges: Vec::new(),
            growth_rate: 0.0,
            demand_level: DemandLevel::Medium,
            top_skills: Vec::new(),
            market_outlook: MarketOutlook::Neutral,
            key_trends: Vec::new(),
            recommended_skills: Vec::new(),
            next_update: now + refresh_interval,
        }
    }
}
