//! Display values derived from an industry insight for the dashboard.
//!
//! Labels are matched case-insensitively; anything unrecognised falls back to gray.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::insight::SalaryRange;

pub fn demand_level_color(level: &str) -> &'static str {
    match level.to_lowercase().as_str() {
        "high" => "bg-green-500",
        "medium" => "bg-yellow-500",
        "low" => "bg-red-500",
        _ => "bg-gray-500",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutlookIndicator {
    pub icon: &'static str,
    pub color: &'static str,
}

pub fn market_outlook_info(outlook: &str) -> OutlookIndicator {
    let (icon, color) = match outlook.to_lowercase().as_str() {
        "positive" => ("trending-up", "text-green-500"),
        "neutral" => ("line-chart", "text-yellow-500"),
        "negative" => ("trending-down", "text-red-500"),
        _ => ("line-chart", "text-gray-500"),
    };
    OutlookIndicator { icon, color }
}

/// One bar group in the salary chart, amounts in thousands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryChartPoint {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

pub fn salary_chart(ranges: &[SalaryRange]) -> Vec<SalaryChartPoint> {
    ranges
        .iter()
        .map(|r| SalaryChartPoint {
            name: r.role.clone(),
            min: r.min / 1000.0,
            max: r.max / 1000.0,
            median: r.median / 1000.0,
            location: r.location.clone(),
        })
        .collect()
}

pub fn format_growth_rate(rate: f64) -> String {
    format!("{rate:.1}%")
}

/// `dd/MM/yyyy`
pub fn format_last_updated(at: DateTime<Utc>) -> String {
    at.format("%d/%m/%Y").to_string()
}

/// Human distance from `now`, e.g. "in 7 days" or "about 2 hours ago".
pub fn format_next_update(next: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (next - now).num_seconds();
    let distance = describe_distance(seconds.unsigned_abs());
    if seconds >= 0 {
        format!("in {distance}")
    } else {
        format!("{distance} ago")
    }
}

fn describe_distance(seconds: u64) -> String {
    const HOUR: f64 = 60.0;
    const DAY: f64 = 1440.0;
    const MONTH: f64 = 43200.0;
    const YEAR: f64 = 525600.0;

    let minutes = (seconds as f64 / 60.0).round();
    let plural = |n: f64, unit: &str| {
        let n = n as u64;
        if n == 1 {
            format!("1 {unit}")
        } else {
            format!("{n} {unit}s")
        }
    };

    if minutes < 1.0 {
        "less than a minute".to_string()
    } else if minutes < 45.0 {
        plural(minutes, "minute")
    } else if minutes < 90.0 {
        "about 1 hour".to_string()
    } else if minutes < DAY {
        format!("about {}", plural((minutes / HOUR).round(), "hour"))
    } else if minutes < 2520.0 {
        "1 day".to_string()
    } else if minutes < MONTH {
        plural((minutes / DAY).round(), "day")
    } else if minutes < 2.0 * MONTH {
        "about 1 month".to_string()
    } else if minutes < YEAR {
        plural((minutes / MONTH).round(), "month")
    } else {
        format!("about {}", plural((minutes / YEAR).round(), "year"))
    }
}
