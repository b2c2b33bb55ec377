use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::order::Order;

/// One day's revenue, gap days included at zero.
#[derive(Debug, Clone, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub revenue: f64,
}

/// Rolling performance statistics ending at the report date. Recomputed
/// fresh for every report; never persisted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RollingMetrics {
    /// Mean daily revenue over the trailing 7 days. When fewer points
    /// exist this is a reduced-sample average over the points present.
    pub avg_7d: f64,
    /// Trailing 30-day counterpart of `avg_7d`.
    pub avg_30d: f64,
    /// Consecutive trailing days (most recent first) with revenue at or
    /// above the configured target.
    pub target_streak: u32,
}

/// Build the trailing daily revenue series ending at `end`, covering
/// `days` calendar days in ascending order.
///
/// Days without orders appear as zero-revenue points. Omitting them would
/// inflate rolling averages and let streaks survive dead days.
pub fn build_daily_series(orders: &[Order], end: NaiveDate, days: u32) -> Vec<DailyPoint> {
    let days = days.max(1);
    let start = end - Duration::days(days as i64 - 1);

    let mut by_day: HashMap<NaiveDate, f64> = HashMap::new();
    for order in orders {
        if order.date >= start && order.date <= end {
            *by_day.entry(order.date).or_default() += order.revenue();
        }
    }

    (0..days)
        .map(|offset| {
            let date = start + Duration::days(offset as i64);
            DailyPoint {
                date,
                revenue: by_day.get(&date).copied().unwrap_or(0.0),
            }
        })
        .collect()
}

impl RollingMetrics {
    /// Compute rolling statistics from an ascending daily series ending at
    /// the report date.
    pub fn compute(series: &[DailyPoint], target: f64) -> RollingMetrics {
        RollingMetrics {
            avg_7d: trailing_average(series, 7),
            avg_30d: trailing_average(series, 30),
            target_streak: target_streak(series, target),
        }
    }
}

fn trailing_average(series: &[DailyPoint], window: usize) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    let tail = &series[series.len().saturating_sub(window)..];
    tail.iter().map(|p| p.revenue).sum::<f64>() / tail.len() as f64
}

fn target_streak(series: &[DailyPoint], target: f64) -> u32 {
    series
        .iter()
        .rev()
        .take_while(|p| p.revenue >= target)
        .count() as u32
}
