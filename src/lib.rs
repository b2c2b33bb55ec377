pub mod config;
pub mod date_util;
pub mod error;
pub mod insight;
pub mod order;
pub mod report;
pub mod schedule;
pub mod sink;
pub mod source;

pub use config::Config;
pub use error::{Error, Result};
pub use insight::{build_insight_prompt, InsightService, MixtapeInsight};
pub use order::{normalize_rows, NormalizeOutcome, Order};
pub use report::{
    build_daily_series, render_report, DailyPoint, ReportPeriod, RollingMetrics, SalesSummary,
};
pub use schedule::{JobSpec, Scheduler};
pub use sink::MessageSink;
pub use source::{RawRow, RowSource};

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::time::timeout;

/// Budget for the row-source call. A hung fetch surfaces as a delivery
/// failure instead of stalling the invocation forever.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Budget for the advisory insight call; on expiry the report ships
/// without the insight section.
const INSIGHT_TIMEOUT: Duration = Duration::from_secs(30);

const SEND_TIMEOUT: Duration = Duration::from_secs(15);

/// Trailing window the daily series covers; sized to the widest rolling
/// average.
const SERIES_WINDOW_DAYS: u32 = 30;

/// Main entry point: orchestrates one report invocation end to end.
///
/// Every invocation builds its own summary and metrics from scratch, so
/// concurrent scheduled firings and interactive commands share no mutable
/// state and need no locking.
pub struct SalesBot {
    config: Config,
    rows: Arc<dyn RowSource>,
    sink: Arc<dyn MessageSink>,
    insight: Option<Arc<dyn InsightService>>,
}

impl SalesBot {
    pub fn new(config: Config, rows: Arc<dyn RowSource>, sink: Arc<dyn MessageSink>) -> Self {
        Self {
            config,
            rows,
            sink,
            insight: None,
        }
    }

    /// Attach an insight service. Reports work without one; with one, its
    /// failures downgrade to a report without the insight section.
    pub fn with_insight(mut self, insight: Arc<dyn InsightService>) -> Self {
        self.insight = Some(insight);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generate the formatted report text for a date predicate.
    ///
    /// Pipeline: fetch rows → normalize → aggregate → rolling metrics →
    /// optional insight → format. Only the fetch step can fail.
    pub async fn generate_report(&self, period: &ReportPeriod) -> Result<String> {
        let rows = timeout(FETCH_TIMEOUT, self.rows.fetch_rows(&self.config.order_sheet))
            .await
            .map_err(|_| Error::DataFetch("row-source timed out".into()))??;

        let NormalizeOutcome { orders, discarded } = normalize_rows(&rows);
        if discarded > 0 {
            log::warn!("Discarded {discarded} malformed row(s) out of {}", rows.len());
        }

        let summary = SalesSummary::aggregate(&orders, period);
        let series = build_daily_series(&orders, period.end_date(), SERIES_WINDOW_DAYS);
        let metrics = RollingMetrics::compute(&series, self.config.target_revenue);

        let label = period.label();
        let insight = self.request_insight(&summary, &metrics, &label).await;

        Ok(render_report(
            &summary,
            &metrics,
            insight.as_deref(),
            &label,
            &self.config.currency_symbol,
        ))
    }

    /// Report over an explicit inclusive date range.
    pub async fn generate_custom_report(&self, start: NaiveDate, end: NaiveDate) -> Result<String> {
        self.generate_report(&ReportPeriod::custom(start, end)?).await
    }

    /// Generate a report and hand it to the message-sink for one chat.
    /// No automatic retry on delivery failure; that is the transport's
    /// concern.
    pub async fn deliver_report(&self, chat_id: &str, period: &ReportPeriod) -> Result<()> {
        let text = self.generate_report(period).await?;
        timeout(SEND_TIMEOUT, self.sink.send(chat_id, &text))
            .await
            .map_err(|_| Error::Delivery("message-sink timed out".into()))?
    }

    /// Best-effort insight request. Any failure or timeout logs and
    /// returns None; the report ships without the section.
    async fn request_insight(
        &self,
        summary: &SalesSummary,
        metrics: &RollingMetrics,
        label: &str,
    ) -> Option<String> {
        let service = self.insight.as_ref()?;
        let prompt = build_insight_prompt(summary, metrics, label);
        match timeout(INSIGHT_TIMEOUT, service.summarize(&prompt)).await {
            Ok(Ok(text)) if !text.trim().is_empty() => Some(text),
            Ok(Ok(_)) => None,
            Ok(Err(e)) => {
                log::warn!("Insight service failed, continuing without insight: {e}");
                None
            }
            Err(_) => {
                log::warn!("Insight service timed out, continuing without insight");
                None
            }
        }
    }
}
