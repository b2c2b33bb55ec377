pub mod format;
pub mod metrics;
pub mod period;
pub mod summary;

pub use format::render_report;
pub use metrics::{build_daily_series, DailyPoint, RollingMetrics};
pub use period::ReportPeriod;
pub use summary::{ProductLine, SalesSummary};
