use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Row-source unreachable, unauthorized, or timed out. Aborts the
    /// current invocation only.
    #[error("Data fetch error: {0}")]
    DataFetch(String),

    /// Insight service failure. Advisory — callers downgrade to a report
    /// without the insight section instead of propagating.
    #[error("Insight service error: {0}")]
    Insight(String),

    /// Message-sink refused or timed out on the formatted text. Reported,
    /// never retried here.
    #[error("Delivery error: {0}")]
    Delivery(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid period: {0}")]
    PeriodParse(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
