use chrono_tz::Tz;

use crate::error::{Error, Result};

/// Timezone used when `TIMEZONE` is unset. The business operates in the
/// Philippines.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Manila;

/// Sheet read when `ORDER_SHEET` is unset.
pub const DEFAULT_ORDER_SHEET: &str = "ORDER";

/// Process-wide configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Destination chat for scheduled reports. Optional: when absent the
    /// scheduler cannot register, but on-demand reports still work.
    pub report_chat_id: Option<String>,
    pub timezone: Tz,
    /// Daily revenue threshold for the target streak. Zero disables nothing —
    /// every day trivially meets it.
    pub target_revenue: f64,
    pub currency_symbol: String,
    /// Name of the sheet/range passed to the row-source.
    pub order_sheet: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_chat_id: None,
            timezone: DEFAULT_TIMEZONE,
            target_revenue: 0.0,
            currency_symbol: "₱".to_string(),
            order_sheet: DEFAULT_ORDER_SHEET.to_string(),
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// An unparseable `TIMEZONE` or `TARGET_REVENUE` is an error rather than
    /// a silent fallback — a typo'd zone would shift every scheduled firing.
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(chat_id) = std::env::var("REPORT_CHAT_ID") {
            if !chat_id.trim().is_empty() {
                config.report_chat_id = Some(chat_id.trim().to_string());
            }
        }

        if let Ok(tz) = std::env::var("TIMEZONE") {
            config.timezone = tz
                .parse::<Tz>()
                .map_err(|_| Error::Config(format!("unknown timezone: {tz}")))?;
        }

        if let Ok(target) = std::env::var("TARGET_REVENUE") {
            config.target_revenue = target
                .parse::<f64>()
                .map_err(|_| Error::Config(format!("invalid TARGET_REVENUE: {target}")))?;
        }

        if let Ok(symbol) = std::env::var("CURRENCY_SYMBOL") {
            if !symbol.is_empty() {
                config.currency_symbol = symbol;
            }
        }

        if let Ok(sheet) = std::env::var("ORDER_SHEET") {
            if !sheet.trim().is_empty() {
                config.order_sheet = sheet.trim().to_string();
            }
        }

        Ok(config)
    }

    /// The chat id scheduled reports go to, or a Config error if unset.
    /// Only the scheduler calls this; interactive reports name their own chat.
    pub fn scheduled_chat_id(&self) -> Result<&str> {
        self.report_chat_id.as_deref().ok_or_else(|| {
            Error::Config("REPORT_CHAT_ID is not set; scheduled reports are disabled".into())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.timezone, chrono_tz::Asia::Manila);
        assert_eq!(config.currency_symbol, "₱");
        assert_eq!(config.order_sheet, "ORDER");
        assert_eq!(config.target_revenue, 0.0);
        assert!(config.report_chat_id.is_none());
    }

    #[test]
    fn test_scheduled_chat_id_missing() {
        let config = Config::default();
        let err = config.scheduled_chat_id().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_scheduled_chat_id_present() {
        let config = Config {
            report_chat_id: Some("123456789".to_string()),
            ..Config::default()
        };
        assert_eq!(config.scheduled_chat_id().unwrap(), "123456789");
    }
}
