use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::report::metrics::RollingMetrics;
use crate::report::summary::SalesSummary;

/// Best-effort text-summarization capability. Kept behind a trait so the
/// aggregation pipeline stays testable without network access; callers
/// treat failures as advisory and render the report without the insight.
#[async_trait]
pub trait InsightService: Send + Sync {
    async fn summarize(&self, prompt: &str) -> Result<String>;
}

/// Build the insight prompt from the computed figures. The model sees the
/// same numbers the report renders, as JSON.
pub fn build_insight_prompt(
    summary: &SalesSummary,
    metrics: &RollingMetrics,
    label: &str,
) -> String {
    let summary_json = serde_json::to_string_pretty(summary).unwrap_or_default();
    let metrics_json = serde_json::to_string_pretty(metrics).unwrap_or_default();

    format!(
        r#"Give me a brief, conversational summary of sales performance for {label}.
Keep it concise and friendly - no recommendations needed.

Sales figures:
{summary_json}

Rolling metrics:
{metrics_json}"#
    )
}

/// Insight service backed by a mixtape Agent (Anthropic).
pub struct MixtapeInsight {
    agent: mixtape_core::Agent,
}

impl MixtapeInsight {
    /// Build an agent from the environment. `model` picks haiku for cheap
    /// runs; anything else (or None) gets the default sonnet.
    pub async fn from_env(model: Option<&str>) -> Result<Self> {
        let agent = match model {
            Some("claude-haiku-4-5" | "haiku") => mixtape_core::Agent::builder()
                .anthropic_from_env(mixtape_core::ClaudeHaiku4_5)
                .build()
                .await
                .map_err(|e| Error::Insight(e.to_string()))?,
            _ => mixtape_core::Agent::builder()
                .anthropic_from_env(mixtape_core::ClaudeSonnet4_5)
                .build()
                .await
                .map_err(|e| Error::Insight(e.to_string()))?,
        };
        Ok(Self { agent })
    }
}

#[async_trait]
impl InsightService for MixtapeInsight {
    async fn summarize(&self, prompt: &str) -> Result<String> {
        let response = self
            .agent
            .run(prompt)
            .await
            .map_err(|e| Error::Insight(e.to_string()))?;
        Ok(response.text().trim().to_string())
    }
}
