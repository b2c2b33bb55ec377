use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Tz;
use tokio::sync::watch;

use crate::config::Config;
use crate::error::Result;
use crate::report::period::ReportPeriod;
use crate::SalesBot;

/// Job identities for the two standing daily reports.
pub const AFTERNOON_JOB_ID: &str = "report-15:00";
pub const EVENING_JOB_ID: &str = "report-23:00";

/// A named recurring trigger: fire daily at hour:minute in a timezone and
/// deliver to a chat. Lives for the process lifetime only.
#[derive(Debug, Clone)]
pub struct JobSpec {
    pub id: String,
    pub hour: u32,
    pub minute: u32,
    pub timezone: Tz,
    pub chat_id: String,
}

impl JobSpec {
    pub fn daily(id: &str, hour: u32, minute: u32, timezone: Tz, chat_id: &str) -> Self {
        Self {
            id: id.to_string(),
            // Out-of-range values would make the trigger unreachable
            hour: hour.min(23),
            minute: minute.min(59),
            timezone,
            chat_id: chat_id.to_string(),
        }
    }

    /// Next wall-clock occurrence strictly after `after`.
    ///
    /// DST handling: a fold takes the earlier instant; a local time skipped
    /// by a forward transition moves to the next day.
    pub fn next_occurrence(&self, after: DateTime<Utc>) -> DateTime<Utc> {
        let mut date = after.with_timezone(&self.timezone).date_naive();
        loop {
            // hour/minute are clamped in the constructor, so this is Some
            if let Some(naive) = date.and_hms_opt(self.hour, self.minute, 0) {
                if let Some(local) = self.timezone.from_local_datetime(&naive).earliest() {
                    let utc = local.with_timezone(&Utc);
                    if utc > after {
                        return utc;
                    }
                }
            }
            date += Duration::days(1);
        }
    }
}

/// Process-scoped trigger registry. Constructed once at startup; jobs are
/// rebuilt identically on every restart, never persisted.
#[derive(Debug, Default)]
pub struct Scheduler {
    jobs: HashMap<String, JobSpec>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheduler carrying the two standing daily report jobs. Fails with a
    /// Config error when no scheduled chat is configured; on-demand
    /// reporting is unaffected by that failure.
    pub fn with_daily_reports(config: &Config) -> Result<Self> {
        let chat_id = config.scheduled_chat_id()?;
        let mut scheduler = Scheduler::new();
        scheduler.register(JobSpec::daily(
            AFTERNOON_JOB_ID,
            15,
            0,
            config.timezone,
            chat_id,
        ));
        scheduler.register(JobSpec::daily(
            EVENING_JOB_ID,
            23,
            0,
            config.timezone,
            chat_id,
        ));
        Ok(scheduler)
    }

    /// Register a job, replacing any prior job with the same identity.
    pub fn register(&mut self, spec: JobSpec) {
        if self.jobs.insert(spec.id.clone(), spec.clone()).is_some() {
            log::info!("Replaced schedule job {}", spec.id);
        } else {
            log::info!(
                "Registered schedule job {} at {:02}:{:02} {}",
                spec.id,
                spec.hour,
                spec.minute,
                spec.timezone
            );
        }
    }

    /// Cancel a job by identity. Returns whether it existed.
    pub fn cancel(&mut self, id: &str) -> bool {
        self.jobs.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// The earliest upcoming fire time after `after`, with every job due at
    /// that instant.
    fn next_due(&self, after: DateTime<Utc>) -> Option<(DateTime<Utc>, Vec<JobSpec>)> {
        let earliest = self
            .jobs
            .values()
            .map(|spec| spec.next_occurrence(after))
            .min()?;
        let due = self
            .jobs
            .values()
            .filter(|spec| spec.next_occurrence(after) == earliest)
            .cloned()
            .collect();
        Some((earliest, due))
    }

    /// Run the scheduling timeline until `shutdown` signals.
    ///
    /// Each due job fires as an independent spawned task so a slow report
    /// (sheet fetch plus insight call) never delays the other job. A failed
    /// delivery is logged and leaves the job registered; the next firing
    /// proceeds normally. Shutdown stops the clock between firings without
    /// starting new ones.
    pub async fn run(self, bot: Arc<SalesBot>, mut shutdown: watch::Receiver<bool>) {
        if self.is_empty() {
            log::warn!("Scheduler started with no jobs; waiting for shutdown");
            let _ = shutdown.changed().await;
            return;
        }

        loop {
            let now = Utc::now();
            // is_empty checked above; jobs are never removed while running
            let Some((fire_at, due)) = self.next_due(now) else {
                return;
            };
            let wait = (fire_at - now).to_std().unwrap_or_default();
            log::debug!("Next firing at {fire_at} ({} job(s))", due.len());

            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    for spec in due {
                        let bot = Arc::clone(&bot);
                        tokio::spawn(async move {
                            let period = ReportPeriod::today(spec.timezone);
                            log::info!("Firing {} for {}", spec.id, period.label());
                            if let Err(e) = bot.deliver_report(&spec.chat_id, &period).await {
                                log::error!("Scheduled delivery {} failed: {e}", spec.id);
                            }
                        });
                    }
                }
                _ = shutdown.changed() => {
                    log::info!("Scheduler shutting down");
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manila_spec(id: &str, hour: u32) -> JobSpec {
        JobSpec::daily(id, hour, 0, chrono_tz::Asia::Manila, "chat-1")
    }

    #[test]
    fn test_next_occurrence_later_today() {
        // 15:00 Manila is 07:00 UTC (UTC+8, no DST)
        let spec = manila_spec(AFTERNOON_JOB_ID, 15);
        let after = Utc.with_ymd_and_hms(2025, 1, 1, 3, 0, 0).unwrap();
        let next = spec.next_occurrence(after);
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 1, 1, 7, 0, 0).unwrap());
    }

    #[test]
    fn test_next_occurrence_rolls_to_tomorrow() {
        let spec = manila_spec(AFTERNOON_JOB_ID, 15);
        // Exactly at the trigger instant: strictly-after means tomorrow
        let after = Utc.with_ymd_and_hms(2025, 1, 1, 7, 0, 0).unwrap();
        let next = spec.next_occurrence(after);
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 1, 2, 7, 0, 0).unwrap());
    }

    #[test]
    fn test_reregistration_replaces_not_duplicates() {
        let mut scheduler = Scheduler::new();
        scheduler.register(manila_spec(AFTERNOON_JOB_ID, 15));
        scheduler.register(manila_spec(AFTERNOON_JOB_ID, 15));
        assert_eq!(scheduler.len(), 1);

        // Two simulated firings 24h apart produce exactly two deliveries
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let horizon = start + Duration::hours(48);
        let mut cursor = start;
        let mut deliveries = 0;
        while let Some((at, due)) = scheduler.next_due(cursor) {
            if at >= horizon {
                break;
            }
            deliveries += due.len();
            cursor = at;
        }
        assert_eq!(deliveries, 2);
    }

    #[test]
    fn test_reregistration_takes_new_trigger_time() {
        let mut scheduler = Scheduler::new();
        scheduler.register(manila_spec(AFTERNOON_JOB_ID, 15));
        scheduler.register(manila_spec(AFTERNOON_JOB_ID, 16));
        assert_eq!(scheduler.len(), 1);

        let after = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let (at, _) = scheduler.next_due(after).unwrap();
        assert_eq!(at, Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_two_jobs_fire_independently() {
        let mut scheduler = Scheduler::new();
        scheduler.register(manila_spec(AFTERNOON_JOB_ID, 15));
        scheduler.register(manila_spec(EVENING_JOB_ID, 23));

        let after = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let (first, due) = scheduler.next_due(after).unwrap();
        assert_eq!(first, Utc.with_ymd_and_hms(2025, 1, 1, 7, 0, 0).unwrap());
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, AFTERNOON_JOB_ID);

        let (second, due) = scheduler.next_due(first).unwrap();
        assert_eq!(second, Utc.with_ymd_and_hms(2025, 1, 1, 15, 0, 0).unwrap());
        assert_eq!(due[0].id, EVENING_JOB_ID);
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        scheduler.register(manila_spec(AFTERNOON_JOB_ID, 15));
        assert!(scheduler.cancel(AFTERNOON_JOB_ID));
        assert!(!scheduler.cancel(AFTERNOON_JOB_ID));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_with_daily_reports_requires_chat_id() {
        let config = Config::default();
        assert!(Scheduler::with_daily_reports(&config).is_err());

        let config = Config {
            report_chat_id: Some("123".to_string()),
            ..Config::default()
        };
        let scheduler = Scheduler::with_daily_reports(&config).unwrap();
        assert_eq!(scheduler.len(), 2);
    }

    #[test]
    fn test_out_of_range_trigger_clamped() {
        let spec = JobSpec::daily("weird", 99, 99, chrono_tz::UTC, "chat-1");
        assert_eq!(spec.hour, 23);
        assert_eq!(spec.minute, 59);
        let after = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            spec.next_occurrence(after),
            Utc.with_ymd_and_hms(2025, 1, 1, 23, 59, 0).unwrap()
        );
    }
}
