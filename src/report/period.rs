use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::date_util::week_of;
use crate::error::{Error, Result};

/// Date predicate for a report: a single day, a Sunday-to-Saturday week,
/// or an arbitrary inclusive range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportPeriod {
    Day(NaiveDate),
    Week { start: NaiveDate, end: NaiveDate },
    Range { start: NaiveDate, end: NaiveDate },
}

impl ReportPeriod {
    /// Today in the given timezone.
    pub fn today(tz: Tz) -> Self {
        ReportPeriod::Day(chrono::Utc::now().with_timezone(&tz).date_naive())
    }

    /// The current business week (Sunday through Saturday) in the given
    /// timezone.
    pub fn this_week(tz: Tz) -> Self {
        let today = chrono::Utc::now().with_timezone(&tz).date_naive();
        let (start, end) = week_of(today);
        ReportPeriod::Week { start, end }
    }

    /// An explicit inclusive range.
    pub fn custom(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::PeriodParse(format!(
                "range start {start} is after end {end}"
            )));
        }
        Ok(ReportPeriod::Range { start, end })
    }

    /// Parse a period argument.
    ///
    /// Accepted forms:
    /// - `today`
    /// - `week` — the current Sunday-to-Saturday week
    /// - `2025-07-31` — a single day
    /// - `2025-07-01..2025-07-31` — an inclusive range
    pub fn parse(s: &str, tz: Tz) -> Result<Self> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "today" => return Ok(ReportPeriod::today(tz)),
            "week" | "this-week" => return Ok(ReportPeriod::this_week(tz)),
            _ => {}
        }

        if let Some((start, end)) = s.split_once("..") {
            let start = parse_iso_date(start)?;
            let end = parse_iso_date(end)?;
            return ReportPeriod::custom(start, end);
        }

        Ok(ReportPeriod::Day(parse_iso_date(s)?))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            ReportPeriod::Day(d) => date == *d,
            ReportPeriod::Week { start, end } | ReportPeriod::Range { start, end } => {
                date >= *start && date <= *end
            }
        }
    }

    /// Last day of the period; rolling metrics anchor here.
    pub fn end_date(&self) -> NaiveDate {
        match self {
            ReportPeriod::Day(d) => *d,
            ReportPeriod::Week { end, .. } | ReportPeriod::Range { end, .. } => *end,
        }
    }

    /// Human-readable label for the report header.
    pub fn label(&self) -> String {
        match self {
            ReportPeriod::Day(d) => d.format("%b %d, %Y").to_string(),
            ReportPeriod::Week { start, end } | ReportPeriod::Range { start, end } => {
                format!("{} - {}", start.format("%b %d"), end.format("%b %d, %Y"))
            }
        }
    }
}

fn parse_iso_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| Error::PeriodParse(format!("expected YYYY-MM-DD, got: {s}")))
}

impl std::fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
