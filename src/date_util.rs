use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Date formats accepted from spreadsheet rows, in match order. The source
/// sheet mixes long-form text dates with several numeric conventions.
const DATE_FORMATS: &[&str] = &["%B %d, %Y", "%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y"];

/// Parse a spreadsheet date cell, trying each known format in turn.
pub fn parse_flexible_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// The Sunday-to-Saturday week containing `date`. Business weeks start on
/// Sunday, matching how the sheet is reviewed.
pub fn week_of(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let days_since_sunday = date.weekday().num_days_from_sunday() as i64;
    let start = date - Duration::days(days_since_sunday);
    (start, start + Duration::days(6))
}

/// Format an amount with thousands separators and no decimals,
/// e.g. `12950.0` → `"12,950"`. Rounds half away from zero.
pub fn format_thousands(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let negative = rounded < 0;
    let digits = rounded.abs().to_string();

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if negative {
        format!("-{out}")
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_date() {
        assert_eq!(
            parse_flexible_date("July 31, 2025"),
            NaiveDate::from_ymd_opt(2025, 7, 31)
        );
        assert_eq!(
            parse_flexible_date("December 10, 2024"),
            NaiveDate::from_ymd_opt(2024, 12, 10)
        );
    }

    #[test]
    fn test_parse_numeric_dates() {
        assert_eq!(
            parse_flexible_date("2025-07-31"),
            NaiveDate::from_ymd_opt(2025, 7, 31)
        );
        assert_eq!(
            parse_flexible_date("07/31/2025"),
            NaiveDate::from_ymd_opt(2025, 7, 31)
        );
        // Day-first only matches when month-first can't
        assert_eq!(
            parse_flexible_date("31/07/2025"),
            NaiveDate::from_ymd_opt(2025, 7, 31)
        );
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_flexible_date(""), None);
        assert_eq!(parse_flexible_date("not a date"), None);
        assert_eq!(parse_flexible_date("2025-13-40"), None);
    }

    #[test]
    fn test_week_of_midweek() {
        // 2025-07-31 is a Thursday; its week runs Sun Jul 27 .. Sat Aug 2
        let (start, end) = week_of(NaiveDate::from_ymd_opt(2025, 7, 31).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 7, 27).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 8, 2).unwrap());
    }

    #[test]
    fn test_week_of_sunday() {
        let sunday = NaiveDate::from_ymd_opt(2025, 7, 27).unwrap();
        let (start, end) = week_of(sunday);
        assert_eq!(start, sunday);
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 8, 2).unwrap());
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(950.0), "950");
        assert_eq!(format_thousands(12950.0), "12,950");
        assert_eq!(format_thousands(1234567.4), "1,234,567");
        assert_eq!(format_thousands(-4200.0), "-4,200");
    }
}
