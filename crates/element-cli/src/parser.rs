use anyhow::Result;
use chrono::{NaiveDate, Utc};
use chrono_english::{parse_date_string, Dialect};

/// Parses a calendar date from ISO or natural-language input
/// ('2025-09-01', 'tomorrow', 'next friday').
pub fn parse_date(date_str: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        return Ok(date);
    }
    parse_date_string(date_str, Utc::now(), Dialect::Us)
        .map(|dt| dt.date_naive())
        .map_err(|e| anyhow::anyhow!("Failed to parse date '{}': {}", date_str, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_date("2025-09-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
        );
    }

    #[test]
    fn parses_natural_language() {
        let today = Utc::now().date_naive();
        assert_eq!(parse_date("today").unwrap(), today);
        assert!(parse_date("tomorrow").unwrap() > today);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_date("not-a-date").is_err());
    }
}
