//! Explicit configuration of one report run.

use chrono::NaiveDate;

use crate::error::RoyaltyError;

pub const MAX_NAME_LENGTH: usize = 200;

/// Which press and which period a report run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Press subdomain; scopes the usage request.
    pub subdomain: String,
    /// Display name of the press, printed as "Collection Name".
    pub collection_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ReportConfig {
    pub fn new(
        subdomain: &str,
        collection_name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, RoyaltyError> {
        let subdomain = sanitize_text(subdomain, MAX_NAME_LENGTH)?;
        if subdomain.is_empty() {
            return Err(RoyaltyError::InvalidInput("subdomain must not be empty".to_string()));
        }
        if start_date > end_date {
            return Err(RoyaltyError::InvalidInput(format!(
                "start date {} is after end date {}",
                start_date, end_date
            )));
        }
        Ok(Self {
            subdomain,
            collection_name: strip_control(collection_name),
            start_date,
            end_date,
        })
    }

    /// `"201901 to 201906"`
    pub fn period_label(&self) -> String {
        format!(
            "{} to {}",
            self.start_date.format("%Y%m"),
            self.end_date.format("%Y%m")
        )
    }

    /// `"201901-201906"`, used in file names.
    pub fn period_slug(&self) -> String {
        format!(
            "{}-{}",
            self.start_date.format("%Y%m"),
            self.end_date.format("%Y%m")
        )
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<NaiveDate, RoyaltyError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        RoyaltyError::InvalidInput(format!("invalid date '{}', expected YYYY-MM-DD", input))
    })
}

/// Strip ASCII control characters, trim whitespace, and enforce a byte-length limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, RoyaltyError> {
    if input.len() > max_len {
        return Err(RoyaltyError::InvalidInput(format!(
            "input exceeds maximum length of {} bytes",
            max_len
        )));
    }
    Ok(strip_control(input))
}

/// Strip ASCII control characters and trim whitespace.
fn strip_control(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_ascii_control())
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_period_formats() {
        let config = ReportConfig::new("blue", "Blue Press", date("2019-01-01"), date("2019-06-30")).unwrap();
        assert_eq!(config.period_label(), "201901 to 201906");
        assert_eq!(config.period_slug(), "201901-201906");
    }

    #[test]
    fn test_reversed_range_rejected() {
        let result = ReportConfig::new("blue", "Blue Press", date("2019-07-01"), date("2019-06-30"));
        assert!(matches!(result.unwrap_err(), RoyaltyError::InvalidInput(_)));
    }

    #[test]
    fn test_empty_subdomain_rejected() {
        let result = ReportConfig::new("  ", "Blue Press", date("2019-01-01"), date("2019-06-30"));
        assert!(result.is_err());
    }

    #[test]
    fn test_long_collection_name_accepted() {
        let name = format!(" {}\u{7} ", "Blue Press ".repeat(40));
        let config = ReportConfig::new("blue", &name, date("2019-01-01"), date("2019-06-30")).unwrap();
        assert_eq!(config.collection_name, "Blue Press ".repeat(40).trim());
    }

    #[test]
    fn test_long_subdomain_rejected() {
        let result = ReportConfig::new(&"b".repeat(MAX_NAME_LENGTH + 1), "Blue Press", date("2019-01-01"), date("2019-06-30"));
        assert!(matches!(result.unwrap_err(), RoyaltyError::InvalidInput(_)));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(date(" 2019-06-30 "), NaiveDate::from_ymd_opt(2019, 6, 30).unwrap());
        assert!(parse_date("2019/06/30").is_err());
        assert!(parse_date("2019-02-30").is_err());
    }

    #[test]
    fn test_sanitize_text() {
        assert_eq!(sanitize_text(" Blue\u{7}Press ", 50).unwrap(), "BluePress");
        assert!(sanitize_text(&"x".repeat(51), 50).is_err());
    }
}
