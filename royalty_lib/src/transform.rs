//! Per-row normalization and enrichment stages.
//!
//! Each stage takes the rows by value and returns the rewritten rows. The
//! order in which [`crate::report`] chains them matters: totals must be taken
//! before [`format_hits`] turns counts into display strings.

use counter_api::types::{
    FieldValue, UsageRecord, ACCESS_TYPE, HEBID, HITS, ISBN, METRIC_TYPE,
    PARENT_PROPRIETARY_ID, PROPRIETARY_ID, REPORTING_PERIOD_TOTAL,
};
use regex::Regex;

use crate::error::RoyaltyError;
use crate::isbn::IsbnClassifier;
use crate::rightsholder::RightsholderDirectory;

/// Metric type written into every row of the full report. COUNTER5 has no
/// such metric; it is the label rightsholders expect.
pub const TITLE_METRIC_TYPE: &str = "Total_Title_Requests";

/// Matches monthly breakdown columns such as `Apr-2019`.
fn month_column_pattern() -> Result<Regex, RoyaltyError> {
    Regex::new(r"^(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)-\d{4}$")
        .map_err(|e| RoyaltyError::Pattern(format!("month column: {}", e)))
}

/// Formats an integer with `,` thousands separators: `2300` -> `"2,300"`.
pub fn with_delimiter(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn proprietary_id(record: &UsageRecord) -> String {
    record
        .get(PROPRIETARY_ID)
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<unknown>".to_string())
}

/// Rejects raw rows whose `Reporting_Period_Total` cannot be totalled.
pub fn validate_records(records: &[UsageRecord]) -> Result<(), RoyaltyError> {
    for record in records {
        match record.get(REPORTING_PERIOD_TOTAL) {
            Some(FieldValue::Int(_)) => {}
            Some(other) => {
                return Err(RoyaltyError::InvalidRecord {
                    proprietary_id: proprietary_id(record),
                    reason: format!("{} is not an integer: {:?}", REPORTING_PERIOD_TOTAL, other),
                })
            }
            None => {
                return Err(RoyaltyError::InvalidRecord {
                    proprietary_id: proprietary_id(record),
                    reason: format!("missing {}", REPORTING_PERIOD_TOTAL),
                })
            }
        }
    }
    Ok(())
}

/// Renames `Reporting_Period_Total` to `Hits` and shortens `OA_Gold` to `OA`.
pub fn relabel(records: Vec<UsageRecord>) -> Vec<UsageRecord> {
    records
        .into_iter()
        .map(|mut record| {
            record.rename_key(REPORTING_PERIOD_TOTAL, HITS);
            if record.get_str(ACCESS_TYPE) == Some("OA_Gold") {
                record.set(ACCESS_TYPE, "OA");
            }
            record
        })
        .collect()
}

/// Drops rows with zero `Hits`.
///
/// An item report requested for both access types has one row per access
/// type per item, and a book is only ever one of the two, so one row of each
/// pair is empty. When both are empty both go.
pub fn remove_extra_lines(records: Vec<UsageRecord>) -> Vec<UsageRecord> {
    let before = records.len();
    let kept: Vec<UsageRecord> = records
        .into_iter()
        .filter(|record| record.get_int(HITS) != Some(0))
        .collect();
    tracing::debug!("Removed {} zero-hit rows", before - kept.len());
    kept
}

/// Inserts `hebid` right after `Parent_Proprietary_ID`. Works without a
/// `heb_id:` identifier get a null `hebid`.
pub fn add_hebids<D>(records: Vec<UsageRecord>, directory: &D) -> Result<Vec<UsageRecord>, RoyaltyError>
where
    D: RightsholderDirectory + ?Sized,
{
    records
        .into_iter()
        .map(|mut record| -> Result<UsageRecord, RoyaltyError> {
            let heb_id = match record.get_str(PARENT_PROPRIETARY_ID) {
                Some(parent_id) => directory.heb_id_for(parent_id)?,
                None => None,
            };
            record.insert_after(PARENT_PROPRIETARY_ID, HEBID, heb_id);
            Ok(record)
        })
        .collect()
}

/// Replaces `ISBN` with `ebook ISBN`, `hardcover ISBN` and `paper ISBN` at
/// the same position.
pub fn reclassify_isbns(records: Vec<UsageRecord>) -> Result<Vec<UsageRecord>, RoyaltyError> {
    let classifier = IsbnClassifier::new()?;
    Ok(records
        .into_iter()
        .map(|mut record| {
            let isbns = classifier.classify(record.get_str(ISBN).unwrap_or_default());
            record.splice(ISBN, isbns.into_fields());
            record
        })
        .collect())
}

/// Overwrites `Metric_Type` with [`TITLE_METRIC_TYPE`] on every row.
pub fn total_item_to_title(records: Vec<UsageRecord>) -> Vec<UsageRecord> {
    records
        .into_iter()
        .map(|mut record| {
            record.set(METRIC_TYPE, TITLE_METRIC_TYPE);
            record
        })
        .collect()
}

/// Turns `Hits` and every month column into delimited strings.
///
/// Only integer cells are touched, so text left by an earlier pass is never
/// parsed back.
pub fn format_hits(records: Vec<UsageRecord>) -> Result<Vec<UsageRecord>, RoyaltyError> {
    let month_re = month_column_pattern()?;
    Ok(records
        .into_iter()
        .map(|mut record| {
            for (key, value) in record.iter_mut() {
                if key != HITS && !month_re.is_match(key) {
                    continue;
                }
                if let FieldValue::Int(n) = *value {
                    *value = FieldValue::Text(with_delimiter(n));
                }
            }
            record
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use crate::rightsholder::DirectoryError;

    fn raw(id: &str, parent: &str, access: &str, total: i64) -> UsageRecord {
        UsageRecord::from_iter([
            ("Proprietary_ID", FieldValue::from(id)),
            ("Parent_Proprietary_ID", FieldValue::from(parent)),
            ("Section_Type", FieldValue::from("Chapter")),
            (
                "ISBN",
                FieldValue::from("9780813915425 (hardcover), 9780813915432 (paper)"),
            ),
            ("Publisher", FieldValue::from("U of B")),
            ("Access_Type", FieldValue::from(access)),
            ("Metric_Type", FieldValue::from("Total_Item_Requests")),
            ("Reporting_Period_Total", FieldValue::from(total)),
            ("Jan-2019", FieldValue::from(total)),
        ])
    }

    struct OneHebId;

    impl RightsholderDirectory for OneHebId {
        fn name_for(&self, _: &str) -> Result<Option<String>, DirectoryError> {
            Ok(None)
        }
        fn heb_id_for(&self, parent_id: &str) -> Result<Option<String>, DirectoryError> {
            Ok((parent_id == "BBB").then(|| "heb33333.0001.001".to_string()))
        }
        fn ids_for(&self, _: &str) -> Result<HashSet<String>, DirectoryError> {
            Ok(HashSet::new())
        }
    }

    #[test]
    fn test_with_delimiter() {
        assert_eq!(with_delimiter(0), "0");
        assert_eq!(with_delimiter(9), "9");
        assert_eq!(with_delimiter(999), "999");
        assert_eq!(with_delimiter(2300), "2,300");
        assert_eq!(with_delimiter(2314), "2,314");
        assert_eq!(with_delimiter(1234567), "1,234,567");
        assert_eq!(with_delimiter(-45000), "-45,000");
    }

    #[test]
    fn test_month_column_pattern() {
        let month_re = month_column_pattern().unwrap();
        assert!(month_re.is_match("Jan-2019"));
        assert!(month_re.is_match("Dec-2024"));
        assert!(!month_re.is_match("Hits"));
        assert!(!month_re.is_match("jan-2019"));
        assert!(!month_re.is_match("Jan-19"));
    }

    #[test]
    fn test_validate_records() {
        assert!(validate_records(&[raw("1", "BBB", "Controlled", 3)]).is_ok());

        let mut bad = raw("7", "BBB", "Controlled", 3);
        bad.set("Reporting_Period_Total", "3");
        let err = validate_records(&[bad]).unwrap_err();
        assert!(matches!(err, RoyaltyError::InvalidRecord { ref proprietary_id, .. } if proprietary_id == "7"));

        let missing = UsageRecord::from_iter([("Proprietary_ID", "8")]);
        assert!(validate_records(&[missing]).is_err());

        let fractional: UsageRecord =
            serde_json::from_str(r#"{"Proprietary_ID": "9", "Reporting_Period_Total": 1.5}"#).unwrap();
        assert!(validate_records(&[fractional]).is_err());
    }

    #[test]
    fn test_relabel() {
        let out = relabel(vec![raw("1", "BBB", "OA_Gold", 9), raw("2", "BBB", "Controlled", 0)]);
        assert_eq!(out[0].get("Reporting_Period_Total"), None);
        assert_eq!(out[0].get_int("Hits"), Some(9));
        assert_eq!(out[0].keys().nth(7), Some("Hits"));
        assert_eq!(out[0].get_str("Access_Type"), Some("OA"));
        assert_eq!(out[1].get_str("Access_Type"), Some("Controlled"));
    }

    #[test]
    fn test_remove_extra_lines() {
        let out = remove_extra_lines(relabel(vec![
            raw("3", "AAA", "OA_Gold", 9),
            raw("3", "AAA", "Controlled", 0),
            raw("4", "AAA", "OA_Gold", 0),
            raw("4", "AAA", "Controlled", 0),
        ]));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].get_str("Access_Type"), Some("OA"));
    }

    #[test]
    fn test_add_hebids_position_and_null() {
        let out = add_hebids(vec![raw("1", "BBB", "Controlled", 1), raw("2", "ZZZ", "Controlled", 1)], &OneHebId).unwrap();
        assert_eq!(out[0].keys().nth(2), Some("hebid"));
        assert_eq!(out[0].get_str("hebid"), Some("heb33333.0001.001"));
        assert_eq!(out[1].keys().nth(2), Some("hebid"));
        assert!(out[1].get("hebid").unwrap().is_null());
    }

    #[test]
    fn test_reclassify_isbns_in_place() {
        let out = reclassify_isbns(vec![raw("1", "BBB", "Controlled", 1)]).unwrap();
        let keys: Vec<&str> = out[0].keys().collect();
        assert_eq!(&keys[3..6], &["ebook ISBN", "hardcover ISBN", "paper ISBN"]);
        assert_eq!(out[0].get_str("ebook ISBN"), Some(""));
        assert_eq!(out[0].get_str("hardcover ISBN"), Some("9780813915425"));
        assert_eq!(out[0].get_str("paper ISBN"), Some("9780813915432"));
        assert!(!out[0].contains_key("ISBN"));
    }

    #[test]
    fn test_reclassify_without_isbn_appends() {
        let record = UsageRecord::from_iter([("Proprietary_ID", "1")]);
        let out = reclassify_isbns(vec![record]).unwrap();
        assert_eq!(out[0].len(), 4);
        assert_eq!(out[0].keys().last(), Some("paper ISBN"));
    }

    #[test]
    fn test_total_item_to_title() {
        let out = total_item_to_title(vec![raw("1", "BBB", "Controlled", 1)]);
        assert_eq!(out[0].get_str("Metric_Type"), Some("Total_Title_Requests"));
    }

    #[test]
    fn test_format_hits() {
        let mut record = raw("1", "BBB", "Controlled", 2300);
        record.set("Feb-2019", 0);
        let out = format_hits(relabel(vec![record])).unwrap();
        assert_eq!(out[0].get_str("Hits"), Some("2,300"));
        assert_eq!(out[0].get_str("Jan-2019"), Some("2,300"));
        assert_eq!(out[0].get_str("Feb-2019"), Some("0"));
        // untouched non-count column
        assert_eq!(out[0].get_str("Proprietary_ID"), Some("1"));

        // a second pass has nothing left to format
        let again = format_hits(out.clone()).unwrap();
        assert_eq!(again, out);
    }
}
