//! Totals and rightsholder grouping over transformed rows.
//!
//! None of these functions touch number formatting: [`total_hits`] only sees
//! integer `Hits`, so it has to run before the rows are formatted.

use counter_api::types::{UsageRecord, HITS, PARENT_PROPRIETARY_ID, PUBLISHER, RIGHTSHOLDER};
use indexmap::IndexMap;

use crate::error::RoyaltyError;
use crate::rightsholder::RightsholderDirectory;

/// Sums the integer `Hits` of all rows.
pub fn total_hits(records: &[UsageRecord]) -> i64 {
    records.iter().filter_map(|r| r.get_int(HITS)).sum()
}

fn rightsholder_of<D>(record: &UsageRecord, directory: &D) -> Result<Option<String>, RoyaltyError>
where
    D: RightsholderDirectory + ?Sized,
{
    match record.get_str(PARENT_PROPRIETARY_ID) {
        Some(parent_id) => Ok(directory.name_for(parent_id)?),
        None => Ok(None),
    }
}

/// Groups rows by the rightsholder of their parent work, in the order
/// rightsholders are first seen. Rows whose work has no rightsholder are
/// left out.
pub fn group_by_rightsholder<D>(
    records: &[UsageRecord],
    directory: &D,
) -> Result<IndexMap<String, Vec<UsageRecord>>, RoyaltyError>
where
    D: RightsholderDirectory + ?Sized,
{
    let mut groups: IndexMap<String, Vec<UsageRecord>> = IndexMap::new();
    let mut orphans = 0usize;
    for record in records {
        match rightsholder_of(record, directory)? {
            Some(name) => groups.entry(name).or_default().push(record.clone()),
            None => orphans += 1,
        }
    }
    if orphans > 0 {
        tracing::warn!(
            "{} rows have no rightsholder and only appear in the combined report",
            orphans
        );
    }
    Ok(groups)
}

/// Inserts `Rightsholder` right after `Publisher` on every row. Rows whose
/// work has no rightsholder get a null value.
pub fn add_rightsholder<D>(
    records: Vec<UsageRecord>,
    directory: &D,
) -> Result<Vec<UsageRecord>, RoyaltyError>
where
    D: RightsholderDirectory + ?Sized,
{
    records
        .into_iter()
        .map(|mut record| -> Result<UsageRecord, RoyaltyError> {
            let name = rightsholder_of(&record, directory)?;
            record.insert_after(PUBLISHER, RIGHTSHOLDER, name);
            Ok(record)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use counter_api::types::FieldValue;

    use crate::rightsholder::{WorkMetadata, WorkStore};

    fn store() -> WorkStore {
        let work = |id: &str, name: &str| WorkMetadata {
            id: id.to_string(),
            press: None,
            title: None,
            rightsholder: vec![name.to_string()],
            identifiers: vec![],
        };
        WorkStore::from_works(vec![work("AAA", "Copyright A"), work("BBB", "Copyright B")]).unwrap()
    }

    fn row(id: &str, parent: &str, hits: i64) -> UsageRecord {
        UsageRecord::from_iter([
            ("Proprietary_ID", FieldValue::from(id)),
            ("Parent_Proprietary_ID", FieldValue::from(parent)),
            ("Publisher", FieldValue::from("U of A")),
            ("Hits", FieldValue::from(hits)),
        ])
    }

    #[test]
    fn test_total_hits() {
        let rows = vec![row("1", "AAA", 2300), row("2", "BBB", 5), row("3", "AAA", 9)];
        assert_eq!(total_hits(&rows), 2314);
    }

    #[test]
    fn test_total_hits_ignores_formatted_values() {
        let mut formatted = row("1", "AAA", 0);
        formatted.set("Hits", "2,300");
        assert_eq!(total_hits(&[formatted, row("2", "BBB", 5)]), 5);
    }

    #[test]
    fn test_group_by_rightsholder_first_seen_order() {
        let rows = vec![
            row("2", "BBB", 5),
            row("1", "AAA", 2300),
            row("3", "AAA", 9),
            row("4", "ZZZ", 1),
        ];
        let groups = group_by_rightsholder(&rows, &store()).unwrap();
        let names: Vec<&String> = groups.keys().collect();
        assert_eq!(names, vec!["Copyright B", "Copyright A"]);
        assert_eq!(groups["Copyright A"].len(), 2);
        assert_eq!(groups["Copyright A"][0].get_str("Proprietary_ID"), Some("1"));
        assert_eq!(groups["Copyright A"][1].get_str("Proprietary_ID"), Some("3"));
        assert_eq!(groups["Copyright B"].len(), 1);
    }

    #[test]
    fn test_add_rightsholder_after_publisher() {
        let rows = add_rightsholder(vec![row("1", "AAA", 1), row("4", "ZZZ", 1)], &store()).unwrap();
        assert_eq!(rows[0].keys().nth(3), Some("Rightsholder"));
        assert_eq!(rows[0].get_str("Rightsholder"), Some("Copyright A"));
        assert!(rows[1].get("Rightsholder").unwrap().is_null());
    }

    #[test]
    fn test_empty_rows() {
        assert_eq!(total_hits(&[]), 0);
        assert!(group_by_rightsholder(&[], &store()).unwrap().is_empty());
    }
}
