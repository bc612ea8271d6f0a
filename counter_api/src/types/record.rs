use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single cell of an item report row.
///
/// Raw reports carry integers for counts and strings for everything else.
/// `Null` marks a column that is present but has no value (e.g. an
/// unresolved `hebid`). Any other JSON cell (fractions, booleans, nested
/// values) is kept as `Other` and rendered with its JSON text.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Int(i64),
    Text(String),
    Other(serde_json::Value),
}

impl FieldValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Int(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
            Self::Other(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Option<String>> for FieldValue {
    fn from(s: Option<String>) -> Self {
        s.map(Self::Text).unwrap_or(Self::Null)
    }
}

/// One row of a COUNTER5 item report.
///
/// The column set depends on the requested date range (one column per
/// month), so a row is an insertion-ordered map rather than a struct.
/// Column order is what ends up as the header row of the rendered report.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct UsageRecord(IndexMap<String, FieldValue>);

impl UsageRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    /// Returns the text value of `key`, or `None` if missing or not text.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(FieldValue::as_str)
    }

    /// Returns the integer value of `key`, or `None` if missing or not an integer.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(FieldValue::as_int)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Overwrites `key` in place, or appends it if the row has no such column.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Renames a column, keeping its position. No-op if `from` is missing.
    pub fn rename_key(&mut self, from: &str, to: &str) {
        if !self.0.contains_key(from) || from == to {
            return;
        }
        let fields = std::mem::take(&mut self.0);
        self.0 = fields
            .into_iter()
            .filter(|(k, _)| k != to)
            .map(|(k, v)| if k == from { (to.to_string(), v) } else { (k, v) })
            .collect();
    }

    /// Inserts `key` directly after `anchor`. Appends when `anchor` is missing.
    pub fn insert_after(&mut self, anchor: &str, key: impl Into<String>, value: impl Into<FieldValue>) {
        let key = key.into();
        let value = value.into();
        if key != anchor {
            self.0.shift_remove(&key);
        }
        match self.0.get_index_of(anchor) {
            Some(idx) if key != anchor => {
                self.0.shift_insert(idx + 1, key, value);
            }
            _ => {
                self.0.insert(key, value);
            }
        }
    }

    /// Replaces the column `key` with `fields`, at the position `key` had.
    /// Appends `fields` when `key` is missing.
    pub fn splice<I>(&mut self, key: &str, fields: I)
    where
        I: IntoIterator<Item = (String, FieldValue)>,
    {
        if !self.0.contains_key(key) {
            self.0.extend(fields);
            return;
        }
        let mut replacement = Some(fields);
        let old = std::mem::take(&mut self.0);
        let mut out = IndexMap::with_capacity(old.len() + 2);
        for (k, v) in old {
            if k == key {
                if let Some(fields) = replacement.take() {
                    out.extend(fields);
                }
            } else {
                out.insert(k, v);
            }
        }
        self.0 = out;
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut FieldValue)> {
        self.0.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for UsageRecord {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> UsageRecord {
        UsageRecord::from_iter([
            ("Proprietary_ID", FieldValue::from("111")),
            ("Parent_Proprietary_ID", FieldValue::from("AAA")),
            ("ISBN", FieldValue::from("1 (ebook)")),
            ("Publisher", FieldValue::from("U of A")),
            ("Reporting_Period_Total", FieldValue::from(5)),
        ])
    }

    #[test]
    fn rename_keeps_position() {
        let mut r = row();
        r.rename_key("Reporting_Period_Total", "Hits");
        assert_eq!(r.keys().last(), Some("Hits"));
        assert_eq!(r.get_int("Hits"), Some(5));
        assert!(r.get("Reporting_Period_Total").is_none());
        assert_eq!(r.len(), 5);
    }

    #[test]
    fn insert_after_anchor() {
        let mut r = row();
        r.insert_after("Parent_Proprietary_ID", "hebid", FieldValue::Null);
        let keys: Vec<&str> = r.keys().collect();
        assert_eq!(keys[2], "hebid");
        assert!(r.get("hebid").unwrap().is_null());
    }

    #[test]
    fn insert_after_missing_anchor_appends() {
        let mut r = row();
        r.insert_after("Nope", "extra", "x");
        assert_eq!(r.keys().last(), Some("extra"));
    }

    #[test]
    fn insert_after_moves_existing_key() {
        let mut r = row();
        r.set("hebid", "old");
        r.insert_after("Parent_Proprietary_ID", "hebid", "new");
        let keys: Vec<&str> = r.keys().collect();
        assert_eq!(keys[2], "hebid");
        assert_eq!(r.len(), 6);
        assert_eq!(r.get_str("hebid"), Some("new"));
    }

    #[test]
    fn splice_replaces_in_place() {
        let mut r = row();
        r.splice(
            "ISBN",
            vec![
                ("a".to_string(), FieldValue::from("1")),
                ("b".to_string(), FieldValue::from("2")),
            ],
        );
        let keys: Vec<&str> = r.keys().collect();
        assert_eq!(keys, vec!["Proprietary_ID", "Parent_Proprietary_ID", "a", "b", "Publisher", "Reporting_Period_Total"]);
    }

    #[test]
    fn deserialize_preserves_order_and_types() {
        let json = r#"{"Z": 1, "A": "x", "M": null}"#;
        let r: UsageRecord = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = r.keys().collect();
        assert_eq!(keys, vec!["Z", "A", "M"]);
        assert_eq!(r.get_int("Z"), Some(1));
        assert_eq!(r.get_str("A"), Some("x"));
        assert!(r.get("M").unwrap().is_null());
    }

    #[test]
    fn display_null_is_empty() {
        assert_eq!(FieldValue::Null.to_string(), "");
        assert_eq!(FieldValue::Int(12).to_string(), "12");
    }

    #[test]
    fn deserialize_keeps_float_and_bool_cells() {
        let r: UsageRecord = serde_json::from_str(r#"{"Hits": 5.0, "Open": true, "ID": "x"}"#).unwrap();
        assert_eq!(r.get("Hits"), Some(&FieldValue::Other(serde_json::json!(5.0))));
        assert_eq!(r.get_int("Hits"), None);
        assert_eq!(r.get("Hits").unwrap().to_string(), "5.0");
        assert_eq!(r.get("Open").unwrap().to_string(), "true");
        assert_eq!(r.get_str("ID"), Some("x"));
    }
}
