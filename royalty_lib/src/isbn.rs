//! Splits a composite ISBN column into ebook, hardcover and paper ISBNs.
//!
//! The raw column looks like
//! `"9780520047983 (hardcover), 9780520319196 (ebook), 9780520319189 (paper)"`.
//! Entries are separated by `,` or `;`. Entries without a parenthesised kind,
//! or with a kind that is none of the three, are dropped without error.
//! ISBN-10 entries may end in an `X` check digit.

use counter_api::types::{FieldValue, EBOOK_ISBN, HARDCOVER_ISBN, PAPER_ISBN};
use regex::Regex;

use crate::error::RoyaltyError;

/// The three typed ISBNs of a work. Empty string when a kind is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IsbnSet {
    pub ebook: String,
    pub hardcover: String,
    pub paper: String,
}

impl IsbnSet {
    /// Field name/value pairs in report column order.
    pub fn into_fields(self) -> Vec<(String, FieldValue)> {
        vec![
            (EBOOK_ISBN.to_string(), FieldValue::Text(self.ebook)),
            (HARDCOVER_ISBN.to_string(), FieldValue::Text(self.hardcover)),
            (PAPER_ISBN.to_string(), FieldValue::Text(self.paper)),
        ]
    }
}

/// Holds the compiled entry pattern so a whole report is classified with
/// one compilation.
#[derive(Debug, Clone)]
pub struct IsbnClassifier {
    entry_re: Regex,
}

impl IsbnClassifier {
    pub fn new() -> Result<Self, RoyaltyError> {
        let entry_re = Regex::new(r"^([0-9][0-9\-]*[Xx]?)\s*\(([^)]*)\)")
            .map_err(|e| RoyaltyError::Pattern(format!("ISBN entry: {}", e)))?;
        Ok(Self { entry_re })
    }

    /// Classifies every entry of a composite ISBN string. When a kind appears
    /// more than once the last entry wins.
    pub fn classify(&self, isbn_field: &str) -> IsbnSet {
        let mut set = IsbnSet::default();
        for entry in isbn_field.split([',', ';']) {
            let entry = entry.trim();
            let Some(caps) = self.entry_re.captures(entry) else {
                continue;
            };
            let isbn: String = caps[1]
                .chars()
                .filter(|c| *c != '-')
                .map(|c| c.to_ascii_uppercase())
                .collect();
            let kind = caps[2].to_lowercase();
            if kind.contains("ebook") {
                set.ebook = isbn;
            } else if kind.contains("hardcover") {
                set.hardcover = isbn;
            } else if kind.contains("paper") {
                set.paper = isbn;
            }
        }
        set
    }
}

/// One-off classification of a single ISBN field.
pub fn classify_isbns(isbn_field: &str) -> Result<IsbnSet, RoyaltyError> {
    Ok(IsbnClassifier::new()?.classify(isbn_field))
}
