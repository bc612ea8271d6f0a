use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::UsageRecord;

/// A COUNTER5 item report as handed over by a usage source.
///
/// The header is kept as loose JSON since COUNTER headers nest filter and
/// attribute lists; only `items` is used downstream.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ItemReport {
    #[serde(default)]
    pub header: IndexMap<String, serde_json::Value>,
    pub items: Vec<UsageRecord>,
}

impl ItemReport {
    pub fn from_items(items: Vec<UsageRecord>) -> Self {
        Self {
            header: IndexMap::new(),
            items,
        }
    }
}
