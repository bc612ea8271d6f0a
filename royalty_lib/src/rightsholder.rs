//! Rightsholder lookups backed by work metadata.
//!
//! Every work (monograph) carries a rightsholder display name and a list of
//! scheme-tagged identifiers, one of which may be a `heb_id:` cross-reference.
//! [`WorkStore`] is the in-memory implementation, loaded from YAML with the
//! same parse-then-validate shape used for other seed data.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Identifier prefix marking the secondary "hebid" cross-reference.
pub const HEB_ID_PREFIX: &str = "heb_id:";

/// Error types for rightsholder directory operations.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Failed to read work metadata {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse work metadata YAML: {0}")]
    YamlParse(#[from] serde_yml::Error),
    #[error("Duplicate work id in metadata: {0}")]
    DuplicateWork(String),
    #[error("Metadata store unavailable: {0}")]
    Unavailable(String),
}

/// Metadata of one work, keyed by its id (the report's `Parent_Proprietary_ID`).
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WorkMetadata {
    pub id: String,
    #[serde(default)]
    pub press: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub rightsholder: Vec<String>,
    #[serde(default)]
    pub identifiers: Vec<String>,
}

impl WorkMetadata {
    /// The first non-blank rightsholder value, trimmed.
    pub fn rightsholder_name(&self) -> Option<String> {
        self.rightsholder
            .iter()
            .map(|r| r.trim())
            .find(|r| !r.is_empty())
            .map(str::to_string)
    }

    /// The suffix of the first `heb_id:` identifier, trimmed.
    pub fn heb_id(&self) -> Option<String> {
        self.identifiers
            .iter()
            .find_map(|id| id.trim_start().strip_prefix(HEB_ID_PREFIX))
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    }
}

/// Read-only lookups from a work id to its rightsholder and hebid.
///
/// Implementations must be safe to share between concurrent report runs and
/// must return the same answer for repeated calls with the same id.
pub trait RightsholderDirectory: Send + Sync {
    /// Rightsholder display name of a work, if any.
    fn name_for(&self, parent_id: &str) -> Result<Option<String>, DirectoryError>;

    /// The `heb_id:` cross-reference of a work, if any.
    fn heb_id_for(&self, parent_id: &str) -> Result<Option<String>, DirectoryError>;

    /// Ids of every work whose rightsholder is exactly `rightsholder`.
    fn ids_for(&self, rightsholder: &str) -> Result<HashSet<String>, DirectoryError>;
}

impl<D: RightsholderDirectory + ?Sized> RightsholderDirectory for &D {
    fn name_for(&self, parent_id: &str) -> Result<Option<String>, DirectoryError> {
        (**self).name_for(parent_id)
    }

    fn heb_id_for(&self, parent_id: &str) -> Result<Option<String>, DirectoryError> {
        (**self).heb_id_for(parent_id)
    }

    fn ids_for(&self, rightsholder: &str) -> Result<HashSet<String>, DirectoryError> {
        (**self).ids_for(rightsholder)
    }
}

/// Top-level structure for the work metadata YAML file.
#[derive(Deserialize, Debug)]
struct WorkMetadataFile {
    works: Vec<WorkMetadata>,
}

/// In-memory rightsholder directory.
#[derive(Debug, Clone, Default)]
pub struct WorkStore {
    works: HashMap<String, WorkMetadata>,
}

impl WorkStore {
    /// Builds a store from already-loaded works. Duplicate ids are rejected.
    pub fn from_works(works: Vec<WorkMetadata>) -> Result<Self, DirectoryError> {
        let mut map = HashMap::with_capacity(works.len());
        for work in works {
            if map.contains_key(&work.id) {
                return Err(DirectoryError::DuplicateWork(work.id));
            }
            map.insert(work.id.clone(), work);
        }
        Ok(Self { works: map })
    }

    /// Parses work metadata from YAML content (`works: [...]`).
    pub fn from_yaml(yaml_content: &str) -> Result<Self, DirectoryError> {
        let file: WorkMetadataFile = serde_yml::from_str(yaml_content)?;
        Self::from_works(file.works)
    }

    /// Loads work metadata from a YAML file.
    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        let yaml_content = std::fs::read_to_string(path).map_err(|e| DirectoryError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let store = Self::from_yaml(&yaml_content)?;
        tracing::debug!("Loaded {} works from {}", store.len(), path.display());
        Ok(store)
    }

    /// Keeps only works of one press. Works without a press are kept.
    pub fn scoped_to(&self, subdomain: &str) -> Self {
        let works = self
            .works
            .iter()
            .filter(|(_, w)| w.press.as_deref().map_or(true, |p| p == subdomain))
            .map(|(id, w)| (id.clone(), w.clone()))
            .collect();
        Self { works }
    }

    pub fn get(&self, id: &str) -> Option<&WorkMetadata> {
        self.works.get(id)
    }

    pub fn len(&self) -> usize {
        self.works.len()
    }

    pub fn is_empty(&self) -> bool {
        self.works.is_empty()
    }
}

impl RightsholderDirectory for WorkStore {
    fn name_for(&self, parent_id: &str) -> Result<Option<String>, DirectoryError> {
        Ok(self.works.get(parent_id).and_then(WorkMetadata::rightsholder_name))
    }

    fn heb_id_for(&self, parent_id: &str) -> Result<Option<String>, DirectoryError> {
        Ok(self.works.get(parent_id).and_then(WorkMetadata::heb_id))
    }

    fn ids_for(&self, rightsholder: &str) -> Result<HashSet<String>, DirectoryError> {
        Ok(self
            .works
            .values()
            .filter(|w| w.rightsholder_name().as_deref() == Some(rightsholder))
            .map(|w| w.id.clone())
            .collect())
    }
}
