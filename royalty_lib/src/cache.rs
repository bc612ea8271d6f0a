//! Memoizing rightsholder directory backed by `DashMap` for concurrent access.

use std::collections::HashSet;

use dashmap::DashMap;

use crate::rightsholder::{DirectoryError, RightsholderDirectory};

/// Wraps a directory and remembers every `name_for` / `heb_id_for` answer.
///
/// A report run asks for the same work id once per row and again for the
/// combined report, so the wrapped store sees each id at most once per
/// lookup kind. Failed lookups are not cached.
pub struct CachedDirectory<D> {
    inner: D,
    names: DashMap<String, Option<String>>,
    heb_ids: DashMap<String, Option<String>>,
}

impl<D: RightsholderDirectory> CachedDirectory<D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            names: DashMap::new(),
            heb_ids: DashMap::new(),
        }
    }

    #[cfg(test)]
    fn inner(&self) -> &D {
        &self.inner
    }

    /// Number of distinct ids with a cached name or hebid.
    #[cfg(test)]
    fn cached_ids(&self) -> usize {
        let mut ids: HashSet<String> = self.names.iter().map(|e| e.key().clone()).collect();
        ids.extend(self.heb_ids.iter().map(|e| e.key().clone()));
        ids.len()
    }
}

fn memoized<F>(
    store: &DashMap<String, Option<String>>,
    key: &str,
    fetch: F,
) -> Result<Option<String>, DirectoryError>
where
    F: FnOnce() -> Result<Option<String>, DirectoryError>,
{
    if let Some(hit) = store.get(key) {
        return Ok(hit.value().clone());
    }
    let value = fetch()?;
    store.insert(key.to_string(), value.clone());
    Ok(value)
}

impl<D: RightsholderDirectory> RightsholderDirectory for CachedDirectory<D> {
    fn name_for(&self, parent_id: &str) -> Result<Option<String>, DirectoryError> {
        memoized(&self.names, parent_id, || self.inner.name_for(parent_id))
    }

    fn heb_id_for(&self, parent_id: &str) -> Result<Option<String>, DirectoryError> {
        memoized(&self.heb_ids, parent_id, || self.inner.heb_id_for(parent_id))
    }

    fn ids_for(&self, rightsholder: &str) -> Result<HashSet<String>, DirectoryError> {
        self.inner.ids_for(rightsholder)
    }
}
