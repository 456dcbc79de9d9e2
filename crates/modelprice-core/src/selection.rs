use serde::Serialize;
use tracing::debug;

use crate::catalog::CatalogStore;
use crate::error::SelectionError;

/// Model limit for side-by-side comparison.
pub const COMPARISON_LIMIT: usize = 5;

/// Insertion-ordered set of selected model ids.
///
/// Ids are not checked against the catalog when added; unresolvable ids are
/// dropped later, at calculation time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionSet {
    ids: Vec<String>,
    limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderToggle {
    Selected(usize),
    Deselected(usize),
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set that refuses to grow past `limit` entries.
    pub fn bounded(limit: usize) -> Self {
        Self {
            ids: Vec::new(),
            limit: Some(limit),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    fn room_for(&self, extra: usize) -> Result<(), SelectionError> {
        match self.limit {
            Some(limit) if self.ids.len() + extra > limit => {
                Err(SelectionError::CapacityReached { limit })
            }
            _ => Ok(()),
        }
    }

    /// Add `id` if absent. Returns whether the set changed.
    pub fn select(&mut self, id: &str) -> Result<bool, SelectionError> {
        if self.contains(id) {
            return Ok(false);
        }
        self.room_for(1)?;
        self.ids.push(id.to_string());
        Ok(true)
    }

    /// Remove `id` if present. Returns whether the set changed.
    pub fn deselect(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|s| s != id);
        self.ids.len() != before
    }

    /// Flip membership of `id`. Returns `true` when the id is now selected.
    pub fn toggle(&mut self, id: &str) -> Result<bool, SelectionError> {
        if self.deselect(id) {
            Ok(false)
        } else {
            self.select(id)
        }
    }

    /// Add every id in `ids`. On a bounded set nothing is added unless all
    /// of them fit.
    pub fn select_all<'a, I>(&mut self, ids: I) -> Result<usize, SelectionError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut missing: Vec<&str> = Vec::new();
        for id in ids {
            if !self.contains(id) && !missing.contains(&id) {
                missing.push(id);
            }
        }
        self.room_for(missing.len())?;
        self.ids.extend(missing.iter().map(|s| s.to_string()));
        Ok(missing.len())
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn is_provider_fully_selected(&self, provider: &str, catalog: &CatalogStore) -> bool {
        catalog
            .models_by_provider(provider)
            .iter()
            .all(|m| self.contains(&m.id))
    }

    /// All-or-nothing provider toggle: if every model of the provider is
    /// already selected they are all removed, otherwise (none or only some
    /// selected) they are all added.
    pub fn toggle_provider(
        &mut self,
        provider: &str,
        catalog: &CatalogStore,
    ) -> Result<ProviderToggle, SelectionError> {
        let models = catalog.models_by_provider(provider);
        if models.is_empty() {
            debug!(provider, "provider has no models in catalog");
            return Ok(ProviderToggle::Deselected(0));
        }

        if models.iter().all(|m| self.contains(&m.id)) {
            for m in &models {
                self.deselect(&m.id);
            }
            Ok(ProviderToggle::Deselected(models.len()))
        } else {
            self.select_all(models.iter().map(|m| m.id.as_str()))?;
            Ok(ProviderToggle::Selected(models.len()))
        }
    }

    /// Selected ids that do not resolve in `catalog`.
    pub fn stale_ids<'a>(&'a self, catalog: &CatalogStore) -> Vec<&'a str> {
        self.iter().filter(|id| !catalog.contains_model(id)).collect()
    }
}
