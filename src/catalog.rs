//! The in-memory destination catalog and its load-once cache.

use std::sync::{Arc, OnceLock};

use crate::{
    catalog_db::CatalogDb,
    destination::{CatalogRow, Destination},
    error::Result,
};

/// Anything that can hand over the full, unfiltered set of catalog rows.
pub trait CatalogSource {
    fn fetch_rows(&self) -> Result<Vec<CatalogRow>>;
}

impl CatalogSource for CatalogDb {
    fn fetch_rows(&self) -> Result<Vec<CatalogRow>> {
        self.list_rows()
    }
}

impl CatalogSource for Vec<CatalogRow> {
    fn fetch_rows(&self) -> Result<Vec<CatalogRow>> {
        Ok(self.clone())
    }
}

/// Immutable table of destinations, in source order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    destinations: Vec<Destination>,
}

impl Catalog {
    /// Fetch every row from `source` and expand its months.
    pub fn load(source: &impl CatalogSource) -> Result<Self> {
        let rows = source.fetch_rows()?;
        let catalog = Self::from_rows(rows);

        let undated = catalog
            .destinations
            .iter()
            .filter(|d| d.months.is_empty())
            .count();
        tracing::debug!(
            destinations = catalog.len(),
            undated,
            "loaded catalog"
        );
        for dest in catalog
            .destinations
            .iter()
            .filter(|d| !d.unparsed_months.is_empty())
        {
            tracing::warn!(
                name = %dest.name,
                skipped = ?dest.unparsed_months,
                "ignoring unrecognized best-visit months"
            );
        }

        Ok(catalog)
    }

    pub fn from_rows(rows: impl IntoIterator<Item = CatalogRow>) -> Self {
        Self {
            destinations: rows.into_iter().map(Destination::from_row).collect(),
        }
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    /// Distinct non-empty categories, in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        distinct(self.destinations.iter().filter_map(|d| d.category.as_deref()))
    }

    /// Distinct non-empty states, in order of first appearance.
    pub fn regions(&self) -> Vec<&str> {
        distinct(self.destinations.iter().map(|d| d.state.as_str()))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = std::collections::HashSet::new();
    values
        .map(str::trim)
        .filter(|v| !v.is_empty() && seen.insert(*v))
        .collect()
}

/// Loads the catalog from its source on first use and keeps it for the
/// lifetime of the cache.
///
/// The cache is meant to be owned by the application's entry point and
/// handed to whoever needs the catalog; there is no invalidation.
pub struct CatalogCache<S> {
    source: S,
    catalog: OnceLock<Arc<Catalog>>,
}

impl<S: CatalogSource> CatalogCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            catalog: OnceLock::new(),
        }
    }

    /// Return the cached catalog, loading it on the first call.
    ///
    /// A failed load is not cached; the next call tries again.
    pub fn get(&self) -> Result<Arc<Catalog>> {
        if let Some(catalog) = self.catalog.get() {
            return Ok(Arc::clone(catalog));
        }
        let loaded = Arc::new(Catalog::load(&self.source)?);
        Ok(Arc::clone(self.catalog.get_or_init(|| loaded)))
    }

    pub fn is_loaded(&self) -> bool {
        self.catalog.get().is_some()
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
