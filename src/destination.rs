use serde::{Deserialize, Serialize};

use crate::months::{self, Expansion, MonthSet};

/// A destination row as it is stored in, and imported into, the catalog.
///
/// Field names follow the catalog's upper-case column names. Only `NAME`
/// is mandatory; every other column may be missing or null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct CatalogRow {
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub best_visit_months: Option<String>,
    #[serde(default)]
    pub opening_time: Option<String>,
    #[serde(default)]
    pub closing_time: Option<String>,
    #[serde(default)]
    pub google_maps_link: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// An in-memory destination with its season already expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Destination {
    pub name: String,
    pub state: String,
    pub category: Option<String>,
    pub description: String,
    pub best_visit_months: String,
    pub opening_time: String,
    pub closing_time: String,
    pub map_link: String,
    pub image_url: String,
    pub months: MonthSet,
    /// Parts of `best_visit_months` that could not be understood.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unparsed_months: Vec<String>,
}

impl Destination {
    /// Build a destination from a catalog row, expanding its months once.
    pub fn from_row(row: CatalogRow) -> Self {
        let Expansion { months, skipped } =
            months::expand(row.best_visit_months.as_deref());

        Self {
            name: row.name,
            state: row.state.unwrap_or_default(),
            category: row.category.filter(|c| !c.trim().is_empty()),
            description: row.description.unwrap_or_default(),
            best_visit_months: row.best_visit_months.unwrap_or_default(),
            opening_time: row.opening_time.unwrap_or_default(),
            closing_time: row.closing_time.unwrap_or_default(),
            map_link: row.google_maps_link.unwrap_or_default(),
            image_url: row.image_url.unwrap_or_default(),
            months,
            unparsed_months: skipped,
        }
    }

    /// Opening hours as `"open - close"`, or `None` when neither is known.
    pub fn timings(&self) -> Option<String> {
        match (self.opening_time.trim(), self.closing_time.trim()) {
            ("", "") => None,
            (open, close) => Some(format!("{open} - {close}")),
        }
    }
}

impl From<CatalogRow> for Destination {
    fn from(row: CatalogRow) -> Self {
        Self::from_row(row)
    }
}
