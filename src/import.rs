//! Reading catalog rows from a JSON export.

use std::path::Path;

use crate::{
    destination::CatalogRow,
    error::{Error, Result},
};

/// Read a JSON array of catalog rows from `path`.
///
/// Every row must carry a non-blank `NAME`. Rows are reported 1-based.
pub fn read_rows(path: &Path) -> Result<Vec<CatalogRow>> {
    let text = std::fs::read_to_string(path)?;
    parse_rows(&text)
}

/// Parse catalog rows from JSON text. See [`read_rows`].
pub fn parse_rows(text: &str) -> Result<Vec<CatalogRow>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(text)?;

    let mut rows = Vec::with_capacity(values.len());
    for (i, value) in values.into_iter().enumerate() {
        let row_num = i + 1;
        let name_ok = value
            .get("NAME")
            .and_then(serde_json::Value::as_str)
            .is_some_and(|n| !n.trim().is_empty());
        if !name_ok {
            return Err(Error::InvalidRow {
                row: row_num,
                reason: "missing or blank NAME".into(),
            });
        }

        let row: CatalogRow =
            serde_json::from_value(value).map_err(|e| Error::InvalidRow {
                row: row_num,
                reason: e.to_string(),
            })?;
        rows.push(row);
    }

    tracing::debug!(rows = rows.len(), "parsed catalog rows");
    Ok(rows)
}
