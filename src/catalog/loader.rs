/// Move catalog loader
///
/// Reads the tabular catalog (CSV with at least `id, name, type, category,
/// power, accuracy, pp`) into a `Catalog`. Extra columns are ignored.
/// Loading has no effect on challenge progress.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::task;
use tracing::{debug, info};

use super::{Catalog, Item, StatCell};
use crate::error::{Result, TrackerError};

/// Columns every catalog source must provide
const REQUIRED_COLUMNS: [&str; 7] = ["id", "name", "type", "category", "power", "accuracy", "pp"];

/// One raw CSV row, every cell still text
#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: String,
    name: String,
    #[serde(rename = "type")]
    kind: String,
    category: String,
    power: String,
    accuracy: String,
    pp: String,
}

impl CatalogRow {
    fn into_item(self, line: u64) -> Result<Item> {
        let id = self.id.trim().parse::<u32>().map_err(|_| {
            TrackerError::CatalogMalformed(format!("line {}: id {:?} is not a positive integer", line, self.id))
        })?;

        Ok(Item {
            id,
            name: self.name.trim().to_string(),
            kind: self.kind.trim().to_string(),
            category: self.category.trim().to_string(),
            power: StatCell::parse(&self.power),
            accuracy: StatCell::parse_percentage(&self.accuracy),
            pp: StatCell::parse(&self.pp),
        })
    }
}

/// Load the catalog from a CSV file
///
/// # Errors
/// * `CatalogNotFound` - the path does not exist
/// * `CatalogMalformed` - a required column is missing, a row cannot be
///   parsed, or the ids are not exactly 1..=N
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    if !path.exists() {
        return Err(TrackerError::CatalogNotFound(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(|e| TrackerError::CatalogMalformed(e.to_string()))?;

    let headers = reader
        .headers()
        .map_err(|e| TrackerError::CatalogMalformed(e.to_string()))?
        .clone();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h.trim_start_matches('\u{feff}') == *column))
        .collect();
    if !missing.is_empty() {
        return Err(TrackerError::CatalogMalformed(format!(
            "missing column(s): {}",
            missing.join(", ")
        )));
    }

    let mut items = Vec::new();
    for (index, row) in reader.deserialize::<CatalogRow>().enumerate() {
        // Header is line 1
        let line = index as u64 + 2;
        let row = row.map_err(|e| TrackerError::CatalogMalformed(format!("line {}: {}", line, e)))?;
        items.push(row.into_item(line)?);
    }

    items.sort_by_key(|item| item.id);
    for (index, item) in items.iter().enumerate() {
        let expected = index as u32 + 1;
        if item.id != expected {
            return Err(TrackerError::CatalogMalformed(format!(
                "ids must be dense from 1: expected {}, found {}",
                expected, item.id
            )));
        }
        debug!("catalog #{} {}", item.id, item.name);
    }

    info!("Loaded {} moves from {}", items.len(), path.display());
    Ok(Catalog::from_sorted(items))
}

/// Load the catalog off the UI thread
pub async fn load_catalog_async(path: PathBuf) -> std::result::Result<Catalog, String> {
    task::spawn_blocking(move || load_catalog(&path).map_err(String::from))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
}
