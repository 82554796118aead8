//! Category-to-code mapping table
//!
//! The trained models only see integers, so every categorical feature value is
//! replaced by the code it was label-encoded with at training time. A `?` row
//! acts as the per-feature code for unknown values.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{MappingNotFoundError, ModelUnavailableError};

/// Category value that stands for "unknown" within a feature
pub const WILDCARD_CATEGORY: &str = "?";

/// Codes for one feature, remembering table order for diagnostics
#[derive(Debug, Clone, Default)]
struct FeatureCategories {
    codes: HashMap<String, i64>,
    order: Vec<String>,
}

/// Raw CSV row of mapping.csv
#[derive(Debug, serde::Deserialize)]
struct MappingRow {
    column: String,
    category: String,
    encoded_value: i64,
}

/// Read-only (feature, category) -> code table
#[derive(Debug, Clone, Default)]
pub struct CategoryMappingTable {
    features: HashMap<String, FeatureCategories>,
}

impl CategoryMappingTable {
    /// Build a table from (feature, category, code) entries. A repeated
    /// (feature, category) pair keeps its first code.
    pub fn from_entries<I, F, C>(entries: I) -> Self
    where
        I: IntoIterator<Item = (F, C, i64)>,
        F: Into<String>,
        C: Into<String>,
    {
        let mut features: HashMap<String, FeatureCategories> = HashMap::new();
        for (feature, category, code) in entries {
            let slot = features.entry(feature.into()).or_default();
            let category = category.into();
            if !slot.codes.contains_key(&category) {
                slot.order.push(category.clone());
                slot.codes.insert(category, code);
            }
        }
        Self { features }
    }

    /// Load the table from a `column,category,encoded_value` CSV file
    pub fn load(path: &Path) -> Result<Self, ModelUnavailableError> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| ModelUnavailableError::new(path, e))?;

        let mut entries = Vec::new();
        for result in reader.deserialize() {
            let row: MappingRow = result.map_err(|e| ModelUnavailableError::new(path, e))?;
            entries.push((row.column, row.category, row.encoded_value));
        }

        if entries.is_empty() {
            return Err(ModelUnavailableError::new(path, "mapping table is empty"));
        }

        let table = Self::from_entries(entries);
        log::info!(
            "Loaded category mapping for {} features from {}",
            table.features.len(),
            path.display()
        );
        Ok(table)
    }

    /// Resolve a category value to its integer code.
    ///
    /// Exact match first, then the feature's `?` code. Neither present is an
    /// error listing every known value of the feature.
    pub fn resolve(&self, feature: &str, value: &str) -> Result<i64, MappingNotFoundError> {
        let categories = self.features.get(feature);

        if let Some(code) = categories.and_then(|c| c.codes.get(value)) {
            return Ok(*code);
        }

        if let Some(code) = categories.and_then(|c| c.codes.get(WILDCARD_CATEGORY)) {
            // Silent substitution can hide data-quality problems upstream
            log::warn!(
                "No code for {}='{}', falling back to '{}' code {}",
                feature, value, WILDCARD_CATEGORY, code
            );
            return Ok(*code);
        }

        Err(MappingNotFoundError {
            feature: feature.to_string(),
            value: value.to_string(),
            available: categories.map(|c| c.order.clone()).unwrap_or_default(),
        })
    }

    /// Known category values of a feature, in table order
    pub fn categories(&self, feature: &str) -> &[String] {
        self.features
            .get(feature)
            .map(|c| c.order.as_slice())
            .unwrap_or(&[])
    }
}
