//! Error types shared across the forecasting core
//!
//! Categorical-mapping and feature-building failures are caller input errors and
//! carry everything needed to fix the input. Artifact failures are startup-fatal.

use std::path::PathBuf;

/// A categorical value with no code in the mapping table and no `?` wildcard
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Value '{value}' not found for feature '{feature}'. Available values: {available:?}")]
pub struct MappingNotFoundError {
    /// Feature (column) name, e.g. `occupation`
    pub feature: String,
    /// The offending category value
    pub value: String,
    /// Every category value known for the feature, in table order
    pub available: Vec<String>,
}

/// Feature-vector assembly failed on one of the categorical fields
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot build feature vector: field '{field}': {source}")]
pub struct FeatureBuildError {
    /// Record field whose category could not be resolved
    pub field: &'static str,
    #[source]
    pub source: MappingNotFoundError,
}

/// A model or table artifact is missing or malformed
#[derive(Debug, thiserror::Error)]
#[error("model artifact '{}' unavailable: {reason}", .artifact.display())]
pub struct ModelUnavailableError {
    pub artifact: PathBuf,
    pub reason: String,
}

impl ModelUnavailableError {
    pub fn new(artifact: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self {
            artifact: artifact.into(),
            reason: reason.to_string(),
        }
    }
}

/// A saver's dates cannot produce a usable projection horizon
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimelineError {
    #[error("retirement age {0} years is out of range")]
    RetirementAgeOutOfRange(u32),
    #[error("retirement year is out of range for birth year {0}")]
    YearOutOfRange(i32),
    #[error("{years} years until retirement exceeds the limit of {max}")]
    HorizonTooLong { years: u32, max: u32 },
}
