//! Model artifacts loaded once at process start
//!
//! Everything here is read-only after loading and shared by reference across
//! requests. A missing or malformed artifact is fatal: callers abort startup
//! rather than serve without a model.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::classifier::{CategoryMappingTable, PensionTierClassifier, RandomForest};
use crate::error::ModelUnavailableError;
use crate::inflation::{InflationForecaster, InflationHistory, LinearInflationModel};

/// Default path to the artifacts directory
pub const DEFAULT_ARTIFACTS_PATH: &str = "data/model";

/// Environment variable overriding the artifacts directory
pub const ARTIFACTS_DIR_ENV: &str = "PENSION_ARTIFACTS_DIR";

pub const MAPPING_FILE: &str = "mapping.csv";
pub const INFLATION_HISTORY_FILE: &str = "inflation_history.txt";
pub const INFLATION_MODEL_FILE: &str = "inflation_model.json";
pub const TIER_MODEL_FILE: &str = "tier_model.json";

/// Artifacts directory from the environment, falling back to the default
pub fn artifacts_dir_from_env() -> PathBuf {
    std::env::var_os(ARTIFACTS_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACTS_PATH))
}

/// All loaded artifacts
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub mapping: Arc<CategoryMappingTable>,
    pub tier_model: Arc<RandomForest>,
    pub inflation_model: Arc<LinearInflationModel>,
    pub inflation_history: InflationHistory,
}

impl ModelArtifacts {
    /// Load all artifacts from the default path
    pub fn load_default() -> Result<Self, ModelUnavailableError> {
        Self::load_from(Path::new(DEFAULT_ARTIFACTS_PATH))
    }

    /// Load all artifacts from a specific directory
    pub fn load_from(path: &Path) -> Result<Self, ModelUnavailableError> {
        log::info!("Loading model artifacts from {}", path.display());
        Ok(Self {
            mapping: Arc::new(CategoryMappingTable::load(&path.join(MAPPING_FILE))?),
            tier_model: Arc::new(RandomForest::load(&path.join(TIER_MODEL_FILE))?),
            inflation_model: Arc::new(LinearInflationModel::load(&path.join(INFLATION_MODEL_FILE))?),
            inflation_history: InflationHistory::load(&path.join(INFLATION_HISTORY_FILE))?,
        })
    }

    pub fn tier_classifier(&self) -> Result<PensionTierClassifier, ModelUnavailableError> {
        PensionTierClassifier::new(self.tier_model.clone(), self.mapping.clone())
    }

    pub fn inflation_forecaster(&self) -> Result<InflationForecaster, ModelUnavailableError> {
        InflationForecaster::new(self.inflation_model.clone(), &self.inflation_history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{PensionRecord, PensionTier};

    fn fixture_record() -> PensionRecord {
        PensionRecord {
            age: 35,
            workclass: "Never-worked".to_string(),
            fnlwgt: 200_000,
            education: "Bachelors".to_string(),
            education_num: 13,
            marital_status: "Never-married".to_string(),
            occupation: "Prof-specialty".to_string(),
            relationship: "Not-in-family".to_string(),
            race: "White".to_string(),
            sex: "Male".to_string(),
            capital_gain: 0,
            capital_loss: 0,
            hours_per_week: 40,
            income: "<=50K".to_string(),
            native_country: "United-States".to_string(),
        }
    }

    #[test]
    fn test_load_default_artifacts() {
        let artifacts = ModelArtifacts::load_default();
        assert!(artifacts.is_ok(), "Failed to load artifacts: {:?}", artifacts.err());

        let artifacts = artifacts.unwrap();
        assert!(artifacts.inflation_history.len() >= artifacts.inflation_model.coefficients.len());
        assert!(!artifacts.tier_model.trees.is_empty());
    }

    #[test]
    fn test_fixture_record_tier() {
        let classifier = ModelArtifacts::load_default().unwrap().tier_classifier().unwrap();
        for _ in 0..3 {
            assert_eq!(classifier.classify(&fixture_record()), Ok(PensionTier::Medium));
        }
    }

    #[test]
    fn test_high_earner_tier() {
        let classifier = ModelArtifacts::load_default().unwrap().tier_classifier().unwrap();
        let mut record = fixture_record();
        record.income = ">50K".to_string();
        record.capital_gain = 15_000;
        assert_eq!(classifier.classify(&record), Ok(PensionTier::High));
    }

    #[test]
    fn test_default_forecast_is_finite() {
        let forecaster = ModelArtifacts::load_default().unwrap().inflation_forecaster().unwrap();
        let path: Vec<f64> = forecaster.forecast(30).collect();
        assert_eq!(path.len(), 30);
        assert!(path.iter().all(|r| r.is_finite() && *r > -5.0 && *r < 20.0));
    }

    #[test]
    fn test_missing_directory_is_unavailable() {
        let err = ModelArtifacts::load_from(Path::new("no/such/dir")).unwrap_err();
        assert!(err.artifact.ends_with(MAPPING_FILE));
    }
}
