//! Pension-tier classification

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::features::{FeatureVectorBuilder, PensionRecord, FEATURE_COUNT};
use super::forest::TierModel;
use super::mapping::CategoryMappingTable;
use crate::error::{FeatureBuildError, ModelUnavailableError};

/// Coarse pension level predicted by the tier model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PensionTier {
    High,
    Low,
    Medium,
    Unknown,
}

impl PensionTier {
    /// Map a raw model class id. Ids outside the trained label set are Unknown.
    pub fn from_class_id(class: i64) -> Self {
        match class {
            0 => PensionTier::High,
            1 => PensionTier::Low,
            2 => PensionTier::Medium,
            _ => PensionTier::Unknown,
        }
    }
}

/// Tier model plus the mapping table its inputs were encoded with
#[derive(Debug, Clone)]
pub struct PensionTierClassifier {
    model: Arc<dyn TierModel>,
    mapping: Arc<CategoryMappingTable>,
}

impl PensionTierClassifier {
    /// Pair a model with its mapping table; the model must take the full vector
    pub fn new(
        model: Arc<dyn TierModel>,
        mapping: Arc<CategoryMappingTable>,
    ) -> Result<Self, ModelUnavailableError> {
        if model.n_features() != FEATURE_COUNT {
            return Err(ModelUnavailableError::new(
                "tier model",
                format!("expects {} features, vector has {}", model.n_features(), FEATURE_COUNT),
            ));
        }
        Ok(Self { model, mapping })
    }

    pub fn classify(&self, record: &PensionRecord) -> Result<PensionTier, FeatureBuildError> {
        let vector = FeatureVectorBuilder::new(&self.mapping).build(record)?;
        let class = self.model.predict(vector.as_slice());
        let tier = PensionTier::from_class_id(class);
        log::debug!("Classified record (age {}) as class {} -> {:?}", record.age, class, tier);
        Ok(tier)
    }
}
