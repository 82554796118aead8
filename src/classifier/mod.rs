//! Pension-tier classification: category mapping, feature vectors, and the tier model

mod features;
mod forest;
mod mapping;
mod tier;

pub use features::{FeatureVectorBuilder, PensionFeatureVector, PensionRecord, FEATURE_COUNT, FEATURE_NAMES};
pub use forest::{DecisionTree, RandomForest, TierModel, TreeNode};
pub use mapping::{CategoryMappingTable, WILDCARD_CATEGORY};
pub use tier::{PensionTier, PensionTierClassifier};
