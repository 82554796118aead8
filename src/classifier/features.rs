//! Fixed-order feature vector for the pension-tier model
//!
//! Column order matches the order the model was trained on. Reordering the
//! fields below silently invalidates every prediction.

use serde::{Deserialize, Serialize};

use super::mapping::CategoryMappingTable;
use crate::error::FeatureBuildError;

/// Number of model input features
pub const FEATURE_COUNT: usize = 15;

/// Feature names in model input order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "workclass",
    "fnlwgt",
    "education",
    "education.num",
    "marital.status",
    "occupation",
    "relationship",
    "race",
    "sex",
    "capital.gain",
    "capital.loss",
    "hours.per.week",
    "native.country",
    "income",
];

fn default_native_country() -> String {
    "Poland".to_string()
}

/// Demographic and employment record classified into a pension tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PensionRecord {
    pub age: i64,
    pub workclass: String,
    /// Census sampling weight
    pub fnlwgt: i64,
    pub education: String,
    pub education_num: i64,
    pub marital_status: String,
    pub occupation: String,
    pub relationship: String,
    pub race: String,
    pub sex: String,
    pub capital_gain: i64,
    pub capital_loss: i64,
    pub hours_per_week: i64,
    /// Income bracket label, e.g. `<=50K`
    pub income: String,
    #[serde(default = "default_native_country")]
    pub native_country: String,
}

/// Model input, one slot per entry of `FEATURE_NAMES`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PensionFeatureVector([f64; FEATURE_COUNT]);

impl PensionFeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Value of a named feature
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES.iter().position(|n| *n == name).map(|i| self.0[i])
    }
}

/// Assembles feature vectors, resolving categorical fields through the mapping table
#[derive(Debug, Clone, Copy)]
pub struct FeatureVectorBuilder<'a> {
    mapping: &'a CategoryMappingTable,
}

impl<'a> FeatureVectorBuilder<'a> {
    pub fn new(mapping: &'a CategoryMappingTable) -> Self {
        Self { mapping }
    }

    /// Build the vector. Any unresolvable category fails the whole build.
    pub fn build(&self, record: &PensionRecord) -> Result<PensionFeatureVector, FeatureBuildError> {
        let code = |field: &'static str, value: &str| -> Result<f64, FeatureBuildError> {
            self.mapping
                .resolve(field, value)
                .map(|c| c as f64)
                .map_err(|source| FeatureBuildError { field, source })
        };

        Ok(PensionFeatureVector([
            record.age as f64,
            code("workclass", &record.workclass)?,
            record.fnlwgt as f64,
            code("education", &record.education)?,
            record.education_num as f64,
            code("marital.status", &record.marital_status)?,
            code("occupation", &record.occupation)?,
            code("relationship", &record.relationship)?,
            code("race", &record.race)?,
            code("sex", &record.sex)?,
            record.capital_gain as f64,
            record.capital_loss as f64,
            record.hours_per_week as f64,
            code("native.country", &record.native_country)?,
            code("income", &record.income)?,
        ]))
    }
}
