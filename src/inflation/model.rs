//! Inflation regression model

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ModelUnavailableError;

/// Inference seam for one-step-ahead inflation models
pub trait InflationModel: Send + Sync + std::fmt::Debug {
    /// Length of the input window
    fn window_len(&self) -> usize;

    /// Next year's inflation rate from a window ordered oldest to newest
    fn predict(&self, window: &[f64]) -> f64;
}

/// Linear autoregression: `intercept + Σ coefficients[i] * window[i]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearInflationModel {
    pub intercept: f64,
    /// One weight per window slot, oldest first
    pub coefficients: Vec<f64>,
}

impl LinearInflationModel {
    pub fn validate(&self) -> Result<(), String> {
        if self.coefficients.is_empty() {
            return Err("model has no coefficients".to_string());
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err("model has non-finite parameters".to_string());
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ModelUnavailableError> {
        let file = File::open(path).map_err(|e| ModelUnavailableError::new(path, e))?;
        let model: LinearInflationModel = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| ModelUnavailableError::new(path, e))?;
        model.validate().map_err(|e| ModelUnavailableError::new(path, e))?;

        log::info!(
            "Loaded inflation model with window {} from {}",
            model.coefficients.len(),
            path.display()
        );
        Ok(model)
    }
}

impl InflationModel for LinearInflationModel {
    fn window_len(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, window: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(window)
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }
}
