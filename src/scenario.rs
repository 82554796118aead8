//! Batch runner for many projection requests
//!
//! Artifacts are loaded once up front; each request is then projected
//! independently, in parallel.

use std::error::Error;
use std::io::Write;

use rayon::prelude::*;
use serde::Serialize;

use crate::error::TimelineError;
use crate::profile::PensionRequest;
use crate::projection::{PensionResponse, ProjectionOrchestrator};

/// Flat CSV row for one batch result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRow {
    pub user_id: String,
    pub retirement_year: i32,
    pub years_until_retirement: u32,
    pub projected_capital: f64,
    pub estimated_monthly_pension: f64,
    pub replacement_rate_percent: f64,
    pub years_in_retirement: u32,
    pub real_monthly_pension: Option<f64>,
    pub pension_gap: Option<f64>,
    pub advice: String,
}

impl From<&PensionResponse> for BatchRow {
    fn from(response: &PensionResponse) -> Self {
        Self {
            user_id: response.user_id.clone(),
            retirement_year: response.retirement_year,
            years_until_retirement: response.projection.years_until_retirement,
            projected_capital: response.projection.projected_capital,
            estimated_monthly_pension: response.projection.estimated_monthly_pension,
            replacement_rate_percent: response.projection.replacement_rate_percent,
            years_in_retirement: response.projection.years_in_retirement,
            real_monthly_pension: response.real_monthly_pension,
            pension_gap: response.pension_gap,
            advice: response.advice.clone(),
        }
    }
}

/// Pre-built orchestrator shared by every request of a batch
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    orchestrator: ProjectionOrchestrator,
}

impl ScenarioRunner {
    pub fn new(orchestrator: ProjectionOrchestrator) -> Self {
        Self { orchestrator }
    }

    /// Run a single request
    pub fn run(&self, request: &PensionRequest) -> Result<PensionResponse, TimelineError> {
        self.orchestrator.orchestrate(request)
    }

    /// Run all requests in parallel, preserving input order. A rejected
    /// request yields its error in place without stopping the batch.
    pub fn run_batch(&self, requests: &[PensionRequest]) -> Vec<Result<PensionResponse, TimelineError>> {
        requests
            .par_iter()
            .map(|request| self.orchestrator.orchestrate(request))
            .collect()
    }
}

/// Write batch results as CSV
pub fn write_batch_csv<W: Write>(writer: W, responses: &[PensionResponse]) -> Result<(), Box<dyn Error>> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for response in responses {
        csv_writer.serialize(BatchRow::from(response))?;
    }
    csv_writer.flush()?;
    Ok(())
}
