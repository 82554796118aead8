//! Request normalization and response packaging around the projection engine

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::engine::{CapitalProjectionEngine, ProjectionConfig, ProjectionParams};
use super::result::{round2, CoverageAdvice, ProjectionResult};
use crate::error::TimelineError;
use crate::inflation::{price_level_factor, InflationForecaster};
use crate::profile::PensionRequest;

/// Full response for one projection request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PensionResponse {
    // Echoed identity and demographics
    pub user_id: String,
    pub gender: String,
    pub birth_year: i32,
    pub birth_month: u32,
    pub retirement_age_years: u32,
    pub retirement_age_months: u32,

    pub retirement_year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years_worked: Option<u32>,

    #[serde(flatten)]
    pub projection: ProjectionResult,

    pub coverage: CoverageAdvice,
    pub advice: String,

    /// Forecast annual inflation (percent) for each year until retirement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected_inflation_percent: Option<Vec<f64>>,

    /// Monthly pension in today's money
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_monthly_pension: Option<f64>,

    /// Shortfall against the desired monthly pension
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pension_gap: Option<f64>,
}

/// Turns raw requests into engine parameters and engine results into responses
#[derive(Debug, Clone)]
pub struct ProjectionOrchestrator {
    engine: CapitalProjectionEngine,
    forecaster: Option<InflationForecaster>,
}

impl ProjectionOrchestrator {
    pub fn new(config: ProjectionConfig) -> Self {
        Self {
            engine: CapitalProjectionEngine::new(config),
            forecaster: None,
        }
    }

    /// Also report the inflation path and the inflation-adjusted pension
    pub fn with_forecaster(mut self, forecaster: InflationForecaster) -> Self {
        self.forecaster = Some(forecaster);
        self
    }

    pub fn config(&self) -> &ProjectionConfig {
        self.engine.config()
    }

    fn current_year(&self) -> i32 {
        self.config()
            .reference_year
            .unwrap_or_else(|| chrono::Local::now().year())
    }

    /// Run one request end to end. Fails when the request's dates give no
    /// representable retirement year or retire beyond the configured horizon.
    pub fn orchestrate(&self, request: &PensionRequest) -> Result<PensionResponse, TimelineError> {
        let config = self.config();
        let contributions = request.contribution_profile(config.savings_fraction);
        let demographics = request.demographic_profile(config.default_retirement_age);
        let retirement_year = demographics.retirement_year()?;
        let years_worked = demographics.years_worked()?;
        let years_until_retirement = demographics.years_until_retirement(self.current_year())?;
        if years_until_retirement > config.max_years_until_retirement {
            return Err(TimelineError::HorizonTooLong {
                years: years_until_retirement,
                max: config.max_years_until_retirement,
            });
        }

        let projection = self.engine.project(&ProjectionParams {
            contributions,
            yearly_contribution: contributions.yearly_contributions,
            valorization_rate: config.valorization_rate,
            years_until_retirement,
            gender: demographics.gender,
            retirement_age_years: demographics.retirement_age_years,
            current_income: contributions.current_income,
        });

        let coverage = CoverageAdvice::from_replacement_rate(projection.replacement_rate_percent);

        let (projected_inflation_percent, real_monthly_pension) = match &self.forecaster {
            Some(forecaster) => {
                let path: Vec<f64> = forecaster.forecast(years_until_retirement as usize).collect();
                // A price level at or below zero has no meaningful real value
                let factor = price_level_factor(&path);
                let real = (factor > 0.0 && factor.is_finite())
                    .then(|| round2(projection.estimated_monthly_pension / factor));
                (Some(path.into_iter().map(round2).collect()), real)
            }
            None => (None, None),
        };

        let pension_gap = request
            .desired_monthly_pension
            .map(|desired| round2((desired - projection.estimated_monthly_pension).max(0.0)));

        Ok(PensionResponse {
            user_id: request.user_id.clone(),
            gender: request.gender.clone(),
            birth_year: demographics.birth_year,
            birth_month: demographics.birth_month,
            retirement_age_years: demographics.retirement_age_years,
            retirement_age_months: demographics.retirement_age_months,
            retirement_year,
            years_worked,
            projection,
            coverage,
            advice: coverage.message().to_string(),
            projected_inflation_percent,
            real_monthly_pension,
            pension_gap,
        })
    }
}
