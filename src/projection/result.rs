//! Projection output structures

use serde::{Deserialize, Serialize};

/// Round a monetary or percentage figure for presentation
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Result of one capital projection, rounded to 2 dp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub years_until_retirement: u32,
    pub projected_capital: f64,
    pub estimated_monthly_pension: f64,
    /// Monthly pension as a percentage of current monthly income
    pub replacement_rate_percent: f64,
    pub years_in_retirement: u32,
}

/// Qualitative reading of the replacement rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageAdvice {
    High,
    Moderate,
    Low,
}

impl CoverageAdvice {
    /// >= 75% high, >= 50% moderate, otherwise low
    pub fn from_replacement_rate(rate_percent: f64) -> Self {
        if rate_percent >= 75.0 {
            CoverageAdvice::High
        } else if rate_percent >= 50.0 {
            CoverageAdvice::Moderate
        } else {
            CoverageAdvice::Low
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            CoverageAdvice::High => "high coverage",
            CoverageAdvice::Moderate => "moderate coverage, consider additional savings",
            CoverageAdvice::Low => "low coverage, strongly recommend additional savings",
        }
    }
}
