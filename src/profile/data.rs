//! Contribution and demographic profiles for a single projection request

use serde::{Deserialize, Serialize};

use crate::error::TimelineError;

/// Gender used for the life-expectancy lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    /// Infer gender from a free-text label by prefix, case-insensitive.
    /// `female...` and the Polish `kobieta...` map to Female, anything else to Male.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_lowercase();
        if label.starts_with("female") || label.starts_with("kobieta") {
            Gender::Female
        } else {
            Gender::Male
        }
    }
}

/// Raw projection request as delivered by the HTTP layer or a batch file.
/// Optional fields are normalized by the orchestrator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PensionRequest {
    pub user_id: String,

    /// Current monthly income
    pub current_income: f64,

    /// Gender label, e.g. "female" / "male" / "Kobieta"
    pub gender: String,

    pub birth_year: i32,

    #[serde(default)]
    pub birth_month: u32,

    /// Retirement age in whole years (65 when absent)
    #[serde(default)]
    pub retirement_age_years: Option<u32>,

    #[serde(default)]
    pub retirement_age_months: Option<u32>,

    /// First calendar year of employment
    #[serde(default)]
    pub start_work_year: Option<i32>,

    // Capital components
    #[serde(default)]
    pub total_contributions: Option<f64>,
    #[serde(default)]
    pub capital: Option<f64>,
    #[serde(default)]
    pub subaccount: Option<f64>,

    /// Contributions paid per year (defaults to a share of annual income)
    #[serde(default)]
    pub yearly_contributions: Option<f64>,

    /// Monthly pension the user would like to receive
    #[serde(default)]
    pub desired_monthly_pension: Option<f64>,
}

/// Capital accumulated so far plus the yearly contribution flow
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContributionProfile {
    pub total_contributions: f64,
    pub capital: f64,
    pub subaccount: f64,
    pub yearly_contributions: f64,
    pub current_income: f64,
}

impl ContributionProfile {
    /// Starting capital for the projection
    pub fn starting_capital(&self) -> f64 {
        self.total_contributions + self.capital + self.subaccount
    }
}

/// Who is retiring, and when
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemographicProfile {
    pub gender: Gender,
    pub birth_year: i32,
    pub birth_month: u32,
    pub retirement_age_years: u32,
    pub retirement_age_months: u32,
    pub start_work_year: Option<i32>,
}

impl DemographicProfile {
    /// Calendar year in which the retirement age is reached
    pub fn retirement_year(&self) -> Result<i32, TimelineError> {
        let age = i32::try_from(self.retirement_age_years)
            .map_err(|_| TimelineError::RetirementAgeOutOfRange(self.retirement_age_years))?;
        self.birth_year
            .checked_add(age)
            .ok_or(TimelineError::YearOutOfRange(self.birth_year))
    }

    /// Whole years left until retirement, never negative
    pub fn years_until_retirement(&self, current_year: i32) -> Result<u32, TimelineError> {
        self.years_from(current_year)
    }

    /// Years between first employment and retirement
    pub fn years_worked(&self) -> Result<Option<u32>, TimelineError> {
        self.start_work_year
            .map(|start| self.years_from(start))
            .transpose()
    }

    fn years_from(&self, year: i32) -> Result<u32, TimelineError> {
        let years = self
            .retirement_year()?
            .checked_sub(year)
            .ok_or(TimelineError::YearOutOfRange(self.birth_year))?;
        Ok(years.max(0).unsigned_abs())
    }
}

impl PensionRequest {
    /// Normalize the capital fields. Missing components default to 0; missing
    /// yearly contributions default to `savings_fraction` of annual income.
    pub fn contribution_profile(&self, savings_fraction: f64) -> ContributionProfile {
        ContributionProfile {
            total_contributions: self.total_contributions.unwrap_or(0.0),
            capital: self.capital.unwrap_or(0.0),
            subaccount: self.subaccount.unwrap_or(0.0),
            yearly_contributions: self
                .yearly_contributions
                .unwrap_or(self.current_income * 12.0 * savings_fraction),
            current_income: self.current_income,
        }
    }

    /// Normalize the demographic fields, applying the default retirement age
    pub fn demographic_profile(&self, default_retirement_age: u32) -> DemographicProfile {
        DemographicProfile {
            gender: Gender::from_label(&self.gender),
            birth_year: self.birth_year,
            birth_month: self.birth_month,
            retirement_age_years: self.retirement_age_years.unwrap_or(default_retirement_age),
            retirement_age_months: self.retirement_age_months.unwrap_or(0),
            start_work_year: self.start_work_year,
        }
    }
}
