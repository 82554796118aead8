//! Capital projection engine
//!
//! Compounds the starting capital and yearly contributions forward at the
//! valorization rate, then spreads the capital over the expected years in
//! retirement to estimate a monthly pension.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::result::{round2, ProjectionResult};
use crate::profile::{ContributionProfile, Gender};

/// Default annual valorization rate
pub const DEFAULT_VALORIZATION_RATE: f64 = 0.045;
pub const DEFAULT_RETIREMENT_AGE: u32 = 65;
/// Share of annual income assumed saved when yearly contributions are not given
pub const DEFAULT_SAVINGS_FRACTION: f64 = 0.2;
pub const MIN_YEARS_IN_RETIREMENT: u32 = 15;
/// Longest accepted horizon between the reference year and retirement
pub const MAX_YEARS_UNTIL_RETIREMENT: u32 = 100;

/// Environment variable enabling the display jitter (`1`, `true` or `yes`)
pub const DISPLAY_JITTER_ENV: &str = "PENSION_DISPLAY_JITTER";

pub const FEMALE_LIFE_EXPECTANCY: u32 = 82;
pub const MALE_LIFE_EXPECTANCY: u32 = 77;

/// Configuration for projection runs
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionConfig {
    /// Annual growth rate applied to accumulated capital
    pub valorization_rate: f64,

    /// Retirement age used when the request does not give one
    pub default_retirement_age: u32,

    /// Fraction of annual income used as the default yearly contribution
    pub savings_fraction: f64,

    /// Floor on the years the capital is spread over
    pub min_years_in_retirement: u32,

    /// Requests retiring further out than this are rejected
    pub max_years_until_retirement: u32,

    /// Random display adjustment of the pension figures. Off unless asked for.
    pub display_jitter: Option<DisplayJitter>,

    /// Calendar year treated as "now" (current year when None)
    pub reference_year: Option<i32>,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            valorization_rate: DEFAULT_VALORIZATION_RATE,
            default_retirement_age: DEFAULT_RETIREMENT_AGE,
            savings_fraction: DEFAULT_SAVINGS_FRACTION,
            min_years_in_retirement: MIN_YEARS_IN_RETIREMENT,
            max_years_until_retirement: MAX_YEARS_UNTIL_RETIREMENT,
            display_jitter: None,
            reference_year: None,
        }
    }
}

impl ProjectionConfig {
    /// Defaults, with the display jitter switched on by the environment
    pub fn from_env() -> Self {
        let jitter = std::env::var(DISPLAY_JITTER_ENV)
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Self {
            display_jitter: jitter.then(DisplayJitter::default),
            ..Default::default()
        }
    }
}

/// Non-deterministic display adjustment: scales the final monthly pension and
/// replacement rate by independent uniform factors in `[1 - spread, 1 + spread]`.
/// Not part of the financial computation; keep it off wherever results must
/// be reproducible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayJitter {
    pub spread: f64,
    /// Fixed seed for repeatable output
    pub seed: Option<u64>,
}

impl Default for DisplayJitter {
    fn default() -> Self {
        Self { spread: 0.03, seed: None }
    }
}

impl DisplayJitter {
    fn apply(&self, pension: f64, replacement_rate: f64) -> (f64, f64) {
        match self.seed {
            Some(seed) => self.scale(&mut StdRng::seed_from_u64(seed), pension, replacement_rate),
            None => self.scale(&mut rand::thread_rng(), pension, replacement_rate),
        }
    }

    fn scale<R: Rng>(&self, rng: &mut R, pension: f64, replacement_rate: f64) -> (f64, f64) {
        let spread = self.spread.abs();
        let range = (1.0 - spread)..=(1.0 + spread);
        (
            pension * rng.gen_range(range.clone()),
            replacement_rate * rng.gen_range(range),
        )
    }
}

/// Inputs for a single projection, already normalized
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionParams {
    pub contributions: ContributionProfile,
    pub yearly_contribution: f64,
    pub valorization_rate: f64,
    pub years_until_retirement: u32,
    pub gender: Gender,
    pub retirement_age_years: u32,
    /// Current monthly income
    pub current_income: f64,
}

/// Grow capital year by year. Each year the principal grows first, then the
/// year's contribution is added grown by one period.
pub fn accumulate_capital(starting_capital: f64, yearly_contribution: f64, valorization_rate: f64, years: u32) -> f64 {
    let growth = 1.0 + valorization_rate;
    let mut capital = starting_capital;
    for _ in 0..years {
        capital *= growth;
        capital += yearly_contribution * growth;
    }
    capital
}

pub fn life_expectancy(gender: Gender) -> u32 {
    match gender {
        Gender::Female => FEMALE_LIFE_EXPECTANCY,
        Gender::Male => MALE_LIFE_EXPECTANCY,
    }
}

/// Main projection engine
#[derive(Debug, Clone, Default)]
pub struct CapitalProjectionEngine {
    config: ProjectionConfig,
}

impl CapitalProjectionEngine {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Years the capital is paid out over, never below the configured floor
    pub fn years_in_retirement(&self, gender: Gender, retirement_age_years: u32) -> u32 {
        life_expectancy(gender)
            .saturating_sub(retirement_age_years)
            .max(self.config.min_years_in_retirement)
    }

    pub fn project(&self, params: &ProjectionParams) -> ProjectionResult {
        let capital = accumulate_capital(
            params.contributions.starting_capital(),
            params.yearly_contribution,
            params.valorization_rate,
            params.years_until_retirement,
        );

        let years_in_retirement = self.years_in_retirement(params.gender, params.retirement_age_years);

        let monthly_pension = if years_in_retirement == 0 {
            0.0
        } else {
            capital / (years_in_retirement as f64 * 12.0)
        };

        let replacement_rate = if params.current_income > 0.0 {
            monthly_pension / params.current_income * 100.0
        } else {
            0.0
        };

        let (monthly_pension, replacement_rate) = match &self.config.display_jitter {
            Some(jitter) => jitter.apply(monthly_pension, replacement_rate),
            None => (monthly_pension, replacement_rate),
        };

        log::debug!(
            "Projected {} years at {:.4}: capital {:.2}, pension {:.2}/month over {} years",
            params.years_until_retirement,
            params.valorization_rate,
            capital,
            monthly_pension,
            years_in_retirement
        );

        ProjectionResult {
            years_until_retirement: params.years_until_retirement,
            projected_capital: round2(capital),
            estimated_monthly_pension: round2(monthly_pension),
            replacement_rate_percent: round2(replacement_rate),
            years_in_retirement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn contributions(total: f64, capital: f64, subaccount: f64) -> ContributionProfile {
        ContributionProfile {
            total_contributions: total,
            capital,
            subaccount,
            yearly_contributions: 0.0,
            current_income: 0.0,
        }
    }

    fn example_params() -> ProjectionParams {
        ProjectionParams {
            contributions: contributions(100_000.0, 50_000.0, 10_000.0),
            yearly_contribution: 12_000.0,
            valorization_rate: 0.045,
            years_until_retirement: 2,
            gender: Gender::Female,
            retirement_age_years: 65,
            current_income: 5_000.0,
        }
    }

    #[test]
    fn test_example_compounding() {
        // Year 1: 160000*1.045 + 12000*1.045 = 179940
        assert_relative_eq!(accumulate_capital(160_000.0, 12_000.0, 0.045, 1), 179_940.0, epsilon = 1e-6);
        // Year 2: 179940*1.045 + 12540 = 200576.3
        assert_relative_eq!(accumulate_capital(160_000.0, 12_000.0, 0.045, 2), 200_576.3, epsilon = 1e-6);
    }

    #[test]
    fn test_example_projection() {
        let result = CapitalProjectionEngine::default().project(&example_params());
        assert_eq!(result.years_until_retirement, 2);
        assert_eq!(result.projected_capital, 200_576.3);
        // Female, 82 - 65 = 17 years
        assert_eq!(result.years_in_retirement, 17);
        // 200576.3 / 204 = 983.2171...
        assert_eq!(result.estimated_monthly_pension, 983.22);
        assert_eq!(result.replacement_rate_percent, 19.66);
    }

    #[test]
    fn test_compounding_order_matters() {
        // Adding each contribution without its period of growth
        let reversed = (160_000.0 * 1.045 + 12_000.0) * 1.045 + 12_000.0;
        let actual = accumulate_capital(160_000.0, 12_000.0, 0.045, 2);
        assert!((actual - reversed).abs() > 100.0);
    }

    #[test]
    fn test_zero_years_returns_starting_capital() {
        let mut params = example_params();
        params.years_until_retirement = 0;
        let result = CapitalProjectionEngine::default().project(&params);
        assert_eq!(result.projected_capital, 160_000.0);
    }

    #[test]
    fn test_zero_income_guard() {
        let mut params = example_params();
        params.current_income = 0.0;
        let result = CapitalProjectionEngine::default().project(&params);
        assert_eq!(result.replacement_rate_percent, 0.0);
        assert!(result.estimated_monthly_pension > 0.0);
    }

    #[test]
    fn test_years_in_retirement_floor() {
        let engine = CapitalProjectionEngine::default();
        assert_eq!(engine.years_in_retirement(Gender::Male, 65), 15);
        assert_eq!(engine.years_in_retirement(Gender::Male, 60), 17);
        assert_eq!(engine.years_in_retirement(Gender::Female, 60), 22);
        assert_eq!(engine.years_in_retirement(Gender::Female, 90), 15);
    }

    #[test]
    fn test_zero_years_in_retirement_guard() {
        let engine = CapitalProjectionEngine::new(ProjectionConfig {
            min_years_in_retirement: 0,
            ..Default::default()
        });
        let mut params = example_params();
        params.retirement_age_years = 90;
        let result = engine.project(&params);
        assert_eq!(result.years_in_retirement, 0);
        assert_eq!(result.estimated_monthly_pension, 0.0);
        assert_eq!(result.replacement_rate_percent, 0.0);
    }

    #[test]
    fn test_jitter_stays_in_band() {
        let baseline = CapitalProjectionEngine::default().project(&example_params());
        let engine = CapitalProjectionEngine::new(ProjectionConfig {
            display_jitter: Some(DisplayJitter::default()),
            ..Default::default()
        });
        for _ in 0..20 {
            let result = engine.project(&example_params());
            assert_eq!(result.projected_capital, baseline.projected_capital);
            let ratio = result.estimated_monthly_pension / baseline.estimated_monthly_pension;
            assert!((0.97 - 1e-3..=1.03 + 1e-3).contains(&ratio), "ratio {}", ratio);
        }
    }

    #[test]
    fn test_seeded_jitter_is_repeatable() {
        let engine = CapitalProjectionEngine::new(ProjectionConfig {
            display_jitter: Some(DisplayJitter { spread: 0.03, seed: Some(7) }),
            ..Default::default()
        });
        assert_eq!(engine.project(&example_params()), engine.project(&example_params()));
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_years_in_retirement_never_below_floor(age in 0u32..130, female in any::<bool>()) {
            let gender = if female { Gender::Female } else { Gender::Male };
            prop_assert!(CapitalProjectionEngine::default().years_in_retirement(gender, age) >= 15);
        }

        #[test]
        fn prop_zero_horizon_is_identity(
            total in 0u32..1_000_000,
            capital in 0u32..1_000_000,
            subaccount in 0u32..1_000_000,
            rate_bp in 0u32..2_000,
            yearly in 0u32..100_000,
        ) {
            let mut params = example_params();
            params.contributions = contributions(total as f64, capital as f64, subaccount as f64);
            params.valorization_rate = rate_bp as f64 / 10_000.0;
            params.yearly_contribution = yearly as f64;
            params.years_until_retirement = 0;
            let result = CapitalProjectionEngine::default().project(&params);
            prop_assert_eq!(result.projected_capital, (total + capital + subaccount) as f64);
        }

        #[test]
        fn prop_zero_income_has_zero_replacement_rate(
            capital in 0u32..2_000_000,
            years in 0u32..50,
            age in 50u32..80,
        ) {
            let mut params = example_params();
            params.contributions = contributions(0.0, capital as f64, 0.0);
            params.years_until_retirement = years;
            params.retirement_age_years = age;
            params.current_income = 0.0;
            let result = CapitalProjectionEngine::default().project(&params);
            prop_assert_eq!(result.replacement_rate_percent, 0.0);
            prop_assert!(result.estimated_monthly_pension.is_finite());
        }

        #[test]
        fn prop_capital_increases_with_valorization_rate(
            start in 1u32..1_000_000,
            yearly in 0u32..50_000,
            years in 1u32..45,
            rate_bp in 0u32..1_500,
            step_bp in 1u32..500,
        ) {
            let low = rate_bp as f64 / 10_000.0;
            let high = (rate_bp + step_bp) as f64 / 10_000.0;
            let low_capital = accumulate_capital(start as f64, yearly as f64, low, years);
            let high_capital = accumulate_capital(start as f64, yearly as f64, high, years);
            prop_assert!(high_capital > low_capital);
        }
    }
}
