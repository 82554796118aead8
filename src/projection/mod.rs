//! Capital projection engine and request orchestration

mod engine;
mod orchestrator;
mod result;

pub use engine::{
    accumulate_capital, life_expectancy, CapitalProjectionEngine, DisplayJitter, ProjectionConfig,
    ProjectionParams, DEFAULT_RETIREMENT_AGE, DEFAULT_SAVINGS_FRACTION, DEFAULT_VALORIZATION_RATE,
    DISPLAY_JITTER_ENV, FEMALE_LIFE_EXPECTANCY, MALE_LIFE_EXPECTANCY, MAX_YEARS_UNTIL_RETIREMENT,
    MIN_YEARS_IN_RETIREMENT,
};
pub use orchestrator::{PensionResponse, ProjectionOrchestrator};
pub use result::{round2, CoverageAdvice, ProjectionResult};
