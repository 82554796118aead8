//! Pension Forecast - retirement benefit projection engine
//!
//! This library provides:
//! - Capital projection with yearly valorization and monthly pension estimates
//! - Recursive multi-year inflation forecasting from a trained regression model
//! - Pension-tier classification from demographic records
//! - Batch projection over many requests

pub mod artifacts;
pub mod classifier;
pub mod error;
pub mod inflation;
pub mod profile;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use artifacts::ModelArtifacts;
pub use classifier::{PensionRecord, PensionTier, PensionTierClassifier};
pub use error::{FeatureBuildError, MappingNotFoundError, ModelUnavailableError, TimelineError};
pub use inflation::InflationForecaster;
pub use profile::PensionRequest;
pub use projection::{PensionResponse, ProjectionConfig, ProjectionOrchestrator, ProjectionResult};
pub use scenario::ScenarioRunner;
