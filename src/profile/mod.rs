//! Request data structures and batch loading

mod data;
pub mod loader;

pub use data::{ContributionProfile, DemographicProfile, Gender, PensionRequest};
pub use loader::{load_requests, load_requests_from_reader};
