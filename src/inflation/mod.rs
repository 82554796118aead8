//! Inflation baseline, regression model, and recursive forecaster

mod forecaster;
mod history;
mod model;

pub use forecaster::{price_level_factor, Forecast, InflationForecaster};
pub use history::InflationHistory;
pub use model::{InflationModel, LinearInflationModel};
