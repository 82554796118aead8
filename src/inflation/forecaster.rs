//! Recursive multi-year inflation forecasting
//!
//! Each step feeds the model a fixed-length window, appends the prediction and
//! evicts the oldest value. From the second step on the model is consuming its
//! own earlier output.

use std::collections::VecDeque;
use std::iter::FusedIterator;
use std::sync::Arc;

use super::history::InflationHistory;
use super::model::InflationModel;
use crate::error::ModelUnavailableError;

/// Forecaster over an immutable historical baseline
#[derive(Debug, Clone)]
pub struct InflationForecaster {
    model: Arc<dyn InflationModel>,
    /// Most recent `window_len` historical rates, oldest first
    baseline: Arc<[f64]>,
    last_year: Option<i32>,
}

impl InflationForecaster {
    /// Pair a model with the tail of the history it needs as input
    pub fn new(model: Arc<dyn InflationModel>, history: &InflationHistory) -> Result<Self, ModelUnavailableError> {
        let window = model.window_len();
        if window == 0 {
            return Err(ModelUnavailableError::new("inflation model", "model takes an empty window"));
        }
        if history.len() < window {
            return Err(ModelUnavailableError::new(
                "inflation history",
                format!("model needs {} years of history, only {} available", window, history.len()),
            ));
        }

        let rates = history.rates();
        let baseline: Arc<[f64]> = rates[rates.len() - window..].into();

        Ok(Self {
            model,
            baseline,
            last_year: history.last_year(),
        })
    }

    /// Historical window every forecast starts from
    pub fn baseline(&self) -> &[f64] {
        &self.baseline
    }

    /// Last historical year; the first forecast value is for the year after
    pub fn last_year(&self) -> Option<i32> {
        self.last_year
    }

    /// Lazily forecast `horizon_years` annual rates. Every call starts again from
    /// the baseline and works on its own copy of the window.
    pub fn forecast(&self, horizon_years: usize) -> Forecast<'_> {
        Forecast {
            model: self.model.as_ref(),
            window: self.baseline.iter().copied().collect(),
            remaining: horizon_years,
        }
    }
}

/// Iterator over forecast years
#[derive(Debug)]
pub struct Forecast<'a> {
    model: &'a dyn InflationModel,
    window: VecDeque<f64>,
    remaining: usize,
}

impl Iterator for Forecast<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let next = self.model.predict(self.window.make_contiguous());

        self.window.pop_front();
        self.window.push_back(next);
        Some(next)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Forecast<'_> {}

impl FusedIterator for Forecast<'_> {}

/// Cumulative price-level growth over a path of annual percent rates
pub fn price_level_factor(rates: &[f64]) -> f64 {
    rates.iter().fold(1.0, |factor, rate| factor * (1.0 + rate / 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inflation::LinearInflationModel;
    use approx::assert_relative_eq;
    use std::sync::Mutex;

    /// Records every window it sees and predicts window sum + 1
    #[derive(Debug, Default)]
    struct RecordingModel {
        seen: Mutex<Vec<Vec<f64>>>,
    }

    impl InflationModel for RecordingModel {
        fn window_len(&self) -> usize {
            3
        }

        fn predict(&self, window: &[f64]) -> f64 {
            self.seen.lock().unwrap().push(window.to_vec());
            window.iter().sum::<f64>() + 1.0
        }
    }

    fn history() -> InflationHistory {
        InflationHistory::new(vec![(2019, 9.0), (2020, 1.0), (2021, 2.0), (2022, 3.0)])
    }

    #[test]
    fn test_zero_horizon_is_empty() {
        let forecaster = InflationForecaster::new(Arc::new(RecordingModel::default()), &history()).unwrap();
        assert_eq!(forecaster.forecast(0).count(), 0);
    }

    #[test]
    fn test_windows_roll_by_one() {
        let model = Arc::new(RecordingModel::default());
        let forecaster = InflationForecaster::new(model.clone(), &history()).unwrap();

        let values: Vec<f64> = forecaster.forecast(3).collect();
        assert_eq!(values, vec![7.0, 13.0, 24.0]);

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], vec![1.0, 2.0, 3.0]);
        // Step 2 drops the oldest value and ends with step 1's output
        assert_eq!(seen[1], vec![2.0, 3.0, 7.0]);
        assert_eq!(seen[2], vec![3.0, 7.0, 13.0]);
    }

    #[test]
    fn test_calls_do_not_share_state() {
        let forecaster = InflationForecaster::new(Arc::new(RecordingModel::default()), &history()).unwrap();
        let first: Vec<f64> = forecaster.forecast(2).collect();
        let second: Vec<f64> = forecaster.forecast(2).collect();
        assert_eq!(first, second);
        assert_eq!(forecaster.baseline(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_lazy_and_exact_size() {
        let model = Arc::new(RecordingModel::default());
        let forecaster = InflationForecaster::new(model.clone(), &history()).unwrap();
        let mut forecast = forecaster.forecast(5);
        assert_eq!(forecast.len(), 5);
        forecast.next();
        assert_eq!(forecast.len(), 4);
        assert_eq!(model.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_short_history_rejected() {
        let short = InflationHistory::new(vec![(2022, 3.0)]);
        assert!(InflationForecaster::new(Arc::new(RecordingModel::default()), &short).is_err());
    }

    #[test]
    fn test_linear_model_converges_to_mean() {
        // Fixed point: x = 1 + 0.5x -> 2
        let model = LinearInflationModel { intercept: 1.0, coefficients: vec![0.25, 0.25] };
        let forecaster = InflationForecaster::new(Arc::new(model), &history()).unwrap();
        let last = forecaster.forecast(60).last().unwrap();
        assert_relative_eq!(last, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_price_level_factor() {
        assert_eq!(price_level_factor(&[]), 1.0);
        assert_relative_eq!(price_level_factor(&[10.0, 10.0]), 1.21, epsilon = 1e-12);
    }
}
