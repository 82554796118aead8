//! Historical annual inflation baseline
//!
//! File format is one `YEAR: VALUE%` entry per line, e.g. `2023: 11.4%`.
//! Blank lines and lines starting with `#` are ignored.

use std::fs;
use std::path::Path;

use crate::error::ModelUnavailableError;

/// Annual inflation rates (percent) in chronological order
#[derive(Debug, Clone, PartialEq)]
pub struct InflationHistory {
    entries: Vec<(i32, f64)>,
}

impl InflationHistory {
    /// Build from (year, rate) pairs; sorted by year
    pub fn new(mut entries: Vec<(i32, f64)>) -> Self {
        entries.sort_by_key(|(year, _)| *year);
        Self { entries }
    }

    pub fn parse(text: &str) -> Result<Self, String> {
        let mut entries = Vec::new();

        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (year, value) = line
                .split_once(':')
                .ok_or_else(|| format!("line {}: expected 'YEAR: VALUE%'", line_no + 1))?;
            let year: i32 = year
                .trim()
                .parse()
                .map_err(|e| format!("line {}: bad year: {}", line_no + 1, e))?;
            let value = value.trim();
            let value: f64 = value
                .strip_suffix('%')
                .unwrap_or(value)
                .trim()
                .parse()
                .map_err(|e| format!("line {}: bad rate: {}", line_no + 1, e))?;
            if !value.is_finite() {
                return Err(format!("line {}: rate is not finite", line_no + 1));
            }

            entries.push((year, value));
        }

        Ok(Self::new(entries))
    }

    pub fn load(path: &Path) -> Result<Self, ModelUnavailableError> {
        let text = fs::read_to_string(path).map_err(|e| ModelUnavailableError::new(path, e))?;
        let history = Self::parse(&text).map_err(|e| ModelUnavailableError::new(path, e))?;
        log::info!("Loaded {} years of inflation history from {}", history.len(), path.display());
        Ok(history)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent year on record
    pub fn last_year(&self) -> Option<i32> {
        self.entries.last().map(|(year, _)| *year)
    }

    /// Rates in chronological order
    pub fn rates(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, rate)| *rate).collect()
    }
}
