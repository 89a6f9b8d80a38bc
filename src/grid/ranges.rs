// src/grid/ranges.rs
//! Default strike and expiration axes
//!
//! Strike spacing follows the listed-equity-option convention: 2.50 below
//! 25, 5 below 200, 10 above.

use super::filter::MarketWindow;
use crate::error::{validation::*, PricingError, PricingResult};
use std::fmt;
use std::str::FromStr;

/// Listed strike increment for an underlying trading at `spot`
pub fn strike_increment(spot: f64) -> f64 {
    if spot < 25.0 {
        2.5
    } else if spot < 200.0 {
        5.0
    } else {
        10.0
    }
}

/// `2 * radius` listed strikes bracketing `spot`, ascending.
///
/// The grid point at or just below spot is the `radius`-th strike. Strikes
/// that would fall at or below zero are left out.
pub fn strike_range(spot: f64, radius: usize) -> PricingResult<Vec<f64>> {
    validate_positive("S", spot)?;
    if radius == 0 {
        return Err(PricingError::invalid_argument("radius", "0", "at least 1"));
    }

    let increment = strike_increment(spot);
    let mut centre_floor = (spot / increment).floor() * increment;
    let centre_ceil = (spot / increment).ceil() * increment;
    // spot on the grid: treat it as the upper centre
    if centre_floor == centre_ceil {
        centre_floor = centre_ceil - increment;
    }
    let min = centre_floor - increment * (radius as f64 - 1.0);

    Ok((0..2 * radius)
        .map(|i| min + increment * i as f64)
        .filter(|&k| k > 0.0)
        .collect())
}

/// Unit of an evenly spaced expiration axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeScale {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl TimeScale {
    /// Periods per year
    pub fn periods_per_year(&self) -> f64 {
        match self {
            TimeScale::Day => 365.0,
            TimeScale::Week => 52.0,
            TimeScale::Month => 12.0,
            TimeScale::Quarter => 4.0,
            TimeScale::Year => 1.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TimeScale::Day => "day",
            TimeScale::Week => "week",
            TimeScale::Month => "month",
            TimeScale::Quarter => "quarter",
            TimeScale::Year => "year",
        }
    }
}

impl fmt::Display for TimeScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimeScale {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(TimeScale::Day),
            "week" => Ok(TimeScale::Week),
            "month" => Ok(TimeScale::Month),
            "quarter" => Ok(TimeScale::Quarter),
            "year" => Ok(TimeScale::Year),
            _ => Err(PricingError::invalid_argument(
                "time scale",
                s,
                "one of day, week, month, quarter, year",
            )),
        }
    }
}

/// `1..=length` periods of `scale`, in years
pub fn expiration_range(scale: TimeScale, length: usize) -> Vec<f64> {
    let h = scale.periods_per_year();
    (1..=length).map(|i| i as f64 / h).collect()
}

/// Index of the greatest strike at or below spot, or 0 if spot is below all
fn lower_strike_index(strikes: &[f64], spot: f64) -> usize {
    strikes.partition_point(|&k| k <= spot).saturating_sub(1)
}

/// Window a dashboard opens on: two strikes below the strike nearest under
/// spot up to four above it (exclusive), and the first six expirations.
pub fn default_window(strikes: &[f64], expiration_count: usize, spot: f64) -> PricingResult<MarketWindow> {
    validate_positive("S", spot)?;
    validate_min_len("strike axis", strikes.len(), 1)?;
    validate_min_len("expiration axis", expiration_count, 1)?;

    let lower = lower_strike_index(strikes, spot);
    Ok(MarketWindow::new(
        lower.saturating_sub(2),
        (lower + 4).min(strikes.len()),
        0,
        expiration_count.min(6),
    ))
}
