// src/dates.rs
//! Expiration-date to year-fraction conversion
//!
//! Year fractions use an actual/365.25 count of calendar days from the
//! valuation date. Dates in the past give negative fractions; the grid
//! evaluator marks those cells not available.

use crate::error::{PricingError, PricingResult};
use chrono::{Local, NaiveDate};

pub const DAYS_PER_YEAR: f64 = 365.25;

/// Format of expiration labels in option-chain listings
pub const EXPIRATION_FORMAT: &str = "%Y-%m-%d";

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn years_between(from: NaiveDate, to: NaiveDate) -> f64 {
    (to - from).num_days() as f64 / DAYS_PER_YEAR
}

pub fn parse_expiration(date: &str) -> PricingResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), EXPIRATION_FORMAT)
        .map_err(|_| PricingError::invalid_argument("expiration date", date, "a YYYY-MM-DD date"))
}

pub fn format_expiration(date: NaiveDate) -> String {
    date.format(EXPIRATION_FORMAT).to_string()
}

/// Years from `today` until each `YYYY-MM-DD` expiration, in input order
pub fn expirations_to_years<S: AsRef<str>>(expirations: &[S], today: NaiveDate) -> PricingResult<Vec<f64>> {
    expirations
        .iter()
        .map(|e| parse_expiration(e.as_ref()).map(|d| years_between(today, d)))
        .collect()
}
