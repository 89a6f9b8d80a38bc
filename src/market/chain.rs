// src/market/chain.rs
use crate::dates::years_between;
use crate::error::{PricingError, PricingResult};
use crate::grid::matrix::{CallPutMatrices, OptionMatrix, NOT_AVAILABLE};
use chrono::NaiveDate;
use ndarray::Array2;

/// Last traded price of one listed contract
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionQuote {
    pub strike: f64,
    pub last_price: f64,
}

impl OptionQuote {
    pub fn new(strike: f64, last_price: f64) -> Self {
        OptionQuote { strike, last_price }
    }
}

/// Calls and puts listed for one expiration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExpirySlice {
    pub expiration: NaiveDate,
    pub calls: Vec<OptionQuote>,
    pub puts: Vec<OptionQuote>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionChain {
    pub ticker: String,
    pub slices: Vec<ExpirySlice>,
}

/// Market prices laid out on the union of listed strikes
#[derive(Debug, Clone)]
pub struct MarketSurface {
    pub prices: CallPutMatrices,
    pub expiration_dates: Vec<NaiveDate>,
}

impl OptionChain {
    /// Every strike listed for any expiration, ascending and deduplicated
    pub fn strike_union(&self) -> Vec<f64> {
        let mut strikes: Vec<f64> = self
            .slices
            .iter()
            .flat_map(|s| s.calls.iter().chain(&s.puts))
            .map(|q| q.strike)
            .filter(|k| k.is_finite() && *k > 0.0)
            .collect();
        strikes.sort_by(f64::total_cmp);
        strikes.dedup();
        strikes
    }

    /// Call and put matrices over `strike_union() × expirations`.
    ///
    /// Expirations keep chain order; a strike not quoted for an expiration,
    /// or quoted with a non-finite or negative price, is not available.
    pub fn to_matrices(&self, today: NaiveDate) -> PricingResult<MarketSurface> {
        if self.slices.is_empty() {
            return Err(PricingError::upstream(
                "option chain",
                format!("no expirations listed for {}", self.ticker),
            ));
        }

        let strikes = self.strike_union();
        let expiration_dates: Vec<NaiveDate> = self.slices.iter().map(|s| s.expiration).collect();
        let expirations: Vec<f64> = expiration_dates.iter().map(|&d| years_between(today, d)).collect();

        let shape = (strikes.len(), expirations.len());
        let mut calls = Array2::from_elem(shape, NOT_AVAILABLE);
        let mut puts = Array2::from_elem(shape, NOT_AVAILABLE);

        for (j, slice) in self.slices.iter().enumerate() {
            fill_column(&mut calls, j, &strikes, &slice.calls);
            fill_column(&mut puts, j, &strikes, &slice.puts);
        }

        Ok(MarketSurface {
            prices: CallPutMatrices {
                call: OptionMatrix::new(calls, strikes.clone(), expirations.clone())?,
                put: OptionMatrix::new(puts, strikes, expirations)?,
            },
            expiration_dates,
        })
    }
}

fn fill_column(matrix: &mut Array2<f64>, column: usize, strikes: &[f64], quotes: &[OptionQuote]) {
    for quote in quotes {
        if !quote.last_price.is_finite() || quote.last_price < 0.0 {
            continue;
        }
        if let Ok(i) = strikes.binary_search_by(|k| k.total_cmp(&quote.strike)) {
            matrix[[i, column]] = quote.last_price;
        }
    }
}
