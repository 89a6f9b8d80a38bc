// src/grid/filter.rs
//! Windowing of market price matrices and sparse-row elimination
//!
//! A strike row is dropped from *both* the call and the put matrix when
//! either side is missing a quote for at least half of the retained
//! expirations, so the two matrices always share one strike axis.

use super::matrix::{CallPutMatrices, OptionMatrix};
use crate::error::{PricingError, PricingResult};
use ndarray::s;
use tracing::debug;

/// Half-open index window `[strike_start, strike_end) × [exp_start, exp_end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketWindow {
    pub strike_start: usize,
    pub strike_end: usize,
    pub exp_start: usize,
    pub exp_end: usize,
}

impl MarketWindow {
    pub fn new(strike_start: usize, strike_end: usize, exp_start: usize, exp_end: usize) -> Self {
        MarketWindow {
            strike_start,
            strike_end,
            exp_start,
            exp_end,
        }
    }

    /// Whole matrix of the given shape
    pub fn full(shape: (usize, usize)) -> Self {
        MarketWindow::new(0, shape.0, 0, shape.1)
    }

    pub fn validate(&self, shape: (usize, usize)) -> PricingResult<()> {
        let (m, n) = shape;
        if self.strike_start > self.strike_end || self.strike_end > m {
            return Err(PricingError::invalid_argument(
                "strike window",
                &format!("{}..{}", self.strike_start, self.strike_end),
                format!("an ordered range within 0..{}", m),
            ));
        }
        if self.exp_start > self.exp_end || self.exp_end > n {
            return Err(PricingError::invalid_argument(
                "expiration window",
                &format!("{}..{}", self.exp_start, self.exp_end),
                format!("an ordered range within 0..{}", n),
            ));
        }
        Ok(())
    }
}

fn slice_one(matrix: &OptionMatrix, w: &MarketWindow) -> PricingResult<OptionMatrix> {
    let values = matrix
        .values()
        .slice(s![w.strike_start..w.strike_end, w.exp_start..w.exp_end])
        .to_owned();
    OptionMatrix::new(
        values,
        matrix.strikes()[w.strike_start..w.strike_end].to_vec(),
        matrix.expirations()[w.exp_start..w.exp_end].to_vec(),
    )
}

/// Cut the call and put market matrices down to `window`
pub fn slice_market(market: &CallPutMatrices, window: &MarketWindow) -> PricingResult<CallPutMatrices> {
    if market.call.shape() != market.put.shape() {
        return Err(PricingError::invalid_argument(
            "put matrix shape",
            &format!("{:?}", market.put.shape()),
            format!("{:?} to match the call matrix", market.call.shape()),
        ));
    }
    window.validate(market.call.shape())?;
    Ok(CallPutMatrices {
        call: slice_one(&market.call, window)?,
        put: slice_one(&market.put, window)?,
    })
}

/// True when a row with `missing` gaps out of `columns` should be dropped
fn is_sparse(missing: usize, columns: usize) -> bool {
    2 * missing >= columns
}

/// Drop strikes whose call or put row is missing at least half its quotes
pub fn remove_sparse_rows(market: &CallPutMatrices) -> PricingResult<CallPutMatrices> {
    if market.call.shape() != market.put.shape() {
        return Err(PricingError::invalid_argument(
            "put matrix shape",
            &format!("{:?}", market.put.shape()),
            format!("{:?} to match the call matrix", market.call.shape()),
        ));
    }
    let columns = market.call.shape().1;
    let call_missing = market.call.row_missing_counts();
    let put_missing = market.put.row_missing_counts();

    let keep: Vec<usize> = call_missing
        .iter()
        .zip(&put_missing)
        .enumerate()
        .filter(|(_, (&c, &p))| !is_sparse(c, columns) && !is_sparse(p, columns))
        .map(|(i, _)| i)
        .collect();

    let dropped = call_missing.len() - keep.len();
    if dropped > 0 {
        debug!(dropped, kept = keep.len(), columns, "removed sparse strike rows");
    }

    Ok(CallPutMatrices {
        call: market.call.select_rows(&keep)?,
        put: market.put.select_rows(&keep)?,
    })
}

/// [`slice_market`] followed by [`remove_sparse_rows`]
pub fn filter_market(market: &CallPutMatrices, window: &MarketWindow) -> PricingResult<CallPutMatrices> {
    remove_sparse_rows(&slice_market(market, window)?)
}
