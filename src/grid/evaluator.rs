// src/grid/evaluator.rs
//! Strike × expiration grid evaluation
//!
//! Every `(strike, expiration)` pair is an independent, side-effect-free
//! evaluation of the pricing kernel or the Greeks engine. Large grids are
//! spread across the rayon pool; results are assembled by index, never by
//! completion order, so row `i` / column `j` always corresponds to
//! `strikes[i]` / `expirations[j]` as supplied.
//!
//! A cell whose inputs violate a closed-form precondition (for example an
//! expiration at or before `t`) is marked not available and the sweep
//! continues, unless [`GridConfig::fail_fast`] is set.

use super::matrix::{CallPutMatrices, OptionMatrix, NOT_AVAILABLE};
use crate::analytics::bs_analytic::PricingInputs;
use crate::analytics::greeks::{compute_greek, Greek, GreekSelection, TimeConvention};
use crate::cache::{CacheKey, PricingCache};
use crate::error::{PricingError, PricingResult};
use ndarray::Array2;
use rayon::prelude::*;
use tracing::{debug, warn};

/// Scalar inputs shared by every cell of a grid
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridParams {
    pub s: f64,
    pub t: f64,
    pub r: f64,
    pub sigma: f64,
}

impl GridParams {
    pub fn new(s: f64, t: f64, r: f64, sigma: f64) -> Self {
        GridParams { s, t, r, sigma }
    }

    pub fn inputs(&self, k: f64, big_t: f64) -> PricingInputs {
        PricingInputs::new(self.s, k, big_t, self.t, self.r, self.sigma)
    }

    fn cache_key(&self, function: &'static str, strikes: &[f64], expirations: &[f64]) -> CacheKey {
        CacheKey::new(function)
            .with_value(self.s)
            .with_value(self.t)
            .with_value(self.r)
            .with_value(self.sigma)
            .with_slice(strikes)
            .with_slice(expirations)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridConfig {
    /// Grids with at least this many cells are evaluated in parallel
    pub parallel_threshold: usize,
    /// Fail the whole grid on the first invalid cell instead of marking it
    pub fail_fast: bool,
    pub convention: TimeConvention,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            parallel_threshold: 1024,
            fail_fast: false,
            convention: TimeConvention::default(),
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> PricingResult<()> {
        if self.parallel_threshold == 0 {
            return Err(PricingError::invalid_argument(
                "parallel_threshold",
                "0",
                "a positive cell count",
            ));
        }
        Ok(())
    }

    pub fn serial() -> Self {
        GridConfig {
            parallel_threshold: usize::MAX,
            ..Default::default()
        }
    }
}

/// Evaluate `cell` once per `(strike, expiration)` pair into call and put
/// matrices of shape `strikes.len() × expirations.len()`.
pub fn evaluate_grid<F>(
    strikes: &[f64],
    expirations: &[f64],
    params: &GridParams,
    config: &GridConfig,
    cell: F,
) -> PricingResult<CallPutMatrices>
where
    F: Fn(&PricingInputs) -> PricingResult<(f64, f64)> + Sync,
{
    config.validate()?;
    let (m, n) = (strikes.len(), expirations.len());
    let total = m * n;

    let eval = |idx: usize| cell(&params.inputs(strikes[idx / n], expirations[idx % n]));

    let results: Vec<PricingResult<(f64, f64)>> = if total >= config.parallel_threshold {
        debug!(cells = total, threads = rayon::current_num_threads(), "parallel grid sweep");
        (0..total).into_par_iter().map(eval).collect()
    } else {
        debug!(cells = total, "serial grid sweep");
        (0..total).map(eval).collect()
    };

    let mut call = Vec::with_capacity(total);
    let mut put = Vec::with_capacity(total);
    let mut invalid = 0usize;
    for (idx, result) in results.into_iter().enumerate() {
        match result {
            Ok((c, p)) => {
                call.push(c);
                put.push(p);
            }
            Err(e) if config.fail_fast => return Err(e),
            Err(e) => {
                debug!(
                    strike = strikes[idx / n],
                    expiration = expirations[idx % n],
                    error = %e,
                    "cell marked not available"
                );
                invalid += 1;
                call.push(NOT_AVAILABLE);
                put.push(NOT_AVAILABLE);
            }
        }
    }
    if invalid > 0 {
        warn!(invalid, cells = total, "grid cells could not be evaluated");
    }

    Ok(CallPutMatrices {
        call: into_matrix(call, strikes, expirations)?,
        put: into_matrix(put, strikes, expirations)?,
    })
}

fn into_matrix(values: Vec<f64>, strikes: &[f64], expirations: &[f64]) -> PricingResult<OptionMatrix> {
    let values = Array2::from_shape_vec((strikes.len(), expirations.len()), values)
        .map_err(|e| PricingError::invalid_argument("grid", &e.to_string(), "one value per cell"))?;
    OptionMatrix::new(values, strikes.to_vec(), expirations.to_vec())
}

/// Black-Scholes call and put prices over the grid
pub fn price_grid(
    strikes: &[f64],
    expirations: &[f64],
    params: &GridParams,
    config: &GridConfig,
) -> PricingResult<CallPutMatrices> {
    evaluate_grid(strikes, expirations, params, config, |inputs| inputs.prices())
}

/// [`price_grid`], memoized in a caller-owned cache
pub fn price_grid_cached(
    strikes: &[f64],
    expirations: &[f64],
    params: &GridParams,
    config: &GridConfig,
    cache: &mut PricingCache<CallPutMatrices>,
) -> PricingResult<CallPutMatrices> {
    let key = params
        .cache_key("price_grid", strikes, expirations)
        .with_tag(config.fail_fast as u64);
    cache.get_or_try_insert_with(key, || price_grid(strikes, expirations, params, config))
}

/// One Greek over the grid, call and put side
pub fn greek_grid(
    greek: Greek,
    strikes: &[f64],
    expirations: &[f64],
    params: &GridParams,
    config: &GridConfig,
) -> PricingResult<CallPutMatrices> {
    let convention = config.convention;
    evaluate_grid(strikes, expirations, params, config, |inputs| {
        compute_greek(greek, inputs, convention)
    })
}

/// Every Greek in `selection`, in canonical order
pub fn greek_surfaces(
    selection: GreekSelection,
    strikes: &[f64],
    expirations: &[f64],
    params: &GridParams,
    config: &GridConfig,
) -> PricingResult<Vec<(Greek, CallPutMatrices)>> {
    selection
        .greeks()
        .into_iter()
        .map(|greek| Ok((greek, greek_grid(greek, strikes, expirations, params, config)?)))
        .collect()
}

/// Model error `model - market` for both sides
pub fn model_error(model: &CallPutMatrices, market: &CallPutMatrices) -> PricingResult<CallPutMatrices> {
    Ok(CallPutMatrices {
        call: model.call.difference(&market.call)?,
        put: model.put.difference(&market.put)?,
    })
}
