// src/pnl.rs
//! Option Payoff and Profit/Loss Profiles
//!
//! # Mathematical Definitions
//!
//! For a long position bought at premium `p`:
//! - **Call**: `PnL(S_T) = max(S_T - K, 0) - p`, break-even at `K + p`
//! - **Put**: `PnL(S_T) = max(K - S_T, 0) - p`, break-even at `K - p`
//!
//! Profiles are evaluated over a swept axis of hypothetical terminal
//! prices. The default sweep runs from 0 to `2K` inclusive in steps of 5
//! currency units; for very small strikes this sweep is coarse.

use crate::analytics::OptionSide;
use crate::error::{validation::*, PricingError, PricingResult};

/// Spacing of the default underlying-price sweep
pub const DEFAULT_SWEEP_STEP: f64 = 5.0;

/// Largest number of steps the default sweep will generate, so strikes up
/// to 2.5 million are accepted
pub const MAX_SWEEP_STEPS: usize = 1_000_000;

/// Terminal payoff of a European option
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payoff {
    /// European call option: max(S_T - K, 0)
    EuropeanCall { k: f64 },

    /// European put option: max(K - S_T, 0)
    EuropeanPut { k: f64 },
}

impl Payoff {
    pub fn new(side: OptionSide, k: f64) -> Self {
        match side {
            OptionSide::Call => Payoff::EuropeanCall { k },
            OptionSide::Put => Payoff::EuropeanPut { k },
        }
    }

    pub fn strike(&self) -> f64 {
        match self {
            Payoff::EuropeanCall { k } | Payoff::EuropeanPut { k } => *k,
        }
    }

    /// Intrinsic value at the terminal underlying price
    pub fn terminal_value(&self, spot: f64) -> f64 {
        match self {
            Payoff::EuropeanCall { k } => (spot - k).max(0.0),
            Payoff::EuropeanPut { k } => (k - spot).max(0.0),
        }
    }

    /// Profit of a long position bought at `premium`
    pub fn pnl(&self, spot: f64, premium: f64) -> f64 {
        self.terminal_value(spot) - premium
    }

    /// Underlying price at which the position's profit is exactly zero
    pub fn break_even(&self, premium: f64) -> f64 {
        match self {
            Payoff::EuropeanCall { k } => k + premium,
            Payoff::EuropeanPut { k } => k - premium,
        }
    }
}

/// Call and put PnL over a shared price axis, ready for plotting
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PnlProfile {
    pub strike: f64,
    pub prices: Vec<f64>,
    pub call_pnl: Vec<f64>,
    pub put_pnl: Vec<f64>,
    pub call_break_even: f64,
    pub put_break_even: f64,
}

/// `0, 5, 10, ...` up to and including `2K`
///
/// # Errors
/// `InvalidArgument` when the sweep would need more than
/// [`MAX_SWEEP_STEPS`] steps; pass an explicit axis to
/// [`compute_pnl_with_sweep`] for such strikes.
pub fn default_price_sweep(k: f64) -> PricingResult<Vec<f64>> {
    validate_positive("K", k)?;
    let upper = 2.0 * k;
    let steps = (upper / DEFAULT_SWEEP_STEP).floor();
    if steps > MAX_SWEEP_STEPS as f64 {
        return Err(PricingError::invalid_argument(
            "K",
            &k.to_string(),
            format!("a strike whose default sweep fits in {} steps", MAX_SWEEP_STEPS),
        ));
    }
    let steps = steps as usize;
    let mut prices: Vec<f64> = (0..=steps).map(|i| i as f64 * DEFAULT_SWEEP_STEP).collect();
    // keep the right edge of the chart at 2K when it is off the 5-unit grid
    if prices.last().map_or(true, |&last| last < upper) {
        prices.push(upper);
    }
    Ok(prices)
}

pub fn call_pnl(k: f64, call_price: f64, prices: &[f64]) -> Vec<f64> {
    let payoff = Payoff::EuropeanCall { k };
    prices.iter().map(|&p| payoff.pnl(p, call_price)).collect()
}

pub fn put_pnl(k: f64, put_price: f64, prices: &[f64]) -> Vec<f64> {
    let payoff = Payoff::EuropeanPut { k };
    prices.iter().map(|&p| payoff.pnl(p, put_price)).collect()
}

pub fn call_break_even(k: f64, call_price: f64) -> f64 {
    Payoff::EuropeanCall { k }.break_even(call_price)
}

pub fn put_break_even(k: f64, put_price: f64) -> f64 {
    Payoff::EuropeanPut { k }.break_even(put_price)
}

/// PnL profile over the default sweep `[0, 2K]`
pub fn compute_pnl(k: f64, call_price: f64, put_price: f64) -> PricingResult<PnlProfile> {
    let prices = default_price_sweep(k)?;
    compute_pnl_with_sweep(k, call_price, put_price, prices)
}

/// PnL profile over a caller-supplied price axis
pub fn compute_pnl_with_sweep(
    k: f64,
    call_price: f64,
    put_price: f64,
    prices: Vec<f64>,
) -> PricingResult<PnlProfile> {
    validate_positive("K", k)?;
    validate_non_negative("call_price", call_price)?;
    validate_non_negative("put_price", put_price)?;
    for &p in &prices {
        validate_finite("price", p)?;
    }

    Ok(PnlProfile {
        strike: k,
        call_pnl: call_pnl(k, call_price, &prices),
        put_pnl: put_pnl(k, put_price, &prices),
        call_break_even: call_break_even(k, call_price),
        put_break_even: put_break_even(k, put_price),
        prices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sweep_bounds() {
        let prices = default_price_sweep(100.0).unwrap();
        assert_eq!(prices.first(), Some(&0.0));
        assert_eq!(prices.last(), Some(&200.0));
        assert_eq!(prices.len(), 41);
    }

    #[test]
    fn test_default_sweep_rejects_huge_strike() {
        for k in [1e20, f64::MAX] {
            let err = default_price_sweep(k).unwrap_err();
            assert!(matches!(err, PricingError::InvalidArgument { .. }), "{:?}", err);
            assert!(compute_pnl(k, 1.0, 1.0).is_err());
        }
        let largest = MAX_SWEEP_STEPS as f64 * DEFAULT_SWEEP_STEP / 2.0;
        assert_eq!(default_price_sweep(largest).unwrap().len(), MAX_SWEEP_STEPS + 1);
    }

    #[test]
    fn test_default_sweep_off_grid_strike() {
        let prices = default_price_sweep(12.0).unwrap();
        assert_eq!(prices, vec![0.0, 5.0, 10.0, 15.0, 20.0, 24.0]);
    }

    #[test]
    fn test_payoff_floor_at_zero() {
        let call = Payoff::new(OptionSide::Call, 100.0);
        let put = Payoff::new(OptionSide::Put, 100.0);
        assert_eq!(call.terminal_value(80.0), 0.0);
        assert_eq!(put.terminal_value(120.0), 0.0);
        assert_eq!(call.terminal_value(130.0), 30.0);
        assert_eq!(put.terminal_value(70.0), 30.0);
    }

    #[test]
    fn test_invalid_strike_rejected() {
        assert!(compute_pnl(0.0, 1.0, 1.0).is_err());
        assert!(compute_pnl(100.0, -1.0, 1.0).is_err());
    }
}
