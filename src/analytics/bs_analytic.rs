// src/analytics/bs_analytic.rs
//! Analytical Black-Scholes formulas for European options
//!
//! # Mathematical Foundation
//!
//! Under the Black-Scholes model, the underlying asset follows:
//! ```text
//! dS_t = r S_t dt + σ S_t dW_t
//! ```
//!
//! The call price at elapsed time `t` for an option expiring at `T` is:
//! ```text
//! C = S*Φ(d₁) - K*e^(-r(T-t))*Φ(d₂)
//! d₁ = [ln(S/K) + (r + σ²/2)(T-t)] / (σ√(T-t))
//! d₂ = d₁ - σ√(T-t)
//! ```
//!
//! The put price is taken from put-call parity rather than its own closed
//! form, so `C - P = S - K*e^(-r(T-t))` holds exactly by construction.
//!
//! Every entry point validates its inputs: a non-positive spot or strike,
//! non-positive volatility, or `T <= t` is a [`PricingError::Domain`]
//! instead of a NaN or infinity leaking out of the formula.

use crate::error::{validation::*, PricingError, PricingResult};
use crate::math_utils::norm_cdf;

/// Scalar inputs to the pricing kernel
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PricingInputs {
    /// Current underlying price
    pub s: f64,
    /// Strike price
    pub k: f64,
    /// Time to maturity in years, measured from contract start
    pub big_t: f64,
    /// Elapsed time in years (0 ≤ t < T)
    pub t: f64,
    /// Annualised risk-free rate, decimal
    pub r: f64,
    /// Annualised volatility, decimal
    pub sigma: f64,
}

impl Default for PricingInputs {
    fn default() -> Self {
        PricingInputs {
            s: 100.0,
            k: 100.0,
            big_t: 1.0,
            t: 0.0,
            r: 0.05,
            sigma: 0.05,
        }
    }
}

impl PricingInputs {
    pub fn new(s: f64, k: f64, big_t: f64, t: f64, r: f64, sigma: f64) -> Self {
        PricingInputs {
            s,
            k,
            big_t,
            t,
            r,
            sigma,
        }
    }

    pub fn with_strike(mut self, k: f64) -> Self {
        self.k = k;
        self
    }

    pub fn with_maturity(mut self, big_t: f64) -> Self {
        self.big_t = big_t;
        self
    }

    pub fn with_spot(mut self, s: f64) -> Self {
        self.s = s;
        self
    }

    pub fn with_volatility(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    /// Check every precondition of the closed-form formulas
    pub fn validate(&self) -> PricingResult<()> {
        validate_positive("S", self.s)?;
        validate_positive("K", self.k)?;
        validate_positive("sigma", self.sigma)?;
        validate_finite("r", self.r)?;
        validate_non_negative("t", self.t)?;
        validate_time_to_expiry(self.big_t, self.t)
    }

    /// Remaining life of the option, `T - t`
    pub fn tau(&self) -> f64 {
        self.big_t - self.t
    }

    /// Discounted strike `K*e^(-r(T-t))`
    pub fn discounted_strike(&self) -> f64 {
        self.k * (-self.r * self.tau()).exp()
    }

    pub fn d1(&self) -> PricingResult<f64> {
        self.validate()?;
        Ok(self.d1_unchecked())
    }

    pub fn d2(&self) -> PricingResult<f64> {
        self.validate()?;
        Ok(self.d1_unchecked() - self.sigma * self.tau().sqrt())
    }

    /// `(d₁, d₂)` after validation
    pub fn d1_d2(&self) -> PricingResult<(f64, f64)> {
        self.validate()?;
        let d1 = self.d1_unchecked();
        Ok((d1, d1 - self.sigma * self.tau().sqrt()))
    }

    pub fn call_price(&self) -> PricingResult<f64> {
        let (d1, d2) = self.d1_d2()?;
        Ok(self.s * norm_cdf(d1) - self.discounted_strike() * norm_cdf(d2))
    }

    /// Put price from put-call parity: `P = C - S + K*e^(-r(T-t))`
    pub fn put_price(&self) -> PricingResult<f64> {
        let call = self.call_price()?;
        Ok(call - self.s + self.discounted_strike())
    }

    /// `(call, put)` sharing one evaluation of `d₁`/`d₂`
    pub fn prices(&self) -> PricingResult<(f64, f64)> {
        let call = self.call_price()?;
        Ok((call, call - self.s + self.discounted_strike()))
    }

    fn d1_unchecked(&self) -> f64 {
        let tau = self.tau();
        ((self.s / self.k).ln() + (self.r + 0.5 * self.sigma * self.sigma) * tau)
            / (self.sigma * tau.sqrt())
    }
}

/// Black-Scholes `d₁`
///
/// # Formula
/// ```text
/// d₁ = [ln(S/K) + (r + σ²/2)(T-t)] / (σ√(T-t))
/// ```
pub fn bs_d1(s: f64, k: f64, big_t: f64, t: f64, r: f64, sigma: f64) -> PricingResult<f64> {
    PricingInputs::new(s, k, big_t, t, r, sigma).d1()
}

/// Black-Scholes `d₂ = d₁ - σ√(T-t)`
pub fn bs_d2(big_t: f64, t: f64, sigma: f64, d1: f64) -> PricingResult<f64> {
    validate_positive("sigma", sigma)?;
    validate_time_to_expiry(big_t, t)?;
    if !d1.is_finite() {
        return Err(PricingError::domain("d1", d1, "must be finite"));
    }
    Ok(d1 - sigma * (big_t - t).sqrt())
}

/// Black-Scholes European call option price
///
/// # Parameters
/// - `s`: Current stock price
/// - `k`: Strike price
/// - `big_t`: Time to maturity in years
/// - `t`: Elapsed time in years
/// - `r`: Risk-free rate
/// - `sigma`: Volatility
pub fn euro_call_price(s: f64, k: f64, big_t: f64, t: f64, r: f64, sigma: f64) -> PricingResult<f64> {
    PricingInputs::new(s, k, big_t, t, r, sigma).call_price()
}

/// Black-Scholes European put option price via put-call parity
pub fn euro_put_price(s: f64, k: f64, big_t: f64, t: f64, r: f64, sigma: f64) -> PricingResult<f64> {
    PricingInputs::new(s, k, big_t, t, r, sigma).put_price()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_inputs_price() {
        let call = PricingInputs::default().call_price().unwrap();
        assert_relative_eq!(call, 5.283_268_987_649_919, epsilon = 1e-9);
    }

    #[test]
    fn test_d2_matches_free_function() {
        let inputs = PricingInputs::new(105.0, 100.0, 0.75, 0.25, 0.03, 0.25);
        let d1 = inputs.d1().unwrap();
        assert_relative_eq!(
            bs_d2(0.75, 0.25, 0.25, d1).unwrap(),
            inputs.d2().unwrap(),
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_elapsed_time_shortens_life() {
        let fresh = PricingInputs::new(100.0, 100.0, 0.5, 0.0, 0.02, 0.2);
        let aged = PricingInputs::new(100.0, 100.0, 1.0, 0.5, 0.02, 0.2);
        assert_relative_eq!(
            fresh.call_price().unwrap(),
            aged.call_price().unwrap(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_zero_volatility_is_domain_error() {
        let err = PricingInputs::default().with_volatility(0.0).call_price();
        assert!(err.unwrap_err().is_domain());
    }

    #[test]
    fn test_non_positive_spot_is_domain_error() {
        assert!(euro_call_price(0.0, 100.0, 1.0, 0.0, 0.05, 0.2).is_err());
        assert!(euro_put_price(-5.0, 100.0, 1.0, 0.0, 0.05, 0.2).is_err());
        assert!(euro_call_price(100.0, 0.0, 1.0, 0.0, 0.05, 0.2).is_err());
    }
}
