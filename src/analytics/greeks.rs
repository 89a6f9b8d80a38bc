// src/analytics/greeks.rs
//! Analytic Black-Scholes Greeks for European calls and puts
//!
//! All five sensitivities are built on the same `d₁`/`d₂` terms as the
//! pricing kernel:
//! ```text
//! Δ_call = Φ(d₁)                       Δ_put = Φ(d₁) - 1
//! Γ      = φ(d₁) / (S σ √τ)
//! ν      = S φ(d₁) √τ / 100            (per 1 vol point)
//! Θ_call = (-S φ(d₁) σ / (2√τ) - r K e^(-rτ) Φ(d₂)) / 365
//! Θ_put  = (-S φ(d₁) σ / (2√τ) + r K e^(-rτ) Φ(-d₂)) / 365
//! ρ_call =  K τ e^(-rτ) Φ(d₂) / 100    ρ_put = -K τ e^(-rτ) Φ(-d₂) / 100
//! ```
//!
//! `τ` depends on [`TimeConvention`]. `d₁`/`d₂` always use `T - t`.

use super::bs_analytic::PricingInputs;
use super::OptionSide;
use crate::error::{PricingError, PricingResult};
use crate::math_utils::{norm_cdf, norm_pdf};
use bitflags::bitflags;
use std::fmt;
use std::str::FromStr;

/// Which time argument the Greek formulas use outside `d₁`/`d₂`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeConvention {
    /// `τ = T - t`, consistent with the pricing kernel
    #[default]
    Remaining,
    /// `τ = T`, ignoring elapsed time
    Maturity,
}

impl TimeConvention {
    fn tau(&self, inputs: &PricingInputs) -> f64 {
        match self {
            TimeConvention::Remaining => inputs.tau(),
            TimeConvention::Maturity => inputs.big_t,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Greek {
    Delta,
    Gamma,
    Theta,
    Vega,
    Rho,
}

impl Greek {
    pub const ALL: [Greek; 5] = [Greek::Delta, Greek::Gamma, Greek::Theta, Greek::Vega, Greek::Rho];

    pub fn name(&self) -> &'static str {
        match self {
            Greek::Delta => "Delta",
            Greek::Gamma => "Gamma",
            Greek::Theta => "Theta",
            Greek::Vega => "Vega",
            Greek::Rho => "Rho",
        }
    }

    fn flag(&self) -> GreekSelection {
        match self {
            Greek::Delta => GreekSelection::DELTA,
            Greek::Gamma => GreekSelection::GAMMA,
            Greek::Theta => GreekSelection::THETA,
            Greek::Vega => GreekSelection::VEGA,
            Greek::Rho => GreekSelection::RHO,
        }
    }
}

impl fmt::Display for Greek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Greek {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "delta" => Ok(Greek::Delta),
            "gamma" => Ok(Greek::Gamma),
            "theta" => Ok(Greek::Theta),
            "vega" => Ok(Greek::Vega),
            "rho" => Ok(Greek::Rho),
            _ => Err(PricingError::invalid_argument(
                "greek",
                s,
                "one of Delta, Gamma, Theta, Vega, Rho",
            )),
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GreekSelection: u32 {
        const NONE  = 0;
        const DELTA = 1 << 0;
        const GAMMA = 1 << 1;
        const THETA = 1 << 2;
        const VEGA  = 1 << 3;
        const RHO   = 1 << 4;
    }
}

impl GreekSelection {
    /// Selected Greeks in canonical order
    pub fn greeks(&self) -> Vec<Greek> {
        Greek::ALL
            .iter()
            .copied()
            .filter(|g| self.contains(g.flag()))
            .collect()
    }
}

impl From<Greek> for GreekSelection {
    fn from(greek: Greek) -> Self {
        greek.flag()
    }
}

/// The five sensitivities of one option side
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GreekSet {
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub rho: f64,
}

impl GreekSet {
    pub fn get(&self, greek: Greek) -> f64 {
        match greek {
            Greek::Delta => self.delta,
            Greek::Gamma => self.gamma,
            Greek::Theta => self.theta,
            Greek::Vega => self.vega,
            Greek::Rho => self.rho,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionGreeks {
    pub call: GreekSet,
    pub put: GreekSet,
}

impl OptionGreeks {
    pub fn side(&self, side: OptionSide) -> &GreekSet {
        match side {
            OptionSide::Call => &self.call,
            OptionSide::Put => &self.put,
        }
    }
}

/// Compute all five Greeks for both the call and the put
///
/// # Errors
/// Same domain restrictions as the pricing kernel, plus `τ > 0` under the
/// chosen convention.
pub fn compute_greeks(inputs: &PricingInputs, convention: TimeConvention) -> PricingResult<OptionGreeks> {
    let (d1, d2) = inputs.d1_d2()?;
    let tau = convention.tau(inputs);
    if tau <= 0.0 {
        return Err(PricingError::domain(
            "tau",
            tau,
            "time argument of the Greeks must be positive",
        ));
    }

    let PricingInputs { s, k, r, sigma, .. } = *inputs;
    let sqrt_tau = tau.sqrt();
    let pdf_d1 = norm_pdf(d1);
    let cdf_d1 = norm_cdf(d1);
    let cdf_d2 = norm_cdf(d2);
    let cdf_neg_d2 = norm_cdf(-d2);
    let discount = (-r * tau).exp();

    let gamma = pdf_d1 / (s * sigma * sqrt_tau);
    // per 1% change in volatility
    let vega = s * pdf_d1 * sqrt_tau / 100.0;
    let time_decay = -s * pdf_d1 * sigma / (2.0 * sqrt_tau);

    let call = GreekSet {
        delta: cdf_d1,
        gamma,
        theta: (time_decay - r * k * discount * cdf_d2) / 365.0,
        vega,
        rho: k * tau * discount * cdf_d2 / 100.0,
    };

    let put = GreekSet {
        delta: cdf_d1 - 1.0,
        gamma,
        theta: (time_decay + r * k * discount * cdf_neg_d2) / 365.0,
        vega,
        rho: -k * tau * discount * cdf_neg_d2 / 100.0,
    };

    Ok(OptionGreeks { call, put })
}

/// A single Greek for both sides, `(call, put)`
pub fn compute_greek(
    greek: Greek,
    inputs: &PricingInputs,
    convention: TimeConvention,
) -> PricingResult<(f64, f64)> {
    let greeks = compute_greeks(inputs, convention)?;
    Ok((greeks.call.get(greek), greeks.put.get(greek)))
}
