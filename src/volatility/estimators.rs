// src/volatility/estimators.rs
//! Historical volatility estimators
//!
//! Each estimator turns an ordered close-price series into an annualised
//! volatility:
//! ```text
//! σ_annual = σ_periodic * √252
//! ```
//!
//! # Strategies
//!
//! | name       | returns | statistic                       |
//! |------------|---------|---------------------------------|
//! | `std`      | simple  | sample standard deviation       |
//! | `log`      | log     | sample standard deviation       |
//! | `ewma`     | simple  | EWMA standard deviation, λ=0.94 |
//! | `log ewma` | log     | EWMA standard deviation, λ=0.94 |
//!
//! # EWMA
//!
//! With decay `λ` (span `2/(1-λ) - 1`), the weight of the return `i`
//! periods before the most recent one is `λ^i`. The estimate at the last
//! observation is the bias-corrected weighted standard deviation:
//! ```text
//! μ   = Σ wᵢxᵢ / Σ wᵢ
//! σ²  = [Σ wᵢ(xᵢ - μ)² / Σ wᵢ] * (Σ wᵢ)² / ((Σ wᵢ)² - Σ wᵢ²)
//! ```
//! With two returns this reduces to the sample standard deviation.

use super::returns::{ReturnKind, ReturnSeries};
use crate::error::{validation::*, PricingError, PricingResult};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Trading days per year used to annualise periodic estimates
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// RiskMetrics decay factor
pub const DEFAULT_EWMA_LAMBDA: f64 = 0.94;

/// Interchangeable volatility estimation strategy
pub trait VolatilityEstimator {
    fn return_kind(&self) -> ReturnKind;

    /// Standard deviation of one period's return
    fn periodic_volatility(&self, returns: &ReturnSeries) -> PricingResult<f64>;

    /// Annualised volatility of a close-price series
    fn estimate(&self, prices: &[f64]) -> PricingResult<f64> {
        let returns = ReturnSeries::from_prices(prices, self.return_kind())?;
        let periodic = self.periodic_volatility(&returns)?;
        Ok(annualise(periodic))
    }
}

pub fn annualise(periodic: f64) -> f64 {
    periodic * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Sample standard deviation of returns
#[derive(Debug, Clone, Copy)]
pub struct SampleStdDev {
    pub kind: ReturnKind,
}

impl VolatilityEstimator for SampleStdDev {
    fn return_kind(&self) -> ReturnKind {
        self.kind
    }

    fn periodic_volatility(&self, returns: &ReturnSeries) -> PricingResult<f64> {
        returns.sample_std()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EwmaConfig {
    pub lambda: f64,
}

impl Default for EwmaConfig {
    fn default() -> Self {
        EwmaConfig {
            lambda: DEFAULT_EWMA_LAMBDA,
        }
    }
}

impl EwmaConfig {
    pub fn validate(&self) -> PricingResult<()> {
        validate_finite("lambda", self.lambda)?;
        if self.lambda <= 0.0 || self.lambda >= 1.0 {
            return Err(PricingError::domain(
                "lambda",
                self.lambda,
                "decay must lie in (0, 1)",
            ));
        }
        Ok(())
    }

    /// Equivalent pandas-style span, `2/(1-λ) - 1`
    pub fn span(&self) -> f64 {
        2.0 / (1.0 - self.lambda) - 1.0
    }

    /// Smoothing factor `α = 2/(span+1) = 1 - λ`
    pub fn alpha(&self) -> f64 {
        2.0 / (self.span() + 1.0)
    }
}

/// Exponentially weighted standard deviation of returns
#[derive(Debug, Clone, Copy)]
pub struct Ewma {
    pub kind: ReturnKind,
    pub config: EwmaConfig,
}

impl Ewma {
    pub fn new(kind: ReturnKind) -> Self {
        Ewma {
            kind,
            config: EwmaConfig::default(),
        }
    }
}

impl VolatilityEstimator for Ewma {
    fn return_kind(&self) -> ReturnKind {
        self.kind
    }

    fn periodic_volatility(&self, returns: &ReturnSeries) -> PricingResult<f64> {
        self.config.validate()?;
        ewma_std(returns.values(), 1.0 - self.config.alpha())
    }
}

/// Bias-corrected EWMA standard deviation at the last observation
pub fn ewma_std(values: &[f64], decay: f64) -> PricingResult<f64> {
    validate_min_len("EWMA standard deviation", values.len(), 2)?;

    let n = values.len();
    let mut sum_w = 0.0;
    let mut sum_w2 = 0.0;
    let mut sum_wx = 0.0;
    let mut weights = Vec::with_capacity(n);
    let mut w = 1.0;
    // walk from the most recent observation backwards
    for &x in values.iter().rev() {
        weights.push(w);
        sum_w += w;
        sum_w2 += w * w;
        sum_wx += w * x;
        w *= decay;
    }
    let mean = sum_wx / sum_w;
    let biased = values
        .iter()
        .rev()
        .zip(&weights)
        .map(|(x, w)| w * (x - mean).powi(2))
        .sum::<f64>()
        / sum_w;

    let denom = sum_w * sum_w - sum_w2;
    if denom <= 0.0 {
        return Err(PricingError::InsufficientData {
            context: "EWMA standard deviation (effective weight)".to_string(),
            required: 2,
            actual: n,
        });
    }
    Ok((biased * sum_w * sum_w / denom).max(0.0).sqrt())
}

/// Named volatility strategy, as offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VolatilityMethod {
    Std,
    #[default]
    Log,
    Ewma,
    LogEwma,
}

impl VolatilityMethod {
    pub const ALL: [VolatilityMethod; 4] = [
        VolatilityMethod::Std,
        VolatilityMethod::Log,
        VolatilityMethod::Ewma,
        VolatilityMethod::LogEwma,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            VolatilityMethod::Std => "std",
            VolatilityMethod::Log => "log",
            VolatilityMethod::Ewma => "ewma",
            VolatilityMethod::LogEwma => "log ewma",
        }
    }

    pub fn return_kind(&self) -> ReturnKind {
        match self {
            VolatilityMethod::Std | VolatilityMethod::Ewma => ReturnKind::Simple,
            VolatilityMethod::Log | VolatilityMethod::LogEwma => ReturnKind::Log,
        }
    }

    pub fn estimator(&self) -> Box<dyn VolatilityEstimator + Send + Sync> {
        let kind = self.return_kind();
        match self {
            VolatilityMethod::Std | VolatilityMethod::Log => Box::new(SampleStdDev { kind }),
            VolatilityMethod::Ewma | VolatilityMethod::LogEwma => Box::new(Ewma::new(kind)),
        }
    }

    pub fn estimate(&self, prices: &[f64]) -> PricingResult<f64> {
        debug!(method = self.name(), points = prices.len(), "estimating volatility");
        self.estimator().estimate(prices)
    }
}

impl fmt::Display for VolatilityMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VolatilityMethod {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalised.as_str() {
            "std" => Ok(VolatilityMethod::Std),
            "log" => Ok(VolatilityMethod::Log),
            "ewma" => Ok(VolatilityMethod::Ewma),
            "log ewma" => Ok(VolatilityMethod::LogEwma),
            _ => Err(PricingError::invalid_argument(
                "volatility method",
                s,
                "one of std, log, ewma, log ewma",
            )),
        }
    }
}

/// Annualised volatility of `prices` using the strategy named `method`
pub fn get_volatility(prices: &[f64], method: &str) -> PricingResult<f64> {
    method.parse::<VolatilityMethod>()?.estimate(prices)
}
