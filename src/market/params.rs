// src/market/params.rs
//! Boundary with the market-data collaborator
//!
//! The core never downloads anything. A [`MarketDataSource`] hands over
//! already-fetched closes, a risk-free rate and an option chain, and
//! [`assemble_parameters`] reduces them to the three Black-Scholes scalars.

use super::chain::OptionChain;
use crate::error::{validation::*, PricingError, PricingResult};
use crate::volatility::VolatilityMethod;
use chrono::{Duration, NaiveDate};
use tracing::{debug, info};

/// Data a ticker lookup must provide
pub trait MarketDataSource {
    fn name(&self) -> &str;

    /// Closes between `start` and `end` inclusive, ordered by date ascending
    fn close_history(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> PricingResult<Vec<f64>>;

    /// Annualised risk-free rate as a decimal
    fn risk_free_rate(&self) -> PricingResult<f64>;

    fn option_chain(&self, ticker: &str) -> PricingResult<OptionChain>;
}

/// Convert a T-bill yield quoted in percent to a decimal rate
pub fn tbill_quote_to_rate(percent: f64) -> PricingResult<f64> {
    validate_finite("T-bill quote", percent)?;
    Ok(percent / 100.0)
}

/// The three scalar Black-Scholes inputs taken from market data
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BsParameters {
    pub r: f64,
    pub sigma: f64,
    pub s: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssemblerConfig {
    /// Calendar days of history behind the volatility estimate
    pub lookback_days: i64,
    pub method: VolatilityMethod,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        AssemblerConfig {
            lookback_days: 365,
            method: VolatilityMethod::Log,
        }
    }
}

impl AssemblerConfig {
    pub fn validate(&self) -> PricingResult<()> {
        if self.lookback_days <= 0 {
            return Err(PricingError::invalid_argument(
                "lookback_days",
                &self.lookback_days.to_string(),
                "a positive number of days",
            ));
        }
        Ok(())
    }
}

/// Risk-free rate, volatility and spot for `ticker` as of `today`.
///
/// # Errors
/// `UpstreamUnavailable` when the source has no history for the ticker;
/// estimator errors propagate unchanged.
pub fn assemble_parameters<M: MarketDataSource + ?Sized>(
    source: &M,
    ticker: &str,
    today: NaiveDate,
    config: &AssemblerConfig,
) -> PricingResult<BsParameters> {
    config.validate()?;
    let start = today - Duration::days(config.lookback_days);

    debug!(source = source.name(), ticker, %start, %today, "fetching close history");
    let closes = source.close_history(ticker, start, today)?;
    let s = *closes
        .last()
        .ok_or_else(|| PricingError::upstream(source.name(), format!("no price history for {}", ticker)))?;
    validate_positive("S", s)?;

    let r = source.risk_free_rate()?;
    let sigma = config.method.estimate(&closes)?;

    info!(ticker, r, sigma, s, method = %config.method, "assembled Black-Scholes parameters");
    Ok(BsParameters { r, sigma, s })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::chain::OptionChain;

    struct Fixed {
        closes: Vec<f64>,
    }

    impl MarketDataSource for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn close_history(&self, ticker: &str, _: NaiveDate, _: NaiveDate) -> PricingResult<Vec<f64>> {
            if ticker == "KNOWN" {
                Ok(self.closes.clone())
            } else {
                Err(PricingError::upstream("fixed", format!("unknown ticker {}", ticker)))
            }
        }

        fn risk_free_rate(&self) -> PricingResult<f64> {
            tbill_quote_to_rate(4.2)
        }

        fn option_chain(&self, ticker: &str) -> PricingResult<OptionChain> {
            Err(PricingError::upstream("fixed", format!("no chain for {}", ticker)))
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    #[test]
    fn test_spot_is_last_close() {
        let source = Fixed {
            closes: vec![100.0, 101.0, 99.0, 102.5],
        };
        let p = assemble_parameters(&source, "KNOWN", today(), &AssemblerConfig::default()).unwrap();
        assert_eq!(p.s, 102.5);
        assert!((p.r - 0.042).abs() < 1e-15);
        assert!(p.sigma > 0.0);
    }

    #[test]
    fn test_unknown_ticker_is_upstream_error() {
        let source = Fixed { closes: vec![] };
        let err = assemble_parameters(&source, "NOPE", today(), &AssemblerConfig::default()).unwrap_err();
        assert!(matches!(err, PricingError::UpstreamUnavailable { .. }));
    }

    #[test]
    fn test_empty_history_is_upstream_error() {
        let source = Fixed { closes: vec![] };
        let err = assemble_parameters(&source, "KNOWN", today(), &AssemblerConfig::default()).unwrap_err();
        assert!(matches!(err, PricingError::UpstreamUnavailable { .. }));
    }
}
