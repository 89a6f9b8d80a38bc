// src/market/synthetic.rs
//! Offline market-data source backed by seeded geometric Brownian motion
//!
//! Closes follow the exact GBM step
//! ```text
//! S_{t+dt} = S_t * exp((μ - σ²/2)dt + σ√dt * Z),   dt = 1/252
//! ```
//! with one close per weekday. Each ticker has a single path starting
//! [`HISTORY_DAYS`] calendar days before the as-of date; every history
//! request is a slice of that path, so overlapping windows agree on the
//! dates they share. Option quotes are Black-Scholes prices at the ticker's
//! true volatility, perturbed by a few percent of noise, with a fraction of
//! quotes left unlisted. Same seed, same data.

use super::chain::{ExpirySlice, OptionChain, OptionQuote};
use super::params::{tbill_quote_to_rate, MarketDataSource};
use crate::analytics::bs_analytic::PricingInputs;
use crate::dates::years_between;
use crate::error::{validation::*, PricingError, PricingResult};
use crate::grid::ranges::strike_range;
use crate::volatility::TRADING_DAYS_PER_YEAR;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use std::collections::HashMap;

/// Calendar days of history simulated before the as-of date
pub const HISTORY_DAYS: i64 = 3650;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticTicker {
    /// Close on the first day of the simulated history
    pub s0: f64,
    pub mu: f64,
    pub sigma: f64,
    pub seed: u64,
}

#[derive(Debug, Clone)]
pub struct SyntheticMarket {
    as_of: NaiveDate,
    tbill_percent: f64,
    tickers: HashMap<String, SyntheticTicker>,
    /// Expirations offered in each chain, spaced 30 days apart
    pub expiries: usize,
    /// Strikes either side of spot in each chain
    pub strike_radius: usize,
    /// Probability that a quote is not listed
    pub missing_rate: f64,
}

impl SyntheticMarket {
    pub fn new(as_of: NaiveDate, tbill_percent: f64) -> Self {
        SyntheticMarket {
            as_of,
            tbill_percent,
            tickers: HashMap::new(),
            expiries: 8,
            strike_radius: 6,
            missing_rate: 0.15,
        }
    }

    pub fn with_ticker(mut self, symbol: &str, ticker: SyntheticTicker) -> Self {
        self.tickers.insert(symbol.to_uppercase(), ticker);
        self
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    fn lookup(&self, symbol: &str) -> PricingResult<&SyntheticTicker> {
        self.tickers
            .get(&symbol.to_uppercase())
            .ok_or_else(|| PricingError::upstream(self.name(), format!("{} is not a valid ticker symbol", symbol)))
    }

    /// First date of every ticker's simulated path
    pub fn history_start(&self) -> NaiveDate {
        self.as_of - Duration::days(HISTORY_DAYS)
    }

    /// The full dated path for `symbol`, weekdays only, ending at `as_of`
    fn path(&self, symbol: &str) -> PricingResult<Vec<(NaiveDate, f64)>> {
        let params = self.lookup(symbol)?;
        let dates: Vec<NaiveDate> = self
            .history_start()
            .iter_days()
            .take_while(|d| *d <= self.as_of)
            .filter(|d| is_weekday(*d))
            .collect();
        let closes = simulate_closes(params.s0, params.mu, params.sigma, dates.len(), params.seed)?;
        Ok(dates.into_iter().zip(closes).collect())
    }

    fn spot(&self, symbol: &str) -> PricingResult<f64> {
        self.path(symbol)?
            .last()
            .map(|&(_, close)| close)
            .ok_or_else(|| PricingError::upstream(self.name(), format!("no closes for {}", symbol)))
    }
}

fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Seeded GBM path of `n` closes starting at `s0`
pub fn simulate_closes(s0: f64, mu: f64, sigma: f64, n: usize, seed: u64) -> PricingResult<Vec<f64>> {
    validate_positive("s0", s0)?;
    validate_finite("mu", mu)?;
    validate_non_negative("sigma", sigma)?;

    let dt = 1.0 / TRADING_DAYS_PER_YEAR;
    let drift = (mu - 0.5 * sigma * sigma) * dt;
    let diffusion = sigma * dt.sqrt();
    let mut rng = StdRng::seed_from_u64(seed);

    let mut closes = Vec::with_capacity(n);
    let mut s = s0;
    for _ in 0..n {
        closes.push(s);
        let z: f64 = StandardNormal.sample(&mut rng);
        s *= (drift + diffusion * z).exp();
    }
    Ok(closes)
}

impl MarketDataSource for SyntheticMarket {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn close_history(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> PricingResult<Vec<f64>> {
        Ok(self
            .path(ticker)?
            .into_iter()
            .filter(|&(date, _)| date >= start && date <= end)
            .map(|(_, close)| close)
            .collect())
    }

    fn risk_free_rate(&self) -> PricingResult<f64> {
        tbill_quote_to_rate(self.tbill_percent)
    }

    fn option_chain(&self, ticker: &str) -> PricingResult<OptionChain> {
        let params = *self.lookup(ticker)?;
        let spot = self.spot(ticker)?;
        let r = self.risk_free_rate()?;
        let strikes = strike_range(spot, self.strike_radius)?;
        let mut rng = StdRng::seed_from_u64(params.seed ^ 0x9e37_79b9_7f4a_7c15);

        let mut slices = Vec::with_capacity(self.expiries);
        for i in 1..=self.expiries {
            let expiration = self.as_of + Duration::days(30 * i as i64);
            let big_t = years_between(self.as_of, expiration);
            let mut calls = Vec::with_capacity(strikes.len());
            let mut puts = Vec::with_capacity(strikes.len());
            for &k in &strikes {
                let (call, put) = PricingInputs::new(spot, k, big_t, 0.0, r, params.sigma).prices()?;
                if rng.gen::<f64>() >= self.missing_rate {
                    calls.push(OptionQuote::new(k, noisy(call, &mut rng)));
                }
                if rng.gen::<f64>() >= self.missing_rate {
                    puts.push(OptionQuote::new(k, noisy(put, &mut rng)));
                }
            }
            slices.push(ExpirySlice {
                expiration,
                calls,
                puts,
            });
        }

        Ok(OptionChain {
            ticker: ticker.to_uppercase(),
            slices,
        })
    }
}

fn noisy(price: f64, rng: &mut StdRng) -> f64 {
    let z: f64 = StandardNormal.sample(rng);
    // quotes are rounded to the cent like a real tape
    ((price * (1.0 + 0.03 * z)).max(0.01) * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market() -> SyntheticMarket {
        SyntheticMarket::new(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(), 4.5).with_ticker(
            "abc",
            SyntheticTicker {
                s0: 120.0,
                mu: 0.05,
                sigma: 0.3,
                seed: 7,
            },
        )
    }

    #[test]
    fn test_history_is_reproducible() {
        let m = market();
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let a = m.close_history("ABC", start, m.as_of()).unwrap();
        let b = m.close_history("abc", start, m.as_of()).unwrap();
        assert_eq!(a, b);
        assert!(a.len() > 100);

        let full = m.close_history("ABC", m.history_start(), m.as_of()).unwrap();
        assert_eq!(full[0], 120.0);
    }

    #[test]
    fn test_overlapping_windows_agree() {
        let m = market();
        let end = m.as_of();
        let long = m.close_history("ABC", end - Duration::days(365), end).unwrap();
        let short = m.close_history("ABC", end - Duration::days(30), end).unwrap();
        assert!(!short.is_empty() && short.len() < long.len());
        assert_eq!(&long[long.len() - short.len()..], &short[..]);

        // a window ending earlier is a prefix of the same dates
        let earlier = m
            .close_history("ABC", end - Duration::days(365), end - Duration::days(30))
            .unwrap();
        assert_eq!(&long[..earlier.len()], &earlier[..]);
        assert_eq!(m.spot("ABC").unwrap(), *long.last().unwrap());
    }

    #[test]
    fn test_window_before_history_is_empty() {
        let m = market();
        let before = m.history_start() - Duration::days(10);
        let closes = m.close_history("ABC", before - Duration::days(30), before).unwrap();
        assert!(closes.is_empty());
    }

    #[test]
    fn test_unknown_ticker() {
        let m = market();
        assert!(matches!(
            m.option_chain("XYZ"),
            Err(PricingError::UpstreamUnavailable { .. })
        ));
    }

    #[test]
    fn test_chain_shape() {
        let m = market();
        let chain = m.option_chain("ABC").unwrap();
        assert_eq!(chain.slices.len(), m.expiries);
        assert!(chain.strike_union().len() <= 2 * m.strike_radius);
        assert!(chain.slices.iter().all(|s| s.expiration > m.as_of()));
    }
}
