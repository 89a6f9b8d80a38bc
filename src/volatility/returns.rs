// src/volatility/returns.rs
use crate::error::{validation::*, PricingResult};

/// How per-period returns are derived from consecutive closes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReturnKind {
    /// `P_t / P_{t-1} - 1`
    Simple,
    /// `ln(P_t / P_{t-1})`
    Log,
}

/// Ordered per-period returns of a close-price series
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    kind: ReturnKind,
    values: Vec<f64>,
}

impl ReturnSeries {
    /// Derive returns from closes ordered by date ascending.
    ///
    /// Fails with `InsufficientData` below two prices and with `Domain`
    /// on a non-finite or non-positive close.
    pub fn from_prices(prices: &[f64], kind: ReturnKind) -> PricingResult<Self> {
        validate_min_len("return series", prices.len(), 2)?;
        for &p in prices {
            validate_positive("close", p)?;
        }

        let values = prices
            .windows(2)
            .map(|w| match kind {
                ReturnKind::Simple => w[1] / w[0] - 1.0,
                ReturnKind::Log => (w[1] / w[0]).ln(),
            })
            .collect();

        Ok(ReturnSeries { kind, values })
    }

    pub fn kind(&self) -> ReturnKind {
        self.kind
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Sample standard deviation (n - 1 denominator)
    pub fn sample_std(&self) -> PricingResult<f64> {
        validate_min_len("sample standard deviation", self.values.len(), 2)?;
        let mean = self.mean();
        let ss = self.values.iter().map(|x| (x - mean).powi(2)).sum::<f64>();
        Ok((ss / (self.values.len() as f64 - 1.0)).sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_length_is_one_less_than_prices() {
        let prices = [100.0, 102.0, 101.0, 105.0];
        let r = ReturnSeries::from_prices(&prices, ReturnKind::Simple).unwrap();
        assert_eq!(r.len(), 3);
        assert_relative_eq!(r.values()[0], 0.02, epsilon = 1e-15);
    }

    #[test]
    fn test_log_returns_sum_to_total_log_move() {
        let prices = [100.0, 110.0, 90.0, 120.0];
        let r = ReturnSeries::from_prices(&prices, ReturnKind::Log).unwrap();
        let total: f64 = r.values().iter().sum();
        assert_relative_eq!(total, (120.0f64 / 100.0).ln(), epsilon = 1e-14);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(ReturnSeries::from_prices(&[100.0], ReturnKind::Log).is_err());
        assert!(ReturnSeries::from_prices(&[], ReturnKind::Simple).is_err());
        assert!(ReturnSeries::from_prices(&[100.0, 0.0, 1.0], ReturnKind::Log)
            .unwrap_err()
            .is_domain());
    }
}
