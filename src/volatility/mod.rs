// src/volatility/mod.rs
pub mod estimators;
pub mod returns;

pub use estimators::{
    annualise, ewma_std, get_volatility, Ewma, EwmaConfig, SampleStdDev, VolatilityEstimator,
    VolatilityMethod, DEFAULT_EWMA_LAMBDA, TRADING_DAYS_PER_YEAR,
};
pub use returns::{ReturnKind, ReturnSeries};
