//! # bs-surface: Black-Scholes Pricing Surfaces
//!
//! A Rust library that prices European calls and puts under Black-Scholes,
//! estimates historical volatility from close prices, and evaluates prices
//! and Greeks over strike × expiration grids for heatmap rendering.
//!
//! ## Key Features
//!
//! - **Closed-form pricing**: call price with put from put-call parity
//! - **Greeks**: Delta, Gamma, Theta (per day), Vega and Rho (per point)
//! - **Volatility**: `std`, `log`, `ewma` and `log ewma` estimators
//! - **Grids**: parallel strike × expiration sweeps with Rayon, missing
//!   cells marked not available instead of aborting the sweep
//! - **Market data**: option-chain matrices with sparse-row elimination
//! - **PnL**: payoff-minus-premium profiles and break-even prices
//!
//! ## Quick Start
//!
//! ```rust
//! use bs_surface::analytics::PricingInputs;
//! use bs_surface::grid::{price_grid, GridConfig, GridParams};
//!
//! let inputs = PricingInputs::new(100.0, 100.0, 1.0, 0.0, 0.05, 0.2);
//! let call = inputs.call_price().expect("valid inputs");
//! assert!((call - 10.4506).abs() < 1e-4);
//!
//! let params = GridParams::new(100.0, 0.0, 0.05, 0.2);
//! let grid = price_grid(&[90.0, 100.0, 110.0], &[0.25, 0.5], &params, &GridConfig::default())
//!     .expect("valid grid");
//! assert_eq!(grid.shape(), (3, 2));
//! ```
//!
//! All functions are pure; nothing here downloads data or draws charts.
//! Those collaborators plug in through [`market::MarketDataSource`] and the
//! plain matrices in [`grid`].

// Module declarations
pub mod error;
pub mod math_utils;
pub mod analytics;
pub mod pnl;
pub mod volatility;
pub mod grid;
pub mod market;
pub mod dates;
pub mod cache;
pub mod output;

// Re-export commonly used types for convenience
pub use error::{PricingError, PricingResult};
