// src/grid/mod.rs
pub mod evaluator;
pub mod filter;
pub mod matrix;
pub mod ranges;

pub use evaluator::{
    evaluate_grid, greek_grid, greek_surfaces, model_error, price_grid, price_grid_cached, GridConfig, GridParams,
};
pub use filter::{filter_market, remove_sparse_rows, slice_market, MarketWindow};
pub use matrix::{CallPutMatrices, OptionMatrix, NOT_AVAILABLE};
pub use ranges::{default_window, expiration_range, strike_increment, strike_range, TimeScale};
