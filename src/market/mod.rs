// src/market/mod.rs
pub mod chain;
pub mod params;
pub mod synthetic;

pub use chain::{ExpirySlice, MarketSurface, OptionChain, OptionQuote};
pub use params::{assemble_parameters, tbill_quote_to_rate, AssemblerConfig, BsParameters, MarketDataSource};
pub use synthetic::{SyntheticMarket, SyntheticTicker};
