// src/analytics/mod.rs
pub mod bs_analytic;
pub mod greeks;

use std::fmt;

/// Call or put side of a European option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionSide {
    Call,
    Put,
}

impl fmt::Display for OptionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionSide::Call => f.write_str("Call"),
            OptionSide::Put => f.write_str("Put"),
        }
    }
}

pub use bs_analytic::{euro_call_price, euro_put_price, PricingInputs};
pub use greeks::{compute_greek, compute_greeks, Greek, GreekSelection, GreekSet, OptionGreeks, TimeConvention};
