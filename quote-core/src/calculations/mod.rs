//! Quote recalculation.
//!
//! This module derives every computed field of a [`crate::QuoteDocument`]
//! from its raw inputs: item totals, labour quantities, per-row VAT and the
//! grand totals.

pub mod common;
pub mod recalculate;

pub use recalculate::{LabourQuantities, QuoteCalculator, recalculate, recalculated};
