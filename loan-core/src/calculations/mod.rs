//! Loan calculations.
//!
//! The amortization engine is pure: it performs no I/O and holds no state.
//! Presentation helpers for currency amounts live in [`common`].

pub mod amortization;
pub mod common;

pub use amortization::{AmortizationEngine, Computation, NotReady, compute};
