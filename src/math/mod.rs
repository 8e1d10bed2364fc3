//! Mathematical utilities for the arithmetization layer.

pub mod mpolynomial;
