//! Numerical utilities for equilibrium solving

pub mod roots;

pub use roots::{brent, secant, RootConfig};
