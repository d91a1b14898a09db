//! Numerical core: the two-state exchange eigenvalue solution.

pub mod exchange;

pub use exchange::*;
