//! `exshift` library crate.
//!
//! The binary (`exshift`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the forward-model/residual interface is consumable by an external
//!   least-squares driver without dragging in any presentation code
//! - modules stay easy to navigate as more experiment families are added

pub mod app;
pub mod cache;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod params;
pub mod profile;
pub mod report;
