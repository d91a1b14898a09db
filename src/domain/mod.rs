//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - nuclei and their frequency-conversion factors (`Atom`)
//! - assignment parsing into per-nucleus resonances (`Peak`, `Resonance`)
//! - the experiment-kind registry and validated experiment configuration
//!   (`ExperimentKind`, `ExperimentConfig`, `Measurement`)

pub mod atoms;
pub mod experiment;
pub mod peaks;

pub use atoms::*;
pub use experiment::*;
pub use peaks::*;
