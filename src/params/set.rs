//! The global parameter set shared with the external optimizer.
//!
//! The optimizer owns mutation: on every iteration it supplies updated
//! values, the core resolves each profile's role names and reads `value`,
//! nothing else. Bounds, vary flags, and expressions are carried for the
//! optimizer's benefit (they describe how a parameter may move, not how it
//! is evaluated).
//!
//! Backed by a `BTreeMap` so iteration order (and therefore any derived
//! output) is deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One fit parameter as seen by the optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub value: f64,
    /// Whether the optimizer may vary this parameter.
    pub vary: bool,
    /// Lower bound, if any.
    pub min: Option<f64>,
    /// Upper bound, if any.
    pub max: Option<f64>,
    /// Algebraic constraint expression, if any (opaque to this crate).
    pub expr: Option<String>,
}

impl Parameter {
    /// A varied, unbounded parameter.
    pub fn new(value: f64) -> Self {
        Parameter {
            value,
            vary: true,
            min: None,
            max: None,
            expr: None,
        }
    }

    /// A fixed, unbounded parameter.
    pub fn fixed(value: f64) -> Self {
        Parameter {
            vary: false,
            ..Parameter::new(value)
        }
    }

    pub fn with_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }
}

/// Ordered mapping from canonical parameter name to its record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    entries: BTreeMap<String, Parameter>,
}

impl Parameters {
    pub fn new() -> Self {
        Parameters::default()
    }

    /// Insert or replace a parameter.
    pub fn add(&mut self, name: impl Into<String>, parameter: Parameter) {
        self.entries.insert(name.into(), parameter);
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.entries.get(name)
    }

    /// Current value of a required parameter.
    pub fn value(&self, name: &str) -> Result<f64> {
        self.entries
            .get(name)
            .map(|p| p.value)
            .ok_or_else(|| Error::MissingParameter(name.to_string()))
    }

    /// Update a value in place (optimizer-side helper; the evaluation core
    /// never calls this).
    pub fn set_value(&mut self, name: &str, value: f64) -> Result<()> {
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| Error::MissingParameter(name.to_string()))?;
        entry.value = value;
        Ok(())
    }

    /// Merge default seedings from another set, keeping existing entries.
    ///
    /// Profiles measured under identical conditions resolve the same names,
    /// so the first profile to seed a shared parameter wins and later
    /// profiles simply attach to it.
    pub fn merge_defaults(&mut self, defaults: Parameters) {
        for (name, parameter) in defaults.entries {
            self.entries.entry(name).or_insert(parameter);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Parameter)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_resolves_or_fails_with_missing_parameter() {
        let mut params = Parameters::new();
        params.add("pb__t-25.0", Parameter::new(0.05).with_bounds(Some(0.0), Some(1.0)));

        assert!((params.value("pb__t-25.0").unwrap() - 0.05).abs() < 1e-15);
        let err = params.value("kex_ab__t-25.0").unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn merge_defaults_keeps_first_seeding() {
        let mut params = Parameters::new();
        params.add("pb__t-25.0", Parameter::new(0.07));

        let mut defaults = Parameters::new();
        defaults.add("pb__t-25.0", Parameter::new(0.05));
        defaults.add("kex_ab__t-25.0", Parameter::new(200.0));

        params.merge_defaults(defaults);
        assert_eq!(params.len(), 2);
        assert!((params.value("pb__t-25.0").unwrap() - 0.07).abs() < 1e-15);
        assert!((params.value("kex_ab__t-25.0").unwrap() - 200.0).abs() < 1e-15);
    }

    #[test]
    fn set_value_requires_existing_entry() {
        let mut params = Parameters::new();
        assert!(params.set_value("pb", 0.1).is_err());
        params.add("pb", Parameter::fixed(0.0));
        params.set_value("pb", 0.1).unwrap();
        assert!((params.value("pb").unwrap() - 0.1).abs() < 1e-15);
    }
}
