//! Canonical global parameter names.
//!
//! A physical quantity measured under identical conditions must resolve to
//! the same global identifier, so independently loaded profiles share the
//! corresponding fit parameter. Conversely, distinct condition sets must
//! never collide.
//!
//! Both properties fall out of the encoding: conditions are emitted as
//! labelled segments in a fixed order, numeric conditions with fixed
//! precision, everything lower-cased. `pb` at 25 °C becomes `pb__t-25.0`;
//! `dw_ab` for nucleus `g10n` at 25 °C becomes `dw_ab__nuc-g10n__t-25.0`.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// A physical-quantity name plus the conditions it was measured under.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterName {
    quantity: String,
    nuclei: Option<String>,
    temperature: Option<f64>,
    h_larmor_frq: Option<f64>,
}

impl ParameterName {
    pub fn new(quantity: &str) -> Self {
        ParameterName {
            quantity: quantity.trim().to_ascii_lowercase(),
            nuclei: None,
            temperature: None,
            h_larmor_frq: None,
        }
    }

    pub fn with_nuclei(mut self, nuclei: &str) -> Self {
        self.nuclei = Some(nuclei.trim().to_ascii_lowercase());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_h_larmor_frq(mut self, h_larmor_frq: f64) -> Self {
        self.h_larmor_frq = Some(h_larmor_frq);
        self
    }

    /// Build from a string-keyed condition map.
    ///
    /// Recognized keys: `nuclei`, `temperature`, `h_larmor_frq`. Anything
    /// else is a configuration error.
    pub fn from_conditions(quantity: &str, conditions: &BTreeMap<String, String>) -> Result<Self> {
        let mut name = ParameterName::new(quantity);
        for (key, value) in conditions {
            match key.as_str() {
                "nuclei" => name = name.with_nuclei(value),
                "temperature" => name = name.with_temperature(parse_condition(key, value)?),
                "h_larmor_frq" => name = name.with_h_larmor_frq(parse_condition(key, value)?),
                other => {
                    return Err(Error::config(format!(
                        "Unrecognized parameter condition key '{other}'."
                    )));
                }
            }
        }
        Ok(name)
    }

    /// The canonical global identifier.
    ///
    /// Pure and deterministic: identical quantity/conditions always produce
    /// the identical string. Numeric conditions are formatted with one
    /// decimal so equal floats render identically.
    pub fn full_name(&self) -> String {
        let mut out = self.quantity.clone();
        if let Some(nuclei) = &self.nuclei {
            out.push_str(&format!("__nuc-{nuclei}"));
        }
        if let Some(temperature) = self.temperature {
            out.push_str(&format!("__t-{temperature:.1}"));
        }
        if let Some(frq) = self.h_larmor_frq {
            out.push_str(&format!("__b0-{frq:.1}"));
        }
        out
    }
}

fn parse_condition(key: &str, value: &str) -> Result<f64> {
    value.trim().parse::<f64>().map_err(|_| {
        Error::config(format!(
            "Invalid value '{value}' for parameter condition '{key}'."
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_is_deterministic() {
        let a = ParameterName::new("pb").with_temperature(25.0).full_name();
        let b = ParameterName::new("pb").with_temperature(25.0).full_name();
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_conditions_never_collide() {
        let plain = ParameterName::new("pb").full_name();
        let with_t = ParameterName::new("pb").with_temperature(25.0).full_name();
        let with_nuc = ParameterName::new("pb").with_nuclei("g10n").full_name();
        let with_both = ParameterName::new("pb")
            .with_nuclei("g10n")
            .with_temperature(25.0)
            .full_name();

        let names = [plain, with_t, with_nuc, with_both];
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn full_name_uses_labelled_segments() {
        let name = ParameterName::new("dw_ab")
            .with_nuclei("G10N")
            .with_temperature(25.0)
            .full_name();
        assert_eq!(name, "dw_ab__nuc-g10n__t-25.0");
    }

    #[test]
    fn same_nucleus_different_field_shares_name_without_b0() {
        // dw_ab is field-independent: profiles at 600 and 800 MHz must share it.
        let at_600 = ParameterName::new("dw_ab")
            .with_nuclei("g10n")
            .with_temperature(25.0)
            .full_name();
        let at_800 = ParameterName::new("dw_ab")
            .with_nuclei("g10n")
            .with_temperature(25.0)
            .full_name();
        assert_eq!(at_600, at_800);
    }

    #[test]
    fn from_conditions_rejects_unknown_keys() {
        let mut conditions = BTreeMap::new();
        conditions.insert("temperature".to_string(), "25.0".to_string());
        conditions.insert("ph".to_string(), "7.4".to_string());
        let err = ParameterName::from_conditions("pb", &conditions).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn from_conditions_matches_builder() {
        let mut conditions = BTreeMap::new();
        conditions.insert("temperature".to_string(), "25.0".to_string());
        conditions.insert("nuclei".to_string(), "g10n".to_string());
        let from_map = ParameterName::from_conditions("dw_ab", &conditions)
            .unwrap()
            .full_name();
        let from_builder = ParameterName::new("dw_ab")
            .with_nuclei("g10n")
            .with_temperature(25.0)
            .full_name();
        assert_eq!(from_map, from_builder);
    }
}
