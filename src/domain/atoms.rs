//! Nuclei and frequency-conversion factors.
//!
//! Chemical-shift differences are measured in ppm but the exchange engine
//! works in angular frequency. The conversion factor is the spectrometer's
//! base (¹H Larmor) frequency scaled by the nucleus's gyromagnetic ratio
//! relative to ¹H.
//!
//! Only the nuclei reachable from the in-scope experiment family are carried
//! here; this table is the seam to the external physical-constants source.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A nucleus type, keyed by its one-letter symbol in assignment strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Atom {
    H,
    N,
    C,
}

impl Atom {
    /// Resolve a symbol from an assignment string.
    pub fn from_symbol(symbol: &str) -> Result<Self> {
        match symbol.trim().to_ascii_uppercase().as_str() {
            "H" => Ok(Atom::H),
            "N" => Ok(Atom::N),
            "C" => Ok(Atom::C),
            other => Err(Error::config(format!(
                "Unknown atom type '{other}' (no frequency-conversion factor available)."
            ))),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Atom::H => "H",
            Atom::N => "N",
            Atom::C => "C",
        }
    }

    /// Gyromagnetic ratio relative to ¹H.
    pub fn xi_ratio(self) -> f64 {
        match self {
            Atom::H => 1.0,
            Atom::N => 0.101_329_118,
            Atom::C => 0.251_449_530,
        }
    }

    /// Conversion factor from ppm to rad/s at the given ¹H Larmor frequency
    /// (MHz).
    pub fn ppm_to_rads(self, h_larmor_frq: f64) -> f64 {
        h_larmor_frq * 2.0 * PI * self.xi_ratio()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_symbol_accepts_known_nuclei() {
        assert_eq!(Atom::from_symbol("N").unwrap(), Atom::N);
        assert_eq!(Atom::from_symbol("h").unwrap(), Atom::H);
        assert_eq!(Atom::from_symbol(" c ").unwrap(), Atom::C);
    }

    #[test]
    fn from_symbol_rejects_unknown_nuclei() {
        let err = Atom::from_symbol("P").unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn ppm_to_rads_scales_by_xi_ratio() {
        // 15N at 600 MHz: 600 * 2π * 0.101329118
        let expected = 600.0 * 2.0 * PI * 0.101_329_118;
        assert!((Atom::N.ppm_to_rads(600.0) - expected).abs() < 1e-12);
        // 1H is the reference nucleus.
        assert!((Atom::H.ppm_to_rads(600.0) - 600.0 * 2.0 * PI).abs() < 1e-12);
    }
}
