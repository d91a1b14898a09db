//! Assignment strings and resonances.
//!
//! A measurement row is keyed by an assignment such as `G10N-HN` or simply
//! `G23`: a residue group (one-letter code plus sequence number), an optional
//! atom annotation for the observed nucleus, and an optional `-`-separated
//! annotation for the coupled nucleus. When the atoms are not spelled out the
//! experiment kind supplies the default pair.
//!
//! Resonance names are normalized to lower case so that the same nucleus
//! measured in different experiments resolves to the same global parameter.

use crate::domain::Atom;
use crate::error::{Error, Result};

/// One nucleus within a measured entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resonance {
    /// Normalized display name, e.g. `g10n`.
    pub name: String,
    pub atom: Atom,
}

/// A parsed assignment: the observed nucleus (i) and the coupled nucleus (s).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peak {
    /// The assignment string as it appeared in the measurement file.
    pub name: String,
    pub resonance_i: Resonance,
    pub resonance_s: Resonance,
}

impl Peak {
    /// Parse an assignment, falling back to `default_atoms` (observed,
    /// coupled) when the string does not annotate its nuclei.
    pub fn parse(name: &str, default_atoms: (Atom, Atom)) -> Result<Self> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(Error::config("Empty assignment string."));
        }

        let (first, second) = match trimmed.split_once('-') {
            Some((a, b)) => (a, Some(b)),
            None => (trimmed, None),
        };

        let (group, annotation_i) = split_group(first)?;

        let (atom_i, suffix_i) = match annotation_i {
            Some(ann) => (Atom::from_symbol(&ann[..1])?, ann),
            None => (default_atoms.0, default_atoms.0.symbol().to_string()),
        };

        let (atom_s, suffix_s) = match second {
            Some(ann) => {
                let ann = ann.trim();
                if ann.is_empty() || !ann.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(Error::config(format!(
                        "Invalid coupled-nucleus annotation in assignment '{trimmed}'."
                    )));
                }
                (Atom::from_symbol(&ann[..1])?, ann.to_string())
            }
            None => (default_atoms.1, default_atoms.1.symbol().to_string()),
        };

        let group_lower = group.to_ascii_lowercase();
        let resonance_i = Resonance {
            name: format!("{group_lower}{}", suffix_i.to_ascii_lowercase()),
            atom: atom_i,
        };
        let resonance_s = Resonance {
            name: format!("{group_lower}{}", suffix_s.to_ascii_lowercase()),
            atom: atom_s,
        };

        Ok(Peak {
            name: trimmed.to_string(),
            resonance_i,
            resonance_s,
        })
    }
}

/// Split `G10N` into the residue group (`G10`) and the trailing atom
/// annotation (`N`), if any.
fn split_group(segment: &str) -> Result<(String, Option<String>)> {
    let last_digit = segment
        .char_indices()
        .filter(|(_, c)| c.is_ascii_digit())
        .map(|(i, _)| i)
        .next_back()
        .ok_or_else(|| {
            Error::config(format!(
                "Invalid assignment segment '{segment}' (no residue number)."
            ))
        })?;

    let group = &segment[..=last_digit];
    let rest = &segment[last_digit + 1..];

    if rest.is_empty() {
        Ok((group.to_string(), None))
    } else if rest.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok((group.to_string(), Some(rest.to_string())))
    } else {
        Err(Error::config(format!(
            "Invalid atom annotation '{rest}' in assignment segment '{segment}'."
        )))
    }
}
