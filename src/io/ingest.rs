//! Measurement-file ingest.
//!
//! Turns a whitespace-delimited shift table (one row per measured entity:
//! assignment, observed shift difference, shift error) into fittable
//! [`Profile`]s.
//!
//! Design goals:
//! - **Strict schema** for the three-column shape (clear errors with line
//!   numbers)
//! - **Deterministic behavior**: profiles come back in file order, and the
//!   derived experiment name is idempotent across loads
//! - **Separation of concerns**: no model evaluation here

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::domain::{ExperimentConfig, ExperimentKind, Measurement};
use crate::error::{Error, Result};
use crate::profile::Profile;

/// Longest accepted assignment identifier.
const MAX_NAME_LEN: usize = 20;

/// One experiment as described by a descriptor file: which measurement file
/// to read and the conditions it was recorded under.
#[derive(Debug, Clone, Deserialize)]
pub struct ExperimentDescriptor {
    /// Measurement file, relative to the experiment directory.
    pub file: String,
    /// Experiment type tag, resolved through [`ExperimentKind::from_tag`].
    #[serde(rename = "type")]
    pub experiment_type: String,
    /// Spectrometer base (¹H Larmor) frequency in MHz.
    pub h_larmor_frq: f64,
    /// Sample temperature in °C.
    pub temperature: f64,
    /// Explicit experiment name; synthesized from the conditions when absent.
    #[serde(default)]
    pub experiment_name: Option<String>,
}

/// Derive the deterministic experiment name.
///
/// An explicit name is trimmed with inner spaces replaced by underscores.
/// Otherwise the name is synthesized from the type tag, the spectrometer
/// frequency, and the temperature (both rounded to integers), lower-cased,
/// so functionally identical experiments name themselves identically across
/// loads.
pub fn name_experiment(
    explicit: Option<&str>,
    type_tag: &str,
    h_larmor_frq: f64,
    temperature: f64,
) -> String {
    match explicit {
        Some(name) => name.trim().replace(' ', "_"),
        None => format!(
            "{}_{:.0}mhz_{:.0}c",
            type_tag.replace('.', "_"),
            h_larmor_frq,
            temperature
        )
        .to_lowercase(),
    }
}

/// Read a measurement file and construct one [`Profile`] per retained row.
///
/// `path` is the experiment directory; the measurement file is
/// `descriptor.file` inside it. Exactly one of `include`/`exclude` applies:
/// `include` keeps only listed assignments, `exclude` drops listed ones, and
/// when both are supplied `include` wins (the ignored `exclude` is logged).
///
/// Returns the retained profiles in file order and the total observed-point
/// count across them.
pub fn read_profiles(
    path: &Path,
    descriptor: &ExperimentDescriptor,
    include: Option<&HashSet<String>>,
    exclude: Option<&HashSet<String>>,
) -> Result<(Vec<Profile>, usize)> {
    let kind = ExperimentKind::from_tag(&descriptor.experiment_type)?;
    let name = name_experiment(
        descriptor.experiment_name.as_deref(),
        &descriptor.experiment_type,
        descriptor.h_larmor_frq,
        descriptor.temperature,
    );
    let config = ExperimentConfig::new(
        kind,
        descriptor.h_larmor_frq,
        descriptor.temperature,
        name,
    )?;

    let full_path = path.join(&descriptor.file);
    let measurements = read_measurements(&full_path)?;
    log::debug!(
        "read {} measurement rows from '{}'",
        measurements.len(),
        full_path.display()
    );

    let mut profiles = Vec::with_capacity(measurements.len());
    for measurement in &measurements {
        profiles.push(Profile::new(measurement, &config)?);
    }

    if include.is_some() && exclude.is_some() {
        log::warn!("both include and exclude filters supplied; include takes precedence");
    }
    if let Some(include) = include {
        profiles.retain(|p| include.contains(p.name()));
    } else if let Some(exclude) = exclude {
        profiles.retain(|p| !exclude.contains(p.name()));
    }

    let ndata = profiles.iter().map(Profile::len).sum();
    log::info!(
        "experiment '{}': {} profiles retained, {} data points",
        config.name,
        profiles.len(),
        ndata
    );

    Ok((profiles, ndata))
}

/// Parse the three-column measurement table.
fn read_measurements(path: &Path) -> Result<Vec<Measurement>> {
    let text = fs::read_to_string(path)
        .map_err(|e| Error::input(path, 0, format!("Failed to read measurement file: {e}")))?;

    let mut measurements = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }

        let fields: Vec<&str> = content.split_whitespace().collect();
        if fields.len() != 3 {
            return Err(Error::input(
                path,
                line,
                format!("Expected 3 columns (name, shift, error), found {}.", fields.len()),
            ));
        }

        let name = fields[0];
        if name.len() > MAX_NAME_LEN {
            return Err(Error::input(
                path,
                line,
                format!("Identifier '{name}' exceeds {MAX_NAME_LEN} characters."),
            ));
        }

        let shift = parse_field(path, line, "shift", fields[1])?;
        let shift_err = parse_field(path, line, "error", fields[2])?;
        if shift_err <= 0.0 {
            return Err(Error::input(
                path,
                line,
                format!("Invalid error {shift_err} (must be > 0)."),
            ));
        }

        measurements.push(Measurement {
            name: name.to_string(),
            shift,
            shift_err,
        });
    }

    if measurements.is_empty() {
        return Err(Error::input(path, 0, "No measurement rows found."));
    }

    Ok(measurements)
}

fn parse_field(path: &Path, line: usize, column: &str, value: &str) -> Result<f64> {
    let parsed = value
        .parse::<f64>()
        .map_err(|_| Error::input(path, line, format!("Invalid {column} value '{value}'.")))?;
    if !parsed.is_finite() {
        return Err(Error::input(
            path,
            line,
            format!("Non-finite {column} value '{value}'."),
        ));
    }
    Ok(parsed)
}
