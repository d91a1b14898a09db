//! Top-level pipeline orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//!
//! - parses the experiment descriptor (JSON)
//! - loads measurement profiles
//! - seeds default fit parameters across all profiles
//! - evaluates residuals and prints the formatted report
//!
//! An external least-squares driver slots in between loading and reporting:
//! it repeatedly updates the parameter values and re-collects
//! `Profile::residuals` until converged. The demo pipeline evaluates at the
//! seeded defaults so the whole path is exercised end to end.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::io::{ExperimentDescriptor, read_profiles};
use crate::params::Parameters;
use crate::profile::Profile;
use crate::report::format_profiles;

/// All computed outputs of a single pipeline run.
#[derive(Debug)]
pub struct RunOutput {
    pub profiles: Vec<Profile>,
    pub params: Parameters,
    /// Concatenated residual vector across all non-excluded profiles, in
    /// profile order. This is the vector a least-squares driver minimizes.
    pub residuals: Vec<f64>,
    pub ndata: usize,
    pub report: String,
}

/// Entry point for the `exshift` binary.
pub fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        return Err(Error::config(format!(
            "Usage: {} <experiment.json>",
            args.first().map(String::as_str).unwrap_or("exshift")
        )));
    }

    let output = run_pipeline(Path::new(&args[1]), None, None)?;
    print!("{}", output.report);
    log::info!(
        "{} profiles, {} data points, {} parameters",
        output.profiles.len(),
        output.ndata,
        output.params.len()
    );
    Ok(())
}

/// Execute the full pipeline for one experiment descriptor.
pub fn run_pipeline(
    descriptor_path: &Path,
    include: Option<&HashSet<String>>,
    exclude: Option<&HashSet<String>>,
) -> Result<RunOutput> {
    let descriptor = read_descriptor(descriptor_path)?;
    let dir = descriptor_path.parent().unwrap_or_else(|| Path::new("."));

    let (profiles, ndata) = read_profiles(dir, &descriptor, include, exclude)?;

    // Shared conditions resolve to shared names, so merging per-profile
    // seedings yields one joint parameter set across the experiment.
    let mut params = Parameters::new();
    for profile in &profiles {
        params.merge_defaults(profile.default_parameters());
    }

    let mut residuals = Vec::with_capacity(ndata);
    for profile in &profiles {
        if profile.is_excluded(&params) {
            continue;
        }
        residuals.extend(profile.residuals(&params)?);
    }

    let report = format_profiles(&profiles, Some(&params))?;

    Ok(RunOutput {
        profiles,
        params,
        residuals,
        ndata,
        report,
    })
}

fn read_descriptor(path: &Path) -> Result<ExperimentDescriptor> {
    let text = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read experiment descriptor '{}': {e}",
            path.display()
        ))
    })?;
    serde_json::from_str(&text).map_err(|e| {
        Error::config(format!(
            "Failed to parse experiment descriptor '{}': {e}",
            path.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_experiment(dir: &Path, rows: &str) -> std::path::PathBuf {
        std::fs::write(dir.join("shifts.txt"), rows).unwrap();

        let descriptor_path = dir.join("experiment.json");
        let mut file = std::fs::File::create(&descriptor_path).unwrap();
        write!(
            file,
            r#"{{
  "file": "shifts.txt",
  "type": "shift.n_sqmq.2st",
  "h_larmor_frq": 600.0,
  "temperature": 298.0
}}"#
        )
        .unwrap();
        descriptor_path
    }

    #[test]
    fn end_to_end_at_default_parameters() {
        // One row, default seeds (dw = 0): prediction is exactly 0 and the
        // residual is observed/error.
        let dir = tempfile::tempdir().unwrap();
        let descriptor_path = write_experiment(dir.path(), "G10 0.123 0.01\n");

        let output = run_pipeline(&descriptor_path, None, None).unwrap();

        assert_eq!(output.profiles.len(), 1);
        assert_eq!(output.ndata, 1);
        assert_eq!(
            output.profiles[0].predict(&output.params).unwrap(),
            vec![0.0]
        );
        assert_eq!(output.residuals.len(), 1);
        assert!((output.residuals[0] - 12.3).abs() < 1e-12);
        assert!(output.report.contains("G10"));
    }

    #[test]
    fn joint_parameter_set_spans_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let descriptor_path =
            write_experiment(dir.path(), "G10 0.123 0.01\nA11 0.050 0.02\n");

        let output = run_pipeline(&descriptor_path, None, None).unwrap();

        // pb + kex shared, two dw parameters per profile.
        assert_eq!(output.profiles.len(), 2);
        assert_eq!(output.params.len(), 6);
        assert_eq!(output.residuals.len(), 2);
    }

    #[test]
    fn include_filter_reaches_the_loader() {
        let dir = tempfile::tempdir().unwrap();
        let descriptor_path =
            write_experiment(dir.path(), "G10 0.123 0.01\nA11 0.050 0.02\n");

        let include: HashSet<String> = ["A11".to_string()].into_iter().collect();
        let output = run_pipeline(&descriptor_path, Some(&include), None).unwrap();
        assert_eq!(output.profiles.len(), 1);
        assert_eq!(output.profiles[0].name(), "A11");
    }

    #[test]
    fn missing_descriptor_is_a_config_error() {
        let err = run_pipeline(Path::new("/nonexistent/experiment.json"), None, None).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
