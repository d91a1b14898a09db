//! Formatted result output.
//!
//! Formatting stays in one place so the evaluation code remains clean and
//! the output layout is localized (results files are diffed downstream).

use crate::error::Result;
use crate::params::Parameters;
use crate::profile::Profile;

/// Concatenate per-profile report lines, one blank line between profiles,
/// suitable for direct inclusion in a results file.
pub fn format_profiles(profiles: &[Profile], params: Option<&Parameters>) -> Result<String> {
    let mut out = String::new();
    for profile in profiles {
        out.push_str(&profile.report(params)?);
        out.push('\n');
    }
    Ok(out)
}
