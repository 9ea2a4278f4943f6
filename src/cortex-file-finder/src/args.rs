//! Command-line arguments for ripgrep file listing.

use crate::options::RootOptions;

/// Builds the ripgrep arguments that list the files of one root.
///
/// Globs keep their input order; empty globs are skipped. Validating glob
/// syntax is left to ripgrep.
pub fn build_args(options: &RootOptions) -> Vec<String> {
    let mut args = vec!["--files".to_string(), "--case-sensitive".to_string()];

    for pattern in options.include_patterns.iter().filter(|p| !p.is_empty()) {
        args.push("--glob".to_string());
        args.push(pattern.clone());
    }

    for pattern in options.exclude_patterns.iter().filter(|p| !p.is_empty()) {
        args.push("--glob".to_string());
        args.push(format!("!{pattern}"));
    }

    if !options.honors_git_ignore() {
        // -uu: no ignore files, include hidden entries
        args.push("-uu".to_string());
    }

    args
}
