use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::report::DisplayLimits;

pub fn resolve_root(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = cli.dir.clone() {
        return Ok(dir);
    }
    env::current_dir().context("Failed to resolve current directory")
}

/// A relative `-j` path is taken relative to the scan root, matching how the
/// root itself defaults to the working directory.
pub fn resolve_jar_path(root: &Path, jar: &Path) -> PathBuf {
    if jar.is_absolute() {
        jar.to_path_buf()
    } else {
        root.join(jar)
    }
}

/// Limits are clamped to at least 1 so a zero on the command line cannot
/// produce a report with headers and no matches.
pub fn display_limits(per_source: usize, total: usize) -> DisplayLimits {
    DisplayLimits {
        per_source: per_source.max(1),
        total: total.max(1),
    }
}
