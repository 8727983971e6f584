//! File helpers whose errors name the kind of file involved.

use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;

/// Opens `path` for reading. `kind` describes the file in the error message,
/// e.g. "project" yields ``Opening project file `nikki.yaml` ``.
pub fn open(path: &Path, kind: &str) -> Result<File> {
    File::open(path).with_context(|| format!("Opening {} file `{}`", kind, path.display()))
}
