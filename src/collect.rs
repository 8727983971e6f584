//! Defines the [`Collector`] and its [`Error`] type. The collector finds the
//! dated source files in a directory, reads them, converts them into
//! [`Document`]s, and orders them oldest-first.

use crate::document::Document;
use log::{debug, trace};
use regex::Regex;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collects [`Document`]s from source files named `NNNN.<ext>` through
/// `NNNNNNNN.<ext>`.
pub struct Collector {
    /// Matches eligible file names and captures the numeric stem.
    file_name: Regex,
}

impl Collector {
    /// Constructs a collector for files with the given extension (without the
    /// leading dot, e.g. `md`).
    pub fn new(extension: &str) -> Collector {
        Collector {
            // The pattern is built from an escaped literal, so it is always
            // valid.
            file_name: Regex::new(&format!(
                r"^(\d{{4,8}})\.{}$",
                regex::escape(extension)
            ))
            .unwrap(),
        }
    }

    /// Returns the numeric stem of `file_name` if it names a source file.
    pub fn stem<'f>(&self, file_name: &'f str) -> Option<&'f str> {
        self.file_name
            .captures(file_name)
            .and_then(|captures| captures.get(1))
            .map(|stem| stem.as_str())
    }

    /// Reads every source file directly inside `source_directory` and returns
    /// the resulting documents sorted ascending by their numeric stem. Files
    /// whose names don't match are skipped; subdirectories are not searched.
    /// An empty result is not an error.
    ///
    /// Files are visited in file-name order before the (stable) numeric sort,
    /// so stems with the same value, like `0100` and `00100`, always come out
    /// in the same order.
    pub fn collect(&self, source_directory: &Path) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        for result in WalkDir::new(source_directory)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        {
            let entry = result?;
            if !entry.file_type().is_file() {
                continue;
            }
            let os_file_name = entry.file_name().to_string_lossy();
            match self.stem(&os_file_name) {
                Some(stem) => documents.push(read_document(entry.path(), stem)?),
                None => trace!("skipping `{}`", entry.path().display()),
            }
        }

        documents.sort_by_key(|document| document.sort_key);
        Ok(documents)
    }
}

fn read_document(path: &Path, stem: &str) -> Result<Document> {
    debug!("reading `{}`", path.display());
    let mut raw_text = String::new();
    std::fs::File::open(path)
        .and_then(|mut file| file.read_to_string(&mut raw_text))
        .map_err(|err| Error::Read {
            path: path.to_owned(),
            err,
        })?;

    // At most eight digits, so this always fits.
    let sort_key = stem
        .parse::<u32>()
        .map_err(|_| Error::InvalidStem(path.to_owned()))?;
    Ok(Document::new(sort_key, stem, raw_text))
}

/// The result of a fallible collection operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error collecting documents.
#[derive(Debug)]
pub enum Error {
    /// Returned when a source file can't be opened or isn't valid UTF-8.
    Read { path: PathBuf, err: std::io::Error },

    /// Returned when a file's stem can't be parsed as a sort key.
    InvalidStem(PathBuf),

    /// Returned for errors listing the source directory.
    Walk(walkdir::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Read { path, err } => {
                write!(f, "Reading source file '{}': {}", path.display(), err)
            }
            Error::InvalidStem(path) => {
                write!(f, "Invalid date stem in '{}'", path.display())
            }
            Error::Walk(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Read { path: _, err } => Some(err),
            Error::InvalidStem(_) => None,
            Error::Walk(err) => Some(err),
        }
    }
}

impl From<walkdir::Error> for Error {
    /// Converts [`walkdir::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: walkdir::Error) -> Error {
        Error::Walk(err)
    }
}
