//! Exports the [`build_site`] function which stitches together the three
//! stages of building the page: collecting documents ([`crate::collect`]),
//! which converts each one's markup ([`crate::markup`]) as it goes, then
//! rendering the page ([`crate::render`]) and writing it to disk.

use crate::collect::{Collector, Error as CollectError};
use crate::config::Config;
use crate::render::{Error as RenderError, Renderer};
use log::{debug, info};
use std::fmt;
use std::path::{Path, PathBuf};

/// What a build did. Each variant corresponds to one of the reported
/// outcomes.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// The source directory doesn't exist. Nothing was written.
    MissingSourceDirectory(PathBuf),

    /// No source files were found. The fallback page was written.
    Empty,

    /// The given number of documents were rendered into the page.
    Rendered(usize),
}

impl Outcome {
    /// The process exit status for this outcome. A missing source directory
    /// only counts as a failure when `strict` is set.
    pub fn exit_code(&self, strict: bool) -> i32 {
        match self {
            Outcome::MissingSourceDirectory(_) if strict => 1,
            _ => 0,
        }
    }
}

/// Builds the page from a [`Config`]. The output file is only touched once
/// every document has been read and the page rendered, and it is then
/// replaced as a whole.
pub fn build_site(config: &Config) -> Result<Outcome> {
    if !config.source_directory.exists() {
        return Ok(Outcome::MissingSourceDirectory(
            config.source_directory.clone(),
        ));
    }

    let documents =
        Collector::new(&config.extension).collect(&config.source_directory)?;
    debug!("collected {} documents", documents.len());

    let renderer = match &config.page_template {
        Some(path) => Renderer::with_page_template(config.page.clone(), path)?,
        None => Renderer::new(config.page.clone())?,
    };
    let page = renderer.render(&documents)?;

    write_output(&config.output_file, &page)?;
    info!("wrote `{}`", config.output_file.display());

    Ok(match documents.len() {
        0 => Outcome::Empty,
        n => Outcome::Rendered(n),
    })
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    let annotate = |err: std::io::Error| Error::Write {
        path: path.to_owned(),
        err,
    };
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir).map_err(annotate)?;
        }
    }
    std::fs::write(path, contents).map_err(annotate)
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building the page. Errors can be during collection,
/// rendering, or writing the output file.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors reading source documents.
    Collect(CollectError),

    /// Returned for errors loading or executing templates.
    Render(RenderError),

    /// Returned for I/O problems while writing the output file.
    Write { path: PathBuf, err: std::io::Error },
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Collect(err) => err.fmt(f),
            Error::Render(err) => err.fmt(f),
            Error::Write { path, err } => {
                write!(f, "Writing output file '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Collect(err) => Some(err),
            Error::Render(err) => Some(err),
            Error::Write { path: _, err } => Some(err),
        }
    }
}

impl From<CollectError> for Error {
    /// Converts [`CollectError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: CollectError) -> Error {
        Error::Collect(err)
    }
}

impl From<RenderError> for Error {
    /// Converts [`RenderError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: RenderError) -> Error {
        Error::Render(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    fn project() -> std::io::Result<(TempDir, Config)> {
        let dir = tempfile::tempdir()?;
        let config = Config {
            source_directory: dir.path().join("docs"),
            output_file: dir.path().join("index.html"),
            ..Config::default()
        };
        Ok((dir, config))
    }

    #[test]
    fn test_missing_source_directory_writes_nothing() -> TestResult {
        let (_dir, config) = project()?;
        fs::write(&config.output_file, "previous")?;
        assert_eq!(
            Outcome::MissingSourceDirectory(config.source_directory.clone()),
            build_site(&config)?,
        );
        assert_eq!("previous", fs::read_to_string(&config.output_file)?);
        Ok(())
    }

    #[test]
    fn test_exit_code() {
        let missing = Outcome::MissingSourceDirectory(PathBuf::from("docs"));
        assert_eq!(0, missing.exit_code(false));
        assert_eq!(1, missing.exit_code(true));
        assert_eq!(0, Outcome::Empty.exit_code(true));
        assert_eq!(0, Outcome::Rendered(3).exit_code(true));
    }

    #[test]
    fn test_strict_missing_source_directory() -> TestResult {
        let (_dir, mut config) = project()?;
        config.strict = true;
        let outcome = build_site(&config)?;
        assert_eq!(1, outcome.exit_code(config.strict));
        assert!(!config.output_file.exists());
        Ok(())
    }

    #[test]
    fn test_empty_source_directory_writes_fallback() -> TestResult {
        let (_dir, config) = project()?;
        fs::create_dir(&config.source_directory)?;
        fs::write(config.source_directory.join("notes.md"), "ignored")?;
        assert_eq!(Outcome::Empty, build_site(&config)?);
        let page = fs::read_to_string(&config.output_file)?;
        assert!(page.contains("まだ日記が書かれていません"));
        assert!(!page.contains("data-index"));
        Ok(())
    }

    #[test]
    fn test_full_build_is_deterministic() -> TestResult {
        let (_dir, config) = project()?;
        fs::create_dir(&config.source_directory)?;
        fs::write(config.source_directory.join("20240102.md"), "# Two\n\n- a\n- b")?;
        fs::write(config.source_directory.join("20240101.md"), "one [x](http://x)")?;
        fs::write(config.source_directory.join("9999.md"), "zero")?;

        assert_eq!(Outcome::Rendered(3), build_site(&config)?);
        let first = fs::read_to_string(&config.output_file)?;
        assert_eq!(Outcome::Rendered(3), build_site(&config)?);
        assert_eq!(first, fs::read_to_string(&config.output_file)?);

        assert!(first.contains("const SCROLL_RATIOS = [1.000, 0.500, 0.000];"));
        let newest = first.find("date: \"20240102\"").unwrap();
        let oldest = first.find("date: \"9999\"").unwrap();
        assert!(newest < oldest);
        Ok(())
    }

    #[test]
    fn test_creates_output_directory() -> TestResult {
        let (dir, mut config) = project()?;
        fs::create_dir(&config.source_directory)?;
        fs::write(config.source_directory.join("2024.md"), "entry")?;
        config.output_file = dir.path().join("public").join("index.html");
        assert_eq!(Outcome::Rendered(1), build_site(&config)?);
        assert!(config.output_file.is_file());
        Ok(())
    }
}
