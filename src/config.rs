//! Loads the project configuration from an optional `nikki.yaml` file and
//! fills in defaults for everything it leaves out.

use crate::render::PageSettings;
use crate::util::open;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The project file looked up in the working directory when no explicit path
/// is given.
pub const PROJECT_FILE: &str = "nikki.yaml";

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Project {
    source_directory: PathBuf,
    output_file: PathBuf,
    extension: String,
    title: String,
    lang: String,
    empty_message: String,
    page_template: Option<PathBuf>,
    strict: bool,
}

impl Default for Project {
    fn default() -> Self {
        Project {
            source_directory: PathBuf::from("docs"),
            output_file: PathBuf::from("index.html"),
            extension: "md".to_owned(),
            title: "日記".to_owned(),
            lang: "ja".to_owned(),
            empty_message: "まだ日記が書かれていません".to_owned(),
            page_template: None,
            strict: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    /// The directory holding the dated source files.
    pub source_directory: PathBuf,

    /// The page to (over)write.
    pub output_file: PathBuf,

    /// The source file extension, without the leading dot.
    pub extension: String,

    pub page: PageSettings,

    /// A replacement for the bundled page template.
    pub page_template: Option<PathBuf>,

    /// Treat a missing source directory as a failure rather than a
    /// diagnostic.
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config::from_project(Project::default(), Path::new(""))
    }
}

impl Config {
    /// Loads the configuration. An explicit `path` must exist; otherwise
    /// [`PROJECT_FILE`] is read from `working_directory` if present, and the
    /// defaults are used if not.
    pub fn load(path: Option<&Path>, working_directory: &Path) -> Result<Config> {
        match path {
            Some(path) => Config::from_project_file(path),
            None => {
                let path = working_directory.join(PROJECT_FILE);
                if path.exists() {
                    Config::from_project_file(&path)
                } else {
                    Ok(Config::from_project(Project::default(), working_directory))
                }
            }
        }
    }

    /// Parses a project file. Relative paths inside it are resolved against
    /// the file's directory.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = open(path, "project")?;
        let project: Project = serde_yaml::from_reader(file)
            .with_context(|| format!("Loading configuration from `{}`", path.display()))?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => {
                if project.extension.is_empty() || project.extension.starts_with('.') {
                    return Err(anyhow!(
                        "`extension` must be non-empty and given without a leading dot, got `{}`",
                        project.extension
                    ));
                }
                Ok(Config::from_project(project, project_root))
            }
        }
    }

    /// Applies command-line overrides on top of the loaded configuration.
    /// Paths given here are used as-is, relative to the working directory.
    pub fn override_with(&mut self, source: Option<&str>, output: Option<&str>, strict: bool) {
        if let Some(source) = source {
            self.source_directory = PathBuf::from(source);
        }
        if let Some(output) = output {
            self.output_file = PathBuf::from(output);
        }
        self.strict |= strict;
    }

    fn from_project(project: Project, root: &Path) -> Config {
        Config {
            source_directory: root.join(project.source_directory),
            output_file: root.join(project.output_file),
            extension: project.extension,
            page: PageSettings {
                title: project.title,
                lang: project.lang,
                empty_message: project.empty_message,
            },
            page_template: project.page_template.map(|p| root.join(p)),
            strict: project.strict,
        }
    }
}
