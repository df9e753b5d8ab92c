use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::scaffold::ScaffoldReport;

/// A fatal scaffolding failure. Carries the underlying cause.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("problem with creating main file {path:?}")]
    CreateMainFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not apply template to main file {path:?}")]
    WriteMainFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not load main file template")]
    Template(#[from] TemplateError),
}

/// A scaffold run that hit a fatal step. `report` holds the status of every
/// step, including the ones that failed or were abandoned.
#[derive(Debug, Error)]
#[error("scaffolding did not complete")]
pub struct ScaffoldFailure {
    pub report: ScaffoldReport,
    #[source]
    pub error: ScaffoldError,
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("unknown template `{0}`")]
    NotFound(String),
    #[error("failed to read template {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not serialize config for {path:?}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
