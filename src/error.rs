// Failure kinds of an upload run. Every one of them ends the run with
// exit status 1; none is retried.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::FolderId;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Could not open config file {}", path.display())]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not parse config file {}", path.display())]
    ConfigInvalid {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config file {} has no sections", path.display())]
    EmptyConfig { path: PathBuf },

    #[error("Section {0} not found")]
    UnknownSection(String),

    #[error("Section {name} is malformed")]
    InvalidSection {
        name: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("No server selected")]
    NoSelection,

    #[error("No base URL set")]
    MissingBaseUrl,

    #[error("No target folder set")]
    MissingTargetFolder,

    #[error("No password given")]
    MissingPassword,

    /// The service answered with something that is not the expected JSON envelope.
    #[error("Could not decode json from {url}: {reason}")]
    BadResponse { url: String, reason: String },

    /// Login rejected; carries the service message verbatim.
    #[error("{0}")]
    AuthFailed(String),

    #[error("No folder selected")]
    NoFolderSelected,

    #[error("None of the target folders could be resolved")]
    NoFolderResolved,

    #[error("Could not get target folder {id}: {message}")]
    TargetFolderNotFound { id: FolderId, message: String },

    #[error("Input does not seem to be an email")]
    NotAnEmail,

    #[error("Could not parse date '{0}'")]
    BadDate(String),

    #[error("Missing filename")]
    MissingFilename,

    #[error("Could not open file {}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not read file {}", path.display())]
    FileReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not read standard input")]
    Stdin(#[source] io::Error),

    #[error("No file given")]
    NoFileGiven,

    #[error("Could not upload {name}. {message}")]
    UploadFailed { name: String, message: String },

    #[error("Request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Terminal interaction failed")]
    Terminal(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, UploadError>;
