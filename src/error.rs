//! Error types for the matcher library.

use std::path::PathBuf;

/// Errors raised while searching a photo folder.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The photo folder could not be listed.
    #[error("Photo folder cannot be read: {folder}: {source}")]
    FolderMissing {
        folder: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SearchError {
    pub fn folder_missing(folder: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FolderMissing {
            folder: folder.into(),
            source,
        }
    }
}

/// Invalid matcher configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("max_subs must be at least 1 (got {0})")]
    InvalidMaxSubs(usize),

    #[error("At least one image extension is required")]
    EmptyExtensions,

    #[error("Cannot read substitution map {path}: {source}")]
    MappingRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse substitution map {path}: {source}")]
    MappingParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Keys and values of a substitution map must be single characters.
    #[error("Invalid substitution entry {key:?} -> {value:?}: both sides must be one character")]
    MappingEntry { key: String, value: String },
}

/// Failures while loading the name list.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Cannot open name list {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read name list {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Column '{column}' not found in {path}")]
    MissingColumn { path: PathBuf, column: String },
}

/// Failures while writing report files.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("JSON error on {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
