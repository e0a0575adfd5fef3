use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for the combine pipeline.
///
/// Malformed rows and repeated sample names are recovered where they occur
/// and never surface here.
#[derive(Error, Debug)]
pub enum CombineError {
    /// An input file could not be opened, or the output could not be created or written.
    #[error("cannot access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The csv layer failed on a record of an otherwise accessible file.
    #[error("failed to process {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Invalid run configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CombineError {
    pub(crate) fn file_access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CombineError::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Splits csv errors into I/O failures (reported as file access) and everything else.
    pub(crate) fn from_csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        let path = path.into();
        if source.is_io_error() {
            CombineError::FileAccess {
                path,
                source: io::Error::from(source),
            }
        } else {
            CombineError::Csv { path, source }
        }
    }
}

impl From<config::ConfigError> for CombineError {
    fn from(err: config::ConfigError) -> Self {
        CombineError::Config(err.to_string())
    }
}

/// Result type alias for combine operations.
pub type Result<T> = std::result::Result<T, CombineError>;
