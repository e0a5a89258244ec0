use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for deploy operations
pub type DeployResult<T> = Result<T, DeployError>;

/// Boxed backend error kept as the source of remote failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while publishing or promoting a build
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied reading directory: {}", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read {file_name} from {}: {source}", path.display())]
    LocalRead {
        file_name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {key}: {source}")]
    RemoteWrite {
        key: String,
        #[source]
        source: BoxError,
    },

    #[error("Failed to copy {source_key} to {dest_key}: {source}")]
    RemoteCopy {
        source_key: String,
        dest_key: String,
        #[source]
        source: BoxError,
    },

    #[error("Failed to upload build files: {}", summarize(*total, failures))]
    Publish {
        total: usize,
        failures: Vec<FileFailure>,
    },

    #[error("Failed to deploy build files: {}", summarize(*total, failures))]
    Promotion {
        total: usize,
        failures: Vec<FileFailure>,
    },

    #[error("Invalid request: {message}")]
    Invalid { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// A single file that failed inside a batch
#[derive(Debug)]
pub struct FileFailure {
    pub file_name: String,
    pub error: DeployError,
}

impl FileFailure {
    pub fn new<S: Into<String>>(file_name: S, error: DeployError) -> Self {
        Self {
            file_name: file_name.into(),
            error,
        }
    }
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.file_name, self.error)
    }
}

fn summarize(total: usize, failures: &[FileFailure]) -> String {
    let listed = failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    format!("{} of {} failed: {}", failures.len(), total, listed)
}

impl DeployError {
    /// Create a remote write error from any backend error
    pub fn remote_write<K, E>(key: K, error: E) -> Self
    where
        K: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::RemoteWrite {
            key: key.into(),
            source: Box::new(error),
        }
    }

    /// Create a remote copy error from any backend error
    pub fn remote_copy<S, D, E>(source_key: S, dest_key: D, error: E) -> Self
    where
        S: Into<String>,
        D: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::RemoteCopy {
            source_key: source_key.into(),
            dest_key: dest_key.into(),
            source: Box::new(error),
        }
    }

    /// Create an invalid request error
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Failures carried by an aggregate error, empty for anything else
    pub fn failures(&self) -> &[FileFailure] {
        match self {
            Self::Publish { failures, .. } | Self::Promotion { failures, .. } => failures,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_error_names_every_failed_file() {
        let err = DeployError::Publish {
            total: 3,
            failures: vec![
                FileFailure::new("a.js", DeployError::invalid("boom")),
                FileFailure::new("b.css", DeployError::invalid("bang")),
            ],
        };

        let msg = err.to_string();
        assert!(msg.starts_with("Failed to upload build files: 2 of 3 failed"));
        assert!(msg.contains("a.js (Invalid request: boom)"));
        assert!(msg.contains("b.css (Invalid request: bang)"));
        assert_eq!(err.failures().len(), 2);
    }

    #[test]
    fn remote_errors_keep_backend_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "socket closed");
        let err = DeployError::remote_write("build/7/a.js", io);

        assert_eq!(err.to_string(), "Failed to write build/7/a.js: socket closed");
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("socket closed"));
        assert!(err.failures().is_empty());
    }
}
