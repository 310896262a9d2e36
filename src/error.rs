#![forbid(unsafe_code)]

//! Error types for the filesystem collaborator, directory navigation and
//! start-up configuration.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure reported by a [`FileSystem`](crate::fs_ops::FileSystem) call.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),

    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FsError {
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path.to_path_buf()),
            _ => FsError::Io { path: path.to_path_buf(), source },
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            FsError::NotFound(path) | FsError::PermissionDenied(path) => path,
            FsError::Io { path, .. } => path,
        }
    }
}

/// Failure of a directory change.
///
/// `Unreachable` and `NotADirectory` leave the model untouched. `Listing` means
/// the directory was entered but could not be read, so the model now holds an
/// empty listing.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("Cannot change directory: {0}")]
    Unreachable(#[source] FsError),

    #[error("Cannot change directory: {} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("Error accessing directory: {0}")]
    Listing(#[source] FsError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot determine the current directory: {0}")]
    CurrentDir(#[source] io::Error),

    #[error("start directory {} is not a directory", .0.display())]
    StartDir(PathBuf),

    #[error("invalid log filter {filter:?}: {reason}")]
    LogFilter { filter: String, reason: String },

    #[error("cannot open log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<ConfigError> for io::Error {
    fn from(err: ConfigError) -> Self {
        io::Error::other(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_are_classified_by_kind() {
        let path = Path::new("/nowhere");
        let err = FsError::from_io(path, io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, FsError::NotFound(_)));

        let err = FsError::from_io(path, io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, FsError::PermissionDenied(_)));
        assert_eq!(err.path(), path);

        let err = FsError::from_io(path, io::Error::other("disk on fire"));
        assert!(matches!(err, FsError::Io { .. }));
    }

    #[test]
    fn listing_error_message_names_the_directory() {
        let err = NavError::Listing(FsError::PermissionDenied(PathBuf::from("/root/secret")));
        assert_eq!(
            err.to_string(),
            "Error accessing directory: permission denied: /root/secret"
        );
    }
}
