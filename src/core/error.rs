//! Error taxonomy for filesystem work in kaser.
//!
//! Every filesystem call made by the file operations, the content loader and the
//! editor funnels its failures into [FsError], so the engine can turn them into a
//! single status line without ever leaving the control loop.

use std::io;
use std::path::{Path, PathBuf};

/// Result alias used across the core modules.
pub type FsResult<T> = Result<T, FsError>;

#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("Already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Directory not empty: {}", .0.display())]
    NotEmpty(PathBuf),

    #[error("Binary file: {}", display_name(.0))]
    DecodeError(PathBuf),

    #[error(
        "Partial move: copied {} to {} but could not remove the source ({reason})",
        .src.display(),
        .dest.display()
    )]
    PartialMove {
        src: PathBuf,
        dest: PathBuf,
        reason: String,
    },

    #[error("{}: {message}", .path.display())]
    Invalid { path: PathBuf, message: String },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FsError {
    /// Maps an [io::Error] raised while touching `path` onto the taxonomy.
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => FsError::NotFound(path),
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path),
            io::ErrorKind::AlreadyExists => FsError::AlreadyExists(path),
            io::ErrorKind::NotADirectory => FsError::NotADirectory(path),
            io::ErrorKind::DirectoryNotEmpty => FsError::NotEmpty(path),
            _ => FsError::Io { path, source: err },
        }
    }

    pub fn invalid(path: &Path, message: impl Into<String>) -> Self {
        FsError::Invalid {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    #[inline]
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, FsError::PermissionDenied(_))
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Extension to attach a path to a plain [io::Result].
pub trait IoResultExt<T> {
    fn at(self, path: &Path) -> FsResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    #[inline]
    fn at(self, path: &Path) -> FsResult<T> {
        self.map_err(|e| FsError::from_io(e, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_kinds_map_to_taxonomy() {
        let p = Path::new("/tmp/x");
        let nf = FsError::from_io(io::Error::from(io::ErrorKind::NotFound), p);
        assert!(matches!(nf, FsError::NotFound(_)));

        let pd = FsError::from_io(io::Error::from(io::ErrorKind::PermissionDenied), p);
        assert!(pd.is_permission_denied());

        let other = FsError::from_io(io::Error::other("boom"), p);
        assert!(matches!(other, FsError::Io { .. }));
    }

    #[test]
    fn partial_move_names_both_paths() {
        let err = FsError::PartialMove {
            src: PathBuf::from("/a/src.txt"),
            dest: PathBuf::from("/b/src.txt"),
            reason: "denied".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/a/src.txt"));
        assert!(msg.contains("/b/src.txt"));
    }

    #[test]
    fn decode_error_shows_file_name() {
        let err = FsError::DecodeError(PathBuf::from("/some/dir/photo.png"));
        assert_eq!(err.to_string(), "Binary file: photo.png");
    }
}
