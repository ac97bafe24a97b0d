//! Error types for packaging operations.
//!
//! Filesystem failures carry the path they happened on (see [`ErrorExt`]),
//! and any error can be wrapped with a short description of the step that
//! failed (see [`Context`]).
//!
//! # Example
//!
//! ```no_run
//! use gop::bundler::{Context, ErrorExt, Result};
//! use std::path::Path;
//!
//! fn read_binary(path: &Path) -> Result<Vec<u8>> {
//!     std::fs::read(path)
//!         .fs_context("reading binary", path)
//!         .context("packaging binary")
//! }
//! ```

use std::{fmt::Display, io, path::PathBuf};
use thiserror::Error as DeriveError;

/// Errors returned while collecting licenses and building archives.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// Error with context. Created by the [`Context`] trait.
    #[error("{0}: {1}")]
    Context(String, Box<Self>),

    /// File system error with path context.
    ///
    /// Created by the [`ErrorExt`] trait's `fs_context` method.
    #[error("{context} {path}: {error}")]
    Fs {
        /// Context describing the operation (e.g., "creating archive")
        context: &'static str,
        /// Path that was being accessed
        path: PathBuf,
        /// The underlying I/O error
        error: io::Error,
    },

    /// Error walking the vendor tree.
    #[error("{0}")]
    WalkdirError(#[from] walkdir::Error),

    /// ZIP archive creation error.
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    /// An archive task stopped because a sibling task failed.
    #[error("archive {0} cancelled")]
    Cancelled(String),

    /// An archive task panicked or could not be joined.
    #[error("archive task failed: {0}")]
    TaskFailed(String),

    /// Generic error with custom message.
    #[error("{0}")]
    GenericError(String),
}

/// Convenient type alias for Result.
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for adding context to errors.
///
/// Similar to `anyhow::Context` but integrated with the bundler's Error type.
pub trait Context<T> {
    /// Add context to an error.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Add context to an error using a closure (lazy evaluation).
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::Context(context.to_string(), Box::new(e)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::Context(f().to_string(), Box::new(e)))
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

/// Extension trait for filesystem operations with automatic path context.
pub trait ErrorExt<T> {
    /// Add filesystem context to an I/O error.
    ///
    /// The `context` should be a present-tense verb phrase describing the operation,
    /// e.g., "reading file", "creating directory", "copying binary".
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

/// Macro for early return with error.
///
/// Converts the message into a [`Error::GenericError`] and returns immediately.
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::bundler::Error::GenericError($msg.into()))
    };
    ($err:expr $(,)?) => {
        return Err($crate::bundler::Error::GenericError($err.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($fmt, $($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_context_names_path() {
        let err = std::fs::read("/definitely/not/here")
            .fs_context("reading binary", "/definitely/not/here")
            .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("reading binary /definitely/not/here:"), "{message}");
    }

    #[test]
    fn test_context_chains() {
        let err = Err::<(), _>(Error::GenericError("disk full".into()))
            .context("writing app.zip")
            .unwrap_err();
        assert_eq!(err.to_string(), "writing app.zip: disk full");

        let err = None::<u8>.with_context(|| "no file name").unwrap_err();
        assert_eq!(err.to_string(), "no file name");
    }
}
