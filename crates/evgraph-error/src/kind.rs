//! Error kinds for evgraph operations

use strum_macros::{Display, IntoStaticStr};

/// The kind of error that occurred.
///
/// Callers match on `ErrorKind` to decide how to report a failure, e.g. a
/// missing manifest file versus a manifest that is not valid JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // Configuration errors
    // =========================================================================
    /// Invalid configuration file or values
    ConfigInvalid,

    // =========================================================================
    // File/IO errors
    // =========================================================================
    /// File not found
    FileNotFound,

    /// Permission denied
    PermissionDenied,

    /// IO operation failed
    IoFailed,

    // =========================================================================
    // Manifest errors
    // =========================================================================
    /// Manifest or config could not be deserialized
    DeserializationFailed,

    /// Input has the wrong overall shape
    InvalidFormat,

    /// A resource kind the graph builder has no rule for
    UnsupportedResource,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// Whether the error was caused by the user's input rather than the environment.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::ConfigInvalid
                | ErrorKind::DeserializationFailed
                | ErrorKind::InvalidFormat
                | ErrorKind::UnsupportedResource
        )
    }
}
