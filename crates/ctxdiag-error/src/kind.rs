//! Error kinds for ctxdiag operations

use strum_macros::{Display, IntoStaticStr};

/// The kind of error that occurred.
///
/// Callers match on this to tell a bad instruction document apart from a
/// missing element or a broken model file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// An unexpected error occurred - catch-all for unhandled cases
    Unexpected,

    /// The requested feature or operation is not supported
    Unsupported,

    /// Invalid argument passed to function
    InvalidArgument,

    // =========================================================================
    // Instruction errors
    // =========================================================================
    /// Malformed instruction tree or diagram request
    ConfigInvalid,

    // =========================================================================
    // Model errors
    // =========================================================================
    /// No element with the requested uuid
    ElementNotFound,

    /// Model document is structurally broken (duplicate uuid, dangling link)
    InvalidFormat,

    // =========================================================================
    // Serialization errors
    // =========================================================================
    /// Serialization failed
    SerializationFailed,

    /// Deserialization failed
    DeserializationFailed,

    // =========================================================================
    // File/IO errors
    // =========================================================================
    /// File not found
    FileNotFound,

    /// Permission denied
    PermissionDenied,

    /// IO operation failed
    IoFailed,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// True for kinds caused by the caller's input rather than the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::ConfigInvalid
                | ErrorKind::ElementNotFound
                | ErrorKind::InvalidArgument
                | ErrorKind::Unsupported
                | ErrorKind::DeserializationFailed
        )
    }
}
