//! Error taxonomy shared by every VFS component.
//!
//! The set of kinds is closed and surfaced verbatim to callers; back ends never invent new
//! kinds, they only choose the closest match and attach a message.

use std::fmt;

/// Convenient result alias used throughout the crate.
pub type VfsResult<T> = Result<T, VfsError>;

/// Error taxonomy for the VFS core (see SPEC_FULL.md §7).
#[derive(Debug)]
pub enum VfsError {
    /// Malformed or variant-constraint-violating path specification.
    BadPathSpec(String),
    /// A syntactically valid spec references a non-existent entry.
    NotFound,
    /// OS permission denied, or wrong credential material.
    AccessDenied,
    /// A required credential is absent or decryption is impossible.
    EncryptionError(String),
    /// The operation is not implemented for this variant.
    Unsupported(&'static str),
    /// Wrapped error from an underlying driver (I/O, format corruption).
    BackEndError(String),
    /// The key chain rejected an unknown credential identifier.
    NoSuchCredential(String),
}

impl fmt::Display for VfsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VfsError::BadPathSpec(msg) => write!(f, "bad path specification: {msg}"),
            VfsError::NotFound => write!(f, "no such file or directory"),
            VfsError::AccessDenied => write!(f, "access denied"),
            VfsError::EncryptionError(msg) => write!(f, "encryption error: {msg}"),
            VfsError::Unsupported(op) => write!(f, "unsupported operation: {op}"),
            VfsError::BackEndError(msg) => write!(f, "back-end error: {msg}"),
            VfsError::NoSuchCredential(id) => write!(f, "no such credential: {id}"),
        }
    }
}

impl std::error::Error for VfsError {}

impl From<std::io::Error> for VfsError {
    fn from(error: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match error.kind() {
            ErrorKind::NotFound => VfsError::NotFound,
            ErrorKind::PermissionDenied => VfsError::AccessDenied,
            _ => VfsError::BackEndError(error.to_string()),
        }
    }
}
