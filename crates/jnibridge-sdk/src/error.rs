//! Error types for boundary calls

use crate::key::{SymbolKey, SymbolKind};

/// Result type for boundary calls
pub type AbiResult<T> = Result<T, BoundaryError>;

/// Failure of a call across the native/managed boundary.
///
/// JNI itself only reports null-vs-handle plus a pending exception; these
/// variants name which of those situations occurred.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoundaryError {
    /// Name-based lookup returned null
    #[error("{kind} not found: {name}")]
    NotFound {
        /// What was being looked up
        kind: SymbolKind,
        /// Name as passed to the lookup
        name: String,
    },

    /// A call raised a Java exception that is still pending
    #[error("Java exception pending after {0}")]
    PendingException(&'static str),

    /// Lookup failed earlier and the cache does not retry failures
    #[error("Lookup previously failed: {0}")]
    PreviouslyFailed(SymbolKey),

    /// The key names a different kind of symbol than the one requested
    #[error("Slot {key} cannot hold a {requested} symbol")]
    KindMismatch {
        /// Slot that was requested
        key: SymbolKey,
        /// Kind of symbol the caller asked for
        requested: SymbolKind,
    },

    /// A call that must produce a reference produced null
    #[error("{0} returned null")]
    NullResult(&'static str),

    /// Any other error reported by the JNI layer
    #[error("JNI error: {0}")]
    Jni(String),
}
