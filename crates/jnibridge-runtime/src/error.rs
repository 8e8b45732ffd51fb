//! Host error types.

use jnibridge_sdk::BoundaryError;

use crate::host::HostState;

/// Errors raised by [`VmHost`](crate::VmHost).
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// `JNI_CreateJavaVM` failed or libjvm could not be located
    #[error("Failed to create Java VM: {0}")]
    Create(String),

    /// This process already created its one Java VM
    #[error("A Java VM was already created in this process")]
    AlreadyCreated,

    /// An earlier `JNI_CreateJavaVM` in this process failed; it cannot be retried
    #[error("Java VM creation already failed in this process")]
    CreateFailed,

    /// Operation not valid in the host's current state
    #[error("Cannot {op} while the host is {state}")]
    InvalidState {
        /// Operation that was attempted
        op: &'static str,
        /// State the host was in
        state: HostState,
    },

    /// The current thread has no usable JNI environment
    #[error("No JNI environment for this thread: {0}")]
    Env(String),

    /// `DestroyJavaVM` failed
    #[error("Failed to destroy Java VM: {0}")]
    Destroy(String),

    /// Boundary call failed
    #[error(transparent)]
    Boundary(#[from] BoundaryError),
}
