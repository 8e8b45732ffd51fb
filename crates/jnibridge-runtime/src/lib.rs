//! jnibridge runtime
//!
//! Hosts a single embedded Java VM and binds it to the boundary cache from
//! `jnibridge-sdk`:
//! - [`VmHost`]: create → use → destroy lifecycle, one VM per process
//! - [`JniBoundary`]: the SDK's `Boundary` trait over a live `JNIEnv`
//! - [`HostOptions`]: VM configuration (classpath baked in at build time)

#![warn(missing_docs)]

pub mod boundary;
pub mod error;
pub mod host;
pub mod options;

pub use boundary::{GlobalRefs, JniBoundary};
pub use error::HostError;
pub use host::{report, HostState, VmHost};
pub use options::{HostOptions, DEFAULT_CLASSPATH, JNI_VERSION};

pub use jnibridge_sdk as sdk;
