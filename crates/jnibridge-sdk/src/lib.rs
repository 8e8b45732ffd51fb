//! jnibridge SDK - resolve-once caching for JNI symbol lookups
//!
//! Looking up a class, method or field through JNI crosses the native/managed
//! boundary and is comparatively expensive. This crate provides the pieces
//! needed to do each lookup at most once per process:
//!
//! - [`Boundary`]: the subset of the embedding interface the cache consumes
//! - [`RefCache`]: an explicit, harness-owned cache keyed by [`SymbolKey`]
//! - [`helpers`]: composed routines (`Object.toString`, `System.out.println`)
//!   built on the cache
//!
//! The cache has no JVM dependency; the concrete [`Boundary`] over a live
//! `JNIEnv` lives in `jnibridge-runtime`.
//!
//! # Example
//!
//! ```ignore
//! use jnibridge_sdk::{helpers, RefCache};
//!
//! let mut cache = RefCache::new();
//! let text = helpers::describe(&mut cache, &mut env, object)?;
//! helpers::print_object(&mut cache, &mut env, object)?;
//! ```

#![warn(missing_docs)]

pub mod boundary;
pub mod cache;
pub mod error;
pub mod handle;
pub mod helpers;
pub mod key;

#[cfg(test)]
pub(crate) mod testing;

pub use boundary::Boundary;
pub use cache::{CacheStats, CachedSymbol, FailurePolicy, RefCache, SlotState, Symbol};
pub use error::{AbiResult, BoundaryError};
pub use handle::{ClassRef, FieldId, MethodId, ObjectRef, ReportToken};
pub use key::{ClassKey, MemberKey, SymbolKey, SymbolKind};
