//! Boundary trait — the embedding calls the cache depends on
//!
//! The runtime crate implements this over a live `JNIEnv`; tests implement it
//! with an in-memory double. Code built on the cache only ever sees this
//! trait, never the JNI function table.

use crate::error::AbiResult;
use crate::handle::{ClassRef, FieldId, MethodId, ObjectRef};

/// Synchronous calls across the native/managed boundary.
///
/// Every method takes `&mut self`: one value stands for one execution context
/// attached to the current native thread. Results that JNI reports as null
/// come back as `Err`, except where null is a legitimate Java value
/// (`call_object_method`).
///
/// Failed calls may leave a Java exception pending in the context. Nothing in
/// this trait clears it implicitly; see [`Boundary::exception_check`].
pub trait Boundary {
    // ========================================================================
    // Symbol Lookup
    // ========================================================================

    /// `FindClass`: look up a class by internal name. Returns a local reference.
    fn find_class(&mut self, name: &str) -> AbiResult<ClassRef>;

    /// `GetMethodID`: look up an instance method on `class`
    fn get_method_id(&mut self, class: ClassRef, name: &str, signature: &str)
        -> AbiResult<MethodId>;

    /// `GetStaticFieldID`: look up a static field on `class`
    fn get_static_field_id(
        &mut self,
        class: ClassRef,
        name: &str,
        signature: &str,
    ) -> AbiResult<FieldId>;

    // ========================================================================
    // Reference Management
    // ========================================================================

    /// `NewGlobalRef`: promote a class reference so it survives the current
    /// native frame and garbage collection
    fn new_global_class_ref(&mut self, class: ClassRef) -> AbiResult<ClassRef>;

    /// `DeleteGlobalRef` for a reference created by `new_global_class_ref`
    fn delete_global_class_ref(&mut self, class: ClassRef);

    /// `DeleteLocalRef`
    fn delete_local_ref(&mut self, object: ObjectRef);

    // ========================================================================
    // Field Access and Invocation
    // ========================================================================

    /// `GetStaticObjectField`. Null field values are an error.
    fn get_static_object_field(&mut self, class: ClassRef, field: FieldId)
        -> AbiResult<ObjectRef>;

    /// `CallObjectMethodA` with object arguments. `Ok(None)` is a Java `null`.
    fn call_object_method(
        &mut self,
        receiver: ObjectRef,
        method: MethodId,
        args: &[ObjectRef],
    ) -> AbiResult<Option<ObjectRef>>;

    /// `CallVoidMethodA` with object arguments
    fn call_void_method(
        &mut self,
        receiver: ObjectRef,
        method: MethodId,
        args: &[ObjectRef],
    ) -> AbiResult<()>;

    // ========================================================================
    // Strings
    // ========================================================================

    /// `NewStringUTF`
    fn new_string(&mut self, text: &str) -> AbiResult<ObjectRef>;

    /// Read a `java.lang.String` back into Rust
    fn read_string(&mut self, string: ObjectRef) -> AbiResult<String>;

    // ========================================================================
    // Exceptions
    // ========================================================================

    /// `ExceptionCheck`: is an exception pending in this context?
    fn exception_check(&mut self) -> bool;

    /// `ExceptionClear`
    fn exception_clear(&mut self);
}
