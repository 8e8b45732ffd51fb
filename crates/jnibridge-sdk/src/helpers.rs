//! Composed helpers built on the symbol cache
//!
//! Each helper resolves the classes and members it needs through a
//! [`RefCache`], so calling it in a loop costs one set of lookups in total.
//! Temporary local references created along the way are released before
//! returning.

use crate::boundary::Boundary;
use crate::cache::RefCache;
use crate::error::{AbiResult, BoundaryError};
use crate::handle::ObjectRef;
use crate::key::{
    OBJECT, OBJECT_TO_STRING, PRINT_STREAM, PRINT_STREAM_PRINTLN, SYSTEM, SYSTEM_OUT,
};

/// Call `object.toString()`. Returns a local `java.lang.String` reference
/// owned by the caller.
pub fn object_to_string<B>(
    cache: &mut RefCache,
    env: &mut B,
    object: ObjectRef,
) -> AbiResult<ObjectRef>
where
    B: Boundary + ?Sized,
{
    let object_class = cache.resolve_class(env, OBJECT)?;
    let to_string = cache.resolve_method(env, object_class, OBJECT_TO_STRING)?;
    env.call_object_method(object, to_string, &[])?
        .ok_or(BoundaryError::NullResult("Object.toString"))
}

/// `System.out.println(string)`
pub fn print_line<B>(cache: &mut RefCache, env: &mut B, string: ObjectRef) -> AbiResult<()>
where
    B: Boundary + ?Sized,
{
    let system = cache.resolve_class(env, SYSTEM)?;
    let out_field = cache.resolve_static_field(env, system, SYSTEM_OUT)?;
    let print_stream = cache.resolve_class(env, PRINT_STREAM)?;
    let println = cache.resolve_method(env, print_stream, PRINT_STREAM_PRINTLN)?;

    let out = env.get_static_object_field(system, out_field)?;
    let result = env.call_void_method(out, println, &[string]);
    env.delete_local_ref(out);
    result
}

/// `System.out.println(object.toString())`
pub fn print_object<B>(cache: &mut RefCache, env: &mut B, object: ObjectRef) -> AbiResult<()>
where
    B: Boundary + ?Sized,
{
    let text = object_to_string(cache, env, object)?;
    let result = print_line(cache, env, text);
    env.delete_local_ref(text);
    result
}

/// Read `object.toString()` into a Rust string
pub fn describe<B>(cache: &mut RefCache, env: &mut B, object: ObjectRef) -> AbiResult<String>
where
    B: Boundary + ?Sized,
{
    let text = object_to_string(cache, env, object)?;
    let result = env.read_string(text);
    env.delete_local_ref(text);
    result
}
