//! `Boundary` implementation over a live `JNIEnv`
//!
//! Handles cross this layer as raw pointers: every `ClassRef`/`ObjectRef`/
//! `MethodId`/`FieldId` handed out here wraps the value JNI returned, and every
//! one passed in is turned back into the matching `jni` wrapper without
//! taking ownership (`JObject` never deletes on drop).
//!
//! Global references are the exception. They are held as `jni::objects::GlobalRef`
//! in a [`GlobalRefs`] table owned by the host, and deleting one means
//! dropping its entry.

use jni::errors::Error as JniError;
use jni::objects::{GlobalRef, JClass, JMethodID, JObject, JStaticFieldID, JString};
use jni::signature::{JavaType, Primitive, ReturnType};
use jni::sys::jvalue;
use jni::JNIEnv;
use rustc_hash::FxHashMap;

use jnibridge_sdk::{
    AbiResult, Boundary, BoundaryError, ClassRef, FieldId, MethodId, ObjectRef, SymbolKind,
};

/// Global references created through [`JniBoundary`], keyed by address.
///
/// Dropping an entry deletes the global reference, so the table must be
/// cleared while the VM is still alive.
#[derive(Default)]
pub struct GlobalRefs {
    refs: FxHashMap<usize, GlobalRef>,
}

impl GlobalRefs {
    /// Number of live global references
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    /// Check if no global reference is held
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Delete every global reference
    pub fn clear(&mut self) {
        self.refs.clear();
    }
}

/// The SDK's [`Boundary`] over one thread's `JNIEnv`.
pub struct JniBoundary<'a, 'local> {
    env: JNIEnv<'local>,
    globals: &'a mut GlobalRefs,
}

impl<'a, 'local> JniBoundary<'a, 'local> {
    /// Wrap an attached thread's environment
    pub fn new(env: JNIEnv<'local>, globals: &'a mut GlobalRefs) -> Self {
        Self { env, globals }
    }

    /// Underlying `jni` environment, for calls the trait does not cover
    pub fn env(&mut self) -> &mut JNIEnv<'local> {
        &mut self.env
    }
}

// SAFETY (for the helpers below): handles are only constructed from values
// returned by this VM, per the contract of `from_raw` on the handle types.

fn as_class<'local>(class: ClassRef) -> JClass<'local> {
    unsafe { JClass::from_raw(class.as_raw().cast()) }
}

fn as_object<'local>(object: ObjectRef) -> JObject<'local> {
    unsafe { JObject::from_raw(object.as_raw().cast()) }
}

fn object_handle(object: &JObject<'_>) -> Option<ObjectRef> {
    unsafe { ObjectRef::from_raw(object.as_raw().cast()) }
}

fn object_args(args: &[ObjectRef]) -> Vec<jvalue> {
    args.iter()
        .map(|arg| jvalue {
            l: arg.as_raw().cast(),
        })
        .collect()
}

/// Lookups that fail leave `NoClassDefFoundError`/`NoSuchMethodError` pending;
/// all of those mean "not found" here.
fn lookup_error(kind: SymbolKind, name: String, error: JniError) -> BoundaryError {
    match error {
        JniError::JavaException
        | JniError::NullPtr(_)
        | JniError::MethodNotFound { .. }
        | JniError::FieldNotFound { .. } => BoundaryError::NotFound { kind, name },
        other => BoundaryError::Jni(other.to_string()),
    }
}

fn call_error(call: &'static str, error: JniError) -> BoundaryError {
    match error {
        JniError::JavaException => BoundaryError::PendingException(call),
        other => BoundaryError::Jni(format!("{}: {}", call, other)),
    }
}

impl Boundary for JniBoundary<'_, '_> {
    fn find_class(&mut self, name: &str) -> AbiResult<ClassRef> {
        tracing::debug!(name, "FindClass");
        let class = self
            .env
            .find_class(name)
            .map_err(|e| lookup_error(SymbolKind::Class, name.to_string(), e))?;
        unsafe { ClassRef::from_raw(class.as_raw().cast()) }
            .ok_or(BoundaryError::NullResult("FindClass"))
    }

    fn get_method_id(
        &mut self,
        class: ClassRef,
        name: &str,
        signature: &str,
    ) -> AbiResult<MethodId> {
        tracing::debug!(name, signature, "GetMethodID");
        let id = self
            .env
            .get_method_id(&as_class(class), name, signature)
            .map_err(|e| {
                lookup_error(SymbolKind::InstanceMethod, format!("{}{}", name, signature), e)
            })?;
        unsafe { MethodId::from_raw(id.into_raw().cast()) }
            .ok_or(BoundaryError::NullResult("GetMethodID"))
    }

    fn get_static_field_id(
        &mut self,
        class: ClassRef,
        name: &str,
        signature: &str,
    ) -> AbiResult<FieldId> {
        tracing::debug!(name, signature, "GetStaticFieldID");
        let id = self
            .env
            .get_static_field_id(&as_class(class), name, signature)
            .map_err(|e| {
                lookup_error(SymbolKind::StaticField, format!("{}:{}", name, signature), e)
            })?;
        unsafe { FieldId::from_raw(id.into_raw().cast()) }
            .ok_or(BoundaryError::NullResult("GetStaticFieldID"))
    }

    fn new_global_class_ref(&mut self, class: ClassRef) -> AbiResult<ClassRef> {
        let global = self
            .env
            .new_global_ref(as_class(class))
            .map_err(|e| call_error("NewGlobalRef", e))?;
        let handle = unsafe { ClassRef::from_raw(global.as_obj().as_raw().cast()) }
            .ok_or(BoundaryError::NullResult("NewGlobalRef"))?;
        self.globals.refs.insert(handle.as_raw() as usize, global);
        Ok(handle)
    }

    fn delete_global_class_ref(&mut self, class: ClassRef) {
        if self.globals.refs.remove(&(class.as_raw() as usize)).is_none() {
            tracing::debug!(?class, "not a global reference created by this host");
        }
    }

    fn delete_local_ref(&mut self, object: ObjectRef) {
        if let Err(e) = self.env.delete_local_ref(as_object(object)) {
            tracing::debug!(?object, error = %e, "DeleteLocalRef failed");
        }
    }

    fn get_static_object_field(
        &mut self,
        class: ClassRef,
        field: FieldId,
    ) -> AbiResult<ObjectRef> {
        let field = unsafe { JStaticFieldID::from_raw(field.as_raw().cast()) };
        let value = unsafe {
            self.env.get_static_field_unchecked(
                &as_class(class),
                field,
                JavaType::Object("java/lang/Object".to_string()),
            )
        }
        .map_err(|e| call_error("GetStaticObjectField", e))?;
        let object = value.l().map_err(|e| call_error("GetStaticObjectField", e))?;
        object_handle(&object).ok_or(BoundaryError::NullResult("GetStaticObjectField"))
    }

    fn call_object_method(
        &mut self,
        receiver: ObjectRef,
        method: MethodId,
        args: &[ObjectRef],
    ) -> AbiResult<Option<ObjectRef>> {
        let method = unsafe { JMethodID::from_raw(method.as_raw().cast()) };
        let args = object_args(args);
        let value = unsafe {
            self.env
                .call_method_unchecked(&as_object(receiver), method, ReturnType::Object, &args)
        }
        .map_err(|e| call_error("CallObjectMethodA", e))?;
        let object = value.l().map_err(|e| call_error("CallObjectMethodA", e))?;
        Ok(object_handle(&object))
    }

    fn call_void_method(
        &mut self,
        receiver: ObjectRef,
        method: MethodId,
        args: &[ObjectRef],
    ) -> AbiResult<()> {
        let method = unsafe { JMethodID::from_raw(method.as_raw().cast()) };
        let args = object_args(args);
        unsafe {
            self.env.call_method_unchecked(
                &as_object(receiver),
                method,
                ReturnType::Primitive(Primitive::Void),
                &args,
            )
        }
        .map_err(|e| call_error("CallVoidMethodA", e))?;
        Ok(())
    }

    fn new_string(&mut self, text: &str) -> AbiResult<ObjectRef> {
        let string = self
            .env
            .new_string(text)
            .map_err(|e| call_error("NewStringUTF", e))?;
        object_handle(&string).ok_or(BoundaryError::NullResult("NewStringUTF"))
    }

    fn read_string(&mut self, string: ObjectRef) -> AbiResult<String> {
        let string = unsafe { JString::from_raw(string.as_raw().cast()) };
        let text: String = self
            .env
            .get_string(&string)
            .map_err(|e| call_error("GetStringUTFChars", e))?
            .into();
        Ok(text)
    }

    fn exception_check(&mut self) -> bool {
        match self.env.exception_check() {
            Ok(pending) => pending,
            Err(e) => {
                tracing::debug!(error = %e, "ExceptionCheck failed");
                false
            }
        }
    }

    fn exception_clear(&mut self) {
        if let Err(e) = self.env.exception_clear() {
            tracing::debug!(error = %e, "ExceptionClear failed");
        }
    }
}
