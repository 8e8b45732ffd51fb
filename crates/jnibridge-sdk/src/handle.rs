//! Opaque handles handed out by the embedding interface
//!
//! Every handle is a non-null raw pointer owned by the VM. A lookup that
//! yields null is expressed as `None` / an error instead, so a handle value
//! always refers to something the VM produced.
//!
//! Handles are `!Send` and `!Sync`: an execution context is bound
//! to the native thread it was attached on.

use std::ffi::c_void;
use std::fmt;
use std::ptr::NonNull;

macro_rules! opaque_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(NonNull<c_void>);

        impl $name {
            /// Wrap a raw handle, returning `None` for null.
            ///
            /// # Safety
            /// `raw` must be null or a handle obtained from the VM that the
            /// consuming [`Boundary`](crate::Boundary) talks to, and must stay
            /// valid for as long as the wrapper is used.
            pub unsafe fn from_raw(raw: *mut c_void) -> Option<Self> {
                NonNull::new(raw).map($name)
            }

            /// Raw pointer value of the handle
            pub fn as_raw(self) -> *mut c_void {
                self.0.as_ptr()
            }
        }

        impl fmt::Pointer for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Pointer::fmt(&self.0, f)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({:p})"), self.0)
            }
        }
    };
}

opaque_handle!(
    /// Reference to a `java.lang.Class` (local or global)
    ClassRef
);

opaque_handle!(
    /// Reference to any Java object (local or global)
    ObjectRef
);

opaque_handle!(
    /// Instance method identifier (`jmethodID`)
    MethodId
);

opaque_handle!(
    /// Static field identifier (`jfieldID`)
    FieldId
);

impl From<ClassRef> for ObjectRef {
    fn from(class: ClassRef) -> Self {
        ObjectRef(class.0)
    }
}

/// Identity token printed for a class lookup.
///
/// Found references print as their pointer value, a failed lookup prints as
/// `0x0`, the same shape `printf("%p")` gives a null `jclass`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportToken(pub Option<ClassRef>);

impl fmt::Display for ReportToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(class) => write!(f, "{:p}", class),
            None => write!(f, "{:p}", std::ptr::null::<c_void>()),
        }
    }
}
