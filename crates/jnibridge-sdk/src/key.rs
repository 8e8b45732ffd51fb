//! Compile-time lookup keys
//!
//! A cache slot is identified by what is being looked up (class, instance
//! method or static field), the declaring class, the member name and the
//! member's JNI type signature. Keys are `const`-constructible so every call
//! site names its slot statically.

use std::fmt;

/// What a [`SymbolKey`] resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// `jclass` via `FindClass`
    Class,
    /// `jmethodID` via `GetMethodID`
    InstanceMethod,
    /// `jfieldID` via `GetStaticFieldID`
    StaticField,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Class => write!(f, "Class"),
            SymbolKind::InstanceMethod => write!(f, "Method"),
            SymbolKind::StaticField => write!(f, "Static field"),
        }
    }
}

/// A class, by internal (slash-separated) name such as `java/lang/Object`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassKey {
    name: &'static str,
}

impl ClassKey {
    /// Create a key for the named class
    pub const fn new(name: &'static str) -> Self {
        ClassKey { name }
    }

    /// Internal class name
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

/// A member of a class: method or field name plus JNI signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemberKey {
    class: ClassKey,
    name: &'static str,
    signature: &'static str,
}

impl MemberKey {
    /// Create a key for `class.name` with the given type signature
    pub const fn new(class: ClassKey, name: &'static str, signature: &'static str) -> Self {
        MemberKey {
            class,
            name,
            signature,
        }
    }

    /// Declaring class
    pub const fn class(&self) -> ClassKey {
        self.class
    }

    /// Member name
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// JNI type signature, e.g. `()Ljava/lang/String;`
    pub const fn signature(&self) -> &'static str {
        self.signature
    }
}

/// Full slot key: (kind, declaring class, member name, member signature).
///
/// Class keys leave member name and signature empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolKey {
    kind: SymbolKind,
    class: &'static str,
    member: &'static str,
    signature: &'static str,
}

impl SymbolKey {
    /// Slot key for a class lookup
    pub const fn class(key: ClassKey) -> Self {
        SymbolKey {
            kind: SymbolKind::Class,
            class: key.name,
            member: "",
            signature: "",
        }
    }

    /// Slot key for an instance method lookup
    pub const fn method(key: MemberKey) -> Self {
        SymbolKey {
            kind: SymbolKind::InstanceMethod,
            class: key.class.name,
            member: key.name,
            signature: key.signature,
        }
    }

    /// Slot key for a static field lookup
    pub const fn static_field(key: MemberKey) -> Self {
        SymbolKey {
            kind: SymbolKind::StaticField,
            class: key.class.name,
            member: key.name,
            signature: key.signature,
        }
    }

    /// Kind of symbol this key resolves to
    pub const fn kind(&self) -> SymbolKind {
        self.kind
    }

    /// Declaring class name
    pub const fn class_name(&self) -> &'static str {
        self.class
    }
}

impl fmt::Display for SymbolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SymbolKind::Class => write!(f, "{}", self.class),
            SymbolKind::InstanceMethod => {
                write!(f, "{}.{}{}", self.class, self.member, self.signature)
            }
            SymbolKind::StaticField => {
                write!(f, "{}.{}:{}", self.class, self.member, self.signature)
            }
        }
    }
}

// ============================================================================
// Well-known symbols
// ============================================================================

/// `java.lang.Object`
pub const OBJECT: ClassKey = ClassKey::new("java/lang/Object");

/// `java.lang.System`
pub const SYSTEM: ClassKey = ClassKey::new("java/lang/System");

/// `java.io.PrintStream`
pub const PRINT_STREAM: ClassKey = ClassKey::new("java/io/PrintStream");

/// `Object.toString()`
pub const OBJECT_TO_STRING: MemberKey =
    MemberKey::new(OBJECT, "toString", "()Ljava/lang/String;");

/// `System.out`
pub const SYSTEM_OUT: MemberKey = MemberKey::new(SYSTEM, "out", "Ljava/io/PrintStream;");

/// `PrintStream.println(String)`
pub const PRINT_STREAM_PRINTLN: MemberKey =
    MemberKey::new(PRINT_STREAM, "println", "(Ljava/lang/String;)V");
