//! In-memory `Boundary` double with call counters

use std::collections::{HashMap, HashSet};
use std::ffi::c_void;

use crate::boundary::Boundary;
use crate::error::{AbiResult, BoundaryError};
use crate::handle::{ClassRef, FieldId, MethodId, ObjectRef};
use crate::key::SymbolKind;

#[derive(Debug, Clone)]
enum FakeObject {
    Class(String),
    Str(String),
    PrintStream,
}

/// Models a tiny JVM: a few bootstrap classes, `Object.toString`,
/// `System.out` and `PrintStream.println`, which appends to `stdout`.
pub(crate) struct FakeBoundary {
    next_addr: usize,
    classes: HashSet<String>,
    methods: HashSet<(String, String, String)>,
    fields: HashSet<(String, String, String)>,
    objects: HashMap<usize, FakeObject>,
    globals: HashSet<usize>,
    member_ids: HashMap<(String, String, String), usize>,
    pending_exception: bool,

    find_class_calls: HashMap<String, usize>,
    method_id_calls: usize,
    static_field_id_calls: usize,
    global_refs_created: usize,
    global_refs_deleted: usize,
    local_refs_deleted: usize,

    pub stdout: Vec<String>,
}

impl FakeBoundary {
    pub fn new() -> Self {
        let classes = [
            "java/lang/Object",
            "java/lang/System",
            "java/io/PrintStream",
            "java/lang/String",
        ];
        let member = |c: &str, n: &str, s: &str| (c.to_string(), n.to_string(), s.to_string());
        FakeBoundary {
            next_addr: 0x1000,
            classes: classes.iter().map(|c| c.to_string()).collect(),
            methods: [
                member("java/lang/Object", "toString", "()Ljava/lang/String;"),
                member("java/io/PrintStream", "println", "(Ljava/lang/String;)V"),
            ]
            .into_iter()
            .collect(),
            fields: [member("java/lang/System", "out", "Ljava/io/PrintStream;")]
                .into_iter()
                .collect(),
            objects: HashMap::new(),
            globals: HashSet::new(),
            member_ids: HashMap::new(),
            pending_exception: false,
            find_class_calls: HashMap::new(),
            method_id_calls: 0,
            static_field_id_calls: 0,
            global_refs_created: 0,
            global_refs_deleted: 0,
            local_refs_deleted: 0,
            stdout: Vec::new(),
        }
    }

    pub fn define_class(&mut self, name: &str) {
        self.classes.insert(name.to_string());
    }

    pub fn remove_class(&mut self, name: &str) {
        self.classes.remove(name);
    }

    pub fn find_class_calls(&self, name: &str) -> usize {
        self.find_class_calls.get(name).copied().unwrap_or(0)
    }

    pub fn method_id_calls(&self) -> usize {
        self.method_id_calls
    }

    pub fn static_field_id_calls(&self) -> usize {
        self.static_field_id_calls
    }

    pub fn global_refs_created(&self) -> usize {
        self.global_refs_created
    }

    pub fn global_refs_deleted(&self) -> usize {
        self.global_refs_deleted
    }

    pub fn local_refs_deleted(&self) -> usize {
        self.local_refs_deleted
    }

    pub fn live_objects(&self) -> usize {
        self.objects.len()
    }

    pub fn is_global(&self, object: ObjectRef) -> bool {
        self.globals.contains(&(object.as_raw() as usize))
    }

    fn alloc(&mut self, object: FakeObject) -> usize {
        let addr = self.next_addr;
        self.next_addr += 0x10;
        self.objects.insert(addr, object);
        addr
    }

    fn object(&self, raw: *mut c_void) -> AbiResult<&FakeObject> {
        self.objects
            .get(&(raw as usize))
            .ok_or_else(|| BoundaryError::Jni(format!("stale reference {:p}", raw)))
    }

    fn class_name(&self, class: ClassRef) -> AbiResult<String> {
        match self.object(class.as_raw())? {
            FakeObject::Class(name) => Ok(name.clone()),
            other => Err(BoundaryError::Jni(format!("not a class: {:?}", other))),
        }
    }

    fn member_id(&mut self, member: (String, String, String)) -> usize {
        if let Some(id) = self.member_ids.get(&member) {
            return *id;
        }
        let id = self.next_addr;
        self.next_addr += 0x10;
        self.member_ids.insert(member, id);
        id
    }

    /// JNI lookups are undefined with an exception pending; the double
    /// refuses them instead.
    fn refuse_if_pending(&self, call: &'static str) -> AbiResult<()> {
        if self.pending_exception {
            Err(BoundaryError::PendingException(call))
        } else {
            Ok(())
        }
    }

    fn member_name(&self, id: *mut c_void) -> Option<&str> {
        self.member_ids
            .iter()
            .find(|(_, addr)| **addr == id as usize)
            .map(|((_, name, _), _)| name.as_str())
    }
}

fn handle<T>(addr: usize, wrap: unsafe fn(*mut c_void) -> Option<T>) -> T {
    unsafe { wrap(addr as *mut c_void) }.expect("fake addresses are non-null")
}

impl Boundary for FakeBoundary {
    fn find_class(&mut self, name: &str) -> AbiResult<ClassRef> {
        *self.find_class_calls.entry(name.to_string()).or_default() += 1;
        self.refuse_if_pending("FindClass")?;
        if !self.classes.contains(name) {
            self.pending_exception = true;
            return Err(BoundaryError::NotFound {
                kind: SymbolKind::Class,
                name: name.to_string(),
            });
        }
        let addr = self.alloc(FakeObject::Class(name.to_string()));
        Ok(handle(addr, ClassRef::from_raw))
    }

    fn get_method_id(
        &mut self,
        class: ClassRef,
        name: &str,
        signature: &str,
    ) -> AbiResult<MethodId> {
        self.method_id_calls += 1;
        self.refuse_if_pending("GetMethodID")?;
        let member = (self.class_name(class)?, name.to_string(), signature.to_string());
        if !self.methods.contains(&member) {
            self.pending_exception = true;
            return Err(BoundaryError::NotFound {
                kind: SymbolKind::InstanceMethod,
                name: format!("{}{}", name, signature),
            });
        }
        let id = self.member_id(member);
        Ok(handle(id, MethodId::from_raw))
    }

    fn get_static_field_id(
        &mut self,
        class: ClassRef,
        name: &str,
        signature: &str,
    ) -> AbiResult<FieldId> {
        self.static_field_id_calls += 1;
        self.refuse_if_pending("GetStaticFieldID")?;
        let member = (self.class_name(class)?, name.to_string(), signature.to_string());
        if !self.fields.contains(&member) {
            self.pending_exception = true;
            return Err(BoundaryError::NotFound {
                kind: SymbolKind::StaticField,
                name: format!("{}:{}", name, signature),
            });
        }
        let id = self.member_id(member);
        Ok(handle(id, FieldId::from_raw))
    }

    fn new_global_class_ref(&mut self, class: ClassRef) -> AbiResult<ClassRef> {
        let object = self.object(class.as_raw())?.clone();
        let addr = self.alloc(object);
        self.globals.insert(addr);
        self.global_refs_created += 1;
        Ok(handle(addr, ClassRef::from_raw))
    }

    fn delete_global_class_ref(&mut self, class: ClassRef) {
        let addr = class.as_raw() as usize;
        if self.globals.remove(&addr) {
            self.objects.remove(&addr);
            self.global_refs_deleted += 1;
        }
    }

    fn delete_local_ref(&mut self, object: ObjectRef) {
        self.objects.remove(&(object.as_raw() as usize));
        self.local_refs_deleted += 1;
    }

    fn get_static_object_field(
        &mut self,
        class: ClassRef,
        field: FieldId,
    ) -> AbiResult<ObjectRef> {
        self.class_name(class)?;
        if self.member_name(field.as_raw()) != Some("out") {
            return Err(BoundaryError::NullResult("GetStaticObjectField"));
        }
        let addr = self.alloc(FakeObject::PrintStream);
        Ok(handle(addr, ObjectRef::from_raw))
    }

    fn call_object_method(
        &mut self,
        receiver: ObjectRef,
        method: MethodId,
        _args: &[ObjectRef],
    ) -> AbiResult<Option<ObjectRef>> {
        if self.member_name(method.as_raw()) != Some("toString") {
            return Err(BoundaryError::Jni("unknown method".to_string()));
        }
        let text = match self.object(receiver.as_raw())? {
            FakeObject::Class(name) => format!("class {}", name.replace('/', ".")),
            FakeObject::Str(text) => text.clone(),
            FakeObject::PrintStream => "java.io.PrintStream@1b6d3586".to_string(),
        };
        let addr = self.alloc(FakeObject::Str(text));
        Ok(Some(handle(addr, ObjectRef::from_raw)))
    }

    fn call_void_method(
        &mut self,
        receiver: ObjectRef,
        method: MethodId,
        args: &[ObjectRef],
    ) -> AbiResult<()> {
        if self.member_name(method.as_raw()) != Some("println") {
            return Err(BoundaryError::Jni("unknown method".to_string()));
        }
        if !matches!(self.object(receiver.as_raw())?, FakeObject::PrintStream) {
            return Err(BoundaryError::Jni("receiver is not a PrintStream".to_string()));
        }
        let line = match args.first() {
            Some(arg) => match self.object(arg.as_raw())? {
                FakeObject::Str(text) => text.clone(),
                other => return Err(BoundaryError::Jni(format!("not a string: {:?}", other))),
            },
            None => return Err(BoundaryError::Jni("missing argument".to_string())),
        };
        self.stdout.push(line);
        Ok(())
    }

    fn new_string(&mut self, text: &str) -> AbiResult<ObjectRef> {
        let addr = self.alloc(FakeObject::Str(text.to_string()));
        Ok(handle(addr, ObjectRef::from_raw))
    }

    fn read_string(&mut self, string: ObjectRef) -> AbiResult<String> {
        match self.object(string.as_raw())? {
            FakeObject::Str(text) => Ok(text.clone()),
            other => Err(BoundaryError::Jni(format!("not a string: {:?}", other))),
        }
    }

    fn exception_check(&mut self) -> bool {
        self.pending_exception
    }

    fn exception_clear(&mut self) {
        self.pending_exception = false;
    }
}
