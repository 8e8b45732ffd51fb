//! Embedded VM lifecycle.
//!
//! ```text
//! Uninitialized ──initialize──▶ Running ──shutdown──▶ ShutDown
//! ```
//!
//! A [`VmHost`] owns the `JavaVM`, the symbol cache, and the global references
//! the cache holds. Everything obtained through the host is invalidated when it
//! shuts down. JNI allows a single VM per process and cannot re-create one after
//! `DestroyJavaVM`, so a process-wide guard rejects any second `initialize`.
//! A failed creation also uses up the process's one attempt.

use std::fmt;
use std::io::{self, Write};

use jni::{InitArgsBuilder, JavaVM};
use parking_lot::Mutex;

use jnibridge_sdk::{helpers, Boundary, CacheStats, ClassRef, ObjectRef, RefCache, ReportToken};

use crate::boundary::{GlobalRefs, JniBoundary};
use crate::error::HostError;
use crate::options::{HostOptions, JNI_VERSION};

/// Lifecycle state of a [`VmHost`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    /// No VM yet
    Uninitialized,
    /// VM created; lookups allowed
    Running,
    /// VM destroyed (terminal)
    ShutDown,
}

impl fmt::Display for HostState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostState::Uninitialized => write!(f, "uninitialized"),
            HostState::Running => write!(f, "running"),
            HostState::ShutDown => write!(f, "shut down"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProcessVm {
    Free,
    Taken,
    Destroyed,
    Failed,
}

static PROCESS_VM: Mutex<ProcessVm> = parking_lot::const_mutex(ProcessVm::Free);

/// Owner of the process's embedded Java VM.
///
/// The host is bound to the thread that calls [`VmHost::initialize`]: that
/// thread stays attached to the VM until shutdown, and every other operation
/// must run on it. Another thread gets [`HostError::Env`].
pub struct VmHost {
    options: HostOptions,
    state: HostState,
    jvm: Option<JavaVM>,
    cache: RefCache,
    globals: GlobalRefs,
}

impl VmHost {
    /// Create an uninitialized host
    pub fn new(options: HostOptions) -> Self {
        let cache = RefCache::with_policy(options.failure_policy);
        Self {
            options,
            state: HostState::Uninitialized,
            jvm: None,
            cache,
            globals: GlobalRefs::default(),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> HostState {
        self.state
    }

    /// Options the host was created with
    pub fn options(&self) -> &HostOptions {
        &self.options
    }

    /// Counters of the host-owned symbol cache
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn ensure_running(&self, op: &'static str) -> Result<(), HostError> {
        if self.state == HostState::Running {
            Ok(())
        } else {
            Err(HostError::InvalidState {
                op,
                state: self.state,
            })
        }
    }

    /// Create the VM and attach the current thread to it for the host's
    /// lifetime.
    ///
    /// On failure the host stays `Uninitialized`. Once `JNI_CreateJavaVM` has
    /// failed, later calls on any host return [`HostError::CreateFailed`].
    pub fn initialize(&mut self) -> Result<(), HostError> {
        if self.state != HostState::Uninitialized {
            return Err(HostError::InvalidState {
                op: "initialize",
                state: self.state,
            });
        }

        let mut process = PROCESS_VM.lock();
        match *process {
            ProcessVm::Free => {}
            ProcessVm::Failed => return Err(HostError::CreateFailed),
            ProcessVm::Taken | ProcessVm::Destroyed => return Err(HostError::AlreadyCreated),
        }

        let vm_options = self.options.vm_options();
        tracing::info!(classpath = %self.options.classpath, "starting Java VM");

        let mut builder = InitArgsBuilder::new()
            .version(JNI_VERSION)
            .ignore_unrecognized(false);
        for option in &vm_options {
            builder = builder.option(option.as_str());
        }
        let args = builder
            .build()
            .map_err(|e| HostError::Create(e.to_string()))?;
        let jvm = match JavaVM::new(args) {
            Ok(jvm) => jvm,
            Err(e) => {
                *process = ProcessVm::Failed;
                return Err(HostError::Create(e.to_string()));
            }
        };
        *process = ProcessVm::Taken;

        // JavaVM::new detaches the creating thread again
        jvm.attach_current_thread_permanently()
            .map_err(|e| HostError::Env(e.to_string()))?;

        self.jvm = Some(jvm);
        self.state = HostState::Running;
        tracing::info!("Java VM created");
        Ok(())
    }

    /// Run `f` with this thread's execution context and the host's cache.
    ///
    /// Must be called on the thread that initialized the host.
    pub fn with_context<R, F>(&mut self, f: F) -> Result<R, HostError>
    where
        F: FnOnce(&mut JniBoundary<'_, '_>, &mut RefCache) -> R,
    {
        self.ensure_running("use the VM")?;
        let jvm = self.jvm.as_ref().ok_or(HostError::InvalidState {
            op: "use the VM",
            state: self.state,
        })?;
        let env = jvm.get_env().map_err(|e| HostError::Env(e.to_string()))?;
        let mut boundary = JniBoundary::new(env, &mut self.globals);
        Ok(f(&mut boundary, &mut self.cache))
    }

    /// Look up a class by internal name, bypassing the cache.
    ///
    /// `Ok(None)` means the name did not resolve (missing, malformed, or an
    /// exception was already pending). The `NoClassDefFoundError` raised by
    /// the failed lookup is cleared so the host stays usable. The returned
    /// reference is local to the current thread and dies with the VM.
    pub fn resolve_class_by_name(&mut self, name: &str) -> Result<Option<ClassRef>, HostError> {
        self.ensure_running("resolve a class")?;
        self.with_context(|env, _| match env.find_class(name) {
            Ok(class) => Some(class),
            Err(e) => {
                tracing::debug!(name, error = %e, "class lookup failed");
                clear_pending_exception(env);
                None
            }
        })
    }

    /// `System.out.println(object.toString())` inside the VM, through the
    /// host's symbol cache
    pub fn print_object(&mut self, object: ObjectRef) -> Result<(), HostError> {
        self.with_context(|env, cache| {
            let result = helpers::print_object(cache, env, object);
            if result.is_err() {
                clear_pending_exception(env);
            }
            result
        })??;
        Ok(())
    }

    /// `object.toString()` read back into Rust, through the host's symbol cache
    pub fn describe(&mut self, object: ObjectRef) -> Result<String, HostError> {
        let text = self.with_context(|env, cache| {
            let result = helpers::describe(cache, env, object);
            if result.is_err() {
                clear_pending_exception(env);
            }
            result
        })??;
        Ok(text)
    }

    /// Release cached references and destroy the VM.
    ///
    /// Terminal: the host cannot be initialized again, and neither can any
    /// other host in this process.
    pub fn shutdown(&mut self) -> Result<(), HostError> {
        self.ensure_running("shut down")?;

        if let Err(e) = self.with_context(|env, cache| cache.release(env)) {
            tracing::warn!(error = %e, "could not release cached references");
        }
        // GlobalRef drops call into the VM, so this must precede DestroyJavaVM
        if !self.globals.is_empty() {
            tracing::debug!(leftover = self.globals.len(), "deleting global references");
        }
        self.globals.clear();

        self.state = HostState::ShutDown;
        *PROCESS_VM.lock() = ProcessVm::Destroyed;
        let jvm = self.jvm.take().ok_or(HostError::InvalidState {
            op: "shut down",
            state: HostState::ShutDown,
        })?;

        // SAFETY: the cache and global table are empty, the host no longer
        // hands out contexts, and no other host can exist in this process.
        unsafe { jvm.destroy() }.map_err(|e| HostError::Destroy(e.to_string()))?;
        tracing::info!("Java VM destroyed");
        Ok(())
    }
}

fn clear_pending_exception(env: &mut JniBoundary<'_, '_>) {
    if env.exception_check() {
        env.exception_clear();
        tracing::debug!("cleared pending exception");
    }
}

impl Drop for VmHost {
    fn drop(&mut self) {
        if self.state == HostState::Running {
            if let Err(e) = self.shutdown() {
                tracing::warn!(error = %e, "Java VM shutdown failed");
            }
        }
    }
}

/// Write the identity token for a lookup result: the reference's address, or
/// `0x0` when the class was not found.
pub fn report<W: Write>(out: &mut W, class: Option<ClassRef>) -> io::Result<()> {
    writeln!(out, "{}", ReportToken(class))
}
