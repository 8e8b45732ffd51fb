//! Resolve-once symbol cache
//!
//! [`RefCache`] holds one slot per [`SymbolKey`]. A slot is filled by the
//! first successful lookup and is never looked up again after that; class
//! references are promoted to global references before they are stored.
//!
//! Slots distinguish "never attempted" from "attempted and failed". Whether a
//! failed slot is retried on the next call is an explicit [`FailurePolicy`].
//!
//! The cache is single-threaded: every operation takes `&mut self`, and the
//! handles it stores are `!Send`.

use rustc_hash::FxHashMap;

use crate::boundary::Boundary;
use crate::error::{AbiResult, BoundaryError};
use crate::handle::{ClassRef, FieldId, MethodId};
use crate::key::{ClassKey, MemberKey, SymbolKey, SymbolKind};

/// What to do when a slot whose last lookup failed is requested again
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Look it up again on the next request
    #[default]
    Retry,
    /// Return [`BoundaryError::PreviouslyFailed`] without calling into the VM
    Permanent,
}

/// A resolved symbol as stored in a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    /// Global class reference
    Class(ClassRef),
    /// Instance method identifier
    Method(MethodId),
    /// Static field identifier
    Field(FieldId),
}

/// State of one cache slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// No lookup has been attempted
    Unresolved,
    /// Lookup succeeded; the symbol is valid until the VM is destroyed
    Resolved(Symbol),
    /// Every lookup so far failed
    Failed {
        /// Number of failed lookups
        attempts: u32,
    },
}

/// Values that can be stored in a slot
pub trait CachedSymbol: Copy {
    /// Kind of key this symbol is stored under
    const KIND: SymbolKind;

    /// Wrap into a slot value
    fn into_symbol(self) -> Symbol;

    /// Unwrap from a slot value, `None` if the slot holds another kind
    fn from_symbol(symbol: Symbol) -> Option<Self>;
}

impl CachedSymbol for ClassRef {
    const KIND: SymbolKind = SymbolKind::Class;

    fn into_symbol(self) -> Symbol {
        Symbol::Class(self)
    }

    fn from_symbol(symbol: Symbol) -> Option<Self> {
        match symbol {
            Symbol::Class(class) => Some(class),
            _ => None,
        }
    }
}

impl CachedSymbol for MethodId {
    const KIND: SymbolKind = SymbolKind::InstanceMethod;

    fn into_symbol(self) -> Symbol {
        Symbol::Method(self)
    }

    fn from_symbol(symbol: Symbol) -> Option<Self> {
        match symbol {
            Symbol::Method(method) => Some(method),
            _ => None,
        }
    }
}

impl CachedSymbol for FieldId {
    const KIND: SymbolKind = SymbolKind::StaticField;

    fn into_symbol(self) -> Symbol {
        Symbol::Field(self)
    }

    fn from_symbol(symbol: Symbol) -> Option<Self> {
        match symbol {
            Symbol::Field(field) => Some(field),
            _ => None,
        }
    }
}

/// Cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests answered from a resolved slot
    pub hits: u64,
    /// Resolver invocations (each is one or more boundary calls)
    pub lookups: u64,
    /// Resolver invocations that failed
    pub failures: u64,
}

/// Explicit, harness-owned cache of boundary lookups.
///
/// The cache does not own the VM; references stored here become invalid when
/// the VM is destroyed. Call [`RefCache::release`] before that happens.
#[derive(Debug, Default)]
pub struct RefCache {
    slots: FxHashMap<SymbolKey, SlotState>,
    policy: FailurePolicy,
    stats: CacheStats,
}

impl RefCache {
    /// Create an empty cache that retries failed lookups
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache with the given failure policy
    pub fn with_policy(policy: FailurePolicy) -> Self {
        RefCache {
            policy,
            ..Self::default()
        }
    }

    /// Failure policy of this cache
    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Counters since creation
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Current state of a slot
    pub fn slot(&self, key: &SymbolKey) -> SlotState {
        self.slots
            .get(key)
            .copied()
            .unwrap_or(SlotState::Unresolved)
    }

    /// Number of slots that hold a resolved symbol
    pub fn len(&self) -> usize {
        self.slots
            .values()
            .filter(|state| matches!(state, SlotState::Resolved(_)))
            .count()
    }

    /// Check if no slot holds a resolved symbol
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the symbol cached under `key`, calling `resolve` if the slot is
    /// not resolved yet.
    ///
    /// `resolve` runs at most once per call, and never once the slot is
    /// resolved. Requesting a `T` whose kind differs from the key's kind is
    /// rejected with [`BoundaryError::KindMismatch`] before any lookup.
    pub fn get_or_resolve<T, F>(&mut self, key: SymbolKey, resolve: F) -> AbiResult<T>
    where
        T: CachedSymbol,
        F: FnOnce() -> AbiResult<T>,
    {
        let mismatch = BoundaryError::KindMismatch {
            key,
            requested: T::KIND,
        };
        if key.kind() != T::KIND {
            return Err(mismatch);
        }

        let attempts = match self.slot(&key) {
            SlotState::Resolved(symbol) => {
                // slots are only ever filled with a symbol of the key's kind
                let value = T::from_symbol(symbol).ok_or(mismatch)?;
                self.stats.hits += 1;
                tracing::trace!(%key, "symbol cache hit");
                return Ok(value);
            }
            SlotState::Failed { attempts } => {
                if self.policy == FailurePolicy::Permanent {
                    return Err(BoundaryError::PreviouslyFailed(key));
                }
                attempts
            }
            SlotState::Unresolved => 0,
        };

        self.stats.lookups += 1;
        match resolve() {
            Ok(value) => {
                tracing::debug!(%key, retries = attempts, "symbol resolved");
                self.slots.insert(key, SlotState::Resolved(value.into_symbol()));
                Ok(value)
            }
            Err(e) => {
                self.stats.failures += 1;
                tracing::debug!(%key, error = %e, "symbol lookup failed");
                self.slots.insert(
                    key,
                    SlotState::Failed {
                        attempts: attempts.saturating_add(1),
                    },
                );
                Err(e)
            }
        }
    }

    /// Resolve a class and cache it as a global reference.
    ///
    /// The local reference returned by `FindClass` is released once the global
    /// one exists.
    pub fn resolve_class<B>(&mut self, env: &mut B, key: ClassKey) -> AbiResult<ClassRef>
    where
        B: Boundary + ?Sized,
    {
        self.get_or_resolve(SymbolKey::class(key), || {
            let local = env.find_class(key.name())?;
            let global = env.new_global_class_ref(local);
            env.delete_local_ref(local.into());
            global
        })
    }

    /// Resolve an instance method of an already resolved class
    pub fn resolve_method<B>(
        &mut self,
        env: &mut B,
        class: ClassRef,
        key: MemberKey,
    ) -> AbiResult<MethodId>
    where
        B: Boundary + ?Sized,
    {
        self.get_or_resolve(SymbolKey::method(key), || {
            env.get_method_id(class, key.name(), key.signature())
        })
    }

    /// Resolve a static field of an already resolved class
    pub fn resolve_static_field<B>(
        &mut self,
        env: &mut B,
        class: ClassRef,
        key: MemberKey,
    ) -> AbiResult<FieldId>
    where
        B: Boundary + ?Sized,
    {
        self.get_or_resolve(SymbolKey::static_field(key), || {
            env.get_static_field_id(class, key.name(), key.signature())
        })
    }

    /// Delete every cached global reference and reset all slots.
    ///
    /// Must run while `env` is still valid, i.e. before the VM is destroyed.
    /// Method and field identifiers need no release.
    pub fn release<B>(&mut self, env: &mut B)
    where
        B: Boundary + ?Sized,
    {
        let mut released = 0usize;
        for (_, state) in self.slots.drain() {
            if let SlotState::Resolved(Symbol::Class(class)) = state {
                env.delete_global_class_ref(class);
                released += 1;
            }
        }
        tracing::debug!(released, "symbol cache released");
    }
}
