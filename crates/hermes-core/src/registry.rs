//! Capability registry.
//!
//! The [`TypeRegistry`] maps a `(capability type, discriminator)` pair to either a
//! shared instance or a factory. Capabilities are declared up front, optionally
//! with dependency edges to other capabilities; resolving a capability fails
//! while any of its declared dependencies has no registrations.
//!
//! The registry is an ordinary value built at start-up and shared via `Arc`.
//! All mutation is internally synchronized, so late registration from any
//! thread is safe.
//!
//! # Example
//!
//! ```rust
//! use hermes_core::{CapabilityId, TypeRegistry};
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct English;
//!
//! impl Greeter for English {
//!     fn greet(&self) -> String {
//!         "hello".to_string()
//!     }
//! }
//!
//! let registry = TypeRegistry::new();
//! registry.register_type::<dyn Greeter>();
//! registry
//!     .register::<dyn Greeter>("en", Arc::new(English))
//!     .unwrap();
//!
//! let greeter = registry.get::<dyn Greeter>("en").unwrap();
//! assert_eq!(greeter.greet(), "hello");
//! assert!(registry.get::<dyn Greeter>("fr").is_err());
//! ```

use crate::error::{HermesError, HermesResult};
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::{debug, warn};

/// Identity of a capability type.
///
/// Equality and hashing use the [`TypeId`] only; the name is carried for
/// diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityId {
    id: TypeId,
    name: &'static str,
}

impl CapabilityId {
    /// Returns the identity of `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Returns the type name of the capability.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for CapabilityId {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CapabilityId {}

impl Hash for CapabilityId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

enum Entry {
    /// Holds an `Arc<C>`.
    Instance(Box<dyn Any + Send + Sync>),
    /// Holds an `Arc<dyn Fn() -> T + Send + Sync>`.
    Factory(Box<dyn Any + Send + Sync>),
}

struct CapabilitySlot {
    name: &'static str,
    dependencies: Vec<CapabilityId>,
    entries: HashMap<String, Entry>,
}

impl CapabilitySlot {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            dependencies: Vec::new(),
            entries: HashMap::new(),
        }
    }
}

/// A concurrency-safe registry of capability implementations.
///
/// See the [module documentation](self) for an overview.
#[derive(Default)]
pub struct TypeRegistry {
    capabilities: RwLock<HashMap<TypeId, CapabilitySlot>>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares capability `C`. Declaring an existing capability is a no-op.
    pub fn register_type<C: ?Sized + 'static>(&self) {
        self.register_type_with_dependencies::<C>(&[]);
    }

    /// Declares capability `C` with dependency edges.
    ///
    /// Repeated declarations take the union of all dependencies seen.
    pub fn register_type_with_dependencies<C: ?Sized + 'static>(
        &self,
        dependencies: &[CapabilityId],
    ) {
        let capability = CapabilityId::of::<C>();
        let mut capabilities = self.capabilities.write();
        let slot = capabilities
            .entry(capability.id)
            .or_insert_with(|| CapabilitySlot::new(capability.name));
        for dependency in dependencies {
            if !slot.dependencies.contains(dependency) {
                slot.dependencies.push(*dependency);
            }
        }
        debug!(
            capability = capability.name,
            dependencies = slot.dependencies.len(),
            "Declared capability"
        );
    }

    /// Binds a shared instance of capability `C` under `discriminator`.
    ///
    /// Re-registering a discriminator replaces the previous entry.
    ///
    /// # Errors
    ///
    /// Returns [`HermesError::NotFound`] if `C` was never declared.
    pub fn register<C>(
        &self,
        discriminator: impl Into<String>,
        instance: Arc<C>,
    ) -> HermesResult<()>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.insert::<C>(discriminator.into(), Entry::Instance(Box::new(instance)))
    }

    /// Binds a zero-argument constructor for `T` under `discriminator`.
    ///
    /// Use [`construct`](Self::construct) to obtain fresh values.
    ///
    /// # Errors
    ///
    /// Returns [`HermesError::NotFound`] if `T` was never declared.
    pub fn register_factory<T, F>(
        &self,
        discriminator: impl Into<String>,
        factory: F,
    ) -> HermesResult<()>
    where
        T: 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let factory: Arc<dyn Fn() -> T + Send + Sync> = Arc::new(factory);
        self.insert::<T>(discriminator.into(), Entry::Factory(Box::new(factory)))
    }

    fn insert<C: ?Sized + 'static>(&self, discriminator: String, entry: Entry) -> HermesResult<()> {
        let capability = CapabilityId::of::<C>();
        let mut capabilities = self.capabilities.write();
        let slot = capabilities
            .get_mut(&capability.id)
            .ok_or_else(|| HermesError::capability_not_found(capability.name))?;
        if slot.entries.insert(discriminator.clone(), entry).is_some() {
            warn!(
                capability = capability.name,
                discriminator = %discriminator,
                "Replaced existing registration"
            );
        } else {
            debug!(
                capability = capability.name,
                discriminator = %discriminator,
                "Registered"
            );
        }
        Ok(())
    }

    /// Resolves the shared instance of `C` registered under `discriminator`.
    ///
    /// # Errors
    ///
    /// Returns [`HermesError::NotFound`] when `C` is undeclared, when a declared
    /// dependency of `C` has no registrations, or when `discriminator` is unknown.
    /// Returns [`HermesError::Configuration`] when the entry is a factory.
    pub fn get<C>(&self, discriminator: &str) -> HermesResult<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let capabilities = self.capabilities.read();
        let slot = Self::resolve_slot::<C>(&capabilities)?;
        match Self::entry(slot, discriminator)? {
            Entry::Instance(instance) => instance
                .downcast_ref::<Arc<C>>()
                .cloned()
                .ok_or_else(|| mismatched(slot.name, discriminator)),
            Entry::Factory(_) => Err(HermesError::configuration(format!(
                "{} '{discriminator}' is registered as a factory; use construct",
                slot.name
            ))),
        }
    }

    /// Builds a fresh `T` from the factory registered under `discriminator`.
    ///
    /// The factory runs outside the registry lock and never returns a shared
    /// reference.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`get`](Self::get), with the roles of instance and
    /// factory entries swapped.
    pub fn construct<T: 'static>(&self, discriminator: &str) -> HermesResult<T> {
        let factory = {
            let capabilities = self.capabilities.read();
            let slot = Self::resolve_slot::<T>(&capabilities)?;
            match Self::entry(slot, discriminator)? {
                Entry::Factory(factory) => factory
                    .downcast_ref::<Arc<dyn Fn() -> T + Send + Sync>>()
                    .cloned()
                    .ok_or_else(|| mismatched(slot.name, discriminator))?,
                Entry::Instance(_) => {
                    return Err(HermesError::configuration(format!(
                        "{} '{discriminator}' is registered as an instance; use get",
                        slot.name
                    )))
                }
            }
        };
        Ok(factory())
    }

    /// Checks that every declared dependency of `C` has at least one registration.
    ///
    /// # Errors
    ///
    /// Returns [`HermesError::NotFound`] for an undeclared capability or the
    /// first empty dependency.
    pub fn ensure_dependencies<C: ?Sized + 'static>(&self) -> HermesResult<()> {
        let capabilities = self.capabilities.read();
        Self::resolve_slot::<C>(&capabilities).map(|_| ())
    }

    /// Returns the sorted discriminators registered for `C`.
    #[must_use]
    pub fn discriminators<C: ?Sized + 'static>(&self) -> Vec<String> {
        let capabilities = self.capabilities.read();
        let mut names: Vec<String> = capabilities
            .get(&TypeId::of::<C>())
            .map(|slot| slot.entries.keys().cloned().collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    /// Returns `true` if capability `C` has been declared.
    #[must_use]
    pub fn contains<C: ?Sized + 'static>(&self) -> bool {
        self.capabilities.read().contains_key(&TypeId::of::<C>())
    }

    /// Returns the number of declared capabilities.
    #[must_use]
    pub fn capability_count(&self) -> usize {
        self.capabilities.read().len()
    }

    fn resolve_slot<C: ?Sized + 'static>(
        capabilities: &HashMap<TypeId, CapabilitySlot>,
    ) -> HermesResult<&CapabilitySlot> {
        let slot = capabilities
            .get(&TypeId::of::<C>())
            .ok_or_else(|| HermesError::capability_not_found(std::any::type_name::<C>()))?;
        for dependency in &slot.dependencies {
            let satisfied = capabilities
                .get(&dependency.id)
                .is_some_and(|dep| !dep.entries.is_empty());
            if !satisfied {
                return Err(HermesError::dependency_not_found(slot.name, dependency.name));
            }
        }
        Ok(slot)
    }

    fn entry<'a>(slot: &'a CapabilitySlot, discriminator: &str) -> HermesResult<&'a Entry> {
        slot.entries
            .get(discriminator)
            .ok_or_else(|| HermesError::not_found(slot.name, discriminator))
    }
}

fn mismatched(capability: &str, discriminator: &str) -> HermesError {
    HermesError::configuration(format!(
        "{capability} '{discriminator}' holds a value of an unexpected type"
    ))
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let capabilities = self.capabilities.read();
        let mut names: Vec<_> = capabilities
            .values()
            .map(|slot| (slot.name, slot.entries.len()))
            .collect();
        names.sort_unstable();
        f.debug_struct("TypeRegistry")
            .field("capabilities", &names)
            .finish()
    }
}
