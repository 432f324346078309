//! Component type registry
//!
//! Maps each component type to a stable serialization tag, a runtime
//! identifier, and the closures that turn instances into scene-file
//! payloads and back. Registration is explicit; adding or loading a
//! component whose type was never registered is an error, not a panic.
//!
//! A process-wide default registry is seeded with the built-in component
//! types at first use. Applications register their own types on it before
//! constructing or loading scenes.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use lazy_static::lazy_static;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::gameplay::component::{Component, Handle};
use crate::gameplay::SceneError;

/// Stable runtime identifier for a registered component type
///
/// Assigned in registration order within a registry. Scene files never
/// store these; they store the registered tag instead, so ids are free to
/// differ between runs as long as registration covers the same types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentTypeId(u32);

impl ComponentTypeId {
    /// Raw index value, usable as a dense array key
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One component instance plus the bookkeeping its store needs
///
/// The erased handle and the typed handle share a single allocation; the
/// typed side is boxed as `Any` so stores stay homogeneous while `get::<T>`
/// can still hand back a `Handle<T>` without re-wrapping.
pub struct ComponentSlot {
    pub(crate) type_id: ComponentTypeId,
    pub(crate) rust_type: TypeId,
    pub(crate) erased: Arc<RwLock<dyn Component>>,
    pub(crate) typed: Box<dyn Any + Send + Sync>,
}

impl ComponentSlot {
    /// Wrap a fresh component value, returning the slot and its typed handle
    pub(crate) fn new<T: Component>(type_id: ComponentTypeId, value: T) -> (Self, Handle<T>) {
        let handle: Handle<T> = Arc::new(RwLock::new(value));
        let erased: Arc<RwLock<dyn Component>> = handle.clone();
        let slot = Self {
            type_id,
            rust_type: TypeId::of::<T>(),
            erased,
            typed: Box::new(handle.clone()),
        };
        (slot, handle)
    }

    /// Typed handle, if `T` matches the stored component type
    pub(crate) fn typed_handle<T: Component>(&self) -> Option<Handle<T>> {
        self.typed.downcast_ref::<Handle<T>>().cloned()
    }

    /// Registered type id of the stored component
    pub(crate) fn type_id(&self) -> ComponentTypeId {
        self.type_id
    }

    /// Type-erased handle for lifecycle dispatch
    pub(crate) fn erased(&self) -> Arc<RwLock<dyn Component>> {
        self.erased.clone()
    }
}

impl std::fmt::Debug for ComponentSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentSlot")
            .field("type_id", &self.type_id)
            .finish_non_exhaustive()
    }
}

type SaveFn = Box<dyn Fn(&ComponentSlot) -> Result<String, SceneError> + Send + Sync>;
type LoadFn = Box<dyn Fn(&str) -> Result<ComponentSlot, SceneError> + Send + Sync>;

struct RegisteredType {
    id: ComponentTypeId,
    tag: String,
    rust_type: TypeId,
    save: SaveFn,
    load: LoadFn,
}

#[derive(Default)]
struct RegistryInner {
    types: Vec<RegisteredType>,
    by_tag: HashMap<String, usize>,
    by_rust_type: HashMap<TypeId, usize>,
}

/// Registry of component types known to the object model
///
/// Interior-locked so a shared registry can accept registrations from
/// application startup code without exclusive ownership.
pub struct ComponentRegistry {
    inner: RwLock<RegistryInner>,
}

impl ComponentRegistry {
    /// Create an empty registry with no types registered
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(RegistryInner::default()),
        }
    }

    /// Register `T` under `tag`
    ///
    /// Fails with [`SceneError::AlreadyRegistered`] if either the tag or
    /// the Rust type is already present; the registry is left unchanged.
    pub fn register<T>(&self, tag: &str) -> Result<ComponentTypeId, SceneError>
    where
        T: Component + Serialize + DeserializeOwned,
    {
        let mut inner = self.inner.write().unwrap();
        if inner.by_tag.contains_key(tag) || inner.by_rust_type.contains_key(&TypeId::of::<T>()) {
            return Err(SceneError::AlreadyRegistered {
                type_name: tag.to_string(),
            });
        }

        let id = ComponentTypeId(inner.types.len() as u32);
        let save: SaveFn = Box::new(move |slot| {
            let handle = slot
                .typed
                .downcast_ref::<Handle<T>>()
                .ok_or_else(|| SceneError::UnknownType {
                    tag: std::any::type_name::<T>().to_string(),
                })?;
            let guard = handle.read().unwrap();
            Ok(ron::to_string(&*guard)?)
        });
        let load: LoadFn = Box::new(move |data| {
            let value: T = ron::from_str(data)?;
            let (slot, _) = ComponentSlot::new(id, value);
            Ok(slot)
        });

        let index = inner.types.len();
        inner.types.push(RegisteredType {
            id,
            tag: tag.to_string(),
            rust_type: TypeId::of::<T>(),
            save,
            load,
        });
        inner.by_tag.insert(tag.to_string(), index);
        inner.by_rust_type.insert(TypeId::of::<T>(), index);

        debug!("Registered component type '{}' as {:?}", tag, id);
        Ok(id)
    }

    /// Runtime id for `T`, if registered
    pub fn type_id_of<T: Component>(&self) -> Option<ComponentTypeId> {
        let inner = self.inner.read().unwrap();
        inner
            .by_rust_type
            .get(&TypeId::of::<T>())
            .map(|&i| inner.types[i].id)
    }

    /// Serialization tag for a runtime id, if registered
    pub fn tag(&self, id: ComponentTypeId) -> Option<String> {
        let inner = self.inner.read().unwrap();
        inner.types.get(id.index()).map(|t| t.tag.clone())
    }

    /// Whether `T` has been registered
    pub fn is_registered<T: Component>(&self) -> bool {
        self.type_id_of::<T>().is_some()
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().types.len()
    }

    /// Whether no types have been registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encode a live component instance to its scene-file payload
    ///
    /// Returns the registered tag and a nested RON document for the
    /// component state.
    pub(crate) fn save_slot(&self, slot: &ComponentSlot) -> Result<(String, String), SceneError> {
        let inner = self.inner.read().unwrap();
        let entry = inner
            .types
            .get(slot.type_id.index())
            .filter(|t| t.rust_type == slot.rust_type)
            .ok_or_else(|| SceneError::UnknownType {
                tag: format!("{:?}", slot.type_id),
            })?;
        let data = (entry.save)(slot)?;
        Ok((entry.tag.clone(), data))
    }

    /// Decode a scene-file payload into a fresh component slot
    pub(crate) fn instantiate(&self, tag: &str, data: &str) -> Result<ComponentSlot, SceneError> {
        let inner = self.inner.read().unwrap();
        let index = *inner
            .by_tag
            .get(tag)
            .ok_or_else(|| SceneError::UnknownType {
                tag: tag.to_string(),
            })?;
        (inner.types[index].load)(data)
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static! {
    static ref GLOBAL_REGISTRY: Arc<ComponentRegistry> = {
        let registry = ComponentRegistry::new();
        crate::gameplay::components::register_builtins(&registry)
            .unwrap_or_else(|e| panic!("Failed to register built-in component types: {}", e));
        Arc::new(registry)
    };
}

/// Process-wide component registry, seeded with the built-in types
pub fn registry() -> Arc<ComponentRegistry> {
    GLOBAL_REGISTRY.clone()
}
