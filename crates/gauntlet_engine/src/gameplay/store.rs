//! Per-object component storage
//!
//! Each game object owns one `ComponentStore`: an insertion-ordered list
//! of component slots with at most one instance per registered type.
//! Insertion order is the dispatch order for every lifecycle hook, so it
//! is preserved across save and load.

use std::sync::{Arc, RwLock};

use crate::gameplay::component::{Component, GameObjectRef, Handle};
use crate::gameplay::registry::{ComponentRegistry, ComponentSlot};
use crate::gameplay::SceneError;

/// Ordered, typed component storage for one game object
pub struct ComponentStore {
    registry: Arc<ComponentRegistry>,
    slots: RwLock<Vec<ComponentSlot>>,
}

impl ComponentStore {
    /// Create an empty store bound to a registry
    pub fn new(registry: Arc<ComponentRegistry>) -> Self {
        Self {
            registry,
            slots: RwLock::new(Vec::new()),
        }
    }

    /// Add a component instance, returning a shared handle to it
    ///
    /// Fails with [`SceneError::UnknownType`] if `T` was never registered
    /// and with [`SceneError::DuplicateComponent`] if the owner already
    /// holds an instance of `T`; in both cases the store is unchanged.
    /// Runs the new component's `on_load` hook before returning.
    pub fn add<T: Component>(
        &self,
        owner: &GameObjectRef,
        value: T,
    ) -> Result<Handle<T>, SceneError> {
        let type_id =
            self.registry
                .type_id_of::<T>()
                .ok_or_else(|| SceneError::UnknownType {
                    tag: std::any::type_name::<T>().to_string(),
                })?;

        let handle = {
            let mut slots = self.slots.write().unwrap();
            if slots.iter().any(|slot| slot.type_id() == type_id) {
                return Err(SceneError::DuplicateComponent {
                    type_name: self.registry.tag(type_id).unwrap_or_default(),
                    object: owner
                        .upgrade()
                        .map(|o| o.name().to_string())
                        .unwrap_or_default(),
                });
            }
            let (slot, handle) = ComponentSlot::new(type_id, value);
            slots.push(slot);
            handle
        };

        // Store lock is released before the hook runs so the component may
        // inspect its owner's other components.
        handle.write().unwrap().on_load(owner);
        Ok(handle)
    }

    /// Typed handle to this object's instance of `T`, if present
    pub fn get<T: Component>(&self) -> Option<Handle<T>> {
        let type_id = self.registry.type_id_of::<T>()?;
        let slots = self.slots.read().unwrap();
        slots
            .iter()
            .find(|slot| slot.type_id() == type_id)
            .and_then(|slot| slot.typed_handle::<T>())
    }

    /// Whether this object holds an instance of `T`
    pub fn has<T: Component>(&self) -> bool {
        self.get::<T>().is_some()
    }

    /// Remove this object's instance of `T`
    ///
    /// Returns `true` if an instance was removed, after running its
    /// `on_destroy` hook. Handles already held by callers stay valid; the
    /// component is simply no longer attached.
    pub fn remove<T: Component>(&self, owner: &GameObjectRef) -> bool {
        let Some(type_id) = self.registry.type_id_of::<T>() else {
            return false;
        };
        let removed = {
            let mut slots = self.slots.write().unwrap();
            match slots.iter().position(|slot| slot.type_id() == type_id) {
                Some(index) => Some(slots.remove(index)),
                None => None,
            }
        };
        match removed {
            Some(slot) => {
                slot.erased().write().unwrap().on_destroy(owner);
                true
            }
            None => false,
        }
    }

    /// Number of attached components
    pub fn len(&self) -> usize {
        self.slots.read().unwrap().len()
    }

    /// Whether no components are attached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insertion-ordered erased handles, for lifecycle dispatch
    ///
    /// The snapshot is taken under the store lock and iterated without it,
    /// so hooks may add or remove components on their owner.
    pub(crate) fn erased_snapshot(&self) -> Vec<Arc<RwLock<dyn Component>>> {
        let slots = self.slots.read().unwrap();
        slots.iter().map(|slot| slot.erased()).collect()
    }

    /// Visit each slot in insertion order, for serialization
    pub(crate) fn for_each_slot<F>(&self, mut f: F) -> Result<(), SceneError>
    where
        F: FnMut(&ComponentSlot) -> Result<(), SceneError>,
    {
        let slots = self.slots.read().unwrap();
        for slot in slots.iter() {
            f(slot)?;
        }
        Ok(())
    }

    /// Attach an already-built slot without running `on_load`
    ///
    /// Used by scene loading, which runs a single `on_load` pass over the
    /// fully reconstructed scene afterwards.
    pub(crate) fn attach_slot(&self, slot: ComponentSlot, object: &str) -> Result<(), SceneError> {
        let mut slots = self.slots.write().unwrap();
        if slots.iter().any(|s| s.type_id() == slot.type_id()) {
            return Err(SceneError::DuplicateComponent {
                type_name: self.registry.tag(slot.type_id()).unwrap_or_default(),
                object: object.to_string(),
            });
        }
        slots.push(slot);
        Ok(())
    }

    /// Detach every component, running `on_destroy` in insertion order
    pub(crate) fn destroy_all(&self, owner: &GameObjectRef) {
        let drained: Vec<ComponentSlot> = std::mem::take(&mut *self.slots.write().unwrap());
        for slot in drained {
            slot.erased().write().unwrap().on_destroy(owner);
        }
    }
}

impl std::fmt::Debug for ComponentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentStore")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::sync::Weak;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Health {
        current: i32,
    }

    impl Component for Health {}

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Score {
        points: u32,
    }

    impl Component for Score {}

    fn test_registry() -> Arc<ComponentRegistry> {
        let registry = ComponentRegistry::new();
        registry.register::<Health>("Health").unwrap();
        registry.register::<Score>("Score").unwrap();
        Arc::new(registry)
    }

    fn no_owner() -> GameObjectRef {
        Weak::new()
    }

    #[test]
    fn test_add_get_remove() {
        let store = ComponentStore::new(test_registry());

        let health = store.add(&no_owner(), Health { current: 100 }).unwrap();
        assert!(store.has::<Health>());
        assert!(!store.has::<Score>());

        // get returns the same shared instance
        let fetched = store.get::<Health>().unwrap();
        fetched.write().unwrap().current = 60;
        assert_eq!(health.read().unwrap().current, 60);

        assert!(store.remove::<Health>(&no_owner()));
        assert!(!store.has::<Health>());
        assert!(!store.remove::<Health>(&no_owner()));

        // Held handles survive removal
        assert_eq!(health.read().unwrap().current, 60);
    }

    #[test]
    fn test_duplicate_add_leaves_original_untouched() {
        let store = ComponentStore::new(test_registry());

        let first = store.add(&no_owner(), Health { current: 100 }).unwrap();
        let err = store.add(&no_owner(), Health { current: 1 }).unwrap_err();
        assert!(matches!(err, SceneError::DuplicateComponent { .. }));

        assert_eq!(store.len(), 1);
        assert_eq!(first.read().unwrap().current, 100);
        assert_eq!(store.get::<Health>().unwrap().read().unwrap().current, 100);
    }

    #[test]
    fn test_unregistered_type_rejected() {
        #[derive(Debug, Serialize, Deserialize)]
        struct Unregistered;
        impl Component for Unregistered {}

        let store = ComponentStore::new(test_registry());
        let err = store.add(&no_owner(), Unregistered).unwrap_err();
        assert!(matches!(err, SceneError::UnknownType { .. }));
    }

    #[test]
    fn test_remove_runs_on_destroy() {
        use std::sync::atomic::{AtomicBool, Ordering};

        #[derive(Default, Serialize, Deserialize)]
        struct Tombstone {
            #[serde(skip)]
            destroyed: Arc<AtomicBool>,
        }

        impl Component for Tombstone {
            fn on_destroy(&mut self, _owner: &GameObjectRef) {
                self.destroyed.store(true, Ordering::SeqCst);
            }
        }

        let registry = ComponentRegistry::new();
        registry.register::<Tombstone>("Tombstone").unwrap();
        let store = ComponentStore::new(Arc::new(registry));

        let flag = Arc::new(AtomicBool::new(false));
        store
            .add(
                &no_owner(),
                Tombstone {
                    destroyed: flag.clone(),
                },
            )
            .unwrap();

        assert!(store.remove::<Tombstone>(&no_owner()));
        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn test_slots_keep_insertion_order() {
        let registry = test_registry();
        let store = ComponentStore::new(registry.clone());
        store.add(&no_owner(), Score { points: 1 }).unwrap();
        store.add(&no_owner(), Health { current: 5 }).unwrap();

        assert_eq!(store.erased_snapshot().len(), 2);

        // Insertion order, not registration order
        let mut tags = Vec::new();
        store
            .for_each_slot(|slot| {
                tags.push(registry.tag(slot.type_id()).unwrap());
                Ok(())
            })
            .unwrap();
        assert_eq!(tags, vec!["Score".to_string(), "Health".to_string()]);
    }
}
