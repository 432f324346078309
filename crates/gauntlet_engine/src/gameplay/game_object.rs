//! Game objects: named, transformable component containers
//!
//! A game object is a name, a local transform, an optional parent link,
//! and a component store. Objects are always handled as `Arc<GameObject>`;
//! the scene keeps the strong references in creation order, while parent
//! and child links are weak so destruction never leaks a subtree.

use std::sync::{Arc, RwLock, Weak};

use crate::foundation::math::{utils, Quat, Transform, Vec3};
use crate::gameplay::component::{Component, GameObjectRef, Handle};
use crate::gameplay::registry::ComponentRegistry;
use crate::gameplay::store::ComponentStore;
use crate::gameplay::SceneError;

/// Scene-unique identifier for a game object
///
/// Stable across save and load; scene files reference parents by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameObjectId(pub(crate) u32);

impl GameObjectId {
    /// Raw id value as stored in scene files
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// A named object in the scene hierarchy
pub struct GameObject {
    id: GameObjectId,
    name: String,
    self_ref: RwLock<Weak<GameObject>>,
    local: RwLock<Transform>,
    parent: RwLock<Weak<GameObject>>,
    children: RwLock<Vec<Weak<GameObject>>>,
    store: ComponentStore,
}

impl GameObject {
    /// Create a detached game object bound to a registry
    ///
    /// Only scenes create objects; they assign the id and hold the strong
    /// reference.
    pub(crate) fn new(
        id: GameObjectId,
        name: &str,
        registry: Arc<ComponentRegistry>,
    ) -> Arc<Self> {
        let object = Arc::new(Self {
            id,
            name: name.to_string(),
            self_ref: RwLock::new(Weak::new()),
            local: RwLock::new(Transform::identity()),
            parent: RwLock::new(Weak::new()),
            children: RwLock::new(Vec::new()),
            store: ComponentStore::new(registry),
        });
        *object.self_ref.write().unwrap() = Arc::downgrade(&object);
        object
    }

    /// Scene-unique id
    pub fn id(&self) -> GameObjectId {
        self.id
    }

    /// Object name, fixed at creation
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Weak reference suitable for handing to components
    pub fn self_ref(&self) -> GameObjectRef {
        self.self_ref.read().unwrap().clone()
    }

    // ---- components -------------------------------------------------

    /// Attach a component instance (at most one per type)
    pub fn add_component<T: Component>(&self, value: T) -> Result<Handle<T>, SceneError> {
        self.store.add(&self.self_ref(), value)
    }

    /// Handle to this object's instance of `T`, if attached
    pub fn get_component<T: Component>(&self) -> Option<Handle<T>> {
        self.store.get::<T>()
    }

    /// Whether this object holds an instance of `T`
    pub fn has_component<T: Component>(&self) -> bool {
        self.store.has::<T>()
    }

    /// Detach this object's instance of `T`, if attached
    ///
    /// Runs the component's `on_destroy` hook before returning.
    pub fn remove_component<T: Component>(&self) -> bool {
        self.store.remove::<T>(&self.self_ref())
    }

    /// Component storage, in insertion order
    pub fn components(&self) -> &ComponentStore {
        &self.store
    }

    // ---- transform --------------------------------------------------

    /// Copy of the local transform
    pub fn local_transform(&self) -> Transform {
        *self.local.read().unwrap()
    }

    /// Replace the local transform wholesale
    pub fn set_local_transform(&self, transform: Transform) {
        *self.local.write().unwrap() = transform;
    }

    /// Local position
    pub fn position(&self) -> Vec3 {
        self.local.read().unwrap().position
    }

    /// Set the local position
    pub fn set_position(&self, position: Vec3) {
        self.local.write().unwrap().position = position;
    }

    /// Local rotation
    pub fn rotation(&self) -> Quat {
        self.local.read().unwrap().rotation
    }

    /// Set the local rotation directly
    pub fn set_rotation(&self, rotation: Quat) {
        self.local.write().unwrap().rotation = rotation;
    }

    /// Set the local rotation from XYZ Euler angles in degrees
    pub fn set_rotation_euler(&self, degrees: Vec3) {
        self.set_rotation(utils::quat_from_euler_degrees(degrees));
    }

    /// Local scale
    pub fn scale(&self) -> Vec3 {
        self.local.read().unwrap().scale
    }

    /// Set the local scale
    pub fn set_scale(&self, scale: Vec3) {
        self.local.write().unwrap().scale = scale;
    }

    /// World-space transform, recomputed from the parent chain on demand
    pub fn world_transform(&self) -> Transform {
        let local = self.local_transform();
        match self.parent() {
            Some(parent) => parent.world_transform().combine(&local),
            None => local,
        }
    }

    /// Rotate so the forward axis points at a world-space target
    ///
    /// Uses the world Z axis as up. No-op when the target coincides with
    /// this object's world position.
    pub fn look_at(&self, target: Vec3) {
        let world_position = self.world_transform().position;
        let Some(world_rotation) = utils::look_at_rotation(world_position, target, Vec3::z())
        else {
            return;
        };
        let local_rotation = match self.parent() {
            Some(parent) => parent.world_transform().rotation.inverse() * world_rotation,
            None => world_rotation,
        };
        self.set_rotation(local_rotation);
    }

    // ---- hierarchy --------------------------------------------------

    /// Current parent, if any
    pub fn parent(&self) -> Option<Arc<GameObject>> {
        self.parent.read().unwrap().upgrade()
    }

    /// Live children, in attachment order
    pub fn children(&self) -> Vec<Arc<GameObject>> {
        self.children
            .read()
            .unwrap()
            .iter()
            .filter_map(Weak::upgrade)
            .collect()
    }

    /// Reparent this object, or detach it with `None`
    ///
    /// Fails with [`SceneError::CycleDetected`] if the requested parent is
    /// this object or one of its descendants; the hierarchy is left
    /// unchanged on failure. The local transform is not adjusted, so the
    /// world transform changes with the new parent.
    pub fn set_parent(self: &Arc<Self>, parent: Option<&Arc<GameObject>>) -> Result<(), SceneError> {
        if let Some(candidate) = parent {
            let mut ancestor = Some(candidate.clone());
            while let Some(node) = ancestor {
                if Arc::ptr_eq(&node, self) {
                    return Err(SceneError::CycleDetected {
                        child: self.name.clone(),
                        parent: candidate.name.clone(),
                    });
                }
                ancestor = node.parent();
            }
        }

        if let Some(old) = self.parent() {
            old.children
                .write()
                .unwrap()
                .retain(|child| !child.upgrade().is_some_and(|c| Arc::ptr_eq(&c, self)));
        }

        match parent {
            Some(new_parent) => {
                *self.parent.write().unwrap() = Arc::downgrade(new_parent);
                new_parent
                    .children
                    .write()
                    .unwrap()
                    .push(Arc::downgrade(self));
            }
            None => {
                *self.parent.write().unwrap() = Weak::new();
            }
        }
        Ok(())
    }

    /// Detach all components and hierarchy links
    ///
    /// Called by the scene when the object is destroyed. Handles held by
    /// callers keep their components alive, but the object no longer
    /// participates in dispatch or transform propagation.
    pub(crate) fn tear_down(self: &Arc<Self>) {
        for child in self.children() {
            *child.parent.write().unwrap() = Weak::new();
        }
        self.children.write().unwrap().clear();
        if let Some(old) = self.parent() {
            old.children
                .write()
                .unwrap()
                .retain(|child| !child.upgrade().is_some_and(|c| Arc::ptr_eq(&c, self)));
        }
        *self.parent.write().unwrap() = Weak::new();
        self.store.destroy_all(&self.self_ref());
    }
}

impl std::fmt::Debug for GameObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameObject")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("components", &self.store.len())
            .finish()
    }
}
