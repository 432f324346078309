//! Component trait and shared handle types
//!
//! Components are behavior-carrying state attached to game objects. Every
//! component type implements [`Component`] for lifecycle dispatch and must
//! be registered with the [`ComponentRegistry`](super::ComponentRegistry)
//! before instances can be added to objects or read back from scene files.

use std::sync::{Arc, RwLock, Weak};

use crate::gameplay::components::gui::GuiDrawList;
use crate::gameplay::game_object::GameObject;
use crate::physics::CollisionEvent;

/// Shared handle to a component instance
///
/// The same allocation backs the typed handle returned from
/// `ComponentStore::add`/`get` and the type-erased handle the scene uses
/// for lifecycle dispatch. Callers lock for exactly the duration of an
/// access; lifecycle hooks run with the component's own lock held, so a
/// component must never look itself up through its owner during a hook.
pub type Handle<T> = Arc<RwLock<T>>;

/// Non-owning reference from a component back to its game object
///
/// Weak so that component storage never keeps a destroyed object alive.
pub type GameObjectRef = Weak<GameObject>;

/// Per-frame context passed to component lifecycle hooks
#[derive(Debug, Clone, Copy)]
pub struct UpdateContext {
    /// Variable frame delta in seconds
    pub delta_time: f32,
    /// Seconds since the scene started updating
    pub total_time: f32,
}

/// Fixed-step context passed to `fixed_update`
#[derive(Debug, Clone, Copy)]
pub struct FixedUpdateContext {
    /// Fixed step size in seconds
    pub step: f32,
}

/// Behavior interface for everything attachable to a game object
///
/// All hooks have empty default bodies; a component overrides only the
/// ones it cares about. Hooks are invoked on the main simulation thread
/// in deterministic order (object creation order, then component
/// insertion order within each object).
pub trait Component: Send + Sync + 'static {
    /// Called once when the component joins a live object, and again for
    /// every component after a scene finishes loading from disk
    fn on_load(&mut self, _owner: &GameObjectRef) {}

    /// Called every variable-rate frame while the scene is active
    fn update(&mut self, _owner: &GameObjectRef, _ctx: &UpdateContext) {}

    /// Called zero or more times per frame at the fixed simulation rate
    fn fixed_update(&mut self, _owner: &GameObjectRef, _ctx: &FixedUpdateContext) {}

    /// Called when the physics collaborator reports another body starting
    /// to touch or overlap this component's owner
    fn on_collision_enter(&mut self, _owner: &GameObjectRef, _event: &CollisionEvent) {}

    /// Called when a previously reported contact or overlap ends
    fn on_collision_exit(&mut self, _owner: &GameObjectRef, _event: &CollisionEvent) {}

    /// Called once per frame to emit immediate-mode GUI geometry
    fn render_gui(&mut self, _owner: &GameObjectRef, _out: &mut GuiDrawList) {}

    /// Called once when the component is removed or its owner is destroyed
    fn on_destroy(&mut self, _owner: &GameObjectRef) {}
}
