//! Gameplay object model: registry, components, game objects, scenes
//!
//! This is the runtime object model the rest of the engine hangs off.
//! A `Scene` owns `GameObject`s; each game object owns a `ComponentStore`
//! holding at most one component per registered type, in insertion order;
//! the `ComponentRegistry` maps component types to stable identifiers,
//! factories, and serialization functions.
//!
//! All mutation happens on the main simulation thread. Handles are
//! `Arc<RwLock<..>>` so fully-formed resources can be produced off-thread,
//! but lifecycle hooks always run synchronously in a deterministic order:
//! game-object creation order, then component insertion order.

pub mod component;
pub mod components;
pub mod game_object;
pub mod registry;
pub mod scene;
pub mod serialization;
pub mod store;

pub use component::{Component, GameObjectRef, Handle};
pub use game_object::{GameObject, GameObjectId};
pub use registry::{ComponentRegistry, ComponentTypeId};
pub use scene::{Light, Scene, SceneState, Skybox, MAX_LIGHT_SLOTS};
pub use store::ComponentStore;

use crate::assets::AssetError;
use thiserror::Error;

/// Errors reported by the gameplay object model
///
/// Structural misuse (duplicate adds, unknown types, cycles, bad slot
/// indices) fails fast and is returned to the caller; nothing here is
/// silently corrected.
#[derive(Debug, Error)]
pub enum SceneError {
    /// A component type was registered twice in the same registry
    #[error("component type already registered: {type_name}")]
    AlreadyRegistered {
        /// Serialization tag of the offending type
        type_name: String,
    },

    /// A component type or tag has no registration
    #[error("unknown component type: {tag}")]
    UnknownType {
        /// The unresolved tag or type name
        tag: String,
    },

    /// A second instance of a component type was added to one game object
    #[error("duplicate component {type_name} on game object '{object}'")]
    DuplicateComponent {
        /// Serialization tag of the offending type
        type_name: String,
        /// Name of the game object that already holds an instance
        object: String,
    },

    /// A reparent operation would make the hierarchy cyclic
    #[error("reparenting '{child}' under '{parent}' would create a cycle")]
    CycleDetected {
        /// Name of the object being reparented
        child: String,
        /// Name of the requested parent
        parent: String,
    },

    /// A light slot index past the fixed capacity was addressed
    #[error("light slot {index} out of range (capacity {capacity})")]
    IndexOutOfRange {
        /// Requested slot index
        index: usize,
        /// Fixed slot capacity
        capacity: usize,
    },

    /// An operation or scene file referenced a game object id that does
    /// not exist in the scene
    #[error("unknown game object id {id}")]
    MissingObject {
        /// The dangling id
        id: u32,
    },

    /// A scene file parsed but violates a structural rule
    #[error("malformed scene file: {reason}")]
    MalformedScene {
        /// What rule the file broke
        reason: String,
    },

    /// Resource-loader failure, surfaced unchanged
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// Scene file could not be read or written
    #[error("scene file io error: {0}")]
    Io(#[from] std::io::Error),

    /// Scene state could not be encoded to RON
    #[error("scene file encode error: {0}")]
    Encode(#[from] ron::Error),

    /// Scene file text could not be parsed
    #[error("scene file parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}
