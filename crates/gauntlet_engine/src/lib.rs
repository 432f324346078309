//! # Gauntlet Engine
//!
//! The GameObject/Component scene runtime for a small 3D dungeon engine.
//!
//! ## Features
//!
//! - **Composition Model**: GameObjects built from registered, typed components
//! - **Deterministic Dispatch**: Lifecycle hooks fire in creation/insertion order
//! - **Scene Serialization**: Full RON round-trip of objects, hierarchy, and global state
//! - **Shared Assets**: Content-addressed cache with placeholder fallback on load failure
//! - **Collaborator Boundaries**: Plain-data snapshots for the physics and render backends
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gauntlet_engine::prelude::*;
//!
//! fn main() -> Result<(), SceneError> {
//!     let mut scene = Scene::new("dungeon");
//!
//!     let camera = scene.create_game_object("Main Camera");
//!     camera.set_position(Vec3::new(-9.0, -6.0, 15.0));
//!     camera.look_at(Vec3::zeros());
//!     camera.add_component(Camera::default())?;
//!     scene.set_main_camera(&camera)?;
//!
//!     scene.update(1.0 / 60.0);
//!     scene.save("scene.ron")?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod foundation;
pub mod gameplay;
pub mod physics;
pub mod render;

pub use config::{Config, ConfigError, EngineConfig};
pub use gameplay::SceneError;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{cache::AssetHandle, create_asset, Asset, AssetError},
        config::{Config, EngineConfig},
        foundation::{
            math::{Mat4, Quat, Transform, Vec2, Vec3, Vec4},
            time::{FixedTimestep, Timer},
        },
        gameplay::{
            component::{FixedUpdateContext, UpdateContext},
            components::{
                Camera, Collider, ColliderShape, GuiPanel, GuiText, Material, MaterialSwapBehaviour,
                MaterialValue, RectTransform, RenderComponent, RigidBody, RigidBodyType,
                RotatingBehaviour,
            },
            registry::registry,
            Component, ComponentRegistry, GameObject, GameObjectId, GameObjectRef, Handle, Light,
            Scene, SceneError, SceneState, Skybox,
        },
        physics::{BodyDescriptor, CollisionEvent, CollisionEventKind, CollisionLayers},
        render::FrameSnapshot,
    };
}
