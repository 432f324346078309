//! Built-in component types
//!
//! The variants authored scene content relies on: camera, renderable
//! mesh+material binding, rigid bodies with collider shapes, a couple of
//! transform-driving behaviours, and immediate-mode GUI elements.
//! Applications add their own types on top via
//! [`ComponentRegistry::register`](crate::gameplay::ComponentRegistry::register).

pub mod behaviours;
pub mod camera;
pub mod gui;
pub mod render;
pub mod rigid_body;

pub use behaviours::{MaterialSwapBehaviour, RotatingBehaviour};
pub use camera::Camera;
pub use gui::{GuiDrawCommand, GuiDrawList, GuiPanel, GuiRect, GuiText, RectTransform};
pub use render::{Material, MaterialValue, RenderComponent};
pub use rigid_body::{Collider, ColliderShape, RigidBody, RigidBodyType};

use crate::gameplay::registry::ComponentRegistry;
use crate::gameplay::SceneError;

/// Register every built-in component type on a registry
///
/// Tags are the stable names scene files use; changing one breaks every
/// saved scene that mentions it.
pub fn register_builtins(registry: &ComponentRegistry) -> Result<(), SceneError> {
    registry.register::<Camera>("Camera")?;
    registry.register::<RenderComponent>("RenderComponent")?;
    registry.register::<RigidBody>("RigidBody")?;
    registry.register::<RotatingBehaviour>("RotatingBehaviour")?;
    registry.register::<MaterialSwapBehaviour>("MaterialSwapBehaviour")?;
    registry.register::<RectTransform>("RectTransform")?;
    registry.register::<GuiPanel>("GuiPanel")?;
    registry.register::<GuiText>("GuiText")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_register_once() {
        let registry = ComponentRegistry::new();
        register_builtins(&registry).unwrap();
        assert_eq!(registry.len(), 8);

        // A second pass is a duplicate registration, not a refresh
        assert!(matches!(
            register_builtins(&registry).unwrap_err(),
            SceneError::AlreadyRegistered { .. }
        ));
    }
}
