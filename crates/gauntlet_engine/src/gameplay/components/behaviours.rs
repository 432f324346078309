//! Transform- and material-driving behaviours
//!
//! Small authored behaviours that give scenes motion and feedback without
//! application code. Both read their sibling components through the
//! owner's store; a behaviour never locks itself during its own hook.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{utils, Vec3};
use crate::gameplay::component::{Component, GameObjectRef, UpdateContext};
use crate::gameplay::components::render::{Material, RenderComponent};
use crate::physics::CollisionEvent;

/// Spins the owning object at a constant rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotatingBehaviour {
    /// Rotation speed per axis in degrees per second
    pub speed: Vec3,
}

impl RotatingBehaviour {
    /// Spin about the given per-axis rates, in degrees per second
    pub fn new(speed: Vec3) -> Self {
        Self { speed }
    }
}

impl Component for RotatingBehaviour {
    fn update(&mut self, owner: &GameObjectRef, ctx: &UpdateContext) {
        let Some(object) = owner.upgrade() else {
            return;
        };
        let step = utils::quat_from_euler_degrees(self.speed * ctx.delta_time);
        object.set_rotation(step * object.rotation());
    }
}

/// Swaps the owner's render material on trigger overlap
///
/// Expects a sibling `RenderComponent`; does nothing without one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialSwapBehaviour {
    /// Material applied when an overlap begins
    pub enter_material: Material,
    /// Material applied when the overlap ends
    pub exit_material: Material,
}

impl MaterialSwapBehaviour {
    /// Swap to `enter_material` on overlap, back to `exit_material` after
    pub fn new(enter_material: Material, exit_material: Material) -> Self {
        Self {
            enter_material,
            exit_material,
        }
    }

    fn apply(&self, owner: &GameObjectRef, material: &Material) {
        let Some(object) = owner.upgrade() else {
            return;
        };
        if let Some(render) = object.get_component::<RenderComponent>() {
            render.write().unwrap().set_material(material.clone());
        }
    }
}

impl Component for MaterialSwapBehaviour {
    fn on_collision_enter(&mut self, owner: &GameObjectRef, _event: &CollisionEvent) {
        self.apply(owner, &self.enter_material.clone());
    }

    fn on_collision_exit(&mut self, owner: &GameObjectRef, _event: &CollisionEvent) {
        self.apply(owner, &self.exit_material.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::Weak;

    #[test]
    fn test_update_without_owner_is_inert() {
        let mut behaviour = RotatingBehaviour::new(Vec3::new(0.0, 0.0, 90.0));
        behaviour.update(
            &Weak::new(),
            &UpdateContext {
                delta_time: 0.5,
                total_time: 0.5,
            },
        );
    }

    #[test]
    fn test_material_swap_follows_trigger_events() {
        use crate::assets::cache::AssetCache;
        use crate::assets::types::{MeshResource, ShaderProgram};
        use crate::gameplay::game_object::{GameObject, GameObjectId};
        use crate::gameplay::registry::ComponentRegistry;
        use crate::physics::CollisionEventKind;
        use std::sync::Arc;

        let registry = Arc::new({
            let r = ComponentRegistry::new();
            r.register::<RenderComponent>("RenderComponent").unwrap();
            r.register::<MaterialSwapBehaviour>("MaterialSwapBehaviour")
                .unwrap();
            r
        });
        let object = GameObject::new(GameObjectId(1), "lever", registry);

        let cache = AssetCache::new();
        let shader = cache.insert_generated(
            "gen://toon",
            ShaderProgram::with_stages("v.glsl", "toon_frag.glsl"),
        );
        let mesh = cache.insert_generated("gen://lever", MeshResource::generated_plane(1.0, 1.0));

        object
            .add_component(RenderComponent::new(
                mesh,
                Material::new("idle", shader.clone()),
            ))
            .unwrap();
        let swap = object
            .add_component(MaterialSwapBehaviour::new(
                Material::new("active", shader.clone()),
                Material::new("idle", shader),
            ))
            .unwrap();

        let event = CollisionEvent {
            kind: CollisionEventKind::Enter,
            object: GameObjectId(1),
            other: GameObjectId(2),
        };
        swap.write()
            .unwrap()
            .on_collision_enter(&object.self_ref(), &event);

        let render = object.get_component::<RenderComponent>().unwrap();
        assert_eq!(render.read().unwrap().material().name, "active");
    }

    #[test]
    fn test_rotation_step_scales_with_delta_time() {
        let behaviour = RotatingBehaviour::new(Vec3::new(0.0, 0.0, 90.0));

        // Half a second at 90 deg/s is a 45 degree step
        let step = utils::quat_from_euler_degrees(behaviour.speed * 0.5);
        let rotated = step * Vec3::new(1.0, 0.0, 0.0);
        let expected = (45.0f32).to_radians();
        assert_relative_eq!(rotated.x, expected.cos(), epsilon = 1e-5);
        assert_relative_eq!(rotated.y, expected.sin(), epsilon = 1e-5);
    }
}
