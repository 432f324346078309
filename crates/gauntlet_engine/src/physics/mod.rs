//! Physics collaborator boundary
//!
//! The scene runtime does not solve physics. It hands the collaborator a
//! flat list of body descriptors each fixed step and receives collision
//! events back, which it routes into component hooks. Everything here is
//! plain data crossing that boundary.

use crate::gameplay::components::rigid_body::{Collider, RigidBodyType};
use crate::gameplay::game_object::GameObjectId;

/// Whether a reported contact is starting or ending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEventKind {
    /// Bodies began touching or overlapping this step
    Enter,
    /// A previously reported contact ended this step
    Exit,
}

/// One contact report from the physics collaborator
///
/// Routed to every component on the `object` game object via
/// `on_collision_enter` or `on_collision_exit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    /// Starting or ending contact
    pub kind: CollisionEventKind,
    /// The game object whose hooks receive this event
    pub object: GameObjectId,
    /// The other party to the contact
    pub other: GameObjectId,
}

/// Snapshot of one rigid body handed to the physics collaborator
///
/// World transforms are resolved at snapshot time so the collaborator
/// never walks the scene hierarchy itself.
#[derive(Debug, Clone)]
pub struct BodyDescriptor {
    /// Owning game object
    pub object: GameObjectId,
    /// Motion class of the body
    pub body_type: RigidBodyType,
    /// Attached collider shapes, in attachment order
    pub colliders: Vec<Collider>,
    /// World-space transform of the owning object
    pub world_transform: crate::foundation::math::Transform,
    /// Layer bit this body occupies
    pub layer: u32,
    /// Layers this body collides with
    pub mask: u32,
    /// Trigger volumes report overlaps but produce no contact response
    pub is_trigger: bool,
}

/// Collision layer definitions for broad-phase filtering
pub struct CollisionLayers;

impl CollisionLayers {
    /// No collision layer
    pub const NONE: u32 = 0;

    /// All collision layers
    pub const ALL: u32 = 0xFFFF_FFFF;

    /// Player character layer
    pub const PLAYER: u32 = 1 << 0;

    /// Enemy character layer
    pub const ENEMY: u32 = 1 << 1;

    /// Static environment geometry (floors, walls, props)
    pub const ENVIRONMENT: u32 = 1 << 2;

    /// Interactable objects (levers, pickups)
    pub const INTERACTABLE: u32 = 1 << 3;

    /// Trigger volumes (overlap reports, no physical response)
    pub const TRIGGER: u32 = 1 << 4;

    /// Check whether two bodies should collide given their layers and masks
    pub fn should_collide(layer_a: u32, mask_a: u32, layer_b: u32, mask_b: u32) -> bool {
        // A's layer must be in B's mask AND B's layer must be in A's mask
        (layer_a & mask_b) != 0 && (layer_b & mask_a) != 0
    }

    /// Combine several layers into one mask
    pub fn mask(layers: &[u32]) -> u32 {
        layers.iter().fold(0, |acc, &layer| acc | layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_collide_requires_mutual_masks() {
        assert!(CollisionLayers::should_collide(
            CollisionLayers::PLAYER,
            CollisionLayers::ENEMY,
            CollisionLayers::ENEMY,
            CollisionLayers::PLAYER,
        ));

        // One-way interest is not enough
        assert!(!CollisionLayers::should_collide(
            CollisionLayers::PLAYER,
            CollisionLayers::ENEMY,
            CollisionLayers::ENEMY,
            CollisionLayers::ENVIRONMENT,
        ));
    }

    #[test]
    fn test_mask_combines_layers() {
        let mask = CollisionLayers::mask(&[CollisionLayers::PLAYER, CollisionLayers::TRIGGER]);
        assert_eq!(mask, CollisionLayers::PLAYER | CollisionLayers::TRIGGER);
    }
}
