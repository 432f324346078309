//! Rigid body and collider components
//!
//! These components carry descriptors only. Each fixed step the scene
//! snapshots them into [`BodyDescriptor`](crate::physics::BodyDescriptor)s
//! for the physics collaborator; solving and contact generation happen on
//! the other side of that boundary.

use serde::{Deserialize, Serialize};

use crate::assets::cache::AssetHandle;
use crate::assets::types::MeshResource;
use crate::foundation::math::{Transform, Vec3};
use crate::gameplay::component::Component;
use crate::gameplay::game_object::GameObjectId;
use crate::physics::{BodyDescriptor, CollisionLayers};

/// Motion class of a rigid body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RigidBodyType {
    /// Never moves; other bodies collide against it
    Static,
    /// Fully simulated by the physics collaborator
    Dynamic,
    /// Moved by gameplay code, pushes dynamic bodies but is not pushed
    Kinematic,
}

/// Collider geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    /// Axis-aligned box given as half-extents
    Box {
        /// Half the box size along each local axis
        half_extents: Vec3,
    },
    /// Sphere centered on the collider origin
    Sphere {
        /// Sphere radius
        radius: f32,
    },
    /// Infinite plane through the collider origin
    Plane {
        /// Plane normal in collider space
        normal: Vec3,
    },
    /// Convex hull built from a mesh asset
    ConvexMesh {
        /// Mesh whose hull the collaborator cooks
        mesh: AssetHandle<MeshResource>,
    },
    /// Capped cylinder along the local Z axis
    Cylinder {
        /// Half the cylinder height
        half_height: f32,
        /// Cylinder radius
        radius: f32,
    },
}

/// One collider shape with its local placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    /// Shape geometry
    pub shape: ColliderShape,
    /// Offset from the owning object's origin
    pub position: Vec3,
    /// Per-axis scale applied to the shape
    pub scale: Vec3,
}

impl Collider {
    /// Collider at the object origin with unit scale
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            position: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }

    /// Place the collider at an offset from the object origin
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Scale the shape per axis
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }
}

/// Rigid body descriptor attached to a game object
///
/// Trigger volumes are rigid bodies with `is_trigger` set: they report
/// overlaps through the collision hooks but produce no contact response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigidBody {
    /// Motion class
    pub body_type: RigidBodyType,
    colliders: Vec<Collider>,
    is_trigger: bool,
    /// Layer bit this body occupies
    pub layer: u32,
    /// Layers this body collides with
    pub mask: u32,
}

impl RigidBody {
    /// Solid body of the given motion class, on the environment layer
    pub fn new(body_type: RigidBodyType) -> Self {
        Self {
            body_type,
            colliders: Vec::new(),
            is_trigger: false,
            layer: CollisionLayers::ENVIRONMENT,
            mask: CollisionLayers::ALL,
        }
    }

    /// Static trigger volume on the trigger layer
    pub fn trigger() -> Self {
        Self {
            body_type: RigidBodyType::Static,
            colliders: Vec::new(),
            is_trigger: true,
            layer: CollisionLayers::TRIGGER,
            mask: CollisionLayers::ALL,
        }
    }

    /// Attach a collider shape, keeping attachment order
    pub fn add_collider(&mut self, collider: Collider) -> &mut Self {
        self.colliders.push(collider);
        self
    }

    /// Attached colliders, in attachment order
    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    /// Whether this body is a trigger volume
    pub fn is_trigger(&self) -> bool {
        self.is_trigger
    }

    /// Set the collision layer and mask
    pub fn set_layers(&mut self, layer: u32, mask: u32) -> &mut Self {
        self.layer = layer;
        self.mask = mask;
        self
    }

    /// Snapshot this body for the physics collaborator
    pub fn describe(&self, object: GameObjectId, world_transform: Transform) -> BodyDescriptor {
        BodyDescriptor {
            object,
            body_type: self.body_type,
            colliders: self.colliders.clone(),
            world_transform,
            layer: self.layer,
            mask: self.mask,
            is_trigger: self.is_trigger,
        }
    }
}

impl Component for RigidBody {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collider_builders() {
        let collider = Collider::new(ColliderShape::Box {
            half_extents: Vec3::new(50.0, 50.0, 1.0),
        })
        .with_position(Vec3::new(0.0, 0.0, -1.0));

        assert_eq!(collider.position, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(collider.scale, Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_trigger_defaults() {
        let trigger = RigidBody::trigger();
        assert!(trigger.is_trigger());
        assert_eq!(trigger.body_type, RigidBodyType::Static);
        assert_eq!(trigger.layer, CollisionLayers::TRIGGER);
    }

    #[test]
    fn test_describe_carries_colliders_in_order() {
        let mut body = RigidBody::new(RigidBodyType::Static);
        body.add_collider(Collider::new(ColliderShape::Sphere { radius: 1.0 }));
        body.add_collider(Collider::new(ColliderShape::Plane {
            normal: Vec3::z_axis().into_inner(),
        }));

        let descriptor = body.describe(GameObjectId(7), Transform::identity());
        assert_eq!(descriptor.colliders.len(), 2);
        assert!(matches!(
            descriptor.colliders[0].shape,
            ColliderShape::Sphere { .. }
        ));
        assert_eq!(descriptor.object, GameObjectId(7));
    }
}
