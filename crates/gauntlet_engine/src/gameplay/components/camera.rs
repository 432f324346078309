//! Camera component
//!
//! A game object with a `Camera` component can be designated as the
//! scene's main camera. The component holds projection parameters; the
//! view is derived from the owning object's world transform at frame
//! build time.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Mat4, Mat4Ext, Transform, Vec4};
use crate::gameplay::component::Component;

/// Perspective camera parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    /// Near clip plane distance
    pub near: f32,
    /// Far clip plane distance
    pub far: f32,
    /// Background clear color (RGBA)
    pub clear_color: Vec4,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            near: 0.01,
            far: 1000.0,
            clear_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
        }
    }
}

impl Camera {
    /// Projection matrix for a given viewport aspect ratio
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective(
            self.fov_y_degrees.to_radians(),
            aspect,
            self.near,
            self.far,
        )
    }

    /// View matrix derived from the owning object's world transform
    pub fn view(&self, world: &Transform) -> Mat4 {
        world.inverse().to_matrix()
    }
}

impl Component for Camera {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    #[test]
    fn test_projection_preserves_depth_range() {
        let camera = Camera::default();
        let projection = camera.projection(16.0 / 9.0);

        // A point on the near plane maps to depth 0
        let near_point = projection * Vec4::new(0.0, 0.0, camera.near, 1.0);
        assert_relative_eq!(near_point.z / near_point.w, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_view_inverts_world_transform() {
        let camera = Camera::default();
        let world = Transform::from_position(Vec3::new(3.0, -2.0, 5.0));

        let view = camera.view(&world);
        let eye = view * Vec4::new(3.0, -2.0, 5.0, 1.0);
        assert_relative_eq!(eye.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(eye.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(eye.z, 0.0, epsilon = 1e-5);
    }
}
