//! Math utilities and types
//!
//! Provides fundamental math types for the scene runtime. All coordinates
//! are Z-up right-handed, matching the authored content this engine hosts.

pub use nalgebra::{
    Matrix3, Matrix4,
    Quaternion,
    Unit,
    Vector2, Vector3, Vector4,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Convert to a transformation matrix (TRS order)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Combine this transform with a child-local transform
    ///
    /// `parent.combine(&local)` yields the world transform of a child whose
    /// local transform is `local`.
    pub fn combine(&self, other: &Transform) -> Transform {
        Transform {
            position: self.position + self.rotation * (self.scale.component_mul(&other.position)),
            rotation: self.rotation * other.rotation,
            scale: self.scale.component_mul(&other.scale),
        }
    }

    /// Get the inverse transform
    pub fn inverse(&self) -> Transform {
        let inv_scale = Vec3::new(1.0 / self.scale.x, 1.0 / self.scale.y, 1.0 / self.scale.z);
        let inv_rotation = self.rotation.inverse();
        let inv_position = inv_rotation * (-self.position.component_mul(&inv_scale));

        Transform {
            position: inv_position,
            rotation: inv_rotation,
            scale: inv_scale,
        }
    }

    /// Local forward axis (-Z) rotated into this transform's frame
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::new(0.0, 0.0, -1.0)
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::*;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Build a rotation quaternion from Euler angles in degrees (XYZ order)
    ///
    /// Authored content specifies rotations in degrees, so this is the
    /// conversion used by `GameObject::set_rotation_euler`.
    pub fn quat_from_euler_degrees(angles: Vec3) -> Quat {
        Quat::from_euler_angles(
            deg_to_rad(angles.x),
            deg_to_rad(angles.y),
            deg_to_rad(angles.z),
        )
    }

    /// Rotation that points the -Z forward axis from `position` toward `target`
    ///
    /// Returns `None` for degenerate input (target coincides with position),
    /// in which case callers should keep their current rotation.
    pub fn look_at_rotation(position: Vec3, target: Vec3, up: Vec3) -> Option<Quat> {
        let offset = target - position;
        if offset.magnitude_squared() <= f32::EPSILON {
            return None;
        }
        let forward = offset.normalize();

        // Fall back to rotation_between when forward is parallel to up and
        // no stable right vector exists.
        let right = forward.cross(&up.normalize());
        if right.magnitude_squared() <= f32::EPSILON {
            return Quat::rotation_between(&Vec3::new(0.0, 0.0, -1.0), &forward)
                .or_else(|| Some(Quat::from_axis_angle(&Vec3::x_axis(), constants::PI)));
        }
        let right = right.normalize();
        let true_up = right.cross(&forward);

        let rotation_matrix = Mat3::new(
            right.x, true_up.x, -forward.x,
            right.y, true_up.y, -forward.y,
            right.z, true_up.z, -forward.z,
        );
        Some(Quat::from_matrix(&rotation_matrix))
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a perspective projection matrix (depth range [0, 1])
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create a look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let tan_half_fovy = (fov_y * 0.5).tan();

        let mut result = Mat4::zeros();
        result[(0, 0)] = 1.0 / (aspect * tan_half_fovy);
        result[(1, 1)] = 1.0 / tan_half_fovy;
        result[(2, 2)] = far / (far - near);
        result[(2, 3)] = -(near * far) / (far - near);
        result[(3, 2)] = 1.0;

        result
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        let forward = (target - eye).normalize();
        let right = forward.cross(&up).normalize();
        let camera_up = right.cross(&forward);

        let translation = Mat4::new(
            1.0, 0.0, 0.0, -eye.x,
            0.0, 1.0, 0.0, -eye.y,
            0.0, 0.0, 1.0, -eye.z,
            0.0, 0.0, 0.0, 1.0,
        );

        let rotation = Mat4::new(
            right.x, right.y, right.z, 0.0,
            camera_up.x, camera_up.y, camera_up.z, 0.0,
            -forward.x, -forward.y, -forward.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );

        rotation * translation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_transform_identity() {
        let transform = Transform::identity();

        assert_eq!(transform.position, Vec3::zeros());
        assert_relative_eq!(transform.rotation, Quat::identity(), epsilon = EPSILON);
        assert_eq!(transform.scale, Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_transform_combination() {
        let parent = Transform::from_position_rotation(
            Vec3::new(1.0, 0.0, 0.0),
            Quat::from_axis_angle(&Vec3::y_axis(), constants::HALF_PI),
        );
        let child = Transform::from_position(Vec3::new(0.0, 0.0, 1.0));

        // Child position (0,0,1) rotated 90 deg around Y, translated by (1,0,0)
        let combined = parent.combine(&child);
        assert_relative_eq!(combined.position, Vec3::new(2.0, 0.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_inverse_round_trip() {
        let original = Transform {
            position: Vec3::new(2.0, 3.0, 1.0),
            rotation: Quat::from_axis_angle(&Vec3::y_axis(), 0.785),
            scale: Vec3::new(2.0, 2.0, 2.0),
        };

        let should_be_identity = original.combine(&original.inverse());

        assert_relative_eq!(should_be_identity.position, Vec3::zeros(), epsilon = EPSILON);
        assert_relative_eq!(
            should_be_identity.scale,
            Vec3::new(1.0, 1.0, 1.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_look_at_rotation_points_forward_at_target() {
        let position = Vec3::new(-8.0, 0.0, 10.0);
        let target = Vec3::zeros();

        let rotation = utils::look_at_rotation(position, target, Vec3::z_axis().into_inner())
            .expect("non-degenerate input");

        let forward = rotation * Vec3::new(0.0, 0.0, -1.0);
        let expected = (target - position).normalize();
        assert_relative_eq!(forward, expected, epsilon = EPSILON);
    }

    #[test]
    fn test_look_at_rotation_degenerate_input() {
        let position = Vec3::new(1.0, 2.0, 3.0);
        assert!(utils::look_at_rotation(position, position, Vec3::z_axis().into_inner()).is_none());
    }

    #[test]
    fn test_euler_degrees_conversion() {
        let rotation = utils::quat_from_euler_degrees(Vec3::new(0.0, 0.0, 90.0));
        let rotated = rotation * Vec3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(rotated, Vec3::new(0.0, 1.0, 0.0), epsilon = EPSILON);
    }
}
