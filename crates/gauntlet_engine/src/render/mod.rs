//! Render collaborator boundary
//!
//! The scene produces one [`FrameSnapshot`] per frame; the renderer
//! consumes it fire-and-forget. Nothing in here refers back into live
//! scene state, so the snapshot can outlive the frame that built it.

use crate::assets::cache::AssetHandle;
use crate::assets::types::{MeshResource, Texture3D};
use crate::foundation::math::{Mat4, Vec3, Vec4};
use crate::gameplay::components::render::Material;
use crate::gameplay::game_object::GameObjectId;
use crate::gameplay::scene::{Light, Skybox};

/// Resolved camera state for one frame
#[derive(Debug, Clone)]
pub struct CameraFrame {
    /// World-to-view matrix
    pub view: Mat4,
    /// View-to-clip matrix
    pub projection: Mat4,
    /// Camera world position, for specular terms
    pub position: Vec3,
    /// Background clear color (RGBA)
    pub clear_color: Vec4,
}

/// One renderable object for one frame
#[derive(Debug, Clone)]
pub struct DrawItem {
    /// Originating game object, for debugging and pick buffers
    pub object: GameObjectId,
    /// Model-to-world matrix at snapshot time
    pub model: Mat4,
    /// Mesh to draw
    pub mesh: AssetHandle<MeshResource>,
    /// Material state to bind
    pub material: Material,
}

/// Everything the render collaborator needs for one frame
///
/// Draw items follow game object creation order, matching the scene's
/// lifecycle dispatch order.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    /// Resolved main camera, absent when none is designated
    pub camera: Option<CameraFrame>,
    /// Renderables in creation order
    pub draws: Vec<DrawItem>,
    /// Active light slots
    pub lights: Vec<Light>,
    /// Skybox state, if set
    pub skybox: Option<Skybox>,
    /// Color-grading lookup table, if set
    pub color_lut: Option<AssetHandle<Texture3D>>,
}

impl FrameSnapshot {
    /// Whether the frame has anything to draw
    pub fn is_empty(&self) -> bool {
        self.draws.is_empty() && self.skybox.is_none()
    }
}
