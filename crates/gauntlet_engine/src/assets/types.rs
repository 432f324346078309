//! CPU-side asset descriptors
//!
//! These records identify content; they do not decode it. The render
//! collaborator owns pixel/vertex upload, so a "loaded" texture here means
//! the content address resolved, nothing more.

use super::{require_file, Asset, AssetError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Mesh descriptor: either an imported model file or generated geometry
#[derive(Debug, Clone, PartialEq)]
pub struct MeshResource {
    /// Where the geometry comes from
    pub source: MeshSource,
}

/// Origin of a mesh's geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MeshSource {
    /// Model file on disk (OBJ import is the collaborator's job)
    File(PathBuf),
    /// Procedural tiled plane in the XY ground plane
    Plane {
        /// Edge length of the plane
        size: f32,
        /// Texture tiling factor
        uv_scale: f32,
    },
    /// Procedural icosphere
    IcoSphere {
        /// Sphere radius
        radius: f32,
        /// Subdivision count
        tessellation: u32,
    },
}

impl MeshResource {
    /// Generated tiled plane geometry
    pub fn generated_plane(size: f32, uv_scale: f32) -> Self {
        Self {
            source: MeshSource::Plane { size, uv_scale },
        }
    }

    /// Generated icosphere geometry
    pub fn generated_sphere(radius: f32, tessellation: u32) -> Self {
        Self {
            source: MeshSource::IcoSphere {
                radius,
                tessellation,
            },
        }
    }
}

impl Asset for MeshResource {
    const KIND: &'static str = "mesh";

    fn load(path: &Path) -> Result<Self, AssetError> {
        require_file(path)?;
        Ok(Self {
            source: MeshSource::File(path.to_path_buf()),
        })
    }
}

/// 1D texture descriptor (ramp/LUT textures)
#[derive(Debug, Clone, PartialEq)]
pub struct Texture1D {
    /// Image file backing this texture
    pub path: PathBuf,
}

impl Asset for Texture1D {
    const KIND: &'static str = "texture1d";

    fn load(path: &Path) -> Result<Self, AssetError> {
        require_file(path)?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

/// 2D texture descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct Texture2D {
    /// Image file backing this texture
    pub path: PathBuf,
}

impl Asset for Texture2D {
    const KIND: &'static str = "texture2d";

    fn load(path: &Path) -> Result<Self, AssetError> {
        require_file(path)?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

/// 3D texture descriptor (color grading LUTs)
#[derive(Debug, Clone, PartialEq)]
pub struct Texture3D {
    /// LUT file backing this texture
    pub path: PathBuf,
}

impl Asset for Texture3D {
    const KIND: &'static str = "texture3d";

    fn load(path: &Path) -> Result<Self, AssetError> {
        require_file(path)?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

/// Cubemap descriptor (environment/skybox maps)
#[derive(Debug, Clone, PartialEq)]
pub struct TextureCube {
    /// Image file the six faces are sliced from
    pub path: PathBuf,
}

impl Asset for TextureCube {
    const KIND: &'static str = "cubemap";

    fn load(path: &Path) -> Result<Self, AssetError> {
        require_file(path)?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

/// Shader stage file list, parsed from a RON descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaderStages {
    /// Vertex stage source path
    pub vertex: PathBuf,
    /// Fragment stage source path
    pub fragment: PathBuf,
}

/// Shader program descriptor
///
/// Content-addressed by a `.ron` descriptor file listing the stage sources,
/// e.g. `(vertex: "shaders/basic_vert.glsl", fragment: "shaders/toon_frag.glsl")`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderProgram {
    /// Stage source files
    pub stages: ShaderStages,
    /// Debug name derived from the descriptor file stem
    pub debug_name: String,
}

impl ShaderProgram {
    /// Build a descriptor directly from stage paths, without a descriptor file
    ///
    /// Used for generated programs registered through
    /// [`AssetCache::insert_generated`](super::cache::AssetCache::insert_generated).
    pub fn with_stages(vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        let fragment = fragment.into();
        let debug_name = fragment
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            stages: ShaderStages {
                vertex: vertex.into(),
                fragment,
            },
            debug_name,
        }
    }
}

impl Asset for ShaderProgram {
    const KIND: &'static str = "shader";

    fn load(path: &Path) -> Result<Self, AssetError> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                AssetError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                AssetError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let stages: ShaderStages = ron::from_str(&text).map_err(|err| AssetError::Malformed {
            kind: Self::KIND,
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

        let debug_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self { stages, debug_name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_descriptor_round_trip() {
        let dir = std::env::temp_dir().join("gauntlet_shader_test");
        std::fs::create_dir_all(&dir).unwrap();
        let descriptor = dir.join("blinn_phong.ron");
        std::fs::write(
            &descriptor,
            "(vertex: \"shaders/basic_vert.glsl\", fragment: \"shaders/blinn_phong_frag.glsl\")",
        )
        .unwrap();

        let shader = ShaderProgram::load(&descriptor).unwrap();
        assert_eq!(shader.debug_name, "blinn_phong");
        assert_eq!(shader.stages.vertex, PathBuf::from("shaders/basic_vert.glsl"));

        std::fs::remove_file(&descriptor).ok();
    }

    #[test]
    fn test_shader_descriptor_rejects_garbage() {
        let dir = std::env::temp_dir().join("gauntlet_shader_test");
        std::fs::create_dir_all(&dir).unwrap();
        let descriptor = dir.join("broken.ron");
        std::fs::write(&descriptor, "not ron at all }{").unwrap();

        let result = ShaderProgram::load(&descriptor);
        assert!(matches!(result, Err(AssetError::Malformed { .. })));

        std::fs::remove_file(&descriptor).ok();
    }

    #[test]
    fn test_missing_texture_is_not_found() {
        let result = Texture2D::load(Path::new("does/not/exist.png"));
        assert!(matches!(result, Err(AssetError::NotFound { .. })));
    }
}
