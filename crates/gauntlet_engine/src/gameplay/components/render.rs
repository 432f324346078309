//! Renderable component: mesh + material binding
//!
//! A `RenderComponent` pairs a shared mesh handle with a material. The
//! material is a shader handle plus a named uniform table, mirroring how
//! authored content writes `u_Material.Diffuse`-style parameters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::assets::cache::AssetHandle;
use crate::assets::types::{MeshResource, ShaderProgram, Texture1D, Texture2D, Texture3D};
use crate::foundation::math::{Vec3, Vec4};
use crate::gameplay::component::Component;

/// One named material parameter
///
/// Texture variants hold shared asset handles; scene files store them as
/// paths and the cache re-resolves them on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MaterialValue {
    /// Scalar uniform
    Float(f32),
    /// Integer uniform
    Int(i32),
    /// Three-component vector uniform
    Vec3(Vec3),
    /// Four-component vector uniform
    Vec4(Vec4),
    /// 2D texture binding
    Texture(AssetHandle<Texture2D>),
    /// 1D ramp binding, used by toon shading terms
    Ramp(AssetHandle<Texture1D>),
    /// 3D lookup-table binding
    Lut(AssetHandle<Texture3D>),
}

impl From<f32> for MaterialValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<i32> for MaterialValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<Vec3> for MaterialValue {
    fn from(value: Vec3) -> Self {
        Self::Vec3(value)
    }
}

impl From<Vec4> for MaterialValue {
    fn from(value: Vec4) -> Self {
        Self::Vec4(value)
    }
}

impl From<AssetHandle<Texture2D>> for MaterialValue {
    fn from(value: AssetHandle<Texture2D>) -> Self {
        Self::Texture(value)
    }
}

impl From<AssetHandle<Texture1D>> for MaterialValue {
    fn from(value: AssetHandle<Texture1D>) -> Self {
        Self::Ramp(value)
    }
}

impl From<AssetHandle<Texture3D>> for MaterialValue {
    fn from(value: AssetHandle<Texture3D>) -> Self {
        Self::Lut(value)
    }
}

/// Shader binding plus named uniform parameters
///
/// Uniforms are kept sorted by name so serialized materials are stable
/// across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    /// Display name for debugging and tooling
    pub name: String,
    /// Shader program this material drives
    pub shader: AssetHandle<ShaderProgram>,
    uniforms: BTreeMap<String, MaterialValue>,
}

impl Material {
    /// Create an empty material over a shader
    pub fn new(name: &str, shader: AssetHandle<ShaderProgram>) -> Self {
        Self {
            name: name.to_string(),
            shader,
            uniforms: BTreeMap::new(),
        }
    }

    /// Set a named uniform, replacing any previous value
    pub fn set(&mut self, name: &str, value: impl Into<MaterialValue>) -> &mut Self {
        self.uniforms.insert(name.to_string(), value.into());
        self
    }

    /// Look up a named uniform
    pub fn get(&self, name: &str) -> Option<&MaterialValue> {
        self.uniforms.get(name)
    }

    /// All uniforms, sorted by name
    pub fn uniforms(&self) -> impl Iterator<Item = (&str, &MaterialValue)> {
        self.uniforms.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of set uniforms
    pub fn uniform_count(&self) -> usize {
        self.uniforms.len()
    }
}

/// Binds a mesh and a material to a game object for drawing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderComponent {
    mesh: AssetHandle<MeshResource>,
    material: Material,
}

impl RenderComponent {
    /// Create a renderable from a mesh handle and a material
    pub fn new(mesh: AssetHandle<MeshResource>, material: Material) -> Self {
        Self { mesh, material }
    }

    /// The bound mesh
    pub fn mesh(&self) -> &AssetHandle<MeshResource> {
        &self.mesh
    }

    /// Replace the bound mesh
    pub fn set_mesh(&mut self, mesh: AssetHandle<MeshResource>) {
        self.mesh = mesh;
    }

    /// The bound material
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Replace the bound material
    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }
}

impl Component for RenderComponent {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::cache::AssetCache;

    fn shader(cache: &AssetCache) -> AssetHandle<ShaderProgram> {
        cache.insert_generated(
            "gen://test-shader",
            ShaderProgram::with_stages("shader.vert", "shader.frag"),
        )
    }

    #[test]
    fn test_material_set_replaces_existing_uniform() {
        let cache = AssetCache::new();
        let mut material = Material::new("toon", shader(&cache));

        material.set("u_Material.Shininess", 0.1);
        material.set("u_Material.Shininess", 0.75);

        assert_eq!(material.uniform_count(), 1);
        assert!(matches!(
            material.get("u_Material.Shininess"),
            Some(MaterialValue::Float(v)) if (*v - 0.75).abs() < f32::EPSILON
        ));
    }

    #[test]
    fn test_material_uniforms_iterate_sorted_by_name() {
        let cache = AssetCache::new();
        let mut material = Material::new("blinn", shader(&cache));
        material.set("u_Material.Shininess", 0.5);
        material.set("u_Material.Ambient", Vec3::new(0.1, 0.1, 0.1));

        let names: Vec<&str> = material.uniforms().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["u_Material.Ambient", "u_Material.Shininess"]);
    }
}
