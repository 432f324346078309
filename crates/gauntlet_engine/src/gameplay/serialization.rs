//! Scene save and load
//!
//! Scenes round-trip through a RON document: every game object with its
//! transform, parent link, and component set, plus the global light,
//! skybox, color-LUT, and main-camera state. Component payloads are
//! polymorphic, keyed by the registry tag, with each component's state
//! nested as its own RON document so the outer format never needs to
//! know component field layouts. Unknown tags fail loading with
//! [`SceneError::UnknownType`] instead of silently dropping data.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use log::info;
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};

use crate::assets::cache::AssetHandle;
use crate::assets::types::Texture3D;
use crate::foundation::math::Transform;
use crate::gameplay::game_object::GameObjectId;
use crate::gameplay::registry::{self, ComponentRegistry};
use crate::gameplay::scene::{Light, Scene, SceneState, Skybox};
use crate::gameplay::SceneError;

/// One serialized component: registry tag plus nested RON payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    /// Registry tag identifying the component type
    pub tag: String,
    /// Component state as a nested RON document
    pub data: String,
}

/// One serialized game object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// Scene-unique id, referenced by parent links and the camera field
    pub id: u32,
    /// Object name
    pub name: String,
    /// Local transform
    pub transform: Transform,
    /// Parent object id, if parented
    pub parent: Option<u32>,
    /// Components in insertion order
    pub components: Vec<ComponentRecord>,
}

/// Top-level scene file document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneFile {
    /// Scene name
    pub name: String,
    /// Active light slots
    pub lights: Vec<Light>,
    /// Skybox state, if set
    pub skybox: Option<Skybox>,
    /// Color-grading lookup table, if set
    pub color_lut: Option<AssetHandle<Texture3D>>,
    /// Id of the main camera object, if designated
    pub main_camera: Option<u32>,
    /// Game objects in creation order
    pub objects: Vec<ObjectRecord>,
}

impl Scene {
    /// Serialize the scene to a RON document
    pub fn save_to_string(&self) -> Result<String, SceneError> {
        let mut objects = Vec::with_capacity(self.objects.len());
        for object in &self.objects {
            let mut components = Vec::new();
            object.components().for_each_slot(|slot| {
                let (tag, data) = self.registry.save_slot(slot)?;
                components.push(ComponentRecord { tag, data });
                Ok(())
            })?;
            objects.push(ObjectRecord {
                id: object.id().raw(),
                name: object.name().to_string(),
                transform: object.local_transform(),
                parent: object.parent().map(|p| p.id().raw()),
                components,
            });
        }

        let file = SceneFile {
            name: self.name.clone(),
            lights: self.lights.clone(),
            skybox: self.skybox.clone(),
            color_lut: self.color_lut.clone(),
            main_camera: self.main_camera().map(|c| c.id().raw()),
            objects,
        };

        Ok(ron::ser::to_string_pretty(&file, PrettyConfig::default())?)
    }

    /// Serialize the scene to a file on disk
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let path = path.as_ref();
        let text = self.save_to_string()?;
        std::fs::write(path, text)?;
        info!(
            "Saved scene '{}' ({} objects) to {}",
            self.name,
            self.objects.len(),
            path.display()
        );
        Ok(())
    }

    /// Rebuild a scene from RON text against an explicit registry
    ///
    /// Objects are recreated in file order with their recorded ids, then
    /// parent links are resolved, then components are attached, and
    /// finally `on_load` runs over the whole scene in dispatch order.
    pub fn load_from_str(
        text: &str,
        registry: Arc<ComponentRegistry>,
    ) -> Result<Scene, SceneError> {
        let file: SceneFile = ron::from_str(text)?;
        let mut scene = Scene::with_registry(&file.name, registry);
        scene.lights = file.lights;
        if scene.lights.len() > crate::gameplay::scene::MAX_LIGHT_SLOTS {
            return Err(SceneError::MalformedScene {
                reason: format!("{} light slots exceeds capacity", scene.lights.len()),
            });
        }
        scene.skybox = file.skybox;
        scene.color_lut = file.color_lut;

        let mut by_id = HashMap::with_capacity(file.objects.len());
        for record in &file.objects {
            let object = scene.create_game_object_with_id(GameObjectId(record.id), &record.name)?;
            object.set_local_transform(record.transform);
            by_id.insert(record.id, object);
        }

        for record in &file.objects {
            if let Some(parent_id) = record.parent {
                let parent = by_id
                    .get(&parent_id)
                    .ok_or(SceneError::MissingObject { id: parent_id })?;
                by_id[&record.id].set_parent(Some(parent))?;
            }
        }

        for record in &file.objects {
            let object = &by_id[&record.id];
            for component in &record.components {
                let slot = scene.registry.instantiate(&component.tag, &component.data)?;
                object.components().attach_slot(slot, &record.name)?;
            }
        }

        if let Some(camera_id) = file.main_camera {
            let camera = by_id
                .get(&camera_id)
                .cloned()
                .ok_or(SceneError::MissingObject { id: camera_id })?;
            scene.set_main_camera(&camera)?;
        }

        if scene.objects.is_empty() {
            scene.state = SceneState::Empty;
        }
        scene.dispatch_on_load();
        Ok(scene)
    }

    /// Rebuild a scene from a file using the process-wide registry
    pub fn load(path: impl AsRef<Path>) -> Result<Scene, SceneError> {
        Self::load_with_registry(path, registry::registry())
    }

    /// Rebuild a scene from a file against an explicit registry
    pub fn load_with_registry(
        path: impl AsRef<Path>,
        registry: Arc<ComponentRegistry>,
    ) -> Result<Scene, SceneError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let scene = Self::load_from_str(&text, registry)?;
        info!(
            "Loaded scene '{}' ({} objects) from {}",
            scene.name(),
            scene.objects().len(),
            path.display()
        );
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::cache::AssetCache;
    use crate::assets::types::{MeshResource, ShaderProgram};
    use crate::foundation::math::Vec3;
    use crate::gameplay::components::render::{Material, RenderComponent};
    use crate::gameplay::components::rigid_body::{
        Collider, ColliderShape, RigidBody, RigidBodyType,
    };
    use crate::gameplay::components::{self, Camera};

    fn builtin_registry() -> Arc<ComponentRegistry> {
        let registry = ComponentRegistry::new();
        components::register_builtins(&registry).unwrap();
        Arc::new(registry)
    }

    fn plane_scene(registry: &Arc<ComponentRegistry>) -> Scene {
        let cache = AssetCache::new();
        let shader = cache.insert_generated(
            "gen://blinn-phong",
            ShaderProgram::with_stages("shaders/basic_vert.glsl", "shaders/blinn_phong_frag.glsl"),
        );
        let mesh = cache.insert_generated("gen://plane", MeshResource::generated_plane(100.0, 10.0));

        let mut scene = Scene::with_registry("dungeon", registry.clone());
        let plane = scene.create_game_object("Plane");
        plane
            .add_component(RenderComponent::new(
                mesh,
                Material::new("floor", shader),
            ))
            .unwrap();

        let mut body = RigidBody::new(RigidBodyType::Static);
        body.add_collider(
            Collider::new(ColliderShape::Box {
                half_extents: Vec3::new(50.0, 50.0, 1.0),
            })
            .with_position(Vec3::new(0.0, 0.0, -1.0)),
        );
        plane.add_component(body).unwrap();
        scene
    }

    #[test]
    fn test_plane_scenario_round_trips() {
        let registry = builtin_registry();
        let scene = plane_scene(&registry);

        let text = scene.save_to_string().unwrap();
        let loaded = Scene::load_from_str(&text, registry).unwrap();

        let plane = loaded.find_by_name("Plane").unwrap();
        assert_eq!(plane.components().len(), 2);
        assert!(plane.has_component::<RenderComponent>());

        let body = plane.get_component::<RigidBody>().unwrap();
        let body = body.read().unwrap();
        assert_eq!(body.body_type, RigidBodyType::Static);
        assert_eq!(body.colliders().len(), 1);
        let collider = &body.colliders()[0];
        assert_eq!(collider.position, Vec3::new(0.0, 0.0, -1.0));
        assert!(matches!(
            collider.shape,
            ColliderShape::Box { half_extents } if half_extents == Vec3::new(50.0, 50.0, 1.0)
        ));
    }

    #[test]
    fn test_round_trip_preserves_hierarchy_and_global_state() {
        let registry = builtin_registry();
        let mut scene = Scene::with_registry("level", registry.clone());

        let root = scene.create_game_object("root");
        root.set_position(Vec3::new(1.0, 2.0, 3.0));
        root.set_rotation_euler(Vec3::new(0.0, 0.0, 45.0));
        let child = scene.create_game_object("child");
        child.set_parent(Some(&root)).unwrap();
        child.set_scale(Vec3::new(0.5, 0.5, 0.5));

        let camera = scene.create_game_object("Main Camera");
        camera.add_component(Camera::default()).unwrap();
        scene.set_main_camera(&camera).unwrap();

        scene.resize_lights(3).unwrap();
        scene
            .set_light(
                1,
                Light {
                    position: Vec3::new(0.0, 0.0, 12.0),
                    color: Vec3::new(0.9, 0.2, 0.2),
                    range: 80.0,
                },
            )
            .unwrap();

        let text = scene.save_to_string().unwrap();
        let loaded = Scene::load_from_str(&text, registry).unwrap();

        assert_eq!(loaded.name(), "level");
        assert_eq!(loaded.objects().len(), 3);
        assert_eq!(loaded.light_count(), 3);
        assert_eq!(loaded.light(1).unwrap().range, 80.0);

        let root = loaded.find_by_name("root").unwrap();
        let child = loaded.find_by_name("child").unwrap();
        assert_eq!(root.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(child.scale(), Vec3::new(0.5, 0.5, 0.5));
        assert!(Arc::ptr_eq(&child.parent().unwrap(), &root));

        let camera = loaded.main_camera().unwrap();
        assert_eq!(camera.name(), "Main Camera");
        assert!(camera.has_component::<Camera>());
    }

    #[test]
    fn test_unknown_component_tag_fails_load() {
        let registry = builtin_registry();
        let scene = plane_scene(&registry);
        let text = scene.save_to_string().unwrap();

        // A registry that never learned the built-in tags
        let empty = Arc::new(ComponentRegistry::new());
        let err = Scene::load_from_str(&text, empty).unwrap_err();
        assert!(matches!(err, SceneError::UnknownType { .. }));
    }

    #[test]
    fn test_dangling_parent_id_fails_load() {
        let file = SceneFile {
            name: "broken".to_string(),
            lights: Vec::new(),
            skybox: None,
            color_lut: None,
            main_camera: None,
            objects: vec![ObjectRecord {
                id: 0,
                name: "orphan".to_string(),
                transform: Transform::identity(),
                parent: Some(77),
                components: Vec::new(),
            }],
        };
        let text = ron::ser::to_string_pretty(&file, PrettyConfig::default()).unwrap();

        let err = Scene::load_from_str(&text, builtin_registry()).unwrap_err();
        assert!(matches!(err, SceneError::MissingObject { id: 77 }));
    }

    #[test]
    fn test_duplicate_object_id_fails_load() {
        let record = ObjectRecord {
            id: 3,
            name: "twin".to_string(),
            transform: Transform::identity(),
            parent: None,
            components: Vec::new(),
        };
        let file = SceneFile {
            name: "broken".to_string(),
            lights: Vec::new(),
            skybox: None,
            color_lut: None,
            main_camera: None,
            objects: vec![record.clone(), record],
        };
        let text = ron::ser::to_string_pretty(&file, PrettyConfig::default()).unwrap();

        let err = Scene::load_from_str(&text, builtin_registry()).unwrap_err();
        assert!(matches!(err, SceneError::MalformedScene { .. }));
    }

    #[test]
    fn test_random_parenting_round_trips() {
        // Small multiplicative congruential generator, good enough for
        // picking parents reproducibly.
        let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
        let mut next = move |bound: u64| {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (seed >> 33) % bound
        };

        let registry = builtin_registry();
        let mut scene = Scene::with_registry("random", registry.clone());
        let mut created = Vec::new();
        for i in 0..20 {
            let object = scene.create_game_object(&format!("object-{}", i));
            object.set_position(Vec3::new(i as f32, 0.0, -(i as f32)));
            // Parent to an earlier object half the time
            if !created.is_empty() && next(2) == 0 {
                let parent_index = next(created.len() as u64) as usize;
                object.set_parent(Some(&created[parent_index])).unwrap();
            }
            created.push(object);
        }

        let text = scene.save_to_string().unwrap();
        let loaded = Scene::load_from_str(&text, registry).unwrap();

        assert_eq!(loaded.objects().len(), scene.objects().len());
        for (original, restored) in scene.objects().iter().zip(loaded.objects()) {
            assert_eq!(original.name(), restored.name());
            assert_eq!(original.id(), restored.id());
            assert_eq!(original.local_transform(), restored.local_transform());
            assert_eq!(
                original.parent().map(|p| p.id()),
                restored.parent().map(|p| p.id())
            );
        }
    }
}
