//! Scene: game object ownership and lifecycle orchestration
//!
//! The scene is the longest-lived owner in the object model. It holds
//! every game object in creation order, the fixed light slots, the skybox
//! and color-grading state, and a weak reference to the main camera
//! object. Per-frame it walks objects in creation order and dispatches
//! each lifecycle hook in component insertion order, so two identical
//! authoring sequences always produce identical hook orders.

use std::sync::{Arc, RwLock, Weak};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::assets::cache::AssetHandle;
use crate::assets::types::{ShaderProgram, Texture3D, TextureCube};
use crate::foundation::math::{Mat3, Vec3};
use crate::gameplay::component::{
    Component, FixedUpdateContext, GameObjectRef, UpdateContext,
};
use crate::gameplay::components::camera::Camera;
use crate::gameplay::components::gui::GuiDrawList;
use crate::gameplay::components::render::RenderComponent;
use crate::gameplay::components::rigid_body::RigidBody;
use crate::gameplay::game_object::{GameObject, GameObjectId};
use crate::gameplay::registry::{self, ComponentRegistry};
use crate::gameplay::SceneError;
use crate::physics::{BodyDescriptor, CollisionEvent, CollisionEventKind};
use crate::render::{CameraFrame, DrawItem, FrameSnapshot};

/// Number of preallocated light slots per scene
pub const MAX_LIGHT_SLOTS: usize = 8;

/// Point light occupying one scene light slot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    /// World-space position
    pub position: Vec3,
    /// Linear RGB color
    pub color: Vec3,
    /// Falloff range in world units
    pub range: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            color: Vec3::new(1.0, 1.0, 1.0),
            range: 10.0,
        }
    }
}

/// Global skybox state for a scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skybox {
    /// Cubemap texture
    pub texture: AssetHandle<TextureCube>,
    /// Shader drawing the skybox
    pub shader: AssetHandle<ShaderProgram>,
    /// Orientation applied to the cubemap lookup
    pub rotation: Mat3,
}

impl Skybox {
    /// Skybox with identity orientation
    pub fn new(texture: AssetHandle<TextureCube>, shader: AssetHandle<ShaderProgram>) -> Self {
        Self {
            texture,
            shader,
            rotation: Mat3::identity(),
        }
    }
}

/// Lifecycle state of a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    /// No game objects have been created yet
    Empty,
    /// At least one game object has been created
    Populated,
    /// Torn down; terminal
    Destroyed,
}

/// Owner of all game objects and global state for one level
pub struct Scene {
    pub(crate) name: String,
    pub(crate) registry: Arc<ComponentRegistry>,
    pub(crate) objects: Vec<Arc<GameObject>>,
    pub(crate) next_id: u32,
    pub(crate) state: SceneState,
    pub(crate) lights: Vec<Light>,
    pub(crate) skybox: Option<Skybox>,
    pub(crate) color_lut: Option<AssetHandle<Texture3D>>,
    pub(crate) main_camera: Weak<GameObject>,
    pub(crate) total_time: f32,
}

impl Scene {
    /// Empty scene bound to the process-wide component registry
    pub fn new(name: &str) -> Self {
        Self::with_registry(name, registry::registry())
    }

    /// Empty scene bound to an explicit registry
    pub fn with_registry(name: &str, registry: Arc<ComponentRegistry>) -> Self {
        Self {
            name: name.to_string(),
            registry,
            objects: Vec::new(),
            next_id: 0,
            state: SceneState::Empty,
            lights: Vec::new(),
            skybox: None,
            color_lut: None,
            main_camera: Weak::new(),
            total_time: 0.0,
        }
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current lifecycle state
    pub fn state(&self) -> SceneState {
        self.state
    }

    /// The registry component types are resolved against
    pub fn registry(&self) -> &Arc<ComponentRegistry> {
        &self.registry
    }

    // ---- game objects -----------------------------------------------

    /// Create an owned game object with a scene-unique id
    ///
    /// Names need not be unique; ids are never reused within a scene.
    pub fn create_game_object(&mut self, name: &str) -> Arc<GameObject> {
        let id = GameObjectId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        let object = GameObject::new(id, name, self.registry.clone());
        self.objects.push(object.clone());
        self.state = SceneState::Populated;
        debug!("Created game object '{}' ({:?})", name, id);
        object
    }

    /// Recreate a game object with an id recorded in a scene file
    pub(crate) fn create_game_object_with_id(
        &mut self,
        id: GameObjectId,
        name: &str,
    ) -> Result<Arc<GameObject>, SceneError> {
        if id.raw() == u32::MAX {
            return Err(SceneError::MalformedScene {
                reason: format!("game object id {} is reserved", id.raw()),
            });
        }
        if self.objects.iter().any(|o| o.id() == id) {
            return Err(SceneError::MalformedScene {
                reason: format!("duplicate game object id {}", id.raw()),
            });
        }
        let object = GameObject::new(id, name, self.registry.clone());
        self.objects.push(object.clone());
        self.next_id = self.next_id.max(id.raw().saturating_add(1));
        self.state = SceneState::Populated;
        Ok(object)
    }

    /// All owned game objects, in creation order
    pub fn objects(&self) -> &[Arc<GameObject>] {
        &self.objects
    }

    /// Look up an owned object by id
    pub fn find_game_object(&self, id: GameObjectId) -> Option<Arc<GameObject>> {
        self.objects.iter().find(|o| o.id() == id).cloned()
    }

    /// First owned object with the given name, in creation order
    pub fn find_by_name(&self, name: &str) -> Option<Arc<GameObject>> {
        self.objects.iter().find(|o| o.name() == name).cloned()
    }

    /// Destroy a game object and, recursively, its children
    ///
    /// Every destroyed component gets its `on_destroy` hook; children are
    /// destroyed depth-first after their parent. Fails with
    /// [`SceneError::MissingObject`] if the id is not owned by this scene.
    pub fn destroy_game_object(&mut self, id: GameObjectId) -> Result<(), SceneError> {
        let root = self
            .find_game_object(id)
            .ok_or(SceneError::MissingObject { id: id.raw() })?;

        let mut doomed = Vec::new();
        collect_subtree(&root, &mut doomed);
        for object in &doomed {
            object.tear_down();
        }
        let doomed_ids: Vec<GameObjectId> = doomed.iter().map(|o| o.id()).collect();
        self.objects.retain(|o| !doomed_ids.contains(&o.id()));
        debug!("Destroyed game object {:?} and {} descendants", id, doomed_ids.len() - 1);
        Ok(())
    }

    // ---- lifecycle dispatch -----------------------------------------

    /// Dispatch `update` to every component, in deterministic order
    ///
    /// Objects tick in creation order, components in insertion order. The
    /// dispatch list is snapshotted first, so hooks may create or destroy
    /// components without perturbing the current frame.
    pub fn update(&mut self, delta_time: f32) {
        self.total_time += delta_time;
        let ctx = UpdateContext {
            delta_time,
            total_time: self.total_time,
        };
        for (owner, components) in self.dispatch_snapshot() {
            for component in components {
                component.write().unwrap().update(&owner, &ctx);
            }
        }
    }

    /// Dispatch `fixed_update` to every component, same order contract as
    /// [`update`](Self::update)
    pub fn fixed_update(&mut self, step: f32) {
        let ctx = FixedUpdateContext { step };
        for (owner, components) in self.dispatch_snapshot() {
            for component in components {
                component.write().unwrap().fixed_update(&owner, &ctx);
            }
        }
    }

    /// Collect this frame's GUI draw commands from every component
    pub fn render_gui(&mut self) -> GuiDrawList {
        let mut list = GuiDrawList::new();
        for (owner, components) in self.dispatch_snapshot() {
            for component in components {
                component.write().unwrap().render_gui(&owner, &mut list);
            }
        }
        list
    }

    /// Route collision reports from the physics collaborator into hooks
    ///
    /// Each event reaches every component of its target object, in
    /// insertion order. Events naming unknown objects are dropped; the
    /// collaborator may legitimately report against objects destroyed
    /// earlier in the same frame.
    pub fn dispatch_collision_events(&mut self, events: &[CollisionEvent]) {
        for event in events {
            let Some(object) = self.find_game_object(event.object) else {
                continue;
            };
            let owner = object.self_ref();
            for component in object.components().erased_snapshot() {
                let mut guard = component.write().unwrap();
                match event.kind {
                    CollisionEventKind::Enter => guard.on_collision_enter(&owner, event),
                    CollisionEventKind::Exit => guard.on_collision_exit(&owner, event),
                }
            }
        }
    }

    /// Run `on_load` over every component, in dispatch order
    ///
    /// Used after deserialization, once the whole hierarchy is in place.
    pub(crate) fn dispatch_on_load(&mut self) {
        for (owner, components) in self.dispatch_snapshot() {
            for component in components {
                component.write().unwrap().on_load(&owner);
            }
        }
    }

    #[allow(clippy::type_complexity)]
    fn dispatch_snapshot(&self) -> Vec<(GameObjectRef, Vec<Arc<RwLock<dyn Component>>>)> {
        self.objects
            .iter()
            .map(|object| (object.self_ref(), object.components().erased_snapshot()))
            .collect()
    }

    // ---- lights -----------------------------------------------------

    /// Number of active light slots
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Resize the active slot list, up to [`MAX_LIGHT_SLOTS`]
    ///
    /// New slots are default lights; shrinking discards the tail.
    pub fn resize_lights(&mut self, count: usize) -> Result<(), SceneError> {
        if count > MAX_LIGHT_SLOTS {
            return Err(SceneError::IndexOutOfRange {
                index: count,
                capacity: MAX_LIGHT_SLOTS,
            });
        }
        self.lights.resize_with(count, Light::default);
        Ok(())
    }

    /// Read one light slot
    pub fn light(&self, index: usize) -> Result<&Light, SceneError> {
        self.lights.get(index).ok_or(SceneError::IndexOutOfRange {
            index,
            capacity: self.lights.len(),
        })
    }

    /// Overwrite one light slot
    pub fn set_light(&mut self, index: usize, light: Light) -> Result<(), SceneError> {
        let capacity = self.lights.len();
        match self.lights.get_mut(index) {
            Some(slot) => {
                *slot = light;
                Ok(())
            }
            None => Err(SceneError::IndexOutOfRange { index, capacity }),
        }
    }

    /// Active lights in slot order
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    // ---- global render state ----------------------------------------

    /// Current skybox, if set
    pub fn skybox(&self) -> Option<&Skybox> {
        self.skybox.as_ref()
    }

    /// Replace or clear the skybox
    pub fn set_skybox(&mut self, skybox: Option<Skybox>) {
        self.skybox = skybox;
    }

    /// Current color-grading lookup table, if set
    pub fn color_lut(&self) -> Option<&AssetHandle<Texture3D>> {
        self.color_lut.as_ref()
    }

    /// Replace or clear the color-grading lookup table
    pub fn set_color_lut(&mut self, lut: Option<AssetHandle<Texture3D>>) {
        self.color_lut = lut;
    }

    /// Designate an owned object as the main camera
    ///
    /// The reference is weak; destroying the object leaves the scene
    /// without a camera rather than dangling. Fails with
    /// [`SceneError::MissingObject`] if the object is not owned here.
    pub fn set_main_camera(&mut self, object: &Arc<GameObject>) -> Result<(), SceneError> {
        if !self.objects.iter().any(|o| Arc::ptr_eq(o, object)) {
            return Err(SceneError::MissingObject {
                id: object.id().raw(),
            });
        }
        self.main_camera = Arc::downgrade(object);
        Ok(())
    }

    /// The main camera object, if designated and still alive
    pub fn main_camera(&self) -> Option<Arc<GameObject>> {
        self.main_camera.upgrade()
    }

    // ---- collaborator snapshots -------------------------------------

    /// Snapshot every rigid body for the physics collaborator
    pub fn collect_bodies(&self) -> Vec<BodyDescriptor> {
        self.objects
            .iter()
            .filter_map(|object| {
                let body = object.get_component::<RigidBody>()?;
                let descriptor = body
                    .read()
                    .unwrap()
                    .describe(object.id(), object.world_transform());
                Some(descriptor)
            })
            .collect()
    }

    /// Snapshot everything the render collaborator needs for one frame
    ///
    /// Draw items follow object creation order. The camera frame is absent
    /// when no main camera is designated or it lost its `Camera` component.
    pub fn build_frame(&self, aspect: f32) -> FrameSnapshot {
        let camera = self.main_camera().and_then(|object| {
            let camera = object.get_component::<Camera>()?;
            let camera = camera.read().unwrap();
            let world = object.world_transform();
            Some(CameraFrame {
                view: camera.view(&world),
                projection: camera.projection(aspect),
                position: world.position,
                clear_color: camera.clear_color,
            })
        });

        let draws = self
            .objects
            .iter()
            .filter_map(|object| {
                let render = object.get_component::<RenderComponent>()?;
                let render = render.read().unwrap();
                Some(DrawItem {
                    object: object.id(),
                    model: object.world_transform().to_matrix(),
                    mesh: render.mesh().clone(),
                    material: render.material().clone(),
                })
            })
            .collect();

        FrameSnapshot {
            camera,
            draws,
            lights: self.lights.clone(),
            skybox: self.skybox.clone(),
            color_lut: self.color_lut.clone(),
        }
    }

    // ---- teardown ---------------------------------------------------

    /// Tear the scene down, consuming it
    ///
    /// Every component gets its `on_destroy` hook in dispatch order. The
    /// state transition to `Destroyed` is terminal.
    pub fn destroy(mut self) {
        self.tear_down();
    }

    fn tear_down(&mut self) {
        if self.state == SceneState::Destroyed {
            return;
        }
        info!("Tearing down scene '{}' ({} objects)", self.name, self.objects.len());
        for object in &self.objects {
            object.tear_down();
        }
        self.objects.clear();
        self.main_camera = Weak::new();
        self.state = SceneState::Destroyed;
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        self.tear_down();
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("objects", &self.objects.len())
            .field("lights", &self.lights.len())
            .finish()
    }
}

fn collect_subtree(root: &Arc<GameObject>, out: &mut Vec<Arc<GameObject>>) {
    out.push(root.clone());
    for child in root.children() {
        collect_subtree(&child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::component::UpdateContext;
    use serde::{Deserialize, Serialize};
    use std::sync::Mutex;

    #[derive(Default, Serialize, Deserialize)]
    struct Recorder {
        label: String,
        #[serde(skip)]
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Component for Recorder {
        fn update(&mut self, _owner: &GameObjectRef, _ctx: &UpdateContext) {
            self.log.lock().unwrap().push(self.label.clone());
        }

        fn on_destroy(&mut self, _owner: &GameObjectRef) {
            self.log.lock().unwrap().push(format!("destroy:{}", self.label));
        }
    }

    fn recorder_scene() -> (Scene, Arc<Mutex<Vec<String>>>) {
        let registry = ComponentRegistry::new();
        registry.register::<Recorder>("Recorder").unwrap();
        let scene = Scene::with_registry("test", Arc::new(registry));
        (scene, Arc::new(Mutex::new(Vec::new())))
    }

    fn add_recorder(object: &Arc<GameObject>, label: &str, log: &Arc<Mutex<Vec<String>>>) {
        object
            .add_component(Recorder {
                label: label.to_string(),
                log: log.clone(),
            })
            .unwrap();
    }

    #[test]
    fn test_state_transitions() {
        let (mut scene, _log) = recorder_scene();
        assert_eq!(scene.state(), SceneState::Empty);

        let object = scene.create_game_object("first");
        assert_eq!(scene.state(), SceneState::Populated);

        scene.destroy_game_object(object.id()).unwrap();
        assert_eq!(scene.state(), SceneState::Populated);

        scene.destroy();
    }

    #[test]
    fn test_update_order_is_deterministic() {
        let (mut scene, log) = recorder_scene();
        let a = scene.create_game_object("a");
        let b = scene.create_game_object("b");
        add_recorder(&a, "a", &log);
        add_recorder(&b, "b", &log);

        scene.update(0.016);
        scene.update(0.016);

        let entries = log.lock().unwrap().clone();
        assert_eq!(entries, vec!["a", "b", "a", "b"]);
    }

    #[test]
    fn test_destroy_recurses_into_children() {
        let (mut scene, log) = recorder_scene();
        let parent = scene.create_game_object("parent");
        let child = scene.create_game_object("child");
        child.set_parent(Some(&parent)).unwrap();
        add_recorder(&parent, "parent", &log);
        add_recorder(&child, "child", &log);

        scene.destroy_game_object(parent.id()).unwrap();

        assert!(scene.find_game_object(child.id()).is_none());
        let entries = log.lock().unwrap().clone();
        assert_eq!(entries, vec!["destroy:parent", "destroy:child"]);
    }

    #[test]
    fn test_destroy_unknown_object_fails() {
        let (mut scene, _log) = recorder_scene();
        let err = scene.destroy_game_object(GameObjectId(42)).unwrap_err();
        assert!(matches!(err, SceneError::MissingObject { id: 42 }));
    }

    #[test]
    fn test_reserved_and_near_max_object_ids() {
        let (mut scene, _log) = recorder_scene();

        let err = scene
            .create_game_object_with_id(GameObjectId(u32::MAX), "bad")
            .unwrap_err();
        assert!(matches!(err, SceneError::MalformedScene { .. }));

        scene
            .create_game_object_with_id(GameObjectId(u32::MAX - 1), "high")
            .unwrap();
        let next = scene.create_game_object("after");
        assert_ne!(next.id().raw(), u32::MAX - 1);
    }

    #[test]
    fn test_light_slots_are_bounds_checked() {
        let (mut scene, _log) = recorder_scene();
        scene.resize_lights(3).unwrap();
        assert_eq!(scene.light_count(), 3);

        scene
            .set_light(
                0,
                Light {
                    position: Vec3::new(0.0, 0.0, 12.0),
                    color: Vec3::new(1.0, 1.0, 1.0),
                    range: 100.0,
                },
            )
            .unwrap();
        assert_eq!(scene.light(0).unwrap().range, 100.0);

        assert!(matches!(
            scene.set_light(3, Light::default()),
            Err(SceneError::IndexOutOfRange { index: 3, .. })
        ));
        assert!(matches!(
            scene.resize_lights(MAX_LIGHT_SLOTS + 1),
            Err(SceneError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_main_camera_must_be_owned_and_goes_away_on_destroy() {
        let (mut scene, _log) = recorder_scene();
        let (mut other, _log2) = recorder_scene();

        let foreign = other.create_game_object("foreign");
        assert!(matches!(
            scene.set_main_camera(&foreign),
            Err(SceneError::MissingObject { .. })
        ));

        let camera = scene.create_game_object("camera");
        scene.set_main_camera(&camera).unwrap();
        assert!(scene.main_camera().is_some());

        let id = camera.id();
        drop(camera);
        scene.destroy_game_object(id).unwrap();
        assert!(scene.main_camera().is_none());
    }

    #[test]
    fn test_collision_events_reach_components_by_kind() {
        #[derive(Default, Serialize, Deserialize)]
        struct Contact {
            #[serde(skip)]
            log: Arc<Mutex<Vec<&'static str>>>,
        }

        impl Component for Contact {
            fn on_collision_enter(&mut self, _owner: &GameObjectRef, _event: &CollisionEvent) {
                self.log.lock().unwrap().push("enter");
            }

            fn on_collision_exit(&mut self, _owner: &GameObjectRef, _event: &CollisionEvent) {
                self.log.lock().unwrap().push("exit");
            }
        }

        let registry = ComponentRegistry::new();
        registry.register::<Contact>("Contact").unwrap();
        let mut scene = Scene::with_registry("contact", Arc::new(registry));

        let object = scene.create_game_object("pad");
        let log = Arc::new(Mutex::new(Vec::new()));
        object.add_component(Contact { log: log.clone() }).unwrap();

        scene.dispatch_collision_events(&[
            CollisionEvent {
                kind: CollisionEventKind::Enter,
                object: object.id(),
                other: GameObjectId(99),
            },
            CollisionEvent {
                kind: CollisionEventKind::Exit,
                object: object.id(),
                other: GameObjectId(99),
            },
            // Unknown target: dropped, not an error
            CollisionEvent {
                kind: CollisionEventKind::Enter,
                object: GameObjectId(1000),
                other: object.id(),
            },
        ]);

        assert_eq!(*log.lock().unwrap(), vec!["enter", "exit"]);
    }
}
