//! Dungeon scene authoring demo
//!
//! Builds the full dungeon level out of engine components: floor plane,
//! player character, mage enemy, props, trap spikes, the lever, and the
//! surrounding walls, plus lights, skybox, and a color-grading LUT. The
//! scene is saved to `scene.ron`, reloaded to prove the round-trip, and
//! then ticked headless for a few seconds.

use gauntlet_engine::assets::{cache, create_asset};
use gauntlet_engine::assets::types::{
    MeshResource, ShaderProgram, Texture1D, Texture2D, Texture3D, TextureCube,
};
use gauntlet_engine::prelude::*;
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
enum AppError {
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),
    #[error("config error: {0}")]
    Config(#[from] gauntlet_engine::ConfigError),
}

const GRAVITY: f32 = 9.81;

/// Input-driven character movement with a jump
///
/// The application feeds a movement input each frame; the component
/// integrates it against the owner's transform at the fixed rate. A
/// jump request launches the character with `jump_impulse` when it is
/// on the ground and is dropped otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CharacterMovement {
    /// Ground speed in units per second
    move_speed: f32,
    /// Initial upward velocity of a jump, units per second
    jump_impulse: f32,
    /// Current movement input on the ground plane, normalized by the caller
    input: Vec2,
    #[serde(skip)]
    vertical_velocity: f32,
    #[serde(skip)]
    jump_requested: bool,
}

impl CharacterMovement {
    fn new(move_speed: f32, jump_impulse: f32) -> Self {
        Self {
            move_speed,
            jump_impulse,
            input: Vec2::zeros(),
            vertical_velocity: 0.0,
            jump_requested: false,
        }
    }

    fn set_input(&mut self, input: Vec2) {
        self.input = input;
    }

    fn jump(&mut self) {
        self.jump_requested = true;
    }
}

impl Component for CharacterMovement {
    fn fixed_update(&mut self, owner: &GameObjectRef, ctx: &FixedUpdateContext) {
        let Some(object) = owner.upgrade() else {
            return;
        };
        let mut position = object.position();
        let grounded = position.z <= 0.0 && self.vertical_velocity <= 0.0;

        if self.jump_requested && grounded {
            self.vertical_velocity = self.jump_impulse;
        }
        self.jump_requested = false;

        position += Vec3::new(self.input.x, self.input.y, 0.0) * self.move_speed * ctx.step;

        self.vertical_velocity -= GRAVITY * ctx.step;
        position.z += self.vertical_velocity * ctx.step;
        if position.z <= 0.0 {
            position.z = 0.0;
            self.vertical_velocity = 0.0;
        }

        object.set_position(position);
    }
}

/// Keeps the owning camera at a fixed offset from a target point
///
/// The application feeds the target (the character's position) each
/// frame; the camera trails it and stays aimed at it.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CameraFollowBehaviour {
    /// Camera position relative to the target
    offset: Vec3,
    /// Point being followed
    target: Vec3,
}

impl CameraFollowBehaviour {
    fn new(offset: Vec3) -> Self {
        Self {
            offset,
            target: Vec3::zeros(),
        }
    }

    fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }
}

impl Component for CameraFollowBehaviour {
    fn update(&mut self, owner: &GameObjectRef, _ctx: &UpdateContext) {
        let Some(object) = owner.upgrade() else {
            return;
        };
        object.set_position(self.target + self.offset);
        object.look_at(self.target);
    }
}

struct SceneMaterials {
    stone: Material,
    character: Material,
    mage: Material,
    wall: Material,
    grate: Material,
    sword: Material,
    spike: Material,
    lever_idle: Material,
    lever_active: Material,
    rock: Material,
}

fn build_materials() -> SceneMaterials {
    let blinn_phong = create_asset::<ShaderProgram>("shaders/blinn_phong.ron");
    let ambient = create_asset::<ShaderProgram>("shaders/ambient.ron");
    let specular = create_asset::<ShaderProgram>("shaders/textured_specular.ron");
    let reflective = create_asset::<ShaderProgram>("shaders/environment_reflective.ron");
    let toon = create_asset::<ShaderProgram>("shaders/toon_shading.ron");

    let character_tex = create_asset::<Texture2D>("textures/CharacterTexture.png");
    let mage_tex = create_asset::<Texture2D>("textures/MageEnemy.png");
    let sword_tex = create_asset::<Texture2D>("textures/SwordTexture.png");
    let wall_tex = create_asset::<Texture2D>("textures/Wall.png");
    let rock_tex = create_asset::<Texture2D>("textures/RockTexture.png");
    let grate_tex = create_asset::<Texture2D>("textures/WallGrateUVS.png");
    let floor_tex = create_asset::<Texture2D>("textures/StoneTexture.png");
    let spike_tex = create_asset::<Texture2D>("textures/SpikeTexture.png");
    let lever_tex = create_asset::<Texture2D>("textures/LeverTextures.png");
    let toon_ramp = create_asset::<Texture1D>("luts/toon-1D.png");

    let simple = |name: &str, shader: &AssetHandle<ShaderProgram>, diffuse: &AssetHandle<Texture2D>, shininess: f32| {
        let mut material = Material::new(name, shader.clone());
        material.set("u_Material.Diffuse", diffuse.clone());
        material.set("u_Material.Shininess", shininess);
        material
    };

    let mut rock = Material::new("Toon", toon.clone());
    rock.set("u_Material.Diffuse", rock_tex.clone());
    rock.set("s_ToonTerm", toon_ramp);
    rock.set("u_Material.Shininess", 0.1);
    rock.set("u_Material.Steps", 8);

    SceneMaterials {
        stone: simple("Stone", &blinn_phong, &floor_tex, 0.1),
        character: simple("Character", &blinn_phong, &character_tex, 0.3),
        mage: simple("Mage", &ambient, &mage_tex, 0.3),
        wall: simple("Wall", &blinn_phong, &wall_tex, 0.1),
        grate: simple("Grate", &specular, &grate_tex, 0.1),
        sword: simple("Sword", &blinn_phong, &sword_tex, 0.1),
        spike: simple("Spike", &reflective, &spike_tex, 0.5),
        lever_idle: simple("Lever", &specular, &lever_tex, 0.1),
        lever_active: simple("LeverActive", &specular, &lever_tex, 0.9),
        rock,
    }
}

fn build_scene() -> Result<Scene, SceneError> {
    let materials = build_materials();

    let character_mesh = create_asset::<MeshResource>("CharacterFinal.obj");
    let mage_mesh = create_asset::<MeshResource>("MageEnemy.obj");
    let wall_mesh = create_asset::<MeshResource>("Wall.obj");
    let grate_mesh = create_asset::<MeshResource>("WallGrate.obj");
    let sword_mesh = create_asset::<MeshResource>("Sword.obj");
    let rock_mesh = create_asset::<MeshResource>("Rock.obj");
    let spike_mesh = create_asset::<MeshResource>("SpikeTrap.obj");
    let lever_mesh = create_asset::<MeshResource>("Lever.obj");
    let tiled_plane = cache().insert_generated(
        "gen://tiled-plane",
        MeshResource::generated_plane(60.0, 20.0),
    );

    let mut scene = Scene::new("dungeon");

    // The skybox cubemap is authored Y-up; rotate 90 degrees about X for
    // this engine's Z-up world.
    let mut skybox = Skybox::new(
        create_asset::<TextureCube>("cubemaps/ocean/ocean.jpg"),
        create_asset::<ShaderProgram>("shaders/skybox.ron"),
    );
    skybox.rotation = Quat::from_axis_angle(&Vec3::x_axis(), std::f32::consts::FRAC_PI_2)
        .to_rotation_matrix()
        .into_inner();
    scene.set_skybox(Some(skybox));
    scene.set_color_lut(Some(create_asset::<Texture3D>("luts/CustomFix.CUBE")));

    scene.resize_lights(3)?;
    scene.set_light(
        0,
        Light {
            position: Vec3::new(0.0, 1.0, 3.0),
            color: Vec3::new(1.0, 1.0, 1.0),
            range: 2000.0,
        },
    )?;
    scene.set_light(
        1,
        Light {
            position: Vec3::new(1.0, 0.0, 3.0),
            color: Vec3::new(0.2, 0.8, 0.1),
            ..Light::default()
        },
    )?;
    scene.set_light(
        2,
        Light {
            position: Vec3::new(0.0, 1.0, 3.0),
            color: Vec3::new(1.0, 0.2, 0.1),
            ..Light::default()
        },
    )?;

    let camera = scene.create_game_object("Main Camera");
    camera.set_position(Vec3::new(-8.0, 0.0, 10.0));
    camera.look_at(Vec3::zeros());
    camera.add_component(Camera::default())?;
    camera.add_component(CameraFollowBehaviour::new(Vec3::new(-8.0, 0.0, 10.0)))?;
    scene.set_main_camera(&camera)?;

    let plane = scene.create_game_object("Plane");
    plane.add_component(RenderComponent::new(tiled_plane, materials.stone.clone()))?;
    let mut floor_body = RigidBody::new(RigidBodyType::Static);
    floor_body.add_collider(
        Collider::new(ColliderShape::Box {
            half_extents: Vec3::new(50.0, 50.0, 1.0),
        })
        .with_position(Vec3::new(0.0, 0.0, -1.0)),
    );
    plane.add_component(floor_body)?;

    let character = scene.create_game_object("Character");
    character.set_position(Vec3::new(-5.0, 0.0, 0.0));
    character.set_rotation_euler(Vec3::new(-90.0, 180.0, 180.0));
    character.set_scale(Vec3::new(0.2, 0.2, 0.2));
    character.add_component(CharacterMovement::new(4.0, 6.0))?;
    character.add_component(RenderComponent::new(
        character_mesh.clone(),
        materials.character.clone(),
    ))?;
    let mut character_body = RigidBody::new(RigidBodyType::Dynamic);
    character_body.set_layers(CollisionLayers::PLAYER, CollisionLayers::ALL);
    character_body.add_collider(
        Collider::new(ColliderShape::ConvexMesh {
            mesh: character_mesh,
        })
        .with_scale(Vec3::new(0.2, 0.2, 0.2)),
    );
    character.add_component(character_body)?;

    let static_convex = |scene: &mut Scene,
                         name: &str,
                         mesh: &AssetHandle<MeshResource>,
                         material: &Material,
                         position: Vec3,
                         rotation: Vec3,
                         scale: f32|
     -> Result<std::sync::Arc<GameObject>, SceneError> {
        let object = scene.create_game_object(name);
        object.set_position(position);
        object.set_rotation_euler(rotation);
        object.set_scale(Vec3::new(scale, scale, scale));
        object.add_component(RenderComponent::new(mesh.clone(), material.clone()))?;
        let mut body = RigidBody::new(RigidBodyType::Static);
        body.add_collider(
            Collider::new(ColliderShape::ConvexMesh { mesh: mesh.clone() })
                .with_scale(Vec3::new(scale, scale, scale)),
        );
        object.add_component(body)?;
        Ok(object)
    };

    static_convex(
        &mut scene,
        "Enemy",
        &mage_mesh,
        &materials.mage,
        Vec3::new(4.0, 0.0, 3.0),
        Vec3::new(-90.0, 180.0, 0.0),
        0.1,
    )?;
    static_convex(
        &mut scene,
        "Rock",
        &rock_mesh,
        &materials.rock,
        Vec3::zeros(),
        Vec3::new(-90.0, 180.0, 0.0),
        0.5,
    )?;
    static_convex(
        &mut scene,
        "sword",
        &sword_mesh,
        &materials.sword,
        Vec3::new(0.0, -0.4, 4.0),
        Vec3::new(80.0, 180.0, 0.0),
        0.3,
    )?;
    static_convex(
        &mut scene,
        "Grate",
        &grate_mesh,
        &materials.grate,
        Vec3::new(-7.0, 0.0, 0.0),
        Vec3::new(-90.0, -180.0, 180.0),
        0.5,
    )?;

    let lever = static_convex(
        &mut scene,
        "Lever",
        &lever_mesh,
        &materials.lever_idle,
        Vec3::new(-4.0, -5.0, 0.0),
        Vec3::new(-90.0, -180.0, 90.0),
        0.5,
    )?;
    lever.add_component(MaterialSwapBehaviour::new(
        materials.lever_active.clone(),
        materials.lever_idle.clone(),
    ))?;

    static_convex(
        &mut scene,
        "spike",
        &spike_mesh,
        &materials.spike,
        Vec3::new(4.0, -6.0, 0.0),
        Vec3::new(-90.0, -180.0, 90.0),
        0.5,
    )?;
    static_convex(
        &mut scene,
        "spike 2",
        &spike_mesh,
        &materials.spike,
        Vec3::new(1.0, 6.0, 0.0),
        Vec3::new(-90.0, -180.0, 90.0),
        0.5,
    )?;

    let walls = [
        ("Wall 1", Vec3::new(-7.0, 3.5, 0.0), 180.0),
        ("Wall 2", Vec3::new(-7.0, -11.5, 0.0), 180.0),
        ("Wall 3", Vec3::new(-6.5, -11.5, 0.0), 90.0),
        ("Wall 4", Vec3::new(-6.5, 11.5, 0.0), 90.0),
        ("Wall 5", Vec3::new(3.0, 11.5, 0.0), 90.0),
        ("Wall 6", Vec3::new(3.0, -11.5, 0.0), 90.0),
        ("Wall 7", Vec3::new(12.0, 3.0, 0.0), 180.0),
        ("Wall 8", Vec3::new(12.0, -11.0, 0.0), 180.0),
    ];
    for (name, position, z_rotation) in walls {
        let wall = scene.create_game_object(name);
        wall.set_position(position);
        wall.set_rotation_euler(Vec3::new(-90.0, -180.0, z_rotation));
        wall.set_scale(Vec3::new(0.8, 0.8, 0.8));
        wall.add_component(RenderComponent::new(wall_mesh.clone(), materials.wall.clone()))?;
    }

    Ok(scene)
}

fn run() -> Result<(), AppError> {
    let config = if std::path::Path::new("dungeon_app.toml").exists() {
        EngineConfig::load_from_file("dungeon_app.toml")?
    } else {
        EngineConfig::default()
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.clone()),
    )
    .init();

    registry().register::<CharacterMovement>("CharacterMovement")?;
    registry().register::<CameraFollowBehaviour>("CameraFollowBehaviour")?;

    let mut scene = build_scene()?;
    info!(
        "Authored scene '{}' with {} game objects",
        scene.name(),
        scene.objects().len()
    );

    scene.save("scene.ron")?;

    // Prove the file round-trips before ticking anything.
    let reloaded = Scene::load("scene.ron")?;
    assert_eq!(reloaded.objects().len(), scene.objects().len());
    info!("Round-trip check passed ({} objects)", reloaded.objects().len());

    let character = scene.find_by_name("Character");
    let movement = character
        .as_ref()
        .and_then(|c| c.get_component::<CharacterMovement>());
    let follow = scene
        .find_by_name("Main Camera")
        .and_then(|c| c.get_component::<CameraFollowBehaviour>());

    let mut fixed = FixedTimestep::new(config.fixed_timestep, config.max_steps_per_tick);
    let frame_dt = 1.0 / 60.0;
    for frame in 0..240 {
        // Walk the character east for the first second, then stop and
        // hop once.
        if let Some(movement) = &movement {
            let input = if frame < 60 {
                Vec2::new(1.0, 0.0)
            } else {
                Vec2::zeros()
            };
            let mut movement = movement.write().unwrap();
            movement.set_input(input);
            if frame == 120 {
                movement.jump();
            }
        }
        if let (Some(character), Some(follow)) = (&character, &follow) {
            follow.write().unwrap().set_target(character.position());
        }

        scene.update(frame_dt);
        for _ in 0..fixed.drain(frame_dt) {
            scene.fixed_update(fixed.step());
        }

        let bodies = scene.collect_bodies();
        let frame_snapshot = scene.build_frame(16.0 / 9.0);
        let gui = scene.render_gui();
        if frame == 0 {
            info!(
                "First frame: {} draws, {} bodies, {} gui commands",
                frame_snapshot.draws.len(),
                bodies.len(),
                gui.len()
            );
        }
    }

    if let Some(character) = scene.find_by_name("Character") {
        info!("Character ended at {:?}", character.position());
    }

    scene.destroy();
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("dungeon_app failed: {}", err);
        std::process::exit(1);
    }
}
