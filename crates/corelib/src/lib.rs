//! Core demo state (renderer-agnostic): camera, light models, shader sources.

use std::{io, path::PathBuf};

pub use glam::{Mat4, Vec2, Vec3};
use thiserror::Error;

pub mod camera;
pub mod lights;
pub mod shader;

use camera::{FlyCamera, MoveInput};
use lights::{
    DirectionalLight, LightType, LightingUniforms, PointLight, SharedUniforms, SpotLight,
};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Cannot read shader from file: '{}'", path.display())]
    ShaderRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Cannot write shader to file: '{}'", path.display())]
    ShaderWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Everything the UI edits between frames.
#[derive(Clone, Debug)]
pub struct DemoState {
    pub camera: FlyCamera,
    pub ambient_color: Vec3,
    pub directional: DirectionalLight,
    pub spot: SpotLight,
    pub point: PointLight,
    pub light_type: LightType,
    pub spec_multiplier: f32,
    pub spec_power_multiplier: f32,
    pub light_follows_camera: bool,
    /// Keyboard goes to the shader editor instead of the camera.
    pub is_editing: bool,
    pub app_time: f64,
}

impl Default for DemoState {
    fn default() -> Self {
        Self {
            camera: FlyCamera::default(),
            ambient_color: Vec3::splat(0.25),
            directional: DirectionalLight::default(),
            spot: SpotLight::default(),
            point: PointLight::default(),
            light_type: LightType::Unlit,
            spec_multiplier: 0.0,
            spec_power_multiplier: 32.0,
            light_follows_camera: false,
            is_editing: false,
            app_time: 0.0,
        }
    }
}

impl DemoState {
    /// Advance one frame: camera input, then lights that track the camera.
    pub fn update(&mut self, input: MoveInput, mouse_delta: Option<Vec2>, dt: f64) {
        if !self.is_editing {
            self.camera.apply_movement(input, dt as f32);
            if let Some(delta) = mouse_delta {
                self.camera.apply_mouse(delta);
            }
        }
        self.spot.clamp_cones();

        if self.light_follows_camera {
            let pos = self.camera.position;
            let dir = self.camera.direction();
            self.spot.position = pos;
            self.point.position = pos;
            self.directional.direction = dir;
            self.spot.direction = dir;
        }
        self.app_time += dt;
    }

    /// Shader choice and uniform values for the current light type.
    pub fn lighting(&self) -> LightingUniforms {
        let shared = SharedUniforms {
            ambient_color: self.ambient_color,
            spec_multiplier: self.spec_multiplier,
            camera_pos: self.camera.position,
        };
        match self.light_type {
            LightType::Unlit => LightingUniforms::Ambient {
                ambient_color: Vec3::ONE,
            },
            LightType::Ambient => LightingUniforms::Ambient {
                ambient_color: self.ambient_color,
            },
            LightType::Directional => LightingUniforms::Directional {
                light_dir: self.directional.direction.normalize_or_zero(),
                light_color: self.directional.color,
                shared,
            },
            LightType::Spot => LightingUniforms::Spot {
                light_dir: self.spot.direction.normalize_or_zero(),
                light_pos: self.spot.position,
                light_color: self.spot.color,
                inner_cone: self.spot.inner_cone.to_radians(),
                outer_cone: self.spot.outer_cone.to_radians(),
                shared,
            },
            LightType::Point => LightingUniforms::Point {
                light_pos: self.point.position,
                light_color: self.point.color,
                outer_radius: self.point.outer_radius,
                shared,
            },
        }
    }
}
