//! Light models selectable in the demo and the uniforms each pixel shader
//! needs.

use crate::Vec3;

/// Lighting model picked in the UI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LightType {
    #[default]
    Unlit,
    Ambient,
    Directional,
    Spot,
    Point,
}

impl LightType {
    pub const ALL: [LightType; 5] = [
        LightType::Unlit,
        LightType::Ambient,
        LightType::Directional,
        LightType::Spot,
        LightType::Point,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LightType::Unlit => "Unlit",
            LightType::Ambient => "Ambient",
            LightType::Directional => "Directional",
            LightType::Spot => "Spot Light",
            LightType::Point => "Point Light",
        }
    }

    /// Pixel shader that implements this model.
    pub fn shader_kind(self) -> ShaderKind {
        match self {
            LightType::Unlit | LightType::Ambient => ShaderKind::Ambient,
            LightType::Directional => ShaderKind::Directional,
            LightType::Spot => ShaderKind::Spot,
            LightType::Point => ShaderKind::Point,
        }
    }
}

/// One editable pixel shader per lighting model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    Ambient,
    Directional,
    Spot,
    Point,
}

impl ShaderKind {
    pub const ALL: [ShaderKind; 4] = [
        ShaderKind::Ambient,
        ShaderKind::Directional,
        ShaderKind::Spot,
        ShaderKind::Point,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            ShaderKind::Ambient => "ambient.glsl",
            ShaderKind::Directional => "directional.glsl",
            ShaderKind::Spot => "spot.glsl",
            ShaderKind::Point => "point.glsl",
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub color: Vec3,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(0.826, -0.311, -0.471),
            color: Vec3::ONE,
        }
    }
}

/// Cone angles are in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotLight {
    pub position: Vec3,
    pub direction: Vec3,
    pub color: Vec3,
    pub inner_cone: f32,
    pub outer_cone: f32,
}

impl SpotLight {
    /// Smallest gap kept between the inner and outer cone.
    pub const MIN_CONE_GAP: f32 = 0.01;

    /// Keep the inner cone strictly inside the outer one.
    pub fn clamp_cones(&mut self) {
        if self.inner_cone > self.outer_cone - Self::MIN_CONE_GAP {
            self.inner_cone = self.outer_cone - Self::MIN_CONE_GAP;
        }
    }
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(-775.0, 800.0, -50.0),
            direction: Vec3::new(0.91, -0.415, 0.016),
            color: Vec3::ONE,
            inner_cone: 9.0,
            outer_cone: 10.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub outer_radius: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(535.0, 162.0, -13.0),
            color: Vec3::ONE,
            outer_radius: 865.0,
        }
    }
}

/// Light parameters shared by every lit shader.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SharedUniforms {
    pub ambient_color: Vec3,
    pub spec_multiplier: f32,
    pub camera_pos: Vec3,
}

/// Uniform values for the active shader. Angles in radians, directions
/// normalised.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightingUniforms {
    Ambient {
        ambient_color: Vec3,
    },
    Directional {
        light_dir: Vec3,
        light_color: Vec3,
        shared: SharedUniforms,
    },
    Spot {
        light_dir: Vec3,
        light_pos: Vec3,
        light_color: Vec3,
        inner_cone: f32,
        outer_cone: f32,
        shared: SharedUniforms,
    },
    Point {
        light_pos: Vec3,
        light_color: Vec3,
        outer_radius: f32,
        shared: SharedUniforms,
    },
}

impl LightingUniforms {
    pub fn shader_kind(&self) -> ShaderKind {
        match self {
            LightingUniforms::Ambient { .. } => ShaderKind::Ambient,
            LightingUniforms::Directional { .. } => ShaderKind::Directional,
            LightingUniforms::Spot { .. } => ShaderKind::Spot,
            LightingUniforms::Point { .. } => ShaderKind::Point,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlit_and_ambient_share_a_shader() {
        assert_eq!(LightType::Unlit.shader_kind(), ShaderKind::Ambient);
        assert_eq!(LightType::Ambient.shader_kind(), ShaderKind::Ambient);
        assert_eq!(LightType::Point.shader_kind(), ShaderKind::Point);
    }

    #[test]
    fn shader_indices_are_dense() {
        for (i, kind) in ShaderKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn inner_cone_stays_inside_outer() {
        let mut spot = SpotLight {
            inner_cone: 15.0,
            outer_cone: 10.0,
            ..SpotLight::default()
        };
        spot.clamp_cones();
        assert!((spot.inner_cone - 9.99).abs() < 1e-5);

        let mut ok = SpotLight::default();
        ok.clamp_cones();
        assert_eq!(ok.inner_cone, 9.0);
    }
}
