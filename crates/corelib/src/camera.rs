//! Free-flying first-person camera: yaw/pitch look, movement along the view
//! basis, view/projection matrices.

use crate::{Mat4, Vec2, Vec3};

/// Movement keys held this frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoveInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

/// First-person camera driven by yaw/pitch angles (degrees).
#[derive(Clone, Copy, Debug)]
pub struct FlyCamera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov_y_deg: f32,
    pub move_speed: f32,
    pub sensitivity: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(-900.0, 200.0, 0.0),
            yaw: 0.0,
            pitch: 0.0,
            fov_y_deg: 60.0,
            move_speed: 400.0,
            sensitivity: 0.4,
            z_near: 1.0,
            z_far: 5000.0,
        }
    }
}

impl FlyCamera {
    pub const MAX_PITCH: f32 = 89.0;

    /// Unit view direction from the spherical angles.
    pub fn direction(&self) -> Vec3 {
        let theta = (90.0 - self.pitch).to_radians();
        let phi = self.yaw.to_radians();
        Vec3::new(phi.cos() * theta.sin(), theta.cos(), phi.sin() * theta.sin()).normalize()
    }

    /// `(forward, side, up)`, all unit length.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let dir = self.direction();
        let side = dir.cross(Vec3::Y).normalize();
        let up = side.cross(dir);
        (dir, side, up)
    }

    /// Move along the view basis. Forward wins over back and left over right.
    pub fn apply_movement(&mut self, input: MoveInput, dt: f32) {
        let (dir, side, _) = self.basis();
        let step = self.move_speed * dt;
        if input.forward {
            self.position += dir * step;
        } else if input.back {
            self.position -= dir * step;
        }
        if input.left {
            self.position -= side * step;
        } else if input.right {
            self.position += side * step;
        }
    }

    /// Mouse-look from a cursor delta in pixels.
    pub fn apply_mouse(&mut self, delta: Vec2) {
        self.pitch -= delta.y * self.sensitivity;
        self.yaw += delta.x * self.sensitivity;
        self.pitch = self.pitch.clamp(-Self::MAX_PITCH, Self::MAX_PITCH);
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        let (dir, _, up) = self.basis();
        Mat4::look_at_rh(self.position, self.position + dir, up)
    }

    #[inline]
    pub fn proj(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_deg.to_radians(),
            aspect.max(1e-6),
            self.z_near,
            self.z_far,
        )
    }

    #[inline]
    pub fn proj_view(&self, aspect: f32) -> Mat4 {
        self.proj(aspect) * self.view()
    }
}
