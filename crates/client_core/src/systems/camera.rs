//! Third-person follow camera.
//!
//! The eye trails behind the avatar at a fixed boom and eases toward its
//! target with a constant per-tick factor (not dt-scaled). The rig never
//! feeds back into the simulation.

use data_runtime::configs::avatar::CameraProfile;
use glam::{Mat4, Vec2, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraRigCfg {
    /// Horizontal boom length behind the avatar.
    pub distance: f32,
    /// Boom height above the avatar origin.
    pub height: f32,
    /// Per-tick lerp factor toward the target eye.
    pub smoothing: f32,
    /// Look-at point height above the avatar origin.
    pub eye_height: f32,
    pub look_x_scale: f32,
    pub look_y_scale: f32,
}

impl Default for CameraRigCfg {
    fn default() -> Self {
        Self {
            distance: 12.0,
            height: 8.0,
            smoothing: 0.1,
            eye_height: 1.0,
            look_x_scale: 10.0,
            look_y_scale: 5.0,
        }
    }
}

impl From<CameraProfile> for CameraRigCfg {
    fn from(p: CameraProfile) -> Self {
        Self {
            distance: p.distance,
            height: p.height,
            smoothing: p.smoothing,
            eye_height: p.eye_height,
            look_x_scale: p.look_x_scale,
            look_y_scale: p.look_y_scale,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CameraRig {
    cfg: CameraRigCfg,
    eye: Vec3,
    look_at: Vec3,
}

impl CameraRig {
    #[must_use]
    pub fn new(cfg: CameraRigCfg) -> Self {
        Self {
            cfg,
            eye: Vec3::new(0.0, cfg.height, cfg.distance),
            look_at: Vec3::ZERO,
        }
    }

    #[must_use]
    pub fn cfg(&self) -> &CameraRigCfg {
        &self.cfg
    }

    /// Where the eye wants to be for an avatar at `pos` facing `yaw`.
    #[must_use]
    pub fn target_eye(&self, pos: Vec3, yaw: f32) -> Vec3 {
        let (s, c) = yaw.sin_cos();
        pos + Vec3::new(s * self.cfg.distance, self.cfg.height, c * self.cfg.distance)
    }

    /// Look-at point with the look offset applied. Each look axis is clamped
    /// to `[-1, 1]`; non-finite components count as 0.
    #[must_use]
    pub fn target_look_at(&self, pos: Vec3, yaw: f32, look: Vec2) -> Vec3 {
        let look = sanitize_look(look);
        let (s, c) = yaw.sin_cos();
        let right = Vec3::new(c, 0.0, -s);
        pos + Vec3::Y * self.cfg.eye_height
            + right * (look.x * self.cfg.look_x_scale)
            + Vec3::Y * (look.y * self.cfg.look_y_scale)
    }

    /// Ease toward the follow pose for this tick.
    pub fn update(&mut self, pos: Vec3, yaw: f32, look: Vec2) {
        let target = self.target_eye(pos, yaw);
        self.eye = self.eye.lerp(target, self.cfg.smoothing);
        self.look_at = self.target_look_at(pos, yaw, look);
    }

    /// Jump straight to the follow pose (session start, teleport).
    pub fn snap_to(&mut self, pos: Vec3, yaw: f32) {
        self.eye = self.target_eye(pos, yaw);
        self.look_at = self.target_look_at(pos, yaw, Vec2::ZERO);
    }

    #[must_use]
    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    #[must_use]
    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    /// Right-handed view matrix for renderer sinks.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.look_at, Vec3::Y)
    }
}

fn sanitize_look(look: Vec2) -> Vec2 {
    let axis = |v: f32| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 };
    Vec2::new(axis(look.x), axis(look.y))
}
