//! Camera look offset from pointer position and pan/tilt drags.

use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanTiltCfg {
    /// Look units per dragged pixel.
    pub sensitivity: f32,
    /// Tilt is clamped to `[-max_tilt, max_tilt]`; pan is unbounded.
    pub max_tilt: f32,
}

impl Default for PanTiltCfg {
    fn default() -> Self {
        Self {
            sensitivity: 0.02,
            max_tilt: 1.0,
        }
    }
}

/// Accumulated look state. The camera rig clamps the combined vector.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LookState {
    pan: f32,
    tilt: f32,
    pointer: Vec2,
}

impl LookState {
    /// Apply a drag delta in pixels.
    pub fn apply_drag(&mut self, cfg: &PanTiltCfg, dx: f32, dy: f32) {
        if !(dx.is_finite() && dy.is_finite()) {
            return;
        }
        self.pan += dx * cfg.sensitivity;
        self.tilt = (self.tilt + dy * cfg.sensitivity).clamp(-cfg.max_tilt, cfg.max_tilt);
    }

    /// Pointer position in normalized device coordinates (`[-1, 1]` per axis).
    pub fn set_pointer(&mut self, ndc: Vec2) {
        self.pointer = if ndc.is_finite() { ndc } else { Vec2::ZERO };
    }

    /// Pan/tilt as a vector.
    #[must_use]
    pub fn pan_tilt(&self) -> Vec2 {
        Vec2::new(self.pan, self.tilt)
    }

    /// Combined look offset handed to the camera.
    #[must_use]
    pub fn vector(&self) -> Vec2 {
        self.pointer + self.pan_tilt()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
