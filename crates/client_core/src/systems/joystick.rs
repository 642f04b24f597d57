//! On-screen virtual joystick for touch devices.
//!
//! The knob offset is measured in CSS pixels from the base center with +y
//! pointing down the screen, so pushing up means `y < 0`.

use crate::input::ControlIntent;
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JoystickCfg {
    /// Base radius in pixels.
    pub base_radius: f32,
    /// Knob radius in pixels.
    pub knob_radius: f32,
    /// Vertical offset beyond which the stick counts as forward/backward.
    pub move_threshold: f32,
    /// Horizontal offset beyond which the stick steers (only while moving).
    pub turn_threshold: f32,
}

impl Default for JoystickCfg {
    fn default() -> Self {
        Self {
            base_radius: 60.0,
            knob_radius: 28.0,
            move_threshold: 10.0,
            turn_threshold: 15.0,
        }
    }
}

impl JoystickCfg {
    /// Farthest the knob center may travel from the base center.
    #[must_use]
    pub fn max_travel(&self) -> f32 {
        (self.base_radius - self.knob_radius).max(1.0)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct VirtualJoystick {
    cfg: JoystickCfg,
    knob: Vec2,
    active: bool,
}

impl VirtualJoystick {
    #[must_use]
    pub fn new(cfg: JoystickCfg) -> Self {
        Self {
            cfg,
            knob: Vec2::ZERO,
            active: false,
        }
    }

    /// Touch started on the base.
    pub fn press(&mut self) {
        self.active = true;
    }

    /// Move the knob to `offset` from the base center, clamped to the travel circle.
    pub fn drag(&mut self, offset: Vec2) {
        if !self.active || !offset.is_finite() {
            return;
        }
        self.knob = offset.clamp_length_max(self.cfg.max_travel());
    }

    /// Touch ended: knob springs back to center.
    pub fn release(&mut self) {
        self.active = false;
        self.knob = Vec2::ZERO;
    }

    #[must_use]
    pub fn knob(&self) -> Vec2 {
        self.knob
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current intent. Neutral while released; `analog_turn` is only set
    /// while the stick is steering so keyboard turns still apply otherwise.
    #[must_use]
    pub fn intent(&self) -> ControlIntent {
        if !self.active {
            return ControlIntent::neutral();
        }
        let Vec2 { x, y } = self.knob;
        let forward = y < -self.cfg.move_threshold;
        let backward = y > self.cfg.move_threshold;
        let moving = forward || backward;
        let left = moving && x < -self.cfg.turn_threshold;
        let right = moving && x > self.cfg.turn_threshold;
        ControlIntent {
            forward,
            backward,
            left,
            right,
            brake: false,
            analog_turn: (left || right).then(|| (x / self.cfg.max_travel()).clamp(-1.0, 1.0)),
        }
    }
}
