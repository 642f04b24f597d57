//! Control intent source: merges keyboard and virtual joystick into one
//! [`ControlIntent`] per tick, and derives one-shot button edges.
//!
//! Rules:
//! - Arrow keys and WASD move; Space brakes; Enter confirms; Escape cancels.
//! - Forward and backward may both be held; the controller resolves that.
//! - With `swap_turn_when_reversing`, holding backward without forward exchanges
//!   left and right so the stick/keys steer like a reversing car.
//! - A disabled source (onboarding terminal open, non-teleop mode) yields
//!   neutral intent and no buttons.

use crate::input::{ControlIntent, FrameInput, InteractionButtons, Key};
use crate::systems::joystick::VirtualJoystick;
use crate::systems::look::LookState;
use std::collections::HashSet;

/// Currently held keys.
#[derive(Clone, Debug, Default)]
pub struct KeyboardState {
    held: HashSet<Key>,
}

impl KeyboardState {
    pub fn press(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Drop every held key (window blur).
    pub fn clear(&mut self) {
        self.held.clear();
    }

    #[must_use]
    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    fn any(&self, keys: [Key; 2]) -> bool {
        keys.iter().any(|k| self.held.contains(k))
    }

    #[must_use]
    pub fn intent(&self, swap_turn_when_reversing: bool) -> ControlIntent {
        let forward = self.any([Key::ArrowUp, Key::W]);
        let backward = self.any([Key::ArrowDown, Key::S]);
        let mut left = self.any([Key::ArrowLeft, Key::A]);
        let mut right = self.any([Key::ArrowRight, Key::D]);
        if swap_turn_when_reversing && backward && !forward {
            std::mem::swap(&mut left, &mut right);
        }
        ControlIntent {
            forward,
            backward,
            left,
            right,
            brake: self.is_held(Key::Space),
            analog_turn: None,
        }
    }

    #[must_use]
    pub fn buttons(&self) -> InteractionButtons {
        InteractionButtons {
            confirm: self.is_held(Key::Enter),
            cancel: self.is_held(Key::Escape),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntentCfg {
    pub swap_turn_when_reversing: bool,
}

#[derive(Clone, Debug)]
pub struct IntentSource {
    pub cfg: IntentCfg,
    pub keyboard: KeyboardState,
    pub joystick: VirtualJoystick,
    pub look: LookState,
    enabled: bool,
}

impl Default for IntentSource {
    fn default() -> Self {
        Self::new(IntentCfg::default())
    }
}

impl IntentSource {
    #[must_use]
    pub fn new(cfg: IntentCfg) -> Self {
        Self {
            cfg,
            keyboard: KeyboardState::default(),
            joystick: VirtualJoystick::default(),
            look: LookState::default(),
            enabled: true,
        }
    }

    /// Enable or disable control input. Disabling also drops held keys so
    /// nothing is stuck down when control returns.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled && !enabled {
            self.keyboard.clear();
            self.joystick.release();
        }
        self.enabled = enabled;
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Merged locomotion intent for this tick.
    #[must_use]
    pub fn poll(&self) -> ControlIntent {
        if !self.enabled {
            return ControlIntent::neutral();
        }
        let kb = self.keyboard.intent(self.cfg.swap_turn_when_reversing);
        kb.merge(self.joystick.intent())
    }

    #[must_use]
    pub fn buttons(&self) -> InteractionButtons {
        if !self.enabled {
            return InteractionButtons::default();
        }
        self.keyboard.buttons()
    }

    /// Everything the simulation needs for one tick.
    #[must_use]
    pub fn sample(&self) -> FrameInput {
        FrameInput {
            intent: self.poll(),
            buttons: self.buttons(),
            look: self.look.vector(),
        }
    }
}

/// Rising edges of the interaction buttons for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonEdges {
    pub confirm: bool,
    pub cancel: bool,
}

/// Compares held buttons against the previous tick so a held key fires once.
#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeDetector {
    prev: InteractionButtons,
}

impl EdgeDetector {
    pub fn update(&mut self, now: InteractionButtons) -> ButtonEdges {
        let edges = ButtonEdges {
            confirm: now.confirm && !self.prev.confirm,
            cancel: now.cancel && !self.prev.cancel,
        };
        self.prev = now;
        edges
    }

    /// Forget the previous snapshot; the next held button fires again.
    pub fn reset(&mut self) {
        self.prev = InteractionButtons::default();
    }
}
