//! Client glue: control intent, the avatar locomotion controller and the
//! follow camera.
//!
//! Everything here is renderer-agnostic. Hosts feed raw key/touch/pointer
//! events into [`systems::intent::IntentSource`], sample a
//! [`input::FrameInput`] once per tick, and hand it to the simulation.

#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::struct_excessive_bools,
    clippy::cast_precision_loss
)]

pub mod input {
    use glam::Vec2;

    /// Keys the portfolio listens to. Hosts translate their native key codes
    /// with [`Key::from_code`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub enum Key {
        ArrowUp,
        ArrowDown,
        ArrowLeft,
        ArrowRight,
        W,
        A,
        S,
        D,
        Space,
        Enter,
        Escape,
    }

    impl Key {
        /// Map a DOM-style `KeyboardEvent.code` (or a bare letter) to a key.
        #[must_use]
        pub fn from_code(code: &str) -> Option<Self> {
            let k = match code {
                "ArrowUp" => Self::ArrowUp,
                "ArrowDown" => Self::ArrowDown,
                "ArrowLeft" => Self::ArrowLeft,
                "ArrowRight" => Self::ArrowRight,
                "KeyW" | "w" | "W" => Self::W,
                "KeyA" | "a" | "A" => Self::A,
                "KeyS" | "s" | "S" => Self::S,
                "KeyD" | "d" | "D" => Self::D,
                "Space" | " " => Self::Space,
                "Enter" | "NumpadEnter" => Self::Enter,
                "Escape" => Self::Escape,
                _ => return None,
            };
            Some(k)
        }
    }

    /// Locomotion intent for one tick.
    ///
    /// Recomputed every tick by the intent source; the controller only reads it.
    #[derive(Default, Debug, Clone, Copy, PartialEq)]
    pub struct ControlIntent {
        pub forward: bool,
        pub backward: bool,
        pub left: bool,
        pub right: bool,
        pub brake: bool,
        /// Analog steering in `[-1, 1]`, positive turns right. Overrides
        /// `left`/`right` for the turn rate when present.
        pub analog_turn: Option<f32>,
    }

    impl ControlIntent {
        /// No input at all.
        #[must_use]
        pub fn neutral() -> Self {
            Self::default()
        }

        /// Signed yaw direction: `+1` turns left (counter-clockwise), `-1` right.
        #[must_use]
        pub fn turn_axis(&self) -> f32 {
            if let Some(a) = self.analog_turn.filter(|a| a.is_finite()) {
                return -a.clamp(-1.0, 1.0);
            }
            match (self.left, self.right) {
                (true, false) => 1.0,
                (false, true) => -1.0,
                _ => 0.0,
            }
        }

        /// Boolean OR of both sources; the second source's analog value wins.
        #[must_use]
        pub fn merge(self, other: Self) -> Self {
            Self {
                forward: self.forward || other.forward,
                backward: self.backward || other.backward,
                left: self.left || other.left,
                right: self.right || other.right,
                brake: self.brake || other.brake,
                analog_turn: other.analog_turn.or(self.analog_turn),
            }
        }
    }

    /// Held state of the interaction buttons (Enter / Escape).
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
    pub struct InteractionButtons {
        pub confirm: bool,
        pub cancel: bool,
    }

    /// Everything the simulation reads from the host for one tick.
    #[derive(Default, Debug, Clone, Copy, PartialEq)]
    pub struct FrameInput {
        pub intent: ControlIntent,
        pub buttons: InteractionButtons,
        /// Camera look offset; each axis is clamped to `[-1, 1]` by the rig.
        pub look: Vec2,
    }
}

pub mod controller;
pub mod systems;
pub mod telemetry;
