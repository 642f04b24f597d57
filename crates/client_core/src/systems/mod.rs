//! Client-side systems for input sampling and the follow camera.
//!
//! Hosts lightweight, testable logic used by the renderer host.

pub mod camera;
pub mod intent;
pub mod joystick;
pub mod look;
