//! Fixed-step driver for hosts with variable frame times.

use crate::session::{Session, TickReport};
use client_core::input::FrameInput;
use collision_static::TerrainQuery;

/// Accumulates frame deltas and advances a session in fixed steps.
///
/// At most `max_substeps` steps run per frame; leftover time beyond that is
/// dropped so a long stall cannot trigger a catch-up spiral.
#[derive(Clone, Copy, Debug)]
pub struct FixedStepRunner {
    step: f32,
    max_substeps: u32,
    acc: f32,
}

impl Default for FixedStepRunner {
    fn default() -> Self {
        Self::new(1.0 / 60.0, 5)
    }
}

impl FixedStepRunner {
    #[must_use]
    pub fn new(step: f32, max_substeps: u32) -> Self {
        let step = if step.is_finite() && step > 0.0 { step } else { 1.0 / 60.0 };
        Self {
            step,
            max_substeps: max_substeps.max(1),
            acc: 0.0,
        }
    }

    #[must_use]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Time carried over to the next frame.
    #[must_use]
    pub fn pending(&self) -> f32 {
        self.acc
    }

    /// Feed one frame. The same input is applied to every substep.
    pub fn frame<T: TerrainQuery>(
        &mut self,
        session: &mut Session<T>,
        frame_dt: f32,
        input: &FrameInput,
    ) -> Vec<TickReport> {
        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.acc += frame_dt;
        }
        let mut out = Vec::new();
        while self.acc >= self.step && (out.len() as u32) < self.max_substeps {
            out.push(session.advance(self.step, input));
            self.acc -= self.step;
        }
        if self.acc >= self.step {
            tracing::debug!(target: "session", dropped = self.acc, "substep cap hit");
            self.acc = 0.0;
        }
        out
    }
}
