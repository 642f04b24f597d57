//! Zone activation state machine.
//!
//! ```text
//! Idle --near z--> Nearby(z) --confirm--> Active(z)
//!   ^                 |  ^                    |
//!   +----none---------+  +--near z'           | cancel / close
//!   ^                                         |
//!   +-----------------------------------------+
//! ```
//!
//! While `Active`, proximity reports are ignored. Confirm and cancel are edges,
//! so a held key causes at most one transition. Every transition is logged.

use client_core::systems::intent::ButtonEdges;
use serde::Serialize;
use tracing::info;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "zone", rename_all = "snake_case")]
pub enum ActivationState {
    #[default]
    Idle,
    Nearby(usize),
    Active(usize),
}

/// One transition, reported to presentation sinks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ActivationEvent {
    Approached { zone: usize },
    Switched { from: usize, to: usize },
    Left { zone: usize },
    Opened { zone: usize },
    Closed { zone: usize, reason: CloseReason },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    /// Cancel key edge.
    Cancel,
    /// Close action from outside the simulation (panel close button).
    External,
}

impl ActivationState {
    #[must_use]
    pub fn nearby(self) -> Option<usize> {
        match self {
            Self::Nearby(z) => Some(z),
            _ => None,
        }
    }

    #[must_use]
    pub fn active(self) -> Option<usize> {
        match self {
            Self::Active(z) => Some(z),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active(_))
    }

    /// Feed the latest proximity result. Ignored while a zone is open.
    pub fn on_proximity(&mut self, nearest: Option<usize>) -> Option<ActivationEvent> {
        let prev = *self;
        let ev = match (prev, nearest) {
            (Self::Active(_), _) => return None,
            (Self::Idle, Some(z)) => {
                *self = Self::Nearby(z);
                ActivationEvent::Approached { zone: z }
            }
            (Self::Nearby(a), Some(b)) if a != b => {
                *self = Self::Nearby(b);
                ActivationEvent::Switched { from: a, to: b }
            }
            (Self::Nearby(z), None) => {
                *self = Self::Idle;
                ActivationEvent::Left { zone: z }
            }
            _ => return None,
        };
        let next = *self;
        info!(target: "activation", from = ?prev, to = ?next, reason = "proximity");
        Some(ev)
    }

    /// Confirm edge: open the nearby zone.
    pub fn on_confirm(&mut self) -> Option<ActivationEvent> {
        let Self::Nearby(z) = *self else {
            return None;
        };
        *self = Self::Active(z);
        info!(target: "activation", zone = z, reason = "confirm", "zone opened");
        Some(ActivationEvent::Opened { zone: z })
    }

    /// Close the open zone (cancel edge or external close action).
    pub fn close(&mut self, reason: CloseReason) -> Option<ActivationEvent> {
        let Self::Active(z) = *self else {
            return None;
        };
        *self = Self::Idle;
        info!(target: "activation", zone = z, reason = ?reason, "zone closed");
        Some(ActivationEvent::Closed { zone: z, reason })
    }

    /// One tick: proximity first, then at most one button transition decided
    /// by the state the buttons see.
    pub fn step(&mut self, nearest: Option<usize>, edges: ButtonEdges) -> Vec<ActivationEvent> {
        let mut out = Vec::new();
        out.extend(self.on_proximity(nearest));
        let ev = match *self {
            Self::Nearby(_) if edges.confirm => self.on_confirm(),
            Self::Active(_) if edges.cancel => self.close(CloseReason::Cancel),
            _ => None,
        };
        out.extend(ev);
        out
    }
}
