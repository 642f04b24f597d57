//! sim_core: proximity, zone activation and the session tick.
//!
//! [`session::Session::advance`] is the single entry point a host calls once
//! per frame; [`runner::FixedStepRunner`] wraps it for fixed-step drivers.

pub mod activation;
pub mod proximity;
pub mod runner;
pub mod session;

pub use activation::{ActivationEvent, ActivationState};
pub use proximity::{DistanceMetric, ProximityCfg, nearest_zone};
pub use runner::FixedStepRunner;
pub use session::{Session, SessionError, SessionSnapshot, TickReport};
