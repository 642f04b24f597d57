//! Portfolio session: owns the avatar, camera, zone list and activation state
//! and advances them together once per frame.
//!
//! Tick order: sanitize dt, locomotion, camera, proximity, activation. The
//! camera and proximity read the position committed by locomotion this tick.

use crate::activation::{ActivationEvent, ActivationState, CloseReason};
use crate::proximity::{ProximityCfg, nearest_zone};
use client_core::controller::{LocomotionController, StepReport};
use client_core::input::{ControlIntent, FrameInput};
use client_core::systems::camera::{CameraRig, CameraRigCfg};
use client_core::systems::intent::EdgeDetector;
use collision_static::TerrainQuery;
use data_runtime::configs::avatar::{AvatarProfile, ProfileError};
use data_runtime::zone::{ZoneDescriptor, ZoneError, validate_zones};
use glam::Vec3;
use serde::Serialize;
use thiserror::Error;

/// Where a teleport drops the avatar relative to the zone marker: above the
/// ground and inside the activation radius, facing the marker at yaw 0.
pub const TELEPORT_OFFSET: Vec3 = Vec3::new(0.0, 5.0, 6.0);

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("unknown zone '{0}'")]
    UnknownZone(String),
    #[error("invalid zone list: {0}")]
    Zones(#[from] ZoneError),
    #[error("invalid avatar profile: {0}")]
    Profile(#[from] ProfileError),
    #[error("activation radius must be positive and finite, got {0}")]
    Radius(f32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionCfg {
    pub proximity: ProximityCfg,
    /// Upper bound on a single tick's dt (seconds).
    pub max_dt: f32,
}

impl Default for SessionCfg {
    fn default() -> Self {
        Self {
            proximity: ProximityCfg::default(),
            max_dt: 0.1,
        }
    }
}

/// What happened during one `advance`.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    /// dt actually simulated after sanitizing.
    pub dt: f32,
    pub step: StepReport,
    /// Raw proximity result (computed even while a zone is open).
    pub nearest: Option<usize>,
    pub events: Vec<ActivationEvent>,
}

/// Read-only view for presentation sinks.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub tick: u64,
    pub speed: f32,
    pub nearby_zone: Option<usize>,
    pub active_zone: Option<usize>,
    pub avatar_position: Vec3,
    pub facing_angle: f32,
    pub grounded: bool,
    pub camera_eye: Vec3,
    pub camera_look_at: Vec3,
}

pub struct Session<T: TerrainQuery> {
    controller: LocomotionController,
    camera: CameraRig,
    zones: Vec<ZoneDescriptor>,
    cfg: SessionCfg,
    activation: ActivationState,
    edges: EdgeDetector,
    terrain: T,
    tick: u64,
}

impl<T: TerrainQuery> Session<T> {
    pub fn new(
        profile: AvatarProfile,
        zones: Vec<ZoneDescriptor>,
        terrain: T,
        cfg: SessionCfg,
    ) -> Result<Self, SessionError> {
        profile.validate()?;
        validate_zones(&zones)?;
        let r = cfg.proximity.radius;
        if !(r.is_finite() && r > 0.0) {
            return Err(SessionError::Radius(r));
        }
        let mut camera = CameraRig::new(CameraRigCfg::from(profile.camera));
        camera.snap_to(profile.spawn, profile.spawn_yaw);
        tracing::info!(
            target: "session",
            kind = ?profile.kind,
            zones = zones.len(),
            radius = r,
            "session started"
        );
        Ok(Self {
            controller: LocomotionController::new(profile),
            camera,
            zones,
            cfg,
            activation: ActivationState::Idle,
            edges: EdgeDetector::default(),
            terrain,
            tick: 0,
        })
    }

    /// Advance one frame.
    pub fn advance(&mut self, dt: f32, input: &FrameInput) -> TickReport {
        let dt = sanitize_dt(dt, self.cfg.max_dt);
        let edges = self.edges.update(input.buttons);

        // Open panel: no locomotion input, the avatar coasts.
        let intent = if self.activation.is_active() {
            ControlIntent::neutral()
        } else {
            input.intent
        };
        let step = self.controller.step(&intent, dt, &self.terrain);
        let st = *self.controller.state();
        self.camera.update(st.position, st.facing_angle, input.look);

        let nearest = nearest_zone(st.position, &self.zones, &self.cfg.proximity);
        let events = self.activation.step(nearest, edges);

        self.tick += 1;
        TickReport {
            tick: self.tick,
            dt,
            step,
            nearest,
            events,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let st = self.controller.state();
        SessionSnapshot {
            tick: self.tick,
            speed: self.controller.speed(),
            nearby_zone: self.activation.nearby(),
            active_zone: self.activation.active(),
            avatar_position: st.position,
            facing_angle: st.facing_angle,
            grounded: st.is_grounded,
            camera_eye: self.camera.eye(),
            camera_look_at: self.camera.look_at(),
        }
    }

    /// Drop the avatar next to zone `id` and snap the camera behind it.
    pub fn teleport_to_zone(&mut self, id: &str) -> Result<(), SessionError> {
        let zone = self
            .zones
            .iter()
            .find(|z| z.id == id)
            .ok_or_else(|| SessionError::UnknownZone(id.to_string()))?;
        let target = zone.position + TELEPORT_OFFSET;
        self.controller.teleport(target);
        let yaw = self.controller.state().facing_angle;
        self.camera.snap_to(target, yaw);
        tracing::info!(target: "session", zone = id, ?target, "teleport");
        Ok(())
    }

    /// External close action (panel close button).
    pub fn close_active(&mut self) -> Option<ActivationEvent> {
        self.activation.close(CloseReason::External)
    }

    /// Replace the terrain once world geometry finishes loading.
    pub fn install_terrain(&mut self, terrain: T) {
        self.terrain = terrain;
        tracing::info!(target: "session", tick = self.tick, "terrain installed");
    }

    #[must_use]
    pub fn zones(&self) -> &[ZoneDescriptor] {
        &self.zones
    }

    #[must_use]
    pub fn zone(&self, index: usize) -> Option<&ZoneDescriptor> {
        self.zones.get(index)
    }

    #[must_use]
    pub fn activation(&self) -> ActivationState {
        self.activation
    }

    #[must_use]
    pub fn controller(&self) -> &LocomotionController {
        &self.controller
    }

    #[must_use]
    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    #[must_use]
    pub fn terrain(&self) -> &T {
        &self.terrain
    }

    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }
}

/// Non-finite or negative dt counts as 0; long frames are capped at `max_dt`.
fn sanitize_dt(dt: f32, max_dt: f32) -> f32 {
    if !dt.is_finite() || dt <= 0.0 {
        return 0.0;
    }
    dt.min(max_dt)
}
