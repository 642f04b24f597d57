//! Avatar locomotion profiles loaded from data/config/avatar.toml.
//!
//! One controller drives every avatar; a profile carries the tunables and the
//! two policy switches that differ between avatar types:
//! - `throttle`: vehicles accelerate/brake/coast, quadrupeds walk at a fixed speed.
//! - `turn_policy`: vehicles mirror steering while reversing, quadrupeds do not.
//!
//! Built-in defaults reproduce the shipped tuning. The TOML file only needs
//! the fields being overridden.

use anyhow::{Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvatarKind {
    Vehicle,
    #[default]
    Quadruped,
}

impl std::str::FromStr for AvatarKind {
    type Err = ProfileError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vehicle" | "car" => Ok(Self::Vehicle),
            "quadruped" | "dog" => Ok(Self::Quadruped),
            other => Err(ProfileError::UnknownKind(other.to_string())),
        }
    }
}

/// How intent maps to longitudinal speed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThrottleModel {
    /// Accelerate by `acceleration*dt`, brake by `braking*dt`, otherwise per-tick friction.
    Accelerate,
    /// Speed is set straight to `±max_speed` (or 0) from intent.
    Immediate,
}

/// Sign of steering relative to travel direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPolicy {
    /// Turn input is multiplied by `sign(speed)` (steering geometry).
    MirrorWhenReversing,
    /// Turn input rotates the same way regardless of direction.
    Independent,
}

/// Ground probe and snap tolerances.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroundProbe {
    /// Ray origin is lifted this far above the candidate position.
    pub ray_lift: f32,
    /// Foot-to-ground distance above which the avatar counts as falling.
    pub falling_threshold: f32,
    /// Snap window upper bound (foot above ground).
    pub snap_up: f32,
    /// Snap window lower bound magnitude (foot sunk below ground).
    pub snap_down: f32,
    /// Largest ledge that can be climbed without being treated as a wall.
    pub max_step_height: f32,
    /// Distance from the position origin down to the ground contact point.
    pub foot_offset: f32,
    /// Ground normals flatter than this (y component) are replaced with up.
    pub min_normal_y: f32,
}

/// Third-person follow camera constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraProfile {
    pub distance: f32,
    pub height: f32,
    /// Fixed per-tick lerp factor in `(0, 1]`.
    pub smoothing: f32,
    pub eye_height: f32,
    pub look_x_scale: f32,
    pub look_y_scale: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AvatarProfile {
    pub kind: AvatarKind,
    pub throttle: ThrottleModel,
    pub turn_policy: TurnPolicy,
    pub acceleration: f32,
    pub braking: f32,
    pub max_speed: f32,
    /// Reverse speed limit as a fraction of `max_speed`.
    pub reverse_ratio: f32,
    /// Per-tick multiplicative decay in `(0, 1)`.
    pub friction: f32,
    /// Yaw rate in rad/s.
    pub turn_speed: f32,
    /// No turning below this absolute speed.
    pub turn_dead_zone: f32,
    pub gravity: f32,
    /// Floor for vertical velocity (negative).
    pub terminal_velocity: f32,
    pub probe: GroundProbe,
    /// Falling below this Y triggers a respawn.
    pub respawn_floor: f32,
    pub spawn: Vec3,
    pub spawn_yaw: f32,
    pub normal_rate_grounded: f32,
    pub normal_rate_airborne: f32,
    /// Orientation slerp rate (per second).
    pub orient_rate: f32,
    /// Tilt with the ground normal; when false the avatar stays upright.
    pub align_to_surface: bool,
    pub camera: CameraProfile,
}

impl AvatarProfile {
    /// Wheeled vehicle tuning.
    #[must_use]
    pub fn vehicle() -> Self {
        Self {
            kind: AvatarKind::Vehicle,
            throttle: ThrottleModel::Accelerate,
            turn_policy: TurnPolicy::MirrorWhenReversing,
            acceleration: 20.0,
            braking: 40.0,
            max_speed: 60.0,
            reverse_ratio: 0.5,
            friction: 0.98,
            turn_speed: 2.5,
            turn_dead_zone: 0.1,
            gravity: 40.0,
            terminal_velocity: -30.0,
            probe: GroundProbe {
                ray_lift: 5.0,
                falling_threshold: 0.5,
                snap_up: 0.2,
                snap_down: 3.0,
                max_step_height: 2.0,
                foot_offset: 0.4,
                min_normal_y: 0.5,
            },
            respawn_floor: -50.0,
            spawn: Vec3::new(0.0, 10.0, 0.0),
            spawn_yaw: 0.0,
            normal_rate_grounded: 8.0,
            normal_rate_airborne: 1.0,
            orient_rate: 10.0,
            align_to_surface: true,
            camera: CameraProfile {
                distance: 12.0,
                height: 8.0,
                smoothing: 0.1,
                eye_height: 1.0,
                look_x_scale: 10.0,
                look_y_scale: 5.0,
            },
        }
    }

    /// Walking robot dog tuning.
    #[must_use]
    pub fn quadruped() -> Self {
        Self {
            kind: AvatarKind::Quadruped,
            throttle: ThrottleModel::Immediate,
            turn_policy: TurnPolicy::Independent,
            acceleration: 20.0,
            braking: 40.0,
            max_speed: 12.0,
            reverse_ratio: 1.0,
            friction: 0.98,
            turn_speed: 2.5,
            turn_dead_zone: 0.1,
            gravity: 60.0,
            terminal_velocity: -30.0,
            probe: GroundProbe {
                ray_lift: 5.0,
                falling_threshold: 1.0,
                snap_up: 0.5,
                snap_down: 3.0,
                max_step_height: 1.5,
                foot_offset: 0.0,
                min_normal_y: 0.5,
            },
            respawn_floor: -50.0,
            spawn: Vec3::new(5.0, 10.0, -85.0),
            spawn_yaw: std::f32::consts::PI,
            normal_rate_grounded: 8.0,
            normal_rate_airborne: 1.0,
            orient_rate: 15.0,
            align_to_surface: false,
            camera: CameraProfile {
                distance: 16.0,
                height: 10.0,
                smoothing: 0.1,
                eye_height: 2.0,
                look_x_scale: 5.0,
                look_y_scale: 5.0,
            },
        }
    }

    #[must_use]
    pub fn for_kind(kind: AvatarKind) -> Self {
        match kind {
            AvatarKind::Vehicle => Self::vehicle(),
            AvatarKind::Quadruped => Self::quadruped(),
        }
    }

    /// Lowest allowed forward speed.
    #[must_use]
    pub fn min_speed(&self) -> f32 {
        -self.max_speed * self.reverse_ratio
    }

    /// Reject tunables that would make the integrator misbehave.
    pub fn validate(&self) -> Result<(), ProfileError> {
        let finite = [
            ("turn_dead_zone", self.turn_dead_zone),
            ("respawn_floor", self.respawn_floor),
            ("spawn_yaw", self.spawn_yaw),
            ("normal_rate_grounded", self.normal_rate_grounded),
            ("normal_rate_airborne", self.normal_rate_airborne),
            ("falling_threshold", self.probe.falling_threshold),
            ("snap_up", self.probe.snap_up),
            ("foot_offset", self.probe.foot_offset),
            ("min_normal_y", self.probe.min_normal_y),
            ("camera.height", self.camera.height),
            ("camera.eye_height", self.camera.eye_height),
            ("camera.look_x_scale", self.camera.look_x_scale),
            ("camera.look_y_scale", self.camera.look_y_scale),
        ];
        for (name, v) in finite {
            if !v.is_finite() {
                return Err(ProfileError::NonFinite(name, v));
            }
        }
        let non_negative = [
            ("turn_dead_zone", self.turn_dead_zone),
            ("normal_rate_grounded", self.normal_rate_grounded),
            ("normal_rate_airborne", self.normal_rate_airborne),
            ("falling_threshold", self.probe.falling_threshold),
            ("snap_up", self.probe.snap_up),
        ];
        for (name, v) in non_negative {
            if v < 0.0 {
                return Err(ProfileError::Negative(name, v));
            }
        }
        let positive = [
            ("max_speed", self.max_speed),
            ("acceleration", self.acceleration),
            ("braking", self.braking),
            ("turn_speed", self.turn_speed),
            ("gravity", self.gravity),
            ("orient_rate", self.orient_rate),
            ("ray_lift", self.probe.ray_lift),
            ("snap_down", self.probe.snap_down),
            ("max_step_height", self.probe.max_step_height),
            ("camera.distance", self.camera.distance),
        ];
        for (name, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(ProfileError::NotPositive(name, v));
            }
        }
        let unit = [
            ("friction", self.friction),
            ("reverse_ratio", self.reverse_ratio),
            ("camera.smoothing", self.camera.smoothing),
        ];
        for (name, v) in unit {
            if !(v.is_finite() && v > 0.0 && v <= 1.0) {
                return Err(ProfileError::OutOfUnitRange(name, v));
            }
        }
        if !(self.terminal_velocity.is_finite() && self.terminal_velocity < 0.0) {
            return Err(ProfileError::TerminalVelocity(self.terminal_velocity));
        }
        if !self.spawn.is_finite() || self.spawn.y <= self.respawn_floor {
            return Err(ProfileError::SpawnBelowFloor {
                spawn_y: self.spawn.y,
                floor: self.respawn_floor,
            });
        }
        Ok(())
    }

    fn apply(&mut self, o: &ProfileOverrides) {
        macro_rules! set {
            ($($field:ident).+, $src:ident) => {
                if let Some(v) = o.$src {
                    self.$($field).+ = v;
                }
            };
        }
        set!(throttle, throttle);
        set!(turn_policy, turn_policy);
        set!(acceleration, acceleration);
        set!(braking, braking);
        set!(max_speed, max_speed);
        set!(reverse_ratio, reverse_ratio);
        set!(friction, friction);
        set!(turn_speed, turn_speed);
        set!(gravity, gravity);
        set!(terminal_velocity, terminal_velocity);
        set!(probe.max_step_height, max_step_height);
        set!(probe.foot_offset, foot_offset);
        set!(probe.snap_up, snap_up);
        set!(probe.snap_down, snap_down);
        set!(probe.falling_threshold, falling_threshold);
        set!(respawn_floor, respawn_floor);
        set!(spawn_yaw, spawn_yaw);
        set!(orient_rate, orient_rate);
        set!(align_to_surface, align_to_surface);
        set!(camera.distance, camera_distance);
        set!(camera.height, camera_height);
        set!(camera.smoothing, camera_smoothing);
        if let Some(s) = o.spawn {
            self.spawn = Vec3::from_array(s);
        }
    }
}

impl Default for AvatarProfile {
    fn default() -> Self {
        Self::quadruped()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("unknown avatar kind '{0}' (expected vehicle|quadruped)")]
    UnknownKind(String),
    #[error("{0} must be finite, got {1}")]
    NonFinite(&'static str, f32),
    #[error("{0} must not be negative, got {1}")]
    Negative(&'static str, f32),
    #[error("{0} must be positive and finite, got {1}")]
    NotPositive(&'static str, f32),
    #[error("{0} must lie in (0, 1], got {1}")]
    OutOfUnitRange(&'static str, f32),
    #[error("terminal_velocity must be negative, got {0}")]
    TerminalVelocity(f32),
    #[error("spawn y {spawn_y} must be above respawn floor {floor}")]
    SpawnBelowFloor { spawn_y: f32, floor: f32 },
}

/// Partial profile from TOML; unset fields keep the built-in value.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProfileOverrides {
    pub throttle: Option<ThrottleModel>,
    pub turn_policy: Option<TurnPolicy>,
    pub acceleration: Option<f32>,
    pub braking: Option<f32>,
    pub max_speed: Option<f32>,
    pub reverse_ratio: Option<f32>,
    pub friction: Option<f32>,
    pub turn_speed: Option<f32>,
    pub gravity: Option<f32>,
    pub terminal_velocity: Option<f32>,
    pub max_step_height: Option<f32>,
    pub foot_offset: Option<f32>,
    pub snap_up: Option<f32>,
    pub snap_down: Option<f32>,
    pub falling_threshold: Option<f32>,
    pub respawn_floor: Option<f32>,
    pub spawn: Option<[f32; 3]>,
    pub spawn_yaw: Option<f32>,
    pub orient_rate: Option<f32>,
    pub align_to_surface: Option<bool>,
    pub camera_distance: Option<f32>,
    pub camera_height: Option<f32>,
    pub camera_smoothing: Option<f32>,
}

/// Contents of `avatar.toml`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AvatarCfg {
    /// Which avatar the session drives.
    pub kind: Option<AvatarKind>,
    /// Zone activation radius in world units.
    pub activation_radius: Option<f32>,
    #[serde(default)]
    pub vehicle: ProfileOverrides,
    #[serde(default)]
    pub quadruped: ProfileOverrides,
}

/// Built-in activation radius.
pub const DEFAULT_ACTIVATION_RADIUS: f32 = 8.0;

impl AvatarCfg {
    /// Parse TOML text.
    pub fn from_toml(txt: &str) -> Result<Self> {
        toml::from_str::<AvatarCfg>(txt).context("parse avatar TOML")
    }

    #[must_use]
    pub fn kind(&self) -> AvatarKind {
        self.kind.unwrap_or_default()
    }

    #[must_use]
    pub fn activation_radius(&self) -> f32 {
        self.activation_radius.unwrap_or(DEFAULT_ACTIVATION_RADIUS)
    }

    /// Resolve the effective, validated profile for `kind`.
    pub fn profile(&self, kind: AvatarKind) -> Result<AvatarProfile, ProfileError> {
        let mut p = AvatarProfile::for_kind(kind);
        match kind {
            AvatarKind::Vehicle => p.apply(&self.vehicle),
            AvatarKind::Quadruped => p.apply(&self.quadruped),
        }
        p.validate()?;
        Ok(p)
    }

    /// Profile for the configured kind.
    pub fn selected_profile(&self) -> Result<AvatarProfile, ProfileError> {
        self.profile(self.kind())
    }
}

/// Load `data/config/avatar.toml` (defaults if absent) and apply env overrides.
///
/// Env: `AVATAR_KIND`, `AVATAR_MAX_SPEED`, `ACTIVATION_RADIUS`.
pub fn load_default() -> Result<AvatarCfg> {
    let mut cfg = match crate::loader::read_optional("config/avatar.toml")? {
        Some(txt) => AvatarCfg::from_toml(&txt)?,
        None => AvatarCfg::default(),
    };
    if let Ok(k) = std::env::var("AVATAR_KIND") {
        cfg.kind = Some(k.parse()?);
    }
    if let Some(v) = std::env::var("AVATAR_MAX_SPEED").ok().and_then(|v| v.parse().ok()) {
        match cfg.kind() {
            AvatarKind::Vehicle => cfg.vehicle.max_speed = Some(v),
            AvatarKind::Quadruped => cfg.quadruped.max_speed = Some(v),
        }
    }
    if let Some(r) = std::env::var("ACTIVATION_RADIUS").ok().and_then(|v| v.parse().ok()) {
        cfg.activation_radius = Some(r);
    }
    Ok(cfg)
}
