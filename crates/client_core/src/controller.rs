//! Avatar locomotion: one kinematic controller for every avatar profile.
//!
//! Each tick runs the same fixed sequence: longitudinal speed, turning, planar
//! candidate, vertical integration, ground resolution, respawn check, commit,
//! orientation smoothing. Only the ground-resolution step writes `position.y`.
//!
//! Nothing here can fail. Missing terrain means every probe misses and the
//! avatar free-falls until it crosses the respawn floor.

use crate::input::ControlIntent;
use collision_static::{RayHit, TerrainQuery};
use data_runtime::configs::avatar::{AvatarProfile, ThrottleModel, TurnPolicy};
use glam::{Mat3, Quat, Vec3};

/// Below this absolute speed the brake snaps to a full stop.
const BRAKE_STOP_SPEED: f32 = 1.0;

/// Longest tick the integrator accepts; longer steps are clamped.
pub const MAX_STEP_DT: f32 = 0.25;

/// Mutable per-avatar state. Owned by [`LocomotionController`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AvatarState {
    pub position: Vec3,
    /// Yaw in radians. Forward motion travels along `(-sin, 0, -cos)`.
    pub facing_angle: f32,
    pub forward_speed: f32,
    pub vertical_velocity: f32,
    /// Smoothed ground normal; decays toward up while airborne.
    pub grounded_normal: Vec3,
    pub is_grounded: bool,
    /// Smoothed visual rotation.
    pub orientation: Quat,
}

impl AvatarState {
    fn spawned(profile: &AvatarProfile) -> Self {
        Self {
            position: profile.spawn,
            facing_angle: profile.spawn_yaw,
            forward_speed: 0.0,
            vertical_velocity: 0.0,
            grounded_normal: Vec3::Y,
            is_grounded: false,
            orientation: facing_rotation(heading(profile.spawn_yaw), Vec3::Y),
        }
    }

    /// Unit vector the avatar travels along at positive speed.
    #[must_use]
    pub fn heading(&self) -> Vec3 {
        heading(self.facing_angle)
    }
}

/// How the ground probe classified this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroundContact {
    /// No usable surface under the candidate position.
    Airborne,
    /// Foot snapped onto the surface.
    Snapped,
    /// Ledge higher than the step limit; horizontal motion was cancelled.
    Wall,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepReport {
    /// Observed speed, `|forward_speed|`.
    pub speed: f32,
    pub contact: GroundContact,
    pub grounded: bool,
    pub respawned: bool,
}

#[derive(Clone, Debug)]
pub struct LocomotionController {
    profile: AvatarProfile,
    state: AvatarState,
}

impl LocomotionController {
    /// Create an avatar at the profile's spawn point.
    #[must_use]
    pub fn new(profile: AvatarProfile) -> Self {
        let state = AvatarState::spawned(&profile);
        Self { profile, state }
    }

    #[must_use]
    pub fn profile(&self) -> &AvatarProfile {
        &self.profile
    }

    #[must_use]
    pub fn state(&self) -> &AvatarState {
        &self.state
    }

    /// Observed speed (always non-negative).
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.state.forward_speed.abs()
    }

    /// Respawn: spawn position and yaw, velocities zeroed, normal reset.
    pub fn reset_to_spawn(&mut self) {
        self.state = AvatarState::spawned(&self.profile);
    }

    /// Move the avatar to `position` keeping its facing. Velocities are zeroed
    /// and the avatar drops onto whatever is below.
    pub fn teleport(&mut self, position: Vec3) {
        if !position.is_finite() {
            return;
        }
        let s = &mut self.state;
        s.position = position;
        s.forward_speed = 0.0;
        s.vertical_velocity = 0.0;
        s.is_grounded = false;
    }

    /// Advance one tick. `dt` is clamped to `[0, MAX_STEP_DT]`; non-finite
    /// values count as zero.
    pub fn step(&mut self, intent: &ControlIntent, dt: f32, terrain: &impl TerrainQuery) -> StepReport {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_STEP_DT) } else { 0.0 };
        let p = &self.profile;
        let s = &mut self.state;

        // 1) Longitudinal speed
        let mut speed = s.forward_speed;
        match p.throttle {
            ThrottleModel::Accelerate => {
                if intent.forward {
                    speed += p.acceleration * dt;
                } else if intent.backward {
                    speed -= p.acceleration * dt;
                }
                if intent.brake {
                    if speed > 0.0 {
                        speed -= p.braking * dt;
                    } else if speed < 0.0 {
                        speed += p.braking * dt;
                    }
                    if speed.abs() < BRAKE_STOP_SPEED {
                        speed = 0.0;
                    }
                } else {
                    // Per tick, not dt-scaled.
                    speed *= p.friction;
                }
            }
            ThrottleModel::Immediate => {
                // Backward wins when both are held.
                speed = if intent.brake {
                    0.0
                } else if intent.backward {
                    -p.max_speed
                } else if intent.forward {
                    p.max_speed
                } else {
                    0.0
                };
            }
        }
        speed = speed.clamp(p.min_speed(), p.max_speed);

        // 2) Turning
        let mut yaw = s.facing_angle;
        if speed.abs() > p.turn_dead_zone {
            let mut turn = intent.turn_axis();
            if p.turn_policy == TurnPolicy::MirrorWhenReversing {
                turn *= speed.signum();
            }
            yaw = wrap_angle(yaw + turn * p.turn_speed * dt);
        }

        // 3) Planar candidate
        let d = speed * dt;
        let (sin, cos) = yaw.sin_cos();
        let mut nx = s.position.x - sin * d;
        let mut nz = s.position.z - cos * d;

        // 4) Vertical integration
        let mut vy = (s.vertical_velocity - p.gravity * dt).max(p.terminal_velocity);
        let mut ny = s.position.y + vy * dt;

        // 5) Ground resolution
        let probe = &p.probe;
        let origin = Vec3::new(nx, ny + probe.ray_lift, nz);
        let mut grounded = false;
        let mut target_normal = Vec3::Y;
        let contact = match terrain.probe_down(origin) {
            Some(RayHit { point, normal, .. }) => {
                let ground = point.y;
                let dist = (ny - probe.foot_offset) - ground;
                let current_foot = s.position.y - probe.foot_offset;
                if dist <= probe.falling_threshold && ground > current_foot + probe.max_step_height {
                    speed = 0.0;
                    nx = s.position.x;
                    nz = s.position.z;
                    grounded = s.is_grounded;
                    GroundContact::Wall
                } else if dist > -probe.snap_down && dist <= probe.snap_up {
                    ny = ground + probe.foot_offset;
                    vy = 0.0;
                    grounded = true;
                    if normal.is_finite() && normal.y >= probe.min_normal_y {
                        target_normal = normal;
                    }
                    GroundContact::Snapped
                } else {
                    GroundContact::Airborne
                }
            }
            None => GroundContact::Airborne,
        };

        // 6) Respawn (also recovers from a non-finite candidate)
        let candidate = Vec3::new(nx, ny, nz);
        if ny < p.respawn_floor || !candidate.is_finite() {
            tracing::debug!(target: "locomotion", y = ny, floor = p.respawn_floor, "respawn");
            self.reset_to_spawn();
            return StepReport {
                speed: 0.0,
                contact: GroundContact::Airborne,
                grounded: false,
                respawned: true,
            };
        }

        // 7) Commit
        s.position = candidate;
        s.facing_angle = yaw;
        s.forward_speed = speed;
        s.vertical_velocity = vy;
        s.is_grounded = grounded;

        // 8) Orientation smoothing
        let rate = if grounded {
            p.normal_rate_grounded
        } else {
            p.normal_rate_airborne
        };
        s.grounded_normal = smooth_normal(s.grounded_normal, target_normal, (rate * dt).min(1.0));
        let up = if p.align_to_surface { s.grounded_normal } else { Vec3::Y };
        let target = facing_rotation(s.heading(), up);
        s.orientation = s.orientation.slerp(target, (p.orient_rate * dt).min(1.0)).normalize();

        // 9) Emit
        StepReport {
            speed: speed.abs(),
            contact,
            grounded,
            respawned: false,
        }
    }
}

fn heading(yaw: f32) -> Vec3 {
    let (s, c) = yaw.sin_cos();
    Vec3::new(-s, 0.0, -c)
}

/// Lerp toward `target`; degenerate results fall back to straight up.
fn smooth_normal(current: Vec3, target: Vec3, t: f32) -> Vec3 {
    let n = current.lerp(target, t);
    if !n.is_finite() || n.length_squared() < 0.1 {
        return Vec3::Y;
    }
    n.normalize()
}

/// Rotation whose +Z points along `forward` (flattened onto the plane of `up`)
/// and whose +Y is `up`.
fn facing_rotation(forward: Vec3, up: Vec3) -> Quat {
    let z = (forward - up * forward.dot(up)).normalize_or(forward);
    let x = up.cross(z).normalize_or(Vec3::X);
    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize()
}

/// Wrap into `[-PI, PI)`. Non-finite input maps to 0.
fn wrap_angle(a: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !a.is_finite() {
        return 0.0;
    }
    (a + PI).rem_euclid(TAU) - PI
}
