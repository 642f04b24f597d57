use approx::assert_abs_diff_eq;
use client_core::controller::{GroundContact, LocomotionController};
use client_core::input::ControlIntent;
use collision_static::{FlatGround, HeightField, RayHit, TerrainQuery};
use data_runtime::configs::avatar::AvatarProfile;
use glam::Vec3;

const DT: f32 = 1.0 / 60.0;

fn forward() -> ControlIntent {
    ControlIntent {
        forward: true,
        ..Default::default()
    }
}

/// Flat floor at 0 with a raised plateau for every `z <= edge_z`.
struct Ledge {
    edge_z: f32,
    height: f32,
}

impl TerrainQuery for Ledge {
    fn raycast(&self, origin: Vec3, direction: Vec3) -> Option<RayHit> {
        if direction.y >= 0.0 {
            return None;
        }
        let h = if origin.z <= self.edge_z { self.height } else { 0.0 };
        (origin.y >= h).then(|| RayHit {
            point: Vec3::new(origin.x, h, origin.z),
            normal: Vec3::Y,
            distance: origin.y - h,
        })
    }
}

/// Floor at 0 that reports a fixed (possibly bogus) normal.
struct OddNormal(Vec3);

impl TerrainQuery for OddNormal {
    fn raycast(&self, origin: Vec3, _direction: Vec3) -> Option<RayHit> {
        Some(RayHit {
            point: Vec3::new(origin.x, 0.0, origin.z),
            normal: self.0,
            distance: origin.y,
        })
    }
}

fn settle(c: &mut LocomotionController, terrain: &impl TerrainQuery) {
    for _ in 0..600 {
        if c.step(&ControlIntent::default(), DT, terrain).grounded {
            return;
        }
    }
    panic!("avatar never landed");
}

#[test]
fn vehicle_speed_stays_within_limits() {
    let ground = FlatGround::default();
    let mut c = LocomotionController::new(AvatarProfile::vehicle());
    settle(&mut c, &ground);
    for _ in 0..200 {
        let r = c.step(&forward(), 0.1, &ground);
        assert!(r.speed <= 60.0 + 1e-4);
    }
    assert_abs_diff_eq!(c.state().forward_speed, 60.0, epsilon = 1e-3);

    let back = ControlIntent {
        backward: true,
        ..Default::default()
    };
    for _ in 0..400 {
        c.step(&back, 0.1, &ground);
        assert!(c.state().forward_speed >= -30.0 - 1e-4);
    }
    assert_abs_diff_eq!(c.state().forward_speed, -30.0, epsilon = 1e-3);
}

#[test]
fn quadruped_walks_at_fixed_speed() {
    let ground = FlatGround::default();
    let mut c = LocomotionController::new(AvatarProfile::quadruped());
    settle(&mut c, &ground);
    let r = c.step(&forward(), DT, &ground);
    assert_eq!(r.speed, 12.0);
    let r = c.step(&ControlIntent::default(), DT, &ground);
    assert_eq!(r.speed, 0.0);
}

#[test]
fn coasting_follows_per_tick_friction() {
    let ground = FlatGround::default();
    let mut c = LocomotionController::new(AvatarProfile::vehicle());
    settle(&mut c, &ground);
    for _ in 0..30 {
        c.step(&forward(), DT, &ground);
    }
    let s0 = c.state().forward_speed;
    assert!(s0 > 1.0);
    for n in 1..=50 {
        let r = c.step(&ControlIntent::default(), DT, &ground);
        assert_abs_diff_eq!(r.speed, s0 * 0.98f32.powi(n), epsilon = 1e-3);
    }
}

#[test]
fn landing_converges_to_foot_offset() {
    let ground = FlatGround::new(2.0);
    let mut car = LocomotionController::new(AvatarProfile::vehicle());
    settle(&mut car, &ground);
    assert_abs_diff_eq!(car.state().position.y, 2.4, epsilon = 1e-5);
    assert_eq!(car.state().vertical_velocity, 0.0);

    let mut dog = LocomotionController::new(AvatarProfile::quadruped());
    settle(&mut dog, &ground);
    for _ in 0..10 {
        dog.step(&ControlIntent::default(), DT, &ground);
    }
    assert_abs_diff_eq!(dog.state().position.y, 2.0, epsilon = 1e-5);
}

#[test]
fn tall_ledge_stops_the_vehicle() {
    let ledge = Ledge {
        edge_z: -5.0,
        height: 3.0,
    };
    let mut c = LocomotionController::new(AvatarProfile::vehicle());
    c.teleport(Vec3::new(0.0, 0.4, 0.0));
    settle(&mut c, &ledge);
    let mut hit_wall = false;
    for _ in 0..300 {
        let before = c.state().position;
        let r = c.step(&forward(), DT, &ledge);
        if r.contact == GroundContact::Wall {
            assert_eq!(c.state().forward_speed, 0.0);
            assert_eq!(c.state().position.x, before.x);
            assert_eq!(c.state().position.z, before.z);
            let r = c.step(&ControlIntent::default(), DT, &ledge);
            assert_eq!(r.speed, 0.0);
            assert_eq!(c.state().position.z, before.z);
            hit_wall = true;
            break;
        }
    }
    assert!(hit_wall);
    assert!(c.state().position.z > -5.0);
}

#[test]
fn low_ledge_is_climbed() {
    let ledge = Ledge {
        edge_z: -2.0,
        height: 1.0,
    };
    let mut c = LocomotionController::new(AvatarProfile::vehicle());
    c.teleport(Vec3::new(0.0, 0.4, 0.0));
    settle(&mut c, &ledge);
    for _ in 0..120 {
        c.step(&forward(), DT, &ledge);
    }
    assert!(c.state().position.z < -2.0);
    assert_abs_diff_eq!(c.state().position.y, 1.4, epsilon = 1e-4);
}

#[test]
fn falling_below_floor_respawns_exactly() {
    for profile in [AvatarProfile::vehicle(), AvatarProfile::quadruped()] {
        let mut c = LocomotionController::new(profile.clone());
        c.teleport(Vec3::new(3.0, -51.0, 7.0));
        let r = c.step(&forward(), DT, &FlatGround::default());
        assert!(r.respawned);
        let s = c.state();
        assert_eq!(s.position, profile.spawn);
        assert_eq!(s.facing_angle, profile.spawn_yaw);
        assert_eq!(s.forward_speed, 0.0);
        assert_eq!(s.vertical_velocity, 0.0);
    }
}

#[test]
fn pending_terrain_free_falls_then_respawns() {
    let pending: Option<FlatGround> = None;
    let mut c = LocomotionController::new(AvatarProfile::vehicle());
    let mut respawns = 0;
    let mut min_vy = 0.0f32;
    for _ in 0..600 {
        let r = c.step(&forward(), DT, &pending);
        assert!(!r.grounded);
        min_vy = min_vy.min(c.state().vertical_velocity);
        if r.respawned {
            respawns += 1;
        }
    }
    assert!(respawns >= 1);
    assert!(min_vy >= -30.0, "terminal velocity respected");
}

#[test]
fn steep_or_broken_normals_fall_back_to_up() {
    for normal in [
        Vec3::new(0.95, 0.3, 0.0).normalize(),
        Vec3::new(f32::NAN, 1.0, 0.0),
        Vec3::ZERO,
    ] {
        let terrain = OddNormal(normal);
        let mut c = LocomotionController::new(AvatarProfile::vehicle());
        c.teleport(Vec3::new(0.0, 0.4, 0.0));
        for _ in 0..30 {
            c.step(&ControlIntent::default(), DT, &terrain);
        }
        let n = c.state().grounded_normal;
        assert!(n.is_finite());
        assert_abs_diff_eq!(n.y, 1.0, epsilon = 1e-5);
    }
}

#[test]
fn vehicle_tilts_with_slope_quadruped_stays_upright() {
    let slope = HeightField::from_fn(65, 64.0, |x, _| 0.3 * x).expect("slope");
    let (h, _) = slope.height_at(0.0, 0.0);
    for (profile, upright) in [
        (AvatarProfile::vehicle(), false),
        (AvatarProfile::quadruped(), true),
    ] {
        let foot = profile.probe.foot_offset;
        let mut c = LocomotionController::new(profile);
        c.teleport(Vec3::new(0.0, h + foot, 0.0));
        for _ in 0..120 {
            c.step(&ControlIntent::default(), DT, &slope);
        }
        assert!(c.state().is_grounded);
        assert!(c.state().grounded_normal.x < -0.2);
        let up = c.state().orientation * Vec3::Y;
        if upright {
            assert_abs_diff_eq!(up.y, 1.0, epsilon = 1e-3);
        } else {
            assert!(up.x < -0.2);
        }
    }
}
