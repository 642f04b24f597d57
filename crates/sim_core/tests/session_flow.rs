use approx::assert_abs_diff_eq;
use client_core::input::{ControlIntent, FrameInput, InteractionButtons};
use collision_static::{FlatGround, HeightField};
use data_runtime::configs::avatar::AvatarProfile;
use data_runtime::zone::ZoneDescriptor;
use glam::{Vec2, Vec3};
use sim_core::activation::{ActivationEvent, CloseReason};
use sim_core::session::SessionCfg;
use sim_core::{ActivationState, FixedStepRunner, Session};

const DT: f32 = 1.0 / 60.0;

fn zones() -> Vec<ZoneDescriptor> {
    vec![
        ZoneDescriptor::new("summary", "About", Vec3::new(0.0, 0.0, -40.0)),
        ZoneDescriptor::new("projects", "Projects", Vec3::new(40.0, 0.0, 0.0)),
        ZoneDescriptor::new("experience", "Experience", Vec3::new(-40.0, 0.0, 0.0)),
    ]
}

fn drive() -> FrameInput {
    FrameInput {
        intent: ControlIntent {
            forward: true,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn with_buttons(confirm: bool, cancel: bool) -> FrameInput {
    FrameInput {
        buttons: InteractionButtons { confirm, cancel },
        ..Default::default()
    }
}

#[test]
fn drive_past_zone_then_open_and_cancel() {
    let mut s = Session::new(
        AvatarProfile::vehicle(),
        zones(),
        FlatGround::default(),
        SessionCfg::default(),
    )
    .expect("session");

    // Land at spawn (0, 10, 0); zone 0 is 40 units ahead along -Z.
    for _ in 0..180 {
        s.advance(DT, &FrameInput::default());
    }
    assert!(s.snapshot().grounded);
    assert_eq!(s.snapshot().nearby_zone, None);

    let mut approached_at = None;
    for i in 0..2000 {
        let r = s.advance(DT, &drive());
        if r.events.contains(&ActivationEvent::Approached { zone: 0 }) {
            approached_at = Some(i);
            break;
        }
    }
    assert!(approached_at.is_some(), "never came near the summary zone");
    let snap = s.snapshot();
    assert_eq!(snap.nearby_zone, Some(0));
    let p = snap.avatar_position;
    let planar = Vec2::new(p.x, p.z + 40.0).length();
    assert!(planar <= 8.0 + 1e-4);

    // Brake to a stop inside the radius.
    let brake = FrameInput {
        intent: ControlIntent {
            brake: true,
            ..Default::default()
        },
        ..Default::default()
    };
    for _ in 0..60 {
        s.advance(DT, &brake);
    }
    assert_eq!(s.snapshot().speed, 0.0);
    assert_eq!(s.activation(), ActivationState::Nearby(0));

    // Held confirm opens exactly once.
    let r = s.advance(DT, &with_buttons(true, false));
    assert_eq!(r.events, vec![ActivationEvent::Opened { zone: 0 }]);
    for _ in 0..10 {
        let r = s.advance(DT, &with_buttons(true, false));
        assert!(r.events.is_empty());
    }
    assert_eq!(s.snapshot().active_zone, Some(0));

    // Locomotion is suppressed while open.
    let before = s.snapshot().avatar_position;
    for _ in 0..30 {
        s.advance(DT, &drive());
    }
    let after = s.snapshot().avatar_position;
    assert_abs_diff_eq!(before.x, after.x, epsilon = 1e-4);
    assert_abs_diff_eq!(before.z, after.z, epsilon = 1e-4);

    let r = s.advance(DT, &with_buttons(false, true));
    assert_eq!(
        r.events,
        vec![ActivationEvent::Closed {
            zone: 0,
            reason: CloseReason::Cancel
        }]
    );
    // Still inside the radius, so the next tick reports nearby again.
    let r = s.advance(DT, &FrameInput::default());
    assert_eq!(r.events, vec![ActivationEvent::Approached { zone: 0 }]);
}

#[test]
fn external_close_and_teleport() {
    let mut s = Session::new(
        AvatarProfile::quadruped(),
        zones(),
        FlatGround::default(),
        SessionCfg::default(),
    )
    .expect("session");
    s.teleport_to_zone("projects").expect("known zone");
    for _ in 0..120 {
        s.advance(DT, &FrameInput::default());
    }
    assert_eq!(s.snapshot().nearby_zone, Some(1));
    s.advance(DT, &with_buttons(true, false));
    assert_eq!(s.snapshot().active_zone, Some(1));
    assert_eq!(
        s.close_active(),
        Some(ActivationEvent::Closed {
            zone: 1,
            reason: CloseReason::External
        })
    );
    assert_eq!(s.close_active(), None);
}

#[test]
fn pending_terrain_then_install() {
    let mut s: Session<Option<HeightField>> = Session::new(
        AvatarProfile::vehicle(),
        zones(),
        None,
        SessionCfg::default(),
    )
    .expect("session");
    let mut respawned = false;
    for _ in 0..600 {
        respawned |= s.advance(DT, &drive()).step.respawned;
        assert!(!s.snapshot().grounded);
    }
    assert!(respawned);

    let hf = HeightField::from_fn(33, 128.0, |_, _| 1.0).expect("terrain");
    s.install_terrain(Some(hf));
    for _ in 0..240 {
        s.advance(DT, &FrameInput::default());
    }
    let snap = s.snapshot();
    assert!(snap.grounded);
    assert_abs_diff_eq!(snap.avatar_position.y, 1.4, epsilon = 1e-4);
}

#[test]
fn runner_caps_substeps() {
    let mut s = Session::new(
        AvatarProfile::vehicle(),
        zones(),
        FlatGround::default(),
        SessionCfg::default(),
    )
    .expect("session");
    let mut runner = FixedStepRunner::new(DT, 4);
    let ticks = runner.frame(&mut s, DT * 2.5, &FrameInput::default());
    assert_eq!(ticks.len(), 2);
    assert!(runner.pending() > 0.0 && runner.pending() < DT);
    let ticks = runner.frame(&mut s, 1.0, &FrameInput::default());
    assert_eq!(ticks.len(), 4);
    assert_eq!(runner.pending(), 0.0);
    assert_eq!(s.tick(), 6);
}

#[test]
fn nearby_tracks_planar_radius_while_driving_away() {
    let zone = Vec3::new(0.0, 0.0, 5.0);
    let mut s = Session::new(
        AvatarProfile::vehicle(),
        vec![ZoneDescriptor::new("near", "Near", zone)],
        FlatGround::default(),
        SessionCfg::default(),
    )
    .expect("session");

    let mut approached = 0;
    let mut left_at = None;
    for i in 0..600 {
        let r = s.advance(DT, &drive());
        let snap = s.snapshot();
        let p = snap.avatar_position;
        let planar = Vec2::new(p.x - zone.x, p.z - zone.z).length();
        if (planar - 8.0).abs() > 1e-4 {
            assert_eq!(snap.nearby_zone.is_some(), planar <= 8.0, "tick {i}: d={planar}");
        }
        approached += r
            .events
            .iter()
            .filter(|e| matches!(e, ActivationEvent::Approached { zone: 0 }))
            .count();
        if r.events.contains(&ActivationEvent::Left { zone: 0 }) {
            left_at = Some(i);
            assert!(planar > 8.0);
            break;
        }
    }
    assert_eq!(approached, 1);
    assert!(left_at.is_some(), "never drove out of range");
    assert_eq!(s.snapshot().nearby_zone, None);
    assert_eq!(s.activation(), ActivationState::Idle);
}
