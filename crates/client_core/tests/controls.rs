use approx::assert_abs_diff_eq;
use client_core::input::{ControlIntent, Key};
use client_core::systems::camera::{CameraRig, CameraRigCfg};
use client_core::systems::intent::{IntentCfg, IntentSource};
use client_core::systems::joystick::{JoystickCfg, VirtualJoystick};
use data_runtime::configs::avatar::AvatarProfile;
use glam::{Vec2, Vec3};

fn stick_at(x: f32, y: f32) -> ControlIntent {
    let mut j = VirtualJoystick::new(JoystickCfg::default());
    j.press();
    j.drag(Vec2::new(x, y));
    j.intent()
}

#[test]
fn joystick_thresholds() {
    let idle = stick_at(5.0, -9.0);
    assert!(!idle.forward && !idle.backward);

    let fwd = stick_at(0.0, -11.0);
    assert!(fwd.forward && !fwd.backward);

    let back = stick_at(0.0, 11.0);
    assert!(back.backward);

    // Steering flags need motion and |x| > 15.
    let sideways = stick_at(20.0, 0.0);
    assert!(!sideways.right && !sideways.left);
    let fwd_right = stick_at(16.0, -20.0);
    assert!(fwd_right.forward && fwd_right.right);
    let fwd_slight = stick_at(14.0, -20.0);
    assert!(!fwd_slight.right);
}

#[test]
fn joystick_analog_turn_is_normalized() {
    let i = stick_at(16.0, -20.0);
    assert_abs_diff_eq!(i.analog_turn.unwrap_or_default(), 0.5, epsilon = 1e-5);
    let i = stick_at(-200.0, -200.0);
    assert_abs_diff_eq!(
        i.analog_turn.unwrap_or_default(),
        -std::f32::consts::FRAC_1_SQRT_2,
        epsilon = 1e-5
    );
    assert_eq!(stick_at(0.0, -20.0).analog_turn, None);
    assert_eq!(stick_at(-30.0, 0.0).analog_turn, None);
}

#[test]
fn centered_stick_keeps_keyboard_steering() {
    let mut src = IntentSource::default();
    src.keyboard.press(Key::W);
    src.keyboard.press(Key::D);
    src.joystick.press();
    src.joystick.drag(Vec2::new(2.0, -20.0));
    let i = src.poll();
    assert!(i.forward && i.right);
    assert_eq!(i.analog_turn, None);
    assert_abs_diff_eq!(i.turn_axis(), -1.0);
}

#[test]
fn keyboard_turn_swap_only_when_reversing() {
    let mut src = IntentSource::new(IntentCfg {
        swap_turn_when_reversing: true,
    });
    src.keyboard.press(Key::S);
    src.keyboard.press(Key::A);
    let i = src.poll();
    assert!(i.backward && i.right && !i.left);

    src.keyboard.press(Key::W);
    let i = src.poll();
    assert!(i.left && !i.right, "forward held: no swap");

    let mut plain = IntentSource::default();
    plain.keyboard.press(Key::ArrowDown);
    plain.keyboard.press(Key::ArrowLeft);
    assert!(plain.poll().left);
}

#[test]
fn joystick_and_keyboard_merge() {
    let mut src = IntentSource::default();
    src.keyboard.press(Key::Space);
    src.joystick.press();
    src.joystick.drag(Vec2::new(-32.0, -32.0));
    let i = src.poll();
    assert!(i.brake && i.forward);
    assert!(i.analog_turn.is_some_and(|a| a < 0.0));
    assert!(i.turn_axis() > 0.0, "stick left turns left");
}

#[test]
fn sample_carries_buttons_and_look() {
    let mut src = IntentSource::default();
    src.keyboard.press(Key::Enter);
    src.look.set_pointer(Vec2::new(0.25, -0.5));
    let frame = src.sample();
    assert!(frame.buttons.confirm && !frame.buttons.cancel);
    assert_eq!(frame.look, Vec2::new(0.25, -0.5));
}

#[test]
fn camera_clamps_look_input() {
    let cfg = CameraRigCfg::from(AvatarProfile::vehicle().camera);
    let rig = CameraRig::new(cfg);
    let wild = rig.target_look_at(Vec3::ZERO, 0.0, Vec2::new(50.0, -50.0));
    let edge = rig.target_look_at(Vec3::ZERO, 0.0, Vec2::new(1.0, -1.0));
    assert_eq!(wild, edge);
    assert_abs_diff_eq!(edge.x, 10.0, epsilon = 1e-5);
    assert_abs_diff_eq!(edge.y, 1.0 - 5.0, epsilon = 1e-5);
    let nan = rig.target_look_at(Vec3::ZERO, 0.0, Vec2::new(f32::NAN, f32::INFINITY));
    assert_eq!(nan, Vec3::new(0.0, 1.0, 0.0));
}

#[test]
fn camera_converges_behind_moving_avatar() {
    let cfg = CameraRigCfg::from(AvatarProfile::quadruped().camera);
    let mut rig = CameraRig::new(cfg);
    let pos = Vec3::new(5.0, 0.0, -85.0);
    let yaw = std::f32::consts::PI;
    for _ in 0..200 {
        rig.update(pos, yaw, Vec2::ZERO);
    }
    let target = rig.target_eye(pos, yaw);
    assert!(rig.eye().distance(target) < 1e-3);
    assert_abs_diff_eq!(target.z, -85.0 - 16.0, epsilon = 1e-4);
    let view = rig.view_matrix();
    let at = view.transform_point3(rig.look_at());
    assert!(at.z < 0.0, "look-at point is in front of the camera");
}
