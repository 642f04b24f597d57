use data_runtime::configs::avatar::{self, AvatarKind};
use data_runtime::configs::telemetry;
use data_runtime::loader::DATA_ROOT_ENV;
use data_runtime::zone;
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

fn clear_env() {
    unsafe {
        for k in [
            DATA_ROOT_ENV,
            "AVATAR_KIND",
            "AVATAR_MAX_SPEED",
            "ACTIVATION_RADIUS",
            "LOG_LEVEL",
            "JSON_LOGS",
        ] {
            std::env::remove_var(k);
        }
    }
}

fn data_dir_with(files: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().expect("tmp");
    for (rel, body) in files {
        let p = tmp.path().join(rel);
        fs::create_dir_all(p.parent().expect("parent")).expect("mkdir");
        fs::write(p, body).expect("write");
    }
    unsafe {
        std::env::set_var(DATA_ROOT_ENV, tmp.path());
    }
    tmp
}

#[test]
#[serial]
fn missing_avatar_file_uses_builtin_defaults() {
    clear_env();
    let _tmp = data_dir_with(&[]);
    let cfg = avatar::load_default().expect("load");
    assert_eq!(cfg.kind(), AvatarKind::Quadruped);
    assert_eq!(cfg.activation_radius(), 8.0);
    let p = cfg.selected_profile().expect("profile");
    assert_eq!(p, avatar::AvatarProfile::quadruped());
    clear_env();
}

#[test]
#[serial]
fn env_overrides_apply_to_selected_kind() {
    clear_env();
    let _tmp = data_dir_with(&[("config/avatar.toml", "kind = \"quadruped\"\n")]);
    unsafe {
        std::env::set_var("AVATAR_KIND", "vehicle");
        std::env::set_var("AVATAR_MAX_SPEED", "45");
        std::env::set_var("ACTIVATION_RADIUS", "5.5");
    }
    let cfg = avatar::load_default().expect("load");
    assert_eq!(cfg.kind(), AvatarKind::Vehicle);
    assert_eq!(cfg.activation_radius(), 5.5);
    assert_eq!(cfg.selected_profile().expect("profile").max_speed, 45.0);
    clear_env();
}

#[test]
#[serial]
fn bad_avatar_kind_env_is_an_error() {
    clear_env();
    let _tmp = data_dir_with(&[]);
    unsafe {
        std::env::set_var("AVATAR_KIND", "blimp");
    }
    assert!(avatar::load_default().is_err());
    clear_env();
}

#[test]
#[serial]
fn telemetry_env_overrides_parse() {
    clear_env();
    let _tmp = data_dir_with(&[("config/telemetry.toml", "log_level = \"warn\"\njson_logs = true\n")]);
    let cfg = telemetry::load_default().expect("load");
    assert_eq!(cfg.level(), "warn");
    assert_eq!(cfg.json_logs, Some(true));
    unsafe {
        std::env::set_var("LOG_LEVEL", "debug");
        std::env::set_var("JSON_LOGS", "false");
    }
    let cfg = telemetry::load_default().expect("load");
    assert_eq!(cfg.log_level.as_deref(), Some("debug"));
    assert_eq!(cfg.json_logs, Some(false));
    clear_env();
}

#[test]
#[serial]
fn zone_list_loads_from_data_root() {
    clear_env();
    let _tmp = data_dir_with(&[(
        "zones/portfolio.json",
        r#"[{"id":"summary","title":"About","position":[0,0,-40]},
            {"id":"projects","title":"Projects","position":[40,0,0]}]"#,
    )]);
    let zones = zone::load_default().expect("zones");
    assert_eq!(zones.len(), 2);
    assert_eq!(zones[1].id, "projects");
    clear_env();
}

#[test]
#[serial]
fn zone_list_errors_carry_context() {
    clear_env();
    let _tmp = data_dir_with(&[("zones/portfolio.json", "[]")]);
    let err = zone::load_default().expect_err("empty list");
    assert!(format!("{err:#}").contains("zone list is empty"));
    clear_env();
}

#[test]
#[serial]
fn shipped_zone_list_is_valid() {
    clear_env();
    let zones = zone::load_default().expect("workspace data/zones/portfolio.json");
    assert!(!zones.is_empty() && zones.len() <= 10);
}
