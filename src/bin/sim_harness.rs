//! Headless simulation harness CLI.
//!
//! Usage:
//!   cargo run --bin sim_harness -- --script "F:180,X:40,E:1,N:60,Q:1"
//!   cargo run --bin sim_harness -- --kind vehicle --zone projects --ticks 300 --json

use anyhow::{Context, Result};
use clap::Parser;
use data_runtime::configs::{avatar, telemetry};
use data_runtime::zone;
use roamfolio::harness::{Scenario, Script, TerrainKind, build_terrain, run_scenario};
use sim_core::proximity::{DistanceMetric, ProximityCfg};
use sim_core::session::SessionCfg;

#[derive(Parser)]
#[command(author, version, about = "Drive the portfolio session headless", long_about = None)]
struct Cli {
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u32,
    /// Fixed tick length in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,
    /// Avatar kind (vehicle|quadruped); overrides config and AVATAR_KIND
    #[arg(long)]
    kind: Option<avatar::AvatarKind>,
    /// Key script, e.g. "F:120,FL:30,X:40,E:1"
    #[arg(long, default_value = "")]
    script: Script,
    /// Teleport to this zone id before the first tick
    #[arg(long)]
    zone: Option<String>,
    /// Ground to drive on (flat|hills|yard)
    #[arg(long, default_value = "flat")]
    terrain: TerrainKind,
    /// Measure zone distance in 3D instead of on the ground plane
    #[arg(long)]
    spatial: bool,
    /// Zone list path relative to data/
    #[arg(long, default_value = zone::DEFAULT_ZONES_PATH)]
    zones: String,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let tcfg = telemetry::load_default().context("load telemetry config")?;
    client_core::telemetry::init_client_telemetry(&tcfg);

    let acfg = avatar::load_default().context("load avatar config")?;
    let kind = cli.kind.unwrap_or_else(|| acfg.kind());
    let profile = acfg.profile(kind)?;
    let zones = zone::load_zones(&cli.zones)?;
    let cfg = SessionCfg {
        proximity: ProximityCfg {
            radius: acfg.activation_radius(),
            metric: if cli.spatial {
                DistanceMetric::Spatial
            } else {
                DistanceMetric::Planar
            },
        },
        ..SessionCfg::default()
    };
    let scn = Scenario {
        ticks: cli.ticks,
        dt: cli.dt,
        script: cli.script,
        start_zone: cli.zone,
        disabled: Vec::new(),
    };
    let report = run_scenario(&scn, profile, zones, build_terrain(cli.terrain)?, cfg)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    for ev in &report.events {
        println!(
            "[sim] t={} {:?} {}",
            ev.tick,
            ev.event,
            ev.zone_id.as_deref().unwrap_or("-")
        );
    }
    let p = report.last.avatar_position;
    println!(
        "[sim] done: ticks={} respawns={} max_speed={:.1} pos=({:.2}, {:.2}, {:.2}) nearby={:?} active={:?}",
        report.ticks,
        report.respawns,
        report.max_speed,
        p.x,
        p.y,
        p.z,
        report.last.nearby_zone,
        report.last.active_zone
    );
    Ok(())
}
