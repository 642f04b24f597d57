//! Scripted headless runs used by the `sim_harness` binary and integration tests.
//!
//! A script is a comma-separated list of `KEYS:TICKS` segments, played in order
//! through the keyboard intent source:
//!
//! | letter | key |
//! |---|---|
//! | `F` | forward (W) |
//! | `B` | backward (S) |
//! | `L` / `R` | turn left / right (A / D) |
//! | `X` | brake (Space) |
//! | `E` | confirm (Enter) |
//! | `Q` | cancel (Escape) |
//! | `N` | nothing |
//!
//! Example: `F:120,FL:30,X:40,E:1,N:30,Q:1`.

use anyhow::{Context, Result, bail};
use client_core::input::Key;
use client_core::systems::intent::IntentSource;
use collision_static::{FlatGround, HeightField, TerrainQuery, TriMesh};
use data_runtime::configs::avatar::AvatarProfile;
use data_runtime::zone::ZoneDescriptor;
use glam::Vec3;
use serde::Serialize;
use sim_core::activation::ActivationEvent;
use sim_core::session::{Session, SessionCfg, SessionSnapshot};
use std::str::FromStr;
use ux_hud::{HudDraw, HudModel};

/// One script segment: keys held for a number of ticks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub keys: Vec<Key>,
    pub ticks: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Script(pub Vec<Segment>);

impl Script {
    /// Keys held at `tick`; empty once the script has run out.
    #[must_use]
    pub fn keys_at(&self, tick: u32) -> &[Key] {
        let mut start = 0u32;
        for seg in &self.0 {
            let end = start.saturating_add(seg.ticks);
            if tick < end {
                return &seg.keys;
            }
            start = end;
        }
        &[]
    }

    #[must_use]
    pub fn len_ticks(&self) -> u32 {
        self.0.iter().fold(0u32, |acc, s| acc.saturating_add(s.ticks))
    }
}

impl FromStr for Script {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut out = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (keys, ticks) = part
                .split_once(':')
                .with_context(|| format!("segment '{part}' is not KEYS:TICKS"))?;
            let ticks: u32 = ticks
                .trim()
                .parse()
                .with_context(|| format!("bad tick count in '{part}'"))?;
            let mut held = Vec::new();
            for c in keys.trim().chars() {
                let key = match c.to_ascii_uppercase() {
                    'F' => Key::W,
                    'B' => Key::S,
                    'L' => Key::A,
                    'R' => Key::D,
                    'X' => Key::Space,
                    'E' => Key::Enter,
                    'Q' => Key::Escape,
                    'N' => continue,
                    other => bail!("unknown script key '{other}' in '{part}'"),
                };
                held.push(key);
            }
            out.push(Segment { keys: held, ticks });
        }
        Ok(Self(out))
    }
}

/// Ground the harness drives on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TerrainKind {
    #[default]
    Flat,
    /// Rolling heightfield covering the whole zone layout.
    Hills,
    /// Triangle-mesh floor with a 3-unit loading dock at +X and a 1-unit
    /// step at -X.
    Yard,
}

impl FromStr for TerrainKind {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "flat" => Ok(Self::Flat),
            "hills" => Ok(Self::Hills),
            "yard" => Ok(Self::Yard),
            other => bail!("unknown terrain '{other}' (expected flat|hills|yard)"),
        }
    }
}

pub fn build_terrain(kind: TerrainKind) -> Result<Box<dyn TerrainQuery>> {
    Ok(match kind {
        TerrainKind::Flat => Box::new(FlatGround::default()),
        TerrainKind::Hills => Box::new(HeightField::from_fn(129, 160.0, |x, z| {
            1.5 * (x * 0.05).sin() * (z * 0.04).cos()
        })?),
        TerrainKind::Yard => {
            let mut tris = quad(Vec3::new(-100.0, 0.0, -100.0), Vec3::new(100.0, 0.0, 100.0));
            tris.extend(quad(Vec3::new(10.0, 3.0, -10.0), Vec3::new(20.0, 3.0, 10.0)));
            tris.extend(quad(Vec3::new(-20.0, 1.0, 10.0), Vec3::new(-10.0, 1.0, 20.0)));
            Box::new(TriMesh::from_triangles(&tris)?)
        }
    })
}

/// Two upward-facing triangles spanning `min..max` on XZ at `min.y`.
fn quad(min: Vec3, max: Vec3) -> Vec<[Vec3; 3]> {
    let y = min.y;
    let a = Vec3::new(min.x, y, min.z);
    let b = Vec3::new(max.x, y, min.z);
    let c = Vec3::new(max.x, y, max.z);
    let d = Vec3::new(min.x, y, max.z);
    vec![[a, d, c], [a, c, b]]
}

#[derive(Clone, Debug)]
pub struct Scenario {
    pub ticks: u32,
    pub dt: f32,
    pub script: Script,
    /// Teleport here before the first tick.
    pub start_zone: Option<String>,
    /// Toggle the intent source off for these tick ranges (onboarding terminal).
    pub disabled: Vec<std::ops::Range<u32>>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            ticks: 600,
            dt: 1.0 / 60.0,
            script: Script::default(),
            start_zone: None,
            disabled: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct TimedEvent {
    pub tick: u64,
    #[serde(flatten)]
    pub event: ActivationEvent,
    pub zone_id: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct HarnessReport {
    pub ticks: u64,
    pub respawns: u32,
    pub max_speed: f32,
    pub events: Vec<TimedEvent>,
    pub last: SessionSnapshot,
    pub hud: Option<HudDraw>,
}

fn event_zone(ev: &ActivationEvent) -> usize {
    match *ev {
        ActivationEvent::Approached { zone }
        | ActivationEvent::Left { zone }
        | ActivationEvent::Opened { zone }
        | ActivationEvent::Closed { zone, .. } => zone,
        ActivationEvent::Switched { to, .. } => to,
    }
}

/// Run a scenario to completion.
pub fn run_scenario(
    scn: &Scenario,
    profile: AvatarProfile,
    zones: Vec<ZoneDescriptor>,
    terrain: Box<dyn TerrainQuery>,
    cfg: SessionCfg,
) -> Result<HarnessReport> {
    let mut session = Session::new(profile, zones, terrain, cfg).context("start session")?;
    if let Some(id) = &scn.start_zone {
        session.teleport_to_zone(id)?;
    }
    let mut hud = HudModel::new(session.zones());
    let mut source = IntentSource::default();
    let mut events = Vec::new();
    let mut respawns = 0u32;
    let mut max_speed = 0.0f32;

    for t in 0..scn.ticks {
        source.set_enabled(!scn.disabled.iter().any(|r| r.contains(&t)));
        source.keyboard.clear();
        for &k in scn.script.keys_at(t) {
            source.keyboard.press(k);
        }
        let report = session.advance(scn.dt, &source.sample());
        if report.step.respawned {
            respawns += 1;
        }
        max_speed = max_speed.max(report.step.speed);
        for ev in report.events {
            let zone_id = session.zone(event_zone(&ev)).map(|z| z.id.clone());
            events.push(TimedEvent {
                tick: report.tick,
                event: ev,
                zone_id,
            });
        }
        hud.update_from(&session.snapshot());
    }

    let last = session.snapshot();
    tracing::info!(
        target: "session",
        ticks = last.tick,
        respawns,
        events = events.len(),
        "scenario complete"
    );
    Ok(HarnessReport {
        ticks: last.tick,
        respawns,
        max_speed,
        events,
        last,
        hud: hud.draw(),
    })
}
