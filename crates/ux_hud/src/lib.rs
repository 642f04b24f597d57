//! ux_hud: HUD logic/state with simple toggles.
//!
//! Owns runtime HUD switches and derives lightweight draw data from a
//! [`SessionSnapshot`] that a renderer UI module can consume: speed readout,
//! proximity prompt, open detail panel, minimap marker and the zone
//! navigation strip.

use data_runtime::zone::ZoneDescriptor;
use glam::Vec2;
use serde::Serialize;
use sim_core::SessionSnapshot;

/// One tick on the navigation strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub id: String,
    pub title: String,
}

/// Open detail panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelView {
    pub zone: usize,
    pub id: String,
    pub title: String,
}

/// Avatar marker on the minimap (world XZ plus heading in radians).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MinimapMarker {
    pub xz: Vec2,
    pub heading: f32,
}

#[derive(Debug, Clone)]
pub struct HudModel {
    perf_enabled: bool,
    hud_enabled: bool,
    nav: Vec<NavEntry>,
    nav_index: usize,
    nav_dragging: bool,
    speed: u32,
    prompt: Option<String>,
    panel: Option<PanelView>,
    minimap: MinimapMarker,
}

impl Default for HudModel {
    fn default() -> Self {
        Self {
            perf_enabled: false,
            hud_enabled: true,
            nav: Vec::new(),
            nav_index: 0,
            nav_dragging: false,
            speed: 0,
            prompt: None,
            panel: None,
            minimap: MinimapMarker::default(),
        }
    }
}

impl HudModel {
    #[must_use]
    pub fn new(zones: &[ZoneDescriptor]) -> Self {
        Self {
            nav: zones
                .iter()
                .map(|z| NavEntry {
                    id: z.id.clone(),
                    title: z.title.clone(),
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn toggle_perf(&mut self) {
        self.perf_enabled = !self.perf_enabled;
    }
    pub fn toggle_hud(&mut self) {
        self.hud_enabled = !self.hud_enabled;
    }
    pub fn perf_enabled(&self) -> bool {
        self.perf_enabled
    }
    pub fn hud_enabled(&self) -> bool {
        self.hud_enabled
    }

    /// Derive HUD state from the latest session snapshot.
    pub fn update_from(&mut self, snap: &SessionSnapshot) {
        self.speed = if snap.speed.is_finite() {
            snap.speed.round().max(0.0) as u32
        } else {
            0
        };
        self.prompt = snap
            .nearby_zone
            .and_then(|i| self.nav.get(i))
            .map(|e| e.title.clone());
        self.panel = snap.active_zone.and_then(|i| {
            self.nav.get(i).map(|e| PanelView {
                zone: i,
                id: e.id.clone(),
                title: e.title.clone(),
            })
        });
        self.minimap = MinimapMarker {
            xz: Vec2::new(snap.avatar_position.x, snap.avatar_position.z),
            heading: snap.facing_angle,
        };
        // The strip follows the avatar unless the user is scrubbing it.
        if let Some(i) = snap.nearby_zone.filter(|&i| i < self.nav.len()) {
            if !self.nav_dragging {
                self.nav_index = i;
            }
        }
    }

    pub fn speed_readout(&self) -> u32 {
        self.speed
    }
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }
    pub fn panel(&self) -> Option<&PanelView> {
        self.panel.as_ref()
    }
    pub fn minimap(&self) -> MinimapMarker {
        self.minimap
    }
    pub fn nav(&self) -> &[NavEntry] {
        &self.nav
    }
    pub fn nav_index(&self) -> usize {
        self.nav_index
    }

    pub fn set_nav_dragging(&mut self, dragging: bool) {
        self.nav_dragging = dragging;
    }

    /// Select a tick on the strip (index clamped) and return the zone id to
    /// teleport to.
    pub fn nav_select(&mut self, index: usize) -> Option<&str> {
        let last = self.nav.len().checked_sub(1)?;
        self.nav_index = index.min(last);
        Some(self.nav[self.nav_index].id.as_str())
    }

    /// Playhead position along the strip in `[0, 1]`.
    pub fn nav_fraction(&self) -> f32 {
        if self.nav.len() > 1 {
            self.nav_index as f32 / (self.nav.len() - 1) as f32
        } else {
            0.0
        }
    }

    /// Flattened draw data; `None` while the HUD is hidden.
    pub fn draw(&self) -> Option<HudDraw> {
        self.hud_enabled.then(|| HudDraw {
            speed: self.speed,
            prompt: self.prompt.clone(),
            panel: self.panel.clone(),
            minimap: self.minimap,
            nav_index: self.nav_index,
            show_perf: self.perf_enabled,
        })
    }
}

/// Flattened draw data for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudDraw {
    pub speed: u32,
    pub prompt: Option<String>,
    pub panel: Option<PanelView>,
    pub minimap: MinimapMarker,
    pub nav_index: usize,
    pub show_perf: bool,
}
