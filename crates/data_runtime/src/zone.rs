//! Portfolio zone schema and loader.
//!
//! A zone is a labeled point of interest in the world representing one
//! portfolio section (experience, projects, education, ...). The list is
//! loaded once from `data/zones/portfolio.json` and never mutated at runtime.
//! List order matters: proximity ties resolve to the earlier entry.

use anyhow::{Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Default location of the zone list under `data/`.
pub const DEFAULT_ZONES_PATH: &str = "zones/portfolio.json";

/// Profile link shown on an item (e.g. a code host or social profile).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub name: String,
    pub url: String,
    /// Icon identifier understood by the presentation layer.
    #[serde(default)]
    pub icon: String,
}

/// One entry inside a zone's detail panel.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub details: Vec<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub link_text: Option<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub soft_skills: Vec<String>,
    #[serde(default)]
    pub socials: Vec<SocialLink>,
    /// Thumbnail image path.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    /// Long-form write-up, relative to the content root.
    #[serde(default)]
    pub markdown_file: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Static zone descriptor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneDescriptor {
    pub id: String,
    pub title: String,
    /// Marker color as `#rrggbb` (presentation only).
    #[serde(default = "default_color")]
    pub color: String,
    /// World position of the zone marker.
    pub position: Vec3,
    /// Detail panel payload.
    #[serde(default)]
    pub items: Vec<PortfolioItem>,
    /// Optional custom marker asset identifier.
    #[serde(default)]
    pub model_type: Option<String>,
}

fn default_color() -> String {
    "#f2c94c".to_string()
}

impl ZoneDescriptor {
    /// Minimal descriptor (tests, tools).
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, position: Vec3) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            color: default_color(),
            position,
            items: Vec::new(),
            model_type: None,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ZoneError {
    #[error("zone list is empty")]
    Empty,
    #[error("duplicate zone id '{0}'")]
    DuplicateId(String),
    #[error("zone '{0}' has an empty id or title")]
    MissingLabel(String),
    #[error("zone '{0}' has a non-finite position")]
    NonFinitePosition(String),
}

/// Check the invariants the simulation relies on.
pub fn validate_zones(zones: &[ZoneDescriptor]) -> Result<(), ZoneError> {
    if zones.is_empty() {
        return Err(ZoneError::Empty);
    }
    let mut seen = HashSet::new();
    for z in zones {
        if z.id.trim().is_empty() || z.title.trim().is_empty() {
            return Err(ZoneError::MissingLabel(z.id.clone()));
        }
        if !z.position.is_finite() {
            return Err(ZoneError::NonFinitePosition(z.id.clone()));
        }
        if !seen.insert(z.id.as_str()) {
            return Err(ZoneError::DuplicateId(z.id.clone()));
        }
    }
    Ok(())
}

/// Parse and validate a zone list from JSON text.
pub fn parse_zones(json: &str) -> Result<Vec<ZoneDescriptor>> {
    let zones: Vec<ZoneDescriptor> = serde_json::from_str(json).context("parse zones json")?;
    validate_zones(&zones)?;
    if zones.len() > 10 {
        log::warn!("zone list has {} entries; proximity scan is linear", zones.len());
    }
    Ok(zones)
}

/// Load the zone list from a path relative to `data/`.
pub fn load_zones(rel: &str) -> Result<Vec<ZoneDescriptor>> {
    let txt = crate::loader::read_text(rel).with_context(|| format!("read zone list: {rel}"))?;
    parse_zones(&txt).with_context(|| format!("zone list: {rel}"))
}

/// Load `data/zones/portfolio.json`.
pub fn load_default() -> Result<Vec<ZoneDescriptor>> {
    load_zones(DEFAULT_ZONES_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_sections() {
        let json = r##"[
            {"id": "projects", "title": "Projects", "color": "#ff00ff",
             "position": [40, 0, 0], "modelType": "default",
             "items": [{"title": "Rover", "linkText": "Repo", "techStack": ["Rust"]}]}
        ]"##;
        let zones = parse_zones(json).expect("parse");
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].position, Vec3::new(40.0, 0.0, 0.0));
        assert_eq!(zones[0].model_type.as_deref(), Some("default"));
        assert_eq!(zones[0].items[0].link_text.as_deref(), Some("Repo"));
        assert_eq!(zones[0].items[0].tech_stack, vec!["Rust".to_string()]);
    }

    #[test]
    fn keeps_links_and_media_fields() {
        let json = r##"[
            {"id": "summary", "title": "Profile", "position": [0, 0, -40],
             "items": [{"title": "Engineer",
                        "softSkills": ["mentoring"],
                        "socials": [{"name": "Code", "url": "https://example.com/u", "icon": "git"}],
                        "image": "img/rover.png",
                        "githubUrl": "https://example.com/u/rover",
                        "markdownFile": "content/rover.md"}]}
        ]"##;
        let zones = parse_zones(json).expect("parse");
        let item = &zones[0].items[0];
        assert_eq!(item.soft_skills, vec!["mentoring".to_string()]);
        assert_eq!(
            item.socials,
            vec![SocialLink {
                name: "Code".into(),
                url: "https://example.com/u".into(),
                icon: "git".into(),
            }]
        );
        assert_eq!(item.image.as_deref(), Some("img/rover.png"));
        assert_eq!(item.github_url.as_deref(), Some("https://example.com/u/rover"));
        assert_eq!(item.markdown_file.as_deref(), Some("content/rover.md"));
    }

    #[test]
    fn rejects_duplicates_and_empty() {
        let a = ZoneDescriptor::new("a", "A", Vec3::ZERO);
        assert_eq!(validate_zones(&[]), Err(ZoneError::Empty));
        assert_eq!(
            validate_zones(&[a.clone(), a]),
            Err(ZoneError::DuplicateId("a".into()))
        );
        let bad = ZoneDescriptor::new("b", "B", Vec3::new(f32::NAN, 0.0, 0.0));
        assert_eq!(
            validate_zones(&[bad]),
            Err(ZoneError::NonFinitePosition("b".into()))
        );
    }
}
