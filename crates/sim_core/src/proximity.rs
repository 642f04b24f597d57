//! Nearest-zone detection.

use data_runtime::zone::ZoneDescriptor;
use glam::{Vec3, Vec3Swizzles};
use serde::{Deserialize, Serialize};

/// How distance to a zone marker is measured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Ground-plane distance (XZ); avatar height does not matter.
    #[default]
    Planar,
    /// Full 3D Euclidean distance.
    Spatial,
}

impl DistanceMetric {
    #[must_use]
    pub fn distance(self, a: Vec3, b: Vec3) -> f32 {
        match self {
            Self::Planar => a.xz().distance(b.xz()),
            Self::Spatial => a.distance(b),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProximityCfg {
    /// Inclusive activation radius.
    pub radius: f32,
    pub metric: DistanceMetric,
}

impl Default for ProximityCfg {
    fn default() -> Self {
        Self {
            radius: data_runtime::configs::avatar::DEFAULT_ACTIVATION_RADIUS,
            metric: DistanceMetric::Planar,
        }
    }
}

/// Index of the closest zone within the radius, if any.
///
/// Linear scan; on equal distances the earlier zone wins.
#[must_use]
pub fn nearest_zone(position: Vec3, zones: &[ZoneDescriptor], cfg: &ProximityCfg) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, z) in zones.iter().enumerate() {
        let d = cfg.metric.distance(position, z.position);
        if d <= cfg.radius && best.is_none_or(|(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}
