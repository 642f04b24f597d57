//! collision_static: read-only terrain query surfaces for ground probing.
//!
//! The locomotion controller never sees scene geometry directly. It asks a
//! [`TerrainQuery`] for the nearest surface along a ray and classifies the
//! answer itself (ground, wall, airborne). Surfaces provided here:
//! - [`FlatGround`]: infinite horizontal plane (tests, fallback floor).
//! - [`HeightField`]: regular grid of heights with bilinear sampling.
//! - [`TriMesh`]: arbitrary imported triangle soup with an XZ bucket index.
//!
//! A terrain that is still loading is modelled as `Option<T>`: `None` answers
//! every query with "no hit", so callers free-fall instead of failing.

use glam::Vec3;

pub mod heightfield;
pub mod mesh;

pub use heightfield::HeightField;
pub use mesh::TriMesh;

/// Straight down, the only direction the controller probes with.
pub const DOWN: Vec3 = Vec3::NEG_Y;

/// Nearest surface intersection along a ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    /// Unit surface normal at `point`.
    pub normal: Vec3,
    /// Distance from the ray origin to `point`.
    pub distance: f32,
}

/// Terrain query capability injected into the simulation.
pub trait TerrainQuery {
    /// Cast a ray from `origin` along `direction` and return the nearest hit.
    fn raycast(&self, origin: Vec3, direction: Vec3) -> Option<RayHit>;

    /// Convenience: probe straight down from `origin`.
    fn probe_down(&self, origin: Vec3) -> Option<RayHit> {
        self.raycast(origin, DOWN)
    }
}

impl<T: TerrainQuery + ?Sized> TerrainQuery for &T {
    fn raycast(&self, origin: Vec3, direction: Vec3) -> Option<RayHit> {
        (**self).raycast(origin, direction)
    }
}

impl<T: TerrainQuery + ?Sized> TerrainQuery for Box<T> {
    fn raycast(&self, origin: Vec3, direction: Vec3) -> Option<RayHit> {
        (**self).raycast(origin, direction)
    }
}

/// Pending terrain: `None` until the world geometry has been loaded.
impl<T: TerrainQuery> TerrainQuery for Option<T> {
    fn raycast(&self, origin: Vec3, direction: Vec3) -> Option<RayHit> {
        self.as_ref().and_then(|t| t.raycast(origin, direction))
    }
}

/// Infinite horizontal plane at `height` with an up normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlatGround {
    pub height: f32,
}

impl FlatGround {
    #[must_use]
    pub fn new(height: f32) -> Self {
        Self { height }
    }
}

impl Default for FlatGround {
    fn default() -> Self {
        Self { height: 0.0 }
    }
}

impl TerrainQuery for FlatGround {
    fn raycast(&self, origin: Vec3, direction: Vec3) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        // Only front-face hits: the ray must travel downward and start above.
        if dir.y >= -1e-6 || origin.y < self.height {
            return None;
        }
        let t = (self.height - origin.y) / dir.y;
        let point = origin + dir * t;
        Some(RayHit {
            point,
            normal: Vec3::Y,
            distance: t,
        })
    }
}

/// Axis-aligned bounds used by the mesh broadphase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Self {
        points.iter().fold(Self::EMPTY, |acc, p| acc.grow(*p))
    }

    #[must_use]
    pub fn grow(self, p: Vec3) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    #[must_use]
    pub fn union(self, other: Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[must_use]
    pub fn expand(self, eps: f32) -> Self {
        Self {
            min: self.min - Vec3::splat(eps),
            max: self.max + Vec3::splat(eps),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    #[must_use]
    pub fn contains_xz(&self, x: f32, z: f32) -> bool {
        x >= self.min.x && x <= self.max.x && z >= self.min.z && z <= self.max.z
    }

    /// Slab test; returns the entry distance when the ray overlaps the box.
    #[must_use]
    pub fn ray_entry(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        let mut t_min = 0.0f32;
        let mut t_max = f32::INFINITY;
        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d.abs() < 1e-9 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }
}
