//! Triangle-mesh terrain for arbitrary imported world geometry.
//!
//! Triangles are bucketed into a coarse XZ grid so vertical probes only test
//! the handful of triangles under the probe column. Non-vertical rays fall
//! back to a per-triangle AABB slab test. Back faces are culled by default,
//! matching how the renderer's picking treats single-sided materials.

use crate::{Aabb, RayHit, TerrainQuery};
use anyhow::{Result, ensure};
use glam::{Mat4, Vec3};
use smallvec::SmallVec;

const BUCKET_TARGET: usize = 64;

#[derive(Clone, Copy, Debug)]
struct Tri {
    a: Vec3,
    b: Vec3,
    c: Vec3,
    normal: Vec3,
    aabb: Aabb,
}

#[derive(Clone, Debug)]
pub struct TriMesh {
    tris: Vec<Tri>,
    bounds: Aabb,
    cells: usize,
    buckets: Vec<SmallVec<[u32; 8]>>,
    cull_backfaces: bool,
}

impl TriMesh {
    /// Build from indexed positions (three indices per triangle).
    pub fn from_indexed(positions: &[[f32; 3]], indices: &[u32]) -> Result<Self> {
        ensure!(
            indices.len().is_multiple_of(3),
            "indices not multiple of 3 ({})",
            indices.len()
        );
        ensure!(!indices.is_empty(), "mesh has no triangles");
        let mut tris = Vec::with_capacity(indices.len() / 3);
        for chunk in indices.chunks_exact(3) {
            let mut v = [Vec3::ZERO; 3];
            for (slot, &i) in v.iter_mut().zip(chunk) {
                let p = positions
                    .get(i as usize)
                    .ok_or_else(|| anyhow::anyhow!("index {i} out of range ({})", positions.len()))?;
                *slot = Vec3::from_array(*p);
            }
            if let Some(t) = Tri::new(v[0], v[1], v[2]) {
                tris.push(t);
            }
        }
        ensure!(!tris.is_empty(), "mesh has only degenerate triangles");
        Ok(Self::index(tris))
    }

    /// Build from an explicit triangle list.
    pub fn from_triangles(triangles: &[[Vec3; 3]]) -> Result<Self> {
        let tris: Vec<Tri> = triangles
            .iter()
            .filter_map(|t| Tri::new(t[0], t[1], t[2]))
            .collect();
        ensure!(!tris.is_empty(), "mesh has no usable triangles");
        Ok(Self::index(tris))
    }

    /// Return a copy with every vertex transformed (e.g. the import auto-scale).
    #[must_use]
    pub fn transformed(&self, m: Mat4) -> Self {
        let tris = self
            .tris
            .iter()
            .filter_map(|t| {
                Tri::new(
                    m.transform_point3(t.a),
                    m.transform_point3(t.b),
                    m.transform_point3(t.c),
                )
            })
            .collect();
        let mut out = Self::index(tris);
        out.cull_backfaces = self.cull_backfaces;
        out
    }

    /// Toggle back-face culling (default on).
    #[must_use]
    pub fn with_backface_culling(mut self, on: bool) -> Self {
        self.cull_backfaces = on;
        self
    }

    #[must_use]
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.tris.len()
    }

    fn index(tris: Vec<Tri>) -> Self {
        let bounds = tris
            .iter()
            .fold(Aabb::EMPTY, |acc, t| acc.union(t.aabb))
            .expand(1e-4);
        let cells = ((tris.len() / BUCKET_TARGET) as f32).sqrt().ceil().max(1.0) as usize;
        let mut buckets = vec![SmallVec::new(); cells * cells];
        let mut mesh = Self {
            tris: Vec::new(),
            bounds,
            cells,
            buckets: Vec::new(),
            cull_backfaces: true,
        };
        for (i, t) in tris.iter().enumerate() {
            let (x0, z0) = mesh.cell_of(t.aabb.min.x, t.aabb.min.z);
            let (x1, z1) = mesh.cell_of(t.aabb.max.x, t.aabb.max.z);
            for cz in z0..=z1 {
                for cx in x0..=x1 {
                    buckets[cz * cells + cx].push(i as u32);
                }
            }
        }
        mesh.tris = tris;
        mesh.buckets = buckets;
        mesh
    }

    fn cell_of(&self, x: f32, z: f32) -> (usize, usize) {
        let span = self.bounds.max - self.bounds.min;
        let fx = ((x - self.bounds.min.x) / span.x.max(1e-6)).clamp(0.0, 1.0);
        let fz = ((z - self.bounds.min.z) / span.z.max(1e-6)).clamp(0.0, 1.0);
        let last = self.cells - 1;
        (
            ((fx * self.cells as f32) as usize).min(last),
            ((fz * self.cells as f32) as usize).min(last),
        )
    }

    fn nearest<'a>(&self, origin: Vec3, dir: Vec3, candidates: impl Iterator<Item = &'a Tri>) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;
        for t in candidates {
            if let Some(d) = t.intersect(origin, dir, self.cull_backfaces) {
                if best.is_none_or(|b| d < b.distance) {
                    best = Some(RayHit {
                        point: origin + dir * d,
                        normal: t.normal,
                        distance: d,
                    });
                }
            }
        }
        best
    }
}

impl TerrainQuery for TriMesh {
    fn raycast(&self, origin: Vec3, direction: Vec3) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO || !origin.is_finite() {
            return None;
        }
        self.bounds.ray_entry(origin, dir)?;
        let vertical = dir.x.abs() < 1e-6 && dir.z.abs() < 1e-6;
        if vertical {
            if !self.bounds.contains_xz(origin.x, origin.z) {
                return None;
            }
            let (cx, cz) = self.cell_of(origin.x, origin.z);
            let bucket = &self.buckets[cz * self.cells + cx];
            return self.nearest(origin, dir, bucket.iter().map(|&i| &self.tris[i as usize]));
        }
        self.nearest(
            origin,
            dir,
            self.tris
                .iter()
                .filter(|t| t.aabb.expand(1e-4).ray_entry(origin, dir).is_some()),
        )
    }
}

impl Tri {
    fn new(a: Vec3, b: Vec3, c: Vec3) -> Option<Self> {
        let n = (b - a).cross(c - a);
        if n.length_squared() < 1e-12 || !n.is_finite() {
            return None;
        }
        Some(Self {
            a,
            b,
            c,
            normal: n.normalize(),
            aabb: Aabb::from_points(&[a, b, c]),
        })
    }

    /// Möller–Trumbore; returns hit distance along `dir`.
    fn intersect(&self, origin: Vec3, dir: Vec3, cull_backfaces: bool) -> Option<f32> {
        let e1 = self.b - self.a;
        let e2 = self.c - self.a;
        let p = dir.cross(e2);
        let det = e1.dot(p);
        if cull_backfaces {
            if det < 1e-9 {
                return None;
            }
        } else if det.abs() < 1e-9 {
            return None;
        }
        let inv = 1.0 / det;
        let s = origin - self.a;
        let u = s.dot(p) * inv;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(e1);
        let v = dir.dot(q) * inv;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = e2.dot(q) * inv;
        (t >= 0.0).then_some(t)
    }
}
