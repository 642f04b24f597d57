//! Regular-grid heightfield terrain.
//!
//! Heights are stored row-major (`z` rows, `x` columns) over a square spanning
//! `[-extent, +extent]` on X and Z. Sampling is bilinear for both height and
//! normal. Outside the grid there is no terrain, so probes miss.

use crate::{RayHit, TerrainQuery};
use anyhow::{Result, ensure};
use glam::{Vec2, Vec3};

#[derive(Clone, Debug)]
pub struct HeightField {
    size: usize,
    extent: f32,
    heights: Vec<f32>,
    normals: Vec<[f32; 3]>,
}

impl HeightField {
    /// Build from `size * size` row-major heights.
    pub fn from_heights(size: usize, extent: f32, heights: Vec<f32>) -> Result<Self> {
        ensure!(size >= 2, "heightfield needs at least 2x2 samples, got {size}");
        ensure!(
            extent.is_finite() && extent > 0.0,
            "heightfield extent must be positive, got {extent}"
        );
        ensure!(
            heights.len() == size * size,
            "heights len {} != {}x{}",
            heights.len(),
            size,
            size
        );
        ensure!(
            heights.iter().all(|h| h.is_finite()),
            "heightfield contains non-finite samples"
        );
        let normals = compute_normals(size, extent, &heights);
        Ok(Self {
            size,
            extent,
            heights,
            normals,
        })
    }

    /// Build by evaluating `f(x, z)` at every grid vertex.
    pub fn from_fn(size: usize, extent: f32, f: impl Fn(f32, f32) -> f32) -> Result<Self> {
        ensure!(size >= 2, "heightfield needs at least 2x2 samples, got {size}");
        let mut heights = Vec::with_capacity(size * size);
        for j in 0..size {
            for i in 0..size {
                let (x, z) = grid_to_world(size, extent, i, j);
                heights.push(f(x, z));
            }
        }
        Self::from_heights(size, extent, heights)
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn extent(&self) -> f32 {
        self.extent
    }

    #[must_use]
    pub fn contains_xz(&self, x: f32, z: f32) -> bool {
        x.abs() <= self.extent && z.abs() <= self.extent
    }

    /// Height and normal at world XZ. Coordinates are clamped to the grid.
    #[must_use]
    pub fn height_at(&self, x: f32, z: f32) -> (f32, Vec3) {
        self.sample(Vec2::new(x, z))
    }

    fn sample(&self, p: Vec2) -> (f32, Vec3) {
        let n = self.size as i32;
        let gx = ((p.x / self.extent) * 0.5 + 0.5) * (n as f32 - 1.0);
        let gz = ((p.y / self.extent) * 0.5 + 0.5) * (n as f32 - 1.0);
        let x0 = (gx.floor() as i32).clamp(0, n - 1);
        let z0 = (gz.floor() as i32).clamp(0, n - 1);
        let x1 = (x0 + 1).clamp(0, n - 1);
        let z1 = (z0 + 1).clamp(0, n - 1);
        let tx = (gx - x0 as f32).clamp(0.0, 1.0);
        let tz = (gz - z0 as f32).clamp(0.0, 1.0);
        let idx = |x: i32, z: i32| -> usize { (z as usize) * self.size + (x as usize) };
        let h00 = self.heights[idx(x0, z0)];
        let h10 = self.heights[idx(x1, z0)];
        let h01 = self.heights[idx(x0, z1)];
        let h11 = self.heights[idx(x1, z1)];
        let h0 = h00 * (1.0 - tx) + h10 * tx;
        let h1 = h01 * (1.0 - tx) + h11 * tx;
        let h = h0 * (1.0 - tz) + h1 * tz;
        let n00 = Vec3::from_array(self.normals[idx(x0, z0)]);
        let n10 = Vec3::from_array(self.normals[idx(x1, z0)]);
        let n01 = Vec3::from_array(self.normals[idx(x0, z1)]);
        let n11 = Vec3::from_array(self.normals[idx(x1, z1)]);
        let n0 = n00.lerp(n10, tx);
        let n1 = n01.lerp(n11, tx);
        let n = n0.lerp(n1, tz).normalize_or(Vec3::Y);
        (h, n)
    }

    fn cell_size(&self) -> f32 {
        (2.0 * self.extent) / (self.size as f32 - 1.0)
    }

    /// March a non-vertical ray in half-cell steps, then bisect the crossing.
    fn march(&self, origin: Vec3, dir: Vec3) -> Option<RayHit> {
        let step = self.cell_size() * 0.5;
        let max_t = self.extent * 4.0 + origin.y.abs();
        let above = |t: f32| -> Option<bool> {
            let p = origin + dir * t;
            if !self.contains_xz(p.x, p.z) {
                return None;
            }
            Some(p.y >= self.sample(Vec2::new(p.x, p.z)).0)
        };
        if above(0.0) != Some(true) {
            return None;
        }
        let mut t_prev = 0.0;
        let mut t = step;
        while t <= max_t {
            match above(t) {
                Some(true) => {
                    t_prev = t;
                    t += step;
                }
                Some(false) => {
                    let (mut lo, mut hi) = (t_prev, t);
                    for _ in 0..20 {
                        let mid = 0.5 * (lo + hi);
                        if above(mid) == Some(true) {
                            lo = mid;
                        } else {
                            hi = mid;
                        }
                    }
                    let p = origin + dir * hi;
                    let (h, normal) = self.sample(Vec2::new(p.x, p.z));
                    return Some(RayHit {
                        point: Vec3::new(p.x, h, p.z),
                        normal,
                        distance: hi,
                    });
                }
                None => return None,
            }
        }
        None
    }
}

impl TerrainQuery for HeightField {
    fn raycast(&self, origin: Vec3, direction: Vec3) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO || !origin.is_finite() {
            return None;
        }
        let vertical = dir.x.abs() < 1e-6 && dir.z.abs() < 1e-6;
        if !vertical {
            return self.march(origin, dir);
        }
        if dir.y > 0.0 || !self.contains_xz(origin.x, origin.z) {
            return None;
        }
        let (h, normal) = self.sample(Vec2::new(origin.x, origin.z));
        if origin.y < h {
            return None;
        }
        Some(RayHit {
            point: Vec3::new(origin.x, h, origin.z),
            normal,
            distance: origin.y - h,
        })
    }
}

fn grid_to_world(size: usize, extent: f32, i: usize, j: usize) -> (f32, f32) {
    let x = ((i as f32) / (size as f32 - 1.0) * 2.0 - 1.0) * extent;
    let z = ((j as f32) / (size as f32 - 1.0) * 2.0 - 1.0) * extent;
    (x, z)
}

fn compute_normals(size: usize, extent: f32, h: &[f32]) -> Vec<[f32; 3]> {
    let step = (2.0 * extent) / (size as f32 - 1.0);
    let mut nrm = vec![[0.0; 3]; size * size];
    let idx = |i: isize, j: isize| -> usize {
        let ii = i.clamp(0, (size - 1) as isize) as usize;
        let jj = j.clamp(0, (size - 1) as isize) as usize;
        jj * size + ii
    };
    for j in 0..size as isize {
        for i in 0..size as isize {
            let sx = (h[idx(i + 1, j)] - h[idx(i - 1, j)]) / (2.0 * step);
            let sz = (h[idx(i, j + 1)] - h[idx(i, j - 1)]) / (2.0 * step);
            let n = Vec3::new(-sx, 1.0, -sz).normalize();
            nrm[(j as usize) * size + (i as usize)] = [n.x, n.y, n.z];
        }
    }
    nrm
}
