// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 cpgrid developers

//! Cell geometry: corners, centres and cell dimensions
//!
//! Corner numbering, 0-based, seen from above:
//!
//! ```text
//!   2 ------- 3        6 ------- 7
//!   |   top   |        |  base   |
//!   0 ------- 1        4 ------- 5
//! ```
//!
//! I grows from 0 to 1, J grows from 0 to 2.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use super::pillar::point_at_depth;
use super::BoundingBox;
use crate::config::GeometryConfig;
use crate::error::Result;
use crate::grid::Grid;
use crate::utils::map_cells;
use crate::utils::math::{normalize_degrees, rad_to_deg};

/// The eight corners of one cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellCorners {
    pub points: [Point3<f64>; 8],
}

impl CellCorners {
    pub fn top(&self) -> &[Point3<f64>] {
        &self.points[..4]
    }

    pub fn base(&self) -> &[Point3<f64>] {
        &self.points[4..]
    }

    /// False if any corner carries the undefined sentinel
    pub fn is_defined(&self, config: &GeometryConfig) -> bool {
        self.points
            .iter()
            .all(|p| !(config.is_undef(p.x) || config.is_undef(p.y) || config.is_undef(p.z)))
    }

    /// Mean of the eight corners, or the undefined point
    pub fn center(&self, config: &GeometryConfig) -> Point3<f64> {
        if !self.is_defined(config) {
            return undef_point(config);
        }
        let sum = self
            .points
            .iter()
            .fold(nalgebra::Vector3::zeros(), |acc, p| acc + p.coords);
        Point3::from(sum / 8.0)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(self.points.iter())
    }

    /// `[x0, y0, z0, x1, y1, z1, ..., x7, y7, z7]`
    pub fn to_flat(&self) -> [f64; 24] {
        let mut flat = [0.0; 24];
        for (n, p) in self.points.iter().enumerate() {
            flat[n * 3] = p.x;
            flat[n * 3 + 1] = p.y;
            flat[n * 3 + 2] = p.z;
        }
        flat
    }
}

pub(crate) fn undef_point(config: &GeometryConfig) -> Point3<f64> {
    Point3::new(config.undef, config.undef, config.undef)
}

impl Grid {
    /// Corners of cell `(i, j, k)`, 1-based.
    ///
    /// With `active_only` an inactive cell yields `None`. Otherwise corners
    /// are always returned; a corner whose depth falls outside its pillar
    /// is the undefined point.
    pub fn cell_corners(
        &self,
        i: usize,
        j: usize,
        k: usize,
        active_only: bool,
    ) -> Result<Option<CellCorners>> {
        let index = self.cell_index(i, j, k)?;
        if active_only && self.actnum()[index] == 0 {
            return Ok(None);
        }
        Ok(Some(self.corners0(i - 1, j - 1, k - 1)))
    }

    /// Centre of cell `(i, j, k)`, 1-based; `None` for a masked inactive cell
    pub fn cell_center(
        &self,
        i: usize,
        j: usize,
        k: usize,
        active_only: bool,
    ) -> Result<Option<Point3<f64>>> {
        Ok(self
            .cell_corners(i, j, k, active_only)?
            .map(|corners| corners.center(self.config())))
    }

    /// Mean thickness of cell `(i, j, k)` along its four pillars.
    ///
    /// `flip = true` gives `base - top`, `flip = false` negates it. Masked
    /// inactive cells and undefined depths give the undefined sentinel.
    pub fn cell_dz(&self, i: usize, j: usize, k: usize, flip: bool, active_only: bool) -> Result<f64> {
        let index = self.cell_index(i, j, k)?;
        if active_only && self.actnum()[index] == 0 {
            return Ok(self.undef());
        }
        Ok(self.dz0(i - 1, j - 1, k - 1, flip))
    }

    /// Mean XY length of the cell's four I-direction edges
    pub fn cell_dx(&self, i: usize, j: usize, k: usize) -> Result<f64> {
        self.cell_index(i, j, k)?;
        Ok(self.dxdy0(i - 1, j - 1, k - 1).0)
    }

    /// Mean XY length of the cell's four J-direction edges
    pub fn cell_dy(&self, i: usize, j: usize, k: usize) -> Result<f64> {
        self.cell_index(i, j, k)?;
        Ok(self.dxdy0(i - 1, j - 1, k - 1).1)
    }

    /// Centres of all cells in linear order; masked cells get the undefined point
    pub fn cell_centers(&self, active_only: bool) -> Vec<Point3<f64>> {
        let config = *self.config();
        let actnum = self.actnum();
        map_cells(self.ntotal(), |index| {
            if active_only && actnum[index] == 0 {
                return undef_point(&config);
            }
            let (i, j, k) = self.store().ijk0(index);
            self.corners0(i, j, k).center(&config)
        })
    }

    pub(crate) fn corners0(&self, i: usize, j: usize, k: usize) -> CellCorners {
        let store = self.store();
        let config = self.config();
        let pillars = [
            store.pillar0(i, j),
            store.pillar0(i + 1, j),
            store.pillar0(i, j + 1),
            store.pillar0(i + 1, j + 1),
        ];
        let top = store.depths0(i, j, k);
        let base = store.depths0(i, j, k + 1);

        let mut points = [undef_point(config); 8];
        for c in 0..4 {
            if let Some(p) = point_at_depth(&pillars[c], top[c], config) {
                points[c] = p;
            }
            if let Some(p) = point_at_depth(&pillars[c], base[c], config) {
                points[c + 4] = p;
            }
        }
        CellCorners { points }
    }

    pub(crate) fn dz0(&self, i: usize, j: usize, k: usize, flip: bool) -> f64 {
        let config = self.config();
        let top = self.store().depths0(i, j, k);
        let base = self.store().depths0(i, j, k + 1);
        if top.iter().chain(base.iter()).any(|&z| config.is_undef(z)) {
            return config.undef;
        }
        let sign = if flip { 1.0 } else { -1.0 };
        let mean = top.iter().zip(base.iter()).map(|(t, b)| b - t).sum::<f64>() / 4.0;
        sign * mean
    }

    pub(crate) fn dxdy0(&self, i: usize, j: usize, k: usize) -> (f64, f64) {
        let config = self.config();
        let corners = self.corners0(i, j, k);
        if !corners.is_defined(config) {
            return (config.undef, config.undef);
        }
        let p = &corners.points;
        let xy = |a: usize, b: usize| ((p[b].x - p[a].x).powi(2) + (p[b].y - p[a].y).powi(2)).sqrt();
        let dx = (xy(0, 1) + xy(2, 3) + xy(4, 5) + xy(6, 7)) / 4.0;
        let dy = (xy(0, 2) + xy(1, 3) + xy(4, 6) + xy(5, 7)) / 4.0;
        (dx, dy)
    }

    /// Direction of the cell's I axis in the XY plane, degrees in `[0, 360)`
    pub(crate) fn rotation0(&self, corners: &CellCorners) -> f64 {
        let p = &corners.points;
        let west = (p[0].coords + p[2].coords + p[4].coords + p[6].coords) / 4.0;
        let east = (p[1].coords + p[3].coords + p[5].coords + p[7].coords) / 4.0;
        let axis = east - west;
        normalize_degrees(rad_to_deg(axis.y.atan2(axis.x)))
    }
}
