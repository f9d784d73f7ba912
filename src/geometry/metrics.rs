// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 cpgrid developers

//! Grid-wide geometric summary

use serde::{Deserialize, Serialize};

use super::BoundingBox;
use crate::grid::Grid;
use crate::utils::math::{angle_difference, mean_angle_degrees};

/// Classification of how uniform the cells of a grid are
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Regularity {
    /// Equal cell sizes, I axis along X
    Regular,
    /// Equal cell sizes, I axis rotated in the XY plane
    RotatedRegular,
    /// Varying cell sizes or rotation, or degenerate cells present
    Irregular,
}

impl Regularity {
    /// Numeric flag: 1 regular, 2 rotated regular, 0 irregular
    pub fn flag(&self) -> i32 {
        match self {
            Regularity::Regular => 1,
            Regularity::RotatedRegular => 2,
            Regularity::Irregular => 0,
        }
    }
}

/// Summary returned by [`Grid::geometrics`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridGeometrics {
    pub xori: f64,
    pub yori: f64,
    pub zori: f64,
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub zmin: f64,
    pub zmax: f64,
    /// Mean direction of the I axis, degrees counter-clockwise from X
    pub avg_rotation: f64,
    pub avg_dx: f64,
    pub avg_dy: f64,
    pub avg_dz: f64,
    pub regularity: Regularity,
    /// Cells that went into the averages
    pub cells_used: usize,
    /// Cells skipped for undefined corners or near-zero thickness
    pub degenerate_cells: usize,
}

impl GridGeometrics {
    /// Look up a value by its key name, e.g. `"avg_dz"`
    pub fn get(&self, key: &str) -> Option<f64> {
        let value = match key {
            "xori" => self.xori,
            "yori" => self.yori,
            "zori" => self.zori,
            "xmin" => self.xmin,
            "xmax" => self.xmax,
            "ymin" => self.ymin,
            "ymax" => self.ymax,
            "zmin" => self.zmin,
            "zmax" => self.zmax,
            "avg_rotation" => self.avg_rotation,
            "avg_dx" => self.avg_dx,
            "avg_dy" => self.avg_dy,
            "avg_dz" => self.avg_dz,
            "grid_regularity_flag" => f64::from(self.regularity.flag()),
            _ => return None,
        };
        Some(value)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(
            nalgebra::Point3::new(self.xmin, self.ymin, self.zmin),
            nalgebra::Point3::new(self.xmax, self.ymax, self.zmax),
        )
    }
}

#[derive(Default)]
struct Spread {
    sum: f64,
    min: f64,
    max: f64,
    count: usize,
}

impl Spread {
    fn push(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self, undef: f64) -> f64 {
        if self.count == 0 {
            undef
        } else {
            self.sum / self.count as f64
        }
    }

    fn is_uniform(&self, tolerance: f64) -> bool {
        self.max - self.min <= tolerance * self.mean(0.0).abs().max(1.0)
    }
}

impl Grid {
    /// Origin, bounding box, mean cell sizes, mean rotation and regularity.
    ///
    /// `all_cells = false` restricts the statistics to active cells. The
    /// bounding box is built from cell centres when `cell_center` is set,
    /// otherwise from all corners. The origin is always cell (1, 1, 1).
    pub fn geometrics(&self, all_cells: bool, cell_center: bool) -> GridGeometrics {
        let config = *self.config();
        let undef = config.undef;

        let first = self.corners0(0, 0, 0);
        let origin = if cell_center {
            first.center(&config)
        } else {
            first.points[0]
        };

        let mut bbox = BoundingBox::empty();
        let mut dx = Spread::default();
        let mut dy = Spread::default();
        let mut dz = Spread::default();
        let mut rotations = Vec::new();
        let mut degenerate = 0;

        let actnum = self.actnum();
        for index in 0..self.ntotal() {
            if !all_cells && actnum[index] == 0 {
                continue;
            }
            let (i, j, k) = self.store().ijk0(index);
            let corners = self.corners0(i, j, k);

            if corners.is_defined(&config) {
                if cell_center {
                    bbox.expand_to_include(&corners.center(&config));
                } else {
                    for point in &corners.points {
                        bbox.expand_to_include(point);
                    }
                }
            }

            let thickness = self.dz0(i, j, k, true);
            if !corners.is_defined(&config)
                || config.is_undef(thickness)
                || thickness.abs() <= config.depth_tolerance
            {
                degenerate += 1;
                continue;
            }

            let (cell_dx, cell_dy) = self.dxdy0(i, j, k);
            dx.push(cell_dx);
            dy.push(cell_dy);
            dz.push(thickness);
            rotations.push(self.rotation0(&corners));
        }

        let avg_rotation = mean_angle_degrees(&rotations).unwrap_or(0.0);
        let regularity = classify(
            &[&dx, &dy, &dz],
            &rotations,
            avg_rotation,
            degenerate,
            config.regularity_tolerance,
        );

        let (min, max) = if bbox.is_empty() {
            (
                nalgebra::Point3::new(undef, undef, undef),
                nalgebra::Point3::new(undef, undef, undef),
            )
        } else {
            (bbox.min, bbox.max)
        };

        log::info!(
            "Cell geometrics done: {} cells used, {} degenerate",
            dz.count,
            degenerate
        );

        GridGeometrics {
            xori: origin.x,
            yori: origin.y,
            zori: origin.z,
            xmin: min.x,
            xmax: max.x,
            ymin: min.y,
            ymax: max.y,
            zmin: min.z,
            zmax: max.z,
            avg_rotation,
            avg_dx: dx.mean(undef),
            avg_dy: dy.mean(undef),
            avg_dz: dz.mean(undef),
            regularity,
            cells_used: dz.count,
            degenerate_cells: degenerate,
        }
    }
}

fn classify(
    sizes: &[&Spread],
    rotations: &[f64],
    avg_rotation: f64,
    degenerate: usize,
    tolerance: f64,
) -> Regularity {
    if degenerate > 0 || rotations.is_empty() {
        return Regularity::Irregular;
    }

    let angle_tolerance = tolerance * 360.0;
    let uniform_sizes = sizes.iter().all(|spread| spread.is_uniform(tolerance));
    let uniform_rotation = rotations
        .iter()
        .all(|&r| angle_difference(r, avg_rotation) <= angle_tolerance);

    if !(uniform_sizes && uniform_rotation) {
        Regularity::Irregular
    } else if angle_difference(avg_rotation, 0.0) <= angle_tolerance {
        Regularity::Regular
    } else {
        Regularity::RotatedRegular
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};

    #[test]
    fn test_default_grid_geometrics() {
        let grid = Grid::default();
        let geo = grid.geometrics(true, true);

        assert_relative_eq!(geo.xori, 0.5);
        assert_relative_eq!(geo.yori, 0.5);
        assert_relative_eq!(geo.zori, 0.5);
        assert_relative_eq!(geo.xmin, 0.5);
        assert_relative_eq!(geo.xmax, 3.5);
        assert_relative_eq!(geo.ymax, 2.5);
        assert_relative_eq!(geo.zmax, 4.5);
        assert_relative_eq!(geo.avg_dx, 1.0);
        assert_relative_eq!(geo.avg_dy, 1.0);
        assert_relative_eq!(geo.avg_dz, 1.0);
        assert_relative_eq!(geo.avg_rotation, 0.0);
        assert_eq!(geo.regularity, Regularity::Regular);
        assert_eq!(geo.cells_used, 60);
        assert_eq!(geo.get("avg_dz"), Some(1.0));
        assert_eq!(geo.get("grid_regularity_flag"), Some(1.0));
        assert_eq!(geo.get("nonsense"), None);
    }

    #[test]
    fn test_corner_bounding_box() {
        let grid =
            Grid::create_box((2, 2, 2), Point3::new(10.0, 20.0, 1000.0), Vector3::new(100.0, 100.0, 10.0))
                .unwrap();
        let geo = grid.geometrics(true, false);
        assert_relative_eq!(geo.xori, 10.0);
        assert_relative_eq!(geo.zori, 1000.0);
        assert_relative_eq!(geo.xmax, 210.0);
        assert_relative_eq!(geo.ymax, 220.0);
        assert_relative_eq!(geo.zmax, 1020.0);
    }

    #[test]
    fn test_active_only_excludes_inactive_cells() {
        let mut grid = Grid::default();
        let mut actnum = vec![0; 60];
        actnum[0] = 1;
        grid.set_actnum(actnum).unwrap();

        let geo = grid.geometrics(false, true);
        assert_eq!(geo.cells_used, 1);
        assert_relative_eq!(geo.xmax, 0.5);
    }

    #[test]
    fn test_varying_thickness_is_irregular() {
        let mut grid = Grid::default();
        for j in 1..=3 {
            for i in 1..=4 {
                grid.set_corner_depths(i, j, 5, [3.5; 4]).unwrap();
            }
        }
        let geo = grid.geometrics(true, true);
        assert_eq!(geo.degenerate_cells, 0);
        assert_eq!(geo.regularity, Regularity::Irregular);
    }

    #[test]
    fn test_rotated_grid_is_rotated_regular() {
        let grid = Grid::default();
        let angle = 30.0_f64.to_radians();
        let (sin, cos) = angle.sin_cos();
        let coord: Vec<f64> = grid
            .coord()
            .chunks(3)
            .flat_map(|p| [p[0] * cos - p[1] * sin, p[0] * sin + p[1] * cos, p[2]])
            .collect();
        let rotated = Grid::from_arrays(
            4,
            3,
            5,
            coord,
            grid.zcorn().to_vec(),
            grid.actnum().to_vec(),
        )
        .unwrap();

        let geo = rotated.geometrics(true, true);
        assert_relative_eq!(geo.avg_rotation, 30.0, epsilon = 1e-9);
        assert_relative_eq!(geo.avg_dx, 1.0, epsilon = 1e-9);
        assert_eq!(geo.regularity, Regularity::RotatedRegular);
    }

    #[test]
    fn test_degenerate_cells_excluded_from_averages() {
        let mut grid = Grid::default();
        // collapse layer 5 to zero thickness
        for j in 1..=3 {
            for i in 1..=4 {
                grid.set_corner_depths(i, j, 6, [4.0; 4]).unwrap();
            }
        }
        let geo = grid.geometrics(true, true);
        assert_eq!(geo.degenerate_cells, 12);
        assert_eq!(geo.cells_used, 48);
        assert_relative_eq!(geo.avg_dz, 1.0);
        assert_eq!(geo.regularity, Regularity::Irregular);
    }
}
