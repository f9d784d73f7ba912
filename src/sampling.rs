// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 cpgrid developers

//! Locating points in the grid

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, CellCorners};
use crate::grid::Grid;

/// The cell found for one sample point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellSample {
    /// 1-based cell indices
    pub i: usize,
    pub j: usize,
    pub k: usize,
    /// 0-based linear index
    pub index: usize,
    pub active: bool,
    /// Whether the point lies within the cell's corner bounding box
    pub inside: bool,
    /// Distance from the point to the cell centre
    pub distance: f64,
}

impl Grid {
    /// Find the cell containing each point.
    ///
    /// Columns are screened by the bounding box of all their corners, then
    /// the layers of each candidate column are tested against the cell's
    /// corner bounding box. When several cells contain the point, cells with
    /// thickness win over collapsed ones and then the nearest centre wins.
    /// A point contained by no cell falls back to the cell with the nearest
    /// centre, reported with `inside = false`.
    ///
    /// Cells with undefined corners are never chosen, active or not. A point
    /// with an undefined coordinate, or a grid with no defined cells, gives
    /// `None`.
    pub fn sample_points(&self, points: &[Point3<f64>]) -> Vec<Option<CellSample>> {
        let config = *self.config();
        let (ncol, _, nlay) = self.dimensions();
        let columns = self.column_boxes();
        let mut centers: Option<Vec<(usize, Point3<f64>)>> = None;
        log::debug!("Sampling {} points in {} columns", points.len(), columns.len());

        points
            .iter()
            .map(|point| {
                if [point.x, point.y, point.z].iter().any(|&v| config.is_undef(v)) {
                    return None;
                }

                let mut best: Option<(bool, f64, usize)> = None;
                for (column, bbox) in columns.iter().enumerate() {
                    if !bbox.contains(point, config.depth_tolerance) {
                        continue;
                    }
                    let (i, j) = (column % ncol, column / ncol);
                    for k in 0..nlay {
                        let corners = self.corners0(i, j, k);
                        if !corners.is_defined(&config)
                            || !corners.bounding_box().contains(point, config.depth_tolerance)
                        {
                            continue;
                        }
                        let collapsed = self.dz0(i, j, k, true).abs() <= config.depth_tolerance;
                        let distance = nalgebra::distance(&corners.center(&config), point);
                        let better = match best {
                            None => true,
                            Some((c, d, _)) => (collapsed, distance) < (c, d),
                        };
                        if better {
                            best = Some((collapsed, distance, self.store().index0(i, j, k)));
                        }
                    }
                }

                let (index, distance, inside) = match best {
                    Some((_, distance, index)) => (index, distance, true),
                    None => {
                        let centers = centers.get_or_insert_with(|| self.defined_centers());
                        let (index, center) = centers.iter().min_by(|a, b| {
                            nalgebra::distance_squared(&a.1, point)
                                .total_cmp(&nalgebra::distance_squared(&b.1, point))
                        })?;
                        (*index, nalgebra::distance(center, point), false)
                    }
                };

                let (i, j, k) = self.store().ijk0(index);
                Some(CellSample {
                    i: i + 1,
                    j: j + 1,
                    k: k + 1,
                    index,
                    active: self.actnum()[index] == 1,
                    inside,
                    distance,
                })
            })
            .collect()
    }

    /// Bounding box of the defined corners of every column, in column order
    fn column_boxes(&self) -> Vec<BoundingBox> {
        let config = *self.config();
        let (ncol, nrow, nlay) = self.dimensions();
        let mut boxes = vec![BoundingBox::empty(); ncol * nrow];
        for k in 0..nlay {
            for j in 0..nrow {
                for i in 0..ncol {
                    let corners: CellCorners = self.corners0(i, j, k);
                    if corners.is_defined(&config) {
                        for p in &corners.points {
                            boxes[j * ncol + i].expand_to_include(p);
                        }
                    }
                }
            }
        }
        boxes
    }

    fn defined_centers(&self) -> Vec<(usize, Point3<f64>)> {
        let config = *self.config();
        self.cell_centers(false)
            .into_iter()
            .enumerate()
            .filter(|(_, c)| !config.is_undef(c.x))
            .collect()
    }
}
