// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 cpgrid developers

//! Deactivation of cells inside or outside XY polygons

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::grid::Grid;

const CLOSE_EPSILON: f64 = 1e-9;

/// A polygon in the XY plane; closed when the last point repeats the first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    points: Vec<Point2<f64>>,
}

impl Polygon {
    pub fn new(points: Vec<Point2<f64>>) -> Self {
        Self { points }
    }

    pub fn from_xy(points: &[(f64, f64)]) -> Self {
        Self::new(points.iter().map(|&(x, y)| Point2::new(x, y)).collect())
    }

    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() > 1 => {
                (first - last).norm() <= CLOSE_EPSILON
            }
            _ => false,
        }
    }

    /// Even-odd test of `(x, y)` against the ring
    pub fn contains(&self, x: f64, y: f64) -> bool {
        point_in_ring(&ring(&self.points), x, y)
    }
}

/// Why a polygon was left out of a deactivation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolygonIssue {
    /// Not closed and closing was not requested
    Open { polygon: usize },
    /// Fewer than three distinct vertices
    TooFewPoints { polygon: usize, count: usize },
    /// Two non-adjacent edges cross
    SelfIntersecting { polygon: usize },
}

/// Outcome of a polygon deactivation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolygonReport {
    /// Polygons that were used for the test
    pub polygons_used: usize,
    /// Cells that went from active to inactive
    pub deactivated: usize,
    /// Polygons that were skipped
    pub issues: Vec<PolygonIssue>,
}

impl PolygonReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl Grid {
    /// Deactivate cells whose centre lies inside (or, with `inside = false`,
    /// outside) any of the polygons, within the 1-based inclusive layer range
    /// (all layers when `None`).
    ///
    /// Malformed polygons are skipped and listed in the report. With
    /// `inside = false` and no usable polygon, every cell in the range is
    /// outside and is deactivated. A cell with undefined corners is placed
    /// at the mean top XY of its four pillars.
    pub fn deactivate_by_polygon(
        &mut self,
        polygons: &[Polygon],
        layer_range: Option<(usize, usize)>,
        inside: bool,
        force_close: bool,
    ) -> Result<PolygonReport> {
        let (k1, k2) = self.checked_layer_range(layer_range)?;

        let mut report = PolygonReport::default();
        let mut rings = Vec::new();
        for (n, polygon) in polygons.iter().enumerate() {
            match prepare_ring(polygon, n, force_close) {
                Ok(r) => rings.push(r),
                Err(issue) => {
                    log::warn!("Skipping polygon {}: {:?}", n, issue);
                    report.issues.push(issue);
                }
            }
        }
        report.polygons_used = rings.len();

        let config = *self.config();
        let (ncol, nrow) = (self.ncol(), self.nrow());
        let mut actnum = self.actnum().to_vec();
        for k in (k1 - 1)..k2 {
            for j in 0..nrow {
                for i in 0..ncol {
                    let index = self.store().index0(i, j, k);
                    if actnum[index] == 0 {
                        continue;
                    }
                    let corners = self.corners0(i, j, k);
                    let (x, y) = if corners.is_defined(&config) {
                        let center = corners.center(&config);
                        (center.x, center.y)
                    } else {
                        self.column_xy(i, j)
                    };
                    let in_any = rings.iter().any(|r| point_in_ring(r, x, y));
                    if in_any == inside {
                        actnum[index] = 0;
                        report.deactivated += 1;
                    }
                }
            }
        }

        self.commit_actnum(actnum);
        log::info!(
            "Polygon deactivation ({}) in layers {}..={}: {} cells deactivated using {} polygons",
            if inside { "inside" } else { "outside" },
            k1,
            k2,
            report.deactivated,
            report.polygons_used
        );
        Ok(report)
    }

    /// Deactivate cells inside the polygons
    pub fn deactivate_inside(
        &mut self,
        polygons: &[Polygon],
        layer_range: Option<(usize, usize)>,
        force_close: bool,
    ) -> Result<PolygonReport> {
        self.deactivate_by_polygon(polygons, layer_range, true, force_close)
    }

    /// Deactivate cells outside all the polygons
    pub fn deactivate_outside(
        &mut self,
        polygons: &[Polygon],
        layer_range: Option<(usize, usize)>,
        force_close: bool,
    ) -> Result<PolygonReport> {
        self.deactivate_by_polygon(polygons, layer_range, false, force_close)
    }

    fn column_xy(&self, i: usize, j: usize) -> (f64, f64) {
        let store = self.store();
        let pillars = [
            store.pillar0(i, j),
            store.pillar0(i + 1, j),
            store.pillar0(i, j + 1),
            store.pillar0(i + 1, j + 1),
        ];
        let x = pillars.iter().map(|p| p[0]).sum::<f64>() / 4.0;
        let y = pillars.iter().map(|p| p[1]).sum::<f64>() / 4.0;
        (x, y)
    }

    fn checked_layer_range(&self, layer_range: Option<(usize, usize)>) -> Result<(usize, usize)> {
        let nlay = self.nlay();
        let (k1, k2) = layer_range.unwrap_or((1, nlay));
        if k1 == 0 || k1 > nlay {
            return Err(GridError::index("K", k1, nlay));
        }
        if k2 == 0 || k2 > nlay {
            return Err(GridError::index("K", k2, nlay));
        }
        if k1 > k2 {
            return Err(GridError::invalid(format!(
                "layer range {}..={} is reversed",
                k1, k2
            )));
        }
        Ok((k1, k2))
    }
}

/// Vertices of the polygon without a repeated closing point
fn ring(points: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let mut ring = points.to_vec();
    while ring.len() > 1 {
        let closes = match (ring.first(), ring.last()) {
            (Some(first), Some(last)) => (first - last).norm() <= CLOSE_EPSILON,
            _ => false,
        };
        if !closes {
            break;
        }
        ring.pop();
    }
    ring.dedup_by(|a, b| (*a - *b).norm() <= CLOSE_EPSILON);
    ring
}

fn prepare_ring(
    polygon: &Polygon,
    index: usize,
    force_close: bool,
) -> std::result::Result<Vec<Point2<f64>>, PolygonIssue> {
    if !polygon.is_closed() && !force_close {
        return Err(PolygonIssue::Open { polygon: index });
    }
    let ring = ring(polygon.points());
    if ring.len() < 3 {
        return Err(PolygonIssue::TooFewPoints {
            polygon: index,
            count: ring.len(),
        });
    }
    if is_self_intersecting(&ring) {
        return Err(PolygonIssue::SelfIntersecting { polygon: index });
    }
    Ok(ring)
}

// Even-odd rule; an edge counts when it straddles the horizontal line through y.
fn point_in_ring(ring: &[Point2<f64>], x: f64, y: f64) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (a, b) = (ring[j], ring[i]);
        if (a.y > y) != (b.y > y) {
            let x_cross = (b.x - a.x) * (y - a.y) / (b.y - a.y) + a.x;
            if x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn is_self_intersecting(ring: &[Point2<f64>]) -> bool {
    let n = ring.len();
    for a in 0..n {
        let (p0, p1) = (ring[a], ring[(a + 1) % n]);
        for b in (a + 2)..n {
            // first and last edges share a vertex
            if a == 0 && b == n - 1 {
                continue;
            }
            let (q0, q1) = (ring[b], ring[(b + 1) % n]);
            if segments_intersect(p0, p1, q0, q1) {
                return true;
            }
        }
    }
    false
}

fn segments_intersect(p0: Point2<f64>, p1: Point2<f64>, q0: Point2<f64>, q1: Point2<f64>) -> bool {
    let cross = |o: Point2<f64>, a: Point2<f64>, b: Point2<f64>| {
        (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
    };
    let d1 = cross(q0, q1, p0);
    let d2 = cross(q0, q1, p1);
    let d3 = cross(p0, p1, q0);
    let d4 = cross(p0, p1, q1);

    if d1 * d2 < 0.0 && d3 * d4 < 0.0 {
        return true;
    }

    // an endpoint on the other segment: touches and collinear overlap
    let on = |p: Point2<f64>, a: Point2<f64>, b: Point2<f64>| {
        p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
    };
    (d1 == 0.0 && on(p0, q0, q1))
        || (d2 == 0.0 && on(p1, q0, q1))
        || (d3 == 0.0 && on(q0, p0, p1))
        || (d4 == 0.0 && on(q1, p0, p1))
}
