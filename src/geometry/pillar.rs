// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 cpgrid developers

//! Interpolation of a point along a pillar at a given depth

use nalgebra::Point3;

use crate::config::GeometryConfig;
use crate::utils::math::lerp;

/// Point on the pillar line `[xtop, ytop, ztop, xbot, ybot, zbot]` at depth `z`.
///
/// Returns `None` when the pillar or the depth is undefined, or when `z`
/// lies outside the pillar's depth range by more than the configured
/// tolerance. No extrapolation is done.
pub fn point_at_depth(pillar: &[f64; 6], z: f64, config: &GeometryConfig) -> Option<Point3<f64>> {
    if config.is_undef(z) || pillar.iter().any(|&v| config.is_undef(v)) {
        return None;
    }

    let [x1, y1, z1, x2, y2, z2] = *pillar;
    let tolerance = config.depth_tolerance;

    if z < z1.min(z2) - tolerance || z > z1.max(z2) + tolerance {
        return None;
    }

    let span = z2 - z1;
    if span.abs() <= f64::EPSILON * z1.abs().max(1.0) {
        // flat pillar: depth matched its only level within tolerance
        return Some(Point3::new(x1, y1, z));
    }

    let t = ((z - z1) / span).clamp(0.0, 1.0);
    Some(Point3::new(lerp(x1, x2, t), lerp(y1, y2, t), z))
}
