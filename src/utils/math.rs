// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 cpgrid developers

//! Math utilities

/// Linear interpolation
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Convert degrees to radians
pub fn deg_to_rad(deg: f64) -> f64 {
    deg.to_radians()
}

/// Convert radians to degrees
pub fn rad_to_deg(rad: f64) -> f64 {
    rad.to_degrees()
}

/// Wrap an angle in degrees into `[0, 360)`
pub fn normalize_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Smallest absolute difference between two angles in degrees
pub fn angle_difference(a: f64, b: f64) -> f64 {
    let diff = normalize_degrees(a - b);
    diff.min(360.0 - diff)
}

/// Mean of angles in degrees, taken as the direction of the summed unit vectors
pub fn mean_angle_degrees(angles: &[f64]) -> Option<f64> {
    if angles.is_empty() {
        return None;
    }
    let (sin_sum, cos_sum) = angles.iter().fold((0.0, 0.0), |(s, c), &a| {
        let rad = deg_to_rad(a);
        (s + rad.sin(), c + rad.cos())
    });
    if sin_sum.abs() < 1e-12 && cos_sum.abs() < 1e-12 {
        return None;
    }
    Some(normalize_degrees(rad_to_deg(sin_sum.atan2(cos_sum))))
}
