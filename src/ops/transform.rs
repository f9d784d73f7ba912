// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 cpgrid developers

//! Translation and axis flipping of grid coordinates

use nalgebra::Vector3;

use crate::error::{GridError, Result};
use crate::grid::Grid;

impl Grid {
    /// Apply `v * flip + translate` per axis to every pillar coordinate and
    /// corner depth.
    ///
    /// Each flip factor must be 1 or -1; the grid is untouched if one is not.
    /// Undefined values stay undefined. The active mask does not change.
    pub fn translate_coordinates(
        &mut self,
        translate: Vector3<f64>,
        flip: (i32, i32, i32),
    ) -> Result<()> {
        let factors = [flip.0, flip.1, flip.2];
        if let Some(bad) = factors.iter().find(|&&f| f != 1 && f != -1) {
            return Err(GridError::invalid(format!(
                "flip factors must be 1 or -1, got {}",
                bad
            )));
        }
        if !(translate.x.is_finite() && translate.y.is_finite() && translate.z.is_finite()) {
            return Err(GridError::invalid(format!(
                "translation must be finite, got {:?}",
                translate
            )));
        }

        let config = *self.config();
        let apply = |value: f64, axis: usize| {
            if config.is_undef(value) {
                value
            } else {
                value * f64::from(factors[axis]) + translate[axis]
            }
        };

        let coord: Vec<f64> = self
            .coord()
            .iter()
            .enumerate()
            .map(|(n, &v)| apply(v, n % 3))
            .collect();
        let zcorn: Vec<f64> = self.zcorn().iter().map(|&z| apply(z, 2)).collect();

        self.commit_coord_zcorn(coord, zcorn);
        log::info!(
            "Translated grid by ({}, {}, {}) with flip {:?}",
            translate.x,
            translate.y,
            translate.z,
            flip
        );
        Ok(())
    }

    /// Shift the grid without flipping
    pub fn translate(&mut self, dx: f64, dy: f64, dz: f64) -> Result<()> {
        self.translate_coordinates(Vector3::new(dx, dy, dz), (1, 1, 1))
    }

    /// Mirror the grid about the selected axes through the origin
    pub fn flip(&mut self, fx: i32, fy: i32, fz: i32) -> Result<()> {
        self.translate_coordinates(Vector3::zeros(), (fx, fy, fz))
    }
}
