// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 cpgrid developers

//! Coordinate and corner store: dimensions plus the three flat arrays
//!
//! Layout:
//! - pillar `(pi, pj)` lives at `(pj * (ncol + 1) + pi) * 6` as
//!   `[xtop, ytop, ztop, xbot, ybot, zbot]`
//! - corner depths for column `(i, j)` at layer boundary `kb` live at
//!   `((kb * nrow + j) * ncol + i) * 4`, ordered SW, SE, NW, NE
//! - cell `(i, j, k)` maps to `k * nrow * ncol + j * ncol + i`

use crate::error::{GridError, Result};

/// Owned storage for one corner-point grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridStore {
    ncol: usize,
    nrow: usize,
    nlay: usize,
    coord: Vec<f64>,
    zcorn: Vec<f64>,
    actnum: Vec<i32>,
}

impl GridStore {
    /// Build a store, validating every array against the dimensions
    pub fn new(
        ncol: usize,
        nrow: usize,
        nlay: usize,
        coord: Vec<f64>,
        zcorn: Vec<f64>,
        actnum: Vec<i32>,
    ) -> Result<Self> {
        if ncol == 0 || nrow == 0 || nlay == 0 {
            return Err(GridError::invalid(format!(
                "dimensions must be positive, got {}x{}x{}",
                ncol, nrow, nlay
            )));
        }

        let expected = Self::coord_len(ncol, nrow);
        if coord.len() != expected {
            return Err(GridError::shape("coord", expected, coord.len()));
        }

        let expected = Self::zcorn_len(ncol, nrow, nlay);
        if zcorn.len() != expected {
            return Err(GridError::shape("zcorn", expected, zcorn.len()));
        }

        let expected = ncol * nrow * nlay;
        if actnum.len() != expected {
            return Err(GridError::shape("actnum", expected, actnum.len()));
        }

        if let Some(bad) = actnum.iter().find(|&&v| v != 0 && v != 1) {
            return Err(GridError::invalid(format!(
                "actnum values must be 0 or 1, found {}",
                bad
            )));
        }

        Ok(Self {
            ncol,
            nrow,
            nlay,
            coord,
            zcorn,
            actnum,
        })
    }

    /// Arrays of a regular box grid with vertical pillars, all cells active
    pub(crate) fn box_arrays(
        (ncol, nrow, nlay): (usize, usize, usize),
        origin: [f64; 3],
        increment: [f64; 3],
    ) -> (Vec<f64>, Vec<f64>, Vec<i32>) {
        let zbot = origin[2] + nlay as f64 * increment[2];
        let mut coord = Vec::with_capacity(Self::coord_len(ncol, nrow));
        for pj in 0..=nrow {
            for pi in 0..=ncol {
                let x = origin[0] + pi as f64 * increment[0];
                let y = origin[1] + pj as f64 * increment[1];
                coord.extend_from_slice(&[x, y, origin[2], x, y, zbot]);
            }
        }

        let mut zcorn = Vec::with_capacity(Self::zcorn_len(ncol, nrow, nlay));
        for kb in 0..=nlay {
            let z = origin[2] + kb as f64 * increment[2];
            zcorn.extend(std::iter::repeat(z).take(ncol * nrow * 4));
        }

        (coord, zcorn, vec![1; ncol * nrow * nlay])
    }

    /// Assemble a store from arrays already sized by the caller
    pub(crate) fn from_parts(
        (ncol, nrow, nlay): (usize, usize, usize),
        coord: Vec<f64>,
        zcorn: Vec<f64>,
        actnum: Vec<i32>,
    ) -> Self {
        debug_assert_eq!(coord.len(), Self::coord_len(ncol, nrow));
        debug_assert_eq!(zcorn.len(), Self::zcorn_len(ncol, nrow, nlay));
        debug_assert_eq!(actnum.len(), ncol * nrow * nlay);
        Self {
            ncol,
            nrow,
            nlay,
            coord,
            zcorn,
            actnum,
        }
    }

    pub fn coord_len(ncol: usize, nrow: usize) -> usize {
        (ncol + 1) * (nrow + 1) * 6
    }

    pub fn zcorn_len(ncol: usize, nrow: usize, nlay: usize) -> usize {
        ncol * nrow * (nlay + 1) * 4
    }

    pub fn ncol(&self) -> usize {
        self.ncol
    }

    pub fn nrow(&self) -> usize {
        self.nrow
    }

    pub fn nlay(&self) -> usize {
        self.nlay
    }

    /// Total number of cells
    pub fn ntotal(&self) -> usize {
        self.ncol * self.nrow * self.nlay
    }

    pub fn dimensions(&self) -> (usize, usize, usize) {
        (self.ncol, self.nrow, self.nlay)
    }

    /// Raw pillar coordinates
    pub fn coord(&self) -> &[f64] {
        &self.coord
    }

    /// Raw corner depths
    pub fn zcorn(&self) -> &[f64] {
        &self.zcorn
    }

    /// Raw active mask
    pub fn actnum(&self) -> &[i32] {
        &self.actnum
    }

    /// Consume the store and hand back its arrays
    pub fn into_arrays(self) -> (Vec<f64>, Vec<f64>, Vec<i32>) {
        (self.coord, self.zcorn, self.actnum)
    }

    /// Read the six coordinates of pillar `(pi, pj)`, 1-based
    pub fn pillar(&self, pi: usize, pj: usize) -> Result<[f64; 6]> {
        check_index("pillar I", pi, self.ncol + 1)?;
        check_index("pillar J", pj, self.nrow + 1)?;
        Ok(self.pillar0(pi - 1, pj - 1))
    }

    /// Read the four corner depths of column `(i, j)` at layer boundary `kb`, 1-based
    pub fn corner_depths(&self, i: usize, j: usize, kb: usize) -> Result<[f64; 4]> {
        self.check_column(i, j)?;
        check_index("layer boundary", kb, self.nlay + 1)?;
        Ok(self.depths0(i - 1, j - 1, kb - 1))
    }

    /// Active flag of cell `(i, j, k)`, 1-based
    pub fn is_active(&self, i: usize, j: usize, k: usize) -> Result<bool> {
        let index = self.checked_index(i, j, k)?;
        Ok(self.actnum[index] == 1)
    }

    /// Linear index of cell `(i, j, k)`, 1-based input, 0-based output
    pub fn checked_index(&self, i: usize, j: usize, k: usize) -> Result<usize> {
        self.check_column(i, j)?;
        check_index("K", k, self.nlay)?;
        Ok(self.index0(i - 1, j - 1, k - 1))
    }

    fn check_column(&self, i: usize, j: usize) -> Result<()> {
        check_index("I", i, self.ncol)?;
        check_index("J", j, self.nrow)
    }

    pub(crate) fn set_corner_depths(
        &mut self,
        i: usize,
        j: usize,
        kb: usize,
        depths: [f64; 4],
    ) -> Result<()> {
        self.check_column(i, j)?;
        check_index("layer boundary", kb, self.nlay + 1)?;
        let offset = self.zcorn_offset(i - 1, j - 1, kb - 1);
        self.zcorn[offset..offset + 4].copy_from_slice(&depths);
        Ok(())
    }

    pub(crate) fn set_active(&mut self, i: usize, j: usize, k: usize, active: bool) -> Result<()> {
        let index = self.checked_index(i, j, k)?;
        self.actnum[index] = i32::from(active);
        Ok(())
    }

    /// Swap in new depths and mask; both must already be sized for this grid
    pub(crate) fn replace_zcorn_actnum(&mut self, zcorn: Vec<f64>, actnum: Vec<i32>) {
        debug_assert_eq!(zcorn.len(), self.zcorn.len());
        debug_assert_eq!(actnum.len(), self.actnum.len());
        self.zcorn = zcorn;
        self.actnum = actnum;
    }

    pub(crate) fn replace_actnum(&mut self, actnum: Vec<i32>) {
        debug_assert_eq!(actnum.len(), self.actnum.len());
        self.actnum = actnum;
    }

    pub(crate) fn replace_coord_zcorn(&mut self, coord: Vec<f64>, zcorn: Vec<f64>) {
        debug_assert_eq!(coord.len(), self.coord.len());
        debug_assert_eq!(zcorn.len(), self.zcorn.len());
        self.coord = coord;
        self.zcorn = zcorn;
    }

    #[inline]
    pub(crate) fn index0(&self, i: usize, j: usize, k: usize) -> usize {
        (k * self.nrow + j) * self.ncol + i
    }

    /// Inverse of [`GridStore::index0`]
    #[inline]
    pub(crate) fn ijk0(&self, index: usize) -> (usize, usize, usize) {
        let layer = self.ncol * self.nrow;
        let k = index / layer;
        let rest = index % layer;
        (rest % self.ncol, rest / self.ncol, k)
    }

    #[inline]
    pub(crate) fn zcorn_offset(&self, i: usize, j: usize, kb: usize) -> usize {
        ((kb * self.nrow + j) * self.ncol + i) * 4
    }

    #[inline]
    pub(crate) fn depths0(&self, i: usize, j: usize, kb: usize) -> [f64; 4] {
        let offset = self.zcorn_offset(i, j, kb);
        [
            self.zcorn[offset],
            self.zcorn[offset + 1],
            self.zcorn[offset + 2],
            self.zcorn[offset + 3],
        ]
    }

    #[inline]
    pub(crate) fn pillar0(&self, pi: usize, pj: usize) -> [f64; 6] {
        let offset = (pj * (self.ncol + 1) + pi) * 6;
        let mut pillar = [0.0; 6];
        pillar.copy_from_slice(&self.coord[offset..offset + 6]);
        pillar
    }
}

fn check_index(axis: &'static str, index: usize, max: usize) -> Result<()> {
    if index == 0 || index > max {
        return Err(GridError::index(axis, index, max));
    }
    Ok(())
}
