// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 cpgrid developers

//! Grid aggregate: store, active-cell cache, configuration and attached properties

mod active;
mod extract;
mod store;

pub use active::ActiveCells;
pub use store::GridStore;

use nalgebra::{Point3, Vector3};

use crate::config::GeometryConfig;
use crate::error::{GridError, Result};
use crate::property::GridProperty;

/// Corner-point grid
///
/// The grid exclusively owns its arrays. Every operation that changes the
/// mask goes through one of the `commit_*` methods, which swap complete
/// arrays and invalidate the active-cell cache.
#[derive(Debug, Clone)]
pub struct Grid {
    store: GridStore,
    active: ActiveCells,
    config: GeometryConfig,
    subgrids: Option<Vec<usize>>,
    props: Vec<GridProperty>,
}

impl Grid {
    /// Wrap a validated store with the default configuration
    pub fn from_store(store: GridStore) -> Self {
        Self {
            store,
            active: ActiveCells::new(),
            config: GeometryConfig::default(),
            subgrids: None,
            props: Vec::new(),
        }
    }

    /// Build a grid from raw arrays as produced by a file codec
    pub fn from_arrays(
        ncol: usize,
        nrow: usize,
        nlay: usize,
        coord: Vec<f64>,
        zcorn: Vec<f64>,
        actnum: Vec<i32>,
    ) -> Result<Self> {
        let store = GridStore::new(ncol, nrow, nlay, coord, zcorn, actnum)?;
        Ok(Self::from_store(store))
    }

    /// Bind a configuration to this grid
    pub fn with_config(mut self, config: GeometryConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Regular box grid with vertical pillars, all cells active
    pub fn create_box(
        (ncol, nrow, nlay): (usize, usize, usize),
        origin: Point3<f64>,
        increment: Vector3<f64>,
    ) -> Result<Self> {
        if !(increment.x > 0.0 && increment.y > 0.0 && increment.z > 0.0) {
            return Err(GridError::invalid(format!(
                "box increments must be positive, got {:?}",
                increment
            )));
        }

        let (coord, zcorn, actnum) = GridStore::box_arrays(
            (ncol, nrow, nlay),
            [origin.x, origin.y, origin.z],
            [increment.x, increment.y, increment.z],
        );
        Self::from_arrays(ncol, nrow, nlay, coord, zcorn, actnum)
    }

    pub fn ncol(&self) -> usize {
        self.store.ncol()
    }

    pub fn nrow(&self) -> usize {
        self.store.nrow()
    }

    pub fn nlay(&self) -> usize {
        self.store.nlay()
    }

    /// Total number of cells, active or not
    pub fn ntotal(&self) -> usize {
        self.store.ntotal()
    }

    pub fn dimensions(&self) -> (usize, usize, usize) {
        self.store.dimensions()
    }

    pub fn store(&self) -> &GridStore {
        &self.store
    }

    pub fn coord(&self) -> &[f64] {
        self.store.coord()
    }

    pub fn zcorn(&self) -> &[f64] {
        self.store.zcorn()
    }

    pub fn actnum(&self) -> &[i32] {
        self.store.actnum()
    }

    pub fn config(&self) -> &GeometryConfig {
        &self.config
    }

    pub fn undef(&self) -> f64 {
        self.config.undef
    }

    pub fn undef_limit(&self) -> f64 {
        self.config.undef_limit
    }

    /// Ascending linear indices of active cells
    pub fn active_indices(&self) -> &[usize] {
        self.active.indices(self.store.actnum())
    }

    pub fn active_count(&self) -> usize {
        self.active.count(self.store.actnum())
    }

    /// Active flag of cell `(i, j, k)`, 1-based
    pub fn is_active(&self, i: usize, j: usize, k: usize) -> Result<bool> {
        self.store.is_active(i, j, k)
    }

    /// Linear index of cell `(i, j, k)`, 1-based input
    pub fn cell_index(&self, i: usize, j: usize, k: usize) -> Result<usize> {
        self.store.checked_index(i, j, k)
    }

    /// 1-based `(i, j, k)` of a 0-based linear index
    pub fn cell_ijk(&self, index: usize) -> Result<(usize, usize, usize)> {
        if index >= self.ntotal() {
            return Err(GridError::index("cell", index + 1, self.ntotal()));
        }
        let (i, j, k) = self.store.ijk0(index);
        Ok((i + 1, j + 1, k + 1))
    }

    pub fn pillar(&self, pi: usize, pj: usize) -> Result<[f64; 6]> {
        self.store.pillar(pi, pj)
    }

    pub fn corner_depths(&self, i: usize, j: usize, kb: usize) -> Result<[f64; 4]> {
        self.store.corner_depths(i, j, kb)
    }

    pub fn set_active(&mut self, i: usize, j: usize, k: usize, active: bool) -> Result<()> {
        self.store.set_active(i, j, k, active)?;
        self.active.invalidate();
        Ok(())
    }

    pub fn set_corner_depths(&mut self, i: usize, j: usize, kb: usize, depths: [f64; 4]) -> Result<()> {
        self.store.set_corner_depths(i, j, kb, depths)
    }

    /// Replace the whole mask
    pub fn set_actnum(&mut self, actnum: Vec<i32>) -> Result<()> {
        let expected = self.ntotal();
        if actnum.len() != expected {
            return Err(GridError::shape("actnum", expected, actnum.len()));
        }
        if let Some(bad) = actnum.iter().find(|&&v| v != 0 && v != 1) {
            return Err(GridError::invalid(format!(
                "actnum values must be 0 or 1, found {}",
                bad
            )));
        }
        self.commit_actnum(actnum);
        Ok(())
    }

    /// Replace dimensions and all arrays at once.
    ///
    /// Subgrids and attached properties that no longer fit are dropped.
    pub fn replace_store(&mut self, store: GridStore) {
        let dims_changed = store.dimensions() != self.store.dimensions();
        self.store = store;
        self.active.invalidate();
        if dims_changed {
            self.subgrids = None;
            self.props.clear();
        }
    }

    /// Number of layers in each subgrid, top to bottom
    pub fn subgrids(&self) -> Option<&[usize]> {
        self.subgrids.as_deref()
    }

    pub fn subgrid_count(&self) -> usize {
        self.subgrids.as_ref().map_or(0, Vec::len)
    }

    /// Set subgrid layer counts; they must be positive and sum to `nlay`
    pub fn set_subgrids(&mut self, subgrids: Option<Vec<usize>>) -> Result<()> {
        if let Some(counts) = &subgrids {
            let total: usize = counts.iter().sum();
            if counts.iter().any(|&n| n == 0) || total != self.nlay() {
                return Err(GridError::invalid(format!(
                    "subgrid layer counts {:?} do not partition {} layers",
                    counts,
                    self.nlay()
                )));
            }
        }
        self.subgrids = subgrids;
        Ok(())
    }

    /// Attach a property, replacing any with the same name
    pub fn attach_property(&mut self, property: GridProperty) -> Result<()> {
        if property.dimensions() != self.dimensions() {
            return Err(GridError::Dimension {
                name: property.name().to_string(),
                expected: self.dimensions(),
                actual: property.dimensions(),
            });
        }
        self.props.retain(|p| p.name() != property.name());
        self.props.push(property);
        Ok(())
    }

    pub fn properties(&self) -> &[GridProperty] {
        &self.props
    }

    pub fn property(&self, name: &str) -> Option<&GridProperty> {
        self.props.iter().find(|p| p.name() == name)
    }

    pub fn property_names(&self) -> Vec<&str> {
        self.props.iter().map(GridProperty::name).collect()
    }

    /// Remove and return all attached properties
    pub fn detach_properties(&mut self) -> Vec<GridProperty> {
        std::mem::take(&mut self.props)
    }

    pub(crate) fn commit_actnum(&mut self, actnum: Vec<i32>) {
        self.store.replace_actnum(actnum);
        self.active.invalidate();
    }

    pub(crate) fn commit_zcorn_actnum(&mut self, zcorn: Vec<f64>, actnum: Vec<i32>) {
        self.store.replace_zcorn_actnum(zcorn, actnum);
        self.active.invalidate();
    }

    pub(crate) fn commit_coord_zcorn(&mut self, coord: Vec<f64>, zcorn: Vec<f64>) {
        self.store.replace_coord_zcorn(coord, zcorn);
    }

    /// Swap in a store with new dimensions, setting subgrids in the same step
    pub(crate) fn commit_store(&mut self, store: GridStore, subgrids: Option<Vec<usize>>) {
        self.replace_store(store);
        self.subgrids = subgrids;
    }
}

impl Default for Grid {
    /// Regular 4x3x5 grid of unit cells, all active
    fn default() -> Self {
        let dims = (4, 3, 5);
        let (coord, zcorn, actnum) = GridStore::box_arrays(dims, [0.0; 3], [1.0; 3]);
        Self::from_store(GridStore::from_parts(dims, coord, zcorn, actnum))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid() {
        let grid = Grid::default();
        assert_eq!(grid.dimensions(), (4, 3, 5));
        assert_eq!(grid.ntotal(), 60);
        assert_eq!(grid.active_count(), 60);
        assert_eq!(grid.actnum().len(), 60);
        assert_eq!(grid.coord().len(), 5 * 4 * 6);
        assert_eq!(grid.zcorn().len(), 4 * 3 * 6 * 4);
    }

    #[test]
    fn test_active_count_tracks_mutation() {
        let mut grid = Grid::default();
        assert_eq!(grid.active_count(), 60);

        grid.set_active(1, 1, 1, false).unwrap();
        assert_eq!(grid.active_count(), 59);
        assert_eq!(grid.active_indices()[0], 1);

        grid.set_active(1, 1, 1, true).unwrap();
        assert_eq!(grid.active_count(), 60);
    }

    #[test]
    fn test_set_actnum_validates() {
        let mut grid = Grid::default();
        assert!(grid.set_actnum(vec![1; 59]).is_err());
        assert_eq!(grid.active_count(), 60);

        let mut actnum = vec![1; 60];
        actnum[10] = 0;
        actnum[20] = 0;
        grid.set_actnum(actnum).unwrap();
        assert_eq!(grid.active_count(), 58);
    }

    #[test]
    fn test_subgrids_must_partition_layers() {
        let mut grid = Grid::default();
        assert!(grid.set_subgrids(Some(vec![2, 2])).is_err());
        assert!(grid.set_subgrids(Some(vec![0, 5])).is_err());
        grid.set_subgrids(Some(vec![2, 3])).unwrap();
        assert_eq!(grid.subgrid_count(), 2);
    }

    #[test]
    fn test_attach_property_checks_dimensions() {
        let mut grid = Grid::default();
        let good = GridProperty::continuous("PORO", (4, 3, 5), vec![0.2; 60]).unwrap();
        let bad = GridProperty::continuous("PERM", (4, 3, 4), vec![1.0; 48]).unwrap();

        grid.attach_property(good).unwrap();
        assert!(matches!(
            grid.attach_property(bad),
            Err(GridError::Dimension { .. })
        ));
        assert_eq!(grid.property_names(), vec!["PORO"]);
    }

    #[test]
    fn test_create_box_rejects_non_positive_increment() {
        let result = Grid::create_box((2, 2, 2), Point3::origin(), Vector3::new(1.0, 0.0, 1.0));
        assert!(result.is_err());
    }

    #[test]
    fn test_cell_ijk_inverse() {
        let grid = Grid::default();
        let index = grid.cell_index(3, 2, 4).unwrap();
        assert_eq!(grid.cell_ijk(index).unwrap(), (3, 2, 4));
        assert!(grid.cell_ijk(60).is_err());
    }
}
