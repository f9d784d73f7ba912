// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 cpgrid developers

//! JSON snapshot of a grid's raw arrays

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config::GeometryConfig;
use crate::grid::Grid;

/// Raw arrays and settings of a grid, as written to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub ncol: usize,
    pub nrow: usize,
    pub nlay: usize,
    pub coord: Vec<f64>,
    pub zcorn: Vec<f64>,
    pub actnum: Vec<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subgrids: Option<Vec<usize>>,
    #[serde(default)]
    pub config: GeometryConfig,
}

impl Grid {
    pub fn to_snapshot(&self) -> GridSnapshot {
        let (ncol, nrow, nlay) = self.dimensions();
        GridSnapshot {
            ncol,
            nrow,
            nlay,
            coord: self.coord().to_vec(),
            zcorn: self.zcorn().to_vec(),
            actnum: self.actnum().to_vec(),
            subgrids: self.subgrids().map(<[usize]>::to_vec),
            config: *self.config(),
        }
    }

    /// Rebuild a grid, validating arrays, configuration and subgrids
    pub fn from_snapshot(snapshot: GridSnapshot) -> crate::error::Result<Self> {
        let GridSnapshot {
            ncol,
            nrow,
            nlay,
            coord,
            zcorn,
            actnum,
            subgrids,
            config,
        } = snapshot;
        let mut grid = Grid::from_arrays(ncol, nrow, nlay, coord, zcorn, actnum)?.with_config(config)?;
        grid.set_subgrids(subgrids)?;
        Ok(grid)
    }
}

/// Write a grid snapshot as pretty-printed JSON
pub fn export_snapshot(grid: &Grid, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(&grid.to_snapshot())
        .context("Failed to serialize grid snapshot")?;
    fs::write(path, json).with_context(|| format!("Failed to write snapshot: {:?}", path))?;
    log::info!("Wrote {}x{}x{} grid to {:?}", grid.ncol(), grid.nrow(), grid.nlay(), path);
    Ok(())
}

/// Read a grid snapshot written by [`export_snapshot`]
pub fn import_snapshot(path: impl AsRef<Path>) -> Result<Grid> {
    let path = path.as_ref();
    let json =
        fs::read_to_string(path).with_context(|| format!("Failed to read snapshot: {:?}", path))?;
    let snapshot: GridSnapshot = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse snapshot: {:?}", path))?;
    let grid = Grid::from_snapshot(snapshot)
        .with_context(|| format!("Invalid grid in snapshot: {:?}", path))?;
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_snapshot_file_round_trip() -> Result<()> {
        let mut grid = Grid::default();
        grid.set_active(2, 3, 4, false)?;
        grid.set_subgrids(Some(vec![1, 4]))?;

        let file = NamedTempFile::new()?;
        export_snapshot(&grid, file.path())?;
        let loaded = import_snapshot(file.path())?;

        assert_eq!(loaded.dimensions(), (4, 3, 5));
        assert_eq!(loaded.active_count(), 59);
        assert_eq!(loaded.subgrids(), Some(&[1, 4][..]));
        assert_eq!(loaded.zcorn(), grid.zcorn());
        Ok(())
    }

    #[test]
    fn test_import_rejects_bad_shape() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(
            file,
            r#"{{"ncol": 1, "nrow": 1, "nlay": 1, "coord": [0.0], "zcorn": [], "actnum": [1]}}"#
        )?;
        assert!(import_snapshot(file.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_import_missing_file() {
        assert!(import_snapshot("/nonexistent/grid.json").is_err());
    }
}
