// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 cpgrid developers

//! Snapshot and configuration files

use anyhow::Result;
use approx::assert_relative_eq;
use cpgrid::{export_snapshot, import_snapshot, GeometryConfig, Grid};
use tempfile::TempDir;

#[test]
fn test_snapshot_keeps_mutated_grid() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("grid.json");

    let mut grid = Grid::default();
    grid.deactivate_thin_cells(0.5)?;
    grid.refine_vertically(2)?;
    grid.set_active(4, 3, 10, false)?;
    export_snapshot(&grid, &path)?;

    let loaded = import_snapshot(&path)?;
    assert_eq!(loaded.dimensions(), (4, 3, 10));
    assert_eq!(loaded.active_count(), grid.active_count());
    assert_eq!(loaded.coord(), grid.coord());
    assert_eq!(loaded.geometrics(true, true), grid.geometrics(true, true));
    Ok(())
}

#[test]
fn test_snapshot_carries_config() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("grid.json");
    let config = GeometryConfig {
        depth_tolerance: 1e-3,
        ..GeometryConfig::default()
    };

    let grid = Grid::default().with_config(config)?;
    export_snapshot(&grid, &path)?;
    let loaded = *import_snapshot(&path)?.config();
    assert_relative_eq!(loaded.depth_tolerance, 1e-3);
    assert_relative_eq!(loaded.undef, config.undef);
    Ok(())
}

#[test]
fn test_config_file_round_trip() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("cpgrid.toml");
    let config = GeometryConfig {
        regularity_tolerance: 0.05,
        ..GeometryConfig::default()
    };
    config.save(&path)?;
    assert_eq!(GeometryConfig::from_file(&path)?, config);
    Ok(())
}
