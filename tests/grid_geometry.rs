// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 cpgrid developers

//! Cell geometry and grid statistics on known grids

use anyhow::Result;
use approx::assert_relative_eq;
use cpgrid::{GeometryConfig, Grid, Regularity};
use nalgebra::{Point3, Vector3};

fn box_grid() -> Result<Grid> {
    Ok(Grid::create_box(
        (2, 2, 2),
        Point3::origin(),
        Vector3::new(100.0, 100.0, 10.0),
    )?)
}

#[test]
fn test_box_centers_use_correct_boundaries() -> Result<()> {
    let grid = box_grid()?;
    let first = grid.cell_center(1, 1, 1, true)?.unwrap();
    let last = grid.cell_center(2, 2, 2, true)?.unwrap();
    assert_relative_eq!(first, Point3::new(50.0, 50.0, 5.0));
    assert_relative_eq!(last, Point3::new(150.0, 150.0, 15.0));

    let corners = grid.cell_corners(2, 2, 2, false)?.unwrap();
    assert_relative_eq!(corners.top()[0].z, 10.0);
    assert_relative_eq!(corners.base()[0].z, 20.0);
    Ok(())
}

#[test]
fn test_default_grid_scenario() -> Result<()> {
    let mut grid = Grid::default();
    assert_eq!(grid.active_count(), 60);
    assert_eq!(grid.actnum().len(), grid.ntotal());

    let geo = grid.geometrics(true, true);
    assert_eq!(geo.get("avg_dz"), Some(1.0));
    assert_eq!(geo.regularity, Regularity::Regular);

    let before = grid.cell_dz(3, 2, 4, false, false)?;
    grid.translate_coordinates(Vector3::zeros(), (1, 1, -1))?;
    let after = grid.cell_dz(3, 2, 4, false, false)?;
    assert_relative_eq!(after, -before);
    Ok(())
}

#[test]
fn test_out_of_range_indices_fail() {
    let grid = Grid::default();
    assert!(grid.cell_corners(0, 1, 1, false).is_err());
    assert!(grid.cell_corners(5, 1, 1, false).is_err());
    assert!(grid.cell_dz(1, 4, 1, true, false).is_err());
    assert!(grid.cell_center(1, 1, 6, false).is_err());
    assert!(grid.pillar(6, 1).is_err());
    assert!(grid.pillar(5, 4).is_ok());
}

#[test]
fn test_sloped_pillars_interpolate() -> Result<()> {
    // single cell, pillars leaning +10 in X over 10 units of depth
    let mut coord = Vec::new();
    for (x, y) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)] {
        coord.extend_from_slice(&[x, y, 0.0, x + 10.0, y, 10.0]);
    }
    let zcorn = [vec![2.0; 4], vec![4.0; 4]].concat();
    let grid = Grid::from_arrays(1, 1, 1, coord, zcorn, vec![1])?;

    let corners = grid.cell_corners(1, 1, 1, false)?.unwrap();
    assert_relative_eq!(corners.points[0], Point3::new(2.0, 0.0, 2.0));
    assert_relative_eq!(corners.points[7], Point3::new(5.0, 1.0, 4.0));
    assert_relative_eq!(grid.cell_center(1, 1, 1, false)?.unwrap().x, 3.5);
    Ok(())
}

#[test]
fn test_depth_outside_pillar_is_undefined() -> Result<()> {
    let mut grid = box_grid()?;
    grid.set_corner_depths(1, 1, 1, [-50.0; 4])?;

    let corners = grid.cell_corners(1, 1, 1, false)?.unwrap();
    assert!(!corners.is_defined(grid.config()));
    let center = grid.cell_center(1, 1, 1, false)?.unwrap();
    assert!(grid.config().is_undef(center.x));

    let geo = grid.geometrics(true, true);
    assert_eq!(geo.degenerate_cells, 1);
    assert_eq!(geo.regularity, Regularity::Irregular);
    Ok(())
}

#[test]
fn test_config_tolerance_changes_classification() -> Result<()> {
    let mut grid = Grid::default();
    grid.set_corner_depths(1, 1, 5, [4.001; 4])?;
    assert_eq!(grid.geometrics(true, true).regularity, Regularity::Irregular);

    let loose = GeometryConfig {
        regularity_tolerance: 0.01,
        ..GeometryConfig::default()
    };
    let grid = grid.with_config(loose)?;
    assert_eq!(grid.geometrics(true, true).regularity, Regularity::Regular);
    Ok(())
}

#[test]
fn test_extracted_properties_match_kernel() -> Result<()> {
    let grid = box_grid()?;
    let dz = grid.get_dz("dZ", true, false)?;
    let [x, _, z] = grid.get_xyz(["X", "Y", "Z"], false)?;
    for k in 1..=2 {
        for j in 1..=2 {
            for i in 1..=2 {
                let center = grid.cell_center(i, j, k, false)?.unwrap();
                assert_eq!(x.value(i, j, k), Some(center.x));
                assert_eq!(z.value(i, j, k), Some(center.z));
                assert_eq!(dz.value(i, j, k), Some(grid.cell_dz(i, j, k, true, false)?));
            }
        }
    }
    Ok(())
}
