// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 cpgrid developers

//! Corner-point grid geometry
//!
//! A structured `ncol x nrow x nlay` grid whose cells are defined by pillar
//! lines and per-cell corner depths, with an active-cell mask. Provides cell
//! corners and centres, cell dimensions, grid-wide geometric summaries, mask
//! and layer operations, and coordinate transforms.
//!
//! Public cell indices are 1-based; linear indices are 0-based with I
//! running fastest.

pub mod config;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod io;
pub mod ops;
pub mod property;
pub mod sampling;
pub mod utils;

pub use config::{GeometryConfig, UNDEF, UNDEF_LIMIT};
pub use error::{GridError, Result};
pub use geometry::{point_at_depth, BoundingBox, CellCorners, GridGeometrics, Regularity};
pub use grid::{ActiveCells, Grid, GridStore};
pub use io::{export_snapshot, import_snapshot, GridSnapshot};
pub use ops::{Polygon, PolygonIssue, PolygonReport};
pub use property::{GridProperty, PropertyValues};
pub use sampling::CellSample;
