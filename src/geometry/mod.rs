// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 cpgrid developers

//! Geometry kernel - cell corners, centres, dimensions and grid statistics

mod bbox;
mod cell;
mod metrics;
mod pillar;

pub use bbox::BoundingBox;
pub use cell::CellCorners;
pub use metrics::{GridGeometrics, Regularity};
pub use pillar::point_at_depth;
