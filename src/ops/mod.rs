// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 cpgrid developers

//! Operations that mutate a grid: mask edits, layer edits and transforms

mod layers;
mod polygon;
mod thickness;
mod transform;

pub use polygon::{Polygon, PolygonIssue, PolygonReport};
