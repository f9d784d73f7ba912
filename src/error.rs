// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 cpgrid developers

//! Error types for grid construction, indexing and mutation

use thiserror::Error;

/// Errors raised by the grid core.
///
/// Geometry degeneracy is never an error: degenerate cells resolve to the
/// undefined sentinel instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// An array does not match the size implied by the grid dimensions
    #[error("shape mismatch for {array}: expected {expected} values, got {actual}")]
    Shape {
        array: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A cell, pillar or layer index is outside the grid
    #[error("{axis} index {index} out of range 1..={max}")]
    IndexOutOfRange {
        axis: &'static str,
        index: usize,
        max: usize,
    },

    /// A precondition on an argument failed; nothing was mutated
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A property does not have the dimensions of the grid it is attached to
    #[error("property {name} has dimensions {actual:?}, grid is {expected:?}")]
    Dimension {
        name: String,
        expected: (usize, usize, usize),
        actual: (usize, usize, usize),
    },
}

impl GridError {
    pub(crate) fn shape(array: &'static str, expected: usize, actual: usize) -> Self {
        Self::Shape {
            array,
            expected,
            actual,
        }
    }

    pub(crate) fn index(axis: &'static str, index: usize, max: usize) -> Self {
        Self::IndexOutOfRange { axis, index, max }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Result alias for grid operations
pub type Result<T> = std::result::Result<T, GridError>;
