// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 cpgrid developers

//! Per-cell properties derived from grid geometry

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{GridError, Result};

/// Cell values, continuous or discrete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValues {
    Continuous(Vec<f64>),
    Discrete(Vec<i32>),
}

impl PropertyValues {
    pub fn len(&self) -> usize {
        match self {
            PropertyValues::Continuous(values) => values.len(),
            PropertyValues::Discrete(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named per-cell array with the dimensions of the grid it came from.
///
/// Values follow the grid's linear cell order. Discrete properties carry a
/// code table mapping each value to a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridProperty {
    name: String,
    ncol: usize,
    nrow: usize,
    nlay: usize,
    values: PropertyValues,
    codes: BTreeMap<i32, String>,
}

impl GridProperty {
    /// Wrap a continuous array
    pub fn continuous(
        name: impl Into<String>,
        dimensions: (usize, usize, usize),
        values: Vec<f64>,
    ) -> Result<Self> {
        Self::build(name.into(), dimensions, PropertyValues::Continuous(values), BTreeMap::new())
    }

    /// Wrap a discrete array, labelling every distinct value by its number
    pub fn discrete(
        name: impl Into<String>,
        dimensions: (usize, usize, usize),
        values: Vec<i32>,
    ) -> Result<Self> {
        let codes = values
            .iter()
            .copied()
            .collect::<BTreeSet<i32>>()
            .into_iter()
            .map(|value| (value, value.to_string()))
            .collect();
        Self::build(name.into(), dimensions, PropertyValues::Discrete(values), codes)
    }

    fn build(
        name: String,
        (ncol, nrow, nlay): (usize, usize, usize),
        values: PropertyValues,
        codes: BTreeMap<i32, String>,
    ) -> Result<Self> {
        let expected = ncol * nrow * nlay;
        if values.len() != expected {
            return Err(GridError::shape("property values", expected, values.len()));
        }
        Ok(Self {
            name,
            ncol,
            nrow,
            nlay,
            values,
            codes,
        })
    }

    /// Replace the code table of a discrete property
    pub fn with_codes(mut self, codes: BTreeMap<i32, String>) -> Result<Self> {
        if !self.is_discrete() {
            return Err(GridError::invalid(format!(
                "property {} is continuous and cannot carry codes",
                self.name
            )));
        }
        self.codes = codes;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimensions(&self) -> (usize, usize, usize) {
        (self.ncol, self.nrow, self.nlay)
    }

    pub fn is_discrete(&self) -> bool {
        matches!(self.values, PropertyValues::Discrete(_))
    }

    pub fn values(&self) -> &PropertyValues {
        &self.values
    }

    pub fn codes(&self) -> &BTreeMap<i32, String> {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at a 0-based linear cell index, as f64
    pub fn value_at(&self, index: usize) -> Option<f64> {
        match &self.values {
            PropertyValues::Continuous(values) => values.get(index).copied(),
            PropertyValues::Discrete(values) => values.get(index).map(|&v| f64::from(v)),
        }
    }

    /// Value of cell `(i, j, k)`, 1-based
    pub fn value(&self, i: usize, j: usize, k: usize) -> Option<f64> {
        if i == 0 || j == 0 || k == 0 || i > self.ncol || j > self.nrow || k > self.nlay {
            return None;
        }
        self.value_at(((k - 1) * self.nrow + (j - 1)) * self.ncol + (i - 1))
    }

    /// Continuous values, or `None` for a discrete property
    pub fn as_continuous(&self) -> Option<&[f64]> {
        match &self.values {
            PropertyValues::Continuous(values) => Some(values),
            PropertyValues::Discrete(_) => None,
        }
    }

    /// Discrete values, or `None` for a continuous property
    pub fn as_discrete(&self) -> Option<&[i32]> {
        match &self.values {
            PropertyValues::Discrete(values) => Some(values),
            PropertyValues::Continuous(_) => None,
        }
    }
}
