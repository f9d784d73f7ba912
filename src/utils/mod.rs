// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 cpgrid developers

//! Shared helpers

pub mod math;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Evaluate `f` for every linear cell index in `0..count`, in index order
#[cfg(feature = "parallel")]
pub(crate) fn map_cells<T, F>(count: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    (0..count).into_par_iter().map(f).collect()
}

/// Evaluate `f` for every linear cell index in `0..count`, in index order
#[cfg(not(feature = "parallel"))]
pub(crate) fn map_cells<T, F>(count: usize, f: F) -> Vec<T>
where
    F: Fn(usize) -> T,
{
    (0..count).map(f).collect()
}
