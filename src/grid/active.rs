// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 cpgrid developers

//! Lazily computed index of active cells

use std::sync::OnceLock;

/// Cache of the ascending linear indices where the mask is 1.
///
/// Filled on first read; every mask mutation must call
/// [`ActiveCells::invalidate`] before the grid is read again.
#[derive(Debug, Default)]
pub struct ActiveCells {
    indices: OnceLock<Vec<usize>>,
}

impl ActiveCells {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active indices for `actnum`, computing them if the cache is empty
    pub fn indices(&self, actnum: &[i32]) -> &[usize] {
        self.indices.get_or_init(|| {
            log::debug!("Rebuilding active cell index for {} cells", actnum.len());
            actnum
                .iter()
                .enumerate()
                .filter(|(_, &flag)| flag == 1)
                .map(|(index, _)| index)
                .collect()
        })
    }

    pub fn count(&self, actnum: &[i32]) -> usize {
        self.indices(actnum).len()
    }

    /// Drop the cached indices
    pub fn invalidate(&mut self) {
        self.indices.take();
    }

    pub fn is_cached(&self) -> bool {
        self.indices.get().is_some()
    }
}

impl Clone for ActiveCells {
    fn clone(&self) -> Self {
        let indices = OnceLock::new();
        if let Some(cached) = self.indices.get() {
            let _ = indices.set(cached.clone());
        }
        Self { indices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_are_ascending() {
        let cache = ActiveCells::new();
        let actnum = [1, 0, 1, 1, 0];
        assert_eq!(cache.indices(&actnum), &[0, 2, 3]);
        assert_eq!(cache.count(&actnum), 3);
    }

    #[test]
    fn test_invalidate_forces_rebuild() {
        let mut cache = ActiveCells::new();
        let mut actnum = vec![1, 1, 1];
        assert_eq!(cache.count(&actnum), 3);
        assert!(cache.is_cached());

        actnum[1] = 0;
        cache.invalidate();
        assert!(!cache.is_cached());
        assert_eq!(cache.indices(&actnum), &[0, 2]);
    }
}
