// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 cpgrid developers

//! Deactivation of thin cells

use crate::error::{GridError, Result};
use crate::grid::Grid;

impl Grid {
    /// Deactivate every cell thinner than `threshold`.
    ///
    /// Thickness is evaluated on unmasked geometry so currently active cells
    /// are candidates. Integer and float thresholds are accepted; a
    /// non-finite threshold is rejected before anything changes. Returns the
    /// number of cells that went from active to inactive.
    pub fn deactivate_thin_cells<T: Into<f64>>(&mut self, threshold: T) -> Result<usize> {
        let threshold: f64 = threshold.into();
        if !threshold.is_finite() {
            return Err(GridError::invalid(format!(
                "thickness threshold must be a finite number, got {}",
                threshold
            )));
        }

        let mut actnum = self.actnum().to_vec();
        let mut changed = 0;
        for (index, flag) in actnum.iter_mut().enumerate() {
            let (i, j, k) = self.store().ijk0(index);
            if self.dz0(i, j, k, true) < threshold {
                if *flag == 1 {
                    changed += 1;
                }
                *flag = 0;
            }
        }

        self.commit_actnum(actnum);
        log::info!(
            "Deactivated {} cells thinner than {}; {} active cells remain",
            changed,
            threshold,
            self.active_count()
        );
        Ok(changed)
    }
}
