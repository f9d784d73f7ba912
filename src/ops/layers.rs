// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 cpgrid developers

//! Layer operations: collapsing inactive layers, reducing to one layer,
//! vertical refinement and hybrid conversion

use crate::error::{GridError, Result};
use crate::grid::{Grid, GridStore};
use crate::property::GridProperty;

impl Grid {
    /// Collapse inactive cells to zero thickness, column by column.
    ///
    /// Runs of inactive cells above the first or below the last active cell
    /// of a column are snapped onto that active cell's top or base. A run
    /// between two active cells has its inner boundaries snapped to the base
    /// of the active cell above, so its lowest cell keeps the whole gap.
    /// Active cells never change shape; dimensions and the mask are kept.
    /// Returns the number of cells that now have zero thickness by this
    /// operation.
    pub fn collapse_inactive_layers(&mut self) -> usize {
        let (ncol, nrow, nlay) = self.dimensions();
        let store = self.store();
        let actnum = store.actnum();
        let mut zcorn = store.zcorn().to_vec();
        let mut collapsed = 0;

        let snap = |zcorn: &mut Vec<f64>, i: usize, j: usize, from_kb: usize, to_kb: usize| {
            let src = store.zcorn_offset(i, j, from_kb);
            let dst = store.zcorn_offset(i, j, to_kb);
            zcorn.copy_within(src..src + 4, dst);
        };

        for j in 0..nrow {
            for i in 0..ncol {
                let active: Vec<bool> = (0..nlay)
                    .map(|k| actnum[store.index0(i, j, k)] == 1)
                    .collect();
                let (Some(first), Some(last)) = (
                    active.iter().position(|&a| a),
                    active.iter().rposition(|&a| a),
                ) else {
                    continue;
                };

                for kb in 0..first {
                    snap(&mut zcorn, i, j, first, kb);
                }
                collapsed += first;

                for kb in (last + 2)..=nlay {
                    snap(&mut zcorn, i, j, last + 1, kb);
                }
                collapsed += nlay - 1 - last;

                let mut k = first + 1;
                while k < last {
                    if active[k] {
                        k += 1;
                        continue;
                    }
                    let start = k;
                    while !active[k] {
                        k += 1;
                    }
                    // cells start..k are inactive; boundaries start+1..k are inner
                    for kb in (start + 1)..k {
                        snap(&mut zcorn, i, j, start, kb);
                    }
                    collapsed += k - start - 1;
                }
            }
        }

        let actnum = actnum.to_vec();
        self.commit_zcorn_actnum(zcorn, actnum);
        log::info!("Collapsed {} inactive cells to zero thickness", collapsed);
        collapsed
    }

    /// Reduce the grid to a single layer spanning the top of layer 1 to the
    /// base of the last layer.
    ///
    /// A column is active if any of its cells was. Subgrids are cleared and
    /// all attached properties are detached and returned, since they no
    /// longer match the grid. This cannot be undone.
    pub fn reduce_to_single_layer(&mut self) -> Vec<GridProperty> {
        let (ncol, nrow, nlay) = self.dimensions();
        let store = self.store();
        let columns = ncol * nrow;

        let mut zcorn = Vec::with_capacity(GridStore::zcorn_len(ncol, nrow, 1));
        zcorn.extend_from_slice(&store.zcorn()[..columns * 4]);
        let base = store.zcorn_offset(0, 0, nlay);
        zcorn.extend_from_slice(&store.zcorn()[base..base + columns * 4]);

        let actnum: Vec<i32> = (0..columns)
            .map(|column| {
                let any = (0..nlay).any(|k| store.actnum()[k * columns + column] == 1);
                i32::from(any)
            })
            .collect();

        let reduced = GridStore::from_parts((ncol, nrow, 1), store.coord().to_vec(), zcorn, actnum);
        let detached = self.detach_properties();
        self.commit_store(reduced, None);

        log::info!(
            "Reduced grid from {} layers to 1; {} active columns, {} properties detached",
            nlay,
            self.active_count(),
            detached.len()
        );
        detached
    }

    /// Split every layer into `factor` equally thick layers.
    ///
    /// The mask is copied to every new sub-layer and subgrid sizes scale by
    /// `factor`. Attached properties are detached and returned.
    pub fn refine_vertically(&mut self, factor: usize) -> Result<Vec<GridProperty>> {
        if factor == 0 {
            return Err(GridError::invalid("refinement factor must be at least 1"));
        }
        if factor == 1 {
            return Ok(Vec::new());
        }

        let (ncol, nrow, nlay) = self.dimensions();
        let new_nlay = nlay * factor;
        let store = self.store();
        let config = *self.config();
        let columns = ncol * nrow;

        let mut zcorn = Vec::with_capacity(GridStore::zcorn_len(ncol, nrow, new_nlay));
        for k in 0..nlay {
            let top = store.zcorn_offset(0, 0, k);
            let base = store.zcorn_offset(0, 0, k + 1);
            for step in 0..factor {
                let t = step as f64 / factor as f64;
                for n in 0..columns * 4 {
                    let (z1, z2) = (store.zcorn()[top + n], store.zcorn()[base + n]);
                    if config.is_undef(z1) || config.is_undef(z2) {
                        zcorn.push(config.undef);
                    } else {
                        zcorn.push(z1 + (z2 - z1) * t);
                    }
                }
            }
        }
        let last = store.zcorn_offset(0, 0, nlay);
        zcorn.extend_from_slice(&store.zcorn()[last..last + columns * 4]);

        let mut actnum = Vec::with_capacity(columns * new_nlay);
        for k in 0..nlay {
            let layer = &store.actnum()[k * columns..(k + 1) * columns];
            for _ in 0..factor {
                actnum.extend_from_slice(layer);
            }
        }

        let subgrids = self
            .subgrids()
            .map(|counts| counts.iter().map(|n| n * factor).collect());
        let refined =
            GridStore::from_parts((ncol, nrow, new_nlay), store.coord().to_vec(), zcorn, actnum);
        let detached = self.detach_properties();
        self.commit_store(refined, subgrids);

        log::info!("Refined grid vertically from {} to {} layers", nlay, new_nlay);
        Ok(detached)
    }

    /// Convert to a hybrid grid with a horizontal section between the depths
    /// `toplevel` and `bottomlevel`.
    ///
    /// The result has `2 * nlay + nhdiv` layers: the original layers cut off
    /// at `toplevel`, then `nhdiv` equally thick horizontal layers, then the
    /// original layers cut off at `bottomlevel`. Every depth is clamped to
    /// the column's original top and base. Cells thinner than the depth
    /// tolerance become inactive; hybrid cells are active where the column
    /// has any active cell.
    ///
    /// With `region = Some((property, number))` only columns holding a cell
    /// with that value are converted. Other columns keep their layers on top
    /// and get collapsed, inactive cells below.
    ///
    /// Subgrids become `[nlay, nhdiv, nlay]`; attached properties are
    /// detached and returned.
    pub fn convert_to_hybrid(
        &mut self,
        nhdiv: usize,
        toplevel: f64,
        bottomlevel: f64,
        region: Option<(&GridProperty, i32)>,
    ) -> Result<Vec<GridProperty>> {
        let config = *self.config();
        if nhdiv == 0 {
            return Err(GridError::invalid("hybrid division count must be at least 1"));
        }
        if config.is_undef(toplevel) || config.is_undef(bottomlevel) {
            return Err(GridError::invalid(format!(
                "hybrid levels must be defined, got {} and {}",
                toplevel, bottomlevel
            )));
        }
        if toplevel >= bottomlevel {
            return Err(GridError::invalid(format!(
                "hybrid top level {} must be above bottom level {}",
                toplevel, bottomlevel
            )));
        }
        if let Some((property, _)) = region {
            if property.dimensions() != self.dimensions() {
                return Err(GridError::Dimension {
                    name: property.name().to_string(),
                    expected: self.dimensions(),
                    actual: property.dimensions(),
                });
            }
        }

        let (ncol, nrow, nlay) = self.dimensions();
        let new_nlay = 2 * nlay + nhdiv;
        let store = self.store();
        let columns = ncol * nrow;
        let offset = |kb: usize, column: usize, c: usize| (kb * columns + column) * 4 + c;

        let mut zcorn = vec![config.undef; GridStore::zcorn_len(ncol, nrow, new_nlay)];
        let mut actnum = vec![0; columns * new_nlay];

        for j in 0..nrow {
            for i in 0..ncol {
                let column = j * ncol + i;
                let converted = region.map_or(true, |(property, number)| {
                    (0..nlay).any(|k| {
                        property.value_at(store.index0(i, j, k)) == Some(f64::from(number))
                    })
                });
                let any_active = (0..nlay).any(|k| store.actnum()[store.index0(i, j, k)] == 1);

                for c in 0..4 {
                    let z: Vec<f64> = (0..=nlay).map(|kb| store.depths0(i, j, kb)[c]).collect();
                    let (first, last) = (z[0], z[nlay]);
                    let span = !(config.is_undef(first) || config.is_undef(last));
                    let clamp = |v: f64| {
                        if span && !config.is_undef(v) {
                            v.max(first.min(last)).min(first.max(last))
                        } else {
                            v
                        }
                    };
                    let hybrid = |s: usize| {
                        if span {
                            clamp(toplevel + (bottomlevel - toplevel) * s as f64 / nhdiv as f64)
                        } else {
                            config.undef
                        }
                    };

                    for kb in 0..=nlay {
                        zcorn[offset(kb, column, c)] = if !converted || config.is_undef(z[kb]) {
                            z[kb]
                        } else {
                            clamp(z[kb].min(toplevel))
                        };
                    }
                    for s in 1..=nhdiv {
                        zcorn[offset(nlay + s, column, c)] = if converted { hybrid(s) } else { last };
                    }
                    for kb in 1..=nlay {
                        zcorn[offset(nlay + nhdiv + kb, column, c)] = if !converted {
                            last
                        } else if config.is_undef(z[kb]) {
                            z[kb]
                        } else {
                            clamp(z[kb].max(bottomlevel))
                        };
                    }
                }

                for k in 0..nlay {
                    let active = store.actnum()[store.index0(i, j, k)];
                    actnum[k * columns + column] = active;
                    if converted {
                        actnum[(nlay + nhdiv + k) * columns + column] = active;
                    }
                }
                if converted && any_active {
                    for s in 0..nhdiv {
                        actnum[(nlay + s) * columns + column] = 1;
                    }
                }

                for k in 0..new_nlay {
                    let index = k * columns + column;
                    if actnum[index] == 0 {
                        continue;
                    }
                    let thickness: Option<f64> = (0..4)
                        .map(|c| {
                            let (top, base) = (zcorn[offset(k, column, c)], zcorn[offset(k + 1, column, c)]);
                            (!config.is_undef(top) && !config.is_undef(base)).then(|| base - top)
                        })
                        .sum();
                    if let Some(sum) = thickness {
                        if (sum / 4.0).abs() <= config.depth_tolerance {
                            actnum[index] = 0;
                        }
                    }
                }
            }
        }

        let hybrid = GridStore::from_parts((ncol, nrow, new_nlay), store.coord().to_vec(), zcorn, actnum);
        let detached = self.detach_properties();
        self.commit_store(hybrid, Some(vec![nlay, nhdiv, nlay]));

        log::info!(
            "Converted grid to hybrid between {} and {}: {} to {} layers, {} active cells",
            toplevel,
            bottomlevel,
            nlay,
            new_nlay,
            self.active_count()
        );
        Ok(detached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reduce_to_single_layer() {
        let mut grid = Grid::default();
        let mut actnum = vec![0; 60];
        // column (1,1) active only in layer 3
        actnum[2 * 12] = 1;
        grid.set_actnum(actnum).unwrap();
        grid.set_subgrids(Some(vec![2, 3])).unwrap();
        let prop = GridProperty::continuous("PORO", (4, 3, 5), vec![0.1; 60]).unwrap();
        grid.attach_property(prop).unwrap();

        let detached = grid.reduce_to_single_layer();
        assert_eq!(detached.len(), 1);
        assert!(grid.properties().is_empty());
        assert_eq!(grid.dimensions(), (4, 3, 1));
        assert_eq!(grid.active_count(), 1);
        assert_eq!(grid.subgrid_count(), 0);
        assert_relative_eq!(grid.cell_dz(1, 1, 1, true, false).unwrap(), 5.0);
        assert_eq!(grid.zcorn().len(), 4 * 3 * 2 * 4);
    }

    #[test]
    fn test_reduce_is_idempotent() {
        let mut grid = Grid::default();
        grid.reduce_to_single_layer();
        let zcorn = grid.zcorn().to_vec();
        let before = (grid.dimensions(), grid.active_count());

        grid.reduce_to_single_layer();
        assert_eq!((grid.dimensions(), grid.active_count()), before);
        assert_eq!(grid.zcorn(), zcorn.as_slice());
    }

    #[test]
    fn test_collapse_top_and_bottom_runs() {
        let mut grid = Grid::default();
        // column (1,1): only layers 2 and 3 active
        for k in [1, 4, 5] {
            grid.set_active(1, 1, k, false).unwrap();
        }
        let collapsed = grid.collapse_inactive_layers();
        assert_eq!(collapsed, 3);

        assert_relative_eq!(grid.cell_dz(1, 1, 1, true, false).unwrap(), 0.0);
        assert_relative_eq!(grid.cell_dz(1, 1, 2, true, false).unwrap(), 1.0);
        assert_relative_eq!(grid.cell_dz(1, 1, 3, true, false).unwrap(), 1.0);
        assert_relative_eq!(grid.cell_dz(1, 1, 4, true, false).unwrap(), 0.0);
        assert_relative_eq!(grid.cell_dz(1, 1, 5, true, false).unwrap(), 0.0);
        // other columns untouched
        assert_relative_eq!(grid.cell_dz(2, 1, 1, true, false).unwrap(), 1.0);
        assert_eq!(grid.active_count(), 57);
        assert_eq!(grid.nlay(), 5);
    }

    #[test]
    fn test_collapse_interior_run_keeps_active_shapes() {
        let mut grid = Grid::default();
        // column (2,2): layers 2..4 inactive between active 1 and 5
        for k in 2..=4 {
            grid.set_active(2, 2, k, false).unwrap();
        }
        let before_top = grid.cell_corners(2, 2, 1, false).unwrap();
        let before_base = grid.cell_corners(2, 2, 5, false).unwrap();

        assert_eq!(grid.collapse_inactive_layers(), 2);

        assert_eq!(grid.cell_corners(2, 2, 1, false).unwrap(), before_top);
        assert_eq!(grid.cell_corners(2, 2, 5, false).unwrap(), before_base);
        assert_relative_eq!(grid.cell_dz(2, 2, 2, true, false).unwrap(), 0.0);
        assert_relative_eq!(grid.cell_dz(2, 2, 3, true, false).unwrap(), 0.0);
        assert_relative_eq!(grid.cell_dz(2, 2, 4, true, false).unwrap(), 3.0);
    }

    #[test]
    fn test_collapse_skips_fully_inactive_column() {
        let mut grid = Grid::default();
        for k in 1..=5 {
            grid.set_active(4, 3, k, false).unwrap();
        }
        assert_eq!(grid.collapse_inactive_layers(), 0);
        assert_relative_eq!(grid.cell_dz(4, 3, 3, true, false).unwrap(), 1.0);
    }

    #[test]
    fn test_refine_vertically() {
        let mut grid = Grid::default();
        grid.set_subgrids(Some(vec![2, 3])).unwrap();
        grid.set_active(1, 1, 5, false).unwrap();

        grid.refine_vertically(2).unwrap();
        assert_eq!(grid.dimensions(), (4, 3, 10));
        assert_eq!(grid.subgrids(), Some(&[4, 6][..]));
        assert_eq!(grid.active_count(), 118);
        assert!(!grid.is_active(1, 1, 9).unwrap());
        assert!(!grid.is_active(1, 1, 10).unwrap());
        assert_relative_eq!(grid.cell_dz(3, 2, 7, true, false).unwrap(), 0.5);
        let center = grid.cell_center(1, 1, 10, false).unwrap().unwrap();
        assert_relative_eq!(center.z, 4.75);
    }

    #[test]
    fn test_convert_to_hybrid() {
        let mut grid = Grid::default();
        let prop = GridProperty::continuous("PORO", (4, 3, 5), vec![0.2; 60]).unwrap();
        grid.attach_property(prop).unwrap();

        let detached = grid.convert_to_hybrid(2, 2.0, 3.0, None).unwrap();
        assert_eq!(detached.len(), 1);
        assert_eq!(grid.dimensions(), (4, 3, 12));
        assert_eq!(grid.subgrids(), Some(&[5, 2, 5][..]));

        let expected = [1.0, 1.0, 0.0, 0.0, 0.0, 0.5, 0.5, 0.0, 0.0, 0.0, 1.0, 1.0];
        for (k, dz) in expected.iter().enumerate() {
            assert_relative_eq!(grid.cell_dz(2, 3, k + 1, true, false).unwrap(), *dz);
            assert_eq!(grid.is_active(2, 3, k + 1).unwrap(), *dz > 0.0);
        }
        assert_eq!(grid.active_count(), 72);
        assert_eq!(grid.corner_depths(1, 1, 1).unwrap(), [0.0; 4]);
        assert_eq!(grid.corner_depths(1, 1, 13).unwrap(), [5.0; 4]);
    }

    #[test]
    fn test_hybrid_levels_clamped_to_column() {
        let mut grid = Grid::default();
        // a bottom level below the grid base leaves the lower part collapsed
        grid.convert_to_hybrid(1, 4.5, 10.0, None).unwrap();
        assert_eq!(grid.nlay(), 11);
        assert_relative_eq!(grid.cell_dz(1, 1, 5, true, false).unwrap(), 0.5);
        // the hybrid layer ends at the original base
        assert_relative_eq!(grid.cell_dz(1, 1, 6, true, false).unwrap(), 0.5);
        assert!(grid.is_active(1, 1, 6).unwrap());
        assert_relative_eq!(grid.cell_dz(1, 1, 7, true, false).unwrap(), 0.0);
        assert!(!grid.is_active(1, 1, 7).unwrap());
        assert_eq!(grid.corner_depths(1, 1, 12).unwrap(), [5.0; 4]);
        assert_eq!(grid.active_count(), 72);
    }

    #[test]
    fn test_hybrid_region_limits_columns() {
        let mut grid = Grid::default();
        let mut zones = vec![1; 60];
        zones[0] = 2;
        let zone = GridProperty::discrete("ZONE", (4, 3, 5), zones).unwrap();

        grid.convert_to_hybrid(2, 2.0, 3.0, Some((&zone, 2))).unwrap();
        assert_eq!(grid.nlay(), 12);
        // converted column
        assert_relative_eq!(grid.cell_dz(1, 1, 6, true, false).unwrap(), 0.5);
        assert!(grid.is_active(1, 1, 6).unwrap());
        // other columns keep their layers above and collapse below
        for k in 1..=5 {
            assert_relative_eq!(grid.cell_dz(2, 1, k, true, false).unwrap(), 1.0);
            assert!(grid.is_active(2, 1, k).unwrap());
        }
        for k in 6..=12 {
            assert_relative_eq!(grid.cell_dz(2, 1, k, true, false).unwrap(), 0.0);
            assert!(!grid.is_active(2, 1, k).unwrap());
        }
        assert_eq!(grid.active_count(), 6 + 11 * 5);
    }

    #[test]
    fn test_hybrid_inactive_column_stays_inactive() {
        let mut grid = Grid::default();
        for k in 1..=5 {
            grid.set_active(3, 2, k, false).unwrap();
        }
        grid.convert_to_hybrid(2, 2.0, 3.0, None).unwrap();
        assert!((1..=12).all(|k| !grid.is_active(3, 2, k).unwrap()));
        assert_eq!(grid.active_count(), 66);
    }

    #[test]
    fn test_hybrid_rejects_bad_arguments() {
        let mut grid = Grid::default();
        assert!(grid.convert_to_hybrid(0, 2.0, 3.0, None).is_err());
        assert!(grid.convert_to_hybrid(2, 3.0, 2.0, None).is_err());
        assert!(grid.convert_to_hybrid(2, f64::NAN, 3.0, None).is_err());
        let wrong = GridProperty::discrete("ZONE", (4, 3, 1), vec![1; 12]).unwrap();
        assert!(matches!(
            grid.convert_to_hybrid(2, 2.0, 3.0, Some((&wrong, 1))),
            Err(GridError::Dimension { .. })
        ));
        assert_eq!(grid.nlay(), 5);
        assert_eq!(grid.subgrid_count(), 0);
    }

    #[test]
    fn test_refine_rejects_zero() {
        let mut grid = Grid::default();
        assert!(grid.refine_vertically(0).is_err());
        assert!(grid.refine_vertically(1).unwrap().is_empty());
        assert_eq!(grid.nlay(), 5);
    }
}
