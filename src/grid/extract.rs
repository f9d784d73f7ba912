// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 cpgrid developers

//! Per-cell arrays from the geometry kernel, wrapped as grid properties

use std::collections::BTreeMap;

use super::Grid;
use crate::error::Result;
use crate::property::GridProperty;
use crate::utils::map_cells;

impl Grid {
    /// The active mask as a discrete property with codes {0, 1}
    pub fn get_actnum(&self, name: &str) -> Result<GridProperty> {
        let codes = BTreeMap::from([(0, "0".to_string()), (1, "1".to_string())]);
        GridProperty::discrete(name, self.dimensions(), self.actnum().to_vec())?.with_codes(codes)
    }

    /// 1-based I, J and K index of every cell as three discrete properties
    pub fn get_indices(&self, names: [&str; 3]) -> Result<[GridProperty; 3]> {
        let store = self.store();
        let count = self.ntotal();
        let ijk: Vec<(usize, usize, usize)> = (0..count).map(|index| store.ijk0(index)).collect();

        let axis = |pick: fn(&(usize, usize, usize)) -> usize| -> Vec<i32> {
            ijk.iter().map(|cell| pick(cell) as i32 + 1).collect()
        };

        Ok([
            GridProperty::discrete(names[0], self.dimensions(), axis(|c| c.0))?,
            GridProperty::discrete(names[1], self.dimensions(), axis(|c| c.1))?,
            GridProperty::discrete(names[2], self.dimensions(), axis(|c| c.2))?,
        ])
    }

    /// Cell thickness for every cell, see [`Grid::cell_dz`]
    pub fn get_dz(&self, name: &str, flip: bool, active_only: bool) -> Result<GridProperty> {
        let undef = self.undef();
        let actnum = self.actnum();
        let values = map_cells(self.ntotal(), |index| {
            if active_only && actnum[index] == 0 {
                return undef;
            }
            let (i, j, k) = self.store().ijk0(index);
            self.dz0(i, j, k, flip)
        });
        GridProperty::continuous(name, self.dimensions(), values)
    }

    /// Cell dx and dy for every cell, see [`Grid::cell_dx`]
    pub fn get_dxdy(&self, names: [&str; 2]) -> Result<[GridProperty; 2]> {
        let pairs = map_cells(self.ntotal(), |index| {
            let (i, j, k) = self.store().ijk0(index);
            self.dxdy0(i, j, k)
        });
        let (dx, dy): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        Ok([
            GridProperty::continuous(names[0], self.dimensions(), dx)?,
            GridProperty::continuous(names[1], self.dimensions(), dy)?,
        ])
    }

    /// Cell centre X, Y and Z for every cell
    pub fn get_xyz(&self, names: [&str; 3], active_only: bool) -> Result<[GridProperty; 3]> {
        let centers = self.cell_centers(active_only);
        let x = centers.iter().map(|p| p.x).collect();
        let y = centers.iter().map(|p| p.y).collect();
        let z = centers.iter().map(|p| p.z).collect();
        Ok([
            GridProperty::continuous(names[0], self.dimensions(), x)?,
            GridProperty::continuous(names[1], self.dimensions(), y)?,
            GridProperty::continuous(names[2], self.dimensions(), z)?,
        ])
    }

    /// Corner coordinates of every cell as 24 properties named
    /// `X0, Y0, Z0, ..., X7, Y7, Z7` (with the given prefixes)
    pub fn get_xyz_corners(&self, prefixes: [&str; 3]) -> Result<Vec<GridProperty>> {
        let corners = map_cells(self.ntotal(), |index| {
            let (i, j, k) = self.store().ijk0(index);
            self.corners0(i, j, k).to_flat()
        });

        let mut props = Vec::with_capacity(24);
        for slot in 0..24 {
            let name = format!("{}{}", prefixes[slot % 3], slot / 3);
            let values = corners.iter().map(|flat| flat[slot]).collect();
            props.push(GridProperty::continuous(name, self.dimensions(), values)?);
        }
        Ok(props)
    }
}
