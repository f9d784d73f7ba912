// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 cpgrid developers

//! I/O module - grid snapshots

mod snapshot;

pub use snapshot::{export_snapshot, import_snapshot, GridSnapshot};
