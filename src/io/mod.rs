// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations: image loading, storage and session handoff.

pub mod autosave;
pub mod handoff;
pub mod media;
pub mod messaging;
pub mod storage;
