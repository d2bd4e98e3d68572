// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Object storage backends for archived state.

pub mod discard;
pub mod memory;
pub mod s3;
mod traits;

pub use discard::DiscardStore;
pub use memory::MemoryStore;
pub use s3::S3Store;
pub use traits::*;
