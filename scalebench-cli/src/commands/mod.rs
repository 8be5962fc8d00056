// SPDX-License-Identifier: Apache-2.0

//! CLI command modules.

pub mod explore;
pub mod runs;
pub mod validate;
