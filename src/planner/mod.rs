// (c) Copyright 2026 The wayfind authors
// SPDX-License-Identifier: MIT

mod error;
mod session;

pub use error::PlanError;
pub use session::{Route, RoutePlanner};
