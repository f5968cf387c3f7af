// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Execution utilities bridging async streams to Tributary subscribers.

#![allow(clippy::multiple_crate_versions)]

#[macro_use]
mod logging;

pub mod subscribe_with_demand;

pub use subscribe_with_demand::DemandSubscribeExt;
