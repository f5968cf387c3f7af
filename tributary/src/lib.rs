// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Tributary
//!
//! Backpressure-aware push streams for async Rust.
//!
//! A [`Publisher`] hands each [`Subscriber`] a [`Subscription`]. The subscriber
//! declares how many values it is ready for with `request(n)`, and is never pushed
//! more than that. Values produced ahead of demand wait in a lock-free buffer.
//!
//! ## Building blocks
//!
//! - [`BufferedSubscription`]: credit counter plus unbounded queue; delivery is
//!   serialised even when producers and requesters race on different threads
//! - [`ManualSource`]: a publisher whose values are inserted by hand
//! - [`SubscriberStream`]: pulls any publisher as a `Stream`, one value
//!   per poll
//! - [`combine_latest`] / [`CombineLatestExt`]: emits a combination of the latest
//!   value of every source once all of them have produced one
//! - [`DemandSubscribeExt`]: drives a stream into a subscriber, pulling upstream
//!   only while there is demand
//!
//! ## Example
//!
//! ```
//! use tributary::prelude::*;
//! use tributary_test_utils::TestProbe;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> anyhow::Result<()> {
//! let temperature = ManualSource::<f64>::new();
//! let humidity = ManualSource::<u8>::new();
//!
//! let readings = (temperature.observe(), humidity.observe())
//!     .combine_latest(|(t, h)| format!("{t}C {h}%"));
//! let mut probe = TestProbe::run(readings);
//!
//! temperature.insert([21.5])?;
//! humidity.insert([40, 45])?;
//!
//! probe.request(1).expect_next("21.5C 40%".to_string()).await;
//! probe.request(1).expect_next("21.5C 45%".to_string()).await;
//! # Ok(())
//! # }
//! ```

#![allow(clippy::multiple_crate_versions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Re-export the handshake and its buffered implementation
pub use tributary_core::{
    add_and_cap, add_cap, validate_demand, BufferedSubscription, DemandSignal, Publisher, Result,
    StreamItem, Subscriber, Subscription, TributaryError, UNBOUNDED,
};

// Re-export sources and operators
pub use tributary_stream::{
    combine_latest, try_combine_latest, CombineLatest, CombineLatestExt, CombinedState,
    ManualSource, SubscriberStream,
};

// Re-export execution
pub use tributary_exec::DemandSubscribeExt;

/// Prelude module for convenient imports
pub mod prelude {
    pub use tributary_core::{Publisher, StreamItem, Subscriber, Subscription, TributaryError};
    pub use tributary_exec::DemandSubscribeExt;
    pub use tributary_stream::{combine_latest, try_combine_latest, CombineLatestExt, ManualSource};
}
