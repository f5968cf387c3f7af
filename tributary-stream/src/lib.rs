// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Sources and operators built on the Tributary backpressure core.
//!
//! - [`ManualSource`] is a publisher fed by hand through [`ManualSource::insert`]
//! - [`SubscriberStream`] turns any publisher into a pull-based [`futures::Stream`]
//! - [`combine_latest`] and [`CombineLatestExt`] combine the latest values of
//!   several sources
//!
//! ```
//! use futures::{executor::block_on, StreamExt};
//! use tributary_core::StreamItem;
//! use tributary_stream::prelude::*;
//!
//! let left = ManualSource::new();
//! let right = ManualSource::new();
//! let mut combined = (left.observe(), right.observe())
//!     .combine_latest(|(a, b): (i32, i32)| format!("{a}:{b}"));
//!
//! left.insert([1]).unwrap();
//! right.insert([2]).unwrap();
//!
//! let first = block_on(combined.next());
//! assert_eq!(first, Some(StreamItem::Value("1:2".to_string())));
//! ```

#![allow(clippy::multiple_crate_versions)]

#[macro_use]
mod logging;

pub mod combine_latest;
pub mod combined_state;
pub mod end_after_error;
pub mod manual_source;
pub mod merge_indexed;
pub mod prelude;
pub mod subscriber_stream;

pub use combine_latest::{combine_latest, try_combine_latest, CombineLatest, CombineLatestExt};
pub use combined_state::CombinedState;
pub use end_after_error::EndAfterError;
pub use manual_source::ManualSource;
pub use merge_indexed::{merge_indexed, MergeIndexed};
pub use subscriber_stream::SubscriberStream;
