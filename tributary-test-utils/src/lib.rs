// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities for the Tributary backpressure library.
//!
//! Designed for development and testing only, not for production code.
//!
//! # Key Types
//!
//! - [`TestProbe`] - an async subscriber whose demand is controlled by the test,
//!   with `expect_*` assertions on what arrives
//! - [`RecordingSubscriber`] - a synchronous subscriber that records deliveries
//!   and can inject faults or cancel mid-drain
//! - [`test_channel`] / [`test_channel_with_errors`] - plain streams fed from a
//!   channel sender
//!
//! # Example
//!
//! ```rust
//! use tributary_test_utils::{test_channel, unwrap_value};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (tx, stream) = test_channel();
//! let mut stream = Box::pin(stream);
//!
//! tx.try_send(7).unwrap();
//! assert_eq!(unwrap_value(&mut stream, 100).await, 7);
//! # }
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod helpers;
pub mod recording_subscriber;
pub mod test_channel;
pub mod test_probe;

pub use helpers::{assert_no_element_emitted, assert_stream_ended, unwrap_stream, unwrap_value};
pub use recording_subscriber::RecordingSubscriber;
pub use test_channel::{test_channel, test_channel_with_errors};
pub use test_probe::{ProbeSignal, TestProbe};
