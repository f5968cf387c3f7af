// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Core types for backpressure-aware, push-based streams.
//!
//! This crate holds the pieces every other Tributary crate builds on:
//!
//! - **[`Publisher`] / [`Subscriber`] / [`Subscription`]**: the push/pull handshake.
//!   A subscriber receives a subscription, declares demand with `request(n)` and is
//!   then pushed at most `n` values.
//! - **[`BufferedSubscription`]**: a subscription backed by an unbounded lock-free
//!   queue. Producers `offer` values from any thread; values reach the subscriber
//!   only while credit is available, and never from two threads at once.
//! - **[`demand`]**: overflow-safe credit arithmetic.
//! - **[`StreamItem`] / [`TributaryError`]**: in-band errors for stream pipelines.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tributary_core::{BufferedSubscription, Result, Subscriber, Subscription, TributaryError};
//! use std::sync::Mutex;
//!
//! #[derive(Default)]
//! struct Collect(Mutex<Vec<i32>>);
//!
//! impl Subscriber<i32> for Collect {
//!     fn on_subscribe(&self, _subscription: Arc<dyn Subscription>) {}
//!     fn on_next(&self, value: i32) -> Result<()> {
//!         self.0.lock().unwrap().push(value);
//!         Ok(())
//!     }
//!     fn on_error(&self, _error: TributaryError) {}
//!     fn on_complete(&self) {}
//! }
//!
//! let collect = Arc::new(Collect::default());
//! let subscription = BufferedSubscription::new(collect.clone());
//!
//! subscription.offer(1);
//! subscription.offer(2);
//! assert!(collect.0.lock().unwrap().is_empty()); // no credit yet
//!
//! subscription.request(1).unwrap();
//! assert_eq!(*collect.0.lock().unwrap(), vec![1]);
//! ```

#[macro_use]
mod logging;

pub mod buffered_subscription;
pub mod demand;
pub mod error;
pub mod publisher;
pub mod stream_item;
pub mod subscriber;
pub mod subscription;

pub use self::buffered_subscription::{BufferedSubscription, DemandSignal};
pub use self::demand::{add_and_cap, add_cap, validate_demand, UNBOUNDED};
pub use self::error::{IntoTributaryError, Result, ResultExt, TributaryError};
pub use self::publisher::Publisher;
pub use self::stream_item::StreamItem;
pub use self::subscriber::Subscriber;
pub use self::subscription::Subscription;
