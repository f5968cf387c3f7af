// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Prelude module re-exporting the commonly used traits and types.
//!
//! ```
//! use tributary_stream::prelude::*;
//!
//! let source: ManualSource<u8> = ManualSource::new();
//! assert!(!source.is_subscribed());
//! ```

pub use crate::combine_latest::{combine_latest, try_combine_latest, CombineLatestExt};
pub use crate::manual_source::ManualSource;
pub use crate::subscriber_stream::SubscriberStream;
pub use tributary_core::{Publisher, StreamItem, Subscriber, Subscription};
