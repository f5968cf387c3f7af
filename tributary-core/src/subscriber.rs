// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::{Result, TributaryError};
use crate::subscription::Subscription;
use std::sync::Arc;

/// Receiving end of the push/pull handshake.
///
/// A publisher calls `on_subscribe` exactly once, then `on_next` at most as many
/// times as the subscriber requested, then at most one of `on_error` or
/// `on_complete`. Calls are serialized but may arrive on different threads.
pub trait Subscriber<T>: Send + Sync {
    /// Hands over the subscription used to request values.
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>);

    /// Receives one value.
    ///
    /// # Errors
    ///
    /// Returning `Err` is a delivery fault: the publisher stops delivering and
    /// reports the same error back through `on_error`.
    fn on_next(&self, value: T) -> Result<()>;

    /// Receives the terminal error.
    fn on_error(&self, error: TributaryError);

    /// Receives the completion signal.
    fn on_complete(&self);
}
