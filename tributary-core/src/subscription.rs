// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::Result;

/// Handle a subscriber uses to pull values out of a publisher.
///
/// Implementations must tolerate calls from any thread, including re-entrant
/// calls made from inside the subscriber's own callbacks.
pub trait Subscription: Send + Sync {
    /// Grants the publisher `n` more credits.
    ///
    /// # Errors
    ///
    /// Returns [`TributaryError::InvalidDemand`](crate::TributaryError::InvalidDemand)
    /// when `n` is negative, without changing any state.
    fn request(&self, n: i64) -> Result<()>;

    /// Stops delivery. Idempotent.
    fn cancel(&self);

    /// Returns `true` once the subscription has been cancelled or terminated.
    fn is_cancelled(&self) -> bool;
}
