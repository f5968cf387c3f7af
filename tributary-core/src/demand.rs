// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Credit arithmetic for demand accounting.
//!
//! Demand accumulates in an [`AtomicU64`]. Additions saturate at [`UNBOUNDED`]
//! instead of wrapping, and a counter sitting at `UNBOUNDED` is never decremented:
//! it means the subscriber asked for everything.

use crate::error::{Result, TributaryError};
use core::sync::atomic::{AtomicU64, Ordering};

/// Saturation sentinel for credit counters.
pub const UNBOUNDED: u64 = u64::MAX;

/// Adds two credit counts, capping the result at [`UNBOUNDED`].
///
/// ```
/// use tributary_core::{add_cap, UNBOUNDED};
///
/// assert_eq!(add_cap(2, 3), 5);
/// assert_eq!(add_cap(UNBOUNDED - 1, 5), UNBOUNDED);
/// ```
#[must_use]
pub const fn add_cap(a: u64, b: u64) -> u64 {
    a.saturating_add(b)
}

/// Atomically adds `n` to `counter`, capping at [`UNBOUNDED`].
///
/// Returns the value held just before the successful update. Lock-free: a
/// compare-and-swap loop that only retries when another thread changed the
/// counter in between.
pub fn add_and_cap(counter: &AtomicU64, n: u64) -> u64 {
    let mut current = counter.load(Ordering::Acquire);
    loop {
        let next = add_cap(current, n);
        match counter.compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire) {
            Ok(previous) => return previous,
            Err(actual) => current = actual,
        }
    }
}

/// Validates a `request(n)` argument and converts it to credit.
///
/// `i64::MAX` stands for "everything" and maps to [`UNBOUNDED`].
///
/// ```
/// use tributary_core::{validate_demand, UNBOUNDED};
///
/// assert_eq!(validate_demand(3).unwrap(), 3);
/// assert_eq!(validate_demand(i64::MAX).unwrap(), UNBOUNDED);
/// assert!(validate_demand(-1).is_err());
/// ```
///
/// # Errors
///
/// Returns [`TributaryError::InvalidDemand`] when `n` is negative.
pub fn validate_demand(n: i64) -> Result<u64> {
    match n {
        i64::MAX => Ok(UNBOUNDED),
        n if n < 0 => Err(TributaryError::invalid_demand(n)),
        n => Ok(n.unsigned_abs()),
    }
}
