// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use std::thread;
use std::time::Duration;
use tributary_core::{Result, Subscriber, Subscription, TributaryError};

/// Synchronous subscriber that records everything it is handed.
///
/// Optional behaviours make it useful for protocol tests:
///
/// - [`failing_at`](Self::failing_at) returns `Err` from the n-th `on_next`
/// - [`cancelling_at`](Self::cancelling_at) cancels the subscription from inside
///   the n-th `on_next`
/// - [`with_delivery_delay`](Self::with_delivery_delay) stretches every delivery so
///   overlapping `on_next` calls become observable through
///   [`overlapping_deliveries`](Self::overlapping_deliveries)
///
/// Deliveries are counted from zero.
pub struct RecordingSubscriber<T> {
    values: Mutex<Vec<T>>,
    errors: Mutex<Vec<TributaryError>>,
    completions: AtomicUsize,
    subscription: Mutex<Option<Weak<dyn Subscription>>>,
    fail_at: Option<usize>,
    cancel_at: Option<usize>,
    delivery_delay: Option<Duration>,
    in_delivery: AtomicBool,
    overlaps: AtomicUsize,
}

impl<T> Default for RecordingSubscriber<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RecordingSubscriber<T> {
    pub fn new() -> Self {
        Self {
            values: Mutex::new(Vec::new()),
            errors: Mutex::new(Vec::new()),
            completions: AtomicUsize::new(0),
            subscription: Mutex::new(None),
            fail_at: None,
            cancel_at: None,
            delivery_delay: None,
            in_delivery: AtomicBool::new(false),
            overlaps: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn failing_at(mut self, delivery: usize) -> Self {
        self.fail_at = Some(delivery);
        self
    }

    #[must_use]
    pub fn cancelling_at(mut self, delivery: usize) -> Self {
        self.cancel_at = Some(delivery);
        self
    }

    #[must_use]
    pub fn with_delivery_delay(mut self, delay: Duration) -> Self {
        self.delivery_delay = Some(delay);
        self
    }

    /// Wraps the recorder in an `Arc`, ready to be subscribed.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn values(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.values.lock().clone()
    }

    pub fn value_count(&self) -> usize {
        self.values.lock().len()
    }

    pub fn errors(&self) -> Vec<TributaryError> {
        self.errors.lock().clone()
    }

    pub fn completions(&self) -> usize {
        self.completions.load(Ordering::SeqCst)
    }

    /// Number of `on_next` calls that started while another was still running.
    pub fn overlapping_deliveries(&self) -> usize {
        self.overlaps.load(Ordering::SeqCst)
    }

    /// Whether `on_subscribe` has been called.
    pub fn is_subscribed(&self) -> bool {
        self.subscription.lock().is_some()
    }

    /// The subscription handed over by `on_subscribe`, while its owner keeps it alive.
    pub fn subscription(&self) -> Option<Arc<dyn Subscription>> {
        self.subscription.lock().as_ref().and_then(Weak::upgrade)
    }
}

impl<T: Send> Subscriber<T> for RecordingSubscriber<T> {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        *self.subscription.lock() = Some(Arc::downgrade(&subscription));
    }

    fn on_next(&self, value: T) -> Result<()> {
        if self.in_delivery.swap(true, Ordering::SeqCst) {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        if let Some(delay) = self.delivery_delay {
            thread::sleep(delay);
        }

        let delivery = {
            let mut values = self.values.lock();
            values.push(value);
            values.len() - 1
        };

        if self.cancel_at == Some(delivery) {
            if let Some(subscription) = self.subscription() {
                subscription.cancel();
            }
        }

        self.in_delivery.store(false, Ordering::SeqCst);

        if self.fail_at == Some(delivery) {
            return Err(TributaryError::stream_error(format!(
                "injected failure at delivery {delivery}"
            )));
        }
        Ok(())
    }

    fn on_error(&self, error: TributaryError) {
        self.errors.lock().push(error);
    }

    fn on_complete(&self) {
        self.completions.fetch_add(1, Ordering::SeqCst);
    }
}
