// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::subscriber_stream::SubscriberStream;
use parking_lot::RwLock;
use std::sync::Arc;
use tributary_core::{BufferedSubscription, Publisher, Result, Subscriber, TributaryError};

/// A publisher whose values are pushed by hand.
///
/// Holds at most one subscription. Values are buffered in that subscription and
/// delivered as the subscriber grants credit, so `insert` never blocks and never
/// drops a value for lack of demand.
///
/// Subscribing again replaces the current subscription. The superseded subscriber
/// still receives what was inserted for it, then completes.
///
/// Cloning a `ManualSource` yields another handle to the same source.
///
/// # Example
///
/// ```
/// use futures::{executor::block_on, StreamExt};
/// use tributary_core::StreamItem;
/// use tributary_stream::ManualSource;
///
/// let source = ManualSource::new();
/// let values = source.observe();
///
/// source.insert([1, 2]).unwrap();
/// source.complete().unwrap();
///
/// let received: Vec<_> = block_on(values.collect());
/// assert_eq!(received, vec![StreamItem::Value(1), StreamItem::Value(2)]);
/// ```
pub struct ManualSource<T> {
    current: Arc<RwLock<Option<Arc<BufferedSubscription<T>>>>>,
}

impl<T> Clone for ManualSource<T> {
    fn clone(&self) -> Self {
        Self {
            current: Arc::clone(&self.current),
        }
    }
}

impl<T: Send + 'static> Default for ManualSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> ManualSource<T> {
    pub fn new() -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// Subscribes a fresh stream to this source.
    ///
    /// See [`Publisher::subscribe`] for what happens to a previous subscriber.
    pub fn observe(&self) -> SubscriberStream<T> {
        SubscriberStream::subscribe(self)
    }

    /// Offers each value, in order, to the current subscription.
    ///
    /// Returns the number of values the subscription accepted. Fails with
    /// [`TributaryError::NotSubscribed`] when no live subscription exists.
    pub fn insert<I>(&self, values: I) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
    {
        let subscription = self.active()?;
        let accepted = values
            .into_iter()
            .map(|value| subscription.offer(value))
            .filter(|accepted| *accepted)
            .count();

        trace!("inserted {} values", accepted);
        Ok(accepted)
    }

    /// Completes the current subscription once its queued values are delivered.
    pub fn complete(&self) -> Result<()> {
        self.active()?.complete();
        Ok(())
    }

    /// Fails the current subscription.
    pub fn fail(&self, error: TributaryError) -> Result<()> {
        self.active()?.fail(error);
        Ok(())
    }

    pub fn is_subscribed(&self) -> bool {
        self.current
            .read()
            .as_ref()
            .is_some_and(|subscription| subscription.is_subscribed())
    }

    fn active(&self) -> Result<Arc<BufferedSubscription<T>>> {
        match self.current.read().as_ref() {
            Some(subscription) if subscription.is_subscribed() => Ok(Arc::clone(subscription)),
            _ => Err(TributaryError::NotSubscribed),
        }
    }
}

impl<T: Send + 'static> Publisher<T> for ManualSource<T> {
    fn subscribe(&self, subscriber: Arc<dyn Subscriber<T>>) {
        let subscription = Arc::new(BufferedSubscription::new(Arc::clone(&subscriber)));

        let previous = self.current.write().replace(Arc::clone(&subscription));
        if let Some(previous) = previous {
            debug!("completing superseded subscription");
            previous.complete();
        }

        subscriber.on_subscribe(subscription);
    }
}
