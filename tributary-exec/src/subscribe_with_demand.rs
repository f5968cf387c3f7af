// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;
use futures::stream::{Stream, StreamExt};
use std::sync::Arc;
use tributary_core::{BufferedSubscription, Result, StreamItem, Subscriber};

/// Extension trait exposing a stream to a [`Subscriber`] under its demand.
#[async_trait]
pub trait DemandSubscribeExt<T>: Stream<Item = StreamItem<T>> + Sized {
    /// Drives the stream into `subscriber`, pulling only as much as it requested.
    ///
    /// A [`BufferedSubscription`] is handed to the subscriber via `on_subscribe`. The
    /// stream is polled only while the subscriber holds credit for more than what
    /// is already buffered, so a slow subscriber pauses the whole upstream chain
    /// instead of growing a queue.
    ///
    /// # Behavior
    ///
    /// - `StreamItem::Value` is offered to the subscription
    /// - `StreamItem::Error` fails the subscription and ends the pump
    /// - the end of the stream completes the subscription
    /// - cancellation is observed before each pull and stops the pump; the stream is
    ///   dropped without being polled again
    ///
    /// # Errors
    ///
    /// Returns the error that ended the stream, after it has been delivered to
    /// the subscriber. Completion and cancellation return `Ok(())`.
    ///
    /// # Examples
    ///
    /// ```
    /// use futures::stream;
    /// use std::sync::Arc;
    /// use tributary_core::{StreamItem, Subscriber};
    /// use tributary_exec::DemandSubscribeExt;
    /// use tributary_test_utils::RecordingSubscriber;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let recorder = RecordingSubscriber::new().shared();
    /// let subscriber: Arc<dyn Subscriber<i32>> = recorder.clone();
    /// let values = stream::iter(vec![StreamItem::Value(1), StreamItem::Value(2)]);
    ///
    /// // Nothing requested: the pump parks until demand arrives
    /// let pump = tokio::spawn(values.subscribe_with_demand(subscriber));
    /// tokio::task::yield_now().await;
    /// assert_eq!(recorder.value_count(), 0);
    /// # pump.abort();
    /// # }
    /// ```
    async fn subscribe_with_demand(self, subscriber: Arc<dyn Subscriber<T>>) -> Result<()>;
}

#[async_trait]
impl<S, T> DemandSubscribeExt<T> for S
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Send + 'static,
{
    async fn subscribe_with_demand(self, subscriber: Arc<dyn Subscriber<T>>) -> Result<()> {
        let subscription = Arc::new(BufferedSubscription::new(Arc::clone(&subscriber)));
        subscriber.on_subscribe(subscription.clone());

        let mut stream = Box::pin(self);
        debug!("demand-driven subscription started");

        loop {
            subscription.demand().await;
            if !subscription.is_subscribed() {
                debug!("subscriber gone, stopping pump");
                return Ok(());
            }

            match stream.next().await {
                Some(StreamItem::Value(value)) => {
                    if !subscription.offer(value) {
                        trace!("value rejected by closed subscription");
                    }
                }
                Some(StreamItem::Error(error)) => {
                    warn!("stream failed: {}", error);
                    subscription.fail(error.clone());
                    return Err(error);
                }
                None => {
                    debug!("stream ended");
                    subscription.complete();
                    return Ok(());
                }
            }
        }
    }
}
