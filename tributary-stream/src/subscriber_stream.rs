// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_channel::{Receiver, Sender};
use futures::{Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tributary_core::{Publisher, StreamItem, Subscriber, Subscription, TributaryError};

/// A [`Publisher`] seen as a pull-based [`Stream`].
///
/// The stream keeps at most one value in flight: polling requests a single
/// element and waits for it. A publisher failure surfaces as one
/// `StreamItem::Error` followed by the end of the stream, completion simply ends
/// the stream. Dropping the stream cancels the subscription.
pub struct SubscriberStream<T> {
    receiver: Pin<Box<Receiver<StreamItem<T>>>>,
    handoff: Pin<Box<Receiver<Arc<dyn Subscription>>>>,
    // Keeps the channel open until on_complete/on_error closes it
    _sender: Sender<StreamItem<T>>,
    subscription: Option<Arc<dyn Subscription>>,
    outstanding: bool,
}

impl<T: Send + 'static> SubscriberStream<T> {
    /// Subscribes to `publisher` and returns the resulting stream.
    pub fn subscribe<P>(publisher: &P) -> Self
    where
        P: Publisher<T> + ?Sized,
    {
        let (sender, receiver) = async_channel::unbounded();
        let (handoff_sender, handoff) = async_channel::bounded(1);

        publisher.subscribe(Arc::new(ChannelSubscriber {
            sender: sender.clone(),
            handoff: handoff_sender,
        }));

        let subscription = handoff.try_recv().ok();
        Self {
            receiver: Box::pin(receiver),
            handoff: Box::pin(handoff),
            _sender: sender,
            subscription,
            outstanding: false,
        }
    }
}

impl<T> Stream for SubscriberStream<T> {
    type Item = StreamItem<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = Pin::into_inner(self);

        if this.subscription.is_none() {
            match this.handoff.poll_next_unpin(cx) {
                Poll::Ready(Some(subscription)) => this.subscription = Some(subscription),
                Poll::Ready(None) => {}
                Poll::Pending => return Poll::Pending,
            }
        }

        if !this.outstanding {
            if let Some(subscription) = &this.subscription {
                this.outstanding = true;
                if let Err(error) = subscription.request(1) {
                    return Poll::Ready(Some(StreamItem::Error(error)));
                }
            }
        }

        match this.receiver.poll_next_unpin(cx) {
            Poll::Ready(Some(item)) => {
                this.outstanding = false;
                Poll::Ready(Some(item))
            }
            other => other,
        }
    }
}

impl<T> Drop for SubscriberStream<T> {
    fn drop(&mut self) {
        let subscription = self.subscription.take().or_else(|| self.handoff.try_recv().ok());
        if let Some(subscription) = subscription {
            subscription.cancel();
        }
    }
}

struct ChannelSubscriber<T> {
    sender: Sender<StreamItem<T>>,
    handoff: Sender<Arc<dyn Subscription>>,
}

impl<T: Send> Subscriber<T> for ChannelSubscriber<T> {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        // A second subscription is refused
        if let Err(refused) = self.handoff.try_send(subscription) {
            refused.into_inner().cancel();
        }
    }

    fn on_next(&self, value: T) -> tributary_core::Result<()> {
        self.sender
            .try_send(StreamItem::Value(value))
            .map_err(|_| TributaryError::stream_error("subscriber stream dropped"))
    }

    fn on_error(&self, error: TributaryError) {
        let _ = self.sender.try_send(StreamItem::Error(error));
        self.sender.close();
    }

    fn on_complete(&self) {
        self.sender.close();
    }
}
