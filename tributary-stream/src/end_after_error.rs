// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::Stream;
use pin_project::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};
use tributary_core::StreamItem;

/// Forwards items until the first `StreamItem::Error`, then ends.
///
/// The inner stream is dropped as soon as it errors or ends, releasing whatever
/// upstream subscriptions it holds.
#[pin_project]
pub struct EndAfterError<S> {
    #[pin]
    inner: Option<S>,
}

impl<S> EndAfterError<S> {
    pub fn new(inner: S) -> Self {
        Self { inner: Some(inner) }
    }
}

impl<S, T> Stream for EndAfterError<S>
where
    S: Stream<Item = StreamItem<T>>,
{
    type Item = StreamItem<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        let Some(inner) = this.inner.as_mut().as_pin_mut() else {
            return Poll::Ready(None);
        };

        let polled = inner.poll_next(cx);
        if matches!(polled, Poll::Ready(Some(StreamItem::Error(_)) | None)) {
            this.inner.set(None);
        }
        polled
    }
}
