// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};

type BoxedStream<T> = Pin<Box<dyn Stream<Item = T> + Send>>;

/// Merges several streams, tagging each item with the index of its stream.
///
/// Every call polls each stream that has no item held yet, then emits the held
/// item that was observed first. Items therefore leave in the order they were
/// seen, so a busy stream cannot starve the others, and at most one item per
/// stream waits inside the merge. The order of items coming from one stream is
/// preserved. The merge ends once every stream has ended and nothing is held.
pub struct MergeIndexed<T> {
    streams: Vec<Option<BoxedStream<T>>>,
    held: Vec<Option<(u64, T)>>,
    observed: u64,
}

/// Merges `streams` into one stream of `(index, item)` pairs.
///
/// ```
/// use futures::{executor::block_on, stream, StreamExt};
/// use tributary_stream::merge_indexed;
///
/// let merged = merge_indexed(vec![stream::iter(vec!['a', 'c']), stream::iter(vec!['b'])]);
/// let items: Vec<_> = block_on(merged.collect());
/// assert_eq!(items, vec![(0, 'a'), (1, 'b'), (0, 'c')]);
/// ```
pub fn merge_indexed<S, T>(streams: Vec<S>) -> MergeIndexed<T>
where
    S: Stream<Item = T> + Send + 'static,
{
    let streams: Vec<_> = streams
        .into_iter()
        .map(|stream| Some(Box::pin(stream) as BoxedStream<T>))
        .collect();
    let held = streams.iter().map(|_| None).collect();

    MergeIndexed {
        streams,
        held,
        observed: 0,
    }
}

// Streams are boxed and held items are never pinned
impl<T> Unpin for MergeIndexed<T> {}

impl<T> Stream for MergeIndexed<T> {
    type Item = (usize, T);

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = Pin::into_inner(self);

        for (stream_slot, held) in this.streams.iter_mut().zip(this.held.iter_mut()) {
            if held.is_some() {
                continue;
            }
            let Some(stream) = stream_slot.as_mut() else {
                continue;
            };

            match stream.as_mut().poll_next(cx) {
                Poll::Ready(Some(item)) => {
                    *held = Some((this.observed, item));
                    this.observed += 1;
                }
                Poll::Ready(None) => *stream_slot = None,
                Poll::Pending => {}
            }
        }

        let oldest = this
            .held
            .iter()
            .enumerate()
            .filter_map(|(index, held)| held.as_ref().map(|(seen, _)| (*seen, index)))
            .min()
            .map(|(_, index)| index);

        if let Some(index) = oldest {
            if let Some((_, item)) = this.held[index].take() {
                return Poll::Ready(Some((index, item)));
            }
        }

        if this.streams.iter().all(Option::is_none) {
            Poll::Ready(None)
        } else {
            Poll::Pending
        }
    }
}
