// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_channel::Sender;
use futures::{Stream, StreamExt};
use tributary_core::StreamItem;

/// Creates a channel whose receiving end is a stream of `StreamItem::Value`s.
///
/// Dropping or closing the sender ends the stream.
pub fn test_channel<T: Send + 'static>() -> (
    Sender<T>,
    impl Stream<Item = StreamItem<T>> + Send + Unpin,
) {
    let (sender, receiver) = async_channel::unbounded();
    (sender, Box::pin(receiver.map(StreamItem::Value)))
}

/// Creates a channel that carries `StreamItem`s as-is, for injecting errors.
pub fn test_channel_with_errors<T: Send + 'static>() -> (
    Sender<StreamItem<T>>,
    impl Stream<Item = StreamItem<T>> + Send + Unpin,
) {
    let (sender, receiver) = async_channel::unbounded();
    (sender, Box::pin(receiver))
}
