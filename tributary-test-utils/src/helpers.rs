// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream::StreamExt;
use futures::Stream;
use std::fmt::Debug;
use std::time::Duration;
use tokio::time::sleep;
use tributary_core::StreamItem;

pub async fn assert_no_element_emitted<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
    T: Debug,
{
    tokio::select! {
        item = stream.next() => {
            panic!("Unexpected item emitted, expected no output: {item:?}");
        }
        _ = sleep(Duration::from_millis(timeout_ms)) => {
        }
    }
}

/// Waits up to `timeout_ms` for the next item.
///
/// # Panics
///
/// Panics on timeout or when the stream has ended.
pub async fn unwrap_stream<S, T>(stream: &mut S, timeout_ms: u64) -> StreamItem<T>
where
    S: Stream<Item = StreamItem<T>> + Unpin,
{
    tokio::select! {
        item = stream.next() => {
            item.expect("Expected an item but the stream ended")
        }
        _ = sleep(Duration::from_millis(timeout_ms)) => {
            panic!("Timeout: no item received within {timeout_ms}ms")
        }
    }
}

/// Waits up to `timeout_ms` for the next item and expects a value.
pub async fn unwrap_value<S, T>(stream: &mut S, timeout_ms: u64) -> T
where
    S: Stream<Item = StreamItem<T>> + Unpin,
{
    match unwrap_stream(stream, timeout_ms).await {
        StreamItem::Value(value) => value,
        StreamItem::Error(error) => panic!("Expected a value, got error: {error}"),
    }
}

/// Asserts that the stream ends within `timeout_ms`.
pub async fn assert_stream_ended<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
    T: Debug,
{
    tokio::select! {
        item = stream.next() => {
            assert!(item.is_none(), "Expected stream end, got {item:?}");
        }
        _ = sleep(Duration::from_millis(timeout_ms)) => {
            panic!("Timeout: stream did not end within {timeout_ms}ms");
        }
    }
}
