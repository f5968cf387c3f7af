// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream::{self, StreamExt};
use tributary_core::StreamItem;
use tributary_stream::merge_indexed;
use tributary_test_utils::{assert_no_element_emitted, test_channel, unwrap_stream};

#[tokio::test]
async fn test_merge_indexed_interleaves_ready_streams() {
    // Arrange
    let merged = merge_indexed(vec![
        stream::iter(vec!["a1", "a2", "a3"]),
        stream::iter(vec!["b1", "b2", "b3"]),
    ]);

    // Act
    let items: Vec<_> = merged.collect().await;

    // Assert
    assert_eq!(
        items,
        vec![(0, "a1"), (1, "b1"), (0, "a2"), (1, "b2"), (0, "a3"), (1, "b3")]
    );
}

#[tokio::test]
async fn test_merge_indexed_drains_longer_stream_after_others_end() {
    let merged = merge_indexed(vec![
        stream::iter(vec![1]),
        stream::iter(vec![2, 3, 4]),
        stream::iter(vec![]),
    ]);

    let items: Vec<_> = merged.collect().await;

    assert_eq!(items, vec![(0, 1), (1, 2), (1, 3), (1, 4)]);
}

#[tokio::test]
async fn test_merge_indexed_emits_in_observed_order() -> anyhow::Result<()> {
    // Arrange
    let (tx_a, a) = test_channel::<i32>();
    let (tx_b, b) = test_channel::<i32>();
    let mut merged = merge_indexed(vec![a, b]);
    tx_a.try_send(1)?;
    tx_b.try_send(2)?;
    assert_eq!(merged.next().await, Some((0, StreamItem::Value(1))));

    // Act: stream 0 is polled first, but the item held for stream 1 is older
    tx_a.try_send(3)?;

    // Assert
    assert_eq!(merged.next().await, Some((1, StreamItem::Value(2))));
    assert_eq!(merged.next().await, Some((0, StreamItem::Value(3))));

    Ok(())
}

#[tokio::test]
async fn test_merge_indexed_skips_pending_streams() -> anyhow::Result<()> {
    // Arrange
    let (tx_a, a) = test_channel::<i32>();
    let (tx_b, b) = test_channel::<i32>();
    let mut merged = merge_indexed(vec![a, b]);

    // Act
    tx_b.try_send(7)?;

    // Assert
    let (index, item) = merged.next().await.expect("merged item");
    assert_eq!(index, 1);
    assert_eq!(item, StreamItem::Value(7));

    tx_a.try_send(8)?;
    let (index, _) = merged.next().await.expect("merged item");
    assert_eq!(index, 0);

    Ok(())
}

#[tokio::test]
async fn test_merge_indexed_stays_open_while_any_stream_is_open() -> anyhow::Result<()> {
    let (tx_a, a) = test_channel::<i32>();
    let (tx_b, b) = test_channel::<i32>();
    let mut merged = merge_indexed(vec![a, b]).map(|(index, item)| item.map(|v| (index, v)));

    drop(tx_a);
    assert_no_element_emitted(&mut merged, 50).await;

    tx_b.try_send(3)?;
    assert_eq!(unwrap_stream(&mut merged, 500).await, StreamItem::Value((1, 3)));

    drop(tx_b);
    assert!(merged.next().await.is_none());

    Ok(())
}

#[tokio::test]
async fn test_merge_indexed_of_nothing_ends() {
    let merged = merge_indexed(Vec::<stream::Empty<u8>>::new());

    assert_eq!(merged.count().await, 0);
}
