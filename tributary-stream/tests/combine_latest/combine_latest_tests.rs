// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream::{self, Empty};
use tributary_core::StreamItem;
use tributary_stream::{combine_latest, CombineLatestExt, ManualSource};
use tributary_test_utils::{
    assert_no_element_emitted, assert_stream_ended, test_channel, unwrap_value,
};

#[tokio::test]
async fn test_combine_latest_waits_for_every_source() -> anyhow::Result<()> {
    // Arrange
    let (tx1, s1) = test_channel::<i32>();
    let (tx2, s2) = test_channel::<i32>();
    let (tx3, s3) = test_channel::<i32>();
    let mut combined = combine_latest(vec![s1, s2, s3], |values: Vec<i32>| values);

    // Act
    tx1.try_send(1)?;
    tx2.try_send(2)?;

    // Assert
    assert_no_element_emitted(&mut combined, 100).await;

    // Act
    tx3.try_send(3)?;

    // Assert
    assert_eq!(unwrap_value(&mut combined, 500).await, vec![1, 2, 3]);

    Ok(())
}

#[tokio::test]
async fn test_combine_latest_recombines_on_every_update() -> anyhow::Result<()> {
    // Arrange
    let (tx1, s1) = test_channel::<i32>();
    let (tx2, s2) = test_channel::<i32>();
    let mut combined = combine_latest(vec![s1, s2], |values: Vec<i32>| values);

    // Act & Assert
    tx1.try_send(1)?;
    tx2.try_send(2)?;
    assert_eq!(unwrap_value(&mut combined, 500).await, vec![1, 2]);

    tx1.try_send(3)?;
    assert_eq!(unwrap_value(&mut combined, 500).await, vec![3, 2]);

    tx2.try_send(4)?;
    assert_eq!(unwrap_value(&mut combined, 500).await, vec![3, 4]);

    tx2.try_send(5)?;
    assert_eq!(unwrap_value(&mut combined, 500).await, vec![3, 5]);

    Ok(())
}

#[tokio::test]
async fn test_combine_fn_sees_one_value_per_source_in_source_order() -> anyhow::Result<()> {
    // Arrange
    let (tx1, s1) = test_channel::<i32>();
    let (tx2, s2) = test_channel::<i32>();
    let (tx3, s3) = test_channel::<i32>();
    let mut combined = combine_latest(vec![s1, s2, s3], |values: Vec<i32>| {
        assert_eq!(values.len(), 3);
        values
    });

    // Act: sources fill up back to front
    tx3.try_send(30)?;
    tx2.try_send(20)?;
    tx1.try_send(10)?;

    // Assert
    assert_eq!(unwrap_value(&mut combined, 500).await, vec![10, 20, 30]);

    tx2.try_send(21)?;
    assert_eq!(unwrap_value(&mut combined, 500).await, vec![10, 21, 30]);

    Ok(())
}

#[tokio::test]
async fn test_combine_latest_follows_arrival_order() -> anyhow::Result<()> {
    // Arrange: A:1, B:2, A:3, B:4 all waiting before the first pull
    let (tx_a, a) = test_channel::<i32>();
    let (tx_b, b) = test_channel::<i32>();
    tx_a.try_send(1)?;
    tx_b.try_send(2)?;
    tx_a.try_send(3)?;
    tx_b.try_send(4)?;

    // Act
    let mut combined = (a, b).combine_latest(|(a, b)| (a, b));

    // Assert
    assert_eq!(unwrap_value(&mut combined, 500).await, (1, 2));
    assert_eq!(unwrap_value(&mut combined, 500).await, (3, 2));
    assert_eq!(unwrap_value(&mut combined, 500).await, (3, 4));
    assert_no_element_emitted(&mut combined, 50).await;

    Ok(())
}

#[tokio::test]
async fn test_combine_latest_single_source_emits_every_value() -> anyhow::Result<()> {
    let (tx, source) = test_channel::<&str>();
    let mut combined = combine_latest(vec![source], |values: Vec<&str>| values.concat());

    tx.try_send("a")?;
    assert_eq!(unwrap_value(&mut combined, 500).await, "a");
    tx.try_send("b")?;
    assert_eq!(unwrap_value(&mut combined, 500).await, "b");

    Ok(())
}

#[tokio::test]
async fn test_combine_latest_without_sources_ends_immediately() {
    let sources: Vec<Empty<StreamItem<i32>>> = Vec::new();
    let mut combined = combine_latest(sources, |values: Vec<i32>| values.len());

    assert_stream_ended(&mut combined, 100).await;
}

#[tokio::test]
async fn test_combine_latest_ends_when_all_sources_end() -> anyhow::Result<()> {
    // Arrange
    let (tx1, s1) = test_channel::<i32>();
    let (tx2, s2) = test_channel::<i32>();
    let mut combined = combine_latest(vec![s1, s2], |values: Vec<i32>| values.iter().sum::<i32>());

    tx1.try_send(1)?;
    tx2.try_send(2)?;
    assert_eq!(unwrap_value(&mut combined, 500).await, 3);

    // Act
    drop(tx1);
    tx2.try_send(10)?;
    assert_eq!(unwrap_value(&mut combined, 500).await, 11);
    drop(tx2);

    // Assert
    assert_stream_ended(&mut combined, 500).await;

    Ok(())
}

#[tokio::test]
async fn test_combine_latest_keeps_running_while_one_source_is_alive() -> anyhow::Result<()> {
    let (tx1, s1) = test_channel::<i32>();
    let (tx2, s2) = test_channel::<i32>();
    let mut combined = combine_latest(vec![s1, s2], |values: Vec<i32>| values);

    tx1.try_send(1)?;
    tx2.try_send(2)?;
    assert_eq!(unwrap_value(&mut combined, 500).await, vec![1, 2]);

    drop(tx2);
    assert_no_element_emitted(&mut combined, 50).await;

    tx1.try_send(7)?;
    assert_eq!(unwrap_value(&mut combined, 500).await, vec![7, 2]);

    Ok(())
}

#[tokio::test]
async fn test_combine_latest_over_plain_streams() {
    let numbers = stream::iter(vec![StreamItem::Value(1), StreamItem::Value(2)]);
    let letters = stream::iter(vec![StreamItem::Value('x')]);

    let mut combined = (numbers, letters).combine_latest(|(n, c)| format!("{n}{c}"));

    assert_eq!(unwrap_value(&mut combined, 500).await, "1x");
    assert_eq!(unwrap_value(&mut combined, 500).await, "2x");
    assert_stream_ended(&mut combined, 500).await;
}

#[tokio::test]
async fn test_combine_latest_pulls_manual_sources_on_demand() -> anyhow::Result<()> {
    // Arrange
    let left = ManualSource::new();
    let right = ManualSource::new();
    let mut combined = vec![left.observe(), right.observe()]
        .combine_latest(|values: Vec<i32>| values);

    // Act
    left.insert([1, 2, 3])?;
    right.insert([10])?;

    // Assert
    assert_eq!(unwrap_value(&mut combined, 500).await, vec![1, 10]);
    assert_eq!(unwrap_value(&mut combined, 500).await, vec![2, 10]);
    assert_eq!(unwrap_value(&mut combined, 500).await, vec![3, 10]);
    assert_no_element_emitted(&mut combined, 50).await;

    right.insert([20])?;
    assert_eq!(unwrap_value(&mut combined, 500).await, vec![3, 20]);

    Ok(())
}

#[tokio::test]
async fn test_dropping_combined_stream_cancels_sources() -> anyhow::Result<()> {
    // Arrange
    let left = ManualSource::<i32>::new();
    let right = ManualSource::<i32>::new();
    let combined = (left.observe(), right.observe()).combine_latest(|(a, b)| a + b);
    assert!(left.is_subscribed());
    assert!(right.is_subscribed());

    // Act
    drop(combined);

    // Assert
    assert!(!left.is_subscribed());
    assert!(!right.is_subscribed());
    assert!(left.insert([1]).is_err());

    Ok(())
}
