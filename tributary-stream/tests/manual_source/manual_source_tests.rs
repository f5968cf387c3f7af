// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::Arc;
use tributary_core::{Publisher, Subscriber, Subscription, TributaryError};
use tributary_stream::ManualSource;
use tributary_test_utils::{assert_stream_ended, unwrap_value, RecordingSubscriber};

#[test]
fn test_insert_before_subscription_fails() {
    // Arrange
    let source = ManualSource::<i32>::new();

    // Act
    let result = source.insert([1, 2]);

    // Assert
    assert!(matches!(result, Err(TributaryError::NotSubscribed)));
    assert!(result.unwrap_err().is_protocol_violation());
    assert!(!source.is_subscribed());
}

#[test]
fn test_terminal_signals_before_subscription_fail() {
    let source = ManualSource::<i32>::new();

    assert!(source.complete().is_err());
    assert!(source.fail(TributaryError::stream_error("x")).is_err());
}

#[test]
fn test_subscribe_hands_over_subscription_and_buffers_until_requested() -> anyhow::Result<()> {
    // Arrange
    let source = ManualSource::new();
    let recorder = RecordingSubscriber::new().shared();
    let subscriber: Arc<dyn Subscriber<i32>> = recorder.clone();

    // Act
    source.subscribe(subscriber);
    let accepted = source.insert([1, 2, 3])?;

    // Assert
    assert!(recorder.is_subscribed());
    assert_eq!(accepted, 3);
    assert!(recorder.values().is_empty());

    Ok(())
}

#[test]
fn test_insert_is_delivered_against_credit() -> anyhow::Result<()> {
    // Arrange
    let source = ManualSource::new();
    let capture = Arc::new(parking_lot::Mutex::new(None::<Arc<dyn Subscription>>));
    let recorder = RecordingSubscriber::new().shared();

    struct Capturing {
        inner: Arc<RecordingSubscriber<i32>>,
        capture: Arc<parking_lot::Mutex<Option<Arc<dyn Subscription>>>>,
    }

    impl Subscriber<i32> for Capturing {
        fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
            *self.capture.lock() = Some(subscription);
        }
        fn on_next(&self, value: i32) -> tributary_core::Result<()> {
            self.inner.on_next(value)
        }
        fn on_error(&self, error: TributaryError) {
            self.inner.on_error(error);
        }
        fn on_complete(&self) {
            self.inner.on_complete();
        }
    }

    source.subscribe(Arc::new(Capturing {
        inner: recorder.clone(),
        capture: capture.clone(),
    }));
    let subscription = capture.lock().clone().expect("subscription handed over");

    // Act
    source.insert([1, 2, 3])?;
    subscription.request(2)?;

    // Assert
    assert_eq!(recorder.values(), vec![1, 2]);

    source.complete()?;
    subscription.request(1)?;
    assert_eq!(recorder.values(), vec![1, 2, 3]);
    assert_eq!(recorder.completions(), 1);
    assert!(!source.is_subscribed());

    Ok(())
}

#[tokio::test]
async fn test_clones_share_the_subscription() -> anyhow::Result<()> {
    let source = ManualSource::new();
    let handle = source.clone();
    let mut values = source.observe();

    handle.insert([5])?;

    assert!(handle.is_subscribed());
    assert_eq!(unwrap_value(&mut values, 500).await, 5);

    Ok(())
}

#[tokio::test]
async fn test_resubscribing_completes_the_previous_subscriber() -> anyhow::Result<()> {
    // Arrange
    let source = ManualSource::new();
    let mut first = source.observe();
    source.insert([1, 2])?;

    // Act
    let mut second = source.observe();
    source.insert([3])?;

    // Assert: the first stream keeps what was inserted for it, then ends
    assert_eq!(unwrap_value(&mut first, 500).await, 1);
    assert_eq!(unwrap_value(&mut first, 500).await, 2);
    assert_stream_ended(&mut first, 500).await;

    assert_eq!(unwrap_value(&mut second, 500).await, 3);

    Ok(())
}

#[tokio::test]
async fn test_dropping_the_stream_unsubscribes() -> anyhow::Result<()> {
    let source = ManualSource::<i32>::new();
    let values = source.observe();
    assert!(source.is_subscribed());

    drop(values);

    assert!(!source.is_subscribed());
    assert!(matches!(source.insert([1]), Err(TributaryError::NotSubscribed)));

    Ok(())
}
