// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_channel::{Receiver, Sender};
use futures::Stream;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tributary_core::{Publisher, StreamItem, Subscriber, Subscription, TributaryError};
use tributary_exec::DemandSubscribeExt;

const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// A signal observed by a [`TestProbe`].
#[derive(Debug)]
pub enum ProbeSignal<T> {
    Next(T),
    Error(TributaryError),
    Complete,
}

/// A subscriber driven from test code.
///
/// The probe grants credit only when told to via [`request`](Self::request) and
/// records every signal it receives, so tests can assert exactly what a publisher
/// emits for a given amount of demand.
///
/// ```
/// use tributary_core::Publisher;
/// use tributary_stream::ManualSource;
/// use tributary_test_utils::TestProbe;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let source = ManualSource::new();
/// let mut probe = TestProbe::subscribe(&source);
///
/// source.insert([1, 2, 3]).unwrap();
/// probe.request(2).expect_next_n([1, 2]).await;
/// probe.expect_no_message(std::time::Duration::from_millis(20)).await;
/// # }
/// ```
pub struct TestProbe<T> {
    signals: Receiver<ProbeSignal<T>>,
    handoff: Receiver<Arc<dyn Subscription>>,
    subscription: Option<Arc<dyn Subscription>>,
    pending_demand: i64,
    timeout: Duration,
}

impl<T: Send + 'static> TestProbe<T> {
    /// Subscribes a probe to `publisher`.
    pub fn subscribe<P>(publisher: &P) -> Self
    where
        P: Publisher<T> + ?Sized,
    {
        let (probe, subscriber) = Self::unsubscribed();
        publisher.subscribe(subscriber);
        probe
    }

    /// Runs `stream` on a background task, paced by the probe's demand.
    ///
    /// Must be called from within a tokio runtime.
    pub fn run<S>(stream: S) -> Self
    where
        S: Stream<Item = StreamItem<T>> + Send + 'static,
    {
        let (probe, subscriber) = Self::unsubscribed();
        tokio::spawn(stream.subscribe_with_demand(subscriber));
        probe
    }

    fn unsubscribed() -> (Self, Arc<dyn Subscriber<T>>) {
        let (signal_sender, signals) = async_channel::unbounded();
        let (handoff_sender, handoff) = async_channel::bounded(1);

        let probe = Self {
            signals,
            handoff,
            subscription: None,
            pending_demand: 0,
            timeout: DEFAULT_TIMEOUT,
        };
        let subscriber = Arc::new(ProbeSubscriber {
            signals: signal_sender,
            handoff: handoff_sender,
        });

        (probe, subscriber)
    }
}

impl<T> TestProbe<T> {
    /// Overrides how long `expect_*` calls wait for a signal.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Grants `n` credit.
    ///
    /// If the subscription has not arrived yet, the credit is granted as soon as it
    /// does.
    ///
    /// # Panics
    ///
    /// Panics if the subscription rejects the request.
    pub fn request(&mut self, n: i64) -> &mut Self {
        match self.adopted_subscription() {
            Some(subscription) => {
                if let Err(error) = subscription.request(n) {
                    panic!("request({n}) rejected: {error}");
                }
            }
            None => self.pending_demand += n,
        }
        self
    }

    /// Sends `n` straight to the subscription and returns its verdict.
    ///
    /// # Panics
    ///
    /// Panics if no subscription has been received yet.
    pub fn try_request(&mut self, n: i64) -> tributary_core::Result<()> {
        self.adopted_subscription()
            .map(|subscription| subscription.request(n))
            .unwrap_or_else(|| panic!("probe has no subscription yet"))
    }

    /// Cancels the subscription.
    pub fn cancel(&mut self) {
        if let Some(subscription) = self.adopted_subscription() {
            subscription.cancel();
        }
    }

    /// Waits for the next signal, whatever it is.
    ///
    /// # Panics
    ///
    /// Panics on timeout or if the publisher went away without a terminal signal.
    pub async fn next_signal(&mut self) -> ProbeSignal<T> {
        self.await_subscription().await;

        match timeout(self.timeout, self.signals.recv()).await {
            Ok(Ok(signal)) => signal,
            Ok(Err(_)) => panic!("publisher dropped the probe without a terminal signal"),
            Err(_) => panic!("no signal received within {:?}", self.timeout),
        }
    }

    /// Expects the next signal to be a value equal to `expected`.
    pub async fn expect_next(&mut self, expected: T) -> &mut Self
    where
        T: PartialEq + Debug,
    {
        match self.next_signal().await {
            ProbeSignal::Next(actual) => assert_eq!(actual, expected),
            other => panic!("expected next value {expected:?}, got {other:?}"),
        }
        self
    }

    /// Expects the next signals to be exactly `expected`, in order.
    pub async fn expect_next_n<I>(&mut self, expected: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: PartialEq + Debug,
    {
        for value in expected {
            self.expect_next(value).await;
        }
        self
    }

    /// Expects the next signal to be an error and returns it.
    pub async fn expect_error(&mut self) -> TributaryError
    where
        T: Debug,
    {
        match self.next_signal().await {
            ProbeSignal::Error(error) => error,
            other => panic!("expected an error, got {other:?}"),
        }
    }

    /// Expects the next signal to be completion.
    pub async fn expect_complete(&mut self)
    where
        T: Debug,
    {
        match self.next_signal().await {
            ProbeSignal::Complete => {}
            other => panic!("expected completion, got {other:?}"),
        }
    }

    /// Expects no signal at all during `window`.
    pub async fn expect_no_message(&mut self, window: Duration) -> &mut Self
    where
        T: Debug,
    {
        self.await_subscription().await;

        if let Ok(Ok(signal)) = timeout(window, self.signals.recv()).await {
            panic!("expected no signal for {window:?}, got {signal:?}");
        }
        self
    }

    async fn await_subscription(&mut self) {
        if self.adopted_subscription().is_some() {
            return;
        }

        match timeout(self.timeout, self.handoff.recv()).await {
            Ok(Ok(subscription)) => self.adopt(subscription),
            _ => panic!("probe was never subscribed"),
        }
    }

    /// The subscription, picking it up from the handoff if it has just arrived.
    fn adopted_subscription(&mut self) -> Option<Arc<dyn Subscription>> {
        if self.subscription.is_none() {
            if let Ok(subscription) = self.handoff.try_recv() {
                self.adopt(subscription);
            }
        }
        self.subscription.clone()
    }

    // Demand granted before the handoff is forwarded exactly once
    fn adopt(&mut self, subscription: Arc<dyn Subscription>) {
        let demand = std::mem::take(&mut self.pending_demand);
        if demand != 0 {
            if let Err(error) = subscription.request(demand) {
                panic!("request({demand}) rejected: {error}");
            }
        }
        self.subscription = Some(subscription);
    }
}

impl<T> Drop for TestProbe<T> {
    fn drop(&mut self) {
        let subscription = self.subscription.take().or_else(|| self.handoff.try_recv().ok());
        if let Some(subscription) = subscription {
            subscription.cancel();
        }
    }
}

struct ProbeSubscriber<T> {
    signals: Sender<ProbeSignal<T>>,
    handoff: Sender<Arc<dyn Subscription>>,
}

impl<T: Send> Subscriber<T> for ProbeSubscriber<T> {
    fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
        if let Err(refused) = self.handoff.try_send(subscription) {
            refused.into_inner().cancel();
        }
    }

    fn on_next(&self, value: T) -> tributary_core::Result<()> {
        let _ = self.signals.try_send(ProbeSignal::Next(value));
        Ok(())
    }

    fn on_error(&self, error: TributaryError) {
        let _ = self.signals.try_send(ProbeSignal::Error(error));
    }

    fn on_complete(&self) {
        let _ = self.signals.try_send(ProbeSignal::Complete);
    }
}
