// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Credit-based subscription over an unbounded queue.
//!
//! A [`BufferedSubscription`] sits between any number of producers and exactly one
//! subscriber. Producers [`offer`](BufferedSubscription::offer) values from any
//! thread; the subscriber pulls them with [`request`](Subscription::request).
//!
//! ## Drain right
//!
//! Every `offer` and `request` ends with a drain attempt. A drain counter decides
//! who drains: the caller that moves it from 0 to 1 delivers synchronously on its
//! own thread, everybody else only bumps the counter and returns. The drainer
//! resets the counter to 1 before each pass and loops while the decrement at the
//! end of a pass leaves it non-zero, so a value offered or a credit granted during
//! a pass is always picked up by the next one.
//!
//! - nothing blocks, there is no lock on the delivery path
//! - nothing offered or requested concurrently is lost
//! - `on_next` never runs on two threads at once
//!
//! ## Terminal signals
//!
//! [`complete`](BufferedSubscription::complete) is delivered once every queued value
//! has been drained. [`fail`](BufferedSubscription::fail) is delivered at the next
//! drain and discards whatever is still queued. A delivery fault, a subscriber
//! returning `Err` from `on_next`, ends the subscription the same way: one
//! `on_error`, then silence.
//!
//! Cancelling, failing or completing closes the queue: later offers are rejected
//! and return `false`.

use crate::demand::{add_and_cap, validate_demand, UNBOUNDED};
use crate::error::{Result, TributaryError};
use crate::subscriber::Subscriber;
use crate::subscription::Subscription;
use async_channel::{Receiver, Sender};
use core::future::Future;
use core::pin::Pin;
use core::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use core::task::{Context, Poll};
use event_listener::{Event, EventListener};
use std::sync::{Arc, OnceLock};

enum Terminal {
    Completed,
    Failed(TributaryError),
}

/// Producer-side buffer relaying values to one subscriber as it grants credit.
pub struct BufferedSubscription<T> {
    subscriber: Arc<dyn Subscriber<T>>,
    sender: Sender<T>,
    receiver: Receiver<T>,
    requested: AtomicU64,
    drain_in_progress: AtomicUsize,
    cancelled: AtomicBool,
    terminal: OnceLock<Terminal>,
    demand: Event,
}

impl<T: Send + 'static> BufferedSubscription<T> {
    /// Creates a subscription bound to `subscriber`, with no credit.
    ///
    /// The caller is responsible for handing the subscription to the subscriber via
    /// [`Subscriber::on_subscribe`].
    pub fn new(subscriber: Arc<dyn Subscriber<T>>) -> Self {
        let (sender, receiver) = async_channel::unbounded();
        Self {
            subscriber,
            sender,
            receiver,
            requested: AtomicU64::new(0),
            drain_in_progress: AtomicUsize::new(0),
            cancelled: AtomicBool::new(false),
            terminal: OnceLock::new(),
            demand: Event::new(),
        }
    }

    /// Queues `value` and delivers whatever the current credit allows.
    ///
    /// Returns `false` if the queue refused the value because the subscription was
    /// cancelled or already received a terminal signal. The value is dropped.
    pub fn offer(&self, value: T) -> bool {
        if self.sender.try_send(value).is_err() {
            trace!("offer rejected: subscription closed");
            return false;
        }

        self.drain();
        true
    }

    /// Signals completion. Delivered after every value already queued.
    ///
    /// Only the first terminal signal counts; later ones are ignored.
    pub fn complete(&self) {
        if self.terminal.set(Terminal::Completed).is_ok() {
            debug!("subscription completing");
            self.sender.close();
            self.drain();
        }
    }

    /// Signals failure. Delivered at the next drain, dropping queued values.
    ///
    /// Only the first terminal signal counts; later ones are ignored.
    pub fn fail(&self, error: TributaryError) {
        if self.terminal.set(Terminal::Failed(error)).is_ok() {
            debug!("subscription failing");
            self.sender.close();
            self.drain();
        }
    }

    /// Returns `true` until the subscription is cancelled or terminated.
    pub fn is_subscribed(&self) -> bool {
        !self.cancelled.load(Ordering::Acquire)
    }

    /// Outstanding credit. [`UNBOUNDED`] once saturated.
    pub fn requested(&self) -> u64 {
        self.requested.load(Ordering::Acquire)
    }

    /// Number of values queued but not yet delivered.
    pub fn queued(&self) -> usize {
        self.receiver.len()
    }

    /// Resolves once the subscriber holds credit for more than what is already
    /// queued, or once the subscription is no longer live.
    pub fn demand(&self) -> DemandSignal<'_, T> {
        DemandSignal {
            subscription: self,
            listener: None,
        }
    }

    fn wants_more(&self) -> bool {
        !self.is_subscribed() || self.requested() > self.queued() as u64
    }

    fn halt(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.sender.close();
        self.demand.notify(usize::MAX);
    }

    fn drain(&self) {
        if self.drain_in_progress.fetch_add(1, Ordering::AcqRel) != 0 {
            // Current drainer will see our contribution on its next pass
            return;
        }

        loop {
            if !self.is_subscribed() {
                return;
            }

            self.drain_in_progress.store(1, Ordering::Release);

            let mut credit = self.requested.load(Ordering::Acquire);
            let mut delivered: u64 = 0;

            while credit != 0 {
                let Ok(value) = self.receiver.try_recv() else {
                    break;
                };

                if let Err(error) = self.subscriber.on_next(value) {
                    warn!("delivery fault, halting subscription: {}", error);
                    self.halt();
                    self.subscriber.on_error(error);
                    return;
                }

                if !self.is_subscribed() {
                    return;
                }

                if credit != UNBOUNDED {
                    credit -= 1;
                }
                delivered += 1;
            }

            if delivered != 0 {
                // An unbounded counter stays unbounded
                let _ = self
                    .requested
                    .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                        (current != UNBOUNDED).then(|| current - delivered)
                    });
            }

            if self.deliver_terminal() {
                return;
            }

            if self.drain_in_progress.fetch_sub(1, Ordering::AcqRel) == 1 {
                return;
            }
        }
    }

    fn deliver_terminal(&self) -> bool {
        match self.terminal.get() {
            Some(Terminal::Failed(error)) => {
                self.halt();
                self.subscriber.on_error(error.clone());
                true
            }
            Some(Terminal::Completed) if self.receiver.is_empty() => {
                self.halt();
                self.subscriber.on_complete();
                true
            }
            _ => false,
        }
    }
}

impl<T: Send + 'static> Subscription for BufferedSubscription<T> {
    fn request(&self, n: i64) -> Result<()> {
        let n = match validate_demand(n) {
            Ok(n) => n,
            Err(error) => {
                warn!("rejected request: {}", error);
                return Err(error);
            }
        };

        if n > 0 {
            add_and_cap(&self.requested, n);
            trace!("request {}", n);
            self.demand.notify(usize::MAX);
            self.drain();
        }

        Ok(())
    }

    fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::AcqRel) {
            debug!("subscription cancelled");
            self.sender.close();
            self.demand.notify(usize::MAX);
        }
    }

    fn is_cancelled(&self) -> bool {
        !self.is_subscribed()
    }
}

/// Future returned by [`BufferedSubscription::demand()`].
pub struct DemandSignal<'a, T> {
    subscription: &'a BufferedSubscription<T>,
    listener: Option<EventListener>,
}

impl<T: Send + 'static> Future for DemandSignal<'_, T> {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.subscription.wants_more() {
            return Poll::Ready(());
        }

        if self.listener.is_none() {
            self.listener = Some(self.subscription.demand.listen());

            // A request may have landed between the check and listen()
            if self.subscription.wants_more() {
                return Poll::Ready(());
            }
        }

        match self.listener.as_mut() {
            Some(listener) => Pin::new(listener).poll(cx),
            None => Poll::Ready(()),
        }
    }
}
