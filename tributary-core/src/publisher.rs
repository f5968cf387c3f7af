// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::subscriber::Subscriber;
use std::sync::Arc;

/// A push-source: delivers values to subscribers once they grant demand.
pub trait Publisher<T> {
    /// Attaches `subscriber`, which must receive `on_subscribe` before anything else.
    fn subscribe(&self, subscriber: Arc<dyn Subscriber<T>>);
}
