// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Combine-latest over any number of sources.
//!
//! Every source item is tagged with its source index and merged into one stream.
//! A scan keeps the latest value of every source in a [`CombinedState`]; once all
//! sources have contributed, each further item produces the combine function's
//! output over the current state.
//!
//! Errors travel in-band: an upstream `StreamItem::Error`, or a failing combine
//! function, is emitted once and ends the combined stream. The combined stream
//! also ends when every source has ended.
//!
//! Two entry points exist:
//!
//! - [`combine_latest`] / [`try_combine_latest`] take a `Vec` of same-typed
//!   sources and hand the combine function a `Vec` of values in source order
//! - [`CombineLatestExt`] is also implemented for tuples of 2 to 9 sources of
//!   different item types; the combine function receives a tuple of values

use crate::combined_state::CombinedState;
use crate::end_after_error::EndAfterError;
use crate::merge_indexed::merge_indexed;
use futures::future::ready;
use futures::{Stream, StreamExt};
use std::any::{type_name, Any};
use std::convert::Infallible;
use std::error::Error;
use std::pin::Pin;
use std::sync::Arc;
use tributary_core::{StreamItem, TributaryError};

/// Output of every combine-latest operator.
pub type CombineLatest<R> = Pin<Box<dyn Stream<Item = StreamItem<R>> + Send>>;

type Slot = Arc<dyn Any + Send + Sync>;
type BoxedSource<T> = Pin<Box<dyn Stream<Item = StreamItem<T>> + Send>>;

/// Combines the latest values of `sources` with `combine_fn`.
///
/// Nothing is emitted until every source has produced a value.
///
/// # Example
///
/// ```
/// use futures::{executor::block_on, stream, StreamExt};
/// use tributary_core::StreamItem;
/// use tributary_stream::combine_latest;
///
/// let left = stream::iter(vec![StreamItem::Value(1), StreamItem::Value(3)]);
/// let right = stream::iter(vec![StreamItem::Value(2)]);
///
/// let sums = combine_latest(vec![left, right], |values: Vec<i32>| values.iter().sum::<i32>());
/// let sums: Vec<_> = block_on(sums.collect());
///
/// assert_eq!(sums, vec![StreamItem::Value(3), StreamItem::Value(5)]);
/// ```
pub fn combine_latest<S, T, R, F>(sources: Vec<S>, mut combine_fn: F) -> CombineLatest<R>
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Clone + Send + Sync + 'static,
    R: Send + 'static,
    F: FnMut(Vec<T>) -> R + Send + 'static,
{
    try_combine_latest(sources, move |values| Ok::<_, Infallible>(combine_fn(values)))
}

/// Like [`combine_latest`], with a combine function that may fail.
///
/// A failure is emitted as [`TributaryError::CombineError`] and ends the stream.
pub fn try_combine_latest<S, T, R, E, F>(sources: Vec<S>, mut combine_fn: F) -> CombineLatest<R>
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Clone + Send + Sync + 'static,
    R: Send + 'static,
    E: Error + Send + Sync + 'static,
    F: FnMut(Vec<T>) -> Result<R, E> + Send + 'static,
{
    combine_latest_impl(sources, move |values| {
        combine_fn(values).map_err(TributaryError::combine_error)
    })
}

/// Extension trait for combining a group of sources.
///
/// Implemented for `Vec` of same-typed sources and for tuples of 2 to 9 sources.
///
/// ```
/// use futures::{executor::block_on, stream, StreamExt};
/// use tributary_core::StreamItem;
/// use tributary_stream::CombineLatestExt;
///
/// let names = stream::iter(vec![StreamItem::Value("temp")]);
/// let readings = stream::iter(vec![StreamItem::Value(20.5), StreamItem::Value(21.0)]);
///
/// let labelled = (names, readings).combine_latest(|(name, value)| format!("{name}={value}"));
/// let labelled: Vec<_> = block_on(labelled.collect());
///
/// assert_eq!(
///     labelled,
///     vec![StreamItem::Value("temp=20.5".to_string()), StreamItem::Value("temp=21".to_string())]
/// );
/// ```
pub trait CombineLatestExt: Sized {
    /// What the combine function receives: one value per source.
    type Values;

    /// Combines the latest source values with a combine function that may fail.
    fn try_combine_latest<R, E, F>(self, combine_fn: F) -> CombineLatest<R>
    where
        R: Send + 'static,
        E: Error + Send + Sync + 'static,
        F: FnMut(Self::Values) -> Result<R, E> + Send + 'static;

    /// Combines the latest source values.
    fn combine_latest<R, F>(self, mut combine_fn: F) -> CombineLatest<R>
    where
        R: Send + 'static,
        F: FnMut(Self::Values) -> R + Send + 'static,
    {
        self.try_combine_latest(move |values| Ok::<_, Infallible>(combine_fn(values)))
    }
}

impl<S, T> CombineLatestExt for Vec<S>
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    type Values = Vec<T>;

    fn try_combine_latest<R, E, F>(self, combine_fn: F) -> CombineLatest<R>
    where
        R: Send + 'static,
        E: Error + Send + Sync + 'static,
        F: FnMut(Self::Values) -> Result<R, E> + Send + 'static,
    {
        try_combine_latest(self, combine_fn)
    }
}

macro_rules! impl_combine_latest_for_tuple {
    ($arity:literal; $(($source:ident, $value:ident, $index:tt)),+) => {
        impl<$($source, $value),+> CombineLatestExt for ($($source,)+)
        where
            $(
                $source: Stream<Item = StreamItem<$value>> + Send + 'static,
                $value: Clone + Send + Sync + 'static,
            )+
        {
            type Values = ($($value,)+);

            fn try_combine_latest<R, E, F>(self, mut combine_fn: F) -> CombineLatest<R>
            where
                R: Send + 'static,
                E: Error + Send + Sync + 'static,
                F: FnMut(Self::Values) -> Result<R, E> + Send + 'static,
            {
                let sources: Vec<BoxedSource<Slot>> = vec![$(erase(self.$index)),+];

                combine_latest_impl(sources, move |slots: Vec<Slot>| {
                    if slots.len() != $arity {
                        return Err(TributaryError::combine_error(
                            TributaryError::arity_mismatch($arity, slots.len()),
                        ));
                    }

                    let values = ($(downcast_slot::<$value>(&slots, $index)?,)+);
                    combine_fn(values).map_err(TributaryError::combine_error)
                })
            }
        }
    };
}

impl_combine_latest_for_tuple!(2; (S0, T0, 0), (S1, T1, 1));
impl_combine_latest_for_tuple!(3; (S0, T0, 0), (S1, T1, 1), (S2, T2, 2));
impl_combine_latest_for_tuple!(4; (S0, T0, 0), (S1, T1, 1), (S2, T2, 2), (S3, T3, 3));
impl_combine_latest_for_tuple!(5;
    (S0, T0, 0), (S1, T1, 1), (S2, T2, 2), (S3, T3, 3), (S4, T4, 4));
impl_combine_latest_for_tuple!(6;
    (S0, T0, 0), (S1, T1, 1), (S2, T2, 2), (S3, T3, 3), (S4, T4, 4), (S5, T5, 5));
impl_combine_latest_for_tuple!(7;
    (S0, T0, 0), (S1, T1, 1), (S2, T2, 2), (S3, T3, 3), (S4, T4, 4), (S5, T5, 5),
    (S6, T6, 6));
impl_combine_latest_for_tuple!(8;
    (S0, T0, 0), (S1, T1, 1), (S2, T2, 2), (S3, T3, 3), (S4, T4, 4), (S5, T5, 5),
    (S6, T6, 6), (S7, T7, 7));
impl_combine_latest_for_tuple!(9;
    (S0, T0, 0), (S1, T1, 1), (S2, T2, 2), (S3, T3, 3), (S4, T4, 4), (S5, T5, 5),
    (S6, T6, 6), (S7, T7, 7), (S8, T8, 8));

fn combine_latest_impl<S, T, R, F>(sources: Vec<S>, mut combine_fn: F) -> CombineLatest<R>
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Clone + Send + Sync + 'static,
    R: Send + 'static,
    F: FnMut(Vec<T>) -> Result<R, TributaryError> + Send + 'static,
{
    let arity = sources.len();
    debug!("combining {} sources", arity);

    let combined = merge_indexed(sources)
        .scan(CombinedState::new(arity), |state, (index, item)| {
            let next = match item {
                StreamItem::Value(value) => {
                    *state = state.with_slot(index, value);
                    StreamItem::Value(state.clone())
                }
                StreamItem::Error(error) => StreamItem::Error(error),
            };
            ready(Some(next))
        })
        // Nothing is emitted until every slot holds a value
        .filter_map(|item| {
            ready(match item {
                StreamItem::Value(state) => state.values().map(StreamItem::Value),
                StreamItem::Error(error) => Some(StreamItem::Error(error)),
            })
        })
        .map(move |item| match item {
            StreamItem::Value(values) => match combine_fn(values) {
                Ok(combined) => StreamItem::Value(combined),
                Err(error) => {
                    warn!("combine function failed: {}", error);
                    StreamItem::Error(error)
                }
            },
            StreamItem::Error(error) => StreamItem::Error(error),
        });

    Box::pin(EndAfterError::new(combined))
}

fn erase<S, T>(source: S) -> BoxedSource<Slot>
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Send + Sync + 'static,
{
    Box::pin(source.map(|item| item.map(|value| Arc::new(value) as Slot)))
}

fn downcast_slot<T>(slots: &[Slot], index: usize) -> Result<T, TributaryError>
where
    T: Clone + 'static,
{
    (*slots[index]).downcast_ref::<T>().cloned().ok_or_else(|| {
        TributaryError::combine_error(TributaryError::type_mismatch(index, type_name::<T>()))
    })
}
