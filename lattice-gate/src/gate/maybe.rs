//! Value Resolver
//!
//! A [`MaybeValue`] is either a plain value or a producer that yields the
//! current value when asked. Resolution never caches: every call invokes the
//! producer again, so gates built on top always see live values, and reads
//! of reactive sources inside a producer register dependencies on whatever
//! computation is running.

use std::fmt;
use std::sync::Arc;

use crate::reactive::{Computed, Memo, Signal};

use super::truthy::Truthy;

/// Shared zero-argument producer.
pub type Producer<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// A plain value or a producer of one.
pub enum MaybeValue<T> {
    Value(T),
    Producer(Producer<T>),
}

impl<T> MaybeValue<T> {
    /// Wrap a producer closure.
    pub fn producer<F>(f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        MaybeValue::Producer(Arc::new(f))
    }

    /// Read a reactive source on every resolution.
    pub fn source<S>(source: S) -> Self
    where
        S: Readable<T> + Send + Sync + 'static,
    {
        Self::producer(move || source.read())
    }

    pub fn is_producer(&self) -> bool {
        matches!(self, MaybeValue::Producer(_))
    }

    /// Resolve, consuming `self`. Plain values are returned without cloning.
    pub fn into_resolved(self) -> T {
        match self {
            MaybeValue::Value(value) => value,
            MaybeValue::Producer(produce) => produce(),
        }
    }
}

impl<T: Clone> MaybeValue<T> {
    /// Current value: the producer's result, or a clone of the plain value.
    ///
    /// A panicking producer unwinds through this call untouched.
    pub fn resolve(&self) -> T {
        match self {
            MaybeValue::Value(value) => value.clone(),
            MaybeValue::Producer(produce) => produce(),
        }
    }
}

impl<T> From<T> for MaybeValue<T> {
    fn from(value: T) -> Self {
        MaybeValue::Value(value)
    }
}

impl<T: Clone> Clone for MaybeValue<T> {
    fn clone(&self) -> Self {
        match self {
            MaybeValue::Value(value) => MaybeValue::Value(value.clone()),
            MaybeValue::Producer(produce) => MaybeValue::Producer(Arc::clone(produce)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for MaybeValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaybeValue::Value(value) => f.debug_tuple("Value").field(value).finish(),
            MaybeValue::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

/// Anything a gate accepts as its input.
///
/// Present-able values become plain inputs, reactive sources become
/// producers that read them, and a `MaybeValue` passes through as is.
pub trait IntoMaybe {
    type Value;

    fn into_maybe(self) -> MaybeValue<Self::Value>;
}

impl<T> IntoMaybe for MaybeValue<T> {
    type Value = T;

    fn into_maybe(self) -> MaybeValue<T> {
        self
    }
}

impl<T: Truthy> IntoMaybe for T {
    type Value = T;

    fn into_maybe(self) -> MaybeValue<T> {
        MaybeValue::Value(self)
    }
}

impl<T, E> IntoMaybe for Result<T, E> {
    type Value = Result<T, E>;

    fn into_maybe(self) -> MaybeValue<Result<T, E>> {
        MaybeValue::Value(self)
    }
}

macro_rules! into_maybe_source {
    ($($source:ident),*) => {
        $(
            impl<T> IntoMaybe for $source<T>
            where
                T: Clone + Send + Sync + 'static,
            {
                type Value = T;

                fn into_maybe(self) -> MaybeValue<T> {
                    MaybeValue::source(self)
                }
            }
        )*
    };
}

into_maybe_source!(Signal, Memo, Computed);

/// A reactive source whose current value can be read with tracking.
pub trait Readable<T> {
    fn read(&self) -> T;
}

impl<T> Readable<T> for Signal<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn read(&self) -> T {
        self.get()
    }
}

impl<T> Readable<T> for Memo<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn read(&self) -> T {
        self.get()
    }
}

impl<T> Readable<T> for Computed<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn read(&self) -> T {
        self.get()
    }
}
