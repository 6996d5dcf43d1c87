//! Reactive-Primitive Adapter
//!
//! [`whenify`] lifts any constructor of the shape
//! `Fn(compute: Fn(Option<Out>) -> Out) -> H` into a gated constructor.
//! The compute function handed to the constructor is a `when` gate whose
//! call-time argument is the host's previous result, so callbacks and
//! fallbacks see what the last run produced.
//!
//! The adapter keeps no state. The previous-value slot, the scheduling and
//! the lifetime of the resulting computation all belong to the host.
//!
//! ```rust
//! use lattice_gate::{when_memo_or_else, reactive::Signal};
//!
//! let user = Signal::new(None::<String>);
//! let label = when_memo_or_else(
//!     user.clone(),
//!     |name, _prev| format!("signed in as {name}"),
//!     |_prev| "signed out".to_string(),
//! );
//!
//! assert_eq!(label.get(), "signed out");
//! user.set(Some("ada".into()));
//! assert_eq!(label.get(), "signed in as ada");
//! ```

use crate::reactive::{Computed, Effect, Memo};

use super::maybe::IntoMaybe;
use super::truthy::Truthy;
use super::when::{when, when_or_else};

/// Compute function handed to a host constructor.
pub type ComputeFn<Out> = Box<dyn Fn(Option<Out>) -> Out + Send + Sync>;

/// A host constructor lifted into gated form.
#[derive(Debug, Clone, Copy)]
pub struct Whenify<K> {
    constructor: K,
}

/// Lift `constructor` into a gated constructor.
///
/// ```rust
/// use lattice_gate::{whenify, ComputeFn};
/// use lattice_gate::reactive::{ComputationOptions, Memo};
///
/// let named_memo = whenify(|compute: ComputeFn<Option<i32>>| {
///     Memo::with_options(compute, ComputationOptions::new().name("doubled"))
/// });
///
/// let doubled = named_memo.when(21i32, |n, _prev| n * 2);
/// assert_eq!(doubled.get(), Some(42));
/// ```
pub fn whenify<K>(constructor: K) -> Whenify<K> {
    Whenify { constructor }
}

impl<K> Whenify<K> {
    /// Build a computation that runs `callback` while `input` is present and
    /// yields `None` otherwise.
    ///
    /// The callback's second argument is the previous result with the
    /// absent case folded in: `None` on the first run and after a run where
    /// the input was absent.
    pub fn when<I, R, C, H>(&self, input: I, callback: C) -> H
    where
        K: Fn(ComputeFn<Option<R>>) -> H,
        I: IntoMaybe + 'static,
        I::Value: Truthy + Clone + Send + Sync + 'static,
        C: Fn(<I::Value as Truthy>::Present, Option<R>) -> R + Send + Sync + 'static,
        R: 'static,
    {
        let gated = when(input, callback);
        (self.constructor)(Box::new(move |prev: Option<Option<R>>| gated(prev.flatten())))
    }

    /// Build a computation that runs `callback` while `input` is present and
    /// `fallback` otherwise. Both receive the previous result unchanged.
    pub fn when_or_else<I, R, C, F, H>(&self, input: I, callback: C, fallback: F) -> H
    where
        K: Fn(ComputeFn<R>) -> H,
        I: IntoMaybe + 'static,
        I::Value: Truthy + Clone + Send + Sync + 'static,
        C: Fn(<I::Value as Truthy>::Present, Option<R>) -> R + Send + Sync + 'static,
        F: Fn(Option<R>) -> R + Send + Sync + 'static,
        R: 'static,
    {
        (self.constructor)(Box::new(when_or_else(input, callback, fallback)))
    }
}

/// Gated lazy [`Memo`].
pub fn when_memo<I, R, C>(input: I, callback: C) -> Memo<Option<R>>
where
    I: IntoMaybe + 'static,
    I::Value: Truthy + Clone + Send + Sync + 'static,
    C: Fn(<I::Value as Truthy>::Present, Option<R>) -> R + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    whenify(|compute: ComputeFn<Option<R>>| Memo::new(compute)).when(input, callback)
}

pub fn when_memo_or_else<I, R, C, F>(input: I, callback: C, fallback: F) -> Memo<R>
where
    I: IntoMaybe + 'static,
    I::Value: Truthy + Clone + Send + Sync + 'static,
    C: Fn(<I::Value as Truthy>::Present, Option<R>) -> R + Send + Sync + 'static,
    F: Fn(Option<R>) -> R + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    whenify(|compute: ComputeFn<R>| Memo::new(compute)).when_or_else(input, callback, fallback)
}

/// Gated eager [`Computed`]. Runs once on creation.
pub fn when_computed<I, R, C>(input: I, callback: C) -> Computed<Option<R>>
where
    I: IntoMaybe + 'static,
    I::Value: Truthy + Clone + Send + Sync + 'static,
    C: Fn(<I::Value as Truthy>::Present, Option<R>) -> R + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    whenify(|compute: ComputeFn<Option<R>>| Computed::new(compute)).when(input, callback)
}

pub fn when_computed_or_else<I, R, C, F>(input: I, callback: C, fallback: F) -> Computed<R>
where
    I: IntoMaybe + 'static,
    I::Value: Truthy + Clone + Send + Sync + 'static,
    C: Fn(<I::Value as Truthy>::Present, Option<R>) -> R + Send + Sync + 'static,
    F: Fn(Option<R>) -> R + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    whenify(|compute: ComputeFn<R>| Computed::new(compute)).when_or_else(input, callback, fallback)
}

/// Gated [`Effect`]. Runs once on creation and after every change of a
/// value it read, until disposed or dropped.
pub fn when_effect<I, R, C>(input: I, callback: C) -> Effect<Option<R>>
where
    I: IntoMaybe + 'static,
    I::Value: Truthy + Clone + Send + Sync + 'static,
    C: Fn(<I::Value as Truthy>::Present, Option<R>) -> R + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    whenify(|compute: ComputeFn<Option<R>>| Effect::new(compute)).when(input, callback)
}

pub fn when_effect_or_else<I, R, C, F>(input: I, callback: C, fallback: F) -> Effect<R>
where
    I: IntoMaybe + 'static,
    I::Value: Truthy + Clone + Send + Sync + 'static,
    C: Fn(<I::Value as Truthy>::Present, Option<R>) -> R + Send + Sync + 'static,
    F: Fn(Option<R>) -> R + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    whenify(|compute: ComputeFn<R>| Effect::new(compute)).when_or_else(input, callback, fallback)
}
