//! Guarded Invoker
//!
//! Resolve an input once and run a callback with it only if it is present.
//! Exactly one of callback, fallback or neither runs. Nothing is caught: a
//! panic in the producer, callback or fallback unwinds to the caller, and a
//! callback returning `Result` has its error handed back untouched.

use super::maybe::IntoMaybe;
use super::truthy::Truthy;

/// Run `callback` with the present value of `input`.
///
/// Returns `None` when the input is falsy. A callback result of `0` or
/// `false` is still `Some`.
///
/// ```rust
/// use lattice_gate::{check, Value};
///
/// assert_eq!(check(Value::Null, |v: Value| v.kind()), None);
/// assert_eq!(check(Some(3i32), |n| n * 2), Some(6));
/// assert_eq!(check(1i32, |_| 0), Some(0));
/// ```
pub fn check<I, R, C>(input: I, callback: C) -> Option<R>
where
    I: IntoMaybe,
    I::Value: Truthy,
    C: FnOnce(<I::Value as Truthy>::Present) -> R,
{
    input.into_maybe().into_resolved().into_present().map(callback)
}

/// Like [`check`], running `fallback` when the input is falsy.
pub fn check_or_else<I, R, C, F>(input: I, callback: C, fallback: F) -> R
where
    I: IntoMaybe,
    I::Value: Truthy,
    C: FnOnce(<I::Value as Truthy>::Present) -> R,
    F: FnOnce() -> R,
{
    match input.into_maybe().into_resolved().into_present() {
        Some(value) => callback(value),
        None => fallback(),
    }
}

/// [`check`] for fallible producers and callbacks.
///
/// The producer's error and the callback's error both surface through `?`.
pub fn try_check<I, T, E, R, C>(input: I, callback: C) -> Result<Option<R>, E>
where
    I: IntoMaybe<Value = Result<T, E>>,
    T: Truthy,
    C: FnOnce(T::Present) -> Result<R, E>,
{
    let resolved = input.into_maybe().into_resolved()?;
    resolved.into_present().map(callback).transpose()
}

/// [`check_or_else`] for fallible producers, callbacks and fallbacks.
pub fn try_check_or_else<I, T, E, R, C, F>(input: I, callback: C, fallback: F) -> Result<R, E>
where
    I: IntoMaybe<Value = Result<T, E>>,
    T: Truthy,
    C: FnOnce(T::Present) -> Result<R, E>,
    F: FnOnce() -> Result<R, E>,
{
    match input.into_maybe().into_resolved()?.into_present() {
        Some(value) => callback(value),
        None => fallback(),
    }
}
