//! Argument-Forwarding Gate
//!
//! `when` turns an input and a callback into a reusable gated function.
//! Every call re-resolves the input from scratch and forwards the call's
//! argument to whichever branch runs:
//!
//! - present: `callback(value, args)`
//! - absent: `fallback(args)`, or `None` without a fallback
//!
//! Several arguments travel as a tuple. The gate keeps no state between
//! calls.

use tracing::trace;

use super::maybe::IntoMaybe;
use super::truthy::Truthy;

/// Build a gated function that runs `callback` while `input` is present.
///
/// ```rust
/// use lattice_gate::{when, MaybeValue};
///
/// let greet = when(Some("ada"), |name, punct: char| format!("hi {name}{punct}"));
/// assert_eq!(greet('!'), Some("hi ada!".to_string()));
///
/// let nobody = when(MaybeValue::producer(|| None::<&str>), |name, ()| name.len());
/// assert_eq!(nobody(()), None);
/// ```
pub fn when<I, A, R, C>(input: I, callback: C) -> impl Fn(A) -> Option<R>
where
    I: IntoMaybe,
    I::Value: Truthy + Clone,
    C: Fn(<I::Value as Truthy>::Present, A) -> R,
{
    let input = input.into_maybe();

    move |args: A| match input.resolve().into_present() {
        Some(value) => {
            trace!(branch = "callback", "gate open");
            Some(callback(value, args))
        }
        None => {
            trace!(branch = "none", "gate closed");
            None
        }
    }
}

/// Build a gated function that runs `callback` while `input` is present and
/// `fallback` otherwise.
pub fn when_or_else<I, A, R, C, F>(input: I, callback: C, fallback: F) -> impl Fn(A) -> R
where
    I: IntoMaybe,
    I::Value: Truthy + Clone,
    C: Fn(<I::Value as Truthy>::Present, A) -> R,
    F: Fn(A) -> R,
{
    let input = input.into_maybe();

    move |args: A| match input.resolve().into_present() {
        Some(value) => {
            trace!(branch = "callback", "gate open");
            callback(value, args)
        }
        None => {
            trace!(branch = "fallback", "gate closed");
            fallback(args)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::{MaybeValue, Value};
    use crate::reactive::Signal;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;

    #[test]
    fn re_resolves_on_every_call() {
        let signal = Signal::new(Value::Null);
        let gated = when(signal.clone(), |v: Value, ()| v);

        assert_eq!(gated(()), None);

        signal.set(Value::from(3));
        assert_eq!(gated(()), Some(Value::from(3)));

        signal.set(Value::from(""));
        assert_eq!(gated(()), None);
    }

    #[test]
    fn producer_runs_once_per_call() {
        let calls = Arc::new(AtomicI32::new(0));
        let calls_clone = calls.clone();
        let input = MaybeValue::producer(move || calls_clone.fetch_add(1, Ordering::SeqCst) + 1);
        let gated = when(input, |n: i32, ()| n);

        assert_eq!(gated(()), Some(1));
        assert_eq!(gated(()), Some(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn forwards_arguments_in_order() {
        let gated = when(10i32, |v, (a, b, c): (i32, &'static str, bool)| (v, a, b, c));
        assert_eq!(gated((1, "two", true)), Some((10, 1, "two", true)));
    }

    #[test]
    fn fallback_receives_only_call_arguments() {
        let gated = when_or_else(
            0i32,
            |v, extra: (u8, u8)| format!("cb {v} {extra:?}"),
            |extra: (u8, u8)| format!("fb {extra:?}"),
        );
        assert_eq!(gated((1, 2)), "fb (1, 2)");

        let gated = when_or_else(
            7i32,
            |v, extra: (u8, u8)| format!("cb {v} {extra:?}"),
            |extra: (u8, u8)| format!("fb {extra:?}"),
        );
        assert_eq!(gated((3, 4)), "cb 7 (3, 4)");
    }

    #[test]
    fn never_runs_both_branches() {
        let cb = Arc::new(AtomicI32::new(0));
        let fb = Arc::new(AtomicI32::new(0));
        let (cb_clone, fb_clone) = (cb.clone(), fb.clone());
        let signal = Signal::new(0i32);

        let gated = when_or_else(
            signal.clone(),
            move |_, ()| {
                cb_clone.fetch_add(1, Ordering::SeqCst);
            },
            move |()| {
                fb_clone.fetch_add(1, Ordering::SeqCst);
            },
        );

        for v in [0, 1, 2, 0] {
            signal.set(v);
            gated(());
        }

        assert_eq!(cb.load(Ordering::SeqCst), 2);
        assert_eq!(fb.load(Ordering::SeqCst), 2);
    }

    #[test]
    #[should_panic(expected = "gated callback failed")]
    fn callback_panic_propagates() {
        let gated = when(1i32, |_, ()| -> i32 { panic!("gated callback failed") });
        gated(());
    }
}
