//! Lattice Gate
//!
//! Truthiness-gated execution with reactive bindings. This crate provides:
//!
//! - Guarded invocation (`check`): run a callback only when a value is present
//! - Argument-forwarding gates (`when`): reusable gated functions
//! - Conjunction (`every`): several inputs combined with short-circuiting
//! - A reactive adapter (`whenify`) with ready-made gated memos, computeds
//!   and effects
//!
//! A value is present unless it is `false`, a numeric zero, `NaN`, the empty
//! string, or absent (`None`, [`Value::Null`], [`Value::Undefined`]).
//!
//! # Architecture
//!
//! - `gate`: truthiness, value resolution and the gate combinators
//! - `reactive`: the host the adapters plug into (signals, memos,
//!   computeds, effects and dependency tracking)
//!
//! # Example
//!
//! ```rust
//! use lattice_gate::reactive::Signal;
//! use lattice_gate::{check, every, when_computed_or_else};
//!
//! assert_eq!(check("", |s| s.len()), None);
//! assert_eq!(check(every((1i32, "a")), |(n, s)| format!("{s}{n}")), Some("a1".into()));
//!
//! let count = Signal::new(0i32);
//! let label = when_computed_or_else(
//!     count.clone(),
//!     |n, _prev| format!("{n} items"),
//!     |_prev| "empty".to_string(),
//! );
//!
//! assert_eq!(label.get(), "empty");
//! count.set(3);
//! assert_eq!(label.get(), "3 items");
//! ```

pub mod gate;
pub mod reactive;

pub use gate::{
    check, check_or_else, every, try_check, try_check_or_else, try_every, when,
    when_computed, when_computed_or_else, when_effect, when_effect_or_else, when_memo,
    when_memo_or_else, when_or_else, whenify, ComputeFn, Conjunction, IntoMaybe, MaybeValue,
    RegExp, Symbol, Truthy, TryConjunction, Value, Whenify,
};
