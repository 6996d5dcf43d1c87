//! Reactive Primitives
//!
//! This module implements the reactive host that the gate adapters plug
//! into: signals, memos, computeds and effects.
//!
//! # Concepts
//!
//! ## Signals
//!
//! A Signal is a container for mutable state. When a signal's value is read
//! within a tracking context (a memo, computed or effect), the signal
//! registers that context as a dependent. When the signal's value changes,
//! all dependents are notified.
//!
//! ## Memos
//!
//! A Memo is a derived value that caches its result. It re-evaluates lazily,
//! on the first read after one of its dependencies changed.
//!
//! ## Computeds
//!
//! A Computed is an eager derived value: it re-evaluates as soon as a
//! dependency changes, whether or not anyone reads it.
//!
//! ## Effects
//!
//! An Effect is a side-effecting computation that runs whenever its
//! dependencies change.
//!
//! # Previous Values
//!
//! Every computation function has the shape `Fn(Option<T>) -> T`. The
//! argument is the result of the previous run: `None` on the first run,
//! unless [`ComputationOptions::initial`] supplied a seed. The host owns
//! that slot and writes it only after a run completes.
//!
//! # Implementation Notes
//!
//! The reactive system uses a thread-local tracking context to automatically
//! detect dependencies. When a source is read, we check if there is an active
//! tracking context and, if so, register the dependency.

mod context;
mod subscriber;
mod runtime;
mod error;
mod options;
mod signal;
mod memo;
mod effect;
mod computed;

pub use context::{untrack, ReactiveContext};
pub use subscriber::{SourceId, SubscriberId};
pub use runtime::{Reactive, Runtime};
pub use error::{ReactiveError, Result};
pub use options::ComputationOptions;
pub use signal::Signal;
pub use memo::{Memo, MemoState};
pub use effect::Effect;
pub use computed::Computed;
