//! Truthiness Gates
//!
//! Small combinators that run code only when a value is *present*, i.e.
//! outside the falsy set described by [`Truthy`].
//!
//! # Building Blocks
//!
//! - [`MaybeValue`]: a plain value or a producer, resolved fresh each time.
//! - [`check`]: resolve once, run a callback with the present value.
//! - [`when`]: build a reusable gated function forwarding call arguments.
//! - [`every`]: combine several inputs into one, short-circuiting.
//! - [`whenify`]: lift a reactive constructor into gated form; instances
//!   exist for [`Memo`](crate::reactive::Memo),
//!   [`Computed`](crate::reactive::Computed) and
//!   [`Effect`](crate::reactive::Effect).
//!
//! Gates never catch anything. Panics unwind through them and `Result`
//! values returned by callbacks come back unchanged.

mod truthy;
mod value;
mod maybe;
mod check;
mod when;
mod every;
mod whenify;

pub use truthy::Truthy;
pub use value::{RegExp, Symbol, Value};
pub use maybe::{IntoMaybe, MaybeValue, Producer, Readable};
pub use check::{check, check_or_else, try_check, try_check_or_else};
pub use when::{when, when_or_else};
pub use every::{every, try_every, Conjunction, TryConjunction};
pub use whenify::{
    when_computed, when_computed_or_else, when_effect, when_effect_or_else, when_memo,
    when_memo_or_else, whenify, ComputeFn, Whenify,
};
