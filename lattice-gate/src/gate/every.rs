//! Conjunction
//!
//! `every` folds a tuple of inputs into one input that is present only when
//! all of them are. Resolution walks the tuple left to right and stops at the
//! first falsy element, so later producers are never called for that
//! resolution. The combined input is lazy: nothing resolves until a gate (or
//! a caller) resolves it, and each resolution starts over.

use std::sync::Arc;

use tracing::trace;

use super::maybe::{IntoMaybe, MaybeValue, Producer};
use super::truthy::Truthy;

/// A tuple of inputs that can be resolved as a unit.
pub trait Conjunction {
    /// Tuple of the elements' present values.
    type Output;

    fn into_resolver(self) -> Producer<Option<Self::Output>>;
}

/// A tuple of fallible inputs sharing the error type `E`.
pub trait TryConjunction<E> {
    type Output;

    fn into_resolver(self) -> Producer<Result<Option<Self::Output>, E>>;
}

/// Combine `inputs` into one input that presents the tuple of their present
/// values, or is absent if any element is falsy.
///
/// ```rust
/// use lattice_gate::{check, every, MaybeValue};
///
/// let name = MaybeValue::producer(|| Some("ada".to_string()));
/// let both = every((name, 36i32));
/// assert_eq!(check(both, |(name, age)| format!("{name} {age}")), Some("ada 36".into()));
///
/// assert_eq!(every((1i32, 0i32)).resolve(), None);
/// assert_eq!(every(()).resolve(), Some(()));
/// ```
pub fn every<I: Conjunction>(inputs: I) -> MaybeValue<Option<I::Output>> {
    MaybeValue::Producer(inputs.into_resolver())
}

/// [`every`] over fallible inputs. The first error ends the walk and is
/// returned; inputs after it stay unresolved.
pub fn try_every<E, I: TryConjunction<E>>(inputs: I) -> MaybeValue<Result<Option<I::Output>, E>> {
    MaybeValue::Producer(inputs.into_resolver())
}

macro_rules! conjunction {
    ($($name:ident)*) => {
        #[allow(non_snake_case)]
        impl<$($name),*> Conjunction for ($($name,)*)
        where
            $(
                $name: IntoMaybe,
                <$name as IntoMaybe>::Value: Truthy + Clone + Send + Sync + 'static,
            )*
        {
            type Output = ($(<<$name as IntoMaybe>::Value as Truthy>::Present,)*);

            fn into_resolver(self) -> Producer<Option<Self::Output>> {
                let ($($name,)*) = self;
                $(let $name = $name.into_maybe();)*

                Arc::new(move || -> Option<Self::Output> {
                    Some(($(
                        match $name.resolve().into_present() {
                            Some(present) => present,
                            None => {
                                trace!(input = stringify!($name), "conjunction short-circuited");
                                return None;
                            }
                        },
                    )*))
                })
            }
        }
    };
}

conjunction!();
conjunction!(A);
conjunction!(A B);
conjunction!(A B C);
conjunction!(A B C D);
conjunction!(A B C D E);
conjunction!(A B C D E F);
conjunction!(A B C D E F G);
conjunction!(A B C D E F G H);
conjunction!(A B C D E F G H I);
conjunction!(A B C D E F G H I J);
conjunction!(A B C D E F G H I J K);
conjunction!(A B C D E F G H I J K L);

macro_rules! try_conjunction {
    ($($name:ident $value:ident),+) => {
        #[allow(non_snake_case)]
        impl<Error, $($name, $value),+> TryConjunction<Error> for ($($name,)+)
        where
            Error: Clone + Send + Sync + 'static,
            $(
                $name: IntoMaybe<Value = Result<$value, Error>>,
                $value: Truthy + Clone + Send + Sync + 'static,
            )+
        {
            type Output = ($(<$value as Truthy>::Present,)+);

            fn into_resolver(self) -> Producer<Result<Option<Self::Output>, Error>> {
                let ($($name,)+) = self;
                $(let $name = $name.into_maybe();)+

                Arc::new(move || -> Result<Option<Self::Output>, Error> {
                    Ok(Some(($(
                        match $name.resolve()?.into_present() {
                            Some(present) => present,
                            None => return Ok(None),
                        },
                    )+)))
                })
            }
        }
    };
}

try_conjunction!(A VA);
try_conjunction!(A VA, B VB);
try_conjunction!(A VA, B VB, C VC);
try_conjunction!(A VA, B VB, C VC, D VD);
try_conjunction!(A VA, B VB, C VC, D VD, E VE);
try_conjunction!(A VA, B VB, C VC, D VD, E VE, F VF);
try_conjunction!(A VA, B VB, C VC, D VD, E VE, F VF, G VG);
try_conjunction!(A VA, B VB, C VC, D VD, E VE, F VF, G VG, H VH);
try_conjunction!(A VA, B VB, C VC, D VD, E VE, F VF, G VG, H VH, I VI);
try_conjunction!(A VA, B VB, C VC, D VD, E VE, F VF, G VG, H VH, I VI, J VJ);
try_conjunction!(A VA, B VB, C VC, D VD, E VE, F VF, G VG, H VH, I VI, J VJ, K VK);
try_conjunction!(A VA, B VB, C VC, D VD, E VE, F VF, G VG, H VH, I VI, J VJ, K VK, L VL);
