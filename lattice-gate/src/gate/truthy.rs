//! Truthiness
//!
//! A value is *present* unless it is one of: `false`, a numeric zero
//! (including `-0.0`), `NaN`, the empty string, or an absent value (`None`,
//! [`Value::Null`](super::Value::Null), [`Value::Undefined`](super::Value::Undefined)).
//! Everything else is present: empty collections, tuples, dates, the string
//! `"false"`, the string `"0"`, infinities.
//!
//! `Option` is flattened: `Some(v)` is present exactly when `v` is, and it
//! presents `v`'s present value, so gated callbacks never see the wrapper.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use std::time::SystemTime;

use indexmap::IndexMap;

/// Classifies a value as present or absent.
pub trait Truthy {
    /// What a gated callback receives when the value is present.
    type Present;

    /// Whether the value is outside the falsy set.
    fn is_truthy(&self) -> bool;

    /// The present value, or `None` when falsy.
    fn into_present(self) -> Option<Self::Present>;
}

macro_rules! truthy_self {
    ($($ty:ty => |$v:ident| $test:expr;)*) => {
        $(
            impl Truthy for $ty {
                type Present = Self;

                #[inline]
                fn is_truthy(&self) -> bool {
                    let $v = self;
                    $test
                }

                #[inline]
                fn into_present(self) -> Option<Self> {
                    if self.is_truthy() {
                        Some(self)
                    } else {
                        None
                    }
                }
            }
        )*
    };
}

truthy_self! {
    bool => |v| *v;
    i8 => |v| *v != 0;
    i16 => |v| *v != 0;
    i32 => |v| *v != 0;
    i64 => |v| *v != 0;
    i128 => |v| *v != 0;
    isize => |v| *v != 0;
    u8 => |v| *v != 0;
    u16 => |v| *v != 0;
    u32 => |v| *v != 0;
    u64 => |v| *v != 0;
    u128 => |v| *v != 0;
    usize => |v| *v != 0;
    // `-0.0 == 0.0`, and NaN compares unequal to everything.
    f32 => |v| *v != 0.0 && !v.is_nan();
    f64 => |v| *v != 0.0 && !v.is_nan();
    char => |_v| true;
    String => |v| !v.is_empty();
    Arc<str> => |v| !v.is_empty();
    SystemTime => |_v| true;
}

impl<'a> Truthy for &'a str {
    type Present = &'a str;

    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }

    fn into_present(self) -> Option<&'a str> {
        (!self.is_empty()).then_some(self)
    }
}

impl<T: Truthy> Truthy for Option<T> {
    type Present = T::Present;

    fn is_truthy(&self) -> bool {
        self.as_ref().is_some_and(T::is_truthy)
    }

    fn into_present(self) -> Option<T::Present> {
        self.and_then(T::into_present)
    }
}

/// Shared values keep their identity: a present `Arc<T>` is handed over as
/// the same allocation.
impl<T: Truthy> Truthy for Arc<T> {
    type Present = Arc<T>;

    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }

    fn into_present(self) -> Option<Arc<T>> {
        self.is_truthy().then_some(self)
    }
}

macro_rules! truthy_always {
    ($([$($gen:tt)*] $ty:ty;)*) => {
        $(
            impl<$($gen)*> Truthy for $ty {
                type Present = Self;

                #[inline]
                fn is_truthy(&self) -> bool {
                    true
                }

                #[inline]
                fn into_present(self) -> Option<Self> {
                    Some(self)
                }
            }
        )*
    };
}

// Containers are objects: present even when empty.
truthy_always! {
    [T] Vec<T>;
    [T, const N: usize] [T; N];
    [K, V, S] HashMap<K, V, S>;
    [K, V] BTreeMap<K, V>;
    [T, S] HashSet<T, S>;
    [T] BTreeSet<T>;
    [K, V, S] IndexMap<K, V, S>;
}

macro_rules! truthy_tuple {
    ($($name:ident)*) => {
        truthy_always! { [$($name),*] ($($name,)*); }
    };
}

truthy_tuple!();
truthy_tuple!(A);
truthy_tuple!(A B);
truthy_tuple!(A B C);
truthy_tuple!(A B C D);
truthy_tuple!(A B C D E);
truthy_tuple!(A B C D E F);
truthy_tuple!(A B C D E F G);
truthy_tuple!(A B C D E F G H);
truthy_tuple!(A B C D E F G H I);
truthy_tuple!(A B C D E F G H I J);
truthy_tuple!(A B C D E F G H I J K);
truthy_tuple!(A B C D E F G H I J K L);

impl Truthy for serde_json::Value {
    type Present = Self;

    fn is_truthy(&self) -> bool {
        use serde_json::Value as Json;

        match self {
            Json::Null => false,
            Json::Bool(b) => *b,
            Json::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
            Json::String(s) => !s.is_empty(),
            Json::Array(_) | Json::Object(_) => true,
        }
    }

    fn into_present(self) -> Option<Self> {
        self.is_truthy().then_some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_falsy_set() {
        assert!(!0i32.is_truthy());
        assert!(!0u8.is_truthy());
        assert!(!0i128.is_truthy());
        assert!(!0.0f64.is_truthy());
        assert!(!(-0.0f64).is_truthy());
        assert!(!f64::NAN.is_truthy());
        assert!(!f32::NAN.is_truthy());

        assert!(1i32.is_truthy());
        assert!((-1i64).is_truthy());
        assert!(f64::INFINITY.is_truthy());
        assert!(f64::NEG_INFINITY.is_truthy());
        assert!(f64::MIN_POSITIVE.is_truthy());
    }

    #[test]
    fn strings() {
        assert!(!"".is_truthy());
        assert!(!String::new().is_truthy());
        assert!("false".is_truthy());
        assert!("0".is_truthy());
        assert!(" ".is_truthy());
        assert!(!Arc::<str>::from("").is_truthy());
    }

    #[test]
    fn empty_containers_are_present() {
        assert!(Vec::<i32>::new().is_truthy());
        assert!(HashMap::<String, i32>::new().is_truthy());
        assert!(IndexMap::<String, i32>::new().is_truthy());
        assert!(().is_truthy());
        assert!(SystemTime::UNIX_EPOCH.is_truthy());
    }

    #[test]
    fn option_flattens() {
        assert_eq!(Some(5).into_present(), Some(5));
        assert_eq!(Some(0).into_present(), None);
        assert_eq!(None::<i32>.into_present(), None);
        assert_eq!(Some(Some("x")).into_present(), Some("x"));
        assert!(!Some(String::new()).is_truthy());
    }

    #[test]
    fn arc_keeps_identity() {
        let shared = Arc::new(vec![1, 2, 3]);
        let present = shared.clone().into_present().expect("vec is present");
        assert!(Arc::ptr_eq(&shared, &present));

        assert!(Arc::new(0u8).into_present().is_none());
    }

    #[test]
    fn json_values() {
        assert!(!json!(null).is_truthy());
        assert!(!json!(false).is_truthy());
        assert!(!json!(0).is_truthy());
        assert!(!json!(0.0).is_truthy());
        assert!(!json!("").is_truthy());

        assert!(json!([]).is_truthy());
        assert!(json!({}).is_truthy());
        assert!(json!("false").is_truthy());
        assert!(json!(-3).is_truthy());
    }
}
