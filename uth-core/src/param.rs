//! Check parameters and their display strings.
//!
//! A reported check lists its arguments as `(name, value)` pairs. Names are
//! the call-site tokens of each argument; values come from the first of the
//! following that applies to the argument's type:
//!
//! 1. a [`ToParamString`] implementation (the per-type override point),
//! 2. [`Display`],
//! 3. [`Debug`],
//! 4. nothing, which yields an empty string that reporters render as a
//!    "no debug string" warning.
//!
//! The selection happens at compile time inside [`param_string!`](crate::param_string),
//! so it is only available through the macros.
//!
//! Fieldless enums report their integer discriminant through
//! `#[derive(uth::ToParamString)]`; without it they fall back to `Debug` like
//! any other type.

use itertools::Itertools;
use std::fmt::{Debug, Display};

/// A named parameter of a check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    /// Empty when the value's type has no string conversion.
    pub value: String,
}

impl Param {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Param {
        Param {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn has_value(&self) -> bool {
        !self.value.is_empty()
    }
}

/// Custom display string of a parameter value.
///
/// Implement this for types whose `Display`/`Debug` output is not what should
/// appear in reports, or that implement neither.
/// Fieldless enums can derive it to be shown by discriminant.
///
/// ```
/// use uth_core::ToParamString;
///
/// struct Meters(f32);
///
/// impl ToParamString for Meters {
///     fn to_param_string(&self) -> String {
///         format!("{}m", self.0)
///     }
/// }
/// ```
pub trait ToParamString {
    fn to_param_string(&self) -> String;
}

macro_rules! impl_natural {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToParamString for $ty {
                fn to_param_string(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_natural!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, str,
    String,
);

impl<T: ToParamString + ?Sized> ToParamString for &T {
    fn to_param_string(&self) -> String {
        (**self).to_param_string()
    }
}

impl<T: ToParamString + ?Sized> ToParamString for &mut T {
    fn to_param_string(&self) -> String {
        (**self).to_param_string()
    }
}

impl<T: ?Sized> ToParamString for *const T {
    fn to_param_string(&self) -> String {
        format!("{:p}", *self)
    }
}

impl<T: ?Sized> ToParamString for *mut T {
    fn to_param_string(&self) -> String {
        format!("{:p}", *self)
    }
}

/// Sequences render as `{ a; b; c }`.
impl<T: ToParamString> ToParamString for [T] {
    fn to_param_string(&self) -> String {
        if self.is_empty() {
            return "{ }".to_string();
        }
        format!(
            "{{ {} }}",
            self.iter().map(ToParamString::to_param_string).join("; ")
        )
    }
}

impl<T: ToParamString, const N: usize> ToParamString for [T; N] {
    fn to_param_string(&self) -> String {
        self.as_slice().to_param_string()
    }
}

impl<T: ToParamString> ToParamString for Vec<T> {
    fn to_param_string(&self) -> String {
        self.as_slice().to_param_string()
    }
}

#[doc(hidden)]
pub struct Probe<'a, T: ?Sized>(pub &'a T);

#[doc(hidden)]
pub trait ViaToParamString {
    fn param_string(&self) -> String;
}

impl<T: ToParamString + ?Sized> ViaToParamString for &&&Probe<'_, T> {
    fn param_string(&self) -> String {
        self.0.to_param_string()
    }
}

#[doc(hidden)]
pub trait ViaDisplay {
    fn param_string(&self) -> String;
}

impl<T: Display + ?Sized> ViaDisplay for &&Probe<'_, T> {
    fn param_string(&self) -> String {
        self.0.to_string()
    }
}

#[doc(hidden)]
pub trait ViaDebug {
    fn param_string(&self) -> String;
}

impl<T: Debug + ?Sized> ViaDebug for &Probe<'_, T> {
    fn param_string(&self) -> String {
        format!("{:?}", self.0)
    }
}

#[doc(hidden)]
pub trait ViaNothing {
    fn param_string(&self) -> String;
}

impl<T: ?Sized> ViaNothing for Probe<'_, T> {
    fn param_string(&self) -> String {
        String::new()
    }
}

/// Display string of a value, see the [module documentation](crate::param).
#[macro_export]
macro_rules! param_string {
    ($value:expr) => {{
        #[allow(unused_imports)]
        use $crate::param::{
            ViaDebug as _, ViaDisplay as _, ViaNothing as _, ViaToParamString as _,
        };
        (&&&&$crate::param::Probe(&$value)).param_string()
    }};
}
