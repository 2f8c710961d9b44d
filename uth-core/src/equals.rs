//! Equality helpers behind `check_eq!` and `check_slice_eq!`.

/// Plain equality.
pub fn equals<T, U>(lhs: &T, rhs: &U) -> bool
where
    T: PartialEq<U> + ?Sized,
    U: ?Sized,
{
    lhs == rhs
}

/// Values that can be compared within a tolerance.
pub trait Tolerance {
    /// `|self - other| < epsilon`. The bound is strict: values exactly
    /// `epsilon` apart are not within tolerance.
    fn within(&self, other: &Self, epsilon: &Self) -> bool;
}

macro_rules! impl_float_tolerance {
    ($($ty:ty),*) => {
        $(
            impl Tolerance for $ty {
                fn within(&self, other: &Self, epsilon: &Self) -> bool {
                    (self - other).abs() < *epsilon
                }
            }
        )*
    };
}

macro_rules! impl_int_tolerance {
    ($($ty:ty),*) => {
        $(
            impl Tolerance for $ty {
                fn within(&self, other: &Self, epsilon: &Self) -> bool {
                    (self.abs_diff(*other) as i128) < (*epsilon as i128)
                }
            }
        )*
    };
}

impl_float_tolerance!(f32, f64);
impl_int_tolerance!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<T: Tolerance + ?Sized> Tolerance for &T {
    fn within(&self, other: &Self, epsilon: &Self) -> bool {
        (**self).within(*other, *epsilon)
    }
}

/// Equality within `epsilon`.
pub fn equals_eps<T: Tolerance + ?Sized>(lhs: &T, rhs: &T, epsilon: &T) -> bool {
    lhs.within(rhs, epsilon)
}

/// Element-wise equality of the first `count` elements, stopping at the first
/// mismatch. A sequence shorter than `count` never compares equal.
pub fn equals_slice<T, U>(lhs: &[T], rhs: &[U], count: usize) -> bool
where
    T: PartialEq<U>,
{
    if lhs.len() < count || rhs.len() < count {
        return false;
    }
    lhs[..count]
        .iter()
        .zip(&rhs[..count])
        .all(|(l, r)| equals(l, r))
}

/// [`equals_slice`] with [`equals_eps`] applied to each element pair.
pub fn equals_slice_eps<T: Tolerance>(lhs: &[T], rhs: &[T], count: usize, epsilon: &T) -> bool {
    if lhs.len() < count || rhs.len() < count {
        return false;
    }
    lhs[..count]
        .iter()
        .zip(&rhs[..count])
        .all(|(l, r)| equals_eps(l, r, epsilon))
}

#[cfg(test)]
mod test {
    use super::*;
    use test_case::test_case;

    #[test]
    fn plain() {
        assert!(equals(&5, &5));
        assert!(!equals(&5, &9));
        assert!(equals("abc", &String::from("abc")));
    }

    #[test_case(1.0, 1.0, 0.5 => true; "identical")]
    #[test_case(1.0, 1.5, 0.5 => false; "exactly epsilon apart")]
    #[test_case(1.0, 1.25, 0.5 => true; "inside")]
    #[test_case(1.5, 1.0, 0.5 => false; "exactly epsilon apart reversed")]
    #[test_case(4.6, 1.25, f64::EPSILON => false; "far apart")]
    fn float_epsilon(lhs: f64, rhs: f64, epsilon: f64) -> bool {
        equals_eps(&lhs, &rhs, &epsilon)
    }

    #[test]
    fn epsilon_boundary_is_strict() {
        for epsilon in [0.5f64, 0.25, 0.125] {
            assert!(!equals_eps(&1.0, &(1.0 + epsilon), &epsilon));
            assert!(equals_eps(&1.0, &1.0, &epsilon));
        }
    }

    #[test_case(10, 12, 3 => true; "within")]
    #[test_case(10, 13, 3 => false; "on the boundary")]
    #[test_case(-2, 2, 5 => true; "across zero")]
    #[test_case(0, 0, -1 => false; "negative epsilon")]
    fn int_epsilon(lhs: i32, rhs: i32, epsilon: i32) -> bool {
        equals_eps(&lhs, &rhs, &epsilon)
    }

    #[test]
    fn slices() {
        let lhs = [1.45f32, 8.36, 1.247];
        let rhs = [1.45f32, 8.36, 945.9];

        assert!(equals_slice(&lhs, &rhs, 2));
        assert!(!equals_slice(&lhs, &rhs, 3));
        assert!(equals_slice(&lhs, &rhs, 0));
        assert!(equals_slice_eps(&lhs, &rhs, 2, &f32::EPSILON));
        assert!(!equals_slice_eps(&lhs, &rhs, 3, &f32::EPSILON));
    }

    #[test]
    fn slice_shorter_than_count() {
        assert!(!equals_slice(&[1, 2], &[1, 2, 3], 3));
        assert!(!equals_slice_eps(&[1.0f64], &[1.0, 2.0], 2, &0.1));
    }
}
