use std::fmt::Debug;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use ultraviolet::{DVec3, Vec3};

/// Floating-point precision the engine runs in.
///
/// Every quantity of an ensemble (position, velocity, acceleration, mass, step
/// size) shares one `Real`. The associated `Vec3` is the matching
/// `ultraviolet` vector, so `f32` pairs with [`Vec3`] and `f64` with [`DVec3`].
pub trait Real:
    Copy
    + Send
    + Sync
    + Debug
    + Default
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + AddAssign
    + Neg<Output = Self>
    + Sum
    + 'static
{
    type Vec3: Copy
        + Send
        + Sync
        + Debug
        + PartialEq
        + Add<Output = Self::Vec3>
        + Sub<Output = Self::Vec3>
        + Mul<Self, Output = Self::Vec3>
        + Div<Self, Output = Self::Vec3>
        + AddAssign
        + SubAssign
        + MulAssign<Self>
        + Neg<Output = Self::Vec3>;

    const ZERO: Self;
    const ONE: Self;
    const HALF: Self;

    fn from_f64(value: f64) -> Self;
    fn to_f64(self) -> f64;
    fn sqrt(self) -> Self;
    fn is_finite(self) -> bool;

    fn vec3(x: Self, y: Self, z: Self) -> Self::Vec3;
    fn components(v: Self::Vec3) -> [Self; 3];
    fn dot(a: Self::Vec3, b: Self::Vec3) -> Self;
    fn cross(a: Self::Vec3, b: Self::Vec3) -> Self::Vec3;
}

macro_rules! impl_real {
    ($scalar:ty, $vec:ty) => {
        impl Real for $scalar {
            type Vec3 = $vec;

            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;
            const HALF: Self = 0.5;

            #[inline(always)]
            fn from_f64(value: f64) -> Self {
                value as $scalar
            }

            #[inline(always)]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline(always)]
            fn sqrt(self) -> Self {
                <$scalar>::sqrt(self)
            }

            #[inline(always)]
            fn is_finite(self) -> bool {
                <$scalar>::is_finite(self)
            }

            #[inline(always)]
            fn vec3(x: Self, y: Self, z: Self) -> $vec {
                <$vec>::new(x, y, z)
            }

            #[inline(always)]
            fn components(v: $vec) -> [Self; 3] {
                [v.x, v.y, v.z]
            }

            #[inline(always)]
            fn dot(a: $vec, b: $vec) -> Self {
                a.dot(b)
            }

            #[inline(always)]
            fn cross(a: $vec, b: $vec) -> $vec {
                a.cross(b)
            }
        }
    };
}

impl_real!(f32, Vec3);
impl_real!(f64, DVec3);

#[inline(always)]
pub fn vec3<T: Real>(x: T, y: T, z: T) -> T::Vec3 {
    T::vec3(x, y, z)
}

#[inline(always)]
pub fn zero<T: Real>() -> T::Vec3 {
    T::vec3(T::ZERO, T::ZERO, T::ZERO)
}

#[inline(always)]
pub fn dot<T: Real>(a: T::Vec3, b: T::Vec3) -> T {
    T::dot(a, b)
}

#[inline(always)]
pub fn mag_sq<T: Real>(v: T::Vec3) -> T {
    T::dot(v, v)
}

#[inline(always)]
pub fn magnitude<T: Real>(v: T::Vec3) -> T {
    mag_sq::<T>(v).sqrt()
}

#[inline(always)]
pub fn cross<T: Real>(a: T::Vec3, b: T::Vec3) -> T::Vec3 {
    T::cross(a, b)
}

/// Unit vector along `v`. The caller guarantees `v` is not the zero vector.
#[inline(always)]
pub fn normalize<T: Real>(v: T::Vec3) -> T::Vec3 {
    v / magnitude::<T>(v)
}

pub fn is_finite_vec<T: Real>(v: T::Vec3) -> bool {
    T::components(v).iter().all(|c| c.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cross_follows_right_hand_rule() {
        let x = vec3::<f32>(1.0, 0.0, 0.0);
        let y = vec3::<f32>(0.0, 1.0, 0.0);
        assert_eq!(cross::<f32>(x, y), vec3::<f32>(0.0, 0.0, 1.0));
        assert_eq!(cross::<f32>(y, x), vec3::<f32>(0.0, 0.0, -1.0));
    }

    #[test]
    fn normalize_yields_unit_length() {
        let v = vec3::<f32>(3.0, 4.0, 12.0);
        assert_relative_eq!(magnitude::<f32>(v), 13.0);
        assert_relative_eq!(magnitude::<f32>(normalize::<f32>(v)), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn double_precision_shares_the_same_api() {
        let a = vec3::<f64>(1.0, 2.0, 3.0);
        let b = vec3::<f64>(-2.0, 0.5, 4.0);
        assert_relative_eq!(dot::<f64>(a, b), 11.0);
        assert_eq!(f64::components(a + b), [-1.0, 2.5, 7.0]);
        assert!(is_finite_vec::<f64>(a));
        assert!(!is_finite_vec::<f64>(vec3::<f64>(f64::NAN, 0.0, 0.0)));
    }
}
