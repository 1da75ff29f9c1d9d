use crate::backend::Backend;
use std::marker::PhantomData;

/// Arithmetic required from a backend's native scalar type.
pub trait ScalarOps:
    Clone
    + Copy
    + Send
    + Sync
    + std::fmt::Debug
    + PartialOrd
    + std::ops::Add<Output = Self>
    + std::ops::Mul<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::ops::Div<Output = Self>
{
    fn zero() -> Self;
    fn one() -> Self;
    fn from_f64(v: f64) -> Self;
    fn to_f64(self) -> f64;
    fn is_finite(self) -> bool;
}

impl ScalarOps for f64 {
    fn zero() -> Self {
        0.0
    }
    fn one() -> Self {
        1.0
    }
    fn from_f64(v: f64) -> Self {
        v
    }
    fn to_f64(self) -> f64 {
        self
    }
    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
}

/// Backend-typed scalar, e.g. a loss value or the bias of a regression model.
#[derive(Clone, Debug, Copy)]
pub struct Scalar<B: Backend> {
    pub(crate) data: B::Scalar,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Scalar<B> {
    pub fn new(f: f64) -> Self {
        Self {
            data: B::scalar_f64(f),
            backend: PhantomData,
        }
    }

    pub fn to_f64(&self) -> f64 {
        self.data.to_f64()
    }

    pub fn is_finite(&self) -> bool {
        self.data.is_finite()
    }
}

impl<B: Backend> std::ops::Add for Scalar<B> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            data: self.data + rhs.data,
            backend: PhantomData,
        }
    }
}

impl<B: Backend> std::ops::Sub for Scalar<B> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            data: self.data - rhs.data,
            backend: PhantomData,
        }
    }
}

impl<B: Backend> std::ops::Mul for Scalar<B> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self {
            data: self.data * rhs.data,
            backend: PhantomData,
        }
    }
}

impl<B: Backend> std::ops::Div for Scalar<B> {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Self {
            data: self.data / rhs.data,
            backend: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CpuBackend, NdarrayBackend};

    #[test]
    fn test_scalar_ops_f64() {
        assert_eq!(f64::zero(), 0.0);
        assert_eq!(f64::one(), 1.0);
        assert_eq!(f64::from_f64(0.25), 0.25);
        assert_eq!(0.25f64.to_f64(), 0.25);
        assert!(ScalarOps::is_finite(1.0f64));
        assert!(!ScalarOps::is_finite(f64::NAN));
        assert!(!ScalarOps::is_finite(f64::INFINITY));
    }

    #[test]
    fn test_scalar_arithmetic() {
        let a: Scalar<CpuBackend> = Scalar::new(5.0);
        let b: Scalar<CpuBackend> = Scalar::new(2.0);

        let sum = a + b;
        assert_eq!(sum.to_f64(), 7.0);

        let diff = sum - Scalar::new(3.0);
        assert_eq!(diff.to_f64(), 4.0);

        let prod = diff * Scalar::new(0.5);
        assert_eq!(prod.to_f64(), 2.0);

        let quot = prod / Scalar::new(4.0);
        assert_eq!(quot.to_f64(), 0.5);
    }

    #[test]
    fn test_scalar_is_finite_on_both_backends() {
        let nan: Scalar<NdarrayBackend> = Scalar::new(f64::NAN);
        assert!(!nan.is_finite());
        let one: Scalar<CpuBackend> = Scalar::new(1.0);
        assert!(one.is_finite());
    }
}
