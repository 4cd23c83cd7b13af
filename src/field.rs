//! Arithmetic over a prime field whose modulus is chosen at runtime.
//!
//! The permutation needs only four operations from the field: addition,
//! subtraction, multiplication, and fast exponentiation. They are provided
//! here on top of [`num_bigint::BigUint`], with every result reduced into
//! `[0, p)` so that no element ever holds an unreduced representative.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};
use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::{Num, One, Zero};

use crate::error::FieldError;

/// An element of the prime field `F_p`, carrying a shared handle to `p`.
///
/// The modulus is part of the element's identity: two elements are equal only
/// if both their values and their moduli agree, and arithmetic between
/// elements of different fields is a bug (checked in debug builds). The
/// caller guarantees that `p` is prime; nothing here verifies primality.
#[derive(Clone, PartialEq, Eq)]
pub struct FieldElement {
    value: BigUint,
    modulus: Arc<BigUint>,
}

impl FieldElement {
    /// Creates an element from an integer, reducing it modulo `p`.
    pub fn new(value: impl Into<BigUint>, modulus: Arc<BigUint>) -> Self {
        let value = value.into() % &*modulus;
        Self { value, modulus }
    }

    /// Parses an element from a decimal or hex string literal in the given
    /// radix, reducing it modulo `p`.
    ///
    /// This is the loader for externally supplied parameter data (round
    /// constants and matrix entries are typically published as hex strings).
    pub fn from_str_radix(
        literal: &str,
        radix: u32,
        modulus: Arc<BigUint>,
    ) -> Result<Self, num_bigint::ParseBigIntError> {
        let value = BigUint::from_str_radix(literal, radix)?;
        Ok(Self::new(value, modulus))
    }

    /// The additive identity of `F_p`.
    pub fn zero(modulus: Arc<BigUint>) -> Self {
        Self {
            value: BigUint::zero(),
            modulus,
        }
    }

    /// The multiplicative identity of `F_p`.
    pub fn one(modulus: Arc<BigUint>) -> Self {
        Self::new(BigUint::one(), modulus)
    }

    /// The reduced integer representative in `[0, p)`.
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// The field modulus `p`.
    pub fn modulus(&self) -> &Arc<BigUint> {
        &self.modulus
    }

    /// Whether this is the additive identity.
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Whether `other` lives in the same field as `self`.
    ///
    /// Cheap when both elements share one modulus allocation, which is the
    /// common case for elements produced from a single parameter set.
    pub fn same_field(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.modulus, &other.modulus) || self.modulus == other.modulus
    }

    /// Fast exponentiation by repeated squaring.
    ///
    /// Executes once per state cell per round, so it delegates to
    /// [`BigUint::modpow`] rather than naive repeated multiplication.
    pub fn pow(&self, exponent: u64) -> Self {
        Self {
            value: self.value.modpow(&BigUint::from(exponent), &self.modulus),
            modulus: Arc::clone(&self.modulus),
        }
    }

    /// The multiplicative inverse, computed as `x^(p-2)` (valid because `p`
    /// is prime).
    ///
    /// Fails with [`FieldError::DivisionByZero`] for the additive identity.
    /// The permutation itself never inverts, but inverse S-boxes and matrix
    /// validation need this.
    pub fn inv(&self) -> Result<Self, FieldError> {
        if self.value.is_zero() {
            return Err(FieldError::DivisionByZero);
        }
        let exponent = &*self.modulus - BigUint::from(2u8);
        Ok(Self {
            value: self.value.modpow(&exponent, &self.modulus),
            modulus: Arc::clone(&self.modulus),
        })
    }
}

impl Add<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn add(self, rhs: &FieldElement) -> FieldElement {
        debug_assert!(self.same_field(rhs), "adding elements of different fields");
        FieldElement {
            value: (&self.value + &rhs.value) % &*self.modulus,
            modulus: Arc::clone(&self.modulus),
        }
    }
}

impl AddAssign<&FieldElement> for FieldElement {
    fn add_assign(&mut self, rhs: &FieldElement) {
        debug_assert!(self.same_field(rhs), "adding elements of different fields");
        self.value += &rhs.value;
        self.value %= &*self.modulus;
    }
}

impl Sub<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn sub(self, rhs: &FieldElement) -> FieldElement {
        debug_assert!(
            self.same_field(rhs),
            "subtracting elements of different fields"
        );
        // BigUint cannot go negative, so lift by p before subtracting.
        let value = (&self.value + (&*self.modulus - &rhs.value)) % &*self.modulus;
        FieldElement {
            value,
            modulus: Arc::clone(&self.modulus),
        }
    }
}

impl Mul<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn mul(self, rhs: &FieldElement) -> FieldElement {
        debug_assert!(
            self.same_field(rhs),
            "multiplying elements of different fields"
        );
        FieldElement {
            value: (&self.value * &rhs.value) % &*self.modulus,
            modulus: Arc::clone(&self.modulus),
        }
    }
}

impl Neg for &FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        let value = if self.value.is_zero() {
            BigUint::zero()
        } else {
            &*self.modulus - &self.value
        };
        FieldElement {
            value,
            modulus: Arc::clone(&self.modulus),
        }
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({} mod {})", self.value, self.modulus)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}
