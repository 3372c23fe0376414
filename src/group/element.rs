//! Scalars in Z_q and elements of the order-q subgroup of (Z/pZ)*.
//!
//! `ElementModQ` carries its own arithmetic since every built-in group shares
//! the same order q. `ElementModP` only stores a residue; multiplication and
//! exponentiation go through the [`GroupContext`](crate::group::GroupContext)
//! that owns the modulus.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::{Product, Sum};
use core::ops::{Add, Mul, Neg, Sub};

use num_bigint::BigUint;
use num_traits::{One, Zero};
use once_cell::sync::Lazy;
use rand::{CryptoRng, RngCore};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::errors::MixnetError;
use crate::group::constants::Q_BYTES;

/// Byte length of a scalar encoding.
pub const SCALAR_BYTES: usize = 32;

/// Bytes drawn from the RNG per random scalar. The 128 extra bits keep the
/// modular bias negligible.
const RANDOM_SCALAR_BYTES: usize = 48;

/// The subgroup order q shared by every group.
pub(crate) static Q: Lazy<BigUint> = Lazy::new(|| BigUint::from_bytes_be(&Q_BYTES));

// ------- ElementModQ ------- //

/// A scalar in `[0, q)`.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct ElementModQ(pub(crate) BigUint);

impl ElementModQ {
    /// Reduces `value` mod q.
    pub fn new(value: BigUint) -> Self {
        ElementModQ(value % &*Q)
    }

    /// The additive identity.
    pub fn zero() -> Self {
        ElementModQ(BigUint::zero())
    }

    /// The multiplicative identity.
    pub fn one() -> Self {
        ElementModQ(BigUint::one())
    }

    /// Scalar with the small value `v`.
    pub fn from_u64(v: u64) -> Self {
        ElementModQ::new(BigUint::from(v))
    }

    /// Samples a uniform scalar.
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; RANDOM_SCALAR_BYTES];
        rng.fill_bytes(&mut bytes);
        ElementModQ::from_bytes_mod_order_wide(&bytes)
    }

    /// Interprets `bytes` as a big-endian integer and reduces it mod q.
    pub fn from_bytes_mod_order_wide(bytes: &[u8]) -> Self {
        ElementModQ::new(BigUint::from_bytes_be(bytes))
    }

    /// Decodes a canonical 32-byte big-endian scalar.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MixnetError> {
        if bytes.len() != SCALAR_BYTES {
            return Err(MixnetError::InvalidEncoding {
                expected: SCALAR_BYTES,
                actual: bytes.len(),
            });
        }
        let value = BigUint::from_bytes_be(bytes);
        if value >= *Q {
            return Err(MixnetError::ScalarOutOfRange);
        }
        Ok(ElementModQ(value))
    }

    /// Canonical 32-byte big-endian encoding.
    pub fn to_bytes(&self) -> [u8; SCALAR_BYTES] {
        let mut out = [0u8; SCALAR_BYTES];
        let raw = self.0.to_bytes_be();
        out[SCALAR_BYTES - raw.len()..].copy_from_slice(&raw);
        out
    }

    /// The underlying integer.
    pub fn value(&self) -> &BigUint {
        &self.0
    }

    /// Returns true for the zero scalar.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Debug for ElementModQ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementModQ({})", hex::encode(self.to_bytes()))
    }
}

impl<'a, 'b> Add<&'b ElementModQ> for &'a ElementModQ {
    type Output = ElementModQ;
    fn add(self, other: &'b ElementModQ) -> ElementModQ {
        ElementModQ::new(&self.0 + &other.0)
    }
}

impl<'a, 'b> Sub<&'b ElementModQ> for &'a ElementModQ {
    type Output = ElementModQ;
    fn sub(self, other: &'b ElementModQ) -> ElementModQ {
        ElementModQ::new(&self.0 + &*Q - &other.0)
    }
}

impl<'a, 'b> Mul<&'b ElementModQ> for &'a ElementModQ {
    type Output = ElementModQ;
    fn mul(self, other: &'b ElementModQ) -> ElementModQ {
        ElementModQ::new(&self.0 * &other.0)
    }
}

impl<'a> Neg for &'a ElementModQ {
    type Output = ElementModQ;
    fn neg(self) -> ElementModQ {
        ElementModQ::new(&*Q - &self.0)
    }
}

impl Neg for ElementModQ {
    type Output = ElementModQ;
    fn neg(self) -> ElementModQ {
        -&self
    }
}

// Owned and mixed variants forward to the reference impls.
macro_rules! define_scalar_variants {
    ($($trait:ident :: $method:ident),*) => {$(
        impl<'b> $trait<&'b ElementModQ> for ElementModQ {
            type Output = ElementModQ;
            fn $method(self, other: &'b ElementModQ) -> ElementModQ {
                (&self).$method(other)
            }
        }
        impl<'a> $trait<ElementModQ> for &'a ElementModQ {
            type Output = ElementModQ;
            fn $method(self, other: ElementModQ) -> ElementModQ {
                self.$method(&other)
            }
        }
        impl $trait<ElementModQ> for ElementModQ {
            type Output = ElementModQ;
            fn $method(self, other: ElementModQ) -> ElementModQ {
                (&self).$method(&other)
            }
        }
    )*};
}

define_scalar_variants!(Add::add, Sub::sub, Mul::mul);

impl Sum for ElementModQ {
    fn sum<I: Iterator<Item = ElementModQ>>(iter: I) -> ElementModQ {
        iter.fold(ElementModQ::zero(), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a ElementModQ> for ElementModQ {
    fn sum<I: Iterator<Item = &'a ElementModQ>>(iter: I) -> ElementModQ {
        iter.fold(ElementModQ::zero(), |acc, x| acc + x)
    }
}

impl Product for ElementModQ {
    fn product<I: Iterator<Item = ElementModQ>>(iter: I) -> ElementModQ {
        iter.fold(ElementModQ::one(), |acc, x| acc * x)
    }
}

impl<'a> Product<&'a ElementModQ> for ElementModQ {
    fn product<I: Iterator<Item = &'a ElementModQ>>(iter: I) -> ElementModQ {
        iter.fold(ElementModQ::one(), |acc, x| acc * x)
    }
}

impl Serialize for ElementModQ {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.to_bytes()))
    }
}

impl<'de> Deserialize<'de> for ElementModQ {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(de::Error::custom)?;
        ElementModQ::from_bytes(&bytes).map_err(de::Error::custom)
    }
}

// ------- ElementModP ------- //

/// A residue mod p together with the byte width of its group's modulus.
/// Membership in the order-q subgroup is checked by
/// [`GroupContext::is_valid_residue`](crate::group::GroupContext::is_valid_residue).
///
/// Elements serialize as hex of their fixed-width encoding, so a
/// round-trip through JSON or bincode never drops leading zero bytes.
/// Equality and hashing only look at the residue.
#[derive(Clone)]
pub struct ElementModP(pub(crate) BigUint, pub(crate) usize);

impl ElementModP {
    /// The underlying integer.
    pub fn value(&self) -> &BigUint {
        &self.0
    }

    /// Byte width of the encoding, the byte length of p.
    pub fn width(&self) -> usize {
        self.1
    }

    pub(crate) fn to_fixed_bytes(&self) -> Vec<u8> {
        let raw = self.0.to_bytes_be();
        let mut out = vec![0u8; self.1.saturating_sub(raw.len())];
        out.extend_from_slice(&raw);
        out
    }
}

impl PartialEq for ElementModP {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for ElementModP {}

impl Hash for ElementModP {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Debug for ElementModP {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = hex::encode(self.0.to_bytes_be());
        if hex.len() > 16 {
            write!(f, "ElementModP({}..)", &hex[..16])
        } else {
            write!(f, "ElementModP({})", hex)
        }
    }
}

impl Serialize for ElementModP {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.to_fixed_bytes()))
    }
}

impl<'de> Deserialize<'de> for ElementModP {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(de::Error::custom)?;
        Ok(ElementModP(BigUint::from_bytes_be(&bytes), bytes.len()))
    }
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------
