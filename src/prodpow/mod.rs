//! Batched exponentiation: `Π base_i^exp_i mod p`.
//!
//! [`ProdPow`] is the swappable backend seam. [`DirectProdPow`] is the
//! reference semantics; [`WindowedProdPow`] is the fast software backend. An
//! accelerated library plugs in by implementing the trait, or through the
//! byte-level contract of [`prod_pow_bytes`].

use core::fmt;
use core::str::FromStr;
use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde_derive::{Deserialize, Serialize};

use crate::errors::{check_len, MixnetError};

/// Column-wise reduction over ciphertext rows and the parallel engine.
pub mod engine;
/// Indexed fan-out over a rayon pool.
pub mod pool;
/// Fixed-base windowed backend.
pub mod windowed;

pub use self::{
    engine::{prod_column_pow_direct, Engine},
    pool::WorkerPool,
    windowed::WindowedProdPow,
};

/// Bases per precomputed sub-table.
pub const WINDOW_WIDTH: usize = 7;

/// Largest batch handed to a single backend call.
pub const MAX_BATCH_SIZE: usize = 84;

/// Bit length of every exponent.
pub const EXPONENT_BITS: usize = 256;

/// Byte length of every exponent in the byte contract.
pub const EXPONENT_BYTES: usize = EXPONENT_BITS / 8;

/// A backend computing `Π bases[i]^exps[i] mod modulus` for one batch.
///
/// Implementations must be bit-for-bit equal to [`DirectProdPow`].
pub trait ProdPow: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Computes one batch. `bases` and `exps` have equal length.
    fn prod_pow(
        &self,
        bases: &[&BigUint],
        exps: &[&BigUint],
        modulus: &BigUint,
    ) -> Result<BigUint, MixnetError>;
}

/// Reference backend: one `modpow` per pair, then a product.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectProdPow;

impl ProdPow for DirectProdPow {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn prod_pow(
        &self,
        bases: &[&BigUint],
        exps: &[&BigUint],
        modulus: &BigUint,
    ) -> Result<BigUint, MixnetError> {
        check_len("DirectProdPow::prod_pow", bases.len(), exps.len())?;
        check_modulus(modulus)?;
        Ok(bases
            .iter()
            .zip(exps.iter())
            .fold(BigUint::one() % modulus, |acc, (b, e)| {
                (acc * b.modpow(e, modulus)) % modulus
            }))
    }
}

/// Fails with [`MixnetError::InvalidModulus`] on a zero modulus.
pub(crate) fn check_modulus(modulus: &BigUint) -> Result<(), MixnetError> {
    if modulus.is_zero() {
        return Err(MixnetError::InvalidModulus);
    }
    Ok(())
}

/// Splits the input into batches of at most [`MAX_BATCH_SIZE`] and
/// multiplies the partial products.
pub fn prod_pow_batched(
    prodpow: &dyn ProdPow,
    bases: &[&BigUint],
    exps: &[&BigUint],
    modulus: &BigUint,
) -> Result<BigUint, MixnetError> {
    check_len("prod_pow_batched", bases.len(), exps.len())?;
    check_modulus(modulus)?;
    bases
        .chunks(MAX_BATCH_SIZE)
        .zip(exps.chunks(MAX_BATCH_SIZE))
        .try_fold(BigUint::one() % modulus, |acc, (b, e)| {
            Ok((acc * prodpow.prod_pow(b, e, modulus)?) % modulus)
        })
}

/// The accelerator contract over fixed-width byte strings.
///
/// Every base is as wide as `modulus`, every exponent is
/// [`EXPONENT_BYTES`] wide, and the result is as wide as `modulus`.
pub fn prod_pow_bytes(
    prodpow: &dyn ProdPow,
    bases: &[Vec<u8>],
    exps: &[Vec<u8>],
    modulus: &[u8],
) -> Result<Vec<u8>, MixnetError> {
    check_len("prod_pow_bytes", bases.len(), exps.len())?;
    if modulus.is_empty() {
        return Err(MixnetError::EmptyInput("modulus"));
    }
    for b in bases {
        if b.len() != modulus.len() {
            return Err(MixnetError::InvalidEncoding {
                expected: modulus.len(),
                actual: b.len(),
            });
        }
    }
    for e in exps {
        if e.len() != EXPONENT_BYTES {
            return Err(MixnetError::InvalidEncoding {
                expected: EXPONENT_BYTES,
                actual: e.len(),
            });
        }
    }
    let modulus_int = BigUint::from_bytes_be(modulus);
    check_modulus(&modulus_int)?;
    let base_ints: Vec<BigUint> = bases.iter().map(|b| BigUint::from_bytes_be(b)).collect();
    let exp_ints: Vec<BigUint> = exps.iter().map(|e| BigUint::from_bytes_be(e)).collect();
    let base_refs: Vec<&BigUint> = base_ints.iter().collect();
    let exp_refs: Vec<&BigUint> = exp_ints.iter().collect();

    let result = prod_pow_batched(prodpow, &base_refs, &exp_refs, &modulus_int)?;
    let raw = result.to_bytes_be();
    let mut out = vec![0u8; modulus.len().saturating_sub(raw.len())];
    out.extend_from_slice(&raw);
    Ok(out)
}

/// Multiplications the windowed backend performs on one batch:
/// `ntabs * (t + 2^w) + t` with t-bit exponents and `ntabs = ceil(b / w)`.
pub fn expected_multiplies(batch: usize) -> usize {
    let ntabs = (batch + WINDOW_WIDTH - 1) / WINDOW_WIDTH;
    ntabs * (EXPONENT_BITS + (1 << WINDOW_WIDTH)) + EXPONENT_BITS
}

/// Table memory of one windowed batch in kB, `2^w * b / w` elements.
pub fn expected_memory_kb(batch: usize, modulus_bytes: usize) -> usize {
    (1 << WINDOW_WIDTH) * batch * modulus_bytes / WINDOW_WIDTH / 1024
}

/// Built-in backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProdPowAlg {
    /// [`DirectProdPow`]
    Direct,
    /// [`WindowedProdPow`]
    #[default]
    Windowed,
}

impl ProdPowAlg {
    /// Instantiates the backend.
    pub fn build(self) -> Arc<dyn ProdPow> {
        match self {
            ProdPowAlg::Direct => Arc::new(DirectProdPow),
            ProdPowAlg::Windowed => Arc::new(WindowedProdPow),
        }
    }
}

impl fmt::Display for ProdPowAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProdPowAlg::Direct => write!(f, "direct"),
            ProdPowAlg::Windowed => write!(f, "windowed"),
        }
    }
}

impl FromStr for ProdPowAlg {
    type Err = MixnetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "direct" => Ok(ProdPowAlg::Direct),
            "windowed" => Ok(ProdPowAlg::Windowed),
            other => Err(MixnetError::Config(format!(
                "unknown exponentiation backend `{}`",
                other
            ))),
        }
    }
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------
