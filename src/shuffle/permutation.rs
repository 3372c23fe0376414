//! Bijections on `[0, n)`.

use rand::{CryptoRng, Rng};

use crate::errors::MixnetError;

/// A permutation `psi` of `[0, n)` stored with its inverse, so both
/// directions are O(1) lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

impl Permutation {
    /// A uniformly random permutation of `[0, n)` (Fisher-Yates).
    pub fn random<R: Rng + CryptoRng>(n: usize, rng: &mut R) -> Self {
        let mut forward: Vec<usize> = (0..n).collect();
        for i in (1..n).rev() {
            // invariant: elements with index > i have been locked in place.
            forward.swap(i, rng.gen_range(0, i + 1));
        }
        Self::from_forward(forward)
    }

    /// The identity on `[0, n)`.
    pub fn identity(n: usize) -> Self {
        Self::from_forward((0..n).collect())
    }

    /// Wraps `forward` where `psi(i) = forward[i]`, checking it is a bijection.
    pub fn from_vec(forward: Vec<usize>) -> Result<Self, MixnetError> {
        let n = forward.len();
        let mut seen = vec![false; n];
        for &x in &forward {
            if x >= n {
                return Err(MixnetError::InvalidPermutation("index out of range"));
            }
            if seen[x] {
                return Err(MixnetError::InvalidPermutation("repeated index"));
            }
            seen[x] = true;
        }
        Ok(Self::from_forward(forward))
    }

    fn from_forward(forward: Vec<usize>) -> Self {
        let mut inverse = vec![0; forward.len()];
        for (i, &x) in forward.iter().enumerate() {
            inverse[x] = i;
        }
        Permutation { forward, inverse }
    }

    /// `psi(i)`
    pub fn of(&self, i: usize) -> usize {
        self.forward[i]
    }

    /// `psi^-1(i)`
    pub fn inv(&self, i: usize) -> usize {
        self.inverse[i]
    }

    /// Size of the domain.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// True for the permutation of the empty set.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// `psi^-1` as a permutation.
    pub fn inverse(&self) -> Permutation {
        Permutation {
            forward: self.inverse.clone(),
            inverse: self.forward.clone(),
        }
    }

    /// `[psi(0), psi(1), ...]`
    pub fn as_slice(&self) -> &[usize] {
        &self.forward
    }
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------
