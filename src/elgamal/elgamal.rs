use serde_derive::{Deserialize, Serialize};

use crate::{
    errors::MixnetError,
    group::{ElGamalPublicKey, ElGamalSecretKey, ElementModP, ElementModQ, GroupContext},
};

/// An exponential ElGamal ciphertext `(pad, data) = (g^r, g^m * pk^r)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext {
    pub(crate) pad: ElementModP,
    pub(crate) data: ElementModP,
}

impl Ciphertext {
    /// Wraps a `(pad, data)` pair.
    pub fn new(pad: ElementModP, data: ElementModP) -> Self {
        Ciphertext { pad, data }
    }

    /// The `g^r` component.
    pub fn pad(&self) -> &ElementModP {
        &self.pad
    }

    /// The `g^m * pk^r` component.
    pub fn data(&self) -> &ElementModP {
        &self.data
    }

    /// Encrypts the exponent `m` under `pk` with nonce `r`.
    pub fn encrypt(
        group: &GroupContext,
        pk: &ElGamalPublicKey,
        m: &ElementModQ,
        r: &ElementModQ,
    ) -> Ciphertext {
        let pad = group.g_pow_p(r);
        let data = group.mul_p(&group.g_pow_p(m), &group.pow_p(&pk.key, r));
        Ciphertext { pad, data }
    }

    /// An encryption of zero, `(g^r, pk^r)`.
    pub fn zero_encrypt(group: &GroupContext, pk: &ElGamalPublicKey, r: &ElementModQ) -> Ciphertext {
        Ciphertext {
            pad: group.g_pow_p(r),
            data: group.pow_p(&pk.key, r),
        }
    }

    /// Recovers `g^m = data / pad^sk`.
    pub fn decrypt(&self, group: &GroupContext, sk: &ElGamalSecretKey) -> ElementModP {
        let shared = group.pow_p(&self.pad, &sk.0);
        group.div_p(&self.data, &shared)
    }

    /// Recovers a small exponent `m <= max` by linear search.
    pub fn decrypt_exponent(
        &self,
        group: &GroupContext,
        sk: &ElGamalSecretKey,
        max: u64,
    ) -> Option<u64> {
        let target = self.decrypt(group, sk);
        let mut acc = group.one();
        for m in 0..=max {
            if acc == target {
                return Some(m);
            }
            acc = group.mul_p(&acc, group.g());
        }
        None
    }

    /// `(pad * g^r, data * pk^r)`: same plaintext, fresh randomness.
    pub fn reencrypt(&self, group: &GroupContext, pk: &ElGamalPublicKey, r: &ElementModQ) -> Ciphertext {
        self.mul(group, &Ciphertext::zero_encrypt(group, pk, r))
    }

    /// Component-wise product; adds the plaintext exponents.
    pub fn mul(&self, group: &GroupContext, other: &Ciphertext) -> Ciphertext {
        Ciphertext {
            pad: group.mul_p(&self.pad, &other.pad),
            data: group.mul_p(&self.data, &other.data),
        }
    }

    /// Component-wise power; scales the plaintext exponent.
    pub fn pow(&self, group: &GroupContext, k: &ElementModQ) -> Ciphertext {
        Ciphertext {
            pad: group.pow_p(&self.pad, k),
            data: group.pow_p(&self.data, k),
        }
    }

    /// Fails unless both components lie in the subgroup.
    pub fn validate(&self, group: &GroupContext) -> Result<(), MixnetError> {
        group.check_element(&self.pad)?;
        group.check_element(&self.data)
    }
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------
