use rand::{CryptoRng, Rng};

use crate::errors::MixnetError;
use crate::group::GroupContext;

/// A secret exponent.
pub trait SecretKey: Sized {
    /// Byte length of the encoded key.
    fn key_length() -> usize;

    /// Samples a fresh key.
    fn random<R: Rng + CryptoRng>(rng: &mut R) -> Self;

    /// Decodes a canonical key encoding.
    fn from_bytes(slice: &[u8]) -> Result<Self, MixnetError>;

    /// Canonical encoding.
    fn as_bytes(&self) -> Vec<u8>;
}

/// A public group element derived from a [`SecretKey`].
pub trait PublicKey: Sized {
    /// Matching secret key type.
    type K: SecretKey;

    /// Derives the public key of `k` in `group`.
    fn from_secret_key(group: &GroupContext, k: &Self::K) -> Self;

    /// Byte length of the encoded key in `group`.
    fn key_length(group: &GroupContext) -> usize;

    /// Fixed-width encoding.
    fn as_bytes(&self, group: &GroupContext) -> Vec<u8>;

    /// Decodes a key and checks that it lies in the subgroup.
    fn from_bytes(group: &GroupContext, slice: &[u8]) -> Result<Self, MixnetError>;

    /// Fails unless `self` is the public key of `privkey`.
    fn verify_keypair(&self, group: &GroupContext, privkey: &Self::K) -> Result<(), MixnetError>;
}
