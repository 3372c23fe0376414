use rand::{CryptoRng, Rng};
use serde_derive::{Deserialize, Serialize};

use crate::{
    errors::MixnetError,
    group::{ElementModP, ElementModQ, GroupContext, SCALAR_BYTES},
    keys::{PublicKey, SecretKey},
};

// ------- SecretKey ------- //

/// An ElGamal secret exponent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElGamalSecretKey(pub(crate) ElementModQ);

impl ElGamalSecretKey {
    /// The secret exponent.
    pub fn scalar(&self) -> &ElementModQ {
        &self.0
    }
}

impl SecretKey for ElGamalSecretKey {
    fn key_length() -> usize {
        SCALAR_BYTES
    }

    fn random<R: Rng + CryptoRng>(rng: &mut R) -> Self {
        // zero would make every encryption transparent
        loop {
            let k = ElementModQ::random(rng);
            if !k.is_zero() {
                return ElGamalSecretKey(k);
            }
        }
    }

    fn from_bytes(slice: &[u8]) -> Result<Self, MixnetError> {
        ElementModQ::from_bytes(slice).map(ElGamalSecretKey)
    }

    fn as_bytes(&self) -> Vec<u8> {
        self.0.to_bytes().to_vec()
    }
}

// ------- PublicKey ------- //

/// An ElGamal public key `pk = g^sk`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElGamalPublicKey {
    pub(crate) key: ElementModP,
}

impl ElGamalPublicKey {
    /// Wraps a group element, rejecting non-members.
    pub fn new(group: &GroupContext, key: ElementModP) -> Result<Self, MixnetError> {
        group.check_element(&key)?;
        Ok(ElGamalPublicKey { key })
    }

    /// The key as a group element.
    pub fn key(&self) -> &ElementModP {
        &self.key
    }
}

impl PublicKey for ElGamalPublicKey {
    type K = ElGamalSecretKey;

    fn from_secret_key(group: &GroupContext, k: &Self::K) -> Self {
        ElGamalPublicKey {
            key: group.g_pow_p(&k.0),
        }
    }

    fn key_length(group: &GroupContext) -> usize {
        group.p_bytes()
    }

    fn as_bytes(&self, group: &GroupContext) -> Vec<u8> {
        group.element_to_bytes(&self.key)
    }

    fn from_bytes(group: &GroupContext, slice: &[u8]) -> Result<Self, MixnetError> {
        Ok(ElGamalPublicKey {
            key: group.element_from_bytes(slice)?,
        })
    }

    fn verify_keypair(&self, group: &GroupContext, privkey: &Self::K) -> Result<(), MixnetError> {
        if group.g_pow_p(&privkey.0) == self.key {
            Ok(())
        } else {
            Err(MixnetError::KeyMismatch)
        }
    }
}

// ------- Keypair ------- //

/// A secret key with its public key. Used by tests and the demo binary;
/// real elections generate keys elsewhere.
#[derive(Clone, Debug)]
pub struct ElGamalKeypair {
    /// Secret half.
    pub secret: ElGamalSecretKey,
    /// Public half.
    pub public: ElGamalPublicKey,
}

impl ElGamalKeypair {
    /// Samples a fresh key pair in `group`.
    pub fn random<R: Rng + CryptoRng>(group: &GroupContext, rng: &mut R) -> Self {
        let secret = ElGamalSecretKey::random(rng);
        let public = ElGamalPublicKey::from_secret_key(group, &secret);
        ElGamalKeypair { secret, public }
    }
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn keypair_test() {
        let group = GroupContext::test_group();
        let kp = ElGamalKeypair::random(group, &mut OsRng);
        assert!(kp.public.verify_keypair(group, &kp.secret).is_ok());

        let other = ElGamalSecretKey::random(&mut OsRng);
        assert_eq!(
            kp.public.verify_keypair(group, &other),
            Err(MixnetError::KeyMismatch)
        );
    }

    #[test]
    fn key_bytes_test() {
        let group = GroupContext::test_group();
        let kp = ElGamalKeypair::random(group, &mut OsRng);
        let sk = ElGamalSecretKey::from_bytes(&kp.secret.as_bytes()).unwrap();
        assert_eq!(sk, kp.secret);
        let bytes = kp.public.as_bytes(group);
        assert_eq!(bytes.len(), ElGamalPublicKey::key_length(group));
        assert_eq!(ElGamalPublicKey::from_bytes(group, &bytes).unwrap(), kp.public);
    }
}
