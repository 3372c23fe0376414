use core::ops::Index;

use serde_derive::{Deserialize, Serialize};

use crate::{
    elgamal::Ciphertext,
    errors::{check_len, MixnetError},
    group::{ElGamalPublicKey, ElementModQ, GroupContext},
    shuffle::vectorutil::VectorQ,
};

/// A row: a fixed-width sequence of ciphertexts, e.g. one ballot.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorCiphertext(pub(crate) Vec<Ciphertext>);

impl VectorCiphertext {
    /// Wraps `cts`.
    pub fn new(cts: Vec<Ciphertext>) -> Self {
        VectorCiphertext(cts)
    }

    /// Encrypts every exponent of `ms` with the paired nonce of `rs`.
    pub fn encrypt(
        group: &GroupContext,
        pk: &ElGamalPublicKey,
        ms: &VectorQ,
        rs: &VectorQ,
    ) -> Result<Self, MixnetError> {
        check_len("VectorCiphertext::encrypt", ms.len(), rs.len())?;
        Ok(VectorCiphertext(
            ms.iter()
                .zip(rs.iter())
                .map(|(m, r)| Ciphertext::encrypt(group, pk, m, r))
                .collect(),
        ))
    }

    /// Number of ciphertexts W.
    pub fn width(&self) -> usize {
        self.0.len()
    }

    /// Ciphertexts as a slice.
    pub fn as_slice(&self) -> &[Ciphertext] {
        &self.0
    }

    /// Iterator over the ciphertexts.
    pub fn iter(&self) -> core::slice::Iter<'_, Ciphertext> {
        self.0.iter()
    }

    /// Re-encrypts column k with `nonces[k]`.
    pub fn reencrypt(
        &self,
        group: &GroupContext,
        pk: &ElGamalPublicKey,
        nonces: &VectorQ,
    ) -> Result<Self, MixnetError> {
        check_len("VectorCiphertext::reencrypt", self.width(), nonces.len())?;
        Ok(VectorCiphertext(
            self.0
                .iter()
                .zip(nonces.iter())
                .map(|(ct, r)| ct.reencrypt(group, pk, r))
                .collect(),
        ))
    }

    /// Component-wise product of two rows.
    pub fn mul(&self, group: &GroupContext, other: &VectorCiphertext) -> Result<Self, MixnetError> {
        check_len("VectorCiphertext::mul", self.width(), other.width())?;
        Ok(VectorCiphertext(
            self.0
                .iter()
                .zip(other.0.iter())
                .map(|(a, b)| a.mul(group, b))
                .collect(),
        ))
    }

    /// Every ciphertext raised to `k`.
    pub fn pow(&self, group: &GroupContext, k: &ElementModQ) -> Self {
        VectorCiphertext(self.0.iter().map(|ct| ct.pow(group, k)).collect())
    }

    /// Encryptions of zero under the negated nonces: `(g^-phi_k, pk^-phi_k)`.
    pub fn zero_encrypt_neg(group: &GroupContext, pk: &ElGamalPublicKey, phi: &VectorQ) -> Self {
        VectorCiphertext(
            phi.iter()
                .map(|r| Ciphertext::zero_encrypt(group, pk, &-r))
                .collect(),
        )
    }

    /// Fails unless every component lies in the subgroup.
    pub fn validate(&self, group: &GroupContext) -> Result<(), MixnetError> {
        self.0.iter().try_for_each(|ct| ct.validate(group))
    }
}

impl Index<usize> for VectorCiphertext {
    type Output = Ciphertext;
    fn index(&self, i: usize) -> &Ciphertext {
        &self.0[i]
    }
}

/// Width of a non-empty row set whose rows all share one width.
pub fn row_width(rows: &[VectorCiphertext]) -> Result<usize, MixnetError> {
    let first = rows.first().ok_or(MixnetError::EmptyInput("row set"))?;
    let width = first.width();
    if width == 0 {
        return Err(MixnetError::EmptyInput("row"));
    }
    for (row, r) in rows.iter().enumerate() {
        if r.width() != width {
            return Err(MixnetError::InvalidWidth {
                row,
                expected: width,
                actual: r.width(),
            });
        }
    }
    Ok(width)
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::group::ElGamalKeypair;
    use rand::rngs::OsRng;

    #[test]
    fn reencrypt_row_test() {
        let group = GroupContext::test_group();
        let kp = ElGamalKeypair::random(group, &mut OsRng);
        let ms = VectorQ::from_u64s(&[1, 2, 3]);
        let row = VectorCiphertext::encrypt(group, &kp.public, &ms, &VectorQ::random(3, &mut OsRng))
            .unwrap();
        let re = row
            .reencrypt(group, &kp.public, &VectorQ::random(3, &mut OsRng))
            .unwrap();
        for (k, ct) in re.iter().enumerate() {
            assert_eq!(ct.decrypt_exponent(group, &kp.secret, 5), Some(k as u64 + 1));
        }
        assert!(row
            .reencrypt(group, &kp.public, &VectorQ::random(2, &mut OsRng))
            .is_err());
    }

    #[test]
    fn zero_encrypt_neg_cancels_test() {
        let group = GroupContext::test_group();
        let kp = ElGamalKeypair::random(group, &mut OsRng);
        let phi = VectorQ::random(2, &mut OsRng);
        let neg = VectorCiphertext::zero_encrypt_neg(group, &kp.public, &phi);
        let pos = VectorCiphertext::new(
            phi.iter()
                .map(|r| Ciphertext::zero_encrypt(group, &kp.public, r))
                .collect(),
        );
        let one = Ciphertext::new(group.one(), group.one());
        let product = neg.mul(group, &pos).unwrap();
        assert!(product.iter().all(|ct| *ct == one));
    }

    #[test]
    fn row_width_test() {
        let group = GroupContext::test_group();
        let ct = Ciphertext::new(group.g().clone(), group.g().clone());
        let a = VectorCiphertext::new(vec![ct.clone(), ct.clone()]);
        let b = VectorCiphertext::new(vec![ct]);
        assert_eq!(row_width(&[a.clone(), a.clone()]), Ok(2));
        assert_eq!(
            row_width(&[a, b]),
            Err(MixnetError::InvalidWidth {
                row: 1,
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(row_width(&[]), Err(MixnetError::EmptyInput("row set")));
    }
}
