//! Permutation and re-encryption of a row set.

use core::fmt;
use std::time::Instant;

use rand::{CryptoRng, Rng};
use tracing::debug;

use crate::{
    elgamal::{row_width, VectorCiphertext},
    errors::{check_len, MixnetError},
    group::{ElGamalPublicKey, GroupContext},
    prodpow::Engine,
    shuffle::{permutation::Permutation, vectorutil::MatrixQ},
};

const LOG_TARGET: &str = "mixnet::shuffle";

/// The output of a shuffle together with its secret witness.
///
/// Input row i is re-encrypted with nonce row i and lands at output
/// position `psi(i)`, so output j holds input `psi^-1(j)`.
#[derive(Clone)]
pub struct Shuffle {
    /// Permuted and re-encrypted rows.
    pub mixed: Vec<VectorCiphertext>,
    /// Re-encryption nonces, row i belonging to input row i.
    pub nonces: MatrixQ,
    /// The secret permutation.
    pub psi: Permutation,
}

impl Shuffle {
    /// Shuffles `rows` under `pk` with a fresh permutation and fresh nonces.
    #[tracing::instrument(target = LOG_TARGET, skip_all)]
    pub fn shuffle<R: Rng + CryptoRng>(
        engine: &Engine,
        group: &GroupContext,
        rows: &[VectorCiphertext],
        pk: &ElGamalPublicKey,
        rng: &mut R,
    ) -> Result<Self, MixnetError> {
        let width = row_width(rows)?;
        let psi = Permutation::random(rows.len(), rng);
        let nonces = MatrixQ::random(rows.len(), width, rng);
        Self::shuffle_with(engine, group, rows, pk, psi, nonces)
    }

    /// Shuffles `rows` with the supplied permutation and nonces.
    ///
    /// One unit of work per output row; unit j writes only output slot j.
    pub fn shuffle_with(
        engine: &Engine,
        group: &GroupContext,
        rows: &[VectorCiphertext],
        pk: &ElGamalPublicKey,
        psi: Permutation,
        nonces: MatrixQ,
    ) -> Result<Self, MixnetError> {
        let width = row_width(rows)?;
        check_len("Shuffle::permutation", rows.len(), psi.len())?;
        check_len("Shuffle::nonce rows", rows.len(), nonces.nrows())?;
        check_len("Shuffle::nonce columns", width, nonces.ncols())?;

        let start = Instant::now();
        let nonce_rows = nonces.rows();
        let mixed = engine.pool().run_indexed(rows.len(), |j| {
            let i = psi.inv(j);
            rows[i].reencrypt(group, pk, &nonce_rows[i])
        })?;
        debug!(
            target: LOG_TARGET,
            nrows = rows.len(),
            width,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "rows shuffled"
        );
        Ok(Shuffle { mixed, nonces, psi })
    }
}

// The witness stays out of logs.
impl fmt::Debug for Shuffle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shuffle")
            .field("nrows", &self.mixed.len())
            .field("width", &self.nonces.ncols())
            .field("nonces", &"<redacted>")
            .field("psi", &"<redacted>")
            .finish()
    }
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::group::{ElGamalKeypair, ElementModQ};
    use crate::prodpow::{ProdPowAlg, WorkerPool};
    use crate::shuffle::vectorutil::VectorQ;
    use rand::rngs::OsRng;

    // row i encrypts the exponents i * 1000 + k for column k
    fn numbered_rows(
        group: &GroupContext,
        pk: &ElGamalPublicKey,
        nrows: usize,
        width: usize,
    ) -> Vec<VectorCiphertext> {
        (0..nrows)
            .map(|i| {
                let ms: Vec<u64> = (0..width).map(|k| (i * 1000 + k) as u64).collect();
                let rs = VectorQ::random(width, &mut OsRng);
                VectorCiphertext::encrypt(group, pk, &VectorQ::from_u64s(&ms), &rs).unwrap()
            })
            .collect()
    }

    #[test]
    fn reencryption_is_correct_test() {
        let group = GroupContext::test_group();
        let kp = ElGamalKeypair::random(group, &mut OsRng);
        let engine = Engine::single_threaded(ProdPowAlg::Windowed);
        let rows = numbered_rows(group, &kp.public, 6, 3);
        let shuffle = Shuffle::shuffle(&engine, group, &rows, &kp.public, &mut OsRng).unwrap();

        for j in 0..rows.len() {
            let i = shuffle.psi.inv(j);
            for k in 0..3 {
                let out = &shuffle.mixed[j][k];
                assert_ne!(out, &rows[i][k]);
                assert_eq!(
                    out.decrypt(group, &kp.secret),
                    rows[i][k].decrypt(group, &kp.secret)
                );
            }
        }
        // the small exponents are also recoverable directly
        let first = &shuffle.mixed[shuffle.psi.of(2)][1];
        assert_eq!(first.decrypt_exponent(group, &kp.secret, 3000), Some(2001));
    }

    #[test]
    fn nonces_belong_to_input_rows_test() {
        let group = GroupContext::test_group();
        let kp = ElGamalKeypair::random(group, &mut OsRng);
        let engine = Engine::single_threaded(ProdPowAlg::Direct);
        let rows = numbered_rows(group, &kp.public, 4, 2);
        let shuffle = Shuffle::shuffle(&engine, group, &rows, &kp.public, &mut OsRng).unwrap();
        for (i, nonce_row) in shuffle.nonces.rows().iter().enumerate() {
            let expected = rows[i].reencrypt(group, &kp.public, nonce_row).unwrap();
            assert_eq!(shuffle.mixed[shuffle.psi.of(i)], expected);
        }
    }

    #[test]
    fn parallel_equals_single_test() {
        let group = GroupContext::test_group();
        let kp = ElGamalKeypair::random(group, &mut OsRng);
        let single = Engine::single_threaded(ProdPowAlg::Windowed);
        let parallel = Engine::with_prodpow(WorkerPool::new(4).unwrap(), ProdPowAlg::Windowed.build());
        for (nrows, width) in [
            (1usize, 1usize), (7, 10), (10, 100), (100, 1), (1000, 1), (3, 300),
        ] {
            let rows = numbered_rows(group, &kp.public, nrows, width);
            let psi = Permutation::random(nrows, &mut OsRng);
            let nonces = MatrixQ::random(nrows, width, &mut OsRng);
            let a = Shuffle::shuffle_with(&single, group, &rows, &kp.public, psi.clone(), nonces.clone())
                .unwrap();
            let b = Shuffle::shuffle_with(&parallel, group, &rows, &kp.public, psi, nonces).unwrap();
            assert_eq!(a.mixed, b.mixed, "{}x{}", nrows, width);
        }
    }

    #[test]
    fn single_row_test() {
        let group = GroupContext::test_group();
        let kp = ElGamalKeypair::random(group, &mut OsRng);
        let engine = Engine::single_threaded(ProdPowAlg::Windowed);
        let rows = numbered_rows(group, &kp.public, 1, 1);
        let shuffle = Shuffle::shuffle(&engine, group, &rows, &kp.public, &mut OsRng).unwrap();
        assert_eq!(shuffle.psi, Permutation::identity(1));
        assert_eq!(
            shuffle.mixed[0][0].decrypt(group, &kp.secret),
            group.g_pow_p(&ElementModQ::zero())
        );
    }

    #[test]
    fn shape_errors_test() {
        let group = GroupContext::test_group();
        let kp = ElGamalKeypair::random(group, &mut OsRng);
        let engine = Engine::single_threaded(ProdPowAlg::Windowed);
        let rows = numbered_rows(group, &kp.public, 3, 2);
        assert_eq!(
            Shuffle::shuffle(&engine, group, &[], &kp.public, &mut OsRng).unwrap_err(),
            MixnetError::EmptyInput("row set")
        );
        let wrong_nonces = MatrixQ::random(3, 1, &mut OsRng);
        assert!(Shuffle::shuffle_with(
            &engine,
            group,
            &rows,
            &kp.public,
            Permutation::identity(3),
            wrong_nonces
        )
        .is_err());
        let mut ragged = rows.clone();
        ragged[1] = numbered_rows(group, &kp.public, 1, 1).remove(0);
        assert!(Shuffle::shuffle(&engine, group, &ragged, &kp.public, &mut OsRng).is_err());
    }

    #[test]
    fn debug_hides_witness_test() {
        let group = GroupContext::test_group();
        let kp = ElGamalKeypair::random(group, &mut OsRng);
        let engine = Engine::single_threaded(ProdPowAlg::Windowed);
        let rows = numbered_rows(group, &kp.public, 5, 2);
        let shuffle = Shuffle::shuffle(&engine, group, &rows, &kp.public, &mut OsRng).unwrap();

        let printed = format!("{:?}", shuffle);
        assert!(printed.contains("nrows: 5"));
        assert!(printed.contains("width: 2"));
        let nonce = format!("{:?}", shuffle.nonces.get(0, 0).unwrap());
        assert!(!printed.contains(&nonce));
        assert!(!printed.contains(&format!("{:?}", shuffle.psi)));
    }
}
