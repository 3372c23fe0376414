//! Pedersen commitment to a permutation matrix.

use rand::{CryptoRng, Rng};

use crate::{
    errors::{check_len, MixnetError},
    group::{ElementModQ, GroupContext},
    prodpow::Engine,
    shuffle::{
        permutation::Permutation,
        vectorutil::{VectorP, VectorQ},
    },
};

/// Commitments `c_j = g^{r_j} * h_{pi^-1(j)}` and their nonces, indexed by
/// position j.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PermutationCommitment {
    /// One commitment per position.
    pub commitments: VectorP,
    /// The nonce `r_j` of each commitment.
    pub nonces: VectorQ,
}

impl PermutationCommitment {
    /// Commits to `pi` with fresh nonces.
    pub fn commit<R: Rng + CryptoRng>(
        engine: &Engine,
        group: &GroupContext,
        pi: &Permutation,
        generators: &VectorP,
        rng: &mut R,
    ) -> Result<Self, MixnetError> {
        let nonces = VectorQ::random(pi.len(), rng);
        Self::commit_with(engine, group, pi, generators, nonces)
    }

    /// Commits to `pi` with the supplied nonces.
    pub fn commit_with(
        engine: &Engine,
        group: &GroupContext,
        pi: &Permutation,
        generators: &VectorP,
        nonces: VectorQ,
    ) -> Result<Self, MixnetError> {
        check_len("PermutationCommitment::generators", pi.len(), generators.len())?;
        check_len("PermutationCommitment::nonces", pi.len(), nonces.len())?;
        let commitments = engine.pool().run_indexed(pi.len(), |j| {
            Ok(group.mul_p(&group.g_pow_p(&nonces[j]), &generators[pi.inv(j)]))
        })?;
        Ok(PermutationCommitment {
            commitments: VectorP::new(commitments),
            nonces,
        })
    }

    /// Checks the opening `(pi, nonces)` against the commitments.
    pub fn opens_to(&self, group: &GroupContext, pi: &Permutation, generators: &VectorP) -> bool {
        if pi.len() != self.commitments.len()
            || pi.len() != generators.len()
            || pi.len() != self.nonces.len()
        {
            return false;
        }
        (0..pi.len()).all(|j| {
            self.commitments[j] == group.mul_p(&group.g_pow_p(&self.nonces[j]), &generators[pi.inv(j)])
        })
    }

    /// `Σ r_j`
    pub fn nonce_sum(&self) -> ElementModQ {
        self.nonces.sum()
    }
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::pedersen::MixGenerators;
    use crate::prodpow::{ProdPowAlg, WorkerPool};
    use rand::rngs::OsRng;

    #[test]
    fn commitment_opens_test() {
        let group = GroupContext::test_group();
        let engine = Engine::single_threaded(ProdPowAlg::Windowed);
        let gens = MixGenerators::derive(&engine, group, "perm", None, 9).unwrap();
        let pi = Permutation::random(9, &mut OsRng);
        let pc = PermutationCommitment::commit(&engine, group, &pi, &gens.generators, &mut OsRng)
            .unwrap();
        assert!(pc.opens_to(group, &pi, &gens.generators));

        let other = Permutation::from_vec(pi.as_slice().iter().rev().cloned().collect()).unwrap();
        assert!(!pc.opens_to(group, &other, &gens.generators));
    }

    #[test]
    fn product_hides_permutation_test() {
        // Π c_j = g^{Σ r} * Π h, whatever the permutation
        let group = GroupContext::test_group();
        let engine = Engine::single_threaded(ProdPowAlg::Windowed);
        let gens = MixGenerators::derive(&engine, group, "perm", None, 6).unwrap();
        let pi = Permutation::random(6, &mut OsRng);
        let pc = PermutationCommitment::commit(&engine, group, &pi, &gens.generators, &mut OsRng)
            .unwrap();
        let lhs = pc.commitments.prod(group);
        let rhs = group.mul_p(&group.g_pow_p(&pc.nonce_sum()), &gens.generators.prod(group));
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn parallel_equals_single_test() {
        let group = GroupContext::test_group();
        let single = Engine::single_threaded(ProdPowAlg::Windowed);
        let parallel = Engine::with_prodpow(WorkerPool::new(4).unwrap(), ProdPowAlg::Windowed.build());
        let gens = MixGenerators::derive(&single, group, "perm", None, 40).unwrap();
        let pi = Permutation::random(40, &mut OsRng);
        let nonces = VectorQ::random(40, &mut OsRng);
        let a = PermutationCommitment::commit_with(&single, group, &pi, &gens.generators, nonces.clone())
            .unwrap();
        let b = PermutationCommitment::commit_with(&parallel, group, &pi, &gens.generators, nonces)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn length_checks_test() {
        let group = GroupContext::test_group();
        let engine = Engine::single_threaded(ProdPowAlg::Windowed);
        let gens = MixGenerators::derive(&engine, group, "perm", None, 3).unwrap();
        let pi = Permutation::identity(4);
        assert!(PermutationCommitment::commit(&engine, group, &pi, &gens.generators, &mut OsRng).is_err());
    }
}
