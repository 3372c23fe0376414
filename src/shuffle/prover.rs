//! Prover of the batched Terelius-Wikström proof of shuffle.
//!
//! Notation: `psi` is the shuffle permutation, `e` the batching vector and
//! `ipe = invert(e, psi)`, so `ipe_j` is the weight of the input row that
//! landed at output j. The bridging commitments are the commitment chain
//! over `ipe` from `h0` with nonces `b`, and their running exponents are
//! `x` (with `d = x_{N-1}`) and the aggregated product `y`.

#![allow(non_snake_case)]

use std::time::Instant;

use merlin::Transcript;
use rand::{CryptoRng, Rng};
use tracing::debug;

use crate::{
    elgamal::{row_width, VectorCiphertext},
    errors::{check_len, MixnetError},
    group::{ElGamalPublicKey, ElementModQ, GroupContext},
    pedersen::{chain_recursive, running_exponents, CommitmentChain, MixGenerators, PermutationCommitment},
    prodpow::Engine,
    shuffle::{
        permutation::Permutation,
        proof::{batching_vector, reply_challenge, statement_transcript, ProofCommitment, ProofOfShuffle, ProofReply},
        shuffle::Shuffle,
        vectorutil::{MatrixQ, VectorP, VectorQ},
    },
};

const LOG_TARGET: &str = "mixnet::shuffle::prover";

/// Everything the prover knows: the statement and the shuffle witness.
pub struct ShuffleProver<'a> {
    engine: &'a Engine,
    group: &'a GroupContext,
    mix_name: &'a str,
    pk: &'a ElGamalPublicKey,
    rows: &'a [VectorCiphertext],
    mixed: &'a [VectorCiphertext],
    psi: &'a Permutation,
    nonces: &'a MatrixQ,
}

/// Prover state between the two rounds. Holds secrets; never serialized.
pub struct ProverState {
    transcript: Transcript,
    commitment: ProofCommitment,
    pnonces: VectorQ,
    ipe: VectorQ,
    b: VectorQ,
    alpha: ElementModQ,
    beta: VectorQ,
    gamma: ElementModQ,
    delta: ElementModQ,
    epsilon: VectorQ,
    phi: VectorQ,
}

impl ProverState {
    /// The first-round message.
    pub fn commitment(&self) -> &ProofCommitment {
        &self.commitment
    }

    /// Fiat-Shamir challenge `v` over the statement and the commitment.
    pub fn challenge(&self, group: &GroupContext) -> ElementModQ {
        let mut t = self.transcript.clone();
        reply_challenge(&mut t, group, &self.commitment)
    }
}

impl<'a> ShuffleProver<'a> {
    /// Checks the shapes of the statement and witness.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        engine: &'a Engine,
        group: &'a GroupContext,
        mix_name: &'a str,
        pk: &'a ElGamalPublicKey,
        rows: &'a [VectorCiphertext],
        mixed: &'a [VectorCiphertext],
        psi: &'a Permutation,
        nonces: &'a MatrixQ,
    ) -> Result<Self, MixnetError> {
        let width = row_width(rows)?;
        check_len("ShuffleProver::mixed rows", rows.len(), mixed.len())?;
        check_len("ShuffleProver::mixed width", width, row_width(mixed)?)?;
        check_len("ShuffleProver::permutation", rows.len(), psi.len())?;
        check_len("ShuffleProver::nonce rows", rows.len(), nonces.nrows())?;
        check_len("ShuffleProver::nonce columns", width, nonces.ncols())?;
        Ok(ShuffleProver {
            engine,
            group,
            mix_name,
            pk,
            rows,
            mixed,
            psi,
            nonces,
        })
    }

    /// A prover for the output of [`Shuffle::shuffle`].
    pub fn from_shuffle(
        engine: &'a Engine,
        group: &'a GroupContext,
        mix_name: &'a str,
        pk: &'a ElGamalPublicKey,
        rows: &'a [VectorCiphertext],
        shuffle: &'a Shuffle,
    ) -> Result<Self, MixnetError> {
        Self::new(
            engine,
            group,
            mix_name,
            pk,
            rows,
            &shuffle.mixed,
            &shuffle.psi,
            &shuffle.nonces,
        )
    }

    /// Runs both rounds and assembles the proof.
    pub fn prove<R: Rng + CryptoRng>(&self, rng: &mut R) -> Result<ProofOfShuffle, MixnetError> {
        let start = Instant::now();
        let state = self.commit(rng)?;
        let v = state.challenge(self.group);
        let reply = self.reply(&state, &v)?;
        debug!(
            target: LOG_TARGET,
            nrows = self.rows.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "proof of shuffle created"
        );
        Ok(ProofOfShuffle {
            mix_name: self.mix_name.to_string(),
            commitment: state.commitment,
            reply,
        })
    }

    /// Round 1: permutation commitment, batching vector, bridging
    /// commitments and the proof commitments.
    #[tracing::instrument(target = LOG_TARGET, skip_all)]
    pub fn commit<R: Rng + CryptoRng>(&self, rng: &mut R) -> Result<ProverState, MixnetError> {
        let (engine, group) = (self.engine, self.group);
        let n = self.rows.len();
        let width = self.nonces.ncols();

        let gens = MixGenerators::derive(engine, group, self.mix_name, None, n)?;
        // commitment j carries h_{psi(j)}
        let pc = PermutationCommitment::commit(engine, group, &self.psi.inverse(), &gens.generators, rng)?;

        let mut transcript = statement_transcript(
            group,
            self.mix_name,
            &gens,
            &pc.commitments,
            self.pk,
            self.rows,
            self.mixed,
        );
        let e = batching_vector(&mut transcript, n);
        let ipe = e.invert(self.psi)?;

        // bridging commitments
        let b = VectorQ::random(n, rng);
        let chain = CommitmentChain::build_with(engine, group, &gens.h0, &ipe, b.clone())?;
        debug_assert!(
            chain_recursive(group, &gens.h0, &ipe, &b).map_or(false, |B| B == chain.commitments),
            "bridging commitments disagree with their recursive form"
        );
        let (x, y) = running_exponents(&ipe, &b)?;
        let d = x.as_slice().last().cloned().ok_or(MixnetError::EmptyInput("rows"))?;

        let alpha = ElementModQ::random(rng);
        let beta = VectorQ::random(n, rng);
        let gamma = ElementModQ::random(rng);
        let delta = ElementModQ::random(rng);
        let epsilon = VectorQ::random(n, rng);
        let phi = VectorQ::random(width, rng);

        // A' = g^alpha * Π h_i^{epsilon_i}
        let h_eps = engine.prod_pow(group, &gens.generators, &epsilon)?;
        let A_p = group.mul_p(&group.g_pow_p(&alpha), &h_eps);

        // B'_i = g^{beta_i} * B_{i-1}^{epsilon_i} with B_{-1} = h0, in closed form
        // g^{beta_i + x_{i-1} epsilon_i} * h0^{y_{i-1} epsilon_i}
        let xp = x.shift_push(ElementModQ::zero());
        let yp = y.shift_push(ElementModQ::one());
        let B_p = engine.pool().run_indexed(n, |i| {
            let g_exp = &beta[i] + &(&xp[i] * &epsilon[i]);
            let h_exp = &yp[i] * &epsilon[i];
            Ok(group.mul_p(&group.g_pow_p(&g_exp), &group.pow_p(&gens.h0, &h_exp)))
        })?;
        let B_p = VectorP::new(B_p);
        debug_assert!(
            (0..n).all(|i| {
                let prev = if i == 0 { &gens.h0 } else { &chain.commitments[i - 1] };
                B_p[i] == group.mul_p(&group.g_pow_p(&beta[i]), &group.pow_p(prev, &epsilon[i]))
            }),
            "proof commitments B' disagree with their recursive form"
        );

        let C_p = group.g_pow_p(&gamma);
        let D_p = group.g_pow_p(&delta);

        // F' = Enc(0; -phi) * Π mixed_j^{epsilon_j}
        let mixed_eps = engine.prod_column_pow(group, self.mixed, &epsilon)?;
        let F_p = VectorCiphertext::zero_encrypt_neg(group, self.pk, &phi).mul(group, &mixed_eps)?;

        let commitment = ProofCommitment {
            u: pc.commitments,
            d,
            e,
            B: chain.commitments,
            A_p,
            B_p,
            C_p,
            D_p,
            F_p,
        };
        Ok(ProverState {
            transcript,
            commitment,
            pnonces: pc.nonces,
            ipe,
            b,
            alpha,
            beta,
            gamma,
            delta,
            epsilon,
            phi,
        })
    }

    /// Round 2: the replies to challenge `v`.
    #[tracing::instrument(target = LOG_TARGET, skip_all)]
    pub fn reply(&self, state: &ProverState, v: &ElementModQ) -> Result<ProofReply, MixnetError> {
        let e = &state.commitment.e;
        // a = <r, e> over commitment positions, equal to <invert(r, psi), ipe>
        let a = state.pnonces.inner_product(e)?;
        let c = state.pnonces.sum();
        let d = &state.commitment.d;
        let f = self.nonces.column_inner_product(e)?;

        Ok(ProofReply {
            k_A: &(&a * v) + &state.alpha,
            k_B: state.b.scale_add(v, &state.beta)?,
            k_C: &(&c * v) + &state.gamma,
            k_D: &(d * v) + &state.delta,
            k_E: state.ipe.scale_add(v, &state.epsilon)?,
            k_F: f.scale_add(v, &state.phi)?,
        })
    }
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::group::ElGamalKeypair;
    use crate::prodpow::{ProdPowAlg, WorkerPool};
    use rand::rngs::{OsRng, StdRng};
    use rand::SeedableRng;

    fn random_rows(group: &GroupContext, pk: &ElGamalPublicKey, n: usize, w: usize) -> Vec<VectorCiphertext> {
        (0..n)
            .map(|_| {
                let ms = VectorQ::random(w, &mut OsRng);
                let rs = VectorQ::random(w, &mut OsRng);
                VectorCiphertext::encrypt(group, pk, &ms, &rs).unwrap()
            })
            .collect()
    }

    #[test]
    fn commit_parallel_equals_single_test() {
        let group = GroupContext::test_group();
        let kp = ElGamalKeypair::random(group, &mut OsRng);
        let single = Engine::single_threaded(ProdPowAlg::Direct);
        let parallel = Engine::with_prodpow(WorkerPool::new(4).unwrap(), ProdPowAlg::Windowed.build());
        for (n, w) in [
            (1usize, 1usize), (7, 10), (7, 300), (100, 1), (100, 100), (1000, 1),
        ] {
            let rows = random_rows(group, &kp.public, n, w);
            let shuffle = Shuffle::shuffle(&single, group, &rows, &kp.public, &mut OsRng).unwrap();
            let commit_with = |engine: &Engine| {
                ShuffleProver::from_shuffle(engine, group, "mix", &kp.public, &rows, &shuffle)
                    .unwrap()
                    .commit(&mut StdRng::seed_from_u64(42))
                    .unwrap()
                    .commitment
            };
            assert_eq!(commit_with(&single), commit_with(&parallel), "{}x{}", n, w);
        }
    }

    #[test]
    fn bridging_commitments_open_test() {
        // D = B_{N-1} / h0^{Π e} = g^d
        let group = GroupContext::test_group();
        let kp = ElGamalKeypair::random(group, &mut OsRng);
        let engine = Engine::single_threaded(ProdPowAlg::Windowed);
        let rows = random_rows(group, &kp.public, 5, 2);
        let shuffle = Shuffle::shuffle(&engine, group, &rows, &kp.public, &mut OsRng).unwrap();
        let prover = ShuffleProver::from_shuffle(&engine, group, "mix", &kp.public, &rows, &shuffle).unwrap();
        let state = prover.commit(&mut OsRng).unwrap();
        let c = state.commitment();
        let gens = MixGenerators::derive(&engine, group, "mix", None, 5).unwrap();
        let D = group.div_p(&c.B[4], &group.pow_p(&gens.h0, &c.e.product()));
        assert_eq!(D, group.g_pow_p(&c.d));
        assert_eq!(state.ipe, c.e.invert(&shuffle.psi).unwrap());
    }

    #[test]
    fn permutation_commitment_batches_to_ipe_test() {
        // Π u_j^{e_j} = g^a * Π h_i^{ipe_i}
        let group = GroupContext::test_group();
        let kp = ElGamalKeypair::random(group, &mut OsRng);
        let engine = Engine::single_threaded(ProdPowAlg::Windowed);
        let rows = random_rows(group, &kp.public, 6, 1);
        let shuffle = Shuffle::shuffle(&engine, group, &rows, &kp.public, &mut OsRng).unwrap();
        let prover = ShuffleProver::from_shuffle(&engine, group, "mix", &kp.public, &rows, &shuffle).unwrap();
        let state = prover.commit(&mut OsRng).unwrap();
        let c = state.commitment();
        let gens = MixGenerators::derive(&engine, group, "mix", None, 6).unwrap();

        let lhs = engine.prod_pow(group, &c.u, &c.e).unwrap();
        let a = state.pnonces.inner_product(&c.e).unwrap();
        let h_ipe = engine.prod_pow(group, &gens.generators, &state.ipe).unwrap();
        assert_eq!(lhs, group.mul_p(&group.g_pow_p(&a), &h_ipe));
        let permuted = state.pnonces.invert(&shuffle.psi).unwrap();
        assert_eq!(a, permuted.inner_product(&state.ipe).unwrap());
    }

    #[test]
    fn mismatched_witness_is_rejected_test() {
        let group = GroupContext::test_group();
        let kp = ElGamalKeypair::random(group, &mut OsRng);
        let engine = Engine::single_threaded(ProdPowAlg::Windowed);
        let rows = random_rows(group, &kp.public, 3, 2);
        let shuffle = Shuffle::shuffle(&engine, group, &rows, &kp.public, &mut OsRng).unwrap();
        let short_psi = Permutation::identity(2);
        assert!(ShuffleProver::new(
            &engine,
            group,
            "mix",
            &kp.public,
            &rows,
            &shuffle.mixed,
            &short_psi,
            &shuffle.nonces
        )
        .is_err());
        assert!(ShuffleProver::new(
            &engine,
            group,
            "mix",
            &kp.public,
            &rows,
            &shuffle.mixed[..2],
            &shuffle.psi,
            &shuffle.nonces
        )
        .is_err());
    }
}
