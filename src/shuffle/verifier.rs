//! Verifier of the batched proof of shuffle.

#![allow(non_snake_case)]

use std::time::Instant;

use tracing::{debug, warn};

use crate::{
    elgamal::{row_width, VectorCiphertext},
    errors::{check_len, MixnetError},
    group::{ElGamalPublicKey, ElementModP, ElementModQ, GroupContext},
    pedersen::MixGenerators,
    prodpow::Engine,
    shuffle::proof::{batching_vector, reply_challenge, statement_transcript, ProofOfShuffle},
};

const LOG_TARGET: &str = "mixnet::shuffle::verifier";

/// The public statement of a shuffle: input rows, mixed rows and key.
pub struct ShuffleVerifier<'a> {
    engine: &'a Engine,
    group: &'a GroupContext,
    pk: &'a ElGamalPublicKey,
    rows: &'a [VectorCiphertext],
    mixed: &'a [VectorCiphertext],
    width: usize,
}

impl<'a> ShuffleVerifier<'a> {
    /// Checks the shapes of both row sets and the group membership of every
    /// element in them and in the key.
    pub fn new(
        engine: &'a Engine,
        group: &'a GroupContext,
        pk: &'a ElGamalPublicKey,
        rows: &'a [VectorCiphertext],
        mixed: &'a [VectorCiphertext],
    ) -> Result<Self, MixnetError> {
        let width = row_width(rows)?;
        check_len("ShuffleVerifier::mixed rows", rows.len(), mixed.len())?;
        check_len("ShuffleVerifier::mixed width", width, row_width(mixed)?)?;
        group.check_element(pk.key())?;
        engine.pool().run_indexed(rows.len(), |i| {
            rows[i].validate(group)?;
            mixed[i].validate(group)
        })?;
        Ok(ShuffleVerifier {
            engine,
            group,
            pk,
            rows,
            mixed,
            width,
        })
    }

    /// Verifies `proof` against the statement.
    ///
    /// Malformed proofs are errors; a well-formed proof whose equations do
    /// not hold gives `Ok(false)`.
    #[tracing::instrument(target = LOG_TARGET, skip_all)]
    pub fn verify(&self, proof: &ProofOfShuffle) -> Result<bool, MixnetError> {
        let (engine, group) = (self.engine, self.group);
        let n = self.rows.len();
        proof.validate(group, n, self.width)?;
        let start = Instant::now();
        let c = &proof.commitment;
        let r = &proof.reply;

        let gens = MixGenerators::derive(engine, group, &proof.mix_name, None, n)?;
        let mut transcript = statement_transcript(
            group,
            &proof.mix_name,
            &gens,
            &c.u,
            self.pk,
            self.rows,
            self.mixed,
        );
        let e = batching_vector(&mut transcript, n);
        if e != c.e {
            warn!(target: LOG_TARGET, "batching vector does not match the statement");
            return Ok(false);
        }
        let v = reply_challenge(&mut transcript, group, c);

        // A = Π u_j^{e_j}, C = Π u / Π h, D = B_{N-1} / h0^{Π e}
        let A = engine.prod_pow(group, &c.u, &e)?;
        let C = group.div_p(&c.u.prod(group), &gens.generators.prod(group));
        let D = group.div_p(&c.B[n - 1], &group.pow_p(&gens.h0, &e.product()));

        let lhs = group.mul_p(&group.pow_p(&A, &v), &c.A_p);
        let rhs = group.mul_p(
            &group.g_pow_p(&r.k_A),
            &engine.prod_pow(group, &gens.generators, &r.k_E)?,
        );
        if lhs != rhs {
            warn!(target: LOG_TARGET, "permutation commitment equation failed");
            return Ok(false);
        }

        let bridges = engine.pool().run_indexed(n, |i| {
            let prev = if i == 0 { &gens.h0 } else { &c.B[i - 1] };
            let lhs = group.mul_p(&group.pow_p(&c.B[i], &v), &c.B_p[i]);
            let rhs = group.mul_p(&group.g_pow_p(&r.k_B[i]), &group.pow_p(prev, &r.k_E[i]));
            Ok(lhs == rhs)
        })?;
        if let Some(i) = bridges.iter().position(|ok| !ok) {
            warn!(target: LOG_TARGET, row = i, "bridging commitment equation failed");
            return Ok(false);
        }

        if !check_scalar_commitment(group, &C, &v, &c.C_p, &r.k_C) {
            warn!(target: LOG_TARGET, "permutation commitment sum equation failed");
            return Ok(false);
        }
        if !check_scalar_commitment(group, &D, &v, &c.D_p, &r.k_D) {
            warn!(target: LOG_TARGET, "bridging commitment product equation failed");
            return Ok(false);
        }

        // F^v * F' == Enc(0; -k_F) * Π mixed_j^{k_E,j}
        let F = engine.prod_column_pow(group, self.rows, &e)?;
        let lhs = F.pow(group, &v).mul(group, &c.F_p)?;
        let rhs = VectorCiphertext::zero_encrypt_neg(group, self.pk, &r.k_F)
            .mul(group, &engine.prod_column_pow(group, self.mixed, &r.k_E)?)?;
        if lhs != rhs {
            warn!(target: LOG_TARGET, "re-encryption equation failed");
            return Ok(false);
        }

        debug!(
            target: LOG_TARGET,
            nrows = n,
            width = self.width,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "proof of shuffle verified"
        );
        Ok(true)
    }
}

// X^v * X' == g^k
fn check_scalar_commitment(
    group: &GroupContext,
    x: &ElementModP,
    v: &ElementModQ,
    x_p: &ElementModP,
    k: &ElementModQ,
) -> bool {
    group.mul_p(&group.pow_p(x, v), x_p) == group.g_pow_p(k)
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------
