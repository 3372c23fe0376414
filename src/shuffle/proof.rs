//! The proof of shuffle and its Fiat-Shamir transcript.

#![allow(non_snake_case)]

use merlin::Transcript;
use serde_derive::{Deserialize, Serialize};

use crate::{
    elgamal::VectorCiphertext,
    errors::{check_len, MixnetError},
    group::{ElGamalPublicKey, ElementModP, ElementModQ, GroupContext},
    pedersen::MixGenerators,
    shuffle::vectorutil::{VectorP, VectorQ},
    transcript::{TranscriptProtocol, CHALLENGE_LABEL},
};

/// First-round message of the prover.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofCommitment {
    /// Permutation commitment.
    pub u: VectorP,
    /// Last running exponent of the bridging commitments.
    pub d: ElementModQ,
    /// Batching vector.
    pub e: VectorQ,
    /// Bridging commitments.
    pub B: VectorP,
    /// `g^alpha * Π h_i^{epsilon_i}`
    pub A_p: ElementModP,
    /// `g^{beta_i} * B_{i-1}^{epsilon_i}`
    pub B_p: VectorP,
    /// `g^gamma`
    pub C_p: ElementModP,
    /// `g^delta`
    pub D_p: ElementModP,
    /// `Enc(0; -phi) * Π mixed_j^{epsilon_j}`, one ciphertext per column.
    pub F_p: VectorCiphertext,
}

/// Second-round message of the prover.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofReply {
    /// `a * v + alpha`
    pub k_A: ElementModQ,
    /// `b * v + beta`
    pub k_B: VectorQ,
    /// `c * v + gamma`
    pub k_C: ElementModQ,
    /// `d * v + delta`
    pub k_D: ElementModQ,
    /// `ipe * v + epsilon`
    pub k_E: VectorQ,
    /// `f * v + phi`
    pub k_F: VectorQ,
}

/// A non-interactive proof that one row set is a permutation and
/// re-encryption of another.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofOfShuffle {
    /// Mix identifier; binds the generators and the challenges.
    pub mix_name: String,
    /// First-round message.
    pub commitment: ProofCommitment,
    /// Second-round message.
    pub reply: ProofReply,
}

impl ProofOfShuffle {
    /// Checks every length against an `nrows x width` shuffle and every group
    /// element against `group`.
    pub fn validate(
        &self,
        group: &GroupContext,
        nrows: usize,
        width: usize,
    ) -> Result<(), MixnetError> {
        let c = &self.commitment;
        let r = &self.reply;
        check_len("proof u", nrows, c.u.len())?;
        check_len("proof e", nrows, c.e.len())?;
        check_len("proof B", nrows, c.B.len())?;
        check_len("proof B'", nrows, c.B_p.len())?;
        check_len("proof F'", width, c.F_p.width())?;
        check_len("proof k_B", nrows, r.k_B.len())?;
        check_len("proof k_E", nrows, r.k_E.len())?;
        check_len("proof k_F", width, r.k_F.len())?;

        c.u.validate(group)?;
        c.B.validate(group)?;
        c.B_p.validate(group)?;
        group.check_element(&c.A_p)?;
        group.check_element(&c.C_p)?;
        group.check_element(&c.D_p)?;
        c.F_p.validate(group)
    }

    /// JSON encoding.
    pub fn to_json(&self) -> Result<String, MixnetError> {
        serde_json::to_string_pretty(self).map_err(|e| MixnetError::Serialization(e.to_string()))
    }

    /// Decodes a JSON proof. Group membership is checked later by
    /// [`validate`](Self::validate).
    pub fn from_json(s: &str) -> Result<Self, MixnetError> {
        serde_json::from_str(s).map_err(|e| MixnetError::Serialization(e.to_string()))
    }

    /// Binary encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, MixnetError> {
        bincode::serialize(self).map_err(|e| MixnetError::Serialization(e.to_string()))
    }

    /// Decodes a binary proof.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MixnetError> {
        bincode::deserialize(bytes).map_err(|e| MixnetError::Serialization(e.to_string()))
    }
}

/// The public statement absorbed into a fresh transcript; squeeze the
/// batching vector from it with [`batching_vector`].
pub(crate) fn statement_transcript(
    group: &GroupContext,
    mix_name: &str,
    gens: &MixGenerators,
    u: &VectorP,
    pk: &ElGamalPublicKey,
    rows: &[VectorCiphertext],
    mixed: &[VectorCiphertext],
) -> Transcript {
    let mut t = Transcript::new(CHALLENGE_LABEL);
    t.domain_sep(b"proof-of-shuffle");
    t.append_message(b"mix_name", mix_name.as_bytes());
    t.append_element_var(group, b"g", group.g());
    t.append_element_var(group, b"h0", &gens.h0);
    t.append_element_vector(group, b"generators", &gens.generators);
    t.append_element_vector(group, b"u", u);
    t.append_element_var(group, b"pk", pk.key());
    t.append_rows(group, b"rows", rows);
    t.append_rows(group, b"mixed", mixed);
    t
}

/// The batching vector `e`, one scalar per row.
pub(crate) fn batching_vector(t: &mut Transcript, nrows: usize) -> VectorQ {
    t.get_challenges(b"e", nrows)
}

/// The reply challenge `v` over the first-round message.
pub(crate) fn reply_challenge(
    t: &mut Transcript,
    group: &GroupContext,
    c: &ProofCommitment,
) -> ElementModQ {
    t.append_element_vector(group, b"u", &c.u);
    t.append_scalar_var(b"d", &c.d);
    t.append_scalar_vector(b"e", &c.e);
    t.append_element_vector(group, b"B", &c.B);
    t.append_element_var(group, b"A'", &c.A_p);
    t.append_element_vector(group, b"B'", &c.B_p);
    t.append_element_var(group, b"C'", &c.C_p);
    t.append_element_var(group, b"D'", &c.D_p);
    t.append_row(group, b"F'", &c.F_p);
    t.get_challenge(b"v")
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------
