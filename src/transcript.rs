//! Fiat-Shamir challenges over a `merlin` transcript.
//!
//! Elements are appended in their fixed-width encoding, scalars as 32 bytes.
//! Vectors are preceded by their u64 length and rows by their width, so no
//! two distinct transcripts share an encoding.

use merlin::Transcript;

use crate::{
    elgamal::{Ciphertext, VectorCiphertext},
    group::{ElementModP, ElementModQ, GroupContext},
    shuffle::vectorutil::{VectorP, VectorQ},
};

/// Label of every shuffle-proof transcript.
pub const CHALLENGE_LABEL: &[u8] = b"mixnet-shuffle/challenges/v1";

/// Extension trait to the Merlin transcript API that allows committing group
/// elements, scalars and ciphertexts and generating challenges as scalars.
pub trait TranscriptProtocol {
    /// Appends `label` to the transcript as a domain separator.
    fn domain_sep(&mut self, label: &'static [u8]);

    /// Appends a length or width.
    fn append_len(&mut self, label: &'static [u8], len: usize);

    /// Appends a scalar.
    fn append_scalar_var(&mut self, label: &'static [u8], scalar: &ElementModQ);

    /// Appends a group element.
    fn append_element_var(&mut self, group: &GroupContext, label: &'static [u8], x: &ElementModP);

    /// Appends a length-prefixed scalar vector.
    fn append_scalar_vector(&mut self, label: &'static [u8], v: &VectorQ);

    /// Appends a length-prefixed element vector.
    fn append_element_vector(&mut self, group: &GroupContext, label: &'static [u8], v: &VectorP);

    /// Appends a width-prefixed ciphertext row.
    fn append_row(&mut self, group: &GroupContext, label: &'static [u8], row: &VectorCiphertext);

    /// Appends a length-prefixed row set.
    fn append_rows(&mut self, group: &GroupContext, label: &'static [u8], rows: &[VectorCiphertext]);

    /// Get a scalar challenge from the transcript.
    fn get_challenge(&mut self, label: &'static [u8]) -> ElementModQ;

    /// Get `n` scalar challenges from the transcript.
    fn get_challenges(&mut self, label: &'static [u8], n: usize) -> VectorQ;
}

impl TranscriptProtocol for Transcript {
    fn domain_sep(&mut self, label: &'static [u8]) {
        self.append_message(b"dom-sep", label);
    }

    fn append_len(&mut self, label: &'static [u8], len: usize) {
        self.append_u64(label, len as u64);
    }

    fn append_scalar_var(&mut self, label: &'static [u8], scalar: &ElementModQ) {
        self.append_message(label, &scalar.to_bytes());
    }

    fn append_element_var(&mut self, group: &GroupContext, label: &'static [u8], x: &ElementModP) {
        self.append_message(label, &group.element_to_bytes(x));
    }

    fn append_scalar_vector(&mut self, label: &'static [u8], v: &VectorQ) {
        self.append_len(label, v.len());
        for x in v.iter() {
            self.append_scalar_var(label, x);
        }
    }

    fn append_element_vector(&mut self, group: &GroupContext, label: &'static [u8], v: &VectorP) {
        self.append_len(label, v.len());
        for x in v.iter() {
            self.append_element_var(group, label, x);
        }
    }

    fn append_row(&mut self, group: &GroupContext, label: &'static [u8], row: &VectorCiphertext) {
        self.append_len(b"width", row.width());
        for Ciphertext { pad, data } in row.iter() {
            self.append_element_var(group, label, pad);
            self.append_element_var(group, label, data);
        }
    }

    fn append_rows(&mut self, group: &GroupContext, label: &'static [u8], rows: &[VectorCiphertext]) {
        self.append_len(label, rows.len());
        for row in rows {
            self.append_row(group, label, row);
        }
    }

    fn get_challenge(&mut self, label: &'static [u8]) -> ElementModQ {
        let mut bytes = [0; 64];
        self.challenge_bytes(label, &mut bytes);
        ElementModQ::from_bytes_mod_order_wide(&bytes)
    }

    fn get_challenges(&mut self, label: &'static [u8], n: usize) -> VectorQ {
        VectorQ::new((0..n).map(|_| self.get_challenge(label)).collect())
    }
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn transcript_with(group: &GroupContext, xs: &[u64]) -> Transcript {
        let mut t = Transcript::new(CHALLENGE_LABEL);
        t.domain_sep(b"test");
        let v = VectorQ::from_u64s(xs);
        t.append_scalar_vector(b"v", &v);
        t.append_element_var(group, b"g", group.g());
        t
    }

    #[test]
    fn challenges_are_deterministic_test() {
        let group = GroupContext::test_group();
        let a = transcript_with(group, &[1, 2, 3]).get_challenges(b"e", 5);
        let b = transcript_with(group, &[1, 2, 3]).get_challenges(b"e", 5);
        assert_eq!(a, b);
        assert_eq!(a.len(), 5);
        assert_ne!(a[0], a[1]);
    }

    #[test]
    fn challenges_depend_on_every_input_test() {
        let group = GroupContext::test_group();
        let base = transcript_with(group, &[1, 2, 3]).get_challenge(b"e");
        assert_ne!(base, transcript_with(group, &[1, 2, 4]).get_challenge(b"e"));
        assert_ne!(base, transcript_with(group, &[1, 2]).get_challenge(b"e"));
        assert_ne!(base, transcript_with(group, &[1, 2, 3]).get_challenge(b"v"));

        let mut t = Transcript::new(b"another-protocol");
        t.domain_sep(b"test");
        t.append_scalar_vector(b"v", &VectorQ::from_u64s(&[1, 2, 3]));
        t.append_element_var(group, b"g", group.g());
        assert_ne!(base, t.get_challenge(b"e"));
    }
}
