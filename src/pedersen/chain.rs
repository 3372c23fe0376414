//! Sequentially linked commitments over a vector of scalars.
//!
//! With running exponents `R_i = r_i + u_i * R_{i-1}` and
//! `U_i = u_i * U_{i-1}` (from `R_{-1} = 0`, `U_{-1} = 1`), link i is
//! `c_i = g^{R_i} * h^{U_i}`. Equivalently `c_i = g^{r_i} * c_{i-1}^{u_i}`
//! with `c_{-1} = h`, so every link binds the whole prefix of `u`.

use rand::{CryptoRng, Rng};

use crate::{
    errors::{check_len, MixnetError},
    group::{ElementModP, GroupContext},
    prodpow::Engine,
    shuffle::vectorutil::{VectorP, VectorQ},
};

/// The links of a chain and the nonces that built them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitmentChain {
    /// One commitment per entry of `u`.
    pub commitments: VectorP,
    /// The fresh nonce `r_i` of each link.
    pub nonces: VectorQ,
}

impl CommitmentChain {
    /// Builds the chain over `u` with fresh nonces.
    pub fn build<R: Rng + CryptoRng>(
        engine: &Engine,
        group: &GroupContext,
        h: &ElementModP,
        u: &VectorQ,
        rng: &mut R,
    ) -> Result<Self, MixnetError> {
        let nonces = VectorQ::random(u.len(), rng);
        Self::build_with(engine, group, h, u, nonces)
    }

    /// Builds the chain over `u` with the supplied nonces. The running
    /// exponents are folded sequentially; the links are then independent and
    /// computed in parallel.
    pub fn build_with(
        engine: &Engine,
        group: &GroupContext,
        h: &ElementModP,
        u: &VectorQ,
        nonces: VectorQ,
    ) -> Result<Self, MixnetError> {
        let (r_run, u_run) = running_exponents(u, &nonces)?;
        let commitments = engine.pool().run_indexed(u.len(), |i| {
            Ok(group.mul_p(&group.g_pow_p(&r_run[i]), &group.pow_p(h, &u_run[i])))
        })?;
        Ok(CommitmentChain {
            commitments: VectorP::new(commitments),
            nonces,
        })
    }

    /// Recomputes the chain from `h`, `u` and the stored nonces and compares.
    pub fn rederive(&self, engine: &Engine, group: &GroupContext, h: &ElementModP, u: &VectorQ) -> bool {
        match Self::build_with(engine, group, h, u, self.nonces.clone()) {
            Ok(chain) => chain.commitments == self.commitments,
            Err(_) => false,
        }
    }

    /// The last link.
    pub fn last(&self) -> Option<&ElementModP> {
        self.commitments.as_slice().last()
    }
}

/// The running exponents `(R, U)` of the chain over `u` with `nonces`.
pub fn running_exponents(u: &VectorQ, nonces: &VectorQ) -> Result<(VectorQ, VectorQ), MixnetError> {
    check_len("CommitmentChain::nonces", u.len(), nonces.len())?;
    Ok((nonces.rec_lin(u)?, u.aggregate_product()))
}

/// The chain built link by link, `c_i = g^{r_i} * c_{i-1}^{u_i}` from
/// `c_{-1} = h`. Matches [`CommitmentChain::build_with`].
pub fn chain_recursive(
    group: &GroupContext,
    h: &ElementModP,
    u: &VectorQ,
    nonces: &VectorQ,
) -> Result<VectorP, MixnetError> {
    check_len("chain_recursive", u.len(), nonces.len())?;
    let mut prev = h.clone();
    let mut out = Vec::with_capacity(u.len());
    for (ui, ri) in u.iter().zip(nonces.iter()) {
        prev = group.mul_p(&group.g_pow_p(ri), &group.pow_p(&prev, ui));
        out.push(prev.clone());
    }
    Ok(VectorP::new(out))
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::group::ElementModQ;
    use crate::prodpow::{ProdPowAlg, WorkerPool};
    use rand::rngs::OsRng;

    #[test]
    fn closed_form_equals_recursive_test() {
        let group = GroupContext::test_group();
        let engine = Engine::single_threaded(ProdPowAlg::Windowed);
        let h = group.g_pow_p(&ElementModQ::random(&mut OsRng));
        for n in [1usize, 2, 13] {
            let u = VectorQ::random(n, &mut OsRng);
            let chain = CommitmentChain::build(&engine, group, &h, &u, &mut OsRng).unwrap();
            let recursive = chain_recursive(group, &h, &u, &chain.nonces).unwrap();
            assert_eq!(chain.commitments, recursive);
        }
    }

    #[test]
    fn chain_rederives_test() {
        let group = GroupContext::test_group();
        let single = Engine::single_threaded(ProdPowAlg::Windowed);
        let parallel = Engine::with_prodpow(WorkerPool::new(3).unwrap(), ProdPowAlg::Windowed.build());
        let h = group.g_pow_p(&ElementModQ::random(&mut OsRng));
        let u = VectorQ::random(20, &mut OsRng);
        let chain = CommitmentChain::build(&single, group, &h, &u, &mut OsRng).unwrap();
        assert!(chain.rederive(&parallel, group, &h, &u));

        // changing one entry of u breaks that link and every later one
        let mut tampered = u.clone();
        tampered.0[5] = &tampered.0[5] + &ElementModQ::one();
        let other = CommitmentChain::build_with(&single, group, &h, &tampered, chain.nonces.clone())
            .unwrap();
        assert_eq!(other.commitments.as_slice()[..5], chain.commitments.as_slice()[..5]);
        for i in 5..20 {
            assert_ne!(other.commitments[i], chain.commitments[i]);
        }
        assert!(!chain.rederive(&single, group, &h, &tampered));
    }

    #[test]
    fn last_link_opens_to_product_test() {
        // c_{N-1} = g^{R_{N-1}} * h^{Π u}
        let group = GroupContext::test_group();
        let engine = Engine::single_threaded(ProdPowAlg::Direct);
        let h = group.g_pow_p(&ElementModQ::random(&mut OsRng));
        let u = VectorQ::random(7, &mut OsRng);
        let chain = CommitmentChain::build(&engine, group, &h, &u, &mut OsRng).unwrap();
        let (r_run, _) = running_exponents(&u, &chain.nonces).unwrap();
        let expected = group.mul_p(&group.g_pow_p(&r_run[6]), &group.pow_p(&h, &u.product()));
        assert_eq!(chain.last(), Some(&expected));
    }
}
