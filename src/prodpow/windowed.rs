//! Fixed-base windowed simultaneous exponentiation.
//!
//! The bases of a batch are split into sub-tables of [`WINDOW_WIDTH`]. Each
//! sub-table holds the product of every subset of its bases. The exponents
//! are then scanned from the top bit down: square the accumulator once per
//! bit, and multiply in one table entry per sub-table, selected by the word
//! formed from that bit of each exponent in the sub-table.

use num_bigint::BigUint;
use num_traits::One;

use crate::{
    errors::{check_len, MixnetError},
    prodpow::{check_modulus, ProdPow, EXPONENT_BITS, MAX_BATCH_SIZE, WINDOW_WIDTH},
};

/// Windowed backend; batches are limited to [`MAX_BATCH_SIZE`] bases and
/// exponents to [`EXPONENT_BITS`] bits.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowedProdPow;

impl ProdPow for WindowedProdPow {
    fn name(&self) -> &'static str {
        "windowed"
    }

    fn prod_pow(
        &self,
        bases: &[&BigUint],
        exps: &[&BigUint],
        modulus: &BigUint,
    ) -> Result<BigUint, MixnetError> {
        check_len("WindowedProdPow::prod_pow", bases.len(), exps.len())?;
        check_modulus(modulus)?;
        if bases.len() > MAX_BATCH_SIZE {
            return Err(MixnetError::BatchTooLarge {
                size: bases.len(),
                max: MAX_BATCH_SIZE,
            });
        }
        if exps.iter().any(|e| e.bits() > EXPONENT_BITS as u64) {
            return Err(MixnetError::ScalarOutOfRange);
        }
        let mut batch = WindowedBatch::new(bases, WINDOW_WIDTH, modulus);
        Ok(batch.prod_pow(exps, EXPONENT_BITS))
    }
}

// Products of every subset of bases[offset..offset + slice].
struct PartialProductTable {
    offset: usize,
    slice: usize,
    pre: Vec<BigUint>,
}

struct WindowedBatch<'a> {
    modulus: &'a BigUint,
    tables: Vec<PartialProductTable>,
    multiplies: usize,
}

impl<'a> WindowedBatch<'a> {
    fn new(bases: &[&BigUint], width: usize, modulus: &'a BigUint) -> Self {
        let mut batch = WindowedBatch {
            modulus,
            tables: Vec::with_capacity((bases.len() + width - 1) / width),
            multiplies: 0,
        };
        let mut offset = 0;
        while offset < bases.len() {
            let slice = width.min(bases.len() - offset);
            let table = batch.build_table(&bases[offset..offset + slice], offset);
            batch.tables.push(table);
            offset += width;
        }
        batch
    }

    // 2^slice multiplications: entry `mask` is the entry without its lowest
    // set bit times the single base at that bit.
    fn build_table(&mut self, bases: &[&BigUint], offset: usize) -> PartialProductTable {
        let size = 1usize << bases.len();
        let mut pre = vec![BigUint::one(); size];
        for (k, base) in bases.iter().enumerate() {
            pre[1 << k] = (*base).clone();
        }
        for mask in 0..size {
            let onemask = mask & mask.wrapping_neg();
            pre[mask] = (&pre[mask ^ onemask] * &pre[onemask]) % self.modulus;
            self.multiplies += 1;
        }
        PartialProductTable {
            offset,
            slice: bases.len(),
            pre,
        }
    }

    fn prod_pow(&mut self, exps: &[&BigUint], bits: usize) -> BigUint {
        let mut res = BigUint::one() % self.modulus;
        for bitpos in (0..bits as u64).rev() {
            res = (&res * &res) % self.modulus;
            self.multiplies += 1;
            for table in &self.tables {
                let word = exps[table.offset..table.offset + table.slice]
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.bit(bitpos))
                    .fold(0usize, |w, (k, _)| w | (1 << k));
                res = (&res * &table.pre[word]) % self.modulus;
                self.multiplies += 1;
            }
        }
        res
    }
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::group::{ElementModQ, GroupContext};
    use crate::prodpow::{expected_multiplies, DirectProdPow};
    use rand::rngs::OsRng;

    fn inputs(n: usize) -> (Vec<BigUint>, Vec<BigUint>) {
        let group = GroupContext::test_group();
        let bases = (0..n)
            .map(|_| group.g_pow_p(&ElementModQ::random(&mut OsRng)).value().clone())
            .collect();
        let exps = (0..n)
            .map(|_| ElementModQ::random(&mut OsRng).value().clone())
            .collect();
        (bases, exps)
    }

    #[test]
    fn table_holds_subset_products_test() {
        let modulus = BigUint::from(1_000_003u64);
        let bases: Vec<BigUint> = [2u64, 3, 5].iter().map(|b| BigUint::from(*b)).collect();
        let refs: Vec<&BigUint> = bases.iter().collect();
        let batch = WindowedBatch::new(&refs, 7, &modulus);
        assert_eq!(batch.tables.len(), 1);
        let expected: Vec<u64> = vec![1, 2, 3, 6, 5, 10, 15, 30];
        let pre: Vec<BigUint> = expected.into_iter().map(BigUint::from).collect();
        assert_eq!(batch.tables[0].pre, pre);
    }

    #[test]
    fn small_integers_test() {
        let modulus = BigUint::from(1_000_003u64);
        let bases: Vec<BigUint> = (2u64..12).map(BigUint::from).collect();
        let exps: Vec<BigUint> = (1u64..11).map(|e| BigUint::from(e * 37)).collect();
        let b: Vec<&BigUint> = bases.iter().collect();
        let e: Vec<&BigUint> = exps.iter().collect();
        assert_eq!(
            WindowedProdPow.prod_pow(&b, &e, &modulus).unwrap(),
            DirectProdPow.prod_pow(&b, &e, &modulus).unwrap()
        );
    }

    #[test]
    fn matches_direct_at_every_table_boundary_test() {
        let group = GroupContext::test_group();
        for n in [0usize, 1, 2, 7, 8, 13, 14, 50, 84] {
            let (bases, exps) = inputs(n);
            let b: Vec<&BigUint> = bases.iter().collect();
            let e: Vec<&BigUint> = exps.iter().collect();
            assert_eq!(
                WindowedProdPow.prod_pow(&b, &e, group.p()).unwrap(),
                DirectProdPow.prod_pow(&b, &e, group.p()).unwrap(),
                "n = {}",
                n
            );
        }
    }

    #[test]
    fn rejects_oversized_batches_test() {
        let group = GroupContext::test_group();
        let (bases, exps) = inputs(MAX_BATCH_SIZE + 1);
        let b: Vec<&BigUint> = bases.iter().collect();
        let e: Vec<&BigUint> = exps.iter().collect();
        assert_eq!(
            WindowedProdPow.prod_pow(&b, &e, group.p()),
            Err(MixnetError::BatchTooLarge { size: 85, max: 84 })
        );
    }

    #[test]
    fn rejects_wide_exponents_test() {
        let group = GroupContext::test_group();
        let base = group.g().value().clone();
        let wide = BigUint::one() << 256u32;
        assert_eq!(
            WindowedProdPow.prod_pow(&[&base], &[&wide], group.p()),
            Err(MixnetError::ScalarOutOfRange)
        );
    }

    #[test]
    fn multiply_count_matches_cost_model_test() {
        let group = GroupContext::test_group();
        for n in [7usize, 42, 84] {
            let (bases, exps) = inputs(n);
            let b: Vec<&BigUint> = bases.iter().collect();
            let e: Vec<&BigUint> = exps.iter().collect();
            let mut batch = WindowedBatch::new(&b, WINDOW_WIDTH, group.p());
            batch.prod_pow(&e, EXPONENT_BITS);
            assert_eq!(batch.multiplies, expected_multiplies(n));
        }
    }
}
