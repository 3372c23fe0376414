//! The parallel exponentiation engine.

use core::fmt;
use std::sync::Arc;

use itertools::Itertools;
use num_bigint::BigUint;
use tracing::debug;

use crate::{
    config::MixnetConfig,
    elgamal::{row_width, Ciphertext, VectorCiphertext},
    errors::{check_len, MixnetError},
    group::{ElementModP, GroupContext},
    prodpow::{pool::WorkerPool, ProdPow, ProdPowAlg, MAX_BATCH_SIZE},
    shuffle::vectorutil::{VectorP, VectorQ},
};

const LOG_TARGET: &str = "mixnet::prodpow::engine";

/// A worker pool paired with an exponentiation backend.
///
/// The engine is handed explicitly to the shuffle, the prover and the
/// verifier; cloning it shares the pool.
#[derive(Clone)]
pub struct Engine {
    pool: Arc<WorkerPool>,
    prodpow: Arc<dyn ProdPow>,
}

impl Engine {
    /// Builds the pool and backend selected by `config`.
    pub fn new(config: &MixnetConfig) -> Result<Self, MixnetError> {
        let nthreads = config.nthreads.unwrap_or_else(WorkerPool::default_threads);
        let pool = WorkerPool::new(nthreads)?;
        Ok(Self::with_prodpow(pool, config.prodpow.build()))
    }

    /// A single-threaded engine; the reference for determinism checks.
    pub fn single_threaded(alg: ProdPowAlg) -> Self {
        Self::with_prodpow(WorkerPool::single_threaded(), alg.build())
    }

    /// Plugs in an external backend, e.g. an accelerated library.
    pub fn with_prodpow(pool: WorkerPool, prodpow: Arc<dyn ProdPow>) -> Self {
        Engine {
            pool: Arc::new(pool),
            prodpow,
        }
    }

    /// The worker pool.
    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// The exponentiation backend.
    pub fn prodpow(&self) -> &dyn ProdPow {
        self.prodpow.as_ref()
    }

    /// `Π bases[i]^exps[i]`, one unit of work per batch.
    pub fn prod_pow(
        &self,
        group: &GroupContext,
        bases: &VectorP,
        exps: &VectorQ,
    ) -> Result<ElementModP, MixnetError> {
        check_len("Engine::prod_pow", bases.len(), exps.len())?;
        let b = bases.values();
        let e = exps.values();
        let nbatches = (b.len() + MAX_BATCH_SIZE - 1) / MAX_BATCH_SIZE;
        let partials = self.pool.run_indexed(nbatches, |k| {
            let start = k * MAX_BATCH_SIZE;
            let end = (start + MAX_BATCH_SIZE).min(b.len());
            self.prodpow.prod_pow(&b[start..end], &e[start..end], group.p())
        })?;
        Ok(reduce(group, partials))
    }

    /// For every column k of the N x W row set, the ciphertext
    /// `Π_i rows[i][k]^exps[i]`.
    ///
    /// Pads and datas of each column are split into batches, giving one unit of
    /// work per (column, component, batch); unit results are reduced per
    /// column after the join.
    pub fn prod_column_pow(
        &self,
        group: &GroupContext,
        rows: &[VectorCiphertext],
        exps: &VectorQ,
    ) -> Result<VectorCiphertext, MixnetError> {
        let width = row_width(rows)?;
        check_len("Engine::prod_column_pow", rows.len(), exps.len())?;
        let e = exps.values();
        let nrows = rows.len();
        let nbatches = (nrows + MAX_BATCH_SIZE - 1) / MAX_BATCH_SIZE;
        debug!(
            target: LOG_TARGET,
            nrows,
            width,
            nbatches,
            backend = self.prodpow.name(),
            "column product"
        );

        let partials = self.pool.run_indexed(width * 2 * nbatches, |k| {
            let batch = k % nbatches;
            let is_data = (k / nbatches) % 2 == 1;
            let col = k / (2 * nbatches);
            let start = batch * MAX_BATCH_SIZE;
            let end = (start + MAX_BATCH_SIZE).min(nrows);
            let bases: Vec<&BigUint> = rows[start..end]
                .iter()
                .map(|row| {
                    let ct = &row[col];
                    if is_data {
                        ct.data.value()
                    } else {
                        ct.pad.value()
                    }
                })
                .collect();
            self.prodpow.prod_pow(&bases, &e[start..end], group.p())
        })?;

        // units are ordered (column, component, batch)
        let out = partials
            .chunks(nbatches)
            .map(|units| reduce(group, units.iter().cloned()))
            .tuples()
            .map(|(pad, data)| Ciphertext::new(pad, data))
            .collect();
        Ok(VectorCiphertext::new(out))
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("nthreads", &self.pool.nthreads())
            .field("prodpow", &self.prodpow.name())
            .finish()
    }
}

fn reduce<I: IntoIterator<Item = BigUint>>(group: &GroupContext, partials: I) -> ElementModP {
    partials
        .into_iter()
        .fold(group.one(), |acc, x| group.mul_p(&acc, &group.element(x)))
}

/// Reference column product: one `pow_p` per ciphertext component, no
/// batching and no threads.
pub fn prod_column_pow_direct(
    group: &GroupContext,
    rows: &[VectorCiphertext],
    exps: &VectorQ,
) -> Result<VectorCiphertext, MixnetError> {
    let width = row_width(rows)?;
    check_len("prod_column_pow_direct", rows.len(), exps.len())?;
    let out = (0..width)
        .map(|col| {
            rows.iter()
                .zip(exps.iter())
                .fold(Ciphertext::new(group.one(), group.one()), |acc, (row, e)| {
                    acc.mul(group, &row[col].pow(group, e))
                })
        })
        .collect();
    Ok(VectorCiphertext::new(out))
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------
