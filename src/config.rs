//! Runtime configuration of the exponentiation engine.

use serde_derive::Deserialize;

use crate::{errors::MixnetError, prodpow::ProdPowAlg};

/// Environment variable overriding the worker count.
pub const THREADS_ENV: &str = "MIXNET_THREADS";

/// Environment variable selecting the exponentiation backend.
pub const PRODPOW_ENV: &str = "MIXNET_PRODPOW";

/// Engine settings. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct MixnetConfig {
    /// Worker count; `None` means three quarters of the available cores.
    pub nthreads: Option<usize>,
    /// Exponentiation backend.
    pub prodpow: ProdPowAlg,
}

impl MixnetConfig {
    /// Defaults overridden by `MIXNET_THREADS` and `MIXNET_PRODPOW`.
    pub fn from_env() -> Result<Self, MixnetError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self, MixnetError> {
        let mut config = MixnetConfig::default();
        if let Some(v) = lookup(THREADS_ENV) {
            let n = v
                .trim()
                .parse::<usize>()
                .map_err(|e| MixnetError::Config(format!("{}={}: {}", THREADS_ENV, v, e)))?;
            config.nthreads = Some(n);
        }
        if let Some(v) = lookup(PRODPOW_ENV) {
            config.prodpow = v.trim().parse()?;
        }
        Ok(config)
    }
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------
