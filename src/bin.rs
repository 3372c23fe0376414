//! Command-line mix node: shuffle a row set, prove the shuffle, verify it
//! and persist the mixed rows and the proof.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use mixnetlib::{
    shuffle::VectorQ, ElGamalKeypair, ElGamalPublicKey, Engine, GroupContext, MixnetConfig, ProdPowAlg,
    Shuffle, ShuffleProver, ShuffleVerifier, VectorCiphertext,
};
use rand::rngs::OsRng;
use serde_derive::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::EnvFilter;

const LOG_TARGET: &str = "mixnetbin";

/// Built-in parameter sets.
#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum GroupChoice {
    /// 512-bit modulus, for demos and tests
    #[value(name = "test")]
    Test,
    /// 2048-bit modulus
    #[value(name = "production")]
    Production,
}

impl GroupChoice {
    fn context(self) -> &'static GroupContext {
        match self {
            GroupChoice::Test => GroupContext::test_group(),
            GroupChoice::Production => GroupContext::production(),
        }
    }
}

/// Verifiable re-encryption mix node
#[derive(Parser, Debug)]
#[command(name = "mixnetbin")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Mix identifier; binds the generators and the proof
    #[arg(long)]
    mix: String,

    /// Row width W (ciphertexts per row) of generated demo rows
    #[arg(long, default_value_t = 1)]
    width: usize,

    /// Number of demo rows to encrypt when no input is given
    #[arg(long, default_value_t = 10)]
    rows: usize,

    /// Bincode row set (public key and rows) to shuffle
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output directory for Shuffled.bin and Proof.json
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Worker threads; overrides MIXNET_THREADS
    #[arg(long)]
    threads: Option<usize>,

    /// Exponentiation backend (direct or windowed); overrides MIXNET_PRODPOW
    #[arg(long)]
    prodpow: Option<ProdPowAlg>,

    /// Group parameters
    #[arg(long, value_enum, default_value_t = GroupChoice::Test)]
    group: GroupChoice,
}

/// A row set with the key it is encrypted under. Output of one mix is the
/// input of the next.
#[derive(Serialize, Deserialize)]
struct RowSet {
    public_key: ElGamalPublicKey,
    rows: Vec<VectorCiphertext>,
}

fn demo_rows(group: &GroupContext, nrows: usize, width: usize) -> Result<RowSet> {
    if nrows == 0 || width == 0 {
        bail!("--rows and --width must be positive");
    }
    let kp = ElGamalKeypair::random(group, &mut OsRng);
    let rows = (0..nrows)
        .map(|i| {
            let ms: Vec<u64> = (0..width).map(|k| (i * width + k) as u64).collect();
            let rs = VectorQ::random(width, &mut OsRng);
            VectorCiphertext::encrypt(group, &kp.public, &VectorQ::from_u64s(&ms), &rs)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RowSet {
        public_key: kp.public,
        rows,
    })
}

fn read_rows(group: &GroupContext, path: &Path) -> Result<RowSet> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let set: RowSet = bincode::deserialize(&bytes).with_context(|| format!("decoding {}", path.display()))?;
    let public_key = ElGamalPublicKey::new(group, set.public_key.key().clone())?;
    for row in &set.rows {
        row.validate(group)?;
    }
    Ok(RowSet {
        public_key,
        rows: set.rows,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    let mut config = MixnetConfig::from_env()?;
    if cli.threads.is_some() {
        config.nthreads = cli.threads;
    }
    if let Some(alg) = cli.prodpow {
        config.prodpow = alg;
    }
    let engine = Engine::new(&config)?;
    let group = cli.group.context();

    let input = match &cli.input {
        Some(path) => read_rows(group, path)?,
        None => demo_rows(group, cli.rows, cli.width)?,
    };
    let nrows = input.rows.len();
    info!(
        target: LOG_TARGET,
        mix = %cli.mix,
        group = group.name(),
        nrows,
        engine = ?engine,
        "starting mix"
    );

    let start = Instant::now();
    let shuffle = Shuffle::shuffle(&engine, group, &input.rows, &input.public_key, &mut OsRng)?;
    let shuffle_time = start.elapsed();

    let start = Instant::now();
    let proof = ShuffleProver::from_shuffle(&engine, group, &cli.mix, &input.public_key, &input.rows, &shuffle)?
        .prove(&mut OsRng)?;
    let prove_time = start.elapsed();

    let start = Instant::now();
    let valid = ShuffleVerifier::new(&engine, group, &input.public_key, &input.rows, &shuffle.mixed)?.verify(&proof)?;
    let verify_time = start.elapsed();
    if !valid {
        bail!("proof of shuffle did not verify");
    }

    let per_row = |d: std::time::Duration| d.as_secs_f64() * 1000.0 / nrows as f64;
    info!(
        target: LOG_TARGET,
        shuffle_ms_per_row = per_row(shuffle_time),
        prove_ms_per_row = per_row(prove_time),
        verify_ms_per_row = per_row(verify_time),
        "mix complete"
    );

    fs::create_dir_all(&cli.out).with_context(|| format!("creating {}", cli.out.display()))?;
    let shuffled = RowSet {
        public_key: input.public_key,
        rows: shuffle.mixed,
    };
    let shuffled_path = cli.out.join("Shuffled.bin");
    fs::write(&shuffled_path, bincode::serialize(&shuffled)?)
        .with_context(|| format!("writing {}", shuffled_path.display()))?;
    let proof_path = cli.out.join("Proof.json");
    fs::write(&proof_path, proof.to_json()?).with_context(|| format!("writing {}", proof_path.display()))?;
    info!(
        target: LOG_TARGET,
        shuffled = %shuffled_path.display(),
        proof = %proof_path.display(),
        "outputs written"
    );
    Ok(())
}
