//! `strata`: exercise the strata erasure code from the command line.
//!
//! # Usage
//!
//! ```text
//! strata demo                              # 12/8 code, lose shards 0,2,3,4
//! strata demo -m 9 -k 5 --size 80 -e 1,3   # custom code and losses
//! strata -c strata.toml demo               # parameters from a config file
//! strata bench -n 1000 --size 1048576      # encode/decode throughput
//! ```

mod config;

use std::hint::black_box;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strata_erasure::{Code, CodeConfig};
use tracing::{debug, info};

use config::CliConfig;

// -----------------------------------------------------------------------
// CLI definition
// -----------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "strata", version, about = "Systematic GF(256) erasure code tool")]
struct Cli {
    /// Path to TOML config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Code parameters that override the `[code]` config section.
#[derive(Args)]
struct CodeArgs {
    /// Total number of shards.
    #[arg(short)]
    m: Option<usize>,

    /// Number of data shards.
    #[arg(short)]
    k: Option<usize>,

    /// Bytes of data per stripe (a multiple of k).
    #[arg(short, long)]
    size: Option<usize>,
}

impl CodeArgs {
    fn apply(&self, code: &mut CodeConfig) {
        if let Some(m) = self.m {
            code.m = m;
        }
        if let Some(k) = self.k {
            code.k = k;
        }
        if let Some(size) = self.size {
            code.size = size;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Encode random data, erase some shards and decode it back.
    Demo {
        #[command(flatten)]
        code: CodeArgs,

        /// Shard indices to erase, comma separated.
        #[arg(short, long, value_delimiter = ',', default_values_t = vec![0, 2, 3, 4])]
        erase: Vec<usize>,

        /// Byte written over the erased shards.
        #[arg(long, default_value_t = 0x62)]
        fill: u8,

        /// Seed for the input data (random if omitted).
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Measure encode and decode throughput.
    Bench {
        #[command(flatten)]
        code: CodeArgs,

        /// Number of encode and warm decode iterations.
        #[arg(short = 'n', long, default_value = "1000")]
        iterations: usize,

        /// Shard indices to erase (defaults to the first m - k shards).
        #[arg(short, long, value_delimiter = ',')]
        erase: Option<Vec<usize>>,
    },
}

// -----------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = CliConfig::load(cli.config.as_deref()).context("failed to load config")?;

    setup_tracing(&config.log.level);

    match cli.command {
        Commands::Demo {
            code,
            erase,
            fill,
            seed,
        } => {
            code.apply(&mut config.code);
            cmd_demo(&config, &erase, fill, seed)
        }
        Commands::Bench {
            code,
            iterations,
            erase,
        } => {
            code.apply(&mut config.code);
            cmd_bench(&config, iterations, erase)
        }
    }
}

/// Initialize the `tracing` subscriber with the given level filter.
///
/// Respects `RUST_LOG` env var if set, otherwise uses the config value.
fn setup_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

// -----------------------------------------------------------------------
// strata demo
// -----------------------------------------------------------------------

/// Outcome of one encode / erase / decode round trip.
struct DemoReport {
    stripe: Vec<u8>,
    recovered: Vec<u8>,
    matches: bool,
}

fn demo_roundtrip(code: &Code, data: &[u8], erased: &[usize], fill: u8) -> Result<DemoReport> {
    let mut stripe = code.encode_stripe(data).context("encode failed")?;

    let len = code.shard_len();
    for &shard in erased {
        if shard < code.m() {
            stripe[shard * len..(shard + 1) * len].fill(fill);
        }
    }

    let recovered = code.decode(&stripe, erased).context("decode failed")?;
    let matches = recovered == data;
    Ok(DemoReport {
        stripe,
        recovered,
        matches,
    })
}

fn cmd_demo(config: &CliConfig, erased: &[usize], fill: u8, seed: Option<u64>) -> Result<()> {
    let code = config.code.build().context("invalid code parameters")?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut data = vec![0u8; code.data_len()];
    rng.fill(&mut data[..]);

    info!(m = code.m(), k = code.k(), shard_len = code.shard_len(), "running demo");
    println!("Strata Demo");
    println!("  code:   m={}, k={}, shard_len={}", code.m(), code.k(), code.shard_len());
    println!("  erased: {erased:?} (filled with {fill:#04x})");
    println!();

    let report = demo_roundtrip(&code, &data, erased, fill)?;

    println!("Shards after erasure:");
    for (i, shard) in report.stripe.chunks(code.shard_len().max(1)).enumerate() {
        let kind = if i < code.k() { "data" } else { "parity" };
        let mark = if erased.contains(&i) { " (erased)" } else { "" };
        println!("  {i:>3} {kind:<6} {}{mark}", hex_preview(shard));
    }
    println!();
    println!("original:  {}", hex_preview(&data));
    println!("recovered: {}", hex_preview(&report.recovered));

    if !report.matches {
        bail!("recovered data does not match the original");
    }
    println!("OK: original data recovered");
    Ok(())
}

/// Hex rendering of the first bytes of `bytes`.
fn hex_preview(bytes: &[u8]) -> String {
    const MAX: usize = 16;
    let mut out: String = bytes.iter().take(MAX).map(|b| format!("{b:02x}")).collect();
    if bytes.len() > MAX {
        out.push_str("..");
    }
    out
}

// -----------------------------------------------------------------------
// strata bench
// -----------------------------------------------------------------------

fn cmd_bench(config: &CliConfig, iterations: usize, erase: Option<Vec<usize>>) -> Result<()> {
    let code = config.code.build().context("invalid code parameters")?;
    let erased = erase.unwrap_or_else(|| (0..code.parity_shards()).collect());
    let iterations = iterations.max(1);

    println!("Strata Benchmark");
    println!("  code:       m={}, k={}, shard_len={}", code.m(), code.k(), code.shard_len());
    println!("  erased:     {erased:?}");
    println!("  iterations: {iterations}");
    println!();

    let data = generate_bench_data(code.data_len(), 0);
    let total_bytes = iterations as u64 * data.len() as u64;

    // --- Encode ---
    print!("Encoding {iterations} stripes... ");
    let start = Instant::now();
    let mut stripe = Vec::new();
    for _ in 0..iterations {
        stripe = black_box(code.encode_stripe(&data)?);
    }
    let encode_dur = start.elapsed();
    println!(
        "{:.3}s ({:.1} MB/s)",
        encode_dur.as_secs_f64(),
        throughput(total_bytes, encode_dur)
    );

    // --- First decode: builds the plan ---
    let start = Instant::now();
    let recovered = code.decode(&stripe, &erased)?;
    let cold_dur = start.elapsed();
    if recovered != data {
        bail!("decode returned wrong data");
    }
    println!("First decode (cache miss): {:.1} us", cold_dur.as_secs_f64() * 1e6);

    // --- Warm decodes ---
    print!("Decoding {iterations} stripes... ");
    let start = Instant::now();
    for _ in 0..iterations {
        black_box(code.decode(&stripe, &erased)?);
    }
    let decode_dur = start.elapsed();
    println!(
        "{:.3}s ({:.1} MB/s)",
        decode_dur.as_secs_f64(),
        throughput(total_bytes, decode_dur)
    );

    debug!(cached_patterns = code.cached_patterns(), "benchmark finished");

    println!();
    println!("Summary:");
    println!("  Encode throughput: {:.1} MB/s", throughput(total_bytes, encode_dur));
    println!("  Decode throughput: {:.1} MB/s", throughput(total_bytes, decode_dur));
    println!("  Total data:        {:.1} MB", total_bytes as f64 / 1_048_576.0);

    Ok(())
}

fn throughput(bytes: u64, elapsed: Duration) -> f64 {
    bytes as f64 / elapsed.as_secs_f64().max(f64::MIN_POSITIVE) / 1_048_576.0
}

/// Generate deterministic test data for benchmarking.
///
/// Same generator and seeding as the library's test and bench data.
fn generate_bench_data(size: usize, seed: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut state: u32 = 0xDEAD_BEEF ^ seed.wrapping_mul(0x9E37_79B9);
    for _ in 0..size {
        state = state.wrapping_mul(1103515245).wrapping_add(12345);
        data.push((state >> 16) as u8);
    }
    data
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
