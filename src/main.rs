use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use jwtgen::config::{self, Settings};
use jwtgen::{batch, inspect, monitoring, producer, sink};
use jwtgen::{ClaimsBuilder, RandomSource, TokenKind};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    " ",
    env!("GIT_BRANCH"),
    ", ",
    env!("GIT_DATE"),
    ")\nbuilt ",
    env!("BUILD_TIMESTAMP"),
    " with rustc ",
    env!("RUST_VERSION"),
);

/// Generate JWT/JWE tokens for load testing
#[derive(Parser, Debug)]
#[command(name = "jwtgen", version, long_version = LONG_VERSION, about)]
struct Args {
    /// Number of tokens per algorithm [env: JWTGEN_COUNT, default: 1000]
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Worker threads, 0 uses every CPU [env: JWTGEN_WORKERS]
    #[arg(long)]
    workers: Option<usize>,

    /// Seed of the claims random generator [env: JWTGEN_SEED, default: 13666]
    #[arg(long)]
    seed: Option<u64>,

    /// Directory holding the key and secret files [env: JWTGEN_SECRETS_DIR]
    #[arg(long)]
    secrets_dir: Option<PathBuf>,

    /// Directory the token files are written to [env: JWTGEN_OUTPUT_DIR]
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Skip HS256 tokens
    #[arg(long)]
    no_hs256: bool,

    /// Skip RS256 tokens
    #[arg(long)]
    no_rs256: bool,

    /// Skip ES256 tokens
    #[arg(long)]
    no_es256: bool,

    /// Skip JWE tokens
    #[arg(long)]
    no_jwe: bool,

    /// Write Prometheus metrics of the run to this file
    #[arg(long)]
    metrics_file: Option<PathBuf>,

    /// Emit logs as JSON [env: JWTGEN_LOG_JSON]
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    fn skips(&self, kind: TokenKind) -> bool {
        match kind {
            TokenKind::Hs256 => self.no_hs256,
            TokenKind::Rs256 => self.no_rs256,
            TokenKind::Es256 => self.no_es256,
            TokenKind::Jwe => self.no_jwe,
        }
    }
}

/// One generation run, after flags and settings are merged
struct Run {
    count: usize,
    workers: usize,
    seed: u64,
    secrets_dir: PathBuf,
    output_dir: PathBuf,
    claims: ClaimsBuilder,
}

/// Merge command-line flags over `settings`; flags win where given.
fn run_from(args: &Args, settings: &Settings) -> Result<Run> {
    let count = args.count.unwrap_or(settings.count);
    if count == 0 {
        bail!("count must be > 0, got {}", count);
    }

    let seed = args.seed.unwrap_or(settings.seed);
    Ok(Run {
        count,
        workers: args.workers.unwrap_or(settings.workers),
        seed,
        secrets_dir: args.secrets_dir.clone().unwrap_or_else(|| settings.secrets_dir.clone()),
        output_dir: args.output_dir.clone().unwrap_or_else(|| settings.output_dir.clone()),
        claims: ClaimsBuilder::new(Arc::new(RandomSource::new(seed))),
    })
}

fn main() -> Result<()> {
    // Load .env file if it exists
    let dotenv = dotenvy::dotenv();

    let args = Args::parse();
    let settings = config::get_settings();

    init_tracing(args.json_logs || settings.log_json);
    if let Err(e) = dotenv {
        debug!("No .env file loaded: {}", e);
    }

    let run = run_from(&args, settings)?;

    info!(
        app = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        workers = run.workers,
        seed = run.seed,
        "Starting token generation"
    );

    println!("Secrets:   {}", run.secrets_dir.display());
    println!("Output:    {}", run.output_dir.display());
    println!("Count:     {} per algorithm", run.count);

    let result = run_all(&args, &run);

    if let Some(path) = &args.metrics_file {
        write_metrics(path)?;
    }

    result?;
    println!("Done.");
    Ok(())
}

/// Generate every kind not skipped, in order, stopping at the first failure.
fn run_all(args: &Args, run: &Run) -> Result<()> {
    TokenKind::ALL
        .into_iter()
        .filter(|kind| !args.skips(*kind))
        .try_for_each(|kind| -> Result<()> {
            let path = run_kind(kind, run)?;
            println!("{:<8}-> {} ({} tokens)", kind.label(), path.display(), run.count);
            Ok(())
        })
}

fn run_kind(kind: TokenKind, run: &Run) -> Result<PathBuf> {
    let producer = producer::load(kind, &run.secrets_dir, run.claims.clone())
        .inspect_err(|_| monitoring::ERROR_COUNT.with_label_values(&["key_load"]).inc())
        .with_context(|| format!("{} producer", kind))?;

    let start = Instant::now();
    let tokens = batch::generate_with_workers(run.count, run.workers, producer.as_ref())
        .inspect_err(|_| monitoring::ERROR_COUNT.with_label_values(&["generate"]).inc())
        .with_context(|| format!("generate {} tokens", kind))?;
    let elapsed = start.elapsed();
    monitoring::BATCH_DURATION
        .with_label_values(&[kind.label()])
        .observe(elapsed.as_secs_f64());

    if let Some(sample) = tokens.first() {
        log_sample(kind, sample);
    }

    let path = run.output_dir.join(kind.output_file());
    sink::write_lines(&path, &tokens)
        .inspect_err(|_| monitoring::ERROR_COUNT.with_label_values(&["sink"]).inc())
        .with_context(|| format!("write {} tokens", kind))?;
    monitoring::TOKENS_GENERATED
        .with_label_values(&[kind.label()])
        .inc_by(tokens.len() as u64);

    info!(
        kind = kind.label(),
        tokens = tokens.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        path = %path.display(),
        "Batch written"
    );
    Ok(path)
}

fn log_sample(kind: TokenKind, token: &str) {
    if inspect::segment_count(token) != kind.segments() {
        warn!(kind = kind.label(), "Sample token has unexpected segment count");
        return;
    }
    match kind {
        TokenKind::Jwe => {
            let header = inspect::decode_header(token).ok();
            debug!(kind = kind.label(), header = ?header, "Sample token");
        }
        _ => match inspect::decode_jws_payload(token) {
            Ok(claims) => {
                debug!(kind = kind.label(), sub = %claims.sub, iat = claims.iat, "Sample token")
            }
            Err(e) => warn!(kind = kind.label(), "Sample token payload unreadable: {}", e),
        },
    }
}

fn write_metrics(path: &Path) -> Result<()> {
    let text = monitoring::render().context("render metrics")?;
    fs::write(path, text).with_context(|| format!("write metrics to {}", path.display()))
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
