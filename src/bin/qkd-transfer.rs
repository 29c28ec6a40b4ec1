use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use qkd_transfer::{Bb84Session, Envelope, Sampler, TransferConfig, TransferOutcome, TransferStore};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "qkd-transfer",
    version,
    about = "Send a document encrypted with a BB84-derived key"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a key exchange and encrypt a text file for a recipient.
    Send(SendArgs),
    /// Decrypt an envelope written by `send --output`.
    Receive {
        /// Envelope JSON file.
        #[arg(long)]
        envelope: PathBuf,
    },
    /// Print measurement statistics for every basis combination.
    Sample {
        /// Shots per combination.
        #[arg(long, default_value_t = 10_000)]
        shots: usize,
        #[arg(long)]
        seed: Option<u64>,
        /// Output JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
struct SendArgs {
    /// Plain-text document to send.
    #[arg(long)]
    input: PathBuf,
    #[arg(long, default_value = "receiver")]
    recipient: String,
    /// JSON file with `num_qubits`, `qber_threshold` and `min_key_length`.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Qubits to send, overrides the config file.
    #[arg(long)]
    qubits: Option<usize>,
    /// Rejection threshold in percent, overrides the config file.
    #[arg(long)]
    threshold: Option<f64>,
    /// Minimum sifted key length, overrides the config file.
    #[arg(long)]
    min_key_length: Option<usize>,
    /// Seed for a reproducible exchange.
    #[arg(long)]
    seed: Option<u64>,
    /// Write the delivered envelope here as JSON.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Send(args) => send(args),
        Command::Receive { envelope } => receive(envelope),
        Command::Sample { shots, seed, json } => sample(shots, seed, json),
    }
}

fn load_config(args: &SendArgs) -> Result<TransferConfig> {
    let mut config = match &args.config {
        Some(path) => TransferConfig::from_json_file(path)?,
        None => TransferConfig::default(),
    };
    if let Some(qubits) = args.qubits {
        config = config.with_num_qubits(qubits);
    }
    if let Some(threshold) = args.threshold {
        config = config.with_qber_threshold(threshold);
    }
    if let Some(min_key_length) = args.min_key_length {
        config = config.with_min_key_length(min_key_length);
    }
    config.validate()?;
    Ok(config)
}

fn send(args: SendArgs) -> Result<()> {
    let config = load_config(&args)?;
    let plaintext = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let mut session = match args.seed {
        Some(seed) => Bb84Session::with_seed(config, seed),
        None => Bb84Session::new(config),
    };
    let outcome = session.transfer(&plaintext)?;

    let store = TransferStore::new();
    match &outcome {
        TransferOutcome::Rejected { reason, qber, stats } => {
            println!(
                "Key exchange failed: {reason}. QBER is {qber:.2}% (sifted {} of {} bits).",
                stats.sifted_length, stats.raw_length
            );
            return Ok(());
        }
        TransferOutcome::Success { qber, stats, .. } => {
            store.deliver(&args.recipient, &outcome);
            println!(
                "File transferred securely to {}. QBER: {qber:.2}% (sifted {} bits, final key {} bits).",
                args.recipient, stats.sifted_length, stats.final_key_length
            );
        }
    }

    if let Some(path) = &args.output {
        let envelope = store
            .get(&args.recipient)
            .context("envelope missing after delivery")?;
        fs::write(path, serde_json::to_string_pretty(&envelope)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "envelope written");
    }

    Ok(())
}

fn receive(path: PathBuf) -> Result<()> {
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let envelope: Envelope =
        serde_json::from_str(&raw).with_context(|| format!("invalid envelope {}", path.display()))?;
    if envelope.key.is_empty() {
        bail!("envelope {} carries an empty key", path.display());
    }
    println!("{}", envelope.open()?);
    Ok(())
}

fn sample(shots: usize, seed: Option<u64>, json: bool) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_rng(&mut rand::rng()),
    };
    let table = Sampler::new().basis_statistics(shots, &mut rng);

    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    println!("bit  prep  meas  zeros   ones    agreement");
    for row in &table {
        println!(
            "{:<4} {:<5} {:<5} {:<7} {:<7} {:.4}",
            u8::from(row.bit),
            row.prepared_in.to_string(),
            row.measured_in.to_string(),
            row.counts.zeros,
            row.counts.ones,
            row.agreement
        );
    }
    Ok(())
}
