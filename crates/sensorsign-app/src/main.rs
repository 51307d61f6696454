// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sensorsign — signed sensor record producer and verifier.
//
// Entry point. Initialises logging, resolves configuration, and runs either
// the producer or the consumer against the record log.

mod paths;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{error, info, warn};

use sensorsign_core::PipelineConfig;
use sensorsign_core::config::{DigestMode, SourceKind};
use sensorsign_core::error::Result;
use sensorsign_core::types::{Iv, SecretKey};
use sensorsign_crypto::CryptoContext;
use sensorsign_pipeline::{
    ConsumerReport, ProducerReport, Verification, consume_file, produce_to_file, source_for,
};

/// Sign sensor samples into a record log and verify them again
#[derive(Parser, Debug)]
#[command(name = "sensorsign")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Acquire samples, digest and seal them, and append records to the log
    Produce(ProduceArgs),
    /// Read records back and open each seal
    Consume(ConsumeArgs),
    /// Write the default configuration as JSON
    InitConfig {
        /// Destination file
        path: PathBuf,
    },
}

#[derive(Args, Debug)]
struct ProduceArgs {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Record log to append to
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Number of records to produce
    #[arg(short = 'n', long)]
    cycles: Option<usize>,
    /// Digest path
    #[arg(long, value_enum)]
    digest: Option<DigestArg>,
    /// Sample source
    #[arg(long, value_enum)]
    source: Option<SourceArg>,
    /// Truncate the record log instead of appending
    #[arg(long)]
    fresh: bool,
    /// Pause for Enter before the first transfer (accelerator reset window)
    #[arg(long)]
    wait_for_reset: bool,
    /// Print the timing report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ConsumeArgs {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Record log to read
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Number of records to verify
    #[arg(short = 'n', long)]
    records: Option<usize>,
    /// Print the verification report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DigestArg {
    Software,
    Hardware,
}

impl From<DigestArg> for DigestMode {
    fn from(arg: DigestArg) -> Self {
        match arg {
            DigestArg::Software => DigestMode::Software,
            DigestArg::Hardware => DigestMode::Hardware,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceArg {
    Random,
    Zero,
}

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Random => SourceKind::Random,
            SourceArg::Zero => SourceKind::Zero,
        }
    }
}

impl ProduceArgs {
    fn apply(&self, config: &mut PipelineConfig) {
        if let Some(output) = &self.output {
            config.record_path = output.clone();
        }
        if let Some(cycles) = self.cycles {
            config.produce_cycles = cycles;
        }
        if let Some(digest) = self.digest {
            config.digest = digest.into();
        }
        if let Some(source) = self.source {
            config.source = source.into();
        }
    }
}

impl ConsumeArgs {
    fn apply(&self, config: &mut PipelineConfig) {
        if let Some(input) = &self.input {
            config.record_path = input.clone();
        }
        if let Some(records) = self.records {
            config.consume_records = records;
        }
    }
}

fn main() -> ExitCode {
    // Logs go to stderr so `--json` output on stdout stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Produce(args) => produce(&args),
        Command::Consume(args) => consume(&args),
        Command::InitConfig { path } => init_config(path),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            error!(error = %e, "sensorsign failed");
            ExitCode::FAILURE
        }
    }
}

fn resolve<F>(
    config_path: Option<&Path>,
    apply: F,
) -> Result<(PipelineConfig, SecretKey, Iv)>
where
    F: FnOnce(&mut PipelineConfig),
{
    let mut config = paths::load_config(config_path)?;
    apply(&mut config);
    config.validate()?;
    let key = config.secret_key()?;
    let iv = config.iv()?;
    warn!("record log sealed with a fixed IV; equal digests give equal ciphertexts");
    Ok((config, key, iv))
}

fn produce(args: &ProduceArgs) -> Result<bool> {
    let (config, key, iv) = resolve(args.config.as_deref(), |c| args.apply(c))?;
    info!(
        mode = ?config.digest,
        cycles = config.produce_cycles,
        path = %config.record_path.display(),
        "producer starting"
    );

    let mut ctx = CryptoContext::initialize(config.digest, &config.transport)?;
    if args.wait_for_reset {
        wait_for_reset()?;
    }

    let outcome = run_producer(&mut ctx, &config, &key, &iv, args.fresh);
    let closed = ctx.terminate();
    let report = outcome?;
    closed?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_timing(&report);
    }
    Ok(true)
}

fn run_producer(
    ctx: &mut CryptoContext,
    config: &PipelineConfig,
    key: &SecretKey,
    iv: &Iv,
    fresh: bool,
) -> Result<ProducerReport> {
    ctx.set_key(key.expose())?;
    let mut source = source_for(config.source);
    produce_to_file(
        ctx,
        source.as_mut(),
        iv,
        config.produce_cycles,
        &config.record_path,
        fresh,
    )
}

fn consume(args: &ConsumeArgs) -> Result<bool> {
    let (config, key, iv) = resolve(args.config.as_deref(), |c| args.apply(c))?;
    info!(
        records = config.consume_records,
        path = %config.record_path.display(),
        "consumer starting"
    );

    // Opening seals never digests, so the accelerator is not needed here.
    let mut ctx = CryptoContext::software()?;
    let outcome = ctx
        .set_key(key.expose())
        .and_then(|()| consume_file(&ctx, &iv, config.consume_records, &config.record_path));
    let closed = ctx.terminate();
    let verifications = outcome?;
    closed?;

    let report = ConsumerReport::from_verifications(&verifications);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_verifications(&verifications);
        println!("Verified {} of {} records", report.matched, report.records);
    }
    if !report.all_matched() {
        warn!(mismatched = report.mismatched, "some records failed verification");
    }
    Ok(report.all_matched())
}

fn init_config(path: PathBuf) -> Result<bool> {
    PipelineConfig::default().save(&path)?;
    info!(path = %path.display(), "default config written");
    Ok(true)
}

fn wait_for_reset() -> Result<()> {
    print!("Program or reset the accelerator and press Enter...");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(())
}

fn print_timing(report: &ProducerReport) {
    println!("Done. Elapsed hash time: {} us", report.digest_us);
    println!(
        "Done. Elapsed hash time per record: {} us",
        report.digest_us_per_record
    );
    println!("Done. Elapsed cipher time: {} us", report.cipher_us);
    println!("Done. Elapsed total time: {} us", report.total_us);
}

fn print_verifications(verifications: &[Verification]) {
    for v in verifications {
        println!("Signature: {}", v.ciphertext);
        println!("Decoded hash: {}", v.recovered);
        println!("Original hash: {}", v.stored);
        println!("Data: {}", v.sample);
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn produce_flags_override_config() {
        let cli = Cli::try_parse_from([
            "sensorsign",
            "produce",
            "--output",
            "run.out",
            "-n",
            "5",
            "--digest",
            "hardware",
            "--source",
            "zero",
            "--fresh",
        ])
        .expect("parse");
        let Command::Produce(args) = cli.command else {
            panic!("expected produce");
        };
        assert!(args.fresh);

        let mut config = PipelineConfig::default();
        args.apply(&mut config);
        assert_eq!(config.record_path, PathBuf::from("run.out"));
        assert_eq!(config.produce_cycles, 5);
        assert_eq!(config.digest, DigestMode::Hardware);
        assert_eq!(config.source, SourceKind::Zero);
    }

    #[test]
    fn consume_without_flags_keeps_config() {
        let cli = Cli::try_parse_from(["sensorsign", "consume"]).expect("parse");
        let Command::Consume(args) = cli.command else {
            panic!("expected consume");
        };
        let mut config = PipelineConfig::default();
        args.apply(&mut config);
        assert_eq!(config.consume_records, 128);
        assert_eq!(config.record_path, PathBuf::from("data.out"));
    }

    #[test]
    fn unknown_digest_mode_is_rejected() {
        assert!(Cli::try_parse_from(["sensorsign", "produce", "--digest", "quantum"]).is_err());
    }

    #[test]
    fn overrides_are_validated() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("pipeline.json");
        PipelineConfig::default().save(&path).expect("save");

        resolve(Some(&path), |_| {}).expect("defaults resolve");
        assert!(resolve(Some(&path), |c| c.produce_cycles = 0).is_err());
    }
}
