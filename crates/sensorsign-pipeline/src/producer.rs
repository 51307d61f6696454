// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Producer — acquire, digest, seal, append; repeated a fixed number of times.
//
// Any failure aborts the run. Records already appended stay on disk; the
// writer is flushed after every record so a crash loses at most the record in
// flight.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument};

use sensorsign_core::error::Result;
use sensorsign_core::types::{Iv, Record};
use sensorsign_crypto::{CryptoContext, encrypt_digest};

use crate::acquire::{SampleSource, acquire};
use crate::record::write_record;

/// Wall-clock cost of the digest and cipher steps, summed over a run.
///
/// Diagnostic only; nothing in the pipeline depends on these numbers.
#[derive(Debug, Clone, Serialize)]
pub struct ProducerReport {
    pub started_at: DateTime<Utc>,
    pub records: usize,
    pub digest_us: u128,
    pub digest_us_per_record: u128,
    pub cipher_us: u128,
    pub total_us: u128,
}

impl ProducerReport {
    fn new(started_at: DateTime<Utc>, records: usize, digest: Duration, cipher: Duration) -> Self {
        let digest_us = digest.as_micros();
        let cipher_us = cipher.as_micros();
        Self {
            started_at,
            records,
            digest_us,
            digest_us_per_record: digest_us / records.max(1) as u128,
            cipher_us,
            total_us: digest_us + cipher_us,
        }
    }
}

/// Run `cycles` producer cycles, appending each record to `out`.
#[instrument(skip_all, fields(cycles = cycles, mode = ?ctx.digest_mode()))]
pub fn produce<W: Write>(
    ctx: &mut CryptoContext,
    source: &mut dyn SampleSource,
    iv: &Iv,
    cycles: usize,
    out: &mut W,
) -> Result<ProducerReport> {
    let started_at = Utc::now();
    let mut digest_time = Duration::ZERO;
    let mut cipher_time = Duration::ZERO;

    for cycle in 0..cycles {
        let sample = acquire(source)?;

        let then = Instant::now();
        let digest = ctx.digest(sample.as_bytes())?;
        digest_time += then.elapsed();

        let then = Instant::now();
        let ciphertext = encrypt_digest(ctx, &digest, iv)?;
        cipher_time += then.elapsed();

        write_record(
            out,
            &Record {
                sample,
                digest,
                ciphertext,
            },
        )?;
        out.flush()?;
        debug!(cycle, %sample, %digest, "record written");
    }

    let report = ProducerReport::new(started_at, cycles, digest_time, cipher_time);
    info!(
        records = report.records,
        digest_us = report.digest_us as u64,
        cipher_us = report.cipher_us as u64,
        "producer run complete"
    );
    Ok(report)
}

/// Open the record log for appending (`truncate` starts it afresh) and run
/// the producer against it.
pub fn produce_to_file(
    ctx: &mut CryptoContext,
    source: &mut dyn SampleSource,
    iv: &Iv,
    cycles: usize,
    path: impl AsRef<Path>,
    truncate: bool,
) -> Result<ProducerReport> {
    let path = path.as_ref();
    let mut options = OpenOptions::new();
    options.create(true);
    if truncate {
        options.write(true).truncate(true);
    } else {
        options.append(true);
    }
    let file = options.open(path)?;
    info!(path = %path.display(), truncate, "record log opened");

    let mut out = BufWriter::new(file);
    produce(ctx, source, iv, cycles, &mut out)
}
