// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Consumer: read back sealed records and open them.
//
// The consumer never decides whether a record is genuine. Each record yields a
// `Verification`; callers compare `recovered` against `stored` themselves.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use sensorsign_core::error::{Result, SensorsignError};
use sensorsign_core::types::{Ciphertext, Digest, Iv, Sample};
use sensorsign_crypto::{CryptoContext, decrypt_ciphertext};

use crate::record::RecordReader;

/// Outcome of opening one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verification {
    pub sample: Sample,
    pub ciphertext: Ciphertext,
    /// Digest recovered by decrypting `ciphertext`.
    pub recovered: Digest,
    /// Digest as written by the producer.
    pub stored: Digest,
}

impl Verification {
    pub fn matches(&self) -> bool {
        self.recovered == self.stored
    }
}

/// Hex rendering of a `Verification`, for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationRow {
    pub index: usize,
    pub sample: String,
    pub ciphertext: String,
    pub recovered: String,
    pub stored: String,
    pub matches: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsumerReport {
    pub records: usize,
    pub matched: usize,
    pub mismatched: usize,
    pub rows: Vec<VerificationRow>,
}

impl ConsumerReport {
    pub fn from_verifications(verifications: &[Verification]) -> Self {
        let rows: Vec<VerificationRow> = verifications
            .iter()
            .enumerate()
            .map(|(i, v)| VerificationRow {
                index: i + 1,
                sample: v.sample.to_string(),
                ciphertext: v.ciphertext.to_hex(),
                recovered: v.recovered.to_hex(),
                stored: v.stored.to_hex(),
                matches: v.matches(),
            })
            .collect();
        let matched = rows.iter().filter(|r| r.matches).count();
        Self {
            records: rows.len(),
            matched,
            mismatched: rows.len() - matched,
            rows,
        }
    }

    pub fn all_matched(&self) -> bool {
        self.mismatched == 0
    }
}

/// Read and open exactly `count` records from `input`.
///
/// Running out of input before `count` records is a `RecordFormat` error.
#[instrument(skip_all, fields(count = count))]
pub fn consume<R: BufRead>(
    ctx: &CryptoContext,
    iv: &Iv,
    count: usize,
    input: R,
) -> Result<Vec<Verification>> {
    let mut reader = RecordReader::new(input);
    let mut verifications = Vec::with_capacity(count);

    while verifications.len() < count {
        let Some(record) = reader.next_record()? else {
            return Err(SensorsignError::RecordFormat {
                record: reader.records_read() + 1,
                reason: format!(
                    "end of input after {} of {count} records",
                    reader.records_read()
                ),
            });
        };

        let recovered = decrypt_ciphertext(ctx, &record.ciphertext, iv)?;
        let verification = Verification {
            sample: record.sample,
            ciphertext: record.ciphertext,
            recovered,
            stored: record.digest,
        };
        if verification.matches() {
            debug!(record = reader.records_read(), "record opened");
        } else {
            warn!(
                record = reader.records_read(),
                %recovered,
                stored = %record.digest,
                "recovered digest differs from stored digest"
            );
        }
        verifications.push(verification);
    }

    info!(records = verifications.len(), "consumer run complete");
    Ok(verifications)
}

/// Open the record log at `path` and consume `count` records from it.
pub fn consume_file(
    ctx: &CryptoContext,
    iv: &Iv,
    count: usize,
    path: impl AsRef<Path>,
) -> Result<Vec<Verification>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    info!(path = %path.display(), "record log opened");
    consume(ctx, iv, count, BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::encode_record;
    use sensorsign_core::types::Record;
    use sensorsign_crypto::encrypt_digest;

    const KEY: &[u8] = b"abcdefghijklmnopqrstuvwxyz012345";

    fn keyed() -> CryptoContext {
        let mut ctx = CryptoContext::software().expect("init");
        ctx.set_key(KEY).expect("key");
        ctx
    }

    fn iv() -> Iv {
        Iv::from_slice(b"0123456789abcdef").expect("iv")
    }

    fn sealed(ctx: &mut CryptoContext, word: u16) -> Record {
        let sample = Sample::from_words(&[word; 8]);
        let digest = ctx.digest(sample.as_bytes()).expect("digest");
        let ciphertext = encrypt_digest(ctx, &digest, &iv()).expect("seal");
        Record {
            sample,
            digest,
            ciphertext,
        }
    }

    #[test]
    fn opens_well_formed_records() {
        let mut ctx = keyed();
        let text: String = (0..3).map(|w| encode_record(&sealed(&mut ctx, w))).collect();

        let verifications = consume(&ctx, &iv(), 3, text.as_bytes()).expect("consume");
        assert_eq!(verifications.len(), 3);
        assert!(verifications.iter().all(Verification::matches));

        let report = ConsumerReport::from_verifications(&verifications);
        assert_eq!(report.matched, 3);
        assert!(report.all_matched());
        assert_eq!(report.rows[2].index, 3);
    }

    #[test]
    fn stops_after_requested_count() {
        let mut ctx = keyed();
        let text: String = (0..5).map(|w| encode_record(&sealed(&mut ctx, w))).collect();
        let verifications = consume(&ctx, &iv(), 2, text.as_bytes()).expect("consume");
        assert_eq!(verifications.len(), 2);
    }

    #[test]
    fn short_log_is_an_error() {
        let mut ctx = keyed();
        let text = encode_record(&sealed(&mut ctx, 9));
        match consume(&ctx, &iv(), 2, text.as_bytes()) {
            Err(SensorsignError::RecordFormat { record, .. }) => assert_eq!(record, 2),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn tampered_digest_is_reported_not_raised() {
        let mut ctx = keyed();
        let mut record = sealed(&mut ctx, 4);
        record.digest = Digest::from_bytes([0xee; 32]);

        let verifications =
            consume(&ctx, &iv(), 1, encode_record(&record).as_bytes()).expect("consume");
        assert!(!verifications[0].matches());

        let report = ConsumerReport::from_verifications(&verifications);
        assert_eq!(report.mismatched, 1);
        assert!(!report.all_matched());
    }

    #[test]
    fn wrong_key_does_not_match() {
        let mut ctx = keyed();
        let text = encode_record(&sealed(&mut ctx, 1));

        let mut other = CryptoContext::software().expect("init");
        other.set_key(&[0x5a; 32]).expect("key");
        let verifications = consume(&other, &iv(), 1, text.as_bytes()).expect("consume");
        assert!(!verifications[0].matches());
    }

    #[test]
    fn unkeyed_context_is_refused() {
        let mut ctx = keyed();
        let text = encode_record(&sealed(&mut ctx, 1));
        let bare = CryptoContext::software().expect("init");
        assert!(matches!(
            consume(&bare, &iv(), 1, text.as_bytes()),
            Err(SensorsignError::NotInitialized(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = keyed();
        assert!(matches!(
            consume_file(&ctx, &iv(), 1, dir.path().join("absent.out")),
            Err(SensorsignError::Io(_))
        ));
    }
}
