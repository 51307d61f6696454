// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// On-disk record log.
//
// Format, per record, three newline-terminated fields in fixed order:
//
//   <sample>       32 raw ASCII hex characters
//   <digest>       64 lowercase hex characters
//   <ciphertext>   64 lowercase hex characters
//
// No header, no count, no checksums. The reader is whitespace-tolerant (it
// reads whitespace-delimited tokens), but a truncated or malformed record is
// an error.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use sensorsign_core::error::{Result, SensorsignError};
use sensorsign_core::types::{Ciphertext, Digest, Record, Sample};

/// Append one record to `out`.
pub fn write_record<W: Write>(out: &mut W, record: &Record) -> Result<()> {
    out.write_all(record.sample.as_bytes())?;
    out.write_all(b"\n")?;
    out.write_all(record.digest.to_hex().as_bytes())?;
    out.write_all(b"\n")?;
    out.write_all(record.ciphertext.to_hex().as_bytes())?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Render one record exactly as it appears on disk.
pub fn encode_record(record: &Record) -> String {
    format!(
        "{}\n{}\n{}\n",
        record.sample,
        record.digest.to_hex(),
        record.ciphertext.to_hex()
    )
}

/// Sequential reader over a record log.
pub struct RecordReader<R> {
    input: R,
    pending: VecDeque<String>,
    /// 1-based index of the record being parsed, for error messages.
    index: usize,
    eof: bool,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            pending: VecDeque::new(),
            index: 0,
            eof: false,
        }
    }

    /// Number of records returned so far.
    pub fn records_read(&self) -> usize {
        self.index
    }

    /// Read the next record. `Ok(None)` only at a clean end of input.
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        let Some(sample) = self.next_token()? else {
            return Ok(None);
        };
        self.index += 1;

        let digest = self.require_token("digest")?;
        let ciphertext = self.require_token("ciphertext")?;

        let sample = Sample::from_ascii(sample.as_bytes()).map_err(|e| self.malformed(e))?;
        let digest = Digest::from_hex(&digest).map_err(|e| self.malformed(e))?;
        let ciphertext = Ciphertext::from_hex(&ciphertext).map_err(|e| self.malformed(e))?;

        Ok(Some(Record {
            sample,
            digest,
            ciphertext,
        }))
    }

    fn require_token(&mut self, field: &str) -> Result<String> {
        self.next_token()?.ok_or_else(|| SensorsignError::RecordFormat {
            record: self.index,
            reason: format!("truncated before {field} field"),
        })
    }

    fn malformed(&self, err: SensorsignError) -> SensorsignError {
        let reason = match err {
            SensorsignError::InvalidArgument(reason) => reason,
            other => other.to_string(),
        };
        SensorsignError::RecordFormat {
            record: self.index,
            reason,
        }
    }

    fn next_token(&mut self) -> Result<Option<String>> {
        while self.pending.is_empty() && !self.eof {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                self.eof = true;
                break;
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_owned));
        }
        Ok(self.pending.pop_front())
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(seed: u8) -> Record {
        Record {
            sample: Sample::from_words(&[u16::from(seed); 8]),
            digest: Digest::from_bytes([seed; 32]),
            ciphertext: Ciphertext::from_bytes([seed.wrapping_mul(3); 32]),
        }
    }

    #[test]
    fn layout_is_three_lines() {
        let text = encode_record(&record(0xab));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "00ab".repeat(8));
        assert_eq!(lines[1], "ab".repeat(32));
        assert_eq!(lines[2], "01".repeat(32));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn write_matches_encode() {
        let mut out = Vec::new();
        write_record(&mut out, &record(7)).expect("write");
        assert_eq!(String::from_utf8(out).expect("utf8"), encode_record(&record(7)));
    }

    #[test]
    fn reads_back_records_in_order() {
        let mut text = String::new();
        for seed in 1..=3 {
            text.push_str(&encode_record(&record(seed)));
        }
        let reader = RecordReader::new(text.as_bytes());
        let records: Vec<Record> = reader.collect::<Result<_>>().expect("parse");
        assert_eq!(records, vec![record(1), record(2), record(3)]);
    }

    #[test]
    fn tolerates_blank_lines_and_padding() {
        let text = format!("\n  {}\n\n", encode_record(&record(5)).replace('\n', "  \n"));
        let mut reader = RecordReader::new(text.as_bytes());
        assert_eq!(reader.next_record().expect("parse"), Some(record(5)));
        assert_eq!(reader.next_record().expect("eof"), None);
        assert_eq!(reader.records_read(), 1);
    }

    #[test]
    fn truncated_record_is_an_error() {
        let text = encode_record(&record(2));
        let cut = &text[..text.len() - 66];
        let mut reader = RecordReader::new(cut.as_bytes());
        match reader.next_record() {
            Err(SensorsignError::RecordFormat { record, reason }) => {
                assert_eq!(record, 1);
                assert!(reason.contains("ciphertext"), "{reason}");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn bad_hex_is_an_error() {
        let text = format!("{}\n{}\n{}\n", "0".repeat(32), "zz".repeat(32), "00".repeat(32));
        let mut reader = RecordReader::new(text.as_bytes());
        assert!(matches!(
            reader.next_record(),
            Err(SensorsignError::RecordFormat { record: 1, .. })
        ));
    }

    #[test]
    fn short_sample_is_an_error() {
        let text = format!("{}\n{}\n{}\n", "0".repeat(31), "00".repeat(32), "00".repeat(32));
        let mut reader = RecordReader::new(text.as_bytes());
        assert!(matches!(
            reader.next_record(),
            Err(SensorsignError::RecordFormat { .. })
        ));
    }
}
