// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sensorsign Pipeline — the producer and consumer cycles and the text record
// log that connects them. The producer signs samples into the log; the
// consumer reads them back and opens each seal.

pub mod acquire;
pub mod consumer;
pub mod producer;
pub mod record;

pub use acquire::{ConstantSource, RandomSource, SampleSource, acquire, source_for};
pub use consumer::{ConsumerReport, Verification, consume, consume_file};
pub use producer::{ProducerReport, produce, produce_to_file};
pub use record::{RecordReader, encode_record, write_record};
