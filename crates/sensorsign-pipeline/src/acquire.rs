// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sample acquisition — eight sequential 16-bit readings per sample.
//
// The sensor itself is an external collaborator behind `SampleSource`. Boards
// with an ADC implement the trait; everything else uses the random or
// constant sources below.

use ring::rand::{SecureRandom, SystemRandom};
use tracing::trace;

use sensorsign_core::config::SourceKind;
use sensorsign_core::error::{Result, SensorsignError};
use sensorsign_core::types::{SAMPLE_WORDS, Sample};

/// Anything that yields raw 16-bit readings, one at a time.
pub trait SampleSource {
    fn read_word(&mut self) -> Result<u16>;
}

/// Acquire one sample: eight reads, rendered as `%04x` groups.
pub fn acquire(source: &mut dyn SampleSource) -> Result<Sample> {
    let mut words = [0u16; SAMPLE_WORDS];
    for word in &mut words {
        *word = source.read_word()?;
    }
    let sample = Sample::from_words(&words);
    trace!(%sample, "sample acquired");
    Ok(sample)
}

/// Build the source named in the config.
pub fn source_for(kind: SourceKind) -> Box<dyn SampleSource> {
    match kind {
        SourceKind::Random => Box::new(RandomSource::new()),
        SourceKind::Zero => Box::new(ConstantSource(0)),
    }
}

/// Random readings, for boards with nothing attached to probe.
pub struct RandomSource {
    rng: SystemRandom,
}

impl RandomSource {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleSource for RandomSource {
    fn read_word(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.rng
            .fill(&mut buf)
            .map_err(|_| SensorsignError::Acquisition("system random source failed".into()))?;
        Ok(u16::from_le_bytes(buf))
    }
}

/// Always reads the same value.
#[derive(Debug, Clone, Copy)]
pub struct ConstantSource(pub u16);

impl SampleSource for ConstantSource {
    fn read_word(&mut self) -> Result<u16> {
        Ok(self.0)
    }
}
