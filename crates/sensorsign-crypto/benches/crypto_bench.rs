// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the digest and cipher steps of one measurement
// cycle in the sensorsign-crypto crate.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use sensorsign_core::types::{Iv, Sample};
use sensorsign_crypto::{CryptoContext, encrypt_digest};
use sensorsign_transport::EmulatedAccelerator;

const KEY: &[u8] = b"abcdefghijklmnopqrstuvwxyz012345";
const IV: &[u8] = b"0123456789abcdef";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sample() -> Sample {
    Sample::from_words(&[0x01a2, 0x03ff, 0x0000, 0x0200, 0x0123, 0x0321, 0x03fe, 0x0001])
}

fn keyed(mut ctx: CryptoContext) -> CryptoContext {
    ctx.set_key(KEY).expect("set key");
    ctx
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Digest one 32-byte sample through each backend.
///
/// The hardware figure here is the emulated accelerator, so it measures the
/// framing overhead rather than the bus.
fn bench_digest(c: &mut Criterion) {
    let sample = sample();
    let mut group = c.benchmark_group("digest_sample");

    let mut software = keyed(CryptoContext::software().expect("init"));
    group.bench_function("software", |b| {
        b.iter(|| black_box(software.digest(black_box(sample.as_bytes())).expect("digest")));
    });

    let mut hardware = keyed(
        CryptoContext::with_transport(Box::new(EmulatedAccelerator::new()), 24_000_000)
            .expect("init"),
    );
    group.bench_function("emulated accelerator", |b| {
        b.iter(|| black_box(hardware.digest(black_box(sample.as_bytes())).expect("digest")));
    });

    group.finish();
}

/// Seal one digest with AES-256-CBC, including per-call key setup.
fn bench_seal_digest(c: &mut Criterion) {
    let mut ctx = keyed(CryptoContext::software().expect("init"));
    let digest = ctx.digest(sample().as_bytes()).expect("digest");
    let iv = Iv::from_slice(IV).expect("iv");

    c.bench_function("seal_digest (aes-256-cbc, 2 blocks)", |b| {
        b.iter(|| black_box(encrypt_digest(&ctx, black_box(&digest), &iv).expect("seal")));
    });
}

criterion_group!(benches, bench_digest, bench_seal_digest);
criterion_main!(benches);
