//! Criterion benchmarks for the Koven frame codec and oven tick.
//!
//! The device encodes one event per tick and the platform decodes it, so the
//! interesting numbers are the per-frame costs and a full tick-to-bytes cycle.
//!
//! Run with:
//! ```bash
//! cargo bench --package koven-core --bench codec_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use koven_core::protocol::{crc16_usb, EVENT_FRAME_SIZE};
use koven_core::{
    decode_command, decode_event, encode_command, encode_event, encode_event_into, Command, Event,
    Oven, OvenState,
};

// ── Fixtures ──────────────────────────────────────────────────────────────────

fn make_baking_event() -> Event {
    Event {
        state: OvenState::Baking,
        current_temperature: 180,
        remaining_time: 421,
        programmed_duration: 600,
        programmed_temperature: 180,
    }
}

fn make_idle_event() -> Event {
    Oven::new().snapshot()
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

/// Benchmarks the checksum alone over the two frame bodies the protocol uses.
fn bench_checksum(c: &mut Criterion) {
    let mut group = c.benchmark_group("crc16_usb");
    for len in [8usize, 12] {
        let data: Vec<u8> = (0..len as u8).collect();
        group.bench_with_input(BenchmarkId::new("bytes", len), &data, |b, data| {
            b.iter(|| crc16_usb(black_box(data)))
        });
    }
    group.finish();
}

/// Benchmarks encoding both message kinds.
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    let start = Command::start(180, 600);
    group.bench_function("Command", |b| b.iter(|| encode_command(black_box(&start))));

    let events: &[(&str, Event)] = &[("Idle", make_idle_event()), ("Baking", make_baking_event())];
    for (name, event) in events {
        group.bench_with_input(BenchmarkId::new("Event", name), event, |b, event| {
            b.iter(|| encode_event(black_box(event)))
        });
    }

    // Stack buffer variant used where allocation matters.
    let event = make_baking_event();
    group.bench_function("Event_into_stack_buffer", |b| {
        b.iter(|| {
            let mut buf = [0u8; EVENT_FRAME_SIZE];
            encode_event_into(black_box(&event), &mut buf).expect("buffer fits a frame")
        })
    });

    group.finish();
}

/// Benchmarks decoding pre-encoded frames.
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    let command_bytes = encode_command(&Command::start(180, 600));
    group.bench_function("Command", |b| {
        b.iter(|| decode_command(black_box(&command_bytes)).expect("decode must succeed"))
    });

    let event_bytes = encode_event(&make_baking_event());
    group.bench_function("Event", |b| {
        b.iter(|| decode_event(black_box(&event_bytes)).expect("decode must succeed"))
    });

    group.finish();
}

/// Benchmarks one device cycle: tick the oven and encode the resulting event.
fn bench_tick_and_encode(c: &mut Criterion) {
    c.bench_function("tick_and_encode", |b| {
        let mut oven = Oven::new();
        oven.apply(&Command::start(i16::MAX, i16::MAX));
        b.iter(|| encode_event(black_box(&oven.tick())))
    });
}

criterion_group!(
    benches,
    bench_checksum,
    bench_encode,
    bench_decode,
    bench_tick_and_encode
);
criterion_main!(benches);
