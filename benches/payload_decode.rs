//! Payload codec benchmark suite.
//!
//! Benchmarks inbound frame decoding for the three shapes a device sends:
//! - Telemetry objects
//! - Full configuration dumps
//! - Plain-text status lines (JSON parse fails, raw fallback)
//!
//! Run with: cargo bench --bench payload_decode
//! Results saved to: target/criterion/

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rc_link::protocol::{default_channels, normalize_config};
use rc_link::{ConfigData, Payload, RadioMode, ReceiverInfo};

// ============================================================================
// Fixtures
// ============================================================================

fn telemetry_frame() -> String {
    r#"{"rssi_ground":-52,"rssi_air":-61,"battery_voltage":7.4,"firmware_version":"1.2.0","channel_outputs":[1500,1500,1000,1500]}"#
        .to_owned()
}

fn config_frame() -> String {
    let config = ConfigData {
        radio_mode: RadioMode::BtController,
        channel_settings: default_channels(),
    };
    Payload::structured(&config)
        .and_then(|payload| payload.encode())
        .expect("config fixture encodes")
}

fn status_frame() -> String {
    "status: link ok, 4 channels armed".to_owned()
}

// ============================================================================
// Benchmark: Decode
// ============================================================================

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    let frames = [
        ("telemetry", telemetry_frame()),
        ("config", config_frame()),
        ("raw_text", status_frame()),
    ];

    for (name, frame) in &frames {
        group.bench_with_input(BenchmarkId::new("payload", name), frame, |b, frame| {
            b.iter(|| Payload::decode(black_box(frame)));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Typed Parse
// ============================================================================

fn bench_typed_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("typed_parse");

    let telemetry = Payload::decode(&telemetry_frame());
    group.bench_function("receiver_info", |b| {
        b.iter(|| black_box(&telemetry).parse::<ReceiverInfo>());
    });

    let config = Payload::decode(&config_frame());
    group.bench_function("config_normalized", |b| {
        b.iter(|| {
            black_box(&config)
                .parse::<ConfigData>()
                .map(normalize_config)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_decode, bench_typed_parse);
criterion_main!(benches);
