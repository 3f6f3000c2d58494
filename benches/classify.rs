//! Classification benchmark suite.
//!
//! Measures per-frame classification cost for typical payloads of each
//! protocol, and frame log ingestion at different capacities.
//!
//! Run with: cargo bench --bench classify
//! Results saved to: target/criterion/

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use websocket_monitor::{
    BackendEvent, CapturedFrame, Classifier, FrameData, MonitorOptions, Session, SocketId,
};

// ============================================================================
// Benchmark Parameters
// ============================================================================

const PAYLOADS: &[(&str, &str)] = &[
    ("socket_io_event", r#"42["chat",{"text":"hello there"}]"#),
    ("socket_io_ack", r#"43/admin,17[{"ok":true,"n":[1,2,3]}]"#),
    ("sock_js_batch", r#"a["{\"id\":1}","{\"id\":2}"]"#),
    ("sock_js_heartbeat", "h"),
    ("wamp_call", r#"[48,7814135,{},"com.myapp.echo",["hi"]]"#),
    ("plain_json", r#"{"event":"tick","price":101.25}"#),
    ("plain_text", "a line of text no decoder accepts"),
];

const LOG_CAPACITIES: &[usize] = &[100, 5000];

// ============================================================================
// Benchmark: Classification
// ============================================================================

fn bench_classify(c: &mut Criterion) {
    let classifier = Classifier::new();

    let mut group = c.benchmark_group("classify");
    for &(name, payload) in PAYLOADS {
        group.throughput(Throughput::Bytes(payload.len() as u64));
        let id = BenchmarkId::from_parameter(name);
        group.bench_with_input(id, payload, |b, payload| {
            b.iter(|| classifier.classify(black_box(payload)));
        });
    }
    group.finish();
}

// ============================================================================
// Benchmark: Session Ingestion
// ============================================================================

fn bench_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest");
    group.throughput(Throughput::Elements(PAYLOADS.len() as u64));

    for &capacity in LOG_CAPACITIES {
        let options = MonitorOptions::new().with_max_frames(capacity);
        let id = BenchmarkId::new("frames", capacity);
        group.bench_with_input(id, &options, |b, options| {
            let mut session = Session::new(options);
            let mut time_stamp = 0u64;
            b.iter(|| {
                for &(_, payload) in PAYLOADS {
                    time_stamp += 1;
                    let data = FrameData::text(payload, time_stamp);
                    let captured = CapturedFrame::new(SocketId::new(1), false, data);
                    let _ = black_box(session.handle(BackendEvent::FrameReceived(captured)));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_classify, bench_ingest);
criterion_main!(benches);
