//! Integration benchmark for the advertisement processing pipeline.
//!
//! Benchmarks the full dispatch loop using the same patterns as the
//! integration tests in app.rs - with a FakeGateway feeding report batches
//! through dispatch_loop.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use gateway_listener::advertisement::{AdField, RawAdvertisement};
use gateway_listener::app::dispatch_loop;
use gateway_listener::filter::{MatchAll, MatchName};
use gateway_listener::gateway::fake::FakeGateway;
use gateway_listener::gateway::{ALL_DEVICES, GatewayReport, GatewaySession};
use gateway_listener::output::csv::CsvSink;
use gateway_listener::scan::{ScanOrchestrator, ScanSession};
use std::io;
use std::sync::Arc;
use tokio::runtime::Runtime;

fn raw(name: &str, rssi: i16) -> RawAdvertisement {
    RawAdvertisement {
        timestamp_secs: 1_700_000_000.25,
        address_hex: "a6b5c4d3e2f1".to_string(),
        address_type: 0,
        event_type: 0,
        rssi,
        adv: vec![AdField::new(9, name)],
        rsp: vec![],
    }
}

fn batch(size: usize) -> GatewayReport {
    GatewayReport::Advertisements((0..size).map(|i| raw("BenchTag", -(i as i16) - 40)).collect())
}

fn harness() -> (Arc<FakeGateway>, ScanOrchestrator) {
    let fake = Arc::new(FakeGateway::new());
    let session = Arc::new(ScanSession::default());
    let orchestrator =
        ScanOrchestrator::new(Arc::clone(&fake) as Arc<dyn GatewaySession>, session);
    (fake, orchestrator)
}

/// Benchmark the full loop: report batch -> extract -> filter -> console write
fn bench_dispatch_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_pipeline");
    let rt = Runtime::new().unwrap();

    for batch_size in [1, 10, 100] {
        group.throughput(Throughput::Elements(batch_size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            &batch_size,
            |b, &size| {
                b.iter(|| {
                    let (fake, orchestrator) = harness();
                    let events = fake.subscribe_events(ALL_DEVICES);
                    let reports = fake.subscribe_reports(ALL_DEVICES);
                    fake.push_report(batch(size));
                    fake.close_streams();

                    let mut out = Vec::<u8>::with_capacity(128 * size);
                    rt.block_on(async {
                        dispatch_loop(
                            &orchestrator,
                            &MatchAll,
                            events,
                            reports,
                            &mut None,
                            &mut out,
                        )
                        .await
                        .unwrap();
                    });

                    black_box(out)
                })
            },
        );
    }

    group.finish();
}

/// Benchmark with a name filter that drops every record
fn bench_filtered_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("filtered_pipeline");
    let rt = Runtime::new().unwrap();
    let filter = MatchName::new("OtherTag");

    group.throughput(Throughput::Elements(100));
    group.bench_function("100_filtered_out", |b| {
        b.iter(|| {
            let (fake, orchestrator) = harness();
            let events = fake.subscribe_events(ALL_DEVICES);
            let reports = fake.subscribe_reports(ALL_DEVICES);
            fake.push_report(batch(100));
            fake.close_streams();

            let mut out = Vec::<u8>::new();
            rt.block_on(async {
                dispatch_loop(&orchestrator, &filter, events, reports, &mut None, &mut out)
                    .await
                    .unwrap();
            });

            // everything was filtered out
            debug_assert!(out.is_empty());

            black_box(out)
        })
    });

    group.finish();
}

/// Benchmark with the CSV sink enabled alongside the console writer
fn bench_csv_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv_pipeline");
    let rt = Runtime::new().unwrap();

    group.throughput(Throughput::Elements(100));
    group.bench_function("100_with_csv_sink", |b| {
        b.iter(|| {
            let (fake, orchestrator) = harness();
            let events = fake.subscribe_events(ALL_DEVICES);
            let reports = fake.subscribe_reports(ALL_DEVICES);
            fake.push_report(batch(100));
            fake.close_streams();

            let mut sink = Some(CsvSink::from_writer(Box::new(io::sink()), true));
            let mut out = io::sink();
            rt.block_on(async {
                dispatch_loop(
                    &orchestrator,
                    &MatchAll,
                    events,
                    reports,
                    &mut sink,
                    &mut out,
                )
                .await
                .unwrap();
            });

            black_box(sink)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_dispatch_pipeline,
    bench_filtered_pipeline,
    bench_csv_pipeline,
);
criterion_main!(benches);
