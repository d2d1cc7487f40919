//! Microbenchmarks for record normalization.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use gateway_listener::address::{swap_byte_order, to_display_address};
use gateway_listener::advertisement::{AdField, RawAdvertisement, extract};

fn raw_with_adv_name() -> RawAdvertisement {
    RawAdvertisement {
        timestamp_secs: 1_700_000_000.25,
        address_hex: "a6b5c4d3e2f1".to_string(),
        address_type: 0,
        event_type: 0,
        rssi: -60,
        adv: vec![AdField::new(1, "06"), AdField::new(9, "BenchTag")],
        rsp: vec![],
    }
}

fn raw_with_rsp_name() -> RawAdvertisement {
    RawAdvertisement {
        rsp: vec![AdField::new(8, "BenchTag")],
        adv: vec![AdField::new(1, "06")],
        ..raw_with_adv_name()
    }
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");

    let adv_named = raw_with_adv_name();
    group.bench_function("name_in_advertisement", |b| {
        b.iter(|| black_box(extract(black_box(&adv_named))))
    });

    let rsp_named = raw_with_rsp_name();
    group.bench_function("name_in_scan_response", |b| {
        b.iter(|| black_box(extract(black_box(&rsp_named))))
    });

    group.finish();
}

fn bench_address(c: &mut Criterion) {
    let mut group = c.benchmark_group("address");

    group.bench_function("to_display_address", |b| {
        b.iter(|| black_box(to_display_address(black_box("a6b5c4d3e2f1"))))
    });

    group.bench_function("swap_byte_order", |b| {
        b.iter(|| black_box(swap_byte_order(black_box("a6b5c4d3e2f1"))))
    });

    group.finish();
}

criterion_group!(benches, bench_extract, bench_address);
criterion_main!(benches);
