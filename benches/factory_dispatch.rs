//! 直接構築と文字列ディスパッチのパフォーマンス比較ベンチマーク
//!
//! カタログ経由の生成・フォールバック・描画のコストを測定

use barcode_factory::object::code39::Code39;
use barcode_factory::object::BarcodeObject;
use barcode_factory::renderer::{BarcodeRenderer, ImageRenderer};
use barcode_factory::{Barcode, Config, ConfigSource, FactoryRequest};
use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// オブジェクト生成のベンチマーク
fn benchmark_object_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Object Creation");
    group.measurement_time(Duration::from_secs(10));

    let proxy = Barcode::new();
    let options = json!({"text": "HELLO", "barHeight": 40});

    group.bench_function("Direct", |b| {
        b.iter(|| {
            let mut barcode = Code39::new();
            barcode.set_option("text", &json!("HELLO")).unwrap();
            barcode.set_option("barHeight", &json!(40)).unwrap();
            std::hint::black_box(Arc::new(barcode))
        })
    });

    group.bench_function("Factory", |b| {
        b.iter(|| {
            let barcode = proxy.make_barcode("code39", options.clone()).unwrap();
            std::hint::black_box(barcode)
        })
    });

    group.bench_function("Factory (dispatch config)", |b| {
        let dispatch = Config::from_value(json!({
            "barcode": "code39",
            "barcodeParams": {"text": "HELLO", "barHeight": 40}
        }))
        .unwrap();
        b.iter(|| {
            let barcode = proxy
                .make_barcode(dispatch.clone(), ConfigSource::Absent)
                .unwrap();
            std::hint::black_box(barcode)
        })
    });

    group.finish();
}

/// レンダラー結合とフォールバックのベンチマーク
fn benchmark_factory(c: &mut Criterion) {
    let mut group = c.benchmark_group("Factory");
    group.measurement_time(Duration::from_secs(10));

    let proxy = Barcode::new();

    group.bench_function("Success", |b| {
        b.iter(|| {
            let renderer = proxy
                .factory(FactoryRequest::new("code39").with_barcode_config(json!({"text": "A"})))
                .unwrap();
            std::hint::black_box(renderer)
        })
    });

    group.bench_function("Error fallback", |b| {
        b.iter(|| {
            let renderer = proxy
                .factory(FactoryRequest::new("code39").with_barcode_config(json!({"barHeight": -1})))
                .unwrap();
            std::hint::black_box(renderer)
        })
    });

    group.finish();
}

/// 描画のベンチマーク
fn benchmark_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("Render");
    group.measurement_time(Duration::from_secs(10));

    let proxy = Barcode::new();
    let barcode = proxy
        .make_barcode("code39", json!({"text": "HELLO"}))
        .unwrap();

    group.bench_function("Direct", |b| {
        let renderer = ImageRenderer::new();
        b.iter(|| std::hint::black_box(renderer.render_object(barcode.as_ref()).unwrap()))
    });

    group.bench_function("Proxy draw", |b| {
        b.iter(|| {
            let output = proxy
                .draw(FactoryRequest::new(barcode.clone()))
                .unwrap();
            std::hint::black_box(output)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_object_creation,
    benchmark_factory,
    benchmark_render
);
criterion_main!(benches);
