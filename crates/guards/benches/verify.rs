//! Benchmarks for query and webhook verification.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use shopify_guards::{
    sign_body, sign_query, verify_body, verify_query_at, QueryParams, RequestDescriptor,
};
use shopify_guards_core::config::SettingsOverrides;

const SECRET: &str = "0123456789abcdef0123456789abcdef";

fn bench_query(c: &mut Criterion) {
    let settings = SettingsOverrides::new().api_secret_key(SECRET).resolve();
    let params = QueryParams::new()
        .with("shop", "bench-store.myshopify.com")
        .with("code", "0907a61c0c8d55e99db179b68161bc00")
        .with("host", "YWRtaW4uc2hvcGlmeS5jb20vc3RvcmUvYmVuY2g")
        .with("timestamp", "1700000000");
    let hmac = sign_query(&params, SECRET.as_bytes(), "hmac");
    let req = RequestDescriptor::get().with_query(params.with("hmac", hmac));

    c.bench_function("verify_query", |b| {
        b.iter(|| verify_query_at(black_box(&req), black_box(&settings), 1_700_000_010))
    });
}

fn bench_webhook(c: &mut Criterion) {
    let settings = SettingsOverrides::new().api_secret_key(SECRET).resolve();
    let mut group = c.benchmark_group("verify_body");

    for size in [128usize, 4 * 1024, 64 * 1024].iter() {
        let body = vec![b'x'; *size];
        let req = RequestDescriptor::post()
            .with_header("x-shopify-hmac-sha256", sign_body(&body, SECRET.as_bytes()))
            .with_raw_body(body);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| verify_body(black_box(&req), black_box(&settings)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_query, bench_webhook);
criterion_main!(benches);
