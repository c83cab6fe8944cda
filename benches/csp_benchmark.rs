use actix_web::http::header::HeaderMap;
use actix_web_csp_nonce::{
    middleware::BufferingRewriter, utils::replace_all_into, CspConfig, CspTemplate,
    NonceGenerator, OsEntropy, NONCE_PLACEHOLDER,
};
use bytes::BytesMut;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;

fn sample_page(scripts: usize) -> Vec<u8> {
    let mut page = String::from("<!DOCTYPE html><html><head></head><body>");
    for i in 0..scripts {
        page.push_str(&format!(
            "<script nonce=\"{{nonce}}\">console.log({});</script><p>filler paragraph {}</p>",
            i, i
        ));
    }
    page.push_str("</body></html>");
    page.into_bytes()
}

fn benchmark_nonce_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("nonce_generation");

    let generator = NonceGenerator::new();
    let generator_pooled = NonceGenerator::with_capacity(32, Arc::new(OsEntropy));

    group.bench_function("nonce", |b| {
        b.iter(|| black_box(generator.generate().unwrap().as_str().len()))
    });

    group.bench_function("nonce_pooled", |b| {
        b.iter(|| black_box(generator_pooled.generate().unwrap().as_str().len()))
    });

    group.finish();
}

fn benchmark_template_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("template_render");

    let fixed = CspTemplate::new("default-src 'self'; script-src 'self' https://cdn.example.com");
    let nonce = CspTemplate::new("default-src 'self'; script-src {nonce}; style-src {nonce}");

    group.bench_function("fixed_header", |b| {
        b.iter(|| black_box(fixed.header_value().unwrap()))
    });

    group.bench_function("nonce_header", |b| {
        b.iter(|| black_box(nonce.render_header_value("AAAAAAAAAAAAAAAAAAAAAA").unwrap()))
    });

    group.finish();
}

fn benchmark_body_rewrite(c: &mut Criterion) {
    let mut group = c.benchmark_group("body_rewrite");

    let small = sample_page(2);
    let large = sample_page(2000);

    group.bench_function("replace_small", |b| {
        b.iter(|| {
            let mut out = BytesMut::with_capacity(small.len() + 64);
            black_box(replace_all_into(
                &mut out,
                black_box(&small),
                NONCE_PLACEHOLDER.as_bytes(),
                b"AAAAAAAAAAAAAAAAAAAAAA",
            ))
        })
    });

    group.bench_function("replace_large", |b| {
        b.iter(|| {
            let mut out = BytesMut::with_capacity(large.len() + 64);
            black_box(replace_all_into(
                &mut out,
                black_box(&large),
                NONCE_PLACEHOLDER.as_bytes(),
                b"AAAAAAAAAAAAAAAAAAAAAA",
            ))
        })
    });

    let config = Arc::new(CspConfig::new("script-src {nonce}").unwrap());
    let rewriter = BufferingRewriter::new(config);

    group.bench_function("full_rewrite_small", |b| {
        b.iter(|| {
            let mut headers = HeaderMap::new();
            black_box(rewriter.rewrite(&mut headers, black_box(&small)).unwrap())
        })
    });

    group.bench_function("full_rewrite_large", |b| {
        b.iter(|| {
            let mut headers = HeaderMap::new();
            black_box(rewriter.rewrite(&mut headers, black_box(&large)).unwrap())
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_nonce_generation,
    benchmark_template_render,
    benchmark_body_rewrite
);
criterion_main!(benches);
