use criterion::{criterion_group, criterion_main, Criterion};
use jitlog::signature::class_name_from_signature;

fn bench_class_name(c: &mut Criterion) {
    c.bench_function("class_name_short", |b| {
        b.iter(|| {
            let _ = class_name_from_signature("Ljava/lang/String;").unwrap();
        })
    });

    c.bench_function("class_name_deep_package", |b| {
        b.iter(|| {
            let _ = class_name_from_signature(
                "Lcom/example/app/internal/codegen/GeneratedHandlerFactoryImpl;",
            )
            .unwrap();
        })
    });

    c.bench_function("class_name_malformed", |b| {
        b.iter(|| {
            let _ = class_name_from_signature("Lcom/example/Unterminated");
        })
    });
}

criterion_group!(benches, bench_class_name);
criterion_main!(benches);
