use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ferrous_ioc::*;
use std::sync::Arc;

#[derive(Default)]
struct Repository {
    url: String,
}

#[derive(Default)]
struct Service {
    repository: Option<Arc<Repository>>,
    retries: i32,
}

fn repository() -> Arc<TypeDescriptor> {
    Arc::new(
        TypeDescriptor::builder::<Repository>()
            .default_constructor()
            .constructor(vec![ValueType::Text], |args| Ok(Repository { url: args.get(0)? }))
            .build(),
    )
}

fn service() -> Arc<TypeDescriptor> {
    Arc::new(
        TypeDescriptor::builder::<Service>()
            .default_constructor()
            .setter("setRepository", |s: &mut Service, r: Arc<Repository>| s.repository = Some(r))
            .setter("setRetries", |s: &mut Service, n: i32| s.retries = n)
            .build(),
    )
}

fn wired_container(service_lifetime: Lifetime) -> BeanContainer {
    let mut container = BeanContainer::new();
    container.register(
        BeanDefinition::new("repo", repository())
            .with_injection_mode(InjectionMode::Constructor)
            .with_constructor_arg(ValueSource::literal("jdbc:h2:mem")),
    );
    container.register(
        BeanDefinition::new("service", service())
            .with_injection_mode(InjectionMode::Setter)
            .with_lifetime(service_lifetime)
            .with_property("repository", ValueSource::reference("repo"))
            .with_property("retries", ValueSource::literal("3")),
    );
    container
}

// ===== Micro Benchmarks =====

fn bench_singleton_hit(c: &mut Criterion) {
    let mut container = wired_container(Lifetime::Singleton);
    let _ = container.get_bean("service").unwrap();

    c.bench_function("singleton_hit", |b| {
        b.iter(|| black_box(container.get_bean(black_box("service")).unwrap()))
    });
}

fn bench_prototype_setter(c: &mut Criterion) {
    let mut container = wired_container(Lifetime::Prototype);

    c.bench_function("prototype_setter_injection", |b| {
        b.iter(|| black_box(container.get_bean_as::<Service>("service").unwrap()))
    });
}

fn bench_context_lookup(c: &mut Criterion) {
    let context = ApplicationContext::from_parts(wired_container(Lifetime::Singleton), TypeRegistry::new());
    let _ = context.get_bean("service").unwrap();

    let mut group = c.benchmark_group("context_lookup");
    group.bench_function("by_id", |b| b.iter(|| black_box(context.get_bean_as::<Service>("service").unwrap())));
    group.bench_function("by_type_scan", |b| b.iter(|| black_box(context.get_bean_of::<Service>().unwrap())));
    group.finish();
}

fn bench_chain_depth(c: &mut Criterion) {
    #[derive(Default)]
    struct Link {
        next: Option<Arc<Link>>,
    }

    let link = Arc::new(
        TypeDescriptor::builder::<Link>()
            .default_constructor()
            .setter("setNext", |l: &mut Link, next: Arc<Link>| l.next = Some(next))
            .build(),
    );

    let mut group = c.benchmark_group("prototype_chain");
    for depth in [1usize, 8, 32] {
        let mut container = BeanContainer::new();
        for i in 0..depth {
            let mut definition = BeanDefinition::new(format!("link{i}"), link.clone())
                .with_injection_mode(InjectionMode::Setter)
                .with_lifetime(Lifetime::Prototype);
            if i + 1 < depth {
                definition.add_property("next", ValueSource::reference(format!("link{}", i + 1)));
            }
            container.register(definition);
        }
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
            b.iter(|| black_box(container.get_bean("link0").unwrap()))
        });
    }
    group.finish();
}

#[cfg(feature = "config")]
fn bench_document_loading(c: &mut Criterion) {
    let mut types = TypeRegistry::new();
    types.register_descriptor(repository());
    types.register_descriptor(service());

    let yaml: String = std::iter::once("beans:\n".to_string())
        .chain((0..50).map(|i| {
            format!(
                "  - id: repo{i}\n    class: Repository\n    constructor:\n      args:\n        - {{ value: \"jdbc:{i}\" }}\n  - id: service{i}\n    class: Service\n    properties:\n      - {{ name: repository, ref: repo{i} }}\n"
            )
        }))
        .collect();

    c.bench_function("load_100_bean_document", |b| {
        b.iter(|| black_box(ConfigLoader::new(&types).load_str(&yaml, DocumentFormat::Yaml).unwrap()))
    });
}

#[cfg(not(feature = "config"))]
fn bench_document_loading(_: &mut Criterion) {}

criterion_group!(
    benches,
    bench_singleton_hit,
    bench_prototype_setter,
    bench_context_lookup,
    bench_chain_depth,
    bench_document_loading
);
criterion_main!(benches);
