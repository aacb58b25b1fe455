#![no_main]

use ferrous_ioc::{BeanContainer, BeanDefinition, DiError, InjectionMode, Lifetime, TypeDescriptor, ValueSource};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

#[derive(Default)]
struct Vertex {
    edges: usize,
}

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let descriptor = Arc::new(
        TypeDescriptor::builder::<Vertex>()
            .default_constructor()
            .setter("setEdge", |v: &mut Vertex, _: Arc<Vertex>| v.edges += 1)
            .build(),
    );

    // Each byte pair declares a vertex and the vertex it references
    let count = (data.len() / 2).clamp(1, 32);
    let mut container = BeanContainer::new();
    for (i, pair) in data.chunks(2).take(count).enumerate() {
        let target = pair.get(1).copied().unwrap_or(0) as usize % (count + 1);
        let lifetime = if pair[0] % 3 == 0 { Lifetime::Prototype } else { Lifetime::Singleton };
        container.register(
            BeanDefinition::new(format!("v{i}"), descriptor.clone())
                .with_injection_mode(InjectionMode::Setter)
                .with_lifetime(lifetime)
                .with_property("edge", ValueSource::reference(format!("v{target}"))),
        );
    }

    for i in 0..count {
        match container.get_bean(&format!("v{i}")) {
            Ok(bean) => assert!(bean.is_some()),
            // The root may only lead into a cycle, so check the cycle itself
            Err(DiError::Circular { id, path }) => {
                assert_eq!(path.last(), Some(&id));
                assert!(path[..path.len() - 1].contains(&id));
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    container.destroy();
});
