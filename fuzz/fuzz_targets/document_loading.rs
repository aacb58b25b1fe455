#![no_main]

use ferrous_ioc::{ApplicationContext, DocumentFormat};
use libfuzzer_sys::fuzz_target;

#[derive(Default)]
struct Target {
    name: String,
    size: i32,
}

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let Ok(text) = std::str::from_utf8(rest) else {
        return;
    };
    let format = if selector % 2 == 0 { DocumentFormat::Yaml } else { DocumentFormat::Json };

    let context = ApplicationContext::new();
    context.register_descriptor(std::sync::Arc::new(
        ferrous_ioc::TypeDescriptor::builder::<Target>()
            .default_constructor()
            .constructor(vec![ferrous_ioc::ValueType::Text], |args| {
                Ok(Target { name: args.get(0)?, size: 0 })
            })
            .setter("setName", |t: &mut Target, name: String| t.name = name)
            .setter("setSize", |t: &mut Target, size: i32| t.size = size)
            .build(),
    ));

    // Any document either loads or is rejected with an error; every loaded
    // bean either builds or fails with an error
    if context.load_str(text, format).is_ok() {
        for id in context.bean_definition_names() {
            let _ = context.get_bean(&id);
        }
    }
    context.close();
});
