//! # ferrous-ioc
//!
//! A definition-driven inversion-of-control container for Rust.
//!
//! Beans are described by [`BeanDefinition`]s (written in code, loaded from a
//! YAML/JSON document, or derived from a component type) and built lazily on
//! first retrieval. Dependencies are wired by constructor arguments, by
//! setters, by fields, or by the dependency slots a type declares on itself.
//!
//! ## Features
//!
//! - **Three injection strategies** plus annotation-driven wiring, behind one retrieval API
//! - **Singleton and prototype beans**: singletons are cached, prototypes built on every call
//! - **Lazy references**: definitions may name beans registered later
//! - **Circular dependency detection** with the full resolution path in the error
//! - **Lookup by id or by type**, with a fallback scan over registered beans
//! - **Bean documents** in YAML or JSON (`config` feature, on by default)
//!
//! Rust has no runtime reflection, so every bean type publishes a
//! [`TypeDescriptor`]: its constructors, setters, fields and dependency slots.
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_ioc::{
//!     ApplicationContext, BeanDefinition, InjectionMode, TypeDescriptor, ValueSource, ValueType,
//! };
//! use std::sync::Arc;
//!
//! struct Repository {
//!     url: String,
//! }
//!
//! #[derive(Default)]
//! struct Service {
//!     repository: Option<Arc<Repository>>,
//!     retries: i32,
//! }
//!
//! let repository = Arc::new(
//!     TypeDescriptor::builder::<Repository>()
//!         .constructor(vec![ValueType::Text], |args| Ok(Repository { url: args.get(0)? }))
//!         .build(),
//! );
//! let service = Arc::new(
//!     TypeDescriptor::builder::<Service>()
//!         .default_constructor()
//!         .setter("setRepository", |s: &mut Service, r: Arc<Repository>| s.repository = Some(r))
//!         .setter("setRetries", |s: &mut Service, n: i32| s.retries = n)
//!         .build(),
//! );
//!
//! let context = ApplicationContext::new();
//! context.register_bean_definition(
//!     BeanDefinition::new("repo", repository)
//!         .with_injection_mode(InjectionMode::Constructor)
//!         .with_constructor_arg(ValueSource::literal("jdbc:h2:mem")),
//! );
//! context.register_bean_definition(
//!     BeanDefinition::new("service", service)
//!         .with_injection_mode(InjectionMode::Setter)
//!         .with_property("repository", ValueSource::reference("repo"))
//!         .with_property("retries", ValueSource::literal("3")),
//! );
//!
//! let service = context.get_bean_as::<Service>("service").unwrap().unwrap();
//! let repo = context.get_bean_as::<Repository>("repo").unwrap().unwrap();
//! assert!(Arc::ptr_eq(service.repository.as_ref().unwrap(), &repo));
//! assert_eq!(service.retries, 3);
//! assert_eq!(repo.url, "jdbc:h2:mem");
//! ```
//!
//! ## Bean Documents
//!
//! ```rust
//! # #[cfg(feature = "config")]
//! # {
//! use ferrous_ioc::config::DocumentFormat;
//! use ferrous_ioc::{ApplicationContext, TypeDescriptor, TypeRegistry};
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Settings {
//!     level: String,
//! }
//!
//! let mut types = TypeRegistry::new();
//! types.register_descriptor(Arc::new(
//!     TypeDescriptor::builder::<Settings>()
//!         .default_constructor()
//!         .setter("setLevel", |s: &mut Settings, level: String| s.level = level)
//!         .build(),
//! ));
//!
//! let yaml = r#"
//! beans:
//!   - id: settings
//!     class: Settings
//!     properties:
//!       - { name: level, value: DEBUG }
//! "#;
//!
//! let context = ApplicationContext::from_str(yaml, DocumentFormat::Yaml, types).unwrap();
//! let settings = context.get_bean_of::<Settings>().unwrap().unwrap();
//! assert_eq!(settings.level, "DEBUG");
//! # }
//! ```
//!
//! ## Logging
//!
//! The crate emits `tracing` events (bean creation at `DEBUG`, cache hits at
//! `TRACE`, skipped properties at `WARN`, document loads at `INFO`). Install
//! any subscriber to see them, or attach a [`BeanObserver`].

pub mod container;
pub mod context;
pub mod definition;
pub mod error;
pub mod injector;
pub mod introspection;
pub mod key;
pub mod lifetime;
pub mod observer;
pub mod traits;

#[cfg(feature = "config")]
pub mod config;

// Internal modules
mod internal;

pub use container::BeanContainer;
pub use context::ApplicationContext;
pub use definition::{BeanDefinition, InjectionMode, ValueSource};
pub use error::{DiError, DiResult};
pub use injector::Injector;
pub use introspection::{
    setter_name, AnyArc, Arguments, Autowired, Bean, BoxedBean, ComponentMarker, ConstructorSpec,
    DependencySlot, FromValue, MemberKind, MemberSpec, NamingPolicy, SimpleNamePolicy,
    TypeDescriptor, TypeDescriptorBuilder, TypeRegistry, Value, ValueType,
};
pub use key::{key_of_type, simple_name_of, TypeKey};
pub use lifetime::Lifetime;
pub use observer::{BeanObserver, TracingObserver};
pub use traits::BeanResolver;

#[cfg(feature = "config")]
pub use config::{ConfigLoader, DocumentFormat};
