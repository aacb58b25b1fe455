//! Runtime registry mapping type names to descriptors.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::introspection::descriptor::{Bean, TypeDescriptor};
use crate::introspection::value::ValueType;

/// Name-to-descriptor table used to resolve type names from documents.
///
/// Each descriptor is reachable under its full type name and its simple
/// name. When two types share a simple name, the later registration wins
/// that name; full names stay unambiguous.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Bean, TypeDescriptor, TypeRegistry, ValueType};
///
/// #[derive(Default)]
/// struct Cache;
///
/// impl Bean for Cache {
///     fn descriptor() -> TypeDescriptor {
///         TypeDescriptor::builder::<Cache>().default_constructor().build()
///     }
/// }
///
/// let mut types = TypeRegistry::new();
/// types.register::<Cache>();
///
/// assert!(types.resolve("Cache").is_ok());
/// assert!(types.resolve("Missing").is_err());
/// assert_eq!(types.resolve_value_type("long").unwrap(), ValueType::Long);
/// assert_eq!(types.resolve_value_type("Cache").unwrap(), ValueType::bean::<Cache>());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    by_name: HashMap<String, Arc<TypeDescriptor>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` using its [`Bean`] descriptor.
    pub fn register<T: Bean>(&mut self) -> Arc<TypeDescriptor> {
        self.register_descriptor(Arc::new(T::descriptor()))
    }

    /// Registers a prepared descriptor.
    pub fn register_descriptor(&mut self, descriptor: Arc<TypeDescriptor>) -> Arc<TypeDescriptor> {
        self.by_name.insert(descriptor.type_name().to_string(), descriptor.clone());
        self.by_name.insert(descriptor.name().to_string(), descriptor.clone());
        descriptor
    }

    /// Registers a descriptor under an additional name.
    pub fn register_alias(&mut self, alias: impl Into<String>, descriptor: Arc<TypeDescriptor>) {
        self.by_name.insert(alias.into(), descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<TypeDescriptor>> {
        self.by_name.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Descriptor for `name`, or a type resolution failure.
    pub fn resolve(&self, name: &str) -> DiResult<Arc<TypeDescriptor>> {
        self.by_name
            .get(name)
            .cloned()
            .ok_or_else(|| DiError::TypeResolution(name.to_string()))
    }

    /// Declared value type for a type-name token.
    ///
    /// The fixed primitive aliases win over registered names.
    pub fn resolve_value_type(&self, name: &str) -> DiResult<ValueType> {
        if let Some(primitive) = ValueType::from_alias(name) {
            return Ok(primitive);
        }
        self.resolve(name).map(|descriptor| ValueType::Bean(descriptor.key()))
    }
}
