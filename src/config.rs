//! Loading bean definitions from YAML or JSON documents.
//!
//! A document lists beans by id and type name. Type names resolve through a
//! [`TypeRegistry`], so every type a document names must be registered
//! there first.
//!
//! ```yaml
//! beans:
//!   - id: userRepository
//!     class: UserRepository
//!     constructor:
//!       args:
//!         - { value: "jdbc:h2:mem", type: string }
//!         - { value: root }
//!   - id: userService
//!     class: UserService
//!     properties:
//!       - { name: userRepository, ref: userRepository }
//!       - { name: maxAttempts, value: 5 }
//! ```

mod document;

use std::path::Path;

use tracing::{debug, info};

use crate::definition::{BeanDefinition, InjectionMode, ValueSource};
use crate::error::{DiError, DiResult};
use crate::introspection::TypeRegistry;
use crate::lifetime::Lifetime;

pub use document::{ArgEntry, BeanEntry, BeansDocument, ConstructorEntry, PropertyEntry, Scalar};

/// Syntax of a bean document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    #[default]
    Yaml,
    Json,
}

impl DocumentFormat {
    /// `.json` files are JSON; everything else is read as YAML.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }

    /// Parses `text` into a document; `origin` names it in errors.
    pub fn parse(self, text: &str, origin: &str) -> DiResult<BeansDocument> {
        let parsed = match self {
            DocumentFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
            DocumentFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        };
        parsed.map_err(|reason| DiError::Parse {
            origin: origin.to_string(),
            reason,
        })
    }
}

/// Turns bean documents into [`BeanDefinition`]s.
///
/// The loader is stateless apart from the borrowed type registry.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::config::{ConfigLoader, DocumentFormat};
/// use ferrous_ioc::{InjectionMode, TypeDescriptor, TypeRegistry, ValueType};
/// use std::sync::Arc;
///
/// struct Pool {
///     size: i32,
/// }
///
/// let mut types = TypeRegistry::new();
/// types.register_descriptor(Arc::new(
///     TypeDescriptor::builder::<Pool>()
///         .constructor(vec![ValueType::Integer], |args| Ok(Pool { size: args.get(0)? }))
///         .build(),
/// ));
///
/// let yaml = r#"
/// beans:
///   - id: pool
///     class: Pool
///     constructor:
///       args:
///         - { value: 8, type: int }
/// "#;
///
/// let definitions = ConfigLoader::new(&types).load_str(yaml, DocumentFormat::Yaml).unwrap();
/// assert_eq!(definitions[0].id(), "pool");
/// assert_eq!(definitions[0].injection_mode(), InjectionMode::Constructor);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ConfigLoader<'a> {
    types: &'a TypeRegistry,
}

impl<'a> ConfigLoader<'a> {
    pub fn new(types: &'a TypeRegistry) -> Self {
        Self { types }
    }

    /// Reads and converts the document at `path`.
    pub fn load_file(&self, path: impl AsRef<Path>) -> DiResult<Vec<BeanDefinition>> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|e| DiError::Io {
            path: origin.clone(),
            reason: e.to_string(),
        })?;
        self.load_text(&text, DocumentFormat::from_path(path), &origin)
    }

    /// Converts a document held in memory.
    pub fn load_str(&self, text: &str, format: DocumentFormat) -> DiResult<Vec<BeanDefinition>> {
        self.load_text(text, format, "<string>")
    }

    /// Converts an already parsed document.
    pub fn load_document(&self, document: &BeansDocument) -> DiResult<Vec<BeanDefinition>> {
        document
            .beans
            .iter()
            .enumerate()
            .map(|(position, entry)| self.definition(position, entry))
            .collect()
    }

    fn load_text(&self, text: &str, format: DocumentFormat, origin: &str) -> DiResult<Vec<BeanDefinition>> {
        let document = format.parse(text, origin)?;
        let definitions = self.load_document(&document)?;
        info!(origin, beans = definitions.len(), ?format, "loaded bean definitions");
        Ok(definitions)
    }

    fn definition(&self, position: usize, entry: &BeanEntry) -> DiResult<BeanDefinition> {
        let id = non_empty(entry.id.as_deref())
            .ok_or_else(|| DiError::MalformedDefinition(format!("bean #{position} has no id")))?;
        let class_name = non_empty(entry.class_name.as_deref())
            .ok_or_else(|| DiError::MalformedDefinition(format!("bean `{id}` has no class")))?;

        let descriptor = self.types.resolve(class_name)?;
        let lifetime = if entry.singleton.unwrap_or(true) { Lifetime::Singleton } else { Lifetime::Prototype };
        let mut definition = BeanDefinition::new(id, descriptor)
            .with_class_name(class_name)
            .with_lifetime(lifetime);

        if let Some(constructor) = &entry.constructor {
            definition.set_injection_mode(InjectionMode::Constructor);
            for arg in &constructor.args {
                let value_type = arg
                    .type_name
                    .as_deref()
                    .filter(|t| !t.is_empty())
                    .map(|t| self.types.resolve_value_type(t))
                    .transpose()?;
                let mut source = ValueSource::from_parts(
                    arg.value.as_ref().map(Scalar::to_text),
                    arg.reference.clone(),
                    value_type,
                );
                if let Some(index) = arg.index {
                    source = source.with_index(index);
                }
                definition.add_constructor_arg(source);
            }
        } else {
            // Properties or not, everything else starts from the default constructor
            definition.set_injection_mode(InjectionMode::Setter);
        }

        for property in &entry.properties {
            let name = non_empty(property.name.as_deref()).ok_or_else(|| {
                DiError::MalformedDefinition(format!("bean `{id}` has a property without a name"))
            })?;
            let source = ValueSource::from_parts(
                property.value.as_ref().map(Scalar::to_text),
                property.reference.clone(),
                None,
            );
            definition.add_property(name, source);
        }

        if let Some(mode) = entry.injection {
            definition.set_injection_mode(mode);
        }

        debug!(bean = id, class = class_name, mode = ?definition.injection_mode(), "parsed bean entry");
        Ok(definition)
    }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspection::{TypeDescriptor, ValueType};
    use std::sync::Arc;

    #[derive(Default)]
    struct Widget;

    fn types() -> TypeRegistry {
        let mut types = TypeRegistry::new();
        types.register_descriptor(Arc::new(TypeDescriptor::builder::<Widget>().default_constructor().build()));
        types
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(DocumentFormat::from_path("beans.json"), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path("beans.JSON"), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path("beans.yaml"), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path("beans"), DocumentFormat::Yaml);
    }

    #[test]
    fn test_missing_id_is_malformed() {
        let types = types();
        let err = ConfigLoader::new(&types)
            .load_str("beans:\n  - { class: Widget }\n", DocumentFormat::Yaml)
            .unwrap_err();
        assert!(matches!(err, DiError::MalformedDefinition(_)));
    }

    #[test]
    fn test_empty_class_is_malformed() {
        let types = types();
        let err = ConfigLoader::new(&types)
            .load_str("beans:\n  - { id: w, class: '' }\n", DocumentFormat::Yaml)
            .unwrap_err();
        assert!(matches!(err, DiError::MalformedDefinition(_)));
    }

    #[test]
    fn test_unknown_class() {
        let types = types();
        let err = ConfigLoader::new(&types)
            .load_str("beans:\n  - { id: w, class: Gadget }\n", DocumentFormat::Yaml)
            .unwrap_err();
        assert!(matches!(err, DiError::TypeResolution(name) if name == "Gadget"));
    }

    #[test]
    fn test_unknown_argument_type() {
        let types = types();
        let yaml = "beans:\n  - id: w\n    class: Widget\n    constructor:\n      args:\n        - { value: x, type: Nope }\n";
        let err = ConfigLoader::new(&types).load_str(yaml, DocumentFormat::Yaml).unwrap_err();
        assert!(matches!(err, DiError::TypeResolution(_)));
    }

    #[test]
    fn test_bare_entry_is_setter_mode_without_properties() {
        let types = types();
        let defs = ConfigLoader::new(&types)
            .load_str(r#"{"beans":[{"id":"w","class":"Widget","singleton":false}]}"#, DocumentFormat::Json)
            .unwrap();
        assert_eq!(defs[0].injection_mode(), InjectionMode::Setter);
        assert!(defs[0].properties().is_empty());
        assert!(!defs[0].is_singleton());
    }

    #[test]
    fn test_argument_types_resolved_through_aliases() {
        let types = types();
        let yaml = "beans:\n  - id: w\n    class: Widget\n    constructor:\n      args:\n        - { value: 3, type: java.lang.Integer }\n        - { ref: other }\n";
        let defs = ConfigLoader::new(&types).load_str(yaml, DocumentFormat::Yaml).unwrap();
        let args = defs[0].constructor_args();
        assert_eq!(args[0].value_type(), Some(ValueType::Integer));
        assert_eq!(args[0].value(), Some("3"));
        assert_eq!(args[1].reference_id(), Some("other"));
    }

    #[test]
    fn test_parse_error_names_origin() {
        let types = types();
        let err = ConfigLoader::new(&types).load_str("{not json", DocumentFormat::Json).unwrap_err();
        assert!(matches!(err, DiError::Parse { ref origin, .. } if origin == "<string>"));
    }
}
