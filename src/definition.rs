//! Bean definitions: the declarative recipe a bean is built from.

use std::sync::Arc;

use crate::introspection::{Bean, TypeDescriptor, ValueType};
use crate::lifetime::Lifetime;

/// How a bean's dependencies are supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum InjectionMode {
    /// Arguments are resolved and passed to a declared constructor
    Constructor,
    /// Properties are written through `set<Property>` setters
    Setter,
    /// Properties are written directly to fields of the same name
    Field,
    /// No explicit strategy: the type's own dependency slots drive injection
    #[default]
    #[cfg_attr(feature = "config", serde(alias = "hybrid"))]
    Annotated,
}

/// A literal-or-reference value of a constructor argument or property.
///
/// A reference counts only when it is non-empty. A literal counts whenever
/// it is present, the empty string included. When both are set the
/// reference wins.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{ValueSource, ValueType};
///
/// let url = ValueSource::literal("jdbc:h2:mem").with_type(ValueType::Text);
/// assert_eq!(url.value(), Some("jdbc:h2:mem"));
/// assert!(!url.is_reference());
///
/// let repo = ValueSource::reference("userRepository");
/// assert_eq!(repo.reference_id(), Some("userRepository"));
///
/// assert!(ValueSource::literal("").is_supplied());
/// assert!(!ValueSource::reference("").is_supplied());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueSource {
    value: Option<String>,
    reference: Option<String>,
    value_type: Option<ValueType>,
    index: Option<usize>,
}

impl ValueSource {
    pub fn literal(value: impl Into<String>) -> Self {
        Self { value: Some(value.into()), ..Self::default() }
    }

    pub fn reference(id: impl Into<String>) -> Self {
        Self { reference: Some(id.into()), ..Self::default() }
    }

    /// Neither literal nor reference; resolves to nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a source from optional parts, as read from a document.
    pub fn from_parts(value: Option<String>, reference: Option<String>, value_type: Option<ValueType>) -> Self {
        Self { value, reference, value_type, index: None }
    }

    pub fn with_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    /// Explicit position among constructor arguments.
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// The referenced bean id, if non-empty.
    pub fn reference_id(&self) -> Option<&str> {
        self.reference.as_deref().filter(|r| !r.is_empty())
    }

    pub fn value_type(&self) -> Option<ValueType> {
        self.value_type
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_reference(&self) -> bool {
        self.reference_id().is_some()
    }

    /// Whether the source names a reference or carries a literal.
    pub fn is_supplied(&self) -> bool {
        self.is_reference() || self.value.is_some()
    }
}

/// Declarative recipe for one bean.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{BeanDefinition, InjectionMode, Lifetime, TypeDescriptor, ValueSource, ValueType};
/// use std::sync::Arc;
///
/// struct Repository {
///     url: String,
/// }
///
/// let descriptor = Arc::new(
///     TypeDescriptor::builder::<Repository>()
///         .constructor(vec![ValueType::Text], |args| Ok(Repository { url: args.get(0)? }))
///         .build(),
/// );
///
/// let definition = BeanDefinition::new("repo", descriptor)
///     .with_injection_mode(InjectionMode::Constructor)
///     .with_constructor_arg(ValueSource::literal("jdbc:x"))
///     .with_lifetime(Lifetime::Prototype);
///
/// assert_eq!(definition.id(), "repo");
/// assert_eq!(definition.class_name(), "Repository");
/// assert!(!definition.is_singleton());
/// assert_eq!(definition.constructor_args().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct BeanDefinition {
    id: String,
    class_name: String,
    bean_type: Arc<TypeDescriptor>,
    lifetime: Lifetime,
    injection_mode: InjectionMode,
    constructor_args: Vec<ValueSource>,
    properties: Vec<(String, ValueSource)>,
}

impl BeanDefinition {
    /// A singleton, annotation-driven definition of `bean_type`.
    pub fn new(id: impl Into<String>, bean_type: Arc<TypeDescriptor>) -> Self {
        Self {
            id: id.into(),
            class_name: bean_type.name().to_string(),
            bean_type,
            lifetime: Lifetime::Singleton,
            injection_mode: InjectionMode::Annotated,
            constructor_args: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// A definition of the [`Bean`] type `T`.
    pub fn of<T: Bean>(id: impl Into<String>) -> Self {
        Self::new(id, Arc::new(T::descriptor()))
    }

    // ----- Builder style -----

    /// Records the name the type was declared with.
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn with_lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn with_injection_mode(mut self, mode: InjectionMode) -> Self {
        self.injection_mode = mode;
        self
    }

    pub fn with_constructor_arg(mut self, arg: ValueSource) -> Self {
        self.add_constructor_arg(arg);
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, source: ValueSource) -> Self {
        self.add_property(name, source);
        self
    }

    // ----- In-place mutation -----

    pub fn set_lifetime(&mut self, lifetime: Lifetime) -> &mut Self {
        self.lifetime = lifetime;
        self
    }

    pub fn set_injection_mode(&mut self, mode: InjectionMode) -> &mut Self {
        self.injection_mode = mode;
        self
    }

    pub fn add_constructor_arg(&mut self, arg: ValueSource) -> &mut Self {
        self.constructor_args.push(arg);
        self
    }

    /// Adds a property; an existing property of the same name is replaced.
    pub fn add_property(&mut self, name: impl Into<String>, source: ValueSource) -> &mut Self {
        let name = name.into();
        match self.properties.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = source,
            None => self.properties.push((name, source)),
        }
        self
    }

    // ----- Accessors -----

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn bean_type(&self) -> &Arc<TypeDescriptor> {
        &self.bean_type
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    pub fn is_singleton(&self) -> bool {
        self.lifetime.is_singleton()
    }

    pub fn injection_mode(&self) -> InjectionMode {
        self.injection_mode
    }

    /// Constructor arguments in declaration order.
    pub fn constructor_args(&self) -> &[ValueSource] {
        &self.constructor_args
    }

    /// Constructor arguments in call order.
    ///
    /// Indexed arguments are ordered by index; unindexed ones keep their
    /// declaration order after them.
    pub fn ordered_constructor_args(&self) -> Vec<&ValueSource> {
        let mut args: Vec<&ValueSource> = self.constructor_args.iter().collect();
        if args.iter().any(|a| a.index().is_some()) {
            args.sort_by_key(|a| a.index().unwrap_or(usize::MAX));
        }
        args
    }

    /// Properties in declaration order.
    pub fn properties(&self) -> &[(String, ValueSource)] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&ValueSource> {
        self.properties.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }
}
