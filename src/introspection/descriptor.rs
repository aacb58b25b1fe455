//! Type descriptors: how the container constructs and wires one bean type.
//!
//! A descriptor is the stand-in for runtime reflection. It lists the
//! constructors a type offers, the setters and fields the container may
//! write, and the annotation-driven dependency slots the type opts into.
//! Descriptors are built once, usually in a [`Bean::descriptor`] impl, and
//! shared behind an `Arc`.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::introspection::value::{Arguments, FromValue, Value, ValueType};
use crate::key::TypeKey;

/// A freshly constructed, not yet shared bean.
pub type BoxedBean = Box<dyn Any + Send + Sync>;

pub(crate) type ErasedConstructor = Arc<dyn Fn(&Arguments) -> DiResult<BoxedBean> + Send + Sync>;
pub(crate) type ErasedMutator =
    Arc<dyn Fn(&mut (dyn Any + Send + Sync), Value) -> DiResult<()> + Send + Sync>;

/// A type the container knows how to build.
///
/// Implementing `Bean` enables the typed registration helpers such as
/// [`ApplicationContext::register_component`](crate::ApplicationContext::register_component).
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Bean, TypeDescriptor};
///
/// #[derive(Default)]
/// struct Mailer {
///     host: String,
/// }
///
/// impl Bean for Mailer {
///     fn descriptor() -> TypeDescriptor {
///         TypeDescriptor::builder::<Mailer>()
///             .default_constructor()
///             .setter("setHost", |m: &mut Mailer, host: String| m.host = host)
///             .build()
///     }
/// }
///
/// let descriptor = Mailer::descriptor();
/// assert_eq!(descriptor.name(), "Mailer");
/// assert!(descriptor.setter("setHost").is_some());
/// ```
pub trait Bean: Any + Send + Sync + Sized {
    fn descriptor() -> TypeDescriptor;
}

/// Member kind of an annotation-driven dependency slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Setter,
}

/// Injection marker settings for an annotation-driven dependency.
///
/// Dependencies are required unless marked [`optional`](Autowired::optional).
/// A qualifier names the bean id to inject; without one the id comes from
/// the container's naming policy applied to the member's declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Autowired {
    required: bool,
    qualifier: Option<String>,
}

impl Autowired {
    /// A required dependency (the default).
    pub fn required() -> Self {
        Self { required: true, qualifier: None }
    }

    /// A dependency that is skipped when no candidate bean exists.
    pub fn optional() -> Self {
        Self { required: false, qualifier: None }
    }

    /// Injects the bean registered under `id`.
    pub fn qualifier(mut self, id: impl Into<String>) -> Self {
        self.qualifier = Some(id.into());
        self
    }
}

impl Default for Autowired {
    fn default() -> Self {
        Self::required()
    }
}

/// One annotation-driven dependency of a type.
#[derive(Debug, Clone)]
pub struct DependencySlot {
    pub member: String,
    pub kind: MemberKind,
    /// Declared type of the member
    pub target: TypeKey,
    pub required: bool,
    pub qualifier: Option<String>,
}

/// Component marker: the type may be registered with `register_component`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentMarker {
    /// Explicit bean id; the naming policy applies when absent
    pub name: Option<String>,
}

/// A declared constructor: parameter types plus the function building the bean.
#[derive(Clone)]
pub struct ConstructorSpec {
    params: Vec<ValueType>,
    build: ErasedConstructor,
}

impl ConstructorSpec {
    pub fn params(&self) -> &[ValueType] {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Whether every present argument is assignable to its parameter.
    ///
    /// Absent arguments match any parameter.
    pub fn accepts(&self, args: &Arguments) -> bool {
        args.len() == self.params.len()
            && self
                .params
                .iter()
                .zip(args.iter())
                .all(|(param, arg)| arg.map_or(true, |value| param.accepts(value)))
    }

    pub(crate) fn invoke(&self, args: &Arguments) -> DiResult<BoxedBean> {
        (self.build)(args)
    }
}

/// A writable member: a setter or a field.
#[derive(Clone)]
pub struct MemberSpec {
    name: String,
    value_type: ValueType,
    apply: ErasedMutator,
}

impl MemberSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub(crate) fn apply(&self, instance: &mut (dyn Any + Send + Sync), value: Value) -> DiResult<()> {
        (self.apply)(instance, value)
    }
}

/// Construction and wiring metadata for one bean type.
///
/// See the [module documentation](self) and [`TypeDescriptorBuilder`].
#[derive(Clone)]
pub struct TypeDescriptor {
    key: TypeKey,
    default_constructor: Option<ErasedConstructor>,
    constructors: Vec<ConstructorSpec>,
    setters: Vec<MemberSpec>,
    fields: Vec<MemberSpec>,
    dependencies: Vec<DependencySlot>,
    component: Option<ComponentMarker>,
}

impl TypeDescriptor {
    /// Starts a descriptor for `T`.
    pub fn builder<T: Any + Send + Sync>() -> TypeDescriptorBuilder<T> {
        TypeDescriptorBuilder {
            descriptor: TypeDescriptor {
                key: TypeKey::of::<T>(),
                default_constructor: None,
                constructors: Vec::new(),
                setters: Vec::new(),
                fields: Vec::new(),
                dependencies: Vec::new(),
                component: None,
            },
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Simple name of the described type.
    pub fn name(&self) -> &'static str {
        self.key.simple_name()
    }

    /// Full type name of the described type.
    pub fn type_name(&self) -> &'static str {
        self.key.type_name()
    }

    pub fn has_default_constructor(&self) -> bool {
        self.default_constructor.is_some()
    }

    pub fn constructors(&self) -> &[ConstructorSpec] {
        &self.constructors
    }

    /// Setter registered under exactly `name`.
    pub fn setter(&self, name: &str) -> Option<&MemberSpec> {
        self.setters.iter().find(|s| s.name == name)
    }

    /// Field registered under exactly `name`.
    pub fn field(&self, name: &str) -> Option<&MemberSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn dependencies(&self) -> &[DependencySlot] {
        &self.dependencies
    }

    pub fn component(&self) -> Option<&ComponentMarker> {
        self.component.as_ref()
    }

    /// Builds an instance with the no-argument constructor.
    pub fn instantiate(&self) -> DiResult<BoxedBean> {
        match &self.default_constructor {
            Some(ctor) => ctor(&Arguments::default()),
            None => Err(DiError::Instantiation {
                type_name: self.type_name().to_string(),
                reason: "no default constructor".to_string(),
            }),
        }
    }

    /// Member targeted by a dependency slot.
    pub(crate) fn slot_member(&self, slot: &DependencySlot) -> Option<&MemberSpec> {
        match slot.kind {
            MemberKind::Field => self.field(&slot.member),
            MemberKind::Setter => self.setter(&slot.member),
        }
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_name", &self.key.type_name())
            .field("default_constructor", &self.default_constructor.is_some())
            .field(
                "constructors",
                &self.constructors.iter().map(ConstructorSpec::arity).collect::<Vec<_>>(),
            )
            .field("setters", &self.setters.iter().map(MemberSpec::name).collect::<Vec<_>>())
            .field("fields", &self.fields.iter().map(MemberSpec::name).collect::<Vec<_>>())
            .field("dependencies", &self.dependencies)
            .field("component", &self.component)
            .finish()
    }
}

/// Typed builder for [`TypeDescriptor`].
///
/// Closures receive the concrete `&mut T`; the builder erases them to work
/// on type-erased instances and checks the downcast at injection time.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Autowired, TypeDescriptor, ValueType};
/// use std::sync::Arc;
///
/// struct Repository {
///     url: String,
/// }
///
/// #[derive(Default)]
/// struct Service {
///     repository: Option<Arc<Repository>>,
///     retries: i32,
/// }
///
/// let repository = TypeDescriptor::builder::<Repository>()
///     .constructor(vec![ValueType::Text], |args| Ok(Repository { url: args.get(0)? }))
///     .build();
///
/// let service = TypeDescriptor::builder::<Service>()
///     .default_constructor()
///     .component("service")
///     .field("retries", |s: &mut Service, n: i32| s.retries = n)
///     .autowired_field("repository", Autowired::required(), |s: &mut Service, r: Arc<Repository>| {
///         s.repository = Some(r)
///     })
///     .build();
///
/// assert_eq!(repository.constructors()[0].arity(), 1);
/// assert_eq!(service.dependencies().len(), 1);
/// assert_eq!(service.dependencies()[0].target.simple_name(), "Repository");
/// ```
pub struct TypeDescriptorBuilder<T> {
    descriptor: TypeDescriptor,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync> TypeDescriptorBuilder<T> {
    /// Uses `T::default()` as the no-argument constructor.
    pub fn default_constructor(self) -> Self
    where
        T: Default,
    {
        self.default_constructor_with(T::default)
    }

    /// Uses `f` as the no-argument constructor.
    pub fn default_constructor_with<F>(mut self, f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let build: ErasedConstructor = Arc::new(move |_: &Arguments| Ok(Box::new(f()) as BoxedBean));
        self.descriptor.default_constructor = Some(build);
        self
    }

    /// Declares a constructor taking `params`.
    ///
    /// Constructors are matched on arity and argument assignability, in
    /// declaration order. An error returned by `f` is reported as an
    /// instantiation failure of `T`.
    pub fn constructor<F>(mut self, params: Vec<ValueType>, f: F) -> Self
    where
        F: Fn(&Arguments) -> DiResult<T> + Send + Sync + 'static,
    {
        let build: ErasedConstructor = Arc::new(move |args: &Arguments| Ok(Box::new(f(args)?) as BoxedBean));
        if params.is_empty() && self.descriptor.default_constructor.is_none() {
            self.descriptor.default_constructor = Some(build.clone());
        }
        self.descriptor.constructors.push(ConstructorSpec { params, build });
        self
    }

    /// Declares a single-argument setter named `name` (e.g. `setTimeout`).
    pub fn setter<V, F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        V: FromValue,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let member = Self::member(name.into(), f);
        upsert(&mut self.descriptor.setters, member);
        self
    }

    /// Declares a directly writable field named `name`.
    pub fn field<V, F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        V: FromValue,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let member = Self::member(name.into(), f);
        upsert(&mut self.descriptor.fields, member);
        self
    }

    /// Declares a field carrying an injection marker.
    ///
    /// The field is also usable by definition-driven field injection.
    pub fn autowired_field<D, F>(self, name: impl Into<String>, marker: Autowired, f: F) -> Self
    where
        D: Any + Send + Sync,
        F: Fn(&mut T, Arc<D>) + Send + Sync + 'static,
    {
        let name = name.into();
        self.field(name.clone(), f).slot::<D>(name, MemberKind::Field, marker)
    }

    /// Declares a setter carrying an injection marker.
    ///
    /// The setter is also usable by definition-driven setter injection.
    pub fn autowired_setter<D, F>(self, name: impl Into<String>, marker: Autowired, f: F) -> Self
    where
        D: Any + Send + Sync,
        F: Fn(&mut T, Arc<D>) + Send + Sync + 'static,
    {
        let name = name.into();
        self.setter(name.clone(), f).slot::<D>(name, MemberKind::Setter, marker)
    }

    /// Marks the type as a component registered under `name`.
    pub fn component(mut self, name: impl Into<String>) -> Self {
        self.descriptor.component = Some(ComponentMarker { name: Some(name.into()) });
        self
    }

    /// Marks the type as a component named by the naming policy.
    pub fn unnamed_component(mut self) -> Self {
        self.descriptor.component = Some(ComponentMarker { name: None });
        self
    }

    pub fn build(self) -> TypeDescriptor {
        self.descriptor
    }

    fn slot<D: Any + Send + Sync>(mut self, member: String, kind: MemberKind, marker: Autowired) -> Self {
        self.descriptor.dependencies.retain(|d| !(d.member == member && d.kind == kind));
        self.descriptor.dependencies.push(DependencySlot {
            member,
            kind,
            target: TypeKey::of::<D>(),
            required: marker.required,
            qualifier: marker.qualifier,
        });
        self
    }

    fn member<V, F>(name: String, f: F) -> MemberSpec
    where
        V: FromValue,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let value_type = V::value_type();
        let member_name = name.clone();
        let apply: ErasedMutator = Arc::new(move |instance: &mut (dyn Any + Send + Sync), value: Value| {
            let target = instance.downcast_mut::<T>().ok_or_else(|| DiError::TypeMismatch {
                id: member_name.clone(),
                expected: std::any::type_name::<T>().to_string(),
            })?;
            let kind = value.kind();
            let typed = V::from_value(value).ok_or_else(|| DiError::Conversion {
                value: kind.to_string(),
                target: value_type.name().to_string(),
            })?;
            f(target, typed);
            Ok(())
        });
        MemberSpec { name, value_type, apply }
    }
}

fn upsert(members: &mut Vec<MemberSpec>, member: MemberSpec) {
    match members.iter_mut().find(|m| m.name == member.name) {
        Some(existing) => *existing = member,
        None => members.push(member),
    }
}

/// Setter name for a property: `"timeout"` becomes `"setTimeout"`.
pub fn setter_name(property: &str) -> String {
    let mut chars = property.chars();
    match chars.next() {
        Some(first) => format!("set{}{}", first.to_uppercase(), chars.as_str()),
        None => "set".to_string(),
    }
}
