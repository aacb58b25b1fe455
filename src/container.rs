//! The bean registry: definitions, singleton cache and creation.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, trace};

use crate::definition::{BeanDefinition, InjectionMode};
use crate::error::{DiError, DiResult};
use crate::injector::Injector;
use crate::internal::ResolutionStack;
use crate::introspection::{AnyArc, Bean, NamingPolicy, SimpleNamePolicy, TypeDescriptor};
use crate::key::TypeKey;
use crate::observer::{BeanObserver, Observers};
use crate::traits::BeanResolver;

/// Owns every bean definition and every singleton instance.
///
/// `get_bean` builds beans on demand: a singleton is created on its first
/// retrieval and cached; a prototype is created on every retrieval.
/// References are resolved lazily, so definitions may be registered in any
/// order and may name beans that are registered later.
///
/// The registry is single-threaded (`&mut self`). Shared use goes through
/// [`ApplicationContext`](crate::ApplicationContext), which holds it behind
/// one lock for the whole of each operation.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{BeanContainer, BeanDefinition, InjectionMode, TypeDescriptor, ValueSource, ValueType};
/// use std::sync::Arc;
///
/// struct Greeter {
///     greeting: String,
/// }
///
/// let greeter = Arc::new(
///     TypeDescriptor::builder::<Greeter>()
///         .constructor(vec![ValueType::Text], |args| Ok(Greeter { greeting: args.get(0)? }))
///         .build(),
/// );
///
/// let mut container = BeanContainer::new();
/// container.register(
///     BeanDefinition::new("greeter", greeter)
///         .with_injection_mode(InjectionMode::Constructor)
///         .with_constructor_arg(ValueSource::literal("hello")),
/// );
///
/// let bean = container.get_bean_as::<Greeter>("greeter").unwrap().unwrap();
/// assert_eq!(bean.greeting, "hello");
/// assert!(container.get_bean("missing").unwrap().is_none());
/// ```
pub struct BeanContainer {
    definitions: HashMap<String, Arc<BeanDefinition>>,
    /// Every known id (definitions and pre-built singletons), first registration first
    order: Vec<String>,
    singletons: HashMap<String, AnyArc>,
    in_flight: ResolutionStack,
    naming: Arc<dyn NamingPolicy>,
    observers: Observers,
}

impl BeanContainer {
    /// An empty registry using the [`SimpleNamePolicy`].
    pub fn new() -> Self {
        Self::with_naming_policy(Arc::new(SimpleNamePolicy))
    }

    /// An empty registry deriving default ids with `naming`.
    pub fn with_naming_policy(naming: Arc<dyn NamingPolicy>) -> Self {
        Self {
            definitions: HashMap::new(),
            order: Vec::new(),
            singletons: HashMap::new(),
            in_flight: ResolutionStack::default(),
            naming,
            observers: Observers::default(),
        }
    }

    pub fn add_observer(&mut self, observer: Arc<dyn BeanObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    pub fn naming(&self) -> &dyn NamingPolicy {
        self.naming.as_ref()
    }

    // ----- Registration -----

    /// Stores `definition` under its id, replacing any previous one.
    ///
    /// Referenced ids are not checked here. Replacing a definition does not
    /// evict a singleton already built from the old one.
    pub fn register(&mut self, definition: BeanDefinition) -> &mut Self {
        let id = definition.id().to_string();
        trace!(bean = %id, class = definition.class_name(), "registering definition");
        self.remember(&id);
        self.definitions.insert(id, Arc::new(definition));
        self
    }

    /// Registers every definition in order.
    pub fn register_definitions<I>(&mut self, definitions: I) -> &mut Self
    where
        I: IntoIterator<Item = BeanDefinition>,
    {
        for definition in definitions {
            self.register(definition);
        }
        self
    }

    /// Registers a component type by its descriptor.
    ///
    /// The id is the marker's explicit name, else the naming policy's
    /// default id for the type. The definition is annotation-driven.
    pub fn register_component_descriptor(&mut self, descriptor: Arc<TypeDescriptor>) -> DiResult<String> {
        let marker = descriptor
            .component()
            .ok_or_else(|| DiError::ComponentMarkerMissing(descriptor.type_name().to_string()))?;
        let id = match marker.name.as_deref().filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => self.naming.default_id(&descriptor.key()),
        };
        self.register(BeanDefinition::new(id.clone(), descriptor).with_injection_mode(InjectionMode::Annotated));
        Ok(id)
    }

    /// Registers the component type `T`.
    pub fn register_component<T: Bean>(&mut self) -> DiResult<String> {
        self.register_component_descriptor(Arc::new(T::descriptor()))
    }

    /// Puts a pre-built instance straight into the singleton cache.
    pub fn register_singleton_arc(&mut self, id: impl Into<String>, instance: AnyArc) -> &mut Self {
        let id = id.into();
        self.remember(&id);
        self.singletons.insert(id, instance);
        self
    }

    /// Puts a pre-built value straight into the singleton cache.
    pub fn register_singleton<T: Any + Send + Sync>(&mut self, id: impl Into<String>, instance: T) -> &mut Self {
        self.register_singleton_arc(id, Arc::new(instance))
    }

    // ----- Queries -----

    /// Whether a definition or a pre-built singleton exists for `id`.
    pub fn contains_bean(&self, id: &str) -> bool {
        self.definitions.contains_key(id) || self.singletons.contains_key(id)
    }

    pub fn definition(&self, id: &str) -> Option<&BeanDefinition> {
        self.definitions.get(id).map(Arc::as_ref)
    }

    /// Ids of all registered definitions, in registration order.
    pub fn bean_definition_names(&self) -> Vec<String> {
        self.order
            .iter()
            .filter(|id| self.definitions.contains_key(id.as_str()))
            .cloned()
            .collect()
    }

    pub fn definition_count(&self) -> usize {
        self.definitions.len()
    }

    /// Every singleton instance currently cached.
    pub fn singleton_beans(&self) -> Vec<AnyArc> {
        self.order.iter().filter_map(|id| self.singletons.get(id).cloned()).collect()
    }

    // ----- Retrieval -----

    /// Returns the bean registered under `id`, building it if needed.
    ///
    /// `Ok(None)` means no such bean. Re-entering an id that is still under
    /// construction is a circular dependency.
    pub fn get_bean(&mut self, id: &str) -> DiResult<Option<AnyArc>> {
        if self.in_flight.contains(id) {
            return Err(self.in_flight.circular(id));
        }

        let Some(definition) = self.definitions.get(id).cloned() else {
            return Ok(self.singletons.get(id).cloned());
        };

        if definition.is_singleton() {
            if let Some(cached) = self.singletons.get(id) {
                trace!(bean = id, "singleton cache hit");
                return Ok(Some(cached.clone()));
            }
        }

        let guard = self.in_flight.enter(id)?;
        let built = self.create_bean(&definition);
        drop(guard);
        let instance = built?;

        if definition.is_singleton() {
            self.singletons.insert(id.to_string(), instance.clone());
        }
        Ok(Some(instance))
    }

    /// Returns the bean under `id` if it is of type `target`, else the first
    /// bean of that type.
    ///
    /// The fallback scan looks at cached instances first, then builds
    /// definitions declaring `target`, in registration order, skipping ids
    /// under construction. An id hit of another type with no scan hit is a
    /// type mismatch.
    pub fn get_bean_assignable(&mut self, id: &str, target: &TypeKey) -> DiResult<Option<AnyArc>> {
        let direct = self.get_bean(id)?;
        if let Some(bean) = &direct {
            if is_instance(bean, target) {
                return Ok(direct);
            }
        }
        if let Some(found) = self.scan_assignable(target)? {
            return Ok(Some(found));
        }
        match direct {
            Some(_) => Err(DiError::TypeMismatch {
                id: id.to_string(),
                expected: target.type_name().to_string(),
            }),
            None => Ok(None),
        }
    }

    /// Returns a bean of type `target`, looked up under the naming policy's
    /// default id first.
    pub fn get_bean_by_type(&mut self, target: &TypeKey) -> DiResult<Option<AnyArc>> {
        let id = self.naming.default_id(target);
        self.get_bean_assignable(&id, target)
    }

    /// Typed [`get_bean_by_type`](Self::get_bean_by_type).
    pub fn get_bean_of<T: Any + Send + Sync>(&mut self) -> DiResult<Option<Arc<T>>> {
        Ok(self.get_bean_by_type(&TypeKey::of::<T>())?.and_then(|b| b.downcast::<T>().ok()))
    }

    /// Typed [`get_bean_assignable`](Self::get_bean_assignable).
    pub fn get_bean_as<T: Any + Send + Sync>(&mut self, id: &str) -> DiResult<Option<Arc<T>>> {
        Ok(self
            .get_bean_assignable(id, &TypeKey::of::<T>())?
            .and_then(|b| b.downcast::<T>().ok()))
    }

    /// Clears definitions, cached singletons and the in-flight set.
    ///
    /// Safe to call more than once.
    pub fn destroy(&mut self) {
        debug!(
            definitions = self.definitions.len(),
            singletons = self.singletons.len(),
            "destroying bean container"
        );
        self.definitions.clear();
        self.singletons.clear();
        self.order.clear();
        self.in_flight.clear();
    }

    // ----- Creation -----

    fn create_bean(&mut self, definition: &BeanDefinition) -> DiResult<AnyArc> {
        let id = definition.id();
        let started = Instant::now();
        if self.observers.has_observers() {
            self.observers.creating(id);
        }

        match self.build(definition) {
            Ok(instance) => {
                debug!(
                    bean = id,
                    class = definition.class_name(),
                    singleton = definition.is_singleton(),
                    mode = ?definition.injection_mode(),
                    "bean created"
                );
                if self.observers.has_observers() {
                    self.observers.created(id, started.elapsed());
                }
                Ok(instance)
            }
            Err(error) => {
                if self.observers.has_observers() {
                    self.observers.failed(id, &error);
                }
                Err(error)
            }
        }
    }

    fn build(&mut self, definition: &BeanDefinition) -> DiResult<AnyArc> {
        let descriptor = definition.bean_type();
        let mut instance = match definition.injection_mode() {
            InjectionMode::Constructor => {
                let args = Injector::resolve_constructor_arguments(self, definition)?;
                Injector::instantiate(descriptor, &args)?
            }
            _ => Injector::instantiate(descriptor, &Default::default())?,
        };

        if definition.injection_mode() != InjectionMode::Constructor {
            Injector::inject_by_definition(self, instance.as_mut(), definition)?;
        }

        // Shared only once fully wired
        Ok(Arc::from(instance))
    }

    fn scan_assignable(&mut self, target: &TypeKey) -> DiResult<Option<AnyArc>> {
        let cached = self
            .order
            .iter()
            .filter_map(|id| self.singletons.get(id))
            .find(|bean| is_instance(bean, target))
            .cloned();
        if cached.is_some() {
            return Ok(cached);
        }

        let candidates: Vec<String> = self
            .order
            .iter()
            .filter(|id| !self.in_flight.contains(id.as_str()))
            .filter(|id| {
                self.definitions
                    .get(id.as_str())
                    .is_some_and(|d| d.bean_type().key() == *target)
            })
            .cloned()
            .collect();

        for id in candidates {
            if let Some(bean) = self.get_bean(&id)? {
                if is_instance(&bean, target) {
                    return Ok(Some(bean));
                }
            }
        }
        Ok(None)
    }

    fn remember(&mut self, id: &str) {
        if !self.contains_bean(id) {
            self.order.push(id.to_string());
        }
    }
}

impl Default for BeanContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BeanContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanContainer")
            .field("definitions", &self.bean_definition_names())
            .field("singletons", &self.singletons.len())
            .field("in_flight", &self.in_flight)
            .finish()
    }
}

impl BeanResolver for BeanContainer {
    fn resolve(&mut self, id: &str) -> DiResult<Option<AnyArc>> {
        self.get_bean(id)
    }

    fn resolve_assignable(&mut self, id: &str, target: &TypeKey) -> DiResult<Option<AnyArc>> {
        self.get_bean_assignable(id, target)
    }

    fn naming_policy(&self) -> &dyn NamingPolicy {
        self.naming.as_ref()
    }
}

fn is_instance(bean: &AnyArc, target: &TypeKey) -> bool {
    (**bean).type_id() == target.type_id()
}
