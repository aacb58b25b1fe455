//! The application context: the public entry point over the registry.

use std::any::Any;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::container::BeanContainer;
use crate::definition::BeanDefinition;
use crate::error::DiResult;
use crate::introspection::{AnyArc, Bean, TypeDescriptor, TypeRegistry};
use crate::key::TypeKey;
use crate::observer::BeanObserver;

#[cfg(feature = "config")]
use crate::config::{ConfigLoader, DocumentFormat};
#[cfg(feature = "config")]
use crate::error::DiError;
#[cfg(feature = "config")]
use std::path::Path;

/// Thread-safe facade composing a [`BeanContainer`] with a [`TypeRegistry`]
/// and the document loader.
///
/// Every operation takes the registry lock for its whole duration, so
/// concurrent first retrievals of the same singleton build it once, and
/// cycle detection never sees another thread's in-flight ids.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{ApplicationContext, Autowired, Bean, TypeDescriptor};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Clock;
///
/// impl Bean for Clock {
///     fn descriptor() -> TypeDescriptor {
///         TypeDescriptor::builder::<Clock>().default_constructor().unnamed_component().build()
///     }
/// }
///
/// #[derive(Default)]
/// struct Scheduler {
///     clock: Option<Arc<Clock>>,
/// }
///
/// impl Bean for Scheduler {
///     fn descriptor() -> TypeDescriptor {
///         TypeDescriptor::builder::<Scheduler>()
///             .default_constructor()
///             .autowired_field("clock", Autowired::required(), |s: &mut Scheduler, c: Arc<Clock>| {
///                 s.clock = Some(c)
///             })
///             .component("scheduler")
///             .build()
///     }
/// }
///
/// let context = ApplicationContext::new();
/// assert_eq!(context.register_component::<Clock>().unwrap(), "Clock");
/// assert_eq!(context.register_component::<Scheduler>().unwrap(), "scheduler");
///
/// let scheduler = context.get_bean_as::<Scheduler>("scheduler").unwrap().unwrap();
/// let clock = context.get_bean_of::<Clock>().unwrap().unwrap();
/// assert!(Arc::ptr_eq(scheduler.clock.as_ref().unwrap(), &clock));
///
/// context.close();
/// assert!(!context.contains_bean("scheduler"));
/// ```
pub struct ApplicationContext {
    container: Mutex<BeanContainer>,
    types: RwLock<TypeRegistry>,
}

impl ApplicationContext {
    /// An empty context with no known types.
    pub fn new() -> Self {
        Self::with_types(TypeRegistry::new())
    }

    /// An empty context whose documents may name the types in `types`.
    pub fn with_types(types: TypeRegistry) -> Self {
        Self::from_parts(BeanContainer::new(), types)
    }

    /// A context over a preconfigured container, e.g. one with a custom
    /// naming policy or observers.
    pub fn from_parts(container: BeanContainer, types: TypeRegistry) -> Self {
        Self {
            container: Mutex::new(container),
            types: RwLock::new(types),
        }
    }

    /// A context loaded from the document at `path`.
    ///
    /// Any failure is reported as [`DiError::Load`] wrapping the cause.
    #[cfg(feature = "config")]
    pub fn from_file(path: impl AsRef<Path>, types: TypeRegistry) -> DiResult<Self> {
        let path = path.as_ref();
        let context = Self::with_types(types);
        context.load_file(path).map_err(|source| DiError::Load {
            origin: path.display().to_string(),
            source: Box::new(source),
        })?;
        Ok(context)
    }

    /// A context loaded from an in-memory document.
    #[cfg(feature = "config")]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str, format: DocumentFormat, types: TypeRegistry) -> DiResult<Self> {
        let context = Self::with_types(types);
        context.load_str(text, format).map_err(|source| DiError::Load {
            origin: "<string>".to_string(),
            source: Box::new(source),
        })?;
        Ok(context)
    }

    // ----- Loading -----

    /// Registers every bean of the document at `path`; returns how many.
    ///
    /// Nothing is registered when any entry is invalid.
    #[cfg(feature = "config")]
    pub fn load_file(&self, path: impl AsRef<Path>) -> DiResult<usize> {
        let definitions = ConfigLoader::new(&self.types.read()).load_file(path)?;
        Ok(self.register_loaded(definitions))
    }

    /// Registers every bean of an in-memory document; returns how many.
    #[cfg(feature = "config")]
    pub fn load_str(&self, text: &str, format: DocumentFormat) -> DiResult<usize> {
        let definitions = ConfigLoader::new(&self.types.read()).load_str(text, format)?;
        Ok(self.register_loaded(definitions))
    }

    #[cfg(feature = "config")]
    fn register_loaded(&self, definitions: Vec<BeanDefinition>) -> usize {
        let count = definitions.len();
        self.container.lock().register_definitions(definitions);
        count
    }

    // ----- Registration -----

    /// Makes `T` nameable from documents.
    pub fn register_type<T: Bean>(&self) -> Arc<TypeDescriptor> {
        self.types.write().register::<T>()
    }

    pub fn register_descriptor(&self, descriptor: Arc<TypeDescriptor>) -> Arc<TypeDescriptor> {
        self.types.write().register_descriptor(descriptor)
    }

    pub fn register_bean_definition(&self, definition: BeanDefinition) {
        self.container.lock().register(definition);
    }

    /// Registers the component type `T` and returns its bean id.
    ///
    /// Fails with [`ComponentMarkerMissing`](crate::DiError::ComponentMarkerMissing)
    /// when `T`'s descriptor carries no component marker.
    pub fn register_component<T: Bean>(&self) -> DiResult<String> {
        let descriptor = Arc::new(T::descriptor());
        let id = self.container.lock().register_component_descriptor(descriptor.clone())?;
        self.types.write().register_descriptor(descriptor);
        Ok(id)
    }

    /// Adds a pre-built instance as a singleton.
    pub fn register_singleton<T: Any + Send + Sync>(&self, id: impl Into<String>, instance: T) {
        self.container.lock().register_singleton(id, instance);
    }

    pub fn add_observer(&self, observer: Arc<dyn BeanObserver>) {
        self.container.lock().add_observer(observer);
    }

    // ----- Retrieval -----

    /// The bean registered under `id`; `Ok(None)` when there is none.
    pub fn get_bean(&self, id: &str) -> DiResult<Option<AnyArc>> {
        self.container.lock().get_bean(id)
    }

    /// The bean of type `T`, found by its default id or by type.
    pub fn get_bean_of<T: Any + Send + Sync>(&self) -> DiResult<Option<Arc<T>>> {
        self.container.lock().get_bean_of::<T>()
    }

    /// The bean `id` as a `T`, falling back to any bean of type `T`.
    pub fn get_bean_as<T: Any + Send + Sync>(&self, id: &str) -> DiResult<Option<Arc<T>>> {
        self.container.lock().get_bean_as::<T>(id)
    }

    pub fn get_bean_by_type(&self, target: &TypeKey) -> DiResult<Option<AnyArc>> {
        self.container.lock().get_bean_by_type(target)
    }

    pub fn contains_bean(&self, id: &str) -> bool {
        self.container.lock().contains_bean(id)
    }

    pub fn bean_definition_names(&self) -> Vec<String> {
        self.container.lock().bean_definition_names()
    }

    /// Runs `f` on the underlying registry while holding its lock.
    ///
    /// `f` must not call back into this context.
    pub fn with_container<R>(&self, f: impl FnOnce(&mut BeanContainer) -> R) -> R {
        let mut container = self.container.lock();
        f(&mut container)
    }

    /// Tears down the registry; later lookups find nothing.
    ///
    /// Calling it again is harmless. Registered types are kept.
    pub fn close(&self) {
        self.container.lock().destroy();
    }
}

impl Default for ApplicationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ApplicationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationContext")
            .field("container", &*self.container.lock())
            .finish_non_exhaustive()
    }
}
