//! Bean lifetime definitions.

/// Bean lifetimes controlling instance caching behavior
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{ApplicationContext, BeanDefinition, Lifetime, TypeDescriptor};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Clock {
///     ticks: u64,
/// }
///
/// let clock = Arc::new(TypeDescriptor::builder::<Clock>().default_constructor().build());
///
/// let context = ApplicationContext::new();
/// context.register_bean_definition(BeanDefinition::new("shared", clock.clone()));
/// context.register_bean_definition(
///     BeanDefinition::new("fresh", clock).with_lifetime(Lifetime::Prototype),
/// );
///
/// // Singleton: same instance every time
/// let a = context.get_bean_as::<Clock>("shared").unwrap().unwrap();
/// let b = context.get_bean_as::<Clock>("shared").unwrap().unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
///
/// // Prototype: a new instance per retrieval
/// let c = context.get_bean("fresh").unwrap().unwrap();
/// let d = context.get_bean("fresh").unwrap().unwrap();
/// assert!(!Arc::ptr_eq(&c, &d));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifetime {
    /// One instance per id, cached for the registry's lifetime
    ///
    /// Created on first retrieval, then returned by every later retrieval
    /// until the registry is destroyed.
    #[default]
    Singleton,
    /// A new instance per retrieval, never cached
    ///
    /// Each retrieval also re-resolves the bean's own dependencies, so
    /// prototype dependencies are wired independently per instance.
    Prototype,
}

impl Lifetime {
    /// Returns `true` for [`Lifetime::Singleton`].
    pub fn is_singleton(self) -> bool {
        matches!(self, Lifetime::Singleton)
    }
}
