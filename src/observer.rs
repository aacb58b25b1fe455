//! Observers for bean creation events.
//!
//! Observers see every bean the registry builds: when construction starts,
//! when it completes and how long it took, and when it fails. Cache hits are
//! not reported.

use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;

/// Observer trait for bean creation events.
///
/// Calls are made synchronously on the resolving thread while the registry
/// lock is held. Keep implementations lightweight and never call back into
/// the container from an observer.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{ApplicationContext, BeanObserver, DiError};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct CountingObserver {
///     created: AtomicUsize,
/// }
///
/// impl BeanObserver for CountingObserver {
///     fn creating(&self, _id: &str) {}
///
///     fn created(&self, _id: &str, _duration: Duration) {
///         self.created.fetch_add(1, Ordering::SeqCst);
///     }
///
///     fn failed(&self, id: &str, error: &DiError) {
///         eprintln!("{id} failed: {error}");
///     }
/// }
///
/// let context = ApplicationContext::new();
/// context.add_observer(Arc::new(CountingObserver::default()));
/// ```
pub trait BeanObserver: Send + Sync {
    /// Called before a bean's construction starts.
    fn creating(&self, id: &str);

    /// Called after a bean is constructed and fully wired.
    fn created(&self, id: &str, duration: Duration);

    /// Called when constructing or wiring a bean fails.
    ///
    /// The error still propagates to the caller after this call.
    fn failed(&self, id: &str, error: &DiError);
}

/// Container for registered observers.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn BeanObserver>>,
}

impl Observers {
    pub(crate) fn add(&mut self, observer: Arc<dyn BeanObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn creating(&self, id: &str) {
        for observer in &self.observers {
            observer.creating(id);
        }
    }

    #[inline]
    pub(crate) fn created(&self, id: &str, duration: Duration) {
        for observer in &self.observers {
            observer.created(id, duration);
        }
    }

    #[inline]
    pub(crate) fn failed(&self, id: &str, error: &DiError) {
        for observer in &self.observers {
            observer.failed(id, error);
        }
    }
}

/// Built-in observer that forwards events to `tracing`.
///
/// Creation events are emitted at `DEBUG`, failures at `WARN`, under the
/// `ferrous_ioc::observer` target.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{ApplicationContext, TracingObserver};
/// use std::sync::Arc;
///
/// let context = ApplicationContext::new();
/// context.add_observer(Arc::new(TracingObserver::new()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TracingObserver {
    prefix: Option<String>,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self { prefix: None }
    }

    /// Tags every event with `prefix`, e.g. the owning context's name.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: Some(prefix.into()) }
    }

    fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or("")
    }
}

impl BeanObserver for TracingObserver {
    fn creating(&self, id: &str) {
        tracing::debug!(prefix = self.prefix(), bean = id, "creating bean");
    }

    fn created(&self, id: &str, duration: Duration) {
        tracing::debug!(prefix = self.prefix(), bean = id, ?duration, "bean created");
    }

    fn failed(&self, id: &str, error: &DiError) {
        tracing::warn!(prefix = self.prefix(), bean = id, %error, "bean creation failed");
    }
}
