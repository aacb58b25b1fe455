//! Default bean id derivation.

use crate::key::TypeKey;

/// Derives the default bean id of a type.
///
/// The container consults its policy when a bean is looked up by type,
/// when a component without an explicit name is registered, and when an
/// annotation-driven dependency has no qualifier. Any
/// `Fn(&TypeKey) -> String` closure is a policy.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{NamingPolicy, SimpleNamePolicy, TypeKey};
///
/// struct UserRepository;
///
/// assert_eq!(SimpleNamePolicy.default_id(&TypeKey::of::<UserRepository>()), "UserRepository");
///
/// let lower_camel = |key: &TypeKey| {
///     let name = key.simple_name();
///     let mut chars = name.chars();
///     match chars.next() {
///         Some(first) => first.to_lowercase().chain(chars).collect(),
///         None => String::new(),
///     }
/// };
/// assert_eq!(lower_camel.default_id(&TypeKey::of::<UserRepository>()), "userRepository");
/// ```
pub trait NamingPolicy: Send + Sync {
    fn default_id(&self, key: &TypeKey) -> String;
}

/// The type's simple name, unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleNamePolicy;

impl NamingPolicy for SimpleNamePolicy {
    fn default_id(&self, key: &TypeKey) -> String {
        key.simple_name().to_string()
    }
}

impl<F> NamingPolicy for F
where
    F: Fn(&TypeKey) -> String + Send + Sync,
{
    fn default_id(&self, key: &TypeKey) -> String {
        self(key)
    }
}
