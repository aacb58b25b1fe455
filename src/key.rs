//! Type keys identifying bean types at runtime.

use std::any::TypeId;
use std::fmt;

/// Runtime identity of a bean type.
///
/// A `TypeKey` pairs the `TypeId` used for assignability checks with the
/// type's full `std::any::type_name` for diagnostics. The *simple name*
/// (last path segment without generic arguments) is what the default
/// naming policy turns into bean ids.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{key_of_type, TypeKey};
///
/// struct UserRepository;
///
/// let key = key_of_type::<UserRepository>();
/// assert_eq!(key.simple_name(), "UserRepository");
/// assert!(key.type_name().ends_with("UserRepository"));
/// assert_eq!(key, TypeKey::of::<UserRepository>());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key for the concrete type `T`.
    #[inline]
    pub fn of<T: 'static + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The `TypeId` backing this key.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Full type name, as reported by `std::any::type_name`.
    pub fn type_name(&self) -> &'static str {
        self.name
    }

    /// Last path segment of the type name, generics stripped.
    pub fn simple_name(&self) -> &'static str {
        simple_name_of(self.name)
    }
}

// Equality and hashing use the TypeId only, names are diagnostics
impl PartialEq for TypeKey {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl std::hash::Hash for TypeKey {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Strips module path and generic arguments from a type name.
///
/// `"app::repo::Cache<alloc::string::String>"` becomes `"Cache"`.
pub fn simple_name_of(type_name: &str) -> &str {
    let base = match type_name.find('<') {
        Some(pos) => &type_name[..pos],
        None => type_name,
    };
    match base.rfind("::") {
        Some(pos) => &base[pos + 2..],
        None => base,
    }
}

#[inline(always)]
pub fn key_of_type<T: 'static>() -> TypeKey {
    TypeKey::of::<T>()
}
