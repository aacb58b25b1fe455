//! Resolver trait seen by the injector.

use crate::error::DiResult;
use crate::introspection::{AnyArc, NamingPolicy};
use crate::key::TypeKey;

/// Bean lookup as seen from the injector.
///
/// The injector never owns beans: every reference it meets is resolved
/// back through this trait, which lets the registry apply caching and
/// cycle detection uniformly. [`BeanContainer`](crate::BeanContainer) is
/// the production implementation; tests may substitute a map.
///
/// Lookup misses are `Ok(None)`, never errors.
pub trait BeanResolver {
    /// Resolves the bean registered under `id`.
    fn resolve(&mut self, id: &str) -> DiResult<Option<AnyArc>>;

    /// Resolves `id` if it is of type `target`, else the first bean of
    /// type `target`.
    fn resolve_assignable(&mut self, id: &str, target: &TypeKey) -> DiResult<Option<AnyArc>>;

    /// Policy used to name dependencies that carry no qualifier.
    fn naming_policy(&self) -> &dyn NamingPolicy;
}
