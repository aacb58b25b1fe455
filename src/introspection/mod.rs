//! Type introspection: the container's substitute for runtime reflection.
//!
//! Bean types describe themselves through a [`TypeDescriptor`]; literal
//! configuration text becomes a [`Value`] through [`ValueType::convert`];
//! type names from documents resolve through a [`TypeRegistry`]; default
//! bean ids come from a [`NamingPolicy`].

pub mod descriptor;
pub mod naming;
pub mod registry;
pub mod value;

pub use descriptor::{
    setter_name, Autowired, Bean, BoxedBean, ComponentMarker, ConstructorSpec, DependencySlot,
    MemberKind, MemberSpec, TypeDescriptor, TypeDescriptorBuilder,
};
pub use naming::{NamingPolicy, SimpleNamePolicy};
pub use registry::TypeRegistry;
pub use value::{AnyArc, Arguments, FromValue, Value, ValueType};
