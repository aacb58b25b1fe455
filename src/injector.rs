//! Dependency injection: constructor arguments, setters, fields and
//! annotation-driven slots.
//!
//! The injector is stateless. Every bean it needs is resolved through a
//! [`BeanResolver`], so caching and cycle detection stay in the registry.

use std::any::Any;

use tracing::{trace, warn};

use crate::definition::{BeanDefinition, InjectionMode, ValueSource};
use crate::error::{DiError, DiResult};
use crate::introspection::{setter_name, Arguments, BoxedBean, MemberKind, TypeDescriptor, Value, ValueType};
use crate::traits::BeanResolver;

/// Stateless injector operating on data passed to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Injector;

impl Injector {
    /// Resolves the constructor arguments of `definition`, in call order.
    ///
    /// References are looked up through `resolver` (a missing bean becomes
    /// an absent argument). Literals are converted to their declared type,
    /// text when no type is declared.
    pub fn resolve_constructor_arguments(
        resolver: &mut dyn BeanResolver,
        definition: &BeanDefinition,
    ) -> DiResult<Arguments> {
        let mut values = Vec::with_capacity(definition.constructor_args().len());
        for arg in definition.ordered_constructor_args() {
            let value = match arg.reference_id() {
                Some(id) => resolver.resolve(id)?.map(Value::Bean),
                None => match arg.value() {
                    Some(text) => Some(arg.value_type().unwrap_or(ValueType::Text).convert(text)?),
                    None => None,
                },
            };
            values.push(value);
        }
        Ok(Arguments::new(values))
    }

    /// Builds an instance with the constructor matching `args`.
    ///
    /// The first declared constructor with the same arity whose parameters
    /// accept every present argument wins. With no match, an empty argument
    /// list falls back to the default constructor; anything else is an
    /// instantiation failure.
    pub fn instantiate(descriptor: &TypeDescriptor, args: &Arguments) -> DiResult<BoxedBean> {
        if let Some(ctor) = descriptor.constructors().iter().find(|c| c.accepts(args)) {
            return ctor.invoke(args).map_err(|e| wrap_instantiation(descriptor, e));
        }
        if args.is_empty() {
            return descriptor.instantiate().map_err(|e| wrap_instantiation(descriptor, e));
        }
        let reason = if descriptor.constructors().iter().any(|c| c.arity() == args.len()) {
            format!("no constructor of arity {} accepts the supplied arguments", args.len())
        } else {
            format!("no constructor of arity {}", args.len())
        };
        Err(DiError::Instantiation {
            type_name: descriptor.type_name().to_string(),
            reason,
        })
    }

    /// Populates `instance` as `definition` prescribes.
    ///
    /// Setter and field modes apply the definition's properties; the
    /// annotated mode applies the type's dependency slots; constructor mode
    /// has nothing left to do.
    pub fn inject_by_definition(
        resolver: &mut dyn BeanResolver,
        instance: &mut (dyn Any + Send + Sync),
        definition: &BeanDefinition,
    ) -> DiResult<()> {
        match definition.injection_mode() {
            InjectionMode::Constructor => Ok(()),
            InjectionMode::Setter => Self::inject_properties(resolver, instance, definition, MemberKind::Setter),
            InjectionMode::Field => Self::inject_properties(resolver, instance, definition, MemberKind::Field),
            InjectionMode::Annotated => Self::inject_annotated(resolver, instance, definition.bean_type()),
        }
    }

    /// Applies the type's annotation-driven dependency slots.
    ///
    /// Field slots are applied before setter slots. A slot resolves the
    /// bean named by its qualifier, else by the naming policy applied to
    /// its declared type, falling back to any bean of that type. A bean of
    /// another type under that id does not count. A required slot without
    /// a candidate fails; an optional one is skipped.
    pub fn inject_annotated(
        resolver: &mut dyn BeanResolver,
        instance: &mut (dyn Any + Send + Sync),
        descriptor: &TypeDescriptor,
    ) -> DiResult<()> {
        let ordered = descriptor
            .dependencies()
            .iter()
            .filter(|s| s.kind == MemberKind::Field)
            .chain(descriptor.dependencies().iter().filter(|s| s.kind == MemberKind::Setter));

        for slot in ordered {
            let id = match &slot.qualifier {
                Some(qualifier) => qualifier.clone(),
                None => resolver.naming_policy().default_id(&slot.target),
            };
            // A bean of another type under the slot's id is no candidate
            let candidate = match resolver.resolve_assignable(&id, &slot.target) {
                Err(DiError::TypeMismatch { .. }) => None,
                other => other?,
            };
            let Some(dependency) = candidate else {
                if slot.required {
                    return Err(DiError::Unsatisfied {
                        member: slot.member.clone(),
                        owner: descriptor.name().to_string(),
                    });
                }
                trace!(member = %slot.member, owner = descriptor.name(), "optional dependency absent");
                continue;
            };
            let member = descriptor.slot_member(slot).ok_or_else(|| DiError::Unsatisfied {
                member: slot.member.clone(),
                owner: descriptor.name().to_string(),
            })?;
            member.apply(instance, Value::Bean(dependency))?;
        }
        Ok(())
    }

    /// Resolves a property source against the member's declared type.
    ///
    /// A non-empty reference wins over a literal. `None` means nothing to
    /// inject: no source was supplied, or the referenced bean is missing.
    pub fn resolve_property_value(
        resolver: &mut dyn BeanResolver,
        source: &ValueSource,
        target: ValueType,
    ) -> DiResult<Option<Value>> {
        if let Some(id) = source.reference_id() {
            return Ok(resolver.resolve(id)?.map(Value::Bean));
        }
        source.value().map(|text| target.convert(text)).transpose()
    }

    fn inject_properties(
        resolver: &mut dyn BeanResolver,
        instance: &mut (dyn Any + Send + Sync),
        definition: &BeanDefinition,
        kind: MemberKind,
    ) -> DiResult<()> {
        let descriptor = definition.bean_type();
        for (property, source) in definition.properties() {
            let member = match kind {
                MemberKind::Setter => descriptor.setter(&setter_name(property)),
                MemberKind::Field => descriptor.field(property),
            };
            let Some(member) = member else {
                warn!(
                    bean = definition.id(),
                    property = %property,
                    "no matching {} on {}, property skipped",
                    if kind == MemberKind::Setter { "setter" } else { "field" },
                    descriptor.name()
                );
                continue;
            };
            match Self::resolve_property_value(resolver, source, member.value_type())? {
                Some(value) => member.apply(instance, value)?,
                None => trace!(bean = definition.id(), property = %property, "property has no value, skipped"),
            }
        }
        Ok(())
    }
}

fn wrap_instantiation(descriptor: &TypeDescriptor, error: DiError) -> DiError {
    match error {
        DiError::Instantiation { .. } => error,
        other => DiError::Instantiation {
            type_name: descriptor.type_name().to_string(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspection::{AnyArc, Autowired, NamingPolicy, SimpleNamePolicy};
    use crate::key::TypeKey;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Default)]
    struct MapResolver {
        beans: HashMap<String, AnyArc>,
    }

    impl BeanResolver for MapResolver {
        fn resolve(&mut self, id: &str) -> DiResult<Option<AnyArc>> {
            Ok(self.beans.get(id).cloned())
        }

        fn resolve_assignable(&mut self, id: &str, target: &TypeKey) -> DiResult<Option<AnyArc>> {
            let is_target = |b: &&AnyArc| (***b).type_id() == target.type_id();
            Ok(self
                .beans
                .get(id)
                .filter(is_target)
                .or_else(|| self.beans.values().find(is_target))
                .cloned())
        }

        fn naming_policy(&self) -> &dyn NamingPolicy {
            &SimpleNamePolicy
        }
    }

    struct Repo {
        url: String,
    }

    #[derive(Default)]
    struct Service {
        repo: Option<Arc<Repo>>,
        retries: i32,
    }

    fn repo_type() -> Arc<TypeDescriptor> {
        Arc::new(
            TypeDescriptor::builder::<Repo>()
                .constructor(vec![ValueType::Text], |a| Ok(Repo { url: a.get(0)? }))
                .build(),
        )
    }

    fn service_type(marker: Autowired) -> Arc<TypeDescriptor> {
        Arc::new(
            TypeDescriptor::builder::<Service>()
                .default_constructor()
                .setter("setRetries", |s: &mut Service, n: i32| s.retries = n)
                .autowired_field("repo", marker, |s: &mut Service, r: Arc<Repo>| s.repo = Some(r))
                .build(),
        )
    }

    #[test]
    fn test_constructor_arguments_literal_and_reference() {
        let mut resolver = MapResolver::default();
        resolver.beans.insert("other".into(), Arc::new(Repo { url: "o".into() }));
        let def = BeanDefinition::new("r", repo_type())
            .with_constructor_arg(ValueSource::literal("42").with_type(ValueType::Integer))
            .with_constructor_arg(ValueSource::reference("other"))
            .with_constructor_arg(ValueSource::reference("missing"))
            .with_constructor_arg(ValueSource::literal("plain"));
        let args = Injector::resolve_constructor_arguments(&mut resolver, &def).unwrap();
        assert_eq!(args.get::<i32>(0).unwrap(), 42);
        assert_eq!(args.get::<Arc<Repo>>(1).unwrap().url, "o");
        assert!(args.value(2).is_none());
        assert_eq!(args.get::<String>(3).unwrap(), "plain");
    }

    #[test]
    fn test_instantiate_matches_arity_and_type() {
        let descriptor = repo_type();
        let ok = Injector::instantiate(&descriptor, &Arguments::new(vec![Some(Value::Text("u".into()))])).unwrap();
        assert_eq!(ok.downcast_ref::<Repo>().unwrap().url, "u");

        let wrong_type = Injector::instantiate(&descriptor, &Arguments::new(vec![Some(Value::Integer(1))]));
        assert!(matches!(wrong_type, Err(DiError::Instantiation { .. })));

        let wrong_arity = Injector::instantiate(&descriptor, &Arguments::new(vec![None, None]));
        assert!(matches!(wrong_arity, Err(DiError::Instantiation { .. })));
    }

    #[test]
    fn test_absent_argument_reaching_constructor_is_wrapped() {
        let err = Injector::instantiate(&repo_type(), &Arguments::new(vec![None])).unwrap_err();
        match err {
            DiError::Instantiation { type_name, reason } => {
                assert!(type_name.ends_with("Repo"));
                assert!(reason.contains("argument 0"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_annotated_required_missing_fails() {
        let mut resolver = MapResolver::default();
        let descriptor = service_type(Autowired::required());
        let mut bean = descriptor.instantiate().unwrap();
        let err = Injector::inject_annotated(&mut resolver, bean.as_mut(), &descriptor).unwrap_err();
        assert!(matches!(err, DiError::Unsatisfied { ref member, ref owner } if member == "repo" && owner == "Service"));
    }

    #[test]
    fn test_annotated_optional_missing_skips() {
        let mut resolver = MapResolver::default();
        let descriptor = service_type(Autowired::optional());
        let mut bean = descriptor.instantiate().unwrap();
        Injector::inject_annotated(&mut resolver, bean.as_mut(), &descriptor).unwrap();
        assert!(bean.downcast_ref::<Service>().unwrap().repo.is_none());
    }

    #[test]
    fn test_annotated_falls_back_to_type() {
        let mut resolver = MapResolver::default();
        resolver.beans.insert("anyName".into(), Arc::new(Repo { url: "t".into() }));
        let descriptor = service_type(Autowired::required());
        let mut bean = descriptor.instantiate().unwrap();
        Injector::inject_annotated(&mut resolver, bean.as_mut(), &descriptor).unwrap();
        assert_eq!(bean.downcast_ref::<Service>().unwrap().repo.as_ref().unwrap().url, "t");
    }

    #[test]
    fn test_setter_properties_skip_unknown_and_empty() {
        let mut resolver = MapResolver::default();
        let def = BeanDefinition::new("s", service_type(Autowired::optional()))
            .with_injection_mode(InjectionMode::Setter)
            .with_property("retries", ValueSource::literal("7"))
            .with_property("unknown", ValueSource::literal("x"))
            .with_property("repo", ValueSource::empty());
        let mut bean = def.bean_type().instantiate().unwrap();
        Injector::inject_by_definition(&mut resolver, bean.as_mut(), &def).unwrap();
        let service = bean.downcast_ref::<Service>().unwrap();
        assert_eq!(service.retries, 7);
        assert!(service.repo.is_none());
    }

    #[test]
    fn test_reference_wins_over_literal() {
        let mut resolver = MapResolver::default();
        resolver.beans.insert("r".into(), Arc::new(Repo { url: "ref".into() }));
        let source = ValueSource::from_parts(Some("lit".into()), Some("r".into()), None);
        let value = Injector::resolve_property_value(&mut resolver, &source, ValueType::Text).unwrap();
        assert!(matches!(value, Some(Value::Bean(_))));
    }
}
