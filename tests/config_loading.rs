#![cfg(feature = "config")]

mod common;

use common::{types, UserController, UserRepository, UserService};
use ferrous_ioc::{ApplicationContext, DiError, DocumentFormat, InjectionMode};
use std::path::PathBuf;
use std::sync::Arc;

const BEANS_YAML: &str = r#"
beans:
  - id: userRepository
    class: UserRepository
    constructor:
      args:
        - { value: "jdbc:mysql://localhost:3306/mydb", type: java.lang.String }
        - { value: root }
        - { value: password }
  - id: userService
    class: UserService
    properties:
      - { name: userRepository, ref: userRepository }
      - { name: maxAttempts, value: 5 }
      - { name: timeout, value: 10000 }
  - id: userController
    class: UserController
    properties:
      - { name: userService, ref: userService }
      - { name: logLevel, value: DEBUG }
"#;

const BEANS_JSON: &str = r#"{
  "beans": [
    { "id": "userRepository", "class": "UserRepository",
      "constructor": { "args": [ { "value": "jdbc:h2:mem" }, { "value": "sa" }, { "value": "" } ] } },
    { "id": "userService", "class": "UserService", "singleton": false,
      "properties": [ { "name": "userRepository", "ref": "userRepository" } ] }
  ]
}"#;

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("ferrous-ioc-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_yaml_document_builds_graph() {
    common::init_tracing();
    let context = ApplicationContext::from_str(BEANS_YAML, DocumentFormat::Yaml, types()).unwrap();
    assert_eq!(
        context.bean_definition_names(),
        vec!["userRepository", "userService", "userController"]
    );

    let controller = context.get_bean_as::<UserController>("userController").unwrap().unwrap();
    let service = context.get_bean_as::<UserService>("userService").unwrap().unwrap();
    let repo = context.get_bean_as::<UserRepository>("userRepository").unwrap().unwrap();

    assert_eq!(controller.log_level, "DEBUG");
    assert!(Arc::ptr_eq(controller.user_service.as_ref().unwrap(), &service));
    assert!(Arc::ptr_eq(service.user_repository.as_ref().unwrap(), &repo));
    assert_eq!(service.max_attempts, 5);
    assert_eq!(service.timeout, 10000);
    assert_eq!(repo.db_url, "jdbc:mysql://localhost:3306/mydb");
    assert_eq!(repo.username, "root");
    assert_eq!(repo.password, "password");
}

#[test]
fn test_json_document_with_prototype() {
    let context = ApplicationContext::from_str(BEANS_JSON, DocumentFormat::Json, types()).unwrap();

    let first = context.get_bean_as::<UserService>("userService").unwrap().unwrap();
    let second = context.get_bean_as::<UserService>("userService").unwrap().unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(
        first.user_repository.as_ref().unwrap(),
        second.user_repository.as_ref().unwrap()
    ));
    assert_eq!(first.user_repository.as_ref().unwrap().password, "");
}

#[test]
fn test_document_modes() {
    let context = ApplicationContext::from_str(BEANS_YAML, DocumentFormat::Yaml, types()).unwrap();
    context.with_container(|container| {
        let repo = container.definition("userRepository").unwrap();
        assert_eq!(repo.injection_mode(), InjectionMode::Constructor);
        assert_eq!(repo.constructor_args().len(), 3);
        let service = container.definition("userService").unwrap();
        assert_eq!(service.injection_mode(), InjectionMode::Setter);
        assert_eq!(service.class_name(), "UserService");
        assert!(service.is_singleton());
    });
}

#[test]
fn test_field_injection_override() {
    let yaml = r#"
beans:
  - { id: repo, class: UserRepository }
  - id: service
    class: UserService
    injection: field
    property:
      - { name: userRepository, ref: repo }
      - { name: maxAttempts, value: "9" }
"#;
    let context = ApplicationContext::from_str(yaml, DocumentFormat::Yaml, types()).unwrap();
    let service = context.get_bean_as::<UserService>("service").unwrap().unwrap();
    assert_eq!(service.max_attempts, 9);
    assert!(service.user_repository.is_some());
}

#[test]
fn test_bare_entry_is_default_constructed() {
    let yaml = "beans:\n  - { id: controller, class: UserController }\n";
    let context = ApplicationContext::from_str(yaml, DocumentFormat::Yaml, types()).unwrap();

    let controller = context.get_bean_as::<UserController>("controller").unwrap().unwrap();
    assert_eq!(controller.log_level, "INFO");
    assert!(controller.user_service.is_none());
}

#[test]
fn test_load_from_files() {
    let yaml = temp_file("beans.yaml", BEANS_YAML);
    let json = temp_file("beans.json", BEANS_JSON);

    let context = ApplicationContext::from_file(&yaml, types()).unwrap();
    assert!(context.contains_bean("userController"));

    let context = ApplicationContext::with_types(types());
    assert_eq!(context.load_file(&json).unwrap(), 2);
    assert!(context.get_bean_of::<UserRepository>().unwrap().is_some());

    std::fs::remove_file(yaml).ok();
    std::fs::remove_file(json).ok();
}

#[test]
fn test_missing_file() {
    let path = std::env::temp_dir().join("ferrous-ioc-does-not-exist.yaml");
    let err = ApplicationContext::from_file(&path, types()).unwrap_err();
    match err {
        DiError::Load { origin, source } => {
            assert!(origin.ends_with("ferrous-ioc-does-not-exist.yaml"));
            assert!(matches!(*source, DiError::Io { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_malformed_entries() {
    for yaml in [
        "beans:\n  - { class: UserService }\n",
        "beans:\n  - { id: '', class: UserService }\n",
        "beans:\n  - { id: service }\n",
        "beans:\n  - id: service\n    class: UserService\n    properties:\n      - { value: 1 }\n",
    ] {
        let err = ApplicationContext::from_str(yaml, DocumentFormat::Yaml, types()).unwrap_err();
        let DiError::Load { source, .. } = err else {
            panic!("expected a load error for {yaml}");
        };
        assert!(matches!(*source, DiError::MalformedDefinition(_)), "{yaml}: {source}");
    }
}

#[test]
fn test_unknown_class_fails_whole_document() {
    let yaml = "beans:\n  - { id: repo, class: UserRepository }\n  - { id: x, class: com.example.Missing }\n";
    let context = ApplicationContext::with_types(types());

    let err = context.load_str(yaml, DocumentFormat::Yaml).unwrap_err();
    assert!(matches!(err, DiError::TypeResolution(ref name) if name == "com.example.Missing"));
    assert!(!context.contains_bean("repo"));
}

#[test]
fn test_syntax_error() {
    let err = ApplicationContext::from_str("beans: [", DocumentFormat::Yaml, types()).unwrap_err();
    let DiError::Load { source, .. } = err else {
        panic!("expected a load error");
    };
    assert!(matches!(*source, DiError::Parse { .. }));
}

#[test]
fn test_types_registered_later_are_visible() {
    let context = ApplicationContext::new();
    context.register_type::<UserRepository>();
    assert_eq!(
        context
            .load_str("beans:\n  - { id: repo, class: UserRepository }\n", DocumentFormat::Yaml)
            .unwrap(),
        1
    );
    assert!(context.get_bean_as::<UserRepository>("repo").unwrap().is_some());
}
