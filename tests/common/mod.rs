//! Shared bean fixtures: a repository, a service using it, and a
//! controller using the service.

#![allow(dead_code)]

use ferrous_ioc::{Autowired, Bean, TypeDescriptor, TypeRegistry, ValueType};
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct UserRepository {
    pub db_url: String,
    pub username: String,
    pub password: String,
}

impl Bean for UserRepository {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<UserRepository>()
            .default_constructor()
            .constructor(vec![ValueType::Text; 3], |args| {
                Ok(UserRepository {
                    db_url: args.get(0)?,
                    username: args.get(1)?,
                    password: args.get(2)?,
                })
            })
            .setter("setDbUrl", |r: &mut UserRepository, url: String| r.db_url = url)
            .field("dbUrl", |r: &mut UserRepository, url: String| r.db_url = url)
            .unnamed_component()
            .build()
    }
}

#[derive(Debug)]
pub struct UserService {
    pub user_repository: Option<Arc<UserRepository>>,
    pub max_attempts: i32,
    pub timeout: i64,
}

impl Default for UserService {
    fn default() -> Self {
        Self {
            user_repository: None,
            max_attempts: 3,
            timeout: 5000,
        }
    }
}

impl Bean for UserService {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<UserService>()
            .default_constructor()
            .autowired_field(
                "userRepository",
                Autowired::required(),
                |s: &mut UserService, r: Arc<UserRepository>| s.user_repository = Some(r),
            )
            .setter("setUserRepository", |s: &mut UserService, r: Arc<UserRepository>| {
                s.user_repository = Some(r)
            })
            .setter("setMaxAttempts", |s: &mut UserService, n: i32| s.max_attempts = n)
            .setter("setTimeout", |s: &mut UserService, t: i64| s.timeout = t)
            .field("maxAttempts", |s: &mut UserService, n: i32| s.max_attempts = n)
            .field("timeout", |s: &mut UserService, t: i64| s.timeout = t)
            .component("userService")
            .build()
    }
}

#[derive(Debug)]
pub struct UserController {
    pub user_service: Option<Arc<UserService>>,
    pub log_level: String,
}

impl Default for UserController {
    fn default() -> Self {
        Self {
            user_service: None,
            log_level: "INFO".to_string(),
        }
    }
}

impl Bean for UserController {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<UserController>()
            .default_constructor()
            .autowired_field(
                "userService",
                Autowired::required(),
                |c: &mut UserController, s: Arc<UserService>| c.user_service = Some(s),
            )
            .setter("setUserService", |c: &mut UserController, s: Arc<UserService>| {
                c.user_service = Some(s)
            })
            .setter("setLogLevel", |c: &mut UserController, level: String| c.log_level = level)
            .field("logLevel", |c: &mut UserController, level: String| c.log_level = level)
            .component("userController")
            .build()
    }
}

/// Routes container events to the test output; set `RUST_LOG` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A type registry knowing all three fixtures.
pub fn types() -> TypeRegistry {
    let mut types = TypeRegistry::new();
    types.register::<UserRepository>();
    types.register::<UserService>();
    types.register::<UserController>();
    types
}
