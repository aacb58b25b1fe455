//! Error types for the inversion-of-control container.

use thiserror::Error;

/// Container errors
///
/// Every variant is a programmer-visible fault. The container never retries
/// and never swallows one of these; they surface to the immediate caller of
/// the registry or context operation that triggered them.
///
/// A lookup miss is *not* an error: `get_bean` returns `Ok(None)` for an id
/// that was never registered, so callers can tell "doesn't exist" apart
/// from "exists but failed to build".
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::DiError;
///
/// let circular = DiError::Circular {
///     id: "a".to_string(),
///     path: vec!["a".to_string(), "b".to_string(), "a".to_string()],
/// };
/// assert_eq!(circular.to_string(), "Circular dependency: a -> b -> a");
///
/// let unsatisfied = DiError::Unsatisfied {
///     member: "repository".to_string(),
///     owner: "UserService".to_string(),
/// };
/// println!("Error: {}", unsatisfied);
/// ```
#[derive(Debug, Clone, Error)]
pub enum DiError {
    /// A bean transitively depends on itself while being constructed
    #[error("Circular dependency: {}", path.join(" -> "))]
    Circular {
        /// Id whose construction was re-entered
        id: String,
        /// In-flight ids from the outermost request down to `id`
        path: Vec<String>,
    },
    /// A required annotation-driven dependency could not be resolved
    #[error("Unsatisfied dependency: member `{member}` of `{owner}`")]
    Unsatisfied { member: String, owner: String },
    /// No usable constructor, or the constructor itself failed
    #[error("Cannot instantiate `{type_name}`: {reason}")]
    Instantiation { type_name: String, reason: String },
    /// A declared bean entry is missing its id or type
    #[error("Malformed bean definition: {0}")]
    MalformedDefinition(String),
    /// A type name could not be mapped to a registered type
    #[error("Unknown type: {0}")]
    TypeResolution(String),
    /// `register_component` was called with a type that is not a component
    #[error("Type is not marked as a component: {0}")]
    ComponentMarkerMissing(String),
    /// A bean exists under the id but is not of the requested type
    #[error("Bean `{id}` is not of type `{expected}`")]
    TypeMismatch { id: String, expected: String },
    /// A literal could not be converted to the declared type
    #[error("Cannot convert `{value}` to {target}")]
    Conversion { value: String, target: String },
    /// A constructor asked for an argument that is absent or of another kind
    #[error("Constructor argument {index} is missing or not a {expected}")]
    ArgumentMissing { index: usize, expected: String },
    /// A configuration document is syntactically invalid
    #[error("Cannot parse bean document {origin}: {reason}")]
    Parse { origin: String, reason: String },
    /// A configuration document could not be read
    #[error("Cannot read {path}: {reason}")]
    Io { path: String, reason: String },
    /// Loading a configuration document failed
    #[error("Failed to load bean configuration from {origin}")]
    Load {
        origin: String,
        #[source]
        source: Box<DiError>,
    },
}

/// Result type for container operations
///
/// A convenience alias for `Result<T, DiError>` used throughout ferrous-ioc.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{DiError, DiResult};
///
/// fn lookup(known: bool) -> DiResult<&'static str> {
///     if known {
///         Ok("bean")
///     } else {
///         Err(DiError::TypeResolution("com.example.Missing".to_string()))
///     }
/// }
///
/// assert!(lookup(true).is_ok());
/// assert!(lookup(false).is_err());
/// ```
pub type DiResult<T> = Result<T, DiError>;
