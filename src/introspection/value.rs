//! Runtime values flowing into constructors and members.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::TypeKey;

// Type-erased Arc for storage
pub type AnyArc = Arc<dyn Any + Send + Sync>;

/// A converted value ready to be handed to a constructor, setter or field.
///
/// Literals from definitions are converted into one of the primitive
/// variants; references resolve to [`Value::Bean`].
#[derive(Clone)]
pub enum Value {
    Text(String),
    Integer(i32),
    Long(i64),
    Double(f64),
    Float(f32),
    Boolean(bool),
    Bean(AnyArc),
}

impl Value {
    /// Short name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Integer(_) => "integer",
            Value::Long(_) => "long",
            Value::Double(_) => "double",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::Bean(_) => "bean",
        }
    }

    /// Borrows the text of a [`Value::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Downcasts a [`Value::Bean`] to a concrete type.
    pub fn as_bean<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Value::Bean(bean) => bean.clone().downcast::<T>().ok(),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Value::Integer(v) => f.debug_tuple("Integer").field(v).finish(),
            Value::Long(v) => f.debug_tuple("Long").field(v).finish(),
            Value::Double(v) => f.debug_tuple("Double").field(v).finish(),
            Value::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Value::Boolean(v) => f.debug_tuple("Boolean").field(v).finish(),
            Value::Bean(_) => f.write_str("Bean(..)"),
        }
    }
}

/// Declared type of a constructor parameter, setter or field.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Value, ValueType};
///
/// let port = ValueType::Integer.convert("8080").unwrap();
/// assert!(matches!(port, Value::Integer(8080)));
///
/// // Booleans follow the lenient rule: only "true" (any case) is true
/// assert!(matches!(ValueType::Boolean.convert("TRUE").unwrap(), Value::Boolean(true)));
/// assert!(matches!(ValueType::Boolean.convert("yes").unwrap(), Value::Boolean(false)));
///
/// assert!(ValueType::Long.convert("ten").is_err());
/// assert_eq!(ValueType::from_alias("int"), Some(ValueType::Integer));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Text,
    Integer,
    Long,
    Double,
    Float,
    Boolean,
    /// Another bean of the given concrete type
    Bean(TypeKey),
}

impl ValueType {
    /// Bean-typed slot for `T`.
    pub fn bean<T: Any + Send + Sync>() -> Self {
        ValueType::Bean(TypeKey::of::<T>())
    }

    /// Name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Text => "text",
            ValueType::Integer => "integer",
            ValueType::Long => "long",
            ValueType::Double => "double",
            ValueType::Float => "float",
            ValueType::Boolean => "boolean",
            ValueType::Bean(key) => key.type_name(),
        }
    }

    /// Maps a primitive alias to its value type.
    ///
    /// Returns `None` for anything that is not one of the fixed primitive
    /// aliases; such names are looked up as bean types instead.
    pub fn from_alias(name: &str) -> Option<ValueType> {
        let value_type = match name {
            "int" | "integer" | "i32" | "java.lang.Integer" => ValueType::Integer,
            "long" | "i64" | "java.lang.Long" => ValueType::Long,
            "double" | "f64" | "java.lang.Double" => ValueType::Double,
            "float" | "f32" | "java.lang.Float" => ValueType::Float,
            "boolean" | "bool" | "java.lang.Boolean" => ValueType::Boolean,
            "string" | "String" | "str" | "text" | "java.lang.String" => ValueType::Text,
            _ => return None,
        };
        Some(value_type)
    }

    /// Converts literal text to this type.
    ///
    /// A bean-typed target keeps the text as is: literals never become beans.
    pub fn convert(&self, text: &str) -> DiResult<Value> {
        let conversion_error = || DiError::Conversion {
            value: text.to_string(),
            target: self.name().to_string(),
        };
        let value = match self {
            ValueType::Text | ValueType::Bean(_) => Value::Text(text.to_string()),
            ValueType::Integer => Value::Integer(text.parse().map_err(|_| conversion_error())?),
            ValueType::Long => Value::Long(text.parse().map_err(|_| conversion_error())?),
            ValueType::Double => Value::Double(text.parse().map_err(|_| conversion_error())?),
            ValueType::Float => Value::Float(text.parse().map_err(|_| conversion_error())?),
            ValueType::Boolean => Value::Boolean(text.eq_ignore_ascii_case("true")),
        };
        Ok(value)
    }

    /// Whether `value` can be passed where this type is declared.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (ValueType::Text, Value::Text(_))
            | (ValueType::Integer, Value::Integer(_))
            | (ValueType::Long, Value::Long(_))
            | (ValueType::Double, Value::Double(_))
            | (ValueType::Float, Value::Float(_))
            | (ValueType::Boolean, Value::Boolean(_)) => true,
            (ValueType::Bean(key), Value::Bean(bean)) => (**bean).type_id() == key.type_id(),
            _ => false,
        }
    }
}

/// Typed extraction of a [`Value`].
///
/// Implemented for the primitive Rust types matching each [`ValueType`]
/// and for `Arc<T>` bean handles. The builder methods of
/// [`TypeDescriptor`](crate::TypeDescriptor) use it to declare member and
/// parameter types from closure signatures.
pub trait FromValue: Sized {
    /// Declared type reported to the container.
    fn value_type() -> ValueType;

    /// Extracts `Self`, or `None` when the value is of another kind.
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! primitive_from_value {
    ($ty:ty, $variant:ident) => {
        impl FromValue for $ty {
            fn value_type() -> ValueType {
                ValueType::$variant
            }

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

primitive_from_value!(String, Text);
primitive_from_value!(i32, Integer);
primitive_from_value!(i64, Long);
primitive_from_value!(f64, Double);
primitive_from_value!(f32, Float);
primitive_from_value!(bool, Boolean);

impl<T: Any + Send + Sync> FromValue for Arc<T> {
    fn value_type() -> ValueType {
        ValueType::bean::<T>()
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bean(bean) => bean.downcast::<T>().ok(),
            _ => None,
        }
    }
}

/// Ordered constructor argument values.
///
/// An argument is absent when its definition supplied neither a literal
/// nor a reference, or when the referenced bean does not exist.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    values: Vec<Option<Value>>,
}

impl Arguments {
    pub fn new(values: Vec<Option<Value>>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw access to argument `index`.
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index).and_then(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&Value>> {
        self.values.iter().map(Option::as_ref)
    }

    /// Required argument `index` as `V`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ferrous_ioc::{Arguments, Value};
    ///
    /// let args = Arguments::new(vec![Some(Value::Text("root".into())), None]);
    /// assert_eq!(args.get::<String>(0).unwrap(), "root");
    /// assert!(args.get::<String>(1).is_err());
    /// assert_eq!(args.get_opt::<String>(1), None);
    /// ```
    pub fn get<V: FromValue>(&self, index: usize) -> DiResult<V> {
        self.get_opt(index).ok_or_else(|| DiError::ArgumentMissing {
            index,
            expected: V::value_type().name().to_string(),
        })
    }

    /// Argument `index` as `V`, `None` when absent or of another kind.
    pub fn get_opt<V: FromValue>(&self, index: usize) -> Option<V> {
        self.value(index).cloned().and_then(V::from_value)
    }
}
