//! Serde model of a bean document.

use serde::{Deserialize, Serialize};

use crate::definition::InjectionMode;

/// Root of a bean document: an ordered list of bean entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeansDocument {
    #[serde(default)]
    pub beans: Vec<BeanEntry>,
}

/// One declared bean.
///
/// `id` and `class` are optional at the serde level so that their absence
/// is reported as a malformed definition rather than a parse error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeanEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "class", alias = "class_")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub singleton: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injection: Option<InjectionMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constructor: Option<ConstructorEntry>,
    #[serde(default, alias = "property", skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstructorEntry {
    #[serde(default, alias = "arg")]
    pub args: Vec<ArgEntry>,
}

/// A constructor argument: literal or reference, with optional type and position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArgEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Scalar>,
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Scalar>,
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// A literal as written in the document.
///
/// Documents may write `5`, `5.5`, `true` or `"text"`; all are turned into
/// text and converted later against the declared type. Integers keep their
/// digits over the full `i64` and `u64` range. Unquoted floats are
/// rendered from the parsed number, so `1.10` becomes `"1.1"`; quote a
/// literal to keep its exact spelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Boolean(bool),
}

impl Scalar {
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Text(s) => s.clone(),
            Scalar::Integer(i) => i.to_string(),
            Scalar::Unsigned(u) => u.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Boolean(b) => b.to_string(),
        }
    }
}
