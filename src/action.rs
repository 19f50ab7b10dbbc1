//! Reflected route table: the input records produced by an external reflector.
//!
//! An [`Action`] bundles one callable with the route patterns that reach it and the raw
//! annotations attached to it. The resolver only reads these records.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Callable referenced by an action, written `Class.function` in route tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TargetRef {
    pub class: String,
    pub function: String,
}

impl TargetRef {
    pub fn new(class: &str, function: &str) -> Self {
        Self {
            class: class.to_string(),
            function: function.to_string(),
        }
    }

    /// Class name without the `Controllers\` namespace prefix and `Controller` suffix
    pub fn short_class(&self) -> &str {
        let mut class = self.class.as_str();
        if let Some(head) = class.get(..11) {
            if head.eq_ignore_ascii_case("Controllers") {
                class = &class[11..];
                class = class.strip_prefix('\\').unwrap_or(class);
            }
        }
        let len = class.len();
        if len >= 10 {
            if let Some(tail) = class.get(len - 10..) {
                if tail.eq_ignore_ascii_case("Controller") {
                    class = &class[..len - 10];
                }
            }
        }
        class
    }
}

impl TryFrom<String> for TargetRef {
    type Error = Error;

    /// Only the first two `.`-separated pieces are used; anything after the function is dropped.
    fn try_from(value: String) -> Result<Self> {
        let mut pieces = value.split('.');
        match (pieces.next(), pieces.next()) {
            (Some(class), Some(function)) => Ok(TargetRef::new(class, function)),
            _ => Err(Error::InvalidAction(format!(
                "expected Class.function, got [{}]",
                value
            ))),
        }
    }
}

impl From<TargetRef> for String {
    fn from(target: TargetRef) -> Self {
        format!("{}.{}", target.class, target.function)
    }
}

/// A raw annotation value as reported by the reflector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl AnnotationValue {
    /// Strict truthiness used for `deprecated`: only `true`, `1`, `"1"` and `"true"`
    pub fn is_truthy(&self) -> bool {
        match self {
            AnnotationValue::Bool(b) => *b,
            AnnotationValue::Integer(i) => *i == 1,
            AnnotationValue::Float(_) => false,
            AnnotationValue::Text(s) => s == "1" || s == "true",
        }
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AnnotationValue::Bool(b) => write!(f, "{}", b),
            AnnotationValue::Integer(i) => write!(f, "{}", i),
            AnnotationValue::Float(x) => write!(f, "{}", x),
            AnnotationValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for AnnotationValue {
    fn from(value: &str) -> Self {
        AnnotationValue::Text(value.to_string())
    }
}

/// A routed callable with its route patterns and annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "action")]
    pub target: TargetRef,
    /// Raw patterns such as `GET/users/<int>id`
    #[serde(default)]
    pub routes: Vec<String>,
    /// Annotation key -> values, in attachment order
    #[serde(default)]
    pub annotations: IndexMap<String, Vec<AnnotationValue>>,
}

impl Action {
    pub fn new(target: TargetRef) -> Self {
        Self {
            target,
            routes: Vec::new(),
            annotations: IndexMap::new(),
        }
    }

    pub fn with_route(mut self, route: &str) -> Self {
        self.routes.push(route.to_string());
        self
    }

    /// Attach an annotation; repeated keys accumulate values in order
    pub fn with_annotation<V: Into<AnnotationValue>>(mut self, key: &str, value: V) -> Self {
        self.annotations
            .entry(key.to_string())
            .or_default()
            .push(value.into());
        self
    }
}

/// Loads a route table dumped by the reflector.
///
/// The file holds a sequence of actions. JSON and YAML are both accepted; the YAML parser
/// reads either.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not describe a list of actions.
pub fn load_route_table(path: &Path) -> Result<Vec<Action>> {
    debug!("Loading route table: {}", path.display());

    let content = fs::read_to_string(path)?;
    let actions: Vec<Action> =
        serde_yaml::from_str(&content).map_err(|e| Error::InvalidSource {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    debug!("Loaded {} actions from {}", actions.len(), path.display());
    Ok(actions)
}
