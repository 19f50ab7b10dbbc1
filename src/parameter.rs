use crate::error::{Error, Result};
use crate::type_converter::{TypeConverter, TypeSpec};
use log::debug;
use serde::{Deserialize, Serialize};

/// Where a parameter value is carried in an HTTP request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// Path segment placeholder (e.g. `/users/{id}`)
    Path,
    /// Query string parameter
    Query,
    /// Request body field
    Body,
    /// HTTP header
    Header,
    /// Not decided yet; resolved against the placement hint when the operation is built
    #[default]
    Guess,
}

fn default_type() -> String {
    "string".to_string()
}

/// One input value accepted by an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// The parameter name, unique within an operation
    pub name: String,
    /// Placement of the parameter
    #[serde(rename = "in", default)]
    pub location: ParameterLocation,
    /// Whether the parameter is required
    #[serde(default)]
    pub required: bool,
    /// Normalized type name
    #[serde(rename = "type", default = "default_type")]
    pub param_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Original field name when the parameter was renamed by a schema alias
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Placement to use while `location` is still `Guess`
    #[serde(skip)]
    pub(crate) placement_hint: Option<ParameterLocation>,
}

impl Parameter {
    /// Create a parameter with the given placement and type
    pub fn new(name: &str, location: ParameterLocation, type_spec: TypeSpec) -> Self {
        Self {
            name: name.to_string(),
            location,
            required: false,
            param_type: type_spec.type_name,
            format: type_spec.format,
            pattern: type_spec.pattern,
            description: None,
            alias: None,
            placement_hint: None,
        }
    }

    /// Create a required path parameter
    pub fn path(name: &str, type_spec: TypeSpec) -> Self {
        Self::new(name, ParameterLocation::Path, type_spec).with_required(true)
    }

    /// Create a parameter whose placement is decided later from `hint`
    pub fn guessed(name: &str, type_spec: TypeSpec, hint: ParameterLocation) -> Self {
        let mut parameter = Self::new(name, ParameterLocation::Guess, type_spec);
        parameter.placement_hint = Some(hint);
        parameter
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Turn a `Guess` placement into a concrete one.
    ///
    /// The recorded hint wins; `fallback` is used when the parameter carries none.
    pub fn resolve_placement(&mut self, fallback: ParameterLocation) {
        if self.location == ParameterLocation::Guess {
            self.location = self.placement_hint.take().unwrap_or(fallback);
        }
    }
}

/// Parser for free-text `parameter` annotations.
///
/// Grammar (whitespace-delimited): `[<type>] $<name> [[optional]] <description>`.
pub struct ParameterParser;

impl ParameterParser {
    /// Parses a single annotation into a [`Parameter`] placed at `hint`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedAnnotation`] when the `$name` token is missing or empty.
    pub fn parse(annotation: &str, hint: ParameterLocation) -> Result<Parameter> {
        debug!("Parsing parameter annotation: {}", annotation);

        let mut tokens = annotation.split_whitespace().peekable();
        let malformed = |message: &str| Error::MalformedAnnotation {
            annotation: annotation.to_string(),
            message: message.to_string(),
        };

        // detect if the type was specified
        let type_spec = match tokens.peek() {
            Some(token) if !token.starts_with('$') => {
                let spec = TypeConverter::convert(token);
                tokens.next();
                spec
            }
            _ => TypeSpec::default(),
        };

        let name = tokens
            .next()
            .ok_or_else(|| malformed("missing $name token"))?
            .strip_prefix('$')
            .ok_or_else(|| malformed("parameter name must start with '$'"))?;
        if name.is_empty() {
            return Err(malformed("empty parameter name"));
        }

        let mut parameter = Parameter::new(name, hint, type_spec).with_required(true);

        if let Some(&token) = tokens.peek() {
            if token == "[optional]" || token == "optional" {
                parameter.required = false;
                tokens.next();
            }
        }

        let description = tokens.collect::<Vec<_>>().join(" ");
        let description = description.trim();
        if !description.is_empty() {
            parameter.description = Some(description.to_string());
        }

        Ok(parameter)
    }
}
