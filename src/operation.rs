//! Operation model: the normalized description of one (path, method) endpoint.
//!
//! Operations are accumulated in an [`OperationBuilder`] while a route's annotations are
//! applied, and frozen into an immutable [`Operation`] once guessed parameter placements
//! have been resolved.

use crate::parameter::{Parameter, ParameterLocation};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resolved model: path -> method -> operation, in discovery order.
pub type Operations = IndexMap<String, IndexMap<HttpMethod, Operation>>;

/// HTTP methods accepted in route patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Options,
    Head,
    Patch,
}

impl HttpMethod {
    /// Parse a lowercase method token, `None` for anything outside the allowed set
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "delete" => Some(HttpMethod::Delete),
            "options" => Some(HttpMethod::Options),
            "head" => Some(HttpMethod::Head),
            "patch" => Some(HttpMethod::Patch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
        }
    }

    /// Default placement for parameters whose location is not stated explicitly.
    ///
    /// Methods without request bodies read from the query string; the rest from the body.
    pub fn placement_hint(&self) -> ParameterLocation {
        match self {
            HttpMethod::Get | HttpMethod::Head | HttpMethod::Options | HttpMethod::Delete => {
                ParameterLocation::Query
            }
            HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch => ParameterLocation::Body,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Multi-valued operation fields fed by comma-separated annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListField {
    Tags,
    Consumes,
    Produces,
    Schemes,
}

/// A finalized API operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub method: HttpMethod,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub tags: IndexSet<String>,
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub consumes: IndexSet<String>,
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub produces: IndexSet<String>,
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub schemes: IndexSet<String>,
    /// Parameters in first-assignment order, unique by name
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

impl Operation {
    /// Look up a parameter by name
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// Mutable accumulator for an [`Operation`].
#[derive(Debug, Clone, Default)]
pub struct OperationBuilder {
    method: Option<HttpMethod>,
    pub class: Option<String>,
    pub function: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub operation_id: Option<String>,
    pub deprecated: bool,
    tags: IndexSet<String>,
    consumes: IndexSet<String>,
    produces: IndexSet<String>,
    schemes: IndexSet<String>,
    parameters: IndexMap<String, Parameter>,
}

impl OperationBuilder {
    /// Start an operation for a route variant
    pub fn new(method: HttpMethod, class: &str, function: &str) -> Self {
        Self {
            method: Some(method),
            class: Some(class.to_string()),
            function: Some(function.to_string()),
            ..Self::default()
        }
    }

    /// A builder that only carries parameters (used for include fragments)
    pub fn partial() -> Self {
        Self::default()
    }

    /// Add a parameter, replacing any parameter with the same name in place
    pub fn add_parameter(&mut self, parameter: Parameter) {
        self.parameters.insert(parameter.name.clone(), parameter);
    }

    /// Add every parameter in order, with the same overwrite semantics as `add_parameter`
    pub fn merge_parameters<I>(&mut self, parameters: I)
    where
        I: IntoIterator<Item = Parameter>,
    {
        for parameter in parameters {
            self.add_parameter(parameter);
        }
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.values()
    }

    pub fn into_parameters(self) -> impl Iterator<Item = Parameter> {
        self.parameters.into_values()
    }

    /// Append values to a list field, keeping first-seen order
    pub fn merge_list<I, S>(&mut self, field: ListField, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let target = match field {
            ListField::Tags => &mut self.tags,
            ListField::Consumes => &mut self.consumes,
            ListField::Produces => &mut self.produces,
            ListField::Schemes => &mut self.schemes,
        };
        target.extend(values.into_iter().map(Into::into));
    }

    pub fn list(&self, field: ListField) -> &IndexSet<String> {
        match field {
            ListField::Tags => &self.tags,
            ListField::Consumes => &self.consumes,
            ListField::Produces => &self.produces,
            ListField::Schemes => &self.schemes,
        }
    }

    /// Freeze into an [`Operation`] registered at `path`.
    ///
    /// Parameters still placed `Guess` take their recorded hint, or the method's default
    /// placement when they carry none. A partial builder without a method defaults to GET.
    pub fn build(self, path: &str) -> Operation {
        let method = self.method.unwrap_or(HttpMethod::Get);
        let fallback = method.placement_hint();

        let parameters = self
            .parameters
            .into_values()
            .map(|mut parameter| {
                parameter.resolve_placement(fallback);
                parameter
            })
            .collect();

        Operation {
            method,
            path: path.to_string(),
            class: self.class,
            function: self.function,
            summary: self.summary,
            description: self.description,
            operation_id: self.operation_id,
            deprecated: self.deprecated,
            tags: self.tags,
            consumes: self.consumes,
            produces: self.produces,
            schemes: self.schemes,
            parameters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_converter::TypeSpec;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_method_tokens() {
        assert_eq!(HttpMethod::from_token("get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::from_token("patch"), Some(HttpMethod::Patch));
        assert_eq!(HttpMethod::from_token("GET"), None);
        assert_eq!(HttpMethod::from_token("any"), None);
    }

    #[test]
    fn test_placement_hints() {
        for method in [HttpMethod::Get, HttpMethod::Head, HttpMethod::Options, HttpMethod::Delete] {
            assert_eq!(method.placement_hint(), ParameterLocation::Query);
        }
        for method in [HttpMethod::Post, HttpMethod::Put, HttpMethod::Patch] {
            assert_eq!(method.placement_hint(), ParameterLocation::Body);
        }
    }

    #[test]
    fn test_add_parameter_overwrites_in_place() {
        let mut builder = OperationBuilder::new(HttpMethod::Get, "Users", "list");
        builder.add_parameter(Parameter::new("a", ParameterLocation::Query, TypeSpec::default()));
        builder.add_parameter(Parameter::new("b", ParameterLocation::Query, TypeSpec::default()));
        builder.add_parameter(Parameter::path("a", TypeSpec::new("integer")));

        let names: Vec<_> = builder.parameters().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(builder.parameter("a").unwrap().location, ParameterLocation::Path);
    }

    #[test]
    fn test_merge_list_deduplicates() {
        let mut builder = OperationBuilder::new(HttpMethod::Get, "Users", "list");
        builder.merge_list(ListField::Tags, ["a", "b"]);
        builder.merge_list(ListField::Tags, ["b", "c"]);

        let tags: Vec<_> = builder.list(ListField::Tags).iter().cloned().collect();
        assert_eq!(tags, vec!["a", "b", "c"]);
        assert!(builder.list(ListField::Schemes).is_empty());
    }

    #[test]
    fn test_build_resolves_guessed_placement() {
        let mut builder = OperationBuilder::new(HttpMethod::Put, "Users", "update");
        builder.add_parameter(Parameter::guessed("name", TypeSpec::default(), ParameterLocation::Query));
        builder.add_parameter(Parameter::new("bio", ParameterLocation::Guess, TypeSpec::default()));

        let operation = builder.build("/users/{id}");

        assert_eq!(operation.method, HttpMethod::Put);
        assert_eq!(operation.path, "/users/{id}");
        assert_eq!(operation.class.as_deref(), Some("Users"));
        assert_eq!(operation.parameter("name").unwrap().location, ParameterLocation::Query);
        assert_eq!(operation.parameter("bio").unwrap().location, ParameterLocation::Body);
    }

    #[test]
    fn test_serialized_operation_shape() {
        let mut builder = OperationBuilder::new(HttpMethod::Get, "Users", "show");
        builder.operation_id = Some("showUser".to_string());
        builder.add_parameter(Parameter::path("id", TypeSpec::new("integer")));
        let value = serde_json::to_value(builder.build("/users/{id}")).unwrap();

        assert_eq!(value["method"], "get");
        assert_eq!(value["operationId"], "showUser");
        assert_eq!(value["deprecated"], false);
        assert_eq!(value["parameters"][0]["in"], "path");
        assert_eq!(value["parameters"][0]["type"], "integer");
        assert!(value.get("tags").is_none());
        assert!(value["parameters"][0].get("placement_hint").is_none());
    }
}
