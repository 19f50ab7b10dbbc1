//! Annotation dispatch.
//!
//! Each annotation key maps to one [`AnnotationKey`] handler. Keys outside the table are
//! ignored so that reflectors may attach vocabulary this crate does not know about.

use crate::action::AnnotationValue;
use crate::error::Result;
use crate::fragment::FragmentResolver;
use crate::operation::{ListField, OperationBuilder};
use crate::parameter::{ParameterLocation, ParameterParser};
use crate::schema::SchemaResolver;
use log::debug;

/// Recognized annotation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKey {
    Summary,
    Description,
    OperationId,
    Deprecated,
    List(ListField),
    Parameter,
    /// `params` or `validate`: a validation schema name
    Schema,
    /// A shared parameter fragment name
    Include,
}

impl AnnotationKey {
    /// Case-insensitive lookup, `None` for unknown keys
    pub fn parse(key: &str) -> Option<Self> {
        let key = match key.to_ascii_lowercase().as_str() {
            "summary" => AnnotationKey::Summary,
            "description" => AnnotationKey::Description,
            "operationid" => AnnotationKey::OperationId,
            "deprecated" => AnnotationKey::Deprecated,
            "tags" => AnnotationKey::List(ListField::Tags),
            "consumes" => AnnotationKey::List(ListField::Consumes),
            "produces" => AnnotationKey::List(ListField::Produces),
            "schemes" => AnnotationKey::List(ListField::Schemes),
            "parameter" => AnnotationKey::Parameter,
            "params" | "validate" => AnnotationKey::Schema,
            "include" => AnnotationKey::Include,
            _ => return None,
        };
        Some(key)
    }
}

/// Applies annotations to operations under construction.
pub struct AnnotationApplier {
    schemas: SchemaResolver,
    fragments: FragmentResolver,
}

impl AnnotationApplier {
    pub fn new(schemas: SchemaResolver, fragments: FragmentResolver) -> Self {
        Self { schemas, fragments }
    }

    /// Applies one `(key, value)` annotation to `operation`.
    ///
    /// `hint` is the placement given to parameters whose location is not explicit.
    ///
    /// # Errors
    ///
    /// Fails on malformed `parameter` annotations and on schemas or fragments that cannot
    /// be resolved.
    pub fn apply(
        &mut self,
        key: &str,
        value: &AnnotationValue,
        operation: &mut OperationBuilder,
        hint: ParameterLocation,
    ) -> Result<()> {
        let Some(annotation) = AnnotationKey::parse(key) else {
            debug!("Ignoring unknown annotation: {}", key);
            return Ok(());
        };

        match annotation {
            AnnotationKey::Summary => operation.summary = Some(value.to_string()),
            AnnotationKey::Description => operation.description = Some(value.to_string()),
            AnnotationKey::OperationId => operation.operation_id = Some(value.to_string()),
            AnnotationKey::Deprecated => operation.deprecated = value.is_truthy(),
            AnnotationKey::List(field) => {
                let text = value.to_string();
                operation.merge_list(field, text.split(',').map(str::trim));
            }
            AnnotationKey::Parameter => {
                operation.add_parameter(ParameterParser::parse(&value.to_string(), hint)?);
            }
            AnnotationKey::Schema => {
                let parameters = self.schemas.resolve(&value.to_string(), hint)?;
                operation.merge_parameters(parameters);
            }
            AnnotationKey::Include => {
                let fragment =
                    self.fragments
                        .resolve(&value.to_string(), hint, &mut self.schemas)?;
                operation.merge_parameters(fragment.into_parameters());
            }
        }

        Ok(())
    }
}
