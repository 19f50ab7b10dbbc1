use crate::error::{Error, Result, SourceKind};
use crate::operation::OperationBuilder;
use crate::parameter::{Parameter, ParameterLocation};
use crate::schema::{locate_source, read_source, SchemaResolver};
use log::debug;
use serde::Deserialize;
use std::path::PathBuf;

const FRAGMENT_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// Include fragment as stored on disk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FragmentSource {
    #[serde(default)]
    pub parameters: Vec<FragmentEntry>,
}

/// One entry of a fragment's `parameters` list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FragmentEntry {
    /// Reference to a validation schema whose fields are merged in
    SchemaRef {
        #[serde(rename = "x-include-schema")]
        schema: String,
    },
    Parameter(Parameter),
}

/// Resolves named include fragments into partial operations.
pub struct FragmentResolver {
    includes_dir: PathBuf,
}

impl FragmentResolver {
    pub fn new(includes_dir: PathBuf) -> Self {
        debug!("Initializing FragmentResolver in {}", includes_dir.display());
        Self { includes_dir }
    }

    /// Resolves fragment `name` into a builder carrying only parameters.
    ///
    /// Schema references are expanded through `schemas`. Direct entries are used as written;
    /// those without an explicit `in` are placed at `hint` once the operation is built.
    ///
    /// # Errors
    ///
    /// Returns a resolution error if the fragment, or a schema it references, is missing.
    pub fn resolve(
        &self,
        name: &str,
        hint: ParameterLocation,
        schemas: &mut SchemaResolver,
    ) -> Result<OperationBuilder> {
        let path = locate_source(&self.includes_dir, name, SourceKind::Fragment, &FRAGMENT_EXTENSIONS)?;
        debug!("Loading include fragment {} from {}", name, path.display());
        let source: FragmentSource = read_source(&path)?;

        let mut operation = OperationBuilder::partial();
        for entry in source.parameters {
            match entry {
                FragmentEntry::SchemaRef { schema } => {
                    operation.merge_parameters(schemas.resolve(&schema, hint)?);
                }
                FragmentEntry::Parameter(mut parameter) => {
                    if parameter.name.is_empty() {
                        return Err(Error::InvalidSource {
                            path,
                            message: "parameter entry with an empty name".to_string(),
                        });
                    }
                    if parameter.location == ParameterLocation::Guess {
                        parameter.placement_hint = Some(hint);
                    }
                    operation.add_parameter(parameter);
                }
            }
        }

        Ok(operation)
    }
}
