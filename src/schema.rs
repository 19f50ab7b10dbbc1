use crate::error::{Error, Result, SourceKind};
use crate::parameter::{Parameter, ParameterLocation};
use crate::type_converter::TypeConverter;
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions tried, in order, when locating a named source
pub(crate) const SOURCE_EXTENSIONS: [&str; 3] = ["yml", "yaml", "json"];

/// Field-validation schema as stored on disk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaSource {
    /// Field name -> definition, in declaration order
    #[serde(default)]
    pub fields: IndexMap<String, FieldDefinition>,
    /// Field name -> public name
    #[serde(default)]
    pub aliases: IndexMap<String, AliasTarget>,
}

impl SchemaSource {
    /// Describe the first field or alias that would yield a parameter without a name
    fn unnamed_field(&self) -> Option<String> {
        if self.fields.contains_key("") {
            return Some("field with an empty name".to_string());
        }
        self.aliases
            .iter()
            .find(|(_, target)| target.replacement() == Some(""))
            .map(|(field, _)| format!("empty alias for field {}", field))
    }
}

/// Definition of one schema field.
///
/// Validator schemas carry more keys than these; the rest are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldDefinition {
    #[serde(rename = "type")]
    pub field_type: Option<String>,
    /// Only a boolean counts; any other value means "not required"
    pub required: Option<serde_yaml::Value>,
}

/// Alias declaration: either the replacement name or a list led by it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AliasTarget {
    Name(String),
    List(Vec<String>),
}

impl AliasTarget {
    fn replacement(&self) -> Option<&str> {
        match self {
            AliasTarget::Name(name) => Some(name),
            AliasTarget::List(names) => names.first().map(String::as_str),
        }
    }
}

/// Locate `<dir>/<name>.<ext>` for the first extension that exists.
///
/// On failure the error names the path for the first extension.
pub(crate) fn locate_source(
    dir: &Path,
    name: &str,
    kind: SourceKind,
    extensions: &[&str],
) -> Result<PathBuf> {
    extensions
        .iter()
        .map(|ext| dir.join(format!("{}.{}", name, ext)))
        .find(|path| path.is_file())
        .ok_or_else(|| Error::Resolution {
            kind,
            name: name.to_string(),
            path: dir.join(format!("{}.{}", name, extensions[0])),
        })
}

/// Read and deserialize a structured source file
pub(crate) fn read_source<T>(path: &Path) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(|e| Error::InvalidSource {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Resolves named validation schemas into parameter lists.
///
/// Sources are parsed once per name and cached for the lifetime of the resolver.
pub struct SchemaResolver {
    schema_dir: PathBuf,
    cache: HashMap<String, SchemaSource>,
}

impl SchemaResolver {
    pub fn new(schema_dir: PathBuf) -> Self {
        debug!("Initializing SchemaResolver in {}", schema_dir.display());
        Self {
            schema_dir,
            cache: HashMap::new(),
        }
    }

    /// Resolves schema `name` into parameters placed `Guess` with `hint` recorded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Resolution`] if no source exists for `name`, or
    /// [`Error::InvalidSource`] if it cannot be parsed or would yield an unnamed parameter.
    pub fn resolve(&mut self, name: &str, hint: ParameterLocation) -> Result<Vec<Parameter>> {
        let source = self.load(name)?;

        let parameters = source
            .fields
            .iter()
            .map(|(field, definition)| {
                let type_spec = TypeConverter::convert(
                    definition.field_type.as_deref().unwrap_or("string"),
                );
                let required = definition
                    .required
                    .as_ref()
                    .and_then(serde_yaml::Value::as_bool)
                    .unwrap_or(false);

                let mut parameter =
                    Parameter::guessed(field, type_spec, hint).with_required(required);

                if let Some(target) = source.aliases.get(field).and_then(AliasTarget::replacement) {
                    parameter.alias = Some(field.clone());
                    parameter.name = target.to_string();
                }

                parameter
            })
            .collect::<Vec<_>>();

        debug!("Schema {} resolved to {} parameters", name, parameters.len());
        Ok(parameters)
    }

    fn load(&mut self, name: &str) -> Result<&SchemaSource> {
        if !self.cache.contains_key(name) {
            let path = locate_source(&self.schema_dir, name, SourceKind::Schema, &SOURCE_EXTENSIONS)?;
            debug!("Loading validation schema {} from {}", name, path.display());
            let source: SchemaSource = read_source(&path)?;
            if let Some(message) = source.unnamed_field() {
                return Err(Error::InvalidSource { path, message });
            }
            self.cache.insert(name.to_string(), source);
        }
        Ok(&self.cache[name])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn schema_dir(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(temp_dir.path().join(name), content).unwrap();
        }
        temp_dir
    }

    #[test]
    fn test_resolve_fields_in_order() {
        let dir = schema_dir(&[(
            "user.yml",
            "fields:\n  name:\n    type: string\n    required: true\n  age:\n    type: int\n  score:\n    type: float\n",
        )]);
        let mut resolver = SchemaResolver::new(dir.path().to_path_buf());

        let parameters = resolver.resolve("user", ParameterLocation::Body).unwrap();

        let names: Vec<_> = parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["name", "age", "score"]);
        assert!(parameters[0].required);
        assert!(!parameters[1].required);
        assert_eq!(parameters[1].param_type, "integer");
        assert_eq!(parameters[2].format.as_deref(), Some("float"));
        assert!(parameters
            .iter()
            .all(|p| p.location == ParameterLocation::Guess
                && p.placement_hint == Some(ParameterLocation::Body)));
    }

    #[test]
    fn test_field_defaults() {
        let dir = schema_dir(&[("loose.yml", "fields:\n  note: {}\n  flag:\n    required: 'yes'\n")]);
        let mut resolver = SchemaResolver::new(dir.path().to_path_buf());

        let parameters = resolver.resolve("loose", ParameterLocation::Query).unwrap();

        assert_eq!(parameters[0].param_type, "string");
        assert!(!parameters[0].required);
        // non-boolean `required` is ignored
        assert!(!parameters[1].required);
    }

    #[test]
    fn test_aliases() {
        let dir = schema_dir(&[(
            "alias.yml",
            "fields:\n  foo: {type: string}\n  baz: {type: int}\n  qux: {}\naliases:\n  foo: bar\n  baz: [quux, other]\n",
        )]);
        let mut resolver = SchemaResolver::new(dir.path().to_path_buf());

        let parameters = resolver.resolve("alias", ParameterLocation::Query).unwrap();

        assert_eq!(parameters[0].name, "bar");
        assert_eq!(parameters[0].alias.as_deref(), Some("foo"));
        assert_eq!(parameters[1].name, "quux");
        assert_eq!(parameters[1].alias.as_deref(), Some("baz"));
        assert_eq!(parameters[2].name, "qux");
        assert!(parameters[2].alias.is_none());
    }

    #[test]
    fn test_json_source() {
        let dir = schema_dir(&[(
            "login.json",
            r#"{"fields": {"email": {"type": "email", "required": true}}}"#,
        )]);
        let mut resolver = SchemaResolver::new(dir.path().to_path_buf());

        let parameters = resolver.resolve("login", ParameterLocation::Body).unwrap();

        assert_eq!(parameters.len(), 1);
        assert_eq!(parameters[0].param_type, "string");
        assert!(parameters[0].required);
    }

    #[test]
    fn test_missing_schema_is_resolution_error() {
        let dir = schema_dir(&[]);
        let mut resolver = SchemaResolver::new(dir.path().to_path_buf());

        let err = resolver.resolve("nope", ParameterLocation::Query).unwrap_err();

        match err {
            Error::Resolution { kind, name, path } => {
                assert_eq!(kind, SourceKind::Schema);
                assert_eq!(name, "nope");
                assert_eq!(path, dir.path().join("nope.yml"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_invalid_schema_source() {
        let dir = schema_dir(&[("bad.yml", "fields: [1, 2")]);
        let mut resolver = SchemaResolver::new(dir.path().to_path_buf());

        let result = resolver.resolve("bad", ParameterLocation::Query);

        assert!(matches!(result, Err(Error::InvalidSource { .. })));
    }

    #[test]
    fn test_rejects_empty_alias() {
        let dir = schema_dir(&[(
            "blank.yml",
            "fields:\n  foo: {type: string}\naliases:\n  foo: ''\n",
        )]);
        let mut resolver = SchemaResolver::new(dir.path().to_path_buf());

        let result = resolver.resolve("blank", ParameterLocation::Query);

        match result {
            Err(Error::InvalidSource { path, message }) => {
                assert_eq!(path, dir.path().join("blank.yml"));
                assert!(message.contains("foo"));
            }
            other => panic!("unexpected result: {:?}", other.map(|p| p.len())),
        }
    }

    #[test]
    fn test_cached_source_is_reused() {
        let dir = schema_dir(&[("user.yml", "fields:\n  name: {}\n")]);
        let mut resolver = SchemaResolver::new(dir.path().to_path_buf());

        let first = resolver.resolve("user", ParameterLocation::Query).unwrap();
        fs::remove_file(dir.path().join("user.yml")).unwrap();
        let second = resolver.resolve("user", ParameterLocation::Body).unwrap();

        assert_eq!(first[0].name, second[0].name);
        assert_eq!(second[0].placement_hint, Some(ParameterLocation::Body));
    }
}
