use log::warn;
use serde::{Deserialize, Serialize};

/// Normalized scalar type of a parameter.
///
/// Produced by [`TypeConverter::convert`] from the loose type tokens found in annotations,
/// route placeholders and schema field definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSpec {
    /// The normalized type name (e.g. "integer", "string")
    #[serde(rename = "type")]
    pub type_name: String,
    /// Optional format qualifier (e.g. "float")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Regex source for pattern-typed values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl TypeSpec {
    /// Create a TypeSpec with only a type name
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            format: None,
            pattern: None,
        }
    }
}

impl Default for TypeSpec {
    fn default() -> Self {
        Self::new("string")
    }
}

/// Maps type tokens to normalized [`TypeSpec`]s.
pub struct TypeConverter;

impl TypeConverter {
    /// Converts a type token.
    ///
    /// Known tokens map through a fixed table. A token starting with `/` is a delimited
    /// regex literal: the first and last characters are stripped and the body becomes the
    /// pattern of a string. Any other token is logged as unknown and passed through verbatim.
    pub fn convert(token: &str) -> TypeSpec {
        match token {
            "int" => TypeSpec::new("integer"),
            "float" => TypeSpec {
                type_name: "number".to_string(),
                format: Some("float".to_string()),
                pattern: None,
            },
            "bool" | "boolean" => TypeSpec::new("boolean"),
            "string" | "email" => TypeSpec::new("string"),
            "array" => TypeSpec::new("array"),
            _ => {
                if let Some(body) = token.strip_prefix('/') {
                    let mut chars = body.chars();
                    chars.next_back();
                    TypeSpec {
                        type_name: "string".to_string(),
                        format: None,
                        pattern: Some(chars.as_str().to_string()),
                    }
                } else {
                    warn!("Unknown type [{}]", token);
                    TypeSpec::new(token)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_mappings() {
        assert_eq!(TypeConverter::convert("int"), TypeSpec::new("integer"));
        assert_eq!(TypeConverter::convert("bool"), TypeSpec::new("boolean"));
        assert_eq!(TypeConverter::convert("boolean"), TypeSpec::new("boolean"));
        assert_eq!(TypeConverter::convert("string"), TypeSpec::new("string"));
        assert_eq!(TypeConverter::convert("email"), TypeSpec::new("string"));
        assert_eq!(TypeConverter::convert("array"), TypeSpec::new("array"));
    }

    #[test]
    fn test_float_has_format() {
        let spec = TypeConverter::convert("float");
        assert_eq!(spec.type_name, "number");
        assert_eq!(spec.format.as_deref(), Some("float"));
        assert!(spec.pattern.is_none());
    }

    #[test]
    fn test_regex_literal() {
        let spec = TypeConverter::convert("/[a-z]+/");
        assert_eq!(spec.type_name, "string");
        assert_eq!(spec.pattern.as_deref(), Some("[a-z]+"));
    }

    #[test]
    fn test_regex_literal_with_other_delimiter_end() {
        // Only the first and last characters are stripped
        let spec = TypeConverter::convert("/\\d{4}#");
        assert_eq!(spec.pattern.as_deref(), Some("\\d{4}"));
    }

    #[test]
    fn test_unknown_type_passes_through() {
        let spec = TypeConverter::convert("uuid");
        assert_eq!(spec, TypeSpec::new("uuid"));
    }

    #[test]
    fn test_mapping_is_case_sensitive() {
        assert_eq!(TypeConverter::convert("Int").type_name, "Int");
    }

    #[test]
    fn test_convert_is_idempotent() {
        for token in ["int", "float", "bool", "boolean", "string", "email", "array", "/x/"] {
            assert_eq!(TypeConverter::convert(token), TypeConverter::convert(token));
        }
    }
}
