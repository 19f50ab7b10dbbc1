use std::path::PathBuf;

/// Result type alias for the resolver
pub type Result<T> = std::result::Result<T, Error>;

/// Kind of named source a route can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Field-validation schema (`params` / `validate` annotations)
    Schema,
    /// Shared parameter fragment (`include` annotation)
    Fragment,
}

/// Error types for the resolver
#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),
    /// A referenced schema or fragment does not exist
    Resolution {
        kind: SourceKind,
        name: String,
        path: PathBuf,
    },
    /// A source exists but could not be read as the expected structure
    InvalidSource { path: PathBuf, message: String },
    /// A `parameter` annotation without a well-formed `$name` token
    MalformedAnnotation { annotation: String, message: String },
    InvalidAction(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "IO error: {}", e),
            Error::Resolution { kind, name, path } => {
                let what = match kind {
                    SourceKind::Schema => "validation schema",
                    SourceKind::Fragment => "include fragment",
                };
                write!(
                    f,
                    "Could not resolve {} {}, looked in {}",
                    what,
                    name,
                    path.display()
                )
            }
            Error::InvalidSource { path, message } => {
                write!(f, "Invalid source {}: {}", path.display(), message)
            }
            Error::MalformedAnnotation {
                annotation,
                message,
            } => write!(f, "Malformed annotation [{}]: {}", annotation, message),
            Error::InvalidAction(msg) => write!(f, "Invalid action: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_error_message() {
        let err = Error::Resolution {
            kind: SourceKind::Schema,
            name: "user".to_string(),
            path: PathBuf::from("schemas/user.yml"),
        };

        assert_eq!(
            err.to_string(),
            "Could not resolve validation schema user, looked in schemas/user.yml"
        );
    }

    #[test]
    fn test_io_error_has_source() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();

        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("IO error"));
    }
}
