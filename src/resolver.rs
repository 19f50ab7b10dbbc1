use crate::action::Action;
use crate::annotation::AnnotationApplier;
use crate::error::Result;
use crate::fragment::FragmentResolver;
use crate::operation::{HttpMethod, OperationBuilder, Operations};
use crate::parameter::Parameter;
use crate::schema::SchemaResolver;
use crate::type_converter::TypeConverter;
use log::{debug, info};
use std::path::PathBuf;

/// Locations of the named sources routes may reference.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Directory holding validation schemas (`params` / `validate`)
    pub schema_dir: PathBuf,
    /// Directory holding include fragments (`include`)
    pub includes_dir: PathBuf,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            schema_dir: PathBuf::from("schemas"),
            includes_dir: PathBuf::from("includes"),
        }
    }
}

/// Route resolver - turns reflected actions into the operation model.
///
/// For every route pattern of every action the resolver derives the HTTP method and its
/// default parameter placement, applies the action's annotations, extracts `<type>name`
/// path placeholders and registers the finished operation under `result[path][method]`.
///
/// # Example
///
/// ```no_run
/// use openapi_from_routes::action::{Action, TargetRef};
/// use openapi_from_routes::resolver::{ResolverConfig, RouteResolver};
///
/// let action = Action::new(TargetRef::new("Controllers\\UsersController", "show"))
///     .with_route("GET/users/<int>id");
/// let mut resolver = RouteResolver::new(ResolverConfig::default());
/// let operations = resolver.get_operations(&[action]).unwrap();
/// assert!(operations.contains_key("/users/{id}"));
/// ```
pub struct RouteResolver {
    applier: AnnotationApplier,
}

impl RouteResolver {
    pub fn new(config: ResolverConfig) -> Self {
        debug!("Initializing RouteResolver with {:?}", config);
        Self {
            applier: AnnotationApplier::new(
                SchemaResolver::new(config.schema_dir),
                FragmentResolver::new(config.includes_dir),
            ),
        }
    }

    /// Resolves all actions, in order, into `path -> method -> operation`.
    ///
    /// Route patterns whose method is not one of get, post, put, delete, options, head or
    /// patch are skipped. A later operation for an already registered (path, method) pair
    /// replaces the earlier one.
    ///
    /// # Errors
    ///
    /// Any missing schema or fragment and any malformed `parameter` annotation aborts the
    /// whole run; no partial model is returned.
    pub fn get_operations(&mut self, actions: &[Action]) -> Result<Operations> {
        let mut operations = Operations::new();

        for action in actions {
            let class = action.target.short_class();
            let function = action.target.function.as_str();

            for route in &action.routes {
                let mut segments = tokenize_route(route);
                let method_token = segments.remove(0).trim().to_lowercase();

                let Some(method) = HttpMethod::from_token(&method_token) else {
                    debug!("Skipping route {} (unsupported method {})", route, method_token);
                    continue;
                };
                let hint = method.placement_hint();

                let mut operation = OperationBuilder::new(method, class, function);

                for (key, values) in &action.annotations {
                    for value in values {
                        self.applier.apply(key, value, &mut operation, hint)?;
                    }
                }

                for segment in segments.iter_mut() {
                    let placeholder = parse_placeholder(segment).map(|(type_token, name)| {
                        operation.add_parameter(Parameter::path(name, TypeConverter::convert(type_token)));
                        format!("{{{}}}", name)
                    });
                    if let Some(placeholder) = placeholder {
                        *segment = placeholder;
                    }
                }

                let path = format!("/{}", segments.join("/"));
                debug!("Resolved route: {} {} -> {}.{}", method, path, class, function);

                operations
                    .entry(path.clone())
                    .or_default()
                    .insert(method, operation.build(&path));
            }
        }

        info!("Resolved {} paths from {} actions", operations.len(), actions.len());
        Ok(operations)
    }
}

/// Split a route pattern on `/`.
///
/// A `/` directly after `<` or directly before `>` belongs to a placeholder type (for
/// instance a regex literal) and does not split.
pub fn tokenize_route(route: &str) -> Vec<String> {
    let chars: Vec<char> = route.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        let escaped = (i > 0 && chars[i - 1] == '<') || chars.get(i + 1) == Some(&'>');
        if c == '/' && !escaped {
            tokens.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    tokens.push(current);

    tokens
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Find the first `<type>name` placeholder inside a path segment.
///
/// The type is the shortest non-empty run between `<` and a `>` that is followed by at
/// least one word character; the name is the word run after it.
pub fn parse_placeholder(segment: &str) -> Option<(&str, &str)> {
    for (open, _) in segment.match_indices('<') {
        let type_start = open + 1;
        for (close, _) in segment[type_start..].match_indices('>') {
            let close = type_start + close;
            if close == type_start {
                continue;
            }
            let rest = &segment[close + 1..];
            let name_len = rest.find(|c: char| !is_word_char(c)).unwrap_or(rest.len());
            if name_len > 0 {
                return Some((&segment[type_start..close], &rest[..name_len]));
            }
        }
    }
    None
}
