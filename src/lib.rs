//! Route-to-operation resolver.
//!
//! Turns reflected route tables (controller actions with route patterns and inline
//! annotations) into a normalized model of API operations keyed by path and HTTP method.
//!
//! # Architecture
//!
//! 1. [`action`] - Route table records produced by an external reflector
//! 2. [`type_converter`] - Maps type tokens to normalized types
//! 3. [`parameter`] - Parameter model and the `parameter` annotation parser
//! 4. [`schema`] - Resolves named validation schemas into parameters
//! 5. [`fragment`] - Resolves named include fragments into parameters
//! 6. [`annotation`] - Applies annotations to operations under construction
//! 7. [`operation`] - Operation builder and the finalized model
//! 8. [`resolver`] - Orchestrates the above over every route of every action
//! 9. [`serializer`] - Writes the model as YAML or JSON
//!
//! # Example Usage
//!
//! ```no_run
//! use openapi_from_routes::{
//!     action::load_route_table,
//!     resolver::{ResolverConfig, RouteResolver},
//!     serializer::serialize_yaml,
//! };
//! use std::path::{Path, PathBuf};
//!
//! let actions = load_route_table(Path::new("routes.yml")).unwrap();
//!
//! let mut resolver = RouteResolver::new(ResolverConfig {
//!     schema_dir: PathBuf::from("app/schemas"),
//!     includes_dir: PathBuf::from("app/includes"),
//! });
//! let operations = resolver.get_operations(&actions).unwrap();
//!
//! println!("{}", serialize_yaml(&operations).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod action;
pub mod type_converter;
pub mod parameter;
pub mod schema;
pub mod fragment;
pub mod annotation;
pub mod operation;
pub mod resolver;
pub mod serializer;
pub mod error;
