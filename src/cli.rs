use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::path::PathBuf;

/// Resolve an annotated route table into a normalized API operation model
#[derive(Parser, Debug)]
#[command(name = "openapi-from-routes")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Route table dumped by the reflector (YAML or JSON)
    #[arg(value_name = "ROUTES")]
    pub routes_path: PathBuf,

    /// Directory holding validation schemas referenced by `params` / `validate`
    #[arg(short = 's', long = "schemas", value_name = "DIR", default_value = "schemas")]
    pub schema_dir: PathBuf,

    /// Directory holding include fragments referenced by `include`
    #[arg(short = 'i', long = "includes", value_name = "DIR", default_value = "includes")]
    pub includes_dir: PathBuf,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

impl CliArgs {
    /// Resolver configuration carried by these arguments
    pub fn resolver_config(&self) -> crate::resolver::ResolverConfig {
        crate::resolver::ResolverConfig {
            schema_dir: self.schema_dir.clone(),
            includes_dir: self.includes_dir.clone(),
        }
    }
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.routes_path.exists() {
        anyhow::bail!(
            "Route table does not exist: {}",
            args.routes_path.display()
        );
    }

    if !args.routes_path.is_file() {
        anyhow::bail!(
            "Route table is not a file: {}",
            args.routes_path.display()
        );
    }

    // Only routes that reference schemas or fragments need these
    for (label, dir) in [("Schema", &args.schema_dir), ("Includes", &args.includes_dir)] {
        if !dir.is_dir() {
            warn!("{} directory not found: {}", label, dir.display());
        }
    }

    info!("Route table: {}", args.routes_path.display());
    info!("Schema directory: {}", args.schema_dir.display());
    info!("Includes directory: {}", args.includes_dir.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::action::load_route_table;
    use crate::resolver::RouteResolver;
    use crate::serializer::{serialize_json, serialize_yaml, write_to_file};

    info!("Starting operation resolution...");

    // Step 1: Load the reflected route table
    let actions = load_route_table(&args.routes_path)
        .with_context(|| format!("Failed to load route table: {}", args.routes_path.display()))?;
    info!("Loaded {} actions", actions.len());

    if actions.is_empty() {
        warn!("No actions found in the route table");
    }

    // Step 2: Resolve routes into operations
    let mut resolver = RouteResolver::new(args.resolver_config());
    let operations = resolver
        .get_operations(&actions)
        .context("Failed to resolve operations")?;

    let operation_count: usize = operations.values().map(|methods| methods.len()).sum();
    info!("Resolved {} operations across {} paths", operation_count, operations.len());

    // Step 3: Serialize to requested format
    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&operations)?,
        OutputFormat::Json => serialize_json(&operations)?,
    };

    // Step 4: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
        info!("Successfully wrote operations to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    info!("Summary:");
    info!("  - Actions: {}", actions.len());
    info!("  - Paths: {}", operations.len());
    info!("  - Operations: {}", operation_count);

    Ok(())
}
