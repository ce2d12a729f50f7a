//! caps - capability resolver CLI
//!
//! Reads a cluster-version manifest, resolves which capabilities are known,
//! enabled, and implicitly enabled, and prints the resulting status.

use caps_common::{CapabilitiesStatus, Capability, OutputFormat, StructuredError};
use caps_config::validate::{unknown_capabilities, validate_spec};
use caps_config::{load_manifest, load_registry, RegistrySnapshot};
use caps_core::exit_codes::ExitCode;
use caps_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use caps_core::{implicitly_enabled_condition, project_status, resolve, ClusterCapabilities, Condition};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// Capability resolver - derive enabled cluster capabilities from a manifest
#[derive(Parser)]
#[command(name = "caps")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to a capability registry (default: $CAPS_REGISTRY, XDG, /etc, builtin)
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve known, enabled, and implicitly enabled capabilities
    Resolve(ResolveArgs),

    /// List baseline capability sets, or the members of one set
    Sets(SetsArgs),

    /// Validate a manifest's capabilities spec against the registry
    Validate(ValidateArgs),

    /// Print the JSON schema of an output type
    Schema(SchemaArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct ResolveArgs {
    /// Cluster-version manifest (YAML or JSON)
    #[arg(long, short = 'm')]
    manifest: PathBuf,

    /// Previously enabled capabilities (overrides the manifest status)
    #[arg(long, value_delimiter = ',', conflicts_with = "no_prior")]
    prior: Vec<String>,

    /// Ignore the manifest status; resolve as a first reconciliation
    #[arg(long)]
    no_prior: bool,
}

#[derive(Args, Debug)]
struct SetsArgs {
    /// Baseline set to show
    name: Option<String>,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Cluster-version manifest (YAML or JSON)
    #[arg(long, short = 'm')]
    manifest: PathBuf,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Which output type
    #[arg(value_enum, default_value = "status")]
    kind: SchemaKind,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SchemaKind {
    /// Reported capabilities status
    Status,
    /// Full resolved state
    Capabilities,
    /// ImplicitlyEnabledCapabilities condition
    Condition,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolveReport {
    status: CapabilitiesStatus,
    implicitly_enabled: Vec<Capability>,
    unknown_enabled: Vec<Capability>,
    condition: Condition,
    registry: RegistrySnapshot,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SetEntry {
    name: String,
    default: bool,
    capabilities: Vec<Capability>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateReport {
    valid: bool,
    baseline_capability_set: String,
    unknown_capabilities: Vec<Capability>,
}

fn main() -> std::process::ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::ArgsError.into()
            } else {
                ExitCode::Clean.into()
            };
        }
    };

    let level = if cli.global.quiet {
        LogLevel::Error
    } else {
        LogLevel::from_verbosity(cli.global.verbose)
    };
    let cli_level = (cli.global.quiet || cli.global.verbose > 0).then_some(level);
    init_logging(&LogConfig::from_env(cli_level, cli.global.log_format));

    let format = cli.global.format;
    let result = match &cli.command {
        Commands::Resolve(args) => run_resolve(&cli.global, args),
        Commands::Sets(args) => run_sets(&cli.global, args),
        Commands::Validate(args) => run_validate(&cli.global, args),
        Commands::Schema(args) => run_schema(args),
        Commands::Version => Ok(Output::Text(format!(
            "caps {}",
            env!("CARGO_PKG_VERSION")
        ))),
    };

    match result {
        Ok(output) => match output.render(format) {
            Ok(text) => match write_stdout(&mut std::io::stdout().lock(), &text) {
                Ok(()) => ExitCode::Clean.into(),
                Err(err) => {
                    eprintln!("{}", caps_common::Error::from(err).format_human());
                    ExitCode::IoError.into()
                }
            },
            Err(err) => {
                eprintln!("{}", err.format_human());
                ExitCode::InternalError.into()
            }
        },
        Err(err) => {
            tracing::error!(code = err.code(), "{}", err);
            eprintln!("{}", err.format_human());
            if format == OutputFormat::Json {
                let _ = write_stdout(
                    &mut std::io::stdout().lock(),
                    &StructuredError::from(&err).to_json(),
                );
            }
            ExitCode::for_error(&err).into()
        }
    }
}

/// Write one line to stdout. A reader that hung up early is not an error.
fn write_stdout<W: Write>(out: &mut W, text: &str) -> std::io::Result<()> {
    match writeln!(out, "{}", text).and_then(|()| out.flush()) {
        Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

/// Command output: a serializable payload plus its one-line summary.
enum Output {
    Payload {
        value: serde_json::Value,
        summary: String,
    },
    Text(String),
}

impl Output {
    fn payload<T: Serialize>(value: &T, summary: String) -> caps_common::Result<Self> {
        Ok(Output::Payload {
            value: serde_json::to_value(value)?,
            summary,
        })
    }

    fn render(self, format: OutputFormat) -> caps_common::Result<String> {
        match self {
            Output::Text(text) => Ok(text),
            Output::Payload { value, summary } => match format {
                OutputFormat::Json => Ok(serde_json::to_string_pretty(&value)?),
                OutputFormat::Yaml => serde_yaml::to_string(&value)
                    .map_err(|e| caps_common::Error::Yaml(e.to_string())),
                OutputFormat::Summary => Ok(summary),
            },
        }
    }
}

fn run_resolve(global: &GlobalOpts, args: &ResolveArgs) -> caps_common::Result<Output> {
    let loaded = load_registry(global.registry.as_deref())?;
    let manifest = load_manifest(&args.manifest)?;
    let spec = manifest.capabilities();

    validate_spec(spec, &loaded.registry)?;
    for cap in unknown_capabilities(spec, &loaded.registry) {
        tracing::warn!(capability = %cap, "additional capability is not known to the registry");
    }

    let prior: Vec<Capability> = if args.no_prior {
        Vec::new()
    } else if !args.prior.is_empty() {
        prior_from_args(&args.prior)
    } else {
        manifest.prior_enabled()
    };

    let caps = resolve(&loaded.registry, spec, &prior);
    let report = ResolveReport {
        status: project_status(&caps),
        implicitly_enabled: caps.implicitly_enabled().cloned().collect(),
        unknown_enabled: caps.unknown_enabled().cloned().collect(),
        condition: implicitly_enabled_condition(&caps, chrono::Utc::now()),
        registry: loaded.snapshot(),
    };

    tracing::info!(
        manifest = %args.manifest.display(),
        enabled = caps.enabled.len(),
        implicitly_enabled = report.implicitly_enabled.len(),
        "resolved capabilities"
    );

    let summary = format!(
        "baseline={} enabled={} known={} implicitly_enabled={}",
        spec.and_then(|s| s.baseline_name())
            .unwrap_or(loaded.registry.default_set.as_str()),
        caps.enabled.len(),
        caps.known.len(),
        report.implicitly_enabled.len()
    );
    Output::payload(&report, summary)
}

/// `--prior` names, skipping blanks left by `--prior ""` or stray commas.
fn prior_from_args(names: &[String]) -> Vec<Capability> {
    names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(Capability::from)
        .collect()
}

fn run_sets(global: &GlobalOpts, args: &SetsArgs) -> caps_common::Result<Output> {
    let loaded = load_registry(global.registry.as_deref())?;
    let registry = &loaded.registry;

    let entries: Vec<SetEntry> = match &args.name {
        Some(name) => {
            let members = registry
                .baseline(name)
                .ok_or_else(|| caps_common::Error::UnknownBaselineSet { name: name.clone() })?;
            vec![SetEntry {
                name: name.clone(),
                default: *name == registry.default_set,
                capabilities: caps_common::sorted_list(members),
            }]
        }
        None => registry
            .sets
            .iter()
            .map(|(name, members)| SetEntry {
                name: name.clone(),
                default: *name == registry.default_set,
                capabilities: caps_common::sorted_list(members),
            })
            .collect(),
    };

    let summary = entries
        .iter()
        .map(|entry| format!("{}({})", entry.name, entry.capabilities.len()))
        .collect::<Vec<_>>()
        .join(" ");
    Output::payload(&entries, summary)
}

fn run_validate(global: &GlobalOpts, args: &ValidateArgs) -> caps_common::Result<Output> {
    let loaded = load_registry(global.registry.as_deref())?;
    let manifest = load_manifest(&args.manifest)?;
    let spec = manifest.capabilities();

    validate_spec(spec, &loaded.registry)?;

    let report = ValidateReport {
        valid: true,
        baseline_capability_set: spec
            .and_then(|s| s.baseline_name())
            .unwrap_or(loaded.registry.default_set.as_str())
            .to_string(),
        unknown_capabilities: unknown_capabilities(spec, &loaded.registry),
    };
    let summary = format!(
        "valid baseline={} unknown={}",
        report.baseline_capability_set,
        report.unknown_capabilities.len()
    );
    Output::payload(&report, summary)
}

fn run_schema(args: &SchemaArgs) -> caps_common::Result<Output> {
    let schema = match args.kind {
        SchemaKind::Status => schemars::schema_for!(CapabilitiesStatus),
        SchemaKind::Capabilities => schemars::schema_for!(ClusterCapabilities),
        SchemaKind::Condition => schemars::schema_for!(Condition),
    };
    Output::payload(&schema, format!("{:?}", args.kind).to_lowercase())
}
