//! starwars - Ansible binary module returning Star Wars movie titles
//!
//! The host copies this binary to the target and runs it with the path of a
//! JSON arguments file. The result is a single JSON object on stdout; logs
//! never go to stdout.

use anyhow::Result;
use starwars::catalog;
use starwars::cli::output::{render_list, render_response};
use starwars::cli::{Action, Cli, OutputFormat};
use starwars::config::Config;
use starwars::error::Error;
use starwars::invocation::{self, ModuleInvocation, ModuleResponse};
use starwars::modules::movie::MovieModule;
use starwars::modules::ModuleRegistry;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::{debug, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Name under which the binary's module is registered
const MODULE_NAME: &str = "movie";

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let config = Config::load(cli.config.as_ref());
    let log_config = config.as_ref().map(|c| c.logging.clone()).unwrap_or_default();
    init_logging(cli.verbosity(), &log_config);

    let config = config.unwrap_or_else(|e| {
        warn!("Failed to load config: {:#}", e);
        Config::default()
    });

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    let format = cli.output_format(config.is_human_output());
    let registry = ModuleRegistry::with_builtins();

    let exit_code = match cli.action() {
        Action::Doc => {
            print!("{}", serde_yaml::to_string(&MovieModule::documentation())?);
            0
        }
        Action::List(scheme) => list(&scheme, format)?,
        Action::ArgsFile(path) => {
            let response = match ModuleInvocation::from_args_file(&path) {
                Ok(invocation) => run_module(&registry, &config, &invocation),
                Err(e) => ModuleResponse::from_error(&e),
            };
            emit(&response, format)
        }
        Action::Direct(invocation) => {
            let response = run_module(&registry, &config, &invocation);
            emit(&response, format)
        }
        Action::Missing => {
            let err = Error::args_parse(
                "no module arguments given: pass an arguments file, --movie, --list or --doc",
            );
            emit(&ModuleResponse::from_error(&err), format)
        }
    };

    std::process::exit(exit_code);
}

/// Initialize logging based on verbosity level and configuration
fn init_logging(verbosity: u8, config: &starwars::config::LoggingConfig) {
    let filter = match verbosity {
        0 => config.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let log_file = config.log_path.as_ref().and_then(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });

    match log_file {
        Some(file) => tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .with(env_filter)
            .init(),
        None => tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(verbosity >= 3)
                    .with_writer(std::io::stderr),
            )
            .with(env_filter)
            .init(),
    }
}

fn run_module(
    registry: &ModuleRegistry,
    config: &Config,
    invocation: &ModuleInvocation,
) -> ModuleResponse {
    if let Err(e) = config.validate(registry) {
        warn!("Ignoring module_defaults: {}", e);
        return invocation::run(
            registry,
            MODULE_NAME,
            invocation,
            &invocation.context(Default::default()),
        );
    }

    let context = invocation.context(config.module_defaults.clone());
    debug!(check_mode = context.check_mode, "running module");
    invocation::run(registry, MODULE_NAME, invocation, &context)
}

/// Print the response and return the exit code the host expects
fn emit(response: &ModuleResponse, format: OutputFormat) -> i32 {
    match format {
        OutputFormat::Json => println!("{}", response.to_json()),
        OutputFormat::Human => println!("{}", render_response(response)),
    }
    response.exit_code()
}

fn list(scheme: &str, format: OutputFormat) -> Result<i32> {
    let scheme: catalog::OrderingScheme = match scheme.parse() {
        Ok(scheme) => scheme,
        Err(e) => return Ok(emit(&ModuleResponse::from_error(&Error::from(e)), format)),
    };

    match format {
        OutputFormat::Human => print!("{}", render_list(scheme.as_str(), catalog::iter(scheme))),
        OutputFormat::Json => {
            let movies: Vec<serde_json::Value> = catalog::iter(scheme)
                .map(|(position, movie)| {
                    serde_json::json!({
                        "position": position,
                        "id": movie.id,
                        "title": movie.title,
                        "trilogy": movie.trilogy,
                        "trilogy_sequence": movie.sequence,
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "scheme": scheme,
                    "movies": movies,
                }))?
            );
        }
    }
    Ok(0)
}
