//! CLI module for starwars
//!
//! The automation host runs the binary with a single positional argument, the
//! path of the module arguments file. The remaining flags make the same module
//! usable by hand.

pub mod output;

use crate::catalog::OrderingScheme;
use crate::invocation::ModuleInvocation;
use crate::modules::ModuleParams;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// starwars - Ansible binary module returning Star Wars saga movie titles
#[derive(Parser, Debug, Clone)]
#[command(name = "starwars")]
#[command(version)]
#[command(about = "Return the title of a Star Wars movie as an Ansible module", long_about = None)]
pub struct Cli {
    /// Module arguments file supplied by the automation host
    #[arg(conflicts_with_all = ["movie", "scheme", "check_mode", "list", "doc"])]
    pub args_file: Option<PathBuf>,

    /// Movie number (1-9) for direct invocation
    #[arg(long, allow_negative_numbers = true)]
    pub movie: Option<i64>,

    /// Ordering scheme: chronological or released
    #[arg(long)]
    pub scheme: Option<String>,

    /// Run in check mode (dry-run, no lookup)
    #[arg(long = "check", requires = "movie")]
    pub check_mode: bool,

    /// List all movies in scheme order
    #[arg(long, conflicts_with_all = ["movie", "doc"])]
    pub list: bool,

    /// Print the module documentation as YAML
    #[arg(long, conflicts_with = "movie")]
    pub doc: bool,

    /// Output format
    #[arg(short = 'o', long)]
    pub output: Option<OutputFormat>,

    /// Path to configuration file
    #[arg(short = 'c', long, env = "STARWARS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv), logged to stderr
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Module result JSON, as the host expects it
    #[default]
    Json,
    /// Human-readable output with colors
    Human,
}

/// What the binary was asked to do
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Run the module with an arguments file from the host
    ArgsFile(PathBuf),
    /// Run the module with arguments given as flags
    Direct(ModuleInvocation),
    /// List the catalog in the named scheme's order
    List(String),
    /// Print module documentation
    Doc,
    /// Nothing to do
    Missing,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Get the effective verbosity level (0-3)
    pub fn verbosity(&self) -> u8 {
        self.verbose.min(3)
    }

    /// Resolve the requested action
    pub fn action(&self) -> Action {
        if let Some(path) = &self.args_file {
            return Action::ArgsFile(path.clone());
        }
        if self.doc {
            return Action::Doc;
        }
        if self.list {
            let scheme = self
                .scheme
                .clone()
                .unwrap_or_else(|| OrderingScheme::default().to_string());
            return Action::List(scheme);
        }
        match self.movie {
            Some(movie) => {
                let mut params = ModuleParams::new();
                params.insert("movie".to_string(), serde_json::Value::from(movie));
                if let Some(scheme) = &self.scheme {
                    params.insert("scheme".to_string(), serde_json::Value::from(scheme.as_str()));
                }
                Action::Direct(ModuleInvocation::new(params).with_check_mode(self.check_mode))
            }
            None => Action::Missing,
        }
    }

    /// Effective output format: flag, then configuration
    pub fn output_format(&self, config_is_human: bool) -> OutputFormat {
        match self.output {
            Some(format) => format,
            None if config_is_human => OutputFormat::Human,
            None => OutputFormat::Json,
        }
    }
}
