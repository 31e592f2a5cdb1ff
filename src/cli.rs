use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::application::dto::OutputFormat;
use crate::ports::outbound::ProviderKind;

/// Analyze JVM project dependencies for vulnerability risk
#[derive(Parser, Debug)]
#[command(name = "depsentry")]
#[command(version)]
#[command(
    about = "Dependency risk analysis for Maven and Gradle projects",
    long_about = None
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract dependency coordinates from the project's build descriptor
    Scan {
        /// Path to the project directory (defaults to current directory)
        path: Option<PathBuf>,

        /// Output format: table or json (config file default applies when omitted)
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Output file path (if not specified, outputs to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Scan, enrich, and assess every dependency
    Analyze {
        /// Path to the project directory (defaults to current directory)
        path: Option<PathBuf>,

        /// Skip cache lookups and recompute every dependency
        #[arg(long)]
        force_refresh: bool,

        /// Deterministic scoring only, no AI narratives
        #[arg(long)]
        no_ai: bool,

        /// AI provider: openai, gemini, or ollama
        #[arg(long)]
        provider: Option<ProviderKind>,

        /// Model override for the chosen provider
        #[arg(long)]
        model: Option<String>,

        /// Overall deadline in seconds; pending dependencies are
        /// reported as skipped when it expires
        #[arg(long)]
        timeout: Option<u64>,

        /// Output format: table or json (config file default applies when omitted)
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Output file path (if not specified, outputs to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List cached assessments for a provider/model pair
    Cached {
        /// AI provider the assessments were produced with
        #[arg(long)]
        provider: Option<ProviderKind>,

        /// Model the assessments were produced with
        #[arg(long)]
        model: Option<String>,

        /// Output format: table or json (config file default applies when omitted)
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Output file path (if not specified, outputs to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Seal and store an API credential for a provider
    SaveCredential {
        /// Provider the credential belongs to
        #[arg(long)]
        provider: ProviderKind,

        /// Model to use with this provider
        #[arg(long)]
        model: Option<String>,

        /// Secret value; read from DEPSENTRY_CREDENTIAL when omitted
        #[arg(long)]
        secret: Option<String>,
    },

    /// Validate a stored credential with a minimal provider call
    TestCredential {
        /// Provider to test
        #[arg(long)]
        provider: ProviderKind,

        /// Model override for the probe
        #[arg(long)]
        model: Option<String>,
    },
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
