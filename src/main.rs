mod adapters;
mod application;
mod cli;
mod config;
mod ports;
mod risk_analysis;
mod shared;

use adapters::outbound::ai::build_provider;
use adapters::outbound::cache::FileCache;
use adapters::outbound::console::{SilentProgressReporter, StderrProgressReporter};
use adapters::outbound::network::{GitHubClient, MavenCentralClient, OsvClient};
use adapters::outbound::scanner::ProjectScanner;
use adapters::outbound::vault::{CredentialStore, SecretVault};
use anyhow::{anyhow, bail, Context};
use application::dto::{AnalyzeRequest, OutputFormat};
use application::factories::{FormatterFactory, PresenterFactory};
use application::use_cases::{
    AnalyzeProjectUseCase, CredentialManager, EnrichmentAggregator, ListCachedUseCase, RiskAdvisor,
    ScanProjectUseCase,
};
use cli::{Args, Command};
use config::ConfigFile;
use ports::outbound::{AiProvider, ProgressReporter, ProviderKind};
use risk_analysis::domain::ScanReport;
use shared::error::ExitCode;
use shared::Result;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Environment variable read by `save-credential` when --secret is omitted
const CREDENTIAL_ENV: &str = "DEPSENTRY_CREDENTIAL";

#[tokio::main]
async fn main() {
    let args = Args::parse_args();

    let exit_code = match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            for cause in e.chain().skip(1) {
                eprintln!("\nCaused by: {}", cause);
            }

            eprintln!();
            ExitCode::ApplicationError
        }
    };

    process::exit(exit_code.as_i32());
}

async fn run(args: Args) -> Result<ExitCode> {
    match args.command {
        Command::Scan {
            path,
            format,
            output,
        } => scan(path, format, output).await,
        Command::Analyze {
            path,
            force_refresh,
            no_ai,
            provider,
            model,
            timeout,
            format,
            output,
        } => {
            analyze(
                path,
                force_refresh,
                no_ai,
                provider,
                model,
                timeout,
                format,
                output,
            )
            .await
        }
        Command::Cached {
            provider,
            model,
            format,
            output,
        } => cached(provider, model, format, output),
        Command::SaveCredential {
            provider,
            model,
            secret,
        } => save_credential(provider, model, secret),
        Command::TestCredential { provider, model } => test_credential(provider, model).await,
    }
}

async fn scan(
    path: Option<PathBuf>,
    format: Option<OutputFormat>,
    output: Option<PathBuf>,
) -> Result<ExitCode> {
    let project_path = path.unwrap_or_else(|| PathBuf::from("."));
    validate_project_path(&project_path)?;

    let config = config::discover_config(&project_path)?.unwrap_or_default();
    let format = resolve_format(format, &config);

    let registry = Arc::new(MavenCentralClient::new()?);
    let scanner = ProjectScanner::new().with_resolver(registry);

    // JSON output goes to stdout; keep stderr quiet so piping stays clean
    let report = match format {
        OutputFormat::Json => {
            ScanProjectUseCase::new(scanner, SilentProgressReporter)
                .execute(&project_path)
                .await?
        }
        OutputFormat::Table => {
            ScanProjectUseCase::new(scanner, StderrProgressReporter::new())
                .execute(&project_path)
                .await?
        }
    };

    let rendered = match format {
        OutputFormat::Json => {
            let mut text = serde_json::to_string_pretty(&report)?;
            text.push('\n');
            text
        }
        OutputFormat::Table => render_scan_table(&report),
    };

    PresenterFactory::create(output).present(&rendered)?;
    Ok(ExitCode::Success)
}

#[allow(clippy::too_many_arguments)]
async fn analyze(
    path: Option<PathBuf>,
    force_refresh: bool,
    no_ai: bool,
    provider: Option<ProviderKind>,
    model: Option<String>,
    timeout: Option<u64>,
    format: Option<OutputFormat>,
    output: Option<PathBuf>,
) -> Result<ExitCode> {
    let project_path = path.unwrap_or_else(|| PathBuf::from("."));
    validate_project_path(&project_path)?;

    let config = config::discover_config(&project_path)?.unwrap_or_default();
    let format = resolve_format(format, &config);
    let provider = provider
        .or_else(|| config.provider_kind())
        .unwrap_or(ProviderKind::OpenAi);
    let mut ai_enabled = !no_ai && config.ai.unwrap_or(true);

    let manager = credential_manager();
    let model = match model.or_else(|| config.model.clone()) {
        Some(model) => Some(model),
        None => manager.stored_model(provider)?,
    };

    let advisor = if ai_enabled {
        let credential = manager.resolve(provider)?;
        match build_provider(provider, credential.as_deref(), model.as_deref()) {
            Ok(backend) => Some(Arc::new(RiskAdvisor::new(Arc::from(backend)))),
            Err(e) => {
                eprintln!("⚠️  AI assessments disabled: {}", e);
                ai_enabled = false;
                None
            }
        }
    } else {
        None
    };

    let registry = Arc::new(MavenCentralClient::new()?);
    let scanner = Arc::new(ProjectScanner::new().with_resolver(registry.clone()));
    let aggregator = Arc::new(EnrichmentAggregator::new(
        Arc::new(OsvClient::new()?),
        registry,
        Arc::new(GitHubClient::new()?),
    ));
    let ttl_hours = config
        .cache_ttl_hours
        .unwrap_or(FileCache::DEFAULT_TTL_HOURS);
    let cache = Arc::new(FileCache::open(data_dir().join("cache.json"), ttl_hours));
    let progress_reporter: Arc<dyn ProgressReporter> = match format {
        OutputFormat::Json => Arc::new(SilentProgressReporter),
        OutputFormat::Table => Arc::new(StderrProgressReporter::new()),
    };

    let mut use_case =
        AnalyzeProjectUseCase::new(scanner, aggregator, advisor, cache, progress_reporter);
    if let Some(max_concurrent) = config.max_concurrent {
        use_case = use_case.with_max_concurrent(max_concurrent);
    }

    let request = AnalyzeRequest::new(project_path, provider)
        .with_force_refresh(force_refresh)
        .with_ai_enabled(ai_enabled)
        .with_model(model);

    // Ctrl-C and the --timeout deadline share one cancellation signal;
    // pending coordinates surface as skipped findings, not lost ones.
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let deadline = timeout.map(Duration::from_secs);
    tokio::spawn(async move {
        match deadline {
            Some(limit) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = tokio::time::sleep(limit) => {}
                }
            }
            None => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
        let _ = cancel_tx.send(true);
    });

    let report = use_case.execute(request, cancel_rx).await?;

    let formatter = FormatterFactory::create(format, output.is_none());
    let rendered = formatter.format(&report)?;
    PresenterFactory::create(output).present(&rendered)?;

    Ok(report.exit_code())
}

fn cached(
    provider: Option<ProviderKind>,
    model: Option<String>,
    format: Option<OutputFormat>,
    output: Option<PathBuf>,
) -> Result<ExitCode> {
    let config = config::discover_config(Path::new("."))?.unwrap_or_default();
    let format = resolve_format(format, &config);
    let provider = provider
        .or_else(|| config.provider_kind())
        .unwrap_or(ProviderKind::OpenAi);
    let model = model
        .or_else(|| config.model.clone())
        .unwrap_or_else(|| provider.default_model().to_string());

    let ttl_hours = config
        .cache_ttl_hours
        .unwrap_or(FileCache::DEFAULT_TTL_HOURS);
    let cache = Arc::new(FileCache::open(data_dir().join("cache.json"), ttl_hours));
    let report = ListCachedUseCase::new(cache).execute(provider.as_str(), &model);

    let formatter = FormatterFactory::create(format, output.is_none());
    let rendered = formatter.format(&report)?;
    PresenterFactory::create(output).present(&rendered)?;

    Ok(ExitCode::Success)
}

fn save_credential(
    provider: ProviderKind,
    model: Option<String>,
    secret: Option<String>,
) -> Result<ExitCode> {
    let secret = match secret {
        Some(secret) => secret,
        None => std::env::var(CREDENTIAL_ENV).map_err(|_| {
            anyhow!(
                "No secret provided for provider '{}'.\n\n💡 Hint: Pass --secret or set the {} environment variable.",
                provider,
                CREDENTIAL_ENV
            )
        })?,
    };

    let manager = credential_manager();
    let encrypted = manager.save(provider, model, &secret)?;

    if encrypted {
        eprintln!("✅ Credential for {} sealed and stored.", provider);
    } else {
        eprintln!(
            "⚠️  Credential for {} stored in plaintext.\n\n💡 Hint: Set {} to enable encryption at rest.",
            provider,
            SecretVault::SECRET_ENV_VAR
        );
    }

    Ok(ExitCode::Success)
}

async fn test_credential(provider: ProviderKind, model: Option<String>) -> Result<ExitCode> {
    let manager = credential_manager();
    let credential = manager.resolve(provider)?;
    let model = match model {
        Some(model) => Some(model),
        None => manager.stored_model(provider)?,
    };

    let backend = build_provider(provider, credential.as_deref(), model.as_deref())?;
    eprintln!("🔍 Testing {} (model: {})...", provider, backend.model());
    backend.test_connection().await?;
    eprintln!("✅ Credential for {} is valid.", provider);

    Ok(ExitCode::Success)
}

/// Directory holding the cache and credential store.
///
/// `DEPSENTRY_HOME` overrides the default of `$HOME/.depsentry`.
fn data_dir() -> PathBuf {
    if let Some(home) = std::env::var_os("DEPSENTRY_HOME") {
        return PathBuf::from(home);
    }
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".depsentry"),
        None => PathBuf::from(".depsentry"),
    }
}

fn credential_manager() -> CredentialManager {
    CredentialManager::new(
        SecretVault::from_env(),
        CredentialStore::new(data_dir().join("credentials.json")),
    )
}

fn resolve_format(cli_format: Option<OutputFormat>, config: &ConfigFile) -> OutputFormat {
    cli_format
        .or_else(|| config.format.as_deref().and_then(|f| f.parse().ok()))
        .unwrap_or(OutputFormat::Table)
}

fn render_scan_table(report: &ScanReport) -> String {
    let name_width = report
        .coordinates
        .iter()
        .map(|c| c.package_name().len())
        .max()
        .unwrap_or(0)
        .max("DEPENDENCY".len());

    let mut out = String::new();
    out.push_str(&format!(
        "{:<width$}  {:<12}  {}\n",
        "DEPENDENCY",
        "VERSION",
        "TYPE",
        width = name_width
    ));

    for coordinate in &report.coordinates {
        out.push_str(&format!(
            "{:<width$}  {:<12}  {}\n",
            coordinate.package_name(),
            coordinate.version,
            if coordinate.direct {
                "direct"
            } else {
                "transitive"
            },
            width = name_width
        ));
    }

    out.push_str(&format!(
        "\n{} coordinate(s) via {} ({} confidence{})\n",
        report.coordinates.len(),
        report.build_tool,
        report.confidence,
        if report.best_effort {
            ", best effort"
        } else {
            ""
        }
    ));

    out
}

fn validate_project_path(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!(
            "Project directory does not exist: {}\n\n💡 Hint: Check the path and try again.",
            path.display()
        );
    }

    // Security check: reject symbolic links for project paths
    let metadata = std::fs::symlink_metadata(path)
        .with_context(|| format!("Failed to read path metadata: {}", path.display()))?;

    if metadata.is_symlink() {
        bail!(
            "Project path is a symbolic link: {}\n\n💡 Hint: Pass the resolved directory instead.",
            path.display()
        );
    }

    if !path.is_dir() {
        bail!("Project path is not a directory: {}", path.display());
    }

    // Security check: canonicalize to prevent path traversal
    let canonical = path
        .canonicalize()
        .with_context(|| format!("Failed to canonicalize path: {}", path.display()))?;

    if !canonical.is_dir() {
        bail!(
            "Resolved project path is not a directory: {}",
            canonical.display()
        );
    }

    Ok(())
}
