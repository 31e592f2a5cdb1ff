use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between different
/// types of failures and successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - no critical findings
    Success = 0,
    /// At least one dependency was assessed as critical risk
    CriticalRiskDetected = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (scan failure, I/O error, credential error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::CriticalRiskDetected => write!(f, "Critical Risk Detected (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Errors raised while extracting coordinates from a build descriptor.
///
/// Scan errors are fatal to the whole analysis request: without a coordinate
/// list there is nothing useful to analyze, and returning a partial set would
/// silently hide analysis gaps upstream.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("No build descriptor found in: {path}\n\n💡 Hint: Expected a pom.xml, build.gradle, or build.gradle.kts in the project directory")]
    NotFound { path: PathBuf },

    #[error("Failed to parse build descriptor: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the descriptor is well-formed")]
    ParseFailure { path: PathBuf, details: String },
}

/// Errors raised by AI providers.
///
/// All AI errors are recoverable at the orchestration layer: the pipeline
/// falls back to the deterministic score without failing the batch.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI provider rejected the credentials: {0}")]
    Unauthorized(String),

    #[error("AI provider rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("AI provider unreachable: {0}")]
    Unreachable(String),

    #[error("AI provider returned a malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        AiError::Unreachable(err.to_string())
    }
}

/// Errors raised by the secret vault.
///
/// Fatal for the affected credential operation only, never for the process.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Cannot decrypt stored credential: {0}\n\n💡 Hint: The vault secret may have changed since the credential was saved. Re-save the credential with the current secret.")]
    SecretMismatchOrMissing(String),
}

/// Errors raised by the analysis cache.
///
/// Always treated as a cache miss by the pipeline; a broken cache degrades
/// to recomputation, never to a failed analysis.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to read cache file: {path}\nDetails: {details}")]
    ReadFailure { path: PathBuf, details: String },

    #[error("Failed to write cache file: {path}\nDetails: {details}")]
    WriteFailure { path: PathBuf, details: String },
}
