//! Error types for armctl
//!
//! Structured errors for the CLI layer plus a cargo-style diagnostic
//! printer for the cases where a bare error line is not enough to act on.

use azure_arm::ArmError;
use colored::Colorize;
use thiserror::Error;

use armctl_core::config::ConfigError;
use armctl_core::CoreError;

/// Cargo-style diagnostic formatter for CLI errors.
///
/// Produces structured output like:
/// ```text
/// error: no profile configured
///
///   tip: configure one with:
///       armctl profile set prod --subscription-id <ID> --tenant-id <ID>
/// ```
pub struct CliDiagnostic {
    message: String,
    detail: Option<String>,
    tips: Vec<(String, Vec<String>)>,
}

impl CliDiagnostic {
    /// Start a new error diagnostic with the given message.
    pub fn error(message: &str) -> Self {
        Self {
            message: message.to_string(),
            detail: None,
            tips: Vec::new(),
        }
    }

    /// Add a detail line below the error message.
    pub fn detail(mut self, text: &str) -> Self {
        self.detail = Some(text.to_string());
        self
    }

    /// Add a tip with optional example commands.
    pub fn tip(mut self, description: &str, commands: &[&str]) -> Self {
        self.tips.push((
            description.to_string(),
            commands.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    /// Print the diagnostic to stderr with colored formatting.
    pub fn print(&self) {
        eprint!("{}{}", "error".red().bold(), ": ".bold());
        eprintln!("{}", self.message);

        if let Some(detail) = &self.detail {
            eprintln!("  {}", detail);
        }

        for (description, commands) in &self.tips {
            eprintln!();
            eprint!("  {}{}", "tip".yellow().bold(), ": ".bold());
            eprintln!("{}", description);
            for cmd in commands {
                eprintln!("      {}", cmd);
            }
        }
    }
}

/// Main error type for the armctl application
#[derive(Error, Debug)]
pub enum ArmCtlError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("No profile configured. Use 'armctl profile set' to configure a profile.")]
    NoProfileConfigured,

    #[error("Missing credentials: {message}")]
    MissingCredentials { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("{what} was not found")]
    NotFound { what: String },

    #[error("Output formatting error: {message}")]
    OutputError { message: String },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Arm(#[from] ArmError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ConfigError> for ArmCtlError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ProfileNotFound { name } => ArmCtlError::ProfileNotFound { name },
            ConfigError::NoProfileConfigured => ArmCtlError::NoProfileConfigured,
            other => ArmCtlError::Config(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ArmCtlError {
    fn from(err: serde_json::Error) -> Self {
        ArmCtlError::OutputError {
            message: err.to_string(),
        }
    }
}

impl ArmCtlError {
    /// Render this error as a diagnostic, attaching tips where we know the
    /// way out.
    pub fn print_diagnostic(&self) {
        match self {
            ArmCtlError::NoProfileConfigured => {
                CliDiagnostic::error("no profile configured")
                    .detail("Commands need a subscription and credentials to call the management API.")
                    .tip(
                        "configure one with:",
                        &["armctl profile set prod --subscription-id <ID> --tenant-id <ID> --client-id <ID>"],
                    )
                    .tip(
                        "or export credentials:",
                        &["AZURE_SUBSCRIPTION_ID, AZURE_TENANT_ID, AZURE_CLIENT_ID, AZURE_CLIENT_SECRET"],
                    )
                    .print();
            }
            ArmCtlError::ProfileNotFound { name } => {
                CliDiagnostic::error(&format!("profile '{name}' not found"))
                    .tip("list available profiles:", &["armctl profile list"])
                    .print();
            }
            ArmCtlError::MissingCredentials { message } => {
                CliDiagnostic::error(&format!("missing credentials: {message}"))
                    .tip(
                        "set them on the profile:",
                        &["armctl profile set <NAME> --client-id <ID> --client-secret <SECRET>"],
                    )
                    .print();
            }
            other => {
                CliDiagnostic::error(&other.to_string()).print();
            }
        }
    }
}

/// Result type for armctl operations
pub type Result<T> = std::result::Result<T, ArmCtlError>;
