use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};
use validator::{Validate, ValidationError};

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const CONFIG_DIR: &str = "config";
const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_SMTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CORS_ALLOWED_ORIGINS: &str =
    "http://localhost:5000,http://127.0.0.1:5000,http://localhost:8000,http://127.0.0.1:8000";

/// Unprefixed variables honoured for compatibility with existing `.env` files
const LEGACY_ENV_KEYS: [(&str, &str); 5] = [
    ("SMTP_SERVER", "smtp_server"),
    ("SMTP_PORT", "smtp_port"),
    ("EMAIL_ADDRESS", "email_address"),
    ("EMAIL_PASSWORD", "email_password"),
    ("ADMIN_EMAIL", "admin_email"),
];

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct AppConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    #[validate(range(min = 1))]
    pub port: u16,

    /// Application environment
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// CORS: comma-separated list of allowed origins
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: String,

    /// CORS: allow credentials
    #[serde(default = "default_true_bool")]
    pub cors_allow_credentials: bool,

    /// SMTP relay host
    #[serde(default = "default_smtp_server")]
    pub smtp_server: String,

    /// SMTP relay port (STARTTLS)
    #[serde(default = "default_smtp_port")]
    #[validate(range(min = 1))]
    pub smtp_port: u16,

    /// Sender account, also used as SMTP username
    #[serde(default)]
    pub email_address: Option<String>,

    #[serde(default)]
    pub email_password: Option<String>,

    /// Recipient of contact-form notifications; falls back to `email_address`
    #[serde(default)]
    pub admin_email: Option<String>,

    /// Timeout applied to contact and test emails
    #[serde(default = "default_smtp_timeout_secs")]
    #[validate(range(min = 1))]
    pub smtp_timeout_secs: u64,

    /// Actually deliver contact-form emails instead of only logging them
    #[serde(default)]
    pub contact_email_delivery: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(default_host(), default_port(), default_environment())
    }
}

impl AppConfig {
    /// Creates a configuration with built-in defaults and no email credentials
    pub fn new(host: String, port: u16, environment: String) -> Self {
        Self {
            host,
            port,
            environment,
            log_level: default_log_level(),
            log_json: false,
            cors_allowed_origins: default_cors_allowed_origins(),
            cors_allow_credentials: default_true_bool(),
            smtp_server: default_smtp_server(),
            smtp_port: default_smtp_port(),
            email_address: None,
            email_password: None,
            admin_email: None,
            smtp_timeout_secs: default_smtp_timeout_secs(),
            contact_email_delivery: false,
        }
    }

    /// Gets log level reference
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Allowed CORS origins, blanks removed
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// True when both the sender address and password are present
    pub fn email_configured(&self) -> bool {
        non_blank(&self.email_address).is_some() && non_blank(&self.email_password).is_some()
    }

    pub fn admin_email(&self) -> Option<&str> {
        non_blank(&self.admin_email).or_else(|| non_blank(&self.email_address))
    }

    pub fn smtp_timeout(&self) -> Duration {
        Duration::from_secs(self.smtp_timeout_secs)
    }

    /// SMTP settings, or `None` when credentials are missing
    pub fn email_settings(&self) -> Option<EmailSettings> {
        let address = non_blank(&self.email_address)?;
        let password = non_blank(&self.email_password)?;
        Some(EmailSettings {
            smtp_server: self.smtp_server.clone(),
            smtp_port: self.smtp_port,
            sender: address.to_string(),
            password: password.to_string(),
        })
    }
}

/// Resolved SMTP account used by the mailer
#[derive(Clone, Debug)]
pub struct EmailSettings {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub sender: String,
    pub password: String,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Default value functions
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_cors_allowed_origins() -> String {
    DEFAULT_CORS_ALLOWED_ORIGINS.to_string()
}

fn default_true_bool() -> bool {
    true
}

fn default_smtp_server() -> String {
    DEFAULT_SMTP_SERVER.to_string()
}

fn default_smtp_port() -> u16 {
    DEFAULT_SMTP_PORT
}

fn default_smtp_timeout_secs() -> u64 {
    DEFAULT_SMTP_TIMEOUT_SECS
}

/// Validates log level values
fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if valid_levels.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("log_level");
        err.message = Some("Must be one of: trace, debug, info, warn, error".into());
        Err(err)
    }
}

/// Initializes tracing using the provided log level as the default filter
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("farmlink_api={},tower_http=debug", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    if json {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .json()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .try_init();
    }
}

/// Loads application configuration
///
/// Layers configuration sources in this order:
/// 1. Built-in defaults
/// 2. Default config (config/default.toml)
/// 3. Environment-specific config (config/{env}.toml)
/// 4. Environment variables (APP__*)
/// 5. Legacy SMTP variables (SMTP_SERVER, EMAIL_ADDRESS, ...)
///
/// A `.env` file in the working directory is read first, if present.
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(err) if err.not_found() => {}
        Err(err) => warn!("Ignoring unreadable .env file: {}", err),
    }

    // Support both RUN_ENV and APP_ENV for selecting config profile
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let mut builder = Config::builder()
        .set_default("host", DEFAULT_HOST)?
        .set_default("port", i64::from(DEFAULT_PORT))?
        .set_default("environment", run_env.clone())?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"));

    for (var, key) in LEGACY_ENV_KEYS {
        let value = env::var(var).ok().filter(|v| !v.trim().is_empty());
        builder = builder.set_override_option(key, value)?;
    }

    let app_config: AppConfig = builder.build()?.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    info!("Configuration loaded successfully");
    Ok(app_config)
}
