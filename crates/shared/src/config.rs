//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Outbound email configuration.
    #[serde(default)]
    pub email: EmailConfig,
    /// Email verification code policy.
    #[serde(default)]
    pub verification: VerificationConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    86_400 // 24 hours
}

/// SMTP configuration for outbound email.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// SMTP relay host.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP relay port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub smtp_username: String,
    /// SMTP password.
    #[serde(default)]
    pub smtp_password: String,
    /// Sender address.
    #[serde(default = "default_from_email")]
    pub from_email: String,
    /// Sender display name.
    #[serde(default = "default_app_name")]
    pub from_name: String,
    /// Product name used in subjects and bodies.
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: default_from_email(),
            from_name: default_app_name(),
            app_name: default_app_name(),
        }
    }
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    1025
}

fn default_from_email() -> String {
    "noreply@ledgerly.local".to_string()
}

fn default_app_name() -> String {
    "Ledgerly".to_string()
}

/// Email verification code policy.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct VerificationConfig {
    /// How long a code stays valid.
    #[serde(default = "default_code_ttl")]
    pub code_ttl_secs: u64,
    /// Minimum delay between two codes for the same user.
    #[serde(default = "default_resend_cooldown")]
    pub resend_cooldown_secs: u64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_ttl_secs: default_code_ttl(),
            resend_cooldown_secs: default_resend_cooldown(),
        }
    }
}

fn default_code_ttl() -> u64 {
    900 // 15 minutes
}

fn default_resend_cooldown() -> u64 {
    60
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("LEDGERLY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
