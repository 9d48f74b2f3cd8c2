//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Outgoing mail configuration.
    #[serde(default)]
    pub email: EmailConfig,
    /// Ledger projection settings.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Reminder scheduling.
    #[serde(default)]
    pub reminders: ReminderConfig,
    /// Product classifier settings.
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// Storage backend selected by the database URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackend {
    /// File or in-memory SQLite database.
    Sqlite,
    /// MySQL or MariaDB server.
    MySql,
}

impl std::fmt::Display for DatabaseBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite => write!(f, "sqlite"),
            Self::MySql => write!(f, "mysql"),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL (`sqlite://...` or `mysql://...`).
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

impl DatabaseConfig {
    /// Resolves the storage backend from the URL scheme.
    ///
    /// # Errors
    ///
    /// Returns an error for any scheme other than `sqlite:` or `mysql:`/`mariadb:`.
    pub fn backend(&self) -> Result<DatabaseBackend, config::ConfigError> {
        let scheme = self
            .url
            .split_once(':')
            .map(|(scheme, _)| scheme.to_ascii_lowercase())
            .unwrap_or_default();

        match scheme.as_str() {
            "sqlite" => Ok(DatabaseBackend::Sqlite),
            "mysql" | "mariadb" => Ok(DatabaseBackend::MySql),
            _ => Err(config::ConfigError::Message(format!(
                "unsupported database url scheme: {scheme:?}"
            ))),
        }
    }
}

/// SMTP configuration for outgoing mail.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// SMTP relay host.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP port; 465 means implicit TLS, anything else STARTTLS.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP user name.
    #[serde(default)]
    pub smtp_username: String,
    /// SMTP password.
    #[serde(default)]
    pub smtp_password: String,
    /// Sender address.
    #[serde(default = "default_from_email")]
    pub from_email: String,
    /// Sender display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    1025
}

fn default_from_email() -> String {
    "noreply@localhost".to_string()
}

fn default_from_name() -> String {
    default_fund_name()
}

fn default_fund_name() -> String {
    "جمعية الخطوة الأهلية".to_string()
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: default_from_email(),
            from_name: default_from_name(),
        }
    }
}

/// Ledger projection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Balance the fund held before the first recorded transaction.
    #[serde(default)]
    pub opening_balance: Decimal,
    /// Subject label under which member contributions are posted.
    #[serde(default = "default_contribution_subject")]
    pub contribution_subject: String,
    /// First year shown in the payment report.
    #[serde(default = "default_report_since_year")]
    pub report_since_year: i32,
    /// Divide a contribution evenly across every year its details cite.
    #[serde(default = "default_split_multi_year")]
    pub split_multi_year: bool,
}

fn default_contribution_subject() -> String {
    "مساهمات الاعضاء".to_string()
}

fn default_report_since_year() -> i32 {
    2023
}

fn default_split_multi_year() -> bool {
    true
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            opening_balance: Decimal::ZERO,
            contribution_subject: default_contribution_subject(),
            report_since_year: default_report_since_year(),
            split_multi_year: default_split_multi_year(),
        }
    }
}

/// Reminder scheduling.
#[derive(Debug, Clone, Deserialize)]
pub struct ReminderConfig {
    /// Whether the periodic reminder loop runs.
    #[serde(default)]
    pub enabled: bool,
    /// Public URL of the fund page, linked from reminder mails.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Fund name used in reminder greetings and signatures.
    #[serde(default = "default_fund_name")]
    pub fund_name: String,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_base_url(),
            fund_name: default_fund_name(),
        }
    }
}

/// Product classifier settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// API key; classification is disabled when absent.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model name.
    #[serde(default = "default_classifier_model")]
    pub model: String,
    /// Base endpoint of the generative language API.
    #[serde(default = "default_classifier_endpoint")]
    pub endpoint: String,
    /// Request timeout in seconds.
    #[serde(default = "default_classifier_timeout")]
    pub timeout_secs: u64,
}

fn default_classifier_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_classifier_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_classifier_timeout() -> u64 {
    30
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_classifier_model(),
            endpoint: default_classifier_endpoint(),
            timeout_secs: default_classifier_timeout(),
        }
    }
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
            .add_source(config::Environment::with_prefix("JAM3YA").separator("__"))
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        loaded.database.backend()?;
        Ok(loaded)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
