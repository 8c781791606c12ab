use std::env;

use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use config::Map;
use serde::Deserialize;

use crate::domain::auth::models::AuthSettings;
use crate::domain::auth::models::ResetMailSettings;
use crate::domain::user::models::EmailAddress;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub kafka: KafkaConfig,
    pub mail: MailConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub reset_expiration_minutes: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    pub mail_topic: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    pub reset_subject: String,
    pub reset_template: String,
    pub recipient_override: Option<String>,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(
                Environment::default()
                    .separator("__")
                    .source(Some(nested_env_vars(env::vars()))),
            )
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }

    /// Auth flow settings derived from the `jwt` and `mail` sections.
    ///
    /// # Errors
    /// * `ConfigError::Message` - Reset lifetime not positive or override address invalid
    pub fn auth_settings(&self) -> Result<AuthSettings, ConfigError> {
        if self.jwt.reset_expiration_minutes <= 0 {
            return Err(ConfigError::Message(format!(
                "jwt.reset_expiration_minutes must be positive, got {}",
                self.jwt.reset_expiration_minutes
            )));
        }

        let recipient_override = self
            .mail
            .recipient_override
            .clone()
            .map(EmailAddress::new)
            .transpose()
            .map_err(|e| ConfigError::Message(format!("mail.recipient_override: {}", e)))?;

        Ok(AuthSettings {
            reset_token_ttl: Duration::minutes(self.jwt.reset_expiration_minutes),
            reset_mail: ResetMailSettings {
                subject: self.mail.reset_subject.clone(),
                template: self.mail.reset_template.clone(),
                recipient_override,
            },
        })
    }
}

/// Variables naming a nested key (`SECTION__FIELD`).
///
/// Plain variables such as `MAIL` or `HOME` would otherwise shadow whole sections.
fn nested_env_vars(vars: impl Iterator<Item = (String, String)>) -> Map<String, String> {
    vars.filter(|(key, _)| key.contains("__") && !key.starts_with("__"))
        .collect()
}
