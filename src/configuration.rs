use std::{net::SocketAddr, ops::RangeInclusive};

use config::{Config, ConfigError, Environment as EnvSource, File};
use serde::Deserialize;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub session: SessionSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DatabaseSettings {
    pub path: String,
    pub max_connections: u32,
}

/// Anything outside this range either expires sessions on issue or overflows the expiry timestamp.
pub const SESSION_DAYS: RangeInclusive<i64> = 1..=3650;

#[derive(Deserialize, Clone, Debug)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub expires_in_days: i64,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Local,
    Production,
}

impl ApplicationSettings {
    pub fn address(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cookie_name: "auth_session".to_owned(),
            expires_in_days: 30,
        }
    }
}

impl SessionSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !SESSION_DAYS.contains(&self.expires_in_days) {
            return Err(ConfigError::Message(format!(
                "session.expires_in_days must be within {}..={}, got {}",
                SESSION_DAYS.start(),
                SESSION_DAYS.end(),
                self.expires_in_days
            )));
        }
        Ok(())
    }
}

impl Settings {
    /// Defaults, then an optional `configuration` file, then `APP_*` variables
    /// (`APP_APPLICATION__PORT=8080`). `DB_PATH` wins over everything for the database file.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let defaults = SessionSettings::default();

        let settings: Self = Config::builder()
            .set_default("application.host", "0.0.0.0")?
            .set_default("application.port", 3008)?
            .set_default("application.environment", "local")?
            .set_default("database.path", "tracker.db")?
            .set_default("database.max_connections", 5)?
            .set_default("session.cookie_name", defaults.cookie_name)?
            .set_default("session.expires_in_days", defaults.expires_in_days)?
            .add_source(File::with_name("configuration").required(false))
            .add_source(
                EnvSource::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("database.path", dotenv::var("DB_PATH").ok())?
            .build()?
            .try_deserialize()?;

        settings.session.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_parses_lowercase() {
        let env: Environment = serde_json::from_str("\"production\"").unwrap();
        assert_eq!(env, Environment::Production);
        assert!(serde_json::from_str::<Environment>("\"staging\"").is_err());
    }

    #[test]
    fn address_joins_host_and_port() {
        let app = ApplicationSettings {
            host: "127.0.0.1".to_owned(),
            port: 3008,
            environment: Environment::Local,
        };
        assert_eq!(app.address().unwrap().to_string(), "127.0.0.1:3008");
    }

    #[test]
    fn session_lifetime_must_be_positive_and_bounded() {
        let with_days = |expires_in_days| SessionSettings {
            expires_in_days,
            ..SessionSettings::default()
        };

        assert!(SessionSettings::default().validate().is_ok());
        assert!(with_days(1).validate().is_ok());
        assert!(with_days(3650).validate().is_ok());
        for days in [0, -1, 3651, 100_000_000, i64::MAX] {
            let err = with_days(days).validate().unwrap_err();
            assert!(err.to_string().contains("expires_in_days"), "{err}");
        }
    }
}
