use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "mealbox.toml",
    "config/mealbox.toml",
    "crates/config/mealbox.toml",
    "../mealbox.toml",
    "../config/mealbox.toml",
    "../crates/config/mealbox.toml",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub inbox: InboxConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            database: DatabaseConfig::default(),
            inbox: InboxConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 7080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://mealbox.db".to_string(),
            max_connections: 10,
        }
    }
}

/// Tunables for the messaging inbox.
///
/// ```
/// use mealbox_config::InboxConfig;
///
/// let inbox = InboxConfig::default();
/// assert_eq!(inbox.default_page_size, 50);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboxConfig {
    #[serde(default = "InboxConfig::default_page_size")]
    pub default_page_size: i64,
    #[serde(default = "InboxConfig::default_max_page_size")]
    pub max_page_size: i64,
}

impl InboxConfig {
    const fn default_page_size() -> i64 {
        50
    }

    const fn default_max_page_size() -> i64 {
        200
    }
}

impl Default for InboxConfig {
    fn default() -> Self {
        Self {
            default_page_size: Self::default_page_size(),
            max_page_size: Self::default_max_page_size(),
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use mealbox_config::load;
///
/// std::env::remove_var("MEALBOX_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut builder = config::Config::builder();
    builder = builder
        .set_default("http.address", defaults.http.address.clone())
        .unwrap()
        .set_default("http.port", i64::from(defaults.http.port))
        .unwrap()
        .set_default("database.url", defaults.database.url.clone())
        .unwrap()
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )
        .unwrap()
        .set_default("inbox.default_page_size", defaults.inbox.default_page_size)
        .unwrap()
        .set_default("inbox.max_page_size", defaults.inbox.max_page_size)
        .unwrap();

    let environment_overrides = config::Environment::with_prefix("MEALBOX").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("MEALBOX_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via MEALBOX_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    debug!(?config, "loaded backend configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    #[serial]
    fn defaults_apply_without_file_or_env() {
        std::env::remove_var("MEALBOX_CONFIG");

        let config = load().expect("load defaults");
        assert_eq!(config.http.port, 7080);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.inbox.default_page_size, 50);
    }

    #[test]
    #[serial]
    fn explicit_config_file_overrides_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("mealbox.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[http]\naddress = \"0.0.0.0\"\nport = 9000").unwrap();
        writeln!(
            file,
            "[database]\nurl = \"sqlite://other.db\"\nmax_connections = 3"
        )
        .unwrap();

        std::env::set_var("MEALBOX_CONFIG", &path);
        let config = load().expect("load from file");
        std::env::remove_var("MEALBOX_CONFIG");

        assert_eq!(config.http.address, "0.0.0.0");
        assert_eq!(config.http.port, 9000);
        assert_eq!(config.database.url, "sqlite://other.db");
        assert_eq!(config.database.max_connections, 3);
    }
}
