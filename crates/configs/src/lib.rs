use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATA_FILE: &str = "data/announcements.json";
const DEFAULT_PUBLIC_DIR: &str = "public";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// JSON document holding the whole announcement collection.
    #[serde(default = "default_data_file")]
    pub data_file: String,
    /// Directory with `index.html`, `admin.html` and other static assets.
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_file: default_data_file(), public_dir: default_public_dir() }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_data_file() -> String {
    DEFAULT_DATA_FILE.to_string()
}

fn default_public_dir() -> String {
    DEFAULT_PUBLIC_DIR.to_string()
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// File (if present) -> environment overrides -> normalization.
    /// A missing config file is fine; a malformed one is an error.
    pub fn load_and_validate() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let mut cfg = if std::path::Path::new(&path).exists() {
            load_from_file(&path)?
        } else {
            AppConfig::default()
        };
        cfg.apply_env_overrides(|key| std::env::var(key).ok())?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Apply `PORT`, `HOST`, `DATA_FILE` and `PUBLIC_DIR` from the given lookup.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse::<u16>()
                .map_err(|e| anyhow!("PORT must be a number in 1..=65535, got {port:?}: {e}"))?;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(path) = lookup("DATA_FILE") {
            self.storage.data_file = path;
        }
        if let Some(dir) = lookup("PUBLIC_DIR") {
            self.storage.public_dir = dir;
        }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.normalize();
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        Ok(())
    }
}

impl StorageConfig {
    fn normalize(&mut self) {
        if self.data_file.trim().is_empty() {
            self.data_file = default_data_file();
        }
        if self.public_dir.trim().is_empty() {
            self.public_dir = default_public_dir();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_configured() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.storage.data_file, "data/announcements.json");
        assert_eq!(cfg.storage.public_dir, "public");
    }

    #[test]
    fn partial_toml_keeps_defaults() -> Result<()> {
        let cfg = parse("[server]\nport = 8080\n")?;
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.storage.public_dir, "public");
        Ok(())
    }

    #[test]
    fn env_overrides_file_values() -> Result<()> {
        let mut cfg = parse("[server]\nport = 8080\n[storage]\ndata_file = \"x.json\"\n")?;
        cfg.apply_env_overrides(env(&[("PORT", "4000"), ("DATA_FILE", "/tmp/a.json")]))?;
        assert_eq!(cfg.server.port, 4000);
        assert_eq!(cfg.storage.data_file, "/tmp/a.json");
        Ok(())
    }

    #[test]
    fn bad_port_in_env_is_rejected() {
        let mut cfg = AppConfig::default();
        assert!(cfg.apply_env_overrides(env(&[("PORT", "http")])).is_err());
    }

    #[test]
    fn normalize_fills_blanks_and_rejects_zero_port() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "  ".into();
        cfg.storage.data_file = String::new();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.storage.data_file, "data/announcements.json");
        assert_eq!(cfg.bind_addr(), "0.0.0.0:3000");

        cfg.server.port = 0;
        assert!(cfg.normalize_and_validate().is_err());
    }
}
