use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SERVER_URL_ENV: &str = "TELTECH_SERVER_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Backend base URL, e.g. `http://localhost:8080`.
    pub server_url: Option<String>,
    /// Public origin share links are built on. Defaults to the server's origin.
    pub origin: Option<String>,
    /// Base URL serving chart series; sample data is shown when unset.
    pub metrics_url: Option<String>,
}

impl Config {
    pub fn config_path() -> anyhow::Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "teltech", "teltech")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file, then apply the environment override.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            if !url.trim().is_empty() {
                config.server_url = Some(url);
            }
        }
        Ok(config)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn server_url(&self) -> anyhow::Result<&str> {
        self.server_url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("No server configured. Run: teltech setup --server <url>"))
    }

    /// Origin for share links: the explicit `origin`, else scheme://host[:port]
    /// of the server URL.
    pub fn share_origin(&self) -> anyhow::Result<String> {
        if let Some(origin) = &self.origin {
            return Ok(origin.trim_end_matches('/').to_string());
        }
        let server = url::Url::parse(self.server_url()?)?;
        let origin = server.origin();
        if !origin.is_tuple() {
            anyhow::bail!("Server URL {} has no origin; set one with: teltech setup --origin <url>", server);
        }
        Ok(origin.ascii_serialization())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config {
            server_url: Some("http://localhost:8080".into()),
            origin: None,
            metrics_url: Some("http://localhost:9090/metrics".into()),
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_share_origin_from_server_url() {
        let config = Config {
            server_url: Some("http://files.example.com:8080/app/".into()),
            ..Default::default()
        };
        assert_eq!(config.share_origin().unwrap(), "http://files.example.com:8080");
    }

    #[test]
    fn test_explicit_origin_wins() {
        let config = Config {
            server_url: Some("http://10.0.0.5:8080".into()),
            origin: Some("https://share.example.com/".into()),
            ..Default::default()
        };
        assert_eq!(config.share_origin().unwrap(), "https://share.example.com");
    }

    #[test]
    fn test_unconfigured_server() {
        assert!(Config::default().server_url().is_err());
        assert!(Config::default().share_origin().is_err());
    }
}
