use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::util::is_local_endpoint_url;

const DEFAULT_API_URL: &str = "http://localhost:8787/api/chat";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_SESSION_DIR: &str = ".uniadvisor/sessions";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub api_url: String,
    pub session_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        let api_url =
            std::env::var("UNI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let api_key = std::env::var("UNI_API_KEY").ok().and_then(|v| {
            if v.trim().is_empty() {
                None
            } else {
                Some(v)
            }
        });
        let model = std::env::var("UNI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let session_dir = std::env::var("UNI_SESSION_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSION_DIR));

        Ok(Self {
            api_key,
            model,
            api_url,
            session_dir,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            bail!(
                "Invalid UNI_API_URL '{}': expected http:// or https:// URL",
                self.api_url
            );
        }

        if !self.is_local_endpoint() && self.api_key.is_none() {
            bail!(
                "UNI_API_KEY must be set for non-local endpoints (url: '{}')",
                self.api_url
            );
        }

        if self.model.trim().is_empty() {
            bail!("UNI_MODEL must not be empty");
        }

        Ok(())
    }

    pub fn is_local_endpoint(&self) -> bool {
        is_local_endpoint_url(&self.api_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            session_dir: PathBuf::from(DEFAULT_SESSION_DIR),
        }
    }

    #[test]
    fn test_validate_accepts_local_endpoint_without_key() {
        let config = base_config();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_key_for_remote_endpoint() {
        let mut config = base_config();
        config.api_url = "https://advisor.example.com/api/chat".to_string();
        assert!(config.validate().is_err());

        config.api_key = Some("test-key".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let mut config = base_config();
        config.api_url = "ftp://localhost/api/chat".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_reads_env_overrides() {
        let _env_lock = crate::test_support::ENV_LOCK.blocking_lock();
        std::env::set_var("UNI_API_URL", "http://localhost:9999/api/chat");
        std::env::set_var("UNI_MODEL", "advisor-test");
        std::env::set_var("UNI_API_KEY", "  ");

        let config = Config::load().expect("config should load");
        assert_eq!(config.api_url, "http://localhost:9999/api/chat");
        assert_eq!(config.model, "advisor-test");
        assert_eq!(config.api_key, None);

        std::env::remove_var("UNI_API_URL");
        std::env::remove_var("UNI_MODEL");
        std::env::remove_var("UNI_API_KEY");
    }
}
