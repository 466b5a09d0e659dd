use std::path::PathBuf;
use std::time::Duration;

use anyhow::anyhow;
use anyhow::Result;
use common::Language;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub locale: LocaleConfig,
}

/// Device storage layout: one JSON file holding every persisted key.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_storage_file")]
    pub file: String,
    #[serde(default = "default_draft_key")]
    pub draft_key: String,
    #[serde(default = "default_language_key")]
    pub language_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            file: default_storage_file(),
            draft_key: default_draft_key(),
            language_key: default_language_key(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Bearer token for authenticated endpoints; `API_TOKEN` fills it when unset.
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: default_base_url(), timeout_secs: default_timeout(), token: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocaleConfig {
    #[serde(default = "default_language")]
    pub default_language: String,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self { default_language: default_language() }
    }
}

fn default_data_dir() -> String { "data".into() }
fn default_storage_file() -> String { "storefront.json".into() }
fn default_draft_key() -> String { "setup_draft".into() }
fn default_language_key() -> String { "app_language".into() }
fn default_base_url() -> String { "http://127.0.0.1:8080/api".into() }
fn default_timeout() -> u64 { 30 }
fn default_language() -> String { "en".into() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.storage.normalize()?;
        self.api.normalize_from_env();
        self.api.validate()?;
        self.locale.validate()?;
        Ok(())
    }
}

impl StorageConfig {
    fn normalize(&mut self) -> Result<()> {
        self.draft_key = self.draft_key.trim().to_string();
        self.language_key = self.language_key.trim().to_string();
        if self.file.trim().is_empty() {
            self.file = default_storage_file();
        }
        if self.draft_key.is_empty() || self.language_key.is_empty() {
            return Err(anyhow!("storage keys must not be empty"));
        }
        // each store owns its key exclusively
        if self.draft_key == self.language_key {
            return Err(anyhow!("storage.draft_key and storage.language_key must differ"));
        }
        Ok(())
    }

    pub fn file_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.file)
    }
}

impl ApiConfig {
    pub fn normalize_from_env(&mut self) {
        if self.base_url.trim().is_empty() {
            self.base_url = std::env::var("API_BASE_URL").unwrap_or_else(|_| default_base_url());
        }
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if self.token.is_none() {
            self.token = std::env::var("API_TOKEN").ok();
        }
        self.token = self.token.take().map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(anyhow!("api.base_url is empty"));
        }
        let lower = self.base_url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("api.base_url must start with http:// or https://"));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("api.timeout_secs must be a positive number of seconds"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl LocaleConfig {
    pub fn validate(&self) -> Result<()> {
        self.language().map(|_| ())
    }

    pub fn language(&self) -> Result<Language> {
        self.default_language
            .parse::<Language>()
            .map_err(|e| anyhow!("locale.default_language: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() -> Result<()> {
        let mut cfg = load_from_str("")?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.storage.draft_key, "setup_draft");
        assert_eq!(cfg.storage.language_key, "app_language");
        assert_eq!(cfg.api.timeout(), Duration::from_secs(30));
        assert_eq!(cfg.locale.language()?, Language::En);
        assert_eq!(cfg.storage.file_path(), PathBuf::from("data").join("storefront.json"));
        Ok(())
    }

    #[test]
    fn sections_override_defaults() -> Result<()> {
        let mut cfg = load_from_str(
            r#"
            [storage]
            data_dir = "/tmp/sf"
            draft_key = " vendor_draft "

            [api]
            base_url = "https://shop.example.com/api/"
            timeout_secs = 10

            [locale]
            default_language = "pt"
            "#,
        )?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.storage.draft_key, "vendor_draft");
        assert_eq!(cfg.api.base_url, "https://shop.example.com/api");
        assert_eq!(cfg.api.timeout_secs, 10);
        assert_eq!(cfg.locale.language()?, Language::Pt);
        Ok(())
    }

    #[test]
    fn blank_token_is_dropped() -> Result<()> {
        let mut cfg = load_from_str("[api]\ntoken = \"  \"\n")?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.api.token, None);

        let mut cfg = load_from_str("[api]\ntoken = \" tok \"\n")?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.api.token.as_deref(), Some("tok"));
        Ok(())
    }

    #[test]
    fn rejects_shared_keys_and_bad_values() {
        let mut cfg = load_from_str("[storage]\ndraft_key = \"k\"\nlanguage_key = \"k\"\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = load_from_str("[api]\nbase_url = \"ftp://x\"\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = load_from_str("[api]\ntimeout_secs = 0\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = load_from_str("[locale]\ndefault_language = \"de\"\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());
    }
}
