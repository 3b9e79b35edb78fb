use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILE: &str = "vivah.toml";

/// Settings from `vivah.toml`. Every field has a default, so a missing or
/// partial file still yields a working configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub locales: LocalesConfig,
    pub limits: LimitsConfig,
    pub notifier: NotifierConfig,
    pub site: SiteConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: "http://127.0.0.1:8000/api".to_string(),
            timeout_secs: 15,
            token: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LocalesConfig {
    pub dir: String,
    pub preload: Vec<String>,
}

impl Default for LocalesConfig {
    fn default() -> Self {
        LocalesConfig {
            dir: "website/locales".to_string(),
            preload: vec!["en".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub rsvp_per_hour: u64,
    pub wishes_per_hour: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        LimitsConfig {
            rsvp_per_hour: 5,
            wishes_per_hour: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    pub queue_capacity: usize,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        NotifierConfig { queue_capacity: 256 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            name: "Vivah".to_string(),
        }
    }
}

impl AppConfig {
    /// Read `vivah.toml` from the working directory, then apply `VIVAH_API_URL`.
    pub fn load() -> Self {
        let mut config = Self::from_file(Path::new(CONFIG_FILE));
        if let Ok(url) = std::env::var("VIVAH_API_URL") {
            if !url.trim().is_empty() {
                config.api.base_url = url.trim().to_string();
            }
        }
        config
    }

    pub fn from_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::parse(&raw).unwrap_or_else(|e| {
                log::warn!("{} is invalid ({}); using defaults", path.display(), e);
                AppConfig::default()
            }),
            Err(_) => {
                log::info!("{} not found; using defaults", path.display());
                AppConfig::default()
            }
        }
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api.timeout(), Duration::from_secs(15));
        assert_eq!(config.locales.preload, vec!["en".to_string()]);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = AppConfig::parse(
            r#"
            [api]
            base_url = "https://api.example.in/v1"

            [limits]
            rsvp_per_hour = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://api.example.in/v1");
        assert_eq!(config.api.timeout_secs, 15);
        assert_eq!(config.limits.rsvp_per_hour, 2);
        assert_eq!(config.limits.wishes_per_hour, 10);
        assert_eq!(config.site.name, "Vivah");
    }
}
