use anyhow::{anyhow, Context};
use std::{env, path::PathBuf};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
const SESSION_DIR: &str = "ticketing-admin";
const SESSION_FILE: &str = "session.json";
const FALLBACK_SESSION_FILE: &str = ".ticketing-admin-session.json";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base_url: String,
    pub session_file: PathBuf,
}

impl Config {
    /// Reads `.env` and the `TICKETING_*` environment variables.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_values(
            env::var("TICKETING_API_BASE_URL").ok(),
            env::var("TICKETING_SESSION_FILE").ok(),
        )
    }

    pub fn from_values(
        api_base_url: Option<String>,
        session_file: Option<String>,
    ) -> anyhow::Result<Self> {
        let api_base_url = normalize_base_url(
            api_base_url
                .filter(|v| !v.trim().is_empty())
                .as_deref()
                .unwrap_or(DEFAULT_API_BASE_URL),
        )?;

        let session_file = session_file
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_session_file);

        Ok(Config {
            api_base_url,
            session_file,
        })
    }

    pub fn with_overrides(
        mut self,
        api_base_url: Option<String>,
        session_file: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        if let Some(url) = api_base_url {
            self.api_base_url = normalize_base_url(&url)?;
        }
        if let Some(path) = session_file {
            self.session_file = path;
        }
        Ok(self)
    }
}

fn normalize_base_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = reqwest::Url::parse(trimmed)
        .with_context(|| format!("Invalid API base URL: {}", raw))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(anyhow!("API base URL must use http or https: {}", raw));
    }
    Ok(trimmed.to_string())
}

fn default_session_file() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join(SESSION_DIR).join(SESSION_FILE))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_SESSION_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_values(None, None).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert!(config.session_file.ends_with(SESSION_FILE)
            || config.session_file.ends_with(FALLBACK_SESSION_FILE));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = Config::from_values(Some("  ".into()), Some(String::new())).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn trailing_slashes_are_trimmed() {
        let config = Config::from_values(
            Some("https://tickets.example.com/api/".into()),
            Some("/tmp/session.json".into()),
        )
        .unwrap();
        assert_eq!(config.api_base_url, "https://tickets.example.com/api");
        assert_eq!(config.session_file, PathBuf::from("/tmp/session.json"));
    }

    #[test]
    fn rejects_invalid_urls() {
        assert!(Config::from_values(Some("not a url".into()), None).is_err());
        assert!(Config::from_values(Some("ftp://files.example.com".into()), None).is_err());
    }

    #[test]
    fn overrides_replace_loaded_values() {
        let config = Config::from_values(None, None)
            .unwrap()
            .with_overrides(
                Some("http://127.0.0.1:9000/api".into()),
                Some(PathBuf::from("session.json")),
            )
            .unwrap();
        assert_eq!(config.api_base_url, "http://127.0.0.1:9000/api");
        assert_eq!(config.session_file, PathBuf::from("session.json"));
    }
}
