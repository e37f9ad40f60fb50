//! Configuration management.
//!
//! Settings come from environment variables, or from a JSON file when
//! `CAMPAIGNFLOW_CONFIG` points at one:
//!
//! - `DATA_BACKEND` - `mock` (default) or `supabase`
//! - `MOCK_LATENCY_MS` - simulated round trip for the mock backend (default 0)
//! - `SEED_SAMPLE_DATA` - seed the mock backend with the sample campaign (default true)
//! - `SUPABASE_URL`, `SUPABASE_ANON_KEY` - required for the supabase backend
//! - `SUPABASE_ACCESS_TOKEN` - session token of an already signed-in user
//! - `SUPABASE_EMAIL`, `SUPABASE_PASSWORD` - sign in at startup instead

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which task store implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataBackend {
    #[default]
    Mock,
    Supabase,
}

impl DataBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Supabase => "supabase",
        }
    }
}

impl std::str::FromStr for DataBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" | "" => Ok(Self::Mock),
            "supabase" => Ok(Self::Supabase),
            other => bail!("unknown DATA_BACKEND '{}', expected 'mock' or 'supabase'", other),
        }
    }
}

/// Connection settings for the hosted backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: DataBackend,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supabase: Option<SupabaseConfig>,
    #[serde(default)]
    pub mock_latency_ms: u64,
    #[serde(default = "default_seed")]
    pub seed_sample_data: bool,
}

fn default_seed() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: DataBackend::Mock,
            supabase: None,
            mock_latency_ms: 0,
            seed_sample_data: true,
        }
    }
}

impl Config {
    /// Load from `CAMPAIGNFLOW_CONFIG` if set, otherwise from the environment.
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var("CAMPAIGNFLOW_CONFIG") {
            Ok(path) if !path.is_empty() => Self::load(Path::new(&path)),
            _ => Self::from_lookup(|key| std::env::var(key).ok()),
        }
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend: DataBackend = non_empty("DATA_BACKEND")
            .as_deref()
            .unwrap_or("mock")
            .parse()?;

        let mock_latency_ms = match non_empty("MOCK_LATENCY_MS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("MOCK_LATENCY_MS must be an integer, got '{}'", raw))?,
            None => 0,
        };

        let seed_sample_data = match non_empty("SEED_SAMPLE_DATA") {
            Some(raw) => parse_bool(&raw)
                .with_context(|| format!("SEED_SAMPLE_DATA must be a boolean, got '{}'", raw))?,
            None => true,
        };

        let supabase = match (non_empty("SUPABASE_URL"), non_empty("SUPABASE_ANON_KEY")) {
            (Some(url), Some(anon_key)) => Some(SupabaseConfig {
                url,
                anon_key,
                access_token: non_empty("SUPABASE_ACCESS_TOKEN"),
                email: non_empty("SUPABASE_EMAIL"),
                password: non_empty("SUPABASE_PASSWORD"),
            }),
            _ => None,
        };

        let config = Self {
            backend,
            supabase,
            mock_latency_ms,
            seed_sample_data,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject settings the selected backend cannot start with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.backend != DataBackend::Supabase {
            return Ok(());
        }
        let Some(supabase) = &self.supabase else {
            bail!("DATA_BACKEND=supabase requires SUPABASE_URL and SUPABASE_ANON_KEY");
        };
        let parsed = url::Url::parse(&supabase.url)
            .with_context(|| format!("SUPABASE_URL is not a valid URL: {}", supabase.url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("SUPABASE_URL must be http(s), got {}", parsed.scheme());
        }
        if supabase.email.is_some() != supabase.password.is_some() {
            bail!("SUPABASE_EMAIL and SUPABASE_PASSWORD must be set together");
        }
        Ok(())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_to_mock() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_supabase_from_env() {
        let config = Config::from_lookup(lookup(&[
            ("DATA_BACKEND", "Supabase"),
            ("SUPABASE_URL", "https://proj.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("SUPABASE_ACCESS_TOKEN", "jwt"),
        ]))
        .unwrap();
        assert_eq!(config.backend, DataBackend::Supabase);
        let supabase = config.supabase.unwrap();
        assert_eq!(supabase.access_token.as_deref(), Some("jwt"));
        assert!(supabase.email.is_none());
    }

    #[test]
    fn test_supabase_without_settings_is_rejected() {
        let err = Config::from_lookup(lookup(&[("DATA_BACKEND", "supabase")])).unwrap_err();
        assert!(err.to_string().contains("SUPABASE_URL"));
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        assert!(Config::from_lookup(lookup(&[("DATA_BACKEND", "firebase")])).is_err());
    }

    #[test]
    fn test_mock_options() {
        let config = Config::from_lookup(lookup(&[
            ("MOCK_LATENCY_MS", "300"),
            ("SEED_SAMPLE_DATA", "off"),
        ]))
        .unwrap();
        assert_eq!(config.mock_latency_ms, 300);
        assert!(!config.seed_sample_data);

        assert!(Config::from_lookup(lookup(&[("MOCK_LATENCY_MS", "soon")])).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"backend": "supabase", "supabase": {"url": "http://localhost:54321", "anon_key": "k"}}"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.backend, DataBackend::Supabase);
        assert!(config.seed_sample_data);
        assert_eq!(config.supabase.unwrap().url, "http://localhost:54321");
    }

    #[test]
    fn test_load_rejects_bad_url() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"backend": "supabase", "supabase": {"url": "not a url", "anon_key": "k"}}"#,
        )
        .unwrap();
        assert!(Config::load(&path).is_err());
    }
}
