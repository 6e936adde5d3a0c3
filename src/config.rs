use anyhow::Result;
use serde::Deserialize;
use std::{path::Path, time::Duration};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: Api,
    #[serde(default)]
    pub retry: Retry,
    #[serde(default)]
    pub http: Http,
    #[serde(default)]
    pub listing: Listing,
}

/// Remote demand/capacity API
#[derive(Debug, Clone)]
pub struct Api {
    pub url: String,
    pub token: String,
    pub insecure: bool,
    pub timeout: Duration,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Retry {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Http {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_delay_ms() -> u64 {
    2000
}

fn default_page_size() -> usize {
    crate::listing::DEFAULT_PAGE_SIZE
}

impl Default for Retry {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}

impl Default for Http {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

impl Default for Listing {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::info!("Loading config from {}", path.display());

        let config = std::fs::read_to_string(path)?;
        Self::from_yaml(&config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_norway::from_str(yaml)?)
    }
}

impl Api {
    /// Create a new Api instance, resolving the token from an environment variable if needed
    pub fn new(
        url: String,
        token: Option<String>,
        token_from: Option<String>,
        insecure: bool,
        timeout_secs: u64,
    ) -> Result<Self> {
        let token = match (token, token_from) {
            (Some(token), _) => token,
            (None, Some(var)) => std::env::var(&var)
                .map_err(|e| anyhow::anyhow!("Failed to read token from ${}: {}", var, e))?,
            (None, None) => String::new(),
        };

        if timeout_secs == 0 {
            anyhow::bail!("timeoutSecs must be at least 1");
        }

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            token,
            insecure,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl<'de> Deserialize<'de> for Api {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct ApiRaw {
            url: String,
            token: Option<String>,
            token_from: Option<String>,
            #[serde(default)]
            insecure: Option<bool>,
            #[serde(default)]
            timeout_secs: Option<u64>,
        }

        let raw = ApiRaw::deserialize(deserializer)?;
        Api::new(
            raw.url,
            raw.token,
            raw.token_from,
            raw.insecure.unwrap_or(false),
            raw.timeout_secs.unwrap_or(30),
        )
        .map_err(serde::de::Error::custom)
    }
}
