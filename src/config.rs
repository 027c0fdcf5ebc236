use url::Url;

use crate::errors::ConfigError;

pub const DEFAULT_API_ENDPOINT: &str = "https://api.notion.com/v1/";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Configuration as read from the environment. Required values are kept optional here
/// and only checked by [`Config::credentials`], so that a missing value is reported
/// before anything talks to the network.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: Option<String>,
    pub parent_page_id: Option<String>,
    pub api_endpoint: Url,
    pub notion_version: String,
}

/// Validated credentials. The only way to reach the workspace API.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    parent_page_id: String,
}

impl Config {
    /// Reads the process environment. Call `load_dotenv` first if a `.env` file should apply.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_endpoint = match lookup("NOTION_API_ENDPOINT").filter(|v| !v.trim().is_empty()) {
            Some(raw) => parse_endpoint(&raw)?,
            None => parse_endpoint(DEFAULT_API_ENDPOINT)?,
        };

        Ok(Self {
            api_key: lookup("NOTION_API_KEY"),
            parent_page_id: lookup("NOTION_PARENT_PAGE_ID"),
            api_endpoint,
            notion_version: lookup("NOTION_VERSION")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_NOTION_VERSION.to_string()),
        })
    }

    pub fn new(api_key: impl Into<String>, parent_page_id: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            parent_page_id: Some(parent_page_id.into()),
            ..Self::default()
        }
    }

    /// Precondition check. The api key is checked before the parent page id.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let api_key = non_empty(&self.api_key).ok_or(ConfigError::MissingApiKey)?;
        let parent_page_id =
            non_empty(&self.parent_page_id).ok_or(ConfigError::MissingParentPageId)?;

        Ok(Credentials {
            api_key: api_key.to_string(),
            parent_page_id: parent_page_id.to_string(),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            parent_page_id: None,
            api_endpoint: Url::parse(DEFAULT_API_ENDPOINT).expect("Default endpoint is a valid url"),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
        }
    }
}

// Keeps the api key out of logs and panic messages
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("parent_page_id", &self.parent_page_id)
            .field("api_endpoint", &self.api_endpoint.as_str())
            .field("notion_version", &self.notion_version)
            .finish()
    }
}

impl Credentials {
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn parent_page_id(&self) -> &str {
        &self.parent_page_id
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("parent_page_id", &self.parent_page_id)
            .finish()
    }
}

/// Loads `.env` from the working directory or its parents. A missing file is not an error.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => tracing::warn!(error = %e, "Could not load .env file"),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    // Url::join drops the last path segment unless the base ends with a slash
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };

    Url::parse(&normalized).map_err(|e| ConfigError::InvalidEndpoint(raw.to_string(), e.to_string()))
}
