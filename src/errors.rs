use std::path::PathBuf;

use thiserror::Error;

/// A required configuration value is missing. Always raised before any network activity.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("NOTION_API_KEY environment variable is required")]
    MissingApiKey,

    #[error("NOTION_PARENT_PAGE_ID environment variable is required")]
    MissingParentPageId,

    #[error("invalid NOTION_API_ENDPOINT '{0}': {1}")]
    InvalidEndpoint(String, String),
}

/// Anything that went wrong talking to the workspace service.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request to the workspace service failed")]
    Transport(#[from] reqwest::Error),

    #[error("workspace service returned {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("could not decode workspace service response")]
    Decode(#[from] serde_json::Error),

    #[error("workspace service response did not contain a database id")]
    MissingId,

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The database exists remotely but the local record could not be written.
    #[error("database {database_id} was created but {} could not be written", path.display())]
    Persist {
        database_id: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
