use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{Config, Credentials};
use crate::errors::{ProvisionError, RemoteError};
use crate::schema::COMMANDS_SCHEMA;
use crate::workspace_apis::{CreateDatabaseRequest, WorkspaceApi};

pub const DEFAULT_TITLE: &str = "Commands — Brain Trigger";
pub const DEFAULT_ICON: &str = "🧠";
pub const DEFAULT_OUTPUT_PATH: &str = "notion_db_ids.json";

/// Creates the Commands database and records its id locally.
///
/// Not idempotent: every successful [`Provisioner::run`] creates a new database and
/// replaces the id file.
#[derive(Debug, Clone, Builder)]
#[builder(build_fn(error = "anyhow::Error"))]
pub struct Provisioner {
    api: Arc<dyn WorkspaceApi>,
    #[builder(setter(into), default = "DEFAULT_TITLE.to_string()")]
    title: String,
    #[builder(setter(into), default = "DEFAULT_ICON.to_string()")]
    icon: String,
    #[builder(setter(into), default = "PathBuf::from(DEFAULT_OUTPUT_PATH)")]
    output_path: PathBuf,
}

/// A database id with the hyphens removed, i.e. `abcd1234ef56...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedId(String);

/// Contents of the id file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseIds {
    #[serde(rename = "COMMANDS_DB_ID")]
    pub commands_db_id: NormalizedId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionOutcome {
    /// The id as returned by the service
    pub database_id: String,
    pub normalized_id: NormalizedId,
    pub url: Option<String>,
    pub output_path: PathBuf,
    pub replaced_existing: bool,
}

impl Provisioner {
    pub fn builder() -> ProvisionerBuilder {
        ProvisionerBuilder::default()
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// The request `run` would submit for these credentials
    pub fn plan(&self, credentials: &Credentials) -> CreateDatabaseRequest {
        CreateDatabaseRequest::new(
            credentials.parent_page_id(),
            self.title.as_str(),
            self.icon.as_str(),
            &COMMANDS_SCHEMA,
        )
    }

    #[tracing::instrument(skip_all, err)]
    pub async fn run(&self, config: &Config) -> Result<ProvisionOutcome, ProvisionError> {
        let credentials = config.credentials()?;
        let request = self.plan(&credentials);

        info!(
            parent_page_id = credentials.parent_page_id(),
            "Creating Commands database"
        );
        let created = self.api.create_database(&credentials, &request).await?;

        let database_id = created
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or(RemoteError::MissingId)?;
        let normalized_id = NormalizedId::from_raw(&database_id);

        let replaced_existing = self.output_path.exists();
        if replaced_existing {
            warn!(path = %self.output_path.display(), "Overwriting existing database id file");
        }

        DatabaseIds::new(normalized_id.clone())
            .write_to(&self.output_path)
            .map_err(|source| ProvisionError::Persist {
                database_id: database_id.clone(),
                path: self.output_path.clone(),
                source,
            })?;

        info!(
            database_id = %database_id,
            normalized_id = normalized_id.as_str(),
            path = %self.output_path.display(),
            "Commands database created"
        );

        Ok(ProvisionOutcome {
            database_id,
            normalized_id,
            url: created.url,
            output_path: self.output_path.clone(),
            replaced_existing,
        })
    }
}

impl NormalizedId {
    pub fn from_raw(raw: &str) -> Self {
        Self(raw.chars().filter(|c| *c != '-').collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl DatabaseIds {
    pub fn new(commands_db_id: NormalizedId) -> Self {
        Self { commands_db_id }
    }

    /// Truncates and rewrites `path`. Not atomic.
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        let mut writer = std::io::BufWriter::new(std::fs::File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()
    }
}
