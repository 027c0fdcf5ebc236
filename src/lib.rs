pub mod config;
pub mod errors;
pub mod provisioner;
pub mod report;
pub mod schema;
pub mod workspace_apis;

pub use config::{Config, Credentials};
pub use errors::{ConfigError, ProvisionError, RemoteError};
pub use provisioner::{DatabaseIds, NormalizedId, ProvisionOutcome, Provisioner};
pub use workspace_apis::{NotionSession, RecordingApi, WorkspaceApi};
