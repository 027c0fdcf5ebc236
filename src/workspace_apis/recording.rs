use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::{CreateDatabaseRequest, CreatedDatabase, WorkspaceApi};
use crate::config::Credentials;
use crate::errors::RemoteError;

// In-memory stand-in for the workspace service
// Useful for testing and experimentation without a workspace to write to
//
// NOTE:
//  - every call is recorded, including ones that are scripted to fail
//  - once the scripted responses run out, each call creates a database with a fresh v4 id
#[derive(Debug, Default)]
pub struct RecordingApi {
    requests: Mutex<Vec<CreateDatabaseRequest>>,
    scripted: Mutex<VecDeque<Scripted>>,
}

#[derive(Debug)]
enum Scripted {
    Created(CreatedDatabase),
    Failure(String),
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response for the next unscripted call
    pub fn respond_with(mut self, created: CreatedDatabase) -> Self {
        self.scripted.get_mut().push_back(Scripted::Created(created));
        self
    }

    /// Queues a failure for the next unscripted call
    pub fn fail_with(mut self, message: impl Into<String>) -> Self {
        self.scripted
            .get_mut()
            .push_back(Scripted::Failure(message.into()));
        self
    }

    pub async fn calls(&self) -> usize {
        self.requests.lock().await.len()
    }

    pub async fn requests(&self) -> Vec<CreateDatabaseRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl WorkspaceApi for RecordingApi {
    async fn create_database(
        &self,
        credentials: &Credentials,
        request: &CreateDatabaseRequest,
    ) -> Result<CreatedDatabase, RemoteError> {
        self.requests.lock().await.push(request.clone());
        debug!(
            parent_page_id = credentials.parent_page_id(),
            "Recorded create_database call"
        );

        match self.scripted.lock().await.pop_front() {
            Some(Scripted::Created(created)) => Ok(created),
            Some(Scripted::Failure(message)) => Err(RemoteError::Other(message)),
            None => Ok(CreatedDatabase::with_id(uuid::Uuid::new_v4().to_string())),
        }
    }
}
