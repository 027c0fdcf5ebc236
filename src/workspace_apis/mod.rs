use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Credentials;
use crate::errors::RemoteError;
use crate::schema::Schema;

mod notion;
pub use notion::NotionSession;

mod recording;
pub use recording::RecordingApi;

/// The one operation the provisioner needs from the workspace service.
///
/// Implementations must not retry; every call is a distinct creation on the remote side.
#[async_trait]
pub trait WorkspaceApi: Send + Sync + std::fmt::Debug {
    async fn create_database(
        &self,
        credentials: &Credentials,
        request: &CreateDatabaseRequest,
    ) -> Result<CreatedDatabase, RemoteError>;
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateDatabaseRequest {
    pub parent: Parent,
    pub title: Vec<RichText>,
    pub icon: Icon,
    pub properties: &'static Schema,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Parent {
    PageId { page_id: String },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RichText {
    Text { text: TextContent },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TextContent {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Icon {
    Emoji { emoji: String },
}

/// The parts of the created database record we care about. Everything else is ignored.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
pub struct CreatedDatabase {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl CreateDatabaseRequest {
    pub fn new(
        parent_page_id: impl Into<String>,
        title: impl Into<String>,
        icon: impl Into<String>,
        properties: &'static Schema,
    ) -> Self {
        Self {
            parent: Parent::PageId {
                page_id: parent_page_id.into(),
            },
            title: vec![RichText::plain(title)],
            icon: Icon::Emoji { emoji: icon.into() },
            properties,
        }
    }

    pub fn title_text(&self) -> String {
        self.title
            .iter()
            .map(|RichText::Text { text }| text.content.as_str())
            .collect()
    }
}

impl RichText {
    pub fn plain(content: impl Into<String>) -> Self {
        RichText::Text {
            text: TextContent {
                content: content.into(),
            },
        }
    }
}

impl CreatedDatabase {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            url: None,
        }
    }
}
