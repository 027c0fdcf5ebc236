use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use super::{CreateDatabaseRequest, CreatedDatabase, WorkspaceApi};
use crate::config::{Config, Credentials};
use crate::errors::RemoteError;

static USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Talks to the Notion REST API.
///
/// No timeout is configured on the client; a hanging request blocks until the transport gives up.
#[derive(Debug, Clone)]
pub struct NotionSession {
    client: reqwest::Client,
    endpoint: Url,
    notion_version: String,
}

#[derive(Debug, Deserialize)]
struct NotionErrorBody {
    code: String,
    message: String,
}

impl NotionSession {
    pub fn try_new(config: &Config) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            endpoint: config.api_endpoint.clone(),
            notion_version: config.notion_version.clone(),
        })
    }

    fn databases_url(&self) -> Result<Url, RemoteError> {
        self.endpoint
            .join("databases")
            .map_err(|e| RemoteError::Other(format!("Could not build databases url: {e}")))
    }
}

#[async_trait]
impl WorkspaceApi for NotionSession {
    #[tracing::instrument(skip_all, fields(parent_page_id = credentials.parent_page_id()), err)]
    async fn create_database(
        &self,
        credentials: &Credentials,
        request: &CreateDatabaseRequest,
    ) -> Result<CreatedDatabase, RemoteError> {
        let url = self.databases_url()?;
        tracing::info!(%url, title = %request.title_text(), "Creating database");

        let response = self
            .client
            .post(url)
            .bearer_auth(credentials.api_key())
            .header("Notion-Version", &self.notion_version)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        tracing::debug!(status = status.as_u16(), "Database created");
        serde_json::from_str(&body).map_err(Into::into)
    }
}

fn api_error(status: StatusCode, body: &str) -> RemoteError {
    match serde_json::from_str::<NotionErrorBody>(body) {
        Ok(error) => RemoteError::Api {
            status: status.as_u16(),
            code: error.code,
            message: error.message,
        },
        Err(_) => RemoteError::Api {
            status: status.as_u16(),
            code: status
                .canonical_reason()
                .unwrap_or("unknown")
                .to_lowercase()
                .replace(' ', "_"),
            message: body.to_string(),
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::schema::COMMANDS_SCHEMA;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    // Accepts a single connection, answers with the given status and body, and hands back
    // the raw request it received.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (Url, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });

        (Url::parse(&format!("http://{addr}/v1/")).unwrap(), handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            if let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
                let content_length = headers
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }

        String::from_utf8(buf).unwrap()
    }

    fn session(endpoint: Url) -> NotionSession {
        let config = Config {
            api_endpoint: endpoint,
            ..Config::default()
        };
        NotionSession::try_new(&config).unwrap()
    }

    fn request() -> CreateDatabaseRequest {
        CreateDatabaseRequest::new("parent-page", "Commands — Brain Trigger", "🧠", &COMMANDS_SCHEMA)
    }

    #[test_log::test(tokio::test)]
    async fn test_create_database_sends_request() {
        let (endpoint, server) = serve_once(
            "200 OK",
            r#"{"object":"database","id":"abcd1234-ef56-7890-ab12-cd34ef567890","url":"https://www.notion.so/abcd1234ef567890ab12cd34ef567890"}"#,
        )
        .await;
        let credentials = Config::new("secret_test", "parent-page").credentials().unwrap();

        let created = session(endpoint)
            .create_database(&credentials, &request())
            .await
            .unwrap();

        assert_eq!(
            created.id.as_deref(),
            Some("abcd1234-ef56-7890-ab12-cd34ef567890")
        );

        let raw = server.await.unwrap();
        let (head, body) = raw.split_once("\r\n\r\n").unwrap();
        let head = head.to_lowercase();
        assert!(head.starts_with("post /v1/databases http/1.1"));
        assert!(head.contains("authorization: bearer secret_test"));
        assert!(head.contains("notion-version: 2022-06-28"));

        let body: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(body["parent"]["page_id"], "parent-page");
        assert_eq!(body["title"][0]["text"]["content"], "Commands — Brain Trigger");
        assert_eq!(body["icon"]["emoji"], "🧠");
        assert_eq!(body["properties"]["Status"]["select"]["options"][3]["name"], "Failed");
    }

    #[test_log::test(tokio::test)]
    async fn test_api_error_is_surfaced() {
        let (endpoint, server) = serve_once(
            "400 Bad Request",
            r#"{"object":"error","status":400,"code":"validation_error","message":"body failed validation"}"#,
        )
        .await;
        let credentials = Config::new("secret_test", "parent-page").credentials().unwrap();

        let err = session(endpoint)
            .create_database(&credentials, &request())
            .await
            .unwrap_err();
        server.await.unwrap();

        match err {
            RemoteError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code, "validation_error");
                assert_eq!(message, "body failed validation");
            }
            other => panic!("Expected an api error, got {:?}", other),
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_malformed_success_body() {
        let (endpoint, server) = serve_once("200 OK", "not json").await;
        let credentials = Config::new("secret_test", "parent-page").credentials().unwrap();

        let err = session(endpoint)
            .create_database(&credentials, &request())
            .await
            .unwrap_err();
        server.await.unwrap();

        assert!(matches!(err, RemoteError::Decode(_)));
    }

    #[test_log::test(tokio::test)]
    async fn test_connection_refused() {
        // Bind and drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let credentials = Config::new("secret_test", "parent-page").credentials().unwrap();
        let err = session(Url::parse(&format!("http://{addr}/v1/")).unwrap())
            .create_database(&credentials, &request())
            .await
            .unwrap_err();

        assert!(matches!(err, RemoteError::Transport(_)));
    }

    #[test]
    fn test_api_error_with_unparseable_body() {
        let err = api_error(StatusCode::BAD_GATEWAY, "<html>upstream</html>");
        match err {
            RemoteError::Api { status, code, message } => {
                assert_eq!(status, 502);
                assert_eq!(code, "bad_gateway");
                assert_eq!(message, "<html>upstream</html>");
            }
            other => panic!("Expected an api error, got {:?}", other),
        }
    }
}
