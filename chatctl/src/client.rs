use crate::error::{ChatError, Result};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde_json::Value;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// HTTP plumbing shared by every call to the chatbot backend.
///
/// Cloning is cheap: the underlying `reqwest::Client` keeps its connection
/// pool behind an `Arc`.
#[derive(Clone, Debug)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let raw = format!("{}{}", self.base_url, path);
        let parsed = if query.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, query)
        };
        parsed.map_err(|e| ChatError::Config(format!("invalid server URL '{}': {e}", self.base_url)))
    }

    fn build_request(&self, method: Method, path: &str, query: &[(&str, &str)]) -> Result<RequestBuilder> {
        let url = self.url(path, query)?;
        tracing::debug!(%method, %url, "sending backend request");
        Ok(self.client.request(method, url))
    }

    async fn handle_response(resp: Response) -> Result<Value> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| error_message(&v))
                .unwrap_or(body);
            return Err(ChatError::api(status.as_u16(), message));
        }
        let text = resp.text().await?;
        if text.is_empty() {
            Ok(Value::Null)
        } else {
            serde_json::from_str(&text).map_err(ChatError::Json)
        }
    }

    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let resp = self.build_request(Method::GET, path, query)?.send().await?;
        Self::handle_response(resp).await
    }

    pub async fn post(&self, path: &str, query: &[(&str, &str)], body: &Value) -> Result<Value> {
        let resp = self
            .build_request(Method::POST, path, query)?
            .json(body)
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    pub async fn health(&self) -> Result<Value> {
        self.get("/api/health", &[]).await
    }
}

/// Pulls a human-readable message out of an error body. The backend uses
/// `message` for its own envelopes and FastAPI uses `detail` for validation
/// failures.
fn error_message(body: &Value) -> Option<String> {
    ["message", "error", "detail"]
        .iter()
        .find_map(|key| body.get(*key))
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = BackendClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn query_values_are_encoded() {
        let client = BackendClient::new(DEFAULT_BASE_URL);
        let url = client
            .url("/api/user-profile", &[("user_id", "a b&c"), ("session_id", "s1")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/user-profile?user_id=a+b%26c&session_id=s1"
        );
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let client = BackendClient::new("not a url");
        let err = client.url("/api/health", &[]).unwrap_err();
        assert!(matches!(err, ChatError::Config(_)));
    }

    #[tokio::test]
    async fn health_returns_body() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET).path("/api/health");
            then.status(200)
                .json_body(json!({"status": "ok", "service": "chatbot"}));
        });

        let client = BackendClient::new(server.base_url());
        let body = client.health().await.unwrap();

        m.assert();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn error_status_uses_message_field() {
        let server = MockServer::start();
        let _m = server.mock(|when, then| {
            when.method(POST).path("/api/user-profile");
            then.status(400).json_body(json!({
                "success": false,
                "message": "no profile data",
                "error_code": "MISSING_PROFILE_DATA"
            }));
        });

        let client = BackendClient::new(server.base_url());
        let err = client
            .post("/api/user-profile", &[("user_id", "u1")], &json!({}))
            .await
            .unwrap_err();

        match err {
            ChatError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "no profile data");
            }
            other => panic!("expected Api error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_status_falls_back_to_raw_body() {
        let server = MockServer::start();
        let _m = server.mock(|when, then| {
            when.method(GET).path("/api/health");
            then.status(502).body("bad gateway");
        });

        let client = BackendClient::new(server.base_url());
        let err = client.health().await.unwrap_err();

        assert_eq!(err.to_string(), "API error (502): bad gateway");
    }

    #[tokio::test]
    async fn empty_body_is_null() {
        let server = MockServer::start();
        let _m = server.mock(|when, then| {
            when.method(GET).path("/api/health");
            then.status(200);
        });

        let client = BackendClient::new(server.base_url());
        assert_eq!(client.health().await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn malformed_body_is_a_json_error() {
        let server = MockServer::start();
        let _m = server.mock(|when, then| {
            when.method(GET).path("/api/health");
            then.status(200).body("{not json");
        });

        let client = BackendClient::new(server.base_url());
        let err = client.health().await.unwrap_err();
        assert!(matches!(err, ChatError::Json(_)));
    }
}
