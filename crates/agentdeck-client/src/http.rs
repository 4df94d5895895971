//! HTTP implementation of the store interface.

use agentdeck_core::{Agent, AgentId, AgentMetrics, TaskRecord, TaskRequest};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::ClientError;
use crate::store::{TaskPage, TaskQuery, TaskStore};

/// HTTP client for the remote task/agent store.
pub struct HttpClient {
    inner: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client.
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Get JSON from an endpoint.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "GET request");

        let response = self.inner.get(&url).send().await?;
        Self::decode(response).await
    }

    /// Post a JSON body to an endpoint and decode the JSON response.
    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "POST request");

        let response = self.inner.post(&url).json(body).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: api_message(&body)
                    .unwrap_or_else(|| format!("request failed with status {status}")),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Serialization(e.to_string()))
    }
}

/// Extract a human-readable message from an error response body.
///
/// The store reports failures as `{"error": "..."}`, `{"error": {"message":
/// "..."}}` or `{"message": "..."}`. Anything else yields `None` and the
/// caller falls back to a generic message.
fn api_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let candidate = value.get("error").or_else(|| value.get("message"))?;
    match candidate {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned),
        _ => None,
    }
}

#[async_trait]
impl TaskStore for HttpClient {
    async fn list_agents(&self) -> Result<Vec<Agent>, ClientError> {
        self.get_json("/agents").await
    }

    async fn agent_metrics(&self, agent_id: &AgentId) -> Result<AgentMetrics, ClientError> {
        self.get_json(&format!("/agents/{agent_id}/metrics")).await
    }

    async fn list_tasks(&self, query: &TaskQuery) -> Result<TaskPage, ClientError> {
        let mut path = format!("/tasks?limit={}&offset={}", query.limit, query.offset);
        if let Some(agent_id) = &query.agent_id {
            path.push_str(&format!("&agentId={agent_id}"));
        }
        self.get_json(&path).await
    }

    async fn execute_task(&self, request: &TaskRequest) -> Result<TaskRecord, ClientError> {
        self.post_json("/tasks", request).await
    }

    async fn recent_activity(&self, limit: u32) -> Result<Vec<TaskRecord>, ClientError> {
        self.get_json(&format!("/activity?limit={limit}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_message_flat_string() {
        assert_eq!(
            api_message(r#"{"error": "topic is required"}"#),
            Some("topic is required".to_string())
        );
    }

    #[test]
    fn test_api_message_nested_object() {
        assert_eq!(
            api_message(r#"{"error": {"message": "unknown action"}}"#),
            Some("unknown action".to_string())
        );
    }

    #[test]
    fn test_api_message_message_key() {
        assert_eq!(
            api_message(r#"{"message": "bad request"}"#),
            Some("bad request".to_string())
        );
    }

    #[test]
    fn test_api_message_unrecognized_body() {
        assert_eq!(api_message("<html>502</html>"), None);
        assert_eq!(api_message(r#"{"error": 42}"#), None);
    }
}
