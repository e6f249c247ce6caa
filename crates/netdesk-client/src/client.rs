//! HTTP client for the ticketing backend

use crate::backend::TicketBackend;
use crate::error::{ClientError, ClientResult};
use crate::requests::{
    AssignRequest, CreateTicketRequest, FeedbackRequest, PrioritySeverityRequest,
    StatusUpdateRequest,
};
use async_trait::async_trait;
use netdesk_core::{Feedback, HistoryEvent, Ticket, TicketId};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<&str>) -> ClientResult<Self> {
        Self::with_timeout(base_url, token, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, token: Option<&str>, timeout: Duration) -> ClientResult<Self> {
        let parsed = Url::parse(base_url)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            token: token.map(String::from),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "backend request");
        let req = self.client.request(method, url);
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Send and turn non-2xx into `ClientError::Status`, keeping the
    /// backend's `message` field when the error body has one.
    async fn send(&self, req: RequestBuilder) -> ClientResult<Response> {
        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = backend_message(&body);
        tracing::debug!(status = status.as_u16(), ?message, "backend error response");
        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let resp = self.send(self.request(Method::GET, path)).await?;
        let value: serde_json::Value = resp.json().await?;
        serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Lists come back as bare arrays; anything else is read as empty.
    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Vec<T>> {
        let resp = self.send(self.request(Method::GET, path)).await?;
        let value: serde_json::Value = resp.json().await?;
        if !value.is_array() {
            tracing::warn!(path, "expected a JSON array, treating response as empty");
            return Ok(Vec::new());
        }
        serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Writes ignore the response body.
    async fn write<B: Serialize + Sync>(&self, method: Method, path: &str, body: &B) -> ClientResult<()> {
        self.send(self.request(method, path).json(body)).await?;
        Ok(())
    }
}

fn backend_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
}

#[async_trait]
impl TicketBackend for ApiClient {
    async fn list_tickets(&self) -> ClientResult<Vec<Ticket>> {
        self.get_list("/api/tickets").await
    }

    async fn get_ticket(&self, id: TicketId) -> ClientResult<Ticket> {
        self.get_json(&format!("/api/tickets/{}", id.value())).await
    }

    async fn ticket_history(&self, id: TicketId) -> ClientResult<Vec<HistoryEvent>> {
        self.get_list(&format!("/api/tickets/{}/history", id.value())).await
    }

    async fn create_ticket(&self, request: &CreateTicketRequest) -> ClientResult<()> {
        tracing::info!(customer = request.customer_id, category = %request.issue_category, "creating ticket");
        self.write(Method::POST, "/api/tickets/create", request).await
    }

    async fn update_status(&self, id: TicketId, request: &StatusUpdateRequest) -> ClientResult<()> {
        tracing::info!(ticket = %id, status = %request.status, "updating ticket status");
        self.write(Method::PUT, &format!("/api/tickets/{}/status", id.value()), request)
            .await
    }

    async fn assign_engineer(&self, id: TicketId, request: &AssignRequest) -> ClientResult<()> {
        tracing::info!(ticket = %id, engineer = request.engineer_id, "assigning engineer");
        self.write(Method::PUT, &format!("/api/tickets/{}/assign", id.value()), request)
            .await
    }

    async fn set_priority_severity(
        &self,
        id: TicketId,
        request: &PrioritySeverityRequest,
    ) -> ClientResult<()> {
        tracing::info!(ticket = %id, priority = ?request.priority, severity = ?request.severity, "setting priority/severity");
        self.write(
            Method::PUT,
            &format!("/api/tickets/{}/priority-severity", id.value()),
            request,
        )
        .await
    }

    /// An empty 2xx body still counts as feedback on file.
    async fn get_feedback(&self, id: TicketId) -> ClientResult<Feedback> {
        let path = format!("/api/feedback/ticket/{}", id.value());
        let body = self.send(self.request(Method::GET, &path)).await?.text().await?;
        if body.trim().is_empty() {
            return Ok(Feedback::default());
        }
        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Any 2xx is on file, whatever the body looks like.
    async fn feedback_exists(&self, id: TicketId) -> ClientResult<bool> {
        let path = format!("/api/feedback/ticket/{}", id.value());
        match self.send(self.request(Method::GET, &path)).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn submit_feedback(&self, id: TicketId, request: &FeedbackRequest) -> ClientResult<()> {
        tracing::info!(ticket = %id, rating = request.rating, "submitting feedback");
        self.write(Method::POST, &format!("/api/feedback/ticket/{}", id.value()), request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_url() {
        assert!(matches!(
            ApiClient::new("not a url", None),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:8080/", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_backend_message_extraction() {
        assert_eq!(
            backend_message(r#"{"message":"Feedback required","status":400}"#),
            Some("Feedback required".into())
        );
        assert_eq!(backend_message(r#"{"error":"x"}"#), None);
        assert_eq!(backend_message("<html>oops</html>"), None);
    }
}
