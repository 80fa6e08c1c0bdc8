use super::{BackendError, BackendResult, ConversationBackend, SendReply};
use crate::csrf::{CSRF_FORM_FIELD, CSRF_HEADER, CsrfSources};
use crate::route::{delete_path, rename_path};
use crate::types::{ConversationId, SessionHit};
use async_trait::async_trait;
use reqwest::multipart::Form;
use serde::Deserialize;

const SESSIONS_PATH: &str = "/chat/api/sessions/";

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<SessionHit>>,
}

/// `reqwest` client for the Memoria endpoints
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    csrf: CsrfSources,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, csrf: CsrfSources) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            csrf,
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    /// POST carrying the CSRF header and, when known, the session cookie.
    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .post(self.url(path))
            .header(CSRF_HEADER, self.csrf.token());
        if let Some(cookie) = &self.csrf.cookie_header {
            request = request.header(reqwest::header::COOKIE, cookie);
        }
        request
    }

    fn expect_success(response: reqwest::Response) -> BackendResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(BackendError::Status {
                status: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl ConversationBackend for HttpBackend {
    async fn rename(&self, id: &ConversationId, title: &str) -> BackendResult<()> {
        let form = Form::new().text("title", title.to_string());
        let response = self.post(&rename_path(id)).multipart(form).send().await?;
        Self::expect_success(response)?;
        Ok(())
    }

    async fn delete(&self, id: &ConversationId) -> BackendResult<()> {
        let response = self.post(&delete_path(id)).send().await?;
        Self::expect_success(response)?;
        Ok(())
    }

    async fn search_sessions(&self, query: &str) -> BackendResult<Vec<SessionHit>> {
        let mut request = self
            .client
            .get(self.url(SESSIONS_PATH))
            .query(&[("q", query)]);
        if let Some(cookie) = &self.csrf.cookie_header {
            request = request.header(reqwest::header::COOKIE, cookie);
        }
        let response = Self::expect_success(request.send().await?)?;
        let body = response.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;
        Ok(parsed.results.unwrap_or_default())
    }

    async fn send_message(&self, action: &str, message: &str) -> BackendResult<SendReply> {
        let form = Form::new()
            .text("message", message.to_string())
            .text(CSRF_FORM_FIELD, self.csrf.token());
        let response = self
            .post(action)
            .header("X-Requested-With", "XMLHttpRequest")
            .multipart(form)
            .send()
            .await?;
        let response = Self::expect_success(response)?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
