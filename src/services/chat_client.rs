// src/services/chat_client.rs
use std::sync::Arc;

use reqwest::{Client, Url};
use tracing::{debug, warn};

use crate::config::Settings;
use crate::error::{ClientError, ConfigError};
use crate::message::{ChatRequest, ChatResponse, Citation, HealthResponse};
use crate::services::renderer::{Locale, RenderSink, Sender, render_bubble};

/// What became of one call to [`ChatClient::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Blank input: nothing rendered, nothing sent.
    Ignored,
    Answered { answer: String, citations: Vec<Citation> },
    /// The error bubble text that was rendered.
    Failed(String),
}

/// Binds input submissions to `/chat` round trips and renders the results.
pub struct ChatClient<S: RenderSink + ?Sized> {
    http: Client,
    chat_url: Url,
    health_url: Url,
    session_id: String,
    locale: Locale,
    sink: Arc<S>,
}

impl<S: RenderSink + ?Sized> ChatClient<S> {
    pub fn new(
        http: Client,
        base_url: &Url,
        session_id: impl Into<String>,
        locale: Locale,
        sink: Arc<S>,
    ) -> Result<Self, ConfigError> {
        let endpoint = |path: &str| {
            base_url.join(path).map_err(|e| ConfigError::Invalid {
                key: "HR_CHAT_BASE_URL",
                reason: e.to_string(),
            })
        };
        Ok(Self {
            http,
            chat_url: endpoint("/chat")?,
            health_url: endpoint("/health")?,
            session_id: session_id.into(),
            locale,
            sink,
        })
    }

    /// Build from settings, applying the configured request timeout.
    pub fn from_settings(
        settings: &Settings,
        session_id: impl Into<String>,
        sink: Arc<S>,
    ) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self::new(http, &settings.base_url, session_id, settings.locale, sink)?)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn sink(&self) -> &Arc<S> {
        &self.sink
    }

    /// Handle one input submission end to end. Never returns an error: every
    /// failure is rendered as a bot bubble and reported as `Submission::Failed`.
    pub async fn submit(&self, input: &str) -> Submission {
        let message = input.trim();
        if message.is_empty() {
            return Submission::Ignored;
        }

        render_bubble(self.sink.as_ref(), message, Sender::User, &[]);
        self.sink.clear_input();

        match self.ask(message).await {
            Ok(resp) => {
                render_bubble(self.sink.as_ref(), &resp.answer, Sender::Bot, &resp.citations);
                Submission::Answered { answer: resp.answer, citations: resp.citations }
            }
            Err(e) => {
                warn!(session_id = %self.session_id, error = %e, "chat request failed");
                let text = format!("{}{}", self.locale.error_prefix(), e);
                render_bubble(self.sink.as_ref(), &text, Sender::Bot, &[]);
                Submission::Failed(text)
            }
        }
    }

    /// One POST to `/chat`. The body is decoded whatever the status; a
    /// non-empty `error` field is turned into `ClientError::Server`.
    pub async fn ask(&self, message: &str) -> Result<ChatResponse, ClientError> {
        let body = ChatRequest { message, session_id: &self.session_id };
        debug!(url = %self.chat_url, chars = message.chars().count(), "sending chat request");

        let response = self.http.post(self.chat_url.clone()).json(&body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!(%status, len = bytes.len(), "chat response received");

        let parsed: ChatResponse = serde_json::from_slice(&bytes)?;
        if let Some(err) = parsed.server_error() {
            return Err(ClientError::Server(err));
        }
        Ok(parsed)
    }

    /// `GET /health`, expecting `{"status":"ok"}`.
    pub async fn health(&self) -> Result<(), ClientError> {
        let response = self.http.get(self.health_url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }
        let bytes = response.bytes().await?;
        let parsed: HealthResponse = serde_json::from_slice(&bytes)?;
        if parsed.status != "ok" {
            return Err(ClientError::Server(format!("backend reports status '{}'", parsed.status)));
        }
        Ok(())
    }
}
