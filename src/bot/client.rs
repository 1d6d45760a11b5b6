use bytes::Bytes;
use reqwest::StatusCode;
use thiserror::Error;

use crate::bot::session::PendingVideo;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned {status}: {body}")]
    Backend { status: StatusCode, body: String },
}

/// HTTP client for the processing service.
#[derive(Clone)]
pub struct ProcessingClient {
    http: reqwest::Client,
    base_url: String,
}

impl ProcessingClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Upload a downloaded video together with the chosen emoji and get
    /// back the processed bytes. Non-2xx responses come back as
    /// [`ClientError::Backend`] with the status and body so the chat
    /// handler can show them to the user.
    pub async fn add_emoji(&self, video: &PendingVideo, emoji: &str) -> Result<Bytes, ClientError> {
        let data = tokio::fs::read(&video.path).await?;

        let part = reqwest::multipart::Part::bytes(data)
            .file_name(format!("input{}", video.extension))
            .mime_str(&video.media_type)?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("emoji", emoji.to_string());

        let response = self
            .http
            .post(format!("{}/api/add-emoji", self.base_url))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Backend { status, body });
        }

        Ok(response.bytes().await?)
    }
}
