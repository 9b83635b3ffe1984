use crate::config::ChatConfig;
use crate::models::*;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};

/// Anything that can answer a question about an attached PDF.
#[async_trait]
pub trait RagBackend: Send + Sync {
    async fn ask(&self, question: &str, file: &AttachedFile) -> Result<String>;
}

pub struct RagClient {
    client: Client,
    endpoint: Url,
}

impl RagClient {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.endpoint.clone(),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn build_form(&self, question: &str, file: &AttachedFile) -> Result<Form> {
        let part = Part::stream_with_length(file.bytes.clone(), file.bytes.len() as u64)
            .file_name(file.name.clone())
            .mime_str(&file.content_type)?;

        Ok(Form::new().text("ask", question.to_string()).part("file", part))
    }
}

#[async_trait]
impl RagBackend for RagClient {
    async fn ask(&self, question: &str, file: &AttachedFile) -> Result<String> {
        let form = self.build_form(question, file)?;

        log::info!("Asking {} about {}", self.endpoint, file.name);

        let response = self.client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("RAG API error {}: {}", status, error_text));
        }

        // Only a body that is not JSON at all counts as a failure
        let body: serde_json::Value = response.json().await?;
        log::debug!("RAG API response: {}", body);

        Ok(RagReply::answer_from_value(body))
    }
}
