use reqwest::multipart::{Form, Part};
use reqwest::Client;

use crate::analysis::{AnalysisResult, ErrorBody, HealthStatus};
use crate::config::ClientConfig;
use crate::error::{AnalyzeError, TriageError};
use crate::input::Submission;

pub struct AnalysisClient {
    client: Client,
    analyze_url: String,
    health_url: String,
}

impl AnalysisClient {
    pub fn new(config: &ClientConfig) -> Result<Self, TriageError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;
        Ok(Self {
            client,
            analyze_url: config.analyze_url(),
            health_url: config.health_url(),
        })
    }

    pub fn analyze_url(&self) -> &str {
        &self.analyze_url
    }

    /// Send one submission to `POST /api/email/analyze`.
    pub async fn analyze(&self, submission: &Submission) -> Result<AnalysisResult, AnalyzeError> {
        let form = build_form(submission)?;

        let res = self
            .client
            .post(&self.analyze_url)
            .multipart(form)
            .send()
            .await?;

        let status = res.status();
        let body = res.bytes().await?;

        if !status.is_success() {
            let detail = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(ErrorBody::detail_text);
            return Err(AnalyzeError::Server {
                status: status.as_u16(),
                detail,
            });
        }

        serde_json::from_slice::<AnalysisResult>(&body)
            .map_err(|e| AnalyzeError::MalformedResponse(e.to_string()))
    }

    pub async fn health(&self) -> Result<HealthStatus, AnalyzeError> {
        let res = self.client.get(&self.health_url).send().await?;
        let status = res.status();
        let body = res.bytes().await?;
        if !status.is_success() {
            return Err(AnalyzeError::Server {
                status: status.as_u16(),
                detail: None,
            });
        }
        serde_json::from_slice(&body).map_err(|e| AnalyzeError::MalformedResponse(e.to_string()))
    }
}

fn build_form(submission: &Submission) -> Result<Form, AnalyzeError> {
    match submission {
        Submission::Text(content) => Ok(Form::new().text("content", content.clone())),
        Submission::File(file) => {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.name.clone())
                .mime_str(&file.content_type)?;
            Ok(Form::new().part("file", part))
        }
    }
}
