// API client module: a small blocking HTTP client for the ResumeN analysis
// backend. Each call is single-shot (no retries) but bounded by the timeout
// from `Config`, and every outcome is normalised to `RequestError`.

use crate::config::Config;
use crate::error::{ConfigError, RequestError};
use reqwest::blocking::{multipart, Client, RequestBuilder};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const ANALYZE_TEXT_ENDPOINT: &str = "/analyze/text";
const ANALYZE_PDF_ENDPOINT: &str = "/analyze/pdf";
const SKILLS_ENDPOINT: &str = "/skills";

const TEXT_FALLBACK: &str = "Request failed";
const UPLOAD_FALLBACK: &str = "Upload failed";

/// Sent in place of a blank job description.
pub const GENERIC_JOB_DESCRIPTION: &str =
    "Software development, programming, technical skills, teamwork, problem solving.";

/// Returns the trimmed job description, or the generic one when blank.
pub fn effective_job_description(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        GENERIC_JOB_DESCRIPTION.to_string()
    } else {
        trimmed.to_string()
    }
}

/// One submission. Exactly one resume source per request.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisRequest {
    Text { resume_text: String, job_description: String },
    Pdf { file: PathBuf, job_description: String },
}

impl AnalysisRequest {
    /// Job description carried by either variant.
    pub fn job_description(&self) -> &str {
        match self {
            AnalysisRequest::Text { job_description, .. } => job_description,
            AnalysisRequest::Pdf { job_description, .. } => job_description,
        }
    }
}

#[derive(Serialize, Debug)]
struct AnalyzeTextBody<'a> {
    resume_text: &'a str,
    job_description: &'a str,
}

#[derive(Serialize, Debug)]
struct SkillsBody<'a> {
    resume_text: &'a str,
}

/// Successful analysis as returned by the backend. Field names mirror the
/// JSON body; `skills` keeps the backend's order and any duplicates.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub similarity_score: f64,
    pub similarity_percent: f64,
    pub skills: Vec<String>,
    pub resume_preview: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_text: Option<String>,
}

impl AnalysisResult {
    /// Range checks on top of what deserialization already enforces.
    pub fn validate(&self) -> Result<(), String> {
        if !self.similarity_score.is_finite() || !(0.0..=1.0).contains(&self.similarity_score) {
            return Err(format!("similarity_score {} outside [0, 1]", self.similarity_score));
        }
        if !self.similarity_percent.is_finite()
            || !(0.0..=100.0).contains(&self.similarity_percent)
        {
            return Err(format!(
                "similarity_percent {} outside [0, 100]",
                self.similarity_percent
            ));
        }
        Ok(())
    }
}

#[derive(Deserialize, Debug)]
struct SkillsResponse {
    skills: Vec<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

/// Seam between the form controller and the network, so the controller can
/// be driven by something other than a live backend.
pub trait Analyzer {
    fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, RequestError>;
}

#[derive(Clone)]
pub struct AnalysisClient {
    client: Client,
    config: Config,
}

impl AnalysisClient {
    /// Build the blocking client with the configured per-request timeout.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(AnalysisClient { client, config })
    }

    /// Configuration the client was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// POST the pasted resume as JSON to `/analyze/text`.
    pub fn analyze_text(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<AnalysisResult, RequestError> {
        let url = self.config.api_endpoint(ANALYZE_TEXT_ENDPOINT);
        debug!(url = %url, chars = resume_text.chars().count(), "sending text analysis request");
        let req = self.client.post(&url).json(&AnalyzeTextBody { resume_text, job_description });
        let result: AnalysisResult = self.send(req, TEXT_FALLBACK)?;
        result.validate().map_err(RequestError::InvalidResponse)?;
        Ok(result)
    }

    /// Upload a PDF as multipart/form-data (`file` + `job_description`) to
    /// `/analyze/pdf`.
    pub fn analyze_pdf(
        &self,
        file: &Path,
        job_description: &str,
    ) -> Result<AnalysisResult, RequestError> {
        let url = self.config.api_endpoint(ANALYZE_PDF_ENDPOINT);
        let bytes = std::fs::read(file).map_err(|source| RequestError::File {
            path: file.to_path_buf(),
            source,
        })?;
        let file_name = file
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("resume.pdf")
            .to_string();
        debug!(url = %url, file = %file_name, bytes = bytes.len(), "sending pdf analysis request");

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/pdf")
            .map_err(|e| RequestError::Transport(e.to_string()))?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("job_description", job_description.to_string());

        let req = self.client.post(&url).multipart(form);
        let result: AnalysisResult = self.send(req, UPLOAD_FALLBACK)?;
        result.validate().map_err(RequestError::InvalidResponse)?;
        Ok(result)
    }

    /// Skill extraction only, without scoring.
    pub fn extract_skills(&self, resume_text: &str) -> Result<Vec<String>, RequestError> {
        let url = self.config.api_endpoint(SKILLS_ENDPOINT);
        debug!(url = %url, "sending skills request");
        let req = self.client.post(&url).json(&SkillsBody { resume_text });
        let resp: SkillsResponse = self.send(req, TEXT_FALLBACK)?;
        Ok(resp.skills)
    }

    /// GET `/health` on the backend origin.
    pub fn health(&self) -> Result<HealthStatus, RequestError> {
        let url = self.config.health_url();
        debug!(url = %url, "checking backend health");
        self.send(self.client.get(&url), TEXT_FALLBACK)
    }

    fn send<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        fallback: &str,
    ) -> Result<T, RequestError> {
        let res = req.send().map_err(|e| self.transport_error(e))?;
        let status = res.status();
        let body = res.bytes().map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let message = error_message(status, &body, fallback);
            warn!(status = status.as_u16(), message = %message, "backend returned an error");
            return Err(RequestError::Status { status: status.as_u16(), message });
        }

        serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, "malformed success body");
            RequestError::InvalidResponse(e.to_string())
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> RequestError {
        if err.is_timeout() {
            warn!(timeout_secs = self.config.timeout.as_secs(), "request timed out");
            RequestError::Timeout(self.config.timeout.as_secs())
        } else {
            warn!(error = %err, "request failed");
            RequestError::Transport(err.to_string())
        }
    }
}

impl Analyzer for AnalysisClient {
    fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, RequestError> {
        match request {
            AnalysisRequest::Text { resume_text, job_description } => {
                self.analyze_text(resume_text, job_description)
            }
            AnalysisRequest::Pdf { file, job_description } => {
                self.analyze_pdf(file, job_description)
            }
        }
    }
}

/// User-facing message for a non-2xx response: the body's `detail` (or the
/// first `msg` of a validation-error list), else the status reason phrase,
/// else `fallback`.
pub fn error_message(status: StatusCode, body: &[u8], fallback: &str) -> String {
    detail_message(body)
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| fallback.to_string())
}

fn detail_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let msg = match value.get("detail")? {
        Value::String(s) => s.as_str(),
        Value::Array(items) => items.first()?.get("msg")?.as_str()?,
        _ => return None,
    };
    if msg.is_empty() {
        None
    } else {
        Some(msg.to_string())
    }
}
