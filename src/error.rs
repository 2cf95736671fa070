// Error types shared by the client, the form controller and the config loader.
// The UI layer wraps these in `anyhow` the same way the binary does.

use std::path::PathBuf;

/// Shown when a failure reaches the form without a message of its own.
pub const FALLBACK_FAILURE: &str = "Analysis failed. Is the backend running?";

/// Local form validation. No request is sent when one of these fires.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select a PDF resume.")]
    MissingFile,

    #[error("Please paste your resume text.")]
    BlankResumeText,
}

/// Anything that can go wrong between sending a request and holding a
/// validated `AnalysisResult`.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// Non-2xx response. `message` is already the user-facing text.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Request timed out after {0} seconds. Is the backend running?")]
    Timeout(u64),

    #[error("{0}")]
    Transport(String),

    #[error("Unexpected response from backend: {0}")]
    InvalidResponse(String),

    #[error("Failed to read {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RequestError {
    /// Text stored in the form state for this failure.
    pub fn user_message(&self) -> String {
        let msg = self.to_string();
        if msg.trim().is_empty() {
            FALLBACK_FAILURE.to_string()
        } else {
            msg
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {message}")]
    Invalid { var: &'static str, message: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
