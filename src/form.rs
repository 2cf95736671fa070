// Form controller: owns the analysis form state and drives one submission
// at a time through an `Analyzer`.

use crate::api::{effective_job_description, AnalysisRequest, AnalysisResult, Analyzer};
use crate::error::{RequestError, ValidationError};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Pdf,
    Text,
}

impl InputMode {
    /// The other input mode.
    pub fn toggled(self) -> Self {
        match self {
            InputMode::Pdf => InputMode::Text,
            InputMode::Text => InputMode::Pdf,
        }
    }

    /// Menu label for this mode.
    pub fn label(self) -> &'static str {
        match self {
            InputMode::Pdf => "Upload PDF",
            InputMode::Text => "Paste text",
        }
    }
}

/// Where the form is in its lifecycle. `Succeeded` and `Failed` accept a new
/// submission just like `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Error and result are mutually exclusive, so they share one slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Error(String),
    Result(AnalysisResult),
}

/// Handed out by `begin_submit`. Only the completion carrying the latest
/// ticket is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub ticket: u64,
    pub request: AnalysisRequest,
}

#[derive(Debug, Default)]
pub struct FormController {
    mode: InputMode,
    file: Option<PathBuf>,
    resume_text: String,
    job_description: String,
    loading: bool,
    outcome: Option<Outcome>,
    latest_ticket: u64,
}

impl FormController {
    /// Empty form in PDF mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected resume source.
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Switch the resume source. Does not touch an in-flight submission.
    pub fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
    }

    /// Selected PDF, if any.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Picking a new file (or clearing it) drops the previous error and result.
    pub fn select_file(&mut self, file: Option<PathBuf>) {
        self.file = file;
        self.outcome = None;
    }

    /// Pasted resume text buffer.
    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    /// Replace the resume text buffer.
    pub fn set_resume_text(&mut self, text: impl Into<String>) {
        self.resume_text = text.into();
    }

    /// Raw job description buffer, before the blank fallback is applied.
    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    /// Replace the job description buffer.
    pub fn set_job_description(&mut self, text: impl Into<String>) {
        self.job_description = text.into();
    }

    /// True while the latest submission is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Last error or result, whichever is set.
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Message of the last failure, if the outcome is an error.
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Some(Outcome::Error(msg)) => Some(msg.as_str()),
            _ => None,
        }
    }

    /// Last successful analysis, if the outcome is a result.
    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.outcome {
            Some(Outcome::Result(r)) => Some(r),
            _ => None,
        }
    }

    /// Lifecycle state derived from the loading flag and the outcome.
    pub fn phase(&self) -> Phase {
        match (&self.outcome, self.loading) {
            (_, true) => Phase::Submitting,
            (Some(Outcome::Result(_)), false) => Phase::Succeeded,
            (Some(Outcome::Error(_)), false) => Phase::Failed,
            (None, false) => Phase::Idle,
        }
    }

    /// Start an attempt. Clears the previous error and result, then either
    /// records a validation error (no request) or enters `Submitting`.
    pub fn begin_submit(&mut self) -> Result<Submission, ValidationError> {
        // A rejected attempt still supersedes whatever is in flight.
        self.latest_ticket += 1;
        self.outcome = None;
        let job_description = effective_job_description(&self.job_description);

        let request = match self.mode {
            InputMode::Pdf => match &self.file {
                Some(file) => AnalysisRequest::Pdf { file: file.clone(), job_description },
                None => return Err(self.reject(ValidationError::MissingFile)),
            },
            InputMode::Text => {
                if self.resume_text.trim().is_empty() {
                    return Err(self.reject(ValidationError::BlankResumeText));
                }
                AnalysisRequest::Text {
                    resume_text: self.resume_text.clone(),
                    job_description,
                }
            }
        };

        self.loading = true;
        Ok(Submission { ticket: self.latest_ticket, request })
    }

    /// Apply the outcome of a submission. Returns `false` when the ticket has
    /// been superseded and the outcome was dropped.
    pub fn complete(
        &mut self,
        ticket: u64,
        outcome: Result<AnalysisResult, RequestError>,
    ) -> bool {
        if ticket != self.latest_ticket {
            debug!(ticket, latest = self.latest_ticket, "discarding stale analysis outcome");
            return false;
        }
        self.outcome = Some(match outcome {
            Ok(result) => Outcome::Result(result),
            Err(err) => Outcome::Error(err.user_message()),
        });
        self.loading = false;
        true
    }

    /// Validate, call the analyzer and apply its outcome in one go.
    pub fn submit(&mut self, analyzer: &dyn Analyzer) -> Phase {
        if let Ok(submission) = self.begin_submit() {
            let outcome = analyzer.analyze(&submission.request);
            self.complete(submission.ticket, outcome);
        }
        self.phase()
    }

    fn reject(&mut self, err: ValidationError) -> ValidationError {
        self.outcome = Some(Outcome::Error(err.to_string()));
        self.loading = false;
        err
    }
}
