// Rendering of the result card shown after a successful analysis.

use crate::api::AnalysisResult;
use crossterm::style::{Color, Stylize};

const BAR_WIDTH: usize = 30;

/// Colour classification of the match percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    High,
    Mid,
    Low,
}

impl ScoreBand {
    pub fn classify(percent: f64) -> Self {
        if percent >= 50.0 {
            ScoreBand::High
        } else if percent >= 25.0 {
            ScoreBand::Mid
        } else {
            ScoreBand::Low
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScoreBand::High => "high",
            ScoreBand::Mid => "mid",
            ScoreBand::Low => "low",
        }
    }

    fn color(self) -> Color {
        match self {
            ScoreBand::High => Color::Green,
            ScoreBand::Mid => Color::Yellow,
            ScoreBand::Low => Color::Red,
        }
    }
}

pub fn format_percent(percent: f64) -> String {
    format!("{}%", percent)
}

pub fn score_bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// One `[tag]` per skill, in backend order.
pub fn skill_tags(skills: &[String]) -> Option<String> {
    if skills.is_empty() {
        return None;
    }
    let tags: Vec<String> = skills.iter().map(|s| format!("[{}]", s)).collect();
    Some(tags.join(" "))
}

/// Full card as printable text. `colored` switches terminal styling on.
pub fn render_result(result: &AnalysisResult, colored: bool) -> String {
    let band = ScoreBand::classify(result.similarity_percent);
    let paint = |text: String| -> String {
        if colored {
            text.with(band.color()).to_string()
        } else {
            text
        }
    };

    let mut out = String::new();
    out.push_str("Analysis result\n");
    out.push_str(&format!(
        "Job-resume match  {}\n",
        paint(format_percent(result.similarity_percent))
    ));
    out.push_str(&paint(score_bar(result.similarity_percent)));
    out.push('\n');

    out.push_str("\nExtracted skills\n");
    match skill_tags(&result.skills) {
        Some(tags) => out.push_str(&tags),
        None => out.push_str("No skills extracted."),
    }
    out.push('\n');

    if !result.resume_preview.is_empty() {
        out.push_str("\nResume preview\n");
        out.push_str(&result.resume_preview);
        out.push('\n');
    }
    out
}
