// UI layer: an interactive menu built with `dialoguer` that edits the form
// fields and submits them through the analysis client.

use crate::api::{AnalysisClient, Analyzer};
use crate::form::{FormController, InputMode, Outcome};
use crate::view::{render_result, skill_tags};
use anyhow::Result;
use crossterm::style::Stylize;
use crossterm::tty::IsTty;
use dialoguer::{Editor, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

enum Action {
    ToggleMode,
    ChooseFile,
    EditResume,
    EditJob,
    Analyze,
    Skills,
    Health,
    Exit,
}

/// Main interactive menu. Runs until the user chooses "Exit".
pub fn main_menu(api: AnalysisClient) -> Result<()> {
    let mut form = FormController::new();
    let colored = std::io::stdout().is_tty();

    println!("ResumeN - resume analyzer ({})", api.config().api_url);
    loop {
        let (labels, actions) = menu_items(&form);
        let selection = Select::new()
            .with_prompt(format!("Mode: {}", form.mode().label()))
            .items(&labels)
            .default(0)
            .interact()?;

        match actions[selection] {
            Action::ToggleMode => form.set_mode(form.mode().toggled()),
            Action::ChooseFile => {
                if let Some(path) = choose_pdf()? {
                    form.select_file(Some(path));
                }
            }
            Action::EditResume => {
                let text = edit_text("Resume text", form.resume_text())?;
                form.set_resume_text(text);
            }
            Action::EditJob => {
                let text = edit_text("Job description (blank for a generic one)", form.job_description())?;
                form.set_job_description(text);
            }
            Action::Analyze => {
                analyze(&mut form, &api)?;
                print_outcome(&form, colored);
            }
            Action::Skills => extract_skills(&form, &api)?,
            Action::Health => check_health(&api)?,
            Action::Exit => break,
        }
    }
    Ok(())
}

fn menu_items(form: &FormController) -> (Vec<String>, Vec<Action>) {
    let mut labels = Vec::new();
    let mut actions = Vec::new();

    labels.push(format!("Switch to \"{}\"", form.mode().toggled().label()));
    actions.push(Action::ToggleMode);

    match form.mode() {
        InputMode::Pdf => {
            let name = form
                .file()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "none".into());
            labels.push(format!("Choose resume PDF (selected: {})", name));
            actions.push(Action::ChooseFile);
        }
        InputMode::Text => {
            labels.push(format!("Edit resume text ({} chars)", form.resume_text().chars().count()));
            actions.push(Action::EditResume);
        }
    }

    labels.push(format!("Edit job description ({} chars)", form.job_description().chars().count()));
    actions.push(Action::EditJob);
    labels.push("Analyze resume".into());
    actions.push(Action::Analyze);
    labels.push("Extract skills only".into());
    actions.push(Action::Skills);
    labels.push("Check backend".into());
    actions.push(Action::Health);
    labels.push("Exit".into());
    actions.push(Action::Exit);

    (labels, actions)
}

/// Submit the form, showing a spinner while the request is in flight.
fn analyze(form: &mut FormController, api: &AnalysisClient) -> Result<()> {
    let submission = match form.begin_submit() {
        Ok(s) => s,
        Err(_) => return Ok(()),
    };
    let spinner = spinner("Analyzing...")?;
    let outcome = api.analyze(&submission.request);
    spinner.finish_and_clear();
    form.complete(submission.ticket, outcome);
    Ok(())
}

fn print_outcome(form: &FormController, colored: bool) {
    match form.outcome() {
        Some(Outcome::Result(result)) => println!("\n{}", render_result(result, colored)),
        Some(Outcome::Error(msg)) if colored => println!("{}", msg.as_str().red()),
        Some(Outcome::Error(msg)) => println!("{}", msg),
        None => {}
    }
}

fn extract_skills(form: &FormController, api: &AnalysisClient) -> Result<()> {
    if form.resume_text().trim().is_empty() {
        println!("Please paste your resume text.");
        return Ok(());
    }
    let spinner = spinner("Extracting skills...")?;
    let res = api.extract_skills(form.resume_text());
    spinner.finish_and_clear();
    match res {
        Ok(skills) => match skill_tags(&skills) {
            Some(tags) => println!("{}", tags),
            None => println!("No skills extracted."),
        },
        Err(e) => println!("Skill extraction failed: {}", e.user_message()),
    }
    Ok(())
}

fn check_health(api: &AnalysisClient) -> Result<()> {
    let spinner = spinner("Contacting backend...")?;
    let res = api.health();
    spinner.finish_and_clear();
    match res {
        Ok(h) => println!(
            "Backend {}: {}",
            h.service.as_deref().unwrap_or("service"),
            h.status
        ),
        Err(e) => println!("Backend unreachable: {}", e.user_message()),
    }
    Ok(())
}

/// Native file picker first; a typed path when the picker is unavailable or
/// dismissed.
fn choose_pdf() -> Result<Option<PathBuf>> {
    let start_dir = dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    let picked = rfd::FileDialog::new()
        .add_filter("PDF", &["pdf"])
        .set_directory(&start_dir)
        .pick_file();
    if picked.is_some() {
        return Ok(picked);
    }

    let path: String = Input::new()
        .with_prompt("Resume PDF path (blank to cancel)")
        .allow_empty(true)
        .interact_text()?;
    let path = path.trim();
    if path.is_empty() {
        Ok(None)
    } else {
        Ok(Some(PathBuf::from(path)))
    }
}

/// Multi-line edit through `$EDITOR`, single-line prompt if no editor runs.
fn edit_text(prompt: &str, current: &str) -> Result<String> {
    match Editor::new().extension(".txt").edit(current) {
        Ok(Some(text)) => return Ok(text),
        Ok(None) => return Ok(current.to_string()),
        Err(e) => tracing::debug!(error = %e, "editor unavailable, using inline prompt"),
    }
    let text: String = Input::new()
        .with_prompt(prompt)
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()?;
    Ok(text)
}

fn spinner(message: &'static str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    Ok(spinner)
}
