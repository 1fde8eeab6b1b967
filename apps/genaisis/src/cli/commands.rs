//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::answers::{AnswerSheet, CheckReport};
use crate::api;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::sinks::build_sink;
use genaisis_core::{EventCatalog, EventInfo, RegistrationSummary, RegistrationWizard, TeamSize};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// How command results are printed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    pub json: bool,
    pub verbose: bool,
}

fn to_json(value: &impl Serialize) -> Result<String, AppError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Io(format!("Cannot encode output: {}", e)))
}

fn print_json(value: &impl Serialize) -> Result<(), AppError> {
    println!("{}", to_json(value)?);
    Ok(())
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    mut config: AppConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), AppError> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    println!("GENAISIS Registration Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:       {}", config.server.host);
    println!("  Port:       {}", config.server.port);
    println!("  Sink:       {:?}", config.submission.kind);
    println!("  Capacity:   {} wizards", config.server.max_active_wizards);
    println!();
    println!("Endpoints:");
    println!("  GET    /events                     - Event catalog");
    println!("  POST   /registrations              - Start a registration");
    println!("  GET    /registrations/{{id}}         - Registration state");
    println!("  PATCH  /registrations/{{id}}/fields  - Edit fields");
    println!("  POST   /registrations/{{id}}/submit  - Submit");
    println!("  GET    /health                     - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(&config).await
}

// =============================================================================
// EVENTS COMMAND
// =============================================================================

fn team_label(size: TeamSize) -> String {
    match size {
        TeamSize::Individual => "Individual".to_string(),
        TeamSize::Exactly(n) => format!("Team of {}", n),
        TeamSize::Range { min, max } => format!("Teams of {}-{}", min, max),
    }
}

/// List the event catalog.
pub fn cmd_events(config: &AppConfig, output: Output) -> Result<(), AppError> {
    let catalog = config.catalog()?;

    if output.json {
        #[derive(Serialize)]
        struct EventsOutput<'a> {
            events: Vec<&'a EventInfo>,
        }
        print_json(&EventsOutput {
            events: catalog.iter().collect(),
        })?;
        return Ok(());
    }

    println!("GENAISIS Events");
    println!("===============");
    for event in catalog.iter() {
        println!();
        println!("{} {}  [{}]", event.icon, event.name, event.id);
        println!("  {}", team_label(event.team_size));
        if output.verbose {
            if !event.summary.is_empty() {
                println!("  {}", event.summary);
            }
            if !event.duration.is_empty() {
                println!("  Duration: {}", event.duration);
            }
            if !event.prize.is_empty() {
                println!("  Prize:    {}", event.prize);
            }
        }
    }
    Ok(())
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

fn print_report(report: &CheckReport) {
    for step in &report.steps {
        if step.missing.is_empty() {
            println!("  Step {} ({}): complete", step.step.number(), step.title);
        } else {
            let labels: Vec<&str> = step.missing.iter().map(|f| f.label()).collect();
            println!(
                "  Step {} ({}): missing {}",
                step.step.number(),
                step.title,
                labels.join(", ")
            );
        }
    }
    for id in &report.unknown_events {
        println!("  Unknown event: {}", id);
    }
}

/// Check an answer sheet without submitting it.
///
/// Fails when the sheet could not be submitted, so scripts can test the exit
/// status.
pub fn cmd_check(config: &AppConfig, answers: &Path, output: Output) -> Result<(), AppError> {
    let sheet = AnswerSheet::load(answers)?;
    let catalog = Arc::new(config.catalog()?);
    let report = sheet.check(catalog, config.wizard);

    if output.json {
        #[derive(Serialize)]
        struct CheckOutput<'a> {
            answers: String,
            complete: bool,
            report: &'a CheckReport,
        }
        print_json(&CheckOutput {
            answers: answers.to_string_lossy().into_owned(),
            complete: report.is_complete(),
            report: &report,
        })?;
    } else {
        println!("Answer sheet: {}", answers.display());
        print_report(&report);
    }

    if report.is_complete() {
        Ok(())
    } else {
        Err(AppError::Answers(format!(
            "'{}' is not ready to submit",
            answers.display()
        )))
    }
}

// =============================================================================
// REGISTER COMMAND
// =============================================================================

/// Replay an answer sheet through a wizard and submit it.
pub async fn cmd_register(
    config: &AppConfig,
    answers: &Path,
    output: Output,
) -> Result<(), AppError> {
    let sheet = AnswerSheet::load(answers)?;
    let catalog: Arc<EventCatalog> = Arc::new(config.catalog()?);
    let sink = build_sink(&config.submission)?;

    let mut wizard = RegistrationWizard::with_config(catalog, config.wizard);
    sheet.replay(&mut wizard)?;

    if output.verbose && !output.json {
        println!("Submitting to {}", sink.inner().describe());
        print_json(wizard.form())?;
    }
    tracing::info!(answers = %answers.display(), "Submitting registration");

    let ack = wizard.submit(&sink).await?;
    let summary = wizard.summary();

    if output.json {
        #[derive(Serialize)]
        struct RegisterOutput<'a> {
            reference: &'a str,
            summary: Option<&'a RegistrationSummary>,
        }
        print_json(&RegisterOutput {
            reference: &ack.reference,
            summary: summary.as_ref(),
        })?;
        return Ok(());
    }

    println!("Registration Successful!");
    println!("========================");
    println!("Reference: {}", ack.reference);
    if let Some(summary) = summary {
        println!("Name:      {}", summary.full_name);
        println!("Email:     {}", summary.email);
        println!("College:   {}", summary.college);
        println!("Events:    {}", summary.event_count);
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SinkKind;
    use std::io::Write;

    fn write_sheet(dir: &Path, name: &str, text: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).expect("create");
        file.write_all(text.as_bytes()).expect("write");
        path
    }

    const ADA: &str = r#"
        first_name = "Ada"
        last_name = "Lovelace"
        email = "ada@x.com"
        phone = "+911234567890"
        college = "SJCE"
        year = "2"
        department = "CSE"
        events = ["binary-brawl"]
    "#;

    #[test]
    fn team_labels() {
        assert_eq!(team_label(TeamSize::Individual), "Individual");
        assert_eq!(team_label(TeamSize::Exactly(2)), "Team of 2");
        assert_eq!(team_label(TeamSize::Range { min: 2, max: 3 }), "Teams of 2-3");
    }

    struct Unencodable;

    impl serde::Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("not representable"))
        }
    }

    #[test]
    fn json_output_reports_encoding_failures() {
        let err = to_json(&Unencodable).expect_err("encoding fails");
        assert!(matches!(err, AppError::Io(msg) if msg.contains("not representable")));
        assert!(print_json(&Unencodable).is_err());
        assert_eq!(to_json(&["a"]).expect("encodes"), "[\n  \"a\"\n]");
    }

    #[test]
    fn check_fails_on_incomplete_sheet() {
        let dir = tempfile::tempdir().expect("tempdir");
        let complete = write_sheet(dir.path(), "ada.toml", ADA);
        let partial = write_sheet(dir.path(), "partial.toml", "first_name = \"Ada\"\n");

        let config = AppConfig::default();
        assert!(cmd_check(&config, &complete, Output::default()).is_ok());
        assert!(matches!(
            cmd_check(&config, &partial, Output::default()),
            Err(AppError::Answers(_))
        ));
    }

    #[tokio::test]
    async fn register_writes_to_file_sink() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sheet = write_sheet(dir.path(), "ada.toml", ADA);

        let mut config = AppConfig::default();
        config.submission.kind = SinkKind::File;
        config.submission.path = dir.path().join("out.jsonl");

        cmd_register(&config, &sheet, Output::default())
            .await
            .expect("registered");

        let written = std::fs::read_to_string(dir.path().join("out.jsonl")).expect("read");
        assert_eq!(written.lines().count(), 1);
        assert!(written.contains("GEN-00001"));
        assert!(written.contains("Lovelace"));
    }
}
