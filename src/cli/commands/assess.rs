use anyhow::{Context, Result};
use futures::StreamExt;
use std::path::Path;
use std::sync::Arc;

use physio_core::IntakeRecord;
use physio_groq::GroqClient;
use physio_prompt::PromptBuilder;

use crate::cli::streaming_ui::{StreamCallback, StreamEvent, StreamingDisplay};
use crate::cli::ui::StatusPrinter;
use crate::config::PhysioConfig;
use crate::streamer::{AssessmentStreamer, generate_assessment};

use super::load_intake;

pub async fn run_assess_command(
    config: &PhysioConfig,
    intake_path: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let printer = StatusPrinter::new();

    // Credentials are checked before the intake file is touched
    let client = GroqClient::new(config.groq_config())
        .context("Failed to configure the completion service")?;

    let intake = load_intake(intake_path)?;
    let builder = config.prompt_builder()?;

    let streamer = AssessmentStreamer::new(
        Arc::new(client),
        config.audit_writer(),
        config.generation_params(),
    )
    .with_audit_required(config.audit.required);

    printer.status("Assessing", &intake_path.display().to_string());
    printer.dim(&format!(
        "model {} · language {} · audit {}",
        config.generation.model,
        builder.language().code(),
        config.audit.log_dir.display()
    ));

    let display = StreamingDisplay::new().with_spinner("Waiting for the model...");
    let text = stream_assessment(&streamer, &builder, &intake, &display).await?;

    if let Some(path) = output {
        std::fs::write(path, &text)
            .with_context(|| format!("Failed to write assessment to {}", path.display()))?;
        printer.success("Saved", &path.display().to_string());
    }

    Ok(())
}

/// Drive one assessment, reporting each snapshot to `callback`.
///
/// Returns the final text. An error is reported to `callback` after every
/// snapshot that preceded it.
pub async fn stream_assessment(
    streamer: &AssessmentStreamer,
    builder: &PromptBuilder,
    intake: &IntakeRecord,
    callback: &dyn StreamCallback,
) -> Result<String> {
    let mut stream = match generate_assessment(streamer, builder, intake).await {
        Ok(stream) => stream,
        Err(e) => {
            report_failure(callback, &e.to_string());
            return Err(e).context("Assessment could not be started");
        }
    };

    let mut text = String::new();
    while let Some(item) = stream.next().await {
        match item {
            Ok(snapshot) => {
                callback
                    .on_event(StreamEvent::Snapshot(snapshot.clone()))
                    .context("Failed to write assessment to stdout")?;
                text = snapshot;
            }
            Err(e) => {
                report_failure(callback, &e.to_string());
                return Err(e).context("Assessment stream failed");
            }
        }
    }

    callback
        .on_event(StreamEvent::Complete {
            chars: text.chars().count(),
        })
        .context("Failed to write assessment to stdout")?;
    Ok(text)
}

/// The stream error is what the caller sees; a failed report of it is logged.
fn report_failure(callback: &dyn StreamCallback, message: &str) {
    if let Err(e) = callback.on_event(StreamEvent::Error(message.to_string())) {
        tracing::warn!("Failed to report assessment error: {}", e);
    }
}
