pub mod assess;
pub mod prompt;
pub mod template;

pub use assess::{run_assess_command, stream_assessment};
pub use prompt::run_prompt_command;
pub use template::{render_intake_template, run_template_command};

use anyhow::{Context, Result};
use std::path::Path;

use physio_core::IntakeRecord;

use crate::cli::ui::StatusPrinter;

/// Load an intake file, warning about values outside the choice catalogs.
pub(crate) fn load_intake(path: &Path) -> Result<IntakeRecord> {
    let intake = IntakeRecord::load(path)
        .with_context(|| format!("Failed to load intake file: {}", path.display()))?;

    let printer = StatusPrinter::new();
    for (field, value) in intake.unlisted_choices() {
        printer.warning("Unlisted", &format!("{} = {:?}", field, value));
    }
    let empty = intake.empty_fields();
    if !empty.is_empty() {
        printer.info(
            "Intake",
            &format!("{} of 17 fields are empty", empty.len()),
        );
        tracing::debug!("Empty intake fields: {:?}", empty);
    }

    Ok(intake)
}
