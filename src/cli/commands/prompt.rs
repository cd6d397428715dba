use anyhow::Result;
use std::path::Path;

use crate::config::PhysioConfig;

use super::load_intake;

/// Print the built prompt. Nothing is recorded or submitted.
pub fn run_prompt_command(config: &PhysioConfig, intake_path: &Path) -> Result<()> {
    let intake = load_intake(intake_path)?;
    let builder = config.prompt_builder()?;
    print!("{}", builder.build_assessment_prompt(&intake));
    Ok(())
}
