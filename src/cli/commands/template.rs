use anyhow::Result;

use physio_core::{FieldKind, IntakeField, Language, choices_for};
use physio_prompt::field_label;

use crate::config::PhysioConfig;

pub fn run_template_command(config: &PhysioConfig) -> Result<()> {
    print!("{}", render_intake_template(config.language()?));
    Ok(())
}

/// TOML intake skeleton with every field, its label and allowed choices.
///
/// Numeric fields are commented out so the skeleton parses as an empty intake.
pub fn render_intake_template(language: Language) -> String {
    let mut out = format!("# physio-assess intake ({})\n", language.display_name());

    for field in IntakeField::ALL {
        out.push('\n');
        out.push_str(&format!("# {}\n", field_label(field, language)));

        if let Some(choices) = choices_for(field) {
            let labels: Vec<&str> = choices.iter().map(|c| c.label(language)).collect();
            out.push_str(&format!("# choices: {}\n", labels.join(" | ")));
        }

        let line = match field.kind() {
            FieldKind::Integer => format!("# {} = 30", field.key()),
            FieldKind::Scale => format!("# {} = 5", field.key()),
            FieldKind::Text | FieldKind::SingleChoice => format!("{} = \"\"", field.key()),
            FieldKind::MultiChoice => format!("{} = []", field.key()),
        };
        out.push_str(&line);
        out.push('\n');
    }

    out
}
