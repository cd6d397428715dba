//! Builder-pattern API over [`AssessmentPrompt`].

use physio_core::{IntakeRecord, Language};

use crate::assessment::AssessmentPrompt;
use crate::traits::Prompt;
use crate::types::SanitizePolicy;

/// Builder for assessment prompts.
///
/// Holds the rendering options so one builder can be reused across
/// submissions; each call renders a fresh prompt.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    language: Language,
    sanitize: SanitizePolicy,
    placeholder: Option<String>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the template language from a language code.
    pub fn with_language(mut self, lang: &str) -> Self {
        self.language = Language::from_string(lang);
        self
    }

    pub fn with_sanitize(mut self, policy: SanitizePolicy) -> Self {
        self.sanitize = policy;
        self
    }

    /// Override the text embedded for empty values.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn sanitize(&self) -> SanitizePolicy {
        self.sanitize
    }

    /// Build the assessment prompt for one intake record.
    pub fn build_assessment_prompt(&self, intake: &IntakeRecord) -> String {
        let prompt = AssessmentPrompt {
            intake: intake.clone(),
            language: self.language,
            sanitize: self.sanitize,
            placeholder: self.placeholder.clone(),
        };
        prompt.render()
    }
}
