//! Output language for the generated prompt.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Language the prompt template is rendered in.
///
/// The model answers in the language of the prompt, so this also selects the
/// language of the assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Chinese,
    English,
}

impl Language {
    /// Parse a language code, falling back to Chinese for unknown input.
    #[must_use]
    pub fn from_string(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    /// Short code used in config files and on the command line.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Language::Chinese => "zh",
            Language::English => "en",
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Chinese => "简体中文",
            Language::English => "English",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zh" | "zh-cn" | "zh_cn" | "chinese" | "cn" => Ok(Language::Chinese),
            "en" | "en-us" | "en_us" | "english" => Ok(Language::English),
            _ => Err(format!(
                "Unknown language: '{}'. Supported languages: zh, en",
                s
            )),
        }
    }
}
