//! Core types for prompt construction.

use std::fmt::Write;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How intake values are treated before interpolation into the template.
///
/// Free-text fields reach the model unescaped under `Identity`, so a patient
/// can write instructions that change the model's behavior. `EscapeControl`
/// keeps every value on a single template line and neutralizes code fences;
/// it does not stop plain-language injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SanitizePolicy {
    /// Embed values verbatim.
    #[default]
    Identity,
    /// Escape control characters (including newlines) and code fences.
    EscapeControl,
}

impl SanitizePolicy {
    pub fn apply(&self, text: &str) -> String {
        match self {
            SanitizePolicy::Identity => text.to_string(),
            SanitizePolicy::EscapeControl => escape_control_chars(text),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SanitizePolicy::Identity => "identity",
            SanitizePolicy::EscapeControl => "escape-control",
        }
    }
}

impl std::fmt::Display for SanitizePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SanitizePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "identity" | "none" => Ok(SanitizePolicy::Identity),
            "escape-control" | "escape_control" | "escape" => Ok(SanitizePolicy::EscapeControl),
            _ => Err(format!(
                "Unknown sanitize policy: '{}'. Supported policies: identity, escape-control",
                s
            )),
        }
    }
}

/// Escape control characters and code fences in user-supplied text.
pub fn escape_control_chars(text: &str) -> String {
    let text = text.replace("```", "\\`\\`\\`");
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(escaped, "\\u{{{:04x}}}", c as u32);
            }
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_verbatim() {
        let text = "line one\nline two {braces} ```";
        assert_eq!(SanitizePolicy::Identity.apply(text), text);
    }

    #[test]
    fn test_escape_control_chars() {
        assert_eq!(escape_control_chars("a\nb\tc\r"), "a\\nb\\tc\\r");
        assert_eq!(escape_control_chars("bell\u{7}"), "bell\\u{0007}");
        assert_eq!(escape_control_chars("```rm -rf```"), "\\`\\`\\`rm -rf\\`\\`\\`");
        assert_eq!(escape_control_chars("下背部 {x}"), "下背部 {x}");
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "escape-control".parse::<SanitizePolicy>().unwrap(),
            SanitizePolicy::EscapeControl
        );
        assert_eq!(
            "Identity".parse::<SanitizePolicy>().unwrap(),
            SanitizePolicy::Identity
        );
        assert!("strip".parse::<SanitizePolicy>().is_err());
    }

    #[test]
    fn test_policy_display_round_trips() {
        for policy in [SanitizePolicy::Identity, SanitizePolicy::EscapeControl] {
            assert_eq!(policy.to_string().parse::<SanitizePolicy>().unwrap(), policy);
        }
    }
}
