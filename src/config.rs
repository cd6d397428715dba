use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use physio_audit::{AuditLogWriter, DEFAULT_LOG_DIR};
use physio_core::Language;
use physio_groq::{DEFAULT_API_BASE_URL, DEFAULT_API_KEY_ENV, GenerationParams, GroqConfig};
use physio_prompt::{PromptBuilder, SanitizePolicy};

use crate::cli::args::Args;

const ENV_PREFIX: &str = "PHYSIO_";

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct PhysioConfig {
    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub prompt: PromptConfig,

    #[serde(default)]
    pub audit: AuditConfig,
}

/// Sampling parameters sent with every request.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_top_p")]
    pub top_p: f64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Environment variable the API key is read from
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    pub connect_timeout_secs: Option<u64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PromptConfig {
    #[serde(default = "default_language")]
    pub language: String,

    /// "identity" or "escape-control"
    #[serde(default = "default_sanitize")]
    pub sanitize: String,

    /// Replaces the per-language text for empty fields
    pub placeholder: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AuditConfig {
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Fail the submission when the audit record cannot be written
    #[serde(default = "default_audit_required")]
    pub required: bool,
}

fn default_model() -> String {
    "llama-3.1-70b-versatile".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_top_p() -> f64 {
    0.95
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_language() -> String {
    "zh".to_string()
}

fn default_sanitize() -> String {
    SanitizePolicy::Identity.as_str().to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_DIR)
}

fn default_audit_required() -> bool {
    true
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            connect_timeout_secs: None,
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            sanitize: default_sanitize(),
            placeholder: None,
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            required: default_audit_required(),
        }
    }
}

impl PhysioConfig {
    /// Merge another config into this one (other takes precedence for set values)
    pub fn merge(&mut self, other: &PhysioConfig) {
        if other.generation.model != default_model() {
            self.generation.model = other.generation.model.clone();
        }
        if other.generation.temperature != default_temperature() {
            self.generation.temperature = other.generation.temperature;
        }
        if other.generation.max_tokens != default_max_tokens() {
            self.generation.max_tokens = other.generation.max_tokens;
        }
        if other.generation.top_p != default_top_p() {
            self.generation.top_p = other.generation.top_p;
        }

        if other.api.base_url != default_base_url() {
            self.api.base_url = other.api.base_url.clone();
        }
        if other.api.api_key_env != default_api_key_env() {
            self.api.api_key_env = other.api.api_key_env.clone();
        }
        if other.api.connect_timeout_secs.is_some() {
            self.api.connect_timeout_secs = other.api.connect_timeout_secs;
        }

        if other.prompt.language != default_language() {
            self.prompt.language = other.prompt.language.clone();
        }
        if other.prompt.sanitize != default_sanitize() {
            self.prompt.sanitize = other.prompt.sanitize.clone();
        }
        if other.prompt.placeholder.is_some() {
            self.prompt.placeholder = other.prompt.placeholder.clone();
        }

        if other.audit.log_dir != default_log_dir() {
            self.audit.log_dir = other.audit.log_dir.clone();
        }
        if !other.audit.required {
            self.audit.required = false;
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Invalid range in {field}: {value} (valid range: {valid_range})")]
    InvalidRange {
        field: String,
        value: f64,
        valid_range: String,
    },

    #[error("Invalid value in {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("TOML parsing error in {path}: {source}")]
    TomlError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to read config file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PhysioConfig {
    pub fn generate_default_config() -> String {
        let default_config = Self::default();
        toml::to_string_pretty(&default_config).unwrap_or_else(|_| {
            r#"# physio-assess configuration file
# [generation]
# model = "llama-3.1-70b-versatile"
"#
            .to_string()
        })
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::TomlError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Get the user config file path (~/.config/physio-assess/config.toml)
    pub fn get_user_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config/physio-assess/config.toml"))
    }

    /// Get the current directory config file path (./physio-assess.toml)
    pub fn get_current_config_path() -> PathBuf {
        PathBuf::from("./physio-assess.toml")
    }

    /// Load and merge configs from all sources with priority:
    /// 1. User config (~/.config/physio-assess/config.toml) - base
    /// 2. Current directory (./physio-assess.toml)
    pub fn load_with_merged_configs() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(user_path) = Self::get_user_config_path() {
            if user_path.exists() {
                config.merge(&Self::load_from_file(&user_path)?);
                tracing::debug!("Loaded user config from: {}", user_path.display());
            }
        }

        let current_path = Self::get_current_config_path();
        if current_path.exists() {
            config.merge(&Self::load_from_file(&current_path)?);
            tracing::debug!(
                "Loaded current directory config from: {}",
                current_path.display()
            );
        }

        Ok(config)
    }

    pub fn apply_env_vars(&mut self, env_vars: &HashMap<String, String>) -> Result<()> {
        for (key, value) in env_vars {
            if let Some(config_key) = key.strip_prefix(ENV_PREFIX) {
                match config_key {
                    "GENERATION_MODEL" => self.generation.model = value.clone(),
                    "GENERATION_TEMPERATURE" => {
                        self.generation.temperature = value
                            .parse()
                            .map_err(|_| anyhow!("Invalid temperature value: {}", value))?;
                    }
                    "GENERATION_MAX_TOKENS" => {
                        self.generation.max_tokens = value
                            .parse()
                            .map_err(|_| anyhow!("Invalid max_tokens value: {}", value))?;
                    }
                    "GENERATION_TOP_P" => {
                        self.generation.top_p = value
                            .parse()
                            .map_err(|_| anyhow!("Invalid top_p value: {}", value))?;
                    }
                    "API_BASE_URL" => self.api.base_url = value.clone(),
                    "API_KEY_ENV" => self.api.api_key_env = value.clone(),
                    "API_CONNECT_TIMEOUT_SECS" => {
                        self.api.connect_timeout_secs = Some(value.parse().map_err(|_| {
                            anyhow!("Invalid connect_timeout_secs value: {}", value)
                        })?);
                    }
                    "PROMPT_LANGUAGE" => self.prompt.language = value.clone(),
                    "PROMPT_SANITIZE" => self.prompt.sanitize = value.clone(),
                    "PROMPT_PLACEHOLDER" => self.prompt.placeholder = Some(value.clone()),
                    "AUDIT_LOG_DIR" => self.audit.log_dir = PathBuf::from(value),
                    "AUDIT_REQUIRED" => {
                        self.audit.required = value
                            .parse()
                            .map_err(|_| anyhow!("Invalid audit required value: {}", value))?;
                    }
                    _ => {} // Ignore unknown environment variables
                }
            }
        }
        Ok(())
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(ref model) = args.model {
            self.generation.model = model.clone();
        }
        if let Some(ref language) = args.language {
            self.prompt.language = language.clone();
        }
        if let Some(ref sanitize) = args.sanitize {
            self.prompt.sanitize = sanitize.clone();
        }
        if let Some(ref log_dir) = args.log_dir {
            self.audit.log_dir = log_dir.clone();
        }
        if let Some(ref base_url) = args.api_base_url {
            self.api.base_url = base_url.clone();
        }
    }

    /// Load configuration with full precedence chain:
    /// 1. Default values (lowest)
    /// 2. User config (~/.config/physio-assess/config.toml)
    /// 3. Current directory (./physio-assess.toml)
    /// 4. Explicit `--config` file
    /// 5. Environment variables (PHYSIO_*)
    /// 6. CLI arguments (highest)
    pub fn load_with_precedence(
        config_path: Option<&Path>,
        cli_args: &Args,
        env_vars: &HashMap<String, String>,
    ) -> Result<Self> {
        let mut config = Self::load_with_merged_configs()?;

        if let Some(path) = config_path {
            let explicit_config = Self::load_from_file(path)?;
            config.merge(&explicit_config);
        }

        config.apply_env_vars(env_vars)?;
        config.apply_args(cli_args);
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let temperature = self.generation.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidRange {
                field: "generation.temperature".to_string(),
                value: temperature,
                valid_range: "0-2".to_string(),
            });
        }

        let top_p = self.generation.top_p;
        if !(0.0..=1.0).contains(&top_p) {
            return Err(ConfigError::InvalidRange {
                field: "generation.top_p".to_string(),
                value: top_p,
                valid_range: "0-1".to_string(),
            });
        }

        if self.generation.max_tokens == 0 {
            return Err(ConfigError::InvalidRange {
                field: "generation.max_tokens".to_string(),
                value: 0.0,
                valid_range: "1 or more".to_string(),
            });
        }

        if self.generation.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "generation.model".to_string(),
                message: "model name must not be empty".to_string(),
            });
        }

        self.language()?;
        self.sanitize_policy()?;

        Ok(())
    }

    pub fn language(&self) -> Result<Language, ConfigError> {
        Language::from_str(&self.prompt.language).map_err(|message| ConfigError::InvalidValue {
            field: "prompt.language".to_string(),
            message,
        })
    }

    pub fn sanitize_policy(&self) -> Result<SanitizePolicy, ConfigError> {
        SanitizePolicy::from_str(&self.prompt.sanitize).map_err(|message| {
            ConfigError::InvalidValue {
                field: "prompt.sanitize".to_string(),
                message,
            }
        })
    }

    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            model: self.generation.model.clone(),
            temperature: self.generation.temperature,
            max_tokens: self.generation.max_tokens,
            top_p: self.generation.top_p,
        }
    }

    pub fn groq_config(&self) -> GroqConfig {
        let config = GroqConfig::new()
            .with_api_key_env(self.api.api_key_env.clone())
            .with_api_base_url(self.api.base_url.clone());
        match self.api.connect_timeout_secs {
            Some(secs) => config.with_connect_timeout(secs),
            None => config,
        }
    }

    pub fn prompt_builder(&self) -> Result<PromptBuilder, ConfigError> {
        let builder = PromptBuilder::new()
            .with_language(self.language()?.code())
            .with_sanitize(self.sanitize_policy()?);
        Ok(match self.prompt.placeholder {
            Some(ref placeholder) => builder.with_placeholder(placeholder.clone()),
            None => builder,
        })
    }

    pub fn audit_writer(&self) -> AuditLogWriter {
        AuditLogWriter::new(&self.audit.log_dir)
    }
}
