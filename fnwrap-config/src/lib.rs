//! Configuration for talking to a completion service.
//!
//! Values come from the environment with builder-style overrides:
//!
//! | variable | meaning | default |
//! |---|---|---|
//! | `OPENAI_API_KEY` | bearer credential | none |
//! | `FNWRAP_MODEL` | model identifier | `gpt-3.5-turbo-1106` |
//! | `FNWRAP_TOOL_CHOICE` | `auto`, `none` or `required` | `auto` |
//! | `FNWRAP_BASE_URL` | service base URL | `https://api.openai.com/` |

#![warn(missing_docs, clippy::pedantic)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Environment variable holding the API key.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable overriding the model.
pub const MODEL_ENV: &str = "FNWRAP_MODEL";
/// Environment variable overriding the tool-choice policy.
pub const TOOL_CHOICE_ENV: &str = "FNWRAP_TOOL_CHOICE";
/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "FNWRAP_BASE_URL";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-1106";
/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/";

/// Result alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A value was present but unusable.
    #[error("invalid value for `{key}`: {reason}")]
    Invalid {
        /// Setting that failed validation.
        key: &'static str,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// A setting needed by the caller is absent.
    #[error("`{key}` is not configured")]
    Missing {
        /// Setting that is absent.
        key: &'static str,
    },
}

/// How the model may use the advertised tools.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    /// The model decides whether to call tools.
    #[default]
    Auto,
    /// The model must not call tools.
    None,
    /// The model must call at least one tool.
    Required,
}

impl ToolChoice {
    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::None => "none",
            Self::Required => "required",
        }
    }
}

impl fmt::Display for ToolChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolChoice {
    type Err = ConfigError;

    fn from_str(value: &str) -> ConfigResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "none" => Ok(Self::None),
            "required" => Ok(Self::Required),
            other => Err(ConfigError::Invalid {
                key: TOOL_CHOICE_ENV,
                reason: format!("expected auto, none or required, got `{other}`"),
            }),
        }
    }
}

/// Settings for a completion service.
#[derive(Clone, PartialEq, Eq)]
pub struct CompletionConfig {
    model: String,
    api_key: Option<String>,
    base_url: String,
    tool_choice: ToolChoice,
}

impl fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("tool_choice", &self.tool_choice)
            .finish()
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

impl CompletionConfig {
    /// Creates a configuration for `model` with no credentials.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
            tool_choice: ToolChoice::Auto,
        }
    }

    /// Loads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable holds an unusable value.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable holds an unusable value.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let model = present(MODEL_ENV).unwrap_or_else(|| DEFAULT_MODEL.to_owned());
        let mut config = Self::new(model);
        config.api_key = present(OPENAI_API_KEY_ENV);
        if let Some(choice) = present(TOOL_CHOICE_ENV) {
            config.tool_choice = choice.parse()?;
        }
        if let Some(base_url) = present(BASE_URL_ENV) {
            config = config.with_base_url(&base_url)?;
        }

        debug!(
            model = %config.model,
            base_url = %config.base_url,
            tool_choice = %config.tool_choice,
            api_key_present = config.api_key.is_some(),
            "loaded completion config"
        );
        Ok(config)
    }

    /// Supplies an explicit API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Overrides the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Overrides the tool-choice policy.
    #[must_use]
    pub fn with_tool_choice(mut self, tool_choice: ToolChoice) -> Self {
        self.tool_choice = tool_choice;
        self
    }

    /// Overrides the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the URL lacks an HTTP scheme.
    pub fn with_base_url(mut self, base_url: &str) -> ConfigResult<Self> {
        self.base_url = sanitize_base_url(base_url)?;
        Ok(self)
    }

    /// Returns the model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the API key, if configured.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Returns the API key or an error naming the missing variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if no key is configured.
    pub fn require_api_key(&self) -> ConfigResult<&str> {
        self.api_key().ok_or(ConfigError::Missing {
            key: OPENAI_API_KEY_ENV,
        })
    }

    /// Returns the base URL, always ending in `/`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the tool-choice policy.
    #[must_use]
    pub const fn tool_choice(&self) -> ToolChoice {
        self.tool_choice
    }
}

fn sanitize_base_url(input: &str) -> ConfigResult<String> {
    let mut base = input.trim().to_owned();
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(ConfigError::Invalid {
            key: BASE_URL_ENV,
            reason: "base URL must start with http:// or https://".into(),
        });
    }
    if !base.ends_with('/') {
        base.push('/');
    }
    Ok(base)
}
