//! Client configuration and factory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizdeck_core::model::QuestionType;
use quizdeck_core::runner::RunnerConfig;
use quizdeck_core::session::QUESTION_TIME_BUDGET;

use crate::http::{HttpQuizApi, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Top-level quizdeck configuration.
///
/// Note: Custom Debug impl masks the auth token to keep it out of logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct QuizdeckConfig {
    /// Base URL of the quiz service, including the `/api` prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Countdown budget per question.
    #[serde(default = "default_question_time")]
    pub question_time_secs: u32,
    /// Length of one countdown tick in milliseconds.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Where signed-in state is persisted. Defaults next to the global config.
    #[serde(default)]
    pub session_file: Option<PathBuf>,
    /// Bearer token for every request. Usually `${QUIZDECK_TOKEN}`.
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Defaults for `quizdeck create`.
    #[serde(default)]
    pub create: CreateDefaults,
}

impl std::fmt::Debug for QuizdeckConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizdeckConfig")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("question_time_secs", &self.question_time_secs)
            .field("tick_interval_ms", &self.tick_interval_ms)
            .field("session_file", &self.session_file)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "***"))
            .field("create", &self.create)
            .finish()
    }
}

/// Generation defaults used when the command line leaves a knob unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDefaults {
    #[serde(default)]
    pub question_type: QuestionType,
    #[serde(default = "default_num_questions")]
    pub num_questions: u32,
    #[serde(default = "default_num_options")]
    pub num_options: u32,
    #[serde(default)]
    pub include_flashcards: bool,
}

impl Default for CreateDefaults {
    fn default() -> Self {
        Self {
            question_type: QuestionType::default(),
            num_questions: default_num_questions(),
            num_options: default_num_options(),
            include_flashcards: false,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_question_time() -> u32 {
    QUESTION_TIME_BUDGET
}
fn default_tick_interval() -> u64 {
    1000
}
fn default_num_questions() -> u32 {
    5
}
fn default_num_options() -> u32 {
    4
}

impl Default for QuizdeckConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            question_time_secs: default_question_time(),
            tick_interval_ms: default_tick_interval(),
            session_file: None,
            auth_token: None,
            create: CreateDefaults::default(),
        }
    }
}

impl QuizdeckConfig {
    /// Countdown settings for the quiz runner.
    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            time_budget: self.question_time_secs.max(1),
            tick_interval: Duration::from_millis(self.tick_interval_ms.max(1)),
        }
    }

    /// Resolved location of the session file.
    pub fn session_path(&self) -> PathBuf {
        self.session_file
            .clone()
            .or_else(|| dirs_path().map(|d| d.join("session.json")))
            .unwrap_or_else(|| PathBuf::from(".quizdeck-session.json"))
    }
}

/// Expand `${VAR}` references from the environment. Unset variables
/// expand to nothing; expanded values are not expanded again. An unclosed
/// `${` is kept as written.
fn expand_vars(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(open) = rest.find("${") {
        let Some(len) = rest[open + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..open]);
        let name = &rest[open + 2..open + 2 + len];
        out.push_str(&std::env::var(name).unwrap_or_default());
        rest = &rest[open + 3 + len..];
    }
    out.push_str(rest);
    out
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizdeck.toml` in the current directory
/// 2. `~/.config/quizdeck/config.toml`
///
/// Environment variable overrides: `QUIZDECK_BASE_URL`, `QUIZDECK_TOKEN`.
pub fn load_config() -> Result<QuizdeckConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizdeckConfig> {
    let config_path = find_config(path)?;
    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizdeckConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizdeckConfig::default(),
    };

    if let Ok(url) = std::env::var("QUIZDECK_BASE_URL") {
        config.base_url = url;
    }
    if let Ok(token) = std::env::var("QUIZDECK_TOKEN") {
        config.auth_token = Some(token);
    }

    config.base_url = expand_vars(&config.base_url);
    config.auth_token = config
        .auth_token
        .as_deref()
        .map(expand_vars)
        .filter(|t| !t.is_empty());
    config.session_file = config
        .session_file
        .as_ref()
        .map(|p| PathBuf::from(expand_vars(&p.to_string_lossy())));

    Ok(config)
}

/// The explicit path must exist; otherwise the first existing default.
fn find_config(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(p) = explicit {
        anyhow::ensure!(p.exists(), "config file not found: {}", p.display());
        return Ok(Some(p.to_path_buf()));
    }
    let candidates = [
        Some(PathBuf::from("quizdeck.toml")),
        dirs_path().map(|d| d.join("config.toml")),
    ];
    Ok(candidates.into_iter().flatten().find(|c| c.exists()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizdeck"))
}

/// Build the HTTP gateway described by a configuration.
pub fn create_api(config: &QuizdeckConfig, token: Option<String>) -> Result<HttpQuizApi> {
    let api = HttpQuizApi::new(Some(config.base_url.clone()), config.timeout_secs)
        .context("failed to create quiz service client")?;
    Ok(api.with_token(token.or_else(|| config.auth_token.clone())))
}
