//! Configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults, `config.toml`, `config.<env>.toml`
//! and `APP_*` env vars (`__` separates nested keys, e.g.
//! `APP_RETRIEVAL__TOP_N=8`).

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Layer `config.toml`, `config.<env>.toml` and `APP_*` variables found
    /// relative to `dir` over the built-in defaults.
    pub fn load_from(dir: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(dir.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.validate_for_env(&env_name)?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to extract settings: {}", e))
    }

    fn validate_for_env(&self, env: &str) -> anyhow::Result<()> {
        let settings = self.settings()?;
        settings.validate()?;
        if matches!(env, "prod" | "production") && settings.llm.base_url.contains("localhost") {
            tracing::warn!(base_url = %settings.llm.base_url, "production config points at a localhost model server");
        }
        Ok(())
    }
}

/// Smallest context budget that holds one block header with a useful amount
/// of document text.
pub const MIN_CONTEXT_CHARS: usize = 500;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub retrieval: RetrievalSettings,
    pub sources: SourceSettings,
    pub llm: LlmSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<(), Error> {
        let r = &self.retrieval;
        if r.top_n == 0 { return Err(Error::InvalidConfig("retrieval.top_n must be at least 1".into())); }
        if r.per_document_chars < 16 { return Err(Error::InvalidConfig("retrieval.per_document_chars must be at least 16".into())); }
        if r.max_context_chars < MIN_CONTEXT_CHARS {
            return Err(Error::InvalidConfig(format!("retrieval.max_context_chars must be at least {MIN_CONTEXT_CHARS}")));
        }
        if r.max_context_chars < r.per_document_chars {
            return Err(Error::InvalidConfig("retrieval.max_context_chars must not be smaller than per_document_chars".into()));
        }
        if r.min_score < 0.0 || r.min_score.is_nan() { return Err(Error::InvalidConfig("retrieval.min_score must be >= 0".into())); }
        r.weights.validate()?;
        if !self.sources.site_origin.starts_with("http") {
            return Err(Error::InvalidConfig(format!("sources.site_origin is not a URL: {}", self.sources.site_origin)));
        }
        if self.llm.timeout_secs == 0 { return Err(Error::InvalidConfig("llm.timeout_secs must be positive".into())); }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub corpus_path: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self { corpus_path: "utdanning_data/processed/text_for_llm/vectorization_dataset.json".to_string() }
    }
}

impl DataSettings {
    pub fn corpus_path(&self) -> PathBuf { expand_path(&self.corpus_path) }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub top_n: usize,
    /// Documents must score strictly above zero and at least this much.
    pub min_score: f32,
    pub max_context_chars: usize,
    pub per_document_chars: usize,
    pub weights: ScoreWeights,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { top_n: 5, min_score: 0.0, max_context_chars: 4000, per_document_chars: 1000, weights: ScoreWeights::default() }
    }
}

/// Scorer calibration. Changing a weight means revisiting the ranking tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub title_match: f32,
    pub text_occurrence: f32,
    pub text_cap_per_term: usize,
    pub intent_alignment: f32,
    pub endpoint_term: f32,
    /// Awarded once when the text is longer than `min_informative_chars`.
    pub quality_bonus: f32,
    pub min_informative_chars: usize,
}

impl ScoreWeights {
    /// Scores are sums of these weights, so all of them must be finite and non-negative.
    pub fn validate(&self) -> Result<(), Error> {
        let weights = [
            ("title_match", self.title_match),
            ("text_occurrence", self.text_occurrence),
            ("intent_alignment", self.intent_alignment),
            ("endpoint_term", self.endpoint_term),
            ("quality_bonus", self.quality_bonus),
        ];
        match weights.iter().find(|(_, value)| !value.is_finite() || *value < 0.0) {
            Some((name, value)) => Err(Error::InvalidConfig(format!("retrieval.weights.{name} must be a non-negative number, got {value}"))),
            None => Ok(()),
        }
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            title_match: 10.0,
            text_occurrence: 1.0,
            text_cap_per_term: 5,
            intent_alignment: 8.0,
            endpoint_term: 5.0,
            quality_bonus: 2.0,
            min_informative_chars: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub site_origin: String,
    pub api_origin: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self { site_origin: "https://utdanning.no".to_string(), api_origin: "api.utdanning.no".to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    /// Previous chat messages replayed to the model on every turn.
    pub history_messages: usize,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:1234/v1".to_string(),
            model: "gemma-3n-E4B-it-MLX-bf16".to_string(),
            api_key: None,
            temperature: 0.5,
            max_tokens: 1500,
            timeout_secs: 120,
            history_messages: 10,
        }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    // Expand ~ at start
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
