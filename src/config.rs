//! Configuration loading for the `huginn` CLI.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.huginn/config.toml` (user)
//! 3. `/etc/huginn/config.toml` (system)
//!
//! With no file at all, built-in defaults apply.
//!
//! Secrets are loaded separately with mandatory permission checks:
//! 1. `~/.huginn/secrets.toml` (user, must be 0600)
//! 2. `/etc/huginn/secrets.toml` (system, must be 0600)

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::analysis::AnalysisOptions;
use crate::providers::LexiconClassifier;
use crate::sources::{CommentSort, DEFAULT_PROGRAM, JsonLinesSource, YtDlpSource};
use crate::{CommentSource, HuginnError, Result, SentimentClassifier};

/// CLI configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisOptions,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
}

/// Which classification strategy to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Rule-based compound score (no network, no model download).
    #[default]
    Lexicon,
    /// Hosted HuggingFace Inference API.
    HuggingFace,
    /// ONNX model run in-process.
    Local,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lexicon => "lexicon",
            Self::HuggingFace => "huggingface",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = HuginnError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lexicon" | "vader" => Ok(Self::Lexicon),
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            "local" | "onnx" => Ok(Self::Local),
            other => Err(HuginnError::Configuration(format!(
                "unknown strategy '{other}' (expected lexicon, huggingface or local)"
            ))),
        }
    }
}

/// Classifier selection and per-strategy settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default)]
    pub lexicon: LexiconConfig,
    #[serde(default)]
    pub huggingface: HuggingFaceConfig,
    #[serde(default)]
    pub local: LocalConfig,
}

/// Lexicon strategy configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LexiconConfig {
    /// VADER-format lexicon file replacing the built-in one.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Hosted inference configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HuggingFaceConfig {
    /// Model ID (default: cardiffnlp/twitter-xlm-roberta-base-sentiment).
    #[serde(default = "default_hf_model")]
    pub model: String,
    /// API base URL.
    #[serde(default = "default_hf_base_url")]
    pub base_url: String,
    /// Token limit per comment (default: 512).
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    /// Request timeout in seconds (default: 60).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            model: default_hf_model(),
            base_url: default_hf_base_url(),
            max_length: default_max_length(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_hf_model() -> String {
    "cardiffnlp/twitter-xlm-roberta-base-sentiment".to_string()
}

fn default_hf_base_url() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_max_length() -> usize {
    512
}

fn default_timeout() -> u64 {
    60
}

/// Local inference configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalConfig {
    /// Bundled model name (default: twitter-xlm-roberta-base-sentiment).
    #[serde(default = "default_local_model")]
    pub model: String,
    /// Custom ONNX model; requires `tokenizer_path` and `config_path` too.
    #[serde(default)]
    pub model_path: Option<PathBuf>,
    #[serde(default)]
    pub tokenizer_path: Option<PathBuf>,
    #[serde(default)]
    pub config_path: Option<PathBuf>,
    /// Device to use: "cpu" or "cuda[:N]" (default: "cpu").
    #[serde(default = "default_device")]
    pub device: String,
    /// Token limit per comment (default: 512).
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    /// Directory for model downloads.
    #[serde(default)]
    pub models_dir: Option<PathBuf>,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            model: default_local_model(),
            model_path: None,
            tokenizer_path: None,
            config_path: None,
            device: default_device(),
            max_length: default_max_length(),
            models_dir: None,
        }
    }
}

fn default_local_model() -> String {
    "twitter-xlm-roberta-base-sentiment".to_string()
}

fn default_device() -> String {
    "cpu".to_string()
}

/// Comment fetcher configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// `yt-dlp` executable (default: looked up on PATH).
    #[serde(default = "default_program")]
    pub program: String,
    /// Comment order: "top" or "new" (default: "top").
    #[serde(default)]
    pub sort: CommentSort,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            sort: CommentSort::default(),
        }
    }
}

fn default_program() -> String {
    DEFAULT_PROGRAM.to_string()
}

/// Secrets configuration (API keys).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub huggingface: Option<ApiKeySecret>,
}

/// A single API key secret.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

/// Provider name → environment variable name mapping.
const PROVIDER_ENV_VARS: &[(&str, &str)] = &[("huggingface", "HF_API_KEY")];

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// An explicit path must exist; otherwise the first existing file wins
    /// and defaults are used when there is none.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let Some(path) = Self::resolve_config_path(explicit_path)? else {
            debug!("no config file found, using defaults");
            return Ok(Self::default());
        };

        debug!(path = %path.display(), "loading config");
        let content = fs::read_to_string(&path).map_err(|e| {
            HuginnError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            HuginnError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(HuginnError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".huginn").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/huginn/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Construct the configured classifier.
    ///
    /// Called once per process; the handle is shared by every run.
    pub fn build_classifier(&self, secrets: &Secrets) -> Result<Arc<dyn SentimentClassifier>> {
        match self.classifier.strategy {
            Strategy::Lexicon => {
                let classifier = match &self.classifier.lexicon.path {
                    Some(path) => LexiconClassifier::from_path(path)?,
                    None => LexiconClassifier::new(),
                };
                Ok(Arc::new(classifier))
            }
            Strategy::HuggingFace => self.build_huggingface(secrets),
            Strategy::Local => self.build_local(),
        }
    }

    #[cfg(feature = "huggingface")]
    fn build_huggingface(&self, secrets: &Secrets) -> Result<Arc<dyn SentimentClassifier>> {
        use crate::providers::HuggingFaceClassifier;

        let hf = &self.classifier.huggingface;
        let api_key = secrets.api_key("huggingface").ok_or_else(|| {
            HuginnError::Configuration(
                "HuggingFace API key missing: set HF_API_KEY or add [huggingface] to secrets.toml"
                    .to_string(),
            )
        })?;

        let classifier = HuggingFaceClassifier::with_timeout(
            api_key,
            &hf.base_url,
            std::time::Duration::from_secs(hf.timeout_secs),
        )?
        .model(&hf.model)
        .max_length(hf.max_length);
        Ok(Arc::new(classifier))
    }

    #[cfg(not(feature = "huggingface"))]
    fn build_huggingface(&self, _secrets: &Secrets) -> Result<Arc<dyn SentimentClassifier>> {
        Err(HuginnError::Configuration(
            "huggingface strategy requires the `huggingface` feature".to_string(),
        ))
    }

    #[cfg(feature = "local-inference")]
    fn build_local(&self) -> Result<Arc<dyn SentimentClassifier>> {
        use crate::device::Device;
        use crate::providers::onnx_sentiment::default_cache_dir;
        use crate::providers::{LocalSentimentModel, OnnxSentimentClassifier};

        let local = &self.classifier.local;
        let model = match (&local.model_path, &local.tokenizer_path, &local.config_path) {
            (Some(model_path), Some(tokenizer_path), Some(config_path)) => {
                LocalSentimentModel::Custom {
                    model_path: model_path.clone(),
                    tokenizer_path: tokenizer_path.clone(),
                    config_path: config_path.clone(),
                }
            }
            (None, None, None) => LocalSentimentModel::from_name(&local.model).ok_or_else(|| {
                HuginnError::Configuration(format!("unknown local model '{}'", local.model))
            })?,
            _ => {
                return Err(HuginnError::Configuration(
                    "model_path, tokenizer_path and config_path must be set together".to_string(),
                ));
            }
        };

        let device: Device = local.device.parse()?;
        let cache_dir = local.models_dir.clone().unwrap_or_else(default_cache_dir);
        let classifier = OnnxSentimentClassifier::new(model, device, &cache_dir, local.max_length)?;
        Ok(Arc::new(classifier))
    }

    #[cfg(not(feature = "local-inference"))]
    fn build_local(&self) -> Result<Arc<dyn SentimentClassifier>> {
        Err(HuginnError::Configuration(
            "local strategy requires the `local-inference` feature".to_string(),
        ))
    }

    /// Construct the comment source: a dump file when given, `yt-dlp` otherwise.
    pub fn build_source(&self, comments_file: Option<&Path>) -> Box<dyn CommentSource> {
        match comments_file {
            Some(path) => Box::new(JsonLinesSource::new(path)),
            None => Box::new(
                YtDlpSource::new(self.analysis.max_comments)
                    .program(&self.fetcher.program)
                    .sort(self.fetcher.sort),
            ),
        }
    }
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Resolution order:
    /// 1. `~/.huginn/secrets.toml` (if exists, must be 0600)
    /// 2. `/etc/huginn/secrets.toml` (if exists, must be 0600)
    ///
    /// Returns empty secrets if no file exists (keys may come from env vars).
    pub fn load() -> Result<Self> {
        // Try user secrets first
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".huginn").join("secrets.toml");
            if user_secrets.exists() {
                return Self::load_from_file(&user_secrets);
            }
        }

        // Try system secrets
        let system_secrets = PathBuf::from("/etc/huginn/secrets.toml");
        if system_secrets.exists() {
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    /// Load one secrets file after checking its permissions.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::check_permissions(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            HuginnError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            HuginnError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            HuginnError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        // Reject if group or other bits are set
        if mode & 0o077 != 0 {
            return Err(HuginnError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// Get API key for a provider, falling back to the corresponding environment variable.
    pub fn api_key(&self, provider: &str) -> Option<String> {
        let from_file = match provider {
            "huggingface" => self.huggingface.as_ref(),
            _ => None,
        }
        .map(|s| s.api_key.clone());

        from_file.or_else(|| {
            PROVIDER_ENV_VARS
                .iter()
                .find(|(name, _)| *name == provider)
                .and_then(|(_, env_var)| std::env::var(env_var).ok())
        })
    }
}
