//! Local sentiment inference via ONNX Runtime.
//!
//! Runs a pretrained sequence classifier exported to ONNX. Label names come
//! from the model's `config.json` (`id2label`), so any sentiment model whose
//! labels mention "pos"/"neg" maps onto the three-way taxonomy.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use serde::Deserialize;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

use crate::device::Device;
use crate::error::{HuginnError, Result};
use crate::{Classification, SentimentClassifier};

/// Inputs longer than this many tokens are truncated.
pub const DEFAULT_MAX_LENGTH: usize = 512;

/// Supported local sentiment models.
#[derive(Debug, Clone)]
pub enum LocalSentimentModel {
    /// twitter-xlm-roberta-base-sentiment: multilingual, negative/neutral/positive.
    TwitterXlmRobertaBase,
    /// distilbert-base-uncased-finetuned-sst-2-english: English only, two classes.
    DistilbertSst2,
    /// Custom model from local paths.
    Custom {
        model_path: PathBuf,
        tokenizer_path: PathBuf,
        config_path: PathBuf,
    },
}

impl LocalSentimentModel {
    /// Look up a bundled model by its display name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "twitter-xlm-roberta-base-sentiment" => Some(Self::TwitterXlmRobertaBase),
            "distilbert-sst2" => Some(Self::DistilbertSst2),
            _ => None,
        }
    }

    /// Get the HuggingFace repo ID for this model.
    pub fn repo_id(&self) -> Option<&'static str> {
        match self {
            Self::TwitterXlmRobertaBase => Some("Xenova/twitter-xlm-roberta-base-sentiment"),
            Self::DistilbertSst2 => Some("Xenova/distilbert-base-uncased-finetuned-sst-2-english"),
            Self::Custom { .. } => None,
        }
    }

    /// Get the model name for display.
    pub fn name(&self) -> &str {
        match self {
            Self::TwitterXlmRobertaBase => "twitter-xlm-roberta-base-sentiment",
            Self::DistilbertSst2 => "distilbert-sst2",
            Self::Custom { model_path, .. } => model_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("custom"),
        }
    }

    /// Resolve model, tokenizer and config paths, downloading if needed.
    fn resolve_paths(&self, cache_dir: &Path) -> Result<ModelFiles> {
        match (self, self.repo_id()) {
            (
                Self::Custom {
                    model_path,
                    tokenizer_path,
                    config_path,
                },
                _,
            ) => Ok(ModelFiles {
                model: model_path.clone(),
                tokenizer: tokenizer_path.clone(),
                config: config_path.clone(),
            }),
            (_, Some(repo_id)) => download_model(repo_id, cache_dir),
            (_, None) => Err(HuginnError::Configuration(format!(
                "no repository for model {}",
                self.name()
            ))),
        }
    }
}

struct ModelFiles {
    model: PathBuf,
    tokenizer: PathBuf,
    config: PathBuf,
}

/// Information about a loaded sentiment model.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentModelInfo {
    /// Model name.
    pub name: String,
    /// Label names indexed by output position.
    pub labels: Vec<String>,
    /// Whether the graph takes a `token_type_ids` input (BERT-style).
    pub uses_token_type_ids: bool,
}

impl SentimentModelInfo {
    /// Read label names and input layout from a `config.json`.
    pub fn from_config(name: impl Into<String>, config_json: &str) -> Result<Self> {
        #[derive(Deserialize)]
        struct ModelConfig {
            id2label: HashMap<String, String>,
            #[serde(default)]
            type_vocab_size: Option<usize>,
        }

        let config: ModelConfig = serde_json::from_str(config_json)?;
        let mut indexed = config
            .id2label
            .into_iter()
            .map(|(index, label)| {
                index
                    .parse::<usize>()
                    .map(|i| (i, label))
                    .map_err(|_| HuginnError::DataError(format!("non-numeric label id: {index}")))
            })
            .collect::<Result<Vec<_>>>()?;
        indexed.sort_by_key(|(i, _)| *i);

        Ok(Self {
            name: name.into(),
            labels: indexed.into_iter().map(|(_, label)| label).collect(),
            // XLM-R/RoBERTa have a single segment type and export without the input.
            uses_token_type_ids: config.type_vocab_size.unwrap_or(0) > 1,
        })
    }

    /// Label name for output index `index`.
    pub fn label(&self, index: usize) -> String {
        self.labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("LABEL_{index}"))
    }
}

/// Model strategy running locally through ONNX Runtime.
///
/// Texts are truncated to `max_length` tokens and classified in padded
/// batches. The session is guarded by a mutex so one loaded classifier can
/// be shared across runs.
pub struct OnnxSentimentClassifier {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    model_info: SentimentModelInfo,
    pad_id: u32,
    device: Device,
}

impl OnnxSentimentClassifier {
    /// Create a new classifier with the specified model.
    ///
    /// Downloads the model into `cache_dir` if not cached locally.
    pub fn new(
        model: LocalSentimentModel,
        device: Device,
        cache_dir: &Path,
        max_length: usize,
    ) -> Result<Self> {
        let files = model.resolve_paths(cache_dir)?;

        let config_json = std::fs::read_to_string(&files.config).map_err(|e| {
            HuginnError::Configuration(format!("Failed to read model config: {}", e))
        })?;
        let model_info = SentimentModelInfo::from_config(model.name(), &config_json)?;

        let session = build_session(&files.model, &device)?;
        let mut tokenizer = Tokenizer::from_file(&files.tokenizer).map_err(|e| {
            HuginnError::Configuration(format!("Failed to load tokenizer: {}", e))
        })?;

        let pad_id = tokenizer
            .get_padding()
            .map(|p| p.pad_id)
            .or_else(|| tokenizer.token_to_id("<pad>"))
            .or_else(|| tokenizer.token_to_id("[PAD]"))
            .unwrap_or(0);
        // Padding is applied per batch below; truncation silently drops the excess.
        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| HuginnError::Configuration(format!("Invalid truncation: {}", e)))?;

        info!(
            model = %model_info.name,
            device = device.name(),
            labels = ?model_info.labels,
            "loaded local sentiment model"
        );

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            model_info,
            pad_id,
            device,
        })
    }

    /// Get model information.
    pub fn model_info(&self) -> &SentimentModelInfo {
        &self.model_info
    }

    pub fn device(&self) -> Device {
        self.device
    }

    /// Classify a batch of texts with one forward pass.
    pub fn classify_texts(&self, texts: &[&str]) -> Result<Vec<Classification>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let batch = self.encode_batch(texts)?;
        debug!(batch = texts.len(), seq_len = batch.seq_len, "running local inference");
        let logits = self.run_inference(&batch)?;

        if logits.len() != texts.len() {
            return Err(HuginnError::DataError(format!(
                "expected {} logit rows, got {}",
                texts.len(),
                logits.len()
            )));
        }

        texts
            .iter()
            .zip(logits)
            .map(|(text, row)| {
                let (index, probability) = top_class(&row)?;
                Ok(Classification::from_model_output(
                    *text,
                    &self.model_info.label(index),
                    f64::from(probability),
                ))
            })
            .collect()
    }

    /// Tokenize and right-pad texts into `[batch, seq_len]` row-major buffers.
    fn encode_batch(&self, texts: &[&str]) -> Result<EncodedBatch> {
        let encodings = texts
            .iter()
            .map(|text| {
                self.tokenizer
                    .encode(*text, true)
                    .map_err(|e| HuginnError::DataError(format!("Tokenization failed: {}", e)))
            })
            .collect::<Result<Vec<_>>>()?;

        let seq_len = encodings.iter().map(|e| e.get_ids().len()).max().unwrap_or(0).max(1);
        let size = texts.len() * seq_len;
        let mut batch = EncodedBatch {
            input_ids: Vec::with_capacity(size),
            attention_mask: Vec::with_capacity(size),
            token_type_ids: Vec::with_capacity(size),
            batch_size: texts.len(),
            seq_len,
        };

        for encoding in &encodings {
            let len = encoding.get_ids().len();
            batch
                .input_ids
                .extend(encoding.get_ids().iter().map(|&id| i64::from(id)));
            batch
                .attention_mask
                .extend(encoding.get_attention_mask().iter().map(|&m| i64::from(m)));
            batch
                .token_type_ids
                .extend(encoding.get_type_ids().iter().map(|&t| i64::from(t)));

            let padding = seq_len - len;
            batch
                .input_ids
                .extend(std::iter::repeat_n(i64::from(self.pad_id), padding));
            batch.attention_mask.extend(std::iter::repeat_n(0, padding));
            batch.token_type_ids.extend(std::iter::repeat_n(0, padding));
        }

        Ok(batch)
    }

    /// Run the ONNX session, returning one logit row per input.
    fn run_inference(&self, batch: &EncodedBatch) -> Result<Vec<Vec<f32>>> {
        use ort::value::TensorRef;

        let shape = [batch.batch_size, batch.seq_len];

        let input_ids_tensor =
            TensorRef::from_array_view((shape, batch.input_ids.as_slice())).map_err(|e| {
                HuginnError::DataError(format!("Failed to create input_ids tensor: {}", e))
            })?;
        let attention_mask_tensor =
            TensorRef::from_array_view((shape, batch.attention_mask.as_slice())).map_err(|e| {
                HuginnError::DataError(format!("Failed to create attention_mask tensor: {}", e))
            })?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| HuginnError::Configuration(format!("inference session poisoned: {}", e)))?;

        let outputs = if self.model_info.uses_token_type_ids {
            let token_type_ids_tensor =
                TensorRef::from_array_view((shape, batch.token_type_ids.as_slice())).map_err(
                    |e| {
                        HuginnError::DataError(format!(
                            "Failed to create token_type_ids tensor: {}",
                            e
                        ))
                    },
                )?;
            session
                .run(ort::inputs![
                    "input_ids" => input_ids_tensor,
                    "attention_mask" => attention_mask_tensor,
                    "token_type_ids" => token_type_ids_tensor,
                ])
                .map_err(|e| HuginnError::DataError(format!("ONNX inference failed: {}", e)))?
        } else {
            session
                .run(ort::inputs![
                    "input_ids" => input_ids_tensor,
                    "attention_mask" => attention_mask_tensor,
                ])
                .map_err(|e| HuginnError::DataError(format!("ONNX inference failed: {}", e)))?
        };

        let logits = outputs
            .get("logits")
            .ok_or_else(|| HuginnError::DataError("No logits output found".to_string()))?;

        let (tensor_shape, logits_data) = logits
            .try_extract_tensor::<f32>()
            .map_err(|e| HuginnError::DataError(format!("Failed to extract logits: {}", e)))?;

        let rows = tensor_shape[0] as usize;
        let num_labels = tensor_shape[1] as usize;

        Ok(logits_data
            .chunks(num_labels.max(1))
            .take(rows)
            .map(<[f32]>::to_vec)
            .collect())
    }
}

struct EncodedBatch {
    input_ids: Vec<i64>,
    attention_mask: Vec<i64>,
    token_type_ids: Vec<i64>,
    batch_size: usize,
    seq_len: usize,
}

#[async_trait]
impl SentimentClassifier for OnnxSentimentClassifier {
    fn name(&self) -> &str {
        "local"
    }

    async fn classify(&self, text: &str) -> Result<Classification> {
        self.classify_texts(&[text])?
            .pop()
            .ok_or(HuginnError::EmptyResponse)
    }

    async fn classify_batch(&self, texts: &[&str]) -> Result<Vec<Classification>> {
        self.classify_texts(texts)
    }
}

/// Arg-max class and its softmax probability.
fn top_class(logits: &[f32]) -> Result<(usize, f32)> {
    if logits.is_empty() {
        return Err(HuginnError::DataError("empty logit row".to_string()));
    }
    let probs = softmax(logits);
    let (index, probability) = probs
        .iter()
        .copied()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or((0, 0.0));
    Ok((index, probability))
}

/// Softmax function.
fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|x| x / sum).collect()
}

/// Build an ONNX session with the appropriate execution provider.
fn build_session(model_path: &Path, device: &Device) -> Result<Session> {
    let builder = Session::builder()
        .map_err(|e| {
            HuginnError::Configuration(format!("Failed to create session builder: {}", e))
        })?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| {
            HuginnError::Configuration(format!("Failed to set optimization level: {}", e))
        })?;

    let builder = match device {
        Device::Cpu => builder,
        #[cfg(feature = "cuda")]
        Device::Cuda { device_id } => {
            use ort::execution_providers::CUDAExecutionProvider;
            builder
                .with_execution_providers([CUDAExecutionProvider::default()
                    .with_device_id(*device_id as i32)
                    .build()])
                .map_err(|e| {
                    HuginnError::Configuration(format!("Failed to configure CUDA: {}", e))
                })?
        }
    };

    builder
        .commit_from_file(model_path)
        .map_err(|e| HuginnError::Configuration(format!("Failed to load ONNX model: {}", e)))
}

/// Default directory for downloaded models.
pub fn default_cache_dir() -> PathBuf {
    std::env::var("HUGINN_CACHE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from(".cache"))
                .join("huginn")
                .join("models")
        })
}

/// Download model, tokenizer and config from HuggingFace Hub.
fn download_model(repo_id: &str, cache_dir: &Path) -> Result<ModelFiles> {
    use hf_hub::api::sync::ApiBuilder;

    let api = ApiBuilder::new()
        .with_cache_dir(cache_dir.to_path_buf())
        .build()
        .map_err(|e| {
            HuginnError::Configuration(format!("Failed to initialize HF Hub API: {}", e))
        })?;

    let repo = api.model(repo_id.to_string());
    let fetch = |file: &str| {
        repo.get(file).map_err(|e| {
            HuginnError::Configuration(format!("Failed to download {} from {}: {}", file, repo_id, e))
        })
    };

    Ok(ModelFiles {
        model: fetch("onnx/model.onnx")?,
        tokenizer: fetch("tokenizer.json")?,
        config: fetch("config.json")?,
    })
}
