use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_core::IndexOp;
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config};
use std::path::Path;
use std::sync::Arc;

/// Reads `config.json` and memory-maps `model.safetensors` from a model directory.
fn load_bert(model_dir: &Path, device: &Device) -> Result<(VarBuilder<'static>, Config)> {
    let config_content = std::fs::read_to_string(model_dir.join("config.json"))?;
    let config: Config = serde_json::from_str(&config_content)
        .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;

    let weights_path = model_dir.join("model.safetensors");
    // SAFETY: the weights file is opened read-only and not modified while mapped.
    let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? };

    Ok((vb, config))
}

/// Loads the encoder under whichever prefix the checkpoint uses.
fn load_encoder(vb: &VarBuilder, config: &Config) -> Result<BertModel> {
    if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
        BertModel::load(vb.pp("bert"), config)
    } else if vb.contains_tensor("roberta.embeddings.word_embeddings.weight") {
        BertModel::load(vb.pp("roberta"), config)
    } else {
        BertModel::load(vb.clone(), config)
    }
}

struct CrossEncoderImpl {
    bert: BertModel,
    classifier: Linear,
}

/// BERT cross-encoder with a single-logit classification head.
#[derive(Clone)]
pub struct BertClassifier(Arc<CrossEncoderImpl>);

impl BertClassifier {
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let (vb, config) = load_bert(model_dir.as_ref(), device)?;
        let bert = load_encoder(&vb, &config)?;
        let classifier = candle_nn::linear(config.hidden_size, 1, vb.pp("classifier"))?;

        Ok(Self(Arc::new(CrossEncoderImpl { bert, classifier })))
    }

    /// Returns the raw relevance logit, shape `[batch, 1]`.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        let output = self
            .0
            .bert
            .forward(input_ids, token_type_ids, attention_mask)?;
        let cls_token = output.i((.., 0, ..))?;
        self.0.classifier.forward(&cls_token)
    }
}

/// BERT bi-encoder producing mean-pooled sentence embeddings.
#[derive(Clone)]
pub struct BertEncoder {
    bert: Arc<BertModel>,
    hidden_size: usize,
}

impl BertEncoder {
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let (vb, config) = load_bert(model_dir.as_ref(), device)?;
        let bert = load_encoder(&vb, &config)?;

        Ok(Self {
            bert: Arc::new(bert),
            hidden_size: config.hidden_size,
        })
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Averages token states over the attention mask for a single sequence.
    pub fn embed(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Vec<f32>> {
        // hidden: [1, seq_len, hidden_size]
        let hidden = self
            .bert
            .forward(input_ids, token_type_ids, Some(attention_mask))?;

        // mask: [1, seq_len, 1]
        let mask = attention_mask.to_dtype(DType::F32)?.unsqueeze(2)?;
        let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
        let counts = mask.sum(1)?;

        summed.broadcast_div(&counts)?.squeeze(0)?.to_vec1::<f32>()
    }
}
