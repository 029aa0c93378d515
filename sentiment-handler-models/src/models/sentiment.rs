use std::path::Path;

use candle_core::{Device, Tensor};
use candle_nn::{linear, Dropout, Linear, Module, VarBuilder};
use sentiment_handler::{Error, Result, NUM_LABELS};

use crate::config::BertConfig;
use crate::from_model_dir::from_model_dir;
use crate::model::{ForwardParams, PreTrainedModel};
use crate::models::bert::{Bert, BERT_DTYPE};

/// Dropout probability applied to the pooled output before the projection.
pub const CLASSIFIER_DROPOUT: f32 = 0.3;

/// A BERT encoder followed by dropout and a linear projection onto the sentiment labels.
///
/// The parameters are expected under the `bert.` prefix for the encoder and `out.` for the
/// projection layer, which always has [`NUM_LABELS`] outputs.
pub struct SentimentClassifier {
    bert: Bert,
    drop: Dropout,
    out: Linear,
    config: BertConfig,
}

impl SentimentClassifier {
    /// Loads the classifier from a model directory containing a `best_model.bin` checkpoint and,
    /// optionally, a `config.json` file with the encoder hyper-parameters.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - The directory holding the checkpoint.
    /// * `device` - The device where the parameters are placed.
    ///
    /// # Returns
    ///
    /// The loaded classifier, ready for inference.
    pub fn from_model_dir<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let model_info = from_model_dir(model_dir)?;
        let vb = model_info.get_var_builder(BERT_DTYPE, device)?;
        let config = model_info.get_config().clone();
        tracing::info!(
            "Loading sentiment classifier from '{}' ({} layers, hidden size {}) on device {:?}",
            model_info.get_checkpoint_path().display(),
            config.num_hidden_layers,
            config.hidden_size,
            device
        );
        Self::load(vb, config)
    }
}

impl PreTrainedModel for SentimentClassifier {
    fn load(vb: VarBuilder, config: BertConfig) -> Result<Self> {
        let bert = Bert::load(vb.pp("bert"), &config)?;
        let drop = Dropout::new(CLASSIFIER_DROPOUT);
        let out = linear(config.hidden_size, NUM_LABELS, vb.pp("out"))?;
        Ok(Self {
            bert,
            drop,
            out,
            config,
        })
    }

    fn config(&self) -> &BertConfig {
        &self.config
    }

    fn forward(&self, params: ForwardParams) -> Result<Tensor> {
        let input_ids = params
            .get_input_ids()
            .ok_or_else(|| Error::MissingForwardParam("input_ids".to_string()))?;
        let pooled_output = self.bert.forward(
            input_ids,
            params.get_token_type_ids(),
            params.get_attention_mask(),
        )?;
        let output = self.drop.forward(&pooled_output, false)?;
        Ok(self.out.forward(&output)?)
    }
}
