use std::sync::Arc;
use std::time::Instant;

use candle_core::{DType, Device, Tensor};
use sentiment_handler::{Error, Result};
use sentiment_handler_models::{ForwardParams, PreTrainedModel};
use sentiment_handler_tokenizers::{Encoding, Tokenizer};

use crate::input::InputData;
use crate::output::Prediction;

/// Index of the highest score. Ties resolve to the lowest index and `NaN` scores never win.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, score) in scores.iter().copied().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((index, score)),
        }
    }
    best.map(|(index, _)| index)
}

/// Runs the sentiment classifier on a single decoded record.
pub struct Predictor {
    model: Arc<dyn PreTrainedModel>,
    tokenizer: Arc<dyn Tokenizer>,
    device: Device,
}

impl Predictor {
    /// Creates a new `Predictor`.
    ///
    /// # Arguments
    ///
    /// * `model` - The loaded classifier.
    /// * `tokenizer` - The tokenizer of the classifier backbone.
    /// * `device` - The device the model lives on. Input tensors are created there.
    pub fn new(
        model: Arc<dyn PreTrainedModel>,
        tokenizer: Arc<dyn Tokenizer>,
        device: &Device,
    ) -> Self {
        Self {
            model,
            tokenizer,
            device: device.clone(),
        }
    }

    pub fn get_tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    pub fn get_device(&self) -> &Device {
        &self.device
    }

    fn preprocess(&self, text: &str) -> Result<Encoding> {
        self.tokenizer.encode(text, true, &self.device)
    }

    fn postprocess(&self, logits: &Tensor) -> Result<Prediction> {
        let scores = logits.squeeze(0)?.to_dtype(DType::F32)?.to_vec1::<f32>()?;
        argmax(&scores)
            .map(Prediction::new)
            .ok_or_else(|| Error::msg("The model did not return any valid logit"))
    }

    /// Predicts the sentiment of the `text` of a record.
    ///
    /// # Arguments
    ///
    /// * `input` - The decoded request record.
    ///
    /// # Returns
    ///
    /// The index of the most likely sentiment label.
    pub fn predict(&self, input: &InputData) -> Result<Prediction> {
        let start = Instant::now();
        let text = input.text()?;
        let encoding = self.preprocess(text)?;
        let logits = self.model.forward(ForwardParams::from(&encoding))?;
        let prediction = self.postprocess(&logits)?;
        tracing::debug!(
            "Predicted '{}' ({}) in {:?}",
            prediction
                .label()
                .map(|label| label.as_str())
                .unwrap_or("unknown"),
            prediction.index(),
            start.elapsed()
        );
        Ok(prediction)
    }
}
