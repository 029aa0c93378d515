use candle_core::Tensor;
use candle_nn::VarBuilder;
use sentiment_handler::Result;

use crate::config::BertConfig;

/// Parameters for the `forward` method of a `PreTrainedModel`.
#[derive(Debug, Default)]
pub struct ForwardParams<'a> {
    pub input_ids: Option<&'a Tensor>,
    pub attention_mask: Option<&'a Tensor>,
    pub token_type_ids: Option<&'a Tensor>,
}

impl<'a> ForwardParams<'a> {
    pub fn new(
        input_ids: Option<&'a Tensor>,
        attention_mask: Option<&'a Tensor>,
        token_type_ids: Option<&'a Tensor>,
    ) -> Self {
        Self {
            input_ids,
            attention_mask,
            token_type_ids,
        }
    }

    pub fn get_input_ids(&self) -> Option<&'a Tensor> {
        self.input_ids
    }

    pub fn get_attention_mask(&self) -> Option<&'a Tensor> {
        self.attention_mask
    }

    pub fn get_token_type_ids(&self) -> Option<&'a Tensor> {
        self.token_type_ids
    }
}

#[cfg(feature = "tokenizers")]
impl<'a> From<&'a sentiment_handler_tokenizers::Encoding> for ForwardParams<'a> {
    fn from(encoding: &'a sentiment_handler_tokenizers::Encoding) -> Self {
        Self::new(
            Some(encoding.get_input_ids()),
            Some(encoding.get_attention_mask()),
            Some(encoding.get_token_type_ids()),
        )
    }
}

/// Trait for a pre-trained model. Models are immutable once loaded, so they can be shared between
/// threads without synchronization.
pub trait PreTrainedModel: Send + Sync {
    fn load(vb: VarBuilder, config: BertConfig) -> Result<Self>
    where
        Self: Sized;
    fn config(&self) -> &BertConfig;
    /// Runs the model and returns the logits with shape `(batch_size, num_labels)`.
    fn forward(&self, params: ForwardParams) -> Result<Tensor>;
}
