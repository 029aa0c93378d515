use candle_core::{DType, Device, Tensor};
use sentiment_handler::Result;
use tokenizers::Encoding as CoreEncoding;

/// The encoding of a single sequence, as a batch of one.
#[derive(Debug)]
pub struct Encoding {
    input_ids: Tensor,
    token_type_ids: Tensor,
    attention_mask: Tensor,
    encoding: CoreEncoding,
}

impl Encoding {
    /// Creates the `(1, seq_len)` tensors for the model from a `tokenizers` encoding.
    pub fn new(encoding: CoreEncoding, device: &Device) -> Result<Self> {
        let input_ids = Tensor::new(encoding.get_ids(), device)?.unsqueeze(0)?;
        let token_type_ids = Tensor::new(encoding.get_type_ids(), device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(encoding.get_attention_mask(), device)?
            .to_dtype(DType::U8)?
            .unsqueeze(0)?;
        Ok(Encoding {
            input_ids,
            token_type_ids,
            attention_mask,
            encoding,
        })
    }

    pub fn get_input_ids(&self) -> &Tensor {
        &self.input_ids
    }

    pub fn get_token_type_ids(&self) -> &Tensor {
        &self.token_type_ids
    }

    pub fn get_attention_mask(&self) -> &Tensor {
        &self.attention_mask
    }

    pub fn get_encoding(&self) -> &CoreEncoding {
        &self.encoding
    }
}
