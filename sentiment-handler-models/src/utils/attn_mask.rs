use candle_core::{DType, Tensor};
use sentiment_handler::Result;

/// Creates a broadcastable attention mask to ignore padding tokens.
///
/// # Arguments
///
/// * `attention_mask` - The attention mask tensor with shape `(batch_size, seq_len)`, where `1`
///   marks a token to attend to and `0` a padding token.
/// * `dtype` - The data type of the attention mask tensor to create.
///
/// # Returns
///
/// The broadcastable attention mask tensor with shape `(batch_size, 1, 1, seq_len)`, holding `0`
/// for attended positions and the lowest finite value of `dtype` for masked ones.
pub fn get_extended_attention_mask(attention_mask: &Tensor, dtype: DType) -> Result<Tensor> {
    let extended_attention_mask = attention_mask
        .to_dtype(DType::U8)?
        .unsqueeze(1)?
        .unsqueeze(2)?;
    let on_true = extended_attention_mask.zeros_like()?.to_dtype(dtype)?;
    let on_false = Tensor::new(f32::MIN, extended_attention_mask.device())?
        .broadcast_as(extended_attention_mask.shape())?
        .to_dtype(dtype)?;
    let extended_attention_mask = extended_attention_mask.where_cond(&on_true, &on_false)?;
    Ok(extended_attention_mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;

    #[test]
    fn test_extended_attention_mask() {
        let mask = Tensor::new(&[[1u8, 1, 0]], &Device::Cpu).unwrap();
        let extended = get_extended_attention_mask(&mask, DType::F32).unwrap();
        assert_eq!(extended.dims(), &[1, 1, 1, 3]);

        let values = extended.flatten_all().unwrap().to_vec1::<f32>().unwrap();
        assert_eq!(values[0], 0.0);
        assert_eq!(values[1], 0.0);
        assert_eq!(values[2], f32::MIN);
    }
}
