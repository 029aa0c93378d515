use candle_core::{DType, IndexOp, Module, Tensor};
use candle_nn::{
    embedding, layer_norm, linear, ops::softmax, Dropout, Embedding, LayerNorm, Linear,
    VarBuilder,
};
use sentiment_handler::Result;

use crate::config::{BertConfig, HiddenAct};
use crate::utils::attn_mask::get_extended_attention_mask;

pub const BERT_DTYPE: DType = DType::F32;

pub struct HiddenActLayer {
    act: HiddenAct,
}

impl HiddenActLayer {
    fn new(act: HiddenAct) -> Self {
        Self { act }
    }

    fn forward(&self, hidden_states: &Tensor) -> candle_core::Result<Tensor> {
        match self.act {
            HiddenAct::Gelu => hidden_states.gelu_erf(),
            HiddenAct::GeluApproximate => hidden_states.gelu(),
            HiddenAct::Relu => hidden_states.relu(),
        }
    }
}

pub struct BertEmbeddings {
    word_embeddings: Embedding,
    position_embeddings: Embedding,
    token_type_embeddings: Embedding,
    layer_norm: LayerNorm,
    dropout: Dropout,
}

impl BertEmbeddings {
    fn load(vb: VarBuilder, config: &BertConfig) -> Result<Self> {
        let word_embeddings = embedding(
            config.vocab_size,
            config.hidden_size,
            vb.pp("word_embeddings"),
        )?;
        let position_embeddings = embedding(
            config.max_position_embeddings,
            config.hidden_size,
            vb.pp("position_embeddings"),
        )?;
        let token_type_embeddings = embedding(
            config.type_vocab_size,
            config.hidden_size,
            vb.pp("token_type_embeddings"),
        )?;
        let layer_norm = layer_norm(
            config.hidden_size,
            config.layer_norm_eps,
            vb.pp("LayerNorm"),
        )?;
        Ok(Self {
            word_embeddings,
            position_embeddings,
            token_type_embeddings,
            layer_norm,
            dropout: Dropout::new(config.hidden_dropout_prob),
        })
    }

    fn forward(&self, input_ids: &Tensor, token_type_ids: &Tensor) -> Result<Tensor> {
        let (_bsize, seq_len) = input_ids.dims2()?;
        let input_embeddings = self.word_embeddings.forward(input_ids)?;
        let token_type_embeddings = self.token_type_embeddings.forward(token_type_ids)?;
        let position_ids = (0..seq_len as u32).collect::<Vec<_>>();
        let position_ids = Tensor::new(&position_ids[..], input_ids.device())?;
        let embeddings = (&input_embeddings + token_type_embeddings)?
            .broadcast_add(&self.position_embeddings.forward(&position_ids)?)?;
        let embeddings = self.layer_norm.forward(&embeddings)?;
        let embeddings = self.dropout.forward(&embeddings, false)?;
        Ok(embeddings)
    }
}

pub struct BertSelfAttention {
    query: Linear,
    key: Linear,
    value: Linear,
    dropout: Dropout,
    num_attention_heads: usize,
    attention_head_size: usize,
}

impl BertSelfAttention {
    fn load(vb: VarBuilder, config: &BertConfig) -> Result<Self> {
        let attention_head_size = config.hidden_size / config.num_attention_heads;
        let all_head_size = config.num_attention_heads * attention_head_size;
        let dropout = Dropout::new(config.attention_probs_dropout_prob);
        let hidden_size = config.hidden_size;
        let query = linear(hidden_size, all_head_size, vb.pp("query"))?;
        let key = linear(hidden_size, all_head_size, vb.pp("key"))?;
        let value = linear(hidden_size, all_head_size, vb.pp("value"))?;
        Ok(Self {
            query,
            key,
            value,
            dropout,
            num_attention_heads: config.num_attention_heads,
            attention_head_size,
        })
    }

    fn transpose_for_scores(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let mut new_x_shape = xs.dims().to_vec();
        new_x_shape.pop();
        new_x_shape.push(self.num_attention_heads);
        new_x_shape.push(self.attention_head_size);
        let xs = xs.reshape(new_x_shape.as_slice())?.transpose(1, 2)?;
        xs.contiguous()
    }

    fn forward(
        &self,
        hidden_states: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> candle_core::Result<Tensor> {
        let query_layer = self.query.forward(hidden_states)?;
        let key_layer = self.key.forward(hidden_states)?;
        let value_layer = self.value.forward(hidden_states)?;

        let query_layer = self.transpose_for_scores(&query_layer)?;
        let key_layer = self.transpose_for_scores(&key_layer)?;
        let value_layer = self.transpose_for_scores(&value_layer)?;

        let attention_scores = query_layer.matmul(&key_layer.t()?)?;
        let mut attention_scores = (attention_scores / (self.attention_head_size as f64).sqrt())?;
        if let Some(attention_mask) = attention_mask {
            attention_scores = attention_scores.broadcast_add(attention_mask)?;
        }
        let attention_probs = softmax(&attention_scores, candle_core::D::Minus1)?;
        let attention_probs = self.dropout.forward(&attention_probs, false)?;

        let context_layer = attention_probs.matmul(&value_layer)?;
        let context_layer = context_layer.transpose(1, 2)?.contiguous()?;
        context_layer.flatten_from(candle_core::D::Minus2)
    }
}

/// Dense projection followed by a residual connection and layer normalization. Shared by the
/// attention output and the feed-forward output of a layer.
pub struct BertResidualOutput {
    dense: Linear,
    layer_norm: LayerNorm,
    dropout: Dropout,
}

impl BertResidualOutput {
    fn load(vb: VarBuilder, in_dim: usize, config: &BertConfig) -> Result<Self> {
        let dense = linear(in_dim, config.hidden_size, vb.pp("dense"))?;
        let layer_norm = layer_norm(
            config.hidden_size,
            config.layer_norm_eps,
            vb.pp("LayerNorm"),
        )?;
        let dropout = Dropout::new(config.hidden_dropout_prob);
        Ok(Self {
            dense,
            layer_norm,
            dropout,
        })
    }

    fn forward(
        &self,
        hidden_states: &Tensor,
        input_tensor: &Tensor,
    ) -> candle_core::Result<Tensor> {
        let hidden_states = self.dense.forward(hidden_states)?;
        let hidden_states = self.dropout.forward(&hidden_states, false)?;
        self.layer_norm.forward(&(hidden_states + input_tensor)?)
    }
}

pub struct BertLayer {
    self_attention: BertSelfAttention,
    attention_output: BertResidualOutput,
    intermediate: Linear,
    intermediate_act: HiddenActLayer,
    output: BertResidualOutput,
}

impl BertLayer {
    fn load(vb: VarBuilder, config: &BertConfig) -> Result<Self> {
        let attention_vb = vb.pp("attention");
        let self_attention = BertSelfAttention::load(attention_vb.pp("self"), config)?;
        let attention_output =
            BertResidualOutput::load(attention_vb.pp("output"), config.hidden_size, config)?;
        let intermediate = linear(
            config.hidden_size,
            config.intermediate_size,
            vb.pp("intermediate").pp("dense"),
        )?;
        let output = BertResidualOutput::load(vb.pp("output"), config.intermediate_size, config)?;
        Ok(Self {
            self_attention,
            attention_output,
            intermediate,
            intermediate_act: HiddenActLayer::new(config.hidden_act),
            output,
        })
    }

    fn forward(
        &self,
        hidden_states: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> candle_core::Result<Tensor> {
        let self_outputs = self.self_attention.forward(hidden_states, attention_mask)?;
        let attention_output = self.attention_output.forward(&self_outputs, hidden_states)?;
        let intermediate_output = self.intermediate.forward(&attention_output)?;
        let intermediate_output = self.intermediate_act.forward(&intermediate_output)?;
        self.output.forward(&intermediate_output, &attention_output)
    }
}

pub struct BertPooler {
    dense: Linear,
}

impl BertPooler {
    fn load(vb: VarBuilder, config: &BertConfig) -> Result<Self> {
        let dense = linear(config.hidden_size, config.hidden_size, vb.pp("dense"))?;
        Ok(Self { dense })
    }
}

impl Module for BertPooler {
    fn forward(&self, hidden_states: &Tensor) -> candle_core::Result<Tensor> {
        let first_token_tensor = hidden_states.i((.., 0))?;
        let pooled_output = self.dense.forward(&first_token_tensor)?;
        pooled_output.tanh()
    }
}

/// The BERT encoder: embeddings, a stack of transformer layers and the `[CLS]` pooler.
pub struct Bert {
    embeddings: BertEmbeddings,
    layers: Vec<BertLayer>,
    pooler: BertPooler,
    dtype: DType,
}

impl Bert {
    pub fn load(vb: VarBuilder, config: &BertConfig) -> Result<Self> {
        let embeddings = BertEmbeddings::load(vb.pp("embeddings"), config)?;
        let encoder_vb = vb.pp("encoder");
        let layers = (0..config.num_hidden_layers)
            .map(|index| BertLayer::load(encoder_vb.pp(format!("layer.{index}")), config))
            .collect::<Result<Vec<_>>>()?;
        let pooler = BertPooler::load(vb.pp("pooler"), config)?;
        Ok(Self {
            embeddings,
            layers,
            pooler,
            dtype: vb.dtype(),
        })
    }

    /// Returns the hidden states of the last layer with shape `(batch_size, seq_len, hidden)`.
    pub fn forward_return_sequence(
        &self,
        input_ids: &Tensor,
        token_type_ids: Option<&Tensor>,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        let token_type_ids = match token_type_ids {
            Some(token_type_ids) => token_type_ids.clone(),
            None => input_ids.zeros_like()?,
        };
        let attention_mask = attention_mask
            .map(|mask| get_extended_attention_mask(mask, self.dtype))
            .transpose()?;

        let mut hidden_states = self.embeddings.forward(input_ids, &token_type_ids)?;
        for layer in self.layers.iter() {
            hidden_states = layer.forward(&hidden_states, attention_mask.as_ref())?;
        }
        Ok(hidden_states)
    }

    /// Returns the pooled output with shape `(batch_size, hidden)`.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: Option<&Tensor>,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        let sequence_output =
            self.forward_return_sequence(input_ids, token_type_ids, attention_mask)?;
        let pooled_output = self.pooler.forward(&sequence_output)?;
        Ok(pooled_output)
    }
}
