use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use candle_core::Device;
use candle_nn::{VarBuilder, VarMap};
use sentiment_handler_models::{BertConfig, PreTrainedModel, SentimentClassifier, BERT_DTYPE};
use sentiment_handler_tokenizers::{BertTokenizerBuilder, TokenizerBuilder, TokenizerInfo};

use crate::predictor::Predictor;

pub(crate) const TEST_MAX_LENGTH: usize = 16;

/// Checkpoint stored in `sentiment-handler-models/fixtures`, predicting `2` for "the movie was
/// great".
const TINY_SENTIMENT_FIXTURE: &str = "../sentiment-handler-models/fixtures/tiny-sentiment";

const VOCAB: [&str; 12] = [
    "[PAD]", "[UNK]", "[CLS]", "[SEP]", "[MASK]", "the", "movie", "was", "great", "bad", "good",
    "##s",
];

/// A randomly initialised classifier and a tokenizer over a tiny vocabulary.
pub(crate) fn tiny_predictor() -> Predictor {
    let config = BertConfig {
        vocab_size: VOCAB.len(),
        hidden_size: 16,
        num_hidden_layers: 1,
        num_attention_heads: 2,
        intermediate_size: 32,
        max_position_embeddings: 32,
        ..Default::default()
    };
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, BERT_DTYPE, &Device::Cpu);
    let model = SentimentClassifier::load(vb, config).unwrap();

    let vocab: HashMap<String, u32> = VOCAB
        .iter()
        .enumerate()
        .map(|(i, token)| (token.to_string(), i as u32))
        .collect();
    let tokenizer = BertTokenizerBuilder::new(TokenizerInfo::new(None, None, Some(vocab)))
        .with_max_length(TEST_MAX_LENGTH)
        .build()
        .unwrap();

    Predictor::new(Arc::new(model), Arc::new(tokenizer), &Device::Cpu)
}

/// A model directory holding the tiny checkpoint, its `config.json` and a `vocab.txt` with the
/// test vocabulary.
pub(crate) fn tiny_model_dir() -> tempfile::TempDir {
    let fixture = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(TINY_SENTIMENT_FIXTURE);
    let dir = tempfile::tempdir().unwrap();
    for file in ["best_model.bin", "config.json"] {
        std::fs::copy(fixture.join(file), dir.path().join(file)).unwrap();
    }
    std::fs::write(dir.path().join("vocab.txt"), VOCAB.join("\n")).unwrap();
    dir
}
