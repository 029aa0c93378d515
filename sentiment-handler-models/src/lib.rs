pub mod config;
pub mod from_model_dir;
pub mod model;
pub mod models;
pub mod utils;

pub use config::{BertConfig, HiddenAct, PositionEmbeddingType};
pub use from_model_dir::{from_model_dir, ModelInfo};
pub use model::{ForwardParams, PreTrainedModel};

// BERT
pub use models::bert::{Bert, BERT_DTYPE};

// Sentiment classifier
pub use models::sentiment::{SentimentClassifier, CLASSIFIER_DROPOUT};
