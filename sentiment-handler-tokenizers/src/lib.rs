pub mod config;
pub mod encoding;
pub mod from_pretrained;
pub mod tokenizer;
pub mod tokenizers;

pub use crate::encoding::Encoding;
pub use crate::from_pretrained::{from_model_dir, from_pretrained, TokenizerInfo};
pub use crate::tokenizer::{Tokenizer, TokenizerBuilder};
pub use crate::tokenizers::bert::{BertTokenizer, BertTokenizerBuilder, DEFAULT_MAX_LENGTH};
