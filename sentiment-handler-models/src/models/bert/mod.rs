pub mod modeling;

pub use modeling::{Bert, BERT_DTYPE};
