pub mod handler;
pub mod input;
pub mod output;
pub mod predictor;

#[cfg(test)]
mod testing;

pub use handler::{HandlerConfig, SentimentHandler, DEFAULT_TOKENIZER_REPO};
pub use input::{decode_input, InputData, TEXT_KEY};
pub use output::{encode_output, Prediction};
pub use predictor::{argmax, Predictor};
