use std::path::Path;
use std::sync::Arc;

use candle_core::Device;
use sentiment_handler::{bail, ContentType, FromPretrainedParameters, Result};
use sentiment_handler_models::{PreTrainedModel, SentimentClassifier};
use sentiment_handler_tokenizers::{BertTokenizer, Tokenizer, DEFAULT_MAX_LENGTH};

use crate::input::{decode_input, InputData};
use crate::output::{encode_output, Prediction};
use crate::predictor::Predictor;

/// The Hugging Face Hub repository of the backbone the classifier was fine-tuned from.
pub const DEFAULT_TOKENIZER_REPO: &str = "bert-base-cased";

/// Load-time options of a [`SentimentHandler`].
#[derive(Debug, Clone)]
pub struct HandlerConfig {
    /// Repository to fetch the tokenizer from when the model directory has none.
    pub tokenizer_repo: String,
    /// Number of tokens every input is truncated or padded to.
    pub max_length: usize,
    pub params: Option<FromPretrainedParameters>,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            tokenizer_repo: DEFAULT_TOKENIZER_REPO.to_string(),
            max_length: DEFAULT_MAX_LENGTH,
            params: None,
        }
    }
}

/// Serves sentiment predictions for JSON records of the form `{"text": "..."}`.
///
/// A request goes through [`SentimentHandler::decode_input`], [`SentimentHandler::predict`] and
/// [`SentimentHandler::encode_output`]. The handler is immutable once loaded and can be shared
/// between threads.
pub struct SentimentHandler {
    predictor: Predictor,
}

impl SentimentHandler {
    /// Loads the classifier stored in `model_dir` and its tokenizer.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - The directory holding `best_model.bin`.
    /// * `device` - The device to run the model on.
    /// * `config` - Load-time options.
    ///
    /// # Returns
    ///
    /// The ready to use handler.
    pub fn load<P: AsRef<Path>>(
        model_dir: P,
        device: &Device,
        config: HandlerConfig,
    ) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let model = SentimentClassifier::from_model_dir(model_dir, device)?;

        let max_position_embeddings = model.config().max_position_embeddings;
        if config.max_length > max_position_embeddings {
            bail!(format!(
                "Max length {} is greater than the {} positions supported by the model",
                config.max_length, max_position_embeddings
            ));
        }

        let tokenizer = BertTokenizer::from_model_dir_or_pretrained(
            model_dir,
            &config.tokenizer_repo,
            config.params,
            config.max_length,
        )?;
        tracing::info!("Sentiment handler loaded on device {:?}", device);

        Ok(Self::new(Arc::new(model), Arc::new(tokenizer), device))
    }

    pub fn new(
        model: Arc<dyn PreTrainedModel>,
        tokenizer: Arc<dyn Tokenizer>,
        device: &Device,
    ) -> Self {
        Self {
            predictor: Predictor::new(model, tokenizer, device),
        }
    }

    pub fn from_predictor(predictor: Predictor) -> Self {
        Self { predictor }
    }

    pub fn get_predictor(&self) -> &Predictor {
        &self.predictor
    }

    pub fn decode_input(&self, body: &[u8], content_type: &str) -> Result<InputData> {
        decode_input(body, content_type)
    }

    pub fn predict(&self, input: &InputData) -> Result<Prediction> {
        self.predictor.predict(input)
    }

    pub fn encode_output(
        &self,
        prediction: &Prediction,
        accept: &str,
    ) -> Result<(String, ContentType)> {
        encode_output(prediction, accept)
    }

    /// Decodes, predicts and encodes a single request.
    ///
    /// # Arguments
    ///
    /// * `body` - The raw request body.
    /// * `content_type` - The declared media type of the body.
    /// * `accept` - The requested media type of the response.
    ///
    /// # Returns
    ///
    /// The response body and its content type.
    pub fn invoke(
        &self,
        body: &[u8],
        content_type: &str,
        accept: &str,
    ) -> Result<(String, ContentType)> {
        let input = self.decode_input(body, content_type)?;
        let prediction = self.predict(&input)?;
        self.encode_output(&prediction, accept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{tiny_model_dir, tiny_predictor, TEST_MAX_LENGTH};
    use sentiment_handler::{Error, JSON_CONTENT_TYPE};

    #[test]
    fn test_invoke() {
        let handler = SentimentHandler::from_predictor(tiny_predictor());
        let (body, content_type) = handler
            .invoke(
                br#"{"text": "the movie was great"}"#,
                JSON_CONTENT_TYPE,
                JSON_CONTENT_TYPE,
            )
            .unwrap();
        assert_eq!(content_type, ContentType::Json);
        let index: usize = serde_json::from_str(&body).unwrap();
        assert!(index < 3);
    }

    #[test]
    fn test_invoke_errors() {
        let handler = SentimentHandler::from_predictor(tiny_predictor());
        let body = br#"{"text": "the movie was great"}"#;

        let err = handler.invoke(body, "text/plain", JSON_CONTENT_TYPE).err().unwrap();
        assert!(matches!(err, Error::UnsupportedContentType(_)));

        let err = handler.invoke(body, JSON_CONTENT_TYPE, "text/xml").err().unwrap();
        assert!(err.to_string().contains("text/xml"));

        let err = handler
            .invoke(br#"{"txt": "typo"}"#, JSON_CONTENT_TYPE, JSON_CONTENT_TYPE)
            .err()
            .unwrap();
        assert!(matches!(err, Error::MissingInputKey(_)));
    }

    #[test]
    fn test_tokenizer_max_length() {
        let handler = SentimentHandler::from_predictor(tiny_predictor());
        let tokenizer = handler.get_predictor().get_tokenizer();
        let encoding = tokenizer.encode("the movie", true, &Device::Cpu).unwrap();
        assert_eq!(encoding.get_encoding().len(), TEST_MAX_LENGTH);
        assert_eq!(tokenizer.get_max_length(), TEST_MAX_LENGTH);
    }

    #[test]
    fn test_load_without_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let err = SentimentHandler::load(dir.path(), &Device::Cpu, HandlerConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, Error::CheckpointNotFound(_)));
    }

    #[test]
    fn test_load_and_invoke_checkpoint() {
        let dir = tiny_model_dir();
        let config = HandlerConfig {
            max_length: TEST_MAX_LENGTH,
            ..Default::default()
        };
        let handler = SentimentHandler::load(dir.path(), &Device::Cpu, config).unwrap();
        assert_eq!(
            handler.get_predictor().get_tokenizer().get_max_length(),
            TEST_MAX_LENGTH
        );

        let (body, content_type) = handler
            .invoke(
                br#"{"text": "the movie was great"}"#,
                JSON_CONTENT_TYPE,
                JSON_CONTENT_TYPE,
            )
            .unwrap();
        assert_eq!(content_type, ContentType::Json);
        assert_eq!(body, "2");
    }

    #[test]
    fn test_load_rejects_max_length_above_positions() {
        let dir = tiny_model_dir();
        let config = HandlerConfig {
            max_length: 64,
            ..Default::default()
        };
        let err = SentimentHandler::load(dir.path(), &Device::Cpu, config)
            .err()
            .unwrap();
        assert!(matches!(err, Error::Msg(_)));
    }

    #[test]
    fn test_default_config() {
        let config = HandlerConfig::default();
        assert_eq!(config.tokenizer_repo, "bert-base-cased");
        assert_eq!(config.max_length, 160);
    }
}
