use std::path::Path;

use sentiment_handler::{utils::FromPretrainedParameters, Error, Result};
use tokenizers::models::bpe::Vocab;
use tokenizers::models::wordpiece::WordPiece;
use tokenizers::normalizers::BertNormalizer;
use tokenizers::{
    decoders::wordpiece::WordPiece as WordPieceDecoder, pre_tokenizers::bert::BertPreTokenizer,
    processors::template::TemplateProcessing, Tokenizer as CoreTokenizer,
    TokenizerBuilder as CoreTokenizerBuilder,
};

use crate::config::TokenizerConfig;
use crate::from_pretrained::{from_model_dir, from_pretrained, TokenizerInfo};
use crate::impl_tokenizer;
use crate::tokenizer::{Tokenizer, TokenizerBuilder};

/// Number of tokens every sequence is truncated or padded to, special tokens included.
pub const DEFAULT_MAX_LENGTH: usize = 160;
const BERT_CLS_TOKEN: &str = "[CLS]";
const BERT_PAD_TOKEN: &str = "[PAD]";
const BERT_SEP_TOKEN: &str = "[SEP]";
const BERT_UNK_TOKEN: &str = "[UNK]";

/// BertTokenizer
#[derive(Debug)]
pub struct BertTokenizer {
    tokenizer: CoreTokenizer,
    max_length: usize,
    cls_token: Option<String>,
    pad_token: Option<String>,
    sep_token: Option<String>,
    unk_token: Option<String>,
}

impl_tokenizer!(BertTokenizer);

impl BertTokenizer {
    /// Loads the tokenizer stored in the model directory, falling back to the Hugging Face Hub
    /// repository of the backbone when the directory has neither `tokenizer.json` nor
    /// `vocab.txt`.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - The model directory.
    /// * `repo_id` - The Hub repository of the backbone, i.e. `bert-base-cased`.
    /// * `params` - Optional parameters to specify the revision and auth token.
    /// * `max_length` - The length every encoded sequence will have.
    pub fn from_model_dir_or_pretrained<P: AsRef<Path>, S: AsRef<str>>(
        model_dir: P,
        repo_id: S,
        params: Option<FromPretrainedParameters>,
        max_length: usize,
    ) -> Result<Self> {
        let mut tokenizer_info = from_model_dir(model_dir.as_ref())?;
        if tokenizer_info.has_tokenizer_files() {
            tracing::info!(
                "Loading tokenizer from '{}'",
                model_dir.as_ref().display()
            );
        } else {
            tracing::info!(
                "No tokenizer files in '{}', loading tokenizer from '{}'",
                model_dir.as_ref().display(),
                repo_id.as_ref()
            );
            let local_config = tokenizer_info.config.take();
            tokenizer_info = from_pretrained(repo_id, params)?;
            if local_config.is_some() {
                tokenizer_info.config = local_config;
            }
        }

        BertTokenizerBuilder::new(tokenizer_info)
            .with_max_length(max_length)
            .build()
    }
}

/// `BertTokenizer` builder.
pub struct BertTokenizerBuilder {
    tokenizer_info: TokenizerInfo,
    max_length: usize,
}

impl BertTokenizerBuilder {
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    fn build_normalizer(&self, config: Option<&TokenizerConfig>) -> BertNormalizer {
        // The fine-tuned backbone is cased
        BertNormalizer::new(
            true,
            config.and_then(|c| c.tokenize_chinese_chars).unwrap_or(true),
            config.and_then(|c| c.strip_accents),
            config.and_then(|c| c.do_lower_case).unwrap_or(false),
        )
    }

    fn build_pre_tokenizer(&self) -> BertPreTokenizer {
        BertPreTokenizer {}
    }

    fn build_model(&self, vocab: Vocab, unk_token: String) -> Result<WordPiece> {
        WordPiece::builder()
            .vocab(vocab)
            .unk_token(unk_token)
            .continuing_subword_prefix("##".to_string())
            .max_input_chars_per_word(100)
            .build()
            .map_err(|e| Error::TokenizerBuildError(e.to_string()))
    }

    fn build_post_processor(
        &self,
        sep_token: (String, u32),
        cls_token: (String, u32),
    ) -> Result<TemplateProcessing> {
        TemplateProcessing::builder()
            .try_single(format!("{} $A {}", cls_token.0, sep_token.0))
            .map_err(Error::TokenizerBuildError)?
            .try_pair(format!(
                "{} $A:0 {} $B:1 {}:1",
                cls_token.0, sep_token.0, sep_token.0
            ))
            .map_err(Error::TokenizerBuildError)?
            .special_tokens(vec![cls_token, sep_token])
            .build()
            .map_err(|e| Error::TokenizerBuildError(e.to_string()))
    }

    fn build_decoder(&self, config: Option<&TokenizerConfig>) -> WordPieceDecoder {
        let cleanup = config
            .and_then(|c| c.clean_up_tokenization_spaces)
            .unwrap_or(true);
        WordPieceDecoder::new("##".to_string(), cleanup)
    }

    fn special_token<F>(&self, select: F, default: &str) -> String
    where
        F: Fn(&TokenizerConfig) -> Option<&String>,
    {
        self.tokenizer_info
            .get_special_token(select)
            .unwrap_or_else(|| default.to_string())
    }
}

impl TokenizerBuilder<BertTokenizer> for BertTokenizerBuilder {
    fn new(tokenizer_info: TokenizerInfo) -> Self {
        BertTokenizerBuilder {
            tokenizer_info,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }

    fn get_tokenizer_info(&self) -> &TokenizerInfo {
        &self.tokenizer_info
    }

    fn build_tokenizer(&mut self) -> Result<CoreTokenizer> {
        let vocab = self
            .tokenizer_info
            .vocab
            .take()
            .ok_or(Error::TokenizerFilesNotFound)?;
        let cls_token = self.special_token(|c| c.cls_token.as_ref(), BERT_CLS_TOKEN);
        let sep_token = self.special_token(|c| c.sep_token.as_ref(), BERT_SEP_TOKEN);
        let unk_token = self.special_token(|c| c.unk_token.as_ref(), BERT_UNK_TOKEN);
        let cls_token_id = *vocab
            .get(&cls_token)
            .ok_or_else(|| Error::MissingSpecialTokenId(cls_token.clone()))?;
        let sep_token_id = *vocab
            .get(&sep_token)
            .ok_or_else(|| Error::MissingSpecialTokenId(sep_token.clone()))?;

        let config = self.tokenizer_info.get_config();
        let tokenizer = CoreTokenizerBuilder::new()
            .with_model(self.build_model(vocab, unk_token)?)
            .with_normalizer(Some(self.build_normalizer(config)))
            .with_pre_tokenizer(Some(self.build_pre_tokenizer()))
            .with_post_processor(Some(self.build_post_processor(
                (sep_token, sep_token_id),
                (cls_token, cls_token_id),
            )?))
            .with_decoder(Some(self.build_decoder(config)))
            .build()
            .map_err(|e| Error::TokenizerBuildError(e.to_string()))?;

        Ok(CoreTokenizer::from(tokenizer))
    }

    fn build_with_tokenizer(&self, tokenizer: CoreTokenizer) -> Result<BertTokenizer> {
        let mut bert_tokenizer = BertTokenizer {
            tokenizer,
            max_length: self.max_length,
            cls_token: Some(self.special_token(|c| c.cls_token.as_ref(), BERT_CLS_TOKEN)),
            pad_token: Some(self.special_token(|c| c.pad_token.as_ref(), BERT_PAD_TOKEN)),
            sep_token: Some(self.special_token(|c| c.sep_token.as_ref(), BERT_SEP_TOKEN)),
            unk_token: Some(self.special_token(|c| c.unk_token.as_ref(), BERT_UNK_TOKEN)),
        };

        // Every sequence ends up with exactly `max_length` tokens
        bert_tokenizer.set_truncation()?;
        bert_tokenizer.set_padding()?;

        Ok(bert_tokenizer)
    }
}
