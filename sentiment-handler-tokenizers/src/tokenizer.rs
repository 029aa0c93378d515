use candle_core::Device;
use sentiment_handler::{Error, Result};
use tokenizers::{
    PaddingDirection, PaddingParams, PaddingStrategy, Tokenizer as CoreTokenizer,
    TruncationParams,
};

use crate::{encoding::Encoding, from_pretrained::TokenizerInfo};

/// A thin wrapper around `tokenizers::Tokenizer` that turns text into model-ready tensors. The
/// length handling (truncation and padding) is configured once, when the tokenizer is built, so
/// encoding only needs a shared reference.
pub trait Tokenizer: std::fmt::Debug + Send + Sync {
    fn get_tokenizer(&self) -> &CoreTokenizer;

    fn get_tokenizer_mut(&mut self) -> &mut CoreTokenizer;

    fn get_max_length(&self) -> usize;
    fn get_cls_token(&self) -> Option<&str>;
    fn get_pad_token(&self) -> Option<&str>;
    fn get_sep_token(&self) -> Option<&str>;
    fn get_unk_token(&self) -> Option<&str>;

    /// Pads every encoded sequence on the right up to the maximum length.
    fn set_padding(&mut self) -> Result<()> {
        let pad_token = self
            .get_pad_token()
            .ok_or_else(|| Error::MissingSpecialToken("pad_token".to_string()))?
            .to_string();

        let pad_id = self
            .get_pad_token_id()
            .ok_or_else(|| Error::MissingSpecialTokenId("pad_token".to_string()))?;

        let strategy = PaddingStrategy::Fixed(self.get_max_length());
        self.get_tokenizer_mut().with_padding(Some(PaddingParams {
            strategy,
            direction: PaddingDirection::Right,
            pad_to_multiple_of: None,
            pad_id,
            pad_type_id: 0,
            pad_token,
        }));

        Ok(())
    }

    /// Truncates every encoded sequence, special tokens included, to the maximum length.
    fn set_truncation(&mut self) -> Result<()> {
        let max_length = self.get_max_length();
        self.get_tokenizer_mut()
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| Error::TokenizerBuildError(e.to_string()))?;
        Ok(())
    }

    /// Get the token ID of a given token.
    ///
    /// # Arguments
    ///
    /// * `token` - A string slice representing the token.
    ///
    /// # Returns
    ///
    /// The token ID if the token exists in the tokenizer, `None` otherwise.
    fn get_token_id(&self, token: &str) -> Option<u32> {
        self.get_tokenizer().token_to_id(token)
    }

    /// Get the token ID of the CLS token.
    fn get_cls_token_id(&self) -> Option<u32> {
        self.get_token_id(self.get_cls_token()?)
    }

    /// Get the token ID of the PAD token.
    fn get_pad_token_id(&self) -> Option<u32> {
        self.get_token_id(self.get_pad_token()?)
    }

    /// Get the token ID of the SEP token.
    fn get_sep_token_id(&self) -> Option<u32> {
        self.get_token_id(self.get_sep_token()?)
    }

    /// Encodes a single sequence.
    ///
    /// # Arguments
    ///
    /// * `input` - The sequence to encode.
    /// * `add_special_tokens` - A flag indicating if special tokens should be added.
    /// * `device` - The device where the tensors are created.
    ///
    /// # Returns
    ///
    /// An `Encoding` with `(1, seq_len)` tensors.
    fn encode(&self, input: &str, add_special_tokens: bool, device: &Device) -> Result<Encoding> {
        let encoding = self
            .get_tokenizer()
            .encode(input, add_special_tokens)
            .map_err(|e| Error::TokenizerEncodingError(e.to_string()))?;
        Encoding::new(encoding, device)
    }

    fn decode(&self, ids: &[u32], skip_special_tokens: bool) -> Result<String> {
        self.get_tokenizer()
            .decode(ids, skip_special_tokens)
            .map_err(|e| Error::TokenizerEncodingError(e.to_string()))
    }
}

/// A trait that defines the methods required to build a `Tokenizer`.
pub trait TokenizerBuilder<T: Tokenizer> {
    fn new(tokenizer_info: TokenizerInfo) -> Self;
    fn get_tokenizer_info(&self) -> &TokenizerInfo;

    /// Builds the core tokenizer from the raw vocabulary, used when there is no `tokenizer.json`.
    fn build_tokenizer(&mut self) -> Result<CoreTokenizer>;

    fn build_with_tokenizer(&self, tokenizer: CoreTokenizer) -> Result<T>;

    fn build(&mut self) -> Result<T> {
        if !self.get_tokenizer_info().has_tokenizer_files() {
            return Err(Error::TokenizerFilesNotFound);
        }

        // Try to build from `tokenizer.json`. Otherwise, build from `vocab.txt`
        let tokenizer_file_path = self.get_tokenizer_info().tokenizer_file_path.clone();
        let tokenizer = match tokenizer_file_path {
            Some(tokenizer_file_path) => {
                tracing::debug!("Building tokenizer from '{}'", tokenizer_file_path.display());
                CoreTokenizer::from_file(tokenizer_file_path)
                    .map_err(|e| Error::TokenizerBuildError(e.to_string()))?
            }
            None => self.build_tokenizer()?,
        };

        self.build_with_tokenizer(tokenizer)
    }
}

/// Implements [`Tokenizer`] for a struct holding a `tokenizer`, its `max_length` and the
/// special tokens as `Option<String>` fields.
#[macro_export]
macro_rules! impl_tokenizer {
    ($tokenizer_type:ty) => {
        impl $crate::tokenizer::Tokenizer for $tokenizer_type {
            fn get_tokenizer(&self) -> &::tokenizers::Tokenizer {
                &self.tokenizer
            }

            fn get_tokenizer_mut(&mut self) -> &mut ::tokenizers::Tokenizer {
                &mut self.tokenizer
            }

            fn get_max_length(&self) -> usize {
                self.max_length
            }

            fn get_cls_token(&self) -> Option<&str> {
                self.cls_token.as_deref()
            }

            fn get_pad_token(&self) -> Option<&str> {
                self.pad_token.as_deref()
            }

            fn get_sep_token(&self) -> Option<&str> {
                self.sep_token.as_deref()
            }

            fn get_unk_token(&self) -> Option<&str> {
                self.unk_token.as_deref()
            }
        }
    };
}
