use std::path::Path;

use sentiment_handler::{Error, Result};
use serde::{Deserialize, Serialize};

/// Tokenizer configuration
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TokenizerConfig {
    pub clean_up_tokenization_spaces: Option<bool>,
    pub cls_token: Option<String>,
    pub do_lower_case: Option<bool>,
    pub pad_token: Option<String>,
    pub sep_token: Option<String>,
    pub strip_accents: Option<bool>,
    pub tokenize_chinese_chars: Option<bool>,
    pub unk_token: Option<String>,
}

impl TokenizerConfig {
    /// Loads the tokenizer config from a `tokenizer_config.json` file.
    ///
    /// # Arguments
    ///
    /// * `file` - Path to the `tokenizer_config.json` file.
    ///
    /// # Returns
    ///
    /// The tokenizer configuration.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let config = std::fs::read_to_string(file)?;
        let tokenizer_config: TokenizerConfig =
            serde_json::from_str(&config).map_err(Error::wrap)?;
        Ok(tokenizer_config)
    }
}
