use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use sentiment_handler::{
    utils::{find_file, get_repo_api, FromPretrainedParameters},
    Result,
};

use crate::config::TokenizerConfig;

const TOKENIZER_CONFIG_FILE: &str = "tokenizer_config.json";
const TOKENIZER_FILE: &str = "tokenizer.json";
const VOCAB_TXT_FILE: &str = "vocab.txt";

/// A struct containing all the required information to load a tokenizer model.
#[derive(Debug, Default)]
pub struct TokenizerInfo {
    /// The configuration of the tokenizer.
    pub config: Option<TokenizerConfig>,
    /// The path to the `tokenizer.json` file if it exists.
    pub tokenizer_file_path: Option<PathBuf>,
    /// The WordPiece vocabulary of the tokenizer.
    pub vocab: Option<HashMap<String, u32>>,
}

impl TokenizerInfo {
    pub fn new(
        config: Option<TokenizerConfig>,
        tokenizer_file_path: Option<PathBuf>,
        vocab: Option<HashMap<String, u32>>,
    ) -> Self {
        TokenizerInfo {
            config,
            tokenizer_file_path,
            vocab,
        }
    }

    pub fn get_config(&self) -> Option<&TokenizerConfig> {
        self.config.as_ref()
    }

    /// Whether a tokenizer can be built from this information.
    pub fn has_tokenizer_files(&self) -> bool {
        self.tokenizer_file_path.is_some() || self.vocab.is_some()
    }

    /// Gets the `String` representation of a special token from the tokenizer configuration.
    pub fn get_special_token<F>(&self, select: F) -> Option<String>
    where
        F: Fn(&TokenizerConfig) -> Option<&String>,
    {
        self.config.as_ref().and_then(select).cloned()
    }
}

/// Loads the vocabulary of the tokenizer model from a text file.
///
/// # Arguments
///
/// - `file_path` - The path to the vocabulary file.
///
/// # Returns
///
/// The vocabulary as a `HashMap` where the key is the token and the value is the index.
pub fn load_vocab_txt<P: AsRef<Path>>(file_path: P) -> Result<HashMap<String, u32>> {
    let vocab = fs::read_to_string(file_path)?.lines().enumerate().fold(
        HashMap::<String, u32>::new(),
        |mut map, (idx, line)| {
            map.insert(line.to_string(), idx as u32);
            map
        },
    );
    Ok(vocab)
}

/// Gets the tokenizer files stored next to the model checkpoint. Missing files are reported as
/// `None`, see [`TokenizerInfo::has_tokenizer_files`].
///
/// # Arguments
///
/// * `model_dir` - The model directory.
///
/// # Returns
///
/// A `TokenizerInfo` struct with the files found in the directory.
pub fn from_model_dir<P: AsRef<Path>>(model_dir: P) -> Result<TokenizerInfo> {
    let model_dir = model_dir.as_ref();

    let config = find_file(model_dir, TOKENIZER_CONFIG_FILE)
        .map(TokenizerConfig::from_file)
        .transpose()?;
    let tokenizer_file_path = find_file(model_dir, TOKENIZER_FILE);
    let vocab = find_file(model_dir, VOCAB_TXT_FILE)
        .map(load_vocab_txt)
        .transpose()?;

    Ok(TokenizerInfo::new(config, tokenizer_file_path, vocab))
}

/// Gets all the information and files needed to load a tokenizer from a Hugging Face Hub
/// repository.
///
/// # Arguments
///
/// * `repo_id` - The ID of the repository to load the tokenizer from.
/// * `params` - Optional parameters to specify the revision and auth token.
///
/// # Returns
///
/// A `TokenizerInfo` struct containing all the information needed to load a tokenizer.
pub fn from_pretrained<I: AsRef<str>>(
    repo_id: I,
    params: Option<FromPretrainedParameters>,
) -> Result<TokenizerInfo> {
    let api = get_repo_api(repo_id.as_ref(), params)?;

    let config = match api.get(TOKENIZER_CONFIG_FILE) {
        Ok(tokenizer_config_file) => Some(TokenizerConfig::from_file(tokenizer_config_file)?),
        Err(_) => None,
    };

    // Try to load `tokenizer.json` config
    let tokenizer_file_path = api.get(TOKENIZER_FILE).ok();

    // Only needed when there is no `tokenizer.json`
    let vocab = match tokenizer_file_path {
        Some(_) => None,
        None => match api.get(VOCAB_TXT_FILE) {
            Ok(vocab_txt_file_path) => Some(load_vocab_txt(vocab_txt_file_path)?),
            Err(_) => None,
        },
    };

    Ok(TokenizerInfo::new(config, tokenizer_file_path, vocab))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_vocab_txt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(VOCAB_TXT_FILE);
        fs::write(&path, "[PAD]\n[UNK]\nhello\n##s\n").unwrap();

        let vocab = load_vocab_txt(path).unwrap();
        assert_eq!(vocab.len(), 4);
        assert_eq!(vocab["[PAD]"], 0);
        assert_eq!(vocab["##s"], 3);
    }

    #[test]
    fn test_from_model_dir() {
        let dir = tempfile::tempdir().unwrap();
        let info = from_model_dir(dir.path()).unwrap();
        assert!(!info.has_tokenizer_files());
        assert!(info.get_config().is_none());

        fs::write(dir.path().join(VOCAB_TXT_FILE), "[PAD]\n[UNK]\n").unwrap();
        fs::write(
            dir.path().join(TOKENIZER_CONFIG_FILE),
            r#"{"do_lower_case": true, "unk_token": "[UNK]"}"#,
        )
        .unwrap();
        let info = from_model_dir(dir.path()).unwrap();
        assert!(info.has_tokenizer_files());
        assert!(info.tokenizer_file_path.is_none());
        assert_eq!(
            info.get_special_token(|config| config.unk_token.as_ref()),
            Some("[UNK]".to_string())
        );
    }
}
