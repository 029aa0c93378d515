pub mod from_pretrained;

pub use from_pretrained::{get_repo_api, FromPretrainedParameters};

use crate::Result;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const MODEL_CONFIG_FILE: &str = "config.json";
pub const MODEL_CHECKPOINT_FILE: &str = "best_model.bin";

/// Loads the model configuration from the provided file path.
///
/// # Arguments
///
/// * `file_path` - The path to the `config.json` file containing the model configuration.
///
/// # Returns
///
/// The loaded model configuration.
pub fn load_model_config<P: AsRef<Path>>(file_path: P) -> Result<serde_json::Value> {
    let model_config = fs::read_to_string(file_path)?;
    let model_config = serde_json::from_str(&model_config)?;
    Ok(model_config)
}

/// Returns the path of `file_name` inside `dir` if such a file exists.
pub fn find_file<P: AsRef<Path>>(dir: P, file_name: &str) -> Option<PathBuf> {
    let path = dir.as_ref().join(file_name);
    path.is_file().then_some(path)
}
