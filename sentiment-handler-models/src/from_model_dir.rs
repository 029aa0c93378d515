use std::path::{Path, PathBuf};

use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use sentiment_handler::{
    utils::{find_file, load_model_config, MODEL_CHECKPOINT_FILE, MODEL_CONFIG_FILE},
    Error, Result,
};

use crate::config::BertConfig;
use crate::utils::var_builder::var_builder_from_pth;

/// An struct holding all the information required to load a model from a model directory.
#[derive(Debug)]
pub struct ModelInfo {
    /// The encoder configuration, from `config.json` or the `bert-base-cased` defaults.
    config: BertConfig,
    /// The path to the `best_model.bin` checkpoint.
    checkpoint_path: PathBuf,
}

impl ModelInfo {
    /// Loads the checkpoint weights into a `VarBuilder`.
    ///
    /// # Arguments
    ///
    /// - `dtype` - The data type of the model weights.
    /// - `device` - The device on which the model weights should be loaded.
    ///
    /// # Returns
    ///
    /// A `VarBuilder` containing the model weights.
    pub fn get_var_builder(&self, dtype: DType, device: &Device) -> Result<VarBuilder<'static>> {
        var_builder_from_pth(&self.checkpoint_path, dtype, device)
    }

    /// Gets a reference to the encoder configuration.
    pub fn get_config(&self) -> &BertConfig {
        &self.config
    }

    pub fn get_checkpoint_path(&self) -> &Path {
        &self.checkpoint_path
    }
}

/// Collects the files required to load the classifier from `model_dir`. The checkpoint must be
/// named `best_model.bin`; `config.json` is optional.
///
/// # Arguments
///
/// * `model_dir` - The directory containing the model files.
///
/// # Returns
///
/// A `ModelInfo` struct containing all the information required to load the model.
pub fn from_model_dir<P: AsRef<Path>>(model_dir: P) -> Result<ModelInfo> {
    let model_dir = model_dir.as_ref();

    let checkpoint_path = find_file(model_dir, MODEL_CHECKPOINT_FILE)
        .ok_or_else(|| Error::CheckpointNotFound(model_dir.join(MODEL_CHECKPOINT_FILE)))?;

    let config = match find_file(model_dir, MODEL_CONFIG_FILE) {
        Some(config_file_path) => serde_json::from_value(load_model_config(config_file_path)?)?,
        None => {
            tracing::info!(
                "No `{}` in '{}', using the default encoder configuration",
                MODEL_CONFIG_FILE,
                model_dir.display()
            );
            BertConfig::default()
        }
    };

    Ok(ModelInfo {
        config,
        checkpoint_path,
    })
}
