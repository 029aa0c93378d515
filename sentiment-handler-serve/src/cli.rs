use anyhow::Result;
use candle_core::Device;
use clap::Parser;
use sentiment_handler::{get_device, DeviceOption};
use sentiment_handler_pipelines::{HandlerConfig, DEFAULT_TOKENIZER_REPO};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub(crate) struct Cli {
    /// The host to listen on.
    #[arg(long, env = "SENTIMENT_HOST", default_value = "0.0.0.0:8080")]
    host: String,

    /// The directory holding the `best_model.bin` checkpoint.
    #[arg(short, long, env = "SM_MODEL_DIR", default_value = "/opt/ml/model")]
    model_dir: PathBuf,

    /// The device to run the model on: `auto`, `cpu`, `metal`, `cuda` or `cuda:<id>`.
    #[arg(short, long, env = "SENTIMENT_DEVICE", default_value = "auto")]
    device: DeviceOption,

    /// The number of workers to use for inference.
    #[arg(long, env = "SENTIMENT_NUM_WORKERS", default_value = "1")]
    num_workers: usize,

    /// The Hugging Face repository to fetch the tokenizer from if the model directory has none.
    #[arg(long, default_value = DEFAULT_TOKENIZER_REPO)]
    tokenizer_repo: String,
}

impl Cli {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers.max(1)
    }

    /// Get the [`candle_core::Device`] corresponding to the selected device option.
    ///
    /// # Errors
    ///
    /// Returns an error if the requested device is not available.
    pub fn device(&self) -> Result<Device> {
        Ok(get_device(self.device)?)
    }

    pub fn handler_config(&self) -> HandlerConfig {
        HandlerConfig {
            tokenizer_repo: self.tokenizer_repo.clone(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["sentiment-handler-serve"]).unwrap();
        assert_eq!(cli.model_dir(), Path::new("/opt/ml/model"));
        assert_eq!(cli.num_workers(), 1);
        assert_eq!(cli.device, DeviceOption::Auto);
        assert_eq!(cli.handler_config().tokenizer_repo, "bert-base-cased");
    }

    #[test]
    fn test_args() {
        let cli = Cli::try_parse_from([
            "sentiment-handler-serve",
            "--host",
            "127.0.0.1:9000",
            "--model-dir",
            "/tmp/model",
            "--device",
            "cuda:1",
            "--num-workers",
            "4",
        ])
        .unwrap();
        assert_eq!(cli.host(), "127.0.0.1:9000");
        assert_eq!(cli.model_dir(), Path::new("/tmp/model"));
        assert_eq!(cli.device, DeviceOption::Cuda(1));
        assert_eq!(cli.num_workers(), 4);
    }

    #[test]
    fn test_invalid_device() {
        assert!(Cli::try_parse_from(["sentiment-handler-serve", "--device", "tpu"]).is_err());
    }
}
