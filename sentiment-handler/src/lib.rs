pub mod content_type;
pub mod device;
pub mod error;
pub mod labels;
pub mod utils;

pub use content_type::{ContentType, JSON_CONTENT_TYPE};
pub use device::{get_device, DeviceOption};
pub use error::Error;
pub use labels::{SentimentLabel, NUM_LABELS};
pub use utils::FromPretrainedParameters;

/// A type alias for `Result<T, Error>` for the `sentiment-handler` crate.
pub type Result<T> = std::result::Result<T, Error>;
