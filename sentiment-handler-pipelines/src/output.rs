use sentiment_handler::{ContentType, Result, SentimentLabel};
use serde::{Deserialize, Serialize};

/// The predicted class index. Serializes as a bare JSON integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Prediction(usize);

impl Prediction {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }

    pub fn label(&self) -> Option<SentimentLabel> {
        SentimentLabel::from_index(self.0)
    }
}

/// Serializes a prediction into the media type requested by the client.
///
/// # Arguments
///
/// * `prediction` - The prediction to serialize.
/// * `accept` - The requested media type of the response.
///
/// # Returns
///
/// The response body and its content type, or `Error::UnsupportedAccept`.
pub fn encode_output(prediction: &Prediction, accept: &str) -> Result<(String, ContentType)> {
    match ContentType::from_accept(accept)? {
        ContentType::Json => Ok((serde_json::to_string(prediction)?, ContentType::Json)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentiment_handler::{Error, JSON_CONTENT_TYPE};

    #[test]
    fn test_encode_json() {
        for index in 0..3 {
            let prediction = Prediction::new(index);
            let (body, content_type) = encode_output(&prediction, JSON_CONTENT_TYPE).unwrap();
            assert_eq!(body, index.to_string());
            assert_eq!(content_type.as_str(), JSON_CONTENT_TYPE);
            assert_eq!(serde_json::from_str::<Prediction>(&body).unwrap(), prediction);
        }
    }

    #[test]
    fn test_encode_unsupported_accept() {
        let err = encode_output(&Prediction::new(2), "text/xml").err().unwrap();
        assert!(matches!(err, Error::UnsupportedAccept(_)));
        assert!(err.to_string().contains("text/xml"));
    }

    #[test]
    fn test_label() {
        assert_eq!(Prediction::new(0).label(), Some(SentimentLabel::Negative));
        assert_eq!(Prediction::new(2).label(), Some(SentimentLabel::Positive));
        assert_eq!(Prediction::new(3).label(), None);
    }
}
