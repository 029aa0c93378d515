use sentiment_handler::{ContentType, Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The key of the request record holding the text to classify.
pub const TEXT_KEY: &str = "text";

/// A decoded request body. The document is kept as-is; its shape is only checked when the text
/// is extracted for prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputData(Value);

impl InputData {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_inner(self) -> Value {
        self.0
    }

    /// Gets the text to classify from the `text` key of the record.
    pub fn text(&self) -> Result<&str> {
        let value = self
            .0
            .get(TEXT_KEY)
            .ok_or_else(|| Error::MissingInputKey(TEXT_KEY.to_string()))?;
        value.as_str().ok_or_else(|| Error::InvalidInputField {
            key: TEXT_KEY.to_string(),
            expected: "string".to_string(),
        })
    }
}

impl From<Value> for InputData {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Decodes a raw request body according to its declared content type.
///
/// # Arguments
///
/// * `body` - The raw request body.
/// * `content_type` - The declared media type of the body.
///
/// # Returns
///
/// The parsed record, or `Error::UnsupportedContentType` if the media type is not JSON.
pub fn decode_input(body: &[u8], content_type: &str) -> Result<InputData> {
    match ContentType::from_content_type(content_type)? {
        ContentType::Json => Ok(InputData(serde_json::from_slice(body)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_json() {
        let input = decode_input(br#"{"text": "Great movie!"}"#, "application/json").unwrap();
        assert_eq!(input.as_value(), &json!({"text": "Great movie!"}));
        assert_eq!(input.text().unwrap(), "Great movie!");
    }

    #[test]
    fn test_decode_keeps_extra_keys() {
        let input = decode_input(
            br#"{"text": "", "id": 7}"#,
            "Application/JSON; charset=utf-8",
        )
        .unwrap();
        assert_eq!(input.into_inner(), json!({"text": "", "id": 7}));
    }

    #[test]
    fn test_decode_unsupported_content_type() {
        let err = decode_input(b"text=hello", "text/csv").err().unwrap();
        assert!(matches!(err, Error::UnsupportedContentType(ref t) if t == "text/csv"));
    }

    #[test]
    fn test_decode_malformed_json() {
        let err = decode_input(b"{\"text\": ", "application/json").err().unwrap();
        assert!(matches!(err, Error::Wrapped(_)));
    }

    #[test]
    fn test_text_lookup_errors() {
        let missing = InputData::new(json!({"review": "Great movie!"}));
        assert!(matches!(
            missing.text().err().unwrap(),
            Error::MissingInputKey(ref key) if key == "text"
        ));

        let not_a_string = InputData::new(json!({"text": 42}));
        assert!(matches!(
            not_a_string.text().err().unwrap(),
            Error::InvalidInputField { .. }
        ));

        let not_a_record = InputData::new(json!(["Great movie!"]));
        assert!(matches!(
            not_a_record.text().err().unwrap(),
            Error::MissingInputKey(_)
        ));
    }
}
