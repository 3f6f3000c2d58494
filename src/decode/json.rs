//! Plain JSON decoder.

use serde_json::Value;

use super::{DecodeResult, Decoder, Miss, Protocol};

/// Decoder accepting any valid JSON document.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl JsonDecoder {
    /// Parses `payload` as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Miss::NotJson`] if parsing fails.
    #[inline]
    pub fn parse(payload: &str) -> Result<Value, Miss> {
        serde_json::from_str(payload).map_err(Miss::not_json)
    }
}

impl Decoder for JsonDecoder {
    fn protocol(&self) -> Protocol {
        Protocol::Json
    }

    fn decode(&self, payload: &str) -> Result<DecodeResult, Miss> {
        Self::parse(payload).map(DecodeResult::Json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_json() {
        assert_eq!(JsonDecoder::parse(r#"{"a":[1,2]}"#), Ok(json!({"a": [1, 2]})));
        assert_eq!(JsonDecoder::parse("42"), Ok(json!(42)));
    }

    #[test]
    fn test_invalid_json_is_miss() {
        assert!(matches!(JsonDecoder::parse("hello"), Err(Miss::NotJson(_))));
        assert!(JsonDecoder::parse("").is_err());
        assert!(JsonDecoder::parse("{\"a\":").is_err());
    }
}
