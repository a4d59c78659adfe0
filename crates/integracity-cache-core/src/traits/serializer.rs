//! Pluggable serialization trait

use crate::CacheError;
use serde::{Serialize, de::DeserializeOwned};

/// Codec for values written to durable storage
pub trait Serializer: Send + Sync + Clone + 'static {
    /// Name of the serializer (for logs)
    fn name(&self) -> &str;

    /// Serialize a value to text
    fn serialize<T: Serialize>(&self, value: &T) -> Result<String, CacheError>;

    /// Deserialize text to a value
    fn deserialize<T: DeserializeOwned>(&self, text: &str) -> Result<T, CacheError>;
}

/// JSON serializer (default)
///
/// Human-readable, and the same format the dashboard kept in page storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize<T: Serialize>(&self, value: &T) -> Result<String, CacheError> {
        serde_json::to_string(value).map_err(|e| CacheError::Serialization(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(&self, text: &str) -> Result<T, CacheError> {
        serde_json::from_str(text).map_err(|e| CacheError::Deserialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_struct() {
        #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
        struct Sirene {
            id: u32,
            status: String,
        }

        let serializer = JsonSerializer;
        let value = Sirene {
            id: 12,
            status: "acionada".to_string(),
        };

        let text = serializer.serialize(&value).unwrap();
        let decoded: Sirene = serializer.deserialize(&text).unwrap();

        assert_eq!(value, decoded);
    }

    #[test]
    fn test_corrupt_input() {
        let result: Result<Vec<u32>, _> = JsonSerializer.deserialize("{not json");
        assert!(matches!(result, Err(CacheError::Deserialization(_))));
    }

    #[test]
    fn test_json_serializer_name() {
        assert_eq!(JsonSerializer.name(), "json");
    }
}
