use crate::algorithm::AlgorithmId;
use crate::error::Result;
use miniserde::Deserialize;
use miniserde::json::{self, Object, Value};

/// JWT header structure
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TokenHeader {
    /// Algorithm used for signing
    #[serde(rename = "alg")]
    pub algorithm: String,

    /// Token type (typically "JWT")
    #[serde(rename = "typ")]
    pub token_type: Option<String>,
}

impl TokenHeader {
    /// Header for a freshly issued token: `{"alg":<alg>,"typ":"JWT"}`
    pub fn new(algorithm: &AlgorithmId) -> Self {
        Self {
            algorithm: algorithm.as_str().to_string(),
            token_type: Some("JWT".to_string()),
        }
    }

    /// Parse algorithm from header
    pub fn parse_algorithm(&self) -> Result<AlgorithmId> {
        AlgorithmId::from_str(&self.algorithm)
    }

    /// Get algorithm as string
    pub fn algorithm_str(&self) -> &str {
        &self.algorithm
    }

    /// Encode as JSON, omitting absent fields
    pub fn to_json(&self) -> String {
        let mut object = Object::new();
        object.insert("alg".to_string(), Value::String(self.algorithm.clone()));
        if let Some(typ) = &self.token_type {
            object.insert("typ".to_string(), Value::String(typ.clone()));
        }
        json::to_string(&Value::Object(object))
    }
}
