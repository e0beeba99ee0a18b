mod validator;

pub use validator::{ClaimsValidator, ValidationConfig};

use crate::error::{Error, Result};
use miniserde::json::{self, Array, Number, Object, Value};
use std::collections::BTreeMap;

/// Claim names registered by RFC 7519 Section 4.1
///
/// These are carried in dedicated [`Claims`] fields and cannot be used as custom claims.
pub const REGISTERED_CLAIMS: [&str; 7] = ["iss", "sub", "aud", "exp", "nbf", "iat", "jti"];

/// JWT claims: the registered claims plus string-valued custom claims
///
/// This struct represents the registered claims from [RFC 7519 Section 4.1](https://datatracker.ietf.org/doc/html/rfc7519#section-4.1)
/// and any number of private claims such as `ctry`.
///
/// # Examples
///
/// ```ignore
/// let claims = Claims::from_json(r#"{"iss":"ETELLER","aud":"SalesPlatformCampaigns","ctry":"HU"}"#)?;
/// assert_eq!(claims.issuer.as_deref(), Some("ETELLER"));
/// assert_eq!(claims.audience, vec!["SalesPlatformCampaigns".to_string()]);
/// assert_eq!(claims.claim("ctry"), Some("HU"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Claims {
    /// Issuer (iss) - identifies the principal that issued the JWT
    pub issuer: Option<String>,

    /// Subject (sub) - identifies the principal that is the subject of the JWT
    pub subject: Option<String>,

    /// Audience (aud) - identifies the recipients that the JWT is intended for
    ///
    /// Serialized as a plain string when there is exactly one audience.
    pub audience: Vec<String>,

    /// Expiration Time (exp) - seconds since Unix epoch
    pub expiration: Option<i64>,

    /// Not Before (nbf) - the JWT MUST NOT be accepted before this time
    pub not_before: Option<i64>,

    /// Issued At (iat) - the time at which the JWT was issued
    pub issued_at: Option<i64>,

    /// JWT ID (jti) - provides a unique identifier for the JWT
    pub jwt_id: Option<String>,

    /// Custom string claims
    pub custom: BTreeMap<String, String>,
}

impl Claims {
    /// Look up a custom claim
    pub fn claim(&self, name: &str) -> Option<&str> {
        self.custom.get(name).map(String::as_str)
    }

    /// Whether `audience` is one of the token's audiences
    pub fn has_audience(&self, audience: &str) -> bool {
        self.audience.iter().any(|a| a == audience)
    }

    /// Encode as a JSON object
    ///
    /// Absent claims are omitted rather than written as `null`.
    pub fn to_json(&self) -> String {
        let mut object = Object::new();

        if let Some(iss) = &self.issuer {
            object.insert("iss".to_string(), Value::String(iss.clone()));
        }
        if let Some(sub) = &self.subject {
            object.insert("sub".to_string(), Value::String(sub.clone()));
        }
        match self.audience.as_slice() {
            [] => {}
            [single] => {
                object.insert("aud".to_string(), Value::String(single.clone()));
            }
            many => {
                let mut array = Array::new();
                for aud in many {
                    array.push(Value::String(aud.clone()));
                }
                object.insert("aud".to_string(), Value::Array(array));
            }
        }
        for (name, value) in [
            ("exp", self.expiration),
            ("nbf", self.not_before),
            ("iat", self.issued_at),
        ] {
            if let Some(value) = value {
                object.insert(name.to_string(), Value::Number(Number::I64(value)));
            }
        }
        if let Some(jti) = &self.jwt_id {
            object.insert("jti".to_string(), Value::String(jti.clone()));
        }
        for (name, value) in &self.custom {
            object.insert(name.clone(), Value::String(value.clone()));
        }

        json::to_string(&Value::Object(object))
    }

    /// Decode from a JSON object
    ///
    /// `aud` may be a string or an array of strings. Custom claims that are not
    /// strings are skipped.
    pub fn from_json(payload: &str) -> Result<Self> {
        let value: Value = json::from_str(payload)
            .map_err(|e| Error::InvalidJson(format!("Failed to parse claims: {e}")))?;
        let Value::Object(object) = value else {
            return Err(Error::InvalidJson(
                "Claims must be a JSON object".to_string(),
            ));
        };

        let mut claims = Claims::default();
        for (name, value) in object.iter() {
            match name.as_str() {
                "iss" => claims.issuer = string_claim(name, value)?,
                "sub" => claims.subject = string_claim(name, value)?,
                "jti" => claims.jwt_id = string_claim(name, value)?,
                "aud" => claims.audience = audience_claim(value)?,
                "exp" => claims.expiration = timestamp_claim(name, value)?,
                "nbf" => claims.not_before = timestamp_claim(name, value)?,
                "iat" => claims.issued_at = timestamp_claim(name, value)?,
                _ => match value {
                    Value::String(s) => {
                        claims.custom.insert(name.clone(), s.clone());
                    }
                    _ => tracing::debug!(claim = %name, "skipping non-string custom claim"),
                },
            }
        }
        Ok(claims)
    }
}

fn string_claim(name: &str, value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(Error::InvalidJson(format!("Claim '{name}' must be a string"))),
    }
}

fn audience_claim(value: &Value) -> Result<Vec<String>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                _ => Err(Error::InvalidJson(
                    "Claim 'aud' must contain only strings".to_string(),
                )),
            })
            .collect(),
        _ => Err(Error::InvalidJson(
            "Claim 'aud' must be a string or an array of strings".to_string(),
        )),
    }
}

fn timestamp_claim(name: &str, value: &Value) -> Result<Option<i64>> {
    let invalid = || Error::InvalidJson(format!("Claim '{name}' must be an integer timestamp"));
    match value {
        Value::Null => Ok(None),
        Value::Number(Number::I64(n)) => Ok(Some(*n)),
        Value::Number(Number::U64(n)) => i64::try_from(*n).map(Some).map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}
