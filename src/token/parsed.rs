use crate::algorithm::{AlgorithmId, AlgorithmPolicy, get_algorithm};
use crate::claims::Claims;
use crate::error::{Error, Result};
use crate::keys::PublicKey;
use crate::token::{TokenHeader, VerifiedToken};
use crate::utils::base64url;

/// A JWT token that has been parsed but not yet verified
///
/// This is the first stage in the token pipeline.
/// At this stage, we have:
/// - Split the token into three parts (header, payload, signature)
/// - Decoded and parsed the header JSON
/// - Decoded the payload JSON
///
/// Next step: VerifiedToken (after signature verification)
#[derive(Debug, Clone)]
pub struct ParsedToken {
    header: TokenHeader,
    header_b64: String,
    payload_b64: String,
    signature_b64: String,
    raw_payload: String,
}

impl ParsedToken {
    /// Parse a JWT token from a string
    ///
    /// # Arguments
    /// * `token` - The JWT string in format "header.payload.signature"
    ///
    /// # Example
    /// ```ignore
    /// let token = ParsedToken::from_string("eyJ...").unwrap();
    /// ```
    pub fn from_string(token: &str) -> Result<Self> {
        let parts: Vec<&str> = token.trim().split('.').collect();
        if parts.len() != 3 {
            return Err(Error::InvalidFormat);
        }

        let header_b64 = parts[0].to_string();
        let payload_b64 = parts[1].to_string();
        let signature_b64 = parts[2].to_string();

        let header_json = base64url::decode(&header_b64)?;
        let header: TokenHeader = miniserde::json::from_str(&header_json)
            .map_err(|e| Error::InvalidJson(format!("Failed to parse header: {e}")))?;

        // Claims are only parsed on demand
        let raw_payload = base64url::decode(&payload_b64)?;

        Ok(Self {
            header,
            header_b64,
            payload_b64,
            signature_b64,
            raw_payload,
        })
    }

    /// Get the token header
    pub fn header(&self) -> &TokenHeader {
        &self.header
    }

    /// Get the algorithm from the header
    pub fn algorithm(&self) -> Result<AlgorithmId> {
        self.header.parse_algorithm()
    }

    /// Get the raw payload JSON (before verification)
    ///
    /// Note: You should not trust this data until after signature verification!
    pub fn raw_payload(&self) -> &str {
        &self.raw_payload
    }

    /// Decode the claims without checking the signature
    ///
    /// Only for display and structural checks.
    pub fn unverified_claims(&self) -> Result<Claims> {
        Claims::from_json(&self.raw_payload)
    }

    /// Get the signing input (header.payload)
    pub(crate) fn signing_input(&self) -> String {
        format!("{}.{}", self.header_b64, self.payload_b64)
    }

    /// Get the signature
    pub(crate) fn signature(&self) -> &str {
        &self.signature_b64
    }

    /// Validate algorithm against policy
    pub fn validate_algorithm(&self, policy: &AlgorithmPolicy) -> Result<AlgorithmId> {
        let algorithm = self.algorithm()?;
        policy.validate(&algorithm)?;
        Ok(algorithm)
    }

    /// Verify the signature and move to VerifiedToken state
    ///
    /// The header algorithm must be allowed by `policy` before the key is used.
    pub fn verify_signature(
        self,
        key: &PublicKey,
        policy: &AlgorithmPolicy,
    ) -> Result<VerifiedToken> {
        let algorithm = self.validate_algorithm(policy)?;

        get_algorithm(&algorithm).verify(&self.signing_input(), self.signature(), key)?;

        Ok(VerifiedToken::new(self, algorithm))
    }
}
