use crate::algorithm::AlgorithmId;
use crate::claims::{Claims, ClaimsValidator, ValidationConfig};
use crate::error::Result;
use crate::token::{ParsedToken, Token, TokenHeader};

/// A JWT token whose signature has been cryptographically verified
///
/// This is the second stage in the token pipeline.
/// At this stage:
/// - The token has been parsed
/// - The header algorithm passed the algorithm policy
/// - The signature has been cryptographically verified
///
/// Next step: Token (after claims validation)
#[derive(Debug)]
pub struct VerifiedToken {
    header: TokenHeader,
    algorithm: AlgorithmId,
    raw_payload: String,
}

impl VerifiedToken {
    pub(crate) fn new(parsed: ParsedToken, algorithm: AlgorithmId) -> Self {
        Self {
            header: parsed.header().clone(),
            algorithm,
            raw_payload: parsed.raw_payload().to_string(),
        }
    }

    /// Get the token header
    pub fn header(&self) -> &TokenHeader {
        &self.header
    }

    /// Get the algorithm
    pub fn algorithm(&self) -> &AlgorithmId {
        &self.algorithm
    }

    /// Parse the payload as JSON claims
    ///
    /// This parses the claims but does NOT validate them yet.
    pub fn parse_claims(&self) -> Result<Claims> {
        Claims::from_json(&self.raw_payload)
    }

    /// Validate claims and move to the final Token state
    ///
    /// # Example
    /// ```ignore
    /// let config = ValidationConfig::default()
    ///     .require_issuer("ETELLER")
    ///     .require_audience("SalesPlatformCampaigns");
    ///
    /// let token = verified.validate(&config)?;
    /// ```
    pub fn validate(self, config: &ValidationConfig) -> Result<Token> {
        let claims = self.parse_claims()?;

        ClaimsValidator::validate(&claims, config)?;

        Ok(Token::new(self.header, self.algorithm, claims))
    }
}
