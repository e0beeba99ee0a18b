//! Public Token type for validated JWT tokens
//!
//! A `Token` has passed parsing, the algorithm policy, signature verification and
//! claims validation.

use crate::algorithm::AlgorithmId;
use crate::claims::Claims;
use crate::token::TokenHeader;
use std::collections::BTreeMap;

/// A fully validated JWT token
///
/// # Examples
///
/// ```ignore
/// let token = ParsedToken::from_string(token_str)?
///     .verify_signature(&public_key, &AlgorithmPolicy::rs256_only())?
///     .validate(&ValidationConfig::default().require_issuer("ETELLER"))?;
///
/// println!("Subject: {:?}", token.subject());
/// println!("Country: {:?}", token.claim("ctry"));
/// ```
#[derive(Debug, Clone)]
pub struct Token {
    header: TokenHeader,
    algorithm: AlgorithmId,
    claims: Claims,
}

impl Token {
    pub(crate) fn new(header: TokenHeader, algorithm: AlgorithmId, claims: Claims) -> Self {
        Self {
            header,
            algorithm,
            claims,
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

    /// Get all claims
    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Get the issuer (iss claim)
    pub fn issuer(&self) -> Option<&str> {
        self.claims.issuer.as_deref()
    }

    /// Get the subject (sub claim)
    pub fn subject(&self) -> Option<&str> {
        self.claims.subject.as_deref()
    }

    /// Get the audiences (aud claim)
    pub fn audience(&self) -> &[String] {
        &self.claims.audience
    }

    /// Get the expiration time (exp claim) as Unix timestamp
    pub fn expiration(&self) -> Option<i64> {
        self.claims.expiration
    }

    /// Get the not-before time (nbf claim) as Unix timestamp
    pub fn not_before(&self) -> Option<i64> {
        self.claims.not_before
    }

    /// Get the issued-at time (iat claim) as Unix timestamp
    pub fn issued_at(&self) -> Option<i64> {
        self.claims.issued_at
    }

    /// Get the JWT ID (jti claim)
    pub fn jwt_id(&self) -> Option<&str> {
        self.claims.jwt_id.as_deref()
    }

    /// Get a custom claim
    pub fn claim(&self, name: &str) -> Option<&str> {
        self.claims.claim(name)
    }

    /// Get all custom claims
    pub fn custom_claims(&self) -> &BTreeMap<String, String> {
        &self.claims.custom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_getters() {
        let header = TokenHeader::new(&AlgorithmId::RS384);

        let mut custom = BTreeMap::new();
        custom.insert("ctry".to_string(), "HU".to_string());
        let claims = Claims {
            issuer: Some("https://example.com".to_string()),
            subject: Some("user123".to_string()),
            audience: vec!["api.example.com".to_string()],
            expiration: Some(1234567890),
            not_before: Some(1234567800),
            issued_at: Some(1234567800),
            jwt_id: Some("unique-id".to_string()),
            custom,
        };

        let token = Token::new(header, AlgorithmId::RS384, claims);

        assert_eq!(token.algorithm(), &AlgorithmId::RS384);
        assert_eq!(token.header().algorithm_str(), "RS384");
        assert_eq!(token.issuer(), Some("https://example.com"));
        assert_eq!(token.subject(), Some("user123"));
        assert_eq!(token.audience().to_vec(), vec!["api.example.com".to_string()]);
        assert_eq!(token.expiration(), Some(1234567890));
        assert_eq!(token.not_before(), Some(1234567800));
        assert_eq!(token.issued_at(), Some(1234567800));
        assert_eq!(token.jwt_id(), Some("unique-id"));
        assert_eq!(token.claim("ctry"), Some("HU"));
        assert_eq!(token.custom_claims().len(), 1);
    }
}
