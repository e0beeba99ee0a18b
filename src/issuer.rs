//! Token issuing
//!
//! [`TokenIssuer`] signs [`Claims`] with a private key. [`TokenBuilder`] collects
//! the claims with a builder API:
//!
//! ```ignore
//! let issuer = TokenIssuer::from_store(&store, &KeyLocation::default())?;
//!
//! let token = TokenBuilder::new()
//!     .issuer("ETELLER")
//!     .subject("ETELLER")
//!     .audience(["SalesPlatformCampaigns"])
//!     .expires_at(expiry)
//!     .claim("ctry", "HU")
//!     .issue(&issuer)?;
//! ```

use crate::algorithm::{AlgorithmId, get_algorithm};
use crate::claims::{Claims, REGISTERED_CLAIMS};
use crate::error::{Error, Result};
use crate::keys::{KeyLocation, KeyPair, KeyStore, PublicKey};
use crate::token::TokenHeader;
use crate::utils::base64url;
use std::collections::BTreeMap;

/// Signs tokens with a key pair
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    key_pair: KeyPair,
    algorithm: AlgorithmId,
}

impl TokenIssuer {
    /// Create an issuer signing with RS256
    pub fn new(key_pair: KeyPair) -> Self {
        Self {
            key_pair,
            algorithm: AlgorithmId::default(),
        }
    }

    /// Load the key pair from `store`
    ///
    /// Fails with [`Error::KeyPairMismatch`] if the stored halves do not belong together.
    pub fn from_store(store: &dyn KeyStore, location: &KeyLocation) -> Result<Self> {
        Ok(Self::new(KeyPair::load(store, location)?))
    }

    /// Sign with a different algorithm
    pub fn with_algorithm(mut self, algorithm: AlgorithmId) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn algorithm(&self) -> &AlgorithmId {
        &self.algorithm
    }

    /// Public half of the signing key
    pub fn public_key(&self) -> &PublicKey {
        self.key_pair.public_key()
    }

    /// Sign `claims` into a compact JWS string
    pub fn sign(&self, claims: &Claims) -> Result<String> {
        let header = TokenHeader::new(&self.algorithm);
        let signing_input = format!(
            "{}.{}",
            base64url::encode(&header.to_json()),
            base64url::encode(&claims.to_json())
        );

        let signer = get_algorithm(&self.algorithm);
        let signature = signer.sign(&signing_input, self.key_pair.private_key())?;

        tracing::debug!(
            algorithm = signer.name(),
            issuer = ?claims.issuer,
            audience = ?claims.audience,
            "token signed"
        );

        Ok(format!("{signing_input}.{signature}"))
    }
}

/// Builder for token claims
#[derive(Debug, Clone, Default)]
pub struct TokenBuilder {
    claims: Claims,
    custom: BTreeMap<String, String>,
}

impl TokenBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.claims.issuer = Some(issuer.into());
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.claims.subject = Some(subject.into());
        self
    }

    /// Replace the audience list
    pub fn audience<I, S>(mut self, audience: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.claims.audience = audience.into_iter().map(Into::into).collect();
        self
    }

    /// Append one audience
    pub fn add_audience(mut self, audience: impl Into<String>) -> Self {
        self.claims.audience.push(audience.into());
        self
    }

    /// Expiration time as Unix seconds
    pub fn expires_at(mut self, timestamp: i64) -> Self {
        self.claims.expiration = Some(timestamp);
        self
    }

    pub fn issued_at(mut self, timestamp: i64) -> Self {
        self.claims.issued_at = Some(timestamp);
        self
    }

    pub fn not_before(mut self, timestamp: i64) -> Self {
        self.claims.not_before = Some(timestamp);
        self
    }

    pub fn jwt_id(mut self, id: impl Into<String>) -> Self {
        self.claims.jwt_id = Some(id.into());
        self
    }

    /// Add a custom string claim
    ///
    /// Registered claim names are rejected by [`build`](Self::build).
    pub fn claim(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom.insert(name.into(), value.into());
        self
    }

    /// Finish the claims set
    pub fn build(self) -> Result<Claims> {
        let mut claims = self.claims;
        for (name, value) in self.custom {
            if name.is_empty() {
                return Err(Error::InvalidConfiguration(
                    "custom claim name must not be empty".to_string(),
                ));
            }
            if REGISTERED_CLAIMS.contains(&name.as_str()) {
                return Err(Error::InvalidConfiguration(format!(
                    "'{name}' is a registered claim and cannot be set as a custom claim"
                )));
            }
            claims.custom.insert(name, value);
        }
        Ok(claims)
    }

    /// Build the claims and sign them with `issuer`
    pub fn issue(self, issuer: &TokenIssuer) -> Result<String> {
        issuer.sign(&self.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::MemoryKeyStore;
    use crate::keys::test_support::{other_key_pair, shared_key_pair};
    use crate::token::ParsedToken;

    #[test]
    fn test_builder_collects_claims() {
        let claims = TokenBuilder::new()
            .issuer("ETELLER")
            .subject("ETELLER")
            .audience(["SalesPlatformCampaigns"])
            .add_audience("Billing")
            .expires_at(2_000_000_000)
            .issued_at(1_000_000_000)
            .not_before(1_000_000_000)
            .jwt_id("id-1")
            .claim("ctry", "HU")
            .build()
            .unwrap();

        assert_eq!(claims.issuer.as_deref(), Some("ETELLER"));
        assert_eq!(claims.audience, vec!["SalesPlatformCampaigns", "Billing"]);
        assert_eq!(claims.expiration, Some(2_000_000_000));
        assert_eq!(claims.jwt_id.as_deref(), Some("id-1"));
        assert_eq!(claims.claim("ctry"), Some("HU"));
    }

    #[test]
    fn test_builder_rejects_registered_claim() {
        let result = TokenBuilder::new().claim("exp", "never").build();
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));

        let result = TokenBuilder::new().claim("", "x").build();
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_issue_token_layout() {
        let issuer = TokenIssuer::new(shared_key_pair().clone());
        let token = TokenBuilder::new()
            .issuer("ETELLER")
            .claim("ctry", "HU")
            .issue(&issuer)
            .unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(
            base64url::decode(parts[0]).unwrap(),
            r#"{"alg":"RS256","typ":"JWT"}"#
        );

        let parsed = ParsedToken::from_string(&token).unwrap();
        let claims = parsed.unverified_claims().unwrap();
        assert_eq!(claims.issuer.as_deref(), Some("ETELLER"));
        assert_eq!(claims.claim("ctry"), Some("HU"));
    }

    #[test]
    fn test_with_algorithm() {
        let issuer = TokenIssuer::new(shared_key_pair().clone()).with_algorithm(AlgorithmId::RS512);
        assert_eq!(issuer.algorithm(), &AlgorithmId::RS512);

        let token = issuer.sign(&Claims::default()).unwrap();
        let parsed = ParsedToken::from_string(&token).unwrap();
        assert_eq!(parsed.algorithm().unwrap(), AlgorithmId::RS512);
    }

    #[test]
    fn test_from_store() {
        let store = MemoryKeyStore::new();
        let location = KeyLocation::default();
        shared_key_pair().save(&store, &location).unwrap();

        let issuer = TokenIssuer::from_store(&store, &location).unwrap();
        assert_eq!(issuer.public_key(), shared_key_pair().public_key());
    }

    #[test]
    fn test_from_store_mismatched_pair() {
        let store = MemoryKeyStore::new();
        let location = KeyLocation::default();
        shared_key_pair().save(&store, &location).unwrap();
        store
            .store(
                &location.public_key,
                other_key_pair().public_key().to_base64().as_bytes(),
            )
            .unwrap();

        assert!(matches!(
            TokenIssuer::from_store(&store, &location),
            Err(Error::KeyPairMismatch)
        ));
    }

    #[test]
    fn test_from_store_missing_keys() {
        let store = MemoryKeyStore::new();
        assert!(matches!(
            TokenIssuer::from_store(&store, &KeyLocation::default()),
            Err(Error::KeyNotFound(_))
        ));
    }
}
