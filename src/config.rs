//! Pipeline configuration
//!
//! Every value has a default matching the stock `jwtsmith` run; the binary
//! overrides them from flags and `JWTSMITH_*` environment variables.

use crate::algorithm::AlgorithmId;
use crate::error::{Error, Result};
use crate::keys::{KeyGenerator, KeyLocation};
use crate::verifier::{Expectations, LENIENT_LEEWAY_SECONDS};
use chrono::{DateTime, Months, Utc};
use std::collections::BTreeMap;

pub const DEFAULT_KEY_ALGORITHM: &str = "RSA";
pub const DEFAULT_KEY_BITS: usize = 2048;
pub const DEFAULT_ISSUER: &str = "ETELLER";
pub const DEFAULT_SUBJECT: &str = "ETELLER";
pub const DEFAULT_AUDIENCE: &str = "SalesPlatformCampaigns";
pub const DEFAULT_CLAIM_NAME: &str = "ctry";
pub const DEFAULT_CLAIM_VALUE: &str = "HU";
pub const DEFAULT_VALIDITY_MONTHS: u32 = 12;

/// Settings for one generate, issue, verify and inspect run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub key_algorithm: String,
    pub key_bits: usize,
    pub algorithm: AlgorithmId,
    pub location: KeyLocation,
    pub issuer: String,
    pub subject: String,
    pub audience: Vec<String>,
    pub claims: BTreeMap<String, String>,
    pub validity_months: u32,
    pub lenient_leeway: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let mut claims = BTreeMap::new();
        claims.insert(
            DEFAULT_CLAIM_NAME.to_string(),
            DEFAULT_CLAIM_VALUE.to_string(),
        );

        Self {
            key_algorithm: DEFAULT_KEY_ALGORITHM.to_string(),
            key_bits: DEFAULT_KEY_BITS,
            algorithm: AlgorithmId::default(),
            location: KeyLocation::default(),
            issuer: DEFAULT_ISSUER.to_string(),
            subject: DEFAULT_SUBJECT.to_string(),
            audience: vec![DEFAULT_AUDIENCE.to_string()],
            claims,
            validity_months: DEFAULT_VALIDITY_MONTHS,
            lenient_leeway: LENIENT_LEEWAY_SECONDS,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, algorithm: impl Into<String>, bits: usize) -> Self {
        self.key_algorithm = algorithm.into();
        self.key_bits = bits;
        self
    }

    pub fn algorithm(mut self, algorithm: AlgorithmId) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn location(mut self, location: KeyLocation) -> Self {
        self.location = location;
        self
    }

    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn audience<I, S>(mut self, audience: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.audience = audience.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the custom claims with a single claim
    pub fn claim(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.claims.clear();
        self.claims.insert(name.into(), value.into());
        self
    }

    pub fn validity_months(mut self, months: u32) -> Self {
        self.validity_months = months;
        self
    }

    pub fn lenient_leeway(mut self, seconds: u64) -> Self {
        self.lenient_leeway = seconds;
        self
    }

    /// Check the settings before any key is generated
    pub fn validate(&self) -> Result<KeyGenerator> {
        if self.issuer.is_empty() || self.subject.is_empty() {
            return Err(Error::InvalidConfiguration(
                "issuer and subject must not be empty".to_string(),
            ));
        }
        if self.validity_months == 0 {
            return Err(Error::InvalidConfiguration(
                "validity must be at least one month".to_string(),
            ));
        }
        let generator = KeyGenerator::new(&self.key_algorithm, self.key_bits)?;
        if self.algorithm.key_algorithm() != generator.algorithm() {
            return Err(Error::InvalidConfiguration(format!(
                "{} cannot sign with {} keys",
                self.algorithm,
                generator.algorithm()
            )));
        }
        Ok(generator)
    }

    /// What the verifier expects of tokens issued with this configuration
    pub fn expectations(&self) -> Expectations {
        Expectations {
            issuer: self.issuer.clone(),
            subject: self.subject.clone(),
            audience: self.audience.clone(),
            claims: self.claims.clone(),
        }
    }

    /// Expiry for a token issued at `now`: the same instant `validity_months` later
    pub fn expiry_from(&self, now: i64) -> Result<i64> {
        let out_of_range = || {
            Error::InvalidConfiguration(format!(
                "expiry {} months after {now} is out of range",
                self.validity_months
            ))
        };

        DateTime::<Utc>::from_timestamp(now, 0)
            .and_then(|issued| issued.checked_add_months(Months::new(self.validity_months)))
            .map(|expiry| expiry.timestamp())
            .ok_or_else(out_of_range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.key_bits, 2048);
        assert_eq!(config.algorithm, AlgorithmId::RS256);
        assert_eq!(config.location, KeyLocation::default());
        assert_eq!(config.lenient_leeway, 300);

        let expectations = config.expectations();
        assert_eq!(expectations.issuer, "ETELLER");
        assert_eq!(expectations.subject, "ETELLER");
        assert_eq!(expectations.audience, vec!["SalesPlatformCampaigns"]);
        assert_eq!(expectations.claims.get("ctry").map(String::as_str), Some("HU"));
    }

    #[test]
    fn test_builders() {
        let config = PipelineConfig::new()
            .key("rsa", 3072)
            .algorithm(AlgorithmId::RS384)
            .issuer("A")
            .subject("B")
            .audience(["X", "Y"])
            .claim("region", "EU")
            .validity_months(1)
            .lenient_leeway(30);

        let expectations = config.expectations();
        assert_eq!(expectations.audience, vec!["X", "Y"]);
        assert_eq!(expectations.claims.len(), 1);
        assert_eq!(expectations.claims.get("region").map(String::as_str), Some("EU"));

        let generator = config.validate().unwrap();
        assert_eq!(generator.bits(), 3072);
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        assert!(matches!(
            PipelineConfig::new().key("DSA", 2048).validate(),
            Err(Error::UnsupportedKeyAlgorithm(_))
        ));
        assert!(matches!(
            PipelineConfig::new().key("RSA", 512).validate(),
            Err(Error::InvalidKeySize { .. })
        ));
        assert!(matches!(
            PipelineConfig::new().key("RSA", 3000).validate(),
            Err(Error::InvalidKeySize { bits: 3000, .. })
        ));
        assert!(matches!(
            PipelineConfig::new().validity_months(0).validate(),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            PipelineConfig::new().issuer("").validate(),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_expiry_is_calendar_months() {
        let config = PipelineConfig::default();
        // 2024-02-29T12:00:00Z plus twelve months clamps to 2025-02-28T12:00:00Z
        assert_eq!(config.expiry_from(1_709_208_000).unwrap(), 1_740_744_000);

        // 2023-01-15T00:00:00Z plus one month
        let config = config.validity_months(1);
        assert_eq!(config.expiry_from(1_673_740_800).unwrap(), 1_676_419_200);
    }
}
