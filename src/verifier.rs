//! Two-phase token verification
//!
//! Phase 1 is strict: signature, issuer, subject, every expected audience, every
//! expected custom claim, and expiry with no leeway. Phase 2 walks the expected
//! audiences one at a time, checking only the signature and audience membership
//! with [`LENIENT_LEEWAY_SECONDS`] of clock skew, and reports the first audience
//! the token is addressed to.
//!
//! ```ignore
//! let verifier = TokenVerifier::from_store(&store, "public_base64.key", AlgorithmId::RS256)?;
//! let expectations = Expectations::new("ETELLER", "ETELLER")
//!     .audience(["SalesPlatformCampaigns"])
//!     .claim("ctry", "HU");
//!
//! let verification = verifier.verify(&token, &expectations)?;
//! assert!(verification.is_accepted());
//! ```

use crate::algorithm::{AlgorithmId, AlgorithmPolicy};
use crate::claims::ValidationConfig;
use crate::error::{Error, Result};
use crate::keys::{KeyStore, PublicKey};
use crate::token::{ParsedToken, Token};
use std::collections::BTreeMap;

/// Clock skew tolerated by the per-audience phase
pub const LENIENT_LEEWAY_SECONDS: u64 = 300;

/// Values a token must carry to be accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectations {
    pub issuer: String,
    pub subject: String,
    pub audience: Vec<String>,
    pub claims: BTreeMap<String, String>,
}

impl Expectations {
    pub fn new(issuer: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            subject: subject.into(),
            audience: Vec::new(),
            claims: BTreeMap::new(),
        }
    }

    /// Replace the expected audiences
    pub fn audience<I, S>(mut self, audience: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.audience = audience.into_iter().map(Into::into).collect();
        self
    }

    /// Expect a custom claim with an exact value
    pub fn claim(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.claims.insert(name.into(), value.into());
        self
    }

    fn strict_config(&self) -> ValidationConfig {
        let mut config = ValidationConfig::default()
            .require_expiration()
            .require_issuer(self.issuer.clone())
            .require_subject(self.subject.clone());
        for audience in &self.audience {
            config = config.require_audience(audience.clone());
        }
        for (name, value) in &self.claims {
            config = config.require_claim(name.clone(), value.clone());
        }
        config
    }
}

/// Result of the per-audience phase
#[derive(Debug, Clone, PartialEq)]
pub enum AudienceOutcome {
    /// The token is addressed to `audience`
    Matched { audience: String },

    /// None of the `tried` audiences appear in the token
    NoMatch { tried: Vec<String> },

    /// Verification failed for a reason other than the audience
    Failed(Error),
}

impl AudienceOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self, AudienceOutcome::Matched { .. })
    }

    /// The matched audience, if any
    pub fn matched_audience(&self) -> Option<&str> {
        match self {
            AudienceOutcome::Matched { audience } => Some(audience.as_str()),
            _ => None,
        }
    }
}

/// Outcome of both verification phases
#[derive(Debug, Clone)]
pub struct Verification {
    /// The strictly validated token
    pub token: Token,

    /// Result of the per-audience phase
    pub audience: AudienceOutcome,
}

impl Verification {
    /// True only when the per-audience phase matched
    pub fn is_accepted(&self) -> bool {
        self.audience.is_matched()
    }
}

/// Verifies tokens against a public key
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    public_key: PublicKey,
    policy: AlgorithmPolicy,
    lenient_leeway: u64,
    current_time: Option<i64>,
}

impl TokenVerifier {
    /// Verifier accepting only `algorithm`
    pub fn new(public_key: PublicKey, algorithm: AlgorithmId) -> Self {
        Self {
            public_key,
            policy: AlgorithmPolicy::from(algorithm),
            lenient_leeway: LENIENT_LEEWAY_SECONDS,
            current_time: None,
        }
    }

    /// Load the Base64 public key stored under `id`
    pub fn from_store(store: &dyn KeyStore, id: &str, algorithm: AlgorithmId) -> Result<Self> {
        Ok(Self::new(PublicKey::load(store, id)?, algorithm))
    }

    /// Replace the algorithm policy
    pub fn with_policy(mut self, policy: AlgorithmPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Clock skew for the per-audience phase
    pub fn lenient_leeway(mut self, seconds: u64) -> Self {
        self.lenient_leeway = seconds;
        self
    }

    /// Verify as if the current time were `timestamp`
    pub fn at_time(mut self, timestamp: i64) -> Self {
        self.current_time = Some(timestamp);
        self
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    fn with_clock(&self, config: ValidationConfig) -> ValidationConfig {
        match self.current_time {
            Some(now) => config.at_time(now),
            None => config,
        }
    }

    /// Phase 1: strict verification
    pub fn verify_strict(&self, token: &str, expectations: &Expectations) -> Result<Token> {
        let config = self.with_clock(expectations.strict_config());

        let result = ParsedToken::from_string(token)
            .and_then(|parsed| parsed.verify_signature(&self.public_key, &self.policy))
            .and_then(|verified| verified.validate(&config));

        match &result {
            Ok(_) => tracing::debug!(issuer = %expectations.issuer, "strict verification passed"),
            Err(e) => tracing::warn!(error = %e, "strict verification failed"),
        }
        result
    }

    /// Phase 2: find the first expected audience the token is addressed to
    ///
    /// Audience mismatches move on to the next audience. Any other error stops
    /// the search and is returned as [`AudienceOutcome::Failed`].
    pub fn match_audience(&self, token: &str, expectations: &Expectations) -> AudienceOutcome {
        let parsed = match ParsedToken::from_string(token) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "token could not be parsed");
                return AudienceOutcome::Failed(e);
            }
        };

        let mut tried = Vec::with_capacity(expectations.audience.len());
        for audience in &expectations.audience {
            let config = self.with_clock(
                ValidationConfig::default()
                    .leeway(self.lenient_leeway)
                    .require_audience(audience.clone()),
            );

            let result = parsed
                .clone()
                .verify_signature(&self.public_key, &self.policy)
                .and_then(|verified| verified.validate(&config));

            match result {
                Ok(_) => {
                    tracing::debug!(%audience, "audience matched");
                    return AudienceOutcome::Matched {
                        audience: audience.clone(),
                    };
                }
                Err(e) if e.is_audience_mismatch() => {
                    tracing::debug!(%audience, error = %e, "audience not matched");
                    tried.push(audience.clone());
                }
                Err(e) => {
                    tracing::warn!(%audience, error = %e, "audience verification failed");
                    return AudienceOutcome::Failed(e);
                }
            }
        }

        tracing::warn!(?tried, "no expected audience matched");
        AudienceOutcome::NoMatch { tried }
    }

    /// Run both phases
    ///
    /// Phase 1 errors are returned; the phase 2 outcome is carried in the
    /// [`Verification`].
    pub fn verify(&self, token: &str, expectations: &Expectations) -> Result<Verification> {
        let verified = self.verify_strict(token, expectations)?;
        let audience = self.match_audience(token, expectations);
        Ok(Verification {
            token: verified,
            audience,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClaimError;
    use crate::issuer::{TokenBuilder, TokenIssuer};
    use crate::keys::test_support::{other_key_pair, shared_key_pair};

    const NOW: i64 = 1_700_000_000;

    fn issue(audience: &[&str], exp: i64) -> String {
        let issuer = TokenIssuer::new(shared_key_pair().clone());
        TokenBuilder::new()
            .issuer("ETELLER")
            .subject("ETELLER")
            .audience(audience.iter().copied())
            .expires_at(exp)
            .claim("ctry", "HU")
            .issue(&issuer)
            .unwrap()
    }

    fn expectations() -> Expectations {
        Expectations::new("ETELLER", "ETELLER")
            .audience(["SalesPlatformCampaigns"])
            .claim("ctry", "HU")
    }

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(shared_key_pair().public_key().clone(), AlgorithmId::RS256).at_time(NOW)
    }

    #[test]
    fn test_verify_accepts_matching_token() {
        let token = issue(&["SalesPlatformCampaigns"], NOW + 3600);
        let verification = verifier().verify(&token, &expectations()).unwrap();

        assert!(verification.is_accepted());
        assert_eq!(
            verification.audience.matched_audience(),
            Some("SalesPlatformCampaigns")
        );
        assert_eq!(verification.token.claim("ctry"), Some("HU"));
    }

    #[test]
    fn test_strict_rejects_changed_expectations() {
        let token = issue(&["SalesPlatformCampaigns"], NOW + 3600);
        let verifier = verifier();

        let mut wrong_issuer = expectations();
        wrong_issuer.issuer = "OTHER".to_string();
        assert!(verifier.verify_strict(&token, &wrong_issuer).is_err());

        let mut wrong_subject = expectations();
        wrong_subject.subject = "OTHER".to_string();
        assert!(verifier.verify_strict(&token, &wrong_subject).is_err());

        let wrong_audience = expectations().audience(["Billing"]);
        assert!(verifier.verify_strict(&token, &wrong_audience).is_err());

        let wrong_claim = expectations().claim("ctry", "US");
        assert!(matches!(
            verifier.verify_strict(&token, &wrong_claim),
            Err(Error::ClaimValidationFailed(ClaimError::ClaimMismatch { .. }))
        ));
    }

    #[test]
    fn test_strict_has_no_leeway() {
        let token = issue(&["SalesPlatformCampaigns"], NOW - 10);
        assert!(matches!(
            verifier().verify_strict(&token, &expectations()),
            Err(Error::ClaimValidationFailed(ClaimError::Expired { leeway: 0, .. }))
        ));
    }

    #[test]
    fn test_lenient_phase_tolerates_recent_expiry() {
        let token = issue(&["SalesPlatformCampaigns"], NOW - 10);
        let outcome = verifier().match_audience(&token, &expectations());
        assert!(outcome.is_matched());

        let token = issue(&["SalesPlatformCampaigns"], NOW - 1000);
        let outcome = verifier().match_audience(&token, &expectations());
        assert!(matches!(
            outcome,
            AudienceOutcome::Failed(Error::ClaimValidationFailed(ClaimError::Expired { .. }))
        ));
    }

    #[test]
    fn test_lenient_phase_picks_first_matching_audience() {
        let token = issue(&["Billing", "SalesPlatformCampaigns"], NOW + 3600);
        let expectations = expectations().audience(["Marketing", "SalesPlatformCampaigns", "Billing"]);

        let outcome = verifier().match_audience(&token, &expectations);
        assert_eq!(
            outcome,
            AudienceOutcome::Matched {
                audience: "SalesPlatformCampaigns".to_string()
            }
        );
    }

    #[test]
    fn test_lenient_phase_no_match() {
        let token = issue(&["SalesPlatformCampaigns"], NOW + 3600);
        let expectations = expectations().audience(["Marketing", "Billing"]);

        let outcome = verifier().match_audience(&token, &expectations);
        assert_eq!(
            outcome,
            AudienceOutcome::NoMatch {
                tried: vec!["Marketing".to_string(), "Billing".to_string()]
            }
        );
    }

    #[test]
    fn test_lenient_phase_empty_audience_list() {
        let token = issue(&["SalesPlatformCampaigns"], NOW + 3600);
        let expectations = expectations().audience(Vec::<String>::new());

        let outcome = verifier().match_audience(&token, &expectations);
        assert_eq!(outcome, AudienceOutcome::NoMatch { tried: vec![] });
    }

    #[test]
    fn test_lenient_phase_reports_signature_failure() {
        let token = issue(&["SalesPlatformCampaigns"], NOW + 3600);
        let foreign = TokenVerifier::new(other_key_pair().public_key().clone(), AlgorithmId::RS256)
            .at_time(NOW);

        assert_eq!(
            foreign.match_audience(&token, &expectations()),
            AudienceOutcome::Failed(Error::SignatureInvalid)
        );
        assert!(matches!(
            foreign.verify(&token, &expectations()),
            Err(Error::SignatureInvalid)
        ));
    }

    #[test]
    fn test_policy_rejects_other_algorithm() {
        let issuer = TokenIssuer::new(shared_key_pair().clone()).with_algorithm(AlgorithmId::RS512);
        let token = TokenBuilder::new()
            .issuer("ETELLER")
            .subject("ETELLER")
            .audience(["SalesPlatformCampaigns"])
            .expires_at(NOW + 3600)
            .claim("ctry", "HU")
            .issue(&issuer)
            .unwrap();

        assert!(matches!(
            verifier().verify_strict(&token, &expectations()),
            Err(Error::AlgorithmNotAllowed { .. })
        ));

        let rsa_any = verifier().with_policy(AlgorithmPolicy::rsa_any());
        assert!(rsa_any.verify(&token, &expectations()).unwrap().is_accepted());
    }
}
