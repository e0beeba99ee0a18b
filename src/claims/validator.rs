use crate::claims::Claims;
use crate::error::{ClaimError, Result};
use crate::utils::now_timestamp;
use std::collections::BTreeMap;

/// Configuration for claims validation
///
/// The default checks `exp`, `nbf` and `iat` when present, with zero leeway, and
/// requires nothing else.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Validate expiration time (exp claim)
    pub validate_exp: bool,

    /// Reject tokens without an exp claim
    pub require_exp: bool,

    /// Validate not-before time (nbf claim)
    pub validate_nbf: bool,

    /// Validate issued-at time (iat claim)
    pub validate_iat: bool,

    /// Clock skew tolerance in seconds
    pub leeway_seconds: u64,

    /// Required issuer value
    pub required_issuer: Option<String>,

    /// Required subject value
    pub required_subject: Option<String>,

    /// Audiences that must all appear in the aud claim
    pub required_audiences: Vec<String>,

    /// Custom claims that must be present, non-empty and equal
    pub required_claims: BTreeMap<String, String>,

    /// Fixed verification time (Unix seconds); the system clock when unset
    pub current_time: Option<i64>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            validate_exp: true,
            require_exp: false,
            validate_nbf: true,
            validate_iat: true,
            leeway_seconds: 0,
            required_issuer: None,
            required_subject: None,
            required_audiences: Vec::new(),
            required_claims: BTreeMap::new(),
            current_time: None,
        }
    }
}

impl ValidationConfig {
    /// Create a new validation config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set clock skew tolerance
    pub fn leeway(mut self, seconds: u64) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    /// Require a specific issuer
    pub fn require_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.required_issuer = Some(issuer.into());
        self
    }

    /// Require a specific subject
    pub fn require_subject(mut self, subject: impl Into<String>) -> Self {
        self.required_subject = Some(subject.into());
        self
    }

    /// Require an audience; may be called repeatedly
    pub fn require_audience(mut self, audience: impl Into<String>) -> Self {
        self.required_audiences.push(audience.into());
        self
    }

    /// Require a custom claim with an exact value
    pub fn require_claim(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.required_claims.insert(name.into(), value.into());
        self
    }

    /// Reject tokens that carry no expiration time
    pub fn require_expiration(mut self) -> Self {
        self.validate_exp = true;
        self.require_exp = true;
        self
    }

    /// Validate as if the current time were `timestamp`
    pub fn at_time(mut self, timestamp: i64) -> Self {
        self.current_time = Some(timestamp);
        self
    }

    fn now(&self) -> i64 {
        self.current_time.unwrap_or_else(now_timestamp)
    }
}

/// Claims validator
pub struct ClaimsValidator;

impl ClaimsValidator {
    /// Validate claims according to configuration
    ///
    /// Checks run in a fixed order: time claims, issuer, subject, audiences, then
    /// custom claims. The first failing check is returned.
    pub fn validate(claims: &Claims, config: &ValidationConfig) -> Result<()> {
        let now = config.now();
        let leeway = config.leeway_seconds;
        let leeway_secs = i64::try_from(leeway).unwrap_or(i64::MAX);

        if config.validate_exp {
            match claims.expiration {
                Some(exp) if now >= exp.saturating_add(leeway_secs) => {
                    return Err(ClaimError::Expired {
                        expired_at: exp,
                        now,
                        leeway,
                    }
                    .into());
                }
                None if config.require_exp => {
                    return Err(ClaimError::MissingClaim("exp".to_string()).into());
                }
                _ => {}
            }
        }

        if config.validate_nbf {
            if let Some(nbf) = claims.not_before {
                if now < nbf.saturating_sub(leeway_secs) {
                    return Err(ClaimError::NotYetValid {
                        not_before: nbf,
                        now,
                        leeway,
                    }
                    .into());
                }
            }
        }

        if config.validate_iat {
            if let Some(iat) = claims.issued_at {
                if iat > now.saturating_add(leeway_secs) {
                    return Err(ClaimError::IssuedInFuture {
                        issued_at: iat,
                        now,
                        leeway,
                    }
                    .into());
                }
            }
        }

        if let Some(expected) = &config.required_issuer {
            if claims.issuer.as_ref() != Some(expected) {
                return Err(ClaimError::IssuerMismatch {
                    expected: expected.clone(),
                    found: claims.issuer.clone(),
                }
                .into());
            }
        }

        if let Some(expected) = &config.required_subject {
            if claims.subject.as_ref() != Some(expected) {
                return Err(ClaimError::SubjectMismatch {
                    expected: expected.clone(),
                    found: claims.subject.clone(),
                }
                .into());
            }
        }

        for expected in &config.required_audiences {
            if claims.audience.is_empty() {
                return Err(ClaimError::MissingClaim("aud".to_string()).into());
            }
            if !claims.has_audience(expected) {
                return Err(ClaimError::AudienceMismatch {
                    expected: expected.clone(),
                    found: claims.audience.clone(),
                }
                .into());
            }
        }

        for (name, expected) in &config.required_claims {
            match claims.claim(name) {
                None => return Err(ClaimError::MissingClaim(name.clone()).into()),
                Some("") => return Err(ClaimError::EmptyClaim(name.clone()).into()),
                Some(found) if found != expected => {
                    return Err(ClaimError::ClaimMismatch {
                        name: name.clone(),
                        expected: expected.clone(),
                        found: found.to_string(),
                    }
                    .into());
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}
