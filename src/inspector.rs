//! Token inspection without cryptographic checks
//!
//! Nothing here verifies a signature. Use it for display and quick structural
//! checks only; acceptance decisions belong to [`TokenVerifier`](crate::TokenVerifier).

use crate::error::Result;
use crate::token::ParsedToken;
use crate::verifier::Expectations;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// Visible header and payload fields of a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSummary {
    pub algorithm: String,
    pub token_type: Option<String>,
    pub issuer: Option<String>,
    pub subject: Option<String>,
    pub audience: Vec<String>,
    pub expires_at: Option<i64>,
    pub issued_at: Option<i64>,
    pub claims: BTreeMap<String, String>,
}

impl TokenSummary {
    /// Expiry rendered as RFC 3339 in UTC
    pub fn expires_at_rfc3339(&self) -> Option<String> {
        self.expires_at.and_then(rfc3339)
    }
}

fn rfc3339(timestamp: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(timestamp, 0).map(|dt| dt.to_rfc3339())
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

impl fmt::Display for TokenSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "JWT token header")?;
        writeln!(f, "  algorithm (alg) : {}", self.algorithm)?;
        writeln!(f, "  type (typ)      : {}", or_dash(self.token_type.as_deref()))?;
        writeln!(f, "JWT token payload")?;
        writeln!(f, "  issuer (iss)    : {}", or_dash(self.issuer.as_deref()))?;
        writeln!(f, "  subject (sub)   : {}", or_dash(self.subject.as_deref()))?;
        writeln!(f, "  audience (aud)  : [{}]", self.audience.join(", "))?;
        match self.expires_at {
            Some(exp) => writeln!(
                f,
                "  expires (exp)   : {exp} ({})",
                rfc3339(exp).as_deref().unwrap_or("out of range")
            )?,
            None => writeln!(f, "  expires (exp)   : -")?,
        }
        if let Some(iat) = self.issued_at {
            writeln!(
                f,
                "  issued (iat)    : {iat} ({})",
                rfc3339(iat).as_deref().unwrap_or("out of range")
            )?;
        }
        for (name, value) in &self.claims {
            writeln!(f, "  {name:<15} : {value}")?;
        }
        Ok(())
    }
}

/// Decode a token's header and payload for display
pub fn inspect(token: &str) -> Result<TokenSummary> {
    let parsed = ParsedToken::from_string(token)?;
    let claims = parsed.unverified_claims()?;
    let header = parsed.header();

    Ok(TokenSummary {
        algorithm: header.algorithm.clone(),
        token_type: header.token_type.clone(),
        issuer: claims.issuer,
        subject: claims.subject,
        audience: claims.audience,
        expires_at: claims.expiration,
        issued_at: claims.issued_at,
        claims: claims.custom,
    })
}

/// Unverified structural check of a token's payload
///
/// Issuer and subject must match ignoring ASCII case, the token's first audience
/// must match one of the expected audiences ignoring ASCII case, `exp` must be
/// after `now`, and every expected custom claim must be present and non-empty.
/// Claim values are not compared.
///
/// Returns `Ok(false)` when a check fails and `Err` only for undecodable tokens.
pub fn check_payload_structure(token: &str, expectations: &Expectations, now: i64) -> Result<bool> {
    let claims = ParsedToken::from_string(token)?.unverified_claims()?;

    let same = |found: Option<&str>, expected: &str| {
        found.is_some_and(|found| found.eq_ignore_ascii_case(expected))
    };

    let issuer_ok = same(claims.issuer.as_deref(), &expectations.issuer);
    let subject_ok = same(claims.subject.as_deref(), &expectations.subject);
    let audience_ok = claims.audience.first().is_some_and(|first| {
        expectations
            .audience
            .iter()
            .any(|expected| first.eq_ignore_ascii_case(expected))
    });
    let expiry_ok = claims.expiration.is_some_and(|exp| exp > now);
    let claims_ok = expectations
        .claims
        .keys()
        .all(|name| claims.claim(name).is_some_and(|value| !value.is_empty()));

    let valid = issuer_ok && subject_ok && audience_ok && expiry_ok && claims_ok;
    if !valid {
        tracing::debug!(
            issuer_ok,
            subject_ok,
            audience_ok,
            expiry_ok,
            claims_ok,
            "payload structure check failed"
        );
    }
    Ok(valid)
}
