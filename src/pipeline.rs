//! One end-to-end run: generate keys, issue a token, check it, verify it, inspect it

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::inspector::{TokenSummary, check_payload_structure, inspect};
use crate::issuer::{TokenBuilder, TokenIssuer};
use crate::keys::KeyStore;
use crate::utils::now_timestamp;
use crate::verifier::{TokenVerifier, Verification};

/// Everything a pipeline run produced
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// The issued compact token
    pub token: String,

    /// Result of the unverified payload structure check
    pub structure_valid: bool,

    /// Result of both verification phases
    pub verification: Verification,

    /// Decoded token fields
    pub summary: TokenSummary,
}

impl PipelineReport {
    /// Structure check passed and the token matched an expected audience
    pub fn is_success(&self) -> bool {
        self.structure_valid && self.verification.is_accepted()
    }
}

/// Runs the generate, issue, verify and inspect steps against a key store
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every step once, in order
    ///
    /// Keys are written to `store`, then read back by the issuer and verifier.
    /// A failed strict verification is returned as an error; a failed audience
    /// match is reported in the [`Verification`].
    pub fn run(&self, store: &dyn KeyStore) -> Result<PipelineReport> {
        self.run_at(store, now_timestamp())
    }

    /// Run with a fixed clock
    pub fn run_at(&self, store: &dyn KeyStore, now: i64) -> Result<PipelineReport> {
        let config = &self.config;
        let generator = config.validate()?;

        // 1. Keys
        generator.generate_to(store, &config.location)?;
        tracing::debug!(
            algorithm = %generator.algorithm(),
            bits = generator.bits(),
            private_key = %config.location.private_key,
            public_key = %config.location.public_key,
            "key pair generated"
        );

        // 2. Token
        let issuer =
            TokenIssuer::from_store(store, &config.location)?.with_algorithm(config.algorithm.clone());
        let mut builder = TokenBuilder::new()
            .issuer(config.issuer.clone())
            .subject(config.subject.clone())
            .audience(config.audience.iter().cloned())
            .expires_at(config.expiry_from(now)?);
        for (name, value) in &config.claims {
            builder = builder.claim(name.clone(), value.clone());
        }
        let token = builder.issue(&issuer)?;
        tracing::debug!(%token, "token issued");

        // 3. Payload structure
        let expectations = config.expectations();
        let structure_valid = check_payload_structure(&token, &expectations, now)?;
        tracing::debug!(structure_valid, "payload structure checked");

        // 4. Verification
        let verifier = TokenVerifier::from_store(
            store,
            &config.location.public_key,
            config.algorithm.clone(),
        )?
        .lenient_leeway(config.lenient_leeway)
        .at_time(now);
        let verification = verifier.verify(&token, &expectations)?;
        if verification.is_accepted() {
            tracing::debug!("token verified");
        } else {
            tracing::warn!(outcome = ?verification.audience, "token not accepted for any audience");
        }

        // 5. Inspection
        let summary = inspect(&token)?;

        Ok(PipelineReport {
            token,
            structure_valid,
            verification,
            summary,
        })
    }
}
