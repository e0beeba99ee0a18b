//! # jwtsmith - RSA keys and signed JWTs
//!
//! **jwtsmith** generates RSA key pairs, issues RS-signed JSON Web Tokens with them,
//! verifies those tokens and decodes them for display.
//!
//! ## Overview
//!
//! Key pairs are written to a [`KeyStore`] as two entries: the private key as raw
//! PKCS#8 DER bytes and the public key as standard Base64 text of its X.509
//! SubjectPublicKeyInfo DER. A [`TokenIssuer`] loads the pair back, checks that
//! both halves belong together, and signs claims collected by a [`TokenBuilder`].
//!
//! Verification follows a typestate pipeline: parsing yields a [`ParsedToken`],
//! signature verification against an [`AlgorithmPolicy`] produces a
//! [`VerifiedToken`], and claims validation returns the final [`Token`]. The
//! [`TokenVerifier`] runs this pipeline twice:
//!
//! ```text
//! Phase 1 (strict)       signature, iss, sub, every aud, custom claims, exp (no leeway)
//!     │
//!     ▼
//! Phase 2 (per audience) signature, one aud at a time, exp (300s leeway)
//!     │
//!     ▼
//! AudienceOutcome::{Matched, NoMatch, Failed}
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use jwtsmith::*;
//!
//! let store = FileKeyStore::new("keys");
//! let location = KeyLocation::default();
//! KeyGenerator::new("RSA", 2048)?.generate_to(&store, &location)?;
//!
//! let issuer = TokenIssuer::from_store(&store, &location)?;
//! let token = TokenBuilder::new()
//!     .issuer("ETELLER")
//!     .subject("ETELLER")
//!     .audience(["SalesPlatformCampaigns"])
//!     .expires_at(expiry)
//!     .claim("ctry", "HU")
//!     .issue(&issuer)?;
//!
//! let verifier = TokenVerifier::from_store(&store, &location.public_key, AlgorithmId::RS256)?;
//! let expectations = Expectations::new("ETELLER", "ETELLER")
//!     .audience(["SalesPlatformCampaigns"])
//!     .claim("ctry", "HU");
//! assert!(verifier.verify(&token, &expectations)?.is_accepted());
//!
//! println!("{}", inspect(&token)?);
//! ```
//!
//! ## Features
//!
//! - **`aws-lc-rs`**: Use `aws-lc-rs` instead of `ring` for RSA signing and verification
//!
//! ## Security
//!
//! The `"none"` algorithm is always rejected per [RFC 8725](https://datatracker.ietf.org/doc/html/rfc8725),
//! and the header algorithm must pass the verifier's [`AlgorithmPolicy`] before the
//! key is used. Private key bytes are zeroized on drop.
//!
//! ## References
//!
//! - [RFC 7515](https://datatracker.ietf.org/doc/html/rfc7515) - JSON Web Signature (JWS)
//! - [RFC 7519](https://datatracker.ietf.org/doc/html/rfc7519) - JSON Web Token (JWT)
//! - [RFC 8725](https://datatracker.ietf.org/doc/html/rfc8725) - JSON Web Signature Best Practices

// Core modules
pub mod error;
pub mod utils;

// Algorithms and key material
pub mod algorithm;
pub mod keys;

// Claims and token types
pub mod claims;
pub mod token;

// Issue, verify, inspect
pub mod inspector;
pub mod issuer;
pub mod verifier;

// Fixed end-to-end run
pub mod config;
pub mod pipeline;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use algorithm::{AlgorithmId, AlgorithmPolicy, KeyAlgorithm};
pub use claims::{Claims, ValidationConfig};
pub use config::PipelineConfig;
pub use error::{ClaimError, Error, Result};
pub use inspector::{TokenSummary, check_payload_structure, inspect};
pub use issuer::{TokenBuilder, TokenIssuer};
pub use keys::{
    FileKeyStore, KeyGenerator, KeyLocation, KeyPair, KeyStore, MemoryKeyStore, PrivateKey,
    PublicKey,
};
pub use pipeline::{Pipeline, PipelineReport};
pub use token::{ParsedToken, Token, TokenHeader, VerifiedToken};
pub use verifier::{
    AudienceOutcome, Expectations, LENIENT_LEEWAY_SECONDS, TokenVerifier, Verification,
};
