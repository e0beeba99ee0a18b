//! Error types for key handling and JWT processing
//!
//! Every fallible operation in the crate returns [`Result`]. Claim validation
//! failures are nested in [`ClaimError`] so callers can match on the exact check
//! that rejected a token.

use thiserror::Error;

/// Errors that can occur while generating keys, issuing, verifying or decoding tokens
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============================================================================
    // Format Errors
    // ============================================================================
    #[error("Invalid JWT format: expected three Base64URL parts separated by '.'")]
    InvalidFormat,

    #[error("Base64 decoding failed: {0}")]
    InvalidBase64(String),

    #[error("JSON parsing failed: {0}")]
    InvalidJson(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    // ============================================================================
    // Algorithm Errors
    // ============================================================================
    #[error("Algorithm '{0}' is not supported")]
    UnsupportedAlgorithm(String),

    #[error("The 'none' algorithm is rejected for security reasons (RFC 8725)")]
    NoneAlgorithmRejected,

    #[error("Algorithm '{found}' not allowed. Allowed: {allowed:?}")]
    AlgorithmNotAllowed { found: String, allowed: Vec<String> },

    #[error("Key algorithm '{0}' is not available")]
    UnsupportedKeyAlgorithm(String),

    // ============================================================================
    // Key Errors
    // ============================================================================
    #[error("Invalid key size: {bits} bits (supported: multiples of 512 from {min} to {max} bits)")]
    InvalidKeySize { bits: usize, min: usize, max: usize },

    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("Key '{0}' not found")]
    KeyNotFound(String),

    #[error("Key storage I/O failed for '{id}': {message}")]
    KeyIo { id: String, message: String },

    #[error("Malformed {kind} key: {message}")]
    MalformedKey { kind: &'static str, message: String },

    #[error("Private key and public key do not belong to the same key pair")]
    KeyPairMismatch,

    // ============================================================================
    // Signature Errors
    // ============================================================================
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Signature verification failed")]
    SignatureInvalid,

    // ============================================================================
    // Claim Errors
    // ============================================================================
    #[error("Claim validation failed: {0}")]
    ClaimValidationFailed(#[from] ClaimError),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Specific claim validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClaimError {
    #[error("Token expired at {expired_at} (now: {now}, leeway: {leeway}s)")]
    Expired {
        expired_at: i64,
        now: i64,
        leeway: u64,
    },

    #[error("Token not valid until {not_before} (now: {now}, leeway: {leeway}s)")]
    NotYetValid {
        not_before: i64,
        now: i64,
        leeway: u64,
    },

    #[error("Token issued in future at {issued_at} (now: {now}, leeway: {leeway}s)")]
    IssuedInFuture {
        issued_at: i64,
        now: i64,
        leeway: u64,
    },

    #[error("Issuer mismatch: expected '{expected}', found {found:?}")]
    IssuerMismatch {
        expected: String,
        found: Option<String>,
    },

    #[error("Subject mismatch: expected '{expected}', found {found:?}")]
    SubjectMismatch {
        expected: String,
        found: Option<String>,
    },

    #[error("Audience mismatch: expected '{expected}', found {found:?}")]
    AudienceMismatch {
        expected: String,
        found: Vec<String>,
    },

    #[error("Claim '{name}' mismatch: expected '{expected}', found '{found}'")]
    ClaimMismatch {
        name: String,
        expected: String,
        found: String,
    },

    #[error("Claim '{0}' is empty")]
    EmptyClaim(String),

    #[error("Required claim '{0}' is missing")]
    MissingClaim(String),
}

/// Result type alias for jwtsmith operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error was raised by an audience check
    ///
    /// The lenient verification phase uses this to tell "token not addressed to
    /// this audience" apart from every other failure.
    pub fn is_audience_mismatch(&self) -> bool {
        match self {
            Error::ClaimValidationFailed(ClaimError::AudienceMismatch { .. }) => true,
            Error::ClaimValidationFailed(ClaimError::MissingClaim(name)) => name == "aud",
            _ => false,
        }
    }
}
