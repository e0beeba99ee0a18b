mod traits;

pub mod rsa;

pub use traits::{Algorithm, SignatureAlgorithm, get_algorithm};

use crate::error::{Error, Result};

/// Algorithm identifier from JWT header
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AlgorithmId {
    /// RSA with SHA-256
    #[default]
    RS256,

    /// RSA with SHA-384
    RS384,

    /// RSA with SHA-512
    RS512,
}

impl AlgorithmId {
    /// Parse algorithm string from JWT header
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Err(Error::NoneAlgorithmRejected),

            "RS256" => Ok(AlgorithmId::RS256),
            "RS384" => Ok(AlgorithmId::RS384),
            "RS512" => Ok(AlgorithmId::RS512),

            _ => Err(Error::UnsupportedAlgorithm(s.to_string())),
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmId::RS256 => "RS256",
            AlgorithmId::RS384 => "RS384",
            AlgorithmId::RS512 => "RS512",
        }
    }

    /// Key algorithm family required by this signature algorithm
    pub fn key_algorithm(&self) -> KeyAlgorithm {
        KeyAlgorithm::Rsa
    }
}

impl std::fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Key-pair algorithm family used by the key generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAlgorithm {
    /// RSA key pairs (PKCS#8 private key, X.509 SubjectPublicKeyInfo public key)
    Rsa,
}

impl KeyAlgorithm {
    /// Look up a key algorithm by name (case-insensitive)
    pub fn from_name(name: &str) -> Result<Self> {
        if name.eq_ignore_ascii_case("RSA") {
            Ok(KeyAlgorithm::Rsa)
        } else {
            Err(Error::UnsupportedKeyAlgorithm(name.to_string()))
        }
    }

    /// Canonical name
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyAlgorithm::Rsa => "RSA",
        }
    }
}

impl std::fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy for allowed algorithms
#[derive(Debug, Clone)]
pub struct AlgorithmPolicy {
    allowed: Vec<AlgorithmId>,
}

impl AlgorithmPolicy {
    /// Create a policy that allows only specific algorithms
    pub fn allow_only(algorithms: Vec<AlgorithmId>) -> Self {
        Self {
            allowed: algorithms,
        }
    }

    /// Policy that allows only RS256
    ///
    /// This is the recommended policy for RSA-based validation.
    pub fn rs256_only() -> Self {
        Self::allow_only(vec![AlgorithmId::RS256])
    }

    /// Policy that allows any RSA algorithm (RS256, RS384, RS512)
    pub fn rsa_any() -> Self {
        Self::allow_only(vec![
            AlgorithmId::RS256,
            AlgorithmId::RS384,
            AlgorithmId::RS512,
        ])
    }

    /// Check if an algorithm is allowed
    pub fn is_allowed(&self, algorithm: &AlgorithmId) -> bool {
        self.allowed.contains(algorithm)
    }

    /// Validate algorithm against policy
    pub fn validate(&self, algorithm: &AlgorithmId) -> Result<()> {
        if self.is_allowed(algorithm) {
            Ok(())
        } else {
            Err(Error::AlgorithmNotAllowed {
                found: algorithm.to_string(),
                allowed: self.allowed.iter().map(|a| a.to_string()).collect(),
            })
        }
    }

    /// Get list of allowed algorithms
    pub fn allowed_algorithms(&self) -> &[AlgorithmId] {
        &self.allowed
    }
}

impl From<AlgorithmId> for AlgorithmPolicy {
    fn from(algorithm: AlgorithmId) -> Self {
        Self::allow_only(vec![algorithm])
    }
}

impl Default for AlgorithmPolicy {
    fn default() -> Self {
        Self::rs256_only()
    }
}
