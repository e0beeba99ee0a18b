use crate::error::Result;
use crate::keys::{PrivateKey, PublicKey};

/// Core algorithm trait that all JWT signature algorithms implement
///
/// This trait defines the contract for producing and checking JWS signatures.
/// The RSA family (RS256, RS384, RS512) implements it.
pub trait Algorithm {
    /// The algorithm identifier (e.g., "RS256")
    fn name(&self) -> &'static str;

    /// Sign the signing input (`header.payload`)
    ///
    /// Returns the Base64URL-encoded signature segment.
    fn sign(&self, signing_input: &str, key: &PrivateKey) -> Result<String>;

    /// Verify a signature
    ///
    /// # Arguments
    /// * `signing_input` - The data that was signed (header.payload)
    /// * `signature` - The Base64URL-encoded signature
    /// * `key` - The public key to use for verification
    fn verify(&self, signing_input: &str, signature: &str, key: &PublicKey) -> Result<()>;
}

/// Type alias for boxed algorithm trait objects
pub type SignatureAlgorithm = Box<dyn Algorithm + Send + Sync>;

/// Get the signature algorithm for the given algorithm ID
pub fn get_algorithm(algorithm: &super::AlgorithmId) -> SignatureAlgorithm {
    match algorithm {
        super::AlgorithmId::RS256 => Box::new(super::rsa::RS256),
        super::AlgorithmId::RS384 => Box::new(super::rsa::RS384),
        super::AlgorithmId::RS512 => Box::new(super::rsa::RS512),
    }
}
