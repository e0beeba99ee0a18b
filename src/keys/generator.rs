use crate::algorithm::KeyAlgorithm;
use crate::error::{Error, Result};
use crate::keys::{KeyLocation, KeyPair, KeyStore, PrivateKey};
use rsa::RsaPrivateKey;
use rsa::pkcs8::EncodePrivateKey;

/// Generates fresh key pairs
///
/// # Example
/// ```ignore
/// let store = FileKeyStore::new(".");
/// let pair = KeyGenerator::new("RSA", 2048)?
///     .generate_to(&store, &KeyLocation::default())?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct KeyGenerator {
    algorithm: KeyAlgorithm,
    bits: usize,
}

impl KeyGenerator {
    /// Smallest RSA modulus accepted for signing
    pub const MIN_RSA_BITS: usize = 2048;

    /// Largest RSA modulus accepted for signing
    pub const MAX_RSA_BITS: usize = 4096;

    /// RSA modulus sizes must be a multiple of this
    pub const RSA_BITS_STEP: usize = 512;

    /// Create a generator for a named key algorithm
    ///
    /// # Errors
    /// - [`Error::UnsupportedKeyAlgorithm`] if `algorithm` is not available
    /// - [`Error::InvalidKeySize`] if `bits` is not a multiple of 512 in 2048..=4096
    pub fn new(algorithm: &str, bits: usize) -> Result<Self> {
        let algorithm = KeyAlgorithm::from_name(algorithm)?;
        match algorithm {
            KeyAlgorithm::Rsa => Self::rsa(bits),
        }
    }

    /// Create an RSA generator
    pub fn rsa(bits: usize) -> Result<Self> {
        if !(Self::MIN_RSA_BITS..=Self::MAX_RSA_BITS).contains(&bits)
            || bits % Self::RSA_BITS_STEP != 0
        {
            return Err(Error::InvalidKeySize {
                bits,
                min: Self::MIN_RSA_BITS,
                max: Self::MAX_RSA_BITS,
            });
        }
        Ok(Self {
            algorithm: KeyAlgorithm::Rsa,
            bits,
        })
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    pub fn bits(&self) -> usize {
        self.bits
    }

    /// Generate a new key pair in memory
    pub fn generate(&self) -> Result<KeyPair> {
        tracing::debug!(algorithm = %self.algorithm, bits = self.bits, "generating key pair");

        let mut rng = rand::thread_rng();
        let rsa_private_key = RsaPrivateKey::new(&mut rng, self.bits)
            .map_err(|e| Error::KeyGeneration(e.to_string()))?;

        let pkcs8_doc = rsa_private_key
            .to_pkcs8_der()
            .map_err(|e| Error::KeyGeneration(format!("PKCS#8 encoding failed: {e}")))?;

        let private = PrivateKey::from_pkcs8_der(pkcs8_doc.as_bytes())?;
        KeyPair::from_private_key(private)
    }

    /// Generate a new key pair and write it to `store`
    ///
    /// Existing entries at `location` are overwritten.
    pub fn generate_to(&self, store: &dyn KeyStore, location: &KeyLocation) -> Result<KeyPair> {
        let pair = self.generate()?;
        pair.save(store, location)?;
        Ok(pair)
    }
}
