//! Key material for RS-signed tokens
//!
//! - [`PrivateKey`]: PKCS#8 DER bytes, zeroized on drop
//! - [`PublicKey`]: X.509 SubjectPublicKeyInfo DER, plus the PKCS#1 form used for verification
//! - [`KeyPair`]: a private/public pair that is checked to belong together
//!
//! Keys are persisted through a [`KeyStore`]: the private key as raw DER bytes and
//! the public key as standard Base64 text.
mod generator;
mod store;

pub use generator::KeyGenerator;
pub use store::{
    DEFAULT_PRIVATE_KEY, DEFAULT_PUBLIC_KEY, FileKeyStore, KeyLocation, KeyStore, MemoryKeyStore,
};

use crate::error::{Error, Result};
use crate::utils::base64url;
use rsa::pkcs1::EncodeRsaPublicKey;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::traits::PublicKeyParts;
use zeroize::Zeroizing;

/// RSA private key (DER-encoded PKCS#8 PrivateKeyInfo)
#[derive(Clone)]
pub struct PrivateKey {
    der: Zeroizing<Vec<u8>>,
}

impl PrivateKey {
    /// Create a private key from PKCS#8 DER bytes
    ///
    /// The encoding is checked to hold an RSA private key.
    pub fn from_pkcs8_der(der: impl Into<Vec<u8>>) -> Result<Self> {
        let der = Zeroizing::new(der.into());
        rsa::RsaPrivateKey::from_pkcs8_der(&der).map_err(|e| Error::MalformedKey {
            kind: "private",
            message: e.to_string(),
        })?;
        Ok(Self { der })
    }

    /// Get the DER-encoded key bytes
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }

    /// Derive the matching public key
    pub fn public_key(&self) -> Result<PublicKey> {
        let private_key =
            rsa::RsaPrivateKey::from_pkcs8_der(&self.der).map_err(|e| Error::MalformedKey {
                kind: "private",
                message: e.to_string(),
            })?;
        PublicKey::from_rsa(private_key.to_public_key())
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("der_len", &self.der.len())
            .finish_non_exhaustive()
    }
}

/// RSA public key (DER-encoded X.509 SubjectPublicKeyInfo)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    spki_der: Vec<u8>,
    pkcs1_der: Vec<u8>,
    modulus_bits: usize,
}

impl PublicKey {
    /// Create a public key from SubjectPublicKeyInfo DER bytes
    pub fn from_spki_der(der: impl AsRef<[u8]>) -> Result<Self> {
        let key = rsa::RsaPublicKey::from_public_key_der(der.as_ref()).map_err(|e| {
            Error::MalformedKey {
                kind: "public",
                message: e.to_string(),
            }
        })?;
        Self::from_rsa(key)
    }

    /// Create a public key from the Base64 text stored in public key files
    pub fn from_base64(text: &str) -> Result<Self> {
        let der = base64url::decode_standard(text).map_err(|e| Error::MalformedKey {
            kind: "public",
            message: e.to_string(),
        })?;
        Self::from_spki_der(der)
    }

    fn from_rsa(key: rsa::RsaPublicKey) -> Result<Self> {
        use rsa::pkcs8::EncodePublicKey;

        let spki_der = key
            .to_public_key_der()
            .map_err(|e| Error::MalformedKey {
                kind: "public",
                message: e.to_string(),
            })?
            .as_bytes()
            .to_vec();
        let pkcs1_der = key
            .to_pkcs1_der()
            .map_err(|e| Error::MalformedKey {
                kind: "public",
                message: e.to_string(),
            })?
            .as_bytes()
            .to_vec();

        Ok(Self {
            spki_der,
            pkcs1_der,
            modulus_bits: key.n().bits(),
        })
    }

    /// Get the SubjectPublicKeyInfo DER bytes
    pub fn as_der(&self) -> &[u8] {
        &self.spki_der
    }

    /// Get the PKCS#1 `RSAPublicKey` DER bytes
    pub fn as_pkcs1_der(&self) -> &[u8] {
        &self.pkcs1_der
    }

    /// Modulus size in bits
    pub fn bits(&self) -> usize {
        self.modulus_bits
    }

    /// Standard Base64 text of the SubjectPublicKeyInfo DER
    pub fn to_base64(&self) -> String {
        base64url::encode_standard(&self.spki_der)
    }

    /// Load a public key from its Base64 text under `id`
    pub fn load(store: &dyn KeyStore, id: &str) -> Result<Self> {
        let bytes = store.load(id)?;
        let text = String::from_utf8(bytes).map_err(|e| Error::MalformedKey {
            kind: "public",
            message: format!("{id} is not Base64 text: {e}"),
        })?;
        Self::from_base64(&text)
    }
}

/// A private key together with its public key
#[derive(Debug, Clone)]
pub struct KeyPair {
    private: PrivateKey,
    public: PublicKey,
}

impl KeyPair {
    /// Pair a private key with a public key
    ///
    /// Fails with [`Error::KeyPairMismatch`] if the public key was not derived
    /// from the private key.
    pub fn new(private: PrivateKey, public: PublicKey) -> Result<Self> {
        if private.public_key()? != public {
            return Err(Error::KeyPairMismatch);
        }
        Ok(Self { private, public })
    }

    /// Build a pair from a private key alone
    pub fn from_private_key(private: PrivateKey) -> Result<Self> {
        let public = private.public_key()?;
        Ok(Self { private, public })
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// Load both halves of a key pair from `store`
    pub fn load(store: &dyn KeyStore, location: &KeyLocation) -> Result<Self> {
        let private = PrivateKey::from_pkcs8_der(store.load(&location.private_key)?)?;
        let public = PublicKey::load(store, &location.public_key)?;
        Self::new(private, public)
    }

    /// Write both halves of the key pair to `store`, replacing existing entries
    pub fn save(&self, store: &dyn KeyStore, location: &KeyLocation) -> Result<()> {
        store.store(&location.private_key, self.private.as_der())?;
        tracing::debug!(id = %location.private_key, "private key written");
        store.store(&location.public_key, self.public.to_base64().as_bytes())?;
        tracing::debug!(id = %location.public_key, "public key (Base64) written");
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{other_key_pair, shared_key_pair};
    use super::*;

    #[test]
    fn test_public_key_base64_round_trip() {
        let public = shared_key_pair().public_key();
        let text = public.to_base64();
        assert!(!text.contains('-') && !text.contains('_'));

        let decoded = PublicKey::from_base64(&format!("{text}\n")).unwrap();
        assert_eq!(&decoded, public);
        assert_eq!(decoded.bits(), 2048);
    }

    #[test]
    fn test_bits_counts_modulus_bits() {
        // Not a whole number of bytes
        let key = rsa::RsaPrivateKey::new(&mut rand::thread_rng(), 2052).unwrap();
        let public = PublicKey::from_rsa(key.to_public_key()).unwrap();
        assert_eq!(public.bits(), 2052);
    }

    #[test]
    fn test_private_key_rejects_garbage() {
        let result = PrivateKey::from_pkcs8_der(vec![0x30, 0x03, 0x02, 0x01, 0x00]);
        assert!(matches!(
            result,
            Err(Error::MalformedKey {
                kind: "private",
                ..
            })
        ));
    }

    #[test]
    fn test_public_key_rejects_garbage() {
        assert!(matches!(
            PublicKey::from_base64("bm90IGEga2V5"),
            Err(Error::MalformedKey { kind: "public", .. })
        ));
        assert!(matches!(
            PublicKey::from_base64("%%%"),
            Err(Error::MalformedKey { kind: "public", .. })
        ));
    }

    #[test]
    fn test_key_pair_mismatch() {
        let private = shared_key_pair().private_key().clone();
        let foreign_public = other_key_pair().public_key().clone();
        assert!(matches!(
            KeyPair::new(private, foreign_public),
            Err(Error::KeyPairMismatch)
        ));
    }

    #[test]
    fn test_key_pair_from_private_key() {
        let private = shared_key_pair().private_key().clone();
        let pair = KeyPair::from_private_key(private).unwrap();
        assert_eq!(pair.public_key(), shared_key_pair().public_key());
    }

    #[test]
    fn test_private_key_debug_hides_material() {
        let rendered = format!("{:?}", shared_key_pair().private_key());
        assert!(rendered.starts_with("PrivateKey"));
        assert!(rendered.contains("der_len"));
    }
}
