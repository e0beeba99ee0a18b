use crate::algorithm::Algorithm;
use crate::error::{Error, Result};
use crate::keys::{PrivateKey, PublicKey};
use crate::utils::base64url;

// Select crypto backend based on features
#[cfg(feature = "aws-lc-rs")]
use aws_lc_rs::rand::SystemRandom;
#[cfg(feature = "aws-lc-rs")]
use aws_lc_rs::signature::{self, RsaKeyPair, UnparsedPublicKey};
#[cfg(not(feature = "aws-lc-rs"))]
use ring::rand::SystemRandom;
#[cfg(not(feature = "aws-lc-rs"))]
use ring::signature::{self, RsaKeyPair, UnparsedPublicKey};

/// RS256 algorithm (RSA PKCS#1 v1.5 with SHA-256)
pub struct RS256;

/// RS384 algorithm (RSA PKCS#1 v1.5 with SHA-384)
pub struct RS384;

/// RS512 algorithm (RSA PKCS#1 v1.5 with SHA-512)
pub struct RS512;

impl Algorithm for RS256 {
    fn name(&self) -> &'static str {
        "RS256"
    }

    fn sign(&self, signing_input: &str, key: &PrivateKey) -> Result<String> {
        sign_rsa(signing_input, key, &signature::RSA_PKCS1_SHA256)
    }

    fn verify(&self, signing_input: &str, signature: &str, key: &PublicKey) -> Result<()> {
        verify_rsa(
            signing_input,
            signature,
            key.as_pkcs1_der(),
            &signature::RSA_PKCS1_2048_8192_SHA256,
        )
    }
}

impl Algorithm for RS384 {
    fn name(&self) -> &'static str {
        "RS384"
    }

    fn sign(&self, signing_input: &str, key: &PrivateKey) -> Result<String> {
        sign_rsa(signing_input, key, &signature::RSA_PKCS1_SHA384)
    }

    fn verify(&self, signing_input: &str, signature: &str, key: &PublicKey) -> Result<()> {
        verify_rsa(
            signing_input,
            signature,
            key.as_pkcs1_der(),
            &signature::RSA_PKCS1_2048_8192_SHA384,
        )
    }
}

impl Algorithm for RS512 {
    fn name(&self) -> &'static str {
        "RS512"
    }

    fn sign(&self, signing_input: &str, key: &PrivateKey) -> Result<String> {
        sign_rsa(signing_input, key, &signature::RSA_PKCS1_SHA512)
    }

    fn verify(&self, signing_input: &str, signature: &str, key: &PublicKey) -> Result<()> {
        verify_rsa(
            signing_input,
            signature,
            key.as_pkcs1_der(),
            &signature::RSA_PKCS1_2048_8192_SHA512,
        )
    }
}

/// Generic RSA signing
fn sign_rsa(
    signing_input: &str,
    key: &PrivateKey,
    encoding: &'static dyn signature::RsaEncoding,
) -> Result<String> {
    let key_pair = RsaKeyPair::from_pkcs8(key.as_der()).map_err(|e| Error::MalformedKey {
        kind: "private",
        message: e.to_string(),
    })?;

    let rng = SystemRandom::new();
    let mut signature_bytes = vec![0u8; key_pair.public_modulus_len()];
    key_pair
        .sign(encoding, &rng, signing_input.as_bytes(), &mut signature_bytes)
        .map_err(|e| Error::SigningFailed(e.to_string()))?;

    Ok(base64url::encode_bytes(&signature_bytes))
}

/// Generic RSA signature verification
///
/// `public_key_der` is the PKCS#1 `RSAPublicKey` encoding expected by the backend.
fn verify_rsa(
    signing_input: &str,
    signature: &str,
    public_key_der: &[u8],
    algorithm: &'static dyn signature::VerificationAlgorithm,
) -> Result<()> {
    let signature_bytes = base64url::decode_bytes(signature)?;

    let public_key = UnparsedPublicKey::new(algorithm, public_key_der);

    public_key
        .verify(signing_input.as_bytes(), &signature_bytes)
        .map_err(|_| Error::SignatureInvalid)
}
