use crate::error::{Error, Result};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Default name of the private key entry
pub const DEFAULT_PRIVATE_KEY: &str = "private.key";

/// Default name of the public key entry
pub const DEFAULT_PUBLIC_KEY: &str = "public_base64.key";

/// Persistent storage for key material, addressed by string identifiers
pub trait KeyStore: Send + Sync {
    /// Read all bytes stored under `id`
    ///
    /// Returns [`Error::KeyNotFound`] if nothing is stored under `id`.
    fn load(&self, id: &str) -> Result<Vec<u8>>;

    /// Store `bytes` under `id`, replacing any previous content
    fn store(&self, id: &str, bytes: &[u8]) -> Result<()>;
}

/// Where the two halves of a key pair live in a [`KeyStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLocation {
    /// Identifier of the PKCS#8 DER private key
    pub private_key: String,

    /// Identifier of the Base64 SubjectPublicKeyInfo public key
    pub public_key: String,
}

impl KeyLocation {
    pub fn new(private_key: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            private_key: private_key.into(),
            public_key: public_key.into(),
        }
    }
}

impl Default for KeyLocation {
    fn default() -> Self {
        Self::new(DEFAULT_PRIVATE_KEY, DEFAULT_PUBLIC_KEY)
    }
}

/// Key store backed by files in a directory
///
/// Identifiers are file names relative to the root directory.
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    root: PathBuf,
}

impl FileKeyStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted at the process working directory
    pub fn current_dir() -> Self {
        Self::new(".")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an identifier to a file path
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }
}

impl KeyStore for FileKeyStore {
    fn load(&self, id: &str) -> Result<Vec<u8>> {
        let path = self.path_for(id);
        std::fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::KeyNotFound(path.display().to_string()),
            _ => Error::KeyIo {
                id: path.display().to_string(),
                message: e.to_string(),
            },
        })
    }

    fn store(&self, id: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(id);
        let io_error = |e: std::io::Error| Error::KeyIo {
            id: path.display().to_string(),
            message: e.to_string(),
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(&path, bytes).map_err(io_error)
    }
}

/// In-process key store, mainly for tests
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }
}

impl KeyStore for MemoryKeyStore {
    fn load(&self, id: &str) -> Result<Vec<u8>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or_else(|| Error::KeyNotFound(id.to_string()))
    }

    fn store(&self, id: &str, bytes: &[u8]) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_string(), bytes.to_vec());
        Ok(())
    }
}
