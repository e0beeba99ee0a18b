//! Key files on disk: layout, encodings and failure modes

use jwtsmith::utils::base64url;
use jwtsmith::*;

#[test]
fn test_key_file_encodings() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileKeyStore::new(dir.path());
    let location = KeyLocation::default();
    let pair = KeyGenerator::rsa(2048)
        .unwrap()
        .generate_to(&store, &location)
        .unwrap();

    // private.key holds the raw PKCS#8 DER bytes
    let private_bytes = std::fs::read(dir.path().join("private.key")).unwrap();
    assert_eq!(private_bytes, pair.private_key().as_der());
    assert_eq!(private_bytes[0], 0x30);

    // public_base64.key holds standard Base64 of the SubjectPublicKeyInfo DER
    let public_text = std::fs::read_to_string(dir.path().join("public_base64.key")).unwrap();
    let public_der = base64url::decode_standard(&public_text).unwrap();
    assert_eq!(public_der, pair.public_key().as_der());

    let reloaded = KeyPair::load(&store, &location).unwrap();
    assert_eq!(reloaded.public_key(), pair.public_key());
}

#[test]
fn test_generation_overwrites_existing_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileKeyStore::new(dir.path());
    let location = KeyLocation::new("signing/private.der", "signing/public.b64");
    let generator = KeyGenerator::rsa(2048).unwrap();

    let first = generator.generate_to(&store, &location).unwrap();
    let second = generator.generate_to(&store, &location).unwrap();
    assert_ne!(first.public_key(), second.public_key());

    let loaded = PublicKey::load(&store, &location.public_key).unwrap();
    assert_eq!(&loaded, second.public_key());
}

#[test]
fn test_public_key_file_with_trailing_newline() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileKeyStore::new(dir.path());
    let pair = KeyGenerator::rsa(2048).unwrap().generate().unwrap();

    std::fs::write(
        dir.path().join("public_base64.key"),
        format!("{}\n", pair.public_key().to_base64()),
    )
    .unwrap();

    let loaded = PublicKey::load(&store, "public_base64.key").unwrap();
    assert_eq!(&loaded, pair.public_key());
}

#[test]
fn test_missing_and_malformed_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileKeyStore::new(dir.path());

    assert!(matches!(
        PublicKey::load(&store, "public_base64.key"),
        Err(Error::KeyNotFound(_))
    ));

    std::fs::write(dir.path().join("public_base64.key"), "not base64 at all!").unwrap();
    assert!(matches!(
        PublicKey::load(&store, "public_base64.key"),
        Err(Error::MalformedKey { kind: "public", .. })
    ));

    std::fs::write(dir.path().join("private.key"), b"\x30\x00").unwrap();
    assert!(matches!(
        KeyPair::load(&store, &KeyLocation::default()),
        Err(Error::MalformedKey { kind: "private", .. })
    ));
}

#[test]
fn test_mismatched_pair_refused_by_issuer() {
    let store = MemoryKeyStore::new();
    let location = KeyLocation::default();
    let generator = KeyGenerator::rsa(2048).unwrap();

    let pair = generator.generate().unwrap();
    let other = generator.generate().unwrap();
    store.store(&location.private_key, pair.private_key().as_der()).unwrap();
    store
        .store(&location.public_key, other.public_key().to_base64().as_bytes())
        .unwrap();

    assert!(matches!(
        TokenIssuer::from_store(&store, &location),
        Err(Error::KeyPairMismatch)
    ));
}
