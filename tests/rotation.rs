//! Rotation scenarios: legacy → V001 → V002 → V003.

use rotacrypt::{
    CipherKind, ConfigError, Encrypter, Error, KeyRing, KeyRingConfig, RotateEncrypter,
    RotationalEncrypter,
};

const LEGACY: &str = "wkHRWb5CGwDEl98VPx9I7L1234567890";
const ROTATE_1: &str = "_V001_:|@|0dyABqn3OGcacvYGqypaKM";
const ROTATE_2: &str = "_V002_:|@|jC8Uw7rcD1TSvrGdDtE4og";
const ROTATE_3: &str = "_V003_:|@|Zq81mPcv0LtYw2Hn5RxoEa";

/// Like application config: the old key defaults to the active key.
fn make_encrypter(key: &str, old: &str) -> RotationalEncrypter {
    let mut config = KeyRingConfig::new(key);
    if !old.is_empty() {
        config = config.with_old_key(old);
    }
    RotationalEncrypter::from_config(&config).unwrap()
}

#[test]
fn encrypt_and_decrypt_without_rotational_key() {
    let enc = make_encrypter(LEGACY, "");
    let text = "Hello World";

    let encrypted = enc.encrypt_string(text).unwrap();
    assert!(!encrypted.starts_with('_'));
    assert_eq!(enc.decrypt_string(&encrypted).unwrap(), text);
}

#[test]
fn encrypt_and_decrypt_with_rotational_key_and_legacy_key() {
    let legacy = make_encrypter(LEGACY, "");
    let first = make_encrypter(ROTATE_1, LEGACY);

    let text1 = "Hello World";
    let text2 = "Hello Universe";

    assert!(!legacy.encrypt_string(text1).unwrap().starts_with('_'));
    assert!(first.encrypt_string(text1).unwrap().starts_with("_V001_"));

    // The legacy ring reads its own data but not V001 data.
    let own = legacy.encrypt_string(text1).unwrap();
    assert_eq!(legacy.decrypt_string(&own).unwrap(), text1);
    let err = legacy
        .decrypt_string(&first.encrypt_string(text2).unwrap())
        .unwrap_err();
    assert!(matches!(err, Error::KeyResolutionFailed));
    assert!(err.is_key_not_found());

    // The V001 ring reads both.
    assert_eq!(first.decrypt_string(&own).unwrap(), text1);
    assert_eq!(
        first.decrypt_string(&first.encrypt_string(text2).unwrap()).unwrap(),
        text2
    );
}

#[test]
fn encrypt_and_decrypt_with_both_active_and_old_key_rotational() {
    let first = make_encrypter(ROTATE_1, LEGACY);
    let second = make_encrypter(ROTATE_2, ROTATE_1);

    let text1 = "Hello World";
    let text2 = "Hello Universe";

    assert!(first.encrypt_string(text1).unwrap().starts_with("_V001_"));
    assert!(second.encrypt_string(text2).unwrap().starts_with("_V002_"));

    // Rotation is one-way.
    assert_eq!(
        first.decrypt_string(&first.encrypt_string(text1).unwrap()).unwrap(),
        text1
    );
    assert!(matches!(
        first.decrypt_string(&second.encrypt_string(text2).unwrap()),
        Err(Error::KeyResolutionFailed)
    ));

    assert_eq!(
        second.decrypt_string(&first.encrypt_string(text1).unwrap()).unwrap(),
        text1
    );
    assert_eq!(
        second.decrypt_string(&second.encrypt_string(text2).unwrap()).unwrap(),
        text2
    );

    // Legacy data: V001 still lists the legacy key, V002 no longer does.
    let legacy = make_encrypter(LEGACY, "");
    assert_eq!(
        first.decrypt_string(&legacy.encrypt_string(text1).unwrap()).unwrap(),
        text1
    );
    assert!(matches!(
        second.decrypt_string(&legacy.encrypt_string(text2).unwrap()),
        Err(Error::DecryptionFailed)
    ));
}

#[test]
fn reverse_rotation_works_when_new_key_is_listed() {
    let second = make_encrypter(ROTATE_2, ROTATE_1);
    let first_knows_v2 = make_encrypter(ROTATE_1, &format!("{ROTATE_2},{LEGACY}"));

    let ct = second.encrypt_string("rolled back").unwrap();
    assert_eq!(first_knows_v2.decrypt_string(&ct).unwrap(), "rolled back");
}

#[test]
fn multi_hop_rotation() {
    let legacy = make_encrypter(LEGACY, "");
    let v1 = make_encrypter(ROTATE_1, LEGACY);
    let v2 = make_encrypter(ROTATE_2, &format!("{ROTATE_1},{LEGACY}"));
    let v3 = make_encrypter(ROTATE_3, &format!("{ROTATE_2},{ROTATE_1},{LEGACY}"));

    let stored = [
        ("legacy", legacy.encrypt_string("legacy").unwrap()),
        ("v1", v1.encrypt_string("v1").unwrap()),
        ("v2", v2.encrypt_string("v2").unwrap()),
        ("v3", v3.encrypt_string("v3").unwrap()),
    ];
    for (text, ct) in &stored {
        assert_eq!(v3.decrypt_string(ct).unwrap(), *text, "v3 reading {text}");
    }

    // Only tagged values are recognised structurally.
    assert!(!v3.is_encrypted(&stored[0].1));
    assert!(stored[1..].iter().all(|(_, ct)| v3.is_encrypted(ct)));
}

#[test]
fn base64_keys_behave_like_plain_keys() {
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    let plain = make_encrypter(ROTATE_2, ROTATE_1);
    let encoded = make_encrypter(
        &format!("base64:{}", STANDARD.encode(ROTATE_2)),
        &format!("base64:{}", STANDARD.encode(ROTATE_1)),
    );

    let ct = plain.encrypt_string("same keys").unwrap();
    assert_eq!(encoded.decrypt_string(&ct).unwrap(), "same keys");
    let ct = encoded.encrypt_string("same keys").unwrap();
    assert_eq!(plain.decrypt_string(&ct).unwrap(), "same keys");
}

#[test]
fn generated_keys_rotate() {
    let k1 = rotacrypt::keygen::generate("GEN1", CipherKind::Aes256Gcm).unwrap();
    let k2 = rotacrypt::keygen::generate("GEN2", CipherKind::Aes256Gcm).unwrap();

    let before = make_encrypter(&k1.encoded, LEGACY);
    let after = make_encrypter(&k2.encoded, &k1.encoded);

    let ct = before.encrypt_string("generated").unwrap();
    assert!(ct.starts_with("_GEN1_:"));
    assert_eq!(after.decrypt_string(&ct).unwrap(), "generated");
    assert!(after.encrypt_string("x").unwrap().starts_with("_GEN2_:"));
}

#[test]
fn retired_key_may_use_another_cipher() {
    let old = RotationalEncrypter::from_ring(
        KeyRing::parse("_K128_:|@|abcdef", None, CipherKind::Aes128Gcm).unwrap(),
    );
    let ct = old.encrypt_string("migrated cipher").unwrap();

    let ring = KeyRing::new(
        rotacrypt::Key::parse(ROTATE_1, CipherKind::Aes256Gcm).unwrap(),
        vec![rotacrypt::Key::parse("_K128_:|@|abcdef", CipherKind::Aes128Gcm).unwrap()],
    )
    .unwrap();
    let new = RotationalEncrypter::from_ring(ring);
    assert_eq!(new.decrypt_string(&ct).unwrap(), "migrated cipher");
}

#[test]
fn ambiguous_configurations_rejected() {
    let clash = "_V001_:|@|XXXXXXXXXXXXXXXXXXXXXX";
    let err = RotationalEncrypter::from_config(&KeyRingConfig::new(ROTATE_1).with_old_key(clash))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::DuplicateTag(ref tag)) if tag == "_V001_:"
    ));

    let short_prefix = "_V01_:|@|XXXXXXXXXXXXXXXXXXXXXXX";
    let err = RotationalEncrypter::from_config(&KeyRingConfig::new(short_prefix)).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::InvalidPrefix(_))));
}

#[test]
fn active_key_rotational_flag() {
    assert!(!make_encrypter(LEGACY, "").is_active_key_rotational());
    assert!(make_encrypter(ROTATE_1, LEGACY).is_active_key_rotational());
}
