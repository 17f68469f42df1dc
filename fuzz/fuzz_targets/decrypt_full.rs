#![no_main]

use libfuzzer_sys::fuzz_target;
use once_cell::sync::Lazy;
use rotacrypt::{CipherKind, Encrypter, KeyRing, RotateEncrypter, RotationalEncrypter};

static ENCRYPTER: Lazy<RotationalEncrypter> = Lazy::new(|| {
    let ring = KeyRing::parse(
        "_V002_:|@|jC8Uw7rcD1TSvrGdDtE4og",
        Some("_V001_:|@|0dyABqn3OGcacvYGqypaKM,wkHRWb5CGwDEl98VPx9I7L1234567890"),
        CipherKind::Aes256Gcm,
    )
    .expect("static key ring");
    RotationalEncrypter::from_ring(ring)
});

fuzz_target!(|data: &[u8]| {
    let Ok(value) = std::str::from_utf8(data) else {
        return;
    };

    let encrypter = &*ENCRYPTER;
    let _ = encrypter.is_encrypted(value);
    let _ = encrypter.inspect(value);
    let _ = encrypter.decrypt_bytes(value);
});
