//! PNG metadata tests — tEXt chunk embedding and extraction.

use endaxis_core::error::PlanError;
use endaxis_core::png_meta::{embed_text_chunk, read_text_chunk};

/// A minimal, structurally valid PNG: signature, IHDR, IEND.
fn minimal_png() -> Vec<u8> {
    let mut png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    // IHDR: 13-byte payload (1x1, 8-bit grayscale).
    png.extend_from_slice(&13u32.to_be_bytes());
    png.extend_from_slice(b"IHDR");
    let ihdr_payload = [0, 0, 0, 1, 0, 0, 0, 1, 8, 0, 0, 0, 0];
    png.extend_from_slice(&ihdr_payload);
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(b"IHDR");
    hasher.update(&ihdr_payload);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
    // IEND: empty payload.
    png.extend_from_slice(&0u32.to_be_bytes());
    png.extend_from_slice(b"IEND");
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(b"IEND");
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
    png
}

/// Embed then read back: the payload survives and the container stays a
/// valid PNG (signature intact, IEND still terminal).
#[test]
fn embed_and_read_round_trip() {
    let png = minimal_png();
    let payload = r#"{"version":"2.0.0","scenarioList":[]}"#;
    let stamped = embed_text_chunk(&png, "planData", payload).expect("embed");

    assert_eq!(&stamped[..8], &png[..8], "signature untouched");
    assert!(stamped.len() > png.len());
    assert_eq!(&stamped[stamped.len() - 8..stamped.len() - 4], b"IEND");

    let read = read_text_chunk(&stamped, "planData").expect("read");
    assert_eq!(read.as_deref(), Some(payload));
}

/// Reading a key that is not present is Ok(None), not an error.
#[test]
fn absent_key_reads_none() {
    let png = minimal_png();
    assert_eq!(read_text_chunk(&png, "planData").expect("read"), None);

    let stamped = embed_text_chunk(&png, "other", "x").expect("embed");
    assert_eq!(read_text_chunk(&stamped, "planData").expect("read"), None);
}

/// Non-PNG bytes are rejected up front.
#[test]
fn non_png_is_rejected() {
    let err = embed_text_chunk(b"GIF89a not a png", "k", "v").expect_err("must reject");
    assert!(matches!(err, PlanError::PngMetadata(_)));
    let err = read_text_chunk(&[], "k").expect_err("must reject");
    assert!(matches!(err, PlanError::PngMetadata(_)));
}

/// A PNG with no IEND cannot take an embedded chunk.
#[test]
fn missing_iend_is_rejected() {
    let png = minimal_png();
    let truncated = &png[..png.len() - 12]; // drop the IEND chunk
    let err = embed_text_chunk(truncated, "k", "v").expect_err("must reject");
    assert!(matches!(err, PlanError::PngMetadata(_)));
}

/// Multiple distinct keys coexist; each reads back its own value.
#[test]
fn multiple_keys_coexist() {
    let png = minimal_png();
    let a = embed_text_chunk(&png, "alpha", "first").expect("embed");
    let b = embed_text_chunk(&a, "beta", "second").expect("embed");

    assert_eq!(read_text_chunk(&b, "alpha").expect("read").as_deref(), Some("first"));
    assert_eq!(read_text_chunk(&b, "beta").expect("read").as_deref(), Some("second"));
}
