//! PNG tEXt metadata — embedding a project inside an exported image.
//!
//! Chunks are walked from byte 8 (after the signature): 4-byte big-endian
//! length, 4-byte type, payload, 4-byte CRC-32 over type+payload. New
//! tEXt chunks are spliced in immediately before IEND so standard viewers
//! ignore them.

use crate::error::{PlanError, PlanResult};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn check_signature(png: &[u8]) -> PlanResult<()> {
    if png.len() < PNG_SIGNATURE.len() || png[..8] != PNG_SIGNATURE {
        return Err(PlanError::PngMetadata("not a PNG file".to_string()));
    }
    Ok(())
}

/// Offset of the IEND chunk header (the length field), walking every
/// chunk from the start.
fn find_iend(png: &[u8]) -> PlanResult<usize> {
    let mut offset = PNG_SIGNATURE.len();
    while offset + 8 <= png.len() {
        let length = u32::from_be_bytes([
            png[offset],
            png[offset + 1],
            png[offset + 2],
            png[offset + 3],
        ]) as usize;
        let kind = &png[offset + 4..offset + 8];
        if kind == b"IEND" {
            return Ok(offset);
        }
        offset += 12 + length;
    }
    Err(PlanError::PngMetadata("missing IEND chunk".to_string()))
}

/// Insert a `tEXt` chunk carrying `key\0value` before IEND. Existing
/// chunks with the same key are left alone; readers take the first match.
pub fn embed_text_chunk(png: &[u8], key: &str, value: &str) -> PlanResult<Vec<u8>> {
    check_signature(png)?;
    let iend = find_iend(png)?;

    let mut payload = Vec::with_capacity(key.len() + 1 + value.len());
    payload.extend_from_slice(key.as_bytes());
    payload.push(0);
    payload.extend_from_slice(value.as_bytes());

    let mut chunk = Vec::with_capacity(12 + payload.len());
    chunk.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    chunk.extend_from_slice(b"tEXt");
    chunk.extend_from_slice(&payload);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&chunk[4..]);
    chunk.extend_from_slice(&hasher.finalize().to_be_bytes());

    let mut out = Vec::with_capacity(png.len() + chunk.len());
    out.extend_from_slice(&png[..iend]);
    out.extend_from_slice(&chunk);
    out.extend_from_slice(&png[iend..]);
    Ok(out)
}

/// Read the first `tEXt` chunk keyed by `key`. Ok(None) when the image is
/// a valid PNG but carries no such chunk.
pub fn read_text_chunk(png: &[u8], key: &str) -> PlanResult<Option<String>> {
    check_signature(png)?;

    let mut offset = PNG_SIGNATURE.len();
    while offset + 8 <= png.len() {
        let length = u32::from_be_bytes([
            png[offset],
            png[offset + 1],
            png[offset + 2],
            png[offset + 3],
        ]) as usize;
        let kind = &png[offset + 4..offset + 8];
        let data_start = offset + 8;
        if data_start + length > png.len() {
            return Err(PlanError::PngMetadata("truncated chunk".to_string()));
        }
        if kind == b"tEXt" {
            let data = &png[data_start..data_start + length];
            if let Some(sep) = data.iter().position(|&b| b == 0) {
                if &data[..sep] == key.as_bytes() {
                    let value = String::from_utf8_lossy(&data[sep + 1..]).into_owned();
                    return Ok(Some(value));
                }
            }
        }
        if kind == b"IEND" {
            break;
        }
        offset = data_start + length + 4;
    }
    Ok(None)
}
