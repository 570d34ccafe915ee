//! Share codes — a project document compressed and armored for URLs.
//!
//! Wire format: JSON document, gzip, then URL-safe base64 without
//! padding. Decode also accepts padded input since some transports
//! re-add `=`.

use crate::engine::PlanEngine;
use crate::error::{PlanError, PlanResult};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};

pub fn encode_share(json: &str) -> PlanResult<String> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(json.as_bytes())
        .map_err(|e| PlanError::ShareCode(format!("compress: {e}")))?;
    let compressed = encoder
        .finish()
        .map_err(|e| PlanError::ShareCode(format!("compress: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(compressed))
}

pub fn decode_share(code: &str) -> PlanResult<String> {
    let trimmed = code.trim().trim_end_matches('=');
    let compressed = URL_SAFE_NO_PAD
        .decode(trimmed)
        .map_err(|e| PlanError::ShareCode(format!("base64: {e}")))?;
    let mut json = String::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_string(&mut json)
        .map_err(|e| PlanError::ShareCode(format!("decompress: {e}")))?;
    Ok(json)
}

impl PlanEngine {
    pub fn export_share_code(&mut self) -> PlanResult<String> {
        let json = self.export_json()?;
        encode_share(&json)
    }

    /// Decode and import in one step. A bad code fails before any state
    /// changes.
    pub fn import_share_code(&mut self, code: &str) -> PlanResult<()> {
        let json = decode_share(code)?;
        self.import_json(&json)
    }
}
