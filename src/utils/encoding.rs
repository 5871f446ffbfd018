//! Reading files as text.
//!
//! - Strict mode: the bytes must be valid UTF-8, otherwise the read fails
//! - Lossy mode: UTF-8 fast path, then BOM sniffing, then chardetng detection,
//!   decoding with replacement characters

use crate::domain::DecodeMode;
use anyhow::{Context, Result};
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use std::path::Path;

const DEFAULT_SAMPLE_SIZE: usize = 8192;

/// Read `path` into a `String` according to `mode`.
pub fn read_text(path: &Path, mode: DecodeMode) -> Result<String> {
    let bytes = std::fs::read(path)?;
    match mode {
        DecodeMode::Strict => String::from_utf8(bytes).context("file is not valid UTF-8"),
        DecodeMode::Lossy => Ok(decode_lossy(bytes)),
    }
}

fn decode_lossy(bytes: Vec<u8>) -> String {
    let bytes = match String::from_utf8(bytes) {
        Ok(text) => return text,
        Err(err) => err.into_bytes(),
    };

    let encoding = detect_encoding(&bytes);
    let (decoded, _, had_errors) = encoding.decode(&bytes);
    if had_errors {
        tracing::debug!("replacement characters used while decoding as {}", encoding.name());
    }
    decoded.into_owned()
}

/// Pick an encoding for bytes that are not valid UTF-8.
///
/// BOM markers win; otherwise chardetng guesses from the leading sample.
fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if bytes.starts_with(&[0xef, 0xbb, 0xbf]) {
        return UTF_8;
    }
    if bytes.starts_with(&[0xff, 0xfe]) {
        return UTF_16LE;
    }
    if bytes.starts_with(&[0xfe, 0xff]) {
        return UTF_16BE;
    }

    let sample = &bytes[..bytes.len().min(DEFAULT_SAMPLE_SIZE)];
    let mut detector = EncodingDetector::new();
    detector.feed(sample, sample.len() == bytes.len());
    detector.guess(None, true)
}
