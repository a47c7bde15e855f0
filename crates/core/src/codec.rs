// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unit-name codec: the host-service-manager escaping convention and the
//! `<prefix>@<instance>.<suffix>` naming scheme.
//!
//! Pure; holds no state of its own.

use thiserror::Error;

/// A unit name split into its three naming components.
///
/// `instance` is empty when the unit name carries no `@` separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUnit {
    pub prefix: String,
    pub instance: String,
    pub suffix: String,
}

/// Codec errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("dangling escape sequence in {0:?}")]
    DanglingEscape(String),
    #[error("invalid hex escape {0:?} in {1:?}")]
    InvalidHexEscape(String, String),
}

/// Apply the host-service-manager escaping rules: every byte that is not
/// ASCII-alphanumeric is replaced by `_xx`, the lowercase hex pair of that
/// byte.
pub fn escape(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for byte in name.bytes() {
        if byte.is_ascii_alphanumeric() {
            out.push(byte as char);
        } else {
            out.push_str(&format!("_{byte:02x}"));
        }
    }
    out
}

/// Inverse of [`escape`]. Errors if a `_` is not followed by exactly two
/// valid hex digits.
pub fn unescape(encoded: &str) -> Result<String, CodecError> {
    let bytes = encoded.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'_' {
            let hex = bytes
                .get(i + 1..i + 3)
                .ok_or_else(|| CodecError::DanglingEscape(encoded.to_string()))?;
            let hex_str = std::str::from_utf8(hex).map_err(|_| {
                CodecError::InvalidHexEscape(String::from_utf8_lossy(hex).into_owned(), encoded.to_string())
            })?;
            let byte = u8::from_str_radix(hex_str, 16)
                .map_err(|_| CodecError::InvalidHexEscape(hex_str.to_string(), encoded.to_string()))?;
            out.push(byte);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|_| CodecError::DanglingEscape(encoded.to_string()))
}

/// Split a full unit name into `(prefix, instance, suffix)`.
///
/// Splits on the last `.` for the suffix, then on the last `@` for the
/// instance. If `@` is absent, `instance` is empty.
pub fn parse(full: &str) -> ParsedUnit {
    let (stem, suffix) = match full.rsplit_once('.') {
        Some((stem, suffix)) => (stem, suffix),
        None => (full, ""),
    };
    let (prefix, instance) = match stem.rsplit_once('@') {
        Some((prefix, instance)) => (prefix, instance),
        None => (stem, ""),
    };
    ParsedUnit { prefix: prefix.to_string(), instance: instance.to_string(), suffix: suffix.to_string() }
}

/// Build a canonical unit name from the template prefix, a domain name, and
/// the configured unit suffix. The domain name is escaped first, matching
/// the host service manager's own instance-name escaping.
pub fn unit_name(prefix: &str, domain: &str, suffix: &str) -> String {
    format!("{prefix}@{}.{suffix}", escape(domain))
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
