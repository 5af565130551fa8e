use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE, WINDOWS_1252};
use regex::bytes::Regex;

use crate::error::ExtractError;

const META_PRESCAN_LIMIT: usize = 1024;

static META_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i-u)<meta\b[^>]*?charset\s*=\s*["']?\s*([a-z0-9_.:\-]+)"#)
        .expect("hardcoded meta charset regex is valid")
});

/// Decodes a fetched page into text.
///
/// Precedence: byte-order mark, then the transport `charset`, then a
/// `<meta>` declaration in the first 1024 bytes. A page that declares
/// nothing is read as UTF-8 when valid and as windows-1252 otherwise.
///
/// Only the BOM and the transport charset are binding: bytes that are
/// malformed for them are an error, never replaced.
pub fn decode_document(bytes: &[u8], charset: Option<&str>) -> Result<String, ExtractError> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return decode_strict(encoding, &bytes[bom_len..]);
    }

    if let Some(encoding) = resolve_label(charset)? {
        return decode_strict(encoding, bytes);
    }

    if let Some(encoding) = prescan_meta_charset(bytes) {
        match decode_strict(encoding, bytes) {
            Ok(text) => return Ok(text),
            Err(_) => tracing::debug!(
                encoding = encoding.name(),
                "meta-declared charset does not match the page bytes"
            ),
        }
    }

    Ok(decode_undeclared(bytes))
}

fn decode_strict(encoding: &'static Encoding, bytes: &[u8]) -> Result<String, ExtractError> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(std::borrow::Cow::into_owned)
        .ok_or(ExtractError::Decode {
            encoding: encoding.name(),
        })
}

fn decode_undeclared(bytes: &[u8]) -> String {
    if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        return text.into_owned();
    }

    let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    text.into_owned()
}

fn resolve_label(charset: Option<&str>) -> Result<Option<&'static Encoding>, ExtractError> {
    let Some(label) = charset.map(str::trim).filter(|label| !label.is_empty()) else {
        return Ok(None);
    };

    Encoding::for_label(label.as_bytes())
        .map(Some)
        .ok_or_else(|| ExtractError::UnknownEncoding(label.to_string()))
}

fn prescan_meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_PRESCAN_LIMIT)];
    let label = META_CHARSET_RE.captures(head)?.get(1)?.as_bytes();
    let encoding = Encoding::for_label(label)?;

    // ASCII markup cannot carry a UTF-16 declaration.
    if encoding == UTF_16LE || encoding == UTF_16BE {
        return Some(UTF_8);
    }
    Some(encoding)
}
