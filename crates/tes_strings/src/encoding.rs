//! Text decoding for string payloads.
//!
//! Payloads carry no encoding marker. Newer tables are UTF-8, older ones use the Windows-1252 code
//! page, so decoding tries UTF-8 first and falls back to Windows-1252.

use encoding_rs::WINDOWS_1252;
use std::borrow::Cow;

/// Bytes that have no assignment in Windows-1252.
const WINDOWS_1252_UNDEFINED: [u8; 5] = [0x81, 0x8D, 0x8F, 0x90, 0x9D];

/// Decode a payload as UTF-8, falling back to Windows-1252.
///
/// Returns `None` when the payload is valid in neither encoding.
pub fn decode(payload: &[u8]) -> Option<Cow<'_, str>> {
    if let Ok(text) = std::str::from_utf8(payload) {
        return Some(Cow::Borrowed(text));
    }

    if payload
        .iter()
        .any(|byte| WINDOWS_1252_UNDEFINED.contains(byte))
    {
        return None;
    }

    let (text, _) = WINDOWS_1252.decode_without_bom_handling(payload);
    Some(text)
}

/// Remove NUL characters anywhere in the text, then trim surrounding whitespace.
pub fn normalize(text: &str) -> String {
    if text.contains('\0') {
        text.replace('\0', "").trim().to_owned()
    } else {
        text.trim().to_owned()
    }
}
