//! Small helpers shared across modules.

use std::borrow::Cow;

/// Decode input bytes to a string.
///
/// This function:
/// 1. Tries UTF-8 (a leading BOM is stripped)
/// 2. Falls back to Windows-1252 (superset of ISO-8859-1), which never fails
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8 without a BOM.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}
