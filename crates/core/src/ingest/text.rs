//! Plain-text decoding with legacy code page fallbacks.

use std::borrow::Cow;

use encoding_rs::WINDOWS_1251;

/// The one byte Windows-1251 leaves undefined. WHATWG maps it to U+0098
/// anyway, so it is checked before decoding.
const CP1251_UNDEFINED: u8 = 0x98;

/// Decode uploaded text bytes.
///
/// Tries strict UTF-8 first, then Windows-1251 (Cyrillic), then Latin-1.
/// Latin-1 maps every byte to a code point, so this never fails.
pub fn decode_text(bytes: &[u8]) -> String {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }

    if let Some(text) = decode_cp1251(bytes) {
        tracing::debug!(bytes = bytes.len(), "Decoded text upload as windows-1251");
        return text;
    }

    tracing::debug!(bytes = bytes.len(), "Decoded text upload as latin-1");
    match encoding_rs::mem::decode_latin1(bytes) {
        Cow::Borrowed(text) => text.to_string(),
        Cow::Owned(text) => text,
    }
}

/// Strict Windows-1251: `None` when any byte is undefined in the code page.
fn decode_cp1251(bytes: &[u8]) -> Option<String> {
    if bytes.contains(&CP1251_UNDEFINED) {
        return None;
    }
    WINDOWS_1251
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_passes_through() {
        assert_eq!(decode_text("E=mc^2, discovered 1905".as_bytes()), "E=mc^2, discovered 1905");
        assert_eq!(decode_text("Привет".as_bytes()), "Привет");
    }

    #[test]
    fn cp1251_fallback() {
        // "Привет" in Windows-1251.
        let bytes = [0xCF, 0xF0, 0xE8, 0xE2, 0xE5, 0xF2];
        assert_eq!(decode_text(&bytes), "Привет");
    }

    #[test]
    fn undefined_cp1251_byte_falls_back_to_latin1() {
        let bytes = [b'a', 0x98, b'b'];
        assert_eq!(decode_cp1251(&bytes), None);
        assert_eq!(decode_text(&bytes), "a\u{98}b");
    }

    #[test]
    fn cp1251_decoder_accepts_defined_bytes() {
        assert_eq!(decode_cp1251(&[0xC0, 0xE0]).as_deref(), Some("Аа"));
    }
}
