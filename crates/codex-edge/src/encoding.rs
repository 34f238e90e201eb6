//! Repair of UTF-8 text that was decoded as Latin-1

/// Undo Latin-1 mojibake such as `"cafÃ©"` -> `"café"`.
///
/// The input is only rewritten when every character fits in a single byte
/// and those bytes form valid UTF-8 that differs from the input. Anything
/// else, including text that is already correct, is returned unchanged.
pub fn fix_utf8_encoding(text: &str) -> String {
    if text.is_ascii() {
        return text.to_string();
    }

    let bytes: Option<Vec<u8>> = text
        .chars()
        .map(|c| u8::try_from(u32::from(c)).ok())
        .collect();

    match bytes.map(String::from_utf8) {
        Some(Ok(decoded)) if decoded != text => decoded,
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repairs_mojibake() {
        assert_eq!(fix_utf8_encoding("cafÃ©"), "café");
        assert_eq!(fix_utf8_encoding("Ã¼ber"), "über");
    }

    #[test]
    fn test_leaves_valid_text_alone() {
        assert_eq!(fix_utf8_encoding("plain ascii"), "plain ascii");
        assert_eq!(fix_utf8_encoding("café"), "café");
        assert_eq!(fix_utf8_encoding("日本語"), "日本語");
    }

    #[test]
    fn test_leaves_undecodable_latin1_alone() {
        // a lone Latin-1 byte is not valid UTF-8
        assert_eq!(fix_utf8_encoding("naïve"), "naïve");
    }
}
