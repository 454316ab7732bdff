/// Percent-encode a single URL path segment.
///
/// Unreserved characters (RFC 3986) pass through, everything else is encoded byte by byte.
pub(crate) fn encode_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::encode_segment;

    #[test]
    fn keeps_unreserved_characters() {
        assert_eq!(encode_segment("linux-x64_2.0~rc"), "linux-x64_2.0~rc");
    }

    #[test]
    fn encodes_operators_spaces_and_utf8() {
        assert_eq!(encode_segment("a&&!b"), "a%26%26%21b");
        assert_eq!(encode_segment("my node"), "my%20node");
        assert_eq!(encode_segment("é"), "%C3%A9");
    }
}
