/// Resolves the escape sequences of a string literal body (quotes excluded),
/// producing the cooked value the way a JavaScript engine would.
///
/// Malformed `\x` / `\u` escapes are kept verbatim.
pub fn unescape_string_literal(raw: &str) -> String {
    let mut units: Vec<u16> = Vec::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            push_char(&mut units, c);
            continue;
        }
        let escaped = match chars.next() {
            Some(e) => e,
            None => {
                push_char(&mut units, '\\');
                break;
            }
        };
        match escaped {
            'n' => push_char(&mut units, '\n'),
            't' => push_char(&mut units, '\t'),
            'r' => push_char(&mut units, '\r'),
            'b' => push_char(&mut units, '\u{0008}'),
            'f' => push_char(&mut units, '\u{000C}'),
            'v' => push_char(&mut units, '\u{000B}'),
            '0' if !starts_with_digit(chars.as_str()) => units.push(0),
            'x' => match read_hex(chars.as_str(), 2) {
                Some(value) => {
                    units.push(value as u16);
                    skip(&mut chars, 2);
                }
                None => push_str(&mut units, "\\x"),
            },
            'u' => match read_unicode_escape(chars.as_str()) {
                Some((value, consumed)) => {
                    push_code_point(&mut units, value);
                    skip(&mut chars, consumed);
                }
                None => push_str(&mut units, "\\u"),
            },
            // Line continuations contribute nothing.
            '\r' => {
                if chars.as_str().starts_with('\n') {
                    chars.next();
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => push_char(&mut units, other),
        }
    }
    String::from_utf16_lossy(&units)
}

fn push_char(units: &mut Vec<u16>, c: char) {
    let mut buf = [0u16; 2];
    units.extend_from_slice(c.encode_utf16(&mut buf));
}

fn push_str(units: &mut Vec<u16>, s: &str) {
    units.extend(s.encode_utf16());
}

/// Code points above the BMP are split into a surrogate pair, anything else
/// (including lone surrogates from `\uD83D`) is pushed as a single unit.
fn push_code_point(units: &mut Vec<u16>, value: u32) {
    if value > 0xFFFF {
        let v = value - 0x10000;
        units.push(0xD800 | ((v >> 10) as u16));
        units.push(0xDC00 | ((v & 0x3FF) as u16));
    } else {
        units.push(value as u16);
    }
}

fn starts_with_digit(s: &str) -> bool {
    s.chars().next().map_or(false, |c| c.is_ascii_digit())
}

fn skip(chars: &mut std::str::Chars<'_>, count: usize) {
    for _ in 0..count {
        chars.next();
    }
}

fn read_hex(s: &str, len: usize) -> Option<u32> {
    let digits = s.get(..len)?;
    if digits.len() != len || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Reads the part after `\u`: either `XXXX` or `{X..}`. Returns the code
/// point and the number of chars consumed.
fn read_unicode_escape(s: &str) -> Option<(u32, usize)> {
    if let Some(rest) = s.strip_prefix('{') {
        let end = rest.find('}')?;
        let digits = &rest[..end];
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        if value > 0x10FFFF {
            return None;
        }
        Some((value, end + 2))
    } else {
        read_hex(s, 4).map(|v| (v, 4))
    }
}

#[cfg(test)]
mod tests {
    use super::unescape_string_literal;

    #[test]
    fn test_plain_text_is_untouched() {
        assert_eq!(unescape_string_literal("abc def"), "abc def");
    }

    #[test]
    fn test_simple_escapes() {
        assert_eq!(unescape_string_literal(r#"a\nb\tc\\d\'e\"f"#), "a\nb\tc\\d'e\"f");
    }

    #[test]
    fn test_hex_and_unicode_escapes() {
        assert_eq!(unescape_string_literal(r"\x41B\u{43}"), "ABC");
    }

    #[test]
    fn test_surrogate_pair_escape() {
        assert_eq!(unescape_string_literal(r"\uD83D\uDE00"), "\u{1F600}");
        assert_eq!(unescape_string_literal(r"\u{1F600}"), "\u{1F600}");
    }

    #[test]
    fn test_line_continuation() {
        assert_eq!(unescape_string_literal("ab\\\ncd"), "abcd");
        assert_eq!(unescape_string_literal("ab\\\r\ncd"), "abcd");
    }

    #[test]
    fn test_malformed_escapes_are_kept() {
        assert_eq!(unescape_string_literal(r"\xZZ"), "\\xZZ");
        assert_eq!(unescape_string_literal(r"\u12"), "\\u12");
    }

    #[test]
    fn test_null_escape() {
        assert_eq!(unescape_string_literal(r"a\0b"), "a\u{0}b");
    }
}
