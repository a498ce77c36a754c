/// Value of a C integer literal: decimal, `0x` hex, `0b` binary or leading-zero
/// octal, with any `u`/`l` suffix ignored.
pub fn parse_integer_literal(text: &str) -> Option<i64> {
    let text = text.trim().trim_end_matches(['u', 'U', 'l', 'L']);
    if text.is_empty() {
        return None;
    }
    let (digits, radix) = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        (hex, 16)
    } else if let Some(binary) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
        (binary, 2)
    } else if text.len() > 1 && text.starts_with('0') {
        (&text[1..], 8)
    } else {
        (text, 10)
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    i64::from_str_radix(digits, radix).ok()
}

/// True for text that [`parse_integer_literal`] reads without any leftover.
pub fn is_integer_literal(text: &str) -> bool {
    parse_integer_literal(text).is_some()
}
