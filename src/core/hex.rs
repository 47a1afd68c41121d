//! Uppercase hexadecimal helpers shared by the palette table and tile files

const UPPER_HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Single uppercase hex digit for a value in `0..16`
pub fn digit(value: u8) -> char {
    UPPER_HEX_DIGITS[(value & 0xF) as usize] as char
}

/// Two-digit uppercase hex for a byte
pub fn byte_to_hex(b: u8) -> String {
    let mut s = String::with_capacity(2);
    s.push(digit(b >> 4));
    s.push(digit(b));
    s
}

/// Variable-width uppercase hex without leading zeros ("0" for zero)
pub fn to_hex(value: u64) -> String {
    format!("{:X}", value)
}

/// Parse a single hex digit (either case)
pub fn parse_digit(c: char) -> Option<u8> {
    c.to_digit(16).map(|d| d as u8)
}

/// Parse a variable-width hex number into a `u32`
///
/// Unlike `u32::from_str_radix`, a leading sign is rejected.
pub fn parse_u32(s: &str) -> Option<u32> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(s, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_to_hex() {
        assert_eq!(byte_to_hex(0x00), "00");
        assert_eq!(byte_to_hex(0x0F), "0F");
        assert_eq!(byte_to_hex(0xA5), "A5");
        assert_eq!(byte_to_hex(0xFF), "FF");
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(0), "0");
        assert_eq!(to_hex(0xF), "F");
        assert_eq!(to_hex(0x10), "10");
        assert_eq!(to_hex(0x7FFF_FFFF), "7FFFFFFF");
    }

    #[test]
    fn test_parse() {
        assert_eq!(parse_digit('a'), Some(10));
        assert_eq!(parse_digit('F'), Some(15));
        assert_eq!(parse_digit('g'), None);
        assert_eq!(parse_u32("1f"), Some(0x1F));
        assert_eq!(parse_u32("+1"), None);
        assert_eq!(parse_u32(""), None);
        assert_eq!(parse_u32("FFFFFFFFF"), None);
    }
}
