//! Source address → integer feature

/// Pack a dotted-quad IPv4 string into a big-endian `u32`
///
/// `a.b.c.d` → `(a << 24) + (b << 16) + (c << 8) + d`. Returns `None` unless
/// the string splits into exactly four decimal octets in 0–255. Surrounding
/// whitespace and leading zeros are accepted.
pub fn ip_to_int(ip: &str) -> Option<u32> {
    let mut octets = [0u8; 4];
    let mut parts = ip.trim().split('.');

    for slot in octets.iter_mut() {
        *slot = parse_octet(parts.next()?)?;
    }

    if parts.next().is_some() {
        return None;
    }

    Some(u32::from_be_bytes(octets))
}

/// Inverse of [`ip_to_int`]
pub fn int_to_octets(value: u32) -> [u8; 4] {
    value.to_be_bytes()
}

fn parse_octet(part: &str) -> Option<u8> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_addresses() {
        assert_eq!(ip_to_int("0.0.0.0"), Some(0));
        assert_eq!(ip_to_int("255.255.255.255"), Some(u32::MAX));
        assert_eq!(ip_to_int("192.168.1.10"), Some(3_232_235_786));
        assert_eq!(ip_to_int("10.0.0.1"), Some(167_772_161));
    }

    #[test]
    fn test_matches_packing_formula() {
        for (a, b, c, d) in [(1u32, 2u32, 3u32, 4u32), (203, 0, 113, 77), (8, 8, 4, 4)] {
            let ip = format!("{}.{}.{}.{}", a, b, c, d);
            let expected = a * (1 << 24) + b * (1 << 16) + c * (1 << 8) + d;
            assert_eq!(ip_to_int(&ip), Some(expected));
        }
    }

    #[test]
    fn test_round_trip_to_octets() {
        let value = ip_to_int("172.16.254.3").unwrap();
        assert_eq!(int_to_octets(value), [172, 16, 254, 3]);
    }

    #[test]
    fn test_whitespace_and_leading_zeros() {
        assert_eq!(ip_to_int(" 010.000.000.001 "), ip_to_int("10.0.0.1"));
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in [
            "", "1.2.3", "1.2.3.4.5", "256.1.1.1", "1.2.3.-4", "a.b.c.d",
            "1..2.3", "1.2.3.4.", "+1.2.3.4", "::1", "1.2.3.4 5",
        ] {
            assert_eq!(ip_to_int(bad), None, "'{}' should be rejected", bad);
        }
    }
}
