//! Small hashing and id routines the web client computes in JavaScript.

use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

const PGV_MODULUS: u128 = 10_000_000_000;
const PGV_WIDTH: usize = 10;

const HASH_U_SALT: [u8; 4] = *b"ECOK";

/// Pseudo-random tracking id used for the `pgv_pvid` / `pgv_info` cookies:
/// a 10-digit, zero-padded decimal string.
pub fn rand_pgv() -> String {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;
    rand_pgv_with(rand::rng().random::<f64>(), now_ms)
}

/// Deterministic core of [`rand_pgv`]: `round(i32::MAX * r) * now_ms mod 10^10`.
/// A zero `random` is replaced with 0.5.
pub fn rand_pgv_with(random: f64, now_ms: u64) -> String {
    let random = if random > 0.0 { random } else { 0.5 };
    let scaled = (f64::from(i32::MAX) * random).round() as u128;
    let value = scaled * u128::from(now_ms) % PGV_MODULUS;
    format!("{value:0width$}", width = PGV_WIDTH)
}

/// `ptqrtoken` derived from the `qrsig` cookie.
pub fn hash33(input: &str) -> u32 {
    let mut acc: u32 = 0;
    for unit in input.encode_utf16() {
        acc = acc.wrapping_add(acc << 5).wrapping_add(u32::from(unit));
    }
    acc & 0x7fff_ffff
}

/// The `hash` field of the roster requests, mixing `uin` with `ptwebqq`.
///
/// Returns 16 upper-case hex digits. A `uin` that is not a number hashes as 0.
pub fn hash_u(uin: &str, ptwebqq: &str) -> String {
    let uin = uin.trim().parse::<u64>().map(|v| v as u32).unwrap_or(0);

    let mut ptb = [0u16; 4];
    for (i, unit) in ptwebqq.encode_utf16().enumerate() {
        ptb[i % 4] ^= unit;
    }

    let uin_bytes = uin.to_be_bytes();
    let mut out = String::with_capacity(16);
    for i in 0..4 {
        let mixed = uin_bytes[i] ^ HASH_U_SALT[i];
        out.push_str(&format!("{:02X}{:02X}", ptb[i] as u8, mixed));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rand_pgv_is_fixed_width() {
        let id = rand_pgv();
        assert_eq!(id.len(), PGV_WIDTH);
        assert!(id.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn rand_pgv_with_known_inputs() {
        assert_eq!(rand_pgv_with(0.5, 1000), "3741824000");
        assert_eq!(rand_pgv_with(0.0, 1000), "3741824000");
        assert_eq!(rand_pgv_with(1.0, 1), "2147483647");
        assert_eq!(rand_pgv_with(1.0, 0), "0000000000");
    }

    #[test]
    fn hash33_matches_reference_values() {
        assert_eq!(hash33(""), 0);
        assert_eq!(hash33("a"), 97);
        assert_eq!(hash33("ab"), 3299);
    }

    #[test]
    fn hash33_stays_within_31_bits() {
        let long = "qrsig".repeat(50);
        assert!(hash33(&long) <= 0x7fff_ffff);
    }

    #[test]
    fn hash_u_mixes_salt_and_ptwebqq() {
        assert_eq!(hash_u("0", ""), "00450043004F004B");
        assert_eq!(hash_u("0", "abcd"), "61456243634F644B");
        assert_eq!(hash_u("not-a-number", "abcd"), "61456243634F644B");
    }

    #[test]
    fn hash_u_folds_long_ptwebqq() {
        // "abcde": 'e' xors into slot 0 alongside 'a'.
        let expected = format!("{:02X}45", b'a' ^ b'e') + "6243634F644B";
        assert_eq!(hash_u("0", "abcde"), expected);
    }

    #[test]
    fn hash_u_spreads_uin_bytes() {
        // 0x01020304 ^ "ECOK"
        assert_eq!(hash_u("16909060", ""), "00440041004C004F");
    }
}
