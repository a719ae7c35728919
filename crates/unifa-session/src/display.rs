//! Pure display formatting: address truncation and SOL amounts.

/// Addresses at or under this length are shown in full.
pub const SHORT_ADDRESS_THRESHOLD: usize = 10;

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Truncate an address to `first4…last4` once it exceeds the short-address
/// threshold. Deterministic, no side effects.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= SHORT_ADDRESS_THRESHOLD {
        return address.to_owned();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}\u{2026}{tail}")
}

/// Render a lamport balance as SOL with four decimal places.
pub fn format_sol(lamports: u64) -> String {
    format!("{:.4}", lamports as f64 / LAMPORTS_PER_SOL as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_addresses_truncate_to_first4_last4() {
        let addr = format!("Ax7k{}Qm2z", "1".repeat(36));
        assert_eq!(addr.len(), 44);
        assert_eq!(short_address(&addr), "Ax7k\u{2026}Qm2z");
    }

    #[test]
    fn short_addresses_pass_through() {
        assert_eq!(short_address("abcdef"), "abcdef");
        // Exactly at the threshold: unchanged.
        assert_eq!(short_address("0123456789"), "0123456789");
        // One past the threshold: truncated.
        assert_eq!(short_address("0123456789a"), "0123\u{2026}789a");
    }

    #[test]
    fn empty_address_is_unchanged() {
        assert_eq!(short_address(""), "");
    }

    #[test]
    fn lamports_render_with_four_decimals() {
        assert_eq!(format_sol(0), "0.0000");
        assert_eq!(format_sol(LAMPORTS_PER_SOL), "1.0000");
        assert_eq!(format_sol(1_234_500_000), "1.2345");
        assert_eq!(format_sol(500_000), "0.0005");
    }
}
