//! One-time verification code generation.

use jiff::{Timestamp, ToSpan};

/// Number of digits in a verification code.
pub const CODE_LENGTH: usize = 6;

/// Minutes a freshly issued code stays valid.
pub const CODE_TTL_MINUTES: i64 = 10;

/// Generates a pseudo-random six-digit verification code.
///
/// Codes are fixed-width decimal strings drawn uniformly from
/// `000000`-`999999`; leading zeros are preserved.
pub fn generate_verification_code() -> String {
    format!("{:06}", rand::random_range(0..1_000_000u32))
}

/// Computes the absolute expiry for a code issued at `now`.
pub fn code_expiry(now: Timestamp) -> Timestamp {
    now + CODE_TTL_MINUTES.minutes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_six_decimal_digits() {
        for _ in 0..1_000 {
            let code = generate_verification_code();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert!(code.parse::<u32>().unwrap() < 1_000_000);
        }
    }

    #[test]
    fn codes_vary_between_draws() {
        // One collision in 64 draws is possible but vanishingly unlikely
        // to repeat across the whole set.
        let codes: std::collections::HashSet<String> =
            (0..64).map(|_| generate_verification_code()).collect();
        assert!(codes.len() > 1);
    }

    #[test]
    fn small_values_keep_leading_zeros() {
        assert_eq!(format!("{:06}", 42u32), "000042");
        assert_eq!(format!("{:06}", 0u32), "000000");
    }

    #[test]
    fn expiry_is_ten_minutes_out() {
        let now = Timestamp::now();
        let expiry = code_expiry(now);
        assert_eq!(expiry, now + (CODE_TTL_MINUTES * 60).seconds());
    }
}
