//! Money values and the non-member surcharge.
//!
//! All arithmetic happens on integer cents.  The backend's own surcharge
//! helper multiplies floats and then rounds up, which pushes exact multiples
//! of 10 € one step too far (200 € comes back as 280 € instead of 270 €);
//! that artifact is not reproduced here.

use std::fmt;

/// An amount in euro cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Money(pub i64);

impl Money {
    /// Parse a decimal euro string (`"123.45"`, `"80"`, `"1 234,50"`).
    /// The backend serialises `Decimal` fields as strings with a dot,
    /// but snapshot files written by hand sometimes carry a comma.
    pub fn parse(raw: &str) -> Option<Self> {
        let cleaned: String = raw
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '€')
            .map(|c| if c == ',' { '.' } else { c })
            .collect();
        if cleaned.is_empty() {
            return None;
        }

        let negative = cleaned.starts_with('-');
        let body = cleaned.trim_start_matches('-');
        let (euros, cents) = match body.split_once('.') {
            Some((e, c)) => (e, c),
            None => (body, ""),
        };

        let euros: i64 = if euros.is_empty() { 0 } else { euros.parse().ok()? };
        // More than two fractional digits means the string is not a money
        // amount.
        if cents.chars().count() > 2 {
            return None;
        }
        let mut fraction = 0i64;
        let mut scale = 10;
        for ch in cents.chars() {
            fraction += (ch.to_digit(10)? as i64) * scale;
            scale /= 10;
        }

        let total = euros.checked_mul(100)?.checked_add(fraction)?;
        Some(Money(if negative { -total } else { total }))
    }

    /// Convert a JSON float amount of euros into cents, rounding to the
    /// nearest cent.
    pub fn from_euros_f64(euros: f64) -> Self {
        Money((euros * 100.0).round() as i64)
    }

    /// Non-member price: 135% of the member price, rounded up to the next
    /// full 10 €.  Exact multiples stay where they are.
    pub fn non_member(self) -> Self {
        const STEP: i64 = 1_000; // 10 € in cents
        let raised = (self.0 * 135).div_ceil(100);
        Money(raised.div_ceil(STEP) * STEP)
    }

    pub fn euros(self) -> i64 {
        self.0 / 100
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{sign}{}.{:02} €", abs / 100, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_decimal_strings() {
        assert_eq!(Money::parse("123.45"), Some(Money(12_345)));
        assert_eq!(Money::parse("80"), Some(Money(8_000)));
        assert_eq!(Money::parse("80.5"), Some(Money(8_050)));
        assert_eq!(Money::parse("1 234,50"), Some(Money(123_450)));
        assert_eq!(Money::parse("-20.00"), Some(Money(-2_000)));
        assert_eq!(Money::parse(""), None);
        assert_eq!(Money::parse("abc"), None);
    }

    #[test]
    fn non_member_price_rounds_up_to_ten_euros() {
        // 100 € * 1.35 = 135 € → next full 10 € is 140 €.
        assert_eq!(Money(10_000).non_member(), Money(14_000));
        // 95 € * 1.35 = 128.25 € → 130 €.
        assert_eq!(Money(9_500).non_member(), Money(13_000));
    }

    #[test]
    fn non_member_price_keeps_exact_multiples() {
        // 200 € * 1.35 = 270 € exactly — must stay 270 €, not jump to
        // 280 € the way the float version does.
        assert_eq!(Money(20_000).non_member(), Money(27_000));
        assert_eq!(Money(4_000).non_member(), Money(5_400));
    }

    #[test]
    fn displays_with_cents() {
        assert_eq!(Money(12_345).to_string(), "123.45 €");
        assert_eq!(Money(8_000).to_string(), "80.00 €");
        assert_eq!(Money(-150).to_string(), "-1.50 €");
    }
}
