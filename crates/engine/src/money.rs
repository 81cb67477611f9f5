use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub},
    str::FromStr,
};

use api_types::Numeric;

use crate::{Currency, EngineError};

/// Signed money amount represented as **integer cents**.
///
/// Every amount read from the gateway is converted to this type before any
/// arithmetic, so totals and percentages never suffer floating-point drift.
///
/// # Examples
///
/// ```rust
/// use engine::{Currency, MoneyCents};
///
/// let amount = MoneyCents::new(1_234_56);
/// assert_eq!(amount.cents(), 123456);
/// assert_eq!(amount.to_string(), "1234.56");
/// assert_eq!(amount.format(Currency::Usd), "$1,234.56");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use engine::MoneyCents;
///
/// assert_eq!("10".parse::<MoneyCents>().unwrap().cents(), 1000);
/// assert_eq!("10,5".parse::<MoneyCents>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<MoneyCents>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Reads a gateway numeric, falling back to zero for anything that is not
    /// a number.
    ///
    /// More than two decimals are rounded half away from zero on the decimal
    /// text (`"1.005"` → `101`), exponent forms go through `f64`.
    #[must_use]
    pub fn coerce(value: &Numeric) -> Self {
        value.as_str().and_then(parse_lenient).unwrap_or(Self::ZERO)
    }

    /// Converts back to the gateway representation (`"12.50"`).
    #[must_use]
    pub fn to_numeric(self) -> Numeric {
        Numeric::new(self.to_string())
    }

    /// Integer average, rounded half up; zero for an empty set.
    #[must_use]
    pub fn average(self, count: u64) -> Self {
        if count == 0 {
            return Self::ZERO;
        }
        let total = self.0 as i128;
        let count = count as i128;
        let sign = if total < 0 { -1 } else { 1 };
        let rounded = (total.abs() * 2 + count) / (2 * count);
        Self((sign * rounded) as i64)
    }

    /// Formats with currency symbol and thousands separators (`-$1,234.50`).
    #[must_use]
    pub fn format(self, currency: Currency) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        let digits = units.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        format!("{sign}{}{grouped}.{cents:02}", currency.symbol())
    }
}

fn parse_lenient(raw: &str) -> Option<MoneyCents> {
    if let Ok(amount) = raw.parse::<MoneyCents>() {
        return Some(amount);
    }
    if let Some(amount) = round_decimal_text(raw) {
        return Some(amount);
    }
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let cents = (value * 100.0).round();
    if cents.abs() >= i64::MAX as f64 {
        return None;
    }
    Some(MoneyCents(cents as i64))
}

/// Rounds a plain decimal with more than two fraction digits.
fn round_decimal_text(raw: &str) -> Option<MoneyCents> {
    let trimmed = raw.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let (units, fraction) = rest.split_once('.')?;
    if units.is_empty()
        || fraction.len() <= 2
        || !units.chars().all(|c| c.is_ascii_digit())
        || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }
    let units: i64 = units.parse().ok()?;
    let cents: i64 = fraction[..2].parse().ok()?;
    let round_up = fraction.as_bytes()[2] >= b'5';
    let magnitude = units
        .checked_mul(100)?
        .checked_add(cents)?
        .checked_add(i64::from(round_up))?;
    Some(MoneyCents(if negative { -magnitude } else { magnitude }))
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Add for MoneyCents {
    type Output = MoneyCents;

    fn add(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for MoneyCents {
    fn add_assign(&mut self, rhs: MoneyCents) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for MoneyCents {
    type Output = MoneyCents;

    fn sub(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for MoneyCents {
    type Output = MoneyCents;

    fn neg(self) -> Self::Output {
        MoneyCents(self.0.saturating_neg())
    }
}

impl Sum for MoneyCents {
    fn sum<I: Iterator<Item = MoneyCents>>(iter: I) -> Self {
        iter.fold(MoneyCents::ZERO, |acc, amount| acc + amount)
    }
}

impl FromStr for MoneyCents {
    type Err = EngineError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount("invalid amount".to_string());
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (sign, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (-1i64, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (1i64, stripped)
        } else {
            (1i64, trimmed)
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let units_str = parts.next().ok_or_else(invalid)?;
        let cents_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let units: i64 = units_str.parse().map_err(|_| overflow())?;

        let cents: i64 = match cents_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => return Err(EngineError::InvalidAmount("too many decimals".to_string())),
                }
            }
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(overflow)?;

        let signed = if sign < 0 {
            total.checked_neg().ok_or_else(overflow)?
        } else {
            total
        };

        Ok(MoneyCents(signed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_plain_decimal() {
        assert_eq!(MoneyCents::new(0).to_string(), "0.00");
        assert_eq!(MoneyCents::new(1).to_string(), "0.01");
        assert_eq!(MoneyCents::new(1050).to_string(), "10.50");
        assert_eq!(MoneyCents::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn format_groups_thousands() {
        assert_eq!(MoneyCents::new(0).format(Currency::Usd), "$0.00");
        assert_eq!(MoneyCents::new(149_950).format(Currency::Usd), "$1,499.50");
        assert_eq!(MoneyCents::new(-1).format(Currency::Usd), "-$0.01");
        assert_eq!(MoneyCents::new(123_456_789).format(Currency::Eur), "€1,234,567.89");
        assert_eq!(MoneyCents::new(99_999).format(Currency::Usd), "$999.99");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<MoneyCents>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<MoneyCents>().unwrap().cents(), 1050);
        assert_eq!("10,50".parse::<MoneyCents>().unwrap().cents(), 1050);
        assert_eq!("-0.01".parse::<MoneyCents>().unwrap().cents(), -1);
        assert_eq!("+1.00".parse::<MoneyCents>().unwrap().cents(), 100);
        assert_eq!("  2.30 ".parse::<MoneyCents>().unwrap().cents(), 230);
    }

    #[test]
    fn parse_rejects_more_than_two_decimals() {
        assert!("12.345".parse::<MoneyCents>().is_err());
        assert!("0.001".parse::<MoneyCents>().is_err());
        assert!("abc".parse::<MoneyCents>().is_err());
    }

    #[test]
    fn coerce_reads_gateway_numerics() {
        assert_eq!(MoneyCents::coerce(&Numeric::new("1700.50")).cents(), 170_050);
        assert_eq!(MoneyCents::coerce(&Numeric::new("1499.5")).cents(), 149_950);
        assert_eq!(MoneyCents::coerce(&Numeric::from(3200)).cents(), 320_000);
        assert_eq!(MoneyCents::coerce(&Numeric::new("-0.01")).cents(), -1);
    }

    #[test]
    fn coerce_rounds_extra_decimals_half_away_from_zero() {
        assert_eq!(MoneyCents::coerce(&Numeric::new("1.005")).cents(), 101);
        assert_eq!(MoneyCents::coerce(&Numeric::new("1.004")).cents(), 100);
        assert_eq!(MoneyCents::coerce(&Numeric::new("-2.345")).cents(), -235);
        assert_eq!(MoneyCents::coerce(&Numeric::new("1e3")).cents(), 100_000);
    }

    #[test]
    fn coerce_defaults_garbage_to_zero() {
        assert_eq!(MoneyCents::coerce(&Numeric::null()), MoneyCents::ZERO);
        assert_eq!(MoneyCents::coerce(&Numeric::new("twelve")), MoneyCents::ZERO);
        assert_eq!(MoneyCents::coerce(&Numeric::new("NaN")), MoneyCents::ZERO);
        assert_eq!(MoneyCents::coerce(&Numeric::new("inf")), MoneyCents::ZERO);
    }

    #[test]
    fn average_rounds_half_up() {
        assert_eq!(MoneyCents::new(1000).average(3).cents(), 333);
        assert_eq!(MoneyCents::new(1001).average(2).cents(), 501);
        assert_eq!(MoneyCents::new(500).average(0), MoneyCents::ZERO);
    }
}
