use std::{fmt, str::FromStr};

use thiserror::Error;

/// Why a typed amount was refused.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is required")]
    Empty,
    #[error("amount must be a number")]
    Invalid,
    #[error("amount must not be negative")]
    Negative,
    #[error("amount must be in whole rupiah")]
    Fraction,
    #[error("amount too large")]
    Overflow,
}

/// Signed amount of **whole rupiah**.
///
/// Records only ever hold non-negative amounts; the sign is used for the
/// net balance returned by the summary.
///
/// # Examples
///
/// ```rust
/// use engine::Rupiah;
///
/// assert_eq!(Rupiah::new(15_000).to_string(), "Rp 15.000");
/// assert_eq!(Rupiah::new(-85_000).to_string(), "-Rp 85.000");
/// ```
///
/// Parsing user input strips the `Rp` prefix and thousands grouping (either
/// `.` or `,`):
///
/// ```rust
/// use engine::Rupiah;
///
/// assert_eq!("15,000".parse::<Rupiah>().unwrap().value(), 15_000);
/// assert_eq!("Rp 1.250.000".parse::<Rupiah>().unwrap().value(), 1_250_000);
/// assert!("12.5".parse::<Rupiah>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Rupiah(i64);

impl Rupiah {
    pub const ZERO: Rupiah = Rupiah(0);

    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Formats the digits with `.` every three places, without the prefix.
    #[must_use]
    pub fn grouped(self) -> String {
        let digits = self.0.unsigned_abs().to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push('.');
            }
            out.push(ch);
        }
        out
    }
}

impl fmt::Display for Rupiah {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{sign}Rp {}", self.grouped())
    }
}

impl From<i64> for Rupiah {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Rupiah> for i64 {
    fn from(value: Rupiah) -> Self {
        value.0
    }
}

impl FromStr for Rupiah {
    type Err = AmountError;

    /// Parses a non-negative amount typed by the user.
    ///
    /// Separators are thousands grouping only when the leading group has one
    /// to three digits and every later group exactly three (`1.250.000`).
    /// Otherwise the last separator starts a fraction, which is only accepted
    /// when it is all zeros (`15000.00`, `15000.000`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rest = s.trim();
        if rest.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("rp")) {
            rest = rest[2..].trim_start();
        }
        if let Some(stripped) = rest.strip_prefix('+') {
            rest = stripped.trim_start();
        }
        if rest.starts_with('-') {
            return Err(AmountError::Negative);
        }
        if rest.is_empty() {
            return Err(AmountError::Empty);
        }
        if !rest
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | ' '))
        {
            return Err(AmountError::Invalid);
        }

        let compact: String = rest.chars().filter(|c| *c != ' ').collect();
        let digits = match grouped_digits(&compact) {
            Some(digits) => digits,
            None => {
                let pos = compact.rfind(['.', ',']).ok_or(AmountError::Invalid)?;
                let digits = grouped_digits(&compact[..pos]).ok_or(AmountError::Invalid)?;
                let fraction = &compact[pos + 1..];
                if !fraction.chars().all(|c| c.is_ascii_digit()) {
                    return Err(AmountError::Invalid);
                }
                if fraction.chars().any(|c| c != '0') {
                    return Err(AmountError::Fraction);
                }
                digits
            }
        };

        digits
            .parse::<i64>()
            .map(Rupiah)
            .map_err(|_| AmountError::Overflow)
    }
}

/// Digits of a plain (`15000`) or well-grouped (`15.000`) integer.
fn grouped_digits(s: &str) -> Option<String> {
    let mut groups = s.split(['.', ',']);
    let first = groups.next()?;
    let all_digits = |g: &str| !g.is_empty() && g.chars().all(|c| c.is_ascii_digit());
    if !all_digits(first) {
        return None;
    }
    let mut digits = first.to_string();
    let mut grouped = false;
    for group in groups {
        if group.len() != 3 || !all_digits(group) {
            return None;
        }
        digits.push_str(group);
        grouped = true;
    }
    if grouped && first.len() > 3 {
        return None;
    }
    Some(digits)
}
