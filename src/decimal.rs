//! Exact decimal numbers.
//!
//! A [`Decimal`] is a signed arbitrary-precision coefficient times a power
//! of ten. The representation is normalized on construction: the
//! coefficient carries no trailing zeros and zero is pinned to exponent 0,
//! so field-wise equality is numeric equality and the canonical text form
//! falls directly out of the stored fields.

use std::cmp::Ordering;
use std::fmt;

use num_bigint::{BigInt, Sign};
use num_traits::{Signed, Zero};

/// An exact base-10 number: `coefficient * 10^exponent`.
#[derive(Clone, PartialEq, Eq)]
pub struct Decimal {
    coefficient: BigInt,
    exponent: i64,
}

impl Decimal {
    /// Create a decimal with value `coefficient * 10^exponent`.
    pub fn new(coefficient: BigInt, exponent: i64) -> Self {
        let (coefficient, exponent) = normalize(coefficient, exponent);
        Self {
            coefficient,
            exponent,
        }
    }

    /// Parse a decimal literal: optional `-`, integer digits, optional `.`
    /// and fraction digits, optional `e`/`E` exponent with optional sign.
    ///
    /// Returns `None` when the exponent overflows the representable range.
    /// The caller is expected to have validated the literal's shape.
    pub(crate) fn from_literal(text: &str) -> Option<Self> {
        let (negative, body) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (mantissa, exponent) = match body.find(|c| c == 'e' || c == 'E') {
            Some(i) => (&body[..i], body[i + 1..].parse::<i64>().ok()?),
            None => (body, 0),
        };
        let (int_digits, frac_digits) = match mantissa.find('.') {
            Some(i) => (&mantissa[..i], &mantissa[i + 1..]),
            None => (mantissa, ""),
        };
        let mut digits = String::with_capacity(int_digits.len() + frac_digits.len());
        digits.push_str(int_digits);
        digits.push_str(frac_digits);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let mut coefficient: BigInt = digits.parse().ok()?;
        if negative {
            coefficient = -coefficient;
        }
        let exponent = exponent.checked_sub(i64::try_from(frac_digits.len()).ok()?)?;
        Some(Self::new(coefficient, exponent))
    }

    /// The normalized coefficient (no trailing zeros).
    pub fn coefficient(&self) -> &BigInt {
        &self.coefficient
    }

    /// The normalized base-10 exponent.
    pub fn exponent(&self) -> i64 {
        self.exponent
    }

    pub fn is_zero(&self) -> bool {
        self.coefficient.is_zero()
    }

    /// Exponent of the leading digit: `exponent + digits - 1`.
    fn adjusted_exponent(&self) -> i128 {
        let digits = self.coefficient.magnitude().to_string().len() as i128;
        self.exponent as i128 + digits - 1
    }
}

/// Strip trailing zeros from the coefficient, pinning zero to exponent 0.
fn normalize(mut coefficient: BigInt, mut exponent: i64) -> (BigInt, i64) {
    if coefficient.is_zero() {
        return (coefficient, 0);
    }
    let ten = BigInt::from(10);
    while (&coefficient % &ten).is_zero() {
        let Some(next) = exponent.checked_add(1) else {
            break;
        };
        coefficient /= &ten;
        exponent = next;
    }
    (coefficient, exponent)
}

fn sign_of(n: &BigInt) -> i8 {
    match n.sign() {
        Sign::Minus => -1,
        Sign::NoSign => 0,
        Sign::Plus => 1,
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let ls = sign_of(&self.coefficient);
        let rs = sign_of(&other.coefficient);
        if ls != rs {
            return ls.cmp(&rs);
        }
        if ls == 0 {
            return Ordering::Equal;
        }
        // Same nonzero sign. Compare leading-digit exponents first so a
        // huge scale difference never materializes as a huge integer.
        let la = self.adjusted_exponent();
        let ra = other.adjusted_exponent();
        if la != ra {
            return if ls > 0 { la.cmp(&ra) } else { ra.cmp(&la) };
        }
        // Equal adjusted exponents: the exponent gap is bounded by the
        // digit-count difference, so aligning is cheap.
        let shift = self.exponent - other.exponent;
        if shift >= 0 {
            let scaled = &self.coefficient * pow10(shift as usize);
            scaled.cmp(&other.coefficient)
        } else {
            let scaled = &other.coefficient * pow10((-shift) as usize);
            self.coefficient.cmp(&scaled)
        }
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn pow10(exp: usize) -> BigInt {
    num_traits::pow(BigInt::from(10), exp)
}

impl fmt::Display for Decimal {
    /// Canonical text form.
    ///
    /// Plain point notation when the exponent is negative and the adjusted
    /// exponent is at least -6 (`7.99`, `0.001`, `-0.5`); otherwise
    /// scientific notation with a single leading digit and an uppercase
    /// `E` (`1E0`, `7.99E3`, `5E-9`). Zero is `0E0`. The output always
    /// contains a `.` or an `E`, so it can never re-parse as an integer.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.coefficient.is_zero() {
            return write!(f, "0E0");
        }
        if self.coefficient.is_negative() {
            write!(f, "-")?;
        }
        let digits = self.coefficient.magnitude().to_string();
        let adjusted = self.exponent as i128 + digits.len() as i128 - 1;
        if self.exponent < 0 && adjusted >= -6 {
            let point = digits.len() as i64 + self.exponent;
            if point > 0 {
                write!(f, "{}.{}", &digits[..point as usize], &digits[point as usize..])
            } else {
                write!(f, "0.{}{}", "0".repeat((-point) as usize), digits)
            }
        } else if digits.len() == 1 {
            write!(f, "{}E{}", digits, adjusted)
        } else {
            write!(f, "{}.{}E{}", &digits[..1], &digits[1..], adjusted)
        }
    }
}

impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl From<i64> for Decimal {
    fn from(n: i64) -> Self {
        Decimal::new(BigInt::from(n), 0)
    }
}
