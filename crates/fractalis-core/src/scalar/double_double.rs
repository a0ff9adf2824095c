use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, Sub, SubAssign};
use std::str::FromStr;

use num_traits::{Num, One, Zero};

use crate::error::FractalisError;

/// Real number stored as the unevaluated sum `hi + lo` of two doubles,
/// with `|lo| <= ulp(hi) / 2`. Gives roughly 31 significant decimal digits.
///
/// Arithmetic follows the classic error-free transformations (Dekker,
/// Knuth two-sum) with FMA-based products.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DoubleDouble {
    hi: f64,
    lo: f64,
}

/// `a + b = s + e` exactly.
#[inline]
fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let bb = s - a;
    let e = (a - (s - bb)) + (b - bb);
    (s, e)
}

/// `a + b = s + e` exactly, assuming `|a| >= |b|`.
#[inline]
fn quick_two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let e = b - (s - a);
    (s, e)
}

/// `a * b = p + e` exactly.
#[inline]
fn two_prod(a: f64, b: f64) -> (f64, f64) {
    let p = a * b;
    let e = a.mul_add(b, -p);
    (p, e)
}

/// Multiply by `2^exp` without overflowing the intermediate power.
fn ldexp(x: f64, exp: i32) -> f64 {
    let half = exp / 2;
    x * 2f64.powi(half) * 2f64.powi(exp - half)
}

impl DoubleDouble {
    pub const ZERO: Self = Self { hi: 0.0, lo: 0.0 };
    pub const ONE: Self = Self { hi: 1.0, lo: 0.0 };

    /// Natural logarithm of 2.
    pub const LN_2: Self = Self {
        hi: std::f64::consts::LN_2,
        lo: 2.319_046_813_846_299_6e-17,
    };

    /// Natural logarithm of 10.
    pub const LN_10: Self = Self {
        hi: std::f64::consts::LN_10,
        lo: -2.170_756_223_382_249_2e-16,
    };

    pub const PI: Self = Self {
        hi: std::f64::consts::PI,
        lo: 1.224_646_799_147_353_2e-16,
    };

    pub const E: Self = Self {
        hi: std::f64::consts::E,
        lo: 1.445_646_891_729_250_2e-16,
    };

    /// Build from two components, renormalising so the invariant holds.
    pub fn new(hi: f64, lo: f64) -> Self {
        let (hi, lo) = two_sum(hi, lo);
        Self { hi, lo }
    }

    pub fn from_f64(value: f64) -> Self {
        Self { hi: value, lo: 0.0 }
    }

    /// Leading component.
    pub fn hi(self) -> f64 {
        self.hi
    }

    /// Trailing correction.
    pub fn lo(self) -> f64 {
        self.lo
    }

    /// Nearest native double; the trailing component is dropped.
    pub fn to_f64(self) -> f64 {
        self.hi
    }

    pub fn is_nan(self) -> bool {
        self.hi.is_nan()
    }

    pub fn is_finite(self) -> bool {
        self.hi.is_finite()
    }

    pub fn is_sign_negative(self) -> bool {
        self.hi < 0.0 || (self.hi == 0.0 && self.lo < 0.0)
    }

    pub fn abs(self) -> Self {
        if self.is_sign_negative() {
            -self
        } else {
            self
        }
    }

    /// Exact square of a native double.
    fn sqr_f64(a: f64) -> Self {
        let (p, e) = two_prod(a, a);
        Self { hi: p, lo: e }
    }

    pub fn square(self) -> Self {
        let (p1, mut p2) = two_prod(self.hi, self.hi);
        p2 += 2.0 * self.hi * self.lo;
        p2 += self.lo * self.lo;
        let (hi, lo) = quick_two_sum(p1, p2);
        Self { hi, lo }
    }

    /// Multiply by a power of two. Exact unless the result under/overflows.
    pub fn mul_pow2(self, exp: i32) -> Self {
        Self {
            hi: ldexp(self.hi, exp),
            lo: ldexp(self.lo, exp),
        }
    }

    pub fn recip(self) -> Self {
        Self::ONE / self
    }

    pub fn floor(self) -> Self {
        let hi = self.hi.floor();
        if hi == self.hi {
            let (hi, lo) = quick_two_sum(hi, self.lo.floor());
            Self { hi, lo }
        } else {
            Self { hi, lo: 0.0 }
        }
    }

    pub fn trunc(self) -> Self {
        if self.is_sign_negative() {
            -((-self).floor())
        } else {
            self.floor()
        }
    }

    /// Square root by one Newton step on the reciprocal root of `hi`.
    /// Negative inputs yield NaN.
    pub fn sqrt(self) -> Self {
        if self.is_zero() {
            return Self::ZERO;
        }
        if self.is_sign_negative() {
            return Self::from_f64(f64::NAN);
        }
        let x = 1.0 / self.hi.sqrt();
        let ax = self.hi * x;
        let correction = (self - Self::sqr_f64(ax)).hi * (x * 0.5);
        let (hi, lo) = two_sum(ax, correction);
        Self { hi, lo }
    }

    /// `e^self`.
    ///
    /// Reduces the argument to `r = (x - m ln 2) / 512`, sums the Taylor
    /// series of `e^r - 1`, squares back up nine times, then rescales by `2^m`.
    pub fn exp(self) -> Self {
        if self.hi > 709.782_712_893_384 {
            return Self::from_f64(f64::INFINITY);
        }
        if self.hi < -745.0 {
            return Self::ZERO;
        }
        if self.is_zero() {
            return Self::ONE;
        }

        let m = (self.hi / Self::LN_2.hi + 0.5).floor();
        let r = (self - Self::LN_2 * m).mul_pow2(-9);

        let mut term = r;
        let mut sum = r;
        for n in 2..30 {
            term = term * r / n as f64;
            sum += term;
            if term.hi.abs() <= 1e-34 * sum.hi.abs().max(f64::MIN_POSITIVE) {
                break;
            }
        }

        for _ in 0..9 {
            sum = sum.mul_pow2(1) + sum.square();
        }
        (sum + 1.0).mul_pow2(m as i32)
    }

    /// Natural logarithm by one Newton step `x + a e^-x - 1` from the native
    /// estimate. Zero yields negative infinity, negative inputs NaN.
    pub fn ln(self) -> Self {
        if self.is_zero() {
            return Self::from_f64(f64::NEG_INFINITY);
        }
        if self.is_sign_negative() {
            return Self::from_f64(f64::NAN);
        }
        if self == Self::ONE {
            return Self::ZERO;
        }
        let x = Self::from_f64(self.hi.ln());
        x + self * (-x).exp() - 1.0
    }

    pub fn log2(self) -> Self {
        self.ln() / Self::LN_2
    }

    pub fn log10(self) -> Self {
        self.ln() / Self::LN_10
    }

    /// Integer power by repeated squaring.
    pub fn powi(self, n: i32) -> Self {
        if n == 0 {
            return Self::ONE;
        }
        let mut base = self;
        let mut exp = n.unsigned_abs();
        let mut acc = Self::ONE;
        while exp > 0 {
            if exp & 1 == 1 {
                acc *= base;
            }
            exp >>= 1;
            if exp > 0 {
                base = base.square();
            }
        }
        if n < 0 {
            acc.recip()
        } else {
            acc
        }
    }

    pub fn min(self, other: Self) -> Self {
        if other < self {
            other
        } else {
            self
        }
    }

    pub fn max(self, other: Self) -> Self {
        if other > self {
            other
        } else {
            self
        }
    }

    /// Fixed-point decimal rendering with exactly `decimals` fractional digits.
    pub fn to_string_fixed(self, decimals: usize) -> String {
        if self.is_nan() {
            return "NaN".into();
        }
        if !self.is_finite() {
            return if self.hi > 0.0 { "inf".into() } else { "-inf".into() };
        }

        let negative = self.is_sign_negative();
        let rounding = Self::from_f64(0.5) * Self::from_f64(10.0).powi(-(decimals as i32));
        let magnitude = self.abs() + rounding;

        let int_part = magnitude.floor();
        let mut frac = magnitude - int_part;

        let mut out = String::new();
        if negative && !(magnitude - rounding).is_zero() {
            out.push('-');
        }
        out.push_str(&format_integer(int_part));

        if decimals > 0 {
            out.push('.');
            for _ in 0..decimals {
                frac *= 10.0;
                let digit = frac.hi.floor().clamp(0.0, 9.0);
                out.push(char::from(b'0' + digit as u8));
                frac -= digit;
            }
        }
        out
    }
}

/// Integer part of a non-negative value, which may exceed `u64`.
fn format_integer(value: DoubleDouble) -> String {
    if value.hi < 1e18 {
        let hi = value.hi as i128;
        let lo = value.lo.round() as i128;
        return (hi + lo).max(0).to_string();
    }
    format!("{:.0}", value.hi)
}

impl From<f64> for DoubleDouble {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<f32> for DoubleDouble {
    fn from(value: f32) -> Self {
        Self::from_f64(value as f64)
    }
}

impl From<i32> for DoubleDouble {
    fn from(value: i32) -> Self {
        Self::from_f64(value as f64)
    }
}

impl From<u32> for DoubleDouble {
    fn from(value: u32) -> Self {
        Self::from_f64(value as f64)
    }
}

impl From<i64> for DoubleDouble {
    fn from(value: i64) -> Self {
        let hi = value as f64;
        let lo = (value as i128 - hi as i128) as f64;
        Self::new(hi, lo)
    }
}

impl From<usize> for DoubleDouble {
    fn from(value: usize) -> Self {
        Self::from(value as i64)
    }
}

impl From<DoubleDouble> for f64 {
    fn from(value: DoubleDouble) -> Self {
        value.to_f64()
    }
}

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

impl Add for DoubleDouble {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let (s1, s2) = two_sum(self.hi, rhs.hi);
        let (t1, t2) = two_sum(self.lo, rhs.lo);
        let (s1, s2) = quick_two_sum(s1, s2 + t1);
        let (hi, lo) = quick_two_sum(s1, s2 + t2);
        Self { hi, lo }
    }
}

impl Add<f64> for DoubleDouble {
    type Output = Self;

    fn add(self, rhs: f64) -> Self {
        let (s1, s2) = two_sum(self.hi, rhs);
        let (hi, lo) = quick_two_sum(s1, s2 + self.lo);
        Self { hi, lo }
    }
}

impl Sub for DoubleDouble {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl Sub<f64> for DoubleDouble {
    type Output = Self;

    fn sub(self, rhs: f64) -> Self {
        self + (-rhs)
    }
}

impl Mul for DoubleDouble {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let (p1, mut p2) = two_prod(self.hi, rhs.hi);
        p2 += self.hi * rhs.lo + self.lo * rhs.hi;
        let (hi, lo) = quick_two_sum(p1, p2);
        Self { hi, lo }
    }
}

impl Mul<f64> for DoubleDouble {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        let (p1, mut p2) = two_prod(self.hi, rhs);
        p2 += self.lo * rhs;
        let (hi, lo) = quick_two_sum(p1, p2);
        Self { hi, lo }
    }
}

impl Div for DoubleDouble {
    type Output = Self;

    /// Long division with three quotient digits.
    fn div(self, rhs: Self) -> Self {
        let q1 = self.hi / rhs.hi;
        let mut r = self - rhs * q1;
        let q2 = r.hi / rhs.hi;
        r -= rhs * q2;
        let q3 = r.hi / rhs.hi;
        let (hi, lo) = quick_two_sum(q1, q2);
        Self { hi, lo } + q3
    }
}

impl Div<f64> for DoubleDouble {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        self / Self::from_f64(rhs)
    }
}

impl Rem for DoubleDouble {
    type Output = Self;

    fn rem(self, rhs: Self) -> Self {
        self - rhs * (self / rhs).trunc()
    }
}

impl Neg for DoubleDouble {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            hi: -self.hi,
            lo: -self.lo,
        }
    }
}

impl AddAssign for DoubleDouble {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl AddAssign<f64> for DoubleDouble {
    fn add_assign(&mut self, rhs: f64) {
        *self = *self + rhs;
    }
}

impl SubAssign for DoubleDouble {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl SubAssign<f64> for DoubleDouble {
    fn sub_assign(&mut self, rhs: f64) {
        *self = *self - rhs;
    }
}

impl MulAssign for DoubleDouble {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl MulAssign<f64> for DoubleDouble {
    fn mul_assign(&mut self, rhs: f64) {
        *self = *self * rhs;
    }
}

impl DivAssign for DoubleDouble {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl Sum for DoubleDouble {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl PartialOrd for DoubleDouble {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.hi.partial_cmp(&other.hi)? {
            Ordering::Equal => self.lo.partial_cmp(&other.lo),
            ord => Some(ord),
        }
    }
}

impl PartialEq<f64> for DoubleDouble {
    fn eq(&self, other: &f64) -> bool {
        self.hi == *other && self.lo == 0.0
    }
}

impl PartialOrd<f64> for DoubleDouble {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        self.partial_cmp(&Self::from_f64(*other))
    }
}

// ---------------------------------------------------------------------------
// num-traits, so `num_complex::Complex<DoubleDouble>` gets `z * z + c`
// ---------------------------------------------------------------------------

impl Zero for DoubleDouble {
    fn zero() -> Self {
        Self::ZERO
    }

    fn is_zero(&self) -> bool {
        self.hi == 0.0 && self.lo == 0.0
    }
}

impl One for DoubleDouble {
    fn one() -> Self {
        Self::ONE
    }
}

impl Num for DoubleDouble {
    type FromStrRadixErr = FractalisError;

    fn from_str_radix(s: &str, radix: u32) -> Result<Self, Self::FromStrRadixErr> {
        if radix != 10 {
            return Err(FractalisError::ParseScalar(format!(
                "radix {radix} is not supported: {s}"
            )));
        }
        s.parse()
    }
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

impl FromStr for DoubleDouble {
    type Err = FractalisError;

    /// Parse a decimal literal such as `-0.74364388703715870475219` or
    /// `1.5e-20`, keeping every digit the representation can hold.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FractalisError::ParseScalar(s.to_string());
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(invalid());
        }

        let (negative, body) = match trimmed.as_bytes()[0] {
            b'-' => (true, &trimmed[1..]),
            b'+' => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (mantissa, exponent) = match body.find(['e', 'E']) {
            Some(pos) => {
                let exp: i32 = body[pos + 1..].parse().map_err(|_| invalid())?;
                (&body[..pos], exp)
            }
            None => (body, 0),
        };

        let mut value = Self::ZERO;
        let mut digits = 0usize;
        let mut decimals = 0i32;
        let mut seen_point = false;
        for ch in mantissa.chars() {
            match ch {
                '0'..='9' => {
                    value = value * 10.0 + f64::from(ch as u8 - b'0');
                    digits += 1;
                    if seen_point {
                        decimals += 1;
                    }
                }
                '.' if !seen_point => seen_point = true,
                '_' => {}
                _ => return Err(invalid()),
            }
        }
        if digits == 0 {
            return Err(invalid());
        }

        let scale = exponent - decimals;
        let ten = Self::from_f64(10.0);
        let value = match scale.cmp(&0) {
            Ordering::Greater => value * ten.powi(scale),
            Ordering::Less => value / ten.powi(-scale),
            Ordering::Equal => value,
        };

        Ok(if negative { -value } else { value })
    }
}

impl fmt::Display for DoubleDouble {
    /// `{}` prints up to 32 fractional digits with trailing zeros removed;
    /// `{:.N}` prints exactly `N`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(decimals) => f.pad(&self.to_string_fixed(decimals)),
            None => {
                let full = self.to_string_fixed(32);
                let trimmed = if full.contains('.') {
                    full.trim_end_matches('0').trim_end_matches('.')
                } else {
                    full.as_str()
                };
                f.pad(trimmed)
            }
        }
    }
}
