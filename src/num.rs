//! DecNumber definition: a finite decimal value with an arbitrary-length
//! coefficient, an exponent, and a sign. Exact (unrounded) arithmetic lives
//! here; rounding and range enforcement live in the context layer.

use crate::coefficient;
use crate::common::buf::DigitBuf;
use crate::defs::DoubleLimb;
use crate::defs::Error;
use crate::defs::Exponent;
use crate::defs::Limb;
use crate::defs::Sign;
use crate::defs::LIMB_DIGITS;
use crate::defs::RADIX;
use core::cmp::Ordering;

/// A finite decimal number: value = (-1)^sign * coefficient * 10^exp.
///
/// Invariants, checked at every mutation boundary: the coefficient has no
/// leading zero limbs (a value of zero is a single zero limb), and `digits`
/// always equals the true significant digit count of the coefficient.
#[derive(Debug, Hash)]
pub(crate) struct DecNumber {
    pub(crate) sign: Sign,
    pub(crate) exp: Exponent,
    pub(crate) digits: usize,
    pub(crate) data: DigitBuf,
}

impl DecNumber {
    /// Returns a new number with the value of zero.
    pub fn new_zero() -> Result<Self, Error> {
        Ok(DecNumber {
            sign: Sign::Pos,
            exp: 0,
            digits: 1,
            data: DigitBuf::new_zeroed(1)?,
        })
    }

    /// Returns a new number with the value `d`; `d` must be below RADIX.
    pub fn from_limb(d: Limb) -> Result<Self, Error> {
        debug_assert!(d < RADIX);
        let n = DecNumber {
            sign: Sign::Pos,
            exp: 0,
            digits: crate::common::util::digits_in_limb(d),
            data: DigitBuf::single(d)?,
        };
        Ok(n)
    }

    /// Returns a new number with the value `v`.
    pub fn from_u128(mut v: u128) -> Result<Self, Error> {
        let mut data = DigitBuf::new_zeroed(1)?;
        let mut i = 0;
        while v > 0 {
            let d = (v % RADIX as DoubleLimb as u128) as Limb;
            if i < data.len() {
                data[i] = d;
            } else {
                data.try_push(d)?;
            }
            v /= RADIX as DoubleLimb as u128;
            i += 1;
        }

        let mut n = DecNumber { sign: Sign::Pos, exp: 0, digits: 0, data };
        n.update_digits();
        Ok(n)
    }

    /// Builds a number from big-endian decimal digits (parser output).
    pub fn from_digits_parts(sign: Sign, digits: &[u8], exp: Exponent) -> Result<Self, Error> {
        let data = coefficient::from_digits(digits)?;
        let mut n = DecNumber { sign, exp, digits: 0, data };
        n.update_digits();
        Ok(n)
    }

    /// Deep copy of `self`.
    pub fn try_clone(&self) -> Result<Self, Error> {
        Ok(DecNumber {
            sign: self.sign,
            exp: self.exp,
            digits: self.digits,
            data: self.data.try_clone()?,
        })
    }

    /// Returns true if the coefficient is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        coefficient::is_zero(&self.data)
    }

    /// Returns true if the value is an integer (no fractional digits).
    pub fn is_integer(&self) -> bool {
        if self.exp >= 0 || self.is_zero() {
            return true;
        }

        // all digits below the decimal point must be zero
        let frac = (-self.exp) as usize;
        if frac >= self.digits {
            return false;
        }
        match coefficient::shr_digits(&self.data, frac) {
            Ok((_, rnd, sticky)) => rnd == 0 && !sticky,
            Err(_) => false,
        }
    }

    /// The adjusted exponent: exp + digits - 1.
    #[inline]
    pub fn adjusted(&self) -> Exponent {
        self.exp + self.digits as Exponent - 1
    }

    /// Recomputes the cached digit count from the coefficient.
    #[inline]
    pub fn update_digits(&mut self) {
        self.digits = coefficient::digits_in(&self.data);
        debug_assert!(self.is_valid());
    }

    // Invariant check for mutation boundaries.
    pub(crate) fn is_valid(&self) -> bool {
        !self.data.is_empty()
            && (self.data.len() == 1 || self.data[self.data.len() - 1] != 0)
            && self.digits == coefficient::digits_in(&self.data)
    }

    /// Multiplies the coefficient by 10^n and lowers the exponent accordingly,
    /// preserving the numeric value.
    pub fn pad_to_exp(&mut self, new_exp: Exponent) -> Result<(), Error> {
        debug_assert!(new_exp <= self.exp);
        let n = (self.exp - new_exp) as usize;
        if n == 0 {
            return Ok(());
        }
        self.data = coefficient::shl_digits(&self.data, n)?;
        self.exp = new_exp;
        self.update_digits();
        Ok(())
    }

    /// Compares magnitudes, aligning exponents.
    pub fn cmp_abs(&self, other: &Self) -> Result<Ordering, Error> {
        match (self.is_zero(), other.is_zero()) {
            (true, true) => return Ok(Ordering::Equal),
            (true, false) => return Ok(Ordering::Less),
            (false, true) => return Ok(Ordering::Greater),
            _ => {}
        }

        let adj_cmp = self.adjusted().cmp(&other.adjusted());
        if adj_cmp != Ordering::Equal {
            return Ok(adj_cmp);
        }

        // same adjusted exponent: align the coefficients and compare digit-wise
        if self.exp > other.exp {
            let shifted = coefficient::shl_digits(&self.data, (self.exp - other.exp) as usize)?;
            Ok(coefficient::cmp(&shifted, &other.data))
        } else if self.exp < other.exp {
            let shifted = coefficient::shl_digits(&other.data, (other.exp - self.exp) as usize)?;
            Ok(coefficient::cmp(&self.data, &shifted))
        } else {
            Ok(coefficient::cmp(&self.data, &other.data))
        }
    }

    /// Compares values taking signs into account.
    pub fn cmp_num(&self, other: &Self) -> Result<Ordering, Error> {
        if self.is_zero() && other.is_zero() {
            return Ok(Ordering::Equal);
        }

        match (self.sign, other.sign) {
            (Sign::Pos, Sign::Neg) => {
                if self.is_zero() && other.is_zero() {
                    Ok(Ordering::Equal)
                } else {
                    Ok(Ordering::Greater)
                }
            }
            (Sign::Neg, Sign::Pos) => Ok(Ordering::Less),
            (Sign::Pos, Sign::Pos) => self.cmp_abs(other),
            (Sign::Neg, Sign::Neg) => Ok(self.cmp_abs(other)?.reverse()),
        }
    }

    /// Exact signed sum of `self` and `other`; no rounding, no digit loss.
    /// An exact cancellation yields a positive zero; the caller adjusts the
    /// sign of zero for the floor rounding mode.
    pub fn add_exact(&self, other: &Self) -> Result<Self, Error> {
        let e = self.exp.min(other.exp);

        // pad at most one of the operands
        let mut a_pad;
        let a: &DecNumber = if self.exp > e {
            a_pad = self.try_clone()?;
            a_pad.pad_to_exp(e)?;
            &a_pad
        } else {
            self
        };
        let mut b_pad;
        let b: &DecNumber = if other.exp > e {
            b_pad = other.try_clone()?;
            b_pad.pad_to_exp(e)?;
            &b_pad
        } else {
            other
        };

        let mut r = if a.sign == b.sign {
            let data = coefficient::add(&a.data, &b.data)?;
            DecNumber { sign: a.sign, exp: e, digits: 0, data }
        } else {
            match coefficient::cmp(&a.data, &b.data) {
                Ordering::Equal => DecNumber::new_zero()?,
                Ordering::Greater => {
                    let data = coefficient::sub(&a.data, &b.data)?;
                    DecNumber { sign: a.sign, exp: e, digits: 0, data }
                }
                Ordering::Less => {
                    let data = coefficient::sub(&b.data, &a.data)?;
                    DecNumber { sign: b.sign, exp: e, digits: 0, data }
                }
            }
        };

        if r.is_zero() {
            r.exp = e;
            r.sign = Sign::Pos;
        }
        r.update_digits();

        Ok(r)
    }

    /// Exact product of `self` and `other`.
    pub fn mul_exact(&self, other: &Self) -> Result<Self, Error> {
        let sign = if self.sign == other.sign { Sign::Pos } else { Sign::Neg };
        let exp = self.exp.checked_add(other.exp).ok_or(Error::InvalidArgument)?;
        let data = coefficient::mul::mul(&self.data, &other.data)?;

        let mut r = DecNumber { sign, exp, digits: 0, data };
        if r.is_zero() {
            r.exp = exp;
        }
        r.update_digits();

        Ok(r)
    }

    /// The coefficient as a 128-bit integer, if it fits.
    pub fn coefficient_to_u128(&self) -> Option<u128> {
        if self.digits > 39 {
            return None;
        }

        let mut v: u128 = 0;
        for &d in self.data.iter().rev() {
            v = v.checked_mul(RADIX as DoubleLimb as u128)?;
            v = v.checked_add(d as u128)?;
        }
        Some(v)
    }

    /// Removes trailing zero digits of the coefficient, raising the exponent,
    /// but not above `max_exp`.
    pub fn strip_trailing_zeroes(&mut self, max_exp: Exponent) -> Result<(), Error> {
        if self.is_zero() {
            if self.exp > max_exp {
                self.exp = max_exp;
            }
            return Ok(());
        }

        let mut n = 0usize;
        loop {
            if self.exp + n as Exponent >= max_exp || n >= self.digits.saturating_sub(1) {
                break;
            }
            let li = n / LIMB_DIGITS;
            let pos = n % LIMB_DIGITS;
            let digit = (self.data[li] / crate::common::util::pow10(pos)) % 10;
            if digit != 0 {
                break;
            }
            n += 1;
        }

        if n > 0 {
            let (data, rnd, sticky) = coefficient::shr_digits(&self.data, n)?;
            debug_assert!(rnd == 0 && !sticky);
            self.data = data;
            self.exp += n as Exponent;
            self.update_digits();
        }

        Ok(())
    }
}
