//! Coefficient kernel: unsigned-magnitude arithmetic on base-10^19 limb
//! vectors, with no rounding and no context awareness.

pub mod div;
pub mod mul;

use crate::common::buf::DigitBuf;
use crate::common::util::add_carry;
use crate::common::util::digits_in_limb;
use crate::common::util::pow10;
use crate::common::util::sub_borrow;
use crate::defs::DoubleLimb;
use crate::defs::Error;
use crate::defs::Limb;
use crate::defs::LIMB_DIGITS;
use crate::defs::RADIX;
use core::cmp::Ordering;
use itertools::izip;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Number of significant decimal digits in `m`; a zero coefficient counts as one digit.
pub fn digits_in(m: &[Limb]) -> usize {
    let mut n = m.len();
    while n > 0 && m[n - 1] == 0 {
        n -= 1;
    }

    if n == 0 {
        1
    } else {
        (n - 1) * LIMB_DIGITS + digits_in_limb(m[n - 1])
    }
}

/// Returns true if all limbs of `m` are zero.
pub fn is_zero(m: &[Limb]) -> bool {
    m.iter().all(|&d| d == 0)
}

/// Compares magnitudes, ignoring leading zero limbs. Runs in O(max(len)).
pub fn cmp(a: &[Limb], b: &[Limb]) -> Ordering {
    let mut la = a.len();
    while la > 0 && a[la - 1] == 0 {
        la -= 1;
    }
    let mut lb = b.len();
    while lb > 0 && b[lb - 1] == 0 {
        lb -= 1;
    }

    if la != lb {
        return la.cmp(&lb);
    }

    for (&x, &y) in a[..la].iter().rev().zip(b[..lb].iter().rev()) {
        if x != y {
            return x.cmp(&y);
        }
    }

    Ordering::Equal
}

/// Exact, unrounded sum of magnitudes.
pub fn add(a: &[Limb], b: &[Limb]) -> Result<DigitBuf, Error> {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };

    let mut m3 = DigitBuf::new(long.len())?;
    let mut c = 0;

    for (d, &x, &y) in izip!(m3.iter_mut(), long.iter(), short.iter().chain(core::iter::repeat(&0))) {
        c = add_carry(x, y, c, d);
    }

    if c > 0 {
        m3.try_push(c)?;
    }

    m3.trunc_leading_zeroes();

    Ok(m3)
}

/// Exact difference of magnitudes; `a` must not be less than `b`.
pub fn sub(a: &[Limb], b: &[Limb]) -> Result<DigitBuf, Error> {
    debug_assert!(cmp(a, b) != Ordering::Less);

    let mut m3 = DigitBuf::new(a.len())?;
    let mut c = 0;

    for (d, &x, &y) in izip!(m3.iter_mut(), a.iter(), b.iter().chain(core::iter::repeat(&0))) {
        c = sub_borrow(x, y, c, d);
    }

    debug_assert!(c == 0);

    m3.trunc_leading_zeroes();

    Ok(m3)
}

/// Adds one unit in the least significant digit.
pub fn incr(m: &mut DigitBuf) -> Result<(), Error> {
    let mut c = 1;

    for d in m.iter_mut() {
        c = add_carry(*d, 0, c, d);
        if c == 0 {
            break;
        }
    }

    if c > 0 {
        m.try_push(c)?;
    }

    Ok(())
}

/// Multiplies by 10^n exactly (shifts the digit string left).
pub fn shl_digits(a: &[Limb], n: usize) -> Result<DigitBuf, Error> {
    let ls = n / LIMB_DIGITS;
    let ds = n % LIMB_DIGITS;

    let mut m3 = DigitBuf::new_zeroed(a.len() + ls + 1)?;

    if ds == 0 {
        m3[ls..ls + a.len()].copy_from_slice(a);
    } else {
        let mul = pow10(ds);
        let mut c: Limb = 0;
        for (i, &d) in a.iter().enumerate() {
            let p = d as DoubleLimb * mul as DoubleLimb + c as DoubleLimb;
            m3[ls + i] = (p % RADIX as DoubleLimb) as Limb;
            c = (p / RADIX as DoubleLimb) as Limb;
        }
        m3[ls + a.len()] = c;
    }

    m3.trunc_leading_zeroes();

    Ok(m3)
}

/// Divides by 10^n, dropping the low `n` digits.
///
/// Returns the shifted coefficient, the most significant dropped digit (the
/// rounding digit), and a sticky indicator: true if any further dropped
/// digit was nonzero. This is exactly the information the rounding layer
/// needs for a correct round-to-nearest decision.
pub fn shr_digits(a: &[Limb], n: usize) -> Result<(DigitBuf, u8, bool), Error> {
    if n == 0 {
        let mut m3 = DigitBuf::from_limbs(a)?;
        m3.trunc_leading_zeroes();
        return Ok((m3, 0, false));
    }

    // rounding digit at position n-1 (least significant digit is position 0)
    let li = (n - 1) / LIMB_DIGITS;
    let pos = (n - 1) % LIMB_DIGITS;
    let rnd = if li < a.len() { ((a[li] / pow10(pos)) % 10) as u8 } else { 0 };

    let mut sticky = a[..li.min(a.len())].iter().any(|&d| d != 0);
    if !sticky && li < a.len() && pos > 0 {
        sticky = a[li] % pow10(pos) != 0;
    }

    let ls = n / LIMB_DIGITS;
    let ds = n % LIMB_DIGITS;

    let mut m3 = if ls >= a.len() {
        DigitBuf::new_zeroed(1)?
    } else if ds == 0 {
        DigitBuf::from_limbs(&a[ls..])?
    } else {
        let div = pow10(ds);
        let mul = pow10(LIMB_DIGITS - ds);
        let mut m3 = DigitBuf::new(a.len() - ls)?;
        for i in 0..m3.len() {
            let hi = if ls + i + 1 < a.len() { a[ls + i + 1] % div } else { 0 };
            m3[i] = a[ls + i] / div + hi * mul;
        }
        m3
    };

    m3.trunc_leading_zeroes();

    Ok((m3, rnd, sticky))
}

/// Builds a coefficient from decimal digits given in big-endian order.
pub fn from_digits(digits: &[u8]) -> Result<DigitBuf, Error> {
    let mut start = 0;
    while start + 1 < digits.len() && digits[start] == 0 {
        start += 1;
    }
    let digits = &digits[start..];

    let nl = (digits.len() + LIMB_DIGITS - 1) / LIMB_DIGITS;
    let mut m = DigitBuf::new_zeroed(nl.max(1))?;

    let mut i = 0;
    let mut chunk_end = digits.len();
    while chunk_end > 0 {
        let chunk_start = chunk_end.saturating_sub(LIMB_DIGITS);
        let mut v: Limb = 0;
        for &d in &digits[chunk_start..chunk_end] {
            v = v * 10 + d as Limb;
        }
        m[i] = v;
        i += 1;
        chunk_end = chunk_start;
    }

    m.trunc_leading_zeroes();

    Ok(m)
}

/// Extracts decimal digits in big-endian order, without leading zeroes.
pub fn to_digits(m: &[Limb]) -> Result<Vec<u8>, Error> {
    let digits = digits_in(m);

    let mut out = Vec::new();
    out.try_reserve_exact(digits)?;
    out.resize(digits, 0);

    for (i, slot) in out.iter_mut().rev().enumerate() {
        let li = i / LIMB_DIGITS;
        let pos = i % LIMB_DIGITS;
        if li < m.len() {
            *slot = ((m[li] / pow10(pos)) % 10) as u8;
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_digits_in() {
        assert_eq!(digits_in(&[0]), 1);
        assert_eq!(digits_in(&[9]), 1);
        assert_eq!(digits_in(&[123]), 3);
        assert_eq!(digits_in(&[0, 1]), LIMB_DIGITS + 1);
        assert_eq!(digits_in(&[5, 0]), 1);
    }

    #[test]
    fn test_cmp() {
        assert_eq!(cmp(&[1], &[2]), Ordering::Less);
        assert_eq!(cmp(&[2, 1], &[2, 1]), Ordering::Equal);
        assert_eq!(cmp(&[0, 2], &[RADIX - 1]), Ordering::Greater);
        assert_eq!(cmp(&[5, 0, 0], &[5]), Ordering::Equal);
    }

    #[test]
    fn test_add_sub() {
        let s = add(&[RADIX - 1], &[1]).unwrap();
        assert_eq!(&s[..], &[0, 1]);

        let d = sub(&[0, 1], &[1]).unwrap();
        assert_eq!(&d[..], &[RADIX - 1]);

        let d = sub(&[7, 3], &[7, 3]).unwrap();
        assert_eq!(&d[..], &[0]);
    }

    #[test]
    fn test_incr() {
        let mut m = DigitBuf::from_limbs(&[RADIX - 1, RADIX - 1]).unwrap();
        incr(&mut m).unwrap();
        assert_eq!(&m[..], &[0, 0, 1]);
    }

    #[test]
    fn test_shl_shr() {
        let m = shl_digits(&[123], 2).unwrap();
        assert_eq!(&m[..], &[12300]);

        let m = shl_digits(&[123], LIMB_DIGITS).unwrap();
        assert_eq!(&m[..], &[0, 123]);

        // 12345 >> 2: result 123, rounding digit 4, sticky from the 5
        let (m, rnd, sticky) = shr_digits(&[12345], 2).unwrap();
        assert_eq!(&m[..], &[123]);
        assert_eq!(rnd, 4);
        assert!(sticky);

        let (m, rnd, sticky) = shr_digits(&[12300], 2).unwrap();
        assert_eq!(&m[..], &[123]);
        assert_eq!(rnd, 0);
        assert!(!sticky);

        // drop everything
        let (m, rnd, sticky) = shr_digits(&[5], 1).unwrap();
        assert_eq!(&m[..], &[0]);
        assert_eq!(rnd, 5);
        assert!(!sticky);

        let (m, rnd, sticky) = shr_digits(&[5], 100).unwrap();
        assert_eq!(&m[..], &[0]);
        assert_eq!(rnd, 0);
        assert!(sticky);

        // cross-limb shift
        let big = shl_digits(&[987654321], LIMB_DIGITS + 3).unwrap();
        let (back, rnd, sticky) = shr_digits(&big, LIMB_DIGITS + 3).unwrap();
        assert_eq!(&back[..], &[987654321]);
        assert_eq!(rnd, 0);
        assert!(!sticky);
    }

    #[test]
    fn test_digit_round_trip() {
        let m = from_digits(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 1]).unwrap();
        assert_eq!(digits_in(&m), 21);
        let d = to_digits(&m).unwrap();
        assert_eq!(d, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 1]);

        let z = from_digits(&[0, 0, 0]).unwrap();
        assert_eq!(&z[..], &[0]);
        assert_eq!(to_digits(&z).unwrap(), &[0]);
    }
}
