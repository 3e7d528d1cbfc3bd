//! Long division of coefficients: Knuth's algorithm D adapted to radix 10^19.

use crate::common::buf::DigitBuf;
use crate::common::util::add_carry;
use crate::common::util::mul_add;
use crate::common::util::sub_borrow;
use crate::defs::DoubleLimb;
use crate::defs::Error;
use crate::defs::Limb;
use crate::defs::RADIX;
use core::cmp::Ordering;

/// Divides magnitudes, returning the integer quotient and the exact
/// remainder. The remainder is what feeds downstream rounding decisions;
/// a nonzero remainder means the quotient is inexact.
pub fn div_rem(u: &[Limb], v: &[Limb]) -> Result<(DigitBuf, DigitBuf), Error> {
    let mut lv = v.len();
    while lv > 0 && v[lv - 1] == 0 {
        lv -= 1;
    }
    debug_assert!(lv > 0, "division by zero coefficient");
    let v = &v[..lv];

    let mut lu = u.len();
    while lu > 0 && u[lu - 1] == 0 {
        lu -= 1;
    }
    let u = &u[..lu];

    if super::cmp(u, v) == Ordering::Less {
        let q = DigitBuf::new_zeroed(1)?;
        let mut r = if u.is_empty() { DigitBuf::new_zeroed(1)? } else { DigitBuf::from_limbs(u)? };
        r.trunc_leading_zeroes();
        return Ok((q, r));
    }

    if lv == 1 {
        let (q, r) = div_rem_limb(u, v[0])?;
        let rem = DigitBuf::single(r)?;
        return Ok((q, rem));
    }

    // D1: normalize so that the top limb of v is at least RADIX / 2.
    let f = RADIX / (v[lv - 1] + 1);
    let mut un = mul_limb(u, f)?;
    let vn = mul_limb_trunc(v, f)?;
    debug_assert_eq!(vn.len(), lv);

    let n = lv;
    let m = un.len() - n;
    let b = RADIX as DoubleLimb;

    let mut q = DigitBuf::new_zeroed(m)?;

    // D2..D7: quotient limbs from the most significant position down.
    for j in (0..m).rev() {
        // D3: estimate the quotient limb.
        let num = un[j + n] as DoubleLimb * b + un[j + n - 1] as DoubleLimb;
        let mut qhat = num / vn[n - 1] as DoubleLimb;
        let mut rhat = num % vn[n - 1] as DoubleLimb;

        while qhat >= b
            || qhat * vn[n - 2] as DoubleLimb > rhat * b + un[j + n - 2] as DoubleLimb
        {
            qhat -= 1;
            rhat += vn[n - 1] as DoubleLimb;
            if rhat >= b {
                break;
            }
        }

        // D4: multiply and subtract.
        let qh = qhat as Limb;
        let mut carry: Limb = 0;
        let mut borrow: Limb = 0;
        for i in 0..n {
            let (hi, lo) = mul_add(qh, vn[i], 0, carry);
            carry = hi;
            borrow = sub_borrow(un[j + i], lo, borrow, &mut un[j + i]);
        }
        borrow = sub_borrow(un[j + n], carry, borrow, &mut un[j + n]);

        // D6: the estimate was one too large; add the divisor back.
        if borrow > 0 {
            let mut c: Limb = 0;
            for i in 0..n {
                c = add_carry(un[j + i], vn[i], c, &mut un[j + i]);
            }
            add_carry(un[j + n], 0, c, &mut un[j + n]);
            q[j] = qh - 1;
        } else {
            q[j] = qh;
        }
    }

    // D8: unnormalize the remainder.
    un.truncate(n);
    let (mut r, rr) = div_rem_limb(&un, f)?;
    debug_assert_eq!(rr, 0);

    q.trunc_leading_zeroes();
    r.trunc_leading_zeroes();

    Ok((q, r))
}

/// Division by a single limb.
pub fn div_rem_limb(a: &[Limb], d: Limb) -> Result<(DigitBuf, Limb), Error> {
    debug_assert!(d != 0);

    let mut q = DigitBuf::new_zeroed(a.len().max(1))?;
    let mut r: DoubleLimb = 0;

    for i in (0..a.len()).rev() {
        let cur = r * RADIX as DoubleLimb + a[i] as DoubleLimb;
        q[i] = (cur / d as DoubleLimb) as Limb;
        r = cur % d as DoubleLimb;
    }

    q.trunc_leading_zeroes();

    Ok((q, r as Limb))
}

// a * f with the carry limb kept.
fn mul_limb(a: &[Limb], f: Limb) -> Result<DigitBuf, Error> {
    let mut m = DigitBuf::new(a.len() + 1)?;
    let mut c: Limb = 0;

    for (i, &d) in a.iter().enumerate() {
        let (hi, lo) = mul_add(d, f, 0, c);
        m[i] = lo;
        c = hi;
    }
    m[a.len()] = c;

    Ok(m)
}

// a * f; the product is known not to carry past a.len() limbs.
fn mul_limb_trunc(a: &[Limb], f: Limb) -> Result<DigitBuf, Error> {
    let mut m = mul_limb(a, f)?;
    debug_assert_eq!(m[a.len()], 0);
    m.truncate(a.len());
    Ok(m)
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::coefficient::{add, cmp, from_digits, mul::mul};

    #[cfg(not(feature = "std"))]
    use alloc::vec::Vec;

    fn check(u: &[Limb], v: &[Limb]) {
        let (q, r) = div_rem(u, v).unwrap();

        // u == q * v + r and r < v
        assert_eq!(cmp(&r, v), Ordering::Less);
        let prod = mul(&q, v).unwrap();
        let back = add(&prod, &r).unwrap();
        assert_eq!(cmp(&back, u), Ordering::Equal);
    }

    #[test]
    fn test_div_rem_small() {
        check(&[7], &[2]);
        check(&[0], &[5]);
        check(&[5], &[7]);
        check(&[RADIX - 1, RADIX - 1, RADIX - 1], &[3]);
        check(&[1, 0, 1], &[0, 1]);
    }

    #[test]
    fn test_div_rem_multi_limb() {
        let mut seed: u64 = 0x853c49e6748fea9b;
        let mut next = || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            (seed % RADIX as u64) as Limb
        };

        for (lu, lv) in [(8usize, 3usize), (12, 7), (5, 5), (3, 4), (20, 2)] {
            let u: Vec<Limb> = (0..lu).map(|_| next()).collect();
            let mut v: Vec<Limb> = (0..lv).map(|_| next()).collect();
            if super::super::is_zero(&v) {
                v[0] = 1;
            }
            check(&u, &v);
        }
    }

    #[test]
    fn test_div_rem_digit_strings() {
        let u = from_digits(&[1; 45]).unwrap();
        let v = from_digits(&[9, 0, 9, 0, 9, 0, 9, 0, 9, 0, 9, 0, 9, 0, 9, 0, 9, 0, 9, 0, 9]).unwrap();
        check(&u, &v);

        // exact division
        let w = mul(&u, &v).unwrap();
        let (q, r) = div_rem(&w, &v).unwrap();
        assert_eq!(cmp(&q, &u), Ordering::Equal);
        assert!(super::super::is_zero(&r));
    }
}
