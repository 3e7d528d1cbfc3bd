//! Multiplication of coefficients: schoolbook for short operands,
//! Karatsuba splitting above a threshold.

use crate::common::buf::DigitBuf;
use crate::common::util::add_carry;
use crate::common::util::mul_add;
use crate::common::util::sub_borrow;
use crate::defs::Error;
use crate::defs::Limb;

// Measured crossover in limbs (about 600 digits); below it the simple
// quadratic loop wins on memory traffic.
const KARATSUBA_THRESHOLD: usize = 32;

/// Exact product of magnitudes. The result holds at most
/// `a.len() + b.len()` limbs; no digit is lost before rounding.
pub fn mul(a: &[Limb], b: &[Limb]) -> Result<DigitBuf, Error> {
    let mut la = a.len();
    while la > 0 && a[la - 1] == 0 {
        la -= 1;
    }
    let mut lb = b.len();
    while lb > 0 && b[lb - 1] == 0 {
        lb -= 1;
    }

    if la == 0 || lb == 0 {
        return DigitBuf::new_zeroed(1);
    }

    let mut m3 = mul_unbalanced(&a[..la], &b[..lb])?;
    m3.trunc_leading_zeroes();

    Ok(m3)
}

fn mul_unbalanced(a: &[Limb], b: &[Limb]) -> Result<DigitBuf, Error> {
    if a.len().min(b.len()) < KARATSUBA_THRESHOLD {
        schoolbook(a, b)
    } else {
        karatsuba(a, b)
    }
}

fn schoolbook(a: &[Limb], b: &[Limb]) -> Result<DigitBuf, Error> {
    let mut m3 = DigitBuf::new_zeroed(a.len() + b.len())?;

    for (i, &x) in a.iter().enumerate() {
        if x == 0 {
            continue;
        }

        let mut carry = 0;
        for (j, &y) in b.iter().enumerate() {
            let (hi, lo) = mul_add(x, y, m3[i + j], carry);
            m3[i + j] = lo;
            carry = hi;
        }
        m3[i + b.len()] = carry;
    }

    Ok(m3)
}

fn karatsuba(a: &[Limb], b: &[Limb]) -> Result<DigitBuf, Error> {
    let m = a.len().max(b.len()) / 2;

    // One operand fits entirely below the split point: two half products.
    if a.len() <= m || b.len() <= m {
        let (long, short) = if a.len() > b.len() { (a, b) } else { (b, a) };

        let mut m3 = DigitBuf::new_zeroed(a.len() + b.len())?;
        let z0 = mul_unbalanced(&long[..m], short)?;
        let z1 = mul_unbalanced(&long[m..], short)?;
        add_at(&mut m3, &z0, 0);
        add_at(&mut m3, &z1, m);
        return Ok(m3);
    }

    let (a0, a1) = a.split_at(m);
    let (b0, b1) = b.split_at(m);

    let z0 = mul_unbalanced(a0, b0)?;
    let z2 = mul_unbalanced(a1, b1)?;

    let sa = add_halves(a0, a1)?;
    let sb = add_halves(b0, b1)?;
    let mut z1 = mul_unbalanced(&sa, &sb)?;
    sub_at(&mut z1, &z0, 0);
    sub_at(&mut z1, &z2, 0);

    let mut m3 = DigitBuf::new_zeroed(a.len() + b.len())?;
    add_at(&mut m3, &z0, 0);
    add_at(&mut m3, &z1, m);
    add_at(&mut m3, &z2, 2 * m);

    Ok(m3)
}

// lo + hi, both halves of one operand.
fn add_halves(lo: &[Limb], hi: &[Limb]) -> Result<DigitBuf, Error> {
    let (long, short) = if lo.len() >= hi.len() { (lo, hi) } else { (hi, lo) };

    let mut m = DigitBuf::new_zeroed(long.len() + 1)?;
    m[..long.len()].copy_from_slice(long);
    add_at(&mut m, short, 0);

    Ok(m)
}

// acc += src * RADIX^at; acc is large enough to absorb the carry.
fn add_at(acc: &mut [Limb], src: &[Limb], at: usize) {
    let mut c = 0;
    let mut i = at;

    for &s in src {
        c = add_carry(acc[i], s, c, &mut acc[i]);
        i += 1;
    }

    while c > 0 {
        c = add_carry(acc[i], 0, c, &mut acc[i]);
        i += 1;
    }
}

// acc -= src * RADIX^at; acc is not less than the subtrahend.
fn sub_at(acc: &mut [Limb], src: &[Limb], at: usize) {
    let mut c = 0;
    let mut i = at;

    for &s in src {
        c = sub_borrow(acc[i], s, c, &mut acc[i]);
        i += 1;
    }

    while c > 0 {
        c = sub_borrow(acc[i], 0, c, &mut acc[i]);
        i += 1;
    }
}
