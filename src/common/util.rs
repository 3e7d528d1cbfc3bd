//! Auxiliary functions: base-10^19 limb primitives.

use crate::defs::DoubleLimb;
use crate::defs::Limb;
use crate::defs::SignedLimb;
use crate::defs::LIMB_DIGITS;
use crate::defs::RADIX;

/// 10^n for n in 0..=LIMB_DIGITS.
pub const fn pow10(n: usize) -> Limb {
    let mut p: Limb = 1;
    let mut i = 0;
    while i < n {
        p *= 10;
        i += 1;
    }
    p
}

/// Number of decimal digits in a single limb; a zero limb counts as one digit.
pub fn digits_in_limb(d: Limb) -> usize {
    let mut n = 1;
    while n < LIMB_DIGITS && d >= pow10(n) {
        n += 1;
    }
    n
}

/// d = a + b + c, where c is the input carry; returns the output carry.
#[inline]
pub fn add_carry(a: Limb, b: Limb, c: Limb, d: &mut Limb) -> Limb {
    let s = a as DoubleLimb + b as DoubleLimb + c as DoubleLimb;

    if s >= RADIX as DoubleLimb {
        *d = (s - RADIX as DoubleLimb) as Limb;
        1
    } else {
        *d = s as Limb;
        0
    }
}

/// d = a - b - c, where c is the input borrow; returns the output borrow.
#[inline]
pub fn sub_borrow(a: Limb, b: Limb, c: Limb, d: &mut Limb) -> Limb {
    let v = a as SignedLimb - b as SignedLimb - c as SignedLimb;

    if v < 0 {
        *d = (v + RADIX as SignedLimb) as Limb;
        1
    } else {
        *d = v as Limb;
        0
    }
}

/// a * b + add + carry split into (high, low) base-RADIX limbs.
#[inline]
pub fn mul_add(a: Limb, b: Limb, add: Limb, carry: Limb) -> (Limb, Limb) {
    let p = a as DoubleLimb * b as DoubleLimb + add as DoubleLimb + carry as DoubleLimb;

    ((p / RADIX as DoubleLimb) as Limb, (p % RADIX as DoubleLimb) as Limb)
}

/// Number of limbs needed to hold `digits` decimal digits.
#[inline]
pub fn digits_to_limbs(digits: usize) -> usize {
    (digits + LIMB_DIGITS - 1) / LIMB_DIGITS
}
