//! Basic arithmetic: addition, subtraction, multiplication, the division
//! family, and fused multiply-add.

use crate::coefficient;
use crate::ctx::Context;
use crate::dec::Decimal;
use crate::dec::Flavor;
use crate::defs::Error;
use crate::defs::Exponent;
use crate::defs::RoundingMode;
use crate::defs::Sign;
use crate::defs::Status;
use crate::num::DecNumber;
use core::cmp::Ordering;

fn sign_xor(a: Sign, b: Sign) -> Sign {
    if a == b {
        Sign::Pos
    } else {
        Sign::Neg
    }
}

impl Decimal {
    /// Returns the sum of `self` and `rhs`, rounded to the context.
    ///
    /// Adding infinities of opposite signs raises Invalid_operation.
    pub fn add(&self, rhs: &Self, ctx: &mut Context) -> Decimal {
        match (&self.inner, &rhs.inner) {
            (Flavor::Nan(_), _) | (_, Flavor::Nan(_)) => Decimal::nan_result(ctx, &[self, rhs]),
            (Flavor::Inf(s1), Flavor::Inf(s2)) => {
                if s1 == s2 {
                    Decimal::inf(*s1)
                } else {
                    ctx.raise(Status::INVALID_OPERATION);
                    Decimal::NAN
                }
            }
            (Flavor::Inf(s), _) | (_, Flavor::Inf(s)) => Decimal::inf(*s),
            (Flavor::Finite(a), Flavor::Finite(b)) => add_finite(a, b, false, ctx),
        }
    }

    /// Returns the difference of `self` and `rhs`, rounded to the context.
    pub fn sub(&self, rhs: &Self, ctx: &mut Context) -> Decimal {
        match (&self.inner, &rhs.inner) {
            (Flavor::Nan(_), _) | (_, Flavor::Nan(_)) => Decimal::nan_result(ctx, &[self, rhs]),
            (Flavor::Inf(s1), Flavor::Inf(s2)) => {
                if s1 != s2 {
                    Decimal::inf(*s1)
                } else {
                    ctx.raise(Status::INVALID_OPERATION);
                    Decimal::NAN
                }
            }
            (Flavor::Inf(s), _) => Decimal::inf(*s),
            (_, Flavor::Inf(s)) => Decimal::inf(s.invert()),
            (Flavor::Finite(a), Flavor::Finite(b)) => add_finite(a, b, true, ctx),
        }
    }

    /// Returns the product of `self` and `rhs`, rounded to the context.
    ///
    /// Multiplying an infinity by a zero raises Invalid_operation.
    pub fn mul(&self, rhs: &Self, ctx: &mut Context) -> Decimal {
        match (&self.inner, &rhs.inner) {
            (Flavor::Nan(_), _) | (_, Flavor::Nan(_)) => Decimal::nan_result(ctx, &[self, rhs]),
            (Flavor::Inf(s1), Flavor::Inf(s2)) => Decimal::inf(sign_xor(*s1, *s2)),
            (Flavor::Inf(s), Flavor::Finite(n)) | (Flavor::Finite(n), Flavor::Inf(s)) => {
                if n.is_zero() {
                    ctx.raise(Status::INVALID_OPERATION);
                    Decimal::NAN
                } else {
                    Decimal::inf(sign_xor(*s, n.sign))
                }
            }
            (Flavor::Finite(a), Flavor::Finite(b)) => match a.mul_exact(b) {
                Ok(r) => Decimal::finalized(r, ctx),
                Err(e) => Decimal::from_error(e, ctx),
            },
        }
    }

    /// Returns the quotient of `self` and `rhs`, rounded to the context.
    ///
    /// An exact quotient is reduced toward the ideal exponent (the
    /// difference of the operand exponents). Dividing a nonzero number by
    /// zero raises Division_by_zero and returns an infinity; 0/0 raises
    /// Division_undefined.
    pub fn div(&self, rhs: &Self, ctx: &mut Context) -> Decimal {
        match (&self.inner, &rhs.inner) {
            (Flavor::Nan(_), _) | (_, Flavor::Nan(_)) => Decimal::nan_result(ctx, &[self, rhs]),
            (Flavor::Inf(_), Flavor::Inf(_)) => {
                ctx.raise(Status::INVALID_OPERATION);
                Decimal::NAN
            }
            (Flavor::Inf(s), Flavor::Finite(b)) => Decimal::inf(sign_xor(*s, b.sign)),
            (Flavor::Finite(a), Flavor::Inf(s)) => {
                // a vanishing quotient takes the smallest exponent
                match DecNumber::new_zero() {
                    Ok(mut z) => {
                        z.sign = sign_xor(a.sign, *s);
                        z.exp = ctx.etiny();
                        ctx.raise(Status::CLAMPED);
                        Decimal::from_num(z)
                    }
                    Err(e) => Decimal::from_error(e, ctx),
                }
            }
            (Flavor::Finite(a), Flavor::Finite(b)) => {
                if b.is_zero() {
                    if a.is_zero() {
                        ctx.raise(Status::DIVISION_UNDEFINED);
                        Decimal::NAN
                    } else {
                        ctx.raise(Status::DIVISION_BY_ZERO);
                        Decimal::inf(sign_xor(a.sign, b.sign))
                    }
                } else {
                    match div_finite(a, b, ctx.prec()) {
                        Ok(r) => Decimal::finalized(r, ctx),
                        Err(e) => Decimal::from_error(e, ctx),
                    }
                }
            }
        }
    }

    /// Returns the integer part of the quotient, truncated toward zero.
    ///
    /// Raises Division_impossible if the integer quotient does not fit in
    /// the context precision.
    pub fn div_int(&self, rhs: &Self, ctx: &mut Context) -> Decimal {
        match (&self.inner, &rhs.inner) {
            (Flavor::Nan(_), _) | (_, Flavor::Nan(_)) => Decimal::nan_result(ctx, &[self, rhs]),
            (Flavor::Inf(_), Flavor::Inf(_)) => {
                ctx.raise(Status::INVALID_OPERATION);
                Decimal::NAN
            }
            (Flavor::Inf(s), Flavor::Finite(b)) => Decimal::inf(sign_xor(*s, b.sign)),
            (Flavor::Finite(a), Flavor::Inf(s)) => {
                match DecNumber::new_zero() {
                    Ok(mut z) => {
                        z.sign = sign_xor(a.sign, *s);
                        Decimal::from_num(z)
                    }
                    Err(e) => Decimal::from_error(e, ctx),
                }
            }
            (Flavor::Finite(a), Flavor::Finite(b)) => {
                if b.is_zero() {
                    if a.is_zero() {
                        ctx.raise(Status::DIVISION_UNDEFINED);
                        Decimal::NAN
                    } else {
                        ctx.raise(Status::DIVISION_BY_ZERO);
                        Decimal::inf(sign_xor(a.sign, b.sign))
                    }
                } else {
                    match divmod_finite(a, b, ctx.prec()) {
                        Ok(Some((q, _))) => Decimal::finalized(q, ctx),
                        Ok(None) => {
                            ctx.raise(Status::DIVISION_IMPOSSIBLE);
                            Decimal::NAN
                        }
                        Err(e) => Decimal::from_error(e, ctx),
                    }
                }
            }
        }
    }

    /// Returns the remainder of the truncating integer division; the result
    /// takes the sign of `self`.
    pub fn rem(&self, rhs: &Self, ctx: &mut Context) -> Decimal {
        match (&self.inner, &rhs.inner) {
            (Flavor::Nan(_), _) | (_, Flavor::Nan(_)) => Decimal::nan_result(ctx, &[self, rhs]),
            (Flavor::Inf(_), _) => {
                ctx.raise(Status::INVALID_OPERATION);
                Decimal::NAN
            }
            (Flavor::Finite(a), Flavor::Inf(_)) => match a.try_clone() {
                Ok(r) => Decimal::finalized(r, ctx),
                Err(e) => Decimal::from_error(e, ctx),
            },
            (Flavor::Finite(a), Flavor::Finite(b)) => {
                if b.is_zero() {
                    if a.is_zero() {
                        ctx.raise(Status::DIVISION_UNDEFINED);
                    } else {
                        ctx.raise(Status::INVALID_OPERATION);
                    }
                    Decimal::NAN
                } else {
                    match divmod_finite(a, b, ctx.prec()) {
                        Ok(Some((_, r))) => Decimal::finalized(r, ctx),
                        Ok(None) => {
                            ctx.raise(Status::DIVISION_IMPOSSIBLE);
                            Decimal::NAN
                        }
                        Err(e) => Decimal::from_error(e, ctx),
                    }
                }
            }
        }
    }

    /// Returns the remainder with the quotient rounded to the nearest
    /// integer, ties to even. The result may take either sign.
    pub fn rem_near(&self, rhs: &Self, ctx: &mut Context) -> Decimal {
        match (&self.inner, &rhs.inner) {
            (Flavor::Nan(_), _) | (_, Flavor::Nan(_)) => Decimal::nan_result(ctx, &[self, rhs]),
            (Flavor::Inf(_), _) => {
                ctx.raise(Status::INVALID_OPERATION);
                Decimal::NAN
            }
            (Flavor::Finite(a), Flavor::Inf(_)) => match a.try_clone() {
                Ok(r) => Decimal::finalized(r, ctx),
                Err(e) => Decimal::from_error(e, ctx),
            },
            (Flavor::Finite(a), Flavor::Finite(b)) => {
                if b.is_zero() {
                    if a.is_zero() {
                        ctx.raise(Status::DIVISION_UNDEFINED);
                    } else {
                        ctx.raise(Status::INVALID_OPERATION);
                    }
                    Decimal::NAN
                } else {
                    match rem_near_finite(a, b, ctx.prec()) {
                        Ok(Some(r)) => Decimal::finalized(r, ctx),
                        Ok(None) => {
                            ctx.raise(Status::DIVISION_IMPOSSIBLE);
                            Decimal::NAN
                        }
                        Err(e) => Decimal::from_error(e, ctx),
                    }
                }
            }
        }
    }

    /// Fused multiply-add: `self * fac + add` with a single rounding at the
    /// end; the intermediate product is exact.
    pub fn fma(&self, fac: &Self, add: &Self, ctx: &mut Context) -> Decimal {
        if self.is_nan() || fac.is_nan() || add.is_nan() {
            return Decimal::nan_result(ctx, &[self, fac, add]);
        }

        // the product handles the infinity rules of multiplication
        let product = match (&self.inner, &fac.inner) {
            (Flavor::Nan(_), _) | (_, Flavor::Nan(_)) => {
                return Decimal::nan_result(ctx, &[self, fac, add]);
            }
            (Flavor::Inf(s1), Flavor::Inf(s2)) => return inf_add(sign_xor(*s1, *s2), add, ctx),
            (Flavor::Inf(s), Flavor::Finite(n)) | (Flavor::Finite(n), Flavor::Inf(s)) => {
                if n.is_zero() {
                    ctx.raise(Status::INVALID_OPERATION);
                    return Decimal::NAN;
                }
                return inf_add(sign_xor(*s, n.sign), add, ctx);
            }
            (Flavor::Finite(a), Flavor::Finite(b)) => match a.mul_exact(b) {
                Ok(p) => p,
                Err(e) => return Decimal::from_error(e, ctx),
            },
        };

        match &add.inner {
            Flavor::Inf(s) => Decimal::inf(*s),
            Flavor::Finite(c) => add_finite(&product, c, false, ctx),
            Flavor::Nan(_) => Decimal::NAN,
        }
    }
}

// infinite product plus a third operand
fn inf_add(sign: Sign, add: &Decimal, ctx: &mut Context) -> Decimal {
    match &add.inner {
        Flavor::Inf(s) if *s != sign => {
            ctx.raise(Status::INVALID_OPERATION);
            Decimal::NAN
        }
        _ => Decimal::inf(sign),
    }
}

// If `small` lies entirely below both the last digit of `big` and the
// rounding position of the final result, it only contributes a sticky
// digit. It is then replaced by a single digit just below that cutoff,
// which rounds identically in every mode and keeps the exponent
// alignment in add_exact bounded by the precision.
fn tiny_surrogate(
    big: &DecNumber,
    small: &DecNumber,
    prec: usize,
) -> Result<Option<DecNumber>, Error> {
    let cutoff = big.exp.min(big.adjusted() - prec as Exponent - 1);

    if small.adjusted() < cutoff - 1 {
        let mut s = DecNumber::from_limb(1)?;
        s.sign = small.sign;
        s.exp = cutoff - 2;
        Ok(Some(s))
    } else {
        Ok(None)
    }
}

fn add_finite(a: &DecNumber, b: &DecNumber, negate_b: bool, ctx: &mut Context) -> Decimal {
    let b_sign = if negate_b { b.sign.invert() } else { b.sign };

    let r = (|| {
        let mut bb = b.try_clone()?;
        bb.sign = b_sign;

        let a_store;
        let mut a: &DecNumber = a;
        if !a.is_zero() && !bb.is_zero() {
            if a.adjusted() >= bb.adjusted() {
                if let Some(s) = tiny_surrogate(a, &bb, ctx.prec())? {
                    bb = s;
                }
            } else if let Some(s) = tiny_surrogate(&bb, a, ctx.prec())? {
                a_store = s;
                a = &a_store;
            }
        }

        a.add_exact(&bb)
    })();

    match r {
        Ok(mut r) => {
            if r.is_zero() {
                // an exact cancellation is positive except under floor
                // rounding; equal-signed zeros keep the common sign
                if a.sign == b_sign {
                    r.sign = a.sign;
                } else if ctx.round() == RoundingMode::Floor {
                    r.sign = Sign::Neg;
                }
            }
            Decimal::finalized(r, ctx)
        }
        Err(e) => Decimal::from_error(e, ctx),
    }
}

// Quotient of nonzero-divisor magnitudes with a guard digit: the dividend is
// scaled so that the integer quotient carries prec + 1 or prec + 2 digits,
// and an inexact quotient ending in 0 or 5 is nudged off the tie so that the
// final rounding sees a strictly-in-between value.
pub(crate) fn div_finite(a: &DecNumber, b: &DecNumber, prec: usize) -> Result<DecNumber, Error> {
    debug_assert!(!b.is_zero());

    let ideal_exp = a.exp - b.exp;

    if a.is_zero() {
        let mut z = DecNumber::new_zero()?;
        z.sign = sign_xor(a.sign, b.sign);
        z.exp = ideal_exp;
        return Ok(z);
    }

    let shift = prec as i64 + 1 + b.digits as i64 - a.digits as i64;

    let (ua, ub);
    if shift >= 0 {
        ua = coefficient::shl_digits(&a.data, shift as usize)?;
        ub = coefficient::shl_digits(&b.data, 0)?;
    } else {
        ua = coefficient::shl_digits(&a.data, 0)?;
        ub = coefficient::shl_digits(&b.data, (-shift) as usize)?;
    }

    let (mut q, r) = coefficient::div::div_rem(&ua, &ub)?;
    let exact = coefficient::is_zero(&r);

    if !exact && q[0] % 5 == 0 {
        coefficient::incr(&mut q)?;
    }

    let mut res = DecNumber {
        sign: sign_xor(a.sign, b.sign),
        exp: a.exp - b.exp - shift,
        digits: 0,
        data: q,
    };
    res.update_digits();

    if exact {
        res.strip_trailing_zeroes(ideal_exp)?;
    }

    Ok(res)
}

// Truncating integer division aligned to a common exponent. Returns None if
// the integer quotient needs more than `prec` digits; otherwise the quotient
// (exponent 0, sign xor) and the remainder (original exponent scale, sign of
// the dividend).
fn divmod_finite(
    a: &DecNumber,
    b: &DecNumber,
    prec: usize,
) -> Result<Option<(DecNumber, DecNumber)>, Error> {
    debug_assert!(!b.is_zero());

    let e = a.exp.min(b.exp);

    if a.is_zero() {
        let mut quot = DecNumber::new_zero()?;
        quot.sign = sign_xor(a.sign, b.sign);
        let mut rem = DecNumber::new_zero()?;
        rem.sign = a.sign;
        rem.exp = e;
        return Ok(Some((quot, rem)));
    }

    // the integer quotient carries at least adjusted(a) - adjusted(b)
    // digits, so a wide exponent gap fails before any alignment work
    if a.adjusted() - b.adjusted() > prec as Exponent {
        return Ok(None);
    }

    let ua = coefficient::shl_digits(&a.data, (a.exp - e) as usize)?;
    let ub = coefficient::shl_digits(&b.data, (b.exp - e) as usize)?;

    let (q, r) = coefficient::div::div_rem(&ua, &ub)?;

    if coefficient::digits_in(&q) > prec && !coefficient::is_zero(&q) {
        return Ok(None);
    }

    let mut quot = DecNumber { sign: sign_xor(a.sign, b.sign), exp: 0, digits: 0, data: q };
    quot.update_digits();

    // the ideal exponent of the remainder is min(ea, eb)
    let mut rem = DecNumber { sign: a.sign, exp: e, digits: 0, data: r };
    rem.update_digits();

    Ok(Some((quot, rem)))
}

fn rem_near_finite(a: &DecNumber, b: &DecNumber, prec: usize) -> Result<Option<DecNumber>, Error> {
    debug_assert!(!b.is_zero());

    let e = a.exp.min(b.exp);

    if a.is_zero() {
        let mut rem = DecNumber::new_zero()?;
        rem.sign = a.sign;
        rem.exp = e;
        return Ok(Some(rem));
    }

    // the nearest-integer quotient carries at least
    // adjusted(a) - adjusted(b) digits as well
    if a.adjusted() - b.adjusted() > prec as Exponent {
        return Ok(None);
    }

    let ua = coefficient::shl_digits(&a.data, (a.exp - e) as usize)?;
    let ub = coefficient::shl_digits(&b.data, (b.exp - e) as usize)?;

    let (mut q, r) = coefficient::div::div_rem(&ua, &ub)?;

    // round the quotient to the nearest integer, ties to even
    let twice_r = coefficient::add(&r, &r)?;
    let round_up = match coefficient::cmp(&twice_r, &ub) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => q[0] & 1 == 1,
    };

    let mut rem_sign = a.sign;
    let rem_data = if round_up {
        coefficient::incr(&mut q)?;
        rem_sign = rem_sign.invert();
        coefficient::sub(&ub, &r)?
    } else {
        r
    };

    if coefficient::digits_in(&q) > prec && !coefficient::is_zero(&q) {
        return Ok(None);
    }

    let mut rem = DecNumber { sign: rem_sign, exp: e, digits: 0, data: rem_data };
    if rem.is_zero() {
        rem.sign = a.sign;
    }
    rem.update_digits();

    Ok(Some(rem))
}

#[cfg(test)]
mod tests {

    use super::*;

    fn fin(sign: Sign, digits: &[u8], exp: Exponent) -> Decimal {
        Decimal::from_num(DecNumber::from_digits_parts(sign, digits, exp).unwrap())
    }

    fn coeff(d: &Decimal) -> u128 {
        d.num().unwrap().coefficient_to_u128().unwrap()
    }

    fn ctx9() -> Context {
        let mut ctx = Context::new();
        ctx.set_prec(9).unwrap();
        ctx
    }

    #[test]
    fn test_add_exact_no_flags() {
        let mut ctx = ctx9();

        // 1.23 + 2.345 = 3.575
        let a = fin(Sign::Pos, &[1, 2, 3], -2);
        let b = fin(Sign::Pos, &[2, 3, 4, 5], -3);
        let s = a.add(&b, &mut ctx);
        assert_eq!(coeff(&s), 3575);
        assert_eq!(s.exponent(), Some(-3));
        assert!(ctx.status().is_empty());
    }

    #[test]
    fn test_add_rounds() {
        let mut ctx = ctx9();

        // 1E+2 + 1E-7 needs 10 digits
        let a = fin(Sign::Pos, &[1], 2);
        let b = fin(Sign::Pos, &[1], -7);
        let s = a.add(&b, &mut ctx);
        assert_eq!(coeff(&s), 100_000_000);
        assert_eq!(s.exponent(), Some(-6));
        assert!(ctx.status().contains(Status::INEXACT | Status::ROUNDED));
    }

    #[test]
    fn test_add_huge_exponent_gap() {
        let mut ctx = ctx9();

        // the far-smaller operand acts as a sticky digit; the exact
        // alignment would span quintillions of digits
        let a = fin(Sign::Pos, &[1], 600_000_000_000_000_000);
        let b = fin(Sign::Pos, &[1], -600_000_000_000_000_000);
        let s = a.add(&b, &mut ctx);
        assert_eq!(coeff(&s), 100_000_000);
        assert_eq!(s.exponent(), Some(599_999_999_999_999_992));
        assert_eq!(ctx.status(), Status::INEXACT | Status::ROUNDED);

        // subtraction borrows through the gap and rounds back up
        ctx.clear_status();
        let d = a.sub(&b, &mut ctx);
        assert_eq!(coeff(&d), 100_000_000);
        assert_eq!(d.exponent(), Some(599_999_999_999_999_992));
        assert_eq!(ctx.status(), Status::INEXACT | Status::ROUNDED);

        // truncating rounding exposes the borrowed nines
        ctx.clear_status();
        ctx.set_round(RoundingMode::Down);
        let d = a.sub(&b, &mut ctx);
        assert_eq!(coeff(&d), 999_999_999);
        assert_eq!(d.exponent(), Some(599_999_999_999_999_991));

        // rounding away from zero lifts the sum off the big operand
        ctx.clear_status();
        ctx.set_round(RoundingMode::Up);
        let s = a.add(&b, &mut ctx);
        assert_eq!(coeff(&s), 100_000_001);
    }

    #[test]
    fn test_add_zero_signs() {
        let mut ctx = ctx9();

        // 1 + (-1) = +0
        let a = Decimal::one();
        let b = -Decimal::one();
        let z = a.add(&b, &mut ctx);
        assert!(z.is_zero());
        assert!(!z.is_negative());

        // under floor rounding the cancellation is -0
        ctx.set_round(RoundingMode::Floor);
        let z = a.add(&b, &mut ctx);
        assert!(z.is_zero());
        assert!(z.is_negative());

        // -0 + -0 = -0 in any mode
        ctx.set_round(RoundingMode::HalfEven);
        let nz = -Decimal::zero();
        let z = nz.add(&-Decimal::zero(), &mut ctx);
        assert!(z.is_zero() && z.is_negative());
    }

    #[test]
    fn test_add_special_values() {
        let mut ctx = ctx9();

        assert!(Decimal::INFINITY.add(&Decimal::one(), &mut ctx).is_infinite());
        assert!(Decimal::one().sub(&Decimal::INFINITY, &mut ctx).is_negative());

        let r = Decimal::INFINITY.add(&Decimal::NEG_INFINITY, &mut ctx);
        assert!(r.is_nan());
        assert!(ctx.status().contains(Status::INVALID_OPERATION));

        ctx.clear_status();
        let r = Decimal::INFINITY.sub(&Decimal::INFINITY, &mut ctx);
        assert!(r.is_nan());
        assert!(ctx.status().contains(Status::INVALID_OPERATION));
    }

    #[test]
    fn test_sub() {
        let mut ctx = ctx9();

        // 1.3 - 1.07 = 0.23
        let a = fin(Sign::Pos, &[1, 3], -1);
        let b = fin(Sign::Pos, &[1, 0, 7], -2);
        let d = a.sub(&b, &mut ctx);
        assert_eq!(coeff(&d), 23);
        assert_eq!(d.exponent(), Some(-2));
        assert!(ctx.status().is_empty());
    }

    #[test]
    fn test_mul() {
        let mut ctx = ctx9();

        let a = fin(Sign::Pos, &[1, 2, 3], -2);
        let b = fin(Sign::Neg, &[3], 0);
        let p = a.mul(&b, &mut ctx);
        assert_eq!(coeff(&p), 369);
        assert!(p.is_negative());
        assert!(ctx.status().is_empty());

        // sign of a zero product is the xor of the operand signs
        let z = Decimal::zero().mul(&b, &mut ctx);
        assert!(z.is_zero() && z.is_negative());

        let r = Decimal::INFINITY.mul(&Decimal::zero(), &mut ctx);
        assert!(r.is_nan());
        assert!(ctx.status().contains(Status::INVALID_OPERATION));
    }

    #[test]
    fn test_div_inexact() {
        let mut ctx = ctx9();

        // 1/3 at 9 digits
        let one = Decimal::one();
        let three = fin(Sign::Pos, &[3], 0);
        let q = one.div(&three, &mut ctx);
        assert_eq!(coeff(&q), 333_333_333);
        assert_eq!(q.exponent(), Some(-9));
        assert_eq!(ctx.status(), Status::INEXACT | Status::ROUNDED);

        // 2/3 rounds up
        ctx.clear_status();
        let two = fin(Sign::Pos, &[2], 0);
        let q = two.div(&three, &mut ctx);
        assert_eq!(coeff(&q), 666_666_667);
    }

    #[test]
    fn test_div_exact_ideal_exponent() {
        let mut ctx = ctx9();

        // 2.4 / 2 = 1.2 (ideal exponent -1)
        let a = fin(Sign::Pos, &[2, 4], -1);
        let b = fin(Sign::Pos, &[2], 0);
        let q = a.div(&b, &mut ctx);
        assert_eq!(coeff(&q), 12);
        assert_eq!(q.exponent(), Some(-1));
        assert!(ctx.status().is_empty());

        // 100/1 at prec 2: exact but still rounded to precision
        let mut ctx2 = Context::new();
        ctx2.set_prec(2).unwrap();
        let a = fin(Sign::Pos, &[1, 0, 0], 0);
        let q = a.div(&Decimal::one(), &mut ctx2);
        assert_eq!(coeff(&q), 10);
        assert_eq!(q.exponent(), Some(1));
        assert_eq!(ctx2.status(), Status::ROUNDED);
    }

    #[test]
    fn test_div_by_zero() {
        let mut ctx = ctx9();

        let r = Decimal::one().div(&Decimal::zero(), &mut ctx);
        assert!(r.is_infinite());
        assert!(ctx.status().contains(Status::DIVISION_BY_ZERO));

        ctx.clear_status();
        let r = (-Decimal::one()).div(&Decimal::zero(), &mut ctx);
        assert!(r.is_infinite() && r.is_negative());

        ctx.clear_status();
        let r = Decimal::zero().div(&Decimal::zero(), &mut ctx);
        assert!(r.is_nan());
        assert!(ctx.status().contains(Status::DIVISION_UNDEFINED));
    }

    #[test]
    fn test_div_by_infinity() {
        let mut ctx = ctx9();
        let q = Decimal::one().div(&Decimal::NEG_INFINITY, &mut ctx);
        assert!(q.is_zero() && q.is_negative());
        assert_eq!(q.exponent(), Some(ctx.etiny()));
        assert_eq!(ctx.status(), Status::CLAMPED);
    }

    #[test]
    fn test_div_int_and_rem() {
        let mut ctx = ctx9();

        // 10 // 3 = 3, 10 % 3 = 1
        let ten = fin(Sign::Pos, &[1, 0], 0);
        let three = fin(Sign::Pos, &[3], 0);
        let q = ten.div_int(&three, &mut ctx);
        assert_eq!(coeff(&q), 3);
        assert_eq!(q.exponent(), Some(0));
        let r = ten.rem(&three, &mut ctx);
        assert_eq!(coeff(&r), 1);
        assert!(ctx.status().is_empty());

        // sign of the remainder follows the dividend
        let r = (-ten.clone()).rem(&three, &mut ctx);
        assert_eq!(coeff(&r), 1);
        assert!(r.is_negative());

        // fractional operands align first: 3.6 // 1.3 = 2, rem 1.0
        let a = fin(Sign::Pos, &[3, 6], -1);
        let b = fin(Sign::Pos, &[1, 3], -1);
        let q = a.div_int(&b, &mut ctx);
        assert_eq!(coeff(&q), 2);
        let r = a.rem(&b, &mut ctx);
        assert_eq!(coeff(&r), 10);
        assert_eq!(r.exponent(), Some(-1));
    }

    #[test]
    fn test_div_int_impossible() {
        let mut ctx = Context::new();
        ctx.set_prec(3).unwrap();

        // the integer quotient has 5 digits
        let a = fin(Sign::Pos, &[1, 2, 3, 4, 5], 0);
        let q = a.div_int(&Decimal::one(), &mut ctx);
        assert!(q.is_nan());
        assert!(ctx.status().contains(Status::DIVISION_IMPOSSIBLE));

        ctx.clear_status();
        let r = a.rem(&Decimal::one(), &mut ctx);
        assert!(r.is_nan());
        assert!(ctx.status().contains(Status::DIVISION_IMPOSSIBLE));
    }

    #[test]
    fn test_rem_huge_exponent_gap() {
        let mut ctx = ctx9();
        let three = fin(Sign::Pos, &[3], 0);

        // the integer quotient would span 10^17 digits; the exponent
        // estimate must fail it before the operands are ever aligned
        let a = fin(Sign::Pos, &[1], 100_000_000_000_000_000);
        let ops: [fn(&Decimal, &Decimal, &mut Context) -> Decimal; 3] =
            [Decimal::rem, Decimal::rem_near, Decimal::div_int];
        for op in ops {
            let r = op(&a, &three, &mut ctx);
            assert!(r.is_nan());
            assert_eq!(ctx.status(), Status::DIVISION_IMPOSSIBLE);
            ctx.clear_status();
        }

        // a zero dividend with a wide gap divides without any alignment
        let z = fin(Sign::Pos, &[0], -100_000_000_000_000_000);
        let r = z.rem(&three, &mut ctx);
        assert!(r.is_zero());
        let q = z.div_int(&three, &mut ctx);
        assert!(q.is_zero());
        assert_eq!(q.exponent(), Some(0));
        assert!(ctx.status().is_empty());
    }

    #[test]
    fn test_rem_by_zero() {
        let mut ctx = ctx9();
        let r = Decimal::one().rem(&Decimal::zero(), &mut ctx);
        assert!(r.is_nan());
        assert!(ctx.status().contains(Status::INVALID_OPERATION));
        assert!(!ctx.status().contains(Status::DIVISION_BY_ZERO));
    }

    #[test]
    fn test_rem_near() {
        let mut ctx = ctx9();
        let ten = fin(Sign::Pos, &[1, 0], 0);
        let three = fin(Sign::Pos, &[3], 0);
        let six = fin(Sign::Pos, &[6], 0);

        // 10 = 3*3 + 1, nearest quotient 3: rem 1
        let r = ten.rem_near(&three, &mut ctx);
        assert_eq!(coeff(&r), 1);
        assert!(!r.is_negative());

        // 10 = 2*6 - 2, nearest quotient 2: rem -2
        let r = ten.rem_near(&six, &mut ctx);
        assert_eq!(coeff(&r), 2);
        assert!(r.is_negative());

        // tie: 3/2, quotient 1 or 2, even wins: 3 - 2*2 = -1
        let a = fin(Sign::Pos, &[3], 0);
        let b = fin(Sign::Pos, &[2], 0);
        let r = a.rem_near(&b, &mut ctx);
        assert_eq!(coeff(&r), 1);
        assert!(r.is_negative());

        assert!(ctx.status().is_empty());
    }

    #[test]
    fn test_fma_single_rounding() {
        let mut ctx = Context::new();
        ctx.set_prec(5).unwrap();

        // 11111 * 9 + 100001 = 200000 exactly; a separate multiply
        // would have rounded the 6-digit product first
        let a = fin(Sign::Pos, &[1, 1, 1, 1, 1], 0);
        let b = fin(Sign::Pos, &[9], 0);
        let c = fin(Sign::Pos, &[1, 0, 0, 0, 0, 1], 0);
        let r = a.fma(&b, &c, &mut ctx);
        assert_eq!(coeff(&r), 20000);
        assert_eq!(r.exponent(), Some(1));
        assert_eq!(ctx.status(), Status::ROUNDED);

        // infinity rules of the product apply
        ctx.clear_status();
        let r = Decimal::INFINITY.fma(&Decimal::zero(), &Decimal::one(), &mut ctx);
        assert!(r.is_nan());
        assert!(ctx.status().contains(Status::INVALID_OPERATION));
    }
}
