//! Square root and inverse square root.

use crate::coefficient;
use crate::ctx::Context;
use crate::dec::Decimal;
use crate::dec::Flavor;
use crate::defs::Error;
use crate::defs::Exponent;
use crate::defs::Sign;
use crate::defs::Status;
use crate::num::DecNumber;
use crate::ops::arith::div_finite;
use crate::ops::util;
use core::cmp::Ordering;

impl Decimal {
    /// Returns the square root of `self`, correctly rounded to the context.
    ///
    /// An exact root keeps half of the ideal exponent: the square root of
    /// `4.00` is `2.0`. The root of a negative operand other than `-0`
    /// raises Invalid_operation.
    pub fn sqrt(&self, ctx: &mut Context) -> Decimal {
        match &self.inner {
            Flavor::Nan(_) => Decimal::nan_result(ctx, &[self]),
            Flavor::Inf(Sign::Pos) => Decimal::inf(Sign::Pos),
            Flavor::Inf(Sign::Neg) => {
                ctx.raise(Status::INVALID_OPERATION);
                Decimal::NAN
            }
            Flavor::Finite(n) => {
                if n.is_zero() {
                    // the exponent of a zero is halved toward -infinity
                    match n.try_clone() {
                        Ok(mut z) => {
                            z.exp = z.exp.div_euclid(2);
                            Decimal::finalized(z, ctx)
                        }
                        Err(e) => Decimal::from_error(e, ctx),
                    }
                } else if n.sign.is_negative() {
                    ctx.raise(Status::INVALID_OPERATION);
                    Decimal::NAN
                } else {
                    match sqrt_finite(n, ctx) {
                        Ok(r) => r,
                        Err(e) => Decimal::from_error(e, ctx),
                    }
                }
            }
        }
    }

    /// Returns `1 / sqrt(self)` with at most one unit of error in the last
    /// place; the result is always inexact.
    ///
    /// The inverse root of a zero is an infinity with the sign of the zero
    /// and raises Division_by_zero.
    pub fn invroot(&self, ctx: &mut Context) -> Decimal {
        match &self.inner {
            Flavor::Nan(_) => Decimal::nan_result(ctx, &[self]),
            Flavor::Inf(Sign::Pos) => {
                // a vanishing result takes the smallest exponent
                match DecNumber::new_zero() {
                    Ok(mut z) => {
                        z.exp = ctx.etiny();
                        ctx.raise(Status::CLAMPED);
                        Decimal::from_num(z)
                    }
                    Err(e) => Decimal::from_error(e, ctx),
                }
            }
            Flavor::Inf(Sign::Neg) => {
                ctx.raise(Status::INVALID_OPERATION);
                Decimal::NAN
            }
            Flavor::Finite(n) => {
                if n.is_zero() {
                    ctx.raise(Status::DIVISION_BY_ZERO);
                    Decimal::inf(n.sign)
                } else if n.sign.is_negative() {
                    ctx.raise(Status::INVALID_OPERATION);
                    Decimal::NAN
                } else {
                    match invroot_finite(n, ctx) {
                        Ok(r) => r,
                        Err(e) => Decimal::from_error(e, ctx),
                    }
                }
            }
        }
    }
}

fn sqrt_finite(n: &DecNumber, ctx: &mut Context) -> Result<Decimal, Error> {
    if let Some(r) = sqrt_exact(n)? {
        return Ok(Decimal::finalized(r, ctx));
    }

    let prec = ctx.prec();
    let etiny = ctx.etiny();
    let mut wp = prec + 10;

    // the root of a non-square is irrational, so widening the
    // approximation settles every rounding decision eventually
    for _ in 0..32 {
        let mut r = sqrt_approx(n, wp)?;
        util::settle(&mut r, wp)?;
        if util::rounding_safe(&r, prec, etiny)? {
            return Ok(Decimal::finalized(r, ctx));
        }
        wp += wp / 2;
    }

    let mut r = sqrt_approx(n, wp)?;
    util::settle(&mut r, wp)?;
    let kept = util::kept_digits(&r, prec, etiny);
    util::force_inexact(&mut r, kept)?;
    Ok(Decimal::finalized(r, ctx))
}

// Detects a perfect square: with the exponent made even, the operand is
// `c * 10^(2k)` and the root is exact iff `c` is a square integer.
fn sqrt_exact(n: &DecNumber) -> Result<Option<DecNumber>, Error> {
    let mut c = n.try_clone()?;
    if c.exp.rem_euclid(2) != 0 {
        c.pad_to_exp(c.exp - 1)?;
    }

    let ci = c_integral(&c)?;
    let mut s = sqrt_approx(&ci, c.digits / 2 + 4)?;

    // round the candidate to the nearest integer
    if s.exp < 0 {
        let int_digits = (s.digits as Exponent + s.exp).max(1) as usize;
        util::settle(&mut s, int_digits)?;
    } else if s.exp > 0 {
        s.pad_to_exp(0)?;
    }

    let sq = s.mul_exact(&s)?;
    if sq.cmp_abs(&ci)? != Ordering::Equal {
        return Ok(None);
    }

    s.exp = c.exp / 2;
    Ok(Some(s))
}

// The coefficient of `c` as an integer-valued number.
fn c_integral(c: &DecNumber) -> Result<DecNumber, Error> {
    let mut i = c.try_clone()?;
    i.exp = 0;
    Ok(i)
}

fn invroot_finite(n: &DecNumber, ctx: &mut Context) -> Result<Decimal, Error> {
    let prec = ctx.prec();
    let etiny = ctx.etiny();
    let wp = prec + 10;

    let one = DecNumber::from_limb(1)?;
    let s = sqrt_approx(n, wp + 2)?;
    let mut r = div_finite(&one, &s, wp)?;
    util::settle(&mut r, wp)?;

    // the result is reported inexact even when 1/sqrt happens to be a
    // short decimal
    let kept = util::kept_digits(&r, prec, etiny);
    if kept > 0 && r.digits < kept + 4 {
        let deficit = (kept + 4 - r.digits) as Exponent;
        r.pad_to_exp(r.exp - deficit)?;
    }
    util::force_inexact(&mut r, kept)?;

    Ok(Decimal::finalized(r, ctx))
}

/// Approximates the square root of a positive `a` to `prec` significant
/// digits with an error below one unit in the last place: an integer seed
/// from the leading digits, then Newton steps at doubling precision.
pub(crate) fn sqrt_approx(a: &DecNumber, prec: usize) -> Result<DecNumber, Error> {
    debug_assert!(!a.is_zero() && a.sign.is_positive());

    let adj = a.adjusted();

    // the seed exponent (adj - k + 1) / 2 must be an integer
    let k: usize = if adj.rem_euclid(2) == 0 { 17 } else { 18 };

    let digits = coefficient::to_digits(&a.data)?;
    let mut lead: u128 = 0;
    for i in 0..k {
        let d = if i < digits.len() { digits[i] } else { 0 };
        lead = lead * 10 + d as u128;
    }

    let mut x = DecNumber::from_u128(isqrt_u128(lead))?;
    x.exp = (adj - k as Exponent + 1) / 2;

    let five = DecNumber::from_limb(5)?;

    let mut correct = 8usize;
    while correct < prec + 2 {
        correct = correct * 2 - 2;
        let p = correct.min(prec + 4);

        // x' = (x + a/x) / 2
        let q = div_finite(a, &x, p + 2)?;
        let mut s = x.add_exact(&q)?;
        s = s.mul_exact(&five)?;
        s.exp -= 1;
        util::settle(&mut s, p + 2)?;
        x = s;
    }

    Ok(x)
}

fn isqrt_u128(v: u128) -> u128 {
    if v < 2 {
        return v;
    }
    let mut x = 1u128 << ((128 - v.leading_zeros() as usize) / 2 + 1);
    loop {
        let y = (x + v / x) / 2;
        if y >= x {
            return x;
        }
        x = y;
    }
}
