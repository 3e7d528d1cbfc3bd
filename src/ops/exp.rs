//! The exponential function.

use crate::ctx::Context;
use crate::dec::Decimal;
use crate::dec::Flavor;
use crate::defs::Error;
use crate::defs::Exponent;
use crate::defs::Limb;
use crate::defs::Sign;
use crate::num::DecNumber;
use crate::ops::arith::div_finite;
use crate::ops::util;

impl Decimal {
    /// Returns `e` raised to the power of `self`, rounded to the context.
    ///
    /// The exponential of a zero is an exact one; negative infinity gives
    /// an exact zero. With `allow_crr` set in the context the result is
    /// correctly rounded, otherwise the error is at most one unit in the
    /// last place.
    pub fn exp(&self, ctx: &mut Context) -> Decimal {
        match &self.inner {
            Flavor::Nan(_) => Decimal::nan_result(ctx, &[self]),
            Flavor::Inf(Sign::Pos) => Decimal::inf(Sign::Pos),
            Flavor::Inf(Sign::Neg) => Decimal::zero(),
            Flavor::Finite(n) => {
                if n.is_zero() {
                    Decimal::one()
                } else {
                    match exp_finite(n, ctx) {
                        Ok(r) => r,
                        Err(e) => Decimal::from_error(e, ctx),
                    }
                }
            }
        }
    }
}

fn exp_finite(n: &DecNumber, ctx: &mut Context) -> Result<Decimal, Error> {
    let prec = ctx.prec();
    let etiny = ctx.etiny();

    // arguments far outside the range decide the result without a series
    if n.sign.is_positive() {
        if util::beyond_range(n, ctx.emax() as u128)? {
            return Ok(util::overflow_result(ctx, Sign::Pos));
        }
    } else if util::beyond_range(n, etiny.unsigned_abs() as u128)? {
        return Ok(util::underflow_result(ctx, Sign::Pos));
    }

    // exp(x) for |x| below the last representable place stays within one
    // ulp of one, above it for a positive argument and below otherwise
    if n.adjusted() < -(prec as Exponent + 2) {
        return Ok(util::nearly_one(ctx, Sign::Pos, n.sign.is_negative()));
    }

    let mut wp = prec + 14;
    let mut attempts = if ctx.allow_crr() { 32 } else { 1 };

    loop {
        let d = exp_series(n, wp)?;
        if d.is_infinite() {
            return Ok(util::overflow_result(ctx, Sign::Pos));
        }
        if d.is_zero() {
            return Ok(util::underflow_result(ctx, Sign::Pos));
        }

        let mut r = util::take_finite(d)?;
        util::settle(&mut r, wp)?;
        attempts -= 1;

        if util::rounding_safe(&r, prec, etiny)? {
            return Ok(Decimal::finalized(r, ctx));
        }
        if attempts == 0 {
            // exp of a nonzero argument is irrational
            let kept = util::kept_digits(&r, prec, etiny);
            util::force_inexact(&mut r, kept)?;
            return Ok(Decimal::finalized(r, ctx));
        }
        wp += wp / 2;
    }
}

/// exp of a nonzero finite argument to roughly `wp` digits of relative
/// accuracy, computed in a wide-range working context. The result may be
/// an infinity or a zero when the true value leaves even that range.
pub(crate) fn exp_series(x: &DecNumber, wp: usize) -> Result<Decimal, Error> {
    // halve the argument k times so that |x / 2^k| <= 0.1, sum the Taylor
    // series there and square the result k times
    let adj = x.adjusted();
    let k = if adj >= -1 { ((adj + 2) * 10 / 3 + 1) as u32 } else { 0 };

    let r = if k > 0 {
        div_finite(x, &DecNumber::from_u128(1u128 << k)?, wp + 10)?
    } else {
        x.try_clone()?
    };

    let mut sum = DecNumber::from_limb(1)?.add_exact(&r)?;
    let mut term = r.try_clone()?;
    let mut i: Limb = 1;

    loop {
        i += 1;
        term = term.mul_exact(&r)?;
        util::settle(&mut term, wp + 10)?;
        term = div_finite(&term, &DecNumber::from_limb(i)?, wp + 10)?;
        if term.is_zero() || term.adjusted() < -(wp as Exponent + 4) {
            break;
        }
        sum = sum.add_exact(&term)?;
        util::settle(&mut sum, wp + 14)?;
    }

    let mut wctx = util::work(wp + 10);
    let mut d = Decimal::from_num(sum);
    for _ in 0..k {
        d = d.mul(&d, &mut wctx);
        if d.is_infinite() || d.is_zero() {
            return Ok(d);
        }
        if d.is_nan() {
            return Err(Error::MemoryAllocation);
        }
    }

    Ok(d)
}
