//! Natural and decimal logarithms.

use crate::ctx::Context;
use crate::dec::Decimal;
use crate::dec::Flavor;
use crate::defs::Error;
use crate::defs::Exponent;
use crate::defs::Limb;
use crate::defs::Sign;
use crate::defs::Status;
use crate::num::DecNumber;
use crate::ops::arith::div_finite;
use crate::ops::consts;
use crate::ops::sqrt::sqrt_approx;
use crate::ops::util;

impl Decimal {
    /// Returns the natural logarithm of `self`, rounded to the context.
    ///
    /// The logarithm of a zero of either sign is negative infinity; the
    /// logarithm of one is an exact zero. Negative operands raise
    /// Invalid_operation. With `allow_crr` set in the context the result is
    /// correctly rounded, otherwise the error is at most one unit in the
    /// last place.
    pub fn ln(&self, ctx: &mut Context) -> Decimal {
        match &self.inner {
            Flavor::Nan(_) => Decimal::nan_result(ctx, &[self]),
            Flavor::Inf(Sign::Pos) => Decimal::inf(Sign::Pos),
            Flavor::Inf(Sign::Neg) => {
                ctx.raise(Status::INVALID_OPERATION);
                Decimal::NAN
            }
            Flavor::Finite(n) => {
                if n.is_zero() {
                    Decimal::inf(Sign::Neg)
                } else if n.sign.is_negative() {
                    ctx.raise(Status::INVALID_OPERATION);
                    Decimal::NAN
                } else {
                    match ln_finite(n, ctx) {
                        Ok(r) => r,
                        Err(e) => Decimal::from_error(e, ctx),
                    }
                }
            }
        }
    }

    /// Returns the base-10 logarithm of `self`, rounded to the context.
    ///
    /// The logarithm of an exact power of ten is the exact integer
    /// exponent. Zeroes and negative operands behave as in [ln](Self::ln).
    pub fn log10(&self, ctx: &mut Context) -> Decimal {
        match &self.inner {
            Flavor::Nan(_) => Decimal::nan_result(ctx, &[self]),
            Flavor::Inf(Sign::Pos) => Decimal::inf(Sign::Pos),
            Flavor::Inf(Sign::Neg) => {
                ctx.raise(Status::INVALID_OPERATION);
                Decimal::NAN
            }
            Flavor::Finite(n) => {
                if n.is_zero() {
                    Decimal::inf(Sign::Neg)
                } else if n.sign.is_negative() {
                    ctx.raise(Status::INVALID_OPERATION);
                    Decimal::NAN
                } else {
                    match log10_finite(n, ctx) {
                        Ok(r) => r,
                        Err(e) => Decimal::from_error(e, ctx),
                    }
                }
            }
        }
    }
}

// The exponent `a` if the operand is exactly 10^a.
fn power_of_ten(n: &DecNumber) -> Result<Option<Exponent>, Error> {
    let mut c = n.try_clone()?;
    c.strip_trailing_zeroes(Exponent::MAX)?;
    if c.digits == 1 && c.data[0] == 1 {
        Ok(Some(c.adjusted()))
    } else {
        Ok(None)
    }
}

fn ln_finite(n: &DecNumber, ctx: &mut Context) -> Result<Decimal, Error> {
    if power_of_ten(n)? == Some(0) {
        return Ok(Decimal::zero());
    }

    let prec = ctx.prec();
    let etiny = ctx.etiny();
    let mut wp = prec + 14;
    let mut attempts = if ctx.allow_crr() { 32 } else { 1 };

    loop {
        let mut r = ln_value(n, wp)?;
        util::settle(&mut r, wp)?;
        attempts -= 1;

        if util::rounding_safe(&r, prec, etiny)? {
            return Ok(Decimal::finalized(r, ctx));
        }
        if attempts == 0 {
            // ln of anything but one is irrational
            let kept = util::kept_digits(&r, prec, etiny);
            util::force_inexact(&mut r, kept)?;
            return Ok(Decimal::finalized(r, ctx));
        }
        wp += wp / 2;
    }
}

fn log10_finite(n: &DecNumber, ctx: &mut Context) -> Result<Decimal, Error> {
    if let Some(a) = power_of_ten(n)? {
        return Ok(Decimal::finalized(util::exponent_num(a)?, ctx));
    }

    let prec = ctx.prec();
    let etiny = ctx.etiny();
    let mut wp = prec + 14;
    let mut attempts = if ctx.allow_crr() { 32 } else { 1 };

    loop {
        let mut r = log10_value(n, wp)?;
        util::settle(&mut r, wp)?;
        attempts -= 1;

        if util::rounding_safe(&r, prec, etiny)? {
            return Ok(Decimal::finalized(r, ctx));
        }
        if attempts == 0 {
            let kept = util::kept_digits(&r, prec, etiny);
            util::force_inexact(&mut r, kept)?;
            return Ok(Decimal::finalized(r, ctx));
        }
        wp += wp / 2;
    }
}

// Splits a positive operand into m * 10^a. Normally m lies in [1, 10); an
// operand just below one keeps a = 0 and m in [0.1, 1), so the logarithm
// is taken directly and no cancellation occurs in ln m + a ln 10.
fn split(x: &DecNumber) -> Result<(DecNumber, Exponent), Error> {
    let mut m = x.try_clone()?;
    let a = m.adjusted();
    if a == -1 {
        Ok((m, 0))
    } else {
        m.exp -= a;
        Ok((m, a))
    }
}

/// ln of a positive finite operand to roughly `wp` digits of relative
/// accuracy.
pub(crate) fn ln_value(x: &DecNumber, wp: usize) -> Result<DecNumber, Error> {
    let (m, a) = split(x)?;
    let s = ln_series(&m, wp)?;
    if a == 0 {
        return Ok(s);
    }

    let ln10 = consts::ln_10(wp + 24)?;
    let an = util::exponent_num(a)?;
    let mut r = s.add_exact(&an.mul_exact(&ln10)?)?;
    util::settle(&mut r, wp + 6)?;
    Ok(r)
}

fn log10_value(x: &DecNumber, wp: usize) -> Result<DecNumber, Error> {
    let (m, a) = split(x)?;
    let s = ln_series(&m, wp + 6)?;
    let ln10 = consts::ln_10(wp + 12)?;
    let q = div_finite(&s, &ln10, wp + 6)?;
    if a == 0 {
        return Ok(q);
    }

    let mut r = util::exponent_num(a)?.add_exact(&q)?;
    util::settle(&mut r, wp + 6)?;
    Ok(r)
}

/// The raw value of ln 10, correctly rounded to `prec` digits. The cached
/// constant is built from this.
pub(crate) fn ln10_raw(prec: usize) -> Result<DecNumber, Error> {
    let ten = DecNumber::from_limb(10)?;
    let mut r = ln_series(&ten, prec + 6)?;
    util::settle(&mut r, prec)?;
    Ok(r)
}

// ln u for u in roughly [0.1, 10): repeated square roots pull u toward
// one, then ln u = 2 atanh t with t = (u - 1) / (u + 1), summed as the
// odd-power series in t.
fn ln_series(u0: &DecNumber, wp: usize) -> Result<DecNumber, Error> {
    let one = DecNumber::from_limb(1)?;
    let mut neg_one = DecNumber::from_limb(1)?;
    neg_one.sign = Sign::Neg;

    let mut u = u0.try_clone()?;
    let mut j = 0u32;

    let diff = u.add_exact(&neg_one)?;
    if diff.is_zero() {
        return DecNumber::new_zero();
    }

    // ten reductions leave |u - 1| below 0.0023
    if diff.adjusted() >= -3 {
        for _ in 0..10 {
            u = sqrt_approx(&u, wp + 10)?;
            util::settle(&mut u, wp + 10)?;
            j += 1;
        }
    }

    let num = u.add_exact(&neg_one)?;
    let den = u.add_exact(&one)?;
    let t = div_finite(&num, &den, wp + 6)?;

    let mut tsq = t.mul_exact(&t)?;
    util::settle(&mut tsq, wp + 6)?;

    let mut sum = t.try_clone()?;
    let mut term = t.try_clone()?;
    let limit = t.adjusted() - (wp as Exponent + 4);
    let mut k: Limb = 1;

    loop {
        k += 2;
        term = term.mul_exact(&tsq)?;
        util::settle(&mut term, wp + 6)?;
        if term.is_zero() || term.adjusted() < limit {
            break;
        }
        let c = div_finite(&term, &DecNumber::from_limb(k)?, wp + 6)?;
        sum = sum.add_exact(&c)?;
        util::settle(&mut sum, wp + 12)?;
    }

    // undo the reductions: one factor 2 from atanh, one per square root
    let mut r = sum.mul_exact(&DecNumber::from_limb((1 as Limb) << (j + 1))?)?;
    util::settle(&mut r, wp + 6)?;
    Ok(r)
}
