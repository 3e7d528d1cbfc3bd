//! Shared plumbing for the approximated operations: working contexts with a
//! widened exponent range, guard-digit rounding checks, and the shortcut
//! results for arguments far outside the representable range.

use crate::coefficient;
use crate::ctx::Context;
use crate::dec::Decimal;
use crate::defs::Error;
use crate::defs::Exponent;
use crate::defs::RoundingMode;
use crate::defs::Sign;
use crate::defs::Status;
use crate::num::DecNumber;
use crate::round;
use core::cmp::Ordering;

/// A context for internal iterations: `prec` digits, the widest exponent
/// range, half-even rounding, no traps.
pub(crate) fn work(prec: usize) -> Context {
    let mut w = Context::new().workctx(prec);
    w.set_round(RoundingMode::HalfEven);
    w
}

/// Moves the finite payload out of an intermediate result. The callers
/// handle infinities and zeroes before this point, so anything else is an
/// allocation failure inside a working operation.
pub(crate) fn take_finite(d: Decimal) -> Result<DecNumber, Error> {
    match d.inner {
        crate::dec::Flavor::Finite(n) => Ok(n),
        _ => Err(Error::MemoryAllocation),
    }
}

/// The exponent `e` as a decimal integer.
pub(crate) fn exponent_num(e: Exponent) -> Result<DecNumber, Error> {
    let mut n = DecNumber::from_u128(e.unsigned_abs() as u128)?;
    if e < 0 {
        n.sign = Sign::Neg;
    }
    Ok(n)
}

/// Rounds `n` half-even to at most `digits` significant digits, so that the
/// digits beyond the accuracy of an approximation do not reach the final
/// rounding decision.
pub(crate) fn settle(n: &mut DecNumber, digits: usize) -> Result<(), Error> {
    if n.digits > digits {
        round::apply_round(n, n.digits - digits, RoundingMode::HalfEven, usize::MAX)?;
    }
    Ok(())
}

/// The number of digits the final rounding of `n` will keep: the context
/// precision, or less if the result is subnormal. Zero means the whole
/// coefficient is discarded.
pub(crate) fn kept_digits(n: &DecNumber, prec: usize, etiny: Exponent) -> usize {
    let k = (n.adjusted() - etiny + 1).min(prec as Exponent);
    if k < 1 {
        0
    } else {
        k as usize
    }
}

/// Decides whether rounding the approximation `n` to its kept digits is
/// immune to the approximation error. The discarded digit string must stay
/// clear of the rounding boundaries: a run of zeroes or nines, or a value
/// right at one half of the last kept digit.
pub(crate) fn rounding_safe(n: &DecNumber, prec: usize, etiny: Exponent) -> Result<bool, Error> {
    let kept = kept_digits(n, prec, etiny);
    if kept == 0 {
        return Ok(true);
    }
    if n.digits < kept + 4 {
        return Ok(false);
    }

    let digits = coefficient::to_digits(&n.data)?;
    let s = &digits[kept..];
    // the last two digits absorb the approximation error
    let body = &s[..s.len() - 2];

    let near_low = body.iter().all(|&d| d == 0);
    let near_high = body.iter().all(|&d| d == 9);
    let near_half_up = s[0] == 5 && body[1..].iter().all(|&d| d == 0);
    let near_half_down = s[0] == 4 && body[1..].iter().all(|&d| d == 9);

    Ok(!(near_low || near_high || near_half_up || near_half_down))
}

/// Guarantees that rounding `n` to `kept` digits raises Inexact. The true
/// results of the approximated operations are never exact at this point,
/// but the approximation itself can land on a run of zeroes.
pub(crate) fn force_inexact(n: &mut DecNumber, kept: usize) -> Result<(), Error> {
    if kept == 0 || n.digits <= kept {
        return Ok(());
    }
    let (_, rnd, sticky) = coefficient::shr_digits(&n.data, n.digits - kept)?;
    if rnd == 0 && !sticky {
        coefficient::incr(&mut n.data)?;
        n.update_digits();
    }
    Ok(())
}

/// Returns true if `|x| >= 2.4 * (bound + 2)`, which guarantees that
/// `|x| / ln 10 > bound + 1`. Used to decide overflow and underflow of the
/// exponential without computing it.
pub(crate) fn beyond_range(x: &DecNumber, bound: u128) -> Result<bool, Error> {
    let mut t = DecNumber::from_u128((bound + 2) * 24)?;
    t.exp = -1;
    Ok(x.cmp_abs(&t)? != Ordering::Less)
}

/// An overflowed result: a surrogate one digit past `emax` is pushed
/// through the context limits, which resolve it to an infinity or the
/// largest finite number depending on the rounding mode.
pub(crate) fn overflow_result(ctx: &mut Context, sign: Sign) -> Decimal {
    match DecNumber::from_limb(1) {
        Ok(mut n) => {
            n.sign = sign;
            n.exp = ctx.emax() + 1;
            Decimal::finalized(n, ctx)
        }
        Err(e) => Decimal::from_error(e, ctx),
    }
}

/// A result below every representable magnitude: a surrogate below etiny
/// rounds identically to the true value in every mode and picks up the
/// underflow flags on the way through the context limits.
pub(crate) fn underflow_result(ctx: &mut Context, sign: Sign) -> Decimal {
    match DecNumber::from_limb(1) {
        Ok(mut n) => {
            n.sign = sign;
            n.exp = ctx.etiny() - 2;
            Decimal::finalized(n, ctx)
        }
        Err(e) => Decimal::from_error(e, ctx),
    }
}

/// Exactly one, carried to the full context precision and flagged inexact:
/// the result of the exponential family when the true value differs from
/// one by less than a final rounding can see.
pub(crate) fn inexact_one(ctx: &mut Context, sign: Sign) -> Decimal {
    let prec = ctx.prec();
    let r = (|| {
        let mut n = DecNumber::from_limb(1)?;
        n.sign = sign;
        if prec > 1 {
            n.pad_to_exp(-(prec as Exponent) + 1)?;
        }
        Ok(n)
    })();
    match r {
        Ok(n) => {
            ctx.raise(Status::INEXACT | Status::ROUNDED);
            Decimal::from_num(n)
        }
        Err(e) => Decimal::from_error(e, ctx),
    }
}

/// A result closer to one than a final rounding can see, on a known side:
/// a surrogate one ulp above or below one (at two guard digits past the
/// precision) goes through the context limits, so the directed modes land
/// on the correct side of the true value.
pub(crate) fn nearly_one(ctx: &mut Context, sign: Sign, below: bool) -> Decimal {
    let k = ctx.prec() + 2;
    let r = (|| {
        let mut n = DecNumber::from_limb(1)?;
        n.pad_to_exp(-(k as Exponent))?;
        if below {
            let one = DecNumber::from_limb(1)?;
            n.data = coefficient::sub(&n.data, &one.data)?;
        } else {
            coefficient::incr(&mut n.data)?;
        }
        n.update_digits();
        n.sign = sign;
        Ok(n)
    })();
    match r {
        Ok(n) => Decimal::finalized(n, ctx),
        Err(e) => Decimal::from_error(e, ctx),
    }
}
