//! Rounding of finite numbers and enforcement of the context limits:
//! precision, exponent range, overflow, underflow, and clamping.

use crate::coefficient;
use crate::common::buf::DigitBuf;
use crate::common::util::digits_to_limbs;
use crate::common::util::pow10;
use crate::ctx::Context;
use crate::defs::Error;
use crate::defs::Exponent;
use crate::defs::RoundingMode;
use crate::defs::Sign;
use crate::defs::Status;
use crate::defs::LIMB_DIGITS;
use crate::defs::RADIX;
use crate::num::DecNumber;

/// Outcome of applying the context limits to a finite number.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Finalized {
    /// The number is within range.
    Finite,

    /// The number overflowed to an infinity with the given sign.
    Overflow(Sign),
}

/// Decides whether discarding the digits `(rnd, sticky)` requires an
/// increment of the kept coefficient. `lsd` is the least significant kept
/// digit, used by the half-even and zero-five-up modes.
fn incr_needed(rm: RoundingMode, sign: Sign, lsd: u8, rnd: u8, sticky: bool) -> bool {
    if rnd == 0 && !sticky {
        return false;
    }

    match rm {
        RoundingMode::Down => false,
        RoundingMode::Up => true,
        RoundingMode::Ceiling => sign.is_positive(),
        RoundingMode::Floor => sign.is_negative(),
        RoundingMode::HalfUp => rnd >= 5,
        RoundingMode::HalfDown => rnd > 5 || (rnd == 5 && sticky),
        RoundingMode::HalfEven => rnd > 5 || (rnd == 5 && (sticky || lsd & 1 == 1)),
        RoundingMode::ZeroFiveUp => lsd == 0 || lsd == 5,
    }
}

/// Discards the low `drop` digits of `num` with rounding, raising the
/// exponent to preserve the magnitude. A rounding carry that would push the
/// digit count past `max_digits` is folded back into the exponent.
///
/// Returns Rounded if digits were discarded, plus Inexact if the value changed.
pub(crate) fn apply_round(
    num: &mut DecNumber,
    drop: usize,
    rm: RoundingMode,
    max_digits: usize,
) -> Result<Status, Error> {
    if drop == 0 {
        return Ok(Status::EMPTY);
    }

    let (data, rnd, sticky) = coefficient::shr_digits(&num.data, drop)?;
    num.data = data;
    num.exp += drop as Exponent;
    num.update_digits();

    let mut st = Status::ROUNDED;
    if rnd != 0 || sticky {
        st |= Status::INEXACT;
    }

    let lsd = (num.data[0] % 10) as u8;
    if incr_needed(rm, num.sign, lsd, rnd, sticky) {
        coefficient::incr(&mut num.data)?;
        num.update_digits();

        // carry into a new digit: 999..9 became 1000..0
        if num.digits > max_digits {
            let (data, r, s) = coefficient::shr_digits(&num.data, 1)?;
            debug_assert!(r == 0 && !s);
            num.data = data;
            num.exp += 1;
            num.update_digits();
        }
    }

    Ok(st)
}

// The largest coefficient of `prec` digits, all nines.
fn all_nines(prec: usize) -> Result<DigitBuf, Error> {
    let nl = digits_to_limbs(prec);
    let mut m = DigitBuf::new(nl)?;
    m.fill(RADIX - 1);

    let r = prec % LIMB_DIGITS;
    if r != 0 {
        m[nl - 1] = pow10(r) - 1;
    }

    Ok(m)
}

/// The largest finite number of the context: prec nines at etop.
pub(crate) fn largest_finite(ctx: &Context, sign: Sign) -> Result<DecNumber, Error> {
    Ok(DecNumber { sign, exp: ctx.etop(), digits: ctx.prec(), data: all_nines(ctx.prec())? })
}

fn overflow(num: &mut DecNumber, ctx: &Context) -> Result<(Finalized, Status), Error> {
    let st = Status::OVERFLOW | Status::INEXACT | Status::ROUNDED;

    let to_inf = match ctx.round() {
        RoundingMode::HalfUp | RoundingMode::HalfDown | RoundingMode::HalfEven | RoundingMode::Up => true,
        RoundingMode::Down | RoundingMode::ZeroFiveUp => false,
        RoundingMode::Ceiling => num.sign.is_positive(),
        RoundingMode::Floor => num.sign.is_negative(),
    };

    if to_inf {
        Ok((Finalized::Overflow(num.sign), st))
    } else {
        // saturate at the largest finite number
        num.data = all_nines(ctx.prec())?;
        num.exp = ctx.etop();
        num.update_digits();
        Ok((Finalized::Finite, st))
    }
}

/// Brings `num` into the representable range of `ctx`: rounds the
/// coefficient to the context precision and resolves overflow, underflow
/// and exponent clamping. The returned flags are not yet raised in `ctx`.
pub(crate) fn finalize(num: &mut DecNumber, ctx: &Context) -> Result<(Finalized, Status), Error> {
    let mut st = Status::EMPTY;
    let etiny = ctx.etiny();

    if num.is_zero() {
        let max_e = if ctx.clamp() { ctx.etop() } else { ctx.emax() };
        if num.exp > max_e {
            num.exp = max_e;
            st |= Status::CLAMPED;
        } else if num.exp < etiny {
            num.exp = etiny;
            st |= Status::CLAMPED;
        }
        return Ok((Finalized::Finite, st));
    }

    if num.adjusted() > ctx.emax() {
        return overflow(num, ctx);
    }

    if num.adjusted() < ctx.emin() {
        // subnormal before rounding
        st |= Status::SUBNORMAL;

        if num.exp < etiny {
            let drop = (etiny - num.exp) as usize;
            let rst = apply_round(num, drop, ctx.round(), ctx.prec())?;
            st |= rst;
            if rst.contains(Status::INEXACT) {
                st |= Status::UNDERFLOW;
            }
            if num.is_zero() {
                num.exp = etiny;
                st |= Status::CLAMPED;
            }
        }
        return Ok((Finalized::Finite, st));
    }

    if num.digits > ctx.prec() {
        let drop = num.digits - ctx.prec();
        st |= apply_round(num, drop, ctx.round(), ctx.prec())?;

        // rounding may have carried past emax
        if num.adjusted() > ctx.emax() {
            let (fin, ost) = overflow(num, ctx)?;
            return Ok((fin, st | ost));
        }
    }

    if ctx.clamp() && num.exp > ctx.etop() {
        num.pad_to_exp(ctx.etop())?;
        st |= Status::CLAMPED;
    }

    Ok((Finalized::Finite, st))
}
