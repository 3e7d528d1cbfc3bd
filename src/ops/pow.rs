//! The power function and modular exponentiation.

use crate::coefficient;
use crate::common::buf::DigitBuf;
use crate::ctx::Context;
use crate::dec::Decimal;
use crate::dec::Flavor;
use crate::defs::Error;
use crate::defs::Exponent;
use crate::defs::Limb;
use crate::defs::Sign;
use crate::defs::Status;
use crate::num::DecNumber;
use crate::ops::exp::exp_series;
use crate::ops::log::ln_value;
use crate::ops::util;
use core::cmp::Ordering;

impl Decimal {
    /// Returns `self` raised to the power of `rhs`, rounded to the context.
    ///
    /// An integer exponent that produces a representable result is computed
    /// exactly with the ideal exponent: `1.0^3` is `1.000` and `5^-3` is
    /// `0.008`. Other results are inexact; with `allow_crr` set in the
    /// context they are correctly rounded, otherwise the error is at most
    /// one unit in the last place. A negative base with a non-integer
    /// exponent raises Invalid_operation, as does `0^0`.
    pub fn pow(&self, rhs: &Self, ctx: &mut Context) -> Decimal {
        if self.is_nan() || rhs.is_nan() {
            return Decimal::nan_result(ctx, &[self, rhs]);
        }

        // anything but a zero raised to a zero exponent is one
        if rhs.is_zero() {
            return if self.is_zero() {
                ctx.raise(Status::INVALID_OPERATION);
                Decimal::NAN
            } else {
                Decimal::one()
            };
        }

        if self.is_zero() {
            return match zero_base(self, rhs) {
                Ok(r) => r,
                Err(e) => Decimal::from_error(e, ctx),
            };
        }

        match (&self.inner, &rhs.inner) {
            (Flavor::Inf(Sign::Pos), _) => {
                if rhs_negative(rhs) {
                    signed_zero(Sign::Pos, ctx)
                } else {
                    Decimal::inf(Sign::Pos)
                }
            }
            (Flavor::Inf(Sign::Neg), Flavor::Finite(y)) if y.is_integer() => {
                match is_odd_integer(y) {
                    Ok(odd) => {
                        let sign = if odd { Sign::Neg } else { Sign::Pos };
                        if y.sign.is_negative() {
                            signed_zero(sign, ctx)
                        } else {
                            Decimal::inf(sign)
                        }
                    }
                    Err(e) => Decimal::from_error(e, ctx),
                }
            }
            (Flavor::Inf(Sign::Neg), _) => {
                ctx.raise(Status::INVALID_OPERATION);
                Decimal::NAN
            }
            (Flavor::Finite(x), Flavor::Inf(s)) => {
                if x.sign.is_negative() {
                    ctx.raise(Status::INVALID_OPERATION);
                    return Decimal::NAN;
                }
                let one = match DecNumber::from_limb(1) {
                    Ok(n) => n,
                    Err(e) => return Decimal::from_error(e, ctx),
                };
                match x.cmp_abs(&one) {
                    Ok(Ordering::Equal) => util::inexact_one(ctx, Sign::Pos),
                    Ok(Ordering::Greater) => {
                        if s.is_negative() {
                            signed_zero(Sign::Pos, ctx)
                        } else {
                            Decimal::inf(Sign::Pos)
                        }
                    }
                    Ok(Ordering::Less) => {
                        if s.is_negative() {
                            Decimal::inf(Sign::Pos)
                        } else {
                            signed_zero(Sign::Pos, ctx)
                        }
                    }
                    Err(e) => Decimal::from_error(e, ctx),
                }
            }
            (Flavor::Finite(x), Flavor::Finite(y)) => match pow_finite(x, y, ctx) {
                Ok(r) => r,
                Err(e) => Decimal::from_error(e, ctx),
            },
            (_, Flavor::Nan(_)) | (Flavor::Nan(_), _) => Decimal::NAN,
        }
    }

    /// Returns `(self ^ exp) % modulus` where all three operands are
    /// integers; the reduction is applied at every step, so the exponent
    /// may be very large.
    ///
    /// The exponent must not be negative and the modulus must be a nonzero
    /// integer of at most `prec` digits; special values or `0^0` raise
    /// Invalid_operation. The result takes the sign of the base if the
    /// exponent is odd.
    pub fn powmod(&self, exp: &Self, modulus: &Self, ctx: &mut Context) -> Decimal {
        if self.is_nan() || exp.is_nan() || modulus.is_nan() {
            return Decimal::nan_result(ctx, &[self, exp, modulus]);
        }

        let (x, y, m) = match (&self.inner, &exp.inner, &modulus.inner) {
            (Flavor::Finite(x), Flavor::Finite(y), Flavor::Finite(m)) => (x, y, m),
            _ => {
                ctx.raise(Status::INVALID_OPERATION);
                return Decimal::NAN;
            }
        };

        if !x.is_integer()
            || !y.is_integer()
            || !m.is_integer()
            || (y.sign.is_negative() && !y.is_zero())
            || m.is_zero()
            || (x.is_zero() && y.is_zero())
        {
            ctx.raise(Status::INVALID_OPERATION);
            return Decimal::NAN;
        }

        match powmod_finite(x, y, m, ctx) {
            Ok(r) => r,
            Err(e) => Decimal::from_error(e, ctx),
        }
    }
}

fn signed_zero(sign: Sign, ctx: &mut Context) -> Decimal {
    match DecNumber::new_zero() {
        Ok(mut z) => {
            z.sign = sign;
            Decimal::from_num(z)
        }
        Err(e) => Decimal::from_error(e, ctx),
    }
}

fn rhs_negative(rhs: &Decimal) -> bool {
    match &rhs.inner {
        Flavor::Inf(s) => s.is_negative(),
        Flavor::Finite(n) => n.sign.is_negative(),
        Flavor::Nan(_) => false,
    }
}

// A zero base with a nonzero exponent: the result is a zero or an
// infinity, negative only for a negative base and an odd integer exponent.
fn zero_base(base: &Decimal, rhs: &Decimal) -> Result<Decimal, Error> {
    let odd = match &rhs.inner {
        Flavor::Finite(y) if y.is_integer() => is_odd_integer(y)?,
        _ => false,
    };
    let sign = if base.is_negative() && odd { Sign::Neg } else { Sign::Pos };

    if rhs_negative(rhs) {
        Ok(Decimal::inf(sign))
    } else {
        let mut z = DecNumber::new_zero()?;
        z.sign = sign;
        Ok(Decimal::from_num(z))
    }
}

// Parity of an integer-valued operand of any size.
fn is_odd_integer(y: &DecNumber) -> Result<bool, Error> {
    debug_assert!(y.is_integer());
    let mut c = y.try_clone()?;
    c.strip_trailing_zeroes(0)?;
    Ok(c.exp == 0 && c.data[0] & 1 == 1)
}

// The magnitude of an integer-valued operand, if it fits in a u64.
fn integral_u64(y: &DecNumber) -> Result<Option<u64>, Error> {
    let mut c = y.try_clone()?;
    c.strip_trailing_zeroes(0)?;

    let v = match c.coefficient_to_u128() {
        Some(v) => v,
        None => return Ok(None),
    };
    if c.exp > 19 {
        return Ok(None);
    }
    let scaled = match v.checked_mul(10u128.pow(c.exp as u32)) {
        Some(s) => s,
        None => return Ok(None),
    };
    if scaled <= u64::MAX as u128 {
        Ok(Some(scaled as u64))
    } else {
        Ok(None)
    }
}

fn pow_finite(x: &DecNumber, y: &DecNumber, ctx: &mut Context) -> Result<Decimal, Error> {
    let one = DecNumber::from_limb(1)?;

    if y.is_integer() {
        if let Some(m) = integral_u64(y)? {
            return pow_int(x, m, y.sign, ctx);
        }

        // the exponent magnitude is beyond the ladder
        let odd = is_odd_integer(y)?;
        let sign = if x.sign.is_negative() && odd { Sign::Neg } else { Sign::Pos };

        if x.cmp_abs(&one)? == Ordering::Equal {
            let mut r = one;
            r.sign = sign;
            return Ok(Decimal::finalized(r, ctx));
        }

        let mut xa = x.try_clone()?;
        xa.sign = Sign::Pos;
        return pow_real(&xa, y, sign, ctx);
    }

    if x.sign.is_negative() {
        ctx.raise(Status::INVALID_OPERATION);
        return Ok(Decimal::NAN);
    }
    if x.cmp_abs(&one)? == Ordering::Equal {
        return Ok(util::inexact_one(ctx, Sign::Pos));
    }

    pow_real(x, y, Sign::Pos, ctx)
}

// Repeated squaring for an exponent magnitude that fits in a u64. The
// ladder runs in a wide working context; a clean working status means the
// result is exact and keeps its ideal exponent.
fn pow_int(x: &DecNumber, m: u64, ysign: Sign, ctx: &mut Context) -> Result<Decimal, Error> {
    let prec = ctx.prec();
    let etiny = ctx.etiny();
    let result_sign = if x.sign.is_negative() && m & 1 == 1 { Sign::Neg } else { Sign::Pos };

    let mut wp = prec + 24;
    let mut attempts = if ctx.allow_crr() { 8 } else { 1 };

    loop {
        let mut wctx = util::work(wp);
        let mut acc = Decimal::one();
        let mut base = Decimal::from_num(x.try_clone()?);
        let mut e = m;

        let escaped = loop {
            if e & 1 == 1 {
                acc = acc.mul(&base, &mut wctx);
                if acc.is_nan() {
                    return Err(Error::MemoryAllocation);
                }
                if acc.is_infinite() || acc.is_zero() {
                    break Some(acc.is_infinite());
                }
            }
            e >>= 1;
            if e == 0 {
                break None;
            }
            base = base.mul(&base, &mut wctx);
            if base.is_nan() {
                return Err(Error::MemoryAllocation);
            }
            if base.is_infinite() || base.is_zero() {
                break Some(base.is_infinite());
            }
        };

        // an escape from the working range is a genuine overflow or
        // underflow of the final result, flipped by a negative exponent
        if let Some(inf) = escaped {
            let over = inf != ysign.is_negative();
            return Ok(if over {
                util::overflow_result(ctx, result_sign)
            } else {
                util::underflow_result(ctx, result_sign)
            });
        }

        if ysign.is_negative() {
            acc = Decimal::one().div(&acc, &mut wctx);
            if acc.is_nan() {
                return Err(Error::MemoryAllocation);
            }
        }

        let inexact = wctx.status().contains(Status::INEXACT);
        let mut r = util::take_finite(acc)?;

        if !inexact {
            return Ok(Decimal::finalized(r, ctx));
        }

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

// x^y = exp(y ln x) for a positive base not equal to one. The result sign
// is supplied by the caller for the negative-base odd-integer case.
fn pow_real(
    xa: &DecNumber,
    y: &DecNumber,
    sign: Sign,
    ctx: &mut Context,
) -> Result<Decimal, Error> {
    let prec = ctx.prec();
    let etiny = ctx.etiny();

    let mut wp = prec + 14;
    let mut attempts = if ctx.allow_crr() { 8 } else { 1 };

    loop {
        // ln x carries extra digits because the product with a large y
        // loses absolute accuracy before the exponential
        let l = ln_value(xa, wp + 24)?;
        let mut z = y.mul_exact(&l)?;
        util::settle(&mut z, wp + 24)?;

        if z.sign.is_positive() {
            if util::beyond_range(&z, ctx.emax() as u128)? {
                return Ok(util::overflow_result(ctx, sign));
            }
        } else if util::beyond_range(&z, etiny.unsigned_abs() as u128)? {
            return Ok(util::underflow_result(ctx, sign));
        }

        // a result within one ulp of one; y ln x fixes the side
        if z.adjusted() < -(prec as Exponent + 2) {
            return Ok(util::nearly_one(ctx, sign, z.sign.is_negative()));
        }

        let d = exp_series(&z, wp)?;
        if d.is_infinite() {
            return Ok(util::overflow_result(ctx, sign));
        }
        if d.is_zero() {
            return Ok(util::underflow_result(ctx, sign));
        }

        let mut r = util::take_finite(d)?;
        r.sign = sign;
        util::settle(&mut r, wp)?;
        attempts -= 1;

        if util::rounding_safe(&r, prec, etiny)? {
            return Ok(Decimal::finalized(r, ctx));
        }
        if attempts == 0 {
            let kept = util::kept_digits(&r, prec, etiny);
            if kept > 0 && r.digits < kept + 4 {
                let deficit = (kept + 4 - r.digits) as Exponent;
                r.pad_to_exp(r.exp - deficit)?;
            }
            util::force_inexact(&mut r, kept)?;
            return Ok(Decimal::finalized(r, ctx));
        }
        wp += wp / 2;
    }
}

// (a * b) mod m on raw coefficients.
fn modmul(a: &[Limb], b: &[Limb], m: &[Limb]) -> Result<DigitBuf, Error> {
    let p = coefficient::mul::mul(a, b)?;
    let (_, r) = coefficient::div::div_rem(&p, m)?;
    Ok(r)
}

// 10^k mod m by binary exponentiation on k.
fn modpow10(mut k: u64, m: &[Limb]) -> Result<DigitBuf, Error> {
    let mut acc = DigitBuf::from_limbs(&[1])?;
    let mut base = {
        let ten = DigitBuf::from_limbs(&[10])?;
        let (_, r) = coefficient::div::div_rem(&ten, m)?;
        r
    };

    while k > 0 {
        if k & 1 == 1 {
            acc = modmul(&acc, &base, m)?;
        }
        k >>= 1;
        if k == 0 {
            break;
        }
        base = modmul(&base, &base, m)?;
    }

    Ok(acc)
}

fn powmod_finite(
    x: &DecNumber,
    y: &DecNumber,
    m: &DecNumber,
    ctx: &mut Context,
) -> Result<Decimal, Error> {
    // the modulus value must fit in the context precision
    let mut mm = m.try_clone()?;
    mm.strip_trailing_zeroes(0)?;
    if mm.digits + mm.exp.max(0) as usize > ctx.prec() {
        ctx.raise(Status::INVALID_OPERATION);
        return Ok(Decimal::NAN);
    }
    if mm.exp > 0 {
        mm.pad_to_exp(0)?;
    }
    let mv = &mm.data;

    // reduce the base before the ladder
    let mut xb = x.try_clone()?;
    xb.strip_trailing_zeroes(0)?;
    let (_, mut base) = coefficient::div::div_rem(&xb.data, mv)?;
    if xb.exp > 0 {
        let p10 = modpow10(xb.exp as u64, mv)?;
        base = modmul(&base, &p10, mv)?;
    }

    let y_odd = is_odd_integer(y)?;

    // consume the exponent by binary halving of its decimal form; a
    // positive exponent is lowered by turning factors of ten into fives
    let mut ec = y.try_clone()?;
    ec.strip_trailing_zeroes(0)?;
    let five = DigitBuf::from_limbs(&[5])?;
    let mut edata = ec.data;
    let mut eexp = ec.exp;

    let mut acc = DigitBuf::from_limbs(&[1])?;
    while !coefficient::is_zero(&edata) {
        if eexp == 0 && edata[0] & 1 == 1 {
            acc = modmul(&acc, &base, mv)?;
        }
        if eexp > 0 {
            edata = coefficient::mul::mul(&edata, &five)?;
            eexp -= 1;
        } else {
            let (q, _) = coefficient::div::div_rem_limb(&edata, 2)?;
            edata = q;
        }
        base = modmul(&base, &base, mv)?;
    }

    // a final reduction covers a zero exponent with modulus one
    let (_, r) = coefficient::div::div_rem(&acc, mv)?;

    let mut res = DecNumber { sign: Sign::Pos, exp: 0, digits: 0, data: r };
    res.update_digits();
    if x.sign.is_negative() && y_odd && !res.is_zero() {
        res.sign = Sign::Neg;
    }

    Ok(Decimal::finalized(res, ctx))
}
