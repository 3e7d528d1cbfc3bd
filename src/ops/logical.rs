//! Logical operations on digit strings of zeros and ones, and the shift
//! and rotate operations on coefficients.

use crate::coefficient;
use crate::ctx::Context;
use crate::dec::Decimal;
use crate::dec::Flavor;
use crate::defs::Error;
use crate::defs::Sign;
use crate::defs::Status;
use crate::num::DecNumber;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

// A logical operand is finite and positive, has exponent 0, at most prec
// digits, and every digit is 0 or 1.
fn logical_digits(d: &Decimal, prec: usize) -> Option<Vec<u8>> {
    let n = d.num()?;
    if n.sign == Sign::Neg || n.exp != 0 || n.digits > prec {
        return None;
    }

    let digits = coefficient::to_digits(&n.data).ok()?;
    if digits.iter().any(|&d| d > 1) {
        return None;
    }
    Some(digits)
}

fn digits_le(be: &[u8], prec: usize) -> Result<Vec<u8>, Error> {
    let mut v = Vec::new();
    v.try_reserve_exact(prec)?;
    v.resize(prec, 0);
    for (i, &d) in be.iter().rev().enumerate() {
        v[i] = d;
    }
    Ok(v)
}

fn from_le(v: &[u8], sign: Sign, exp: i64) -> Result<DecNumber, Error> {
    let mut be = Vec::new();
    be.try_reserve_exact(v.len().max(1))?;
    be.extend(v.iter().rev());
    if be.is_empty() {
        be.push(0);
    }
    DecNumber::from_digits_parts(sign, &be, exp)
}

fn bool_op(a: &Decimal, b: &Decimal, ctx: &mut Context, f: fn(u8, u8) -> u8) -> Decimal {
    if a.is_nan() || b.is_nan() {
        ctx.raise(Status::INVALID_OPERATION);
        return Decimal::nan_result(ctx, &[a, b]);
    }

    let prec = ctx.prec();
    let (da, db) = match (logical_digits(a, prec), logical_digits(b, prec)) {
        (Some(da), Some(db)) => (da, db),
        _ => {
            ctx.raise(Status::INVALID_OPERATION);
            return Decimal::NAN;
        }
    };

    let r = (|| {
        let la = digits_le(&da, prec)?;
        let lb = digits_le(&db, prec)?;
        let mut out = Vec::new();
        out.try_reserve_exact(prec)?;
        out.extend(la.iter().zip(lb.iter()).map(|(&x, &y)| f(x, y)));
        from_le(&out, Sign::Pos, 0)
    })();

    match r {
        Ok(n) => Decimal::from_num(n),
        Err(e) => Decimal::from_error(e, ctx),
    }
}

// The second operand of shift and rotate: an integer with magnitude at
// most prec.
fn shift_count(d: &Decimal, prec: usize) -> Option<i64> {
    let n = d.num()?;
    if !n.is_integer() {
        return None;
    }

    let mut v = n.coefficient_to_u128()?;
    if v == 0 {
        return Some(0);
    }
    if n.exp > 0 {
        for _ in 0..n.exp {
            v = v.checked_mul(10)?;
        }
    } else if n.exp < 0 {
        for _ in 0..(-n.exp) {
            v /= 10;
            if v == 0 {
                break;
            }
        }
    }

    if v > prec as u128 {
        return None;
    }
    Some(v as i64 * n.sign.to_int() as i64)
}

impl Decimal {
    /// Digit-wise logical AND of two operands of zeros and ones.
    ///
    /// Operands must be finite positive integers of at most `prec` digits,
    /// each digit 0 or 1; anything else raises Invalid_operation.
    pub fn and(&self, rhs: &Self, ctx: &mut Context) -> Decimal {
        bool_op(self, rhs, ctx, |x, y| x & y)
    }

    /// Digit-wise logical OR.
    pub fn or(&self, rhs: &Self, ctx: &mut Context) -> Decimal {
        bool_op(self, rhs, ctx, |x, y| x | y)
    }

    /// Digit-wise logical exclusive OR.
    pub fn xor(&self, rhs: &Self, ctx: &mut Context) -> Decimal {
        bool_op(self, rhs, ctx, |x, y| x ^ y)
    }

    /// Digit-wise logical inversion over the full context width: absent
    /// leading digits invert to ones.
    pub fn invert(&self, ctx: &mut Context) -> Decimal {
        if self.is_nan() {
            ctx.raise(Status::INVALID_OPERATION);
            return Decimal::nan_result(ctx, &[self]);
        }

        let prec = ctx.prec();
        let da = match logical_digits(self, prec) {
            Some(da) => da,
            None => {
                ctx.raise(Status::INVALID_OPERATION);
                return Decimal::NAN;
            }
        };

        let r = (|| {
            let mut la = digits_le(&da, prec)?;
            for d in la.iter_mut() {
                *d = 1 - *d;
            }
            from_le(&la, Sign::Pos, 0)
        })();

        match r {
            Ok(n) => Decimal::from_num(n),
            Err(e) => Decimal::from_error(e, ctx),
        }
    }

    /// Shifts the coefficient of `self` by `rhs` digits: to the left for a
    /// positive count with digits shifted past `prec` discarded, to the
    /// right for a negative count with low digits discarded without
    /// rounding. Sign and exponent are unchanged.
    pub fn shift(&self, rhs: &Self, ctx: &mut Context) -> Decimal {
        shift_rotate(self, rhs, ctx, false)
    }

    /// Rotates the coefficient of `self`, taken as exactly `prec` digits,
    /// by `rhs` positions: to the left for a positive count. Sign and
    /// exponent are unchanged.
    pub fn rotate(&self, rhs: &Self, ctx: &mut Context) -> Decimal {
        shift_rotate(self, rhs, ctx, true)
    }
}

fn shift_rotate(a: &Decimal, b: &Decimal, ctx: &mut Context, rotate: bool) -> Decimal {
    if a.is_nan() || b.is_nan() {
        return Decimal::nan_result(ctx, &[a, b]);
    }

    let prec = ctx.prec();
    let count = match shift_count(b, prec) {
        Some(c) => c,
        None => {
            ctx.raise(Status::INVALID_OPERATION);
            return Decimal::NAN;
        }
    };

    let n = match &a.inner {
        Flavor::Inf(s) => return Decimal::inf(*s),
        Flavor::Finite(n) => n,
        Flavor::Nan(_) => return Decimal::NAN,
    };

    if n.digits > prec {
        ctx.raise(Status::INVALID_OPERATION);
        return Decimal::NAN;
    }

    let r = (|| {
        let be = coefficient::to_digits(&n.data)?;
        let v = digits_le(&be, prec)?;
        let mut out = Vec::new();
        out.try_reserve_exact(prec)?;
        out.resize(prec, 0);

        for (i, &d) in v.iter().enumerate() {
            let j = i as i64 + count;
            if rotate {
                out[j.rem_euclid(prec as i64) as usize] = d;
            } else if (0..prec as i64).contains(&j) {
                out[j as usize] = d;
            }
        }

        from_le(&out, n.sign, n.exp)
    })();

    match r {
        Ok(n) => Decimal::from_num(n),
        Err(e) => Decimal::from_error(e, ctx),
    }
}
