//! Exponent adjustment: quantize, rescale, rounding to an integral value,
//! and the removal of trailing zeros.

use crate::ctx::Context;
use crate::dec::Decimal;
use crate::dec::Flavor;
use crate::defs::Exponent;
use crate::defs::RoundingMode;
use crate::defs::Status;
use crate::num::DecNumber;
use crate::round;

impl Decimal {
    /// Returns `self` with the exponent of `rhs`, rounding the coefficient
    /// if digits must be dropped.
    ///
    /// The operation is invalid if the target exponent lies outside
    /// `[etiny, emax]`, or if the result would need more than `prec`
    /// digits; the result is then a NaN and no rounding flags are raised.
    pub fn quantize(&self, rhs: &Self, ctx: &mut Context) -> Decimal {
        match (&self.inner, &rhs.inner) {
            (Flavor::Nan(_), _) | (_, Flavor::Nan(_)) => Decimal::nan_result(ctx, &[self, rhs]),
            (Flavor::Inf(s), Flavor::Inf(_)) => Decimal::inf(*s),
            (Flavor::Inf(_), _) | (_, Flavor::Inf(_)) => {
                ctx.raise(Status::INVALID_OPERATION);
                Decimal::NAN
            }
            (Flavor::Finite(a), Flavor::Finite(b)) => rescale_finite(a, b.exp, ctx),
        }
    }

    /// Returns `self` rescaled to the exponent `exp`; otherwise identical
    /// to [Decimal::quantize].
    pub fn rescale(&self, exp: Exponent, ctx: &mut Context) -> Decimal {
        match &self.inner {
            Flavor::Nan(_) => Decimal::nan_result(ctx, &[self]),
            Flavor::Inf(_) => {
                ctx.raise(Status::INVALID_OPERATION);
                Decimal::NAN
            }
            Flavor::Finite(a) => rescale_finite(a, exp, ctx),
        }
    }

    /// Returns true if both operands have the same quantum: equal exponents
    /// for finite numbers; two infinities or two NaNs also agree.
    pub fn same_quantum(&self, rhs: &Self) -> bool {
        match (&self.inner, &rhs.inner) {
            (Flavor::Finite(a), Flavor::Finite(b)) => a.exp == b.exp,
            (Flavor::Inf(_), Flavor::Inf(_)) => true,
            (Flavor::Nan(_), Flavor::Nan(_)) => true,
            _ => false,
        }
    }

    /// Rounds to an integer in the context rounding mode, raising Inexact
    /// and Rounded if fractional digits are discarded. The exponent of the
    /// result is at least 0.
    pub fn to_integral_exact(&self, ctx: &mut Context) -> Decimal {
        to_integral(self, ctx, ctx.round(), true)
    }

    /// Rounds to an integer in the context rounding mode without raising
    /// Inexact or Rounded.
    pub fn to_integral_value(&self, ctx: &mut Context) -> Decimal {
        to_integral(self, ctx, ctx.round(), false)
    }

    /// The largest integer not greater than `self`.
    pub fn floor(&self, ctx: &mut Context) -> Decimal {
        to_integral(self, ctx, RoundingMode::Floor, false)
    }

    /// The smallest integer not less than `self`.
    pub fn ceil(&self, ctx: &mut Context) -> Decimal {
        to_integral(self, ctx, RoundingMode::Ceiling, false)
    }

    /// The integer part of `self`, truncated toward zero.
    pub fn trunc(&self, ctx: &mut Context) -> Decimal {
        to_integral(self, ctx, RoundingMode::Down, false)
    }

    /// Rounds to the context and removes trailing zeros from the
    /// coefficient, producing the canonical shortest representation.
    /// A zero reduces to exponent 0.
    pub fn reduce(&self, ctx: &mut Context) -> Decimal {
        match &self.inner {
            Flavor::Nan(_) => Decimal::nan_result(ctx, &[self]),
            Flavor::Inf(s) => Decimal::inf(*s),
            Flavor::Finite(a) => {
                let r = (|| {
                    let mut r = a.try_clone()?;
                    let (fin, st) = round::finalize(&mut r, ctx)?;
                    if matches!(fin, round::Finalized::Finite) {
                        if r.is_zero() {
                            r.exp = 0;
                        } else {
                            r.strip_trailing_zeroes(Exponent::MAX)?;
                        }
                    }
                    Ok((fin, st, r))
                })();
                match r {
                    Ok((fin, st, r)) => {
                        ctx.raise(st);
                        match fin {
                            round::Finalized::Finite => Decimal::from_num(r),
                            round::Finalized::Overflow(s) => Decimal::inf(s),
                        }
                    }
                    Err(e) => Decimal::from_error(e, ctx),
                }
            }
        }
    }
}

fn rescale_finite(a: &DecNumber, target: Exponent, ctx: &mut Context) -> Decimal {
    if target < ctx.etiny() || target > ctx.emax() {
        ctx.raise(Status::INVALID_OPERATION);
        return Decimal::NAN;
    }

    let r = (|| {
        let mut r = a.try_clone()?;
        let mut st = Status::EMPTY;

        if r.is_zero() {
            r.exp = target;
        } else if r.exp > target {
            r.pad_to_exp(target)?;
        } else if r.exp < target {
            let drop = (target - r.exp) as usize;
            st = round::apply_round(&mut r, drop, ctx.round(), usize::MAX)?;
        }
        Ok((r, st))
    })();

    match r {
        Ok((r, st)) => {
            if r.digits > ctx.prec() || (!r.is_zero() && r.adjusted() > ctx.emax()) {
                ctx.raise(Status::INVALID_OPERATION);
                Decimal::NAN
            } else {
                ctx.raise(st);
                Decimal::from_num(r)
            }
        }
        Err(e) => Decimal::from_error(e, ctx),
    }
}

fn to_integral(d: &Decimal, ctx: &mut Context, rm: RoundingMode, exact: bool) -> Decimal {
    match &d.inner {
        Flavor::Nan(_) => Decimal::nan_result(ctx, &[d]),
        Flavor::Inf(s) => Decimal::inf(*s),
        Flavor::Finite(a) => {
            let r = (|| {
                let mut r = a.try_clone()?;
                let mut st = Status::EMPTY;
                if r.exp < 0 {
                    if r.is_zero() {
                        r.exp = 0;
                    } else {
                        let drop = (-r.exp) as usize;
                        st = round::apply_round(&mut r, drop, rm, usize::MAX)?;
                    }
                }
                Ok((r, st))
            })();
            match r {
                Ok((r, st)) => {
                    if exact {
                        ctx.raise(st);
                    }
                    Decimal::from_num(r)
                }
                Err(e) => Decimal::from_error(e, ctx),
            }
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::defs::Sign;

    fn fin(sign: Sign, digits: &[u8], exp: Exponent) -> Decimal {
        Decimal::from_num(DecNumber::from_digits_parts(sign, digits, exp).unwrap())
    }

    fn coeff(d: &Decimal) -> u128 {
        d.num().unwrap().coefficient_to_u128().unwrap()
    }

    #[test]
    fn test_quantize_pads_and_rounds() {
        let mut ctx = Context::new();
        ctx.set_prec(9).unwrap();

        // 2.17 quantized to 0.001 -> 2.170
        let a = fin(Sign::Pos, &[2, 1, 7], -2);
        let q = fin(Sign::Pos, &[1], -3);
        let r = a.quantize(&q, &mut ctx);
        assert_eq!(coeff(&r), 2170);
        assert_eq!(r.exponent(), Some(-3));
        assert!(ctx.status().is_empty());

        // 2.17 quantized to 0.1 -> 2.2
        let q = fin(Sign::Pos, &[1], -1);
        let r = a.quantize(&q, &mut ctx);
        assert_eq!(coeff(&r), 22);
        assert_eq!(ctx.status(), Status::INEXACT | Status::ROUNDED);

        // quantize to an integer quantum
        ctx.clear_status();
        let r = a.quantize(&Decimal::one(), &mut ctx);
        assert_eq!(coeff(&r), 2);
        assert_eq!(r.exponent(), Some(0));
    }

    #[test]
    fn test_quantize_to_zero_and_signs() {
        let mut ctx = Context::new();
        ctx.set_prec(9).unwrap();

        // -0.1 quantized to 1 rounds to -0
        let a = fin(Sign::Neg, &[1], -1);
        let r = a.quantize(&Decimal::one(), &mut ctx);
        assert!(r.is_zero() && r.is_negative());
        assert_eq!(r.exponent(), Some(0));

        // a zero takes the target exponent exactly
        ctx.clear_status();
        let r = Decimal::zero().quantize(&fin(Sign::Pos, &[1], 5), &mut ctx);
        assert!(r.is_zero());
        assert_eq!(r.exponent(), Some(5));
        assert!(ctx.status().is_empty());
    }

    #[test]
    fn test_quantize_invalid() {
        let mut ctx = Context::new();
        ctx.set_prec(3).unwrap();

        // five digits exceed the three-digit precision
        let a = fin(Sign::Pos, &[1, 2, 3, 4, 5], -2);
        let r = a.quantize(&fin(Sign::Pos, &[1], -2), &mut ctx);
        assert!(r.is_nan());
        assert!(ctx.status().contains(Status::INVALID_OPERATION));

        // padding to a smaller exponent only makes it worse
        ctx.clear_status();
        let r = a.quantize(&fin(Sign::Pos, &[1], -3), &mut ctx);
        assert!(r.is_nan());
        assert!(ctx.status().contains(Status::INVALID_OPERATION));

        // one infinite operand is invalid, two agree
        ctx.clear_status();
        let r = Decimal::INFINITY.quantize(&Decimal::one(), &mut ctx);
        assert!(r.is_nan());
        assert!(ctx.status().contains(Status::INVALID_OPERATION));
        let r = Decimal::INFINITY.quantize(&Decimal::NEG_INFINITY, &mut ctx);
        assert!(r.is_infinite());
    }

    #[test]
    fn test_rescale() {
        let mut ctx = Context::new();
        ctx.set_prec(9).unwrap();

        let a = fin(Sign::Pos, &[9, 9, 5], -2); // 9.95
        let r = a.rescale(-1, &mut ctx);
        assert_eq!(coeff(&r), 100);
        assert_eq!(r.exponent(), Some(-1));
        assert!(ctx.status().contains(Status::INEXACT));
    }

    #[test]
    fn test_same_quantum() {
        let a = fin(Sign::Pos, &[1], -2);
        let b = fin(Sign::Neg, &[9, 9], -2);
        assert!(a.same_quantum(&b));
        assert!(!a.same_quantum(&Decimal::one()));
        assert!(Decimal::INFINITY.same_quantum(&Decimal::NEG_INFINITY));
        assert!(Decimal::NAN.same_quantum(&Decimal::NAN));
        assert!(!Decimal::NAN.same_quantum(&Decimal::INFINITY));
    }

    #[test]
    fn test_to_integral() {
        let mut ctx = Context::new();

        let a = fin(Sign::Pos, &[2, 5], -1); // 2.5
        let r = a.to_integral_exact(&mut ctx);
        assert_eq!(coeff(&r), 2);
        assert_eq!(r.exponent(), Some(0));
        assert!(ctx.status().contains(Status::INEXACT | Status::ROUNDED));

        // the value variant stays quiet
        ctx.clear_status();
        let r = a.to_integral_value(&mut ctx);
        assert_eq!(coeff(&r), 2);
        assert!(ctx.status().is_empty());

        // positive exponents are preserved
        let a = fin(Sign::Pos, &[7], 2);
        let r = a.to_integral_exact(&mut ctx);
        assert_eq!(coeff(&r), 7);
        assert_eq!(r.exponent(), Some(2));
        assert!(ctx.status().is_empty());

        assert!(Decimal::INFINITY.to_integral_exact(&mut ctx).is_infinite());
    }

    #[test]
    fn test_floor_ceil_trunc() {
        let mut ctx = Context::new();

        let a = fin(Sign::Pos, &[2, 7], -1); // 2.7
        let n = fin(Sign::Neg, &[2, 7], -1); // -2.7

        assert_eq!(coeff(&a.floor(&mut ctx)), 2);
        assert_eq!(coeff(&a.ceil(&mut ctx)), 3);
        assert_eq!(coeff(&a.trunc(&mut ctx)), 2);

        let f = n.floor(&mut ctx);
        assert_eq!(coeff(&f), 3);
        assert!(f.is_negative());
        assert_eq!(coeff(&n.ceil(&mut ctx)), 2);
        assert_eq!(coeff(&n.trunc(&mut ctx)), 2);

        assert!(ctx.status().is_empty());
    }

    #[test]
    fn test_reduce() {
        let mut ctx = Context::new();
        ctx.set_prec(9).unwrap();

        let a = fin(Sign::Pos, &[1, 2, 0, 0], -2); // 12.00
        let r = a.reduce(&mut ctx);
        assert_eq!(coeff(&r), 12);
        assert_eq!(r.exponent(), Some(0));

        // reduction happens after precision rounding
        let mut ctx3 = Context::new();
        ctx3.set_prec(3).unwrap();
        let a = fin(Sign::Pos, &[1, 0, 0, 0, 4], 0);
        let r = a.reduce(&mut ctx3);
        assert_eq!(coeff(&r), 1);
        assert_eq!(r.exponent(), Some(4));
        assert!(ctx3.status().contains(Status::INEXACT));

        // zero reduces to exponent 0 and keeps its sign
        let z = fin(Sign::Neg, &[0], 5);
        let r = z.reduce(&mut ctx);
        assert!(r.is_zero() && r.is_negative());
        assert_eq!(r.exponent(), Some(0));
    }
}
