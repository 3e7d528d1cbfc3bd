//! Sign operations, neighbor values, and exponent introspection.

use crate::ctx::Context;
use crate::dec::Decimal;
use crate::dec::Flavor;
use crate::defs::Error;
use crate::defs::Exponent;
use crate::defs::RoundingMode;
use crate::defs::Sign;
use crate::defs::Status;
use crate::num::DecNumber;
use crate::ops::util;
use crate::round;
use core::cmp::Ordering;

impl Decimal {
    /// The absolute value, rounded to the context.
    pub fn abs(&self, ctx: &mut Context) -> Decimal {
        match &self.inner {
            Flavor::Nan(_) => Decimal::nan_result(ctx, &[self]),
            Flavor::Inf(_) => Decimal::INFINITY,
            Flavor::Finite(n) => {
                let r = (|| {
                    let mut r = n.try_clone()?;
                    r.sign = Sign::Pos;
                    Ok(r)
                })();
                match r {
                    Ok(r) => Decimal::finalized(r, ctx),
                    Err(e) => Decimal::from_error(e, ctx),
                }
            }
        }
    }

    /// The result of adding `self` to zero: the value rounded to the
    /// context, with the sign of a zero following the addition rules.
    pub fn plus(&self, ctx: &mut Context) -> Decimal {
        signed_identity(self, ctx, false)
    }

    /// The result of subtracting `self` from zero.
    pub fn minus(&self, ctx: &mut Context) -> Decimal {
        signed_identity(self, ctx, true)
    }

    /// The absolute value, copied without rounding or flags; works on NaNs.
    pub fn copy_abs(&self) -> Decimal {
        let mut r = self.clone();
        match &mut r.inner {
            Flavor::Finite(n) => n.sign = Sign::Pos,
            Flavor::Inf(s) => *s = Sign::Pos,
            Flavor::Nan(n) => n.sign = Sign::Pos,
        }
        r
    }

    /// The value with the sign inverted, copied without rounding or flags.
    pub fn copy_negate(&self) -> Decimal {
        -self
    }

    /// The value of `self` with the sign of `rhs`, copied without rounding
    /// or flags.
    pub fn copy_sign(&self, rhs: &Self) -> Decimal {
        let sign = rhs.sign();
        let mut r = self.clone();
        match &mut r.inner {
            Flavor::Finite(n) => n.sign = sign,
            Flavor::Inf(s) => *s = sign,
            Flavor::Nan(n) => n.sign = sign,
        }
        r
    }

    /// The smallest representable number that is larger than `self`.
    /// No flags are raised, even when the result crosses into the
    /// subnormal range or reaches infinity.
    pub fn next_plus(&self, ctx: &mut Context) -> Decimal {
        match &self.inner {
            Flavor::Nan(_) => Decimal::nan_result(ctx, &[self]),
            Flavor::Inf(Sign::Pos) => Decimal::INFINITY,
            Flavor::Inf(Sign::Neg) => match round::largest_finite(ctx, Sign::Neg) {
                Ok(n) => Decimal::from_num(n),
                Err(e) => Decimal::from_error(e, ctx),
            },
            Flavor::Finite(_) => neighbor(self, ctx, Sign::Pos).0,
        }
    }

    /// The largest representable number that is smaller than `self`.
    pub fn next_minus(&self, ctx: &mut Context) -> Decimal {
        match &self.inner {
            Flavor::Nan(_) => Decimal::nan_result(ctx, &[self]),
            Flavor::Inf(Sign::Neg) => Decimal::NEG_INFINITY,
            Flavor::Inf(Sign::Pos) => match round::largest_finite(ctx, Sign::Pos) {
                Ok(n) => Decimal::from_num(n),
                Err(e) => Decimal::from_error(e, ctx),
            },
            Flavor::Finite(_) => neighbor(self, ctx, Sign::Neg).0,
        }
    }

    /// The neighbor of `self` in the direction of `rhs`. If the operands
    /// compare equal the result is `self` with the sign of `rhs`. Unlike
    /// [Decimal::next_plus], crossing the exponent range boundaries raises
    /// the usual flags.
    pub fn next_toward(&self, rhs: &Self, ctx: &mut Context) -> Decimal {
        if self.is_nan() || rhs.is_nan() {
            return Decimal::nan_result(ctx, &[self, rhs]);
        }

        let ord = match super::cmp::cmp_values(self, rhs) {
            Ok(Some(ord)) => ord,
            Ok(None) => return Decimal::NAN,
            Err(e) => return Decimal::from_error(e, ctx),
        };

        match ord {
            Ordering::Equal => self.copy_sign(rhs),
            Ordering::Less => {
                if let Flavor::Inf(_) = self.inner {
                    return self.next_plus(ctx);
                }
                let (r, st) = neighbor(self, ctx, Sign::Pos);
                ctx.raise(step_flags(&r, st, ctx));
                r
            }
            Ordering::Greater => {
                if let Flavor::Inf(_) = self.inner {
                    return self.next_minus(ctx);
                }
                let (r, st) = neighbor(self, ctx, Sign::Neg);
                ctx.raise(step_flags(&r, st, ctx));
                r
            }
        }
    }

    /// The adjusted exponent of `self` as a decimal value.
    ///
    /// logb of a zero raises Division_by_zero and returns negative
    /// infinity; logb of an infinity is positive infinity.
    pub fn logb(&self, ctx: &mut Context) -> Decimal {
        match &self.inner {
            Flavor::Nan(_) => Decimal::nan_result(ctx, &[self]),
            Flavor::Inf(_) => Decimal::INFINITY,
            Flavor::Finite(n) => {
                if n.is_zero() {
                    ctx.raise(Status::DIVISION_BY_ZERO);
                    return Decimal::NEG_INFINITY;
                }
                match util::exponent_num(n.adjusted()) {
                    Ok(r) => Decimal::finalized(r, ctx),
                    Err(e) => Decimal::from_error(e, ctx),
                }
            }
        }
    }

    /// Returns `self` scaled by the power of ten given by `rhs`, which must
    /// be an integer within twice the context exponent range.
    pub fn scaleb(&self, rhs: &Self, ctx: &mut Context) -> Decimal {
        if self.is_nan() || rhs.is_nan() {
            return Decimal::nan_result(ctx, &[self, rhs]);
        }

        let limit = 2 * (ctx.emax() as i128 + ctx.prec() as i128);
        let shift = match integral_value(rhs) {
            Some(v) if v.abs() <= limit => v,
            _ => {
                ctx.raise(Status::INVALID_OPERATION);
                return Decimal::NAN;
            }
        };

        match &self.inner {
            Flavor::Inf(s) => Decimal::inf(*s),
            Flavor::Finite(n) => {
                let r = (|| {
                    let mut r = n.try_clone()?;
                    r.exp = r
                        .exp
                        .checked_add(shift as Exponent)
                        .ok_or(Error::InvalidArgument)?;
                    Ok(r)
                })();
                match r {
                    Ok(r) => Decimal::finalized(r, ctx),
                    Err(e) => Decimal::from_error(e, ctx),
                }
            }
            Flavor::Nan(_) => Decimal::NAN,
        }
    }
}

fn signed_identity(d: &Decimal, ctx: &mut Context, negate: bool) -> Decimal {
    match &d.inner {
        Flavor::Nan(_) => Decimal::nan_result(ctx, &[d]),
        Flavor::Inf(s) => Decimal::inf(if negate { s.invert() } else { *s }),
        Flavor::Finite(n) => {
            let r = (|| {
                let mut r = n.try_clone()?;
                if negate {
                    r.sign = r.sign.invert();
                }
                if r.is_zero() {
                    // the sign of an additive zero
                    r.sign = if ctx.round() == RoundingMode::Floor { Sign::Neg } else { Sign::Pos };
                }
                Ok(r)
            })();
            match r {
                Ok(r) => Decimal::finalized(r, ctx),
                Err(e) => Decimal::from_error(e, ctx),
            }
        }
    }
}

// An ordinary step to a neighbor is exact by definition; the surrogate
// addition's flags are kept only when the step leaves the normal range:
// past the largest finite number, or into the subnormals or zero.
fn step_flags(r: &Decimal, st: Status, ctx: &Context) -> Status {
    if r.is_infinite() || r.is_zero() || r.is_subnormal(ctx) {
        st
    } else {
        st & Status::MALLOC_ERROR
    }
}

// The next representable value in the given direction, together with the
// flags the step raised. A step past the largest finite number yields an
// infinity.
fn neighbor(d: &Decimal, ctx: &Context, dir: Sign) -> (Decimal, Status) {
    let mut work = *ctx;
    work.clear_status();
    work.set_round(if dir == Sign::Pos { RoundingMode::Ceiling } else { RoundingMode::Floor });

    let eps = match DecNumber::from_limb(1) {
        Ok(mut eps) => {
            eps.sign = dir;
            eps.exp = ctx.etiny() - 2;
            Decimal::from_num(eps)
        }
        Err(_) => return (Decimal::NAN, Status::MALLOC_ERROR),
    };

    let r = d.add(&eps, &mut work);
    (r, work.status())
}

// The operand as a signed integer, if it is finite, integral, and small
// enough for the callers' range checks.
fn integral_value(d: &Decimal) -> Option<i128> {
    let n = d.num()?;
    if !n.is_integer() {
        return None;
    }

    let mut c = n.try_clone().ok()?;
    c.strip_trailing_zeroes(0).ok()?;

    let v = c.coefficient_to_u128()?;
    if v == 0 {
        return Some(0);
    }
    if c.exp < 0 || c.exp > 38 {
        return None;
    }
    let scaled = v.checked_mul(10u128.pow(c.exp as u32))?;
    let r = i128::try_from(scaled).ok()?;
    Some(if n.sign.is_negative() { -r } else { r })
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

    fn small_ctx() -> Context {
        let mut ctx = Context::new();
        ctx.set_prec(3).unwrap();
        ctx.set_emax(99).unwrap();
        ctx.set_emin(-99).unwrap();
        ctx
    }

    #[test]
    fn test_abs_plus_minus() {
        let mut ctx = Context::new();

        let n = fin(Sign::Neg, &[1, 2], -1);
        assert!(!n.abs(&mut ctx).is_negative());
        assert!(!Decimal::NEG_INFINITY.abs(&mut ctx).is_negative());

        let r = n.minus(&mut ctx);
        assert_eq!(coeff(&r), 12);
        assert!(!r.is_negative());

        let r = n.plus(&mut ctx);
        assert!(r.is_negative());

        // plus and minus normalize the sign of zero
        let nz = -Decimal::zero();
        assert!(!nz.plus(&mut ctx).is_negative());
        assert!(!nz.minus(&mut ctx).is_negative());
        ctx.set_round(RoundingMode::Floor);
        assert!(nz.plus(&mut ctx).is_negative());
    }

    #[test]
    fn test_copy_ops() {
        let mut snan = Decimal::nan(Sign::Neg, true, None);

        assert!(!snan.copy_abs().is_negative());
        assert!(snan.copy_abs().is_signaling_nan());
        assert!(!snan.copy_negate().is_negative());
        snan = snan.copy_sign(&Decimal::one());
        assert!(!snan.is_negative());

        let a = fin(Sign::Pos, &[7], 0);
        let b = fin(Sign::Neg, &[1], 0);
        assert!(a.copy_sign(&b).is_negative());
        assert!(!b.copy_sign(&a).is_negative());
    }

    #[test]
    fn test_next_plus_minus() {
        let mut ctx = small_ctx();

        let one = Decimal::one();
        let r = one.next_plus(&mut ctx);
        assert_eq!(coeff(&r), 101);
        assert_eq!(r.exponent(), Some(-2));

        let r = one.next_minus(&mut ctx);
        assert_eq!(coeff(&r), 999);
        assert_eq!(r.exponent(), Some(-3));

        // stepping over zero
        let r = Decimal::zero().next_minus(&mut ctx);
        assert_eq!(coeff(&r), 1);
        assert!(r.is_negative());
        assert_eq!(r.exponent(), Some(ctx.etiny()));

        // the largest finite number steps to infinity
        let max = fin(Sign::Pos, &[9, 9, 9], 97);
        assert!(max.next_plus(&mut ctx).is_infinite());

        // and infinity steps back to it
        let r = Decimal::INFINITY.next_minus(&mut ctx);
        assert_eq!(coeff(&r), 999);
        assert_eq!(r.exponent(), Some(97));

        // no flags in any of the above
        assert!(ctx.status().is_empty());
    }

    #[test]
    fn test_next_toward() {
        let mut ctx = small_ctx();

        let one = Decimal::one();
        let r = one.next_toward(&Decimal::INFINITY, &mut ctx);
        assert_eq!(coeff(&r), 101);

        // an in-range step is exact and raises nothing
        let r = one.next_toward(&Decimal::NEG_INFINITY, &mut ctx);
        assert_eq!(coeff(&r), 999);
        assert!(ctx.status().is_empty());

        // stepping past the largest finite number overflows
        let max = fin(Sign::Pos, &[9, 9, 9], 97);
        let r = max.next_toward(&Decimal::INFINITY, &mut ctx);
        assert!(r.is_infinite());
        assert!(ctx.status().contains(Status::OVERFLOW | Status::INEXACT));
        ctx.clear_status();

        // equal operands: value of self, sign of other
        let z = Decimal::zero().next_toward(&-Decimal::zero(), &mut ctx);
        assert!(z.is_zero() && z.is_negative());

        // stepping below the smallest subnormal raises underflow flags
        let tiny = fin(Sign::Pos, &[1], ctx.etiny());
        let r = tiny.next_toward(&Decimal::NEG_INFINITY, &mut ctx);
        assert!(r.is_zero());
        assert!(ctx.status().contains(Status::UNDERFLOW | Status::INEXACT));
    }

    #[test]
    fn test_logb() {
        let mut ctx = Context::new();

        let a = fin(Sign::Pos, &[2, 5, 0], -2); // 2.50
        let r = a.logb(&mut ctx);
        assert_eq!(coeff(&r), 0);

        let a = fin(Sign::Neg, &[2, 5, 0], 1); // -2500
        let r = a.logb(&mut ctx);
        assert_eq!(coeff(&r), 3);
        assert!(!r.is_negative());

        let a = fin(Sign::Pos, &[1], -7);
        let r = a.logb(&mut ctx);
        assert_eq!(coeff(&r), 7);
        assert!(r.is_negative());

        assert!(Decimal::INFINITY.logb(&mut ctx).is_infinite());
        assert!(ctx.status().is_empty());

        let r = Decimal::zero().logb(&mut ctx);
        assert!(r.is_infinite() && r.is_negative());
        assert!(ctx.status().contains(Status::DIVISION_BY_ZERO));
    }

    #[test]
    fn test_scaleb() {
        let mut ctx = small_ctx();

        let a = fin(Sign::Pos, &[7, 5], -1); // 7.5
        let r = a.scaleb(&fin(Sign::Pos, &[3], 0), &mut ctx);
        assert_eq!(coeff(&r), 75);
        assert_eq!(r.exponent(), Some(2));

        let r = a.scaleb(&fin(Sign::Neg, &[2], 0), &mut ctx);
        assert_eq!(r.exponent(), Some(-3));

        // scaling can overflow
        let r = a.scaleb(&fin(Sign::Pos, &[2, 0, 0], 0), &mut ctx);
        assert!(r.is_infinite());
        assert!(ctx.status().contains(Status::OVERFLOW));

        // a fractional scale is invalid
        ctx.clear_status();
        let r = a.scaleb(&fin(Sign::Pos, &[1, 5], -1), &mut ctx);
        assert!(r.is_nan());
        assert!(ctx.status().contains(Status::INVALID_OPERATION));
    }
}
