//! Comparison operations: numeric comparison, the total ordering, and the
//! min/max family.

use crate::coefficient;
use crate::ctx::Context;
use crate::dec::Decimal;
use crate::dec::Flavor;
use crate::dec::NanData;
use crate::defs::Error;
use crate::defs::Sign;
use crate::defs::Status;
use crate::num::DecNumber;
use core::cmp::Ordering;

/// Numeric comparison; None if either operand is a NaN. Representations are
/// not distinguished and zeros of both signs are equal.
pub(crate) fn cmp_values(a: &Decimal, b: &Decimal) -> Result<Option<Ordering>, Error> {
    match (&a.inner, &b.inner) {
        (Flavor::Nan(_), _) | (_, Flavor::Nan(_)) => Ok(None),
        (Flavor::Inf(s1), Flavor::Inf(s2)) => Ok(Some(match (s1, s2) {
            (Sign::Pos, Sign::Neg) => Ordering::Greater,
            (Sign::Neg, Sign::Pos) => Ordering::Less,
            _ => Ordering::Equal,
        })),
        (Flavor::Inf(Sign::Pos), _) => Ok(Some(Ordering::Greater)),
        (Flavor::Inf(Sign::Neg), _) => Ok(Some(Ordering::Less)),
        (_, Flavor::Inf(Sign::Pos)) => Ok(Some(Ordering::Less)),
        (_, Flavor::Inf(Sign::Neg)) => Ok(Some(Ordering::Greater)),
        (Flavor::Finite(x), Flavor::Finite(y)) => x.cmp_num(y).map(Some),
    }
}

// Rank of a value among the positive side of the total ordering:
// finite < infinity < signaling NaN < quiet NaN.
fn total_rank(d: &Decimal) -> u8 {
    match &d.inner {
        Flavor::Finite(_) => 0,
        Flavor::Inf(_) => 1,
        Flavor::Nan(NanData { signaling: true, .. }) => 2,
        Flavor::Nan(_) => 3,
    }
}

fn payload_cmp(a: &NanData, b: &NanData) -> Ordering {
    match (&a.payload, &b.payload) {
        (None, None) => Ordering::Equal,
        (None, Some(p)) => {
            if coefficient::is_zero(p) {
                Ordering::Equal
            } else {
                Ordering::Less
            }
        }
        (Some(p), None) => {
            if coefficient::is_zero(p) {
                Ordering::Equal
            } else {
                Ordering::Greater
            }
        }
        (Some(p), Some(q)) => coefficient::cmp(p, q),
    }
}

// Total ordering of magnitudes: every value is comparable, numerically
// equal representations are ordered by exponent, NaNs by payload.
fn total_cmp_abs(a: &Decimal, b: &Decimal) -> Result<Ordering, Error> {
    let ra = total_rank(a);
    let rb = total_rank(b);
    if ra != rb {
        return Ok(ra.cmp(&rb));
    }

    match (&a.inner, &b.inner) {
        (Flavor::Finite(x), Flavor::Finite(y)) => {
            let ord = x.cmp_abs(y)?;
            if ord != Ordering::Equal {
                Ok(ord)
            } else {
                Ok(x.exp.cmp(&y.exp))
            }
        }
        (Flavor::Inf(_), Flavor::Inf(_)) => Ok(Ordering::Equal),
        (Flavor::Nan(x), Flavor::Nan(y)) => Ok(payload_cmp(x, y)),
        _ => unreachable!(),
    }
}

fn total_cmp(a: &Decimal, b: &Decimal) -> Result<Ordering, Error> {
    match (a.sign(), b.sign()) {
        (Sign::Neg, Sign::Pos) => Ok(Ordering::Less),
        (Sign::Pos, Sign::Neg) => Ok(Ordering::Greater),
        (Sign::Pos, Sign::Pos) => total_cmp_abs(a, b),
        (Sign::Neg, Sign::Neg) => total_cmp_abs(a, b).map(Ordering::reverse),
    }
}

fn ord_to_dec(ord: Ordering) -> Decimal {
    match ord {
        Ordering::Equal => Decimal::zero(),
        Ordering::Greater => Decimal::one(),
        Ordering::Less => -Decimal::one(),
    }
}

impl Decimal {
    /// Compares numerically: -1, 0 or 1, or a NaN if either operand is one.
    pub fn compare(&self, rhs: &Self, ctx: &mut Context) -> Decimal {
        if self.is_nan() || rhs.is_nan() {
            return Decimal::nan_result(ctx, &[self, rhs]);
        }
        match cmp_values(self, rhs) {
            Ok(Some(ord)) => ord_to_dec(ord),
            Ok(None) => Decimal::NAN,
            Err(e) => Decimal::from_error(e, ctx),
        }
    }

    /// Like [Decimal::compare], but any NaN operand, quiet included,
    /// raises Invalid_operation.
    pub fn compare_signal(&self, rhs: &Self, ctx: &mut Context) -> Decimal {
        if self.is_nan() || rhs.is_nan() {
            ctx.raise(Status::INVALID_OPERATION);
            return Decimal::nan_result(ctx, &[self, rhs]);
        }
        self.compare(rhs, ctx)
    }

    /// Compares using the total ordering, under which every value is
    /// comparable: NaNs sort beyond the infinities and numerically equal
    /// representations are ordered by exponent.
    pub fn compare_total(&self, rhs: &Self) -> Decimal {
        match total_cmp(self, rhs) {
            Ok(ord) => ord_to_dec(ord),
            Err(_) => Decimal::NAN,
        }
    }

    /// The total ordering applied to the magnitudes of the operands.
    pub fn compare_total_mag(&self, rhs: &Self) -> Decimal {
        match total_cmp_abs(self, rhs) {
            Ok(ord) => ord_to_dec(ord),
            Err(_) => Decimal::NAN,
        }
    }

    /// Returns the larger operand, rounded to the context. A quiet NaN
    /// loses against any number; equal values are resolved by the total
    /// ordering.
    pub fn max(&self, rhs: &Self, ctx: &mut Context) -> Decimal {
        min_max(self, rhs, ctx, false, false)
    }

    /// Returns the smaller operand, rounded to the context.
    pub fn min(&self, rhs: &Self, ctx: &mut Context) -> Decimal {
        min_max(self, rhs, ctx, true, false)
    }

    /// Returns the operand with the larger magnitude.
    pub fn max_mag(&self, rhs: &Self, ctx: &mut Context) -> Decimal {
        min_max(self, rhs, ctx, false, true)
    }

    /// Returns the operand with the smaller magnitude.
    pub fn min_mag(&self, rhs: &Self, ctx: &mut Context) -> Decimal {
        min_max(self, rhs, ctx, true, true)
    }
}

fn finalize_operand(n: &DecNumber, ctx: &mut Context) -> Decimal {
    match n.try_clone() {
        Ok(n) => Decimal::finalized(n, ctx),
        Err(e) => Decimal::from_error(e, ctx),
    }
}

fn chosen(d: &Decimal, ctx: &mut Context) -> Decimal {
    match &d.inner {
        Flavor::Finite(n) => finalize_operand(n, ctx),
        Flavor::Inf(s) => Decimal::inf(*s),
        Flavor::Nan(_) => Decimal::nan_result(ctx, &[d]),
    }
}

fn min_max(a: &Decimal, b: &Decimal, ctx: &mut Context, pick_min: bool, by_mag: bool) -> Decimal {
    // a quiet NaN is ignored unless both operands are NaNs
    if a.is_nan() || b.is_nan() {
        if a.is_signaling_nan() || b.is_signaling_nan() || (a.is_nan() && b.is_nan()) {
            return Decimal::nan_result(ctx, &[a, b]);
        }
        return if a.is_nan() { chosen(b, ctx) } else { chosen(a, ctx) };
    }

    let ord = if by_mag {
        let r = match (&a.inner, &b.inner) {
            (Flavor::Finite(x), Flavor::Finite(y)) => x.cmp_abs(y),
            (Flavor::Inf(_), Flavor::Inf(_)) => Ok(Ordering::Equal),
            (Flavor::Inf(_), _) => Ok(Ordering::Greater),
            (_, Flavor::Inf(_)) => Ok(Ordering::Less),
            _ => Ok(Ordering::Equal),
        };
        match r {
            Ok(ord) => ord,
            Err(e) => return Decimal::from_error(e, ctx),
        }
    } else {
        match cmp_values(a, b) {
            Ok(Some(ord)) => ord,
            Ok(None) => Ordering::Equal,
            Err(e) => return Decimal::from_error(e, ctx),
        }
    };

    // ties fall back to the total ordering
    let ord = if ord == Ordering::Equal {
        match total_cmp(a, b) {
            Ok(ord) => ord,
            Err(e) => return Decimal::from_error(e, ctx),
        }
    } else {
        ord
    };

    let take_a = if pick_min { ord != Ordering::Greater } else { ord != Ordering::Less };
    if take_a {
        chosen(a, ctx)
    } else {
        chosen(b, ctx)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::common::buf::DigitBuf;
    use crate::defs::Exponent;

    fn fin(sign: Sign, digits: &[u8], exp: Exponent) -> Decimal {
        Decimal::from_num(DecNumber::from_digits_parts(sign, digits, exp).unwrap())
    }

    fn as_int(d: &Decimal) -> i8 {
        let v = d.num().unwrap().coefficient_to_u128().unwrap() as i8;
        v * d.sign().to_int()
    }

    #[test]
    fn test_compare() {
        let mut ctx = Context::new();

        let a = fin(Sign::Pos, &[1, 2], -1); // 1.2
        let b = fin(Sign::Pos, &[1, 2, 0], -2); // 1.20

        assert_eq!(as_int(&a.compare(&b, &mut ctx)), 0);
        assert_eq!(as_int(&a.compare(&Decimal::one(), &mut ctx)), 1);
        assert_eq!(as_int(&Decimal::one().compare(&a, &mut ctx)), -1);
        assert_eq!(as_int(&(-a.clone()).compare(&Decimal::one(), &mut ctx)), -1);

        // zeros compare equal regardless of sign
        assert_eq!(as_int(&Decimal::zero().compare(&-Decimal::zero(), &mut ctx)), 0);

        assert_eq!(as_int(&Decimal::INFINITY.compare(&a, &mut ctx)), 1);
        assert_eq!(as_int(&Decimal::NEG_INFINITY.compare(&a, &mut ctx)), -1);
        assert_eq!(as_int(&Decimal::INFINITY.compare(&Decimal::INFINITY, &mut ctx)), 0);

        assert!(ctx.status().is_empty());
    }

    #[test]
    fn test_compare_nan_quiet_vs_signal() {
        let mut ctx = Context::new();

        let r = Decimal::one().compare(&Decimal::NAN, &mut ctx);
        assert!(r.is_nan());
        assert!(ctx.status().is_empty());

        let r = Decimal::one().compare_signal(&Decimal::NAN, &mut ctx);
        assert!(r.is_nan());
        assert!(ctx.status().contains(Status::INVALID_OPERATION));
    }

    #[test]
    fn test_compare_total() {
        // numerically equal, distinguished by exponent
        let a = fin(Sign::Pos, &[1, 2], -1);
        let b = fin(Sign::Pos, &[1, 2, 0], -2);
        assert_eq!(as_int(&b.compare_total(&a)), -1);
        assert_eq!(as_int(&a.compare_total(&b)), 1);
        assert_eq!(as_int(&a.compare_total(&a)), 0);

        // the negative side is mirrored
        let na = -a.clone();
        let nb = -b.clone();
        assert_eq!(as_int(&nb.compare_total(&na)), 1);

        // -0 < +0
        assert_eq!(as_int(&(-Decimal::zero()).compare_total(&Decimal::zero())), -1);

        // NaNs are beyond the infinities; sNaN below quiet NaN
        let snan = Decimal::nan(Sign::Pos, true, None);
        assert_eq!(as_int(&Decimal::INFINITY.compare_total(&snan)), -1);
        assert_eq!(as_int(&snan.compare_total(&Decimal::NAN)), -1);
        let neg_nan = Decimal::nan(Sign::Neg, false, None);
        assert_eq!(as_int(&neg_nan.compare_total(&Decimal::NEG_INFINITY)), -1);

        // payloads order NaNs
        let n1 = Decimal::nan(Sign::Pos, false, Some(DigitBuf::single(1).unwrap()));
        let n2 = Decimal::nan(Sign::Pos, false, Some(DigitBuf::single(2).unwrap()));
        assert_eq!(as_int(&n1.compare_total(&n2)), -1);
    }

    #[test]
    fn test_compare_total_mag() {
        let a = fin(Sign::Neg, &[5], 0);
        let b = fin(Sign::Pos, &[3], 0);
        assert_eq!(as_int(&a.compare_total_mag(&b)), 1);
        assert_eq!(as_int(&b.compare_total_mag(&a)), -1);
    }

    #[test]
    fn test_min_max() {
        let mut ctx = Context::new();

        let a = fin(Sign::Pos, &[3], 0);
        let b = fin(Sign::Neg, &[7], 0);

        assert_eq!(as_int(&a.max(&b, &mut ctx)), 3);
        assert_eq!(as_int(&a.min(&b, &mut ctx)), -7);
        assert_eq!(as_int(&a.max_mag(&b, &mut ctx)), -7);
        assert_eq!(as_int(&a.min_mag(&b, &mut ctx)), 3);

        // a quiet NaN loses against a number without raising a flag
        assert_eq!(as_int(&a.max(&Decimal::NAN, &mut ctx)), 3);
        assert_eq!(as_int(&Decimal::NAN.min(&a, &mut ctx)), 3);
        assert!(ctx.status().is_empty());

        // both NaN: NaN result
        assert!(Decimal::NAN.max(&Decimal::NAN, &mut ctx).is_nan());

        // a signaling NaN still signals
        let snan = Decimal::nan(Sign::Pos, true, None);
        assert!(a.max(&snan, &mut ctx).is_nan());
        assert!(ctx.status().contains(Status::INVALID_OPERATION));
    }

    #[test]
    fn test_min_max_ties() {
        let mut ctx = Context::new();

        // max(+0, -0) = +0, min = -0
        let r = Decimal::zero().max(&-Decimal::zero(), &mut ctx);
        assert!(r.is_zero() && !r.is_negative());
        let r = Decimal::zero().min(&-Decimal::zero(), &mut ctx);
        assert!(r.is_zero() && r.is_negative());

        // equal values: max takes the larger exponent representation
        let a = fin(Sign::Pos, &[1, 2], -1);
        let b = fin(Sign::Pos, &[1, 2, 0], -2);
        assert_eq!(a.max(&b, &mut ctx).exponent(), Some(-1));
        assert_eq!(a.min(&b, &mut ctx).exponent(), Some(-2));
    }
}
