//! Conversions between Decimal and primitive integers, and the compact
//! 128-bit triple form for binary interchange.

use crate::ctx::Context;
use crate::dec::Decimal;
use crate::dec::Flavor;
use crate::defs::DoubleLimb;
use crate::defs::Exponent;
use crate::defs::Limb;
use crate::defs::Sign;
use crate::defs::Status;
use crate::defs::MAX_EMAX;
use crate::defs::MIN_ETINY;
use crate::defs::RADIX;
use crate::num::DecNumber;

fn from_unsigned(v: u128, sign: Sign) -> Decimal {
    match DecNumber::from_u128(v) {
        Ok(mut n) => {
            n.sign = sign;
            Decimal::from_num(n)
        }
        Err(_) => Decimal::NAN,
    }
}

impl From<u32> for Decimal {
    fn from(v: u32) -> Self {
        from_unsigned(v as u128, Sign::Pos)
    }
}

impl From<u64> for Decimal {
    fn from(v: u64) -> Self {
        from_unsigned(v as u128, Sign::Pos)
    }
}

impl From<u128> for Decimal {
    fn from(v: u128) -> Self {
        from_unsigned(v, Sign::Pos)
    }
}

impl From<i32> for Decimal {
    fn from(v: i32) -> Self {
        Decimal::from(v as i64)
    }
}

impl From<i64> for Decimal {
    fn from(v: i64) -> Self {
        let sign = if v < 0 { Sign::Neg } else { Sign::Pos };
        from_unsigned(v.unsigned_abs() as u128, sign)
    }
}

impl From<i128> for Decimal {
    fn from(v: i128) -> Self {
        let sign = if v < 0 { Sign::Neg } else { Sign::Pos };
        from_unsigned(v.unsigned_abs(), sign)
    }
}

// The magnitude as an integer, if the value is integral and fits 128 bits.
fn integral_abs(n: &DecNumber) -> Option<u128> {
    if n.is_zero() {
        return Some(0);
    }
    if !n.is_integer() {
        return None;
    }

    let mut c = n.try_clone().ok()?;
    c.strip_trailing_zeroes(0).ok()?;

    let v = c.coefficient_to_u128()?;
    if c.exp > 0 {
        if c.exp > 38 {
            return None;
        }
        v.checked_mul(10u128.pow(c.exp as u32))
    } else {
        Some(v)
    }
}

impl Decimal {
    fn to_unsigned(&self, max: u128, ctx: &mut Context) -> Option<u128> {
        if let Flavor::Finite(n) = &self.inner {
            if let Some(v) = integral_abs(n) {
                if v <= max && (n.sign.is_positive() || v == 0) {
                    return Some(v);
                }
            }
        }
        ctx.raise(Status::INVALID_OPERATION);
        None
    }

    fn to_signed(&self, max: u128, ctx: &mut Context) -> Option<(Sign, u128)> {
        if let Flavor::Finite(n) = &self.inner {
            if let Some(v) = integral_abs(n) {
                let bound = if n.sign.is_negative() { max + 1 } else { max };
                if v <= bound {
                    return Some((n.sign, v));
                }
            }
        }
        ctx.raise(Status::INVALID_OPERATION);
        None
    }

    /// The value as a u64 if it is an exact integer in range; otherwise
    /// raises Invalid_operation and returns None. A zero of either sign
    /// converts to 0.
    pub fn to_u64(&self, ctx: &mut Context) -> Option<u64> {
        self.to_unsigned(u64::MAX as u128, ctx).map(|v| v as u64)
    }

    /// The value as a u32 if it is an exact integer in range; otherwise
    /// raises Invalid_operation and returns None.
    pub fn to_u32(&self, ctx: &mut Context) -> Option<u32> {
        self.to_unsigned(u32::MAX as u128, ctx).map(|v| v as u32)
    }

    /// The value as an i64 if it is an exact integer in range; otherwise
    /// raises Invalid_operation and returns None.
    pub fn to_i64(&self, ctx: &mut Context) -> Option<i64> {
        self.to_signed(i64::MAX as u128, ctx).map(|(s, v)| {
            if s.is_negative() {
                (v as i64).wrapping_neg()
            } else {
                v as i64
            }
        })
    }

    /// The value as an i32 if it is an exact integer in range; otherwise
    /// raises Invalid_operation and returns None.
    pub fn to_i32(&self, ctx: &mut Context) -> Option<i32> {
        self.to_signed(i32::MAX as u128, ctx).map(|(s, v)| {
            if s.is_negative() {
                (v as i32).wrapping_neg()
            } else {
                v as i32
            }
        })
    }
}

/// Kind of value a [Triple] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripleTag {
    /// A quiet NaN; `hi`/`lo` hold the payload.
    QNan,

    /// A signaling NaN; `hi`/`lo` hold the payload.
    SNan,

    /// An infinity.
    Inf,

    /// A finite number.
    Normal,

    /// A value the triple form cannot represent.
    Error,
}

/// Compact interchange form of a decimal:
/// value = (-1)^sign * (hi * 2^64 + lo) * 10^exp.
///
/// A coefficient wider than 128 bits has no triple representation;
/// [Decimal::as_triple] reports it with the `Error` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triple {
    /// Kind of value.
    pub tag: TripleTag,

    /// Sign, meaningful for every tag.
    pub sign: Sign,

    /// High 64 bits of the coefficient or NaN payload.
    pub hi: u64,

    /// Low 64 bits of the coefficient or NaN payload.
    pub lo: u64,

    /// Exponent; zero for special values.
    pub exp: i64,
}

fn limbs_to_u128(m: &[Limb]) -> Option<u128> {
    let mut v: u128 = 0;
    for &d in m.iter().rev() {
        v = v.checked_mul(RADIX as DoubleLimb as u128)?;
        v = v.checked_add(d as u128)?;
    }
    Some(v)
}

fn error_triple(sign: Sign) -> Triple {
    Triple { tag: TripleTag::Error, sign, hi: 0, lo: 0, exp: 0 }
}

impl Decimal {
    /// Packs the value into a [Triple].
    ///
    /// A finite coefficient or NaN payload wider than 128 bits yields the
    /// `Error` tag; everything else converts exactly.
    pub fn as_triple(&self) -> Triple {
        match &self.inner {
            Flavor::Finite(n) => match limbs_to_u128(&n.data) {
                Some(v) => Triple {
                    tag: TripleTag::Normal,
                    sign: n.sign,
                    hi: (v >> 64) as u64,
                    lo: v as u64,
                    exp: n.exp,
                },
                None => error_triple(n.sign),
            },
            Flavor::Inf(s) => Triple { tag: TripleTag::Inf, sign: *s, hi: 0, lo: 0, exp: 0 },
            Flavor::Nan(n) => {
                let v = match &n.payload {
                    None => Some(0),
                    Some(p) => limbs_to_u128(p),
                };
                let tag = if n.signaling { TripleTag::SNan } else { TripleTag::QNan };
                match v {
                    Some(v) => {
                        Triple { tag, sign: n.sign, hi: (v >> 64) as u64, lo: v as u64, exp: 0 }
                    }
                    None => error_triple(n.sign),
                }
            }
        }
    }

    /// Unpacks a [Triple] into a value.
    ///
    /// An `Error` tag, a special value with spurious coefficient or
    /// exponent bits, or an exponent outside the widest context range is
    /// not a valid triple: the result is a quiet NaN with Conversion_syntax
    /// raised.
    pub fn from_triple(t: &Triple, ctx: &mut Context) -> Decimal {
        let invalid = |ctx: &mut Context| {
            ctx.raise(Status::CONVERSION_SYNTAX);
            Decimal::NAN
        };

        match t.tag {
            TripleTag::Error => invalid(ctx),
            TripleTag::Inf => {
                if t.hi != 0 || t.lo != 0 || t.exp != 0 {
                    return invalid(ctx);
                }
                Decimal::inf(t.sign)
            }
            TripleTag::QNan | TripleTag::SNan => {
                if t.exp != 0 {
                    return invalid(ctx);
                }
                let v = ((t.hi as u128) << 64) | t.lo as u128;
                let payload = if v == 0 {
                    None
                } else {
                    match DecNumber::from_u128(v) {
                        Ok(n) => Some(n.data),
                        Err(e) => return Decimal::from_error(e, ctx),
                    }
                };
                Decimal::nan(t.sign, t.tag == TripleTag::SNan, payload)
            }
            TripleTag::Normal => {
                if !(MIN_ETINY..=MAX_EMAX).contains(&(t.exp as Exponent)) {
                    return invalid(ctx);
                }
                let v = ((t.hi as u128) << 64) | t.lo as u128;
                match DecNumber::from_u128(v) {
                    Ok(mut n) => {
                        n.sign = t.sign;
                        n.exp = t.exp;
                        Decimal::from_num(n)
                    }
                    Err(e) => Decimal::from_error(e, ctx),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use core::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_from_integers() {
        assert_eq!(Decimal::from(0u32).to_sci_string(), "0");
        assert_eq!(Decimal::from(12345u64).to_sci_string(), "12345");
        assert_eq!(Decimal::from(-42i32).to_sci_string(), "-42");
        assert_eq!(Decimal::from(i64::MIN).to_sci_string(), "-9223372036854775808");
        assert_eq!(Decimal::from(u128::MAX).digits(), Some(39));
        assert_eq!(
            Decimal::from(i128::MIN).to_sci_string(),
            "-170141183460469231731687303715884105728"
        );
    }

    #[test]
    fn test_to_integers() {
        let mut ctx = Context::new();

        assert_eq!(d("123").to_u64(&mut ctx), Some(123));
        assert_eq!(d("1.23E+2").to_u64(&mut ctx), Some(123));
        assert_eq!(d("123.000").to_i32(&mut ctx), Some(123));
        assert_eq!(d("-123").to_i64(&mut ctx), Some(-123));
        assert_eq!(d("-0").to_u32(&mut ctx), Some(0));
        assert_eq!(d("9223372036854775807").to_i64(&mut ctx), Some(i64::MAX));
        assert_eq!(d("-9223372036854775808").to_i64(&mut ctx), Some(i64::MIN));
        assert_eq!(d("18446744073709551615").to_u64(&mut ctx), Some(u64::MAX));
        assert!(ctx.status().is_empty());
    }

    #[test]
    fn test_to_integers_invalid() {
        let cases = [
            "1.5",
            "-1",
            "18446744073709551616",
            "NaN",
            "Infinity",
            "1E+100",
        ];
        for s in cases {
            let mut ctx = Context::new();
            assert_eq!(d(s).to_u64(&mut ctx), None, "{}", s);
            assert_eq!(ctx.status(), Status::INVALID_OPERATION, "{}", s);
        }

        let mut ctx = Context::new();
        assert_eq!(d("-9223372036854775809").to_i64(&mut ctx), None);
        assert_eq!(d("2147483648").to_i32(&mut ctx), None);
        assert!(ctx.status().contains(Status::INVALID_OPERATION));
    }

    #[test]
    fn test_triple_round_trip() {
        let mut ctx = Context::new();
        let values = ["123.45", "-0E+5", "0", "1E-6143", "Infinity", "-Infinity", "NaN", "-NaN123", "sNaN7"];

        for s in values {
            let v = d(s);
            let t = v.as_triple();
            assert_ne!(t.tag, TripleTag::Error, "{}", s);
            let back = Decimal::from_triple(&t, &mut ctx);
            assert_eq!(back.to_sci_string(), v.to_sci_string(), "{}", s);
        }
        assert!(ctx.status().is_empty());
    }

    #[test]
    fn test_triple_fields() {
        let t = d("-123E+7").as_triple();
        assert_eq!(t.tag, TripleTag::Normal);
        assert_eq!(t.sign, Sign::Neg);
        assert_eq!((t.hi, t.lo), (0, 123));
        assert_eq!(t.exp, 7);

        let t = d("sNaN42").as_triple();
        assert_eq!(t.tag, TripleTag::SNan);
        assert_eq!(t.lo, 42);
        assert_eq!(t.exp, 0);
    }

    #[test]
    fn test_triple_lossy_boundary() {
        // 40 nines exceed 128 bits
        let wide = d("9999999999999999999999999999999999999999");
        let t = wide.as_triple();
        assert_eq!(t.tag, TripleTag::Error);

        // u128::MAX still fits
        let t = Decimal::from(u128::MAX).as_triple();
        assert_eq!(t.tag, TripleTag::Normal);
        assert_eq!((t.hi, t.lo), (u64::MAX, u64::MAX));
    }

    #[test]
    fn test_from_triple_invalid() {
        let cases = [
            Triple { tag: TripleTag::Error, sign: Sign::Pos, hi: 0, lo: 0, exp: 0 },
            Triple { tag: TripleTag::Inf, sign: Sign::Pos, hi: 0, lo: 1, exp: 0 },
            Triple { tag: TripleTag::Inf, sign: Sign::Pos, hi: 0, lo: 0, exp: 3 },
            Triple { tag: TripleTag::QNan, sign: Sign::Pos, hi: 0, lo: 1, exp: 1 },
            Triple { tag: TripleTag::Normal, sign: Sign::Pos, hi: 0, lo: 1, exp: i64::MAX },
        ];
        for t in cases {
            let mut ctx = Context::new();
            let r = Decimal::from_triple(&t, &mut ctx);
            assert!(r.is_nan());
            assert_eq!(ctx.status(), Status::CONVERSION_SYNTAX, "{:?}", t);
        }
    }
}
