//! Decimal is an arbitrary-precision decimal number that also holds the
//! special values of the arithmetic: infinities and quiet or signaling NaNs.
//! Operations take a [Context] and report conditions in its status.

use crate::coefficient;
use crate::common::buf::DigitBuf;
use crate::common::util::pow10;
use crate::ctx::Context;
use crate::defs::Error;
use crate::defs::Exponent;
use crate::defs::Sign;
use crate::defs::Status;
use crate::defs::LIMB_DIGITS;
use crate::num::DecNumber;
use crate::round;
use crate::round::Finalized;
use core::fmt::Display;
use core::ops::Neg;

/// A NaN: sign, quiet or signaling, and an optional diagnostic payload.
#[derive(Debug)]
pub(crate) struct NanData {
    pub sign: Sign,
    pub signaling: bool,
    pub payload: Option<DigitBuf>,
}

/// Internal representation of a decimal value.
#[derive(Debug)]
pub(crate) enum Flavor {
    Finite(DecNumber),
    Inf(Sign),
    Nan(NanData),
}

/// An arbitrary-precision decimal number, infinity, or NaN.
///
/// Arithmetic never panics: a failed operation yields a quiet NaN and
/// raises a flag in the context status. Use [Context::checked] to turn
/// selected conditions into errors.
#[derive(Debug)]
pub struct Decimal {
    pub(crate) inner: Flavor,
}

/// Value class of a decimal, as defined by the arithmetic specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum DecClass {
    SignalingNan,
    QuietNan,
    NegInfinity,
    NegNormal,
    NegSubnormal,
    NegZero,
    PosZero,
    PosSubnormal,
    PosNormal,
    PosInfinity,
}

impl Display for DecClass {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let repr = match self {
            DecClass::SignalingNan => "sNaN",
            DecClass::QuietNan => "NaN",
            DecClass::NegInfinity => "-Infinity",
            DecClass::NegNormal => "-Normal",
            DecClass::NegSubnormal => "-Subnormal",
            DecClass::NegZero => "-Zero",
            DecClass::PosZero => "+Zero",
            DecClass::PosSubnormal => "+Subnormal",
            DecClass::PosNormal => "+Normal",
            DecClass::PosInfinity => "+Infinity",
        };
        f.write_str(repr)
    }
}

impl Decimal {
    /// A quiet NaN without a payload.
    pub const NAN: Decimal = Decimal {
        inner: Flavor::Nan(NanData { sign: Sign::Pos, signaling: false, payload: None }),
    };

    /// Positive infinity.
    pub const INFINITY: Decimal = Decimal { inner: Flavor::Inf(Sign::Pos) };

    /// Negative infinity.
    pub const NEG_INFINITY: Decimal = Decimal { inner: Flavor::Inf(Sign::Neg) };

    /// Returns a positive zero with exponent 0.
    pub fn zero() -> Self {
        match DecNumber::new_zero() {
            Ok(n) => Decimal { inner: Flavor::Finite(n) },
            Err(_) => Decimal::NAN,
        }
    }

    /// Returns one.
    pub fn one() -> Self {
        match DecNumber::from_limb(1) {
            Ok(n) => Decimal { inner: Flavor::Finite(n) },
            Err(_) => Decimal::NAN,
        }
    }

    pub(crate) fn from_num(n: DecNumber) -> Self {
        Decimal { inner: Flavor::Finite(n) }
    }

    pub(crate) fn inf(sign: Sign) -> Self {
        Decimal { inner: Flavor::Inf(sign) }
    }

    pub(crate) fn nan(sign: Sign, signaling: bool, payload: Option<DigitBuf>) -> Self {
        Decimal { inner: Flavor::Nan(NanData { sign, signaling, payload }) }
    }

    pub(crate) fn num(&self) -> Option<&DecNumber> {
        match &self.inner {
            Flavor::Finite(n) => Some(n),
            _ => None,
        }
    }

    /// Returns true for a quiet or signaling NaN.
    pub fn is_nan(&self) -> bool {
        matches!(self.inner, Flavor::Nan(_))
    }

    /// Returns true for a signaling NaN.
    pub fn is_signaling_nan(&self) -> bool {
        matches!(self.inner, Flavor::Nan(NanData { signaling: true, .. }))
    }

    /// Returns true for an infinity of either sign.
    pub fn is_infinite(&self) -> bool {
        matches!(self.inner, Flavor::Inf(_))
    }

    /// Returns true for a finite number, including zero.
    pub fn is_finite(&self) -> bool {
        matches!(self.inner, Flavor::Finite(_))
    }

    /// Returns true for an infinity or a NaN.
    pub fn is_special(&self) -> bool {
        !self.is_finite()
    }

    /// Returns true for a zero of either sign.
    pub fn is_zero(&self) -> bool {
        match &self.inner {
            Flavor::Finite(n) => n.is_zero(),
            _ => false,
        }
    }

    /// Returns true if the sign is negative; a negative zero and a negative
    /// NaN count as negative.
    pub fn is_negative(&self) -> bool {
        self.sign() == Sign::Neg
    }

    /// Returns true if the sign is negative. Alias of
    /// [is_negative](Self::is_negative).
    pub fn is_signed(&self) -> bool {
        self.is_negative()
    }

    /// Returns true unconditionally: every representable value is already
    /// in canonical form.
    pub fn is_canonical(&self) -> bool {
        true
    }

    /// Returns true for a finite number with no fractional digits.
    pub fn is_integer(&self) -> bool {
        match &self.inner {
            Flavor::Finite(n) => n.is_integer(),
            _ => false,
        }
    }

    /// Returns true for a finite nonzero number whose adjusted exponent is
    /// not below the `emin` of `ctx`.
    pub fn is_normal(&self, ctx: &Context) -> bool {
        match &self.inner {
            Flavor::Finite(n) => !n.is_zero() && n.adjusted() >= ctx.emin(),
            _ => false,
        }
    }

    /// Returns true for a finite nonzero number whose adjusted exponent is
    /// below the `emin` of `ctx`.
    pub fn is_subnormal(&self, ctx: &Context) -> bool {
        match &self.inner {
            Flavor::Finite(n) => !n.is_zero() && n.adjusted() < ctx.emin(),
            _ => false,
        }
    }

    /// The sign of the value. NaNs carry a sign as well.
    pub fn sign(&self) -> Sign {
        match &self.inner {
            Flavor::Finite(n) => n.sign,
            Flavor::Inf(s) => *s,
            Flavor::Nan(n) => n.sign,
        }
    }

    /// The exponent of a finite number, or None for a special value.
    pub fn exponent(&self) -> Option<Exponent> {
        self.num().map(|n| n.exp)
    }

    /// The number of significant digits of a finite number, or None for a
    /// special value. A zero has one digit.
    pub fn digits(&self) -> Option<usize> {
        self.num().map(|n| n.digits)
    }

    /// The class of the value under `ctx`.
    pub fn class(&self, ctx: &Context) -> DecClass {
        match &self.inner {
            Flavor::Nan(n) => {
                if n.signaling {
                    DecClass::SignalingNan
                } else {
                    DecClass::QuietNan
                }
            }
            Flavor::Inf(Sign::Pos) => DecClass::PosInfinity,
            Flavor::Inf(Sign::Neg) => DecClass::NegInfinity,
            Flavor::Finite(n) => {
                if n.is_zero() {
                    if n.sign.is_positive() {
                        DecClass::PosZero
                    } else {
                        DecClass::NegZero
                    }
                } else if n.adjusted() < ctx.emin() {
                    if n.sign.is_positive() {
                        DecClass::PosSubnormal
                    } else {
                        DecClass::NegSubnormal
                    }
                } else if n.sign.is_positive() {
                    DecClass::PosNormal
                } else {
                    DecClass::NegNormal
                }
            }
        }
    }

    /// Applies the context limits to a computed number and accumulates the
    /// resulting flags: the entry point every arithmetic result goes through.
    pub(crate) fn finalized(mut num: DecNumber, ctx: &mut Context) -> Decimal {
        match round::finalize(&mut num, ctx) {
            Ok((fin, st)) => {
                ctx.raise(st);
                match fin {
                    Finalized::Finite => Decimal::from_num(num),
                    Finalized::Overflow(sign) => Decimal::inf(sign),
                }
            }
            Err(e) => Decimal::from_error(e, ctx),
        }
    }

    /// Converts an internal error into a quiet NaN and the matching flag.
    pub(crate) fn from_error(e: Error, ctx: &mut Context) -> Decimal {
        match e {
            Error::MemoryAllocation => ctx.raise(Status::MALLOC_ERROR),
            Error::InvalidArgument => ctx.raise(Status::INVALID_OPERATION),
        }
        Decimal::NAN
    }

    /// NaN propagation for an operation over the listed operands: a
    /// signaling NaN takes precedence and raises Invalid_operation; the
    /// first NaN in operand order provides the result payload.
    pub(crate) fn nan_result(ctx: &mut Context, operands: &[&Decimal]) -> Decimal {
        for d in operands {
            if let Flavor::Nan(n) = &d.inner {
                if n.signaling {
                    ctx.raise(Status::INVALID_OPERATION);
                    return Decimal::copy_nan(n, ctx);
                }
            }
        }

        for d in operands {
            if let Flavor::Nan(n) = &d.inner {
                return Decimal::copy_nan(n, ctx);
            }
        }

        Decimal::NAN
    }

    // A quiet copy of a NaN with the payload reduced to fit the context.
    fn copy_nan(n: &NanData, ctx: &mut Context) -> Decimal {
        let payload = match &n.payload {
            None => None,
            Some(p) => match Decimal::fit_payload(p, ctx) {
                Ok(p) => p,
                Err(e) => return Decimal::from_error(e, ctx),
            },
        };
        Decimal::nan(n.sign, false, payload)
    }

    // The payload keeps at most prec - 1 digits if the context clamps,
    // prec otherwise; excess high-order digits are dropped.
    fn fit_payload(p: &DigitBuf, ctx: &Context) -> Result<Option<DigitBuf>, Error> {
        let limit = if ctx.clamp() { ctx.prec().saturating_sub(1).max(1) } else { ctx.prec() };

        if coefficient::is_zero(p) {
            return Ok(None);
        }
        if coefficient::digits_in(p) <= limit {
            return Ok(Some(p.try_clone()?));
        }

        let nl = (limit + LIMB_DIGITS - 1) / LIMB_DIGITS;
        let mut m = DigitBuf::from_limbs(&p[..nl.min(p.len())])?;
        let r = limit % LIMB_DIGITS;
        if r != 0 && nl <= m.len() {
            m[nl - 1] %= pow10(r);
        }
        m.trunc_leading_zeroes();

        if coefficient::is_zero(&m) {
            Ok(None)
        } else {
            Ok(Some(m))
        }
    }
}

impl Clone for Decimal {
    /// Clones the value. A clone that fails to allocate becomes a quiet NaN.
    fn clone(&self) -> Self {
        match &self.inner {
            Flavor::Finite(n) => match n.try_clone() {
                Ok(n) => Decimal::from_num(n),
                Err(_) => Decimal::NAN,
            },
            Flavor::Inf(s) => Decimal::inf(*s),
            Flavor::Nan(n) => {
                let payload = match &n.payload {
                    None => None,
                    Some(p) => match p.try_clone() {
                        Ok(p) => Some(p),
                        Err(_) => return Decimal::NAN,
                    },
                };
                Decimal::nan(n.sign, n.signaling, payload)
            }
        }
    }
}

impl Neg for Decimal {
    type Output = Decimal;

    /// Flips the sign without rounding, NaNs included.
    fn neg(mut self) -> Self::Output {
        match &mut self.inner {
            Flavor::Finite(n) => n.sign = n.sign.invert(),
            Flavor::Inf(s) => *s = s.invert(),
            Flavor::Nan(n) => n.sign = n.sign.invert(),
        }
        self
    }
}

impl Neg for &Decimal {
    type Output = Decimal;

    fn neg(self) -> Self::Output {
        self.clone().neg()
    }
}

impl PartialEq for Decimal {
    /// Numeric equality: representations are not distinguished, a zero
    /// equals a zero of either sign, and a NaN is not equal to anything.
    fn eq(&self, other: &Self) -> bool {
        matches!(
            crate::ops::cmp::cmp_values(self, other),
            Ok(Some(core::cmp::Ordering::Equal))
        )
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        crate::ops::cmp::cmp_values(self, other).ok().flatten()
    }
}
