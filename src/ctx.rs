//! Context is a descriptor of the arithmetic: precision, exponent range,
//! rounding mode, and the accumulated status flags.

use crate::dec::Decimal;
use crate::defs::Error;
use crate::defs::Exponent;
use crate::defs::RoundingMode;
use crate::defs::Status;
use crate::defs::DEFAULT_PREC;
use crate::defs::DEFAULT_ROUND;
use crate::defs::MAX_EMAX;
use crate::defs::MAX_PREC;
use crate::defs::MIN_EMIN;
use core::fmt::Display;

/// Largest width, in bits, accepted by [Context::ieee].
pub const IEEE_CONTEXT_MAX_BITS: u32 = 512;

/// An arithmetic context: every operation on [Decimal](crate::Decimal)
/// rounds its result to `prec` significant digits, keeps the adjusted
/// exponent within `[emin, emax]`, and accumulates status flags here.
///
/// Status flags are additive. They are never cleared by an operation;
/// call [Context::clear_status] between independent computations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Context {
    prec: usize,
    emax: Exponent,
    emin: Exponent,
    round: RoundingMode,
    clamp: bool,
    allow_crr: bool,
    traps: Status,
    status: Status,
}

impl Context {
    /// Returns a context with 38 digits of precision, the widest exponent
    /// range, and round-half-even.
    pub fn new() -> Self {
        Context {
            prec: DEFAULT_PREC,
            emax: MAX_EMAX,
            emin: MIN_EMIN,
            round: DEFAULT_ROUND,
            clamp: false,
            allow_crr: false,
            traps: Status::EMPTY,
            status: Status::EMPTY,
        }
    }

    /// Returns the basic default context of the decimal arithmetic
    /// specification: 9 digits, round-half-up, and traps enabled for the
    /// invalid-operation group, division by zero, and overflow.
    pub fn basic() -> Self {
        Context {
            prec: 9,
            emax: MAX_EMAX,
            emin: MIN_EMIN,
            round: RoundingMode::HalfUp,
            clamp: false,
            allow_crr: false,
            traps: Status::NAN_PRODUCING | Status::DIVISION_BY_ZERO | Status::OVERFLOW,
            status: Status::EMPTY,
        }
    }

    /// Returns a context for an IEEE interchange format of the given width.
    /// `bits` must be a multiple of 32, at most [IEEE_CONTEXT_MAX_BITS].
    ///
    /// ## Errors
    ///
    /// InvalidArgument: `bits` is not a valid interchange width.
    pub fn ieee(bits: u32) -> Result<Self, Error> {
        if bits == 0 || bits > IEEE_CONTEXT_MAX_BITS || bits % 32 != 0 {
            return Err(Error::InvalidArgument);
        }

        let emax = 3 * (1 as Exponent) << (bits / 16 + 3);
        Ok(Context {
            prec: 9 * bits as usize / 32 - 2,
            emax,
            emin: 1 - emax,
            round: RoundingMode::HalfEven,
            clamp: true,
            allow_crr: true,
            traps: Status::EMPTY,
            status: Status::EMPTY,
        })
    }

    /// Returns the context of the decimal32 interchange format:
    /// 7 digits, emax 96.
    pub fn decimal32() -> Self {
        Context::ieee(32).expect("decimal32 context initialization.")
    }

    /// Returns the context of the decimal64 interchange format:
    /// 16 digits, emax 384.
    pub fn decimal64() -> Self {
        Context::ieee(64).expect("decimal64 context initialization.")
    }

    /// Returns the context of the decimal128 interchange format:
    /// 34 digits, emax 6144.
    pub fn decimal128() -> Self {
        Context::ieee(128).expect("decimal128 context initialization.")
    }

    /// Working precision in significant digits.
    pub fn prec(&self) -> usize {
        self.prec
    }

    /// Maximum adjusted exponent of a result.
    pub fn emax(&self) -> Exponent {
        self.emax
    }

    /// Minimum adjusted exponent of a normal result.
    pub fn emin(&self) -> Exponent {
        self.emin
    }

    /// Rounding mode.
    pub fn round(&self) -> RoundingMode {
        self.round
    }

    /// Returns true if exponents larger than `etop` are folded down.
    pub fn clamp(&self) -> bool {
        self.clamp
    }

    /// Returns true if exp, ln and log10 round correctly instead of
    /// guaranteeing an error of at most one unit in the last place.
    pub fn allow_crr(&self) -> bool {
        self.allow_crr
    }

    /// The set of conditions [Context::checked] converts into errors.
    pub fn traps(&self) -> Status {
        self.traps
    }

    /// Accumulated status flags.
    pub fn status(&self) -> Status {
        self.status
    }

    /// The minimum exponent a subnormal result can take: emin - (prec - 1).
    pub fn etiny(&self) -> Exponent {
        self.emin - (self.prec as Exponent - 1)
    }

    /// The maximum exponent of a clamped result: emax - (prec - 1).
    pub fn etop(&self) -> Exponent {
        self.emax - (self.prec as Exponent - 1)
    }

    /// Sets the working precision.
    ///
    /// ## Errors
    ///
    /// InvalidArgument: `prec` is zero or exceeds the supported maximum.
    pub fn set_prec(&mut self, prec: usize) -> Result<(), Error> {
        if prec == 0 || prec > MAX_PREC {
            return Err(Error::InvalidArgument);
        }
        self.prec = prec;
        Ok(())
    }

    /// Sets the maximum adjusted exponent.
    ///
    /// ## Errors
    ///
    /// InvalidArgument: `emax` is negative or exceeds the supported maximum.
    pub fn set_emax(&mut self, emax: Exponent) -> Result<(), Error> {
        if !(0..=MAX_EMAX).contains(&emax) {
            return Err(Error::InvalidArgument);
        }
        self.emax = emax;
        Ok(())
    }

    /// Sets the minimum adjusted exponent of a normal result.
    ///
    /// ## Errors
    ///
    /// InvalidArgument: `emin` is positive or below the supported minimum.
    pub fn set_emin(&mut self, emin: Exponent) -> Result<(), Error> {
        if !(MIN_EMIN..=0).contains(&emin) {
            return Err(Error::InvalidArgument);
        }
        self.emin = emin;
        Ok(())
    }

    /// Sets the rounding mode.
    pub fn set_round(&mut self, rm: RoundingMode) {
        self.round = rm;
    }

    /// Enables or disables exponent clamping.
    pub fn set_clamp(&mut self, clamp: bool) {
        self.clamp = clamp;
    }

    /// Enables or disables correct rounding of exp, ln and log10.
    pub fn set_allow_crr(&mut self, allow: bool) {
        self.allow_crr = allow;
    }

    /// Selects the conditions that [Context::checked] reports as errors.
    pub fn set_traps(&mut self, traps: Status) {
        self.traps = traps;
    }

    /// Clears the accumulated status flags.
    pub fn clear_status(&mut self) {
        self.status = Status::EMPTY;
    }

    /// Adds flags to the accumulated status.
    pub fn raise(&mut self, st: Status) {
        self.status |= st;
    }

    /// Runs a computation and reports trapped conditions as an error.
    ///
    /// The closure computes with this context as usual; afterwards the flags
    /// it newly raised are intersected with [Context::traps]. A non-empty
    /// intersection yields a [TrapError] carrying the trapped flags and the
    /// value the computation produced. The status accumulates either way.
    pub fn checked<F>(&mut self, f: F) -> Result<Decimal, TrapError>
    where
        F: FnOnce(&mut Context) -> Decimal,
    {
        let before = self.status;
        let result = f(self);
        let trapped = self.status.without(before) & self.traps;

        if trapped.is_empty() {
            Ok(result)
        } else {
            Err(TrapError { trapped, result })
        }
    }

    // A private context for intermediate computations: wider precision,
    // widest exponent range, clean status.
    pub(crate) fn workctx(&self, prec: usize) -> Context {
        Context {
            prec,
            emax: MAX_EMAX,
            emin: MIN_EMIN,
            round: self.round,
            clamp: false,
            allow_crr: self.allow_crr,
            traps: Status::EMPTY,
            status: Status::EMPTY,
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new()
    }
}

/// A trapped condition: the result of the computation together with the
/// flags that triggered the trap.
#[derive(Clone, Debug)]
pub struct TrapError {
    trapped: Status,
    result: Decimal,
}

impl TrapError {
    /// The flags that were raised and enabled in [Context::traps].
    pub fn status(&self) -> Status {
        self.trapped
    }

    /// The value the computation produced despite the trap.
    pub fn into_result(self) -> Decimal {
        self.result
    }
}

impl Display for TrapError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "trapped condition: {}", self.trapped)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TrapError {}
