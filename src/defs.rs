//! Definitions.

use core::fmt::Display;

#[cfg(feature = "std")]
use std::collections::TryReserveError;

#[cfg(not(feature = "std"))]
use alloc::collections::TryReserveError;

use smallvec::CollectionAllocErr;

/// A limb: one machine word of the coefficient, holding `LIMB_DIGITS` decimal digits.
#[cfg(not(target_arch = "x86"))]
pub type Limb = u64;

/// Doubled limb.
#[cfg(not(target_arch = "x86"))]
pub type DoubleLimb = u128;

/// Limb with sign.
#[cfg(not(target_arch = "x86"))]
pub type SignedLimb = i128;

/// A limb: one machine word of the coefficient, holding `LIMB_DIGITS` decimal digits.
#[cfg(target_arch = "x86")]
pub type Limb = u32;

/// Doubled limb.
#[cfg(target_arch = "x86")]
pub type DoubleLimb = u64;

/// Limb with sign.
#[cfg(target_arch = "x86")]
pub type SignedLimb = i64;

/// An exponent.
pub type Exponent = i64;

/// Base of a limb.
#[cfg(not(target_arch = "x86"))]
pub const RADIX: Limb = 10_000_000_000_000_000_000;

/// Number of decimal digits in a limb.
#[cfg(not(target_arch = "x86"))]
pub const LIMB_DIGITS: usize = 19;

/// Base of a limb.
#[cfg(target_arch = "x86")]
pub const RADIX: Limb = 1_000_000_000;

/// Number of decimal digits in a limb.
#[cfg(target_arch = "x86")]
pub const LIMB_DIGITS: usize = 9;

/// Maximum precision (significant digits) a context can request.
#[cfg(not(target_arch = "x86"))]
pub const MAX_PREC: usize = 999_999_999_999_999_999;

/// Maximum precision (significant digits) a context can request.
#[cfg(target_arch = "x86")]
pub const MAX_PREC: usize = 425_000_000;

/// Maximum value of the `emax` field of a context.
#[cfg(not(target_arch = "x86"))]
pub const MAX_EMAX: Exponent = 999_999_999_999_999_999;

/// Maximum value of the `emax` field of a context.
#[cfg(target_arch = "x86")]
pub const MAX_EMAX: Exponent = 425_000_000;

/// Minimum value of the `emin` field of a context.
pub const MIN_EMIN: Exponent = -MAX_EMAX;

/// Minimum adjusted exponent a subnormal result can take with the widest context.
pub const MIN_ETINY: Exponent = MIN_EMIN - (MAX_PREC as Exponent - 1);

/// Default precision of a context.
pub const DEFAULT_PREC: usize = 2 * LIMB_DIGITS;

/// Default rounding mode of a context.
pub const DEFAULT_ROUND: RoundingMode = RoundingMode::HalfEven;

/// Sign.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
pub enum Sign {
    /// Negative.
    Neg = -1,

    /// Positive.
    Pos = 1,
}

impl Sign {
    /// Changes the sign to the opposite.
    pub fn invert(&self) -> Self {
        match *self {
            Sign::Pos => Sign::Neg,
            Sign::Neg => Sign::Pos,
        }
    }

    /// Returns true if `self` is positive.
    pub fn is_positive(&self) -> bool {
        *self == Sign::Pos
    }

    /// Returns true if `self` is negative.
    pub fn is_negative(&self) -> bool {
        *self == Sign::Neg
    }

    /// Returns 1 for the positive sign and -1 for the negative sign.
    pub fn to_int(&self) -> i8 {
        *self as i8
    }
}

/// Possible errors.
#[derive(Debug, Clone, Copy)]
pub enum Error {
    /// Invalid argument.
    InvalidArgument,

    /// Memory allocation error.
    MemoryAllocation,
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let repr = match self {
            Error::InvalidArgument => "invalid argument",
            Error::MemoryAllocation => "memory allocation failure",
        };
        f.write_str(repr)
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        core::mem::discriminant(self) == core::mem::discriminant(other)
    }
}

impl From<TryReserveError> for Error {
    fn from(_: TryReserveError) -> Self {
        Error::MemoryAllocation
    }
}

impl From<CollectionAllocErr> for Error {
    fn from(_: CollectionAllocErr) -> Self {
        Error::MemoryAllocation
    }
}

/// Rounding modes.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
pub enum RoundingMode {
    /// Round toward positive infinity.
    Ceiling,

    /// Round toward negative infinity.
    Floor,

    /// Round away from zero.
    Up,

    /// Round toward zero (truncate).
    Down,

    /// Round half away from zero.
    HalfUp,

    /// Round half toward zero.
    HalfDown,

    /// Round half to even.
    HalfEven,

    /// Round away from zero if the last digit would be zero or five, otherwise toward zero.
    ZeroFiveUp,
}

/// Status flags: conditions accumulated in a context since the last reset.
///
/// Flags only ever gain bits during operations; it is the caller's
/// responsibility to reset the status between independent operation groups.
#[derive(PartialEq, Eq, Copy, Clone, Default, Hash)]
pub struct Status(u32);

impl Status {
    /// Empty status: no condition has occurred.
    pub const EMPTY: Status = Status(0);

    /// The exponent of a result was altered to fit the representable range.
    pub const CLAMPED: Status = Status(1);

    /// A string could not be converted to a number.
    pub const CONVERSION_SYNTAX: Status = Status(1 << 1);

    /// Division of a nonzero finite number by zero.
    pub const DIVISION_BY_ZERO: Status = Status(1 << 2);

    /// The integer quotient cannot be represented within the context precision.
    pub const DIVISION_IMPOSSIBLE: Status = Status(1 << 3);

    /// Division of zero by zero.
    pub const DIVISION_UNDEFINED: Status = Status(1 << 4);

    /// The result differs from the value computed at unbounded precision.
    pub const INEXACT: Status = Status(1 << 5);

    /// A context field holds a value outside its permitted range.
    pub const INVALID_CONTEXT: Status = Status(1 << 6);

    /// An operation has no defined result, or a signaling NaN was encountered.
    pub const INVALID_OPERATION: Status = Status(1 << 7);

    /// Memory allocation failed; the result is a quiet NaN.
    pub const MALLOC_ERROR: Status = Status(1 << 8);

    /// The requested operation is not implemented. Kept for compatibility
    /// with the full decimal arithmetic flag set; nothing in this crate
    /// raises it.
    pub const NOT_IMPLEMENTED: Status = Status(1 << 9);

    /// The adjusted exponent of a result exceeds `emax`.
    pub const OVERFLOW: Status = Status(1 << 10);

    /// Digits were discarded during rounding, whether or not they were zero.
    pub const ROUNDED: Status = Status(1 << 11);

    /// The adjusted exponent of a result is below `emin`.
    pub const SUBNORMAL: Status = Status(1 << 12);

    /// A subnormal result lost precision.
    pub const UNDERFLOW: Status = Status(1 << 13);

    /// Union of the conditions that produce a NaN result.
    pub const NAN_PRODUCING: Status = Status(
        Status::CONVERSION_SYNTAX.0
            | Status::DIVISION_IMPOSSIBLE.0
            | Status::DIVISION_UNDEFINED.0
            | Status::INVALID_CONTEXT.0
            | Status::INVALID_OPERATION.0
            | Status::MALLOC_ERROR.0,
    );

    /// Union of all the flags.
    pub const ALL: Status = Status((1 << 14) - 1);

    const NAMES: [(Status, &'static str); 14] = [
        (Status::CLAMPED, "Clamped"),
        (Status::CONVERSION_SYNTAX, "Conversion_syntax"),
        (Status::DIVISION_BY_ZERO, "Division_by_zero"),
        (Status::DIVISION_IMPOSSIBLE, "Division_impossible"),
        (Status::DIVISION_UNDEFINED, "Division_undefined"),
        (Status::INEXACT, "Inexact"),
        (Status::INVALID_CONTEXT, "Invalid_context"),
        (Status::INVALID_OPERATION, "Invalid_operation"),
        (Status::MALLOC_ERROR, "Malloc_error"),
        (Status::NOT_IMPLEMENTED, "Not_implemented"),
        (Status::OVERFLOW, "Overflow"),
        (Status::ROUNDED, "Rounded"),
        (Status::SUBNORMAL, "Subnormal"),
        (Status::UNDERFLOW, "Underflow"),
    ];

    /// Returns true if no flag is set.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if all flags of `other` are set in `self`.
    pub fn contains(&self, other: Status) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if `self` and `other` have at least one common flag.
    pub fn intersects(&self, other: Status) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns the flags of `self` that are not set in `other`.
    pub fn without(&self, other: Status) -> Status {
        Status(self.0 & !other.0)
    }

    /// Returns the raw bit representation.
    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Reconstructs a status from raw bits; unknown bits are discarded.
    pub fn from_bits(bits: u32) -> Status {
        Status(bits) & Status::ALL
    }

    /// Iterates over the names of the flags set in `self`.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        Status::NAMES
            .iter()
            .filter(move |(f, _)| self.contains(*f))
            .map(|(_, n)| *n)
    }
}

impl core::ops::BitOr for Status {
    type Output = Status;

    fn bitor(self, rhs: Status) -> Status {
        Status(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for Status {
    fn bitor_assign(&mut self, rhs: Status) {
        self.0 |= rhs.0;
    }
}

impl core::ops::BitAnd for Status {
    type Output = Status;

    fn bitand(self, rhs: Status) -> Status {
        Status(self.0 & rhs.0)
    }
}

impl core::ops::BitAndAssign for Status {
    fn bitand_assign(&mut self, rhs: Status) {
        self.0 &= rhs.0;
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for name in self.names() {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(name)?;
            first = false;
        }
        Ok(())
    }
}

impl core::fmt::Debug for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Status({})", self)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[cfg(not(feature = "std"))]
    use alloc::string::ToString;

    #[test]
    fn test_status_ops() {
        let mut st = Status::EMPTY;
        assert!(st.is_empty());

        st |= Status::ROUNDED;
        st |= Status::INEXACT;

        assert!(st.contains(Status::ROUNDED));
        assert!(st.contains(Status::ROUNDED | Status::INEXACT));
        assert!(!st.contains(Status::OVERFLOW));
        assert!(st.intersects(Status::INEXACT | Status::OVERFLOW));
        assert!(!st.intersects(Status::OVERFLOW));

        assert_eq!(st.without(Status::INEXACT), Status::ROUNDED);
        assert_eq!(Status::from_bits(st.bits()), st);
        assert_eq!(st.to_string(), "Inexact Rounded");
    }

    #[test]
    fn test_radix_consts() {
        assert_eq!(RADIX as DoubleLimb, (10 as DoubleLimb).pow(LIMB_DIGITS as u32));
        assert!(MAX_PREC as Exponent <= MAX_EMAX);
    }
}
