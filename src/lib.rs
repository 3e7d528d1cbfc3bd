//! Decnum is an arbitrary precision decimal arithmetic library with
//! IEEE 854 style contexts: exact decimal representation, configurable
//! precision and rounding, and a status register for exceptional
//! conditions.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![deny(clippy::suspicious)]
#![allow(clippy::comparison_chain)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::collapsible_if)]

#[cfg(not(feature = "std"))]
extern crate alloc;

mod coefficient;
mod common;
mod conv;
mod ctx;
mod dec;
mod defs;
mod num;
mod ops;
mod parser;
mod round;
mod strop;

#[cfg(feature = "serde")]
mod for_3rd;

pub use crate::conv::Triple;
pub use crate::conv::TripleTag;
pub use crate::ctx::Context;
pub use crate::ctx::TrapError;
pub use crate::ctx::IEEE_CONTEXT_MAX_BITS;
pub use crate::dec::DecClass;
pub use crate::dec::Decimal;
pub use crate::defs::Error;
pub use crate::defs::Exponent;
pub use crate::defs::Limb;
pub use crate::defs::RoundingMode;
pub use crate::defs::Sign;
pub use crate::defs::Status;
pub use crate::ops::consts::Consts;
pub use crate::strop::FormatError;

pub use crate::defs::DEFAULT_PREC;
pub use crate::defs::LIMB_DIGITS;
pub use crate::defs::MAX_EMAX;
pub use crate::defs::MAX_PREC;
pub use crate::defs::MIN_EMIN;
pub use crate::defs::MIN_ETINY;
pub use crate::defs::RADIX;
