//! Operations on [Decimal](crate::Decimal).

pub mod arith;
pub mod cmp;
pub mod consts;
pub mod exp;
pub mod log;
pub mod logical;
pub mod pow;
pub mod quantize;
pub mod special;
pub mod sqrt;
pub(crate) mod util;
