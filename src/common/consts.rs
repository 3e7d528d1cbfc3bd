//! Static constants.

use crate::num::DecNumber;
use lazy_static::lazy_static;

#[cfg(feature = "std")]
use crate::ops::consts::Consts;
#[cfg(feature = "std")]
use core::cell::RefCell;

lazy_static! {

    /// 1
    pub(crate) static ref ONE: DecNumber = DecNumber::from_limb(1).expect("Constant ONE initialization.");

    /// 2
    pub(crate) static ref TWO: DecNumber = DecNumber::from_limb(2).expect("Constant TWO initialization.");

    /// 10
    pub(crate) static ref TEN: DecNumber = DecNumber::from_limb(10).expect("Constant TEN initialization.");
}

#[cfg(feature = "std")]
thread_local! {
    pub(crate) static LN_CACHE: RefCell<Consts> = RefCell::new(Consts::new());
}
