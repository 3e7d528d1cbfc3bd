//! Cached constants.

use crate::ctx::Context;
use crate::dec::Decimal;
use crate::defs::Error;
use crate::ops::util;
use crate::num::DecNumber;

/// A cache of computed constants. The cached value is extended on demand
/// and reused for any smaller precision.
#[derive(Debug)]
pub struct Consts {
    ln10: Option<DecNumber>,
    digits: usize,
}

impl Consts {
    /// Returns an empty cache.
    pub fn new() -> Self {
        Consts { ln10: None, digits: 0 }
    }

    /// ln(10) rounded half-even to `prec` significant digits.
    pub(crate) fn ln_10_num(&mut self, prec: usize) -> Result<DecNumber, Error> {
        if self.ln10.is_none() || self.digits < prec {
            // grow geometrically so repeated small increases do not
            // recompute every time
            let target = prec.max(self.digits * 2).max(48) + 4;
            let n = crate::ops::log::ln10_raw(target)?;
            self.ln10 = Some(n);
            self.digits = target;
        }

        let cached = self.ln10.as_ref().ok_or(Error::MemoryAllocation)?;
        let mut n = cached.try_clone()?;
        util::settle(&mut n, prec)?;
        Ok(n)
    }

    /// ln(10) with `prec` significant digits.
    ///
    /// NaN is returned if the memory allocation for the result fails.
    pub fn ln_10(&mut self, prec: usize) -> Decimal {
        match self.ln_10_num(prec) {
            Ok(n) => Decimal::from_num(n),
            Err(e) => {
                let mut ctx = Context::new();
                Decimal::from_error(e, &mut ctx)
            }
        }
    }
}

impl Default for Consts {
    fn default() -> Self {
        Self::new()
    }
}

/// ln(10) to `prec` digits from the thread local cache.
#[cfg(feature = "std")]
pub(crate) fn ln_10(prec: usize) -> Result<DecNumber, Error> {
    crate::common::consts::LN_CACHE.with(|c| c.borrow_mut().ln_10_num(prec))
}

/// ln(10) to `prec` digits, computed directly.
#[cfg(not(feature = "std"))]
pub(crate) fn ln_10(prec: usize) -> Result<DecNumber, Error> {
    Consts::new().ln_10_num(prec)
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_ln_10_num() {
        let mut c = Consts::new();
        let n = c.ln_10_num(9).unwrap();
        assert_eq!(n.coefficient_to_u128(), Some(230258509));
        assert_eq!(n.exp, -8);

        // extending the cache keeps the value consistent
        let n = c.ln_10_num(30).unwrap();
        assert_eq!(n.coefficient_to_u128(), Some(230258509299404568401799145468));
        assert_eq!(n.exp, -29);

        // shrinking back rounds the cached value
        let n = c.ln_10_num(3).unwrap();
        assert_eq!(n.coefficient_to_u128(), Some(230));
        assert_eq!(n.exp, -2);
    }

    #[test]
    fn test_ln_10() {
        let mut c = Consts::new();
        let d = c.ln_10(20);
        let n = d.num().unwrap();
        assert_eq!(n.coefficient_to_u128(), Some(23025850929940456840));
        assert_eq!(n.exp, -19);
    }
}
