//! Buffer for holding coefficient limbs.

use crate::defs::Error;
use crate::defs::Limb;
use core::ops::Deref;
use core::ops::DerefMut;
use core::ops::Index;
use core::ops::IndexMut;
use core::slice::SliceIndex;
use smallvec::SmallVec;

// Number of limbs stored inline before the buffer spills to the heap.
const STATIC_ALLOCATION: usize = 4;

/// Buffer for holding coefficient limbs (little-endian limb order).
///
/// Small coefficients live in fixed inline storage; larger ones are
/// heap-allocated. The buffer exclusively owns its storage and is only
/// ever deep-copied.
#[derive(Debug, Hash, PartialEq, Eq)]
pub struct DigitBuf {
    inner: SmallVec<[Limb; STATIC_ALLOCATION]>,
}

impl DigitBuf {
    /// New buffer of `sz` limbs. The limb values stay uninitialized.
    #[inline]
    pub fn new(sz: usize) -> Result<Self, Error> {
        let mut inner = SmallVec::new();
        inner.try_reserve_exact(sz)?;
        unsafe {
            // values of the newly allocated limbs stay uninitialized for performance reasons
            inner.set_len(sz);
        }
        Ok(DigitBuf { inner })
    }

    /// New buffer of `sz` limbs filled with zero.
    pub fn new_zeroed(sz: usize) -> Result<Self, Error> {
        let mut buf = Self::new(sz)?;
        buf.fill(0);
        Ok(buf)
    }

    /// New buffer holding a copy of `m`.
    pub fn from_limbs(m: &[Limb]) -> Result<Self, Error> {
        let mut buf = Self::new(m.len())?;
        buf.copy_from_slice(m);
        Ok(buf)
    }

    /// New single-limb buffer.
    pub fn single(d: Limb) -> Result<Self, Error> {
        let mut buf = Self::new(1)?;
        buf[0] = d;
        Ok(buf)
    }

    #[inline]
    pub fn fill(&mut self, d: Limb) {
        self.inner.fill(d);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Deep copy of `self`.
    pub fn try_clone(&self) -> Result<Self, Error> {
        Self::from_limbs(&self.inner)
    }

    /// Appends a limb, growing the buffer if needed.
    pub fn try_push(&mut self, d: Limb) -> Result<(), Error> {
        if self.inner.len() == self.inner.capacity() {
            self.inner.try_reserve(1)?;
        }
        self.inner.push(d);
        Ok(())
    }

    /// Resizes the buffer to `sz` limbs, filling new most significant limbs with zero.
    pub fn try_resize(&mut self, sz: usize) -> Result<(), Error> {
        let l = self.inner.len();
        if sz > l {
            if sz > self.inner.capacity() {
                self.inner.try_reserve(sz - l)?;
            }
            self.inner.resize(sz, 0);
        } else {
            self.inner.truncate(sz);
        }
        Ok(())
    }

    /// Drops limbs above index `sz`.
    #[inline]
    pub fn truncate(&mut self, sz: usize) {
        self.inner.truncate(sz);
    }

    /// Removes most significant limbs containing zeroes, keeping at least one limb.
    pub fn trunc_leading_zeroes(&mut self) {
        let mut n = self.inner.len();
        while n > 1 && self.inner[n - 1] == 0 {
            n -= 1;
        }
        self.inner.truncate(n);
    }
}

impl<I: SliceIndex<[Limb]>> IndexMut<I> for DigitBuf {
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        self.inner.index_mut(index)
    }
}

impl<I: SliceIndex<[Limb]>> Index<I> for DigitBuf {
    type Output = I::Output;

    #[inline]
    fn index(&self, index: I) -> &Self::Output {
        self.inner.index(index)
    }
}

impl Deref for DigitBuf {
    type Target = [Limb];

    #[inline]
    fn deref(&self) -> &[Limb] {
        self.inner.deref()
    }
}

impl DerefMut for DigitBuf {
    #[inline]
    fn deref_mut(&mut self) -> &mut [Limb] {
        self.inner.deref_mut()
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_digit_buf() {
        let mut buf = DigitBuf::new_zeroed(3).unwrap();
        assert_eq!(buf.len(), 3);
        assert_eq!(&buf[..], &[0, 0, 0]);

        buf[0] = 7;
        buf[2] = 1;
        let copy = buf.try_clone().unwrap();
        assert_eq!(&copy[..], &buf[..]);

        buf.try_push(9).unwrap();
        assert_eq!(&buf[..], &[7, 0, 1, 9]);

        buf.trunc_leading_zeroes();
        assert_eq!(buf.len(), 4);

        // a nonzero top limb is kept, a zero one strips
        buf.truncate(3);
        buf.trunc_leading_zeroes();
        assert_eq!(&buf[..], &[7, 0, 1]);
        buf.truncate(2);
        buf.trunc_leading_zeroes();
        assert_eq!(&buf[..], &[7]);

        buf.try_resize(2).unwrap();
        assert_eq!(&buf[..], &[7, 0]);

        // spills past the inline storage
        let mut big = DigitBuf::new_zeroed(16).unwrap();
        big[15] = 3;
        assert_eq!(big.len(), 16);
        assert_eq!(big[15], 3);
    }
}
