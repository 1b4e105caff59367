//! Storage abstraction for parsed records.
//!
//! Bootloaders run the parser without an allocator; they hand in an
//! [`arrayvec::ArrayVec`] sized for the payloads they expect. Hosted
//! callers enable the `alloc` feature and hand in a `Vec`.

use arrayvec::ArrayVec;

use crate::{Error, Result};

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Growable-slice interface the parsers store records through.
pub trait Veclike<T> {
    /// Append an element. Fixed-capacity storage reports exhaustion as
    /// [`Error::TooManyRecords`].
    fn try_push(&mut self, item: T) -> Result<()>;

    fn clear(&mut self);

    fn as_slice(&self) -> &[T];

    fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl<T, const CAP: usize> Veclike<T> for ArrayVec<T, CAP> {
    fn try_push(&mut self, item: T) -> Result<()> {
        ArrayVec::try_push(self, item).map_err(|_| Error::TooManyRecords)
    }

    fn clear(&mut self) {
        ArrayVec::clear(self);
    }

    fn as_slice(&self) -> &[T] {
        ArrayVec::as_slice(self)
    }
}

#[cfg(feature = "alloc")]
impl<T> Veclike<T> for Vec<T> {
    fn try_push(&mut self, item: T) -> Result<()> {
        self.push(item);
        Ok(())
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn as_slice(&self) -> &[T] {
        Vec::as_slice(self)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn arrayvec_reports_exhaustion() {
        let mut storage: ArrayVec<u8, 2> = ArrayVec::new();
        Veclike::try_push(&mut storage, 1).unwrap();
        Veclike::try_push(&mut storage, 2).unwrap();
        assert_eq!(Veclike::try_push(&mut storage, 3), Err(Error::TooManyRecords));
        assert_eq!(Veclike::as_slice(&storage), [1, 2]);
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn vec_grows_unbounded() {
        let mut storage = Vec::new();
        for i in 0..1000 {
            Veclike::try_push(&mut storage, i).unwrap();
        }
        assert_eq!(Veclike::as_slice(&storage).len(), 1000);
        Veclike::clear(&mut storage);
        assert!(Veclike::is_empty(&storage));
    }
}
