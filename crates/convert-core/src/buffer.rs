//! Alignment-tagged buffers
//!
//! The aligned kernels take [`AlignedSlice`] / [`AlignedSliceMut`] instead of
//! plain slices. A view can only be built from a start address on the
//! [`VECTOR_ALIGNMENT`] boundary, so the aligned load/store precondition is
//! carried by the type rather than by caller discipline.
//!
//! [`AlignedVec`] is owned storage whose start address is always aligned,
//! which makes its views infallible.

use std::ops::{Deref, DerefMut};

use bytemuck::{Pod, Zeroable};

use crate::error::{ConvertError, Result};
use crate::types::{is_vector_aligned, VECTOR_ALIGNMENT};

/// Shared view over a slice whose start address is vector aligned
#[derive(Debug, Clone, Copy)]
pub struct AlignedSlice<'a, T> {
    slice: &'a [T],
}

impl<'a, T> AlignedSlice<'a, T> {
    /// Tag `slice` as aligned after checking its start address.
    ///
    /// Empty slices are always accepted since nothing is ever loaded from them.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Misaligned`] if the slice does not start on the
    /// vector alignment boundary.
    pub fn new(slice: &'a [T]) -> Result<Self> {
        if slice.is_empty() || is_vector_aligned(slice.as_ptr()) {
            Ok(Self { slice })
        } else {
            Err(ConvertError::misaligned(slice.as_ptr(), VECTOR_ALIGNMENT))
        }
    }

    /// Underlying slice
    pub fn as_slice(&self) -> &'a [T] {
        self.slice
    }
}

impl<T> Deref for AlignedSlice<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.slice
    }
}

/// Mutable view over a slice whose start address is vector aligned
#[derive(Debug)]
pub struct AlignedSliceMut<'a, T> {
    slice: &'a mut [T],
}

impl<'a, T> AlignedSliceMut<'a, T> {
    /// Tag `slice` as aligned after checking its start address.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Misaligned`] if the slice does not start on the
    /// vector alignment boundary.
    pub fn new(slice: &'a mut [T]) -> Result<Self> {
        if slice.is_empty() || is_vector_aligned(slice.as_ptr()) {
            Ok(Self { slice })
        } else {
            Err(ConvertError::misaligned(slice.as_ptr(), VECTOR_ALIGNMENT))
        }
    }

    /// Shorter-lived mutable view over the same memory
    pub fn reborrow(&mut self) -> AlignedSliceMut<'_, T> {
        AlignedSliceMut {
            slice: &mut *self.slice,
        }
    }

    /// Consume the view, returning the underlying slice
    pub fn into_slice(self) -> &'a mut [T] {
        self.slice
    }
}

impl<T> Deref for AlignedSliceMut<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.slice
    }
}

impl<T> DerefMut for AlignedSliceMut<'_, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.slice
    }
}

/// One vector-aligned storage unit
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C, align(16))]
struct Block([u8; VECTOR_ALIGNMENT]);

/// Growable buffer of `T` whose start address is always vector aligned
///
/// `T` must be a `Pod` type whose size divides the alignment boundary
/// (`Complex32` and `ComplexI8` both do).
#[derive(Debug, Clone)]
pub struct AlignedVec<T> {
    blocks: Vec<Block>,
    len: usize,
    _marker: std::marker::PhantomData<T>,
}

impl<T: Pod> AlignedVec<T> {
    /// Create a buffer of `len` zeroed elements
    ///
    /// # Panics
    ///
    /// Panics if the size of `T` is zero or does not divide the alignment
    /// boundary.
    pub fn zeroed(len: usize) -> Self {
        let size = std::mem::size_of::<T>();
        assert!(
            size > 0 && VECTOR_ALIGNMENT % size == 0,
            "element size {} must divide {}",
            size,
            VECTOR_ALIGNMENT
        );
        Self {
            blocks: vec![Block::zeroed(); Self::blocks_for(len)],
            len,
            _marker: std::marker::PhantomData,
        }
    }

    /// Create an aligned copy of `items`
    pub fn from_slice(items: &[T]) -> Self {
        let mut buf = Self::zeroed(items.len());
        buf.as_mut_slice().copy_from_slice(items);
        buf
    }

    fn blocks_for(len: usize) -> usize {
        (len * std::mem::size_of::<T>()).div_ceil(VECTOR_ALIGNMENT)
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Resize to `len` elements, zero-filling any new ones
    pub fn resize(&mut self, len: usize) {
        if len < self.len {
            // Keep stale tail bytes zeroed so a later grow hands out zeros
            let end = self.len;
            self.as_full_slice_mut()[len..end].fill(T::zeroed());
        }
        self.blocks.resize(Self::blocks_for(len), Block::zeroed());
        self.len = len;
    }

    fn as_full_slice_mut(&mut self) -> &mut [T] {
        bytemuck::cast_slice_mut(self.blocks.as_mut_slice())
    }

    /// Elements as a plain slice
    pub fn as_slice(&self) -> &[T] {
        &bytemuck::cast_slice(self.blocks.as_slice())[..self.len]
    }

    /// Elements as a plain mutable slice
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.len;
        &mut self.as_full_slice_mut()[..len]
    }

    /// Aligned view over the elements
    pub fn aligned(&self) -> AlignedSlice<'_, T> {
        AlignedSlice {
            slice: self.as_slice(),
        }
    }

    /// Aligned mutable view over the elements
    pub fn aligned_mut(&mut self) -> AlignedSliceMut<'_, T> {
        AlignedSliceMut {
            slice: self.as_mut_slice(),
        }
    }
}

impl<T: Pod> Deref for AlignedVec<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Pod> DerefMut for AlignedVec<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Complex32, ComplexI8};

    #[test]
    fn test_aligned_vec_start_is_aligned() {
        for len in [0usize, 1, 7, 8, 9, 1000] {
            let floats = AlignedVec::<Complex32>::zeroed(len);
            let bytes = AlignedVec::<ComplexI8>::zeroed(len);
            assert_eq!(floats.len(), len);
            assert_eq!(bytes.len(), len);
            assert!(is_vector_aligned(floats.as_ptr()));
            assert!(is_vector_aligned(bytes.as_ptr()));
        }
    }

    #[test]
    fn test_slice_views_reject_misaligned_start() {
        let buf = AlignedVec::<Complex32>::zeroed(16);
        // Complex32 is 8 bytes, so an offset of one element breaks 16-byte alignment
        let err = AlignedSlice::new(&buf[1..]).unwrap_err();
        assert!(matches!(err, ConvertError::Misaligned { required: 16, .. }));
        assert!(AlignedSlice::new(&buf[2..]).is_ok());

        let mut out = AlignedVec::<ComplexI8>::zeroed(32);
        assert!(AlignedSliceMut::new(&mut out[3..]).is_err());
        assert!(AlignedSliceMut::new(&mut out[8..]).is_ok());
    }

    #[test]
    fn test_empty_slice_is_always_accepted() {
        let buf = AlignedVec::<Complex32>::zeroed(4);
        assert!(AlignedSlice::new(&buf[1..1]).is_ok());
    }

    #[test]
    fn test_resize_zero_fills() {
        let mut buf = AlignedVec::from_slice(&[ComplexI8::new(5, -5); 10]);
        buf.resize(3);
        assert_eq!(buf.len(), 3);
        buf.resize(12);
        assert_eq!(&buf[..3], &[ComplexI8::new(5, -5); 3]);
        assert!(buf[3..].iter().all(|s| *s == ComplexI8::new(0, 0)));
        assert!(is_vector_aligned(buf.as_ptr()));
    }
}
