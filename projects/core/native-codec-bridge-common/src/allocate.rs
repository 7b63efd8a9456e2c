//! Memory allocation utilities for buffers exchanged with native codecs.
//!
//! Native entry points write through raw pointers and several of them write
//! 32-bit pixels, so every buffer handed across the boundary is allocated with
//! an alignment of 64 bytes.
//!
//! ## Useful APIs
//!
//! [`allocate_align_64`]: Allocates uninitialized memory aligned to 64-bytes.
//! [`AlignedBuffer::zeroed`]: Allocates a zero-initialized output region.
//! [`AlignedBuffer::copy_from_slice`]: Copies foreign memory into an owned region.

use core::alloc::{Layout, LayoutError};
use core::ptr;
use core::slice;
use safe_allocator_api::allocator_api::*;
use safe_allocator_api::RawAlloc;
use thiserror::Error;

/// Allocates data with an alignment of 64 bytes.
///
/// # Parameters
///
/// - `num_bytes`: The number of bytes to allocate
///
/// # Returns
///
/// A [`RawAlloc`] containing the allocated data
pub fn allocate_align_64(num_bytes: usize) -> Result<RawAlloc, AllocateError> {
    let layout = Layout::from_size_align(num_bytes, 64)?;
    Ok(RawAlloc::new(layout)?)
}

/// An error that happened in memory allocation within the library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocateError {
    /// An error that occurred while creating a layout for allocation.
    #[error("Invalid layout provided. Likely due to `num_bytes` in `allocate_align_64` being larger than isize::MAX. {0}")]
    LayoutError(#[from] LayoutError),

    /// An error that occurred while allocating memory.
    #[error(transparent)]
    AllocationFailed(#[from] AllocError),
}

/// A 64-byte aligned, exclusively owned byte region with a fixed logical length.
///
/// Zero-length regions still own a one byte allocation, so [`AlignedBuffer::as_mut_ptr`]
/// never yields a dangling pointer.
pub struct AlignedBuffer {
    alloc: RawAlloc,
    len: usize,
}

impl AlignedBuffer {
    /// Allocates a region of `len` bytes with every byte set to zero.
    pub fn zeroed(len: usize) -> Result<Self, AllocateError> {
        let mut alloc = allocate_align_64(len.max(1))?;
        // Safety: the allocation holds at least `len.max(1)` bytes.
        unsafe { ptr::write_bytes(alloc.as_mut_ptr(), 0, len.max(1)) };
        Ok(Self { alloc, len })
    }

    /// Allocates a region holding a copy of `data`.
    pub fn copy_from_slice(data: &[u8]) -> Result<Self, AllocateError> {
        let mut alloc = allocate_align_64(data.len().max(1))?;
        // Safety: the allocation holds at least `data.len()` bytes and cannot overlap `data`.
        unsafe { ptr::copy_nonoverlapping(data.as_ptr(), alloc.as_mut_ptr(), data.len()) };
        Ok(Self {
            alloc,
            len: data.len(),
        })
    }

    /// Logical length of the region in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the region holds no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Pointer to the start of the region.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.alloc.as_ptr()
    }

    /// Mutable pointer to the start of the region.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.alloc.as_mut_ptr()
    }

    /// The region as a byte slice.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        // Safety: the allocation is initialized and at least `len` bytes long.
        unsafe { slice::from_raw_parts(self.alloc.as_ptr(), self.len) }
    }

    /// The region as a mutable byte slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // Safety: the allocation is initialized, at least `len` bytes long and borrowed uniquely.
        unsafe { slice::from_raw_parts_mut(self.alloc.as_mut_ptr(), self.len) }
    }
}

impl core::fmt::Debug for AlignedBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}
