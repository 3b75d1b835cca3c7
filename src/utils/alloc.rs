//! Shim for unstable allocator API.
//!
//! -   By default, provides a minimal subset of the allocator API, backed by the global allocator.
//! -   If `allocator_api` is used, then forwards the allocator API.

#[cfg(feature = "allocator_api")]
pub use alloc::alloc::{AllocError, Allocator, Global};

#[cfg(not(feature = "allocator_api"))]
pub use shim::{AllocError, Allocator, Global};

#[cfg(not(feature = "allocator_api"))]
pub(super) mod shim {
    use core::{
        alloc::Layout,
        error, fmt,
        ptr::{self, NonNull},
    };

    use alloc::alloc;

    /// An allocation failure, either due to resource exhaustion or to an unsupported layout.
    #[derive(Copy, Clone, PartialEq, Eq, Debug)]
    pub struct AllocError;

    impl fmt::Display for AllocError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
            f.write_str("memory allocation failed")
        }
    }

    impl error::Error for AllocError {}

    /// The subset of the standard `Allocator` API used by the word stores of this crate.
    ///
    /// #   Safety
    ///
    /// -   Liveness: memory blocks that are currently allocated by an allocator must point to valid memory until either
    ///     they are deallocated or the `Allocator` and all its clones are dropped.
    /// -   Independence: moving an allocator must not invalidate memory blocks returned from it.
    /// -   Shallowness: a copied or cloned allocator must behave like the original allocator.
    pub unsafe trait Allocator {
        /// Attempts to allocate a zero-initialized block of memory.
        fn allocate_zeroed(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError>;

        /// Deallocates the memory referenced by ptr.
        ///
        /// #   Safety
        ///
        /// -   Liveness: `ptr` must still be allocated.
        /// -   Selfness: `ptr` must have been allocated by `self`.
        /// -   Layout: `layout` must match the layout passed to `self.allocate_zeroed(...)` when allocating `ptr`.
        unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

        /// Attempts to extend the memory block, zero-initializing the new tail.
        ///
        /// #   Safety
        ///
        /// -   Liveness: `ptr` must still be allocated.
        /// -   Selfness: `ptr` must have been allocated by `self`.
        /// -   Layout: `old_layout` must match the layout used when allocating `ptr`.
        /// -   Growth: `new_layout.size()` must be greater than or equal to `old_layout.size()`.
        unsafe fn grow_zeroed(
            &self,
            ptr: NonNull<u8>,
            old_layout: Layout,
            new_layout: Layout,
        ) -> Result<NonNull<[u8]>, AllocError> {
            debug_assert!(new_layout.size() >= old_layout.size());

            //  Safety:
            //  -   Forwarded, with `old_layout.size()` bytes to preserve, which fit within `new_layout` as per Growth.
            unsafe { reallocate(self, ptr, old_layout, new_layout, old_layout.size()) }
        }

        /// Attempts to shrink the memory block.
        ///
        /// #   Safety
        ///
        /// -   Liveness: `ptr` must still be allocated.
        /// -   Selfness: `ptr` must have been allocated by `self`.
        /// -   Layout: `old_layout` must match the layout used when allocating `ptr`.
        /// -   Shrinkage: `new_layout.size()` must be less than or equal to `old_layout.size()`.
        unsafe fn shrink(
            &self,
            ptr: NonNull<u8>,
            old_layout: Layout,
            new_layout: Layout,
        ) -> Result<NonNull<[u8]>, AllocError> {
            debug_assert!(new_layout.size() <= old_layout.size());

            //  Safety:
            //  -   Forwarded, with `new_layout.size()` bytes to preserve.
            unsafe { reallocate(self, ptr, old_layout, new_layout, new_layout.size()) }
        }
    }

    /// The global memory allocator.
    #[derive(Copy, Clone, Default, Debug)]
    pub struct Global;

    //  Safety:
    //  -   Liveness, Independence, Shallowness: guaranteed by implementation.
    unsafe impl Allocator for Global {
        #[inline]
        fn allocate_zeroed(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
            if layout.size() == 0 {
                return Ok(NonNull::slice_from_raw_parts(NonNull::dangling(), 0));
            }

            //  Safety:
            //  -   `layout` has a non-zero size.
            let raw_ptr = unsafe { alloc::alloc_zeroed(layout) };

            let ptr = NonNull::new(raw_ptr).ok_or(AllocError)?;

            Ok(NonNull::slice_from_raw_parts(ptr, layout.size()))
        }

        #[inline]
        unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
            if layout.size() == 0 {
                return;
            }

            //  Safety:
            //  -   `ptr.as_ptr()` is currently allocated, as per Liveness pre-condition.
            //  -   `ptr.as_ptr()` was allocated by `self`, as per Selfness pre-condition.
            //  -   `layout` matches the layout of `ptr.as_ptr()` as per Layout pre-condition.
            unsafe { alloc::dealloc(ptr.as_ptr(), layout) }
        }
    }

    //  Moves the first `preserved` bytes of `ptr` into a fresh block of `new_layout`, then releases `ptr`.
    //
    //  #   Safety
    //
    //  -   Liveness, Selfness, Layout: as per `Allocator::shrink` and `Allocator::grow_zeroed`.
    //  -   Preserved: `preserved` must be less than or equal to both `old_layout.size()` and `new_layout.size()`.
    unsafe fn reallocate<A>(
        allocator: &A,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
        preserved: usize,
    ) -> Result<NonNull<[u8]>, AllocError>
    where
        A: ?Sized + Allocator,
    {
        let new_ptr = allocator.allocate_zeroed(new_layout)?;

        {
            let new_ptr = new_ptr.cast::<u8>();

            //  Safety:
            //  -   `ptr` is valid for `preserved` reads, as per Liveness, Layout & Preserved pre-conditions.
            //  -   `new_ptr` is valid for `preserved` writes, as per Preserved pre-condition.
            //  -   `ptr` and `new_ptr` point to non-overlapping blocks, as `new_ptr` is freshly allocated.
            unsafe { ptr::copy_nonoverlapping(ptr.as_ptr(), new_ptr.as_ptr(), preserved) };

            //  Safety:
            //  -   Liveness: as per Liveness pre-condition.
            //  -   Selfness: as per Selfness pre-condition.
            //  -   Layout: as per Layout pre-condition.
            unsafe { allocator.deallocate(ptr, old_layout) };
        }

        Ok(new_ptr)
    }
} // mod shim
