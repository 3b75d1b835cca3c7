//  See the `WordStore` trait.

use alloc::vec::Vec;

use crate::utils::{BitWord, WordStoreError};

//
//  API
//

/// A trait for an owned, growable, sequence of words.
///
/// The trait is pre-implemented for `Vec<W>`, and for `DynamicWordStore`, and exists to allow for alternative
/// allocation strategies.
///
/// All sizes are expressed in words.
pub trait WordStore {
    /// Type of the words stored.
    type Word: BitWord;

    //
    //  Size & capacity
    //

    /// Returns the number of words stored.
    fn len(&self) -> usize;

    /// Returns whether no word is stored.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of words which can be stored without reallocating.
    fn capacity(&self) -> usize;

    /// Ensures that the capacity is at least `n` words.
    ///
    /// Unlike `Vec::reserve`, `n` is the total number of words, not an additional number of words.
    ///
    /// #   Panics
    ///
    /// If the memory cannot be allocated.
    fn reserve(&mut self, n: usize);

    /// Ensures that the capacity is at least `n` words.
    ///
    /// On error, `self` is left unchanged.
    fn try_reserve(&mut self, n: usize) -> Result<(), WordStoreError>;

    /// Reduces the capacity as close as possible to `max(n, self.len())` words.
    fn shrink_to(&mut self, n: usize);

    //
    //  Access
    //

    /// Returns the words stored.
    ///
    /// The pointer of the slice is stable as long as the capacity is not modified.
    fn words(&self) -> &[Self::Word];

    /// Returns the words stored.
    ///
    /// The pointer of the slice is stable as long as the capacity is not modified.
    fn words_mut(&mut self) -> &mut [Self::Word];

    //
    //  Modifications
    //

    /// Appends a word.
    fn push(&mut self, word: Self::Word);

    /// Removes the last word, if any.
    fn pop(&mut self) -> Option<Self::Word>;

    /// Resizes the store to `n` words, filling any new word with `fill`.
    fn resize(&mut self, n: usize, fill: Self::Word);

    /// Shortens the store to `n` words, if longer.
    fn truncate(&mut self, n: usize);

    /// Removes all words, without affecting the capacity.
    fn clear(&mut self);
}

//
//  Implementation for Vec<W>.
//

impl<W> WordStore for Vec<W>
where
    W: BitWord,
{
    type Word = W;

    #[inline]
    fn len(&self) -> usize {
        <[W]>::len(self)
    }

    #[inline]
    fn capacity(&self) -> usize {
        Vec::capacity(self)
    }

    #[inline]
    fn reserve(&mut self, n: usize) {
        if let Some(additional) = n.checked_sub(<[W]>::len(self)) {
            Vec::reserve(self, additional);
        }
    }

    #[inline]
    fn try_reserve(&mut self, n: usize) -> Result<(), WordStoreError> {
        let Some(additional) = n.checked_sub(<[W]>::len(self)) else {
            return Ok(());
        };

        Vec::try_reserve(self, additional).map_err(|_| WordStoreError)
    }

    #[inline]
    fn shrink_to(&mut self, n: usize) {
        Vec::shrink_to(self, n);
    }

    #[inline]
    fn words(&self) -> &[W] {
        self
    }

    #[inline]
    fn words_mut(&mut self) -> &mut [W] {
        self
    }

    #[inline]
    fn push(&mut self, word: W) {
        Vec::push(self, word);
    }

    #[inline]
    fn pop(&mut self) -> Option<W> {
        Vec::pop(self)
    }

    #[inline]
    fn resize(&mut self, n: usize, fill: W) {
        Vec::resize(self, n, fill);
    }

    #[inline]
    fn truncate(&mut self, n: usize) {
        Vec::truncate(self, n);
    }

    #[inline]
    fn clear(&mut self) {
        Vec::clear(self);
    }
}

//
//  DynamicWordStore & Implementation.
//

//  #   Why an inner module?
//
//  `unsafe` is viral up to module boundaries, so best keep it contained.
pub(crate) mod dynamic {
    use core::{
        alloc::Layout,
        fmt,
        hash::{Hash, Hasher},
        ptr::NonNull,
        slice,
    };

    use crate::utils::alloc::{Allocator, Global};

    use super::*;

    /// Heap allocated implementation of a `WordStore`.
    ///
    /// The whole capacity is zero-initialized on allocation, and capacity grows by powers of two.
    pub struct DynamicWordStore<W = u64, A = Global>
    where
        W: BitWord,
        A: Allocator,
    {
        //  Safety Invariants:
        //  -   Empty Dangling: if an empty slice, it is dangling.
        //  -   Self-Allocated: if not empty, it is allocated by `Self::allocate` or `Self::reallocate` with the
        //      layout of `ptr.len()` words.
        //  -   Initialized: all `ptr.len()` words of the slice are initialized.
        //  -   Length: `len <= ptr.len()`.
        ptr: NonNull<[W]>,
        len: usize,
        allocator: A,
    }

    //
    //  Creation
    //

    impl<W> DynamicWordStore<W, Global>
    where
        W: BitWord,
    {
        /// Returns a new, empty, instance.
        pub const fn new() -> Self {
            Self::new_in(Global)
        }
    }

    impl<W, A> DynamicWordStore<W, A>
    where
        W: BitWord,
        A: Allocator,
    {
        /// Returns a new, empty, instance.
        pub const fn new_in(allocator: A) -> Self {
            //  Safety Invariant:
            //  -   Empty Dangling: create an empty slice, with a dangling pointer.
            let ptr = NonNull::slice_from_raw_parts(NonNull::dangling(), 0);

            Self { ptr, len: 0, allocator }
        }

        /// Returns a reference to the allocator.
        pub const fn allocator(&self) -> &A {
            &self.allocator
        }
    }

    //
    //  WordStore (inherent)
    //

    impl<W, A> DynamicWordStore<W, A>
    where
        W: BitWord,
        A: Allocator,
    {
        /// Returns the number of words stored.
        #[inline]
        pub const fn len(&self) -> usize {
            self.len
        }

        /// Returns whether no word is stored.
        #[inline]
        pub const fn is_empty(&self) -> bool {
            self.len == 0
        }

        /// Returns the number of words which can be stored without reallocating.
        #[inline]
        pub const fn capacity(&self) -> usize {
            self.ptr.len()
        }

        /// Returns a reference to the stored words.
        #[inline]
        pub const fn words(&self) -> &[W] {
            //  Safety:
            //  -   The pointer is non-null and sufficiently aligned, even when dangling.
            //  -   The first `self.len` words are allocated and initialized, as per the Safety Invariants.
            //  -   No mutable borrow is accessible, as `self` could be borrowed.
            unsafe { slice::from_raw_parts(self.ptr.cast::<W>().as_ptr(), self.len) }
        }

        /// Returns a mutable reference to the stored words.
        #[inline]
        pub const fn words_mut(&mut self) -> &mut [W] {
            //  Safety:
            //  -   The pointer is non-null and sufficiently aligned, even when dangling.
            //  -   The first `self.len` words are allocated and initialized, as per the Safety Invariants.
            //  -   No borrow is accessible, as `self` could be mutably borrowed.
            unsafe { slice::from_raw_parts_mut(self.ptr.cast::<W>().as_ptr(), self.len) }
        }

        /// Ensures that the capacity is at least `n` words.
        ///
        /// #   Panics
        ///
        /// If the memory cannot be allocated.
        #[inline]
        pub fn reserve(&mut self, n: usize) {
            if n <= self.ptr.len() {
                return;
            }

            if self.try_reserve(n).is_err() {
                allocation_failure(n);
            }
        }

        /// Ensures that the capacity is at least `n` words.
        ///
        /// On error, `self` is left unchanged.
        #[inline]
        pub fn try_reserve(&mut self, n: usize) -> Result<(), WordStoreError> {
            if n <= self.ptr.len() {
                return Ok(());
            }

            //  Safety:
            //  -   `self.ptr` satisfies the Safety Invariants.
            //  -   `self.allocator` is its allocator.
            //  -   `n` > `self.ptr.len()`.
            self.ptr = unsafe { Self::grow(&self.allocator, self.ptr, n)? };

            Ok(())
        }

        /// Reduces the capacity to `max(n, self.len())` words, if lower than the current capacity.
        pub fn shrink_to(&mut self, n: usize) {
            let target = n.max(self.len);

            if target >= self.ptr.len() {
                return;
            }

            //  Safety:
            //  -   `self.ptr` satisfies the Safety Invariants.
            //  -   `self.allocator` is its allocator.
            //  -   `target` < `self.ptr.len()`, and `target` >= `self.len`.
            let shrunk = unsafe { Self::shrink(&self.allocator, self.ptr, target) };

            //  Failing to shrink is not an error, merely a missed opportunity.
            if let Ok(ptr) = shrunk {
                self.ptr = ptr;
            }
        }

        /// Appends a word.
        ///
        /// #   Panics
        ///
        /// If the memory cannot be allocated.
        #[inline]
        pub fn push(&mut self, word: W) {
            if self.len == self.ptr.len() {
                let Some(n) = self.len.checked_add(1) else {
                    allocation_failure(usize::MAX);
                };

                self.reserve(n);
            }

            debug_assert!(self.len < self.ptr.len());

            //  Safety:
            //  -   `self.len` is strictly less than the capacity, hence the slot is allocated.
            unsafe { self.ptr.cast::<W>().add(self.len).write(word) };

            self.len += 1;
        }

        /// Removes the last word, if any.
        #[inline]
        pub fn pop(&mut self) -> Option<W> {
            let last = self.len.checked_sub(1)?;

            //  Safety:
            //  -   `last` is strictly less than `self.len`, hence the slot is allocated and initialized.
            let word = unsafe { self.ptr.cast::<W>().add(last).read() };

            self.len = last;

            Some(word)
        }

        /// Resizes the store to `n` words, filling any new word with `fill`.
        ///
        /// #   Panics
        ///
        /// If the memory cannot be allocated.
        pub fn resize(&mut self, n: usize, fill: W) {
            if n <= self.len {
                self.len = n;
                return;
            }

            self.reserve(n);

            let old = self.len;

            //  The whole capacity is initialized, as per the Safety Invariants.
            self.len = n;

            self.words_mut()[old..].fill(fill);
        }

        /// Shortens the store to `n` words, if longer.
        #[inline]
        pub fn truncate(&mut self, n: usize) {
            self.len = self.len.min(n);
        }

        /// Removes all words, without affecting the capacity.
        #[inline]
        pub fn clear(&mut self) {
            self.len = 0;
        }
    }

    //
    //  WordStore (trait)
    //

    impl<W, A> WordStore for DynamicWordStore<W, A>
    where
        W: BitWord,
        A: Allocator,
    {
        type Word = W;

        #[inline]
        fn len(&self) -> usize {
            self.len()
        }

        #[inline]
        fn capacity(&self) -> usize {
            self.capacity()
        }

        #[inline]
        fn reserve(&mut self, n: usize) {
            self.reserve(n);
        }

        #[inline]
        fn try_reserve(&mut self, n: usize) -> Result<(), WordStoreError> {
            self.try_reserve(n)
        }

        #[inline]
        fn shrink_to(&mut self, n: usize) {
            self.shrink_to(n);
        }

        #[inline]
        fn words(&self) -> &[W] {
            self.words()
        }

        #[inline]
        fn words_mut(&mut self) -> &mut [W] {
            self.words_mut()
        }

        #[inline]
        fn push(&mut self, word: W) {
            self.push(word);
        }

        #[inline]
        fn pop(&mut self) -> Option<W> {
            self.pop()
        }

        #[inline]
        fn resize(&mut self, n: usize, fill: W) {
            self.resize(n, fill);
        }

        #[inline]
        fn truncate(&mut self, n: usize) {
            self.truncate(n);
        }

        #[inline]
        fn clear(&mut self) {
            self.clear();
        }
    }

    //
    //  Common traits
    //

    impl<W, A> Clone for DynamicWordStore<W, A>
    where
        W: BitWord,
        A: Allocator + Clone,
    {
        fn clone(&self) -> Self {
            let mut result = Self::new_in(self.allocator.clone());

            if self.len == 0 {
                return result;
            }

            //  Per post-condition of `allocate`, `ptr` satisfies the Safety Invariants.
            let ptr = Self::allocate(&result.allocator, self.len).expect("successful clone");

            result.ptr = ptr;
            result.len = self.len;

            result.words_mut().copy_from_slice(self.words());

            result
        }
    }

    impl<W, A> Drop for DynamicWordStore<W, A>
    where
        W: BitWord,
        A: Allocator,
    {
        fn drop(&mut self) {
            //  Safety:
            //  -   Liveness: `ptr` is currently allocated, unless it's empty, as per Safety Invariants.
            //  -   Allocator: `ptr` was allocated by `self.allocator`, unless it empty, as per Safety Invariants.
            unsafe { Self::deallocate(&self.allocator, self.ptr) }
        }
    }

    impl<W, A> fmt::Debug for DynamicWordStore<W, A>
    where
        W: BitWord,
        A: Allocator,
    {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
            f.debug_tuple("DynamicWordStore").field(&self.words()).finish()
        }
    }

    impl<W, A> Default for DynamicWordStore<W, A>
    where
        W: BitWord,
        A: Allocator + Default,
    {
        fn default() -> Self {
            Self::new_in(A::default())
        }
    }

    impl<W, A> Eq for DynamicWordStore<W, A>
    where
        W: BitWord,
        A: Allocator,
    {
    }

    impl<W, A> Hash for DynamicWordStore<W, A>
    where
        W: BitWord,
        A: Allocator,
    {
        fn hash<H>(&self, state: &mut H)
        where
            H: Hasher,
        {
            self.words().hash(state);
        }
    }

    impl<W, A> PartialEq for DynamicWordStore<W, A>
    where
        W: BitWord,
        A: Allocator,
    {
        fn eq(&self, other: &Self) -> bool {
            self.words() == other.words()
        }
    }

    //  Safety:
    //  -   Just like a `Vec<W, A>`.
    unsafe impl<W, A> Send for DynamicWordStore<W, A>
    where
        W: BitWord,
        A: Allocator + Send,
    {
    }

    unsafe impl<W, A> Sync for DynamicWordStore<W, A>
    where
        W: BitWord,
        A: Allocator + Sync,
    {
    }

    //
    //  Allocation implementation.
    //

    impl<W, A> DynamicWordStore<W, A>
    where
        W: BitWord,
        A: Allocator,
    {
        fn layout(n: usize) -> Result<Layout, WordStoreError> {
            debug_assert!(n > 0);

            Layout::array::<W>(n).map_err(|_| WordStoreError)
        }

        //  #   Safety
        //
        //  -   On success, the resulting pointer satisfies the Safety Invariants, for any `len <= n`.
        fn allocate(allocator: &A, n: usize) -> Result<NonNull<[W]>, WordStoreError> {
            let n = n.checked_next_power_of_two().ok_or(WordStoreError)?;

            let layout = Self::layout(n)?;

            let ptr = allocator.allocate_zeroed(layout).map_err(|_| WordStoreError)?;

            log::trace!("allocated word store of {n} words");

            Ok(NonNull::slice_from_raw_parts(ptr.cast(), n))
        }

        //  #   Safety
        //
        //  -   `old` must satisfy the Safety Invariants.
        //  -   `allocator` must be the allocator used to allocate `old`.
        //  -   `n` must be greater than `old.len()`.
        //
        //  On success, the resulting pointer satisfies the Safety Invariants, and `old` is released.
        #[inline(never)]
        unsafe fn grow(allocator: &A, old: NonNull<[W]>, n: usize) -> Result<NonNull<[W]>, WordStoreError> {
            if old.is_empty() {
                return Self::allocate(allocator, n);
            }

            debug_assert!(n > old.len());

            let n = n.checked_next_power_of_two().ok_or(WordStoreError)?;

            let old_layout = Self::layout(old.len())?;
            let new_layout = Self::layout(n)?;

            //  Safety:
            //  -   Liveness: `old` is live, as it satifies the Safety Invariants and is non-empty.
            //  -   Selfness: `old` was allocated by `allocator`, as per pre-condition.
            //  -   Layout: `old_layout` matches the layout of `old`, as per the Safety Invariants.
            //  -   Growth: `new_layout.size()` >= `old_layout.size()`, as `n` > `old.len()`,
            //      `checked_next_power_of_two` result is >= to its argument, and `layout` is monotonically growing.
            let ptr = unsafe {
                allocator
                    .grow_zeroed(old.cast(), old_layout, new_layout)
                    .map_err(|_| WordStoreError)?
            };

            log::trace!("grew word store from {} to {n} words", old.len());

            Ok(NonNull::slice_from_raw_parts(ptr.cast(), n))
        }

        //  #   Safety
        //
        //  -   `old` must satisfy the Safety Invariants.
        //  -   `allocator` must be the allocator used to allocate `old`.
        //  -   `n` must be strictly less than `old.len()`.
        //
        //  On success, the resulting pointer satisfies the Safety Invariants for any `len <= n`, and `old` is released.
        #[inline(never)]
        unsafe fn shrink(allocator: &A, old: NonNull<[W]>, n: usize) -> Result<NonNull<[W]>, WordStoreError> {
            debug_assert!(n < old.len());

            if n == 0 {
                //  Safety:
                //  -   Forward Liveness & Allocator pre-conditions.
                unsafe { Self::deallocate(allocator, old) };

                log::trace!("released word store of {} words", old.len());

                return Ok(NonNull::slice_from_raw_parts(NonNull::dangling(), 0));
            }

            let old_layout = Self::layout(old.len())?;
            let new_layout = Self::layout(n)?;

            //  Safety:
            //  -   Liveness: `old` is live, as it satifies the Safety Invariants and is non-empty.
            //  -   Selfness: `old` was allocated by `allocator`, as per pre-condition.
            //  -   Layout: `old_layout` matches the layout of `old`, as per the Safety Invariants.
            //  -   Shrinkage: `new_layout.size()` < `old_layout.size()`, as `n` < `old.len()`.
            let ptr = unsafe {
                allocator
                    .shrink(old.cast(), old_layout, new_layout)
                    .map_err(|_| WordStoreError)?
            };

            log::trace!("shrank word store from {} to {n} words", old.len());

            Ok(NonNull::slice_from_raw_parts(ptr.cast(), n))
        }

        //  #   Safety
        //
        //  -   Liveness: `ptr` is currently allocated, unless it's empty.
        //  -   Allocator: `ptr` was allocated by `allocator`, unless it empty.
        unsafe fn deallocate(allocator: &A, ptr: NonNull<[W]>) {
            if ptr.is_empty() {
                return;
            }

            let layout = Self::layout(ptr.len());

            #[cfg(debug_assertions)]
            let layout = layout.expect("valid layout");

            //  Safety:
            //  -   Valid since `ptr` was allocated with the layout of `ptr.len()` words, as per the Allocator
            //      pre-condition, which cannot succeed without `Self::layout`, a pure function, succeeding.
            #[cfg(not(debug_assertions))]
            let layout = unsafe { layout.unwrap_unchecked() };

            //  Safety:
            //  -   `ptr` is currently allocated, as per Liveness pre-condition.
            //  -   `layout` is the same as used for allocation, as per Allocator pre-condition.
            unsafe { allocator.deallocate(ptr.cast(), layout) }
        }
    }

    #[cold]
    #[inline(never)]
    #[track_caller]
    fn allocation_failure(n: usize) -> ! {
        panic!("Cannot allocate {n} words");
    }
} // mod dynamic

// mod vec_tests

#[cfg(test)]
mod dynamic_tests {
    use super::*;

    type DynamicWordStore = super::dynamic::DynamicWordStore<u32>;

    #[test]
    fn empty() {
        let store = DynamicWordStore::default();

        assert_eq!(0, store.len());
        assert_eq!(0, store.capacity());
        assert!(store.words().is_empty());
    }

    #[test]
    fn push_pop() {
        let mut store = DynamicWordStore::new();

        for i in 0..5 {
            store.push(i);
        }

        assert_eq!(&[0, 1, 2, 3, 4][..], store.words());
        assert_eq!(8, store.capacity());

        assert_eq!(Some(4), store.pop());
        assert_eq!(Some(3), store.pop());

        assert_eq!(&[0, 1, 2][..], store.words());
        assert_eq!(8, store.capacity());
    }

    #[test]
    fn pop_empty() {
        let mut store = DynamicWordStore::new();

        assert_eq!(None, store.pop());
    }

    #[test]
    fn resize() {
        let mut store = DynamicWordStore::new();

        store.push(7);
        store.resize(4, u32::ALL_ONES);

        assert_eq!(&[7, u32::ALL_ONES, u32::ALL_ONES, u32::ALL_ONES][..], store.words());

        store.resize(2, u32::ALL_ZEROS);

        assert_eq!(&[7, u32::ALL_ONES][..], store.words());
    }

    #[test]
    fn reserve() {
        let mut store = DynamicWordStore::new();

        store.reserve(5);

        assert_eq!(8, store.capacity());
        assert_eq!(0, store.len());

        store.reserve(3);

        assert_eq!(8, store.capacity());
    }

    #[test]
    fn try_reserve_overflow() {
        let mut store = DynamicWordStore::new();

        assert_eq!(Err(WordStoreError), store.try_reserve(usize::MAX));
        assert_eq!(0, store.capacity());
    }

    #[test]
    fn shrink_to() {
        let mut store = DynamicWordStore::new();

        store.resize(9, 3);

        assert_eq!(16, store.capacity());

        store.truncate(2);
        store.shrink_to(0);

        assert_eq!(2, store.capacity());
        assert_eq!(&[3, 3][..], store.words());

        store.clear();
        store.shrink_to(0);

        assert_eq!(0, store.capacity());
    }

    #[test]
    fn clone() {
        let mut store = DynamicWordStore::new();

        store.push(0b1001);
        store.push(0b0110);

        let clone = store.clone();

        assert_eq!(store, clone);
        assert_eq!(&[0b1001, 0b0110][..], clone.words());
    }
} // mod dynamic_tests
