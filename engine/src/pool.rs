// Growable order-record allocator
//
// A singly-linked free list over fixed-size blocks, in the spirit of
// common::mem_pool::MemPool, but growable: instead of failing when the
// initial capacity is exhausted, a new block is appended and its indices
// are pushed onto the free list. Blocks are never returned to the OS until
// the pool itself is dropped.
//
// # Safety Invariants
//
// Single-threaded use only (the engine never shares a book across
// threads, per its concurrency contract). A `usize` handle returned by
// `acquire` must not be read after `release` and must be released at most
// once.

use std::mem::MaybeUninit;

/// A block-growable pool of `Order` records.
///
/// Acquire is O(1) amortized: it pops from the free list, or allocates a
/// new block of `block_capacity` slots when the free list is empty.
/// Release is O(1): it pushes the slot's index back onto the free list.
pub struct OrderPool<T> {
    blocks: Vec<Box<[MaybeUninit<T>]>>,
    free: Vec<usize>,
    block_capacity: usize,
}

impl<T> OrderPool<T> {
    /// Default block size, matching the reference capacity named in the
    /// engine's allocation contract.
    pub const DEFAULT_BLOCK_CAPACITY: usize = 4096;

    /// Creates an empty pool that grows in blocks of `block_capacity`
    /// records. The first block is allocated lazily on first `acquire`.
    ///
    /// # Panics
    ///
    /// Panics if `block_capacity` is 0.
    pub fn new(block_capacity: usize) -> Self {
        assert!(block_capacity > 0, "block_capacity must be greater than 0");
        Self {
            blocks: Vec::new(),
            free: Vec::new(),
            block_capacity,
        }
    }

    fn grow(&mut self) {
        let block_index = self.blocks.len();
        let base = block_index * self.block_capacity;

        let mut block = Vec::with_capacity(self.block_capacity);
        block.resize_with(self.block_capacity, MaybeUninit::uninit);
        self.blocks.push(block.into_boxed_slice());

        // Push in descending order so acquire() hands out ascending indices,
        // which keeps related allocations close together in the common case.
        self.free.extend((0..self.block_capacity).rev().map(|i| base + i));
    }

    /// Acquires a slot for one order record, writing `value` into it.
    /// Returns a stable index into the pool that can be used with
    /// `get`/`get_mut`/`release` until the slot is released.
    ///
    /// O(1) amortized: allocates a new block only when the free list is
    /// empty, which happens once every `block_capacity` acquisitions.
    pub fn acquire(&mut self, value: T) -> usize {
        if self.free.is_empty() {
            self.grow();
        }

        // SAFETY: grow() guarantees the free list is non-empty here.
        let index = self.free.pop().expect("pool grown but still empty");
        let (block, slot) = self.slot_location(index);
        self.blocks[block][slot].write(value);
        index
    }

    /// Returns a slot to the pool. The index must have come from `acquire`
    /// and must not have already been released (no double-free).
    pub fn release(&mut self, index: usize) {
        debug_assert!(
            index < self.blocks.len() * self.block_capacity,
            "index out of bounds for this pool"
        );
        self.free.push(index);
    }

    fn slot_location(&self, index: usize) -> (usize, usize) {
        (index / self.block_capacity, index % self.block_capacity)
    }

    /// Returns a shared reference to the record at `index`.
    ///
    /// # Safety contract
    ///
    /// The caller must ensure `index` refers to a currently-acquired slot.
    #[inline]
    pub fn get(&self, index: usize) -> &T {
        let (block, slot) = self.slot_location(index);
        // SAFETY: caller guarantees `index` is an acquired, initialized slot.
        unsafe { self.blocks[block][slot].assume_init_ref() }
    }

    /// Returns a mutable reference to the record at `index`.
    ///
    /// # Safety contract
    ///
    /// The caller must ensure `index` refers to a currently-acquired slot
    /// and that no other reference to it is live.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> &mut T {
        let (block, slot) = self.slot_location(index);
        // SAFETY: caller guarantees `index` is an acquired, initialized slot.
        unsafe { self.blocks[block][slot].assume_init_mut() }
    }

    /// Total capacity allocated so far (free + in-use slots).
    pub fn capacity(&self) -> usize {
        self.blocks.len() * self.block_capacity
    }

    /// Number of free (available) slots.
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// The block size this pool grows by.
    pub fn block_capacity(&self) -> usize {
        self.block_capacity
    }
}
