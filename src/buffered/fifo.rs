#![allow(unsafe_code)]

use core::{
    cell::UnsafeCell,
    sync::atomic::{AtomicU16, Ordering},
};

/// One byte of ring storage, written by the producer and read by the consumer.
#[repr(transparent)]
pub struct ByteCell(UnsafeCell<u8>);

/// Single-producer/single-consumer byte ring.
///
/// `write` and `read` are free-running 16-bit counters; the number of bytes
/// queued is their wrapping difference. Only the producer advances `write`
/// and only the consumer advances `read`, so neither side needs a lock.
///
/// The storage is the trailing field, so a sized [`FifoArray<N>`] coerces to
/// the unsized `Fifo` that handles refer to, keeping the capacity out of the
/// handle types.
pub struct Fifo<B: ?Sized = [ByteCell]> {
    write: AtomicU16,
    read: AtomicU16,
    buf: B,
}

/// Ring with `N` bytes of inline storage.
///
/// `N` must be a power of two no larger than `2^15`. Anything else fails to
/// compile once the ring is constructed:
///
/// ```compile_fail
/// use uart_buffered::buffered::FifoArray;
///
/// let fifo = FifoArray::<5>::new();
/// ```
pub type FifoArray<const N: usize> = Fifo<[ByteCell; N]>;

// SAFETY: every cell is written only by the producer before it publishes the
// slot with a release store of `write`, and read only by the consumer before it
// releases the slot with a release store of `read`.
unsafe impl<B: ?Sized + Send> Sync for Fifo<B> {}

impl<const N: usize> Fifo<[ByteCell; N]> {
    pub(crate) const CAPACITY_OK: () = assert!(
        N.is_power_of_two() && N <= 1 << 15,
        "fifo size must be a power of 2 no larger than 32768"
    );

    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_OK;

        Self {
            write: AtomicU16::new(0),
            read: AtomicU16::new(0),
            buf: [const { ByteCell(UnsafeCell::new(0)) }; N],
        }
    }

    /// Returns the capacity-erased view used by handles and the bridge.
    #[inline]
    pub fn as_fifo(&self) -> &Fifo {
        self
    }
}

impl<const N: usize> Default for Fifo<[ByteCell; N]> {
    fn default() -> Self {
        Self::new()
    }
}

impl Fifo {
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    fn capacity_mask(&self) -> usize {
        self.buf.len() - 1
    }

    /// Number of bytes queued.
    ///
    /// Exact for the producer and the consumer. An observer holding neither
    /// role gets a snapshot in `0..=capacity` that may already be stale.
    #[inline]
    pub fn used(&self) -> usize {
        // `read` first: counters only advance, so the later `write` never
        // falls behind it.
        let read = self.read.load(Ordering::Acquire);
        let write = self.write.load(Ordering::Acquire);
        (write.wrapping_sub(read) as usize).min(self.capacity())
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.used() >= self.capacity()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.used() == 0
    }

    /// Appends a byte.
    ///
    /// # Panics
    /// Panics if the ring is full.
    ///
    /// # Safety
    /// The caller must be the only producer of this ring for the duration of
    /// the call.
    #[inline]
    pub unsafe fn push(&self, val: u8) {
        assert!(!self.is_full(), "push to full fifo");
        let write = self.write.load(Ordering::Relaxed);
        let slot = &self.buf[write as usize & self.capacity_mask()];
        unsafe { *slot.0.get() = val };
        self.write.store(write.wrapping_add(1), Ordering::Release);
    }

    /// Returns the oldest byte without removing it.
    ///
    /// # Panics
    /// Panics if the ring is empty.
    ///
    /// # Safety
    /// The caller must be the only consumer of this ring for the duration of
    /// the call.
    #[inline]
    pub unsafe fn peek(&self) -> u8 {
        assert!(!self.is_empty(), "peek from empty fifo");
        let read = self.read.load(Ordering::Relaxed);
        let slot = &self.buf[read as usize & self.capacity_mask()];
        unsafe { *slot.0.get() }
    }

    /// Removes and returns the oldest byte.
    ///
    /// # Panics
    /// Panics if the ring is empty.
    ///
    /// # Safety
    /// The caller must be the only consumer of this ring for the duration of
    /// the call.
    #[inline]
    pub unsafe fn pop(&self) -> u8 {
        let val = unsafe { self.peek() };
        let read = self.read.load(Ordering::Relaxed);
        self.read.store(read.wrapping_add(1), Ordering::Release);
        val
    }
}

impl<B: ?Sized> core::fmt::Debug for Fifo<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Fifo")
            .field("write", &self.write.load(Ordering::Relaxed))
            .field("read", &self.read.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
