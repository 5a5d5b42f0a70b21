use core::marker::PhantomData;

use crate::buffered::fifo::Fifo;

mod rx;
mod tx;

/// Marker for the receive direction.
#[derive(Debug, Clone, Copy)]
pub struct Rx;

/// Marker for the transmit direction.
#[derive(Debug, Clone, Copy)]
pub struct Tx;

/// Copyable set of references needed to operate on one direction of a channel.
///
/// The kernel owns the channel itself; handles are views onto it that may be
/// copied freely and handed to any thread allowed to touch the channel's
/// memory. `Dir` is [`Rx`] or [`Tx`] and decides which side of the fifo the
/// holder may operate: readers only pop, writers only push. `T` is the
/// receive timer for [`Rx`] handles and `()` for [`Tx`] handles.
pub struct Handle<'a, Dir, D, S, T = ()> {
    pub(crate) fifo: &'a Fifo,
    pub(crate) device: &'a D,
    pub(crate) signal: &'a S,
    pub(crate) timer: &'a T,
    _dir: PhantomData<Dir>,
}

/// Handle for reading bytes the interrupt bridge received.
pub type RxHandle<'a, D, S, T> = Handle<'a, Rx, D, S, T>;

/// Handle for queueing bytes for the interrupt bridge to transmit.
pub type TxHandle<'a, D, S> = Handle<'a, Tx, D, S>;

impl<'a, Dir, D, S, T> Handle<'a, Dir, D, S, T> {
    pub(crate) fn new(fifo: &'a Fifo, device: &'a D, signal: &'a S, timer: &'a T) -> Self {
        Self {
            fifo,
            device,
            signal,
            timer,
            _dir: PhantomData,
        }
    }

    /// Fifo capacity in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.fifo.capacity()
    }

    /// Bytes currently queued in the fifo.
    #[inline]
    pub fn used(&self) -> usize {
        self.fifo.used()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.fifo.is_full()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fifo.is_empty()
    }
}

impl<Dir, D, S, T> Clone for Handle<'_, Dir, D, S, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Dir, D, S, T> Copy for Handle<'_, Dir, D, S, T> {}

impl<Dir, D, S, T> core::fmt::Debug for Handle<'_, Dir, D, S, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Handle")
            .field("direction", &core::any::type_name::<Dir>())
            .field("fifo", &self.fifo)
            .finish_non_exhaustive()
    }
}
