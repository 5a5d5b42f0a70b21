use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Vec;

use crate::buffered::{
    error::GrantError,
    handle::{RxHandle, TxHandle},
    storage::UartBuffered,
};

/// Kernel objects a thread needs before it can use a channel's handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    RxSignal,
    TxSignal,
    RxTimer,
}

impl core::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ObjectKind::RxSignal => write!(f, "rx signal"),
            ObjectKind::TxSignal => write!(f, "tx signal"),
            ObjectKind::RxTimer => write!(f, "rx timer"),
        }
    }
}

/// A kernel object identified by its address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelObject {
    pub kind: ObjectKind,
    pub addr: usize,
}

impl KernelObject {
    pub fn new<O>(kind: ObjectKind, object: &O) -> Self {
        Self {
            kind,
            addr: object as *const O as usize,
        }
    }
}

/// Memory range `[start, start + len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRegion {
    pub start: usize,
    pub len: usize,
}

impl MemoryRegion {
    /// Region covering exactly the memory of `value`.
    pub fn of<V: ?Sized>(value: &V) -> Self {
        Self {
            start: value as *const V as *const u8 as usize,
            len: core::mem::size_of_val(value),
        }
    }

    /// One past the last byte.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Returns true if `other` lies entirely within this region.
    pub fn covers(&self, other: &MemoryRegion) -> bool {
        other.start >= self.start && other.end() <= self.end()
    }
}

/// Platform memory-protection hook used by [`UartBuffered::access_grant`].
///
/// Grants are one-way: there is no revoke, a granted right is assumed to
/// last for the thread's lifetime.
pub trait AccessControl {
    /// Platform identifier for a thread.
    type Thread: ?Sized;

    /// Gives `thread` permission to use `object`.
    fn grant_object(&self, thread: &Self::Thread, object: KernelObject) -> Result<(), GrantError>;

    /// Gives `thread` read/write access to `region`.
    fn grant_memory(&self, thread: &Self::Thread, region: MemoryRegion) -> Result<(), GrantError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GrantEntry<Id> {
    Object(Id, KernelObject),
    Memory(Id, MemoryRegion),
}

/// Fixed-capacity record of granted rights.
///
/// Usable as the [`AccessControl`] backend on targets where the channel
/// itself tracks permissions, and as a stand-in for the platform MPU on
/// hosts. Holds up to `N` grants; re-granting an existing right is free.
pub struct GrantTable<Id, const N: usize> {
    entries: Mutex<RefCell<Vec<GrantEntry<Id>, N>>>,
}

impl<Id, const N: usize> GrantTable<Id, N> {
    pub const fn new() -> Self {
        Self {
            entries: Mutex::new(RefCell::new(Vec::new())),
        }
    }
}

impl<Id, const N: usize> Default for GrantTable<Id, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id: Copy + PartialEq, const N: usize> GrantTable<Id, N> {
    /// Number of recorded grants.
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.entries.borrow_ref(cs).len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `thread` was granted `object`.
    pub fn has_object(&self, thread: Id, object: KernelObject) -> bool {
        critical_section::with(|cs| {
            self.entries
                .borrow_ref(cs)
                .iter()
                .any(|e| *e == GrantEntry::Object(thread, object))
        })
    }

    /// Returns true if a single grant to `thread` covers all of `region`.
    pub fn has_memory(&self, thread: Id, region: MemoryRegion) -> bool {
        critical_section::with(|cs| {
            self.entries.borrow_ref(cs).iter().any(|e| match e {
                GrantEntry::Memory(id, granted) => *id == thread && granted.covers(&region),
                GrantEntry::Object(..) => false,
            })
        })
    }

    fn record(&self, entry: GrantEntry<Id>) -> Result<(), GrantError> {
        critical_section::with(|cs| {
            let mut entries = self.entries.borrow_ref_mut(cs);
            if entries.contains(&entry) {
                return Ok(());
            }
            entries.push(entry).map_err(|_| GrantError::Exhausted)
        })
    }
}

impl<Id: Copy + PartialEq, const N: usize> AccessControl for GrantTable<Id, N> {
    type Thread = Id;

    fn grant_object(&self, thread: &Id, object: KernelObject) -> Result<(), GrantError> {
        self.record(GrantEntry::Object(*thread, object))
    }

    fn grant_memory(&self, thread: &Id, region: MemoryRegion) -> Result<(), GrantError> {
        self.record(GrantEntry::Memory(*thread, region))
    }
}

impl<Id, const N: usize> core::fmt::Debug for GrantTable<Id, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GrantTable")
            .field("capacity", &N)
            .finish_non_exhaustive()
    }
}

/// Proof that a thread was granted access to a channel.
///
/// Exposes only the handles; the privileged parts of the channel (bridge,
/// timeout, init) stay with the kernel.
#[must_use]
pub struct Granted<'a, D, S, T, const RX: usize, const TX: usize> {
    channel: &'a UartBuffered<D, S, T, RX, TX>,
}

impl<'a, D, S, T, const RX: usize, const TX: usize> Granted<'a, D, S, T, RX, TX> {
    pub fn rx_handle(&self) -> RxHandle<'a, D, S, T> {
        self.channel.rx_handle()
    }

    pub fn tx_handle(&self) -> TxHandle<'a, D, S> {
        self.channel.tx_handle()
    }
}

impl<D, S, T, const RX: usize, const TX: usize> core::fmt::Debug for Granted<'_, D, S, T, RX, TX> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Granted").finish_non_exhaustive()
    }
}

impl<D, S, T, const RX: usize, const TX: usize> UartBuffered<D, S, T, RX, TX> {
    /// Grants `thread` everything it needs to use this channel's handles.
    ///
    /// Covers both wake signals, the receive timer and the memory of both
    /// fifos. Stops at the first refused grant and returns its error; rights
    /// granted before the failure are kept. The channel remains usable from
    /// privileged context either way.
    pub fn access_grant<A: AccessControl>(
        &self,
        access: &A,
        thread: &A::Thread,
    ) -> Result<Granted<'_, D, S, T, RX, TX>, GrantError> {
        match self.grant_all(access, thread) {
            Ok(()) => {
                log::info!("uart-buffered: access granted");
                Ok(Granted { channel: self })
            }
            Err(e) => {
                log::warn!("uart-buffered: access grant failed: {e}");
                Err(e)
            }
        }
    }

    fn grant_all<A: AccessControl>(&self, access: &A, thread: &A::Thread) -> Result<(), GrantError> {
        access.grant_object(thread, KernelObject::new(ObjectKind::RxSignal, &self.rx.signal))?;
        access.grant_object(thread, KernelObject::new(ObjectKind::TxSignal, &self.tx.signal))?;
        access.grant_object(thread, KernelObject::new(ObjectKind::RxTimer, &self.rx.timer))?;
        access.grant_memory(thread, MemoryRegion::of(&self.rx.fifo))?;
        access.grant_memory(thread, MemoryRegion::of(&self.tx.fifo))?;
        Ok(())
    }
}
