#![allow(unsafe_code)]

use crate::buffered::{device::UartDevice, handle::TxHandle, signal::WakeSignal};

impl<D, S> TxHandle<'_, D, S>
where
    D: UartDevice,
    S: WakeSignal,
{
    /// Queues as many bytes of `data` as fit without blocking.
    ///
    /// Returns the number of bytes queued, which may be short of `data.len()`
    /// and is 0 when the transmit fifo is full. Enables the transmit interrupt
    /// whenever bytes are waiting so the bridge picks them up. Each byte is
    /// pushed in its own critical section, so the interrupt bridge is held off
    /// for at most one byte at a time.
    pub fn write_nb(&self, data: &[u8]) -> usize {
        let mut n = 0;
        for &byte in data {
            if !critical_section::with(|_| self.push_one(byte)) {
                break;
            }
            n += 1;
        }
        self.kick();
        n
    }

    /// Like [`Self::write_nb`] but without serialising against other writers.
    ///
    /// # Safety
    /// No other thread may write to this channel concurrently, and the
    /// interrupt bridge must not run on another core while this executes;
    /// the transmit fifo supports exactly one producer at a time.
    pub unsafe fn write_nb_unchecked(&self, data: &[u8]) -> usize {
        let mut n = 0;
        for &byte in data {
            if !self.push_one(byte) {
                break;
            }
            n += 1;
        }
        self.kick();
        n
    }

    /// Queues all of `data`, blocking while the transmit fifo is full.
    ///
    /// Returns once the last byte is in the fifo, not once it has left the
    /// hardware.
    pub fn write(&self, data: &[u8]) {
        let mut rest = data;
        while !rest.is_empty() {
            self.signal.reset();
            let n = self.write_nb(rest);
            rest = &rest[n..];
            if n == 0 {
                self.signal.wait();
            } else if !self.fifo.is_full() {
                // Pass on a raise the reset may have taken from other writers.
                self.signal.raise();
            }
        }
    }

    /// Pushes one byte unless the fifo is full. Callers serialise producers.
    #[inline]
    fn push_one(&self, byte: u8) -> bool {
        if self.fifo.is_full() {
            return false;
        }
        unsafe { self.fifo.push(byte) };
        true
    }

    fn kick(&self) {
        if !self.fifo.is_empty() {
            self.device.enable_tx_irq();
        }
    }
}
