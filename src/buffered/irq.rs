#![allow(unsafe_code)]

use crate::buffered::{
    device::UartDevice, signal::WakeSignal, storage::UartBuffered, timer::OneShotTimer,
};

impl<D, S, T, const RX: usize, const TX: usize> UartBuffered<D, S, T, RX, TX>
where
    D: UartDevice,
    S: WakeSignal,
    T: OneShotTimer,
{
    /// Services the UART interrupt.
    ///
    /// Wraps [`Self::on_interrupt_unchecked`] in a critical section. The
    /// section lasts as long as the hardware keeps reporting ready, so its
    /// length is bounded by the device's own fifo depth rather than by the
    /// size of any application transfer.
    pub fn on_interrupt(&self) {
        critical_section::with(|_| unsafe { self.on_interrupt_unchecked() })
    }

    /// Services the UART interrupt without entering a critical section.
    ///
    /// Moves received bytes from hardware into the receive fifo and queued
    /// bytes from the transmit fifo into hardware, then wakes whichever side
    /// made progress. Received bytes that find the fifo full are dropped and
    /// counted as overruns.
    ///
    /// # Safety
    /// The bridge is the sole producer of the receive fifo and sole consumer
    /// of the transmit fifo. The caller must guarantee this function is never
    /// re-entered or run concurrently with itself, which holds when it is
    /// called only from the UART interrupt handler on a single core.
    pub unsafe fn on_interrupt_unchecked(&self) {
        unsafe {
            self.drain_rx();
            self.fill_tx();
        }
    }

    unsafe fn drain_rx(&self) {
        let fifo = self.rx.fifo.as_fifo();
        let mut pushed = 0u32;
        let mut dropped = 0u32;

        while self.device.rx_ready() {
            let byte = self.device.read_byte();
            if fifo.is_full() {
                dropped += 1;
                continue;
            }
            unsafe { fifo.push(byte) };
            pushed += 1;
        }

        self.counters.add_overruns(dropped);
        if pushed > 0 {
            self.counters.add_rx(pushed);
            self.rx.signal.raise();
            self.rx.timer.start(self.rx_timeout);
        }
    }

    unsafe fn fill_tx(&self) {
        let fifo = self.tx.fifo.as_fifo();
        let mut popped = 0u32;

        while self.device.tx_ready() && !fifo.is_empty() {
            self.device.write_byte(unsafe { fifo.pop() });
            popped += 1;
        }

        if fifo.is_empty() {
            self.device.disable_tx_irq();
        }
        if popped > 0 {
            self.counters.add_tx(popped);
            self.tx.signal.raise();
        }
    }
}

impl<D, S, T, const RX: usize, const TX: usize> UartBuffered<D, S, T, RX, TX>
where
    S: WakeSignal,
{
    /// Receive timeout expiry. Route the timer callback here.
    ///
    /// Wakes blocked readers so they consume whatever is buffered.
    pub fn rx_timeout(&self) {
        log::trace!("uart-buffered: rx timeout");
        self.rx.signal.raise();
    }
}
