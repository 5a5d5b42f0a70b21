use core::sync::atomic::{AtomicU32, Ordering};

/// Snapshot of channel traffic counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UartStats {
    /// Bytes moved from hardware into the receive fifo.
    pub rx_bytes: u32,
    /// Bytes moved from the transmit fifo to hardware.
    pub tx_bytes: u32,
    /// Received bytes dropped because the receive fifo was full.
    pub rx_overruns: u32,
}

/// Counters updated only by the interrupt bridge.
///
/// Having a single writer lets the counters use plain load/store, which
/// every target with atomics supports.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    rx_bytes: AtomicU32,
    tx_bytes: AtomicU32,
    rx_overruns: AtomicU32,
}

impl Counters {
    pub(crate) const fn new() -> Self {
        Self {
            rx_bytes: AtomicU32::new(0),
            tx_bytes: AtomicU32::new(0),
            rx_overruns: AtomicU32::new(0),
        }
    }

    pub(crate) fn add_rx(&self, n: u32) {
        bump(&self.rx_bytes, n);
    }

    pub(crate) fn add_tx(&self, n: u32) {
        bump(&self.tx_bytes, n);
    }

    pub(crate) fn add_overruns(&self, n: u32) {
        bump(&self.rx_overruns, n);
    }

    pub(crate) fn snapshot(&self) -> UartStats {
        UartStats {
            rx_bytes: self.rx_bytes.load(Ordering::Relaxed),
            tx_bytes: self.tx_bytes.load(Ordering::Relaxed),
            rx_overruns: self.rx_overruns.load(Ordering::Relaxed),
        }
    }
}

fn bump(counter: &AtomicU32, n: u32) {
    if n != 0 {
        let v = counter.load(Ordering::Relaxed);
        counter.store(v.wrapping_add(n), Ordering::Relaxed);
    }
}
