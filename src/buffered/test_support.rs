//! Test support utilities - only compiled in test builds.

use core::{
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
    time::Duration,
};
use std::{
    collections::VecDeque,
    sync::{Condvar, Mutex},
    vec::Vec,
};

use crate::buffered::{
    GrantError,
    device::UartDevice,
    grant::{AccessControl, KernelObject, MemoryRegion},
    signal::WakeSignal,
    storage::UartBuffered,
    timer::OneShotTimer,
};

pub const TEST_RX_TIMEOUT: Duration = Duration::from_millis(5);

/// Standard test configuration: 8-byte receive and transmit fifos
pub type TestUart = UartBuffered<MockUart, TestSignal, ManualTimer, 8, 8>;

/// Helper to create a default test channel
pub fn test_uart() -> TestUart {
    UartBuffered::new(
        MockUart::new(),
        TestSignal::new(),
        TestSignal::new(),
        ManualTimer::new(),
        TEST_RX_TIMEOUT,
    )
}

/// UART whose receive side is fed by the test and whose transmit side
/// records every byte written. The transmitter accepts `tx_budget` more
/// bytes before reporting not-ready.
pub struct MockUart {
    rx: Mutex<VecDeque<u8>>,
    sent: Mutex<Vec<u8>>,
    tx_budget: AtomicUsize,
    rx_irq: AtomicBool,
    tx_irq: AtomicBool,
}

impl MockUart {
    pub const fn new() -> Self {
        Self {
            rx: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
            tx_budget: AtomicUsize::new(usize::MAX),
            rx_irq: AtomicBool::new(false),
            tx_irq: AtomicBool::new(false),
        }
    }

    /// Queues bytes as if they arrived on the wire.
    pub fn feed(&self, data: &[u8]) {
        self.rx.lock().unwrap().extend(data.iter().copied());
    }

    pub fn rx_pending(&self) -> usize {
        self.rx.lock().unwrap().len()
    }

    pub fn sent(&self) -> Vec<u8> {
        self.sent.lock().unwrap().clone()
    }

    pub fn set_tx_budget(&self, budget: usize) {
        self.tx_budget.store(budget, Ordering::SeqCst);
    }

    pub fn rx_irq_enabled(&self) -> bool {
        self.rx_irq.load(Ordering::SeqCst)
    }

    pub fn tx_irq_enabled(&self) -> bool {
        self.tx_irq.load(Ordering::SeqCst)
    }
}

impl UartDevice for MockUart {
    fn rx_ready(&self) -> bool {
        !self.rx.lock().unwrap().is_empty()
    }

    fn read_byte(&self) -> u8 {
        self.rx.lock().unwrap().pop_front().expect("read_byte without rx_ready")
    }

    fn tx_ready(&self) -> bool {
        self.tx_budget.load(Ordering::SeqCst) > 0
    }

    fn write_byte(&self, byte: u8) {
        let budget = self.tx_budget.load(Ordering::SeqCst);
        assert!(budget > 0, "write_byte without tx_ready");
        if budget != usize::MAX {
            self.tx_budget.store(budget - 1, Ordering::SeqCst);
        }
        self.sent.lock().unwrap().push(byte);
    }

    fn enable_rx_irq(&self) {
        self.rx_irq.store(true, Ordering::SeqCst);
    }

    fn disable_rx_irq(&self) {
        self.rx_irq.store(false, Ordering::SeqCst);
    }

    fn enable_tx_irq(&self) {
        self.tx_irq.store(true, Ordering::SeqCst);
    }

    fn disable_tx_irq(&self) {
        self.tx_irq.store(false, Ordering::SeqCst);
    }
}

/// Latched wake-all signal built on a condvar.
pub struct TestSignal {
    raised: Mutex<bool>,
    cond: Condvar,
}

impl TestSignal {
    pub const fn new() -> Self {
        Self {
            raised: Mutex::new(false),
            cond: Condvar::new(),
        }
    }

    pub fn is_raised(&self) -> bool {
        *self.raised.lock().unwrap()
    }
}

impl WakeSignal for TestSignal {
    fn raise(&self) {
        *self.raised.lock().unwrap() = true;
        self.cond.notify_all();
    }

    fn reset(&self) {
        *self.raised.lock().unwrap() = false;
    }

    fn wait(&self) {
        let mut raised = self.raised.lock().unwrap();
        while !*raised {
            raised = self.cond.wait(raised).unwrap();
        }
    }
}

/// Timer that never expires on its own; tests fire it explicitly.
pub struct ManualTimer {
    armed: Mutex<Option<Duration>>,
    starts: AtomicUsize,
    stops: AtomicUsize,
}

impl ManualTimer {
    pub const fn new() -> Self {
        Self {
            armed: Mutex::new(None),
            starts: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
        }
    }

    pub fn armed(&self) -> Option<Duration> {
        *self.armed.lock().unwrap()
    }

    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    /// Expires the timer. Returns false if it was not armed.
    pub fn fire(&self) -> bool {
        self.armed.lock().unwrap().take().is_some()
    }
}

impl OneShotTimer for ManualTimer {
    fn start(&self, delay: Duration) {
        *self.armed.lock().unwrap() = Some(delay);
        self.starts.fetch_add(1, Ordering::SeqCst);
    }

    fn stop(&self) {
        *self.armed.lock().unwrap() = None;
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Access control that accepts kernel objects but refuses all memory.
pub struct DenyMemory;

impl AccessControl for DenyMemory {
    type Thread = ();

    fn grant_object(&self, _thread: &(), _object: KernelObject) -> Result<(), GrantError> {
        Ok(())
    }

    fn grant_memory(&self, _thread: &(), _region: MemoryRegion) -> Result<(), GrantError> {
        Err(GrantError::MemoryDenied)
    }
}
