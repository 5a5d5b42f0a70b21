//! Loopback example: a simulated UART whose transmitter is wired to its receiver
//!
//! This example demonstrates:
//! - Declaring a buffered channel as a `static`
//! - A simulated interrupt line driving the bridge and the receive timeout
//! - Granting a worker thread access to the channel
//! - Blocking writes that stall on a small transmit fifo
//! - Blocking reads that return whatever has arrived

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use uart_buffered::prelude::*;

const MESSAGE: &[u8] = b"hello from a granted thread over a looped-back uart\n";

/// Depth of the simulated hardware fifo between transmitter and receiver.
const WIRE_DEPTH: usize = 4;

struct LoopbackUart {
    wire: Mutex<VecDeque<u8>>,
    rx_irq: AtomicBool,
    tx_irq: AtomicBool,
}

impl LoopbackUart {
    const fn new() -> Self {
        Self {
            wire: Mutex::new(VecDeque::new()),
            rx_irq: AtomicBool::new(false),
            tx_irq: AtomicBool::new(false),
        }
    }

    /// Level of the simulated interrupt line.
    fn irq_pending(&self) -> bool {
        let rx = self.rx_irq.load(Ordering::Acquire) && !self.wire.lock().unwrap().is_empty();
        rx || self.tx_irq.load(Ordering::Acquire)
    }
}

impl UartDevice for LoopbackUart {
    fn rx_ready(&self) -> bool {
        !self.wire.lock().unwrap().is_empty()
    }

    fn read_byte(&self) -> u8 {
        self.wire.lock().unwrap().pop_front().unwrap_or(0)
    }

    fn tx_ready(&self) -> bool {
        self.wire.lock().unwrap().len() < WIRE_DEPTH
    }

    fn write_byte(&self, byte: u8) {
        self.wire.lock().unwrap().push_back(byte);
    }

    fn enable_rx_irq(&self) {
        self.rx_irq.store(true, Ordering::Release);
    }

    fn disable_rx_irq(&self) {
        self.rx_irq.store(false, Ordering::Release);
    }

    fn enable_tx_irq(&self) {
        self.tx_irq.store(true, Ordering::Release);
    }

    fn disable_tx_irq(&self) {
        self.tx_irq.store(false, Ordering::Release);
    }
}

struct CondvarSignal {
    raised: Mutex<bool>,
    cond: Condvar,
}

impl CondvarSignal {
    const fn new() -> Self {
        Self {
            raised: Mutex::new(false),
            cond: Condvar::new(),
        }
    }
}

impl WakeSignal for CondvarSignal {
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

struct DeadlineTimer {
    deadline: Mutex<Option<Instant>>,
}

impl DeadlineTimer {
    const fn new() -> Self {
        Self {
            deadline: Mutex::new(None),
        }
    }

    /// Disarms and returns true once the deadline has passed.
    fn take_expired(&self) -> bool {
        let mut deadline = self.deadline.lock().unwrap();
        match *deadline {
            Some(at) if Instant::now() >= at => {
                *deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl OneShotTimer for &DeadlineTimer {
    fn start(&self, delay: Duration) {
        *self.deadline.lock().unwrap() = Some(Instant::now() + delay);
    }

    fn stop(&self) {
        *self.deadline.lock().unwrap() = None;
    }
}

type Channel = UartBuffered<&'static LoopbackUart, CondvarSignal, &'static DeadlineTimer, 64, 16>;

static WIRE: LoopbackUart = LoopbackUart::new();
static TIMER: DeadlineTimer = DeadlineTimer::new();
static UART: Channel = UartBuffered::new(
    &WIRE,
    CondvarSignal::new(),
    CondvarSignal::new(),
    &TIMER,
    Duration::from_millis(20),
);
static GRANTS: GrantTable<u32, 8> = GrantTable::new();
static RUNNING: AtomicBool = AtomicBool::new(false);

const WORKER_THREAD: u32 = 1;

fn main() {
    println!("=== Loopback Example ===\n");

    UART.init();
    RUNNING.store(true, Ordering::Release);

    // Simulated interrupt controller: services the UART line and the timer.
    let irq = thread::spawn(|| {
        while RUNNING.load(Ordering::Acquire) {
            if WIRE.irq_pending() {
                UART.on_interrupt();
            }
            if TIMER.take_expired() {
                UART.rx_timeout();
            }
            thread::sleep(Duration::from_micros(200));
        }
    });

    let granted = UART
        .access_grant(&GRANTS, &WORKER_THREAD)
        .expect("grant table has room for one channel");
    println!("Kernel: granted thread {WORKER_THREAD} ({} rights)", GRANTS.len());

    let tx = granted.tx_handle();
    let writer = thread::spawn(move || {
        println!("Worker: writing {} bytes through a {}-byte fifo", MESSAGE.len(), tx.capacity());
        tx.write(MESSAGE);
        println!("Worker: all bytes queued");
    });

    let rx = granted.rx_handle();
    let mut received = Vec::with_capacity(MESSAGE.len());
    let mut buf = [0u8; 16];
    while received.len() < MESSAGE.len() {
        let n = rx.read(&mut buf);
        println!("Reader: got {n} bytes: {:?}", String::from_utf8_lossy(&buf[..n]));
        received.extend_from_slice(&buf[..n]);
    }

    writer.join().unwrap();
    RUNNING.store(false, Ordering::Release);
    irq.join().unwrap();

    assert_eq!(received, MESSAGE);
    println!("\nStats: {:?}", UART.stats());
    println!("Loopback complete");
}
