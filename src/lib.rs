//! A `no_std`, no-alloc buffered UART transport for interrupt-driven systems.
//!
//! This crate decouples a UART interrupt handler from application threads with
//! two lock-free single-producer/single-consumer ring buffers, one per
//! direction, each paired with a wake signal.
//!
//! # Features
//!
//! - **Zero heap allocation** - Ring storage is sized by const generics
//! - **Lock-free rings** - 16-bit wrapping counters, one writer and one reader each
//! - **Direction-tagged handles** - Pushing into the receive ring is a type error
//! - **Bounded receive latency** - A one-shot timer wakes readers of partial data
//! - **Privilege split** - Kernel owns the channel, granted threads get handles
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   rx fifo   ┌──────────────────────────┐
//! │   Application    │◀────────────│   Interrupt bridge       │
//! │                  │  rx signal  │                          │
//! │  read() / read_nb│◀────────────│  on_interrupt()          │
//! │                  │             │  (drains hardware rx,    │
//! │ write()/write_nb │────────────▶│   refills hardware tx)   │
//! │                  │   tx fifo   │                          │
//! │                  │◀────────────│  rx_timeout()            │
//! │                  │  tx signal  │  (timer expiry)          │
//! └──────────────────┘             └──────────────────────────┘
//! ```
//!
//! - The **bridge** is the only producer of the receive ring and the only
//!   consumer of the transmit ring
//! - **Readers** block on the receive signal while the receive ring is empty
//! - **Writers** block on the transmit signal while the transmit ring is full
//! - The **timeout monitor** raises the receive signal if received data sits
//!   unread for the configured delay
//!
//! # Example
//!
//! ```rust,no_run
//! use uart_buffered::prelude::*;
//! # use core::time::Duration;
//! # struct Pl011;
//! # impl Pl011 { const fn new() -> Self { Pl011 } }
//! # impl UartDevice for Pl011 {
//! #     fn rx_ready(&self) -> bool { false }
//! #     fn read_byte(&self) -> u8 { 0 }
//! #     fn tx_ready(&self) -> bool { true }
//! #     fn write_byte(&self, _byte: u8) {}
//! #     fn enable_rx_irq(&self) {}
//! #     fn disable_rx_irq(&self) {}
//! #     fn enable_tx_irq(&self) {}
//! #     fn disable_tx_irq(&self) {}
//! # }
//! # struct KSignal;
//! # impl KSignal { const fn new() -> Self { KSignal } }
//! # impl WakeSignal for KSignal {
//! #     fn raise(&self) {}
//! #     fn reset(&self) {}
//! #     fn wait(&self) {}
//! # }
//! # struct KTimer;
//! # impl KTimer { const fn new() -> Self { KTimer } }
//! # impl OneShotTimer for KTimer {
//! #     fn start(&self, _delay: Duration) {}
//! #     fn stop(&self) {}
//! # }
//!
//! static UART: UartBuffered<Pl011, KSignal, KTimer, 64, 64> = UartBuffered::new(
//!     Pl011::new(),
//!     KSignal::new(),
//!     KSignal::new(),
//!     KTimer::new(),
//!     DEFAULT_RX_TIMEOUT,
//! );
//!
//! // Interrupt vector and timer expiry route into the channel.
//! fn uart_isr() {
//!     UART.on_interrupt();
//! }
//! fn timer_expired() {
//!     UART.rx_timeout();
//! }
//!
//! fn echo() -> ! {
//!     UART.init();
//!     let rx = UART.rx_handle();
//!     let tx = UART.tx_handle();
//!     let mut buf = [0u8; 16];
//!     loop {
//!         let n = rx.read(&mut buf);
//!         tx.write(&buf[..n]);
//!     }
//! }
//! # uart_isr();
//! # timer_expired();
//! # echo();
//! ```

#![deny(unsafe_code)]
#![no_std]

#[cfg(test)]
extern crate std;

pub mod buffered;

pub mod prelude {
    pub use crate::buffered::prelude::*;
}

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
pub struct ReadmeDoctests;
