use core::time::Duration;

use crate::buffered::{
    fifo::FifoArray,
    storage::{DEFAULT_RX_TIMEOUT, UartBuffered},
};

// Builder states
pub struct NeedRxCapacity;
pub struct NeedTxCapacity;
pub struct NeedRxTimeout;
pub struct Ready {
    rx_timeout: Duration,
}

pub struct UartBufferedBuilder<const RX: usize, const TX: usize, State> {
    state: State,
}

// Start the builder
impl UartBufferedBuilder<0, 0, NeedRxCapacity> {
    pub fn new() -> Self {
        UartBufferedBuilder {
            state: NeedRxCapacity,
        }
    }
}

impl Default for UartBufferedBuilder<0, 0, NeedRxCapacity> {
    fn default() -> Self {
        Self::new()
    }
}

// Set receive fifo capacity
impl UartBufferedBuilder<0, 0, NeedRxCapacity> {
    /// Set the receive fifo capacity in bytes.
    ///
    /// Fails to compile unless `RX` is a power of two no larger than 32768.
    pub fn rx_capacity<const RX: usize>(self) -> UartBufferedBuilder<RX, 0, NeedTxCapacity> {
        #[allow(clippy::let_unit_value)]
        let () = FifoArray::<RX>::CAPACITY_OK;

        UartBufferedBuilder {
            state: NeedTxCapacity,
        }
    }
}

// Set transmit fifo capacity
impl<const RX: usize> UartBufferedBuilder<RX, 0, NeedTxCapacity> {
    /// Set the transmit fifo capacity in bytes.
    ///
    /// Fails to compile unless `TX` is a power of two no larger than 32768.
    pub fn tx_capacity<const TX: usize>(self) -> UartBufferedBuilder<RX, TX, NeedRxTimeout> {
        #[allow(clippy::let_unit_value)]
        let () = FifoArray::<TX>::CAPACITY_OK;

        UartBufferedBuilder {
            state: NeedRxTimeout,
        }
    }
}

// Set receive timeout
impl<const RX: usize, const TX: usize> UartBufferedBuilder<RX, TX, NeedRxTimeout> {
    /// Set how long received data may sit unread before blocked readers are woken.
    ///
    /// # Panics
    /// Panics if `delay` is zero, the same as [`UartBuffered::new`].
    pub fn rx_timeout(self, delay: Duration) -> UartBufferedBuilder<RX, TX, Ready> {
        assert!(!delay.is_zero(), "rx timeout must be non-zero");

        UartBufferedBuilder {
            state: Ready { rx_timeout: delay },
        }
    }

    /// Use [`DEFAULT_RX_TIMEOUT`].
    pub fn default_rx_timeout(self) -> UartBufferedBuilder<RX, TX, Ready> {
        self.rx_timeout(DEFAULT_RX_TIMEOUT)
    }
}

// Build the final channel
impl<const RX: usize, const TX: usize> UartBufferedBuilder<RX, TX, Ready> {
    /// Build the channel around its device, wake signals and receive timer.
    pub fn build<D, S, T>(
        self,
        device: D,
        rx_signal: S,
        tx_signal: S,
        timer: T,
    ) -> UartBuffered<D, S, T, RX, TX> {
        UartBuffered::new(device, rx_signal, tx_signal, timer, self.state.rx_timeout)
    }
}
