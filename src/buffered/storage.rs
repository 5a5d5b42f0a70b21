use core::time::Duration;

use crate::buffered::{
    device::UartDevice,
    fifo::FifoArray,
    handle::{RxHandle, TxHandle},
    timer::OneShotTimer,
    types::{Counters, UartStats},
};

/// Receive timeout used by [`UartBufferedBuilder::default_rx_timeout`](crate::buffered::UartBufferedBuilder::default_rx_timeout).
pub const DEFAULT_RX_TIMEOUT: Duration = Duration::from_millis(10);

/// Kernel storage for the receive direction.
pub struct UartBufferedRx<S, T, const N: usize> {
    pub(crate) fifo: FifoArray<N>,
    pub(crate) signal: S,
    pub(crate) timer: T,
}

/// Kernel storage for the transmit direction.
pub struct UartBufferedTx<S, const N: usize> {
    pub(crate) fifo: FifoArray<N>,
    pub(crate) signal: S,
}

/// Buffered UART channel owned by the kernel.
///
/// Holds the authoritative fifos, wake signals and receive timer for one
/// UART. Application code never touches this directly; it works through
/// [`RxHandle`] and [`TxHandle`] copies derived from it.
///
/// # Const Generics
/// - `RX`: Receive fifo capacity in bytes (power of two)
/// - `TX`: Transmit fifo capacity in bytes (power of two)
///
/// # Type Parameters
/// - `D`: UART device the channel drives
/// - `S`: Wake signal type, one instance per direction
/// - `T`: One-shot timer backing the receive timeout
pub struct UartBuffered<D, S, T, const RX: usize, const TX: usize> {
    pub(crate) device: D,
    pub(crate) rx: UartBufferedRx<S, T, RX>,
    pub(crate) tx: UartBufferedTx<S, TX>,
    pub(crate) rx_timeout: Duration,
    pub(crate) counters: Counters,
}

impl<D, S, T, const RX: usize, const TX: usize> UartBuffered<D, S, T, RX, TX> {
    /// Creates a channel. Usable in `static` initialisers.
    ///
    /// Fails to compile if `RX` or `TX` is not a power of two.
    ///
    /// # Panics
    /// Panics if `rx_timeout` is zero; in a `static` initialiser this is a
    /// compile error instead.
    pub const fn new(device: D, rx_signal: S, tx_signal: S, timer: T, rx_timeout: Duration) -> Self {
        assert!(!rx_timeout.is_zero(), "rx timeout must be non-zero");

        Self {
            device,
            rx: UartBufferedRx {
                fifo: FifoArray::<RX>::new(),
                signal: rx_signal,
                timer,
            },
            tx: UartBufferedTx {
                fifo: FifoArray::<TX>::new(),
                signal: tx_signal,
            },
            rx_timeout,
            counters: Counters::new(),
        }
    }

    pub fn rx_handle(&self) -> RxHandle<'_, D, S, T> {
        RxHandle::new(
            self.rx.fifo.as_fifo(),
            &self.device,
            &self.rx.signal,
            &self.rx.timer,
        )
    }

    pub fn tx_handle(&self) -> TxHandle<'_, D, S> {
        TxHandle::new(self.tx.fifo.as_fifo(), &self.device, &self.tx.signal, &())
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Delay after the last received byte before blocked readers are woken.
    pub fn rx_timeout_delay(&self) -> Duration {
        self.rx_timeout
    }

    pub fn stats(&self) -> UartStats {
        self.counters.snapshot()
    }
}

impl<D, S, T, const RX: usize, const TX: usize> UartBuffered<D, S, T, RX, TX>
where
    D: UartDevice,
    T: OneShotTimer,
{
    /// Brings the device into the state the bridge expects.
    ///
    /// Masks both UART interrupts, cancels a pending receive timeout, then
    /// unmasks the receive interrupt. The transmit interrupt is unmasked on
    /// demand by writers. Call once the platform routes the UART interrupt to
    /// [`Self::on_interrupt`].
    pub fn init(&self) {
        self.device.disable_tx_irq();
        self.device.disable_rx_irq();
        self.rx.timer.stop();

        log::debug!(
            "uart-buffered: init rx={}B tx={}B rx_timeout={:?}",
            RX,
            TX,
            self.rx_timeout
        );

        self.device.enable_rx_irq();
    }
}

impl<D, S, T, const RX: usize, const TX: usize> core::fmt::Debug for UartBuffered<D, S, T, RX, TX> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UartBuffered")
            .field("rx", &self.rx.fifo)
            .field("tx", &self.tx.fifo)
            .field("rx_timeout", &self.rx_timeout)
            .finish_non_exhaustive()
    }
}
