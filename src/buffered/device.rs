/// Register-level access to the UART the channel is bound to.
///
/// All methods take `&self`: implementations talk to memory-mapped registers
/// and are called from both interrupt and thread context.
pub trait UartDevice {
    /// Returns true if a received byte is waiting in hardware.
    fn rx_ready(&self) -> bool;
    /// Reads one received byte. Only called after [`Self::rx_ready`] returned true.
    fn read_byte(&self) -> u8;
    /// Returns true if hardware can accept another byte for transmission.
    fn tx_ready(&self) -> bool;
    /// Writes one byte for transmission. Only called after [`Self::tx_ready`] returned true.
    fn write_byte(&self, byte: u8);
    fn enable_rx_irq(&self);
    fn disable_rx_irq(&self);
    fn enable_tx_irq(&self);
    fn disable_tx_irq(&self);
}

impl<D: UartDevice + ?Sized> UartDevice for &D {
    fn rx_ready(&self) -> bool {
        (**self).rx_ready()
    }

    fn read_byte(&self) -> u8 {
        (**self).read_byte()
    }

    fn tx_ready(&self) -> bool {
        (**self).tx_ready()
    }

    fn write_byte(&self, byte: u8) {
        (**self).write_byte(byte)
    }

    fn enable_rx_irq(&self) {
        (**self).enable_rx_irq()
    }

    fn disable_rx_irq(&self) {
        (**self).disable_rx_irq()
    }

    fn enable_tx_irq(&self) {
        (**self).enable_tx_irq()
    }

    fn disable_tx_irq(&self) {
        (**self).disable_tx_irq()
    }
}
