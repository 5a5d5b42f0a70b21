use core::time::Duration;

/// One-shot kernel timer driving the receive timeout.
///
/// On expiry the platform must call
/// [`UartBuffered::rx_timeout`](crate::buffered::UartBuffered::rx_timeout)
/// on the channel owning this timer.
pub trait OneShotTimer {
    /// Arms the timer to expire once after `delay`, superseding any pending expiry.
    fn start(&self, delay: Duration);
    /// Cancels a pending expiry, if any.
    fn stop(&self);
}
