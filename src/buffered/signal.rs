/// Scheduler object a thread can sleep on until another context raises it.
///
/// Signals are latched: once raised they stay raised until [`Self::reset`],
/// so a raise that lands between a waiter's state check and its call to
/// [`Self::wait`] is not lost. Raising wakes every waiter; each one re-checks
/// the ring it cares about.
pub trait WakeSignal {
    /// Raises the signal and wakes all waiters. Must be callable from interrupt context.
    fn raise(&self);
    /// Clears the raised state.
    fn reset(&self);
    /// Blocks the calling thread until the signal is raised.
    fn wait(&self);
}
