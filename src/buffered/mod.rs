pub mod builder;
pub mod device;
pub mod error;
pub mod fifo;
pub mod grant;
pub mod handle;
pub mod irq;
pub mod signal;
pub mod storage;
pub mod timer;
pub mod types;

#[cfg(test)]
mod test_support;

pub use builder::UartBufferedBuilder;
pub use device::UartDevice;
pub use error::GrantError;
pub use fifo::{Fifo, FifoArray};
pub use grant::{AccessControl, GrantTable, Granted, KernelObject, MemoryRegion, ObjectKind};
pub use handle::{Handle, Rx, RxHandle, Tx, TxHandle};
pub use signal::WakeSignal;
pub use storage::{DEFAULT_RX_TIMEOUT, UartBuffered, UartBufferedRx, UartBufferedTx};
pub use timer::OneShotTimer;
pub use types::UartStats;

pub mod prelude {
    pub use super::{
        AccessControl, DEFAULT_RX_TIMEOUT, Fifo, FifoArray, GrantError, GrantTable, Granted,
        KernelObject, MemoryRegion, ObjectKind, OneShotTimer, RxHandle, TxHandle, UartBuffered,
        UartBufferedBuilder, UartDevice, UartStats, WakeSignal,
    };
}
