#![allow(unsafe_code)]

use crate::buffered::{handle::RxHandle, signal::WakeSignal, timer::OneShotTimer};

impl<D, S, T> RxHandle<'_, D, S, T>
where
    S: WakeSignal,
    T: OneShotTimer,
{
    /// Copies up to `buf.len()` received bytes into `buf` without blocking.
    ///
    /// Returns the number of bytes copied, 0 if nothing has been received.
    /// Each byte is popped in its own critical section, so the interrupt
    /// bridge is held off for at most one byte at a time.
    pub fn read_nb(&self, buf: &mut [u8]) -> usize {
        let mut n = 0;
        for slot in buf.iter_mut() {
            let Some(byte) = critical_section::with(|_| self.pop_one()) else {
                break;
            };
            *slot = byte;
            n += 1;
        }
        self.release_timer(n);
        n
    }

    /// Like [`Self::read_nb`] but without serialising against other readers.
    ///
    /// # Safety
    /// No other thread may read from this channel concurrently; the receive
    /// fifo supports exactly one consumer at a time.
    pub unsafe fn read_nb_unchecked(&self, buf: &mut [u8]) -> usize {
        let mut n = 0;
        for slot in buf.iter_mut() {
            let Some(byte) = self.pop_one() else {
                break;
            };
            *slot = byte;
            n += 1;
        }
        self.release_timer(n);
        n
    }

    /// Reads received bytes, blocking while none are available.
    ///
    /// Returns as soon as at least one byte is available, with however many
    /// bytes (up to `buf.len()`) are buffered at that point. Partial data is
    /// released by the receive timeout if the sender pauses. Returns 0
    /// immediately for an empty `buf`.
    pub fn read(&self, buf: &mut [u8]) -> usize {
        if buf.is_empty() {
            return 0;
        }

        loop {
            self.signal.reset();
            let n = self.read_nb(buf);
            if n > 0 {
                // The reset above may have swallowed a raise meant for
                // other readers; hand it on while bytes remain.
                if !self.fifo.is_empty() {
                    self.signal.raise();
                }
                return n;
            }
            self.signal.wait();
        }
    }

    /// Returns the oldest received byte without consuming it.
    pub fn peek(&self) -> Option<u8> {
        critical_section::with(|_| {
            if self.fifo.is_empty() {
                None
            } else {
                Some(unsafe { self.fifo.peek() })
            }
        })
    }

    /// Pops one byte if any is queued. Callers serialise consumers.
    #[inline]
    fn pop_one(&self) -> Option<u8> {
        if self.fifo.is_empty() {
            None
        } else {
            Some(unsafe { self.fifo.pop() })
        }
    }

    /// Cancels the receive timeout once a read has emptied the fifo.
    fn release_timer(&self, n: usize) {
        if n > 0 && self.fifo.is_empty() {
            self.timer.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;
    use std::thread;

    use crate::buffered::{
        test_support::{TEST_RX_TIMEOUT, test_uart},
        timer::OneShotTimer,
    };

    #[test]
    fn read_nb_on_empty_fifo_returns_zero() {
        let uart = test_uart();
        let mut buf = [0u8; 4];

        assert_eq!(uart.rx_handle().read_nb(&mut buf), 0);
    }

    #[test]
    fn read_nb_limits_to_buffer_length() {
        let uart = test_uart();
        uart.device.feed(&[1, 2, 3, 4, 5]);
        uart.on_interrupt();

        let rx = uart.rx_handle();
        let mut buf = [0u8; 3];
        assert_eq!(rx.read_nb(&mut buf), 3);
        assert_eq!(buf, [1, 2, 3]);
        assert_eq!(rx.used(), 2);

        let mut buf = [0u8; 8];
        assert_eq!(rx.read_nb(&mut buf), 2);
        assert_eq!(&buf[..2], &[4, 5]);
        assert!(rx.is_empty());
    }

    #[test]
    fn read_returns_buffered_bytes_without_waiting() {
        let uart = test_uart();
        uart.device.feed(b"hi");
        uart.on_interrupt();

        let mut buf = [0u8; 16];
        let n = uart.rx_handle().read(&mut buf);
        assert_eq!(&buf[..n], b"hi");
    }

    #[test]
    fn read_with_empty_buffer_returns_immediately() {
        let uart = test_uart();
        assert_eq!(uart.rx_handle().read(&mut []), 0);
    }

    #[test]
    fn read_blocks_until_bridge_delivers() {
        let uart = test_uart();
        let rx = uart.rx_handle();

        thread::scope(|s| {
            let reader = s.spawn(move || {
                let mut buf = [0u8; 8];
                let n = rx.read(&mut buf);
                (n, buf)
            });

            thread::sleep(Duration::from_millis(20));
            uart.device.feed(&[7, 8, 9]);
            uart.on_interrupt();

            let (n, buf) = reader.join().unwrap();
            assert_eq!(&buf[..n], &[7, 8, 9]);
        });
    }

    #[test]
    fn timeout_wakes_reader_for_partial_data() {
        let uart = test_uart();
        let rx = uart.rx_handle();

        thread::scope(|s| {
            let reader = s.spawn(move || {
                let mut buf = [0u8; 8];
                let n = rx.read(&mut buf);
                (n, buf)
            });

            thread::sleep(Duration::from_millis(20));
            // Byte lands in the fifo without a wake; only the timeout can
            // release the blocked reader.
            unsafe { uart.rx.fifo.as_fifo().push(0x42) };
            uart.rx.timer.start(TEST_RX_TIMEOUT);

            thread::sleep(Duration::from_millis(20));
            assert!(uart.rx.timer.fire());
            uart.rx_timeout();

            let (n, buf) = reader.join().unwrap();
            assert_eq!(n, 1);
            assert_eq!(buf[0], 0x42);
        });
    }

    #[test]
    fn spurious_wake_keeps_reader_blocked() {
        let uart = test_uart();
        let rx = uart.rx_handle();

        thread::scope(|s| {
            let reader = s.spawn(move || {
                let mut buf = [0u8; 8];
                rx.read(&mut buf)
            });

            thread::sleep(Duration::from_millis(20));
            uart.rx_timeout();
            thread::sleep(Duration::from_millis(20));
            assert!(!reader.is_finished());

            uart.device.feed(&[1]);
            uart.on_interrupt();
            assert_eq!(reader.join().unwrap(), 1);
        });
    }

    #[test]
    fn every_blocked_reader_wakes_for_buffered_bytes() {
        let uart = test_uart();
        let rx = uart.rx_handle();

        thread::scope(|s| {
            let readers: [_; 2] = core::array::from_fn(|_| {
                s.spawn(move || {
                    let mut buf = [0u8; 1];
                    let n = rx.read(&mut buf);
                    (n, buf[0])
                })
            });

            thread::sleep(Duration::from_millis(20));
            uart.device.feed(&[1, 2]);
            uart.on_interrupt();

            // The timer is never fired; the first reader must hand the wake on.
            let mut got: std::vec::Vec<_> = readers.map(|r| r.join().unwrap()).into();
            got.sort();
            assert_eq!(got, [(1, 1), (1, 2)]);
            assert!(rx.is_empty());
        });
    }

    #[test]
    fn bridge_runs_between_bytes_of_a_long_read() {
        const TOTAL: usize = 2_000;
        let uart = test_uart();
        let rx = uart.rx_handle();

        thread::scope(|s| {
            s.spawn(|| {
                for i in 0..TOTAL {
                    while uart.rx_handle().is_full() {
                        thread::yield_now();
                    }
                    uart.device.feed(&[i as u8]);
                    uart.on_interrupt();
                }
            });

            let mut got = std::vec::Vec::with_capacity(TOTAL);
            let mut buf = [0u8; 64];
            while got.len() < TOTAL {
                let n = rx.read(&mut buf);
                got.extend_from_slice(&buf[..n]);
            }

            assert!(got.iter().enumerate().all(|(i, &b)| b == i as u8));
        });
        assert_eq!(uart.stats().rx_overruns, 0);
    }

    #[test]
    fn draining_read_cancels_timeout() {
        let uart = test_uart();
        uart.device.feed(&[1, 2, 3]);
        uart.on_interrupt();
        assert!(uart.rx.timer.armed().is_some());

        let rx = uart.rx_handle();
        let mut buf = [0u8; 2];
        assert_eq!(rx.read(&mut buf), 2);
        assert!(uart.rx.timer.armed().is_some());

        assert_eq!(rx.read(&mut buf), 1);
        assert_eq!(uart.rx.timer.armed(), None);
        assert_eq!(uart.rx.timer.stops(), 1);
    }

    #[test]
    fn polling_an_empty_fifo_leaves_timer_alone() {
        let uart = test_uart();
        let mut buf = [0u8; 4];

        assert_eq!(uart.rx_handle().read_nb(&mut buf), 0);
        assert_eq!(uart.rx.timer.stops(), 0);
    }

    #[test]
    fn peek_leaves_byte_in_fifo() {
        let uart = test_uart();
        let rx = uart.rx_handle();
        assert_eq!(rx.peek(), None);

        uart.device.feed(&[0x55, 0x66]);
        uart.on_interrupt();

        assert_eq!(rx.peek(), Some(0x55));
        assert_eq!(rx.used(), 2);

        let mut buf = [0u8; 1];
        rx.read_nb(&mut buf);
        assert_eq!(rx.peek(), Some(0x66));
    }
}
