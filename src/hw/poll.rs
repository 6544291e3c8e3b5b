// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Bounded polling of non-blocking hardware operations.
//!
//! Replaces `nb::block!`, which spins until the peripheral answers.

/// Why a bounded poll gave up.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PollError<E> {
    /// Still `WouldBlock` after the whole budget.
    Timeout,
    /// The operation itself failed.
    Other(E),
}

/// Call `op` until it stops returning `WouldBlock`, at most `budget` times.
pub fn bounded<T, E, F>(budget: u32, mut op: F) -> Result<T, PollError<E>>
where
    F: FnMut() -> nb::Result<T, E>,
{
    for _ in 0..budget {
        match op() {
            Ok(value) => return Ok(value),
            Err(nb::Error::Other(e)) => return Err(PollError::Other(e)),
            Err(nb::Error::WouldBlock) => core::hint::spin_loop(),
        }
    }

    Err(PollError::Timeout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_once_ready() {
        let mut calls = 0;
        let res: Result<u16, PollError<()>> = bounded(10, || {
            calls += 1;
            if calls < 3 {
                Err(nb::Error::WouldBlock)
            } else {
                Ok(42)
            }
        });
        assert_eq!(res, Ok(42));
        assert_eq!(calls, 3);
    }

    #[test]
    fn gives_up_after_budget() {
        let mut calls = 0;
        let res: Result<(), PollError<()>> = bounded(5, || {
            calls += 1;
            Err(nb::Error::WouldBlock)
        });
        assert_eq!(res, Err(PollError::Timeout));
        assert_eq!(calls, 5);
    }

    #[test]
    fn passes_errors_through() {
        let res: Result<(), PollError<&str>> = bounded(5, || Err(nb::Error::Other("overrun")));
        assert_eq!(res, Err(PollError::Other("overrun")));
    }

    #[test]
    fn zero_budget_never_polls() {
        let res: Result<(), PollError<()>> = bounded(0, || panic!("polled"));
        assert_eq!(res, Err(PollError::Timeout));
    }
}
