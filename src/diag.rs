// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Diagnostic logging.
//!
//! Thin wrappers over `tracing` so that firmware builds without the `trace` feature compile the
//! events away. `tracing` needs `alloc` on `no_std`, which the firmware does not link.

macro_rules! diag_info {
    ($($arg:tt)+) => {{
        #[cfg(feature = "trace")]
        ::tracing::info!($($arg)+);
        #[cfg(not(feature = "trace"))]
        let _ = format_args!($($arg)+);
    }};
}

macro_rules! diag_warn {
    ($($arg:tt)+) => {{
        #[cfg(feature = "trace")]
        ::tracing::warn!($($arg)+);
        #[cfg(not(feature = "trace"))]
        let _ = format_args!($($arg)+);
    }};
}

macro_rules! diag_error {
    ($($arg:tt)+) => {{
        #[cfg(feature = "trace")]
        ::tracing::error!($($arg)+);
        #[cfg(not(feature = "trace"))]
        let _ = format_args!($($arg)+);
    }};
}
