//! Crate-local logging forwarders.
//!
//! `tracing` is an optional dependency; with the feature off these compile to
//! nothing. Only pass `Copy` values or references to the macros.

#[cfg(feature = "tracing")]
macro_rules! debug {
    ($($arg:tt)*) => { ::tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($arg:tt)*) => {{
        let _ = ($($arg)*);
    }};
}

pub(crate) use debug;
