//! Crate-local logging macros.
//!
//! The warning macro is `log_warn!` since a bare `warn` path collides with
//! the builtin lint attribute.
//!
//! Forward to `defmt` when the `defmt` feature is on, otherwise to `tracing`
//! when `tracing` is on. With neither, arguments are still type-checked but
//! nothing is emitted. Format strings must stay within the `{}` subset both
//! backends accept.

macro_rules! log_impl {
    ($level:ident, $($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::$level!($($arg)*);
        #[cfg(all(feature = "tracing", not(feature = "defmt")))]
        tracing::$level!($($arg)*);
        #[cfg(not(any(feature = "defmt", feature = "tracing")))]
        {
            let _ = format_args!($($arg)*);
        }
    }};
}

macro_rules! debug {
    ($($arg:tt)*) => { $crate::log::log_impl!(debug, $($arg)*) };
}

macro_rules! info {
    ($($arg:tt)*) => { $crate::log::log_impl!(info, $($arg)*) };
}

macro_rules! log_warn {
    ($($arg:tt)*) => { $crate::log::log_impl!(warn, $($arg)*) };
}

macro_rules! error {
    ($($arg:tt)*) => { $crate::log::log_impl!(error, $($arg)*) };
}

pub(crate) use {debug, error, info, log_impl, log_warn};
