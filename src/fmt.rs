//! Logging macros shared by the library and the firmware binary.
//!
//! With the `debug` feature the macros forward to [`defmt`] (transported over RTT by
//! the firmware). Without it they compile away, which keeps the library usable in
//! host unit tests where no defmt global logger exists. Arguments are still
//! borrowed so that values only used for logging do not trigger unused warnings.

/// Log a debug-level message.
#[macro_export]
macro_rules! log_debug {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "debug")]
        ::defmt::debug!($s $(, $x)*);
        #[cfg(not(feature = "debug"))]
        let _ = ($( & $x ),*);
    }};
}

/// Log an info-level message.
#[macro_export]
macro_rules! log_info {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "debug")]
        ::defmt::info!($s $(, $x)*);
        #[cfg(not(feature = "debug"))]
        let _ = ($( & $x ),*);
    }};
}

/// Log a warning. Use for serial faults the firmware rides through.
#[macro_export]
macro_rules! log_warn {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "debug")]
        ::defmt::warn!($s $(, $x)*);
        #[cfg(not(feature = "debug"))]
        let _ = ($( & $x ),*);
    }};
}

/// Log an error.
#[macro_export]
macro_rules! log_error {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "debug")]
        ::defmt::error!($s $(, $x)*);
        #[cfg(not(feature = "debug"))]
        let _ = ($( & $x ),*);
    }};
}
