//! # Logging macros
//! Forward to `defmt` on the embedded target. On the host the macros only borrow their
//! arguments, so tests run without a global logger.
#![allow(unused_macros)]

/// Log at trace level
macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(target_os = "none")]
            ::defmt::trace!($s $(, $x)*);
            #[cfg(not(target_os = "none"))]
            let _ = ($( & $x ),*);
        }
    };
}

/// Log at debug level
macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(target_os = "none")]
            ::defmt::debug!($s $(, $x)*);
            #[cfg(not(target_os = "none"))]
            let _ = ($( & $x ),*);
        }
    };
}

/// Log at info level
macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(target_os = "none")]
            ::defmt::info!($s $(, $x)*);
            #[cfg(not(target_os = "none"))]
            let _ = ($( & $x ),*);
        }
    };
}

/// Log at warn level
macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(target_os = "none")]
            ::defmt::warn!($s $(, $x)*);
            #[cfg(not(target_os = "none"))]
            let _ = ($( & $x ),*);
        }
    };
}

/// Log at error level
macro_rules! error {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(target_os = "none")]
            ::defmt::error!($s $(, $x)*);
            #[cfg(not(target_os = "none"))]
            let _ = ($( & $x ),*);
        }
    };
}
