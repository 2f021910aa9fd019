//! Crate-internal logging macros.
//!
//! With the `defmt` feature, these forward to the corresponding `defmt` macros. Host test builds
//! without `defmt` print to standard output instead. Anywhere else, they compile to nothing.
//!
//! Format strings must stick to the subset shared by `defmt` and `core::fmt` (plain `{}`).


macro_rules! log_at {
    ($defmt_macro:ident, $label:literal, $($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::$defmt_macro!($($arg)*);

        #[cfg(all(not(feature = "defmt"), test))]
        ::std::println!("[{}] {}", $label, ::std::format!($($arg)*));
    }};
}

#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => { log_at!(trace, "TRACE", $($arg)*) };
}

macro_rules! debug {
    ($($arg:tt)*) => { log_at!(debug, "DEBUG", $($arg)*) };
}

macro_rules! info {
    ($($arg:tt)*) => { log_at!(info, "INFO", $($arg)*) };
}

macro_rules! warn {
    ($($arg:tt)*) => { log_at!(warn, "WARN", $($arg)*) };
}

#[allow(unused_macros)]
macro_rules! error {
    ($($arg:tt)*) => { log_at!(error, "ERROR", $($arg)*) };
}
