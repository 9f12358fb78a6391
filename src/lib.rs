//! A device abstraction for an SG90 hobby servo driven from a plain GPIO line.
//!
//! The servo is held at one of three calibrated positions by a software-generated
//! pulse: the line goes high for the pulse width, then low for the rest of a fixed
//! 25 ms frame. Timing uses a busy-wait on the high-resolution clock because
//! scheduler sleeps are far coarser than the sub-millisecond pulses the servo needs.
//!
//! See [`servo::Sg90`] for usage examples.
//!
//! # Glossary
//!
//! - **Frame:** one 25 ms PWM period. Every pulse call emits exactly one frame.
//! - **Pulse:** the high part of a frame. Its width selects the servo position.
//! - **Claim:** process-wide ownership of one GPIO line. Only one [`servo::Sg90`]
//!   can hold a given line at a time.
//! - **Tick:** one count of the [`embassy_time`] clock. See [`spin_wait::ClockCalibration`].
#![cfg_attr(not(feature = "host"), no_std)]

// Compile-time checks: a board must be selected unless building for a std host
#[cfg(all(not(any(feature = "pico1", feature = "pico2")), not(feature = "host")))]
compile_error!("Must enable 'host' or exactly one board feature: 'pico1' or 'pico2'");

#[cfg(all(feature = "pico1", feature = "pico2"))]
compile_error!("Cannot enable both 'pico1' and 'pico2' features simultaneously");

#[cfg(all(any(feature = "pico1", feature = "pico2"), feature = "host"))]
compile_error!("Board features 'pico1'/'pico2' cannot be combined with 'host'");

// Log routing: `log` facade on std hosts, defmt everywhere else.
#[cfg(feature = "host")]
macro_rules! log_error { ($($arg:tt)*) => { log::error!($($arg)*) }; }
#[cfg(not(feature = "host"))]
macro_rules! log_error { ($($arg:tt)*) => { defmt::error!($($arg)*) }; }

#[cfg(feature = "host")]
macro_rules! log_info { ($($arg:tt)*) => { log::info!($($arg)*) }; }
#[cfg(not(feature = "host"))]
macro_rules! log_info { ($($arg:tt)*) => { defmt::info!($($arg)*) }; }

#[cfg(feature = "host")]
macro_rules! log_trace { ($($arg:tt)*) => { log::trace!($($arg)*) }; }
#[cfg(not(feature = "host"))]
macro_rules! log_trace { ($($arg:tt)*) => { defmt::trace!($($arg)*) }; }

mod error;
pub mod gpio;
pub mod servo;
pub mod spin_wait;

// Re-export error types and result (used throughout)
pub use crate::error::{Error, Result};
