#![cfg(feature = "host")]
//! Simulated GPIO controller for std hosts without servo hardware.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use derive_more::{Display, Error as DeriveError};
use embedded_hal::digital::{self, ErrorKind, ErrorType, OutputPin, PinState};

use super::{GpioController, PinId};
use crate::{Error, Result};

#[derive(Debug, Default)]
struct SimState {
    unavailable: bool,
    failing_writes: bool,
    low_failures: u32,
    lines: BTreeMap<PinId, Vec<PinState>>,
}

/// Simulated GPIO controller that records every level written to each line.
///
/// Clones share the same simulated lines, so a test can keep one clone for
/// inspection while a driver owns the lines opened from another.
///
/// # Example
///
/// ```rust
/// use embedded_hal::digital::PinState;
/// use sg90_envoy::gpio::{GpioController, PinId, SimGpio};
/// use embedded_hal::digital::OutputPin;
///
/// let mut gpio = SimGpio::new();
/// let mut line = gpio.open_output(PinId::new(17))?;
/// line.set_high().ok();
/// assert_eq!(gpio.history(PinId::new(17)), [PinState::High]);
/// # Ok::<(), sg90_envoy::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct SimGpio {
    state: Arc<Mutex<SimState>>,
}

impl SimGpio {
    /// A working simulated controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A controller that cannot be acquired, as on a machine without GPIO hardware.
    #[must_use]
    pub fn unavailable() -> Self {
        let gpio = Self::default();
        gpio.lock().unavailable = true;
        gpio
    }

    /// A controller whose lines open but reject every write.
    #[must_use]
    pub fn failing_writes() -> Self {
        let gpio = Self::default();
        gpio.lock().failing_writes = true;
        gpio
    }

    /// Make the next `count` low writes fail, on whichever lines they hit.
    ///
    /// Failed writes are not recorded in the history.
    pub fn fail_next_lows(&self, count: u32) {
        self.lock().low_failures = count;
    }

    /// Every level written to `pin`, oldest first. Empty if the line was never opened.
    #[must_use]
    pub fn history(&self, pin: PinId) -> Vec<PinState> {
        self.lock().lines.get(&pin).cloned().unwrap_or_default()
    }

    /// The last level written to `pin`, if any.
    #[must_use]
    pub fn level(&self, pin: PinId) -> Option<PinState> {
        self.lock().lines.get(&pin).and_then(|levels| levels.last().copied())
    }

    /// Forget recorded levels while keeping lines open.
    pub fn clear_history(&self) {
        self.lock().lines.values_mut().for_each(Vec::clear);
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl GpioController for SimGpio {
    type Line = SimLine;

    fn open_output(&mut self, pin: PinId) -> Result<SimLine> {
        let mut state = self.lock();
        if state.unavailable {
            return Err(Error::ControllerUnavailable);
        }
        state.lines.insert(pin, Vec::new());
        Ok(SimLine {
            pin,
            state: Arc::clone(&self.state),
        })
    }
}

/// One simulated output line opened from a [`SimGpio`].
#[derive(Debug)]
pub struct SimLine {
    pin: PinId,
    state: Arc<Mutex<SimState>>,
}

impl SimLine {
    /// The line this handle drives.
    #[must_use]
    pub const fn pin(&self) -> PinId {
        self.pin
    }

    fn write(&mut self, level: PinState) -> core::result::Result<(), SimWriteError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.failing_writes {
            return Err(SimWriteError { pin: self.pin });
        }
        if level == PinState::Low && state.low_failures > 0 {
            state.low_failures = state.low_failures.saturating_sub(1);
            return Err(SimWriteError { pin: self.pin });
        }
        state.lines.entry(self.pin).or_default().push(level);
        Ok(())
    }
}

/// Write rejected by a [`SimGpio::failing_writes`] controller.
#[derive(Clone, Copy, Debug, Display, DeriveError)]
#[display("simulated write to {pin} failed")]
pub struct SimWriteError {
    pin: PinId,
}

impl digital::Error for SimWriteError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl ErrorType for SimLine {
    type Error = SimWriteError;
}

impl OutputPin for SimLine {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        self.write(PinState::Low)
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        self.write(PinState::High)
    }
}
