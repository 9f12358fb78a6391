#![cfg(feature = "rpi")]
//! Raspberry Pi GPIO header through `rppal`.

use rppal::gpio::{Gpio, OutputPin};

use super::{GpioController, PinId};
use crate::{Error, Result};

/// GPIO controller for the Raspberry Pi header (BCM numbering).
///
/// # Example
///
/// ```rust,no_run
/// use sg90_envoy::gpio::{PinId, RpiGpio};
/// use sg90_envoy::servo::{Position, Sg90};
/// use sg90_envoy::spin_wait::SpinDelay;
///
/// let mut gpio = RpiGpio::new()?;
/// let mut servo = Sg90::new(&mut gpio, PinId::new(18), SpinDelay::new())?;
/// servo.hold(Position::Middle, 40)?; // about one second
/// # Ok::<(), sg90_envoy::Error>(())
/// ```
pub struct RpiGpio {
    gpio: Gpio,
}

impl RpiGpio {
    /// Acquire the Raspberry Pi GPIO peripheral.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rppal`](crate::Error::Rppal) if the peripheral cannot be
    /// accessed (not a Raspberry Pi, or missing permissions on `/dev/gpiomem`).
    pub fn new() -> Result<Self> {
        Ok(Self { gpio: Gpio::new()? })
    }
}

impl GpioController for RpiGpio {
    type Line = OutputPin;

    fn open_output(&mut self, pin: PinId) -> Result<OutputPin> {
        Ok(self.gpio.get(pin.number())?.into_output_low())
    }
}

impl From<rppal::gpio::Error> for Error {
    fn from(err: rppal::gpio::Error) -> Self {
        Self::Rppal(err)
    }
}
