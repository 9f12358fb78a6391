//! Pico GPIO pins handed over from `embassy_rp`.

use embassy_rp::Peri;
use embassy_rp::gpio::{AnyPin, Level, Output, Pin};
use heapless::Vec;

use super::{GpioController, PinId};
use crate::{Error, Result};

// Pico 2 (RP2350B) has the most pins: GPIO 0..=47.
const MAX_PINS: usize = 48;

/// GPIO controller over Pico pins registered up front.
///
/// `embassy_rp` hands out pins as typed peripherals, so each pin the application
/// may open is registered once with [`with_pin`](Self::with_pin). Opening a line
/// then looks the pin up by number.
///
/// # Example
///
/// ```rust,no_run
/// use sg90_envoy::{Result, gpio::{PicoGpio, PinId}, servo::{Position, Sg90}, spin_wait::SpinDelay};
///
/// fn example(p: embassy_rp::Peripherals) -> Result<()> {
///     let mut gpio = PicoGpio::new().with_pin(p.PIN_5)?;
///     let mut servo = Sg90::new(&mut gpio, PinId::DEFAULT, SpinDelay::new())?;
///     servo.hold(Position::Left, 40)
/// }
/// ```
pub struct PicoGpio<'d> {
    pins: Vec<Peri<'d, AnyPin>, MAX_PINS>,
}

impl<'d> PicoGpio<'d> {
    /// Create a controller with no pins registered.
    #[must_use]
    pub const fn new() -> Self {
        Self { pins: Vec::new() }
    }

    /// Register `pin` so it can later be opened by number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PinOutOfRange`] if the controller is already full.
    pub fn with_pin<P: Pin>(mut self, pin: Peri<'d, P>) -> Result<Self> {
        let number = pin.pin();
        self.pins
            .push(pin.into())
            .map_err(|_| Error::PinOutOfRange(number))?;
        Ok(self)
    }
}

impl Default for PicoGpio<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'d> GpioController for PicoGpio<'d> {
    type Line = Output<'d>;

    fn open_output(&mut self, pin: PinId) -> Result<Output<'d>> {
        let index = self
            .pins
            .iter()
            .position(|registered| registered.pin() == pin.number())
            .ok_or(Error::PinNotRegistered(pin.number()))?;
        let any_pin = self.pins.swap_remove(index);
        Ok(Output::new(any_pin, Level::Low))
    }
}
