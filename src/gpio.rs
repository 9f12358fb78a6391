//! GPIO line ownership and the controller capability the servo driver consumes.
//!
//! A [`GpioController`] opens a numbered line as an output. Backends:
//!
//! - [`SimGpio`]: simulated lines that record every level written (std hosts).
//! - [`RpiGpio`]: Raspberry Pi header through `rppal` (feature `rpi`).
//! - [`PicoGpio`]: Pico pins handed over from `embassy_rp` (features `pico1`/`pico2`).
//!
//! Ownership of a line is tracked process-wide by [`PinClaim`]: a second claim on a
//! line that is still held fails with [`Error::PinAlreadyClaimed`].

use derive_more::Display;
use embedded_hal::digital::OutputPin;
use portable_atomic::{AtomicU64, Ordering};

use crate::{Error, Result};

#[cfg(any(feature = "pico1", feature = "pico2"))]
mod gpio_pico;
#[cfg(feature = "rpi")]
mod gpio_rpi;
#[cfg(feature = "host")]
mod gpio_sim;

#[cfg(any(feature = "pico1", feature = "pico2"))]
pub use gpio_pico::PicoGpio;
#[cfg(feature = "rpi")]
pub use gpio_rpi::RpiGpio;
#[cfg(feature = "host")]
pub use gpio_sim::{SimGpio, SimLine, SimWriteError};

/// Highest line id the claim registry can track.
pub const MAX_PIN: u8 = 63;

/// Numeric GPIO line identifier in the platform's own numbering.
///
/// BCM numbering on a Raspberry Pi, `PIN_n` numbering on a Pico.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(not(feature = "host"), derive(defmt::Format))]
#[display("GPIO{_0}")]
pub struct PinId(u8);

impl PinId {
    /// Line used when the caller does not name one (GPIO 5).
    pub const DEFAULT: Self = Self(5);

    /// Wrap a line number.
    #[must_use]
    pub const fn new(number: u8) -> Self {
        Self(number)
    }

    /// The raw line number.
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }
}

impl Default for PinId {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u8> for PinId {
    fn from(number: u8) -> Self {
        Self(number)
    }
}

/// Platform capability that opens GPIO lines as outputs.
pub trait GpioController {
    /// Output line handed out by this controller.
    type Line: OutputPin;

    /// Open `pin` in output mode, driven low.
    ///
    /// # Errors
    ///
    /// Returns an error if the controller is unavailable or the line cannot be opened.
    fn open_output(&mut self, pin: PinId) -> Result<Self::Line>;
}

// One bit per line id.
static CLAIMED: AtomicU64 = AtomicU64::new(0);

/// Exclusive, move-only ownership of one GPIO line.
///
/// Dropping the claim releases the line for the next owner.
#[must_use = "the line is released as soon as the claim is dropped"]
#[derive(Debug)]
pub struct PinClaim {
    pin: PinId,
}

impl PinClaim {
    /// Claim `pin` for the caller.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PinOutOfRange`] for ids above [`MAX_PIN`] and
    /// [`Error::PinAlreadyClaimed`] if another claim on `pin` is alive.
    pub fn acquire(pin: PinId) -> Result<Self> {
        let bit = claim_bit(pin)?;
        let previous = CLAIMED.fetch_or(bit, Ordering::AcqRel);
        if previous & bit != 0 {
            return Err(Error::PinAlreadyClaimed(pin.number()));
        }
        Ok(Self { pin })
    }

    /// The claimed line.
    #[must_use]
    pub const fn pin(&self) -> PinId {
        self.pin
    }

    /// Whether some live claim currently holds `pin`.
    #[must_use]
    pub fn is_claimed(pin: PinId) -> bool {
        claim_bit(pin).is_ok_and(|bit| CLAIMED.load(Ordering::Acquire) & bit != 0)
    }
}

impl Drop for PinClaim {
    fn drop(&mut self) {
        if let Ok(bit) = claim_bit(self.pin) {
            CLAIMED.fetch_and(!bit, Ordering::AcqRel);
        }
    }
}

fn claim_bit(pin: PinId) -> Result<u64> {
    if pin.number() > MAX_PIN {
        return Err(Error::PinOutOfRange(pin.number()));
    }
    Ok(1_u64 << pin.number())
}
