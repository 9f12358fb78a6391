//! A device abstraction for SG90 servo motors driven by a software pulse.
//!
//! This module holds an SG90 at one of three calibrated positions by bit-banging a
//! pulse on a plain GPIO line. See [`Sg90`] for usage examples.
//!
//! # Timing
//!
//! Every call emits one 25 ms frame: the line is high for the pulse width, then low
//! for the rest of the frame. The call blocks for the whole frame. The servo needs a
//! train of frames to reach and hold a position; use [`Sg90::hold`] for that.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::gpio::{GpioController, PinClaim, PinId};
use crate::{Error, Result};

/// Length of one PWM frame (milliseconds).
pub const FRAME_MS: f32 = 25.0;

const FRAME_US: u32 = 25_000;

// Pulse widths measured on the bench for an SG90. The datasheet gives 1.0/1.5/2.0 ms,
// which stops short of both end stops on real parts. Recalibrate for other servos.

/// Pulse (2.0 ms) that turns the horn fully left.
pub const LEFT_PULSE: PulseDuration = PulseDuration::calibrated(2_000);

/// Pulse (1.2 ms) that centers the horn.
pub const MIDDLE_PULSE: PulseDuration = PulseDuration::calibrated(1_200);

/// Pulse (0.4 ms) that turns the horn fully right.
pub const RIGHT_PULSE: PulseDuration = PulseDuration::calibrated(400);

/// The three positions an [`Sg90`] can be sent to.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(not(feature = "host"), derive(defmt::Format))]
pub enum Position {
    /// Fully left ([`LEFT_PULSE`]).
    Left,
    /// Centered ([`MIDDLE_PULSE`]).
    Middle,
    /// Fully right ([`RIGHT_PULSE`]).
    Right,
}

impl Position {
    /// Every position, left to right.
    pub const ALL: [Self; 3] = [Self::Left, Self::Middle, Self::Right];

    /// Calibrated pulse width for this position.
    #[must_use]
    pub const fn pulse(self) -> PulseDuration {
        match self {
            Self::Left => LEFT_PULSE,
            Self::Middle => MIDDLE_PULSE,
            Self::Right => RIGHT_PULSE,
        }
    }
}

/// Pulse width that fits in one frame, with microsecond resolution.
///
/// Always within `0..=25` ms, so the low part of the frame is never negative.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(not(feature = "host"), derive(defmt::Format))]
pub struct PulseDuration {
    micros: u32,
}

impl PulseDuration {
    /// No pulse: the line stays low for the whole frame.
    pub const ZERO: Self = Self { micros: 0 };

    /// A pulse that fills the whole frame.
    pub const FRAME: Self = Self { micros: FRAME_US };

    const fn calibrated(micros: u32) -> Self {
        assert!(micros <= FRAME_US, "pulse must fit in the frame");
        Self { micros }
    }

    /// Pulse of `millis` milliseconds, rounded to the nearest microsecond.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PulseOutOfRange`] unless `0.0 <= millis <= 25.0`.
    /// NaN is rejected.
    pub fn from_millis(millis: f32) -> Result<Self> {
        if !(0.0..=FRAME_MS).contains(&millis) {
            return Err(Error::PulseOutOfRange(millis));
        }
        // Non-negative and at most 25_000.5, so the cast neither wraps nor saturates.
        let micros = (millis * 1_000.0 + 0.5) as u32;
        Ok(Self {
            micros: micros.min(FRAME_US),
        })
    }

    /// Pulse of `micros` microseconds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PulseOutOfRange`] if `micros` exceeds the 25 000 µs frame.
    pub fn from_micros(micros: u32) -> Result<Self> {
        if micros > FRAME_US {
            return Err(Error::PulseOutOfRange(micros as f32 / 1_000.0));
        }
        Ok(Self { micros })
    }

    /// Width in microseconds.
    #[must_use]
    pub const fn as_micros(self) -> u32 {
        self.micros
    }

    /// Width in milliseconds.
    #[must_use]
    pub fn as_millis(self) -> f32 {
        self.micros as f32 / 1_000.0
    }

    /// The low part of the frame that follows this pulse.
    #[must_use]
    pub const fn remainder(self) -> Self {
        Self {
            micros: FRAME_US.saturating_sub(self.micros),
        }
    }
}

impl TryFrom<f32> for PulseDuration {
    type Error = Error;

    fn try_from(millis: f32) -> Result<Self> {
        Self::from_millis(millis)
    }
}

/// A device abstraction for an SG90 servo on one GPIO line.
///
/// The driver claims its line for its whole lifetime: a second `Sg90` on the same
/// line fails with [`Error::PinAlreadyClaimed`] until the first is dropped.
///
/// Pulses are timed with a [`DelayNs`]. On hardware use
/// [`SpinDelay`](crate::spin_wait::SpinDelay); in tests, any recording delay.
///
/// # Example
///
/// ```rust
/// use embedded_hal::digital::PinState;
/// use sg90_envoy::gpio::{PinId, SimGpio};
/// use sg90_envoy::servo::{Position, Sg90};
/// use sg90_envoy::spin_wait::SpinDelay;
///
/// let mut gpio = SimGpio::new();
/// let mut servo = Sg90::new(&mut gpio, PinId::new(6), SpinDelay::new())?;
///
/// servo.pulse_position(Position::Middle)?; // blocks for one 25 ms frame
/// servo.pulse_millis(1.5)?;                // raw pulse width
/// assert!(servo.pulse_millis(30.0).is_err()); // does not fit in the frame
///
/// assert_eq!(gpio.level(PinId::new(6)), Some(PinState::Low));
/// # Ok::<(), sg90_envoy::Error>(())
/// ```
#[derive(Debug)]
pub struct Sg90<L, D> {
    line: L,
    delay: D,
    claim: PinClaim,
}

impl<L: OutputPin, D: DelayNs> Sg90<L, D> {
    /// Claim `pin`, open it as an output through `controller`, and build a driver.
    ///
    /// See the [struct-level example](Self) for usage.
    ///
    /// # Errors
    ///
    /// Returns an error if the line is already claimed, out of range, or the
    /// controller cannot open it. The claim is released on failure.
    pub fn new<C>(controller: &mut C, pin: PinId, delay: D) -> Result<Self>
    where
        C: GpioController<Line = L>,
    {
        let claim = PinClaim::acquire(pin)?;
        let line = controller.open_output(pin)?;
        log_info!("Sg90 ready on GPIO {}", pin.number());
        Ok(Self { line, delay, claim })
    }

    /// Build a driver on [`PinId::DEFAULT`] (GPIO 5).
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn new_default<C>(controller: &mut C, delay: D) -> Result<Self>
    where
        C: GpioController<Line = L>,
    {
        Self::new(controller, PinId::DEFAULT, delay)
    }

    /// Like [`new`](Self::new), but log the failure and return `None` instead.
    ///
    /// For applications that keep running without the servo when the hardware is
    /// missing. Exactly one error is logged per failed construction.
    pub fn new_or_log<C>(controller: &mut C, pin: PinId, delay: D) -> Option<Self>
    where
        C: GpioController<Line = L>,
    {
        match Self::new(controller, pin, delay) {
            Ok(servo) => Some(servo),
            Err(err) => {
                log_error!("Sg90 init on GPIO {} failed: {}", pin.number(), err);
                None
            }
        }
    }

    /// The line this driver owns.
    #[must_use]
    pub const fn pin(&self) -> PinId {
        self.claim.pin()
    }

    /// Emit one frame with the calibrated pulse for `position`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PinWrite`] if the line rejects a write.
    pub fn pulse_position(&mut self, position: Position) -> Result<()> {
        self.pulse(position.pulse())
    }

    /// Emit one frame with a pulse of `millis` milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PulseOutOfRange`] without touching the line unless
    /// `0.0 <= millis <= 25.0`, and [`Error::PinWrite`] if the line rejects a write.
    pub fn pulse_millis(&mut self, millis: f32) -> Result<()> {
        self.pulse(PulseDuration::from_millis(millis)?)
    }

    /// Emit one frame: high for `pulse`, then low for the rest of the 25 ms.
    ///
    /// Blocks the calling thread for the whole frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PinWrite`] if the line rejects a write.
    pub fn pulse(&mut self, pulse: PulseDuration) -> Result<()> {
        log_trace!("GPIO {} pulse {} us", self.pin().number(), pulse.as_micros());
        self.set_high()?;
        self.delay.delay_us(pulse.as_micros());
        // Both low writes are always attempted; the first failure is reported.
        let first_low = self.set_low();
        self.delay.delay_us(pulse.remainder().as_micros());
        first_low.and(self.set_low())
    }

    /// Emit `frames` consecutive frames for `position`. 40 frames is one second.
    ///
    /// # Errors
    ///
    /// Stops at the first failed write and returns [`Error::PinWrite`].
    pub fn hold(&mut self, position: Position, frames: u32) -> Result<()> {
        for _ in 0..frames {
            self.pulse_position(position)?;
        }
        Ok(())
    }

    /// Drive the line low and stop pulsing, letting the servo go limp.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PinWrite`] if the line rejects the write.
    pub fn relax(&mut self) -> Result<()> {
        self.set_low()
    }

    /// Drive the line low and hand back the line, the delay, and the line's claim.
    ///
    /// The claim travels with the line: no new driver can open the line until the
    /// returned [`PinClaim`] is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PinWrite`] if the final low write fails. The claim is
    /// released in that case.
    pub fn release(mut self) -> Result<(L, D, PinClaim)> {
        self.set_low()?;
        let Self { line, delay, claim } = self;
        Ok((line, delay, claim))
    }

    fn set_high(&mut self) -> Result<()> {
        let pin = self.pin().number();
        self.line.set_high().map_err(|_| Error::PinWrite(pin))
    }

    fn set_low(&mut self) -> Result<()> {
        let pin = self.pin().number();
        self.line.set_low().map_err(|_| Error::PinWrite(pin))
    }
}
