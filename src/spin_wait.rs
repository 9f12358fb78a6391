//! A busy-wait delay with clock-tick resolution.
//!
//! Scheduler sleeps (`thread::sleep`, `Timer::after`) wake up on a granularity of
//! a millisecond or worse, which is too coarse for a 0.4 ms servo pulse. [`SpinDelay`]
//! instead polls the [`embassy_time`] clock in a tight loop and returns as soon as
//! enough ticks have passed. It occupies the calling core for the whole wait.
//!
//! [`SpinDelay`] implements [`DelayNs`], so code that pulses the servo can be handed a
//! simulated delay in tests and never spin for real.

use embassy_time::{Instant, TICK_HZ};
use embedded_hal::delay::DelayNs;

const NANOS_PER_SECOND: u128 = 1_000_000_000;
const MICROS_PER_SECOND: u128 = 1_000_000;

/// Conversion between wall-clock durations and clock ticks.
///
/// Computed once from the tick rate of the high-resolution clock and never changed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(not(feature = "host"), derive(defmt::Format))]
pub struct ClockCalibration {
    tick_hz: u64,
}

impl ClockCalibration {
    /// Calibration for the [`embassy_time`] clock this build runs on.
    #[must_use]
    pub const fn current() -> Self {
        Self::from_tick_hz(TICK_HZ)
    }

    /// Calibration for a clock running at `tick_hz` ticks per second.
    ///
    /// # Panics
    ///
    /// Panics if `tick_hz` is below 1 kHz; such a clock cannot time a servo pulse.
    #[must_use]
    pub const fn from_tick_hz(tick_hz: u64) -> Self {
        assert!(tick_hz >= 1_000, "clock must tick at least once per millisecond");
        Self { tick_hz }
    }

    /// Clock ticks per second.
    #[must_use]
    pub const fn tick_hz(self) -> u64 {
        self.tick_hz
    }

    /// Whole clock ticks per millisecond.
    #[must_use]
    pub const fn ticks_per_ms(self) -> u64 {
        self.tick_hz / 1_000
    }

    /// Ticks needed to cover `nanos`, rounded up so a wait never ends early.
    #[must_use]
    pub const fn ticks_for_nanos(self, nanos: u64) -> u64 {
        self.ticks_for(nanos as u128, NANOS_PER_SECOND)
    }

    /// Ticks needed to cover `micros`, rounded up.
    #[must_use]
    pub const fn ticks_for_micros(self, micros: u64) -> u64 {
        self.ticks_for(micros as u128, MICROS_PER_SECOND)
    }

    // Two u64 factors cannot overflow u128; only the final tick count saturates.
    const fn ticks_for(self, amount: u128, units_per_second: u128) -> u64 {
        let ticks = amount
            .saturating_mul(self.tick_hz as u128)
            .div_ceil(units_per_second);
        if ticks > u64::MAX as u128 {
            u64::MAX
        } else {
            ticks as u64
        }
    }
}

impl Default for ClockCalibration {
    fn default() -> Self {
        Self::current()
    }
}

/// Blocking delay that spins on the high-resolution clock.
///
/// # Example
///
/// ```rust
/// use embedded_hal::delay::DelayNs;
/// use sg90_envoy::spin_wait::SpinDelay;
///
/// let mut delay = SpinDelay::new();
/// delay.delay_us(400); // returns after at least 0.4 ms, without yielding
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct SpinDelay {
    calibration: ClockCalibration,
}

impl SpinDelay {
    /// Create a spin delay calibrated against the current clock.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            calibration: ClockCalibration::current(),
        }
    }

    /// The calibration this delay converts durations with.
    #[must_use]
    pub const fn calibration(&self) -> ClockCalibration {
        self.calibration
    }

    /// Spin until at least `ticks` clock ticks have elapsed.
    pub fn spin_ticks(&self, ticks: u64) {
        if ticks == 0 {
            return;
        }
        let start = Instant::now();
        // Strict comparison: both endpoints are truncated to whole ticks.
        while start.elapsed().as_ticks() <= ticks {
            core::hint::spin_loop();
        }
    }
}

impl DelayNs for SpinDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.spin_ticks(self.calibration.ticks_for_nanos(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        self.spin_ticks(self.calibration.ticks_for_micros(u64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.spin_ticks(
            self.calibration
                .ticks_for_micros(u64::from(ms).saturating_mul(1_000)),
        );
    }
}
