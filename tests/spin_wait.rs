#![cfg(feature = "host")]
#![allow(missing_docs)]
//! Host-level tests for the busy-wait delay and its tick arithmetic.

use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;
use sg90_envoy::spin_wait::{ClockCalibration, SpinDelay};

#[test]
fn calibration_follows_the_embassy_clock() {
    let calibration = ClockCalibration::current();
    assert_eq!(calibration.tick_hz(), embassy_time::TICK_HZ);
    assert_eq!(SpinDelay::new().calibration(), calibration);
    assert_eq!(ClockCalibration::default(), calibration);
}

#[test]
fn microsecond_clock_converts_exactly() {
    let calibration = ClockCalibration::from_tick_hz(1_000_000);
    assert_eq!(calibration.ticks_per_ms(), 1_000);
    assert_eq!(calibration.ticks_for_micros(2_000), 2_000);
    assert_eq!(calibration.ticks_for_micros(400), 400);
    assert_eq!(calibration.ticks_for_nanos(0), 0);
}

#[test]
fn partial_ticks_round_up() {
    let calibration = ClockCalibration::from_tick_hz(1_000_000);
    assert_eq!(calibration.ticks_for_nanos(1), 1);
    assert_eq!(calibration.ticks_for_nanos(1_001), 2);

    let watch_crystal = ClockCalibration::from_tick_hz(32_768);
    assert_eq!(watch_crystal.ticks_per_ms(), 32);
    // 32.768 ticks per millisecond
    assert_eq!(watch_crystal.ticks_for_micros(1_000), 33);
    assert_eq!(watch_crystal.ticks_for_micros(25_000), 820);
}

#[test]
fn long_delays_do_not_overflow_into_short_waits() {
    let calibration = ClockCalibration::from_tick_hz(1_000_000);
    let longest_ms = u64::from(u32::MAX);
    assert_eq!(
        calibration.ticks_for_micros(longest_ms * 1_000),
        longest_ms * 1_000
    );
    assert_eq!(
        calibration.ticks_for_nanos(u64::MAX),
        u64::MAX.div_ceil(1_000)
    );

    let fast_clock = ClockCalibration::from_tick_hz(u64::MAX);
    assert_eq!(fast_clock.ticks_for_micros(u64::MAX), u64::MAX);
}

#[test]
#[should_panic(expected = "at least once per millisecond")]
fn sub_kilohertz_clock_is_rejected() {
    let _ = ClockCalibration::from_tick_hz(999);
}

#[test]
fn two_millisecond_spin_never_returns_early() {
    let requested = Duration::from_micros(2_000);
    let mut delay = SpinDelay::new();
    let mut fastest = Duration::MAX;

    // The lower bound must hold on every run. Preemption can stretch any single run,
    // so the upper bound is checked against the fastest of several.
    for _ in 0..5 {
        let start = Instant::now();
        delay.delay_us(2_000);
        let elapsed = start.elapsed();
        assert!(elapsed >= requested, "returned after {elapsed:?}");
        fastest = fastest.min(elapsed);
    }
    assert!(fastest < Duration::from_micros(3_000), "fastest {fastest:?}");
}

#[test]
fn nanosecond_and_millisecond_entry_points_agree() {
    let mut delay = SpinDelay::new();

    let start = Instant::now();
    delay.delay_ns(500_000);
    assert!(start.elapsed() >= Duration::from_micros(500));

    let start = Instant::now();
    delay.delay_ms(1);
    assert!(start.elapsed() >= Duration::from_millis(1));
}

#[test]
fn zero_delay_returns_immediately() {
    let mut delay = SpinDelay::new();
    let start = Instant::now();
    delay.delay_us(0);
    assert!(start.elapsed() < Duration::from_millis(1));
}
