//! Swing an SG90 on a Raspberry Pi through left, middle, and right.
//!
//! Usage: `demo_rpi_positions [BCM pin] [frames per position]`
//!
//! Defaults to GPIO 5 and 40 frames (one second) per position. Power the servo
//! from a separate 5 V supply and tie its ground to the Pi's ground.

use std::env;
use std::error::Error;

use sg90_envoy::gpio::{PinId, RpiGpio};
use sg90_envoy::servo::{Position, Sg90};
use sg90_envoy::spin_wait::SpinDelay;

const DEFAULT_FRAMES: u32 = 40;

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let pin = match args.next() {
        Some(arg) => PinId::new(arg.parse()?),
        None => PinId::DEFAULT,
    };
    let frames = match args.next() {
        Some(arg) => arg.parse()?,
        None => DEFAULT_FRAMES,
    };

    let mut gpio = RpiGpio::new()?;
    let mut servo = Sg90::new(&mut gpio, pin, SpinDelay::new())?;

    for position in Position::ALL {
        println!("{pin}: {position:?} ({} ms) for {frames} frames", position.pulse().as_millis());
        servo.hold(position, frames)?;
    }
    servo.relax()?;

    Ok(())
}
