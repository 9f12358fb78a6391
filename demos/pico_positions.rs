#![no_std]
#![no_main]

use core::{convert::Infallible, panic};
use embassy_executor::Spawner;
use sg90_envoy::{
    Result,
    gpio::PicoGpio,
    servo::{Position, Sg90},
    spin_wait::SpinDelay,
};
use {defmt::info, defmt_rtt as _, panic_probe as _};

// One second of frames per position.
const FRAMES_PER_POSITION: u32 = 40;

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(_spawner: Spawner) -> Result<Infallible> {
    let p = embassy_rp::init(Default::default());

    // Servo signal on GPIO 5
    let mut gpio = PicoGpio::new().with_pin(p.PIN_5)?;
    let mut servo = Sg90::new_default(&mut gpio, SpinDelay::new())?;

    loop {
        for position in Position::ALL {
            info!("servo -> {}", position);
            servo.hold(position, FRAMES_PER_POSITION)?;
        }
    }
}
