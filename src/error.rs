use derive_more::{Display, Error as DeriveError};

/// Result type used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors reported by the servo driver and its GPIO backends.
#[derive(Debug, Display, DeriveError)]
#[cfg_attr(not(feature = "host"), derive(defmt::Format))]
pub enum Error {
    /// The platform GPIO controller could not be acquired.
    #[display("GPIO controller unavailable")]
    ControllerUnavailable,

    /// Another driver already owns this GPIO line.
    #[display("GPIO {_0} is already claimed by another driver")]
    PinAlreadyClaimed(#[error(not(source))] u8),

    /// The GPIO line id is beyond what the claim registry or backend supports.
    #[display("GPIO {_0} is out of range")]
    PinOutOfRange(#[error(not(source))] u8),

    /// The embedded controller was never handed this pin.
    #[display("GPIO {_0} was not registered with the controller")]
    PinNotRegistered(#[error(not(source))] u8),

    /// Writing a level to the line failed.
    #[display("GPIO {_0} write failed")]
    PinWrite(#[error(not(source))] u8),

    /// Pulse width (ms) does not fit in the 25 ms frame.
    #[display("pulse of {_0} ms does not fit in the 25 ms frame")]
    PulseOutOfRange(#[error(not(source))] f32),

    /// Raspberry Pi GPIO failure reported by `rppal`.
    #[cfg(feature = "rpi")]
    #[display("rppal: {_0}")]
    Rppal(rppal::gpio::Error),
}
