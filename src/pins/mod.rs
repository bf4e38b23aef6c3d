pub mod simulated;
pub mod sysfs;
pub mod wiring;

pub use simulated::SimulatedPins;
pub use sysfs::SysfsPins;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PinError {
    #[error("wPi pin {pin}: {source}")]
    Io {
        pin: u32,
        source: std::io::Error,
    },

    #[error("wPi pin {0} was not exported by the kernel")]
    NotExported(u32),

    #[error("wPi pin {0} has no GPIO line on this header")]
    UnknownPin(u32),

    #[error("wPi pin {0} is not configured as an output")]
    NotConfigured(u32),

    #[error("wPi pin {pin} reported unexpected value '{value}'")]
    InvalidValue { pin: u32, value: String },
}

/// Digital output lines driven by the monitor, addressed by wiringPi pin.
pub trait PinInterface {
    /// Prepare `pin` for output. Called once per line before the first pass.
    fn setup_output(&mut self, pin: u32) -> Result<(), PinError>;

    /// Current logic level of `pin`.
    fn read(&mut self, pin: u32) -> Result<bool, PinError>;

    fn write(&mut self, pin: u32, value: bool) -> Result<(), PinError>;
}
