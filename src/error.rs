use derive_more::derive::{Display, Error};

use crate::driver::Status;
use crate::pin::Channel;

/// A specialized `Result` where the error is this crate's `Error` type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Define a unified error type for this crate.
///
/// Every variant is fatal to the call that produced it. Nothing is retried
/// automatically; a caller that wants to retry a transient render failure
/// simply calls `write` again.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The GPIO is not wired to either PWM channel.
    #[display(
        "GPIO {pin} cannot drive a NeoPixel strip (use 12, 18 or 21 for channel 0, 13 or 19 for channel 1)"
    )]
    UnsupportedPin {
        /// The rejected GPIO number.
        pin: u32,
    },

    /// The buffer length divides by neither 3 nor 4.
    #[display("only 3 or 4 bytes-per-pixel are supported, got a {len}-byte buffer")]
    UnsupportedPixelFormat {
        /// The rejected buffer length in bytes.
        len: usize,
    },

    /// The driver could not map peripheral memory, which happens without root.
    #[display("NeoPixel support requires running with sudo, please try again! (status {status})")]
    PrivilegeRequired {
        /// Raw driver status.
        status: Status,
    },

    /// Any other failure while bringing up the controller.
    #[display("ws2811 init failed with code {status} ({message})")]
    HardwareInit {
        /// Raw driver status.
        status: Status,
        /// The driver's description of `status`.
        message: &'static str,
    },

    /// The driver refused to transmit a frame.
    #[display("ws2811 render failed with code {status} ({message})")]
    Render {
        /// Raw driver status.
        status: Status,
        /// The driver's description of `status`.
        message: &'static str,
    },

    /// A second GPIO asked for a channel that already drives a strip.
    #[display("channel {channel} is already bound to GPIO {bound_pin}; cannot also bind GPIO {pin}")]
    ChannelInUse {
        /// The contested channel.
        channel: Channel,
        /// The GPIO that owns the channel.
        bound_pin: u32,
        /// The GPIO that was refused.
        pin: u32,
    },

    /// Every registry slot is taken.
    #[display("strip registry is full ({capacity} strips)")]
    RegistryFull {
        /// Number of strips the registry can hold.
        capacity: usize,
    },

    /// The configured DMA base would hand out a reserved or nonexistent engine.
    #[display("DMA base {dma_base} would assign a reserved or out-of-range DMA engine")]
    InvalidDmaBase {
        /// The rejected base engine.
        dma_base: u8,
    },

    /// An environment variable was set but could not be parsed.
    #[display("environment variable {name} is not a valid value")]
    InvalidEnv {
        /// Name of the offending variable.
        name: &'static str,
    },
}
