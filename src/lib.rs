//! Drive WS2812/SK6812 "NeoPixel" strips from a Raspberry Pi.
//!
//! Write a byte buffer to a GPIO with [`NeoPixels::write`]; the first write to a
//! pin brings its strip up, and dropping the [`NeoPixels`] tears every strip
//! down again. The hardware itself sits behind the [`driver::Driver`] trait; the
//! [`sim`] module provides an in-process driver for hosts without one.
//!
//! # Glossary
//!
//! - **Channel:** the Pi has two PWM channels that can carry a NeoPixel signal.
//!   Each GPIO that can drive a strip is wired to exactly one of them (see
//!   [`pin`]). At most one strip per channel.
//! - **DMA ([Direct Memory Access](https://en.wikipedia.org/wiki/Direct_memory_access)):**
//!   each strip's controller streams its pixel words through its own DMA
//!   engine. Engines 0, 1, 3, 6, 7 and 15 belong to the platform; strips are
//!   given engines from 8 upward (see [`Config`]).
//! - **Latch:** the idle time a strip needs after the last bit before it shows
//!   the new frame. Every write blocks for it.
//!
//! # Example
//!
//! ```
//! use neopixel_envoy::sim::{SimDelay, SimDriver};
//! use neopixel_envoy::{Config, Error, NeoPixels};
//!
//! let (driver, probe) = SimDriver::new();
//! let mut neopixels = NeoPixels::with_delay(driver, SimDelay::default(), Config::default());
//!
//! // Two RGBW pixels on GPIO 13 (channel 1): 8 bytes is not a multiple of 3.
//! neopixels.write(13, &[0x12, 0x34, 0x56, 0xAA, 0, 0, 0, 0xFF])?;
//! assert_eq!(probe.last_frame(1), Some(vec![0xAA12_3456, 0xFF00_0000]));
//!
//! // GPIO 7 cannot carry a NeoPixel signal.
//! assert_eq!(neopixels.write(7, &[0, 0, 0]), Err(Error::UnsupportedPin { pin: 7 }));
//! # Ok::<(), Error>(())
//! ```

pub mod config;
pub mod delay;
pub mod driver;
mod error;
mod neopixel;
pub mod pin;
pub mod pixel;
pub mod registry;
#[cfg(feature = "host")]
pub mod sim;
mod strip;

// Re-export error types and result (used throughout)
pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::neopixel::NeoPixels;
pub use crate::pin::{Channel, Gpio, GpioPin};
pub use crate::pixel::StripFormat;
pub use crate::registry::{Acquired, StripInfo};
