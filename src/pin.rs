//! GPIO identifiers and the fixed GPIO → channel wiring of the Raspberry Pi.
//!
//! Only five GPIOs can carry a NeoPixel signal. Each is hard-wired to one of the
//! two PWM channels:
//!
//! | GPIO | channel |
//! |------|---------|
//! | 12, 18, 21 | [`Channel::Zero`] |
//! | 13, 19 | [`Channel::One`] |

use derive_more::derive::Display;

use crate::{Error, Result};

/// GPIOs that map to [`Channel::Zero`].
pub const CHANNEL_0_PINS: [u32; 3] = [21, 18, 12];

/// GPIOs that map to [`Channel::One`].
pub const CHANNEL_1_PINS: [u32; 2] = [13, 19];

/// Most strips that can exist at once: one per channel.
pub const MAX_STRIPS: usize = Channel::ALL.len();

/// Anything that resolves to a numeric GPIO id.
///
/// Implemented for plain integers and for [`Gpio`], so both `write(18, ..)` and
/// `write(Gpio(18), ..)` work. Board-support types can implement it to hand their
/// pin objects straight to [`NeoPixels::write`](crate::NeoPixels::write).
pub trait GpioPin {
    /// Broadcom GPIO number of this pin.
    fn gpio(&self) -> u32;
}

impl GpioPin for u32 {
    fn gpio(&self) -> u32 {
        *self
    }
}

impl GpioPin for u8 {
    fn gpio(&self) -> u32 {
        u32::from(*self)
    }
}

/// Negative numbers map to `u32::MAX`, which no channel accepts.
impl GpioPin for i32 {
    fn gpio(&self) -> u32 {
        u32::try_from(*self).unwrap_or(u32::MAX)
    }
}

impl<T: GpioPin + ?Sized> GpioPin for &T {
    fn gpio(&self) -> u32 {
        (**self).gpio()
    }
}

/// A Broadcom GPIO number.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("GPIO{_0}")]
pub struct Gpio(pub u32);

impl GpioPin for Gpio {
    fn gpio(&self) -> u32 {
        self.0
    }
}

/// One of the two hardware transmission channels.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    /// PWM channel 0.
    #[display("0")]
    Zero,
    /// PWM channel 1.
    #[display("1")]
    One,
}

impl Channel {
    /// Both channels, in index order.
    pub const ALL: [Self; 2] = [Self::Zero, Self::One];

    /// Resolve the channel a GPIO is wired to.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedPin`] for any GPIO outside the wiring table.
    pub fn for_gpio(pin: u32) -> Result<Self> {
        if CHANNEL_0_PINS.contains(&pin) {
            Ok(Self::Zero)
        } else if CHANNEL_1_PINS.contains(&pin) {
            Ok(Self::One)
        } else {
            Err(Error::UnsupportedPin { pin })
        }
    }

    /// Slot index of this channel inside a controller.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Zero => 0,
            Self::One => 1,
        }
    }
}
