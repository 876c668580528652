//! The seam between this crate and the low-level ws281x driver.
//!
//! A [`Driver`] allocates [`Controller`]s. A controller mirrors the C
//! `ws2811_t` structure: two channel slots, a signal frequency, a DMA engine, and
//! the `init` / `render` / `fini` protocol. The crate never talks to the hardware
//! any other way, so a real binding and the host [`sim`](crate::sim) driver are
//! interchangeable.

use derive_more::derive::Display;

use crate::pin::Channel;
use crate::pixel::StripFormat;

/// Raw status code returned by the driver (`ws2811_return_t`).
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
#[display("{_0}")]
pub struct Status(pub i32);

impl Status {
    /// The call succeeded.
    pub const SUCCESS: Self = Self(0);
    /// Unspecified failure.
    pub const GENERIC: Self = Self(-1);
    /// Allocation failed.
    pub const OUT_OF_MEMORY: Self = Self(-2);
    /// Board revision unknown to the driver.
    pub const HW_NOT_SUPPORTED: Self = Self(-3);
    /// `mlock` of the DMA buffer failed.
    pub const MEM_LOCK: Self = Self(-4);
    /// `mmap` of peripheral memory failed; in practice, not running as root.
    pub const MMAP: Self = Self(-5);
    /// Peripheral registers could not be mapped.
    pub const MAP_REGISTERS: Self = Self(-6);
    /// GPIO setup failed.
    pub const GPIO_INIT: Self = Self(-7);
    /// PWM setup failed.
    pub const PWM_SETUP: Self = Self(-8);
    /// The VideoCore mailbox could not be opened.
    pub const MAILBOX_DEVICE: Self = Self(-9);
    /// DMA transfer failed.
    pub const DMA: Self = Self(-10);
    /// The GPIO cannot be routed to the peripheral.
    pub const ILLEGAL_GPIO: Self = Self(-11);
    /// PCM setup failed.
    pub const PCM_SETUP: Self = Self(-12);
    /// SPI setup failed.
    pub const SPI_SETUP: Self = Self(-13);
    /// SPI transfer failed.
    pub const SPI_TRANSFER: Self = Self(-14);

    /// Whether this status reports success.
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 == Self::SUCCESS.0
    }

    /// Whether this status means the process lacks the privileges to touch
    /// peripheral memory.
    #[must_use]
    pub const fn is_privilege_error(self) -> bool {
        self.0 == Self::MMAP.0
    }

    /// Human-readable description, matching `ws2811_get_return_t_str`.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self.0 {
            0 => "Success",
            -1 => "Generic failure",
            -2 => "Out of memory",
            -3 => "Hardware revision is not supported",
            -4 => "Memory lock failed",
            -5 => "mmap() failed",
            -6 => "Unable to map registers into userspace",
            -7 => "Unable to initialize GPIO",
            -8 => "Unable to initialize PWM",
            -9 => "Failed to create mailbox device",
            -10 => "DMA error",
            -11 => "Selected GPIO not possible",
            -12 => "Unable to initialize PCM",
            -13 => "Unable to initialize SPI",
            -14 => "SPI transfer error",
            _ => "Unknown error",
        }
    }
}

/// Per-channel configuration slot of a controller (`ws2811_channel_t`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Number of pixels on the strip.
    pub count: usize,
    /// GPIO carrying the signal; 0 leaves the channel unused.
    pub gpio: u32,
    /// Invert the output signal.
    pub invert: bool,
    /// Hardware brightness scale, 0..=255.
    pub brightness: u8,
    /// Color layout of the pixel words.
    pub strip_type: StripFormat,
}

impl ChannelConfig {
    /// An unused channel: no pixels, no GPIO, not inverted, zero brightness.
    pub const OFF: Self = Self {
        count: 0,
        gpio: 0,
        invert: false,
        brightness: 0,
        strip_type: StripFormat::Rgb,
    };
}

/// One hardware controller instance (`ws2811_t`).
pub trait Controller {
    /// Read a channel slot.
    fn channel(&self, channel: Channel) -> &ChannelConfig;

    /// Mutably borrow a channel slot. Changes take effect on the next
    /// [`init`](Self::init).
    fn channel_mut(&mut self, channel: Channel) -> &mut ChannelConfig;

    /// Set the output signal frequency in Hz.
    fn set_freq(&mut self, freq_hz: u32);

    /// Select the DMA engine that streams pixel data.
    fn set_dma(&mut self, dma: u8);

    /// Bring up the peripheral with the current configuration.
    fn init(&mut self) -> Status;

    /// Store a packed pixel word. Indices at or past the channel's configured
    /// `count` are ignored.
    fn set_led(&mut self, channel: Channel, index: usize, word: u32);

    /// Transmit the stored pixel words on every configured channel.
    fn render(&mut self) -> Status;

    /// Stop the peripheral and release its DMA resources.
    fn fini(&mut self);

    /// Describe a status returned by this controller.
    fn status_message(&self, status: Status) -> &'static str {
        status.message()
    }
}

/// Allocates and frees [`Controller`]s (`new_ws2811_t` / `delete_ws2811_t`).
pub trait Driver {
    /// Controller type handed out by this driver.
    type Controller: Controller;

    /// Allocate a fresh, uninitialized controller.
    fn new_controller(&mut self) -> Self::Controller;

    /// Free a controller's memory. The controller must already be finalized.
    fn release(&mut self, controller: Self::Controller);
}
