//! The frame writer and its cleanup.
//!
//! [`NeoPixels`] owns the driver and the strip registry. The first
//! [`write`](NeoPixels::write) to a GPIO brings its strip up; later writes reuse
//! it. Dropping the value finalizes and releases every strip, so a `NeoPixels`
//! owned by `main` is torn down at normal exit and on panic unwind.
//! `std::process::exit` and fatal signals skip destructors and therefore skip
//! the teardown; no ordering relative to other destructors is promised.

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::config::Config;
use crate::delay::{StdDelay, latch_ms};
use crate::driver::{Controller, Driver};
use crate::pin::{Channel, GpioPin};
use crate::pixel::{RGB8, RGBW, StripFormat, rgb8_bytes, rgbw_bytes};
use crate::registry::{Acquired, ChannelRegistry, Strip, StripInfo};
use crate::strip::init_strip;
use crate::{Error, Result};

/// Drives up to two NeoPixel strips, one per PWM channel.
///
/// # Example
///
/// ```
/// use neopixel_envoy::sim::{SimDelay, SimDriver};
/// use neopixel_envoy::{Acquired, Config, NeoPixels, StripFormat};
///
/// let (driver, _probe) = SimDriver::new();
/// let mut neopixels = NeoPixels::with_delay(driver, SimDelay::default(), Config::default());
///
/// // Ten red RGB pixels on GPIO 18.
/// let frame: Vec<u8> = [0xFF, 0x00, 0x00].repeat(10);
/// assert_eq!(neopixels.write(18, &frame)?, Acquired::Created);
/// assert_eq!(neopixels.write(18, &frame)?, Acquired::Reused);
///
/// let info = neopixels.strip(18).expect("strip was created");
/// assert_eq!((info.format, info.pixel_count, info.dma), (StripFormat::Rgb, 10, 8));
///
/// neopixels.cleanup();
/// assert!(neopixels.strip(18).is_none());
/// # Ok::<(), neopixel_envoy::Error>(())
/// ```
pub struct NeoPixels<D: Driver, T: DelayNs = StdDelay> {
    driver: D,
    delay: T,
    config: Config,
    registry: ChannelRegistry<D::Controller>,
    exit_hook_armed: bool,
}

impl<D: Driver> NeoPixels<D> {
    /// Default configuration, sleeping the thread for the latch wait.
    #[must_use]
    pub const fn new(driver: D) -> Self {
        Self::with_delay(driver, StdDelay, Config::new())
    }
}

impl<D: Driver, T: DelayNs> NeoPixels<D, T> {
    /// Build with an explicit delay source and configuration.
    #[must_use]
    pub const fn with_delay(driver: D, delay: T, config: Config) -> Self {
        Self {
            driver,
            delay,
            config,
            registry: ChannelRegistry::new(),
            exit_hook_armed: false,
        }
    }

    /// Show `buffer` on the strip attached to `pin`.
    ///
    /// The first write to a pin initializes its strip. The strip's format and
    /// pixel count come from the length of that first buffer (see
    /// [`StripFormat::infer`]). Later writes pack `len / bytes_per_pixel` pixels
    /// in the strip's format; pixels past the strip's length are dropped.
    ///
    /// Blocks for about 1 ms per 100 bytes (at least 1 ms) after the frame is
    /// handed to the hardware.
    ///
    /// # Errors
    ///
    /// Pin, length and channel errors are reported before any hardware call:
    /// [`Error::UnsupportedPin`], [`Error::UnsupportedPixelFormat`],
    /// [`Error::ChannelInUse`]. Driver failures surface as
    /// [`Error::PrivilegeRequired`], [`Error::HardwareInit`] or
    /// [`Error::Render`].
    pub fn write<P: GpioPin>(&mut self, pin: P, buffer: &[u8]) -> Result<Acquired> {
        self.write_frame(pin.gpio(), buffer, None)
    }

    /// Write RGB colors to the strip on `pin`.
    ///
    /// # Errors
    ///
    /// Same as [`write`](Self::write), plus [`Error::UnsupportedPixelFormat`]
    /// when the strip is (or would be created as) an RGBW strip, such as a
    /// first write of four colors.
    pub fn write_rgb8<P: GpioPin>(&mut self, pin: P, colors: &[RGB8]) -> Result<Acquired> {
        self.write_frame(pin.gpio(), &rgb8_bytes(colors), Some(StripFormat::Rgb))
    }

    /// Write RGBW colors to the strip on `pin`.
    ///
    /// # Errors
    ///
    /// Same as [`write`](Self::write), plus [`Error::UnsupportedPixelFormat`]
    /// when the strip is (or would be created as) an RGB strip. A new strip
    /// infers its format from the byte length, so a first write of a multiple
    /// of three colors (or of none) is refused.
    pub fn write_rgbw<P: GpioPin>(&mut self, pin: P, colors: &[RGBW<u8>]) -> Result<Acquired> {
        self.write_frame(pin.gpio(), &rgbw_bytes(colors), Some(StripFormat::Rgbw))
    }

    fn write_frame(
        &mut self,
        pin: u32,
        buffer: &[u8],
        expected: Option<StripFormat>,
    ) -> Result<Acquired> {
        let channel = Channel::for_gpio(pin)?;
        let (inferred, _) = StripFormat::infer(buffer.len())?;
        if let Some(expected) = expected {
            let format = self
                .registry
                .lookup(pin)
                .map_or(inferred, |strip| strip.handle.channel(strip.channel).strip_type);
            if format != expected {
                return Err(Error::UnsupportedPixelFormat {
                    len: buffer.len(),
                });
            }
        }
        if let Some(bound_pin) = self.registry.pin_on_channel(channel) {
            if bound_pin != pin {
                return Err(Error::ChannelInUse {
                    channel,
                    bound_pin,
                    pin,
                });
            }
        }

        let Self {
            driver,
            delay,
            config,
            registry,
            exit_hook_armed,
        } = self;

        let (acquired, strip) = registry.get_or_try_insert_with(pin, |registered| {
            init_strip(driver, config, pin, channel, buffer.len(), registered)
        })?;
        if acquired == Acquired::Created && !*exit_hook_armed {
            *exit_hook_armed = true;
            info!("NeoPixels::write: strips will be released when NeoPixels is dropped");
        }

        let handle = &mut strip.handle;
        let configured = *handle.channel(channel);
        let format = configured.strip_type;
        let pixels = buffer.len() / format.bytes_per_pixel();
        if pixels > configured.count {
            warn!(
                "NeoPixels::write: GPIO {} got {} pixels but the strip has {}; extra pixels dropped",
                pin, pixels, configured.count
            );
        }
        for (index, word) in format.words(buffer).take(configured.count).enumerate() {
            handle.set_led(channel, index, word);
        }

        let status = handle.render();
        if !status.is_success() {
            return Err(Error::Render {
                status,
                message: handle.status_message(status),
            });
        }
        debug!(
            "NeoPixels::write: GPIO {} rendered {} {} pixels",
            pin,
            pixels.min(configured.count),
            format
        );

        delay.delay_ms(latch_ms(buffer.len()));
        Ok(acquired)
    }

    /// Finalize and release every strip.
    ///
    /// Does nothing, and makes no driver call, when no strip exists. Afterwards
    /// the next write to any pin initializes from scratch, with DMA engines
    /// assigned from the base again.
    pub fn cleanup(&mut self) {
        if self.registry.is_empty() {
            return;
        }
        let strips = self.registry.drain();
        let released = strips.len();
        for (pin, strip) in strips {
            let Strip { mut handle, .. } = strip;
            handle.fini();
            self.driver.release(handle);
            debug!("NeoPixels::cleanup: released GPIO {}", pin);
        }
        info!("NeoPixels::cleanup: released {} strip(s)", released);
    }

    /// Snapshot of the strip on `pin`, if it has been initialized.
    #[must_use]
    pub fn strip<P: GpioPin>(&self, pin: P) -> Option<StripInfo> {
        let pin = pin.gpio();
        self.registry.lookup(pin).map(|strip| info_of(pin, strip))
    }

    /// Snapshots of every initialized strip.
    #[must_use]
    pub fn strips(&self) -> Vec<StripInfo> {
        self.registry
            .iter()
            .map(|(pin, strip)| info_of(pin, strip))
            .collect()
    }

    /// Whether a strip has been brought up, so dropping will release hardware.
    #[must_use]
    pub const fn is_exit_hook_armed(&self) -> bool {
        self.exit_hook_armed
    }

    /// The configuration strips are created with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The underlying driver.
    #[must_use]
    pub const fn driver(&self) -> &D {
        &self.driver
    }
}

fn info_of<H: Controller>(pin: u32, strip: &Strip<H>) -> StripInfo {
    let configured = strip.handle.channel(strip.channel);
    StripInfo {
        pin,
        channel: strip.channel,
        format: configured.strip_type,
        pixel_count: configured.count,
        dma: strip.dma,
    }
}

impl<D: Driver, T: DelayNs> Drop for NeoPixels<D, T> {
    fn drop(&mut self) {
        if self.exit_hook_armed {
            self.cleanup();
        }
    }
}
