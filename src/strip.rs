//! One-time hardware bring-up of a strip.

use log::info;

use crate::config::{Config, LED_BRIGHTNESS, LED_FREQ_HZ, LED_INVERT};
use crate::driver::{ChannelConfig, Controller, Driver};
use crate::pin::Channel;
use crate::pixel::StripFormat;
use crate::registry::Strip;
use crate::{Error, Result};

/// Allocate, configure and initialize a controller for `pin`.
///
/// `registered` is the number of strips that already exist. It picks the DMA
/// engine, and when it is zero both channel slots are reset to
/// [`ChannelConfig::OFF`] before the target slot is configured.
///
/// The format is inferred from `buffer_len` before anything is allocated, so a
/// bad length never touches the driver. If `init` fails, the controller is
/// released before the error is returned.
pub(crate) fn init_strip<D: Driver>(
    driver: &mut D,
    config: &Config,
    pin: u32,
    channel: Channel,
    buffer_len: usize,
    registered: usize,
) -> Result<Strip<D::Controller>> {
    let (strip_type, count) = StripFormat::infer(buffer_len)?;
    let dma = config.dma_for(registered);

    let mut controller = driver.new_controller();
    if registered == 0 {
        for each in Channel::ALL {
            *controller.channel_mut(each) = ChannelConfig::OFF;
        }
    }

    *controller.channel_mut(channel) = ChannelConfig {
        count,
        gpio: pin,
        invert: LED_INVERT,
        brightness: LED_BRIGHTNESS,
        strip_type,
    };
    controller.set_freq(LED_FREQ_HZ);
    controller.set_dma(dma);

    let status = controller.init();
    if !status.is_success() {
        let message = controller.status_message(status);
        driver.release(controller);
        return Err(if status.is_privilege_error() {
            Error::PrivilegeRequired { status }
        } else {
            Error::HardwareInit { status, message }
        });
    }

    info!(
        "init_strip: GPIO {} on channel {}: {} {} pixels, DMA {}",
        pin, channel, count, strip_type, dma
    );
    Ok(Strip {
        handle: controller,
        channel,
        dma,
    })
}
