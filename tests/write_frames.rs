#![allow(missing_docs)]
//! Host-level tests for writing frames through the simulated driver.

use core::time::Duration;

use neopixel_envoy::driver::Status;
use neopixel_envoy::pixel::{RGB8, RGBW, White};
use neopixel_envoy::sim::{SimDelay, SimDriver, SimEvent, SimProbe};
use neopixel_envoy::{Acquired, Channel, Config, Error, Gpio, NeoPixels, StripFormat};

fn neopixels() -> (NeoPixels<SimDriver, SimDelay>, SimProbe, SimDelay) {
    let (driver, probe) = SimDriver::new();
    let delay = SimDelay::default();
    let neopixels = NeoPixels::with_delay(driver, delay.clone(), Config::default());
    (neopixels, probe, delay)
}

#[test]
fn ten_red_pixels_on_gpio_18() {
    let (mut neopixels, probe, delay) = neopixels();
    let frame: Vec<u8> = [0xFF, 0x00, 0x00].repeat(10);

    assert_eq!(neopixels.write(18, &frame), Ok(Acquired::Created));

    let info = neopixels.strip(18).expect("strip exists");
    assert_eq!(info.channel, Channel::Zero);
    assert_eq!(info.format, StripFormat::Rgb);
    assert_eq!(info.pixel_count, 10);
    assert_eq!(info.dma, 8);
    assert_eq!(probe.init_count(), 1);
    assert_eq!(probe.render_count(), 1);
    assert_eq!(probe.last_frame(0), Some(vec![0x00FF_0000; 10]));
    assert_eq!(delay.waits(), 1);
    assert_eq!(delay.elapsed(), Duration::from_millis(1));
}

#[test]
fn controller_runs_at_800khz_full_brightness() {
    let (mut neopixels, probe, _delay) = neopixels();
    neopixels.write(12, &[0; 3]).expect("write succeeds");

    let init = probe.events().into_iter().find_map(|event| match event {
        SimEvent::Init {
            freq_hz, channels, ..
        } => Some((freq_hz, channels)),
        _ => None,
    });
    let (freq_hz, [zero, _]) = init.expect("init recorded");
    assert_eq!(freq_hz, 800_000);
    assert_eq!(zero.gpio, 12);
    assert_eq!(zero.brightness, 255);
    assert!(!zero.invert);
    assert_eq!(zero.strip_type, StripFormat::Rgb);
}

#[test]
fn rgbw_pixels_pack_white_in_top_byte() {
    let (mut neopixels, probe, _delay) = neopixels();
    neopixels
        .write(19, &[0x12, 0x34, 0x56, 0xAA, 0x01, 0x02, 0x03, 0x04])
        .expect("write succeeds");

    assert_eq!(
        neopixels.strip(19).map(|info| (info.format, info.pixel_count)),
        Some((StripFormat::Rgbw, 2))
    );
    assert_eq!(probe.last_frame(1), Some(vec![0xAA12_3456, 0x0401_0203]));
}

#[test]
fn twelve_bytes_are_four_rgb_pixels() {
    let (mut neopixels, probe, _delay) = neopixels();
    let frame: Vec<u8> = (1..=12).collect();
    neopixels.write(21, &frame).expect("write succeeds");

    assert_eq!(
        neopixels.strip(21).map(|info| (info.format, info.pixel_count)),
        Some((StripFormat::Rgb, 4))
    );
    assert_eq!(
        probe.last_frame(0),
        Some(vec![0x0001_0203, 0x0004_0506, 0x0007_0809, 0x000A_0B0C])
    );
}

#[test]
fn second_write_reuses_strip() {
    let (mut neopixels, probe, _delay) = neopixels();
    let frame = [0x10, 0x20, 0x30];

    assert_eq!(neopixels.write(18, &frame), Ok(Acquired::Created));
    assert_eq!(neopixels.write(18, &frame), Ok(Acquired::Reused));

    assert_eq!(probe.init_count(), 1);
    assert_eq!(probe.render_count(), 2);
    assert_eq!(probe.init_dmas(), [8]);
    assert_eq!(probe.last_frame(0), Some(vec![0x0010_2030]));
}

#[test]
fn dma_engines_follow_registration_order() {
    let (mut neopixels, probe, _delay) = neopixels();
    neopixels.write(Gpio(19), &[0; 3]).expect("first strip");
    neopixels.write(Gpio(21), &[0; 3]).expect("second strip");

    assert_eq!(probe.init_dmas(), [8, 9]);
    assert_eq!(neopixels.strip(19).map(|info| info.dma), Some(8));
    assert_eq!(neopixels.strip(21).map(|info| info.dma), Some(9));
    assert_eq!(neopixels.strips().len(), 2);
}

#[test]
fn configured_dma_base_shifts_engines() {
    let (driver, probe) = SimDriver::new();
    let config = Config::new().with_dma_base(10).expect("10 and 11 are free");
    let mut neopixels = NeoPixels::with_delay(driver, SimDelay::default(), config);

    neopixels.write(18, &[0; 3]).expect("first strip");
    neopixels.write(13, &[0; 3]).expect("second strip");

    assert_eq!(probe.init_dmas(), [10, 11]);
}

#[test]
fn unsupported_pin_fails_before_hardware() {
    let (mut neopixels, probe, delay) = neopixels();

    assert_eq!(
        neopixels.write(7, &[0, 0, 0]),
        Err(Error::UnsupportedPin { pin: 7 })
    );
    assert_eq!(probe.hardware_calls(), 0);
    assert_eq!(delay.waits(), 0);
}

#[test]
fn unsupported_length_fails_before_hardware() {
    let (mut neopixels, probe, _delay) = neopixels();

    assert_eq!(
        neopixels.write(18, &[0; 5]),
        Err(Error::UnsupportedPixelFormat { len: 5 })
    );
    assert_eq!(probe.hardware_calls(), 0);

    neopixels.write(18, &[0; 6]).expect("valid write");
    let calls = probe.hardware_calls();
    assert_eq!(
        neopixels.write(18, &[0; 7]),
        Err(Error::UnsupportedPixelFormat { len: 7 })
    );
    assert_eq!(probe.hardware_calls(), calls);
}

#[test]
fn empty_buffer_is_a_zero_pixel_rgb_strip() {
    let (mut neopixels, probe, delay) = neopixels();

    assert_eq!(neopixels.write(18, &[]), Ok(Acquired::Created));
    assert_eq!(
        neopixels.strip(18).map(|info| (info.format, info.pixel_count)),
        Some((StripFormat::Rgb, 0))
    );
    assert_eq!(probe.last_frame(0), Some(Vec::new()));
    assert_eq!(delay.elapsed(), Duration::from_millis(1));
}

#[test]
fn second_pin_on_bound_channel_is_refused() {
    let (mut neopixels, probe, _delay) = neopixels();
    neopixels.write(18, &[0; 3]).expect("first strip");
    let calls = probe.hardware_calls();

    assert_eq!(
        neopixels.write(21, &[0; 3]),
        Err(Error::ChannelInUse {
            channel: Channel::Zero,
            bound_pin: 18,
            pin: 21,
        })
    );
    assert_eq!(probe.hardware_calls(), calls);
    assert!(neopixels.strip(21).is_none());
}

#[test]
fn mmap_failure_asks_for_privileges() {
    let (mut neopixels, probe, _delay) = neopixels();
    probe.set_init_status(Status::MMAP);

    assert_eq!(
        neopixels.write(18, &[0; 3]),
        Err(Error::PrivilegeRequired {
            status: Status::MMAP
        })
    );
    assert!(neopixels.strips().is_empty());
    assert_eq!(probe.render_count(), 0);
}

#[test]
fn other_init_failure_carries_driver_message() {
    let (mut neopixels, probe, _delay) = neopixels();
    probe.set_init_status(Status::DMA);

    let err = neopixels.write(13, &[0; 3]).expect_err("init fails");
    assert_eq!(
        err,
        Error::HardwareInit {
            status: Status::DMA,
            message: "DMA error",
        }
    );
    assert_eq!(err.to_string(), "ws2811 init failed with code -10 (DMA error)");
}

#[test]
fn init_can_succeed_after_a_failure() {
    let (mut neopixels, probe, _delay) = neopixels();
    probe.set_init_status(Status::GENERIC);
    assert!(neopixels.write(18, &[0; 3]).is_err());

    probe.set_init_status(Status::SUCCESS);
    assert_eq!(neopixels.write(18, &[0; 3]), Ok(Acquired::Created));
    assert_eq!(probe.init_dmas(), [8]);
}

#[test]
fn render_failure_is_reported_and_not_retried() {
    let (mut neopixels, probe, delay) = neopixels();
    probe.set_render_status(Status::SPI_TRANSFER);

    assert_eq!(
        neopixels.write(18, &[1, 2, 3]),
        Err(Error::Render {
            status: Status::SPI_TRANSFER,
            message: "SPI transfer error",
        })
    );
    assert_eq!(probe.render_count(), 1);
    assert_eq!(delay.waits(), 0);

    probe.set_render_status(Status::SUCCESS);
    assert_eq!(neopixels.write(18, &[1, 2, 3]), Ok(Acquired::Reused));
    assert_eq!(probe.render_count(), 2);
}

#[test]
fn long_frame_is_clipped_to_strip_length() {
    let (mut neopixels, probe, _delay) = neopixels();
    neopixels.write(18, &[0; 6]).expect("two-pixel strip");

    neopixels
        .write(18, &[1, 1, 1, 2, 2, 2, 3, 3, 3])
        .expect("clipped write");
    assert_eq!(probe.last_frame(0), Some(vec![0x0001_0101, 0x0002_0202]));
}

#[test]
fn short_frame_updates_leading_pixels_only() {
    let (mut neopixels, probe, _delay) = neopixels();
    neopixels
        .write(18, &[9, 9, 9, 9, 9, 9])
        .expect("two-pixel strip");

    neopixels.write(18, &[1, 2, 3]).expect("one-pixel write");
    assert_eq!(probe.last_frame(0), Some(vec![0x0001_0203, 0x0009_0909]));
}

#[test]
fn rgb_strip_keeps_its_format_for_four_byte_multiples() {
    let (mut neopixels, probe, _delay) = neopixels();
    neopixels.write(18, &[0; 6]).expect("RGB strip");

    // 8 bytes would be RGBW for a new strip; this one stays RGB.
    neopixels
        .write(18, &[1, 2, 3, 4, 5, 6, 7, 8])
        .expect("RGB write");
    assert_eq!(probe.last_frame(0), Some(vec![0x0001_0203, 0x0004_0506]));
}

#[test]
fn latch_wait_scales_with_buffer_length() {
    let (mut neopixels, _probe, delay) = neopixels();
    neopixels.write(18, &[0; 300]).expect("write succeeds");
    assert_eq!(delay.elapsed(), Duration::from_millis(3));

    neopixels.write(18, &[0; 303]).expect("write succeeds");
    assert_eq!(delay.elapsed(), Duration::from_millis(3 + 4));
}

#[test]
fn smart_leds_colors_write_through() {
    let (mut neopixels, probe, _delay) = neopixels();
    neopixels
        .write_rgb8(18, &[RGB8::new(0x12, 0x34, 0x56)])
        .expect("rgb write");
    neopixels
        .write_rgbw(
            13,
            &[RGBW {
                r: 0x12,
                g: 0x34,
                b: 0x56,
                a: White(0xAA),
            }],
        )
        .expect("rgbw write");

    // 4 bytes is not a multiple of 3, so GPIO 13 is an RGBW strip.
    assert_eq!(
        neopixels.strip(13).map(|info| info.format),
        Some(StripFormat::Rgbw)
    );
    let renders: Vec<[Vec<u32>; 2]> = probe
        .events()
        .into_iter()
        .filter_map(|event| match event {
            SimEvent::Render { leds, .. } => Some(leds),
            _ => None,
        })
        .collect();
    assert_eq!(renders.len(), 2);
    assert_eq!(
        renders.first().map(|[zero, _]| zero.clone()),
        Some(vec![0x0012_3456])
    );
    assert_eq!(
        renders.get(1).map(|[_, one]| one.clone()),
        Some(vec![0xAA12_3456])
    );
}

fn white_over(red: u8, green: u8, blue: u8, white: u8) -> RGBW<u8> {
    RGBW {
        r: red,
        g: green,
        b: blue,
        a: White(white),
    }
}

#[test]
fn three_rgbw_colors_do_not_create_an_rgb_strip() {
    let (mut neopixels, probe, _delay) = neopixels();
    let colors = [white_over(0x12, 0x34, 0x56, 0xAA); 3];

    assert_eq!(
        neopixels.write_rgbw(13, &colors),
        Err(Error::UnsupportedPixelFormat { len: 12 })
    );
    assert_eq!(
        neopixels.write_rgbw(13, &[]),
        Err(Error::UnsupportedPixelFormat { len: 0 })
    );
    assert!(neopixels.strip(13).is_none());
    assert_eq!(probe.hardware_calls(), 0);
}

#[test]
fn rgbw_strip_takes_any_number_of_rgbw_colors() {
    let (mut neopixels, probe, _delay) = neopixels();
    let first = [white_over(0, 0, 0, 0); 4];
    assert_eq!(neopixels.write_rgbw(13, &first), Ok(Acquired::Created));

    let colors = [white_over(0x12, 0x34, 0x56, 0xAA); 3];
    assert_eq!(neopixels.write_rgbw(13, &colors), Ok(Acquired::Reused));
    assert_eq!(
        probe.last_frame(1),
        Some(vec![0xAA12_3456, 0xAA12_3456, 0xAA12_3456, 0])
    );
}

#[test]
fn typed_writes_refuse_a_strip_of_the_other_format() {
    let (mut neopixels, probe, _delay) = neopixels();
    neopixels.write(18, &[0; 6]).expect("RGB strip");
    neopixels.write(19, &[0; 8]).expect("RGBW strip");
    let calls = probe.hardware_calls();

    assert_eq!(
        neopixels.write_rgbw(18, &[white_over(1, 2, 3, 4); 2]),
        Err(Error::UnsupportedPixelFormat { len: 8 })
    );
    assert_eq!(
        neopixels.write_rgb8(19, &[RGB8::new(1, 2, 3); 4]),
        Err(Error::UnsupportedPixelFormat { len: 12 })
    );
    assert_eq!(
        neopixels.write_rgb8(21, &[RGB8::new(1, 2, 3); 4]),
        Err(Error::ChannelInUse {
            channel: Channel::Zero,
            bound_pin: 18,
            pin: 21,
        })
    );
    assert_eq!(probe.hardware_calls(), calls);
}
