#![cfg(feature = "host")]

// Two strips on the simulated driver: 10 RGB pixels on GPIO 18 (channel 0) and
// 8 RGBW pixels on GPIO 13 (channel 1). Prints every recorded hardware call.

use std::error::Error;

use neopixel_envoy::pixel::{RGB8, RGBW, White};
use neopixel_envoy::sim::{SimDelay, SimDriver, SimEvent};
use neopixel_envoy::{Config, NeoPixels};
use smart_leds::colors;

const RGB_LEN: usize = 10;
const RGBW_LEN: usize = 8;

fn main() -> Result<(), Box<dyn Error>> {
    let (driver, probe) = SimDriver::new();
    let delay = SimDelay::default();
    let config = Config::from_env()?;
    let mut neopixels = NeoPixels::with_delay(driver, delay.clone(), config);

    let mut rainbow = [RGB8::default(); RGB_LEN];
    let palette = [colors::RED, colors::GREEN, colors::BLUE, colors::GRAY];
    for (pixel, color) in rainbow.iter_mut().zip(palette.iter().cycle()) {
        *pixel = *color;
    }
    let warm_white = [RGBW {
        r: 0,
        g: 0,
        b: 0,
        a: White(0x80),
    }; RGBW_LEN];

    for step in 0..3 {
        rainbow.rotate_right(1);
        let rgb = neopixels.write_rgb8(18, &rainbow)?;
        let rgbw = neopixels.write_rgbw(13, &warm_white)?;
        println!("step {step}: GPIO 18 {rgb:?}, GPIO 13 {rgbw:?}");
    }

    for info in neopixels.strips() {
        println!(
            "GPIO {} on channel {}: {} {} pixels, DMA {}",
            info.pin, info.channel, info.pixel_count, info.format, info.dma
        );
    }

    neopixels.cleanup();

    for event in probe.events() {
        match event {
            SimEvent::Render { id, status, leds } => {
                let [zero, one] = leds;
                println!(
                    "render #{id} -> {status}: ch0 {:06X?} ch1 {:08X?}",
                    zero, one
                );
            }
            other => println!("{other:?}"),
        }
    }
    println!("latch waits: {} ({:?})", delay.waits(), delay.elapsed());
    Ok(())
}
