//! Pixel formats and the packed words the ws281x driver expects.
//!
//! The format of a strip is never passed in explicitly. It is inferred from the
//! length of the first buffer written to the strip: a length divisible by 3 means
//! RGB, otherwise a length divisible by 4 means RGBW. Divisibility by 3 wins, so
//! a 12-byte buffer is always four RGB pixels, never three RGBW pixels.
//!
//! ```
//! use neopixel_envoy::pixel::StripFormat;
//!
//! assert_eq!(StripFormat::infer(30), Ok((StripFormat::Rgb, 10)));
//! assert_eq!(StripFormat::infer(12), Ok((StripFormat::Rgb, 4)));
//! assert_eq!(StripFormat::infer(8), Ok((StripFormat::Rgbw, 2)));
//! assert_eq!(StripFormat::Rgbw.pack(&[0x12, 0x34, 0x56, 0xAA]), Some(0xAA12_3456));
//! ```

use derive_more::derive::Display;

/// RGB color type accepted by [`NeoPixels::write_rgb8`](crate::NeoPixels::write_rgb8).
pub use smart_leds::RGB8;
/// RGBW color type accepted by [`NeoPixels::write_rgbw`](crate::NeoPixels::write_rgbw).
pub use smart_leds::{RGBW, White};

use crate::{Error, Result};

/// Color layout of a strip, fixed when the strip is first initialized.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash)]
pub enum StripFormat {
    /// WS2811/WS2812, three bytes per pixel.
    #[default]
    #[display("RGB")]
    Rgb,
    /// SK6812 with a dedicated white die, four bytes per pixel.
    #[display("RGBW")]
    Rgbw,
}

impl StripFormat {
    /// Bytes each pixel occupies in a caller buffer.
    #[must_use]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Rgbw => 4,
        }
    }

    /// Infer format and pixel count from a buffer length.
    ///
    /// A zero-length buffer is a zero-pixel RGB strip.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedPixelFormat`] when `len` divides by neither 3 nor 4.
    pub fn infer(len: usize) -> Result<(Self, usize)> {
        if len % 3 == 0 {
            Ok((Self::Rgb, len / 3))
        } else if len % 4 == 0 {
            Ok((Self::Rgbw, len / 4))
        } else {
            Err(Error::UnsupportedPixelFormat { len })
        }
    }

    /// Pack one pixel's bytes into a driver word.
    ///
    /// RGB packs as `0x00RRGGBB`, RGBW as `0xWWRRGGBB`. Returns `None` when
    /// `pixel` is not exactly [`bytes_per_pixel`](Self::bytes_per_pixel) long.
    #[must_use]
    pub fn pack(self, pixel: &[u8]) -> Option<u32> {
        match (self, pixel) {
            (Self::Rgb, &[red, green, blue]) => Some(rgb_word(red, green, blue)),
            (Self::Rgbw, &[red, green, blue, white]) => {
                Some((u32::from(white) << 24) | rgb_word(red, green, blue))
            }
            _ => None,
        }
    }

    /// Iterate the packed words of every whole pixel in `buffer`.
    ///
    /// Trailing bytes that do not fill a pixel are ignored.
    pub fn words(self, buffer: &[u8]) -> impl Iterator<Item = u32> + '_ {
        buffer
            .chunks_exact(self.bytes_per_pixel())
            .filter_map(move |pixel| self.pack(pixel))
    }
}

const fn rgb_word(red: u8, green: u8, blue: u8) -> u32 {
    ((red as u32) << 16) | ((green as u32) << 8) | blue as u32
}

/// Flatten RGB colors into the byte layout [`NeoPixels::write`](crate::NeoPixels::write) takes.
#[must_use]
pub fn rgb8_bytes(colors: &[RGB8]) -> Vec<u8> {
    colors
        .iter()
        .flat_map(|color| [color.r, color.g, color.b])
        .collect()
}

/// Flatten RGBW colors into the byte layout [`NeoPixels::write`](crate::NeoPixels::write) takes.
#[must_use]
pub fn rgbw_bytes(colors: &[RGBW<u8>]) -> Vec<u8> {
    colors
        .iter()
        .flat_map(|color| [color.r, color.g, color.b, color.a.0])
        .collect()
}
