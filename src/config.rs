//! Controller-wide settings.
//!
//! Only the DMA base is configurable. Frequency, brightness and inversion are
//! fixed: brightness scaling is the caller's business, and only 800 kHz,
//! non-inverted strips are supported.

use core::ops::RangeInclusive;

use crate::pin::MAX_STRIPS;
use crate::{Error, Result};

/// Signal frequency of every strip, in Hz.
pub const LED_FREQ_HZ: u32 = 800_000;

/// Hardware brightness; pixel values pass through unscaled.
pub const LED_BRIGHTNESS: u8 = 255;

/// Output inversion; inverted logic is not supported.
pub const LED_INVERT: bool = false;

/// First DMA engine handed out (see [`Config::dma_base`]).
pub const DMA_BASE_DEFAULT: u8 = 8;

/// DMA engines the platform keeps for itself.
pub const RESERVED_DMA: [u8; 6] = [0, 1, 3, 6, 7, 15];

/// DMA engines that exist on the SoC and may be used for strips.
pub const DMA_USABLE: RangeInclusive<u8> = 2..=14;

/// Environment variable read by [`Config::from_env`].
pub const DMA_BASE_ENV: &str = "NEOPIXEL_DMA_BASE";

/// Settings shared by every strip a [`NeoPixels`](crate::NeoPixels) creates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    dma_base: u8,
}

impl Config {
    /// Default settings: DMA engines are assigned from 8 upward.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dma_base: DMA_BASE_DEFAULT,
        }
    }

    /// Use a different first DMA engine.
    ///
    /// Strip `n` (counting from 0 in registration order) gets engine
    /// `dma_base + n`, so every engine from `dma_base` up to
    /// `dma_base + MAX_STRIPS - 1` must exist and be free.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDmaBase`] if any of those engines is reserved or
    /// out of range.
    pub fn with_dma_base(self, dma_base: u8) -> Result<Self> {
        let invalid = Error::InvalidDmaBase { dma_base };
        let span = u8::try_from(MAX_STRIPS).map_err(|_| invalid.clone())?;
        let last = dma_base.checked_add(span.saturating_sub(1)).ok_or(invalid.clone())?;
        let usable = (dma_base..=last)
            .all(|dma| DMA_USABLE.contains(&dma) && !RESERVED_DMA.contains(&dma));
        if !usable {
            return Err(invalid);
        }
        Ok(Self { dma_base })
    }

    /// Defaults, overridden by `NEOPIXEL_DMA_BASE` when it is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEnv`] if the variable is not a number, or
    /// [`Error::InvalidDmaBase`] if it names an unusable engine.
    pub fn from_env() -> Result<Self> {
        match std::env::var(DMA_BASE_ENV) {
            Ok(value) => Self::from_env_value(Some(&value)),
            Err(std::env::VarError::NotPresent) => Self::from_env_value(None),
            Err(std::env::VarError::NotUnicode(_)) => Err(Error::InvalidEnv { name: DMA_BASE_ENV }),
        }
    }

    /// Build from the raw value of `NEOPIXEL_DMA_BASE`, `None` when unset.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Same as [`from_env`](Self::from_env).
    pub fn from_env_value(value: Option<&str>) -> Result<Self> {
        let Some(value) = value else {
            return Ok(Self::new());
        };
        let dma_base = value
            .trim()
            .parse()
            .map_err(|_| Error::InvalidEnv { name: DMA_BASE_ENV })?;
        Self::new().with_dma_base(dma_base)
    }

    /// First DMA engine handed out.
    #[must_use]
    pub const fn dma_base(&self) -> u8 {
        self.dma_base
    }

    /// DMA engine for a strip registered after `registered` others.
    pub(crate) fn dma_for(&self, registered: usize) -> u8 {
        let offset = u8::try_from(registered).unwrap_or(u8::MAX);
        self.dma_base.saturating_add(offset)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
