//! The pin → strip registry: the single source of truth for which GPIOs have
//! live hardware behind them.

use heapless::LinearMap;

use crate::pin::{Channel, MAX_STRIPS};
use crate::pixel::StripFormat;
use crate::{Error, Result};

/// Which path [`ChannelRegistry::get_or_try_insert_with`] took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Acquired {
    /// The strip did not exist and was initialized by this call.
    Created,
    /// An existing strip was reused.
    Reused,
}

/// A registered strip: the controller plus what it was configured with.
#[derive(Debug)]
pub struct Strip<H> {
    /// The controller that owns the channel.
    pub handle: H,
    /// Channel the strip transmits on.
    pub channel: Channel,
    /// DMA engine the controller was initialized with.
    pub dma: u8,
}

/// Read-only snapshot of a registered strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StripInfo {
    /// GPIO the strip is attached to.
    pub pin: u32,
    /// Channel the strip transmits on.
    pub channel: Channel,
    /// Color layout fixed at initialization.
    pub format: StripFormat,
    /// Pixel count fixed at initialization.
    pub pixel_count: usize,
    /// DMA engine the controller streams through.
    pub dma: u8,
}

/// Maps GPIO numbers to the strips initialized on them.
///
/// Entries are only ever added after a lookup miss and are only removed all at
/// once, by [`drain`](Self::drain).
#[derive(Debug)]
pub struct ChannelRegistry<H> {
    strips: LinearMap<u32, Strip<H>, MAX_STRIPS>,
}

impl<H> ChannelRegistry<H> {
    /// An empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            strips: LinearMap::new(),
        }
    }

    /// The strip on `pin`, if one was initialized.
    #[must_use]
    pub fn lookup(&self, pin: u32) -> Option<&Strip<H>> {
        self.strips.get(&pin)
    }

    /// The pin currently bound to `channel`, if any.
    #[must_use]
    pub fn pin_on_channel(&self, channel: Channel) -> Option<u32> {
        self.strips
            .iter()
            .find(|(_, strip)| strip.channel == channel)
            .map(|(pin, _)| *pin)
    }

    /// Register a strip for a pin that has none.
    ///
    /// # Errors
    ///
    /// Returns the strip back if `pin` is already registered or every slot is
    /// taken; the caller still owns the hardware and must release it.
    pub fn insert(&mut self, pin: u32, strip: Strip<H>) -> core::result::Result<(), Strip<H>> {
        if self.strips.contains_key(&pin) {
            return Err(strip);
        }
        match self.strips.insert(pin, strip) {
            Ok(_) => Ok(()),
            Err((_, strip)) => Err(strip),
        }
    }

    /// Return the strip on `pin`, running `init` to create it on a miss.
    ///
    /// `init` receives the number of strips already registered, which drives
    /// DMA engine assignment. It is not called when the registry is full.
    ///
    /// # Errors
    ///
    /// Propagates any error from `init`, and returns [`Error::RegistryFull`]
    /// when `pin` is new but no slot is left.
    pub fn get_or_try_insert_with<I>(&mut self, pin: u32, init: I) -> Result<(Acquired, &mut Strip<H>)>
    where
        I: FnOnce(usize) -> Result<Strip<H>>,
    {
        let full = Error::RegistryFull {
            capacity: MAX_STRIPS,
        };
        let acquired = if self.strips.contains_key(&pin) {
            Acquired::Reused
        } else {
            if self.strips.len() >= MAX_STRIPS {
                return Err(full);
            }
            let strip = init(self.strips.len())?;
            // Miss and free slot were both checked above.
            if self.strips.insert(pin, strip).is_err() {
                return Err(full);
            }
            Acquired::Created
        };
        let strip = self.strips.get_mut(&pin).ok_or(full)?;
        Ok((acquired, strip))
    }

    /// Every registered handle.
    pub fn handles(&self) -> impl Iterator<Item = &H> {
        self.strips.values().map(|strip| &strip.handle)
    }

    /// Every registered pin with its strip.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Strip<H>)> {
        self.strips.iter().map(|(pin, strip)| (*pin, strip))
    }

    /// Number of registered strips.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strips.len()
    }

    /// Whether no strip is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strips.is_empty()
    }

    /// Remove and return every strip, leaving the registry empty.
    pub fn drain(&mut self) -> heapless::Vec<(u32, Strip<H>), MAX_STRIPS> {
        // Same capacity as the map, so neither collect can overflow.
        let pins: heapless::Vec<u32, MAX_STRIPS> = self.strips.keys().copied().collect();
        pins.into_iter()
            .filter_map(|pin| self.strips.remove(&pin).map(|strip| (pin, strip)))
            .collect()
    }
}

impl<H> Default for ChannelRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}
