#![cfg(feature = "host")]
//! In-process stand-in for the ws281x driver, for tests and demos on a host
//! without the hardware.
//!
//! Every hardware call is recorded as a [`SimEvent`]. A [`SimProbe`] shares the
//! recording with the driver, so it can still be read after the driver has moved
//! into a [`NeoPixels`](crate::NeoPixels) or that value has been dropped.
//!
//! ```
//! use neopixel_envoy::sim::{SimDelay, SimDriver, SimEvent};
//! use neopixel_envoy::{Config, NeoPixels};
//!
//! let (driver, probe) = SimDriver::new();
//! let mut neopixels = NeoPixels::with_delay(driver, SimDelay::default(), Config::default());
//! neopixels.write(18, &[0xFF, 0x00, 0x00])?;
//! assert_eq!(probe.render_count(), 1);
//! assert_eq!(probe.last_frame(0), Some(vec![0x00FF_0000]));
//! # Ok::<(), neopixel_envoy::Error>(())
//! ```

use core::cell::{Cell, RefCell};
use core::time::Duration;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;

use crate::driver::{ChannelConfig, Controller, Driver, Status};
use crate::pin::Channel;

/// One recorded hardware call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimEvent {
    /// `new_ws2811_t`.
    NewController {
        /// Controller id, counting from 0 per driver.
        id: usize,
    },
    /// `ws2811_init`, with the configuration it saw.
    Init {
        /// Controller id.
        id: usize,
        /// Status returned.
        status: Status,
        /// Signal frequency in Hz.
        freq_hz: u32,
        /// DMA engine.
        dma: u8,
        /// Both channel slots, in index order.
        channels: [ChannelConfig; 2],
    },
    /// `ws2811_render`, with the pixel words of both channels.
    Render {
        /// Controller id.
        id: usize,
        /// Status returned.
        status: Status,
        /// Pixel words of both channels, in index order.
        leds: [Vec<u32>; 2],
    },
    /// `ws2811_fini`.
    Fini {
        /// Controller id.
        id: usize,
    },
    /// `delete_ws2811_t`.
    Release {
        /// Controller id.
        id: usize,
    },
}

#[derive(Debug)]
struct SimState {
    events: Vec<SimEvent>,
    init_status: Status,
    render_status: Status,
    next_id: usize,
}

type Shared = Rc<RefCell<SimState>>;

/// Simulated [`Driver`].
#[derive(Debug)]
pub struct SimDriver {
    state: Shared,
}

impl SimDriver {
    /// A driver whose calls all succeed, plus a probe onto its recording.
    #[must_use]
    pub fn new() -> (Self, SimProbe) {
        let state = Rc::new(RefCell::new(SimState {
            events: Vec::new(),
            init_status: Status::SUCCESS,
            render_status: Status::SUCCESS,
            next_id: 0,
        }));
        (
            Self {
                state: Rc::clone(&state),
            },
            SimProbe { state },
        )
    }
}

impl Driver for SimDriver {
    type Controller = SimController;

    fn new_controller(&mut self) -> SimController {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id = id.saturating_add(1);
        state.events.push(SimEvent::NewController { id });
        SimController {
            id,
            state: Rc::clone(&self.state),
            channels: [ChannelConfig::default(); 2],
            freq_hz: 0,
            dma: 0,
            leds: [Vec::new(), Vec::new()],
        }
    }

    fn release(&mut self, controller: SimController) {
        self.state
            .borrow_mut()
            .events
            .push(SimEvent::Release { id: controller.id });
    }
}

/// Simulated [`Controller`].
#[derive(Debug)]
pub struct SimController {
    id: usize,
    state: Shared,
    channels: [ChannelConfig; 2],
    freq_hz: u32,
    dma: u8,
    leds: [Vec<u32>; 2],
}

impl Controller for SimController {
    fn channel(&self, channel: Channel) -> &ChannelConfig {
        let [zero, one] = &self.channels;
        match channel {
            Channel::Zero => zero,
            Channel::One => one,
        }
    }

    fn channel_mut(&mut self, channel: Channel) -> &mut ChannelConfig {
        let [zero, one] = &mut self.channels;
        match channel {
            Channel::Zero => zero,
            Channel::One => one,
        }
    }

    fn set_freq(&mut self, freq_hz: u32) {
        self.freq_hz = freq_hz;
    }

    fn set_dma(&mut self, dma: u8) {
        self.dma = dma;
    }

    fn init(&mut self) -> Status {
        let status = self.state.borrow().init_status;
        if status.is_success() {
            self.leds = self.channels.map(|config| vec![0; config.count]);
        }
        self.state.borrow_mut().events.push(SimEvent::Init {
            id: self.id,
            status,
            freq_hz: self.freq_hz,
            dma: self.dma,
            channels: self.channels,
        });
        status
    }

    fn set_led(&mut self, channel: Channel, index: usize, word: u32) {
        if let Some(slot) = self
            .leds
            .get_mut(channel.index())
            .and_then(|leds| leds.get_mut(index))
        {
            *slot = word;
        }
    }

    fn render(&mut self) -> Status {
        let status = self.state.borrow().render_status;
        self.state.borrow_mut().events.push(SimEvent::Render {
            id: self.id,
            status,
            leds: self.leds.clone(),
        });
        status
    }

    fn fini(&mut self) {
        self.leds = [Vec::new(), Vec::new()];
        self.state
            .borrow_mut()
            .events
            .push(SimEvent::Fini { id: self.id });
    }
}

/// Read side of a [`SimDriver`]'s recording, and its failure switches.
#[derive(Clone, Debug)]
pub struct SimProbe {
    state: Shared,
}

impl SimProbe {
    /// Every recorded call, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<SimEvent> {
        self.state.borrow().events.clone()
    }

    /// Number of recorded calls.
    #[must_use]
    pub fn hardware_calls(&self) -> usize {
        self.state.borrow().events.len()
    }

    /// Make every following `init` return `status`.
    pub fn set_init_status(&self, status: Status) {
        self.state.borrow_mut().init_status = status;
    }

    /// Make every following `render` return `status`.
    pub fn set_render_status(&self, status: Status) {
        self.state.borrow_mut().render_status = status;
    }

    /// Number of `init` calls, successful or not.
    #[must_use]
    pub fn init_count(&self) -> usize {
        self.count(|event| matches!(event, SimEvent::Init { .. }))
    }

    /// Number of `render` calls, successful or not.
    #[must_use]
    pub fn render_count(&self) -> usize {
        self.count(|event| matches!(event, SimEvent::Render { .. }))
    }

    /// DMA engines of successful `init` calls, in order.
    #[must_use]
    pub fn init_dmas(&self) -> Vec<u8> {
        self.state
            .borrow()
            .events
            .iter()
            .filter_map(|event| match event {
                SimEvent::Init { status, dma, .. } if status.is_success() => Some(*dma),
                _ => None,
            })
            .collect()
    }

    /// Pixel words of `channel` (0 or 1) in the most recent render.
    #[must_use]
    pub fn last_frame(&self, channel: usize) -> Option<Vec<u32>> {
        self.state
            .borrow()
            .events
            .iter()
            .rev()
            .find_map(|event| match event {
                SimEvent::Render { leds, .. } => leds.get(channel).cloned(),
                _ => None,
            })
    }

    fn count(&self, predicate: impl Fn(&SimEvent) -> bool) -> usize {
        self.state
            .borrow()
            .events
            .iter()
            .filter(|event| predicate(event))
            .count()
    }
}

/// [`DelayNs`] that records requested waits instead of sleeping.
///
/// Clones share one clock, so keep a clone to read it back.
#[derive(Clone, Debug, Default)]
pub struct SimDelay {
    elapsed_ns: Rc<Cell<u64>>,
    waits: Rc<Cell<usize>>,
}

impl SimDelay {
    /// Total time requested so far.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.elapsed_ns.get())
    }

    /// Number of delay calls so far.
    #[must_use]
    pub fn waits(&self) -> usize {
        self.waits.get()
    }

    fn record(&self, ns: u64) {
        self.elapsed_ns.set(self.elapsed_ns.get().saturating_add(ns));
        self.waits.set(self.waits.get().saturating_add(1));
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.record(u64::from(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.record(u64::from(us).saturating_mul(1_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.record(u64::from(ms).saturating_mul(1_000_000));
    }
}
