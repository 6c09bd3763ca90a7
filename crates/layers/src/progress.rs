use std::collections::BTreeMap;

use canvas::{LayerId, MapCanvas};
use runtime::notice::kind;
use runtime::{NoticeBus, ObservedValue, OneShotLatch, TimerHandle, TimerQueue};

pub const HIDE_DELAY_MS: u64 = 1_000;

/// Per-layer load counters. Both only grow; errors count as loaded so the
/// pair converges once every in-flight request has resolved.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct LoadCounters {
    pub loading: u64,
    pub loaded: u64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TileEvent {
    LoadStart,
    LoadEnd,
    LoadError,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum ProgressTimer {
    HideIndicator,
}

/// Aggregates tile-loading events into one displayed percentage.
///
/// Activation is a one-shot gate: tracking starts once the view exists and
/// configuration is present, and the set of tracked layers is frozen at
/// that moment.
#[derive(Debug)]
pub struct LoadProgress {
    gate: OneShotLatch,
    order: Vec<LayerId>,
    counters: BTreeMap<LayerId, LoadCounters>,
    percentage: ObservedValue<u8>,
    indicator_visible: bool,
    success: bool,
    timers: TimerQueue<ProgressTimer>,
    hide_handle: Option<TimerHandle>,
}

impl Default for LoadProgress {
    fn default() -> Self {
        Self {
            gate: OneShotLatch::new(),
            order: Vec::new(),
            counters: BTreeMap::new(),
            percentage: ObservedValue::new(),
            indicator_visible: false,
            success: false,
            timers: TimerQueue::new(),
            hide_handle: None,
        }
    }
}

impl LoadProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the aggregator. Returns `true` on the activation that actually
    /// attached counters; later calls are no-ops within the cycle.
    pub fn activate(&mut self, canvas: &MapCanvas, config_ready: bool) -> bool {
        if !config_ready || !canvas.has_view() {
            return false;
        }
        if !self.gate.try_fire() {
            return false;
        }
        for id in canvas.tile_layer_ids() {
            self.order.push(id);
            self.counters.insert(id, LoadCounters::default());
        }
        true
    }

    pub fn is_active(&self) -> bool {
        self.gate.is_fired()
    }

    pub fn on_tile_event(
        &mut self,
        layer: LayerId,
        event: TileEvent,
        now_ms: u64,
        canvas: &mut MapCanvas,
        bus: &mut NoticeBus,
    ) {
        let Some(c) = self.counters.get_mut(&layer) else {
            return;
        };
        match event {
            TileEvent::LoadStart => c.loading += 1,
            // Errors are terminal outcomes; they count exactly like loads.
            TileEvent::LoadEnd | TileEvent::LoadError => c.loaded += 1,
        }
        self.refresh(now_ms, canvas, bus);
    }

    /// First layer in registration order that is visible at full opacity.
    /// When none qualifies the first tracked layer stands in; when several
    /// qualify the first match wins. Mirrors the original selection rule,
    /// ambiguity included.
    fn display_layer(&self, canvas: &MapCanvas) -> Option<LayerId> {
        self.order
            .iter()
            .find(|id| canvas.is_visible(**id) && canvas.opacity(**id) == 1.0)
            .or_else(|| self.order.first())
            .copied()
    }

    fn refresh(&mut self, now_ms: u64, canvas: &mut MapCanvas, bus: &mut NoticeBus) {
        let Some(display) = self.display_layer(canvas) else {
            return;
        };
        let c = self.counters.get(&display).copied().unwrap_or_default();

        let pct: u8 = if c.loading == 0 {
            100
        } else {
            let raw = (c.loaded as f64 / c.loading as f64 * 100.0).round();
            raw.clamp(0.0, 100.0) as u8
        };

        if c.loaded == c.loading {
            self.success = true;
            if let Some(h) = self.hide_handle.take() {
                self.timers.cancel(h);
            }
            self.hide_handle = Some(self.timers.schedule(
                now_ms,
                HIDE_DELAY_MS,
                ProgressTimer::HideIndicator,
            ));
        } else {
            self.success = false;
            self.indicator_visible = true;
            if let Some(h) = self.hide_handle.take() {
                self.timers.cancel(h);
            }
        }

        if let Some(p) = self.percentage.update(pct) {
            bus.emit(kind::PROGRESS, p.to_string());
        }

        // Progress-bar DOM changes can desynchronize the renderer's notion
        // of viewport size.
        canvas.request_viewport_resync();
    }

    pub fn tick(&mut self, now_ms: u64) {
        for timer in self.timers.advance(now_ms) {
            match timer {
                ProgressTimer::HideIndicator => {
                    self.indicator_visible = false;
                    self.hide_handle = None;
                }
            }
        }
    }

    pub fn percentage(&self) -> Option<u8> {
        self.percentage.get().copied()
    }

    pub fn indicator_visible(&self) -> bool {
        self.indicator_visible
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn counters(&self, layer: LayerId) -> Option<LoadCounters> {
        self.counters.get(&layer).copied()
    }
}
