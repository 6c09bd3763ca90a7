use canvas::{CanvasError, FitOptions, MapCanvas};
use config::MapViewConfig;
use foundation::bounds::{Extent, Padding};
use foundation::proj::{bbox_to_extent, world_extent};
use runtime::notice::kind;
use runtime::{NoticeBus, ObservedValue, TimerHandle, TimerQueue};

pub const FIT_DEBOUNCE_MS: u64 = 500;

/// A fit that has been requested but not yet applied. The latest request
/// within a debounce window replaces any pending one.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewFitRequest {
    pub extent: Extent,
    pub options: FitOptions,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum SessionTimer {
    FitDebounce,
}

/// Owns the view lifecycle: creation, debounced fitting, padding, rotation.
///
/// The session is the only component allowed to replace or re-target the
/// view; everything else works through layers and features.
#[derive(Debug)]
pub struct MapSession {
    config: MapViewConfig,
    center_extent: Extent,
    padding: Padding,
    timers: TimerQueue<SessionTimer>,
    pending_fit: Option<ViewFitRequest>,
    pending_handle: Option<TimerHandle>,
    rotation_deg: ObservedValue<i32>,
    initialized: bool,
}

impl MapSession {
    pub fn new(config: MapViewConfig) -> Self {
        let padding = Padding::from_array(config.padding);
        Self {
            config,
            center_extent: world_extent(),
            padding,
            timers: TimerQueue::new(),
            pending_fit: None,
            pending_handle: None,
            rotation_deg: ObservedValue::new(),
            initialized: false,
        }
    }

    /// Create the view and, when a bounding box is configured, request the
    /// initial fit at the default zoom. Safe to call again: the view is
    /// simply rebuilt from the same configuration.
    pub fn initialize(&mut self, canvas: &mut MapCanvas, now_ms: u64) {
        canvas.configure_view(
            self.config.min_zoom,
            self.config.default_zoom,
            self.config.max_zoom,
            self.config.projection.clone(),
        );

        match self.config.bbox {
            Some(bbox) => {
                self.center_extent = bbox_to_extent(bbox);
                let options = FitOptions {
                    padding: Some(self.padding),
                    zoom: Some(self.config.default_zoom),
                    ..FitOptions::default()
                };
                self.fit_view(self.center_extent, options, now_ms);
            }
            None => {
                self.center_extent = world_extent();
            }
        }
        self.initialized = true;
    }

    /// Debounced fit: schedules the request and cancels any pending one, so
    /// only the last request within a window reaches the canvas.
    pub fn fit_view(&mut self, extent: Extent, options: FitOptions, now_ms: u64) {
        if let Some(handle) = self.pending_handle.take() {
            self.timers.cancel(handle);
        }
        self.pending_fit = Some(ViewFitRequest { extent, options });
        let handle = self
            .timers
            .schedule(now_ms, FIT_DEBOUNCE_MS, SessionTimer::FitDebounce);
        self.pending_handle = Some(handle);
    }

    /// Drive the debounce timer; applies the surviving fit when it fires.
    pub fn tick(&mut self, now_ms: u64, canvas: &mut MapCanvas) -> Result<(), CanvasError> {
        for timer in self.timers.advance(now_ms) {
            match timer {
                SessionTimer::FitDebounce => {
                    self.pending_handle = None;
                    if let Some(req) = self.pending_fit.take() {
                        canvas.fit_view(req.extent, req.options)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Padding changes refit immediately, keeping the current zoom.
    pub fn on_padding_change(
        &mut self,
        padding: [f64; 4],
        canvas: &mut MapCanvas,
    ) -> Result<(), CanvasError> {
        self.padding = Padding::from_array(padding);
        let Some(view) = canvas.view() else {
            return Ok(());
        };
        let options = FitOptions {
            padding: Some(self.padding),
            zoom: Some(view.zoom),
            ..FitOptions::default()
        };
        canvas.fit_view(self.center_extent, options)
    }

    /// Rotation tracking for one rendered frame; notifies only on change.
    pub fn on_render_frame(&mut self, canvas: &MapCanvas, bus: &mut NoticeBus) {
        let deg = rotation_degrees(canvas.rotation_rad());
        if let Some(d) = self.rotation_deg.update(deg) {
            bus.emit(kind::ROTATION, d.to_string());
        }
    }

    pub fn orient_north(&mut self, canvas: &mut MapCanvas) -> Result<(), CanvasError> {
        canvas.animate_rotation(0.0, self.config.rotation_duration_ms)
    }

    pub fn reset_rotation(&mut self, canvas: &mut MapCanvas) -> Result<(), CanvasError> {
        canvas.animate_rotation(0.0, 0)
    }

    /// Back to north and to the original center extent, without padding.
    pub fn reset(&mut self, canvas: &mut MapCanvas) -> Result<(), CanvasError> {
        self.reset_rotation(canvas)?;
        canvas.fit_view(self.center_extent, FitOptions::default())
    }

    pub fn center_extent(&self) -> Extent {
        self.center_extent
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn pending_fit(&self) -> Option<&ViewFitRequest> {
        self.pending_fit.as_ref()
    }
}

/// View rotation in whole degrees on a 0-360 scale.
pub fn rotation_degrees(rad: f64) -> i32 {
    let deg = rad.to_degrees().rem_euclid(360.0).round();
    (deg as i32) % 360
}

#[cfg(test)]
mod tests {
    use super::{rotation_degrees, MapSession, FIT_DEBOUNCE_MS};
    use canvas::{FitOptions, MapCanvas};
    use config::MapViewConfig;
    use foundation::bounds::Extent;
    use runtime::NoticeBus;

    fn canvas() -> MapCanvas {
        MapCanvas::new([1024.0, 768.0])
    }

    fn session_with_bbox() -> MapSession {
        MapSession::new(MapViewConfig {
            bbox: Some([5.9, 45.8, 10.5, 47.8]),
            ..MapViewConfig::default()
        })
    }

    #[test]
    fn initialize_requests_the_initial_fit() {
        let mut c = canvas();
        let mut s = session_with_bbox();
        s.initialize(&mut c, 0);

        assert!(c.has_view());
        assert!(s.pending_fit().is_some());
        assert!(c.fit_log().is_empty());

        s.tick(FIT_DEBOUNCE_MS, &mut c).unwrap();
        assert_eq!(c.fit_log().len(), 1);
        assert_eq!(c.fit_log()[0].options.zoom, Some(10.0));
        assert_eq!(c.view().unwrap().zoom, 10.0);
    }

    #[test]
    fn only_the_last_fit_in_a_window_applies() {
        let mut c = canvas();
        let mut s = MapSession::new(MapViewConfig::default());
        s.initialize(&mut c, 0);

        let first = Extent::new([0.0, 0.0], [10.0, 10.0]);
        let second = Extent::new([100.0, 100.0], [200.0, 200.0]);
        s.fit_view(first, FitOptions::default(), 0);
        s.fit_view(second, FitOptions::default(), 300);

        // The first request's timer was cancelled.
        s.tick(FIT_DEBOUNCE_MS, &mut c).unwrap();
        assert!(c.fit_log().is_empty());

        s.tick(300 + FIT_DEBOUNCE_MS, &mut c).unwrap();
        assert_eq!(c.fit_log().len(), 1);
        assert_eq!(c.fit_log()[0].extent, second);
    }

    #[test]
    fn spaced_fits_each_apply() {
        let mut c = canvas();
        let mut s = MapSession::new(MapViewConfig::default());
        s.initialize(&mut c, 0);

        let a = Extent::new([0.0, 0.0], [1.0, 1.0]);
        let b = Extent::new([2.0, 2.0], [3.0, 3.0]);
        s.fit_view(a, FitOptions::default(), 0);
        s.tick(FIT_DEBOUNCE_MS, &mut c).unwrap();
        s.fit_view(b, FitOptions::default(), 1_000);
        s.tick(1_000 + FIT_DEBOUNCE_MS, &mut c).unwrap();

        assert_eq!(c.fit_log().len(), 2);
        assert_eq!(c.fit_log()[0].extent, a);
        assert_eq!(c.fit_log()[1].extent, b);
    }

    #[test]
    fn padding_change_refits_immediately_preserving_zoom() {
        let mut c = canvas();
        let mut s = session_with_bbox();
        s.initialize(&mut c, 0);
        s.tick(FIT_DEBOUNCE_MS, &mut c).unwrap();

        let zoom_before = c.view().unwrap().zoom;
        s.on_padding_change([40.0, 0.0, 0.0, 0.0], &mut c).unwrap();

        assert_eq!(c.fit_log().len(), 2);
        let applied = &c.fit_log()[1];
        assert_eq!(applied.options.zoom, Some(zoom_before));
        assert_eq!(applied.options.padding.unwrap().top, 40.0);
        assert_eq!(c.view().unwrap().zoom, zoom_before);
    }

    #[test]
    fn padding_change_without_view_is_a_no_op() {
        let mut c = canvas();
        let mut s = session_with_bbox();
        s.on_padding_change([10.0; 4], &mut c).unwrap();
        assert!(c.fit_log().is_empty());
    }

    #[test]
    fn rotation_notifies_only_on_change() {
        let mut c = canvas();
        let mut s = MapSession::new(MapViewConfig::default());
        s.initialize(&mut c, 0);
        let mut bus = NoticeBus::new();

        s.on_render_frame(&c, &mut bus);
        s.on_render_frame(&c, &mut bus);
        assert_eq!(bus.notices().len(), 1);
        assert_eq!(bus.notices()[0].message, "0");

        c.set_rotation_rad(std::f64::consts::FRAC_PI_2).unwrap();
        s.on_render_frame(&c, &mut bus);
        s.on_render_frame(&c, &mut bus);
        assert_eq!(bus.notices().len(), 2);
        assert_eq!(bus.notices()[1].message, "90");
    }

    #[test]
    fn orient_north_uses_configured_duration() {
        let mut c = canvas();
        let mut s = MapSession::new(MapViewConfig {
            rotation_duration_ms: 750,
            ..MapViewConfig::default()
        });
        s.initialize(&mut c, 0);
        c.set_rotation_rad(1.0).unwrap();

        s.orient_north(&mut c).unwrap();
        assert_eq!(c.rotation_rad(), 0.0);
        assert_eq!(c.rotation_log().last().unwrap().duration_ms, 750);

        c.set_rotation_rad(1.0).unwrap();
        s.reset_rotation(&mut c).unwrap();
        assert_eq!(c.rotation_log().last().unwrap().duration_ms, 0);
    }

    #[test]
    fn reset_restores_center_extent_without_padding() {
        let mut c = canvas();
        let mut s = session_with_bbox();
        s.initialize(&mut c, 0);
        s.tick(FIT_DEBOUNCE_MS, &mut c).unwrap();
        c.set_rotation_rad(2.0).unwrap();

        s.reset(&mut c).unwrap();
        assert_eq!(c.rotation_rad(), 0.0);
        let applied = c.fit_log().last().unwrap();
        assert_eq!(applied.extent, s.center_extent());
        assert_eq!(applied.options.padding, None);
    }

    #[test]
    fn degrees_are_normalized_to_full_turns() {
        assert_eq!(rotation_degrees(0.0), 0);
        assert_eq!(rotation_degrees(std::f64::consts::PI), 180);
        assert_eq!(rotation_degrees(-std::f64::consts::FRAC_PI_2), 270);
        assert_eq!(rotation_degrees(2.0 * std::f64::consts::PI), 0);
    }
}
