use canvas::{
    CanvasError, Feature, FeatureId, FeatureStyle, FitOptions, Geometry, LayerId, MapCanvas,
    MarkerStyle,
};
use config::AppConfig;
use foundation::bounds::Padding;
use runtime::{NoticeBus, OneShotLatch};

use crate::popover::Popover;
use crate::style::{line_style, StyleThreshold};

const TRACK_LAYER_Z: i32 = 10;
const MARKER_LAYER_Z: i32 = 20;
const LIVE_LAYER_Z: i32 = 30;

pub const RECENTER_PADDING_PX: f64 = 80.0;
pub const RECENTER_DURATION_MS: u64 = 500;

/// Track input boundary: anything resolvable to a geometry payload, with
/// optional color and altitude properties.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackInput {
    pub id: String,
    pub color: Option<String>,
    pub altitudes: Vec<f64>,
    /// Geometry payload slots, resolved in priority order.
    pub geojson: Option<Vec<[f64; 2]>>,
    pub geometry: Option<Vec<[f64; 2]>>,
    pub raw_geometry: Option<Vec<[f64; 2]>>,
    /// The input's own vertex list, the final fallback.
    pub coordinates: Vec<[f64; 2]>,
}

impl TrackInput {
    /// `geojson`, else `geometry`, else the raw slot, else the input itself.
    pub fn resolve_geometry(&self) -> &[[f64; 2]] {
        if let Some(g) = &self.geojson {
            return g;
        }
        if let Some(g) = &self.geometry {
            return g;
        }
        if let Some(g) = &self.raw_geometry {
            return g;
        }
        &self.coordinates
    }
}

/// Live location snapshot: a projected `[x, y, altitude]` position plus the
/// track recorded so far.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveSnapshot {
    pub location: Option<[f64; 3]>,
    pub track: TrackInput,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RenderState {
    Uninitialized,
    Initialized,
    Reset,
}

/// Draws the primary track, its endpoint markers and the live pointer.
///
/// Lifecycle: `Uninitialized -> Initialized -> Reset -> Initialized -> ...`.
/// A reset removes every layer this component created before the next
/// initialization can add fresh ones.
#[derive(Debug)]
pub struct TrackRenderer {
    state: RenderState,
    track_id: Option<String>,
    track_color: Option<String>,
    track_layer: Option<LayerId>,
    marker_layer: Option<LayerId>,
    live_layer: Option<LayerId>,
    track_feature: Option<FeatureId>,
    start_feature: Option<FeatureId>,
    end_feature: Option<FeatureId>,
    live_point: Option<FeatureId>,
    live_line: Option<FeatureId>,
    /// Layers torn down while no canvas handle was available; removed on the
    /// next sync that has one.
    stale_layers: Vec<LayerId>,
    recenter: OneShotLatch,
    popover: Option<Popover>,
}

impl Default for TrackRenderer {
    fn default() -> Self {
        Self {
            state: RenderState::Uninitialized,
            track_id: None,
            track_color: None,
            track_layer: None,
            marker_layer: None,
            live_layer: None,
            track_feature: None,
            start_feature: None,
            end_feature: None,
            live_point: None,
            live_line: None,
            stale_layers: Vec::new(),
            recenter: OneShotLatch::new(),
            popover: None,
        }
    }
}

fn thresholds(config: &AppConfig) -> StyleThreshold {
    StyleThreshold {
        orange: config.flow_line.orange_threshold,
        red: config.flow_line.red_threshold,
    }
}

fn endpoint_marker() -> MarkerStyle {
    MarkerStyle {
        radius: 6.0,
        fill: "#ffffff".to_string(),
        stroke: "#333333".to_string(),
    }
}

fn live_marker() -> MarkerStyle {
    MarkerStyle {
        radius: 7.0,
        fill: "#3399cc".to_string(),
        stroke: "#ffffff".to_string(),
    }
}

impl TrackRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile the renderer against the current track and map.
    ///
    /// A missing track, a missing map, or a changed track id tears the
    /// previous rendering down; a present track on a ready map (re-)
    /// initializes. A color-only change restyles the existing layer in
    /// place instead of rebuilding.
    pub fn sync(
        &mut self,
        track: Option<&TrackInput>,
        mut canvas: Option<&mut MapCanvas>,
        config: &AppConfig,
        bus: &mut NoticeBus,
    ) -> Result<(), CanvasError> {
        if let Some(c) = canvas.as_deref_mut() {
            self.flush_stale_layers(c);
        }

        let id_changed = match (&self.track_id, track) {
            (Some(prev), Some(t)) => *prev != t.id,
            _ => false,
        };

        if self.state == RenderState::Initialized
            && (track.is_none() || canvas.is_none() || id_changed)
        {
            self.teardown(canvas.as_deref_mut(), bus);
        }

        let (Some(t), Some(c)) = (track, canvas.as_deref_mut()) else {
            return Ok(());
        };

        if self.state != RenderState::Initialized {
            self.initialize(t, c, config)?;
        } else {
            self.restyle_on_color_change(t, c, config)?;
        }
        Ok(())
    }

    fn initialize(
        &mut self,
        track: &TrackInput,
        canvas: &mut MapCanvas,
        config: &AppConfig,
    ) -> Result<(), CanvasError> {
        let geometry = track.resolve_geometry().to_vec();
        let color = track
            .color
            .clone()
            .unwrap_or_else(|| config.track_color.clone());

        let track_layer = canvas.add_vector_layer(TRACK_LAYER_Z);
        let style = line_style(
            &color,
            &track.altitudes,
            thresholds(config),
            config.flow_line.enabled,
            geometry.len(),
        );
        self.track_feature = Some(canvas.add_feature(
            track_layer,
            Feature::styled(Geometry::Line(geometry.clone()), FeatureStyle::Line(style)),
        )?);

        // Endpoint markers sit above the track line.
        let marker_layer = canvas.add_vector_layer(MARKER_LAYER_Z);
        if let (Some(first), Some(last)) = (geometry.first(), geometry.last()) {
            self.start_feature = Some(canvas.add_feature(
                marker_layer,
                Feature::styled(Geometry::Point(*first), FeatureStyle::Marker(endpoint_marker())),
            )?);
            self.end_feature = Some(canvas.add_feature(
                marker_layer,
                Feature::styled(Geometry::Point(*last), FeatureStyle::Marker(endpoint_marker())),
            )?);
        }

        let live_layer = canvas.add_vector_layer(LIVE_LAYER_Z);
        canvas.set_rotation_interaction(true);

        self.track_layer = Some(track_layer);
        self.marker_layer = Some(marker_layer);
        self.live_layer = Some(live_layer);
        self.track_id = Some(track.id.clone());
        self.track_color = Some(color);
        self.recenter.reset();
        self.popover = config.flow_line.enabled.then(Popover::new);
        self.state = RenderState::Initialized;
        Ok(())
    }

    /// Remove layers orphaned by a teardown that had no canvas handle.
    fn flush_stale_layers(&mut self, canvas: &mut MapCanvas) {
        for layer in self.stale_layers.drain(..) {
            canvas.remove_layer(layer);
        }
    }

    fn teardown(&mut self, canvas: Option<&mut MapCanvas>, bus: &mut NoticeBus) {
        let layers = [self.track_layer, self.marker_layer, self.live_layer]
            .into_iter()
            .flatten();
        match canvas {
            Some(c) => {
                for layer in layers {
                    c.remove_layer(layer);
                }
            }
            // Nothing to clean up on right now; park the ids so the next
            // sync with a canvas can finish the removal.
            None => self.stale_layers.extend(layers),
        }
        if let Some(p) = &mut self.popover {
            p.set(None, bus);
        }
        self.popover = None;
        self.track_layer = None;
        self.marker_layer = None;
        self.live_layer = None;
        self.track_feature = None;
        self.start_feature = None;
        self.end_feature = None;
        self.live_point = None;
        self.live_line = None;
        self.track_id = None;
        self.track_color = None;
        self.recenter.reset();
        self.state = RenderState::Reset;
    }

    fn restyle_on_color_change(
        &mut self,
        track: &TrackInput,
        canvas: &mut MapCanvas,
        config: &AppConfig,
    ) -> Result<(), CanvasError> {
        let color = track
            .color
            .clone()
            .unwrap_or_else(|| config.track_color.clone());
        if self.track_color.as_deref() == Some(color.as_str()) {
            return Ok(());
        }
        if let (Some(layer), Some(feature)) = (self.track_layer, self.track_feature) {
            let vertex_count = canvas
                .feature(layer, feature)
                .map(|f| f.geometry.points().len())
                .unwrap_or(0);
            let style = line_style(
                &color,
                &track.altitudes,
                thresholds(config),
                config.flow_line.enabled,
                vertex_count,
            );
            canvas.set_feature_style(layer, feature, FeatureStyle::Line(style))?;
        }
        self.track_color = Some(color);
        Ok(())
    }

    /// Recenter on the track once per track assignment, after the next
    /// render-completion signal.
    pub fn on_render_complete(&mut self, canvas: &mut MapCanvas) -> Result<(), CanvasError> {
        if self.state != RenderState::Initialized {
            return Ok(());
        }
        if !self.recenter.try_fire() {
            return Ok(());
        }
        let Some(layer) = self.track_layer else {
            return Ok(());
        };
        if let Some(extent) = canvas.layer_extent(layer) {
            canvas.fit_view(
                extent,
                FitOptions {
                    padding: Some(Padding::uniform(RECENTER_PADDING_PX)),
                    duration_ms: RECENTER_DURATION_MS,
                    ..FitOptions::default()
                },
            )?;
        }
        Ok(())
    }

    /// Maintain the live location point and the snapshot line. Both features
    /// are mutated in place; a `None` location clears them but keeps the
    /// layer.
    pub fn update_live(
        &mut self,
        snapshot: Option<&LiveSnapshot>,
        canvas: &mut MapCanvas,
        config: &AppConfig,
        bus: &mut NoticeBus,
    ) -> Result<(), CanvasError> {
        let Some(layer) = self.live_layer else {
            return Ok(());
        };

        let located = snapshot.and_then(|s| s.location.map(|loc| (s, loc)));
        let Some((snap, loc)) = located else {
            if let Some(feature) = self.live_point.take() {
                canvas.remove_feature(layer, feature)?;
            }
            if let Some(feature) = self.live_line.take() {
                canvas.remove_feature(layer, feature)?;
            }
            return Ok(());
        };

        let point = Geometry::Point([loc[0], loc[1]]);
        match self.live_point {
            Some(feature) => canvas.set_feature_geometry(layer, feature, point)?,
            None => {
                self.live_point = Some(canvas.add_feature(
                    layer,
                    Feature::styled(point, FeatureStyle::Marker(live_marker())),
                )?);
            }
        }

        let vertices = snap.track.resolve_geometry().to_vec();
        let line = Geometry::Line(vertices.clone());
        match self.live_line {
            Some(feature) => canvas.set_feature_geometry(layer, feature, line)?,
            None => {
                let color = snap
                    .track
                    .color
                    .clone()
                    .unwrap_or_else(|| config.track_color.clone());
                let style = line_style(
                    &color,
                    &snap.track.altitudes,
                    thresholds(config),
                    config.flow_line.enabled,
                    vertices.len(),
                );
                self.live_line = Some(canvas.add_feature(
                    layer,
                    Feature::styled(line, FeatureStyle::Line(style)),
                )?);
            }
        }

        if config.flow_line.quote_show {
            if let Some(p) = &mut self.popover {
                p.update_altitude(loc[2], thresholds(config), bus);
            }
        }
        Ok(())
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn track_layer(&self) -> Option<LayerId> {
        self.track_layer
    }

    pub fn marker_layer(&self) -> Option<LayerId> {
        self.marker_layer
    }

    pub fn live_layer(&self) -> Option<LayerId> {
        self.live_layer
    }

    pub fn track_feature(&self) -> Option<FeatureId> {
        self.track_feature
    }

    pub fn live_point(&self) -> Option<FeatureId> {
        self.live_point
    }

    pub fn live_line(&self) -> Option<FeatureId> {
        self.live_line
    }

    pub fn popover_text(&self) -> Option<&str> {
        self.popover.as_ref().and_then(|p| p.text())
    }
}
