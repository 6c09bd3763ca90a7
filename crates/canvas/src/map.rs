use std::collections::BTreeMap;

use foundation::bounds::Extent;

use crate::feature::{Feature, FeatureId, Geometry};
use crate::layer::{LayerId, LayerKind, TileSource};
use crate::style::FeatureStyle;
use crate::view::{FitOptions, View};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    ViewNotConfigured,
    UnknownLayer,
    UnknownFeature,
    NotAVectorLayer,
}

impl std::fmt::Display for CanvasError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CanvasError::ViewNotConfigured => write!(f, "view has not been configured"),
            CanvasError::UnknownLayer => write!(f, "unknown layer id"),
            CanvasError::UnknownFeature => write!(f, "unknown feature id"),
            CanvasError::NotAVectorLayer => write!(f, "operation requires a vector layer"),
        }
    }
}

impl std::error::Error for CanvasError {}

#[derive(Debug, Clone, PartialEq)]
struct LayerRecord {
    id: LayerId,
    kind: LayerKind,
    visible: bool,
    opacity: f64,
    z_index: i32,
    features: BTreeMap<FeatureId, Feature>,
}

/// One applied fit, kept for traceability.
#[derive(Debug, Clone, PartialEq)]
pub struct FitCall {
    pub extent: Extent,
    pub options: FitOptions,
}

/// One requested rotation animation.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationCall {
    pub to_rad: f64,
    pub duration_ms: u64,
}

/// In-memory stand-in for the external 2D rendering library.
///
/// The surface is exactly the capability set the engine is allowed to use:
/// add/remove layers, visibility/opacity, feature mutation, view fitting and
/// rotation. Applied fits and rotation animations are logged so hosts and
/// tests can observe what actually reached the renderer.
#[derive(Debug, Default)]
pub struct MapCanvas {
    view: Option<View>,
    layers: Vec<LayerRecord>,
    next_layer: u64,
    next_feature: u64,
    fit_log: Vec<FitCall>,
    rotation_log: Vec<RotationCall>,
    rotation_interaction: bool,
    frame_index: u64,
    viewport_resyncs: u64,
    viewport_px: [f64; 2],
}

impl MapCanvas {
    pub fn new(viewport_px: [f64; 2]) -> Self {
        Self {
            next_layer: 1,
            next_feature: 1,
            viewport_px,
            ..Self::default()
        }
    }

    // --- view -----------------------------------------------------------

    pub fn configure_view(
        &mut self,
        min_zoom: f64,
        default_zoom: f64,
        max_zoom: f64,
        projection: impl Into<String>,
    ) {
        self.view = Some(View::new(
            min_zoom,
            default_zoom,
            max_zoom,
            projection,
            self.viewport_px,
        ));
    }

    pub fn view(&self) -> Option<&View> {
        self.view.as_ref()
    }

    pub fn has_view(&self) -> bool {
        self.view.is_some()
    }

    pub fn fit_view(&mut self, extent: Extent, options: FitOptions) -> Result<(), CanvasError> {
        let view = self.view.as_mut().ok_or(CanvasError::ViewNotConfigured)?;
        view.fit(extent, &options);
        self.fit_log.push(FitCall { extent, options });
        Ok(())
    }

    pub fn fit_log(&self) -> &[FitCall] {
        &self.fit_log
    }

    pub fn rotation_rad(&self) -> f64 {
        self.view.as_ref().map(|v| v.rotation_rad).unwrap_or(0.0)
    }

    pub fn set_rotation_rad(&mut self, rad: f64) -> Result<(), CanvasError> {
        let view = self.view.as_mut().ok_or(CanvasError::ViewNotConfigured)?;
        view.rotation_rad = rad;
        Ok(())
    }

    /// Animated rotation; the end state applies immediately, the requested
    /// duration is recorded for the host.
    pub fn animate_rotation(&mut self, to_rad: f64, duration_ms: u64) -> Result<(), CanvasError> {
        self.set_rotation_rad(to_rad)?;
        self.rotation_log.push(RotationCall {
            to_rad,
            duration_ms,
        });
        Ok(())
    }

    pub fn rotation_log(&self) -> &[RotationCall] {
        &self.rotation_log
    }

    pub fn set_rotation_interaction(&mut self, enabled: bool) {
        self.rotation_interaction = enabled;
    }

    pub fn rotation_interaction(&self) -> bool {
        self.rotation_interaction
    }

    // --- render bookkeeping ---------------------------------------------

    /// Render-completion signal: one frame finished drawing.
    pub fn complete_render(&mut self) -> u64 {
        self.frame_index += 1;
        self.frame_index
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Re-measure the container; progress-bar DOM changes can desynchronize
    /// the renderer's notion of viewport size.
    pub fn request_viewport_resync(&mut self) {
        self.viewport_resyncs += 1;
    }

    pub fn viewport_resyncs(&self) -> u64 {
        self.viewport_resyncs
    }

    // --- layers ---------------------------------------------------------

    pub fn add_tile_layer(&mut self, source: TileSource) -> LayerId {
        self.push_layer(LayerKind::Tile(source), 0)
    }

    pub fn add_vector_layer(&mut self, z_index: i32) -> LayerId {
        self.push_layer(LayerKind::Vector, z_index)
    }

    fn push_layer(&mut self, kind: LayerKind, z_index: i32) -> LayerId {
        let id = LayerId(self.next_layer);
        self.next_layer += 1;
        self.layers.push(LayerRecord {
            id,
            kind,
            visible: true,
            opacity: 1.0,
            z_index,
            features: BTreeMap::new(),
        });
        id
    }

    pub fn remove_layer(&mut self, id: LayerId) -> bool {
        let before = self.layers.len();
        self.layers.retain(|l| l.id != id);
        self.layers.len() != before
    }

    pub fn contains_layer(&self, id: LayerId) -> bool {
        self.layers.iter().any(|l| l.id == id)
    }

    /// Layer ids in registration order.
    pub fn layer_ids(&self) -> Vec<LayerId> {
        self.layers.iter().map(|l| l.id).collect()
    }

    /// Tile layer ids in registration order.
    pub fn tile_layer_ids(&self) -> Vec<LayerId> {
        self.layers
            .iter()
            .filter(|l| matches!(l.kind, LayerKind::Tile(_)))
            .map(|l| l.id)
            .collect()
    }

    pub fn tile_source(&self, id: LayerId) -> Option<&TileSource> {
        self.layers.iter().find(|l| l.id == id).and_then(|l| match &l.kind {
            LayerKind::Tile(source) => Some(source),
            LayerKind::Vector => None,
        })
    }

    pub fn set_visible(&mut self, id: LayerId, visible: bool) -> Result<(), CanvasError> {
        self.layer_mut(id)?.visible = visible;
        Ok(())
    }

    pub fn is_visible(&self, id: LayerId) -> bool {
        self.layers
            .iter()
            .find(|l| l.id == id)
            .map(|l| l.visible)
            .unwrap_or(false)
    }

    pub fn set_opacity(&mut self, id: LayerId, opacity: f64) -> Result<(), CanvasError> {
        self.layer_mut(id)?.opacity = opacity.clamp(0.0, 1.0);
        Ok(())
    }

    pub fn opacity(&self, id: LayerId) -> f64 {
        self.layers
            .iter()
            .find(|l| l.id == id)
            .map(|l| l.opacity)
            .unwrap_or(0.0)
    }

    pub fn z_index(&self, id: LayerId) -> Option<i32> {
        self.layers.iter().find(|l| l.id == id).map(|l| l.z_index)
    }

    // --- features -------------------------------------------------------

    pub fn add_feature(&mut self, layer: LayerId, feature: Feature) -> Result<FeatureId, CanvasError> {
        let id = FeatureId(self.next_feature);
        self.next_feature += 1;
        let record = self.vector_layer_mut(layer)?;
        record.features.insert(id, feature);
        Ok(id)
    }

    pub fn remove_feature(&mut self, layer: LayerId, feature: FeatureId) -> Result<(), CanvasError> {
        let record = self.vector_layer_mut(layer)?;
        record
            .features
            .remove(&feature)
            .map(|_| ())
            .ok_or(CanvasError::UnknownFeature)
    }

    pub fn clear_features(&mut self, layer: LayerId) -> Result<(), CanvasError> {
        self.vector_layer_mut(layer)?.features.clear();
        Ok(())
    }

    pub fn feature(&self, layer: LayerId, feature: FeatureId) -> Option<&Feature> {
        self.layers
            .iter()
            .find(|l| l.id == layer)
            .and_then(|l| l.features.get(&feature))
    }

    pub fn feature_count(&self, layer: LayerId) -> usize {
        self.layers
            .iter()
            .find(|l| l.id == layer)
            .map(|l| l.features.len())
            .unwrap_or(0)
    }

    pub fn set_feature_geometry(
        &mut self,
        layer: LayerId,
        feature: FeatureId,
        geometry: Geometry,
    ) -> Result<(), CanvasError> {
        let record = self.vector_layer_mut(layer)?;
        let f = record
            .features
            .get_mut(&feature)
            .ok_or(CanvasError::UnknownFeature)?;
        f.geometry = geometry;
        Ok(())
    }

    pub fn set_feature_style(
        &mut self,
        layer: LayerId,
        feature: FeatureId,
        style: FeatureStyle,
    ) -> Result<(), CanvasError> {
        let record = self.vector_layer_mut(layer)?;
        let f = record
            .features
            .get_mut(&feature)
            .ok_or(CanvasError::UnknownFeature)?;
        f.style = Some(style);
        Ok(())
    }

    /// Bounding extent of every feature vertex on the layer.
    pub fn layer_extent(&self, layer: LayerId) -> Option<Extent> {
        let record = self.layers.iter().find(|l| l.id == layer)?;
        let mut points: Vec<[f64; 2]> = Vec::new();
        for f in record.features.values() {
            points.extend_from_slice(f.geometry.points());
        }
        Extent::from_points(&points)
    }

    fn layer_mut(&mut self, id: LayerId) -> Result<&mut LayerRecord, CanvasError> {
        self.layers
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(CanvasError::UnknownLayer)
    }

    fn vector_layer_mut(&mut self, id: LayerId) -> Result<&mut LayerRecord, CanvasError> {
        let record = self.layer_mut(id)?;
        match record.kind {
            LayerKind::Vector => Ok(record),
            LayerKind::Tile(_) => Err(CanvasError::NotAVectorLayer),
        }
    }
}
